use crate::bits::BitWriter;
use crate::deflate::tables::bit_length;
use crate::deflate::{CodeLengths, Token};
use crate::error::Result;
use crate::huffman::{FrequencyCounter, HuffmanEncoder};
use crate::lzss::Matcher;
use crate::{CompressConfig, CompressStats};
use log::debug;

/// Single-block encoder
///
/// Pass 1 runs the matcher over the whole input and counts symbol
/// frequencies; pass 2 assigns canonical codes and packs the tokens. Nothing
/// is written until pass 1 has finished.
#[derive(Clone, Debug, Default)]
pub struct Encoder {
    config: CompressConfig,
}

impl Encoder {
    pub fn new(config: CompressConfig) -> Self {
        Self { config }
    }

    /// Compress `data` into header ‖ body
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.encode_with_stats(data).map(|(out, _)| out)
    }

    /// Compress `data` and report what the matcher and coder did
    pub fn encode_with_stats(&self, data: &[u8]) -> Result<(Vec<u8>, CompressStats)> {
        self.config.validate()?;

        // Pass 1: tokens and frequencies
        let matcher = Matcher::new(self.config.window_size);
        let mut tokens = matcher.find_tokens(data);
        tokens.push(Token::EndOfBlock);

        let mut freq = FrequencyCounter::new();
        freq.count_tokens(&tokens);

        let symbol_code = HuffmanEncoder::from_frequencies(&freq.symbol_freq)?;
        let distance_code = HuffmanEncoder::from_frequencies(&freq.distance_freq)?;

        // Pass 2: header, then body
        let header = CodeLengths::new(
            symbol_code.code_lengths().to_vec(),
            distance_code.code_lengths().to_vec(),
        )
        .to_bytes();

        // Every token codes to at least one bit; most to a byte or less
        let mut writer = BitWriter::with_capacity(header.len() + tokens.len() + 16);
        writer.write_bytes(&header);

        for token in &tokens {
            write_token(&mut writer, token, &symbol_code, &distance_code)?;
        }

        let output = writer.finish();

        let mut stats = CompressStats::from_tokens(&tokens);
        stats.uncompressed_bytes = data.len() as u64;
        stats.compressed_bytes = output.len() as u64;
        stats.header_bytes = header.len() as u64;

        debug!(
            "encoded {} bytes -> {} bytes ({} literals, {} matches, {} header bytes, window {})",
            stats.uncompressed_bytes,
            stats.compressed_bytes,
            stats.literals,
            stats.matches,
            stats.header_bytes,
            matcher.window_size()
        );

        Ok((output, stats))
    }
}

/// Append one token to the body
///
/// Order: symbol code, length extra bits, distance code, distance extra bits.
/// Codes go MSB-first, extra bits LSB-first at their minimal width.
fn write_token(
    writer: &mut BitWriter,
    token: &Token,
    symbols: &HuffmanEncoder,
    distances: &HuffmanEncoder,
) -> Result<()> {
    symbols.write_symbol(writer, token.symbol())?;

    if let Token::Match { length, distance } = *token {
        writer.write_bits(length as u64, bit_length(length as u64));
        let dist_bits = bit_length(distance as u64);
        distances.write_symbol(writer, dist_bits as u16)?;
        writer.write_bits(distance as u64, dist_bits);
    }

    debug_assert!(writer.pending_bits() <= 7);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deflate::rle_decode;
    use crate::error::Error;

    #[test]
    fn test_empty_input_layout() {
        let out = Encoder::default().encode(b"").unwrap();

        // Only end-of-block is coded: 1-bit code "0" padded to one byte
        let mut input = out.as_slice();
        let symbols = rle_decode(&mut input, 288).unwrap();
        let distances = rle_decode(&mut input, 32).unwrap();
        assert_eq!(symbols[256], 1);
        assert_eq!(symbols.iter().filter(|&&l| l > 0).count(), 1);
        assert!(distances.iter().all(|&l| l == 0));
        assert_eq!(input, &[0x00]);
    }

    #[test]
    fn test_stats() {
        let (out, stats) = Encoder::default().encode_with_stats(b"abcabcabc").unwrap();
        assert_eq!(stats.uncompressed_bytes, 9);
        assert_eq!(stats.compressed_bytes, out.len() as u64);
        assert_eq!(stats.literals, 3);
        assert_eq!(stats.matches, 1);
        assert_eq!(stats.matched_bytes, 6);
        assert!(stats.header_bytes > 0 && stats.header_bytes < stats.compressed_bytes);
    }

    #[test]
    fn test_deterministic_output() {
        let data = b"she sells sea shells by the sea shore";
        let a = Encoder::default().encode(data).unwrap();
        let b = Encoder::default().encode(data).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_window_rejected() {
        let encoder = Encoder::new(CompressConfig { window_size: 0 });
        assert!(matches!(encoder.encode(b"abc"), Err(Error::InvalidWindowSize(0))));
    }

    #[test]
    fn test_long_run_encodes_small() {
        // A long run collapses to a handful of tokens
        let data = vec![b'z'; 200_000];
        let (out, stats) = Encoder::default().encode_with_stats(&data).unwrap();
        assert!(stats.matches <= 8);
        assert!(out.len() < 200);
        assert_eq!(crate::decode(&out).unwrap(), data);
    }

    #[test]
    fn test_single_literal_body() {
        // Symbols 'x' and EOB get 1-bit codes: 'x' = 0, EOB = 1
        let out = Encoder::default().encode(b"x").unwrap();
        assert_eq!(out.last(), Some(&0b10));
    }
}

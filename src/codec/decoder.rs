use crate::deflate::TokenParser;
use crate::error::Result;
use crate::lzss::OutputWindow;
use crate::CompressStats;
use log::debug;

/// Single-block decoder
///
/// The stream carries no total length and a single match may ask for up to
/// 4 GiB of output. Set [`Decoder::with_max_output`] before decoding
/// untrusted input.
#[derive(Clone, Debug)]
pub struct Decoder {
    max_output: usize,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self { max_output: usize::MAX }
    }

    /// Fail with `OutputLimitExceeded` instead of producing more than `max_output` bytes
    pub fn with_max_output(max_output: usize) -> Self {
        Self { max_output }
    }

    /// Decompress a stream produced by [`crate::codec::Encoder`]
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.decode_with_stats(data).map(|(out, _)| out)
    }

    /// Decompress and count the tokens that were applied
    pub fn decode_with_stats(&self, data: &[u8]) -> Result<(Vec<u8>, CompressStats)> {
        let mut parser = TokenParser::new(data)?;
        let capacity = data.len().saturating_mul(3).min(self.max_output);
        let mut window = OutputWindow::with_capacity(capacity).with_limit(self.max_output);
        let mut stats = CompressStats::default();

        while let Some(token) = parser.next_token()? {
            window.apply(&token)?;
            stats.record(&token);
        }

        stats.uncompressed_bytes = window.len() as u64;
        stats.compressed_bytes = data.len() as u64;

        debug!(
            "decoded {} bytes -> {} bytes ({} literals, {} matches, {} body bytes read)",
            stats.compressed_bytes,
            stats.uncompressed_bytes,
            stats.literals,
            stats.matches,
            parser.bytes_read()
        );

        Ok((window.into_inner(), stats))
    }
}

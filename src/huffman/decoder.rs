use super::encoder::canonical_codes;
use crate::bits::BitReader;
use crate::deflate::tables::MAX_CODE_LENGTH;
use crate::error::{Error, Result};
use std::io::Read;

/// Canonical Huffman decoder
///
/// Rebuilt from a code-length table alone. Lookup is keyed by
/// `(code_value, code_length)`: for each length the table keeps the first
/// canonical code, the index of its symbol in `symbols` and how many codes
/// share that length.
pub struct HuffmanDecoder {
    /// Maximum code length
    max_bits: u8,
    /// Per bit length: (first_code, first_symbol_index, count)
    bit_info: Vec<(u64, usize, usize)>,
    /// Symbols sorted by code length, then by symbol value
    symbols: Vec<u16>,
}

impl HuffmanDecoder {
    /// Build from a code-length table
    pub fn from_code_lengths(lengths: &[u8]) -> Result<Self> {
        let max_bits = lengths.iter().copied().max().unwrap_or(0);
        if max_bits > MAX_CODE_LENGTH {
            return Err(Error::InvalidCodeLength(max_bits));
        }

        // Kraft sum scaled by 2^64; anything above 2^64 cannot be prefix-free
        let kraft: u128 =
            lengths.iter().filter(|&&l| l > 0).map(|&l| 1u128 << (MAX_CODE_LENGTH - l)).sum();
        if kraft > 1u128 << MAX_CODE_LENGTH {
            return Err(Error::HuffmanOversubscribed);
        }

        let codes = canonical_codes(lengths);

        let mut symbols: Vec<u16> = (0..lengths.len())
            .filter(|&sym| lengths[sym] > 0)
            .map(|sym| sym as u16)
            .collect();
        symbols.sort_by_key(|&sym| (lengths[sym as usize], sym));

        let mut bit_info = vec![(0u64, 0usize, 0usize); max_bits as usize + 1];
        for (idx, &sym) in symbols.iter().enumerate() {
            let (code, len) = codes[sym as usize];
            let entry = &mut bit_info[len as usize];
            if entry.2 == 0 {
                *entry = (code, idx, 0);
            }
            entry.2 += 1;
        }

        Ok(Self { max_bits, bit_info, symbols })
    }

    /// Decode next symbol from bitstream
    ///
    /// Bits are pulled one at a time until the accumulated code matches.
    pub fn decode<R: Read>(&self, bits: &mut BitReader<R>) -> Result<u16> {
        if self.max_bits == 0 {
            return Err(Error::EmptyCodeTable);
        }

        let mut code = 0u64;
        for len in 1..=self.max_bits {
            code = (code << 1) | bits.read_bit()? as u64;
            let (first_code, first_idx, count) = self.bit_info[len as usize];

            if count > 0 && code >= first_code && code - first_code < count as u64 {
                let idx = first_idx + (code - first_code) as usize;
                return Ok(self.symbols[idx]);
            }
        }

        Err(Error::InvalidHuffmanCode)
    }

    /// Check if this decoder is empty (no symbols)
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Number of symbols with a code
    pub fn len(&self) -> usize {
        self.symbols.len()
    }
}

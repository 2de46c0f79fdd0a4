use super::rle::{rle_decode, rle_encode};
use super::tables::{DISTANCE_ALPHABET_SIZE, SYMBOL_ALPHABET_SIZE};
use crate::error::Result;
use log::trace;
use std::io::Read;

/// Code-length tables carried in the stream header
///
/// Serialized as the run-length coded symbol table (288 entries) followed by
/// the run-length coded distance table (32 entries).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeLengths {
    pub symbol_lengths: Vec<u8>,
    pub distance_lengths: Vec<u8>,
}

impl CodeLengths {
    pub fn new(symbol_lengths: Vec<u8>, distance_lengths: Vec<u8>) -> Self {
        debug_assert_eq!(symbol_lengths.len(), SYMBOL_ALPHABET_SIZE);
        debug_assert_eq!(distance_lengths.len(), DISTANCE_ALPHABET_SIZE);
        Self { symbol_lengths, distance_lengths }
    }

    /// Serialize both tables
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = rle_encode(&self.symbol_lengths);
        out.extend(rle_encode(&self.distance_lengths));
        out
    }

    /// Read both tables from the head of a stream
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let symbol_lengths = rle_decode(reader, SYMBOL_ALPHABET_SIZE)?;
        let distance_lengths = rle_decode(reader, DISTANCE_ALPHABET_SIZE)?;
        trace!(
            "header: {} symbol codes, {} distance codes",
            symbol_lengths.iter().filter(|&&l| l > 0).count(),
            distance_lengths.iter().filter(|&&l| l > 0).count()
        );
        Ok(Self { symbol_lengths, distance_lengths })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_header_roundtrip() {
        let mut symbol_lengths = vec![0u8; SYMBOL_ALPHABET_SIZE];
        symbol_lengths[b'x' as usize] = 1;
        symbol_lengths[256] = 2;
        symbol_lengths[257] = 2;
        let mut distance_lengths = vec![0u8; DISTANCE_ALPHABET_SIZE];
        distance_lengths[2] = 1;
        let header = CodeLengths::new(symbol_lengths, distance_lengths);

        let mut bytes = header.to_bytes();
        bytes.push(0x55);
        let mut input = bytes.as_slice();
        assert_eq!(CodeLengths::read(&mut input).unwrap(), header);
        assert_eq!(input, &[0x55]);
    }

    #[test]
    fn test_empty_stream_header() {
        let mut input: &[u8] = &[];
        assert!(matches!(
            CodeLengths::read(&mut input),
            Err(Error::MalformedHeader { expected: 288, found: 0 })
        ));
    }

    #[test]
    fn test_missing_distance_table() {
        let bytes = rle_encode(&[0u8; SYMBOL_ALPHABET_SIZE]);
        let mut input = bytes.as_slice();
        assert!(matches!(
            CodeLengths::read(&mut input),
            Err(Error::MalformedHeader { expected: 32, found: 0 })
        ));
    }
}

use super::header::CodeLengths;
use super::tables::END_OF_BLOCK;
use super::tokens::{length_extra_bits, Token};
use crate::bits::BitReader;
use crate::error::Result;
use crate::huffman::HuffmanDecoder;
use std::io::Read;

/// Parses a compressed stream back into its token sequence
pub struct TokenParser<R: Read> {
    bits: BitReader<R>,
    symbols: HuffmanDecoder,
    distances: HuffmanDecoder,
    /// Whether we've seen the end-of-block symbol
    finished: bool,
}

impl<R: Read> TokenParser<R> {
    /// Read the code-length header and prepare to decode the body
    pub fn new(mut reader: R) -> Result<Self> {
        let header = CodeLengths::read(&mut reader)?;
        let symbols = HuffmanDecoder::from_code_lengths(&header.symbol_lengths)?;
        let distances = HuffmanDecoder::from_code_lengths(&header.distance_lengths)?;
        Ok(Self { bits: BitReader::new(reader), symbols, distances, finished: false })
    }

    /// Decode the next token
    ///
    /// Returns `Token::EndOfBlock` once, then `None`.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        if self.finished {
            return Ok(None);
        }

        let sym = self.symbols.decode(&mut self.bits)?;
        let token = match sym {
            0..=255 => Token::Literal(sym as u8),
            END_OF_BLOCK => {
                self.finished = true;
                Token::EndOfBlock
            }
            _ => {
                let length = self.bits.read_bits(length_extra_bits(sym))?;
                let dist_sym = self.distances.decode(&mut self.bits)?;
                let distance = self.bits.read_bits(dist_sym as u8)?;
                Token::Match { length, distance }
            }
        };

        Ok(Some(token))
    }

    /// Decode every remaining token, up to and including end-of-block
    pub fn parse_all(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Whether the end-of-block symbol has been read
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Body bytes consumed so far
    pub fn bytes_read(&self) -> u64 {
        self.bits.bytes_read()
    }
}

pub mod batch;
pub mod bits;
pub mod codec;
pub mod deflate;
pub mod error;
pub mod huffman;
pub mod lzss;

pub use batch::{BatchDecoder, BatchEncoder};
pub use codec::{Decoder, Encoder};
pub use deflate::tables::{DEFAULT_WINDOW_SIZE, MAX_WINDOW_SIZE};
pub use deflate::tokens::Token;
pub use error::{Error, Result};

/// Configuration for encoding
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressConfig {
    /// How far back (in bytes) the matcher may look for a repeat
    pub window_size: usize,
}

impl CompressConfig {
    pub fn with_window_size(window_size: usize) -> Self {
        Self { window_size }
    }

    /// Window must be between 1 and [`MAX_WINDOW_SIZE`] bytes
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 || self.window_size > MAX_WINDOW_SIZE {
            return Err(Error::InvalidWindowSize(self.window_size));
        }
        Ok(())
    }
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self { window_size: DEFAULT_WINDOW_SIZE }
    }
}

/// Statistics from an encode or decode operation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompressStats {
    pub uncompressed_bytes: u64,
    pub compressed_bytes: u64,
    /// Size of the code-length header (encode only)
    pub header_bytes: u64,
    pub literals: u64,
    pub matches: u64,
    /// Bytes covered by back-references
    pub matched_bytes: u64,
}

impl CompressStats {
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut stats = Self::default();
        for token in tokens {
            stats.record(token);
        }
        stats
    }

    /// Count one token; end-of-block is ignored
    pub fn record(&mut self, token: &Token) {
        match *token {
            Token::Literal(_) => self.literals += 1,
            Token::Match { length, .. } => {
                self.matches += 1;
                self.matched_bytes += length as u64;
            }
            Token::EndOfBlock => {}
        }
    }

    /// Compressed size over uncompressed size (0.0 for empty input)
    pub fn ratio(&self) -> f64 {
        if self.uncompressed_bytes == 0 {
            0.0
        } else {
            self.compressed_bytes as f64 / self.uncompressed_bytes as f64
        }
    }
}

/// Compress `data` with the default window
pub fn encode(data: &[u8]) -> Result<Vec<u8>> {
    Encoder::default().encode(data)
}

/// Compress `data`, looking back at most `window_size` bytes for matches
pub fn encode_with_window(data: &[u8], window_size: usize) -> Result<Vec<u8>> {
    Encoder::new(CompressConfig::with_window_size(window_size)).encode(data)
}

/// Decompress a stream produced by [`encode`]
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    Decoder::new().decode(data)
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Header errors
    #[error("Malformed header: run-length table yields {found} entries, expected {expected}")]
    MalformedHeader { expected: usize, found: usize },

    #[error("Invalid Huffman code length: {0} (max 64)")]
    InvalidCodeLength(u8),

    #[error("Huffman code oversubscribed: more codes than possible for bit length")]
    HuffmanOversubscribed,

    // Body errors
    #[error("Symbol requested from an empty Huffman table")]
    EmptyCodeTable,

    #[error("Bit sequence does not match any Huffman code")]
    InvalidHuffmanCode,

    #[error("Compressed stream truncated before end-of-block")]
    TruncatedStream,

    #[error("Back-reference distance {distance} exceeds available output {available}")]
    InvalidBackReference { distance: usize, available: usize },

    #[error("Decoded output would exceed the {limit}-byte limit")]
    OutputLimitExceeded { limit: usize },

    // Configuration errors
    #[error("Invalid window size: {0} (must be between 1 and 2^30)")]
    InvalidWindowSize(usize),

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod decoder;
pub mod encoder;

pub use decoder::HuffmanDecoder;
pub use encoder::{FrequencyCounter, HuffmanEncoder, HuffmanTree};

pub mod decoder;
pub mod encoder;

pub use decoder::Decoder;
pub use encoder::Encoder;

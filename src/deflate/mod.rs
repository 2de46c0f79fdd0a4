pub mod header;
pub mod parser;
pub mod rle;
pub mod tables;
pub mod tokens;

pub use header::CodeLengths;
pub use parser::TokenParser;
pub use rle::{rle_decode, rle_encode};
pub use tokens::Token;

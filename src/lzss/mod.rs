pub mod matcher;
pub mod window;

pub use matcher::{find_tokens, Matcher};
pub use window::{expand_tokens, OutputWindow};

use crate::deflate::tokens::Token;
use crate::error::{Error, Result};

/// Decoded output that doubles as the back-reference history
///
/// Matches are resolved against everything produced so far, copying one
/// byte at a time so a distance shorter than the length repeats the most
/// recent bytes (`"ab"` + match(5, 2) = `"ababa"`).
#[derive(Clone, Debug)]
pub struct OutputWindow {
    output: Vec<u8>,
    /// Most bytes the window may hold
    limit: usize,
}

impl Default for OutputWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputWindow {
    pub fn new() -> Self {
        Self { output: Vec::new(), limit: usize::MAX }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { output: Vec::with_capacity(capacity), limit: usize::MAX }
    }

    /// Refuse any token that would grow the output past `limit` bytes
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self.output.shrink_to(limit);
        self
    }

    /// Add a single byte to the output
    #[inline]
    pub fn push_byte(&mut self, byte: u8) -> Result<()> {
        if self.output.len() >= self.limit {
            return Err(Error::OutputLimitExceeded { limit: self.limit });
        }
        self.output.push(byte);
        Ok(())
    }

    /// Copy `length` bytes starting `distance` bytes back
    ///
    /// Checked against the limit before any byte is copied.
    pub fn copy_match(&mut self, length: usize, distance: usize) -> Result<()> {
        let available = self.output.len();
        if distance == 0 || distance > available {
            return Err(Error::InvalidBackReference { distance, available });
        }
        if length > self.limit.saturating_sub(available) {
            return Err(Error::OutputLimitExceeded { limit: self.limit });
        }

        let mut src = available - distance;
        for _ in 0..length {
            let byte = self.output[src];
            self.output.push(byte);
            src += 1;
        }
        Ok(())
    }

    /// Apply one token; end-of-block is a no-op
    pub fn apply(&mut self, token: &Token) -> Result<()> {
        match *token {
            Token::Literal(byte) => self.push_byte(byte)?,
            Token::Match { length, distance } => {
                self.copy_match(length as usize, distance as usize)?
            }
            Token::EndOfBlock => {}
        }
        Ok(())
    }

    /// Get total bytes produced
    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.output
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.output
    }
}

/// Rebuild the original bytes from a token stream
pub fn expand_tokens(tokens: &[Token]) -> Result<Vec<u8>> {
    let size = tokens.iter().map(|t| t.uncompressed_size()).sum();
    let mut window = OutputWindow::with_capacity(size);
    for token in tokens {
        window.apply(token)?;
    }
    Ok(window.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_basic() {
        let mut window = OutputWindow::new();
        window.push_byte(b'A').unwrap();
        window.push_byte(b'B').unwrap();
        window.push_byte(b'C').unwrap();
        window.copy_match(3, 3).unwrap();
        assert_eq!(window.as_bytes(), b"ABCABC");
    }

    #[test]
    fn test_window_rle() {
        let mut window = OutputWindow::new();
        window.push_byte(b'A').unwrap();

        // distance=1, length=5 -> "AAAAA"
        window.copy_match(5, 1).unwrap();
        assert_eq!(window.as_bytes(), b"AAAAAA");
    }

    #[test]
    fn test_self_overlapping_copy() {
        let tokens = [
            Token::Literal(b'a'),
            Token::Literal(b'b'),
            Token::Match { length: 5, distance: 2 },
        ];
        assert_eq!(expand_tokens(&tokens).unwrap(), b"abababa");

        let mut window = OutputWindow::new();
        window.push_byte(b'a').unwrap();
        window.push_byte(b'b').unwrap();
        window.copy_match(5, 2).unwrap();
        assert_eq!(&window.as_bytes()[2..], b"ababa");
    }

    #[test]
    fn test_distance_beyond_output() {
        let mut window = OutputWindow::new();
        window.push_byte(b'x').unwrap();
        let err = window.copy_match(3, 2).unwrap_err();
        assert!(matches!(err, Error::InvalidBackReference { distance: 2, available: 1 }));
    }

    #[test]
    fn test_zero_distance() {
        let mut window = OutputWindow::new();
        window.push_byte(b'x').unwrap();
        assert!(window.copy_match(3, 0).is_err());
    }

    #[test]
    fn test_limit_rejects_oversized_match() {
        let mut window = OutputWindow::new().with_limit(10);
        window.push_byte(b'a').unwrap();
        window.copy_match(9, 1).unwrap();
        assert_eq!(window.len(), 10);

        let err = window.copy_match(1, 1).unwrap_err();
        assert!(matches!(err, Error::OutputLimitExceeded { limit: 10 }));
        assert!(matches!(window.push_byte(b'b'), Err(Error::OutputLimitExceeded { .. })));
        assert_eq!(window.len(), 10);
    }

    #[test]
    fn test_limit_checked_before_copying() {
        let mut window = OutputWindow::new().with_limit(1 << 20);
        window.push_byte(b'x').unwrap();
        assert!(window.copy_match(u32::MAX as usize, 1).is_err());
        assert_eq!(window.as_bytes(), b"x");
    }

    #[test]
    fn test_end_of_block_is_noop() {
        let tokens = [Token::Literal(b'z'), Token::EndOfBlock];
        assert_eq!(expand_tokens(&tokens).unwrap(), b"z");
    }
}

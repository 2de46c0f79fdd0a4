use super::tables::{bit_length, END_OF_BLOCK, MATCH_SYMBOL_BASE};

/// Represents a single token in the LZSS stream
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// A literal byte
    Literal(u8),
    /// A back-reference: copy `length` bytes from `distance` bytes back
    Match { length: u32, distance: u32 },
    /// End of block marker
    EndOfBlock,
}

impl Token {
    /// Returns the uncompressed size this token represents
    pub fn uncompressed_size(&self) -> usize {
        match self {
            Token::Literal(_) => 1,
            Token::Match { length, .. } => *length as usize,
            Token::EndOfBlock => 0,
        }
    }

    /// Symbol this token is entropy-coded as (0-287)
    ///
    /// Literals map to themselves, end-of-block to 256 and a match to
    /// `255 + bit_length(length)`.
    #[inline]
    pub fn symbol(&self) -> u16 {
        match self {
            Token::Literal(byte) => *byte as u16,
            Token::Match { length, .. } => MATCH_SYMBOL_BASE + bit_length(*length as u64) as u16,
            Token::EndOfBlock => END_OF_BLOCK,
        }
    }

    /// Distance symbol (`bit_length(distance)`), only for matches
    #[inline]
    pub fn distance_symbol(&self) -> Option<u16> {
        match self {
            Token::Match { distance, .. } => Some(bit_length(*distance as u64) as u16),
            _ => None,
        }
    }
}

/// Width of the length extra-bit field that follows a match symbol
#[inline]
pub fn length_extra_bits(symbol: u16) -> u8 {
    debug_assert!(symbol > END_OF_BLOCK);
    (symbol - MATCH_SYMBOL_BASE) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_symbols() {
        assert_eq!(Token::Literal(0).symbol(), 0);
        assert_eq!(Token::Literal(b'a').symbol(), 97);
        assert_eq!(Token::Literal(255).symbol(), 255);
        assert_eq!(Token::Literal(b'a').distance_symbol(), None);
    }

    #[test]
    fn test_end_of_block_symbol() {
        assert_eq!(Token::EndOfBlock.symbol(), 256);
        assert_eq!(Token::EndOfBlock.distance_symbol(), None);
        assert_eq!(Token::EndOfBlock.uncompressed_size(), 0);
    }

    #[test]
    fn test_match_symbols() {
        // length 3 -> 2 bits -> 257
        let m = Token::Match { length: 3, distance: 1 };
        assert_eq!(m.symbol(), 257);
        assert_eq!(m.distance_symbol(), Some(1));

        // length 4..=7 -> 3 bits -> 258
        let m = Token::Match { length: 7, distance: 8 };
        assert_eq!(m.symbol(), 258);
        assert_eq!(m.distance_symbol(), Some(4));
        assert_eq!(m.uncompressed_size(), 7);

        let m = Token::Match { length: 258, distance: 32768 };
        assert_eq!(m.symbol(), 264);
        assert_eq!(m.distance_symbol(), Some(16));
    }

    #[test]
    fn test_length_extra_bits_inverts_symbol() {
        for length in [3u32, 4, 7, 8, 100, 1000, 32767] {
            let sym = Token::Match { length, distance: 1 }.symbol();
            assert_eq!(length_extra_bits(sym), bit_length(length as u64));
        }
    }
}

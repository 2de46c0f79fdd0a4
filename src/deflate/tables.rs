/// Symbol alphabet: literals 0-255, end-of-block 256, match classes 257-287
pub const SYMBOL_ALPHABET_SIZE: usize = 288;

/// Distance alphabet: one symbol per distance bit-length
pub const DISTANCE_ALPHABET_SIZE: usize = 32;

/// End-of-block symbol
pub const END_OF_BLOCK: u16 = 256;

/// Match symbols are `MATCH_SYMBOL_BASE + bit_length(length)`
pub const MATCH_SYMBOL_BASE: u16 = 255;

/// Shortest back-reference the matcher will emit
pub const MIN_MATCH: usize = 3;

/// Default history window (2^15 bytes)
pub const DEFAULT_WINDOW_SIZE: usize = 1 << 15;

/// Largest accepted history window.
///
/// Keeps every distance symbol below 32 and every match symbol below 288.
pub const MAX_WINDOW_SIZE: usize = 1 << 30;

/// Longest code length the codec writes or accepts
pub const MAX_CODE_LENGTH: u8 = 64;

/// Number of bits in the minimal binary representation of `n`
///
/// `floor(log2(n)) + 1` for `n > 0`, and 0 for `n == 0`.
#[inline]
pub fn bit_length(n: u64) -> u8 {
    (u64::BITS - n.leading_zeros()) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_length() {
        assert_eq!(bit_length(0), 0);
        assert_eq!(bit_length(1), 1);
        assert_eq!(bit_length(2), 2);
        assert_eq!(bit_length(3), 2);
        assert_eq!(bit_length(4), 3);
        assert_eq!(bit_length(255), 8);
        assert_eq!(bit_length(256), 9);
        assert_eq!(bit_length(1 << 15), 16);
    }

    #[test]
    fn test_alphabets_cover_largest_window() {
        let max_distance = MAX_WINDOW_SIZE as u64;
        assert!((bit_length(max_distance) as usize) < DISTANCE_ALPHABET_SIZE);
        let max_symbol = MATCH_SYMBOL_BASE as usize + bit_length(max_distance) as usize;
        assert!(max_symbol < SYMBOL_ALPHABET_SIZE);
    }
}

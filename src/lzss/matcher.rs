//! Greedy LZSS match finder.
//!
//! The matcher walks the input one byte at a time, growing a candidate match
//! for as long as `candidate ‖ next byte` still occurs in the history window.
//! Searches return the occurrence nearest to the current position, which
//! keeps the token stream deterministic for a given window size.

use crate::deflate::tables::{DEFAULT_WINDOW_SIZE, MIN_MATCH};
use crate::deflate::tokens::Token;
use memchr::{memmem, memrchr};

/// A match under construction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Candidate {
    /// Input position of the source run (the anchor)
    anchor: usize,
    /// Input position where the matched run starts
    start: usize,
    /// Bytes matched so far
    len: usize,
}

/// Longest match a token can carry; `Token::Match` stores lengths as u32
const MAX_MATCH: usize = u32::MAX as usize;

/// Sliding-window match finder
#[derive(Clone, Debug)]
pub struct Matcher {
    window_size: usize,
    /// Candidates are cut into a match once they reach this length
    max_match: usize,
}

impl Matcher {
    /// Create a matcher with the given history window capacity
    pub fn new(window_size: usize) -> Self {
        debug_assert!(window_size > 0);
        Self { window_size, max_match: MAX_MATCH }
    }

    #[cfg(test)]
    fn with_max_match(window_size: usize, max_match: usize) -> Self {
        debug_assert!(max_match >= MIN_MATCH && max_match <= MAX_MATCH);
        Self { window_size, max_match }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Turn `data` into literal and match tokens
    ///
    /// The returned stream does not include an end-of-block token.
    pub fn find_tokens(&self, data: &[u8]) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(data.len() / 2 + 1);
        let mut candidate: Option<Candidate> = None;
        // First input position still inside the window
        let mut window_start = 0usize;

        for pos in 0..data.len() {
            let window = &data[window_start..pos];

            candidate = match candidate {
                Some(cand) if cand.len >= self.max_match => {
                    flush(&mut tokens, data, cand);
                    search_byte(&mut tokens, data, window, window_start, pos)
                }
                Some(cand) => {
                    // Occurrences of the longer needle are a subset of the
                    // shorter one's, so none can sit nearer than the anchor
                    let next = cand.anchor + cand.len;
                    if data[next] == data[pos] {
                        Some(Candidate { len: cand.len + 1, ..cand })
                    } else {
                        let needle = &data[cand.start..=pos];
                        match memmem::rfind(&data[window_start..next], needle) {
                            Some(idx) => Some(Candidate {
                                anchor: window_start + idx,
                                len: cand.len + 1,
                                ..cand
                            }),
                            None => {
                                flush(&mut tokens, data, cand);
                                search_byte(&mut tokens, data, window, window_start, pos)
                            }
                        }
                    }
                }
                None => search_byte(&mut tokens, data, window, window_start, pos),
            };

            // Append data[pos]; evict the oldest byte once over capacity
            window_start = (pos + 1).saturating_sub(self.window_size);
            if let Some(cand) = candidate {
                if cand.anchor < window_start {
                    flush(&mut tokens, data, cand);
                    candidate = None;
                }
            }
        }

        if let Some(cand) = candidate {
            flush(&mut tokens, data, cand);
        }

        tokens
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

/// Look for a single byte in the window, opening a candidate on a hit
fn search_byte(
    tokens: &mut Vec<Token>,
    data: &[u8],
    window: &[u8],
    window_start: usize,
    pos: usize,
) -> Option<Candidate> {
    match memrchr(data[pos], window) {
        Some(idx) => Some(Candidate { anchor: window_start + idx, start: pos, len: 1 }),
        None => {
            tokens.push(Token::Literal(data[pos]));
            None
        }
    }
}

/// Emit a finished candidate as a match, or as literals when too short
fn flush(tokens: &mut Vec<Token>, data: &[u8], cand: Candidate) {
    debug_assert!(cand.len <= MAX_MATCH);
    if cand.len >= MIN_MATCH {
        tokens.push(Token::Match {
            length: cand.len as u32,
            distance: (cand.start - cand.anchor) as u32,
        });
    } else {
        tokens.extend(data[cand.start..cand.start + cand.len].iter().map(|&b| Token::Literal(b)));
    }
}

/// Convenience wrapper: tokens for `data` with a window of `window_size`
pub fn find_tokens(data: &[u8], window_size: usize) -> Vec<Token> {
    Matcher::new(window_size).find_tokens(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lzss::window::expand_tokens;

    #[test]
    fn test_no_repeats_all_literals() {
        let tokens = find_tokens(b"abcdef", 1024);
        assert_eq!(tokens.len(), 6);
        assert!(tokens.iter().all(|t| matches!(t, Token::Literal(_))));
    }

    #[test]
    fn test_empty_input() {
        assert!(find_tokens(b"", 1024).is_empty());
    }

    #[test]
    fn test_repeat_becomes_match() {
        let tokens = find_tokens(b"abcabcabc", 1024);
        assert_eq!(
            tokens,
            vec![
                Token::Literal(b'a'),
                Token::Literal(b'b'),
                Token::Literal(b'c'),
                Token::Match { length: 6, distance: 3 },
            ]
        );
    }

    #[test]
    fn test_short_candidate_flushes_as_literals() {
        // "ab" repeats but only two bytes long
        let tokens = find_tokens(b"abxab", 1024);
        assert_eq!(tokens.len(), 5);
        assert!(tokens.iter().all(|t| matches!(t, Token::Literal(_))));
    }

    #[test]
    fn test_nearest_occurrence_wins() {
        // "abc" occurs at 0 and 4; the match must point at 4
        let tokens = find_tokens(b"abc-abc+abc", 1024);
        assert_eq!(tokens.last(), Some(&Token::Match { length: 3, distance: 4 }));
    }

    #[test]
    fn test_run_of_single_byte() {
        let tokens = find_tokens(b"aaaaaaaa", 1024);
        assert_eq!(tokens, vec![Token::Literal(b'a'), Token::Match { length: 7, distance: 1 }]);
    }

    #[test]
    fn test_long_run_is_cut_at_max_match() {
        let data = vec![0u8; 41];
        let tokens = Matcher::with_max_match(1024, 16).find_tokens(&data);
        assert_eq!(
            tokens,
            vec![
                Token::Literal(0),
                Token::Match { length: 16, distance: 1 },
                Token::Match { length: 16, distance: 1 },
                Token::Match { length: 8, distance: 1 },
            ]
        );
        assert_eq!(expand_tokens(&tokens).unwrap(), data);
    }

    #[test]
    fn test_max_match_cut_keeps_roundtrip() {
        let data: Vec<u8> = b"abcd".iter().cycle().take(500).copied().collect();
        for max_match in [3usize, 4, 7, 100] {
            let tokens = Matcher::with_max_match(64, max_match).find_tokens(&data);
            for token in &tokens {
                if let Token::Match { length, .. } = token {
                    assert!(*length as usize <= max_match);
                }
            }
            assert_eq!(expand_tokens(&tokens).unwrap(), data);
        }
    }

    #[test]
    fn test_window_eviction_forces_flush() {
        let data = b"test test golden retilou test";
        let wide = find_tokens(data, 50);
        let narrow = find_tokens(data, 5);
        assert_ne!(wide, narrow);
        assert!(wide.contains(&Token::Match { length: 5, distance: 5 }));
        assert!(narrow.iter().all(|t| match t {
            Token::Match { distance, .. } => *distance as usize <= 5,
            _ => true,
        }));
        assert_eq!(expand_tokens(&wide).unwrap(), data);
        assert_eq!(expand_tokens(&narrow).unwrap(), data);
    }

    #[test]
    fn test_distances_stay_inside_window() {
        let data: Vec<u8> = (0..4000u32).map(|i| b"abcdefgh"[(i * 7 % 8) as usize]).collect();
        for window in [1usize, 3, 16, 100, 4096] {
            let tokens = find_tokens(&data, window);
            for token in &tokens {
                if let Token::Match { length, distance } = token {
                    assert!(*length as usize >= MIN_MATCH);
                    assert!(*distance >= 1 && *distance as usize <= window);
                }
            }
            assert_eq!(expand_tokens(&tokens).unwrap(), data);
        }
    }

    #[test]
    fn test_tokens_cover_input() {
        let data = b"testing a testy tester in a tester network of testers";
        let tokens = find_tokens(data, 1 << 15);
        let total: usize = tokens.iter().map(|t| t.uncompressed_size()).sum();
        assert_eq!(total, data.len());
        assert!(tokens.iter().any(|t| matches!(t, Token::Match { .. })));
    }
}

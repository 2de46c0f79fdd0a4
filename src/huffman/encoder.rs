use crate::bits::BitWriter;
use crate::deflate::tables::{DISTANCE_ALPHABET_SIZE, MAX_CODE_LENGTH, SYMBOL_ALPHABET_SIZE};
use crate::deflate::tokens::Token;
use crate::error::{Error, Result};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Frequency counter for both alphabets of a token stream
#[derive(Clone, Debug)]
pub struct FrequencyCounter {
    /// Frequencies for literals (0-255), end-of-block (256) and match classes (257-287)
    pub symbol_freq: [u64; SYMBOL_ALPHABET_SIZE],
    /// Frequencies for distance classes (0-31)
    pub distance_freq: [u64; DISTANCE_ALPHABET_SIZE],
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self { symbol_freq: [0; SYMBOL_ALPHABET_SIZE], distance_freq: [0; DISTANCE_ALPHABET_SIZE] }
    }

    /// Count frequencies from tokens
    pub fn count_tokens(&mut self, tokens: &[Token]) {
        for token in tokens {
            self.symbol_freq[token.symbol() as usize] += 1;
            if let Some(dist_sym) = token.distance_symbol() {
                self.distance_freq[dist_sym as usize] += 1;
            }
        }
    }
}

impl Default for FrequencyCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
enum NodeKind {
    Leaf(u16),
    Internal { left: usize, right: usize },
}

#[derive(Clone, Debug)]
struct Node {
    weight: u64,
    kind: NodeKind,
}

/// Huffman tree over the symbols with non-zero frequency
///
/// Nodes live in an arena; the merge heap is keyed by `(weight, arena index)`
/// so equal weights merge in insertion order. The first node popped in a
/// merge becomes the left (`0`) child.
#[derive(Clone, Debug)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: Option<usize>,
    alphabet_size: usize,
}

impl HuffmanTree {
    /// Build the tree for a frequency table indexed by symbol
    pub fn build(frequencies: &[u64]) -> Self {
        let mut nodes = Vec::with_capacity(frequencies.len() * 2);
        let mut heap = BinaryHeap::with_capacity(frequencies.len());

        for (sym, &freq) in frequencies.iter().enumerate().filter(|&(_, &f)| f > 0) {
            heap.push(Reverse((freq, nodes.len())));
            nodes.push(Node { weight: freq, kind: NodeKind::Leaf(sym as u16) });
        }

        while heap.len() > 1 {
            let (Some(Reverse((w1, left))), Some(Reverse((w2, right)))) = (heap.pop(), heap.pop())
            else {
                break;
            };
            let weight = w1 + w2;
            heap.push(Reverse((weight, nodes.len())));
            nodes.push(Node { weight, kind: NodeKind::Internal { left, right } });
        }

        let root = heap.pop().map(|Reverse((_, idx))| idx);
        Self { nodes, root, alphabet_size: frequencies.len() }
    }

    /// Total weight at the root (0 for an empty tree)
    pub fn weight(&self) -> u64 {
        self.root.map(|r| self.nodes[r].weight).unwrap_or(0)
    }

    /// Walk the tree without recursion, yielding `(symbol, depth, path)` per leaf
    ///
    /// `path` holds the branch bits from the root, MSB-first. A lone leaf
    /// sits at depth 1 with path `0`.
    fn leaves(&self) -> Result<Vec<(u16, u8, u64)>> {
        let mut out = Vec::with_capacity(self.alphabet_size);
        let Some(root) = self.root else {
            return Ok(out);
        };

        let mut stack: Vec<(usize, usize, u64)> = vec![(root, 0, 0)];
        while let Some((idx, depth, path)) = stack.pop() {
            match self.nodes[idx].kind {
                NodeKind::Leaf(sym) => {
                    let depth = depth.max(1);
                    if depth > MAX_CODE_LENGTH as usize {
                        return Err(Error::Internal(format!(
                            "Huffman depth {} exceeds maximum code length {}",
                            depth, MAX_CODE_LENGTH
                        )));
                    }
                    out.push((sym, depth as u8, path));
                }
                NodeKind::Internal { left, right } => {
                    stack.push((right, depth + 1, (path << 1) | 1));
                    stack.push((left, depth + 1, path << 1));
                }
            }
        }

        Ok(out)
    }

    /// Code length per symbol (0 for absent symbols)
    pub fn code_lengths(&self) -> Result<Vec<u8>> {
        let mut lengths = vec![0u8; self.alphabet_size];
        for (sym, depth, _) in self.leaves()? {
            lengths[sym as usize] = depth;
        }
        Ok(lengths)
    }

    /// Codes read directly off the tree's branches as `(code, length)`
    ///
    /// These share their lengths with the canonical codes but not their bit
    /// patterns; the stream always uses [`canonical_codes`].
    pub fn path_codes(&self) -> Result<Vec<(u64, u8)>> {
        let mut codes = vec![(0u64, 0u8); self.alphabet_size];
        for (sym, depth, path) in self.leaves()? {
            codes[sym as usize] = (path, depth);
        }
        Ok(codes)
    }
}

/// Compute Huffman code lengths for the given frequencies.
///
/// Returns a vector of code lengths (0 for unused symbols). A table with a
/// single used symbol gives it length 1; an all-zero table yields all zeros.
pub fn compute_code_lengths(frequencies: &[u64]) -> Result<Vec<u8>> {
    HuffmanTree::build(frequencies).code_lengths()
}

/// Assign canonical codes from code lengths
///
/// Present symbols are ordered by `(length, symbol)`. The code counter starts
/// at 0, increments within a length and shifts left by the length delta when
/// the length grows. Absent symbols get `(0, 0)`.
pub fn canonical_codes(lengths: &[u8]) -> Vec<(u64, u8)> {
    let mut order: Vec<usize> = (0..lengths.len()).filter(|&s| lengths[s] > 0).collect();
    order.sort_by_key(|&s| (lengths[s], s));

    let mut codes = vec![(0u64, 0u8); lengths.len()];
    let mut code = 0u64;
    let mut prev_len: Option<u8> = None;

    for sym in order {
        let len = lengths[sym];
        if let Some(prev) = prev_len {
            code = code.wrapping_add(1) << (len - prev);
        }
        codes[sym] = (code, len);
        prev_len = Some(len);
    }

    codes
}

/// Canonical Huffman code for one alphabet
#[derive(Clone, Debug)]
pub struct HuffmanEncoder {
    code_lengths: Vec<u8>,
    codes: Vec<(u64, u8)>,
}

impl HuffmanEncoder {
    /// Build from a frequency table indexed by symbol
    pub fn from_frequencies(frequencies: &[u64]) -> Result<Self> {
        let code_lengths = compute_code_lengths(frequencies)?;
        Ok(Self::from_code_lengths(code_lengths))
    }

    /// Count a symbol stream and build its code
    pub fn from_symbols<I>(symbols: I, alphabet_size: usize) -> Result<Self>
    where
        I: IntoIterator<Item = u16>,
    {
        let mut frequencies = vec![0u64; alphabet_size];
        for sym in symbols {
            let slot = frequencies.get_mut(sym as usize).ok_or_else(|| {
                Error::Internal(format!("symbol {} outside alphabet of {}", sym, alphabet_size))
            })?;
            *slot += 1;
        }
        Self::from_frequencies(&frequencies)
    }

    /// Rebuild the canonical code from a code-length table
    pub fn from_code_lengths(code_lengths: Vec<u8>) -> Self {
        let codes = canonical_codes(&code_lengths);
        Self { code_lengths, codes }
    }

    pub fn code_lengths(&self) -> &[u8] {
        &self.code_lengths
    }

    /// `(code, length)` for a symbol; length 0 means the symbol is absent
    #[inline]
    pub fn code(&self, symbol: u16) -> (u64, u8) {
        self.codes[symbol as usize]
    }

    /// Write a symbol's code MSB-first
    pub fn write_symbol(&self, writer: &mut BitWriter, symbol: u16) -> Result<()> {
        match self.codes.get(symbol as usize) {
            Some(&(code, len)) if len > 0 => {
                writer.write_code(code, len);
                Ok(())
            }
            _ => Err(Error::Internal(format!("symbol {} has no code", symbol))),
        }
    }
}

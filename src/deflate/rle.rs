//! Run-length codec for the code-length tables in the stream header.
//!
//! A table is written as `(count, value)` byte pairs covering maximal runs of
//! equal values, each run capped at 255. There is no length prefix: the
//! reader knows how many entries the table holds and stops once it has them.

use crate::error::{Error, Result};
use std::io::{ErrorKind, Read};

/// Longest run a single pair can describe
const MAX_RUN: usize = 255;

/// Encode a table as `(count, value)` pairs
pub fn rle_encode(values: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(16);
    let mut i = 0;

    while i < values.len() {
        let value = values[i];
        let run = values[i..].iter().take(MAX_RUN).take_while(|&&v| v == value).count();
        out.push(run as u8);
        out.push(value);
        i += run;
    }

    out
}

/// Decode exactly `expected` entries from `(count, value)` pairs
///
/// Reads no further than the pair that completes the table. A pair that
/// overshoots `expected`, or input that ends first, is a malformed header.
pub fn rle_decode<R: Read>(reader: &mut R, expected: usize) -> Result<Vec<u8>> {
    let mut values = Vec::with_capacity(expected);

    while values.len() < expected {
        let mut pair = [0u8; 2];
        match reader.read_exact(&mut pair) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(Error::MalformedHeader { expected, found: values.len() });
            }
            Err(e) => return Err(Error::Io(e)),
        }

        let [count, value] = pair;
        let found = values.len() + count as usize;
        if found > expected {
            return Err(Error::MalformedHeader { expected, found });
        }
        values.resize(found, value);
    }

    Ok(values)
}

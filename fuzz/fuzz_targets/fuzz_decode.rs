#![no_main]

use defl::{Decoder, Error};
use libfuzzer_sys::fuzz_target;

/// Most bytes a single run may expand to
const MAX_EXPANDED: usize = 1 << 20;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must produce an error, never a panic
    let decoder = Decoder::with_max_output(MAX_EXPANDED);
    match decoder.decode(data) {
        Ok(output) => assert!(output.len() <= MAX_EXPANDED),
        Err(Error::OutputLimitExceeded { limit }) => assert_eq!(limit, MAX_EXPANDED),
        Err(_) => {}
    }
});

#![no_main]

use defl::{decode, encode_with_window};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First two bytes pick the window, the rest is the payload
    if data.len() < 2 {
        return;
    }

    let window = u16::from_le_bytes([data[0], data[1]]) as usize + 1;
    let payload = &data[2..];

    // Limit data size to avoid slowdowns
    let payload = if payload.len() > 64 * 1024 { &payload[..64 * 1024] } else { payload };

    let encoded = encode_with_window(payload, window).expect("encoding never fails");
    let decoded = decode(&encoded).expect("own output must decode");
    assert_eq!(decoded, payload, "Round-trip mismatch");
});

/// Bit-level writer for the compressed body
///
/// Bits are packed LSB-first: the first bit written becomes the least
/// significant bit of the next output byte. Complete bytes are drained as
/// soon as they fill, so at most 7 bits are ever pending.
pub struct BitWriter {
    /// Completed bytes
    output: Vec<u8>,
    /// Bits not yet drained into `output`, oldest in the low bits
    acc: u64,
    /// Valid bits in `acc` (0-7 between calls)
    acc_bits: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_capacity(65536)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { output: Vec::with_capacity(capacity), acc: 0, acc_bits: 0 }
    }

    /// Write the low `n` bits (0-64) of `value`, least-significant bit first
    pub fn write_bits(&mut self, value: u64, n: u8) {
        debug_assert!(n <= 64);

        // Keep each push at or below 32 bits so acc never overflows
        if n > 32 {
            self.push(value & 0xFFFF_FFFF, 32);
            self.push(value >> 32, n - 32);
        } else {
            self.push(value, n);
        }
    }

    #[inline]
    fn push(&mut self, value: u64, n: u8) {
        if n == 0 {
            return;
        }
        let mask = u64::MAX >> (64 - n);
        self.acc |= (value & mask) << self.acc_bits;
        self.acc_bits += n;

        while self.acc_bits >= 8 {
            self.output.push(self.acc as u8);
            self.acc >>= 8;
            self.acc_bits -= 8;
        }
    }

    /// Write a single bit
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.push(bit as u64, 1);
    }

    /// Write a Huffman code of `length` bits, most-significant bit first
    pub fn write_code(&mut self, code: u64, length: u8) {
        self.write_bits(reverse_bits(code, length), length);
    }

    /// Write raw bytes through the bit stream
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if self.acc_bits == 0 {
            self.output.extend_from_slice(bytes);
        } else {
            bytes.iter().for_each(|&b| self.push(b as u64, 8));
        }
    }

    /// Bits waiting for the current byte to fill (always 0-7)
    #[inline]
    pub fn pending_bits(&self) -> u8 {
        self.acc_bits
    }

    /// Zero-pad the last partial byte and return the output
    pub fn finish(mut self) -> Vec<u8> {
        if self.acc_bits > 0 {
            self.output.push(self.acc as u8);
        }
        self.output
    }

    /// Output length in bytes, counting a partial byte as one
    pub fn len(&self) -> usize {
        self.output.len() + usize::from(self.acc_bits > 0)
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty() && self.acc_bits == 0
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reverse the bottom `n` bits of `value`
fn reverse_bits(value: u64, n: u8) -> u64 {
    if n == 0 {
        0
    } else {
        value.reverse_bits() >> (64 - n)
    }
}

use crate::error::{Error, Result};
use std::io::{ErrorKind, Read};

/// Bit-level reader for the compressed body
///
/// Bytes are pulled from the underlying reader on demand and expanded
/// LSB-first, so the first bit handed out is the byte's least significant
/// bit. Huffman codes and extra-bit fields consume from the same buffer.
pub struct BitReader<R: Read> {
    reader: R,
    /// Buffer holding up to 64 bits
    buffer: u64,
    /// Number of valid bits in buffer (0-64)
    bits_available: u8,
    /// Total bytes read (for error reporting)
    bytes_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buffer: 0, bits_available: 0, bytes_read: 0 }
    }

    /// Top the buffer up to at least `n` bits
    ///
    /// Pulls as many whole bytes as fit in one read call; short reads loop
    /// until enough bits are present or the input ends.
    fn refill(&mut self, n: u8) -> Result<()> {
        debug_assert!(n <= 57);

        while self.bits_available < n {
            let room = ((64 - self.bits_available) / 8) as usize;
            let mut chunk = [0u8; 8];

            let got = match self.reader.read(&mut chunk[..room]) {
                Ok(0) => return Err(Error::TruncatedStream),
                Ok(got) => got,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            };

            for &byte in &chunk[..got] {
                self.buffer |= (byte as u64) << self.bits_available;
                self.bits_available += 8;
            }
            self.bytes_read += got as u64;
        }
        Ok(())
    }

    /// Read `n` bits (0-32) as an LSB-first integer
    pub fn read_bits(&mut self, n: u8) -> Result<u32> {
        debug_assert!(n <= 32);

        if n == 0 {
            return Ok(0);
        }
        self.refill(n)?;

        let value = self.buffer & (u64::MAX >> (64 - n));
        self.buffer >>= n;
        self.bits_available -= n;
        Ok(value as u32)
    }

    /// Read a single bit
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Bytes pulled from the underlying reader, including read-ahead
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

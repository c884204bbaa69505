//! BitReader: reads a packed bitstream one bit at a time, most significant bit first.
//!
//! NOTE: This module can read from any I/O source that supports the read() call. It pulls
//! exactly one byte from the source each time the buffered byte is used up, so wrap slow
//! sources in a BufReader.

use std::io::{ErrorKind, Read};

use crate::error::{HuffError, Result};

/// Reads a huffpack bitstream.
#[derive(Debug)]
pub struct BitReader<R> {
    /// The byte currently being read.
    current: u8,
    /// Bits of the current byte not yet handed out (0-7).
    bits_left: u8,
    source: R,
}

impl<R: Read> BitReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            current: 0,
            bits_left: 0,
            source,
        }
    }

    /// Pull the next byte from the source. Returns false if there is no more data.
    fn have_data(&mut self) -> Result<bool> {
        let mut byte = [0_u8; 1];
        loop {
            match self.source.read(&mut byte) {
                Ok(0) => return Ok(false),
                Ok(_) => {
                    self.current = byte[0];
                    self.bits_left = 8;
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Return the next bit (1 or 0), or None if there is no more data to read.
    pub fn read_bit(&mut self) -> Result<Option<u8>> {
        if self.bits_left == 0 && !self.have_data()? {
            return Ok(None);
        }
        self.bits_left -= 1;
        Ok(Some((self.current >> self.bits_left) & 1))
    }

    /// Return the next bit, treating the end of the data as an error.
    pub fn require_bit(&mut self) -> Result<u8> {
        self.read_bit()?.ok_or(HuffError::UnexpectedEndOfStream)
    }

    /// Return the next n bits (n <= 32) as an unsigned value, most significant bit first.
    pub fn read_bits(&mut self, n: u8) -> Result<u32> {
        let mut result = 0_u32;
        for _ in 0..n {
            result = (result << 1) | self.require_bit()? as u32;
        }
        Ok(result)
    }

    /// Give back the underlying source. Any bits left in the current byte are lost.
    pub fn into_inner(self) -> R {
        self.source
    }
}

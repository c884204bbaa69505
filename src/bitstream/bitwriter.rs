//! BitWriter: packs single bits into bytes, most significant bit first, and hands each
//! completed byte to the underlying sink.
//!
//! NOTE: Call finish() to pad the last partial byte and recover the sink. If the writer is
//! dropped instead (for example on an error path) it still pads and flushes, but any I/O error
//! at that point can only be logged.

use std::io::Write;
use std::mem::ManuallyDrop;
use std::ptr;

use log::warn;

use crate::error::{HuffError, Result};

/// Writes a bitstream to any sink that supports write().
pub struct BitWriter<W: Write> {
    /// Handle to the output stream.
    writer: W,
    /// Bits waiting to become a byte, aligned to the least significant end.
    queue: u8,
    /// Count of valid bits in the queue (0-7).
    q_bits: u8,
    /// Count of whole bytes handed to the sink so far.
    written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Create a new BitWriter over the sink.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            queue: 0,
            q_bits: 0,
            written: 0,
        }
    }

    /// Put one bit on the stream. Anything other than 0 or 1 is an error.
    pub fn write_bit(&mut self, bit: u8) -> Result<()> {
        if bit > 1 {
            return Err(HuffError::InvalidBit(bit));
        }
        self.queue = (self.queue << 1) | bit;
        self.q_bits += 1;
        if self.q_bits == 8 {
            self.push_queue()?;
        }
        Ok(())
    }

    /// Put the n least significant bits of value on the stream, most significant first.
    pub fn write_bits(&mut self, value: u32, n: u8) -> Result<()> {
        for shift in (0..n).rev() {
            self.write_bit(((value >> shift) & 1) as u8)?;
        }
        Ok(())
    }

    /// Put a slice of bits on the stream. Used for pre-computed huffman codes.
    pub fn write_code(&mut self, code: &[u8]) -> Result<()> {
        code.iter().try_for_each(|&bit| self.write_bit(bit))
    }

    /// Hand the packed byte to the sink and empty the queue.
    fn push_queue(&mut self) -> Result<()> {
        self.writer.write_all(&[self.queue])?;
        self.written += 1;
        self.queue = 0;
        self.q_bits = 0;
        Ok(())
    }

    /// Pads the remaining bits (1-7) with 0s in the least significant bits and writes them out.
    fn pad(&mut self) -> Result<()> {
        while self.q_bits != 0 {
            self.write_bit(0)?;
        }
        Ok(())
    }

    /// Number of bytes written to the sink so far, not counting a partial byte.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Pad the final byte, flush the sink and return it.
    pub fn finish(mut self) -> Result<W> {
        self.pad()?;
        self.writer.flush()?;
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped or touched again, so the sink is moved out once.
        Ok(unsafe { ptr::read(&this.writer) })
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        let result = self
            .pad()
            .and_then(|_| self.writer.flush().map_err(HuffError::from));
        if let Err(e) = result {
            warn!("BitWriter dropped without finish(); final flush failed: {}", e);
        }
    }
}

#[cfg(test)]
mod test {
    use super::BitWriter;
    use crate::error::HuffError;

    #[test]
    fn write_byte_test() {
        let mut bw = BitWriter::new(Vec::new());
        bw.write_bits('x' as u32, 8).unwrap();
        let out = bw.finish().unwrap();
        assert_eq!(out, "x".as_bytes());
    }

    #[test]
    fn padding_test() {
        let mut bw = BitWriter::new(Vec::new());
        bw.write_bits(0b1111_1111, 8).unwrap();
        bw.write_bits(0b101, 3).unwrap();
        assert_eq!(bw.bytes_written(), 1);
        let out = bw.finish().unwrap();
        assert_eq!(out, vec![0b1111_1111, 0b1010_0000]);
    }

    #[test]
    fn empty_finish_test() {
        let bw = BitWriter::new(Vec::new());
        assert!(bw.finish().unwrap().is_empty());
    }

    #[test]
    fn every_eighth_bit_writes_a_byte() {
        let mut out = Vec::new();
        {
            let mut bw = BitWriter::new(&mut out);
            for i in 0..16 {
                bw.write_bit((i % 2) as u8).unwrap();
                assert_eq!(bw.bytes_written(), (i as u64 + 1) / 8);
            }
            bw.finish().unwrap();
        }
        assert_eq!(out, vec![0b0101_0101, 0b0101_0101]);
    }

    #[test]
    fn invalid_bit_test() {
        let mut bw = BitWriter::new(Vec::new());
        assert!(matches!(bw.write_bit(2), Err(HuffError::InvalidBit(2))));
    }

    #[test]
    fn drop_pads_partial_byte() {
        let mut out = Vec::new();
        {
            let mut bw = BitWriter::new(&mut out);
            bw.write_bits(0b11, 2).unwrap();
        }
        assert_eq!(out, vec![0b1100_0000]);
    }

    #[test]
    fn finish_does_not_pad_twice() {
        let mut out = Vec::new();
        {
            let mut bw = BitWriter::new(&mut out);
            bw.write_bits(0b101, 3).unwrap();
            bw.finish().unwrap().push(0xff);
        }
        assert_eq!(out, vec![0b1010_0000, 0xff]);
    }
}

use std::io::{ErrorKind, Read};

use log::debug;

use crate::error::{HuffError, Result};
use crate::{EOF_SYMBOL, SYMBOL_LIMIT};

const READ_CHUNK: usize = 16_000;

/// Occurrence counts for every symbol of the alphabet, including the end-of-stream symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    freqs: Vec<u64>,
}

impl FrequencyTable {
    /// Create an all-zero table with room for symbol_limit symbols.
    pub fn new(symbol_limit: usize) -> Self {
        Self {
            freqs: vec![0; symbol_limit],
        }
    }

    /// Create a table from existing counts.
    pub fn from_counts(freqs: Vec<u64>) -> Self {
        Self { freqs }
    }

    /// Scan the source once and count every byte, then count the end-of-stream symbol once.
    pub fn from_reader<R: Read>(source: &mut R) -> Result<Self> {
        let mut table = Self::new(SYMBOL_LIMIT);
        let mut buf = vec![0_u8; READ_CHUNK];
        let mut total = 0_u64;
        loop {
            let size = match source.read(&mut buf) {
                Ok(0) => break,
                Ok(size) => size,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            buf[..size]
                .iter()
                .try_for_each(|&byte| table.increment(byte as usize))?;
            total += size as u64;
        }
        table.increment(EOF_SYMBOL as usize)?;
        debug!(
            "Counted {} input bytes, {} distinct symbols including end-of-stream.",
            total,
            table.freqs.iter().filter(|&&f| f > 0).count()
        );
        Ok(table)
    }

    /// Add one to the count for symbol. The table never grows.
    pub fn increment(&mut self, symbol: usize) -> Result<()> {
        let limit = self.freqs.len();
        let slot = self
            .freqs
            .get_mut(symbol)
            .ok_or(HuffError::SymbolOutOfRange { symbol, limit })?;
        *slot += 1;
        Ok(())
    }

    /// Number of symbol slots in the table.
    pub fn count(&self) -> usize {
        self.freqs.len()
    }

    pub fn get(&self, symbol: usize) -> u64 {
        self.freqs.get(symbol).copied().unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.freqs
    }
}

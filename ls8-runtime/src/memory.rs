//! Memory subsystem
//!
//! Flat byte-addressable memory shared by code, data and the stack. Every
//! access is bounds-checked against the configured capacity.

use crate::error::{Result, RuntimeError};
use ls8_spec::MEMORY_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    /// Zeroed memory of `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        Memory {
            data: vec![0; capacity],
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Read a byte (memory address register -> memory data register)
    #[inline]
    pub fn read(&self, address: usize) -> Result<u8> {
        self.data
            .get(address)
            .copied()
            .ok_or_else(|| self.out_of_bounds(address))
    }

    /// Write a byte
    #[inline]
    pub fn write(&mut self, address: usize, value: u8) -> Result<()> {
        let capacity = self.capacity();
        match self.data.get_mut(address) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(RuntimeError::OutOfBounds { address, capacity }),
        }
    }

    /// Read without failing; used for diagnostics only
    #[inline]
    pub fn peek(&self, address: usize) -> Option<u8> {
        self.data.get(address).copied()
    }

    /// Copy `bytes` into memory starting at `offset`.
    ///
    /// Nothing is written if the image does not fit.
    pub fn load(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        let end = offset
            .checked_add(bytes.len())
            .filter(|&end| end <= self.capacity())
            .ok_or_else(|| self.out_of_bounds(offset.saturating_add(bytes.len()).saturating_sub(1)))?;
        self.data[offset..end].copy_from_slice(bytes);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    fn out_of_bounds(&self, address: usize) -> RuntimeError {
        RuntimeError::OutOfBounds {
            address,
            capacity: self.capacity(),
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(MEMORY_SIZE)
    }
}

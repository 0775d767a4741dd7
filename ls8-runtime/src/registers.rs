//! General-purpose register file
//!
//! Registers are 8 bits wide. R7 holds the stack pointer; the machine has no
//! separate copy of it.

use std::ops::Index;

use crate::error::{Result, RuntimeError};
use ls8_spec::{Register, NUM_REGISTERS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFile {
    values: Vec<u8>,
}

impl RegisterFile {
    /// `count` zeroed registers
    pub fn new(count: usize) -> Self {
        Self {
            values: vec![0; count],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read a register by raw operand index
    #[inline]
    pub fn read(&self, index: u8) -> Result<u8> {
        self.values
            .get(index as usize)
            .copied()
            .ok_or(RuntimeError::RegisterOutOfBounds {
                index: index as usize,
                count: self.len(),
            })
    }

    /// Write a register by raw operand index
    #[inline]
    pub fn write(&mut self, index: u8, value: u8) -> Result<()> {
        let count = self.len();
        match self.values.get_mut(index as usize) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RuntimeError::RegisterOutOfBounds {
                index: index as usize,
                count,
            }),
        }
    }

    /// Named register write; every [`Register`] exists in a validated machine
    #[inline]
    pub(crate) fn set(&mut self, reg: Register, value: u8) {
        self.values[reg.index()] = value;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new(NUM_REGISTERS)
    }
}

impl Index<Register> for RegisterFile {
    type Output = u8;

    fn index(&self, reg: Register) -> &Self::Output {
        &self.values[reg.index()]
    }
}

//! # Architecture Configuration
//!
//! The LS-8 machine is fixed at 256 bytes of memory and 8 registers, but the
//! sizes are kept as explicit construction parameters so tests can build
//! smaller or differently-shaped machines.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::register::{NUM_REGISTERS, SP_INDEX};
use crate::{MAX_MEMORY_SIZE, MEMORY_SIZE, STACK_MODULUS, STACK_TOP};

/// Machine shape: memory capacity, register count and stack parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Config {
    /// Memory capacity in bytes (1-256)
    pub memory_size: usize,
    /// Number of general-purpose registers (at least 8, R7 is the stack pointer)
    pub num_registers: usize,
    /// Initial value of the stack pointer
    pub stack_top: u8,
    /// Modulus for stack pointer increment/decrement
    pub stack_modulus: u8,
}

impl Config {
    /// Default configuration
    /// - Memory: 256 bytes
    /// - Registers: 8
    /// - Stack top: 0xF3
    /// - Stack modulus: 255
    pub const DEFAULT: Self = Self {
        memory_size: MEMORY_SIZE,
        num_registers: NUM_REGISTERS,
        stack_top: STACK_TOP,
        stack_modulus: STACK_MODULUS,
    };

    /// Create a new configuration with validation
    pub const fn new(
        memory_size: usize,
        num_registers: usize,
        stack_top: u8,
        stack_modulus: u8,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            memory_size,
            num_registers,
            stack_top,
            stack_modulus,
        };

        match config.check() {
            Some(err) => Err(err),
            None => Ok(config),
        }
    }

    const fn check(&self) -> Option<ConfigError> {
        if self.memory_size == 0 || self.memory_size > MAX_MEMORY_SIZE {
            return Some(ConfigError::InvalidMemorySize {
                memory_size: self.memory_size,
            });
        }
        if self.num_registers <= SP_INDEX {
            return Some(ConfigError::TooFewRegisters {
                num_registers: self.num_registers,
            });
        }
        if self.stack_top as usize >= self.memory_size {
            return Some(ConfigError::StackTopOutOfRange {
                stack_top: self.stack_top,
                memory_size: self.memory_size,
            });
        }
        if self.stack_modulus == 0 || self.stack_modulus as usize > self.memory_size {
            return Some(ConfigError::InvalidStackModulus {
                stack_modulus: self.stack_modulus,
                memory_size: self.memory_size,
            });
        }
        None
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.check() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Index of the register holding the stack pointer
    #[inline]
    pub const fn stack_pointer_index(&self) -> usize {
        SP_INDEX
    }

    /// Stack pointer after a push: `(sp - 1) mod stack_modulus`
    #[inline]
    pub const fn stack_decrement(&self, sp: u8) -> u8 {
        ((sp as i16 - 1).rem_euclid(self.stack_modulus as i16)) as u8
    }

    /// Stack pointer after a pop: `(sp + 1) mod stack_modulus`
    #[inline]
    pub const fn stack_increment(&self, sp: u8) -> u8 {
        ((sp as u16 + 1) % self.stack_modulus as u16) as u8
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ memory: {} bytes, registers: {}, stack top: {:#04x}, stack modulus: {} }}",
            self.memory_size, self.num_registers, self.stack_top, self.stack_modulus,
        )
    }
}

/// Configuration error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Memory size must be in range [1, 256]
    InvalidMemorySize { memory_size: usize },
    /// The stack pointer register must exist
    TooFewRegisters { num_registers: usize },
    /// Stack top must be a valid address
    StackTopOutOfRange { stack_top: u8, memory_size: usize },
    /// Stack modulus must be non-zero and no larger than memory
    InvalidStackModulus { stack_modulus: u8, memory_size: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidMemorySize { memory_size } => {
                write!(f, "memory_size must be in range [1, {MAX_MEMORY_SIZE}], got {memory_size}")
            }
            ConfigError::TooFewRegisters { num_registers } => {
                write!(
                    f,
                    "num_registers must be greater than {SP_INDEX} (stack pointer lives in R{SP_INDEX}), got {num_registers}"
                )
            }
            ConfigError::StackTopOutOfRange {
                stack_top,
                memory_size,
            } => {
                write!(f, "stack_top {stack_top:#04x} is outside memory of {memory_size} bytes")
            }
            ConfigError::InvalidStackModulus {
                stack_modulus,
                memory_size,
            } => {
                write!(
                    f,
                    "stack_modulus must be in range [1, {memory_size}], got {stack_modulus}"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

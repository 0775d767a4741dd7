//! Runtime error types for the LS-8 machine

use ls8_spec::{ConfigError, SpecError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("ISA error: {0}")]
    SpecError(#[from] SpecError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Memory out of bounds: address {address:#x} (capacity {capacity})")]
    OutOfBounds { address: usize, capacity: usize },

    #[error("Register out of bounds: R{index} (register count {count})")]
    RegisterOutOfBounds { index: usize, count: usize },

    #[error("Unsupported ALU operation: {0}")]
    UnsupportedAluOperation(String),

    #[error("Unknown opcode {opcode:#010b} at PC {pc:#04x}")]
    UnknownOpcode { pc: usize, opcode: u8 },

    #[error("Image too large: {len} bytes, memory holds {capacity}")]
    ImageTooLarge { len: usize, capacity: usize },

    #[error("Execution failed at PC {pc:#04x} (opcode {opcode:#010b}): {source}")]
    Execution {
        pc: usize,
        opcode: u8,
        source: Box<RuntimeError>,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RuntimeError {
    /// Attach the PC and opcode of the instruction that failed
    pub fn at(self, pc: usize, opcode: u8) -> Self {
        match self {
            err @ RuntimeError::Execution { .. } => err,
            err => RuntimeError::Execution {
                pc,
                opcode,
                source: Box::new(err),
            },
        }
    }

    /// The underlying error, with any instruction context removed
    pub fn root(&self) -> &RuntimeError {
        match self {
            RuntimeError::Execution { source, .. } => source.root(),
            err => err,
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

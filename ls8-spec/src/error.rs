//! # Error Types for the LS-8 ISA

use crate::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Invalid opcode: {0:#010b}")]
    InvalidOpcode(u8),

    #[error("Invalid register index: {0} (valid range: 0-7)")]
    InvalidRegister(u8),

    #[error("Truncated instruction at {address:#04x}: expected {expected} operand byte(s), found {found}")]
    TruncatedInstruction {
        address: usize,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, SpecError>;

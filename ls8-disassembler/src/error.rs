//! Disassembler errors

use ls8_spec::SpecError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DisassemblerError {
    #[error("Unknown opcode {opcode:#010b} at {address:#04x}")]
    UnknownOpcode { address: usize, opcode: u8 },

    #[error("Invalid register operand R{register} at {address:#04x}")]
    InvalidRegister { address: usize, register: u8 },

    #[error("Truncated instruction at {address:#04x}: expected {expected} operand byte(s), found {found}")]
    Truncated {
        address: usize,
        expected: usize,
        found: usize,
    },

    #[error("Decode error at {address:#04x}: {source}")]
    Spec {
        address: usize,
        #[source]
        source: SpecError,
    },
}

impl DisassemblerError {
    pub(crate) fn from_spec(address: usize, err: SpecError) -> Self {
        match err {
            SpecError::InvalidOpcode(opcode) => DisassemblerError::UnknownOpcode { address, opcode },
            SpecError::InvalidRegister(register) => {
                DisassemblerError::InvalidRegister { address, register }
            }
            SpecError::TruncatedInstruction { expected, found, .. } => DisassemblerError::Truncated {
                address,
                expected,
                found,
            },
            source @ SpecError::InvalidConfig(_) => DisassemblerError::Spec { address, source },
        }
    }
}

pub type Result<T> = std::result::Result<T, DisassemblerError>;

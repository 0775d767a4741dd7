//! Assembler and image loader errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("Syntax error at line {line}, column {column}: {message}")]
    SyntaxError {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Unknown instruction at line {line}: {mnemonic}")]
    UnknownInstruction { line: usize, mnemonic: String },

    #[error("Invalid register at line {line}: {register}")]
    InvalidRegister { line: usize, register: String },

    #[error("Invalid immediate value at line {line}: {value}")]
    InvalidImmediate { line: usize, value: String },

    #[error("Undefined label at line {line}: {label}")]
    UndefinedLabel { line: usize, label: String },

    #[error("Duplicate label at line {line}: {label}")]
    DuplicateLabel { line: usize, label: String },

    #[error("Invalid directive at line {line}: .{directive}")]
    InvalidDirective { line: usize, directive: String },

    #[error("Program too large: {size} bytes (capacity {capacity})")]
    ProgramTooLarge { size: usize, capacity: usize },

    #[error("Malformed program line {line}: {token:?}")]
    MalformedProgramLine { line: usize, token: String },

    #[error("Image too large: {len} bytes (capacity {capacity})")]
    ImageTooLarge { len: usize, capacity: usize },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AssemblerError {
    /// 1-based source line the error refers to, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            AssemblerError::SyntaxError { line, .. }
            | AssemblerError::UnknownInstruction { line, .. }
            | AssemblerError::InvalidRegister { line, .. }
            | AssemblerError::InvalidImmediate { line, .. }
            | AssemblerError::UndefinedLabel { line, .. }
            | AssemblerError::DuplicateLabel { line, .. }
            | AssemblerError::InvalidDirective { line, .. }
            | AssemblerError::MalformedProgramLine { line, .. } => Some(*line),
            AssemblerError::ProgramTooLarge { .. }
            | AssemblerError::ImageTooLarge { .. }
            | AssemblerError::IoError(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AssemblerError>;

//! # LS-8 Specification
//!
//! 8-bit register machine with a 256-byte flat memory shared by code, data
//! and the call stack.
//!
//! ## Key Features
//! - 8 general-purpose 8-bit registers (R7 doubles as the stack pointer)
//! - 256 bytes of byte-addressable memory
//! - One-byte opcodes that carry their own operand count and a "sets PC" bit
//! - Three comparison flags (equal, less, greater) written only by `CMP`
//! - Downward-growing stack with modulo-255 pointer arithmetic

pub mod config;
pub mod encoding;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod register;

pub use config::{Config, ConfigError};
pub use encoding::Decoded;
pub use error::{Result, SpecError};
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use register::{Register, NUM_REGISTERS};

/// Default memory capacity in bytes
pub const MEMORY_SIZE: usize = 256;

/// Upper bound on memory capacity; addresses held in 8-bit registers cannot
/// reach past it
pub const MAX_MEMORY_SIZE: usize = 256;

/// Initial stack pointer (R7) value
pub const STACK_TOP: u8 = 0xF3;

/// Modulus applied to every stack pointer increment and decrement.
///
/// Deliberately one less than [`MEMORY_SIZE`]: address 0xFF is never reached
/// by stack pointer arithmetic.
pub const STACK_MODULUS: u8 = 255;

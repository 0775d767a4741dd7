//! # Execution Trace
//!
//! One row per executed cycle, captured before the instruction runs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::state::Flags;

/// Machine state at the start of a cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRow {
    /// Cycle number
    pub cycle: u64,

    /// Program counter
    pub pc: usize,

    /// Instruction byte and the two bytes after it (0 past the end of memory)
    pub ir: u8,
    pub operand_a: u8,
    pub operand_b: u8,

    /// Register values
    pub registers: Vec<u8>,

    /// Flags
    pub flags: Flags,
}

impl fmt::Display for TraceRow {
    /// `TRACE: PC | IR A B | R0 R1 ...`, all two-digit hex
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TRACE: {:02X} | {:02X} {:02X} {:02X} |",
            self.pc, self.ir, self.operand_a, self.operand_b
        )?;
        for value in &self.registers {
            write!(f, " {value:02X}")?;
        }
        Ok(())
    }
}

//! Arithmetic/logic unit
//!
//! Registers are 8 bits wide, so `ADD` and `MUL` wrap modulo 256. `CMP`
//! only touches the flags.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, RuntimeError};
use crate::registers::RegisterFile;
use crate::state::Flags;
use ls8_spec::Opcode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Mul,
    Cmp,
}

impl AluOp {
    pub fn name(self) -> &'static str {
        match self {
            AluOp::Add => "ADD",
            AluOp::Mul => "MUL",
            AluOp::Cmp => "CMP",
        }
    }
}

impl FromStr for AluOp {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ADD" => Ok(AluOp::Add),
            "MUL" => Ok(AluOp::Mul),
            "CMP" => Ok(AluOp::Cmp),
            _ => Err(RuntimeError::UnsupportedAluOperation(s.to_string())),
        }
    }
}

impl TryFrom<Opcode> for AluOp {
    type Error = RuntimeError;

    fn try_from(opcode: Opcode) -> Result<Self> {
        match opcode {
            Opcode::Add => Ok(AluOp::Add),
            Opcode::Mul => Ok(AluOp::Mul),
            Opcode::Cmp => Ok(AluOp::Cmp),
            other => Err(RuntimeError::UnsupportedAluOperation(
                other.mnemonic().to_string(),
            )),
        }
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Apply `op` to registers `reg_a` and `reg_b`
pub fn alu(
    op: AluOp,
    registers: &mut RegisterFile,
    flags: &mut Flags,
    reg_a: u8,
    reg_b: u8,
) -> Result<()> {
    let a = registers.read(reg_a)?;
    let b = registers.read(reg_b)?;

    match op {
        AluOp::Add => registers.write(reg_a, a.wrapping_add(b)),
        AluOp::Mul => registers.write(reg_a, a.wrapping_mul(b)),
        AluOp::Cmp => {
            *flags = Flags::from_ordering(a.cmp(&b));
            Ok(())
        }
    }
}

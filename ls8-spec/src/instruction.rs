//! LS-8 Instruction Set
//!
//! Typed view of an instruction: opcode plus validated operands.
//!
//! ## Instruction Formats
//! - 0 operands: `[opcode]` (HLT, RET)
//! - 1 operand:  `[opcode][reg]` (PRN, PUSH, POP, CALL, JMP, JEQ, JNE)
//! - 2 operands: `[opcode][reg][imm]` (LDI) or `[opcode][regA][regB]` (ADD, MUL, CMP)

use crate::error::{Result, SpecError};
use crate::opcode::Opcode;
use crate::register::Register;
use serde::{Deserialize, Serialize};
use std::fmt;

/// LS-8 Instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    // ========== System ==========
    /// HLT: stop execution
    Hlt,

    // ========== Data ==========
    /// LDI: reg = imm
    Ldi { reg: Register, imm: u8 },

    /// PRN: emit reg as a decimal line
    Prn { reg: Register },

    // ========== ALU ==========
    /// MUL: ra = ra * rb (wrapping)
    Mul { ra: Register, rb: Register },

    /// ADD: ra = ra + rb (wrapping)
    Add { ra: Register, rb: Register },

    /// CMP: compare ra with rb, set E/L/G
    Cmp { ra: Register, rb: Register },

    // ========== Stack ==========
    /// PUSH: sp = (sp - 1) mod 255; mem[sp] = reg
    Push { reg: Register },

    /// POP: reg = mem[sp]; sp = (sp + 1) mod 255
    Pop { reg: Register },

    // ========== Control ==========
    /// CALL: push PC + 2; PC = reg
    Call { reg: Register },

    /// RET: PC = pop
    Ret,

    /// JMP: PC = reg
    Jmp { reg: Register },

    /// JEQ: if E then PC = reg else PC += 2
    Jeq { reg: Register },

    /// JNE: if !E then PC = reg else PC += 2
    Jne { reg: Register },
}

impl Instruction {
    /// Build an instruction from an opcode and its raw operand bytes.
    ///
    /// Register operands are validated; unused operands are ignored.
    pub fn from_parts(opcode: Opcode, a: u8, b: u8) -> Result<Self> {
        let reg = |index: u8| Register::try_from(index);

        Ok(match opcode {
            Opcode::Hlt => Instruction::Hlt,
            Opcode::Ldi => Instruction::Ldi { reg: reg(a)?, imm: b },
            Opcode::Prn => Instruction::Prn { reg: reg(a)? },
            Opcode::Mul => Instruction::Mul { ra: reg(a)?, rb: reg(b)? },
            Opcode::Add => Instruction::Add { ra: reg(a)?, rb: reg(b)? },
            Opcode::Cmp => Instruction::Cmp { ra: reg(a)?, rb: reg(b)? },
            Opcode::Push => Instruction::Push { reg: reg(a)? },
            Opcode::Pop => Instruction::Pop { reg: reg(a)? },
            Opcode::Call => Instruction::Call { reg: reg(a)? },
            Opcode::Ret => Instruction::Ret,
            Opcode::Jmp => Instruction::Jmp { reg: reg(a)? },
            Opcode::Jeq => Instruction::Jeq { reg: reg(a)? },
            Opcode::Jne => Instruction::Jne { reg: reg(a)? },
        })
    }

    /// Decode the instruction starting at `bytes[0]`.
    ///
    /// `address` is only used for error reporting.
    pub fn decode(bytes: &[u8], address: usize) -> Result<Self> {
        let ir = *bytes.first().ok_or(SpecError::TruncatedInstruction {
            address,
            expected: 1,
            found: 0,
        })?;
        let opcode = Opcode::try_from(ir)?;
        let needed = opcode.operand_count() as usize;
        let operands = &bytes[1..];
        if operands.len() < needed {
            return Err(SpecError::TruncatedInstruction {
                address,
                expected: needed,
                found: operands.len(),
            });
        }

        let a = operands.first().copied().unwrap_or(0);
        let b = if needed > 1 { operands[1] } else { 0 };
        Self::from_parts(opcode, a, b)
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Hlt => Opcode::Hlt,
            Instruction::Ldi { .. } => Opcode::Ldi,
            Instruction::Prn { .. } => Opcode::Prn,
            Instruction::Mul { .. } => Opcode::Mul,
            Instruction::Add { .. } => Opcode::Add,
            Instruction::Cmp { .. } => Opcode::Cmp,
            Instruction::Push { .. } => Opcode::Push,
            Instruction::Pop { .. } => Opcode::Pop,
            Instruction::Call { .. } => Opcode::Call,
            Instruction::Ret => Opcode::Ret,
            Instruction::Jmp { .. } => Opcode::Jmp,
            Instruction::Jeq { .. } => Opcode::Jeq,
            Instruction::Jne { .. } => Opcode::Jne,
        }
    }

    /// Operand bytes in encoding order
    pub fn operands(&self) -> Vec<u8> {
        match *self {
            Instruction::Hlt | Instruction::Ret => vec![],
            Instruction::Ldi { reg, imm } => vec![reg.to_u8(), imm],
            Instruction::Mul { ra, rb } | Instruction::Add { ra, rb } | Instruction::Cmp { ra, rb } => {
                vec![ra.to_u8(), rb.to_u8()]
            }
            Instruction::Prn { reg }
            | Instruction::Push { reg }
            | Instruction::Pop { reg }
            | Instruction::Call { reg }
            | Instruction::Jmp { reg }
            | Instruction::Jeq { reg }
            | Instruction::Jne { reg } => vec![reg.to_u8()],
        }
    }

    /// Encoded length in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.opcode().operand_count() as usize + 1
    }
}

/// Assembly form, e.g. `LDI R0, 8` or `CMP R0, R1`
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.opcode().mnemonic();
        match *self {
            Instruction::Hlt | Instruction::Ret => write!(f, "{mnemonic}"),
            Instruction::Ldi { reg, imm } => write!(f, "{mnemonic} {reg}, {imm}"),
            Instruction::Mul { ra, rb } | Instruction::Add { ra, rb } | Instruction::Cmp { ra, rb } => {
                write!(f, "{mnemonic} {ra}, {rb}")
            }
            Instruction::Prn { reg }
            | Instruction::Push { reg }
            | Instruction::Pop { reg }
            | Instruction::Call { reg }
            | Instruction::Jmp { reg }
            | Instruction::Jeq { reg }
            | Instruction::Jne { reg } => write!(f, "{mnemonic} {reg}"),
        }
    }
}

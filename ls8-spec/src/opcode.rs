//! # LS-8 Opcode Definitions
//!
//! Opcodes are one byte and self-describing: the top two bits hold the
//! operand count, bit 5 marks ALU operations and bit 4 marks instructions
//! that set the program counter themselves (see [`crate::encoding`]).
//!
//! | Family  | Opcodes                  |
//! |---------|--------------------------|
//! | System  | HLT                      |
//! | Data    | LDI, PRN                 |
//! | ALU     | ADD, MUL, CMP            |
//! | Stack   | PUSH, POP                |
//! | Control | CALL, RET, JMP, JEQ, JNE |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::encoding::{extract_alu, extract_operand_count, extract_sets_pc};

/// Instruction opcode
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// HLT: stop the machine
    Hlt = 0b0000_0001,
    /// LDI: reg = imm
    Ldi = 0b1000_0010,
    /// PRN: print reg
    Prn = 0b0100_0111,
    /// MUL: regA = regA * regB
    Mul = 0b1010_0010,
    /// ADD: regA = regA + regB
    Add = 0b1010_0000,
    /// PUSH: sp -= 1; mem[sp] = reg
    Push = 0b0100_0101,
    /// POP: reg = mem[sp]; sp += 1
    Pop = 0b0100_0110,
    /// CALL: push return address; PC = reg
    Call = 0b0101_0000,
    /// RET: PC = pop
    Ret = 0b0001_0001,
    /// JMP: PC = reg
    Jmp = 0b0101_0100,
    /// CMP: set E/L/G from regA vs regB
    Cmp = 0b1010_0111,
    /// JEQ: if E then PC = reg
    Jeq = 0b0101_0101,
    /// JNE: if !E then PC = reg
    Jne = 0b0101_0110,
}

impl Opcode {
    /// Number of defined opcodes
    pub const COUNT: usize = 13;

    /// All opcodes, in dispatch-table order
    pub const ALL: [Opcode; Self::COUNT] = [
        Opcode::Hlt,
        Opcode::Ldi,
        Opcode::Prn,
        Opcode::Mul,
        Opcode::Add,
        Opcode::Push,
        Opcode::Pop,
        Opcode::Call,
        Opcode::Ret,
        Opcode::Jmp,
        Opcode::Cmp,
        Opcode::Jeq,
        Opcode::Jne,
    ];

    /// Try to convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0b0000_0001 => Some(Opcode::Hlt),
            0b1000_0010 => Some(Opcode::Ldi),
            0b0100_0111 => Some(Opcode::Prn),
            0b1010_0010 => Some(Opcode::Mul),
            0b1010_0000 => Some(Opcode::Add),
            0b0100_0101 => Some(Opcode::Push),
            0b0100_0110 => Some(Opcode::Pop),
            0b0101_0000 => Some(Opcode::Call),
            0b0001_0001 => Some(Opcode::Ret),
            0b0101_0100 => Some(Opcode::Jmp),
            0b1010_0111 => Some(Opcode::Cmp),
            0b0101_0101 => Some(Opcode::Jeq),
            0b0101_0110 => Some(Opcode::Jne),
            _ => None,
        }
    }

    /// Convert to u8
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Dense index into [`Opcode::ALL`], used to address dispatch tables
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Opcode::Hlt => 0,
            Opcode::Ldi => 1,
            Opcode::Prn => 2,
            Opcode::Mul => 3,
            Opcode::Add => 4,
            Opcode::Push => 5,
            Opcode::Pop => 6,
            Opcode::Call => 7,
            Opcode::Ret => 8,
            Opcode::Jmp => 9,
            Opcode::Cmp => 10,
            Opcode::Jeq => 11,
            Opcode::Jne => 12,
        }
    }

    /// Operand bytes following the opcode
    #[inline]
    pub const fn operand_count(self) -> u8 {
        extract_operand_count(self.to_u8())
    }

    /// Whether the instruction positions the PC itself
    #[inline]
    pub const fn sets_pc(self) -> bool {
        extract_sets_pc(self.to_u8())
    }

    /// Check if this is an ALU opcode
    #[inline]
    pub const fn is_alu(self) -> bool {
        extract_alu(self.to_u8())
    }

    /// Check if this is a control-flow opcode
    #[inline]
    pub const fn is_control_flow(self) -> bool {
        matches!(
            self,
            Opcode::Call | Opcode::Ret | Opcode::Jmp | Opcode::Jeq | Opcode::Jne
        )
    }

    /// Assembly mnemonic
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Hlt => "HLT",
            Opcode::Ldi => "LDI",
            Opcode::Prn => "PRN",
            Opcode::Mul => "MUL",
            Opcode::Add => "ADD",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Call => "CALL",
            Opcode::Ret => "RET",
            Opcode::Jmp => "JMP",
            Opcode::Cmp => "CMP",
            Opcode::Jeq => "JEQ",
            Opcode::Jne => "JNE",
        }
    }

    /// Look up an opcode by mnemonic (case-insensitive)
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(mnemonic))
    }
}

impl TryFrom<u8> for Opcode {
    type Error = crate::SpecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(crate::SpecError::InvalidOpcode(value))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

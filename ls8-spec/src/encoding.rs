//! # Instruction Encoding Constants and Helpers
//!
//! Every LS-8 instruction starts with a one-byte opcode laid out as
//!
//! ```text
//! [operands:2][alu:1][sets_pc:1][id:4]
//!   bit 7-6     bit 5   bit 4    bit 3-0
//! ```
//!
//! followed by `operands` one-byte operands.

// ============================================================================
// Bit Position Constants
// ============================================================================

/// Operand count field: bits 6-7
pub const OPERAND_COUNT_SHIFT: u8 = 6;

/// ALU flag: bit 5
pub const ALU_SHIFT: u8 = 5;

/// "Sets PC" flag: bit 4
pub const SETS_PC_SHIFT: u8 = 4;

// ============================================================================
// Field Masks
// ============================================================================

/// Operand count mask (2 bits, after shifting)
pub const OPERAND_COUNT_MASK: u8 = 0b11;

/// Single-bit flag mask (after shifting)
pub const FLAG_MASK: u8 = 0b1;

/// Instruction identifier mask (bits 0-3)
pub const ID_MASK: u8 = 0b1111;

/// Largest operand count an opcode byte can declare
pub const MAX_OPERANDS: u8 = 2;

// ============================================================================
// Field Extraction Functions
// ============================================================================

/// Number of operand bytes following the opcode
#[inline]
pub const fn extract_operand_count(ir: u8) -> u8 {
    (ir >> OPERAND_COUNT_SHIFT) & OPERAND_COUNT_MASK
}

/// Whether the instruction is an ALU operation
#[inline]
pub const fn extract_alu(ir: u8) -> bool {
    (ir >> ALU_SHIFT) & FLAG_MASK == 1
}

/// Whether the instruction positions the program counter itself
#[inline]
pub const fn extract_sets_pc(ir: u8) -> bool {
    (ir >> SETS_PC_SHIFT) & FLAG_MASK == 1
}

/// Instruction identifier (low nibble)
#[inline]
pub const fn extract_id(ir: u8) -> u8 {
    ir & ID_MASK
}

/// Build an opcode byte from its fields
#[inline]
pub const fn encode_opcode(operand_count: u8, alu: bool, sets_pc: bool, id: u8) -> u8 {
    ((operand_count & OPERAND_COUNT_MASK) << OPERAND_COUNT_SHIFT)
        | ((alu as u8) << ALU_SHIFT)
        | ((sets_pc as u8) << SETS_PC_SHIFT)
        | (id & ID_MASK)
}

/// Opcode byte split into the fields the engine needs each cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decoded {
    /// Raw instruction byte
    pub ir: u8,
    /// Number of operand bytes (0-3; only 0-2 are used by defined opcodes)
    pub operand_count: u8,
    /// Instruction repositions the PC itself
    pub sets_pc: bool,
}

impl Decoded {
    #[inline]
    pub const fn new(ir: u8) -> Self {
        Self {
            ir,
            operand_count: extract_operand_count(ir),
            sets_pc: extract_sets_pc(ir),
        }
    }

    /// Total instruction length in bytes (opcode plus operands)
    #[inline]
    pub const fn len(&self) -> usize {
        self.operand_count as usize + 1
    }
}

//! Instruction decoder

use crate::error::{DisassemblerError, Result};
use ls8_spec::Instruction;

/// Decode the instruction starting at `bytes[address]`
pub fn decode(bytes: &[u8], address: usize) -> Result<Instruction> {
    let tail = bytes.get(address..).unwrap_or(&[]);
    Instruction::decode(tail, address).map_err(|e| DisassemblerError::from_spec(address, e))
}

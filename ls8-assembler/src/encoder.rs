//! Instruction encoder

use ls8_spec::Instruction;

/// Encode an instruction as its opcode byte followed by its operands
pub fn encode(instr: &Instruction) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(instr.len());
    encode_into(instr, &mut bytes);
    bytes
}

/// Append the encoding of `instr` to `out`
pub fn encode_into(instr: &Instruction, out: &mut Vec<u8>) {
    out.push(instr.opcode().to_u8());
    out.extend(instr.operands());
}

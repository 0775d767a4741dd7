//! Main disassembler logic

use crate::decoder::decode;
use crate::error::DisassemblerError;
use crate::formatter::{format, format_bytes, format_data};
use ls8_spec::Instruction;

/// One listing entry: an instruction, or a single byte that did not decode
#[derive(Debug, Clone, PartialEq)]
pub struct ListingLine {
    pub address: usize,
    pub bytes: Vec<u8>,
    pub decoded: Result<Instruction, DisassemblerError>,
}

impl ListingLine {
    /// Assembly text for this entry
    pub fn text(&self) -> String {
        match &self.decoded {
            Ok(instr) => format(instr),
            Err(_) => format_data(self.bytes[0]),
        }
    }
}

/// Walk `bytes` from address 0, decoding an instruction wherever possible
pub fn listing(bytes: &[u8]) -> Vec<ListingLine> {
    let mut lines = Vec::new();
    let mut addr = 0;

    while addr < bytes.len() {
        let decoded = decode(bytes, addr);
        let len = decoded.as_ref().map_or(1, Instruction::len);
        lines.push(ListingLine {
            address: addr,
            bytes: bytes[addr..addr + len].to_vec(),
            decoded,
        });
        addr += len;
    }
    lines
}

/// Disassemble an image into an annotated listing
pub fn disassemble(bytes: &[u8]) -> String {
    let lines = listing(bytes);
    let instructions = lines.iter().filter(|l| l.decoded.is_ok()).count();

    let mut output = String::new();
    output.push_str("; LS-8 Disassembly\n");
    output.push_str(&format!(
        "; Size: {} bytes ({} instructions)\n\n",
        bytes.len(),
        instructions
    ));

    for line in &lines {
        output.push_str(&format!(
            "0x{:02X}:  {:<8}  {}",
            line.address,
            format_bytes(&line.bytes),
            line.text()
        ));
        if let Err(e) = &line.decoded {
            output.push_str(&format!("  ; {e}"));
        }
        output.push('\n');
    }
    output
}

/// Disassemble into plain source text that assembles back to `bytes`
pub fn to_assembly(bytes: &[u8]) -> String {
    listing(bytes)
        .iter()
        .map(|line| line.text() + "\n")
        .collect()
}

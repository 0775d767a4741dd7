//! Instruction formatting to assembly text

use ls8_spec::Instruction;

/// Format instruction as assembly text, e.g. `LDI R0, 8`
pub fn format(instr: &Instruction) -> String {
    instr.to_string()
}

/// Space-separated uppercase hex, e.g. `82 00 08`
pub fn format_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `.byte` line for data that does not decode
pub fn format_data(byte: u8) -> String {
    format!(".byte {byte:#04x}")
}

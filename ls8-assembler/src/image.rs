//! Program image text format
//!
//! One byte per line, written as eight binary digits. Anything after `#` is
//! a comment, and lines whose remaining text does not start
//! with `0` or `1` (blank lines, comments, labels) contribute nothing.
//!
//! ```text
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! 00000001 # HLT
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{AssemblerError, Result};
use ls8_spec::{Instruction, MEMORY_SIZE};

const DIGITS: usize = 8;

/// Parse image text into bytes
pub fn load_image(source: &str) -> Result<Vec<u8>> {
    let mut image = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let code = raw.split_once('#').map_or(raw, |(code, _)| code);
        if !code.starts_with(|c: char| c == '0' || c == '1') {
            continue;
        }

        let value = code
            .as_bytes()
            .get(..DIGITS)
            .filter(|digits| digits.iter().all(|&b| b == b'0' || b == b'1'))
            .map(|digits| digits.iter().fold(0u8, |acc, b| (acc << 1) | (b - b'0')))
            .ok_or_else(|| AssemblerError::MalformedProgramLine {
                line: index + 1,
                token: code.trim_end().to_string(),
            })?;
        image.push(value);
    }

    if image.len() > MEMORY_SIZE {
        return Err(AssemblerError::ImageTooLarge {
            len: image.len(),
            capacity: MEMORY_SIZE,
        });
    }
    Ok(image)
}

/// Read and parse an image file
pub fn load_image_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    let image = load_image(&source)?;
    debug!(path = %path.display(), bytes = image.len(), "loaded image file");
    Ok(image)
}

/// Render bytes in image format, annotating each decodable instruction
pub fn to_image_text(bytes: &[u8]) -> String {
    let mut out = String::new();
    let mut addr = 0;

    while addr < bytes.len() {
        match Instruction::decode(&bytes[addr..], addr) {
            Ok(instr) => {
                out.push_str(&format!("{:08b} # {instr}\n", bytes[addr]));
                for byte in &bytes[addr + 1..addr + instr.len()] {
                    out.push_str(&format!("{byte:08b}\n"));
                }
                addr += instr.len();
            }
            Err(_) => {
                out.push_str(&format!("{:08b}\n", bytes[addr]));
                addr += 1;
            }
        }
    }
    out
}

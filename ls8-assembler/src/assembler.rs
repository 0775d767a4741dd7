//! Main assembler logic

use tracing::debug;

use crate::encoder::encode_into;
use crate::error::{AssemblerError, Result};
use crate::parser::{parse_program, resolve_instruction, resolve_value, Statement, SymbolTable};
use ls8_spec::MEMORY_SIZE;

/// Assemble source code into a program image for a 256-byte machine
pub fn assemble(source: &str) -> Result<Vec<u8>> {
    assemble_with_capacity(source, MEMORY_SIZE)
}

/// Assemble source code, rejecting images larger than `capacity`
pub fn assemble_with_capacity(source: &str, capacity: usize) -> Result<Vec<u8>> {
    let lines = parse_program(source)?;

    // First pass: assign addresses
    let mut symbols = SymbolTable::new();
    let mut address = 0;
    for line in &lines {
        for label in &line.labels {
            if symbols.insert(label.clone(), address).is_some() {
                return Err(AssemblerError::DuplicateLabel {
                    line: line.number,
                    label: label.clone(),
                });
            }
        }
        address += line.statement.as_ref().map_or(0, Statement::size);
    }
    if address > capacity {
        return Err(AssemblerError::ProgramTooLarge {
            size: address,
            capacity,
        });
    }

    // Second pass: encode
    let mut image = Vec::with_capacity(address);
    for line in &lines {
        match &line.statement {
            Some(Statement::Instruction { opcode, operands }) => {
                let instr = resolve_instruction(*opcode, operands, &symbols, line.number)?;
                encode_into(&instr, &mut image);
            }
            Some(Statement::Byte(value)) => {
                image.push(resolve_value(value, &symbols, line.number)?);
            }
            None => {}
        }
    }

    debug!(bytes = image.len(), labels = symbols.len(), "assembled program");
    Ok(image)
}

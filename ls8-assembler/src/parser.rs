//! Assembly parser
//!
//! Turns source text into [`Line`]s: the labels defined on a line plus an
//! optional statement whose operands are still unresolved. Label addresses
//! are only known after the whole program has been sized, so operands are
//! resolved separately with [`resolve_instruction`].

use std::collections::HashMap;
use std::ops::Range;

use logos::Logos;
use ls8_spec::{Instruction, Opcode, Register};

use crate::error::{AssemblerError, Result};
use crate::lexer::Token;

/// Label name to address
pub type SymbolTable = HashMap<String, usize>;

/// Unresolved operand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Register(Register),
    /// Numeric literal with its source text
    Immediate { value: u64, text: String },
    /// Label reference
    Label(String),
}

impl Operand {
    fn text(&self) -> String {
        match self {
            Operand::Register(reg) => reg.name().to_string(),
            Operand::Immediate { text, .. } => text.clone(),
            Operand::Label(name) => name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Instruction { opcode: Opcode, operands: Vec<Operand> },
    /// `.byte value`
    Byte(Operand),
}

impl Statement {
    /// Encoded size in bytes
    pub fn size(&self) -> usize {
        match self {
            Statement::Instruction { opcode, .. } => opcode.operand_count() as usize + 1,
            Statement::Byte(_) => 1,
        }
    }
}

/// One parsed source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number
    pub number: usize,
    pub labels: Vec<String>,
    pub statement: Option<Statement>,
}

struct Spanned<'a> {
    token: Token,
    text: &'a str,
    column: usize,
}

/// Parse a whole program, one [`Line`] per source line
pub fn parse_program(source: &str) -> Result<Vec<Line>> {
    parse_from(source, 1)
}

fn parse_from(source: &str, first_line: usize) -> Result<Vec<Line>> {
    let mut lines = Vec::new();
    let mut current = Vec::new();
    let mut number = first_line;
    let mut line_start = 0;

    let mut lex = Token::lexer(source);
    while let Some(token) = lex.next() {
        let span: Range<usize> = lex.span();
        let column = span.start - line_start + 1;
        let token = token.map_err(|_| AssemblerError::SyntaxError {
            line: number,
            column,
            message: format!("unexpected input {:?}", lex.slice()),
        })?;

        if token == Token::Newline {
            lines.push(parse_tokens(&current, number)?);
            current.clear();
            number += 1;
            line_start = span.end;
            continue;
        }
        current.push(Spanned {
            token,
            text: &source[span],
            column,
        });
    }
    lines.push(parse_tokens(&current, number)?);

    Ok(lines)
}

/// Parse a single source line
pub fn parse_line(text: &str, number: usize) -> Result<Line> {
    let mut lines = parse_from(text, number)?;
    match lines.len() {
        1 => Ok(lines.remove(0)),
        _ => Err(AssemblerError::SyntaxError {
            line: number,
            column: 1,
            message: "expected a single line".to_string(),
        }),
    }
}

/// Parse a single instruction with numeric operands only
pub fn parse_instruction(text: &str) -> Result<Instruction> {
    let line = parse_line(text, 1)?;
    match line.statement {
        Some(Statement::Instruction { opcode, operands }) if line.labels.is_empty() => {
            resolve_instruction(opcode, &operands, &SymbolTable::new(), 1)
        }
        _ => Err(AssemblerError::SyntaxError {
            line: 1,
            column: 1,
            message: "expected an instruction".to_string(),
        }),
    }
}

/// Parse register name (`R0`-`R7` or `SP`, any case)
pub fn parse_register(name: &str, line: usize) -> Result<Register> {
    let upper = name.trim().to_ascii_uppercase();
    if upper == "SP" {
        return Ok(Register::SP);
    }
    upper
        .strip_prefix('R')
        .and_then(|digits| digits.parse::<u8>().ok())
        .and_then(Register::from_index)
        .ok_or_else(|| AssemblerError::InvalidRegister {
            line,
            register: name.trim().to_string(),
        })
}

fn parse_tokens(tokens: &[Spanned<'_>], line: usize) -> Result<Line> {
    let mut labels = Vec::new();
    let mut pos = 0;

    while let (Some(Spanned { token: Token::Identifier(name), .. }), Some(Spanned { token: Token::Colon, .. })) =
        (tokens.get(pos), tokens.get(pos + 1))
    {
        labels.push(name.clone());
        pos += 2;
    }

    let Some(head) = tokens.get(pos) else {
        return Ok(Line {
            number: line,
            labels,
            statement: None,
        });
    };
    let rest = &tokens[pos + 1..];

    let statement = match &head.token {
        Token::Identifier(mnemonic) => {
            let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| {
                AssemblerError::UnknownInstruction {
                    line,
                    mnemonic: mnemonic.clone(),
                }
            })?;
            let operands = parse_operands(rest, line)?;
            expect_operand_count(mnemonic, opcode.operand_count() as usize, &operands, head, line)?;
            Statement::Instruction { opcode, operands }
        }
        Token::Directive(name) if name.eq_ignore_ascii_case("byte") => {
            let operands = parse_operands(rest, line)?;
            expect_operand_count(head.text, 1, &operands, head, line)?;
            Statement::Byte(operands.into_iter().next().ok_or_else(|| {
                AssemblerError::SyntaxError {
                    line,
                    column: head.column,
                    message: ".byte expects a value".to_string(),
                }
            })?)
        }
        Token::Directive(name) => {
            return Err(AssemblerError::InvalidDirective {
                line,
                directive: name.clone(),
            })
        }
        _ => {
            return Err(AssemblerError::SyntaxError {
                line,
                column: head.column,
                message: format!("expected instruction, found {:?}", head.text),
            })
        }
    };

    Ok(Line {
        number: line,
        labels,
        statement: Some(statement),
    })
}

fn expect_operand_count(
    name: &str,
    expected: usize,
    operands: &[Operand],
    head: &Spanned<'_>,
    line: usize,
) -> Result<()> {
    if operands.len() == expected {
        return Ok(());
    }
    Err(AssemblerError::SyntaxError {
        line,
        column: head.column,
        message: format!(
            "{} expects {expected} operand(s), found {}",
            name.to_ascii_uppercase(),
            operands.len()
        ),
    })
}

/// Comma-separated operand list
fn parse_operands(tokens: &[Spanned<'_>], line: usize) -> Result<Vec<Operand>> {
    let mut operands = Vec::new();
    let mut expect_operand = true;

    for spanned in tokens {
        let syntax_error = |message: String| AssemblerError::SyntaxError {
            line,
            column: spanned.column,
            message,
        };

        if !expect_operand {
            if spanned.token != Token::Comma {
                return Err(syntax_error(format!("expected ',', found {:?}", spanned.text)));
            }
            expect_operand = true;
            continue;
        }

        let operand = match &spanned.token {
            Token::Register(name) => Operand::Register(parse_register(name, line)?),
            Token::Identifier(name) => Operand::Label(name.clone()),
            Token::Number(value) | Token::Hex(value) | Token::Binary(value) => Operand::Immediate {
                value: *value,
                text: spanned.text.to_string(),
            },
            _ => return Err(syntax_error(format!("expected operand, found {:?}", spanned.text))),
        };
        operands.push(operand);
        expect_operand = false;
    }

    if expect_operand && !operands.is_empty() {
        let column = tokens.last().map_or(1, |t| t.column);
        return Err(AssemblerError::SyntaxError {
            line,
            column,
            message: "trailing ','".to_string(),
        });
    }
    Ok(operands)
}

fn register_operand(operand: &Operand, line: usize) -> Result<Register> {
    match operand {
        Operand::Register(reg) => Ok(*reg),
        other => Err(AssemblerError::InvalidRegister {
            line,
            register: other.text(),
        }),
    }
}

/// Resolve an immediate or label operand to a byte
pub fn resolve_value(operand: &Operand, symbols: &SymbolTable, line: usize) -> Result<u8> {
    let invalid = || AssemblerError::InvalidImmediate {
        line,
        value: operand.text(),
    };
    match operand {
        Operand::Immediate { value, .. } => u8::try_from(*value).map_err(|_| invalid()),
        Operand::Label(name) => {
            let address = symbols.get(name).ok_or_else(|| AssemblerError::UndefinedLabel {
                line,
                label: name.clone(),
            })?;
            u8::try_from(*address).map_err(|_| invalid())
        }
        Operand::Register(_) => Err(invalid()),
    }
}

/// Build a typed instruction from parsed operands
pub fn resolve_instruction(
    opcode: Opcode,
    operands: &[Operand],
    symbols: &SymbolTable,
    line: usize,
) -> Result<Instruction> {
    let operand = |index: usize| {
        operands.get(index).ok_or_else(|| AssemblerError::SyntaxError {
            line,
            column: 1,
            message: format!("{opcode} expects {} operand(s)", opcode.operand_count()),
        })
    };
    let reg = |index: usize| register_operand(operand(index)?, line);

    Ok(match opcode {
        Opcode::Hlt => Instruction::Hlt,
        Opcode::Ret => Instruction::Ret,
        Opcode::Ldi => Instruction::Ldi {
            reg: reg(0)?,
            imm: resolve_value(operand(1)?, symbols, line)?,
        },
        Opcode::Prn => Instruction::Prn { reg: reg(0)? },
        Opcode::Push => Instruction::Push { reg: reg(0)? },
        Opcode::Pop => Instruction::Pop { reg: reg(0)? },
        Opcode::Call => Instruction::Call { reg: reg(0)? },
        Opcode::Jmp => Instruction::Jmp { reg: reg(0)? },
        Opcode::Jeq => Instruction::Jeq { reg: reg(0)? },
        Opcode::Jne => Instruction::Jne { reg: reg(0)? },
        Opcode::Mul => Instruction::Mul { ra: reg(0)?, rb: reg(1)? },
        Opcode::Add => Instruction::Add { ra: reg(0)?, rb: reg(1)? },
        Opcode::Cmp => Instruction::Cmp { ra: reg(0)?, rb: reg(1)? },
    })
}

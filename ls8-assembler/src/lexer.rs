//! # Lexer for LS-8 Assembly Language

use logos::Logos;

/// Tokens for LS-8 assembly
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")] // Skip whitespace (not newlines)
#[logos(skip r"[#;][^\n]*")] // Skip comments
pub enum Token {
    /// Register (R0-R7, or SP)
    #[regex(r"[rR][0-7]", |lex| lex.slice().to_string(), priority = 3)]
    #[regex(r"[sS][pP]", |lex| lex.slice().to_string(), priority = 3)]
    Register(String),

    /// Identifier (instruction mnemonics, labels)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// Decimal number
    #[regex(r"[0-9]+", |lex| lex.slice().parse().ok())]
    Number(u64),

    /// Hexadecimal number
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| u64::from_str_radix(&lex.slice()[2..], 16).ok())]
    Hex(u64),

    /// Binary number
    #[regex(r"0[bB][01]+", |lex| u64::from_str_radix(&lex.slice()[2..], 2).ok())]
    Binary(u64),

    /// Directive (.byte)
    #[regex(r"\.[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice()[1..].to_string())]
    Directive(String),

    #[token(",")]
    Comma,

    /// Colon (for labels)
    #[token(":")]
    Colon,

    #[regex(r"\n")]
    Newline,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_registers() {
        let mut lex = Token::lexer("r0 R7 sp SP");
        assert_eq!(lex.next(), Some(Ok(Token::Register("r0".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Register("R7".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Register("sp".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Register("SP".to_string()))));
    }

    #[test]
    fn test_lexer_register_lookalikes_are_identifiers() {
        let mut lex = Token::lexer("r8 r10 spin");
        assert_eq!(lex.next(), Some(Ok(Token::Identifier("r8".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Identifier("r10".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Identifier("spin".to_string()))));
    }

    #[test]
    fn test_lexer_numbers() {
        let mut lex = Token::lexer("42 0x1A 0b1010");
        assert_eq!(lex.next(), Some(Ok(Token::Number(42))));
        assert_eq!(lex.next(), Some(Ok(Token::Hex(0x1A))));
        assert_eq!(lex.next(), Some(Ok(Token::Binary(0b1010))));
    }

    #[test]
    fn test_lexer_comments() {
        let mut lex = Token::lexer("HLT # stop\nRET ; back");
        assert_eq!(lex.next(), Some(Ok(Token::Identifier("HLT".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Newline)));
        assert_eq!(lex.next(), Some(Ok(Token::Identifier("RET".to_string()))));
        assert_eq!(lex.next(), None);
    }

    #[test]
    fn test_lexer_label_and_instruction() {
        let mut lex = Token::lexer("loop: ldi r1, 8");
        assert_eq!(lex.next(), Some(Ok(Token::Identifier("loop".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Colon)));
        assert_eq!(lex.next(), Some(Ok(Token::Identifier("ldi".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Register("r1".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Comma)));
        assert_eq!(lex.next(), Some(Ok(Token::Number(8))));
    }

    #[test]
    fn test_lexer_directive() {
        let mut lex = Token::lexer(".byte 0xFF");
        assert_eq!(lex.next(), Some(Ok(Token::Directive("byte".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Hex(0xFF))));
    }
}

//! LS-8 Assembler
//!
//! Two ways to produce a program image:
//!
//! - [`load_image`] reads the binary text format, one byte per line.
//! - [`assemble`] translates mnemonic assembly with labels.
//!
//! ## Example
//!
//! ```rust
//! use ls8_assembler::assemble;
//!
//! let source = r#"
//!     LDI R0, 8
//!     PRN R0
//!     HLT
//! "#;
//!
//! let image = assemble(source).unwrap();
//! assert_eq!(image.len(), 6);
//! ```

pub mod assembler;
pub mod encoder;
pub mod error;
pub mod image;
pub mod lexer;
pub mod parser;

pub use assembler::{assemble, assemble_with_capacity};
pub use encoder::{encode, encode_into};
pub use error::{AssemblerError, Result};
pub use image::{load_image, load_image_file, to_image_text};
pub use parser::{parse_instruction, parse_register};

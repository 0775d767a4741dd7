//! # LS-8 Disassembler
//!
//! Turn LS-8 program images back into assembly text.
//!
//! ## Example
//!
//! ```rust
//! use ls8_disassembler::disassemble;
//!
//! // LDI R0, 8; PRN R0; HLT
//! let image = [0b1000_0010, 0, 8, 0b0100_0111, 0, 0b0000_0001];
//! println!("{}", disassemble(&image));
//! ```

pub mod decoder;
pub mod disassembler;
pub mod error;
pub mod formatter;

pub use decoder::decode;
pub use disassembler::{disassemble, listing, to_assembly, ListingLine};
pub use error::{DisassemblerError, Result};
pub use formatter::{format, format_bytes, format_data};

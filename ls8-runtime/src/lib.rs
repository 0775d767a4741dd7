//! LS-8 Runtime
//!
//! Executes LS-8 program images: 256 bytes of memory shared by code, data
//! and a downward-growing stack, eight 8-bit registers (R7 is the stack
//! pointer) and an E/L/G flag register written by CMP.
//!
//! ```ignore
//! use ls8_runtime::Machine;
//!
//! let mut machine = Machine::default();
//! machine.load(&image)?;
//! let result = machine.run()?;
//! println!("{:?}", result.outputs);
//! ```

pub mod alu;
pub mod error;
pub mod execute;
pub mod io;
pub mod memory;
pub mod registers;
pub mod state;
pub mod trace;
pub mod vm;

pub use alu::AluOp;
pub use error::{Result, RuntimeError};
pub use io::{OutputSink, WriterSink};
pub use memory::Memory;
pub use registers::RegisterFile;
pub use state::{Flags, HaltReason, StepOutcome};
pub use trace::TraceRow;
pub use vm::{ExecutionResult, Machine, MachineConfig, MachineSnapshot, UnknownOpcodePolicy};

/// Run an image on a default machine and return everything it printed
pub fn run(image: &[u8]) -> Result<Vec<u8>> {
    let mut machine = Machine::default();
    machine.load(image)?;
    Ok(machine.run()?.outputs)
}

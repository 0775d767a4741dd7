//! Instruction handlers and the opcode dispatch table
//!
//! Each handler receives the two raw operand bytes that follow the opcode.
//! Handlers for instructions with the "sets PC" bit position the PC
//! themselves; the engine advances it for everything else.

use tracing::trace;

use crate::alu::{alu, AluOp};
use crate::error::{Result, RuntimeError};
use crate::io::OutputSink;
use crate::state::HaltReason;
use crate::vm::Machine;
use ls8_spec::Opcode;

/// Instruction handler
pub type Handler = fn(&mut Machine, &mut dyn OutputSink, u8, u8) -> Result<()>;

/// Handlers indexed by [`Opcode::index`], built once per machine
#[derive(Clone)]
pub struct DispatchTable {
    handlers: [Handler; Opcode::COUNT],
}

impl DispatchTable {
    pub fn new() -> Self {
        let mut handlers: [Handler; Opcode::COUNT] = [op_hlt; Opcode::COUNT];
        for op in Opcode::ALL {
            handlers[op.index()] = handler_for(op);
        }
        Self { handlers }
    }

    #[inline]
    pub fn get(&self, op: Opcode) -> Handler {
        self.handlers[op.index()]
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchTable")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

fn handler_for(op: Opcode) -> Handler {
    match op {
        Opcode::Hlt => op_hlt,
        Opcode::Ldi => op_ldi,
        Opcode::Prn => op_prn,
        Opcode::Mul => op_mul,
        Opcode::Add => op_add,
        Opcode::Push => op_push,
        Opcode::Pop => op_pop,
        Opcode::Call => op_call,
        Opcode::Ret => op_ret,
        Opcode::Jmp => op_jmp,
        Opcode::Cmp => op_cmp,
        Opcode::Jeq => op_jeq,
        Opcode::Jne => op_jne,
    }
}

// ========== System ==========

fn op_hlt(m: &mut Machine, _: &mut dyn OutputSink, _: u8, _: u8) -> Result<()> {
    m.halt(HaltReason::Halted);
    Ok(())
}

// ========== Data ==========

fn op_ldi(m: &mut Machine, _: &mut dyn OutputSink, reg: u8, imm: u8) -> Result<()> {
    m.registers.write(reg, imm)
}

fn op_prn(m: &mut Machine, out: &mut dyn OutputSink, reg: u8, _: u8) -> Result<()> {
    let value = m.registers.read(reg)?;
    trace!(pc = m.pc, value, "PRN");
    out.emit(value)?;
    Ok(())
}

// ========== ALU ==========

fn op_mul(m: &mut Machine, _: &mut dyn OutputSink, ra: u8, rb: u8) -> Result<()> {
    alu(AluOp::Mul, &mut m.registers, &mut m.flags, ra, rb)
}

fn op_add(m: &mut Machine, _: &mut dyn OutputSink, ra: u8, rb: u8) -> Result<()> {
    alu(AluOp::Add, &mut m.registers, &mut m.flags, ra, rb)
}

fn op_cmp(m: &mut Machine, _: &mut dyn OutputSink, ra: u8, rb: u8) -> Result<()> {
    alu(AluOp::Cmp, &mut m.registers, &mut m.flags, ra, rb)
}

// ========== Stack ==========

fn op_push(m: &mut Machine, _: &mut dyn OutputSink, reg: u8, _: u8) -> Result<()> {
    let value = m.registers.read(reg)?;
    let sp = m.layout().stack_decrement(m.stack_pointer());
    // `PUSH R7` stores the decremented pointer.
    let value = if reg as usize == m.layout().stack_pointer_index() {
        sp
    } else {
        value
    };
    m.memory.write(sp as usize, value)?;
    m.set_stack_pointer(sp);
    Ok(())
}

fn op_pop(m: &mut Machine, _: &mut dyn OutputSink, reg: u8, _: u8) -> Result<()> {
    // `POP R7` is overwritten by the pointer increment.
    let sp = m.stack_pointer();
    let value = m.memory.read(sp as usize)?;
    m.registers.write(reg, value)?;
    let next = m.layout().stack_increment(sp);
    m.set_stack_pointer(next);
    Ok(())
}

// ========== Control ==========

fn op_call(m: &mut Machine, _: &mut dyn OutputSink, reg: u8, _: u8) -> Result<()> {
    let target = m.registers.read(reg)?;
    let return_address = m.pc + 2;
    let encoded = u8::try_from(return_address)
        .ok()
        .filter(|_| return_address < m.memory.capacity())
        .ok_or(RuntimeError::OutOfBounds {
            address: return_address,
            capacity: m.memory.capacity(),
        })?;

    let sp = m.layout().stack_decrement(m.stack_pointer());
    m.memory.write(sp as usize, encoded)?;
    m.set_stack_pointer(sp);
    m.pc = target as usize;
    Ok(())
}

fn op_ret(m: &mut Machine, _: &mut dyn OutputSink, _: u8, _: u8) -> Result<()> {
    let sp = m.stack_pointer();
    let return_address = m.memory.read(sp as usize)?;
    let next = m.layout().stack_increment(sp);
    m.set_stack_pointer(next);
    m.pc = return_address as usize;
    Ok(())
}

fn op_jmp(m: &mut Machine, _: &mut dyn OutputSink, reg: u8, _: u8) -> Result<()> {
    m.pc = m.registers.read(reg)? as usize;
    Ok(())
}

fn op_jeq(m: &mut Machine, _: &mut dyn OutputSink, reg: u8, _: u8) -> Result<()> {
    let taken = m.flags.equal;
    jump_if(m, taken, reg)
}

fn op_jne(m: &mut Machine, _: &mut dyn OutputSink, reg: u8, _: u8) -> Result<()> {
    let taken = !m.flags.equal;
    jump_if(m, taken, reg)
}

/// Conditional jumps skip their own two bytes explicitly when not taken
fn jump_if(m: &mut Machine, taken: bool, reg: u8) -> Result<()> {
    if taken {
        m.pc = m.registers.read(reg)? as usize;
    } else {
        m.pc += 2;
    }
    Ok(())
}

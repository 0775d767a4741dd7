//! Virtual Machine for LS-8

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{Result, RuntimeError};
use crate::execute::DispatchTable;
use crate::io::OutputSink;
use crate::memory::Memory;
use crate::registers::RegisterFile;
use crate::state::{Flags, HaltReason, StepOutcome};
use crate::trace::TraceRow;
use ls8_spec::{Config, Decoded, Opcode, Register};

/// What to do with an instruction byte that has no handler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownOpcodePolicy {
    /// Stop with [`RuntimeError::UnknownOpcode`]
    #[default]
    Fail,
    /// Treat it as a no-op and apply the normal PC advance for its byte
    Skip,
}

/// Machine configuration
#[derive(Debug, Clone, Default)]
pub struct MachineConfig {
    /// Memory size, register count and stack parameters
    pub layout: Config,

    /// Stop after this many cycles; `None` runs until HLT
    pub max_cycles: Option<u64>,

    /// Record a [`TraceRow`] for every cycle
    pub trace: bool,

    /// Handling of undefined instruction bytes
    pub unknown_opcode: UnknownOpcodePolicy,
}

/// Execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Number of cycles executed
    pub cycles: u64,

    /// Values printed by PRN, in order
    pub outputs: Vec<u8>,

    /// Reason for stopping
    pub halt_reason: HaltReason,
}

/// Copy of all observable machine state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub pc: usize,
    pub registers: Vec<u8>,
    pub memory: Vec<u8>,
    pub flags: Flags,
    pub running: bool,
    pub cycles: u64,
}

/// LS-8 machine: memory, registers, flags and the fetch-decode-dispatch loop
#[derive(Debug, Clone)]
pub struct Machine {
    pub(crate) memory: Memory,
    pub(crate) registers: RegisterFile,
    pub(crate) pc: usize,
    pub(crate) flags: Flags,
    running: bool,
    halt_reason: Option<HaltReason>,
    cycles: u64,
    config: MachineConfig,
    dispatch: DispatchTable,
    trace: Vec<TraceRow>,
}

impl Machine {
    /// Create a machine with zeroed memory and registers, except the stack
    /// pointer
    pub fn new(config: MachineConfig) -> Result<Self> {
        config.layout.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: MachineConfig) -> Self {
        let layout = config.layout;
        let mut registers = RegisterFile::new(layout.num_registers);
        registers.set(Register::SP, layout.stack_top);

        Self {
            memory: Memory::new(layout.memory_size),
            registers,
            pc: 0,
            flags: Flags::default(),
            running: true,
            halt_reason: None,
            cycles: 0,
            config,
            dispatch: DispatchTable::new(),
            trace: Vec::new(),
        }
    }

    /// Write a program image at address 0
    pub fn load(&mut self, image: &[u8]) -> Result<()> {
        let capacity = self.memory.capacity();
        if image.len() > capacity {
            return Err(RuntimeError::ImageTooLarge {
                len: image.len(),
                capacity,
            });
        }
        self.memory.load(0, image)?;
        debug!(bytes = image.len(), "loaded program image");
        Ok(())
    }

    /// Run until HLT (or the cycle limit), collecting PRN output
    pub fn run(&mut self) -> Result<ExecutionResult> {
        let mut outputs = Vec::new();
        let halt_reason = self.run_with(&mut outputs)?;
        Ok(ExecutionResult {
            cycles: self.cycles,
            outputs,
            halt_reason,
        })
    }

    /// Run until HLT (or the cycle limit), sending PRN output to `sink`
    pub fn run_with(&mut self, sink: &mut dyn OutputSink) -> Result<HaltReason> {
        loop {
            if let StepOutcome::Halted(reason) = self.step(sink)? {
                debug!(cycles = self.cycles, ?reason, "machine stopped");
                return Ok(reason);
            }
        }
    }

    /// Execute one fetch-decode-dispatch cycle
    pub fn step(&mut self, sink: &mut dyn OutputSink) -> Result<StepOutcome> {
        if !self.running {
            return Ok(StepOutcome::Halted(
                self.halt_reason.unwrap_or(HaltReason::Halted),
            ));
        }
        if let Some(limit) = self.config.max_cycles {
            if self.cycles >= limit {
                self.halt_reason = Some(HaltReason::CycleLimit);
                return Ok(StepOutcome::Halted(HaltReason::CycleLimit));
            }
        }

        let pc = self.pc;
        let ir = self.memory.read(pc)?;
        let decoded = Decoded::new(ir);

        if self.config.trace {
            self.record_trace(pc, ir);
        }

        match Opcode::from_u8(ir) {
            Some(op) => {
                let (a, b) = self.fetch_operands(pc, op).map_err(|e| e.at(pc, ir))?;
                let handler = self.dispatch.get(op);
                handler(self, sink, a, b).map_err(|e| e.at(pc, ir))?;
            }
            None => match self.config.unknown_opcode {
                UnknownOpcodePolicy::Fail => {
                    return Err(RuntimeError::UnknownOpcode { pc, opcode: ir });
                }
                UnknownOpcodePolicy::Skip => {
                    warn!(pc, opcode = ir, "skipping unknown opcode");
                }
            },
        }

        if !decoded.sets_pc {
            self.pc = pc + decoded.len();
        }
        self.cycles += 1;

        Ok(if self.running {
            StepOutcome::Continue
        } else {
            StepOutcome::Halted(HaltReason::Halted)
        })
    }

    /// Read only the operand bytes `op` declares; the rest are 0
    fn fetch_operands(&self, pc: usize, op: Opcode) -> Result<(u8, u8)> {
        let count = op.operand_count();
        let a = if count >= 1 { self.memory.read(pc + 1)? } else { 0 };
        let b = if count >= 2 { self.memory.read(pc + 2)? } else { 0 };
        Ok((a, b))
    }

    fn record_trace(&mut self, pc: usize, ir: u8) {
        let row = TraceRow {
            cycle: self.cycles,
            pc,
            ir,
            operand_a: self.memory.peek(pc + 1).unwrap_or(0),
            operand_b: self.memory.peek(pc + 2).unwrap_or(0),
            registers: self.registers.as_slice().to_vec(),
            flags: self.flags,
        };
        trace!("{row}");
        self.trace.push(row);
    }

    pub(crate) fn halt(&mut self, reason: HaltReason) {
        self.running = false;
        self.halt_reason = Some(reason);
    }

    pub(crate) fn set_stack_pointer(&mut self, value: u8) {
        self.registers.set(Register::SP, value);
    }

    /// Current stack pointer (a view of R7)
    pub fn stack_pointer(&self) -> u8 {
        self.registers[Register::SP]
    }

    pub fn layout(&self) -> &Config {
        &self.config.layout
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// Read a register by index
    pub fn register(&self, index: u8) -> Result<u8> {
        self.registers.read(index)
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn halt_reason(&self) -> Option<HaltReason> {
        self.halt_reason
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Rows recorded while [`MachineConfig::trace`] is set
    pub fn trace(&self) -> &[TraceRow] {
        &self.trace
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            pc: self.pc,
            registers: self.registers.as_slice().to_vec(),
            memory: self.memory.as_slice().to_vec(),
            flags: self.flags,
            running: self.running,
            cycles: self.cycles,
        }
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::with_valid_config(MachineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ls8_assembler::encode;
    use ls8_spec::Instruction;

    fn image(instructions: &[Instruction]) -> Vec<u8> {
        instructions.iter().flat_map(encode).collect()
    }

    fn machine_with(instructions: &[Instruction]) -> Machine {
        let mut m = Machine::default();
        m.load(&image(instructions)).unwrap();
        m
    }

    #[test]
    fn test_initial_state() {
        let m = Machine::default();
        assert_eq!(m.pc(), 0);
        assert!(m.is_running());
        assert_eq!(m.stack_pointer(), 0xF3);
        assert_eq!(m.registers().as_slice(), &[0, 0, 0, 0, 0, 0, 0, 0xF3]);
        assert_eq!(m.flags(), Flags::default());
        assert_eq!(m.memory().capacity(), 256);
        assert_eq!(m.halt_reason(), None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = MachineConfig {
            layout: Config {
                num_registers: 4,
                ..Config::DEFAULT
            },
            ..MachineConfig::default()
        };
        assert!(matches!(
            Machine::new(config),
            Err(RuntimeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_basic_execution() {
        let mut m = machine_with(&[
            Instruction::Ldi { reg: Register::R0, imm: 8 },
            Instruction::Ldi { reg: Register::R1, imm: 9 },
            Instruction::Mul { ra: Register::R0, rb: Register::R1 },
            Instruction::Prn { reg: Register::R0 },
            Instruction::Hlt,
        ]);
        let result = m.run().unwrap();

        assert_eq!(result.outputs, vec![72]);
        assert_eq!(result.halt_reason, HaltReason::Halted);
        assert_eq!(result.cycles, 5);
        assert!(!m.is_running());
        assert_eq!(m.pc(), 12);
    }

    #[test]
    fn test_step_after_halt_is_noop() {
        let mut m = machine_with(&[Instruction::Hlt]);
        let mut out: Vec<u8> = Vec::new();
        assert_eq!(m.step(&mut out).unwrap(), StepOutcome::Halted(HaltReason::Halted));
        assert_eq!(m.step(&mut out).unwrap(), StepOutcome::Halted(HaltReason::Halted));
        assert_eq!(m.cycles(), 1);
    }

    #[test]
    fn test_unknown_opcode_fails_by_default() {
        let mut m = Machine::default();
        m.load(&[0b1111_1111]).unwrap();
        let err = m.run().unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::UnknownOpcode { pc: 0, opcode: 0b1111_1111 }
        ));
    }

    #[test]
    fn test_unknown_opcode_skip_policy() {
        let config = MachineConfig {
            unknown_opcode: UnknownOpcodePolicy::Skip,
            ..MachineConfig::default()
        };
        let mut m = Machine::new(config).unwrap();
        // 0b10000000: unknown, two operand bytes, no PC bit
        let mut program = vec![0b1000_0000, 0xAA, 0xBB];
        program.extend(encode(&Instruction::Hlt));
        m.load(&program).unwrap();

        let result = m.run().unwrap();
        assert_eq!(result.halt_reason, HaltReason::Halted);
        assert_eq!(result.cycles, 2);
        assert_eq!(m.pc(), 4);
    }

    #[test]
    fn test_cycle_limit() {
        // LDI R0, 0; JMP R0 loops forever
        let config = MachineConfig {
            max_cycles: Some(100),
            ..MachineConfig::default()
        };
        let mut m = Machine::new(config).unwrap();
        m.load(&image(&[
            Instruction::Ldi { reg: Register::R0, imm: 3 },
            Instruction::Jmp { reg: Register::R0 },
        ]))
        .unwrap();

        let result = m.run().unwrap();
        assert_eq!(result.halt_reason, HaltReason::CycleLimit);
        assert_eq!(result.cycles, 100);
        assert!(m.is_running());
    }

    #[test]
    fn test_error_carries_pc_and_opcode() {
        // PRN R9
        let mut m = Machine::default();
        m.load(&[Opcode::Prn.to_u8(), 9]).unwrap();
        let err = m.run().unwrap_err();

        match &err {
            RuntimeError::Execution { pc, opcode, .. } => {
                assert_eq!(*pc, 0);
                assert_eq!(*opcode, Opcode::Prn.to_u8());
            }
            other => panic!("expected execution error, got {other:?}"),
        }
        assert!(matches!(err.root(), RuntimeError::RegisterOutOfBounds { index: 9, .. }));
        assert_eq!(m.pc(), 0);
    }

    #[test]
    fn test_running_off_the_end_of_memory() {
        let config = MachineConfig {
            layout: Config::new(4, 8, 3, 4).unwrap(),
            ..MachineConfig::default()
        };
        let mut m = Machine::new(config).unwrap();
        // LDI R0, 1 fills bytes 0-2; byte 3 is 0 (unknown)
        m.load(&[Opcode::Ldi.to_u8(), 0, 1]).unwrap();
        let err = m.run().unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownOpcode { pc: 3, opcode: 0 }));
    }

    #[test]
    fn test_hlt_at_last_address() {
        let mut m = Machine::default();
        let mut program = vec![0; 256];
        program[0] = Opcode::Ldi.to_u8();
        program[1] = 1;
        program[2] = 0xFF;
        program[3] = Opcode::Jmp.to_u8();
        program[4] = 1;
        program[0xFF] = Opcode::Hlt.to_u8();
        m.load(&program).unwrap();

        let result = m.run().unwrap();
        assert_eq!(result.halt_reason, HaltReason::Halted);
    }

    #[test]
    fn test_image_too_large() {
        let mut m = Machine::default();
        let err = m.load(&[0; 257]).unwrap_err();
        assert!(matches!(err, RuntimeError::ImageTooLarge { len: 257, capacity: 256 }));
    }

    #[test]
    fn test_trace_collection() {
        let config = MachineConfig {
            trace: true,
            ..MachineConfig::default()
        };
        let mut m = Machine::new(config).unwrap();
        m.load(&image(&[
            Instruction::Ldi { reg: Register::R0, imm: 8 },
            Instruction::Hlt,
        ]))
        .unwrap();
        m.run().unwrap();

        let trace = m.trace();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[0].pc, 0);
        assert_eq!(trace[0].registers[0], 0);
        assert_eq!(trace[1].pc, 3);
        assert_eq!(trace[1].registers[0], 8);
        assert!(trace[1].to_string().starts_with("TRACE: 03 | 01"));
    }

    #[test]
    fn test_trace_disabled_by_default() {
        let mut m = machine_with(&[Instruction::Hlt]);
        m.run().unwrap();
        assert!(m.trace().is_empty());
    }

    #[test]
    fn test_snapshot() {
        let mut m = machine_with(&[
            Instruction::Ldi { reg: Register::R2, imm: 5 },
            Instruction::Hlt,
        ]);
        m.run().unwrap();
        let snap = m.snapshot();
        assert_eq!(snap.registers[2], 5);
        assert_eq!(snap.pc, 4);
        assert!(!snap.running);
        assert_eq!(snap.memory.len(), 256);
        assert_eq!(snap.cycles, 2);
    }
}

//! Property tests for register, flag and stack behaviour

use ls8_runtime::{Machine, MachineConfig, HaltReason};
use ls8_spec::{Instruction, Register};
use proptest::prelude::*;

fn run(instructions: &[Instruction]) -> Machine {
    let image: Vec<u8> = instructions.iter().flat_map(ls8_assembler::encode).collect();
    let mut machine = Machine::default();
    machine.load(&image).unwrap();
    machine.run().unwrap();
    machine
}

fn general_register() -> impl Strategy<Value = Register> {
    (0u8..7).prop_map(|i| Register::from_index(i).unwrap())
}

fn any_register() -> impl Strategy<Value = Register> {
    (0u8..8).prop_map(|i| Register::from_index(i).unwrap())
}

proptest! {
    #[test]
    fn ldi_then_hlt_sets_register(reg in any_register(), value in any::<u8>()) {
        let machine = run(&[Instruction::Ldi { reg, imm: value }, Instruction::Hlt]);
        prop_assert_eq!(machine.register(reg.to_u8()).unwrap(), value);
        prop_assert!(!machine.is_running());
    }

    #[test]
    fn push_pop_is_idempotent(reg in general_register(), value in any::<u8>()) {
        let machine = run(&[
            Instruction::Ldi { reg, imm: value },
            Instruction::Push { reg },
            Instruction::Pop { reg },
            Instruction::Hlt,
        ]);
        prop_assert_eq!(machine.register(reg.to_u8()).unwrap(), value);
        prop_assert_eq!(machine.stack_pointer(), 0xF3);
    }

    #[test]
    fn cmp_sets_exactly_one_flag(a in any::<u8>(), b in any::<u8>()) {
        let forward = run(&[
            Instruction::Ldi { reg: Register::R0, imm: a },
            Instruction::Ldi { reg: Register::R1, imm: b },
            Instruction::Cmp { ra: Register::R0, rb: Register::R1 },
            Instruction::Hlt,
        ]);
        let swapped = run(&[
            Instruction::Ldi { reg: Register::R0, imm: a },
            Instruction::Ldi { reg: Register::R1, imm: b },
            Instruction::Cmp { ra: Register::R1, rb: Register::R0 },
            Instruction::Hlt,
        ]);

        let f = forward.flags();
        prop_assert_eq!(f.equal as u8 + f.less as u8 + f.greater as u8, 1);
        prop_assert_eq!(f.equal, a == b);
        prop_assert_eq!(f.less, a < b);

        let s = swapped.flags();
        prop_assert_eq!(s.equal, f.equal);
        prop_assert_eq!(s.less, f.greater);
        prop_assert_eq!(s.greater, f.less);

        // CMP leaves registers untouched
        prop_assert_eq!(forward.register(0).unwrap(), a);
        prop_assert_eq!(forward.register(1).unwrap(), b);
    }

    #[test]
    fn alu_arithmetic_wraps(a in any::<u8>(), b in any::<u8>()) {
        let added = run(&[
            Instruction::Ldi { reg: Register::R0, imm: a },
            Instruction::Ldi { reg: Register::R1, imm: b },
            Instruction::Add { ra: Register::R0, rb: Register::R1 },
            Instruction::Hlt,
        ]);
        let multiplied = run(&[
            Instruction::Ldi { reg: Register::R0, imm: a },
            Instruction::Ldi { reg: Register::R1, imm: b },
            Instruction::Mul { ra: Register::R0, rb: Register::R1 },
            Instruction::Hlt,
        ]);
        prop_assert_eq!(added.register(0).unwrap(), a.wrapping_add(b));
        prop_assert_eq!(multiplied.register(0).unwrap(), a.wrapping_mul(b));
    }

    #[test]
    fn call_ret_restores_pc_and_stack(target in 20u8..200) {
        // LDI R1, target; CALL R1; HLT ... target: RET
        let mut image: Vec<u8> = [
            Instruction::Ldi { reg: Register::R1, imm: target },
            Instruction::Call { reg: Register::R1 },
            Instruction::Hlt,
        ]
        .iter()
        .flat_map(ls8_assembler::encode)
        .collect();
        image.resize(target as usize, 0);
        image.extend(ls8_assembler::encode(&Instruction::Ret));

        let mut machine = Machine::default();
        machine.load(&image).unwrap();
        let mut out: Vec<u8> = Vec::new();
        machine.step(&mut out).unwrap();
        machine.step(&mut out).unwrap();
        prop_assert_eq!(machine.pc(), target as usize);
        prop_assert_eq!(machine.stack_pointer(), 0xF2);

        machine.step(&mut out).unwrap();
        prop_assert_eq!(machine.pc(), 5);
        prop_assert_eq!(machine.stack_pointer(), 0xF3);
    }

    #[test]
    fn cycle_limit_is_exact(limit in 1u64..500) {
        let config = MachineConfig { max_cycles: Some(limit), ..MachineConfig::default() };
        let mut machine = Machine::new(config).unwrap();
        // LDI R0, 3; JMP R0 at 3 spins forever
        let image: Vec<u8> = [
            Instruction::Ldi { reg: Register::R0, imm: 3 },
            Instruction::Jmp { reg: Register::R0 },
        ]
        .iter()
        .flat_map(ls8_assembler::encode)
        .collect();
        machine.load(&image).unwrap();

        let result = machine.run().unwrap();
        prop_assert_eq!(result.halt_reason, HaltReason::CycleLimit);
        prop_assert_eq!(result.cycles, limit);
    }
}

//! Integration tests for the LS-8 assembler
//!
//! Covers the mnemonic assembler, label resolution and the binary image
//! text format.

use ls8_assembler::{assemble, encode, load_image, parse_register, to_image_text};
use ls8_spec::{Instruction, Opcode, Register};
use proptest::prelude::*;

// ============================================================================
// Basic Assembly Tests
// ============================================================================

#[test]
fn test_assemble_empty_program() {
    assert!(assemble("").unwrap().is_empty());
}

#[test]
fn test_assemble_comments_only() {
    let source = r#"
        # This is a comment
        ; Another comment
    "#;
    assert!(assemble(source).unwrap().is_empty());
}

#[test]
fn test_assemble_mult_program() {
    let source = r#"
        LDI R0, 8
        LDI R1, 9
        MUL R0, R1
        PRN R0      # => 72
        HLT
    "#;
    let expected = [
        0b10000010, 0b00000000, 0b00001000,
        0b10000010, 0b00000001, 0b00001001,
        0b10100010, 0b00000000, 0b00000001,
        0b01000111, 0b00000000,
        0b00000001,
    ];
    assert_eq!(assemble(source).unwrap(), expected);
}

#[test]
fn test_every_mnemonic_assembles() {
    let source = r#"
        HLT
        LDI R1, 0xFF
        PRN R2
        MUL R3, R4
        ADD R5, R6
        PUSH R0
        POP R1
        CALL R2
        RET
        JMP R3
        CMP R4, R5
        JEQ R6
        JNE R0
    "#;
    let image = assemble(source).unwrap();

    let mut offset = 0;
    for op in Opcode::ALL {
        assert_eq!(image[offset], op.to_u8(), "{op} at {offset}");
        offset += op.operand_count() as usize + 1;
    }
    assert_eq!(offset, image.len());
}

#[test]
fn test_case_insensitive() {
    let upper = assemble("LDI R0, 0X1f\nPUSH SP\nHLT").unwrap();
    let lower = assemble("ldi r0, 0x1F\npush sp\nhlt").unwrap();
    assert_eq!(upper, lower);
    assert_eq!(upper, vec![0b1000_0010, 0, 0x1F, 0b0100_0101, 7, 0b0000_0001]);
}

#[test]
fn test_immediate_bases() {
    let image = assemble("LDI R0, 10\nLDI R1, 0x0A\nLDI R2, 0b1010").unwrap();
    assert_eq!(image[2], 10);
    assert_eq!(image[5], 10);
    assert_eq!(image[8], 10);
}

// ============================================================================
// Labels and Directives
// ============================================================================

#[test]
fn test_countdown_with_labels() {
    let source = r#"
            LDI R0, 3
            LDI R1, 255     ; -1
            LDI R2, 0
            LDI R3, loop
            LDI R4, done
        loop:
            PRN R0
            ADD R0, R1
            CMP R0, R2
            JEQ R4
            JMP R3
        done:
            HLT
    "#;
    let image = assemble(source).unwrap();
    assert_eq!(image[11], 15);
    assert_eq!(image[14], 27);
    assert_eq!(image.len(), 28);
}

#[test]
fn test_label_before_instruction_on_same_line() {
    let image = assemble("LDI R0, here\nhere: HLT").unwrap();
    assert_eq!(image, vec![0b1000_0010, 0, 3, 0b0000_0001]);
}

#[test]
fn test_byte_directive() {
    let image = assemble("HLT\ndata: .byte 0x2A\n.byte data").unwrap();
    assert_eq!(image, vec![0b0000_0001, 0x2A, 1]);
}

#[test]
fn test_parse_register_aliases() {
    assert_eq!(parse_register("SP", 1).unwrap(), Register::R7);
    assert_eq!(parse_register("r3", 1).unwrap(), Register::R3);
}

// ============================================================================
// Image Format
// ============================================================================

#[test]
fn test_assembled_program_as_image_text() {
    let image = assemble("LDI R0, 8\nPRN R0\nHLT").unwrap();
    let text = to_image_text(&image);

    assert!(text.starts_with("10000010 # LDI R0, 8\n"));
    assert!(text.contains("01000111 # PRN R0\n"));
    assert_eq!(load_image(&text).unwrap(), image);
}

// ============================================================================
// Properties
// ============================================================================

fn arb_register() -> impl Strategy<Value = Register> {
    (0u8..8).prop_map(|i| Register::from_index(i).unwrap())
}

fn arb_instruction() -> impl Strategy<Value = Instruction> {
    prop_oneof![
        Just(Instruction::Hlt),
        Just(Instruction::Ret),
        (arb_register(), any::<u8>()).prop_map(|(reg, imm)| Instruction::Ldi { reg, imm }),
        arb_register().prop_map(|reg| Instruction::Prn { reg }),
        arb_register().prop_map(|reg| Instruction::Push { reg }),
        arb_register().prop_map(|reg| Instruction::Jne { reg }),
        (arb_register(), arb_register()).prop_map(|(ra, rb)| Instruction::Cmp { ra, rb }),
        (arb_register(), arb_register()).prop_map(|(ra, rb)| Instruction::Mul { ra, rb }),
    ]
}

proptest! {
    #[test]
    fn display_form_assembles_to_encoding(instr in arb_instruction()) {
        let image = assemble(&instr.to_string()).unwrap();
        prop_assert_eq!(image, encode(&instr));
    }
}

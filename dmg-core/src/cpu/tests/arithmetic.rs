use super::{hash_map, run_test, set_in_state, ExpectedState, ALL_REGISTERS};

use crate::cpu::registers::CpuRegister;
use std::collections::HashMap;

#[test]
fn add_immediate() {
    run_test(
        // LD A, 0x05; ADD 0xDE
        "3E05C6DE",
        &ExpectedState { a: Some(0xE3), f: Some(0x20), ..ExpectedState::empty() },
    );

    run_test(
        // LD A, 0x01; ADD 0x03
        "3E01C603",
        &ExpectedState { a: Some(0x04), f: Some(0x00), ..ExpectedState::empty() },
    );

    run_test(
        // LD A, 0x55; ADD 0xAB
        "3E55C6AB",
        &ExpectedState { a: Some(0x00), f: Some(0xB0), ..ExpectedState::empty() },
    );

    run_test(
        // LD A, 0xFF; SCF; ADD 0x12
        "3EFF37C612",
        &ExpectedState { a: Some(0x11), f: Some(0x30), ..ExpectedState::empty() },
    );
}

#[test]
fn add_register() {
    for r in ALL_REGISTERS {
        if r == CpuRegister::A {
            continue;
        }

        let ld_opcode = 0x06 | (r.to_opcode_bits() << 3);
        let add_opcode = 0x80 | r.to_opcode_bits();

        let mut expected_state =
            ExpectedState { a: Some(0x24), f: Some(0x30), ..ExpectedState::empty() };
        set_in_state(&mut expected_state, r, 0xF8);

        run_test(
            // LD A, 0x2C; LD <R>, 0xF8; ADD <R>
            &format!("3E2C{ld_opcode:02x}F8{add_opcode:02x}"),
            &expected_state,
        );
    }

    run_test(
        // LD A, 0x88; ADD A
        "3E8887",
        &ExpectedState { a: Some(0x10), f: Some(0x30), ..ExpectedState::empty() },
    );
}

#[test]
fn add_indirect_hl() {
    run_test(
        // LD HL, 0xC422; LD (HL), 0x0F; LD A, 0x01; ADD (HL)
        "2122C4360F3E0186",
        &ExpectedState { a: Some(0x10), f: Some(0x20), ..ExpectedState::empty() },
    );
}

#[test]
fn add_with_carry() {
    run_test(
        // LD A, 0xFF; ADD 0x01; ADC 0x00
        "3EFFC601CE00",
        &ExpectedState { a: Some(0x01), f: Some(0x00), ..ExpectedState::empty() },
    );

    run_test(
        // LD A, 0x0E; SCF; ADC 0x01
        "3E0E37CE01",
        &ExpectedState { a: Some(0x10), f: Some(0x20), ..ExpectedState::empty() },
    );

    run_test(
        // LD A, 0xE1; LD B, 0x1E; SCF; ADC B
        "3EE1061E3788",
        &ExpectedState { a: Some(0x00), f: Some(0xB0), ..ExpectedState::empty() },
    );
}

#[test]
fn subtract() {
    run_test(
        // LD A, 0x3E; SUB 0x3E
        "3E3ED63E",
        &ExpectedState { a: Some(0x00), f: Some(0xC0), ..ExpectedState::empty() },
    );

    run_test(
        // LD A, 0x00; SUB 0x01
        "3E00D601",
        &ExpectedState { a: Some(0xFF), f: Some(0x70), ..ExpectedState::empty() },
    );

    run_test(
        // LD A, 0x3E; LD E, 0x0F; SUB E
        "3E3E1E0F93",
        &ExpectedState { a: Some(0x2F), f: Some(0x60), ..ExpectedState::empty() },
    );

    run_test(
        // LD A, 0x77; SUB A
        "3E7797",
        &ExpectedState { a: Some(0x00), f: Some(0xC0), ..ExpectedState::empty() },
    );
}

#[test]
fn subtract_with_carry() {
    run_test(
        // LD A, 0x00; SUB 0x01; SBC 0x00
        "3E00D601DE00",
        &ExpectedState { a: Some(0xFE), f: Some(0x40), ..ExpectedState::empty() },
    );

    run_test(
        // LD A, 0x10; SCF; SBC 0x0F
        "3E1037DE0F",
        &ExpectedState { a: Some(0x00), f: Some(0xE0), ..ExpectedState::empty() },
    );
}

#[test]
fn compare() {
    run_test(
        // LD A, 0x3C; CP 0x2F
        "3E3CFE2F",
        &ExpectedState { a: Some(0x3C), f: Some(0x60), ..ExpectedState::empty() },
    );

    run_test(
        // LD A, 0x3C; CP 0x3C
        "3E3CFE3C",
        &ExpectedState { a: Some(0x3C), f: Some(0xC0), ..ExpectedState::empty() },
    );

    run_test(
        // LD A, 0x3C; LD HL, 0xC000; LD (HL), 0x40; CP (HL)
        "3E3C2100C03640BE",
        &ExpectedState { a: Some(0x3C), f: Some(0x50), ..ExpectedState::empty() },
    );
}

#[test]
fn logical() {
    run_test(
        // LD A, 0x5A; AND 0x3F
        "3E5AE63F",
        &ExpectedState { a: Some(0x1A), f: Some(0x20), ..ExpectedState::empty() },
    );

    run_test(
        // LD A, 0x5A; AND 0x00
        "3E5AE600",
        &ExpectedState { a: Some(0x00), f: Some(0xA0), ..ExpectedState::empty() },
    );

    run_test(
        // LD A, 0x5A; SCF; OR 0x00
        "3E5A37F600",
        &ExpectedState { a: Some(0x5A), f: Some(0x00), ..ExpectedState::empty() },
    );

    run_test(
        // LD A, 0x00; OR 0x00
        "3E00F600",
        &ExpectedState { a: Some(0x00), f: Some(0x80), ..ExpectedState::empty() },
    );

    run_test(
        // LD A, 0xFF; LD C, 0x0F; XOR C
        "3EFF0E0FA9",
        &ExpectedState { a: Some(0xF0), f: Some(0x00), ..ExpectedState::empty() },
    );
}

#[test]
fn xor_accumulator_clears_for_every_value() {
    for value in 0..=u8::MAX {
        run_test(
            // SCF; LD A, <value>; XOR A
            &format!("373E{value:02x}AF"),
            &ExpectedState { a: Some(0x00), f: Some(0x80), ..ExpectedState::empty() },
        );
    }
}

#[test]
fn increment_c_for_every_value() {
    for value in 0..=u8::MAX {
        let result = value.wrapping_add(1);
        let z_flag = u8::from(result == 0) << 7;
        let h_flag = u8::from(value & 0x0F == 0x0F) << 5;

        run_test(
            // LD C, <value>; INC C
            &format!("0E{value:02x}0C"),
            &ExpectedState { c: Some(result), f: Some(z_flag | h_flag), ..ExpectedState::empty() },
        );
    }
}

#[test]
fn increment_decrement_register() {
    run_test(
        // SCF; LD B, 0xFF; INC B
        "3706FF04",
        &ExpectedState { b: Some(0x00), f: Some(0xB0), ..ExpectedState::empty() },
    );

    run_test(
        // LD B, 0x01; DEC B
        "060105",
        &ExpectedState { b: Some(0x00), f: Some(0xC0), ..ExpectedState::empty() },
    );

    run_test(
        // LD B, 0x10; DEC B
        "061005",
        &ExpectedState { b: Some(0x0F), f: Some(0x60), ..ExpectedState::empty() },
    );

    run_test(
        // LD HL, 0xC100; LD (HL), 0xFF; INC (HL)
        "2100C136FF34",
        &ExpectedState {
            f: Some(0xA0),
            memory: hash_map! { 0xC100: 0x00 },
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD HL, 0xC100; LD (HL), 0x00; DEC (HL)
        "2100C1360035",
        &ExpectedState {
            f: Some(0x60),
            memory: hash_map! { 0xC100: 0xFF },
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn increment_decrement_register_pair() {
    run_test(
        // LD BC, 0xFFFF; INC BC
        "01FFFF03",
        &ExpectedState { b: Some(0x00), c: Some(0x00), f: Some(0x00), ..ExpectedState::empty() },
    );

    run_test(
        // LD DE, 0x0000; DEC DE
        "1100001B",
        &ExpectedState { d: Some(0xFF), e: Some(0xFF), f: Some(0x00), ..ExpectedState::empty() },
    );

    run_test(
        // LD SP, 0xD000; DEC SP; DEC SP; INC SP
        "3100D03B3B33",
        &ExpectedState { sp: Some(0xCFFF), ..ExpectedState::empty() },
    );
}

#[test]
fn add_hl_register_pair() {
    run_test(
        // LD HL, 0x0FFF; LD BC, 0x0001; ADD HL, BC
        "21FF0F01010009",
        &ExpectedState { h: Some(0x10), l: Some(0x00), f: Some(0x20), ..ExpectedState::empty() },
    );

    run_test(
        // XOR A; LD HL, 0xFFFF; LD DE, 0x0001; ADD HL, DE
        "AF21FFFF11010019",
        &ExpectedState { h: Some(0x00), l: Some(0x00), f: Some(0xB0), ..ExpectedState::empty() },
    );

    run_test(
        // LD HL, 0x8000; ADD HL, HL
        "21008029",
        &ExpectedState { h: Some(0x00), l: Some(0x00), f: Some(0x10), ..ExpectedState::empty() },
    );

    run_test(
        // LD HL, 0x1000; LD SP, 0xF000; ADD HL, SP
        "2100103100F039",
        &ExpectedState { h: Some(0x00), l: Some(0x00), f: Some(0x10), ..ExpectedState::empty() },
    );
}

#[test]
fn add_stack_pointer_immediate() {
    run_test(
        // LD SP, 0xFFF8; ADD SP, 0x08
        "31F8FFE808",
        &ExpectedState { sp: Some(0x0000), f: Some(0x30), ..ExpectedState::empty() },
    );

    run_test(
        // LD SP, 0xD000; ADD SP, -1
        "3100D0E8FF",
        &ExpectedState { sp: Some(0xCFFF), f: Some(0x00), ..ExpectedState::empty() },
    );
}

#[test]
fn decimal_adjust_accumulator() {
    run_test(
        // LD A, 0x15; ADD 0x27; DAA
        "3E15C62727",
        &ExpectedState { a: Some(0x42), f: Some(0x00), ..ExpectedState::empty() },
    );

    run_test(
        // LD A, 0x99; ADD 0x01; DAA
        "3E99C60127",
        &ExpectedState { a: Some(0x00), f: Some(0x90), ..ExpectedState::empty() },
    );

    run_test(
        // LD A, 0x42; SUB 0x15; DAA
        "3E42D61527",
        &ExpectedState { a: Some(0x27), f: Some(0x40), ..ExpectedState::empty() },
    );
}

#[test]
fn complement_and_carry_flag() {
    run_test(
        // LD A, 0x35; CPL
        "3E352F",
        &ExpectedState { a: Some(0xCA), f: Some(0x60), ..ExpectedState::empty() },
    );

    run_test(
        // SCF
        "37",
        &ExpectedState { f: Some(0x10), ..ExpectedState::empty() },
    );

    run_test(
        // SCF; CCF
        "373F",
        &ExpectedState { f: Some(0x00), ..ExpectedState::empty() },
    );

    run_test(
        // XOR A; SUB 0x01; XOR A; SCF
        "AFD601AF37",
        &ExpectedState { a: Some(0x00), f: Some(0x90), ..ExpectedState::empty() },
    );
}

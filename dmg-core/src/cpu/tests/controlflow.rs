use super::{cpu_with_program, hash_map, run_test, ExpectedState, PROGRAM_START};

use std::collections::HashMap;

#[test]
fn jump() {
    run_test(
        concat!(
            "3E55",   // 0x0150: LD A, 0x55
            "C35701", // 0x0152: JP 0x0157
            "3E33",   // 0x0155: LD A, 0x33
            "0677",   // 0x0157: LD B, 0x77
        ),
        &ExpectedState { a: Some(0x55), b: Some(0x77), ..ExpectedState::empty() },
    );

    run_test(
        concat!(
            "C35A01", // 0x0150: JP 0x015A
            "3E33",   // 0x0153: LD A, 0x33
            "0655",   // 0x0155: LD B, 0x55
            "C35F01", // 0x0157: JP 0x015F
            "3E77",   // 0x015A: LD A, 0x77
            "C35501", // 0x015C: JP 0x0155
            "0E88",   // 0x015F: LD C, 0x88
        ),
        &ExpectedState { a: Some(0x77), b: Some(0x55), c: Some(0x88), ..ExpectedState::empty() },
    );
}

#[test]
fn jump_hl() {
    run_test(
        concat!(
            "215801", // 0x0150: LD HL, 0x0158
            "3EAA",   // 0x0153: LD A, 0xAA
            "E9",     // 0x0155: JP HL
            "3ECC",   // 0x0156: LD A, 0xCC
            "06DD",   // 0x0158: LD B, 0xDD
        ),
        &ExpectedState { a: Some(0xAA), b: Some(0xDD), ..ExpectedState::empty() },
    );
}

#[test]
fn jump_conditional() {
    run_test(
        concat!(
            "AF",     // 0x0150: XOR A
            "CA5601", // 0x0151: JP Z, 0x0156
            "3E33",   // 0x0154: LD A, 0x33
            "0677",   // 0x0156: LD B, 0x77
        ),
        &ExpectedState { a: Some(0x00), b: Some(0x77), ..ExpectedState::empty() },
    );

    run_test(
        concat!(
            "AF",     // 0x0150: XOR A
            "C25601", // 0x0151: JP NZ, 0x0156
            "3E33",   // 0x0154: LD A, 0x33
            "0677",   // 0x0156: LD B, 0x77
        ),
        &ExpectedState { a: Some(0x33), b: Some(0x77), ..ExpectedState::empty() },
    );

    run_test(
        concat!(
            "37",     // 0x0150: SCF
            "DA5601", // 0x0151: JP C, 0x0156
            "3E33",   // 0x0154: LD A, 0x33
            "0677",   // 0x0156: LD B, 0x77
        ),
        &ExpectedState { a: Some(0x00), b: Some(0x77), ..ExpectedState::empty() },
    );
}

#[test]
fn relative_jump() {
    run_test(
        concat!(
            "1802", // 0x0150: JR +2
            "3E33", // 0x0152: LD A, 0x33
            "0677", // 0x0154: LD B, 0x77
        ),
        &ExpectedState { a: Some(0x00), b: Some(0x77), ..ExpectedState::empty() },
    );

    run_test(
        concat!(
            "1805",   // 0x0150: JR +5
            "0E88",   // 0x0152: LD C, 0x88
            "C35C01", // 0x0154: JP 0x015C
            "0699",   // 0x0157: LD B, 0x99
            "18F7",   // 0x0159: JR -9
            "00",     // 0x015B: NOP
        ),
        &ExpectedState { b: Some(0x99), c: Some(0x88), ..ExpectedState::empty() },
    );
}

#[test]
fn relative_jump_loop() {
    run_test(
        concat!(
            "0605", // 0x0150: LD B, 0x05
            "0C",   // 0x0152: INC C
            "05",   // 0x0153: DEC B
            "20FC", // 0x0154: JR NZ, -4
        ),
        &ExpectedState { b: Some(0x00), c: Some(0x05), f: Some(0xC0), ..ExpectedState::empty() },
    );
}

#[test]
fn relative_jump_not_zero_lands_after_displacement() {
    for displacement in i8::MIN..=i8::MAX {
        let start = PROGRAM_START + 0x100;
        let mut cpu = cpu_with_program(&[]);
        cpu.address_space_mut().write_address_u8(start, 0x20);
        cpu.address_space_mut().write_address_u8(start + 1, displacement as u8);
        cpu.registers_mut().pc = start;

        assert_eq!(Ok(12), cpu.step());
        assert_eq!(
            start.wrapping_add(2).wrapping_add_signed(displacement.into()),
            cpu.registers().pc,
            "JR NZ, {displacement}"
        );

        cpu.registers_mut().pc = start;
        cpu.registers_mut().set_flags(true, false, false, false);
        assert_eq!(Ok(8), cpu.step());
        assert_eq!(start + 2, cpu.registers().pc);
    }
}

#[test]
fn call_and_return() {
    run_test(
        concat!(
            "CD5801", // 0x0150: CALL 0x0158
            "0611",   // 0x0153: LD B, 0x11
            "C35B01", // 0x0155: JP 0x015B
            "3E42",   // 0x0158: LD A, 0x42
            "C9",     // 0x015A: RET
        ),
        &ExpectedState {
            a: Some(0x42),
            b: Some(0x11),
            sp: Some(0xFFFE),
            // Return address is left behind below SP
            memory: hash_map! { 0xFFFD: 0x01, 0xFFFC: 0x53 },
            ..ExpectedState::empty()
        },
    );

    run_test(
        concat!(
            "AF",     // 0x0150: XOR A
            "C45A01", // 0x0151: CALL NZ, 0x015A
            "CC5A01", // 0x0154: CALL Z, 0x015A
            "C35E01", // 0x0157: JP 0x015E
            "0622",   // 0x015A: LD B, 0x22
            "C0",     // 0x015C: RET NZ
            "C8",     // 0x015D: RET Z
        ),
        &ExpectedState {
            a: Some(0x00),
            b: Some(0x22),
            sp: Some(0xFFFE),
            memory: hash_map! { 0xFFFD: 0x01, 0xFFFC: 0x57 },
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn restart_call() {
    for (opcode, target) in [
        (0xC7, 0x00),
        (0xCF, 0x08),
        (0xD7, 0x10),
        (0xDF, 0x18),
        (0xE7, 0x20),
        (0xEF, 0x28),
        (0xF7, 0x30),
        (0xFF, 0x38),
    ] {
        let mut cpu = cpu_with_program(&[opcode]);

        assert_eq!(Ok(16), cpu.step());
        assert_eq!(target, cpu.registers().pc);
        assert_eq!(0xFFFC, cpu.registers().sp);
        assert_eq!(PROGRAM_START + 1, cpu.address_space().read_address_u16(0xFFFC));
    }
}

#[test]
fn return_from_interrupt_handler() {
    // RETI
    let mut cpu = cpu_with_program(&[0xD9]);
    cpu.push_u16(0x1234);

    assert_eq!(Ok(16), cpu.step());
    assert_eq!(0x1234, cpu.registers().pc);
    assert_eq!(0xFFFE, cpu.registers().sp);
    assert!(cpu.registers().ime);
}

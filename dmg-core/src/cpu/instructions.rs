mod table;

use crate::cpu::registers::{CpuRegister, CpuRegisterPair};
use crate::cpu::Cpu;
use dmg_proc_macros::EnumDisplay;
use std::fmt::{self, Formatter};

pub use table::{extended_descriptor, primary_descriptor, InstructionDescriptor, CB_PREFIX};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumDisplay)]
pub enum JumpCondition {
    NZ,
    Z,
    NC,
    C,
}

impl JumpCondition {
    fn check(self, cpu: &Cpu) -> bool {
        match self {
            Self::NZ => !cpu.registers.zero_flag(),
            Self::Z => cpu.registers.zero_flag(),
            Self::NC => !cpu.registers.carry_flag(),
            Self::C => cpu.registers.carry_flag(),
        }
    }
}

/// Where an 8-bit operand comes from. Immediate and direct operands are read from the bytes that
/// follow the opcode at execution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadTarget {
    Register(CpuRegister),
    Immediate,
    IndirectHL,
    IndirectBC,
    IndirectDE,
    IndirectHLInc,
    IndirectHLDec,
    Direct,
    FFDirect,
    FFIndirectC,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTarget {
    Register(CpuRegister),
    IndirectHL,
    IndirectBC,
    IndirectDE,
    IndirectHLInc,
    IndirectHLDec,
    Direct,
    FFDirect,
    FFIndirectC,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyTarget {
    // The one-byte rotate instructions (RLCA etc.), which always clear Z
    Accumulator,
    Register(CpuRegister),
    IndirectHL,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // LD r, r' / LD r, n / LD r, (HL) / LD (HL), r / LD (HL), n / LD A, (BC) / LD A, (DE) /
    // LD (BC), A / LD (DE), A / LD A, (nn) / LD (nn), A / LDH A, (C) / LDH (C), A / LDH A, (n) /
    // LDH (n), A / LD A, (HL-) / LD (HL-), A / LD A, (HL+) / LD (HL+), A
    Load(WriteTarget, ReadTarget),
    // LD rr, nn
    LoadRegisterPairImmediate(CpuRegisterPair),
    // LD (nn), SP
    LoadDirectStackPointer,
    // LD SP, HL
    LoadStackPointerHL,
    // LD HL, SP+e
    LoadHLStackPointerOffset,
    // PUSH rr
    PushStack(CpuRegisterPair),
    // POP rr
    PopStack(CpuRegisterPair),
    // ADD r / ADD (HL) / ADD n
    Add(ReadTarget),
    // ADC r / ADC (HL) / ADC n
    AddWithCarry(ReadTarget),
    // SUB r / SUB (HL) / SUB n
    Subtract(ReadTarget),
    // SBC r / SBC (HL) / SBC n
    SubtractWithCarry(ReadTarget),
    // CP r / CP (HL) / CP n
    Compare(ReadTarget),
    // INC r / INC (HL)
    Increment(ModifyTarget),
    // DEC r / DEC (HL)
    Decrement(ModifyTarget),
    // AND r / AND (HL) / AND n
    And(ReadTarget),
    // OR r / OR (HL) / OR n
    Or(ReadTarget),
    // XOR r / XOR (HL) / XOR n
    Xor(ReadTarget),
    // ADD HL, rr
    AddHLRegister(CpuRegisterPair),
    // INC rr
    IncRegisterPair(CpuRegisterPair),
    // DEC rr
    DecRegisterPair(CpuRegisterPair),
    // ADD SP, e
    AddSPImmediate,
    // RLCA / RLC r / RLC (HL)
    RotateLeft(ModifyTarget),
    // RLA / RL r / RL (HL)
    RotateLeftThruCarry(ModifyTarget),
    // RRCA / RRC r / RRC (HL)
    RotateRight(ModifyTarget),
    // RRA / RR r / RR (HL)
    RotateRightThruCarry(ModifyTarget),
    // SLA r / SLA (HL)
    ShiftLeft(ModifyTarget),
    // SWAP r / SWAP (HL)
    Swap(ModifyTarget),
    // SRA r / SRA (HL)
    ArithmeticShiftRight(ModifyTarget),
    // SRL r / SRL (HL)
    LogicalShiftRight(ModifyTarget),
    // BIT n, r / BIT n, (HL)
    TestBit(u8, ReadTarget),
    // SET n, r / SET n, (HL)
    SetBit(u8, ModifyTarget),
    // RES n, r / RES n, (HL)
    ResetBit(u8, ModifyTarget),
    // CCF
    ComplementCarryFlag,
    // SCF
    SetCarryFlag,
    // DAA
    DecimalAdjustAccumulator,
    // CPL
    ComplementAccumulator,
    // JP nn
    Jump,
    // JP HL
    JumpHL,
    // JP cc, nn
    JumpCond(JumpCondition),
    // JR e
    RelativeJump,
    // JR cc, e
    RelativeJumpCond(JumpCondition),
    // CALL nn
    Call,
    // CALL cc, nn
    CallCond(JumpCondition),
    // RET
    Return,
    // RET cc
    ReturnCond(JumpCondition),
    // RETI
    ReturnFromInterruptHandler,
    // RST n
    RestartCall(u8),
    // HALT
    Halt,
    // STOP
    Stop,
    // DI
    DisableInterrupts,
    // EI
    EnableInterrupts,
    // NOP
    NoOp,
}

impl ReadTarget {
    /// Number of operand bytes this target adds to the instruction encoding.
    fn operand_len(self) -> u16 {
        match self {
            Self::Immediate | Self::FFDirect => 1,
            Self::Direct => 2,
            _ => 0,
        }
    }

    /// Clock cycles spent on top of the opcode fetch to produce the value.
    fn cycles(self) -> u8 {
        match self {
            Self::Register(_) => 0,
            Self::Immediate
            | Self::IndirectHL
            | Self::IndirectBC
            | Self::IndirectDE
            | Self::IndirectHLInc
            | Self::IndirectHLDec
            | Self::FFIndirectC => 4,
            Self::FFDirect => 8,
            Self::Direct => 12,
        }
    }

    fn read_value(self, cpu: &mut Cpu) -> u8 {
        match self {
            Self::Register(r) => cpu.registers.read_register(r),
            Self::Immediate => cpu.read_immediate_u8(),
            Self::IndirectHL => cpu.address_space.read_address_u8(cpu.registers.hl()),
            Self::IndirectBC => cpu.address_space.read_address_u8(cpu.registers.bc()),
            Self::IndirectDE => cpu.address_space.read_address_u8(cpu.registers.de()),
            Self::IndirectHLInc => {
                let hl = cpu.registers.hl();
                cpu.registers.set_hl(hl.wrapping_add(1));
                cpu.address_space.read_address_u8(hl)
            }
            Self::IndirectHLDec => {
                let hl = cpu.registers.hl();
                cpu.registers.set_hl(hl.wrapping_sub(1));
                cpu.address_space.read_address_u8(hl)
            }
            Self::Direct => {
                let address = cpu.read_immediate_u16();
                cpu.address_space.read_address_u8(address)
            }
            Self::FFDirect => {
                let address = u16::from_be_bytes([0xFF, cpu.read_immediate_u8()]);
                cpu.address_space.read_address_u8(address)
            }
            Self::FFIndirectC => {
                let address = u16::from_be_bytes([0xFF, cpu.registers.c]);
                cpu.address_space.read_address_u8(address)
            }
        }
    }
}

impl WriteTarget {
    fn operand_len(self) -> u16 {
        match self {
            Self::FFDirect => 1,
            Self::Direct => 2,
            _ => 0,
        }
    }

    fn cycles(self) -> u8 {
        match self {
            Self::Register(_) => 0,
            Self::IndirectHL
            | Self::IndirectBC
            | Self::IndirectDE
            | Self::IndirectHLInc
            | Self::IndirectHLDec
            | Self::FFIndirectC => 4,
            Self::FFDirect => 8,
            Self::Direct => 12,
        }
    }

    fn write_value(self, cpu: &mut Cpu, value: u8) {
        match self {
            Self::Register(r) => {
                cpu.registers.set_register(r, value);
            }
            Self::IndirectHL => {
                cpu.address_space.write_address_u8(cpu.registers.hl(), value);
            }
            Self::IndirectBC => {
                cpu.address_space.write_address_u8(cpu.registers.bc(), value);
            }
            Self::IndirectDE => {
                cpu.address_space.write_address_u8(cpu.registers.de(), value);
            }
            Self::IndirectHLInc => {
                let hl = cpu.registers.hl();
                cpu.address_space.write_address_u8(hl, value);
                cpu.registers.set_hl(hl.wrapping_add(1));
            }
            Self::IndirectHLDec => {
                let hl = cpu.registers.hl();
                cpu.address_space.write_address_u8(hl, value);
                cpu.registers.set_hl(hl.wrapping_sub(1));
            }
            Self::Direct => {
                let address = cpu.read_immediate_u16();
                cpu.address_space.write_address_u8(address, value);
            }
            Self::FFDirect => {
                let address = u16::from_be_bytes([0xFF, cpu.read_immediate_u8()]);
                cpu.address_space.write_address_u8(address, value);
            }
            Self::FFIndirectC => {
                let address = u16::from_be_bytes([0xFF, cpu.registers.c]);
                cpu.address_space.write_address_u8(address, value);
            }
        }
    }
}

impl ModifyTarget {
    fn read_value(self, cpu: &Cpu) -> u8 {
        match self {
            Self::Accumulator => cpu.registers.accumulator,
            Self::Register(r) => cpu.registers.read_register(r),
            Self::IndirectHL => cpu.address_space.read_address_u8(cpu.registers.hl()),
        }
    }

    fn write_value(self, cpu: &mut Cpu, value: u8) {
        match self {
            Self::Accumulator => {
                cpu.registers.accumulator = value;
            }
            Self::Register(r) => {
                cpu.registers.set_register(r, value);
            }
            Self::IndirectHL => {
                cpu.address_space.write_address_u8(cpu.registers.hl(), value);
            }
        }
    }
}

impl Instruction {
    /// Size of the full encoding in bytes, counting the CB prefix and any operand bytes.
    pub fn encoded_len(self) -> u16 {
        match self {
            Self::Load(write_target, read_target) => {
                1 + read_target.operand_len() + write_target.operand_len()
            }
            Self::Add(read_target)
            | Self::AddWithCarry(read_target)
            | Self::Subtract(read_target)
            | Self::SubtractWithCarry(read_target)
            | Self::Compare(read_target)
            | Self::And(read_target)
            | Self::Or(read_target)
            | Self::Xor(read_target) => 1 + read_target.operand_len(),
            Self::LoadRegisterPairImmediate(_)
            | Self::LoadDirectStackPointer
            | Self::Jump
            | Self::JumpCond(_)
            | Self::Call
            | Self::CallCond(_) => 3,
            Self::LoadHLStackPointerOffset
            | Self::AddSPImmediate
            | Self::RelativeJump
            | Self::RelativeJumpCond(_)
            | Self::Stop
            | Self::TestBit(..)
            | Self::SetBit(..)
            | Self::ResetBit(..) => 2,
            Self::RotateLeft(modify_target)
            | Self::RotateLeftThruCarry(modify_target)
            | Self::RotateRight(modify_target)
            | Self::RotateRightThruCarry(modify_target)
            | Self::ShiftLeft(modify_target)
            | Self::Swap(modify_target)
            | Self::ArithmeticShiftRight(modify_target)
            | Self::LogicalShiftRight(modify_target) => {
                if modify_target == ModifyTarget::Accumulator { 1 } else { 2 }
            }
            _ => 1,
        }
    }

    /// Execute the instruction whose opcode byte sits at the current PC. Operand bytes are read
    /// relative to PC, and PC is left pointing at the next instruction to fetch. Returns the
    /// number of clock cycles consumed along the path actually taken.
    pub fn execute(self, cpu: &mut Cpu) -> u8 {
        match self {
            Self::Load(write_target, read_target) => {
                let value = read_target.read_value(cpu);
                write_target.write_value(cpu, value);
                cpu.advance_pc(1 + read_target.operand_len() + write_target.operand_len());
                4 + read_target.cycles() + write_target.cycles()
            }
            Self::LoadRegisterPairImmediate(rr) => {
                let nn = cpu.read_immediate_u16();
                cpu.registers.set_register_pair(rr, nn);
                cpu.advance_pc(3);
                12
            }
            Self::LoadDirectStackPointer => {
                let nn = cpu.read_immediate_u16();
                cpu.address_space.write_address_u16(nn, cpu.registers.sp);
                cpu.advance_pc(3);
                20
            }
            Self::LoadStackPointerHL => {
                cpu.registers.sp = cpu.registers.hl();
                cpu.advance_pc(1);
                8
            }
            Self::LoadHLStackPointerOffset => {
                let e = cpu.read_immediate_u8() as i8;
                let (value, h_flag, c_flag) = add_sp_offset(cpu.registers.sp, e);
                cpu.registers.set_hl(value);
                cpu.registers.set_flags(false, false, h_flag, c_flag);
                cpu.advance_pc(2);
                12
            }
            Self::PushStack(rr) => {
                let value = cpu.registers.read_register_pair(rr);
                cpu.push_u16(value);
                cpu.advance_pc(1);
                16
            }
            Self::PopStack(rr) => {
                let value = cpu.pop_u16();
                cpu.registers.set_register_pair(rr, value);
                cpu.advance_pc(1);
                12
            }
            Self::Add(read_target) => Self::execute_alu(cpu, read_target, AluOp::Add),
            Self::AddWithCarry(read_target) => {
                Self::execute_alu(cpu, read_target, AluOp::AddWithCarry)
            }
            Self::Subtract(read_target) => Self::execute_alu(cpu, read_target, AluOp::Subtract),
            Self::SubtractWithCarry(read_target) => {
                Self::execute_alu(cpu, read_target, AluOp::SubtractWithCarry)
            }
            Self::Compare(read_target) => Self::execute_alu(cpu, read_target, AluOp::Compare),
            Self::And(read_target) => Self::execute_alu(cpu, read_target, AluOp::And),
            Self::Or(read_target) => Self::execute_alu(cpu, read_target, AluOp::Or),
            Self::Xor(read_target) => Self::execute_alu(cpu, read_target, AluOp::Xor),
            Self::Increment(modify_target) => {
                let value = modify_target.read_value(cpu);
                let sum = value.wrapping_add(1);
                modify_target.write_value(cpu, sum);
                cpu.registers.set_some_flags(
                    Some(sum == 0),
                    Some(false),
                    Some(increment_half_carry(value)),
                    None,
                );
                cpu.advance_pc(1);
                if modify_target == ModifyTarget::IndirectHL { 12 } else { 4 }
            }
            Self::Decrement(modify_target) => {
                let value = modify_target.read_value(cpu);
                let difference = value.wrapping_sub(1);
                modify_target.write_value(cpu, difference);
                cpu.registers.set_some_flags(
                    Some(difference == 0),
                    Some(true),
                    Some(decrement_half_carry(value)),
                    None,
                );
                cpu.advance_pc(1);
                if modify_target == ModifyTarget::IndirectHL { 12 } else { 4 }
            }
            Self::AddHLRegister(rr) => {
                let (sum, h_flag, c_flag) =
                    add_u16(cpu.registers.hl(), cpu.registers.read_register_pair(rr));
                cpu.registers.set_hl(sum);
                cpu.registers.set_some_flags(None, Some(false), Some(h_flag), Some(c_flag));
                cpu.advance_pc(1);
                8
            }
            Self::IncRegisterPair(rr) => {
                let value = cpu.registers.read_register_pair(rr).wrapping_add(1);
                cpu.registers.set_register_pair(rr, value);
                cpu.advance_pc(1);
                8
            }
            Self::DecRegisterPair(rr) => {
                let value = cpu.registers.read_register_pair(rr).wrapping_sub(1);
                cpu.registers.set_register_pair(rr, value);
                cpu.advance_pc(1);
                8
            }
            Self::AddSPImmediate => {
                let e = cpu.read_immediate_u8() as i8;
                let (value, h_flag, c_flag) = add_sp_offset(cpu.registers.sp, e);
                cpu.registers.sp = value;
                cpu.registers.set_flags(false, false, h_flag, c_flag);
                cpu.advance_pc(2);
                16
            }
            Self::RotateLeft(modify_target) => {
                Self::execute_shift(cpu, modify_target, |value, _| rotate_left(value))
            }
            Self::RotateLeftThruCarry(modify_target) => {
                Self::execute_shift(cpu, modify_target, rotate_left_thru_carry)
            }
            Self::RotateRight(modify_target) => {
                Self::execute_shift(cpu, modify_target, |value, _| rotate_right(value))
            }
            Self::RotateRightThruCarry(modify_target) => {
                Self::execute_shift(cpu, modify_target, rotate_right_thru_carry)
            }
            Self::ShiftLeft(modify_target) => {
                Self::execute_shift(cpu, modify_target, |value, _| (value << 1, value & 0x80 != 0))
            }
            Self::ArithmeticShiftRight(modify_target) => {
                Self::execute_shift(cpu, modify_target, |value, _| {
                    ((value >> 1) | (value & 0x80), value & 0x01 != 0)
                })
            }
            Self::LogicalShiftRight(modify_target) => {
                Self::execute_shift(cpu, modify_target, |value, _| (value >> 1, value & 0x01 != 0))
            }
            Self::Swap(modify_target) => {
                Self::execute_shift(cpu, modify_target, |value, _| (value.rotate_left(4), false))
            }
            Self::TestBit(bit, read_target) => {
                let value = read_target.read_value(cpu);
                cpu.registers.set_some_flags(
                    Some(value & (1 << bit) == 0),
                    Some(false),
                    Some(true),
                    None,
                );
                cpu.advance_pc(2);
                if read_target == ReadTarget::IndirectHL { 12 } else { 8 }
            }
            Self::SetBit(bit, modify_target) => {
                let value = modify_target.read_value(cpu) | (1 << bit);
                modify_target.write_value(cpu, value);
                cpu.advance_pc(2);
                if modify_target == ModifyTarget::IndirectHL { 16 } else { 8 }
            }
            Self::ResetBit(bit, modify_target) => {
                let value = modify_target.read_value(cpu) & !(1 << bit);
                modify_target.write_value(cpu, value);
                cpu.advance_pc(2);
                if modify_target == ModifyTarget::IndirectHL { 16 } else { 8 }
            }
            Self::ComplementCarryFlag => {
                let c_flag = cpu.registers.carry_flag();
                cpu.registers.set_some_flags(None, Some(false), Some(false), Some(!c_flag));
                cpu.advance_pc(1);
                4
            }
            Self::SetCarryFlag => {
                cpu.registers.set_some_flags(None, Some(false), Some(false), Some(true));
                cpu.advance_pc(1);
                4
            }
            Self::DecimalAdjustAccumulator => {
                let (value, c_flag) = decimal_adjust(
                    cpu.registers.accumulator,
                    cpu.registers.subtract_flag(),
                    cpu.registers.half_carry_flag(),
                    cpu.registers.carry_flag(),
                );
                cpu.registers.accumulator = value;
                cpu.registers.set_some_flags(Some(value == 0), None, Some(false), Some(c_flag));
                cpu.advance_pc(1);
                4
            }
            Self::ComplementAccumulator => {
                cpu.registers.accumulator = !cpu.registers.accumulator;
                cpu.registers.set_some_flags(None, Some(true), Some(true), None);
                cpu.advance_pc(1);
                4
            }
            Self::Jump => {
                cpu.registers.pc = cpu.read_immediate_u16();
                16
            }
            Self::JumpHL => {
                cpu.registers.pc = cpu.registers.hl();
                4
            }
            Self::JumpCond(cc) => {
                if cc.check(cpu) {
                    cpu.registers.pc = cpu.read_immediate_u16();
                    16
                } else {
                    cpu.advance_pc(3);
                    12
                }
            }
            Self::RelativeJump => {
                cpu.registers.pc = relative_jump_target(cpu);
                12
            }
            Self::RelativeJumpCond(cc) => {
                if cc.check(cpu) {
                    cpu.registers.pc = relative_jump_target(cpu);
                    12
                } else {
                    cpu.advance_pc(2);
                    8
                }
            }
            Self::Call => {
                let nn = cpu.read_immediate_u16();
                cpu.push_u16(cpu.registers.pc.wrapping_add(3));
                cpu.registers.pc = nn;
                24
            }
            Self::CallCond(cc) => {
                if cc.check(cpu) {
                    let nn = cpu.read_immediate_u16();
                    cpu.push_u16(cpu.registers.pc.wrapping_add(3));
                    cpu.registers.pc = nn;
                    24
                } else {
                    cpu.advance_pc(3);
                    12
                }
            }
            Self::Return => {
                cpu.registers.pc = cpu.pop_u16();
                16
            }
            Self::ReturnCond(cc) => {
                if cc.check(cpu) {
                    cpu.registers.pc = cpu.pop_u16();
                    20
                } else {
                    cpu.advance_pc(1);
                    8
                }
            }
            Self::ReturnFromInterruptHandler => {
                cpu.registers.pc = cpu.pop_u16();
                cpu.registers.ime = true;
                cpu.registers.interrupt_delay = false;
                16
            }
            Self::RestartCall(rst_address) => {
                cpu.push_u16(cpu.registers.pc.wrapping_add(1));
                cpu.registers.pc = rst_address.into();
                16
            }
            Self::Halt => {
                cpu.registers.halted = true;
                cpu.advance_pc(1);
                4
            }
            Self::Stop => {
                // STOP is encoded as 10 00; the second byte is skipped
                cpu.registers.halted = true;
                cpu.advance_pc(2);
                4
            }
            Self::DisableInterrupts => {
                cpu.registers.ime = false;
                cpu.registers.interrupt_delay = false;
                cpu.advance_pc(1);
                4
            }
            Self::EnableInterrupts => {
                // IME is set once the following instruction has executed
                cpu.registers.interrupt_delay = true;
                cpu.advance_pc(1);
                4
            }
            Self::NoOp => {
                cpu.advance_pc(1);
                4
            }
        }
    }

    fn execute_alu(cpu: &mut Cpu, read_target: ReadTarget, op: AluOp) -> u8 {
        let value = read_target.read_value(cpu);
        let a = cpu.registers.accumulator;
        let carry = cpu.registers.carry_flag();

        match op {
            AluOp::Add | AluOp::AddWithCarry => {
                let (sum, c_flag, h_flag) = add(a, value, op == AluOp::AddWithCarry && carry);
                cpu.registers.accumulator = sum;
                cpu.registers.set_flags(sum == 0, false, h_flag, c_flag);
            }
            AluOp::Subtract | AluOp::SubtractWithCarry | AluOp::Compare => {
                let (difference, c_flag, h_flag) =
                    sub(a, value, op == AluOp::SubtractWithCarry && carry);
                if op != AluOp::Compare {
                    cpu.registers.accumulator = difference;
                }
                cpu.registers.set_flags(difference == 0, true, h_flag, c_flag);
            }
            AluOp::And => {
                let result = a & value;
                cpu.registers.accumulator = result;
                cpu.registers.set_flags(result == 0, false, true, false);
            }
            AluOp::Or => {
                let result = a | value;
                cpu.registers.accumulator = result;
                cpu.registers.set_flags(result == 0, false, false, false);
            }
            AluOp::Xor => {
                let result = a ^ value;
                cpu.registers.accumulator = result;
                cpu.registers.set_flags(result == 0, false, false, false);
            }
        }

        cpu.advance_pc(1 + read_target.operand_len());
        4 + read_target.cycles()
    }

    /// Shared body for the rotate/shift/swap family. `op` maps (value, carry in) to
    /// (new value, carry out).
    fn execute_shift<F>(cpu: &mut Cpu, modify_target: ModifyTarget, op: F) -> u8
    where
        F: FnOnce(u8, bool) -> (u8, bool),
    {
        let value = modify_target.read_value(cpu);
        let (result, c_flag) = op(value, cpu.registers.carry_flag());
        modify_target.write_value(cpu, result);

        match modify_target {
            ModifyTarget::Accumulator => {
                cpu.registers.set_flags(false, false, false, c_flag);
                cpu.advance_pc(1);
                4
            }
            ModifyTarget::Register(_) => {
                cpu.registers.set_flags(result == 0, false, false, c_flag);
                cpu.advance_pc(2);
                8
            }
            ModifyTarget::IndirectHL => {
                cpu.registers.set_flags(result == 0, false, false, c_flag);
                cpu.advance_pc(2);
                16
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AluOp {
    Add,
    AddWithCarry,
    Subtract,
    SubtractWithCarry,
    Compare,
    And,
    Or,
    Xor,
}

fn relative_jump_target(cpu: &Cpu) -> u16 {
    let e = cpu.read_immediate_u8() as i8;
    // Relative to the address following the 2-byte JR instruction
    cpu.registers.pc.wrapping_add(2).wrapping_add_signed(e.into())
}

/// 8-bit add with carry in. Returns (sum, carry out of bit 7, carry out of bit 3).
pub fn add(l_value: u8, r_value: u8, carry: bool) -> (u8, bool, bool) {
    let carry = u8::from(carry);
    let sum = u16::from(l_value) + u16::from(r_value) + u16::from(carry);
    let h_flag = (l_value & 0x0F) + (r_value & 0x0F) + carry > 0x0F;

    (sum as u8, sum > 0xFF, h_flag)
}

/// 8-bit subtract with borrow in. Returns (difference, borrow out of bit 7, borrow out of bit 3).
pub fn sub(l_value: u8, r_value: u8, carry: bool) -> (u8, bool, bool) {
    let carry = u8::from(carry);
    let difference = l_value.wrapping_sub(r_value).wrapping_sub(carry);
    let c_flag = u16::from(l_value) < u16::from(r_value) + u16::from(carry);
    let h_flag = (l_value & 0x0F) < (r_value & 0x0F) + carry;

    (difference, c_flag, h_flag)
}

/// Half-carry produced by incrementing `value`.
pub fn increment_half_carry(value: u8) -> bool {
    value & 0x0F == 0x0F
}

/// Half-borrow produced by decrementing `value`.
pub fn decrement_half_carry(value: u8) -> bool {
    value & 0x0F == 0x00
}

/// 16-bit add for ADD HL, rr. Returns (sum, carry out of bit 11, carry out of bit 15).
pub fn add_u16(l_value: u16, r_value: u16) -> (u16, bool, bool) {
    let (sum, c_flag) = l_value.overflowing_add(r_value);
    let h_flag = (l_value & 0x0FFF) + (r_value & 0x0FFF) > 0x0FFF;

    (sum, h_flag, c_flag)
}

/// SP plus a signed offset, as done by ADD SP, e and LD HL, SP+e. The flags come from an
/// unsigned add of the offset byte to the low byte of SP.
pub fn add_sp_offset(sp: u16, e: i8) -> (u16, bool, bool) {
    let offset = e as u8;
    let h_flag = (sp & 0x000F) + u16::from(offset & 0x0F) > 0x000F;
    let c_flag = (sp & 0x00FF) + u16::from(offset) > 0x00FF;

    (sp.wrapping_add_signed(e.into()), h_flag, c_flag)
}

fn decimal_adjust(value: u8, n_flag: bool, h_flag: bool, c_flag: bool) -> (u8, bool) {
    if !n_flag {
        let mut adjust = 0x00;
        let mut carry = c_flag;
        if c_flag || value > 0x99 {
            adjust |= 0x60;
            carry = true;
        }
        if h_flag || value & 0x0F > 0x09 {
            adjust |= 0x06;
        }
        (value.wrapping_add(adjust), carry)
    } else {
        let mut adjust = 0x00;
        if c_flag {
            adjust |= 0x60;
        }
        if h_flag {
            adjust |= 0x06;
        }
        (value.wrapping_sub(adjust), c_flag)
    }
}

fn rotate_left(value: u8) -> (u8, bool) {
    (value.rotate_left(1), value & 0x80 != 0)
}

fn rotate_left_thru_carry(value: u8, carry: bool) -> (u8, bool) {
    ((value << 1) | u8::from(carry), value & 0x80 != 0)
}

fn rotate_right(value: u8) -> (u8, bool) {
    (value.rotate_right(1), value & 0x01 != 0)
}

fn rotate_right_thru_carry(value: u8, carry: bool) -> (u8, bool) {
    ((value >> 1) | (u8::from(carry) << 7), value & 0x01 != 0)
}

impl fmt::Display for ReadTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register(r) => write!(f, "{r}"),
            Self::Immediate => write!(f, "d8"),
            Self::IndirectHL => write!(f, "(HL)"),
            Self::IndirectBC => write!(f, "(BC)"),
            Self::IndirectDE => write!(f, "(DE)"),
            Self::IndirectHLInc => write!(f, "(HL+)"),
            Self::IndirectHLDec => write!(f, "(HL-)"),
            Self::Direct => write!(f, "(a16)"),
            Self::FFDirect => write!(f, "(a8)"),
            Self::FFIndirectC => write!(f, "(C)"),
        }
    }
}

impl fmt::Display for WriteTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register(r) => write!(f, "{r}"),
            Self::IndirectHL => write!(f, "(HL)"),
            Self::IndirectBC => write!(f, "(BC)"),
            Self::IndirectDE => write!(f, "(DE)"),
            Self::IndirectHLInc => write!(f, "(HL+)"),
            Self::IndirectHLDec => write!(f, "(HL-)"),
            Self::Direct => write!(f, "(a16)"),
            Self::FFDirect => write!(f, "(a8)"),
            Self::FFIndirectC => write!(f, "(C)"),
        }
    }
}

impl fmt::Display for ModifyTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accumulator => write!(f, "A"),
            Self::Register(r) => write!(f, "{r}"),
            Self::IndirectHL => write!(f, "(HL)"),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Load(w, r @ (ReadTarget::FFDirect | ReadTarget::FFIndirectC)) => {
                write!(f, "LDH {w}, {r}")
            }
            Self::Load(w @ (WriteTarget::FFDirect | WriteTarget::FFIndirectC), r) => {
                write!(f, "LDH {w}, {r}")
            }
            Self::Load(w, r) => write!(f, "LD {w}, {r}"),
            Self::LoadRegisterPairImmediate(rr) => write!(f, "LD {rr}, d16"),
            Self::LoadDirectStackPointer => write!(f, "LD (a16), SP"),
            Self::LoadStackPointerHL => write!(f, "LD SP, HL"),
            Self::LoadHLStackPointerOffset => write!(f, "LD HL, SP+r8"),
            Self::PushStack(rr) => write!(f, "PUSH {rr}"),
            Self::PopStack(rr) => write!(f, "POP {rr}"),
            Self::Add(r) => write!(f, "ADD A, {r}"),
            Self::AddWithCarry(r) => write!(f, "ADC A, {r}"),
            Self::Subtract(r) => write!(f, "SUB {r}"),
            Self::SubtractWithCarry(r) => write!(f, "SBC A, {r}"),
            Self::Compare(r) => write!(f, "CP {r}"),
            Self::Increment(m) => write!(f, "INC {m}"),
            Self::Decrement(m) => write!(f, "DEC {m}"),
            Self::And(r) => write!(f, "AND {r}"),
            Self::Or(r) => write!(f, "OR {r}"),
            Self::Xor(r) => write!(f, "XOR {r}"),
            Self::AddHLRegister(rr) => write!(f, "ADD HL, {rr}"),
            Self::IncRegisterPair(rr) => write!(f, "INC {rr}"),
            Self::DecRegisterPair(rr) => write!(f, "DEC {rr}"),
            Self::AddSPImmediate => write!(f, "ADD SP, r8"),
            Self::RotateLeft(ModifyTarget::Accumulator) => write!(f, "RLCA"),
            Self::RotateLeftThruCarry(ModifyTarget::Accumulator) => write!(f, "RLA"),
            Self::RotateRight(ModifyTarget::Accumulator) => write!(f, "RRCA"),
            Self::RotateRightThruCarry(ModifyTarget::Accumulator) => write!(f, "RRA"),
            Self::RotateLeft(m) => write!(f, "RLC {m}"),
            Self::RotateLeftThruCarry(m) => write!(f, "RL {m}"),
            Self::RotateRight(m) => write!(f, "RRC {m}"),
            Self::RotateRightThruCarry(m) => write!(f, "RR {m}"),
            Self::ShiftLeft(m) => write!(f, "SLA {m}"),
            Self::Swap(m) => write!(f, "SWAP {m}"),
            Self::ArithmeticShiftRight(m) => write!(f, "SRA {m}"),
            Self::LogicalShiftRight(m) => write!(f, "SRL {m}"),
            Self::TestBit(bit, r) => write!(f, "BIT {bit}, {r}"),
            Self::SetBit(bit, m) => write!(f, "SET {bit}, {m}"),
            Self::ResetBit(bit, m) => write!(f, "RES {bit}, {m}"),
            Self::ComplementCarryFlag => write!(f, "CCF"),
            Self::SetCarryFlag => write!(f, "SCF"),
            Self::DecimalAdjustAccumulator => write!(f, "DAA"),
            Self::ComplementAccumulator => write!(f, "CPL"),
            Self::Jump => write!(f, "JP a16"),
            Self::JumpHL => write!(f, "JP HL"),
            Self::JumpCond(cc) => write!(f, "JP {cc}, a16"),
            Self::RelativeJump => write!(f, "JR r8"),
            Self::RelativeJumpCond(cc) => write!(f, "JR {cc}, r8"),
            Self::Call => write!(f, "CALL a16"),
            Self::CallCond(cc) => write!(f, "CALL {cc}, a16"),
            Self::Return => write!(f, "RET"),
            Self::ReturnCond(cc) => write!(f, "RET {cc}"),
            Self::ReturnFromInterruptHandler => write!(f, "RETI"),
            Self::RestartCall(n) => write!(f, "RST {n:02X}H"),
            Self::Halt => write!(f, "HALT"),
            Self::Stop => write!(f, "STOP"),
            Self::DisableInterrupts => write!(f, "DI"),
            Self::EnableInterrupts => write!(f, "EI"),
            Self::NoOp => write!(f, "NOP"),
        }
    }
}

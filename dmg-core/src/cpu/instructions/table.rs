use crate::cpu::instructions::{Instruction, JumpCondition, ModifyTarget, ReadTarget, WriteTarget};
use crate::cpu::registers::{CpuRegister, CpuRegisterPair};
use once_cell::sync::Lazy;

/// Prefix byte that selects the extended (bit manipulation) opcode table.
pub const CB_PREFIX: u8 = 0xCB;

/// Static metadata for one opcode: the byte itself, a human-readable mnemonic, whether the
/// opcode is flagged illegal, and the operation bound to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionDescriptor {
    pub opcode: u8,
    pub mnemonic: String,
    pub illegal: bool,
    pub instruction: Instruction,
}

impl InstructionDescriptor {
    fn new(opcode: u8, instruction: Instruction) -> Self {
        Self { opcode, mnemonic: instruction.to_string(), illegal: false, instruction }
    }
}

static PRIMARY_TABLE: Lazy<[Option<InstructionDescriptor>; 256]> = Lazy::new(|| {
    std::array::from_fn(|i| {
        let opcode = i as u8;
        decode_primary(opcode).map(|instruction| InstructionDescriptor::new(opcode, instruction))
    })
});

static EXTENDED_TABLE: Lazy<[Option<InstructionDescriptor>; 256]> = Lazy::new(|| {
    std::array::from_fn(|i| {
        let opcode = i as u8;
        Some(InstructionDescriptor::new(opcode, decode_extended(opcode)))
    })
});

/// Look up an unprefixed opcode. Returns `None` for the CB prefix itself and for the opcodes
/// the SM83 leaves undefined.
pub fn primary_descriptor(opcode: u8) -> Option<&'static InstructionDescriptor> {
    PRIMARY_TABLE[usize::from(opcode)].as_ref()
}

/// Look up the opcode that follows a CB prefix.
pub fn extended_descriptor(opcode: u8) -> Option<&'static InstructionDescriptor> {
    EXTENDED_TABLE[usize::from(opcode)].as_ref()
}

const A: ReadTarget = ReadTarget::Register(CpuRegister::A);
const WRITE_A: WriteTarget = WriteTarget::Register(CpuRegister::A);

fn decode_primary(opcode: u8) -> Option<Instruction> {
    let instruction = match opcode {
        0x00 => Instruction::NoOp,
        0x01 | 0x11 | 0x21 | 0x31 => {
            Instruction::LoadRegisterPairImmediate(register_pair_for_other_ops(opcode))
        }
        0x02 => Instruction::Load(WriteTarget::IndirectBC, A),
        0x03 | 0x13 | 0x23 | 0x33 => Instruction::IncRegisterPair(register_pair_for_other_ops(opcode)),
        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
            Instruction::Increment(mid_modify_target(opcode))
        }
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
            Instruction::Decrement(mid_modify_target(opcode))
        }
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
            let write_target = CpuRegister::from_mid_opcode_bits(opcode)
                .map_or(WriteTarget::IndirectHL, WriteTarget::Register);
            Instruction::Load(write_target, ReadTarget::Immediate)
        }
        0x07 => Instruction::RotateLeft(ModifyTarget::Accumulator),
        0x08 => Instruction::LoadDirectStackPointer,
        0x09 | 0x19 | 0x29 | 0x39 => Instruction::AddHLRegister(register_pair_for_other_ops(opcode)),
        0x0A => Instruction::Load(WRITE_A, ReadTarget::IndirectBC),
        0x0B | 0x1B | 0x2B | 0x3B => Instruction::DecRegisterPair(register_pair_for_other_ops(opcode)),
        0x0F => Instruction::RotateRight(ModifyTarget::Accumulator),
        0x10 => Instruction::Stop,
        0x12 => Instruction::Load(WriteTarget::IndirectDE, A),
        0x17 => Instruction::RotateLeftThruCarry(ModifyTarget::Accumulator),
        0x18 => Instruction::RelativeJump,
        0x1A => Instruction::Load(WRITE_A, ReadTarget::IndirectDE),
        0x1F => Instruction::RotateRightThruCarry(ModifyTarget::Accumulator),
        0x20 | 0x28 | 0x30 | 0x38 => Instruction::RelativeJumpCond(parse_jump_condition(opcode)),
        0x22 => Instruction::Load(WriteTarget::IndirectHLInc, A),
        0x27 => Instruction::DecimalAdjustAccumulator,
        0x2A => Instruction::Load(WRITE_A, ReadTarget::IndirectHLInc),
        0x2F => Instruction::ComplementAccumulator,
        0x32 => Instruction::Load(WriteTarget::IndirectHLDec, A),
        0x37 => Instruction::SetCarryFlag,
        0x3A => Instruction::Load(WRITE_A, ReadTarget::IndirectHLDec),
        0x3F => Instruction::ComplementCarryFlag,
        0x76 => Instruction::Halt,
        0x40..=0x7F => {
            let write_target = CpuRegister::from_mid_opcode_bits(opcode)
                .map_or(WriteTarget::IndirectHL, WriteTarget::Register);
            Instruction::Load(write_target, low_read_target(opcode))
        }
        0x80..=0x87 => Instruction::Add(low_read_target(opcode)),
        0x88..=0x8F => Instruction::AddWithCarry(low_read_target(opcode)),
        0x90..=0x97 => Instruction::Subtract(low_read_target(opcode)),
        0x98..=0x9F => Instruction::SubtractWithCarry(low_read_target(opcode)),
        0xA0..=0xA7 => Instruction::And(low_read_target(opcode)),
        0xA8..=0xAF => Instruction::Xor(low_read_target(opcode)),
        0xB0..=0xB7 => Instruction::Or(low_read_target(opcode)),
        0xB8..=0xBF => Instruction::Compare(low_read_target(opcode)),
        0xC0 | 0xC8 | 0xD0 | 0xD8 => Instruction::ReturnCond(parse_jump_condition(opcode)),
        0xC1 | 0xD1 | 0xE1 | 0xF1 => Instruction::PopStack(register_pair_for_push_pop(opcode)),
        0xC2 | 0xCA | 0xD2 | 0xDA => Instruction::JumpCond(parse_jump_condition(opcode)),
        0xC3 => Instruction::Jump,
        0xC4 | 0xCC | 0xD4 | 0xDC => Instruction::CallCond(parse_jump_condition(opcode)),
        0xC5 | 0xD5 | 0xE5 | 0xF5 => Instruction::PushStack(register_pair_for_push_pop(opcode)),
        0xC6 => Instruction::Add(ReadTarget::Immediate),
        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
            Instruction::RestartCall(opcode & 0x38)
        }
        0xC9 => Instruction::Return,
        0xCD => Instruction::Call,
        0xCE => Instruction::AddWithCarry(ReadTarget::Immediate),
        0xD6 => Instruction::Subtract(ReadTarget::Immediate),
        0xD9 => Instruction::ReturnFromInterruptHandler,
        0xDE => Instruction::SubtractWithCarry(ReadTarget::Immediate),
        0xE0 => Instruction::Load(WriteTarget::FFDirect, A),
        0xE2 => Instruction::Load(WriteTarget::FFIndirectC, A),
        0xE6 => Instruction::And(ReadTarget::Immediate),
        0xE8 => Instruction::AddSPImmediate,
        0xE9 => Instruction::JumpHL,
        0xEA => Instruction::Load(WriteTarget::Direct, A),
        0xEE => Instruction::Xor(ReadTarget::Immediate),
        0xF0 => Instruction::Load(WRITE_A, ReadTarget::FFDirect),
        0xF2 => Instruction::Load(WRITE_A, ReadTarget::FFIndirectC),
        0xF3 => Instruction::DisableInterrupts,
        0xF6 => Instruction::Or(ReadTarget::Immediate),
        0xF8 => Instruction::LoadHLStackPointerOffset,
        0xF9 => Instruction::LoadStackPointerHL,
        0xFA => Instruction::Load(WRITE_A, ReadTarget::Direct),
        0xFB => Instruction::EnableInterrupts,
        0xFE => Instruction::Compare(ReadTarget::Immediate),
        // CB is a prefix, the rest are undefined on the SM83
        0xCB | 0xD3 | 0xDB | 0xDD | 0xE3 | 0xE4 | 0xEB | 0xEC | 0xED | 0xF4 | 0xFC | 0xFD => {
            return None;
        }
    };

    Some(instruction)
}

fn decode_extended(opcode: u8) -> Instruction {
    let modify_target = CpuRegister::from_low_opcode_bits(opcode)
        .map_or(ModifyTarget::IndirectHL, ModifyTarget::Register);
    let bit = (opcode & 0x38) >> 3;

    match opcode {
        0x00..=0x07 => Instruction::RotateLeft(modify_target),
        0x08..=0x0F => Instruction::RotateRight(modify_target),
        0x10..=0x17 => Instruction::RotateLeftThruCarry(modify_target),
        0x18..=0x1F => Instruction::RotateRightThruCarry(modify_target),
        0x20..=0x27 => Instruction::ShiftLeft(modify_target),
        0x28..=0x2F => Instruction::ArithmeticShiftRight(modify_target),
        0x30..=0x37 => Instruction::Swap(modify_target),
        0x38..=0x3F => Instruction::LogicalShiftRight(modify_target),
        0x40..=0x7F => Instruction::TestBit(bit, low_read_target(opcode)),
        0x80..=0xBF => Instruction::ResetBit(bit, modify_target),
        0xC0..=0xFF => Instruction::SetBit(bit, modify_target),
    }
}

fn low_read_target(opcode: u8) -> ReadTarget {
    CpuRegister::from_low_opcode_bits(opcode).map_or(ReadTarget::IndirectHL, ReadTarget::Register)
}

fn mid_modify_target(opcode: u8) -> ModifyTarget {
    CpuRegister::from_mid_opcode_bits(opcode)
        .map_or(ModifyTarget::IndirectHL, ModifyTarget::Register)
}

fn register_pair_for_other_ops(opcode: u8) -> CpuRegisterPair {
    match opcode & 0x30 {
        0x00 => CpuRegisterPair::BC,
        0x10 => CpuRegisterPair::DE,
        0x20 => CpuRegisterPair::HL,
        _ => CpuRegisterPair::SP,
    }
}

fn register_pair_for_push_pop(opcode: u8) -> CpuRegisterPair {
    match opcode & 0x30 {
        0x00 => CpuRegisterPair::BC,
        0x10 => CpuRegisterPair::DE,
        0x20 => CpuRegisterPair::HL,
        _ => CpuRegisterPair::AF,
    }
}

fn parse_jump_condition(opcode: u8) -> JumpCondition {
    match opcode & 0x18 {
        0x00 => JumpCondition::NZ,
        0x08 => JumpCondition::Z,
        0x10 => JumpCondition::NC,
        _ => JumpCondition::C,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNDEFINED_OPCODES: [u8; 11] =
        [0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD];

    #[test]
    fn primary_table_coverage() {
        for opcode in 0..=u8::MAX {
            let descriptor = primary_descriptor(opcode);
            if opcode == CB_PREFIX || UNDEFINED_OPCODES.contains(&opcode) {
                assert!(descriptor.is_none(), "opcode {opcode:02X} should have no descriptor");
            } else {
                let descriptor = descriptor.unwrap();
                assert_eq!(opcode, descriptor.opcode);
                assert!(!descriptor.illegal);
                assert!(!descriptor.mnemonic.is_empty());
            }
        }

        let defined = (0..=u8::MAX).filter_map(primary_descriptor).count();
        assert_eq!(244, defined);
    }

    #[test]
    fn extended_table_is_full() {
        for opcode in 0..=u8::MAX {
            let descriptor = extended_descriptor(opcode).unwrap();
            assert_eq!(opcode, descriptor.opcode);
        }
    }

    #[test]
    fn descriptor_lookups() {
        assert_eq!("NOP", primary_descriptor(0x00).unwrap().mnemonic);
        assert_eq!("LD SP, d16", primary_descriptor(0x31).unwrap().mnemonic);
        assert_eq!("XOR A", primary_descriptor(0xAF).unwrap().mnemonic);
        assert_eq!("LD (HL-), A", primary_descriptor(0x32).unwrap().mnemonic);
        assert_eq!("INC C", primary_descriptor(0x0C).unwrap().mnemonic);
        assert_eq!("JR NZ, r8", primary_descriptor(0x20).unwrap().mnemonic);
        assert_eq!("LDH (a8), A", primary_descriptor(0xE0).unwrap().mnemonic);
        assert_eq!("HALT", primary_descriptor(0x76).unwrap().mnemonic);
        assert_eq!("LD (HL), d8", primary_descriptor(0x36).unwrap().mnemonic);

        assert_eq!("BIT 7, H", extended_descriptor(0x7C).unwrap().mnemonic);
        assert_eq!("RL C", extended_descriptor(0x11).unwrap().mnemonic);
        assert_eq!("SWAP (HL)", extended_descriptor(0x36).unwrap().mnemonic);
        assert_eq!("SET 0, A", extended_descriptor(0xC7).unwrap().mnemonic);
        assert_eq!("RES 3, (HL)", extended_descriptor(0x9E).unwrap().mnemonic);
    }

    #[test]
    fn register_fields_decode_consistently() {
        for r in [
            CpuRegister::A,
            CpuRegister::B,
            CpuRegister::C,
            CpuRegister::D,
            CpuRegister::E,
            CpuRegister::H,
            CpuRegister::L,
        ] {
            let bits = r.to_opcode_bits();
            assert_eq!(
                Instruction::Add(ReadTarget::Register(r)),
                primary_descriptor(0x80 | bits).unwrap().instruction
            );
            assert_eq!(
                Instruction::Increment(ModifyTarget::Register(r)),
                primary_descriptor(0x04 | (bits << 3)).unwrap().instruction
            );
            assert_eq!(
                Instruction::Swap(ModifyTarget::Register(r)),
                extended_descriptor(0x30 | bits).unwrap().instruction
            );
        }
    }
}

use dmg_proc_macros::EnumDisplay;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumDisplay)]
pub enum CpuRegister {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

impl CpuRegister {
    /// Decode the 3-bit register field used throughout the opcode map. `0b110` selects (HL)
    /// rather than a register, so it decodes to `None`.
    pub fn from_opcode_bits(bits: u8) -> Option<Self> {
        match bits & 0x07 {
            0x00 => Some(Self::B),
            0x01 => Some(Self::C),
            0x02 => Some(Self::D),
            0x03 => Some(Self::E),
            0x04 => Some(Self::H),
            0x05 => Some(Self::L),
            0x07 => Some(Self::A),
            _ => None,
        }
    }

    pub fn from_low_opcode_bits(opcode: u8) -> Option<Self> {
        Self::from_opcode_bits(opcode)
    }

    pub fn from_mid_opcode_bits(opcode: u8) -> Option<Self> {
        Self::from_opcode_bits(opcode >> 3)
    }

    #[cfg(test)]
    pub fn to_opcode_bits(self) -> u8 {
        match self {
            Self::B => 0x00,
            Self::C => 0x01,
            Self::D => 0x02,
            Self::E => 0x03,
            Self::H => 0x04,
            Self::L => 0x05,
            Self::A => 0x07,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumDisplay)]
pub enum CpuRegisterPair {
    AF,
    BC,
    DE,
    HL,
    SP,
}

const Z_FLAG: u8 = 0x80;
const N_FLAG: u8 = 0x40;
const H_FLAG: u8 = 0x20;
const C_FLAG: u8 = 0x10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuRegisters {
    pub accumulator: u8,
    pub flags: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
    pub ime: bool,
    pub interrupt_delay: bool,
    pub halted: bool,
}

impl CpuRegisters {
    /// Power-on state: everything zeroed except SP, execution starts at 0x0000 in the boot image.
    pub fn new() -> Self {
        Self {
            accumulator: 0x00,
            flags: 0x00,
            b: 0x00,
            c: 0x00,
            d: 0x00,
            e: 0x00,
            h: 0x00,
            l: 0x00,
            sp: 0xFFFE,
            pc: 0x0000,
            ime: false,
            interrupt_delay: false,
            halted: false,
        }
    }

    /// The state the DMG boot ROM leaves behind when it hands control to the cartridge entry
    /// point.
    pub fn post_boot() -> Self {
        Self {
            accumulator: 0x01,
            flags: 0xB0,
            b: 0x00,
            c: 0x13,
            d: 0x00,
            e: 0xD8,
            h: 0x01,
            l: 0x4D,
            sp: 0xFFFE,
            pc: 0x0100,
            ime: false,
            interrupt_delay: false,
            halted: false,
        }
    }

    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.accumulator, self.flags])
    }

    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    pub fn set_hl(&mut self, hl: u16) {
        let [h, l] = hl.to_be_bytes();
        self.h = h;
        self.l = l;
    }

    pub fn read_register(&self, register: CpuRegister) -> u8 {
        match register {
            CpuRegister::A => self.accumulator,
            CpuRegister::B => self.b,
            CpuRegister::C => self.c,
            CpuRegister::D => self.d,
            CpuRegister::E => self.e,
            CpuRegister::H => self.h,
            CpuRegister::L => self.l,
        }
    }

    pub fn set_register(&mut self, register: CpuRegister, value: u8) {
        *self.get_register_mut(register) = value;
    }

    pub fn get_register_mut(&mut self, register: CpuRegister) -> &mut u8 {
        match register {
            CpuRegister::A => &mut self.accumulator,
            CpuRegister::B => &mut self.b,
            CpuRegister::C => &mut self.c,
            CpuRegister::D => &mut self.d,
            CpuRegister::E => &mut self.e,
            CpuRegister::H => &mut self.h,
            CpuRegister::L => &mut self.l,
        }
    }

    pub fn read_register_pair(&self, register_pair: CpuRegisterPair) -> u16 {
        match register_pair {
            CpuRegisterPair::AF => self.af(),
            CpuRegisterPair::BC => self.bc(),
            CpuRegisterPair::DE => self.de(),
            CpuRegisterPair::HL => self.hl(),
            CpuRegisterPair::SP => self.sp,
        }
    }

    pub fn set_register_pair(&mut self, register_pair: CpuRegisterPair, value: u16) {
        let [msb, lsb] = value.to_be_bytes();
        match register_pair {
            CpuRegisterPair::AF => {
                self.accumulator = msb;
                // Bits 0-3 of F do not exist
                self.flags = lsb & 0xF0;
            }
            CpuRegisterPair::BC => {
                self.b = msb;
                self.c = lsb;
            }
            CpuRegisterPair::DE => {
                self.d = msb;
                self.e = lsb;
            }
            CpuRegisterPair::HL => {
                self.set_hl(value);
            }
            CpuRegisterPair::SP => {
                self.sp = value;
            }
        }
    }

    pub fn set_flags(&mut self, z: bool, n: bool, h: bool, c: bool) {
        self.flags =
            (u8::from(z) << 7) | (u8::from(n) << 6) | (u8::from(h) << 5) | (u8::from(c) << 4);
    }

    /// Update only the flags given as `Some`, leaving the rest as they were.
    pub fn set_some_flags(
        &mut self,
        z: Option<bool>,
        n: Option<bool>,
        h: Option<bool>,
        c: Option<bool>,
    ) {
        for (value, mask) in [(z, Z_FLAG), (n, N_FLAG), (h, H_FLAG), (c, C_FLAG)] {
            match value {
                Some(true) => {
                    self.flags |= mask;
                }
                Some(false) => {
                    self.flags &= !mask;
                }
                None => {}
            }
        }
    }

    pub fn zero_flag(&self) -> bool {
        self.flags & Z_FLAG != 0
    }

    pub fn subtract_flag(&self) -> bool {
        self.flags & N_FLAG != 0
    }

    pub fn half_carry_flag(&self) -> bool {
        self.flags & H_FLAG != 0
    }

    pub fn carry_flag(&self) -> bool {
        self.flags & C_FLAG != 0
    }
}

impl Default for CpuRegisters {
    fn default() -> Self {
        Self::new()
    }
}

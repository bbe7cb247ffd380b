pub(crate) mod instructions;
mod registers;


use crate::memory::address::IF_REGISTER;
use crate::memory::{AddressSpace, LoadError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use instructions::{
    add, add_sp_offset, add_u16, decrement_half_carry, extended_descriptor, increment_half_carry,
    primary_descriptor, sub, Instruction, InstructionDescriptor, JumpCondition, ModifyTarget,
    ReadTarget, WriteTarget, CB_PREFIX,
};
pub use registers::{CpuRegister, CpuRegisterPair, CpuRegisters};

/// Cycles reported for each step spent idling in HALT/STOP.
pub const HALT_IDLE_CYCLES: u8 = 4;

const INTERRUPT_MASK: u8 = 0x1F;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionError {
    #[error(
        "unimplemented opcode {opcode:02X}{}",
        .extended.map_or_else(String::new, |extended| format!(" {extended:02X}"))
    )]
    UnimplementedOpcode { opcode: u8, extended: Option<u8> },
}

/// The SM83 instruction engine: the register file plus the address space it executes against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cpu {
    pub(crate) registers: CpuRegisters,
    pub(crate) address_space: AddressSpace,
}

impl Cpu {
    /// Power-on state: boot overlay mapped, PC at 0x0000.
    pub fn new(address_space: AddressSpace) -> Self {
        Self { registers: CpuRegisters::new(), address_space }
    }

    /// Power-on state with a boot image and cartridge image already loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if either image exceeds its region; the fitting prefix is still loaded.
    pub fn with_images(boot_image: &[u8], cartridge_image: &[u8]) -> Result<Self, LoadError> {
        let mut address_space = AddressSpace::new();
        address_space.load_boot_image(boot_image)?;
        address_space.load_cartridge_image(cartridge_image)?;
        Ok(Self::new(address_space))
    }

    /// Jump straight to the cartridge entry point with the registers the boot image would have
    /// left behind.
    pub fn skip_boot(&mut self) {
        self.registers = CpuRegisters::post_boot();
        self.address_space.set_boot_overlay(false);
    }

    pub fn registers(&self) -> &CpuRegisters {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut CpuRegisters {
        &mut self.registers
    }

    pub fn address_space(&self) -> &AddressSpace {
        &self.address_space
    }

    pub fn address_space_mut(&mut self) -> &mut AddressSpace {
        &mut self.address_space
    }

    /// Execute a single instruction and return the clock cycles it took.
    ///
    /// While halted no instruction is fetched; each call idles for [`HALT_IDLE_CYCLES`] until an
    /// enabled interrupt is flagged in IF.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::UnimplementedOpcode`] if the byte(s) at PC have no descriptor.
    /// No state is modified in that case.
    pub fn step(&mut self) -> Result<u8, ExecutionError> {
        if self.registers.halted && !self.interrupt_pending() {
            return Ok(HALT_IDLE_CYCLES);
        }

        let pc = self.registers.pc;
        let descriptor = self.descriptor_at(pc)?;

        if self.registers.halted {
            log::trace!("Interrupt pending, leaving HALT at PC {pc:04X}");
            self.registers.halted = false;
        }

        let enable_interrupts = self.registers.interrupt_delay;

        let cycles = descriptor.instruction.execute(self);

        log::trace!(
            "Executed {} at PC {pc:04X}, took {cycles} cycles, registers: {:04X?}",
            descriptor.mnemonic,
            self.registers
        );

        // An EI executed on the previous step takes effect now, unless this step was a DI
        if enable_interrupts && self.registers.interrupt_delay {
            self.registers.interrupt_delay = false;
            self.registers.ime = true;
        }

        Ok(cycles)
    }

    /// Resolve the descriptor for the instruction at `address` without executing it.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::UnimplementedOpcode`] if there is no descriptor.
    pub fn descriptor_at(
        &self,
        address: u16,
    ) -> Result<&'static InstructionDescriptor, ExecutionError> {
        let opcode = self.address_space.read_address_u8(address);
        if opcode == CB_PREFIX {
            let extended = self.address_space.read_address_u8(address.wrapping_add(1));
            return extended_descriptor(extended)
                .ok_or(ExecutionError::UnimplementedOpcode { opcode, extended: Some(extended) });
        }

        primary_descriptor(opcode)
            .ok_or(ExecutionError::UnimplementedOpcode { opcode, extended: None })
    }

    /// One line of disassembly for the instruction at `address`, e.g. `0150: 20 FE  JR NZ, r8`.
    pub fn disassemble(&self, address: u16) -> String {
        match self.descriptor_at(address) {
            Ok(descriptor) => {
                let bytes: Vec<_> = (0..descriptor.instruction.encoded_len())
                    .map(|i| {
                        let byte = self.address_space.read_address_u8(address.wrapping_add(i));
                        format!("{byte:02X}")
                    })
                    .collect();
                format!("{address:04X}: {:<9} {}", bytes.join(" "), descriptor.mnemonic)
            }
            Err(err) => format!("{address:04X}: {err}"),
        }
    }

    /// Push a byte: decrement SP, then store at the new SP.
    pub fn push_u8(&mut self, value: u8) {
        self.registers.sp = self.registers.sp.wrapping_sub(1);
        self.address_space.write_address_u8(self.registers.sp, value);
    }

    /// Pop a byte: read at SP, then increment SP.
    pub fn pop_u8(&mut self) -> u8 {
        let value = self.address_space.read_address_u8(self.registers.sp);
        self.registers.sp = self.registers.sp.wrapping_add(1);
        value
    }

    /// Push a word high byte first, leaving it little-endian in memory at the new SP.
    pub fn push_u16(&mut self, value: u16) {
        let [msb, lsb] = value.to_be_bytes();
        self.push_u8(msb);
        self.push_u8(lsb);
    }

    pub fn pop_u16(&mut self) -> u16 {
        let lsb = self.pop_u8();
        let msb = self.pop_u8();
        u16::from_le_bytes([lsb, msb])
    }

    fn interrupt_pending(&self) -> bool {
        let ie_value = self.address_space.ie_register();
        let if_value = self.address_space.io_register(IF_REGISTER);
        ie_value & if_value & INTERRUPT_MASK != 0
    }

    fn read_immediate_u8(&self) -> u8 {
        self.address_space.read_address_u8(self.registers.pc.wrapping_add(1))
    }

    fn read_immediate_u16(&self) -> u16 {
        self.address_space.read_address_u16(self.registers.pc.wrapping_add(1))
    }

    fn advance_pc(&mut self, len: u16) {
        self.registers.pc = self.registers.pc.wrapping_add(len);
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new(AddressSpace::new())
    }
}

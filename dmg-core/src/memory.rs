pub mod address;

use crate::memory::address::{MappedAddress, MemoryRegion};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LoadError {
    #[error("image is {len} bytes but the target region only holds {capacity}; extra bytes were dropped")]
    ImageTooLarge { len: usize, capacity: usize },
}

/// The full 16-bit address space: every byte of storage the CPU can reach, plus the boot overlay
/// flag that decides whether the boot image or cartridge bank 0 is visible at 0x0000-0x3FFF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressSpace {
    boot_rom: Vec<u8>,
    rom_bank_0: Vec<u8>,
    rom_bank_1: Vec<u8>,
    vram: Vec<u8>,
    external_ram: Vec<u8>,
    working_ram: Vec<u8>,
    #[serde(
        serialize_with = "crate::serialize::serialize_array",
        deserialize_with = "crate::serialize::deserialize_array"
    )]
    oam: [u8; address::OAM_SIZE],
    #[serde(
        serialize_with = "crate::serialize::serialize_array",
        deserialize_with = "crate::serialize::deserialize_array"
    )]
    io_registers: [u8; address::IO_REGISTERS_SIZE],
    #[serde(
        serialize_with = "crate::serialize::serialize_array",
        deserialize_with = "crate::serialize::deserialize_array"
    )]
    hram: [u8; address::HRAM_SIZE],
    ie_register: u8,
    boot_overlay: bool,
}

impl AddressSpace {
    /// Create a zero-filled address space with the boot overlay active.
    pub fn new() -> Self {
        Self {
            boot_rom: vec![0; address::ROM_BANK_SIZE],
            rom_bank_0: vec![0; address::ROM_BANK_SIZE],
            rom_bank_1: vec![0; address::ROM_BANK_SIZE],
            vram: vec![0; address::VRAM_SIZE],
            external_ram: vec![0; address::EXTERNAL_RAM_SIZE],
            working_ram: vec![0; address::WORKING_RAM_SIZE],
            oam: [0; address::OAM_SIZE],
            io_registers: [0; address::IO_REGISTERS_SIZE],
            hram: [0; address::HRAM_SIZE],
            ie_register: 0,
            boot_overlay: true,
        }
    }

    /// Copy a boot image into the overlay region. Bytes past 16KB are dropped and reported.
    pub fn load_boot_image(&mut self, image: &[u8]) -> Result<(), LoadError> {
        copy_truncating(image, &mut [&mut self.boot_rom[..]])
    }

    /// Copy a cartridge image into ROM banks 0 and 1. Bytes past 32KB are dropped and reported;
    /// there is no mapper to page them in.
    pub fn load_cartridge_image(&mut self, image: &[u8]) -> Result<(), LoadError> {
        copy_truncating(image, &mut [&mut self.rom_bank_0[..], &mut self.rom_bank_1[..]])
    }

    pub fn boot_overlay_active(&self) -> bool {
        self.boot_overlay
    }

    pub fn set_boot_overlay(&mut self, boot_overlay: bool) {
        if boot_overlay != self.boot_overlay {
            log::debug!(
                "Boot overlay {}",
                if boot_overlay { "mapped" } else { "unmapped, cartridge bank 0 now visible" }
            );
        }
        self.boot_overlay = boot_overlay;
    }

    pub fn read_address_u8(&self, address: u16) -> u8 {
        let MappedAddress { region, offset } = address::map_address(address, self.boot_overlay);
        match region {
            MemoryRegion::BootRom => self.boot_rom[offset],
            MemoryRegion::RomBank0 => self.rom_bank_0[offset],
            MemoryRegion::RomBank1 => self.rom_bank_1[offset],
            MemoryRegion::VideoRam => self.vram[offset],
            MemoryRegion::ExternalRam => self.external_ram[offset],
            MemoryRegion::WorkingRam => self.working_ram[offset],
            MemoryRegion::Oam => self.oam[offset],
            MemoryRegion::Unusable => address::OPEN_BUS_VALUE,
            MemoryRegion::IoRegisters => self.io_registers[offset],
            MemoryRegion::HighRam => self.hram[offset],
            MemoryRegion::IeRegister => self.ie_register,
        }
    }

    /// Read a little-endian word: low byte at `address`, high byte at `address + 1`.
    pub fn read_address_u16(&self, address: u16) -> u16 {
        let lsb = self.read_address_u8(address);
        let msb = self.read_address_u8(address.wrapping_add(1));
        u16::from_le_bytes([lsb, msb])
    }

    pub fn write_address_u8(&mut self, address: u16, value: u8) {
        let MappedAddress { region, offset } = address::map_address(address, self.boot_overlay);
        match region {
            MemoryRegion::BootRom => {
                self.boot_rom[offset] = value;
            }
            MemoryRegion::RomBank0 => {
                self.rom_bank_0[offset] = value;
            }
            MemoryRegion::RomBank1 => {
                self.rom_bank_1[offset] = value;
            }
            MemoryRegion::VideoRam => {
                self.vram[offset] = value;
            }
            MemoryRegion::ExternalRam => {
                self.external_ram[offset] = value;
            }
            MemoryRegion::WorkingRam => {
                self.working_ram[offset] = value;
            }
            MemoryRegion::Oam => {
                self.oam[offset] = value;
            }
            MemoryRegion::Unusable => {}
            MemoryRegion::IoRegisters => {
                self.io_registers[offset] = value;
            }
            MemoryRegion::HighRam => {
                self.hram[offset] = value;
            }
            MemoryRegion::IeRegister => {
                self.ie_register = value;
            }
        }
    }

    /// Write a little-endian word: low byte to `address`, high byte to `address + 1`.
    pub fn write_address_u16(&mut self, address: u16, value: u16) {
        let [lsb, msb] = value.to_le_bytes();
        self.write_address_u8(address, lsb);
        self.write_address_u8(address.wrapping_add(1), msb);
    }

    pub fn ie_register(&self) -> u8 {
        self.ie_register
    }

    /// Raw contents of an I/O register. Addresses outside 0xFF00-0xFF7F read as open bus.
    pub fn io_register(&self, address: u16) -> u8 {
        match address {
            address::IO_REGISTERS_START..=address::IO_REGISTERS_END => {
                self.io_registers[usize::from(address - address::IO_REGISTERS_START)]
            }
            _ => address::OPEN_BUS_VALUE,
        }
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

fn copy_truncating(image: &[u8], banks: &mut [&mut [u8]]) -> Result<(), LoadError> {
    let capacity: usize = banks.iter().map(|bank| bank.len()).sum();

    let mut remaining = image;
    for bank in banks.iter_mut() {
        let n = remaining.len().min(bank.len());
        bank[..n].copy_from_slice(&remaining[..n]);
        remaining = &remaining[n..];
    }

    if !remaining.is_empty() {
        log::warn!(
            "Image of {} bytes exceeds region capacity of {capacity} bytes, truncating",
            image.len()
        );
        return Err(LoadError::ImageTooLarge { len: image.len(), capacity });
    }

    Ok(())
}

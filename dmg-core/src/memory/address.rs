//
// Cartridge header addresses
//

pub const ENTRY_POINT: u16 = 0x0100;
pub const TITLE_START: u16 = 0x0134;
pub const TITLE_END: u16 = 0x0143;
pub const MAPPER: u16 = 0x0147;

//
// Address space boundaries
//

pub const ROM_BANK_0_START: u16 = 0x0000;
pub const ROM_BANK_0_END: u16 = 0x3FFF;

pub const ROM_BANK_1_START: u16 = 0x4000;
pub const ROM_BANK_1_END: u16 = 0x7FFF;

pub const VRAM_START: u16 = 0x8000;
pub const VRAM_END: u16 = 0x9FFF;

pub const EXTERNAL_RAM_START: u16 = 0xA000;
pub const EXTERNAL_RAM_END: u16 = 0xBFFF;

pub const WORKING_RAM_START: u16 = 0xC000;
pub const WORKING_RAM_END: u16 = 0xDFFF;

pub const ECHO_RAM_START: u16 = 0xE000;
pub const ECHO_RAM_END: u16 = 0xFDFF;

pub const OAM_START: u16 = 0xFE00;
pub const OAM_END: u16 = 0xFE9F;

pub const UNUSABLE_START: u16 = 0xFEA0;
pub const UNUSABLE_END: u16 = 0xFEFF;

pub const IO_REGISTERS_START: u16 = 0xFF00;
pub const IO_REGISTERS_END: u16 = 0xFF7F;

pub const HRAM_START: u16 = 0xFF80;
pub const HRAM_END: u16 = 0xFFFE;

pub const IE_REGISTER: u16 = 0xFFFF;

//
// I/O register addresses the core looks at
//

// Interrupt flags
pub const IF_REGISTER: u16 = 0xFF0F;

// Boot ROM disable, any non-zero write unmaps the boot overlay
pub const BOOT_ROM_DISABLE_REGISTER: u16 = 0xFF50;

//
// Region sizes
//

pub const ROM_BANK_SIZE: usize = (ROM_BANK_0_END - ROM_BANK_0_START + 1) as usize;
pub const VRAM_SIZE: usize = (VRAM_END - VRAM_START + 1) as usize;
pub const EXTERNAL_RAM_SIZE: usize = (EXTERNAL_RAM_END - EXTERNAL_RAM_START + 1) as usize;
pub const WORKING_RAM_BANK_SIZE: usize = 0x1000;
pub const WORKING_RAM_SIZE: usize = (WORKING_RAM_END - WORKING_RAM_START + 1) as usize;
pub const OAM_SIZE: usize = (OAM_END - OAM_START + 1) as usize;
pub const IO_REGISTERS_SIZE: usize = (IO_REGISTERS_END - IO_REGISTERS_START + 1) as usize;
pub const HRAM_SIZE: usize = (HRAM_END - HRAM_START + 1) as usize;

/// Value returned for reads from addresses with no backing storage.
pub const OPEN_BUS_VALUE: u8 = 0xFF;

/// The physical region that a 16-bit address resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryRegion {
    BootRom,
    RomBank0,
    RomBank1,
    VideoRam,
    ExternalRam,
    WorkingRam,
    Oam,
    Unusable,
    IoRegisters,
    HighRam,
    IeRegister,
}

/// A resolved address: which region, and the byte offset within that region's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedAddress {
    pub region: MemoryRegion,
    pub offset: usize,
}

impl MappedAddress {
    fn new(region: MemoryRegion, address: u16, region_start: u16) -> Self {
        Self { region, offset: usize::from(address - region_start) }
    }
}

/// Resolve an address to its backing cell. The boot overlay flag is the only input besides the
/// address itself; echo RAM resolves straight to the working RAM cell it mirrors.
pub fn map_address(address: u16, boot_overlay: bool) -> MappedAddress {
    match address {
        ROM_BANK_0_START..=ROM_BANK_0_END => {
            let region = if boot_overlay { MemoryRegion::BootRom } else { MemoryRegion::RomBank0 };
            MappedAddress::new(region, address, ROM_BANK_0_START)
        }
        ROM_BANK_1_START..=ROM_BANK_1_END => {
            MappedAddress::new(MemoryRegion::RomBank1, address, ROM_BANK_1_START)
        }
        VRAM_START..=VRAM_END => MappedAddress::new(MemoryRegion::VideoRam, address, VRAM_START),
        EXTERNAL_RAM_START..=EXTERNAL_RAM_END => {
            MappedAddress::new(MemoryRegion::ExternalRam, address, EXTERNAL_RAM_START)
        }
        WORKING_RAM_START..=WORKING_RAM_END => {
            MappedAddress::new(MemoryRegion::WorkingRam, address, WORKING_RAM_START)
        }
        ECHO_RAM_START..=ECHO_RAM_END => {
            MappedAddress::new(MemoryRegion::WorkingRam, address, ECHO_RAM_START)
        }
        OAM_START..=OAM_END => MappedAddress::new(MemoryRegion::Oam, address, OAM_START),
        UNUSABLE_START..=UNUSABLE_END => {
            MappedAddress::new(MemoryRegion::Unusable, address, UNUSABLE_START)
        }
        IO_REGISTERS_START..=IO_REGISTERS_END => {
            MappedAddress::new(MemoryRegion::IoRegisters, address, IO_REGISTERS_START)
        }
        HRAM_START..=HRAM_END => MappedAddress::new(MemoryRegion::HighRam, address, HRAM_START),
        IE_REGISTER => MappedAddress::new(MemoryRegion::IeRegister, address, IE_REGISTER),
    }
}

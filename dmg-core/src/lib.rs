//! Sharp SM83 (DMG) processing core: the address space decoder and the instruction engine that
//! executes against it.

pub mod cpu;
pub mod memory;
pub mod serialize;

pub use cpu::{Cpu, CpuRegisters, ExecutionError};
pub use memory::address::{map_address, MappedAddress, MemoryRegion};
pub use memory::{AddressSpace, LoadError};
pub use serialize::SaveStateError;

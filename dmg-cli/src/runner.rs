use crate::config::{RunConfig, StartMode};
use crate::header::CartridgeHeader;
use anyhow::{anyhow, Context};
use dmg_core::memory::address;
use dmg_core::{serialize, Cpu, ExecutionError};
use std::fs;

/// Why a run ended without a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    StepLimit,
    /// Halted with nothing in IE & IF. Only a running program can write IF, so execution can
    /// never resume.
    HaltedForever,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: u64,
    pub cycles: u64,
    pub stop_reason: StopReason,
}

#[derive(Debug)]
pub struct RunFault {
    pub error: ExecutionError,
    pub steps: u64,
    pub cycles: u64,
}

/// Build a processor from the configured images, honoring the start mode.
///
/// # Errors
///
/// Returns an error if an image cannot be read, or if boot mode is requested without a boot image.
pub fn build_cpu(config: &RunConfig) -> Result<Cpu, anyhow::Error> {
    let rom_path =
        config.rom_path.as_ref().ok_or_else(|| anyhow!("no cartridge ROM path was given"))?;
    let rom = fs::read(rom_path)
        .with_context(|| format!("error reading cartridge ROM from '{rom_path}'"))?;

    match CartridgeHeader::parse(&rom) {
        Some(header) => {
            log::info!("Cartridge title: '{}'", header.title);
            if header.declares_mapper() {
                log::warn!(
                    "Cartridge declares mapper byte {:02X}; only the first 32KB will be visible",
                    header.mapper_byte
                );
            }
        }
        None => log::warn!("Cartridge image is only {} bytes, no header present", rom.len()),
    }

    let boot_image = match (config.start_mode, &config.boot_rom_path) {
        (StartMode::Boot, Some(boot_rom_path)) => fs::read(boot_rom_path)
            .with_context(|| format!("error reading boot ROM from '{boot_rom_path}'"))?,
        (StartMode::Boot, None) => {
            return Err(anyhow!("start mode is Boot but no boot ROM path was given"));
        }
        (StartMode::PostBoot, _) => Vec::new(),
    };

    let mut cpu = Cpu::default();
    if let Err(err) = cpu.address_space_mut().load_boot_image(&boot_image) {
        log::warn!("Boot ROM: {err}");
    }
    if let Err(err) = cpu.address_space_mut().load_cartridge_image(&rom) {
        log::warn!("Cartridge ROM: {err}");
    }

    if config.start_mode == StartMode::PostBoot {
        cpu.skip_boot();
    }

    log::info!("Starting at PC {:04X} in {} mode", cpu.registers().pc, config.start_mode);

    Ok(cpu)
}

/// Step the processor until the step limit, a permanent halt, or a fault.
///
/// A nonzero write to 0xFF50 unmaps the boot overlay after the step that performed it.
///
/// # Errors
///
/// Returns the fault together with how far the run got if an instruction cannot be decoded.
pub fn run_cpu(cpu: &mut Cpu, max_steps: u64) -> Result<RunSummary, RunFault> {
    let mut cycles = 0_u64;

    for steps in 0..max_steps {
        let address_space = cpu.address_space();
        if cpu.registers().halted
            && address_space.ie_register() & address_space.io_register(address::IF_REGISTER) & 0x1F
                == 0
        {
            return Ok(RunSummary { steps, cycles, stop_reason: StopReason::HaltedForever });
        }

        match cpu.step() {
            Ok(step_cycles) => {
                cycles += u64::from(step_cycles);
            }
            Err(error) => {
                return Err(RunFault { error, steps, cycles });
            }
        }

        if cpu.address_space().boot_overlay_active()
            && cpu.address_space().io_register(address::BOOT_ROM_DISABLE_REGISTER) != 0
        {
            log::info!("Boot ROM disabled at PC {:04X} after {cycles} cycles", cpu.registers().pc);
            cpu.address_space_mut().set_boot_overlay(false);
        }
    }

    Ok(RunSummary { steps: max_steps, cycles, stop_reason: StopReason::StepLimit })
}

/// # Errors
///
/// Returns an error if the processor cannot be built, execution faults, or the save state cannot
/// be written.
pub fn run(config: &RunConfig) -> Result<RunSummary, anyhow::Error> {
    let mut cpu = build_cpu(config)?;

    let result = run_cpu(&mut cpu, config.max_steps);

    if let Some(save_state_path) = &config.save_state_path {
        serialize::save_state_to_file(&cpu, save_state_path)
            .with_context(|| format!("error writing save state to '{save_state_path}'"))?;
    }

    match result {
        Ok(summary) => {
            log::info!(
                "Ran {} steps ({} cycles), stopped: {:?}",
                summary.steps,
                summary.cycles,
                summary.stop_reason
            );
            Ok(summary)
        }
        Err(RunFault { error, steps, cycles }) => {
            let pc = cpu.registers().pc;
            log::error!("Fault after {steps} steps ({cycles} cycles): {}", cpu.disassemble(pc));
            log::error!("Registers: {:04X?}", cpu.registers());
            Err(anyhow::Error::new(error).context(format!("execution fault at PC {pc:04X}")))
        }
    }
}

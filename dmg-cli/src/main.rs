mod config;
mod header;
mod runner;

use crate::config::{RunConfig, StartMode};
use clap::Parser;

#[derive(Parser)]
struct Cli {
    /// Cartridge ROM image
    #[arg(short = 'r', long = "rom")]
    rom_path: Option<String>,

    /// Boot ROM image, required when starting in boot mode
    #[arg(short = 'b', long = "boot-rom")]
    boot_rom_path: Option<String>,

    /// Boot or PostBoot
    #[arg(short = 's', long = "start-mode")]
    start_mode: Option<StartMode>,

    #[arg(short = 'n', long = "max-steps")]
    max_steps: Option<u64>,

    /// Optional TOML file with defaults for all of the above
    #[arg(short = 'c', long = "config")]
    config_path: Option<String>,

    /// Write a save state here once execution stops; pass without a value to write it next to the
    /// ROM
    #[arg(long = "save-state", num_args = 0..=1, default_missing_value = "")]
    save_state_path: Option<String>,
}

impl Cli {
    fn into_run_config(self) -> Result<RunConfig, anyhow::Error> {
        let mut config = match &self.config_path {
            Some(config_path) => RunConfig::from_toml_file(config_path)?,
            None => RunConfig::default(),
        };

        if let Some(rom_path) = self.rom_path {
            config.rom_path = Some(rom_path);
        }
        if let Some(boot_rom_path) = self.boot_rom_path {
            config.boot_rom_path = Some(boot_rom_path);
        }
        if let Some(start_mode) = self.start_mode {
            config.start_mode = start_mode;
        }
        if let Some(max_steps) = self.max_steps {
            config.max_steps = max_steps;
        }
        if let Some(save_state_path) = self.save_state_path {
            config.save_state_path = Some(save_state_path);
        }

        if let (Some(""), Some(rom_path)) = (config.save_state_path.as_deref(), &config.rom_path) {
            let path = dmg_core::serialize::determine_save_state_path(rom_path);
            config.save_state_path = Some(path.to_string_lossy().into_owned());
        }

        Ok(config)
    }
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let config = Cli::parse().into_run_config()?;
    log::debug!("Run config: {config:?}");

    runner::run(&config)?;

    Ok(())
}

use anyhow::Context;
use dmg_proc_macros::{EnumDisplay, EnumFromStr, StrDeserialize, StrSerialize};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Where execution begins: at 0x0000 inside the boot image, or at the cartridge entry point
/// with the registers the boot image would have left behind.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    EnumDisplay,
    EnumFromStr,
    StrSerialize,
    StrDeserialize,
)]
pub enum StartMode {
    Boot,
    #[default]
    PostBoot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub rom_path: Option<String>,

    pub boot_rom_path: Option<String>,

    #[serde(default)]
    pub start_mode: StartMode,

    #[serde(default = "default_max_steps")]
    pub max_steps: u64,

    pub save_state_path: Option<String>,
}

fn default_max_steps() -> u64 {
    10_000_000
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            rom_path: Option::default(),
            boot_rom_path: Option::default(),
            start_mode: StartMode::default(),
            max_steps: default_max_steps(),
            save_state_path: Option::default(),
        }
    }
}

impl RunConfig {
    pub fn from_toml_file<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path> + std::fmt::Debug,
    {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("error reading TOML config file from '{path:?}'"))?;
        let config: Self = toml::from_str(&config_str)
            .with_context(|| format!("error parsing run config from TOML file at '{path:?}'"))?;

        Ok(config)
    }
}

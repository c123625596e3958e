use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TesselConfig {
    #[serde(default)] pub world: WorldSection,
    #[serde(default)] pub runtime: RuntimeSection,
    #[serde(default = "default_blocks_path")] pub blocks_path: PathBuf,
}

fn default_blocks_path() -> PathBuf { PathBuf::from("assets/blocks.toml") }

impl Default for TesselConfig {
    fn default() -> Self {
        Self { world: WorldSection::default(), runtime: RuntimeSection::default(), blocks_path: default_blocks_path() }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct WorldSection {
    #[serde(default = "default_world_name")] pub name: String,
    #[serde(default = "default_grid_bits")] pub grid_bits: i32,
    #[serde(default = "default_save_dir")] pub save_dir: PathBuf,
}
fn default_world_name() -> String { "world".into() }
fn default_grid_bits() -> i32 { 4 }
fn default_save_dir() -> PathBuf { PathBuf::from("saves") }
impl Default for WorldSection {
    fn default() -> Self { Self { name: default_world_name(), grid_bits: default_grid_bits(), save_dir: default_save_dir() } }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RuntimeSection {
    #[serde(default = "tessel_task::default_threads")] pub mesh_workers: usize,
    #[serde(default = "tessel_task::default_threads")] pub io_workers: usize,
}
impl Default for RuntimeSection {
    fn default() -> Self {
        Self { mesh_workers: tessel_task::default_threads(), io_workers: tessel_task::default_threads() }
    }
}

impl TesselConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let s = fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&s)?)
    }

    /// Loads `path` when it exists, otherwise falls back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            Self::from_path(path)
        } else {
            log::info!("no config at {}; using defaults", path.display());
            Ok(Self::default())
        }
    }
}

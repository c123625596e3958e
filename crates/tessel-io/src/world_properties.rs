use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use tessel_world::GridSize;

use crate::codec::{read_i32, read_u32, write_atomic, write_i32, write_u32};
use crate::{PersistError, PersistenceHandler};

pub const WORLD_FILE_VERSION: i32 = 1;

/// How chunk files of a world are encoded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WorldFileFormat {
    #[default]
    Binary,
}

impl WorldFileFormat {
    pub fn id(self) -> i32 {
        match self {
            WorldFileFormat::Binary => 0,
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(WorldFileFormat::Binary),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldProperties {
    pub grid: GridSize,
    pub name: String,
    pub format: WorldFileFormat,
}

impl WorldProperties {
    pub fn new(name: impl Into<String>, grid: GridSize) -> Self {
        Self {
            grid,
            name: name.into(),
            format: WorldFileFormat::default(),
        }
    }

    pub fn path(root: &Path) -> PathBuf {
        root.join("world.properties")
    }
}

/// `i32` version, `i32` grid bits, `u32` byte length plus UTF-8 name, `i32` format id.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorldPropertiesHandler;

impl PersistenceHandler<WorldProperties> for WorldPropertiesHandler {
    fn write(&self, root: &Path, value: &WorldProperties) -> Result<(), PersistError> {
        let name = value.name.as_bytes();
        let len = u32::try_from(name.len())
            .map_err(|_| PersistError::Corrupt("world name too long".to_string()))?;
        write_atomic(&WorldProperties::path(root), |w| {
            write_i32(w, WORLD_FILE_VERSION)?;
            write_i32(w, value.grid.bits() as i32)?;
            write_u32(w, len)?;
            w.write_all(name)?;
            write_i32(w, value.format.id())
        })?;
        log::info!(target: "io", "saved world properties `{}`", value.name);
        Ok(())
    }

    fn read(&self, root: &Path, _existing: WorldProperties) -> Result<WorldProperties, PersistError> {
        let mut r = BufReader::new(File::open(WorldProperties::path(root))?);
        let version = read_i32(&mut r)?;
        if version != WORLD_FILE_VERSION {
            return Err(PersistError::UnrecognizedVersion {
                found: version,
                supported: WORLD_FILE_VERSION,
            });
        }
        let bits = read_i32(&mut r)?;
        let grid = GridSize::new(bits).map_err(|e| PersistError::Corrupt(e.to_string()))?;
        let len = read_u32(&mut r)?;
        // untrusted length; only buffer what the file holds
        let mut name = Vec::new();
        (&mut r).take(u64::from(len)).read_to_end(&mut name)?;
        if name.len() as u64 != u64::from(len) {
            return Err(PersistError::Corrupt(format!(
                "world name declares {len} bytes, file holds {}",
                name.len()
            )));
        }
        let name = String::from_utf8(name)
            .map_err(|_| PersistError::Corrupt("world name is not UTF-8".to_string()))?;
        let format_id = read_i32(&mut r)?;
        let format = WorldFileFormat::from_id(format_id)
            .ok_or_else(|| PersistError::Corrupt(format!("unknown world file format {format_id}")))?;
        Ok(WorldProperties { grid, name, format })
    }
}

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tessel_blocks::{AIR, BlockId};
use tessel_world::{Chunk, ChunkPosition, GridSize};

use crate::codec::{read_exact, read_i32, write_atomic, write_i32};
use crate::{PersistError, PersistenceHandler};

pub const CHUNK_FILE_VERSION: i32 = 1;

/// Owned copy of one chunk's ids, as stored on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkData {
    pub position: ChunkPosition,
    pub grid: GridSize,
    /// Flat-index order, `grid.volume()` entries.
    pub blocks: Vec<BlockId>,
}

impl ChunkData {
    /// All-air data; the usual `existing` value for a load.
    pub fn empty(position: ChunkPosition, grid: GridSize) -> Self {
        Self {
            position,
            grid,
            blocks: vec![AIR; grid.volume()],
        }
    }

    pub fn from_chunk(chunk: &Chunk) -> Self {
        Self {
            position: chunk.position(),
            grid: chunk.grid(),
            blocks: chunk.blocks().to_vec(),
        }
    }

    /// File holding the chunk at `position` under `root`.
    pub fn path(root: &Path, position: ChunkPosition) -> PathBuf {
        root.join("chunks")
            .join(format!("{}_{}_{}.chunk", position.x, position.y, position.z))
    }
}

/// Versioned little-endian codec: `i32` version, `i32` grid bits, then one
/// `u16` per block.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChunkDataHandler;

impl PersistenceHandler<ChunkData> for ChunkDataHandler {
    fn write(&self, root: &Path, value: &ChunkData) -> Result<(), PersistError> {
        if value.blocks.len() != value.grid.volume() {
            return Err(PersistError::Corrupt(format!(
                "chunk {:?} holds {} ids, expected {}",
                value.position,
                value.blocks.len(),
                value.grid.volume()
            )));
        }
        let path = ChunkData::path(root, value.position);
        let mut bytes = Vec::with_capacity(value.blocks.len() * 2);
        for id in &value.blocks {
            bytes.extend_from_slice(&id.to_le_bytes());
        }
        write_atomic(&path, |w| {
            write_i32(w, CHUNK_FILE_VERSION)?;
            write_i32(w, value.grid.bits() as i32)?;
            std::io::Write::write_all(w, &bytes)
        })?;
        log::debug!(target: "io", "saved chunk {:?} to {}", value.position, path.display());
        Ok(())
    }

    fn read(&self, root: &Path, mut existing: ChunkData) -> Result<ChunkData, PersistError> {
        let path = ChunkData::path(root, existing.position);
        let mut r = BufReader::new(File::open(&path)?);
        let version = read_i32(&mut r)?;
        if version != CHUNK_FILE_VERSION {
            return Err(PersistError::UnrecognizedVersion {
                found: version,
                supported: CHUNK_FILE_VERSION,
            });
        }
        let bits = read_i32(&mut r)?;
        if bits != existing.grid.bits() as i32 {
            return Err(PersistError::Corrupt(format!(
                "{} stores grid bits {}, world uses {}",
                path.display(),
                bits,
                existing.grid.bits()
            )));
        }
        let mut bytes = vec![0u8; existing.grid.volume() * 2];
        read_exact(&mut r, &mut bytes)?;
        existing.blocks.clear();
        existing.blocks.extend(
            bytes
                .chunks_exact(2)
                .map(|b| BlockId::from_le_bytes([b[0], b[1]])),
        );
        log::debug!(target: "io", "loaded chunk {:?}", existing.position);
        Ok(existing)
    }
}

use std::sync::Arc;

use tessel_blocks::{AIR, BlockId};

use crate::WorldError;
use crate::grid::GridSize;
use crate::listeners::{ListenerId, Listeners};
use crate::position::{BlockPosition, ChunkPosition};

/// Raised by `Chunk::set_block_id` before the new id is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkModified {
    pub chunk: ChunkPosition,
    pub local: BlockPosition,
    pub old: BlockId,
    pub new: BlockId,
}

/// Fixed-size cube of block ids.
///
/// The id array is shared copy-on-write with any outstanding snapshots, so
/// readers holding a snapshot never observe a later write.
pub struct Chunk {
    position: ChunkPosition,
    grid: GridSize,
    blocks: Arc<Vec<BlockId>>,
    listeners: Listeners<ChunkModified>,
}

impl Chunk {
    pub fn new(position: ChunkPosition, grid: GridSize) -> Self {
        Self {
            position,
            grid,
            blocks: Arc::new(vec![AIR; grid.volume()]),
            listeners: Listeners::new(),
        }
    }

    #[inline]
    pub fn position(&self) -> ChunkPosition {
        self.position
    }

    #[inline]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    #[inline]
    fn checked_index(&self, local: BlockPosition) -> Result<usize, WorldError> {
        if !self.grid.contains(local) {
            return Err(WorldError::OutOfBounds {
                position: local,
                size: self.grid.value(),
            });
        }
        Ok(local.index(self.grid))
    }

    pub fn get_block_id(&self, local: BlockPosition) -> Result<BlockId, WorldError> {
        let idx = self.checked_index(local)?;
        Ok(self.blocks[idx])
    }

    /// Writes `id` at `local`. Returns `Ok(false)` without notifying anyone when
    /// the id is already there.
    pub fn set_block_id(&mut self, local: BlockPosition, id: BlockId) -> Result<bool, WorldError> {
        let idx = self.checked_index(local)?;
        let old = self.blocks[idx];
        if old == id {
            return Ok(false);
        }
        self.listeners.emit(&ChunkModified {
            chunk: self.position,
            local,
            old,
            new: id,
        });
        Arc::make_mut(&mut self.blocks)[idx] = id;
        Ok(true)
    }

    /// Cheap shared view of the current ids, unaffected by later writes.
    #[inline]
    pub fn snapshot(&self) -> Arc<Vec<BlockId>> {
        Arc::clone(&self.blocks)
    }

    #[inline]
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Replaces the whole id array (used when loading). Does not raise per-block events.
    pub fn replace_blocks(&mut self, blocks: Vec<BlockId>) -> Result<(), WorldError> {
        if blocks.len() != self.grid.volume() {
            return Err(WorldError::VolumeMismatch {
                found: blocks.len(),
                expected: self.grid.volume(),
            });
        }
        self.blocks = Arc::new(blocks);
        Ok(())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| *b == AIR)
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&ChunkModified) + Send + 'static) -> ListenerId {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("position", &self.position)
            .field("grid", &self.grid)
            .field("blocks", &"<ids>")
            .field("listeners", &self.listeners)
            .finish()
    }
}

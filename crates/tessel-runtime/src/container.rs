use std::sync::Arc;

use hashbrown::HashSet;
use tessel_blocks::{BlockId, BlockRegistry};
use tessel_chunk::ChunkProperties;
use tessel_edit::EditBatch;
use tessel_geom::Side;
use tessel_io::{ChunkData, Database, LoadTask, PersistError, SaveTask, WorldProperties};
use tessel_world::{BlockPosition, Chunk, ChunkPosition, GridSize, World, WorldError};
use thiserror::Error;

use crate::remesh::{RemeshHandler, RemeshOutcome};

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error(transparent)]
    World(#[from] WorldError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("unknown block `{0}`")]
    UnknownBlock(String),
    #[error("no chunk at {0:?}")]
    MissingChunk(ChunkPosition),
    #[error("grid size mismatch: data uses {found} bits, world uses {expected}")]
    GridMismatch { found: u32, expected: u32 },
}

/// Counts from one `set_blocks` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditSummary {
    pub placements: usize,
    pub changed: usize,
    pub chunks_remeshed: usize,
}

/// Owns the world and routes every edit through dirty tracking and remeshing.
pub struct WorldContainer {
    name: String,
    world: World,
    registry: Arc<BlockRegistry>,
    remesh: RemeshHandler,
    database: Database,
    dirty: HashSet<ChunkPosition>,
}

impl WorldContainer {
    pub fn new(
        name: impl Into<String>,
        grid: GridSize,
        registry: Arc<BlockRegistry>,
        remesh: RemeshHandler,
        database: Database,
    ) -> Self {
        Self {
            name: name.into(),
            world: World::new(grid),
            registry,
            remesh,
            database,
            dirty: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn grid(&self) -> GridSize {
        self.world.grid()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    pub fn remesh(&self) -> &RemeshHandler {
        &self.remesh
    }

    pub fn remesh_mut(&mut self) -> &mut RemeshHandler {
        &mut self.remesh
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn get_block(&self, position: BlockPosition) -> BlockId {
        self.world.get_block(position)
    }

    /// Writes one block and remeshes what it touched. Returns false, touching
    /// nothing, when the id is already there.
    pub fn set_block(&mut self, position: BlockPosition, id: BlockId) -> Result<bool, ContainerError> {
        let changed = self.write_block(position, id)?;
        self.flush();
        Ok(changed)
    }

    pub fn set_block_named(&mut self, position: BlockPosition, name: &str) -> Result<bool, ContainerError> {
        let id = self
            .registry
            .id_by_name(name)
            .ok_or_else(|| ContainerError::UnknownBlock(name.to_string()))?;
        self.set_block(position, id)
    }

    /// Applies every placement of `batch`, then remeshes each dirtied chunk once.
    pub fn set_blocks(&mut self, batch: &dyn EditBatch) -> Result<EditSummary, ContainerError> {
        let mut summary = EditSummary::default();
        let mut result = Ok(());
        for placement in batch.placements() {
            summary.placements += 1;
            match self.write_block(placement.position, placement.block) {
                Ok(true) => summary.changed += 1,
                Ok(false) => {}
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }
        summary.chunks_remeshed = self.flush();
        log::info!(
            target: "edit",
            "batch applied: {} placements, {} changed, {} chunks remeshed",
            summary.placements,
            summary.changed,
            summary.chunks_remeshed
        );
        result.map(|_| summary)
    }

    fn write_block(&mut self, position: BlockPosition, id: BlockId) -> Result<bool, ContainerError> {
        let grid = self.grid();
        let chunk_pos = position.to_chunk_position(grid);
        let local = position.local(grid);
        let changed = self.world.create_chunk(chunk_pos).set_block_id(local, id)?;
        if changed {
            self.mark_dirty(chunk_pos, local);
        }
        Ok(changed)
    }

    // Owner plus the face neighbour on each axis where `local` sits on the border.
    fn mark_dirty(&mut self, chunk: ChunkPosition, local: BlockPosition) {
        let mask = self.grid().mask();
        self.dirty.insert(chunk);
        for (axis, neg, pos) in [
            (0, Side::NegX, Side::PosX),
            (1, Side::NegY, Side::PosY),
            (2, Side::NegZ, Side::PosZ),
        ] {
            let l = local.axis(axis);
            if l == 0 {
                self.dirty.extend(chunk.neighbor(neg));
            }
            if l == mask {
                self.dirty.extend(chunk.neighbor(pos));
            }
        }
    }

    fn mark_neighbors_dirty(&mut self, chunk: ChunkPosition) {
        for side in Side::ALL {
            self.dirty.extend(chunk.neighbor(side));
        }
    }

    /// Hands every dirty chunk that still exists to the remesher and clears the
    /// set. Returns how many chunks were dispatched.
    fn flush(&mut self) -> usize {
        let mut positions: Vec<ChunkPosition> = self.dirty.drain().collect();
        positions.sort();
        let mut queued = 0;
        for position in positions {
            if let Some(props) = ChunkProperties::bind(&self.world, position, self.registry.clone()) {
                self.remesh.queue_chunk(props);
                queued += 1;
            }
        }
        self.remesh.dispatch_queued();
        queued
    }

    /// Allocates an empty chunk. Nothing is remeshed.
    pub fn create_chunk(&mut self, position: ChunkPosition) -> &mut Chunk {
        self.world.create_chunk(position)
    }

    /// Removes a chunk and remeshes its existing face neighbours, whose borders
    /// are now open.
    pub fn destroy_chunk(&mut self, position: ChunkPosition) -> Option<Chunk> {
        let removed = self.world.destroy_chunk(position)?;
        self.mark_neighbors_dirty(position);
        self.flush();
        Some(removed)
    }

    /// Marks every chunk dirty and remeshes it.
    pub fn remesh_all(&mut self) -> usize {
        self.dirty.extend(self.world.positions());
        self.flush()
    }

    pub fn finish_tasks(&mut self) -> Vec<RemeshOutcome> {
        self.remesh.finish_tasks()
    }

    pub fn finish_all(&mut self) -> Vec<RemeshOutcome> {
        self.remesh.finish_all()
    }

    pub fn save_chunk(&self, position: ChunkPosition) -> Result<SaveTask, ContainerError> {
        let chunk = self
            .world
            .chunk(position)
            .ok_or(ContainerError::MissingChunk(position))?;
        Ok(self.database.save(ChunkData::from_chunk(chunk))?)
    }

    /// Saves every chunk, in position order.
    pub fn save_all_chunks(&self) -> Result<Vec<SaveTask>, ContainerError> {
        self.world
            .positions()
            .into_iter()
            .map(|p| self.save_chunk(p))
            .collect()
    }

    pub fn load_chunk(&self, position: ChunkPosition) -> Result<LoadTask<ChunkData>, ContainerError> {
        Ok(self.database.load(ChunkData::empty(position, self.grid()))?)
    }

    /// Installs loaded ids, creating the chunk if needed, and remeshes it with
    /// its existing neighbours.
    pub fn apply_loaded_chunk(&mut self, data: ChunkData) -> Result<(), ContainerError> {
        let grid = self.grid();
        if data.grid != grid {
            return Err(ContainerError::GridMismatch {
                found: data.grid.bits(),
                expected: grid.bits(),
            });
        }
        self.world
            .create_chunk(data.position)
            .replace_blocks(data.blocks)?;
        self.dirty.insert(data.position);
        self.mark_neighbors_dirty(data.position);
        self.flush();
        Ok(())
    }

    pub fn properties(&self) -> WorldProperties {
        WorldProperties::new(self.name.clone(), self.grid())
    }

    pub fn save_properties(&self) -> Result<SaveTask, ContainerError> {
        Ok(self.database.save(self.properties())?)
    }

    pub fn load_properties(&self) -> Result<LoadTask<WorldProperties>, ContainerError> {
        Ok(self.database.load(self.properties())?)
    }
}

impl std::fmt::Debug for WorldContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldContainer")
            .field("name", &self.name)
            .field("grid", &self.grid())
            .field("chunks", &self.world.len())
            .field("remesh", &self.remesh)
            .field("database", &self.database)
            .finish()
    }
}

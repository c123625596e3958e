use hashbrown::HashMap;
use tessel_blocks::{AIR, BlockId};

use crate::chunk::Chunk;
use crate::grid::GridSize;
use crate::listeners::ListenerId;
use crate::position::{BlockPosition, ChunkPosition};

/// Read access to chunks by position.
pub trait ChunkProvider {
    fn grid_size(&self) -> GridSize;
    fn chunk(&self, position: ChunkPosition) -> Option<&Chunk>;
}

/// Chunk lifecycle callbacks.
pub trait WorldObserver: Send {
    fn chunk_created(&mut self, _chunk: &Chunk, _provider: &dyn ChunkProvider) {}
    fn chunk_destroyed(&mut self, _chunk: &Chunk) {}
}

/// Sparse map of chunks. Chunks live until explicitly destroyed.
pub struct World {
    grid: GridSize,
    chunks: HashMap<ChunkPosition, Chunk>,
    observers: Vec<(ListenerId, Box<dyn WorldObserver>)>,
    next_observer: u64,
}

impl World {
    pub fn new(grid: GridSize) -> Self {
        Self {
            grid,
            chunks: HashMap::new(),
            observers: Vec::new(),
            next_observer: 1,
        }
    }

    #[inline]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Returns the chunk at `position`, allocating a zero-filled one first if needed.
    /// Only a fresh allocation notifies observers.
    pub fn create_chunk(&mut self, position: ChunkPosition) -> &mut Chunk {
        if !self.chunks.contains_key(&position) {
            self.chunks.insert(position, Chunk::new(position, self.grid));
            log::debug!(target: "world", "chunk created {:?}", position);
            self.notify_created(position);
        }
        let grid = self.grid;
        self.chunks
            .entry(position)
            .or_insert_with(|| Chunk::new(position, grid))
    }

    /// Inserts a fully built chunk, replacing any existing one at the same position.
    pub fn insert_chunk(&mut self, chunk: Chunk) {
        let position = chunk.position();
        let replaced = self.chunks.insert(position, chunk);
        if let Some(old) = replaced {
            self.notify_destroyed(&old);
        }
        self.notify_created(position);
    }

    pub fn destroy_chunk(&mut self, position: ChunkPosition) -> Option<Chunk> {
        let chunk = self.chunks.remove(&position)?;
        log::debug!(target: "world", "chunk destroyed {:?}", position);
        self.notify_destroyed(&chunk);
        Some(chunk)
    }

    fn notify_created(&mut self, position: ChunkPosition) {
        let mut observers = std::mem::take(&mut self.observers);
        if let Some(chunk) = self.chunks.get(&position) {
            for (_, obs) in observers.iter_mut() {
                obs.chunk_created(chunk, &*self);
            }
        }
        self.observers = observers;
    }

    fn notify_destroyed(&mut self, chunk: &Chunk) {
        for (_, obs) in self.observers.iter_mut() {
            obs.chunk_destroyed(chunk);
        }
    }

    #[inline]
    pub fn chunk(&self, position: ChunkPosition) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    #[inline]
    pub fn chunk_mut(&mut self, position: ChunkPosition) -> Option<&mut Chunk> {
        self.chunks.get_mut(&position)
    }

    #[inline]
    pub fn contains(&self, position: ChunkPosition) -> bool {
        self.chunks.contains_key(&position)
    }

    /// Positions of all live chunks, sorted.
    pub fn positions(&self) -> Vec<ChunkPosition> {
        let mut out: Vec<ChunkPosition> = self.chunks.keys().copied().collect();
        out.sort();
        out
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Block id at a world position, `AIR` when no chunk covers it.
    pub fn get_block(&self, position: BlockPosition) -> BlockId {
        let cpos = position.to_chunk_position(self.grid);
        self.chunks
            .get(&cpos)
            .map(|c| c.blocks()[position.local(self.grid).index(self.grid)])
            .unwrap_or(AIR)
    }

    pub fn subscribe(&mut self, observer: Box<dyn WorldObserver>) -> ListenerId {
        let id = ListenerId::from_raw(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }
}

impl ChunkProvider for World {
    #[inline]
    fn grid_size(&self) -> GridSize {
        self.grid
    }

    #[inline]
    fn chunk(&self, position: ChunkPosition) -> Option<&Chunk> {
        self.chunks.get(&position)
    }
}

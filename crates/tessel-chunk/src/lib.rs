//! Read-only chunk views bound for a single remesh pass.
#![forbid(unsafe_code)]

use std::sync::Arc;

use tessel_blocks::{AIR, BlockId, BlockRegistry, BlockType};
use tessel_geom::Side;
use tessel_world::{BlockPosition, ChunkPosition, ChunkProvider, GridSize};

/// Snapshot of one chunk plus the id arrays of its six face neighbours.
///
/// Arrays are captured at bind time; edits made to the world afterwards are not
/// visible here. A neighbour that did not exist at bind time reads as air.
#[derive(Clone, Debug)]
pub struct ChunkProperties {
    position: ChunkPosition,
    grid: GridSize,
    blocks: Arc<Vec<BlockId>>,
    neighbors: [Option<Arc<Vec<BlockId>>>; 6],
    registry: Arc<BlockRegistry>,
}

impl ChunkProperties {
    /// Returns `None` when no chunk exists at `position`.
    pub fn bind<P: ChunkProvider + ?Sized>(
        provider: &P,
        position: ChunkPosition,
        registry: Arc<BlockRegistry>,
    ) -> Option<Self> {
        let (blocks, neighbors) = capture(provider, position)?;
        Some(Self {
            position,
            grid: provider.grid_size(),
            blocks,
            neighbors,
            registry,
        })
    }

    /// Points this view at another chunk. Leaves the view untouched and returns
    /// false when the chunk does not exist.
    pub fn rebind<P: ChunkProvider + ?Sized>(&mut self, provider: &P, position: ChunkPosition) -> bool {
        let Some((blocks, neighbors)) = capture(provider, position) else {
            return false;
        };
        self.position = position;
        self.grid = provider.grid_size();
        self.blocks = blocks;
        self.neighbors = neighbors;
        true
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
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    /// World-space position of a local block.
    #[inline]
    pub fn world_position(&self, local: BlockPosition) -> BlockPosition {
        self.position.block_position(local, self.grid)
    }

    #[inline]
    pub fn in_bounds(&self, local: BlockPosition) -> bool {
        self.grid.contains(local)
    }

    #[inline]
    pub fn get_block(&self, local: BlockPosition) -> Option<BlockId> {
        if !self.in_bounds(local) {
            return None;
        }
        Some(self.blocks[local.index(self.grid)])
    }

    /// Id one step from `local` along `side`, reading into the neighbouring chunk
    /// when the step leaves this one.
    pub fn get_next_block(&self, local: BlockPosition, side: Side) -> BlockId {
        let next = local.offset(side);
        if self.in_bounds(next) {
            return self.blocks[next.index(self.grid)];
        }
        match &self.neighbors[side.index()] {
            Some(ids) => ids[next.local(self.grid).index(self.grid)],
            None => AIR,
        }
    }

    /// True when stepping from `local` along `side` leaves this chunk.
    #[inline]
    pub fn crosses_boundary(&self, local: BlockPosition, side: Side) -> bool {
        !self.in_bounds(local.offset(side))
    }

    #[inline]
    pub fn has_neighbor(&self, side: Side) -> bool {
        self.neighbors[side.index()].is_some()
    }

    #[inline]
    pub fn block_type(&self, id: BlockId) -> Option<&BlockType> {
        self.registry.get(id)
    }

    #[inline]
    pub fn is_solid(&self, id: BlockId) -> bool {
        self.registry.is_solid(id)
    }

    #[inline]
    pub fn is_visible(&self, id: BlockId) -> bool {
        self.registry.is_visible(id)
    }

    /// Every block of the chunk with its local position, in flat-index order.
    pub fn iter_blocks(&self) -> impl Iterator<Item = (BlockPosition, BlockId)> + '_ {
        let grid = self.grid;
        self.blocks
            .iter()
            .enumerate()
            .map(move |(i, id)| (BlockPosition::from_index(i, grid), *id))
    }

    #[inline]
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| *b == AIR)
    }
}

type Captured = (Arc<Vec<BlockId>>, [Option<Arc<Vec<BlockId>>>; 6]);

fn capture<P: ChunkProvider + ?Sized>(provider: &P, position: ChunkPosition) -> Option<Captured> {
    let blocks = provider.chunk(position)?.snapshot();
    let neighbors = Side::ALL.map(|side| {
        position
            .neighbor(side)
            .and_then(|p| provider.chunk(p))
            .map(|c| c.snapshot())
    });
    Some((blocks, neighbors))
}

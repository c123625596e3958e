//! Edit batches: lazy streams of block placements.
#![forbid(unsafe_code)]

mod pattern;

pub use pattern::{FillPattern, FloodFill, NoiseFill};

use tessel_blocks::BlockId;
use tessel_world::BlockPosition;

/// Desired id at one world position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockPlacement {
    pub position: BlockPosition,
    pub block: BlockId,
}

impl BlockPlacement {
    #[inline]
    pub const fn new(position: BlockPosition, block: BlockId) -> Self {
        Self { position, block }
    }
}

/// A set of placements. Each call to `placements` restarts the sequence; a
/// batch never touches the world itself.
pub trait EditBatch {
    fn placements(&self) -> Box<dyn Iterator<Item = BlockPlacement> + '_>;
}

/// Axis-aligned box of cells, inclusive on both corners, filled from a pattern.
#[derive(Clone, Debug)]
pub struct CuboidFill<P> {
    min: BlockPosition,
    max: BlockPosition,
    pattern: P,
}

impl<P: FillPattern> CuboidFill<P> {
    /// Corners may be given in any order.
    pub fn new(a: BlockPosition, b: BlockPosition, pattern: P) -> Self {
        Self {
            min: BlockPosition::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockPosition::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
            pattern,
        }
    }

    #[inline]
    pub fn min(&self) -> BlockPosition {
        self.min
    }

    #[inline]
    pub fn max(&self) -> BlockPosition {
        self.max
    }

    #[inline]
    pub fn pattern(&self) -> &P {
        &self.pattern
    }

    /// Number of cells covered, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        let extent = |lo: i32, hi: i32| (i64::from(hi) - i64::from(lo) + 1) as u64;
        let cells = extent(self.min.x, self.max.x)
            .saturating_mul(extent(self.min.y, self.max.y))
            .saturating_mul(extent(self.min.z, self.max.z));
        usize::try_from(cells).unwrap_or(usize::MAX)
    }

    /// Always false; a cuboid covers at least one cell.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl<P: FillPattern> EditBatch for CuboidFill<P> {
    fn placements(&self) -> Box<dyn Iterator<Item = BlockPlacement> + '_> {
        let (min, max) = (self.min, self.max);
        Box::new((min.x..=max.x).flat_map(move |x| {
            (min.y..=max.y).flat_map(move |y| {
                (min.z..=max.z).map(move |z| {
                    let p = BlockPosition::new(x, y, z);
                    BlockPlacement::new(p, self.pattern.block_at(p))
                })
            })
        }))
    }
}

/// Explicit placements applied in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlacementList {
    items: Vec<BlockPlacement>,
}

impl PlacementList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, position: BlockPosition, block: BlockId) {
        self.items.push(BlockPlacement::new(position, block));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<BlockPlacement> for PlacementList {
    fn from_iter<I: IntoIterator<Item = BlockPlacement>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl EditBatch for PlacementList {
    fn placements(&self) -> Box<dyn Iterator<Item = BlockPlacement> + '_> {
        Box::new(self.items.iter().copied())
    }
}

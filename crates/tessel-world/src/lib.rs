//! Chunk storage, world addressing, and lifecycle notifications.
#![forbid(unsafe_code)]

mod chunk;
mod grid;
mod listeners;
mod position;
mod world;

pub use chunk::{Chunk, ChunkModified};
pub use grid::GridSize;
pub use listeners::{ListenerId, Listeners};
pub use position::{BlockPosition, ChunkPosition};
pub use world::{ChunkProvider, World, WorldObserver};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("grid bit count {bits} outside 0..={max}", max = GridSize::MAX_BITS)]
    InvalidGridBits { bits: i32 },
    #[error("local position {position:?} outside chunk of size {size}")]
    OutOfBounds { position: BlockPosition, size: i32 },
    #[error("block array of length {found} does not match chunk volume {expected}")]
    VolumeMismatch { found: usize, expected: usize },
}

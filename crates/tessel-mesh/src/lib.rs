//! Greedy surface extraction into layered procedural meshes.
#![forbid(unsafe_code)]

mod greedy;
mod layered;
mod mesher;
mod proc_mesh;

pub use greedy::greedy_rects;
pub use layered::LayeredProcMesh;
pub use mesher::{MesherKind, build_chunk_mesh};
pub use proc_mesh::ProcMesh;

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MeshError {
    #[error("mesh would exceed 32-bit index range ({vertices} vertices)")]
    IndexOverflow { vertices: usize },
}

//! Block, texture-face, and registry crate.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;
pub mod types;

pub use registry::{BlockRegistry, RegistryError};
pub use types::{AIR, AtlasId, BlockId, BlockType, FaceRotation, FaceTexture};

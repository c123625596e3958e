#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use tessel_blocks::{BlockId, BlockRegistry};
use tessel_io::Database;
use tessel_runtime::{RemeshHandler, WorldContainer};
use tessel_task::TaskPool;
use tessel_world::GridSize;

pub const BLOCKS: &str = r#"
[[blocks]]
name = "stone"
[blocks.textures]
all = { atlas = 0, index = 1 }

[[blocks]]
name = "grass"
[blocks.textures]
all = { atlas = 0, index = 3 }
top = { atlas = 1, index = 0 }

[[blocks]]
name = "water"
solid = false
[blocks.textures]
all = { atlas = 2, index = 0 }

[[blocks]]
name = "barrier"
visible = false
"#;

pub const STONE: BlockId = 1;
pub const GRASS: BlockId = 2;
pub const WATER: BlockId = 3;
pub const BARRIER: BlockId = 4;

pub fn registry() -> Arc<BlockRegistry> {
    Arc::new(BlockRegistry::from_toml_str(BLOCKS).unwrap())
}

pub fn grid() -> GridSize {
    GridSize::new(2).unwrap()
}

pub fn container(root: &Path) -> WorldContainer {
    container_with_grid(root, grid())
}

pub fn container_with_grid(root: &Path, grid: GridSize) -> WorldContainer {
    let mesh = TaskPool::new("mesh-test", 2).unwrap();
    let io = TaskPool::new("io-test", 1).unwrap();
    WorldContainer::new(
        "test",
        grid,
        registry(),
        RemeshHandler::new(mesh),
        Database::with_default_handlers(root, io),
    )
}

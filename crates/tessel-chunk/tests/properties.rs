use std::sync::Arc;

use proptest::prelude::*;
use tessel_blocks::{AIR, BlockRegistry};
use tessel_blocks::config::BlockDef;
use tessel_chunk::ChunkProperties;
use tessel_geom::Side;
use tessel_world::{BlockPosition, ChunkPosition, GridSize, World};

fn registry() -> Arc<BlockRegistry> {
    let mut reg = BlockRegistry::new();
    reg.register(BlockDef::new("stone")).unwrap();
    reg.register(BlockDef::new("glass").visible(false)).unwrap();
    Arc::new(reg)
}

fn world() -> World {
    World::new(GridSize::new(2).unwrap())
}

#[test]
fn get_block_is_bounded_to_the_chunk() {
    let mut w = world();
    w.create_chunk(ChunkPosition::default())
        .set_block_id(BlockPosition::new(3, 0, 1), 1)
        .unwrap();
    let props = ChunkProperties::bind(&w, ChunkPosition::default(), registry()).unwrap();
    assert_eq!(props.get_block(BlockPosition::new(3, 0, 1)), Some(1));
    assert_eq!(props.get_block(BlockPosition::new(4, 0, 1)), None);
    assert_eq!(props.get_block(BlockPosition::new(0, -1, 0)), None);
}

#[test]
fn next_block_crosses_into_neighbor() {
    let mut w = world();
    let origin = ChunkPosition::default();
    w.create_chunk(origin);
    w.create_chunk(ChunkPosition::new(1, 0, 0))
        .set_block_id(BlockPosition::new(0, 2, 3), 1)
        .unwrap();
    let props = ChunkProperties::bind(&w, origin, registry()).unwrap();

    assert_eq!(props.get_next_block(BlockPosition::new(3, 2, 3), Side::PosX), 1);
    assert!(props.crosses_boundary(BlockPosition::new(3, 2, 3), Side::PosX));
    // -x neighbour absent: open boundary
    assert_eq!(props.get_next_block(BlockPosition::new(0, 2, 3), Side::NegX), AIR);
    assert_eq!(props.get_next_block(BlockPosition::new(2, 2, 3), Side::PosX), AIR);
}

#[test]
fn later_world_edits_are_not_observed() {
    let mut w = world();
    let origin = ChunkPosition::default();
    let top = ChunkPosition::new(0, 1, 0);
    w.create_chunk(origin)
        .set_block_id(BlockPosition::new(1, 1, 1), 1)
        .unwrap();
    w.create_chunk(top);
    let props = ChunkProperties::bind(&w, origin, registry()).unwrap();

    w.chunk_mut(origin)
        .unwrap()
        .set_block_id(BlockPosition::new(1, 1, 1), 2)
        .unwrap();
    w.chunk_mut(top)
        .unwrap()
        .set_block_id(BlockPosition::new(1, 0, 1), 1)
        .unwrap();
    w.destroy_chunk(origin);

    assert_eq!(props.get_block(BlockPosition::new(1, 1, 1)), Some(1));
    assert_eq!(props.get_next_block(BlockPosition::new(1, 3, 1), Side::PosY), AIR);
}

#[test]
fn registry_queries_pass_through() {
    let mut w = world();
    w.create_chunk(ChunkPosition::default());
    let props = ChunkProperties::bind(&w, ChunkPosition::default(), registry()).unwrap();
    assert!(props.is_solid(1) && props.is_visible(1));
    assert!(props.is_solid(2) && !props.is_visible(2));
    assert!(!props.is_solid(AIR));
    assert_eq!(props.block_type(1).map(|t| t.name.as_str()), Some("stone"));
    assert!(props.is_empty());
}

proptest! {
    // iter_blocks visits each local position once in flat-index order
    #[test]
    fn iter_blocks_matches_get_block(ids in proptest::collection::vec(0u16..3, 64)) {
        let mut w = world();
        w.create_chunk(ChunkPosition::new(2, -1, 0)).replace_blocks(ids.clone()).unwrap();
        let props = ChunkProperties::bind(&w, ChunkPosition::new(2, -1, 0), registry()).unwrap();
        let mut n = 0;
        for (i, (local, id)) in props.iter_blocks().enumerate() {
            prop_assert_eq!(local.index(props.grid()), i);
            prop_assert_eq!(props.get_block(local), Some(id));
            prop_assert_eq!(id, ids[i]);
            n += 1;
        }
        prop_assert_eq!(n, 64);
    }
}

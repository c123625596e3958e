mod support;

use support::{GRASS, STONE, container, container_with_grid, grid};
use tempfile::TempDir;
use tessel_edit::{CuboidFill, FloodFill, PlacementList};
use tessel_io::ChunkData;
use tessel_runtime::{ContainerError, EditSummary, WorldContainer};
use tessel_world::{BlockPosition, ChunkPosition, GridSize};

fn cp(x: i32, y: i32, z: i32) -> ChunkPosition {
    ChunkPosition::new(x, y, z)
}

// Container with every chunk in [-1, 1]^3 allocated.
fn populated(dir: &TempDir) -> WorldContainer {
    let mut c = container(dir.path());
    for x in -1..=1 {
        for y in -1..=1 {
            for z in -1..=1 {
                c.create_chunk(cp(x, y, z));
            }
        }
    }
    c
}

fn remeshed_positions(c: &mut WorldContainer) -> Vec<ChunkPosition> {
    let mut out: Vec<ChunkPosition> = c
        .finish_all()
        .into_iter()
        .map(|o| o.expect("remesh").position)
        .collect();
    out.sort();
    out
}

fn set_and_collect(c: &mut WorldContainer, x: i32, y: i32, z: i32) -> Vec<ChunkPosition> {
    assert!(c.set_block(BlockPosition::new(x, y, z), STONE).unwrap());
    remeshed_positions(c)
}

#[test]
fn interior_edit_dirties_only_owner() {
    let dir = TempDir::new().unwrap();
    let mut c = populated(&dir);
    assert_eq!(set_and_collect(&mut c, 1, 1, 1), vec![cp(0, 0, 0)]);
}

#[test]
fn border_edits_dirty_face_neighbors_only() {
    let dir = TempDir::new().unwrap();
    let mut c = populated(&dir);
    assert_eq!(set_and_collect(&mut c, 0, 1, 1), vec![cp(-1, 0, 0), cp(0, 0, 0)]);
    assert_eq!(
        set_and_collect(&mut c, 0, 0, 1),
        vec![cp(-1, 0, 0), cp(0, -1, 0), cp(0, 0, 0)]
    );
    // corner: three face neighbours, no edge or corner diagonals
    assert_eq!(
        set_and_collect(&mut c, 3, 3, 3),
        vec![cp(0, 0, 0), cp(0, 0, 1), cp(0, 1, 0), cp(1, 0, 0)]
    );
}

#[test]
fn negative_world_positions_resolve_chunks() {
    let dir = TempDir::new().unwrap();
    let mut c = populated(&dir);
    // world -1 is local 3 of chunk -1: dirties chunk -1 and its +x neighbour, chunk 0
    assert_eq!(set_and_collect(&mut c, -1, 1, 1), vec![cp(-1, 0, 0), cp(0, 0, 0)]);
    assert_eq!(c.get_block(BlockPosition::new(-1, 1, 1)), STONE);
}

#[test]
fn unchanged_write_dispatches_nothing() {
    let dir = TempDir::new().unwrap();
    let mut c = populated(&dir);
    let p = BlockPosition::new(2, 2, 2);
    assert!(c.set_block(p, STONE).unwrap());
    c.finish_all();
    let before = c.remesh().dispatch_count();
    assert!(!c.set_block(p, STONE).unwrap());
    assert_eq!(c.remesh().dispatch_count(), before);
    assert!(c.finish_all().is_empty());
}

#[test]
fn missing_neighbors_are_skipped() {
    let dir = TempDir::new().unwrap();
    let mut c = container(dir.path());
    assert_eq!(set_and_collect(&mut c, 0, 0, 0), vec![cp(0, 0, 0)]);
    assert_eq!(c.world().len(), 1);
}

#[test]
fn batch_dispatches_once_per_dirty_chunk() {
    let dir = TempDir::new().unwrap();
    let mut c = populated(&dir);
    let fill = CuboidFill::new(
        BlockPosition::new(0, 0, 0),
        BlockPosition::new(7, 1, 1),
        FloodFill(STONE),
    );
    let before = c.remesh().dispatch_count();
    let summary = c.set_blocks(&fill).unwrap();
    assert_eq!(
        summary,
        EditSummary {
            placements: 32,
            changed: 32,
            chunks_remeshed: 7,
        }
    );
    assert_eq!(c.remesh().dispatch_count() - before, 7);
    // chunk (2,0,0) was never allocated
    assert_eq!(
        remeshed_positions(&mut c),
        vec![
            cp(-1, 0, 0),
            cp(0, -1, 0),
            cp(0, 0, -1),
            cp(0, 0, 0),
            cp(1, -1, 0),
            cp(1, 0, -1),
            cp(1, 0, 0),
        ]
    );
}

#[test]
fn batch_counts_unchanged_placements() {
    let dir = TempDir::new().unwrap();
    let mut c = container(dir.path());
    let mut list = PlacementList::new();
    list.push(BlockPosition::new(1, 1, 1), GRASS);
    list.push(BlockPosition::new(1, 1, 1), GRASS);
    let summary = c.set_blocks(&list).unwrap();
    assert_eq!((summary.placements, summary.changed, summary.chunks_remeshed), (2, 1, 1));
}

#[test]
fn named_blocks_resolve_through_registry() {
    let dir = TempDir::new().unwrap();
    let mut c = container(dir.path());
    assert!(c.set_block_named(BlockPosition::new(0, 0, 0), "grass").unwrap());
    assert_eq!(c.get_block(BlockPosition::new(0, 0, 0)), GRASS);
    assert!(matches!(
        c.set_block_named(BlockPosition::new(0, 0, 0), "lava"),
        Err(ContainerError::UnknownBlock(name)) if name == "lava"
    ));
}

#[test]
fn edit_produces_visual_and_collision_report() {
    let dir = TempDir::new().unwrap();
    let mut c = container(dir.path());
    c.set_block(BlockPosition::new(1, 1, 1), STONE).unwrap();
    let out = c.finish_all();
    let report = out[0].as_ref().unwrap();
    assert_eq!(report.visual.layer(0).unwrap().quad_count(), 6);
    assert_eq!(report.collision.layer(0).unwrap().quad_count(), 6);
}

#[test]
fn destroy_remeshes_existing_neighbors() {
    let dir = TempDir::new().unwrap();
    let mut c = populated(&dir);
    assert!(c.destroy_chunk(cp(0, 0, 0)).is_some());
    assert_eq!(remeshed_positions(&mut c).len(), 6);
    assert!(c.destroy_chunk(cp(0, 0, 0)).is_none());
}

#[test]
fn save_and_reload_roundtrip() {
    let dir = TempDir::new().unwrap();
    let mut c = container(dir.path());
    let fill = CuboidFill::new(
        BlockPosition::new(-2, 0, -2),
        BlockPosition::new(5, 2, 1),
        |p: BlockPosition| if (p.x + p.z) % 2 == 0 { STONE } else { GRASS },
    );
    c.set_blocks(&fill).unwrap();
    c.finish_all();
    for task in c.save_all_chunks().unwrap() {
        task.finish().unwrap();
    }
    c.save_properties().unwrap().finish().unwrap();

    let mut fresh = container(dir.path());
    let props = fresh.load_properties().unwrap().finish().unwrap();
    assert_eq!(props, c.properties());
    for pos in c.world().positions() {
        let data = fresh.load_chunk(pos).unwrap().finish().unwrap();
        fresh.apply_loaded_chunk(data).unwrap();
    }
    fresh.finish_all();
    assert_eq!(fresh.world().positions(), c.world().positions());
    for pos in c.world().positions() {
        assert_eq!(
            fresh.world().chunk(pos).unwrap().blocks(),
            c.world().chunk(pos).unwrap().blocks()
        );
    }
}

#[test]
fn loaded_data_must_match_grid() {
    let dir = TempDir::new().unwrap();
    let mut c = container(dir.path());
    let data = ChunkData::empty(cp(0, 0, 0), GridSize::new(3).unwrap());
    assert!(matches!(
        c.apply_loaded_chunk(data),
        Err(ContainerError::GridMismatch { found: 3, expected: 2 })
    ));
    assert_eq!(grid().bits(), 2);
    assert!(matches!(
        c.save_chunk(cp(4, 4, 4)),
        Err(ContainerError::MissingChunk(_))
    ));
}

#[test]
fn edits_at_coordinate_extremes_skip_missing_neighbors() {
    let dir = TempDir::new().unwrap();
    // one-block chunks: chunk coordinates equal block coordinates
    let mut c = container_with_grid(dir.path(), GridSize::new(0).unwrap());
    for p in [
        BlockPosition::new(i32::MAX, 0, 0),
        BlockPosition::new(i32::MIN, i32::MAX, i32::MIN),
    ] {
        assert!(c.set_block(p, STONE).unwrap());
        assert_eq!(c.get_block(p), STONE);
    }
    let out = remeshed_positions(&mut c);
    assert_eq!(out, vec![cp(i32::MIN, i32::MAX, i32::MIN), cp(i32::MAX, 0, 0)]);
    assert_eq!(c.remesh_all(), 2);
    let removed = c.destroy_chunk(cp(i32::MAX, 0, 0)).unwrap();
    assert_eq!(removed.position(), cp(i32::MAX, 0, 0));
}

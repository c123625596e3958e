use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use tessel_blocks::{BlockId, BlockRegistry};
use tessel_edit::{CuboidFill, EditBatch, FloodFill, NoiseFill};
use tessel_io::Database;
use tessel_runtime::{RemeshHandler, RemeshOutcome, WorldContainer};
use tessel_task::TaskPool;
use tessel_world::{BlockPosition, GridSize};

use crate::config::TesselConfig;

/// Everything a CLI command needs to build and persist one container.
pub struct Session {
    registry: Arc<BlockRegistry>,
    grid: GridSize,
    name: String,
    save_root: PathBuf,
    mesh_pool: TaskPool,
    io_pool: TaskPool,
}

impl Session {
    pub fn open(cfg: &TesselConfig) -> Result<Self, Box<dyn Error>> {
        let registry = Arc::new(BlockRegistry::from_path(&cfg.blocks_path)?);
        log::info!(
            "loaded {} block types from {}",
            registry.len(),
            cfg.blocks_path.display()
        );
        let grid = GridSize::new(cfg.world.grid_bits)?;
        Ok(Self {
            registry,
            grid,
            name: cfg.world.name.clone(),
            save_root: cfg.world.save_dir.join(&cfg.world.name),
            mesh_pool: TaskPool::new("tessel-mesh", cfg.runtime.mesh_workers)?,
            io_pool: TaskPool::new("tessel-io", cfg.runtime.io_workers)?,
        })
    }

    fn container(&self) -> WorldContainer {
        WorldContainer::new(
            self.name.clone(),
            self.grid,
            self.registry.clone(),
            RemeshHandler::new(self.mesh_pool.clone()),
            Database::with_default_handlers(self.save_root.clone(), self.io_pool.clone()),
        )
    }

    fn block(&self, name: &str) -> Result<BlockId, Box<dyn Error>> {
        self.registry
            .id_by_name(name)
            .ok_or_else(|| format!("unknown block `{name}`").into())
    }

    pub fn fill(&self, from: BlockPosition, to: BlockPosition, block: &str) -> Result<(), Box<dyn Error>> {
        let id = self.block(block)?;
        let mut c = self.container();
        apply(&mut c, &CuboidFill::new(from, to, FloodFill(id)))?;
        Ok(())
    }

    pub fn noise(
        &self,
        from: BlockPosition,
        to: BlockPosition,
        block: &str,
        seed: i32,
    ) -> Result<(), Box<dyn Error>> {
        let id = self.block(block)?;
        let mut c = self.container();
        apply(&mut c, &CuboidFill::new(from, to, NoiseFill::new(seed, id)))?;
        Ok(())
    }

    pub fn roundtrip(&self, block: &str, seed: i32) -> Result<(), Box<dyn Error>> {
        let id = self.block(block)?;
        let size = self.grid.value();
        let mut original = self.container();
        let fill = CuboidFill::new(
            BlockPosition::new(-size, -size, -size),
            BlockPosition::new(size * 2 - 1, size - 1, size - 1),
            NoiseFill::new(seed, id),
        );
        apply(&mut original, &fill)?;

        let mut saves = original.save_all_chunks()?;
        saves.push(original.save_properties()?);
        let written = saves.len();
        for task in saves {
            task.finish()?;
        }
        log::info!("saved {} files under {}", written, self.save_root.display());

        let mut fresh = self.container();
        let props = fresh.load_properties()?.finish()?;
        if props != original.properties() {
            return Err(format!("world properties differ after reload: {props:?}").into());
        }
        let loads = original
            .world()
            .positions()
            .into_iter()
            .map(|pos| fresh.load_chunk(pos))
            .collect::<Result<Vec<_>, _>>()?;
        for task in loads {
            fresh.apply_loaded_chunk(task.finish()?)?;
        }
        report(&fresh.finish_all());

        for pos in original.world().positions() {
            let same = match (original.world().chunk(pos), fresh.world().chunk(pos)) {
                (Some(a), Some(b)) => a.blocks() == b.blocks(),
                _ => false,
            };
            if !same {
                return Err(format!("chunk {pos:?} differs after reload").into());
            }
        }
        log::info!(
            "roundtrip ok: {} chunks of {} identical",
            fresh.world().len(),
            props.name
        );
        Ok(())
    }
}

fn apply(c: &mut WorldContainer, batch: &dyn EditBatch) -> Result<(), Box<dyn Error>> {
    let summary = c.set_blocks(batch)?;
    log::info!(
        "{} placements, {} changed, {} chunks remeshed",
        summary.placements,
        summary.changed,
        summary.chunks_remeshed
    );
    report(&c.finish_all());
    Ok(())
}

fn report(outcomes: &[RemeshOutcome]) {
    let (mut quads, mut vertices) = (0usize, 0usize);
    for outcome in outcomes {
        match outcome {
            Ok(r) => {
                for (layer, mesh) in r.visual.active() {
                    log::info!(
                        "chunk {:?} visual layer {}: {} quads, {} vertices",
                        r.position,
                        layer,
                        mesh.quad_count(),
                        mesh.vertex_count()
                    );
                }
                log::info!(
                    "chunk {:?} collision: {} quads",
                    r.position,
                    r.collision.quad_count()
                );
                quads += r.visual.quad_count();
                vertices += r.visual.vertex_count();
            }
            Err(f) => log::error!("chunk {:?} failed to remesh: {}", f.position, f.error),
        }
    }
    log::info!(
        "{} chunks meshed: {} visual quads, {} vertices",
        outcomes.len(),
        quads,
        vertices
    );
}

//! Chunk and world-property persistence on a background pool.
#![forbid(unsafe_code)]

mod chunk_data;
mod codec;
mod database;
mod world_properties;

pub use chunk_data::{CHUNK_FILE_VERSION, ChunkData, ChunkDataHandler};
pub use database::Database;
pub use world_properties::{
    WORLD_FILE_VERSION, WorldFileFormat, WorldProperties, WorldPropertiesHandler,
};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tessel_task::{Task, TaskError, TaskPool};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unrecognized file version {found} (supported: {supported})")]
    UnrecognizedVersion { found: i32, supported: i32 },
    #[error("no persistence handler registered for `{type_name}`")]
    MissingHandler { type_name: &'static str },
    #[error("corrupt data: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Task(#[from] TaskError),
}

/// Encodes and decodes one value type under a database root directory.
///
/// Implementations do blocking I/O; callers run them through `save`/`load`.
pub trait PersistenceHandler<T>: Send + Sync {
    fn write(&self, root: &Path, value: &T) -> Result<(), PersistError>;

    /// Reads into `existing`, which also identifies what to load (e.g. a chunk position).
    fn read(&self, root: &Path, existing: T) -> Result<T, PersistError>;
}

/// Pending save. Errors surface only through `finish`.
#[derive(Debug)]
pub struct SaveTask {
    task: Task<Result<(), PersistError>>,
}

impl SaveTask {
    pub fn is_finished(&mut self) -> bool {
        self.task.is_finished()
    }

    pub fn finish(self) -> Result<(), PersistError> {
        self.task.finish()?
    }
}

/// Pending load yielding the filled value.
#[derive(Debug)]
pub struct LoadTask<T> {
    task: Task<Result<T, PersistError>>,
}

impl<T> LoadTask<T> {
    pub fn is_finished(&mut self) -> bool {
        self.task.is_finished()
    }

    pub fn finish(self) -> Result<T, PersistError> {
        self.task.finish()?
    }
}

/// Runs `handler.write` on `pool`.
pub fn save<T, H>(pool: &TaskPool, handler: Arc<H>, root: PathBuf, value: T) -> SaveTask
where
    T: Send + 'static,
    H: PersistenceHandler<T> + ?Sized + 'static,
{
    let type_name = std::any::type_name::<T>();
    let task = pool.spawn(move || {
        let out = handler.write(&root, &value);
        if let Err(e) = &out {
            log::warn!(target: "io", "save {} under {} failed: {}", type_name, root.display(), e);
        }
        out
    });
    SaveTask { task }
}

/// Runs `handler.read` on `pool`.
pub fn load<T, H>(pool: &TaskPool, handler: Arc<H>, root: PathBuf, existing: T) -> LoadTask<T>
where
    T: Send + 'static,
    H: PersistenceHandler<T> + ?Sized + 'static,
{
    let type_name = std::any::type_name::<T>();
    let task = pool.spawn(move || {
        let out = handler.read(&root, existing);
        if let Err(e) = &out {
            log::warn!(target: "io", "load {} under {} failed: {}", type_name, root.display(), e);
        }
        out
    });
    LoadTask { task }
}

use std::any::{Any, TypeId, type_name};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hashbrown::HashMap;
use tessel_task::TaskPool;

use crate::chunk_data::{ChunkData, ChunkDataHandler};
use crate::world_properties::{WorldProperties, WorldPropertiesHandler};
use crate::{LoadTask, PersistError, PersistenceHandler, SaveTask};

/// Persistence handlers keyed by the value type they store, all rooted at one directory.
pub struct Database {
    root: PathBuf,
    pool: TaskPool,
    // TypeId::of::<T>() -> Arc<dyn PersistenceHandler<T>>
    handlers: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Database {
    pub fn new(root: impl Into<PathBuf>, pool: TaskPool) -> Self {
        Self {
            root: root.into(),
            pool,
            handlers: HashMap::new(),
        }
    }

    /// A database with the chunk-data and world-properties codecs registered.
    pub fn with_default_handlers(root: impl Into<PathBuf>, pool: TaskPool) -> Self {
        let mut db = Self::new(root, pool);
        db.register::<ChunkData>(ChunkDataHandler);
        db.register::<WorldProperties>(WorldPropertiesHandler);
        db
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Installs the handler for `T`, replacing any previous one.
    pub fn register<T: Send + 'static>(&mut self, handler: impl PersistenceHandler<T> + 'static) {
        let handler: Arc<dyn PersistenceHandler<T>> = Arc::new(handler);
        self.handlers.insert(TypeId::of::<T>(), Box::new(handler));
    }

    pub fn has_handler<T: 'static>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<T>())
    }

    fn handler<T: 'static>(&self) -> Result<Arc<dyn PersistenceHandler<T>>, PersistError> {
        self.handlers
            .get(&TypeId::of::<T>())
            .and_then(|h| h.downcast_ref::<Arc<dyn PersistenceHandler<T>>>())
            .cloned()
            .ok_or(PersistError::MissingHandler {
                type_name: type_name::<T>(),
            })
    }

    pub fn save<T: Send + 'static>(&self, value: T) -> Result<SaveTask, PersistError> {
        let handler = self.handler::<T>()?;
        log::info!(target: "io", "saving {} under {}", type_name::<T>(), self.root.display());
        Ok(crate::save(&self.pool, handler, self.root.clone(), value))
    }

    pub fn load<T: Send + 'static>(&self, existing: T) -> Result<LoadTask<T>, PersistError> {
        let handler = self.handler::<T>()?;
        log::info!(target: "io", "loading {} from {}", type_name::<T>(), self.root.display());
        Ok(crate::load(&self.pool, handler, self.root.clone(), existing))
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("root", &self.root)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tessel_geom::Side;
use thiserror::Error;

use super::config::{BlockDef, BlocksConfig};
use super::types::{AIR, BlockId, BlockType, FaceTexture};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read block config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse block config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("block name `{0}` registered twice")]
    DuplicateName(String),
    #[error("block id {id} already taken by `{existing}`")]
    DuplicateId { id: BlockId, existing: String },
    #[error("block id 0 and the name `air` are reserved")]
    ReservedAir,
}

/// Block-type table. Id 0 is always `air`.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    blocks: Vec<Option<BlockType>>,
    by_name: HashMap<String, BlockId>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    pub fn new() -> Self {
        let air = BlockType::air();
        let mut by_name = HashMap::new();
        by_name.insert(air.name.clone(), AIR);
        Self {
            blocks: vec![Some(air)],
            by_name,
        }
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, RegistryError> {
        let mut reg = BlockRegistry::new();
        for def in cfg.blocks {
            reg.register(def)?;
        }
        Ok(reg)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, RegistryError> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Adds a block type, assigning the next free id unless the definition carries one.
    pub fn register(&mut self, def: BlockDef) -> Result<BlockId, RegistryError> {
        if def.name == "air" || def.id == Some(AIR) {
            return Err(RegistryError::ReservedAir);
        }
        if self.by_name.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        let id = match def.id {
            Some(id) => id,
            None => self.next_free_id(),
        };
        if let Some(Some(existing)) = self.blocks.get(id as usize) {
            return Err(RegistryError::DuplicateId {
                id,
                existing: existing.name.clone(),
            });
        }
        let solid = def.solid.unwrap_or(true);
        let visible = def.visible.unwrap_or(true);
        let faces = def
            .textures
            .as_ref()
            .map(|t| t.resolve_all())
            .unwrap_or([FaceTexture::default(); 6]);
        if self.blocks.len() <= id as usize {
            self.blocks.resize(id as usize + 1, None);
        }
        self.by_name.insert(def.name.clone(), id);
        self.blocks[id as usize] = Some(BlockType {
            id,
            name: def.name,
            solid,
            visible,
            faces,
        });
        Ok(id)
    }

    fn next_free_id(&self) -> BlockId {
        self.blocks
            .iter()
            .position(|b| b.is_none())
            .unwrap_or(self.blocks.len()) as BlockId
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize).and_then(|b| b.as_ref())
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn is_solid(&self, id: BlockId) -> bool {
        self.get(id).is_some_and(|t| t.solid)
    }

    #[inline]
    pub fn is_visible(&self, id: BlockId) -> bool {
        self.get(id).is_some_and(|t| t.visible)
    }

    #[inline]
    pub fn face(&self, id: BlockId, side: Side) -> Option<FaceTexture> {
        self.get(id).map(|t| t.face(side))
    }

    /// Number of registered block types, including air.
    pub fn len(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockType> {
        self.blocks.iter().flatten()
    }
}

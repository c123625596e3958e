use serde::Deserialize;
use tessel_geom::Side;

use crate::types::{BlockId, FaceTexture};

// Top-level blocks config file
#[derive(Deserialize, Debug, Default)]
pub struct BlocksConfig {
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<BlockId>,
    #[serde(default)]
    pub solid: Option<bool>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub textures: Option<TexturesDef>,
}

impl BlockDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            solid: None,
            visible: None,
            textures: None,
        }
    }

    pub fn with_id(mut self, id: BlockId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn solid(mut self, solid: bool) -> Self {
        self.solid = Some(solid);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn textures(mut self, textures: TexturesDef) -> Self {
        self.textures = Some(textures);
        self
    }
}

/// Face texture selectors. Specific faces win over `top`/`bottom`/`side`, which win over `all`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TexturesDef {
    #[serde(default)]
    pub all: Option<FaceTexture>,
    #[serde(default)]
    pub top: Option<FaceTexture>,
    #[serde(default)]
    pub bottom: Option<FaceTexture>,
    #[serde(default)]
    pub side: Option<FaceTexture>,
    #[serde(default)]
    pub pos_x: Option<FaceTexture>,
    #[serde(default)]
    pub neg_x: Option<FaceTexture>,
    #[serde(default)]
    pub pos_y: Option<FaceTexture>,
    #[serde(default)]
    pub neg_y: Option<FaceTexture>,
    #[serde(default)]
    pub pos_z: Option<FaceTexture>,
    #[serde(default)]
    pub neg_z: Option<FaceTexture>,
}

impl TexturesDef {
    pub fn all(tex: FaceTexture) -> Self {
        Self {
            all: Some(tex),
            ..Self::default()
        }
    }

    pub fn resolve(&self, side: Side) -> FaceTexture {
        let (exact, role) = match side {
            Side::PosY => (self.pos_y, self.top),
            Side::NegY => (self.neg_y, self.bottom),
            Side::PosX => (self.pos_x, self.side),
            Side::NegX => (self.neg_x, self.side),
            Side::PosZ => (self.pos_z, self.side),
            Side::NegZ => (self.neg_z, self.side),
        };
        exact.or(role).or(self.all).unwrap_or_default()
    }

    pub fn resolve_all(&self) -> [FaceTexture; 6] {
        let mut faces = [FaceTexture::default(); 6];
        for side in Side::ALL {
            faces[side.index()] = self.resolve(side);
        }
        faces
    }
}

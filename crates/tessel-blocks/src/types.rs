use serde::Deserialize;
use tessel_geom::Side;

pub type BlockId = u16;

/// Reserved id for empty space. Also returned for positions with no backing chunk.
pub const AIR: BlockId = 0;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct AtlasId(pub u16);

impl AtlasId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceRotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
    /// Quarter turn picked per block from its world position.
    Random,
}

impl FaceRotation {
    /// Number of clockwise quarter turns to apply for a face of the block at `(x,y,z)`.
    pub fn quarter_turns(self, x: i32, y: i32, z: i32) -> u8 {
        match self {
            FaceRotation::None => 0,
            FaceRotation::Cw90 => 1,
            FaceRotation::Cw180 => 2,
            FaceRotation::Cw270 => 3,
            FaceRotation::Random => (position_hash(x, y, z) >> 30) as u8,
        }
    }

    #[inline]
    pub fn is_random(self) -> bool {
        matches!(self, FaceRotation::Random)
    }
}

// Stable across runs and platforms; only the top two bits are consumed.
fn position_hash(x: i32, y: i32, z: i32) -> u32 {
    let mut h = (x as u32).wrapping_mul(0x8da6_b343)
        ^ (y as u32).wrapping_mul(0xd816_3841)
        ^ (z as u32).wrapping_mul(0xcb1a_b31f);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize)]
pub struct FaceTexture {
    pub atlas: AtlasId,
    #[serde(default)]
    pub index: u16,
    #[serde(default)]
    pub rotation: FaceRotation,
}

impl FaceTexture {
    pub const fn new(atlas: u16, index: u16) -> Self {
        Self {
            atlas: AtlasId(atlas),
            index,
            rotation: FaceRotation::None,
        }
    }

    pub const fn rotated(mut self, rotation: FaceRotation) -> Self {
        self.rotation = rotation;
        self
    }
}

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub solid: bool,
    pub visible: bool,
    /// Indexed by `Side::index`.
    pub faces: [FaceTexture; 6],
}

impl BlockType {
    pub fn air() -> Self {
        Self {
            id: AIR,
            name: "air".to_string(),
            solid: false,
            visible: false,
            faces: [FaceTexture::default(); 6],
        }
    }

    #[inline]
    pub fn face(&self, side: Side) -> FaceTexture {
        self.faces[side.index()]
    }

    /// Iterates the distinct atlases referenced by this block's faces, in side order.
    pub fn atlases(&self) -> impl Iterator<Item = AtlasId> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter(|(i, f)| !self.faces[..*i].iter().any(|g| g.atlas == f.atlas))
            .map(|(_, f)| f.atlas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_rotations_ignore_position() {
        assert_eq!(FaceRotation::None.quarter_turns(5, 6, 7), 0);
        assert_eq!(FaceRotation::Cw90.quarter_turns(-1, 0, 3), 1);
        assert_eq!(FaceRotation::Cw270.quarter_turns(0, 0, 0), 3);
    }

    #[test]
    fn random_rotation_is_deterministic_and_varied() {
        let mut seen = [false; 4];
        for x in -8..8 {
            for z in -8..8 {
                let a = FaceRotation::Random.quarter_turns(x, 3, z);
                assert_eq!(a, FaceRotation::Random.quarter_turns(x, 3, z));
                seen[a as usize] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn atlases_are_deduplicated() {
        let mut ty = BlockType::air();
        ty.faces = [FaceTexture::new(2, 0); 6];
        ty.faces[Side::PosY.index()] = FaceTexture::new(1, 4);
        let atlases: Vec<_> = ty.atlases().collect();
        assert_eq!(atlases, vec![AtlasId(1), AtlasId(2)]);
    }
}

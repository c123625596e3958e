use crate::WorldError;
use crate::position::BlockPosition;

/// Power-of-two chunk edge length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSize {
    bits: u32,
}

impl GridSize {
    /// Largest supported bit count; keeps `volume` comfortably inside 32-bit indices.
    pub const MAX_BITS: i32 = 10;

    pub fn new(bits: i32) -> Result<Self, WorldError> {
        if !(0..=Self::MAX_BITS).contains(&bits) {
            return Err(WorldError::InvalidGridBits { bits });
        }
        Ok(Self { bits: bits as u32 })
    }

    #[inline]
    pub fn bits(self) -> u32 {
        self.bits
    }

    /// Edge length, `2^bits`.
    #[inline]
    pub fn value(self) -> i32 {
        1 << self.bits
    }

    #[inline]
    pub fn mask(self) -> i32 {
        self.value() - 1
    }

    #[inline]
    pub fn volume(self) -> usize {
        let v = self.value() as usize;
        v * v * v
    }

    /// True if every component of `local` lies in `[0, value)`.
    #[inline]
    pub fn contains(self, local: BlockPosition) -> bool {
        let n = self.value();
        (0..n).contains(&local.x) && (0..n).contains(&local.y) && (0..n).contains(&local.z)
    }
}

use core::ops::{Add, BitAnd, Mul, Sub};

use tessel_geom::Side;

use crate::grid::GridSize;

/// Integer block coordinate, either world-space or chunk-local.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Integer chunk coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPosition {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn offset(self, side: Side) -> Self {
        let (dx, dy, dz) = side.delta();
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Component by axis index `0 = x`, `1 = y`, `2 = z`.
    #[inline]
    pub fn axis(self, axis: usize) -> i32 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Builds a position from `(axis, value)` components.
    #[inline]
    pub fn from_axes(parts: [(usize, i32); 3]) -> Self {
        let mut p = Self::default();
        for (axis, value) in parts {
            match axis {
                0 => p.x = value,
                1 => p.y = value,
                _ => p.z = value,
            }
        }
        p
    }

    /// Chunk containing this world position. Arithmetic shift, so negatives floor.
    #[inline]
    pub fn to_chunk_position(self, grid: GridSize) -> ChunkPosition {
        let b = grid.bits();
        ChunkPosition::new(self.x >> b, self.y >> b, self.z >> b)
    }

    /// Position inside the owning chunk.
    #[inline]
    pub fn local(self, grid: GridSize) -> BlockPosition {
        self & grid.mask()
    }

    /// Flat index of a chunk-local position: `x*size² + y*size + z`.
    #[inline]
    pub fn index(self, grid: GridSize) -> usize {
        let b = grid.bits();
        ((self.x << (2 * b)) | (self.y << b) | self.z) as usize
    }

    #[inline]
    pub fn from_index(index: usize, grid: GridSize) -> BlockPosition {
        let b = grid.bits();
        let m = grid.mask();
        let i = index as i32;
        BlockPosition::new((i >> (2 * b)) & m, (i >> b) & m, i & m)
    }
}

impl ChunkPosition {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// World-space position of local block `(0,0,0)`.
    #[inline]
    pub fn origin(self, grid: GridSize) -> BlockPosition {
        let b = grid.bits();
        BlockPosition::new(self.x << b, self.y << b, self.z << b)
    }

    #[inline]
    pub fn block_position(self, local: BlockPosition, grid: GridSize) -> BlockPosition {
        self.origin(grid) + local
    }

    /// Face-adjacent chunk, or `None` past the edge of the `i32` coordinate range.
    #[inline]
    pub fn neighbor(self, side: Side) -> Option<ChunkPosition> {
        let (dx, dy, dz) = side.delta();
        Some(Self::new(
            self.x.checked_add(dx)?,
            self.y.checked_add(dy)?,
            self.z.checked_add(dz)?,
        ))
    }
}

macro_rules! impl_int_ops {
    ($t:ident) => {
        impl Add for $t {
            type Output = $t;
            #[inline]
            fn add(self, rhs: $t) -> $t {
                $t::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
            }
        }

        impl Sub for $t {
            type Output = $t;
            #[inline]
            fn sub(self, rhs: $t) -> $t {
                $t::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
            }
        }

        impl Mul<i32> for $t {
            type Output = $t;
            #[inline]
            fn mul(self, rhs: i32) -> $t {
                $t::new(self.x * rhs, self.y * rhs, self.z * rhs)
            }
        }

        impl BitAnd<i32> for $t {
            type Output = $t;
            #[inline]
            fn bitand(self, rhs: i32) -> $t {
                $t::new(self.x & rhs, self.y & rhs, self.z & rhs)
            }
        }

        impl From<(i32, i32, i32)> for $t {
            fn from(value: (i32, i32, i32)) -> Self {
                Self::new(value.0, value.1, value.2)
            }
        }

        impl From<$t> for (i32, i32, i32) {
            fn from(value: $t) -> Self {
                (value.x, value.y, value.z)
            }
        }
    };
}

impl_int_ops!(BlockPosition);
impl_int_ops!(ChunkPosition);

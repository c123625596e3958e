//! Minimal geometry types shared by the voxel crates.
#![forbid(unsafe_code)]

use core::ops::{Add, AddAssign, Mul, Neg, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const X: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const Y: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Unit vector along axis `0 = x`, `1 = y`, `2 = z`.
    #[inline]
    pub fn unit(axis: usize) -> Vec3 {
        match axis {
            0 => Vec3::X,
            1 => Vec3::Y,
            _ => Vec3::Z,
        }
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Texture coordinate pair.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One of the six axis-aligned face directions of a voxel.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Side {
    PosY = 0,
    NegY = 1,
    PosX = 2,
    NegX = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Side {
    /// Fixed iteration order used wherever output must be deterministic.
    pub const ALL: [Side; 6] = [
        Side::PosY,
        Side::NegY,
        Side::PosX,
        Side::NegX,
        Side::PosZ,
        Side::NegZ,
    ];

    /// Returns the `[0..6)` index of this side.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts a side index `[0..6)` back into a `Side`.
    #[inline]
    pub fn from_index(i: usize) -> Option<Side> {
        Side::ALL.get(i).copied()
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Side::PosY => (0, 1, 0),
            Side::NegY => (0, -1, 0),
            Side::PosX => (1, 0, 0),
            Side::NegX => (-1, 0, 0),
            Side::PosZ => (0, 0, 1),
            Side::NegZ => (0, 0, -1),
        }
    }

    #[inline]
    pub fn normal(self) -> Vec3 {
        let (dx, dy, dz) = self.delta();
        Vec3::new(dx as f32, dy as f32, dz as f32)
    }

    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::PosY => Side::NegY,
            Side::NegY => Side::PosY,
            Side::PosX => Side::NegX,
            Side::NegX => Side::PosX,
            Side::PosZ => Side::NegZ,
            Side::NegZ => Side::PosZ,
        }
    }

    /// Axis the face is perpendicular to: `0 = x`, `1 = y`, `2 = z`.
    #[inline]
    pub fn axis(self) -> usize {
        match self {
            Side::PosX | Side::NegX => 0,
            Side::PosY | Side::NegY => 1,
            Side::PosZ | Side::NegZ => 2,
        }
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        matches!(self, Side::PosX | Side::PosY | Side::PosZ)
    }

    /// In-plane `(u, v)` axes of a face slice. `u` is the primary (width) axis.
    #[inline]
    pub fn plane_axes(self) -> (usize, usize) {
        match self.axis() {
            0 => (2, 1),
            1 => (0, 2),
            _ => (0, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn small() -> impl Strategy<Value = f32> {
        -10.0f32..10.0
    }

    proptest! {
        #[test]
        fn cross_is_orthogonal(ax in small(), ay in small(), az in small(), bx in small(), by in small(), bz in small()) {
            let a = Vec3::new(ax, ay, az);
            let b = Vec3::new(bx, by, bz);
            let c = a.cross(b);
            prop_assert!(c.dot(a).abs() <= 1e-2);
            prop_assert!(c.dot(b).abs() <= 1e-2);
        }
    }

    #[test]
    fn plane_axes_exclude_normal_axis() {
        for side in Side::ALL {
            let (u, v) = side.plane_axes();
            assert_ne!(u, side.axis());
            assert_ne!(v, side.axis());
            assert_ne!(u, v);
        }
    }
}

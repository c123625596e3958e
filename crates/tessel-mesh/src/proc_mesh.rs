use tessel_geom::{Vec2, Vec3};

use crate::MeshError;

/// Triangle mesh with parallel per-vertex channels.
///
/// `uvs` and `texture_indices` are either empty or the same length as
/// `vertices`. Collision meshes leave them empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcMesh {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub texture_indices: Vec<u32>,
    pub triangles: Vec<u32>,
}

impl ProcMesh {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn has_triangles(&self) -> bool {
        !self.triangles.is_empty()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.triangles.len() / 6
    }

    #[inline]
    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty()
    }

    /// Clears every channel but retains capacity for reuse.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.normals.clear();
        self.uvs.clear();
        self.texture_indices.clear();
        self.triangles.clear();
    }

    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.vertices.reserve(n_quads * 4);
        self.normals.reserve(n_quads * 4);
        self.triangles.reserve(n_quads * 6);
    }

    fn check_room(&self, extra: usize) -> Result<u32, MeshError> {
        let total = self.vertices.len() + extra;
        if total > u32::MAX as usize {
            return Err(MeshError::IndexOverflow { vertices: total });
        }
        Ok(self.vertices.len() as u32)
    }

    /// Appends a quad as triangles `0-1-2` and `0-2-3`.
    ///
    /// Corners are reordered when needed so the winding is counter-clockwise
    /// seen from the side `normal` points to.
    pub fn add_quad(
        &mut self,
        corners: [Vec3; 4],
        normal: Vec3,
        uvs: Option<([Vec2; 4], u32)>,
    ) -> Result<(), MeshError> {
        let base = self.check_room(4)?;
        let mut vs = corners;
        let mut tex = uvs;
        let e1 = vs[1] - vs[0];
        let e2 = vs[2] - vs[0];
        if e1.cross(e2).dot(normal) < 0.0 {
            vs.swap(1, 3);
            if let Some((uv, _)) = tex.as_mut() {
                uv.swap(1, 3);
            }
        }

        match tex {
            Some((uv, index)) => {
                if self.uvs.len() < self.vertices.len() {
                    self.uvs.resize(self.vertices.len(), Vec2::ZERO);
                    self.texture_indices.resize(self.vertices.len(), 0);
                }
                self.uvs.extend_from_slice(&uv);
                self.texture_indices.extend_from_slice(&[index; 4]);
            }
            None if self.has_uvs() => {
                self.uvs.extend_from_slice(&[Vec2::ZERO; 4]);
                self.texture_indices.extend_from_slice(&[0; 4]);
            }
            None => {}
        }
        self.vertices.extend_from_slice(&vs);
        self.normals.extend_from_slice(&[normal; 4]);
        self.triangles
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        Ok(())
    }

    /// Appends `other`, re-basing its indices past the current vertices.
    pub fn add_data(&mut self, other: &ProcMesh) -> Result<(), MeshError> {
        let base = self.check_room(other.vertices.len())?;
        let before = self.vertices.len();
        if other.has_uvs() || (self.has_uvs() && !other.vertices.is_empty()) {
            self.uvs.resize(before, Vec2::ZERO);
            self.texture_indices.resize(before, 0);
            if other.has_uvs() {
                self.uvs.extend_from_slice(&other.uvs);
                self.texture_indices.extend_from_slice(&other.texture_indices);
            } else {
                self.uvs.resize(before + other.vertices.len(), Vec2::ZERO);
                self.texture_indices.resize(before + other.vertices.len(), 0);
            }
        }
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.triangles
            .extend(other.triangles.iter().map(|i| i + base));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad_y(y: f32) -> [Vec3; 4] {
        [
            Vec3::new(0.0, y, 0.0),
            Vec3::new(1.0, y, 0.0),
            Vec3::new(1.0, y, 1.0),
            Vec3::new(0.0, y, 1.0),
        ]
    }

    #[test]
    fn winding_follows_normal() {
        let mut m = ProcMesh::new();
        m.add_quad(unit_quad_y(1.0), Vec3::Y, None).unwrap();
        m.add_quad(unit_quad_y(0.0), -Vec3::Y, None).unwrap();
        for t in m.triangles.chunks(3) {
            let (a, b, c) = (m.vertices[t[0] as usize], m.vertices[t[1] as usize], m.vertices[t[2] as usize]);
            let n = m.normals[t[0] as usize];
            assert!((b - a).cross(c - a).dot(n) > 0.0);
        }
        assert_eq!(m.triangle_count(), 4);
        assert!(!m.has_uvs());
    }

    #[test]
    fn add_data_rebases_indices() {
        let mut a = ProcMesh::new();
        a.add_quad(unit_quad_y(0.0), Vec3::Y, Some(([Vec2::ZERO; 4], 3))).unwrap();
        let b = a.clone();
        a.add_data(&b).unwrap();
        assert_eq!(a.vertex_count(), 8);
        assert_eq!(&a.triangles[6..], &[4, 5, 6, 4, 6, 7]);
        assert_eq!(a.texture_indices, vec![3; 8]);
    }

    #[test]
    fn channels_stay_parallel_when_mixed() {
        let mut m = ProcMesh::new();
        m.add_quad(unit_quad_y(0.0), Vec3::Y, None).unwrap();
        m.add_quad(unit_quad_y(1.0), Vec3::Y, Some(([Vec2::new(1.0, 1.0); 4], 2))).unwrap();
        m.add_quad(unit_quad_y(2.0), Vec3::Y, None).unwrap();
        assert_eq!(m.uvs.len(), m.vertices.len());
        assert_eq!(m.texture_indices, vec![0, 0, 0, 0, 2, 2, 2, 2, 0, 0, 0, 0]);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut m = ProcMesh::new();
        m.add_quad(unit_quad_y(0.0), Vec3::Y, None).unwrap();
        let cap = m.vertices.capacity();
        m.clear();
        assert!(!m.has_triangles());
        assert_eq!(m.vertices.capacity(), cap);
    }
}

use crate::MeshError;
use crate::proc_mesh::ProcMesh;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Bitset {
    data: Vec<u64>,
}

impl Bitset {
    #[inline]
    fn set(&mut self, i: usize) {
        let w = i >> 6;
        if w >= self.data.len() {
            self.data.resize(w + 1, 0);
        }
        self.data[w] |= 1u64 << (i & 63);
    }

    #[inline]
    fn get(&self, i: usize) -> bool {
        self.data
            .get(i >> 6)
            .is_some_and(|w| (w >> (i & 63)) & 1 != 0)
    }
}

/// Meshes addressed by small dense layer indices (one per texture atlas).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayeredProcMesh {
    layers: Vec<ProcMesh>,
    touched: Bitset,
}

impl LayeredProcMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable access to layer `i`, allocating it (and any gap below it) on first use.
    pub fn get_layer(&mut self, i: usize) -> &mut ProcMesh {
        if i >= self.layers.len() {
            self.layers.resize_with(i + 1, ProcMesh::default);
        }
        self.touched.set(i);
        &mut self.layers[i]
    }

    #[inline]
    pub fn layer(&self, i: usize) -> Option<&ProcMesh> {
        self.layers.get(i)
    }

    #[inline]
    pub fn is_touched(&self, i: usize) -> bool {
        self.touched.get(i)
    }

    /// Highest layer index ever accessed, plus one.
    #[inline]
    pub fn total_layers(&self) -> usize {
        self.layers.len()
    }

    /// Number of layers that currently hold triangles.
    pub fn active_layers(&self) -> usize {
        self.layers.iter().filter(|m| m.has_triangles()).count()
    }

    pub fn active(&self) -> impl Iterator<Item = (usize, &ProcMesh)> {
        self.layers
            .iter()
            .enumerate()
            .filter(|(_, m)| m.has_triangles())
    }

    pub fn has_triangles(&self) -> bool {
        self.layers.iter().any(|m| m.has_triangles())
    }

    pub fn vertex_count(&self) -> usize {
        self.layers.iter().map(|m| m.vertex_count()).sum()
    }

    pub fn quad_count(&self) -> usize {
        self.layers.iter().map(|m| m.quad_count()).sum()
    }

    /// Empties every layer. Allocated layers and their capacity are kept.
    pub fn clear(&mut self) {
        for m in &mut self.layers {
            m.clear();
        }
    }

    /// Merges `other` into this mesh layer by layer.
    pub fn append(&mut self, other: &LayeredProcMesh) -> Result<(), MeshError> {
        for (i, m) in other.layers.iter().enumerate() {
            if other.is_touched(i) {
                self.get_layer(i).add_data(m)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_geom::Vec3;

    fn quad() -> [Vec3; 4] {
        [Vec3::ZERO, Vec3::X, Vec3::X + Vec3::Z, Vec3::Z]
    }

    #[test]
    fn get_layer_grows_and_tracks_touched() {
        let mut l = LayeredProcMesh::new();
        l.get_layer(3).add_quad(quad(), Vec3::Y, None).unwrap();
        assert_eq!(l.total_layers(), 4);
        assert_eq!(l.active_layers(), 1);
        assert!(l.is_touched(3));
        assert!(!l.is_touched(1));
        assert!(l.layer(1).is_some_and(|m| !m.has_triangles()));
        assert!(l.layer(4).is_none());
    }

    #[test]
    fn clear_keeps_total_layers() {
        let mut l = LayeredProcMesh::new();
        l.get_layer(2).add_quad(quad(), Vec3::Y, None).unwrap();
        l.clear();
        assert_eq!(l.total_layers(), 3);
        assert_eq!(l.active_layers(), 0);
    }

    #[test]
    fn append_merges_per_layer() {
        let mut a = LayeredProcMesh::new();
        a.get_layer(0).add_quad(quad(), Vec3::Y, None).unwrap();
        let mut b = LayeredProcMesh::new();
        b.get_layer(0).add_quad(quad(), Vec3::Y, None).unwrap();
        b.get_layer(2).add_quad(quad(), Vec3::Y, None).unwrap();
        a.append(&b).unwrap();
        assert_eq!(a.layer(0).map(|m| m.quad_count()), Some(2));
        assert_eq!(a.layer(2).map(|m| m.quad_count()), Some(1));
        assert!(!a.is_touched(1));
        let active: Vec<usize> = a.active().map(|(i, _)| i).collect();
        assert_eq!(active, vec![0, 2]);
    }
}

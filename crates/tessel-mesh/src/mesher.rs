use tessel_blocks::{AtlasId, FaceRotation};
use tessel_chunk::ChunkProperties;
use tessel_geom::{Side, Vec2, Vec3};
use tessel_world::BlockPosition;

use crate::MeshError;
use crate::greedy::greedy_rects;
use crate::layered::LayeredProcMesh;

/// Which surface a mesher task extracts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MesherKind {
    /// Faces between solid and non-solid space. Chunk borders always count as open.
    Collision,
    /// Visible faces textured from one atlas.
    Visual { atlas: AtlasId },
}

// Faces merge only when their keys are equal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FaceKey {
    Collision,
    Visual {
        index: u16,
        rotation: FaceRotation,
        // Non-zero only for randomly rotated faces, which must stay separate.
        cell: u32,
    },
}

impl MesherKind {
    /// Output layer for this kind: the atlas id for visual meshes, `0` for collision.
    #[inline]
    pub fn layer(self) -> usize {
        match self {
            MesherKind::Collision => 0,
            MesherKind::Visual { atlas } => atlas.index(),
        }
    }

    #[inline]
    pub fn is_visual(self) -> bool {
        matches!(self, MesherKind::Visual { .. })
    }

    /// Whether the block at `local` contributes a face on `side` for this kind.
    pub fn can_place_quad(self, props: &ChunkProperties, local: BlockPosition, side: Side) -> bool {
        let Some(id) = props.get_block(local) else {
            return false;
        };
        match self {
            MesherKind::Collision => {
                props.is_solid(id)
                    && (props.crosses_boundary(local, side)
                        || !props.is_solid(props.get_next_block(local, side)))
            }
            MesherKind::Visual { atlas } => {
                props.is_visible(id)
                    && props
                        .registry()
                        .face(id, side)
                        .is_some_and(|f| f.atlas == atlas)
                    && !props.is_visible(props.get_next_block(local, side))
            }
        }
    }

    fn face_key(self, props: &ChunkProperties, local: BlockPosition, side: Side) -> Option<FaceKey> {
        if !self.can_place_quad(props, local, side) {
            return None;
        }
        match self {
            MesherKind::Collision => Some(FaceKey::Collision),
            MesherKind::Visual { .. } => {
                let id = props.get_block(local)?;
                let tex = props.registry().face(id, side)?;
                let cell = if tex.rotation.is_random() {
                    local.index(props.grid()) as u32 + 1
                } else {
                    0
                };
                Some(FaceKey::Visual {
                    index: tex.index,
                    rotation: tex.rotation,
                    cell,
                })
            }
        }
    }
}

#[derive(Copy, Clone)]
struct Rect {
    u: usize,
    v: usize,
    w: usize,
    h: usize,
    key: FaceKey,
}

/// Runs one greedy pass over every face direction and depth slice of the bound chunk.
///
/// Quads are emitted in chunk-local space. Equal input always produces
/// identical buffers.
pub fn build_chunk_mesh(props: &ChunkProperties, kind: MesherKind) -> Result<LayeredProcMesh, MeshError> {
    let n = props.grid().value() as usize;
    let mut out = LayeredProcMesh::new();
    let mut mask: Vec<Option<FaceKey>> = vec![None; n * n];
    let mut rects: Vec<Rect> = Vec::new();

    for side in Side::ALL {
        let axis = side.axis();
        let (ua, va) = side.plane_axes();
        for depth in 0..n {
            for v in 0..n {
                for u in 0..n {
                    let local = BlockPosition::from_axes([
                        (axis, depth as i32),
                        (ua, u as i32),
                        (va, v as i32),
                    ]);
                    mask[v * n + u] = kind.face_key(props, local, side);
                }
            }
            greedy_rects(n, n, &mask, |u, v, w, h, key| rects.push(Rect { u, v, w, h, key }));
            for rect in rects.drain(..) {
                emit_quad(&mut out, props, kind, side, depth, rect)?;
            }
        }
    }
    log::trace!(
        target: "mesh",
        "{:?} {:?}: {} quads",
        props.position(),
        kind,
        out.quad_count()
    );
    Ok(out)
}

fn emit_quad(
    out: &mut LayeredProcMesh,
    props: &ChunkProperties,
    kind: MesherKind,
    side: Side,
    depth: usize,
    rect: Rect,
) -> Result<(), MeshError> {
    let axis = side.axis();
    let (ua, va) = side.plane_axes();
    let plane = (if side.is_positive() { depth + 1 } else { depth }) as f32;
    let (u0, v0) = (rect.u as f32, rect.v as f32);
    let (w, h) = (rect.w as f32, rect.h as f32);
    let at = |u: f32, v: f32| {
        Vec3::unit(axis) * plane + Vec3::unit(ua) * u + Vec3::unit(va) * v
    };
    let corners = [at(u0, v0), at(u0 + w, v0), at(u0 + w, v0 + h), at(u0, v0 + h)];

    let tex = match rect.key {
        FaceKey::Collision => None,
        FaceKey::Visual { index, rotation, .. } => {
            let local = BlockPosition::from_axes([
                (axis, depth as i32),
                (ua, rect.u as i32),
                (va, rect.v as i32),
            ]);
            let world = props.world_position(local);
            let turns = rotation.quarter_turns(world.x, world.y, world.z);
            Some((rotated_uvs(w, h, turns), index as u32))
        }
    };
    out.get_layer(kind.layer()).add_quad(corners, side.normal(), tex)
}

/// Corner UVs spanning `(0,0)-(w,h)`, turned clockwise `turns` quarter turns.
fn rotated_uvs(w: f32, h: f32, turns: u8) -> [Vec2; 4] {
    let base = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];
    base.map(|(u, v)| {
        let (x, y) = match turns & 3 {
            0 => (u, v),
            1 => (v, w - u),
            2 => (w - u, h - v),
            _ => (h - v, u),
        };
        Vec2::new(x, y)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uv_rotation_permutes_corners() {
        let r0 = rotated_uvs(2.0, 1.0, 0);
        assert_eq!(r0[2], Vec2::new(2.0, 1.0));
        let r2 = rotated_uvs(2.0, 1.0, 2);
        assert_eq!(r2[0], Vec2::new(2.0, 1.0));
        assert_eq!(r2[2], Vec2::ZERO);
        let r1 = rotated_uvs(1.0, 1.0, 1);
        assert_eq!(r1[0], Vec2::new(0.0, 1.0));
    }

    #[test]
    fn layer_index_follows_kind() {
        assert_eq!(MesherKind::Collision.layer(), 0);
        assert_eq!(MesherKind::Visual { atlas: AtlasId(5) }.layer(), 5);
    }
}

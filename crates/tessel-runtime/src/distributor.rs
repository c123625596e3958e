use std::collections::BTreeSet;

use hashbrown::HashSet;
use tessel_blocks::AtlasId;
use tessel_chunk::ChunkProperties;
use tessel_mesh::MesherKind;

/// Decides which mesher tasks a chunk needs. Several distributors may add to
/// the same task list.
pub trait Distributor: Send + Sync {
    fn plan(&self, props: &ChunkProperties, out: &mut Vec<MesherKind>);
}

/// One visual task per distinct atlas used by a visible block (ascending atlas
/// order), then one collision task if any block is solid.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardDistributor;

impl Distributor for StandardDistributor {
    fn plan(&self, props: &ChunkProperties, out: &mut Vec<MesherKind>) {
        let mut seen = HashSet::new();
        let mut atlases: BTreeSet<AtlasId> = BTreeSet::new();
        let mut any_solid = false;
        for &id in props.blocks() {
            if !seen.insert(id) {
                continue;
            }
            let Some(ty) = props.block_type(id) else {
                continue;
            };
            if ty.visible {
                atlases.extend(ty.atlases());
            }
            any_solid |= ty.solid;
        }
        out.extend(atlases.into_iter().map(|atlas| MesherKind::Visual { atlas }));
        if any_solid {
            out.push(MesherKind::Collision);
        }
    }
}

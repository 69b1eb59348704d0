use crate::bounding_volume::Aabb;
use crate::cut::CutError;
use crate::math::Real;
use crate::mesh::{Discretization, ElementId, StructureLabel};
use crate::utils::TOL7;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use rstar::{RTree, RTreeObject, AABB};

/// A cutter element stored in the search tree.
#[derive(Copy, Clone, Debug, PartialEq)]
struct CutterLeaf {
    id: ElementId,
    aabb: Aabb,
}

impl RTreeObject for CutterLeaf {
    type Envelope = AABB<[Real; 3]>;

    fn envelope(&self) -> Self::Envelope {
        self.aabb.into()
    }
}

/// One search tree per structure of the cutter mesh.
struct Structure {
    aabb: Aabb,
    tree: RTree<CutterLeaf>,
}

/// A spatial index over the cutter elements, split by structure label.
///
/// Queries are conservative: every cutter element whose (slightly enlarged) AABB
/// overlaps the query box is returned.
pub struct CutterTree {
    structures: BTreeMap<StructureLabel, Structure>,
}

/// The AABB of a cutter element, enlarged to absorb round-off.
fn cutter_aabb(cutter: &Discretization, id: ElementId) -> Result<Aabb, CutError> {
    let element = cutter.element(id)?;
    let aabb = cutter.element_aabb(element)?;
    Ok(aabb.loosened(TOL7 * aabb.diagonal().max(1.0)))
}

impl CutterTree {
    /// Builds the index over every element of `cutter`.
    pub fn new(cutter: &Discretization) -> Result<Self, CutError> {
        let mut leaves: BTreeMap<StructureLabel, Vec<CutterLeaf>> = BTreeMap::new();
        for element in cutter.elements() {
            let aabb = cutter_aabb(cutter, element.id)?;
            leaves
                .entry(cutter.label(element.id))
                .or_default()
                .push(CutterLeaf {
                    id: element.id,
                    aabb,
                });
        }

        let structures = leaves
            .into_iter()
            .map(|(label, leaves)| {
                let aabb = leaves
                    .iter()
                    .fold(Aabb::new_invalid(), |acc, leaf| acc.merged(&leaf.aabb));
                log::debug!(
                    "cutter structure {} indexed with {} elements",
                    label,
                    leaves.len()
                );
                let tree = RTree::bulk_load(leaves);
                (label, Structure { aabb, tree })
            })
            .collect();

        Ok(Self { structures })
    }

    /// The structure labels present in the index.
    pub fn labels(&self) -> impl Iterator<Item = StructureLabel> + '_ {
        self.structures.keys().copied()
    }

    /// Ids of the cutter elements whose AABB overlaps `aabb`, sorted increasingly.
    pub fn candidates(&self, aabb: &Aabb) -> Vec<ElementId> {
        let envelope: AABB<[Real; 3]> = (*aabb).into();
        let mut result: Vec<_> = self
            .structures
            .values()
            .filter(|s| s.aabb.intersects(aabb))
            .flat_map(|s| s.tree.locate_in_envelope_intersecting(&envelope))
            .map(|leaf| leaf.id)
            .collect();
        result.sort_unstable();
        result.dedup();
        result
    }
}

/// Reference search: tests every cutter element against `aabb`.
pub fn linear_candidates(cutter: &Discretization, aabb: &Aabb) -> Result<Vec<ElementId>, CutError> {
    let mut result = Vec::new();
    for element in cutter.elements() {
        if cutter_aabb(cutter, element.id)?.intersects(aabb) {
            result.push(element.id);
        }
    }
    result.sort_unstable();
    Ok(result)
}

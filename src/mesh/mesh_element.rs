use crate::cut::CutError;
use crate::mesh::{ElementId, NodeId};
use crate::shape::ShapeKind;
use alloc::vec::Vec;

/// An element: a shape and the global ids of its nodes in reference order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct MeshElement {
    /// The element id. Sub-elements use their local line/surface index.
    pub id: ElementId,
    /// The reference shape.
    pub kind: ShapeKind,
    /// Global node ids.
    pub nodes: Vec<NodeId>,
}

impl MeshElement {
    /// Creates an element, checking the node count against the shape.
    pub fn new(id: ElementId, kind: ShapeKind, nodes: Vec<NodeId>) -> Result<Self, CutError> {
        if nodes.len() != kind.num_nodes() {
            return Err(CutError::WrongNodeCount {
                element: id,
                kind,
                found: nodes.len(),
            });
        }

        Ok(Self { id, kind, nodes })
    }

    /// The line `i` of this element as a stand-alone element.
    pub fn line(&self, i: usize) -> Option<MeshElement> {
        let kind = self.kind.line_kind()?;
        let local = self.kind.lines().get(i)?;
        Some(MeshElement {
            id: i,
            kind,
            nodes: local.iter().map(|n| self.nodes[*n]).collect(),
        })
    }

    /// The surface `i` of this element as a stand-alone element.
    pub fn surface(&self, i: usize) -> Option<MeshElement> {
        let kind = self.kind.surface_kind()?;
        let local = self.kind.surfaces().get(i)?;
        Some(MeshElement {
            id: i,
            kind,
            nodes: local.iter().map(|n| self.nodes[*n]).collect(),
        })
    }

    /// All the lines of this element.
    pub fn lines(&self) -> Vec<MeshElement> {
        (0..self.kind.num_lines())
            .filter_map(|i| self.line(i))
            .collect()
    }

    /// All the surfaces of this element.
    pub fn surfaces(&self) -> Vec<MeshElement> {
        (0..self.kind.num_surfaces())
            .filter_map(|i| self.surface(i))
            .collect()
    }
}

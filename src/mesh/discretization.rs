use crate::bounding_volume::Aabb;
use crate::cut::CutError;
use crate::math::{Point, Real};
use crate::mesh::{ElementId, MeshElement, NodeId, StructureLabel};
use crate::utils::hashmap::HashMap;
use alloc::vec::Vec;

/// A set of elements together with the positions of their nodes.
///
/// For the target mesh the positions are the reference positions. For the
/// cutter mesh they are the current, possibly displaced, positions.
#[derive(Clone, Debug, Default)]
pub struct Discretization {
    elements: Vec<MeshElement>,
    element_index: HashMap<ElementId, usize>,
    positions: HashMap<NodeId, Point<Real>>,
    labels: HashMap<ElementId, StructureLabel>,
}

impl Discretization {
    /// Creates an empty discretization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the position of the node `id`, replacing any previous one.
    pub fn set_node(&mut self, id: NodeId, position: Point<Real>) {
        let _ = self.positions.insert(id, position);
    }

    /// Adds an element. Replaces the element with the same id if it exists.
    pub fn add_element(&mut self, element: MeshElement) {
        if let Some(i) = self.element_index.get(&element.id) {
            self.elements[*i] = element;
        } else {
            let _ = self.element_index.insert(element.id, self.elements.len());
            self.elements.push(element);
        }
    }

    /// Assigns the element `id` to the structure `label`.
    ///
    /// Elements without an explicit label belong to structure `0`.
    pub fn set_label(&mut self, id: ElementId, label: StructureLabel) {
        let _ = self.labels.insert(id, label);
    }

    /// The structure label of the element `id`.
    pub fn label(&self, id: ElementId) -> StructureLabel {
        self.labels.get(&id).copied().unwrap_or(0)
    }

    /// The elements, in insertion order.
    pub fn elements(&self) -> &[MeshElement] {
        &self.elements
    }

    /// Number of elements.
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// The element with the given id.
    pub fn element(&self, id: ElementId) -> Result<&MeshElement, CutError> {
        self.element_index
            .get(&id)
            .map(|i| &self.elements[*i])
            .ok_or(CutError::ElementNotFound(id))
    }

    /// The position of the node `id`.
    pub fn node_position(&self, id: NodeId) -> Result<Point<Real>, CutError> {
        self.positions
            .get(&id)
            .copied()
            .ok_or(CutError::NodeNotFound(id))
    }

    /// The positions of the nodes of `element`, in element order.
    pub fn element_positions(&self, element: &MeshElement) -> Result<Vec<Point<Real>>, CutError> {
        element
            .nodes
            .iter()
            .map(|n| self.node_position(*n))
            .collect()
    }

    /// The AABB of the nodes of `element`.
    ///
    /// The nodes of a higher-order element do not bound its geometry, so the
    /// box is enlarged by a fraction of its diagonal for those.
    pub fn element_aabb(&self, element: &MeshElement) -> Result<Aabb, CutError> {
        let pts = self.element_positions(element)?;
        let mut aabb = Aabb::from_points(&pts);
        if element.kind.is_quadratic() {
            aabb.loosen(0.1 * aabb.diagonal());
        }
        Ok(aabb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeKind;
    use alloc::vec;

    #[test]
    fn missing_entities_are_errors() {
        let mut dis = Discretization::new();
        dis.set_node(0, Point::origin());
        dis.set_node(1, Point::new(1.0, 0.0, 0.0));
        dis.add_element(MeshElement::new(7, ShapeKind::Line2, vec![0, 2]).unwrap());

        assert_eq!(dis.element(8), Err(CutError::ElementNotFound(8)));
        let line = dis.element(7).unwrap().clone();
        assert_eq!(
            dis.element_positions(&line),
            Err(CutError::NodeNotFound(2))
        );
        assert_eq!(dis.label(7), 0);
    }
}

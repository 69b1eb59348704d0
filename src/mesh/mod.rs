//! Finite-element discretizations consumed by the cut pipeline.

pub use self::discretization::Discretization;
pub use self::mesh_element::MeshElement;

mod discretization;
mod mesh_element;

/// Identifier of an element.
pub type ElementId = usize;
/// Identifier of a node.
pub type NodeId = usize;
/// Identifier of a structure (disjoint embedded body) of the cutter mesh.
pub type StructureLabel = i32;

use crate::mesh::{ElementId, NodeId};
use crate::shape::ShapeKind;
use alloc::string::String;
use core::fmt;

/// The part an element plays in a cut.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShapeRole {
    /// A volume element of the mesh being cut.
    Target,
    /// A surface element of the interface mesh.
    Cutter,
}

impl fmt::Display for ShapeRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ShapeRole::Target => f.write_str("target element"),
            ShapeRole::Cutter => f.write_str("cutter element"),
        }
    }
}

/// Fatal errors of the cut pipeline.
///
/// Recoverable conditions (unlifted Steiner points, concave interface polygons)
/// are not errors: they are counted in the [`CutReport`](crate::cut::CutReport).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CutError {
    /// A referenced element is absent from its discretization.
    #[error("element {0} is not part of the discretization")]
    ElementNotFound(ElementId),
    /// A referenced node has no position.
    #[error("node {0} has no position")]
    NodeNotFound(NodeId),
    /// The shape has no reference tables for the requested role.
    #[error("a {kind} cannot be used as a {role}")]
    UnsupportedShape {
        /// The offending shape.
        kind: ShapeKind,
        /// What it was used as.
        role: ShapeRole,
    },
    /// An element lists a node count that does not match its shape.
    #[error("element {element} of shape {kind} lists {found} nodes")]
    WrongNodeCount {
        /// The element id.
        element: ElementId,
        /// Its shape.
        kind: ShapeKind,
        /// The number of nodes given.
        found: usize,
    },
    /// The tetrahedralization returned fewer corners per cell than the requested cells need.
    #[error("tetrahedralization returned {found} nodes per tetrahedron, {required} are required")]
    MissingQuadraticNodes {
        /// Nodes per tetrahedron needed by the requested output.
        required: usize,
        /// Nodes per tetrahedron actually produced.
        found: usize,
    },
    /// A point claims to lie on a number of faces no point of this shape can lie on.
    #[error("a point of a {kind} cannot lie on {faces} faces")]
    InconsistentClassification {
        /// The target shape.
        kind: ShapeKind,
        /// The number of faces found.
        faces: usize,
    },
    /// The tetrahedralization engine failed.
    #[error("tetrahedralization failed: {0}")]
    Tetrahedralization(String),
    /// The convex hull engine could not order the interface points.
    #[error("the convex hull of the interface points is degenerate")]
    HullDegenerate,
}

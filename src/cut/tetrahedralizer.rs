//! The interface between the cut pipeline and a tetrahedralization engine.

use crate::cut::{CutError, Switches};
use crate::math::{Point, Real};
use alloc::vec::Vec;

/// Marker of the points of the input that are element corners or lie on
/// segments and isolated points of the element faces.
pub const BOUNDARY_POINT_MARKER: i32 = 3;
/// Marker of the other points of the input.
pub const INTERFACE_POINT_MARKER: i32 = 2;
/// Marker the engine gives to the points it creates.
pub const STEINER_POINT_MARKER: i32 = 0;

/// A planar facet of a piecewise-linear complex.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PlcFacet {
    /// Point loops. The first one is the outline of the facet. The others are
    /// segments (two points) or isolated points (one point) lying in it.
    pub polygons: Vec<Vec<usize>>,
    /// The facet marker.
    pub marker: i32,
}

/// A piecewise-linear complex: the input of a tetrahedralization.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Plc {
    /// The points.
    pub points: Vec<Point<Real>>,
    /// One marker per point.
    pub point_markers: Vec<i32>,
    /// The facets.
    pub facets: Vec<PlcFacet>,
}

/// A boundary triangle of the tetrahedralization, lying on a facet of the input.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BoundaryFace {
    /// The corner points, followed by the edge midpoints for quadratic output
    /// (edges `0-1`, `1-2`, `2-0`).
    pub nodes: Vec<usize>,
    /// Marker of the facet the triangle lies on.
    pub marker: i32,
    /// The tetrahedra having this triangle as a face.
    pub adjacent_tets: [Option<usize>; 2],
}

/// The output of a tetrahedralization.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct TetMesh {
    /// The points: the input points first, in input order, then the new ones.
    pub points: Vec<Point<Real>>,
    /// One marker per point.
    pub point_markers: Vec<i32>,
    /// Tetrahedra, with `corners_per_tet` point indices each.
    ///
    /// Quadratic tetrahedra list the 4 corners followed by the midpoints of the
    /// edges `0-1`, `1-2`, `2-0`, `0-3`, `1-3`, `2-3`.
    pub tets: Vec<Vec<usize>>,
    /// Number of points per tetrahedron.
    pub corners_per_tet: usize,
    /// Triangles lying on the input facets.
    pub boundary_faces: Vec<BoundaryFace>,
}

/// A tetrahedralization engine.
pub trait Tetrahedralizer {
    /// Tetrahedralizes the volume bounded by `plc` so that every facet of `plc` is
    /// a union of tetrahedron faces.
    fn tetrahedralize(&self, plc: &Plc, switches: &Switches) -> Result<TetMesh, CutError>;
}

//! Geometric queries on single finite elements.
//!
//! These are the coordinate transformations the cut pipeline relies on:
//! element-local to physical space, physical space back to the local frame of a
//! volume, surface or line element, and the classification of a local point
//! against the faces of its reference element.

pub use self::classification::{
    common_line, common_node, faces_containing, is_within_limits, snap_to_faces,
};
pub use self::element_geometry::{ElementGeometry, LocalProjection};
pub use self::geometry_type::GeometryType;
pub(crate) use self::linear_solve::solve_linearized;

mod classification;
mod element_geometry;
mod geometry_type;
mod linear_solve;

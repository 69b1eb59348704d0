//! The cut of a volume mesh by an interface surface mesh.
//!
//! For every target element touched by the cutter mesh, the interface points
//! are found, ordered into polygons, assembled into a piecewise-linear complex
//! and tetrahedralized. The result is a set of domain integration cells
//! (tetrahedra) and boundary integration cells (triangles on the interface).

pub use self::cells::{BoundaryIntCell, DomainIntCell};
pub use self::curve_surface::{CurveSurfaceSolver, SearchBox};
pub use self::cut_error::{CutError, ShapeRole};
pub use self::cut_options::{CutFlags, CutOptions, Switches};
pub use self::interface_point::{InterfacePoint, PointType};
pub use self::intersection_cache::{CachedRoots, IntersectionCache, IntersectionKey};
pub use self::pipeline::{compute_intersection, CutReport, CutResult};
pub use self::tetrahedralizer::{
    BoundaryFace, Plc, PlcFacet, TetMesh, Tetrahedralizer, BOUNDARY_POINT_MARKER,
    INTERFACE_POINT_MARKER, STEINER_POINT_MARKER,
};

mod cdt;
mod cells;
mod context;
mod curve_surface;
mod cut_error;
mod cut_options;
mod interface_point;
mod intersection_cache;
mod pipeline;
mod plc;
mod polygon;
mod recovery;
mod tetrahedralizer;

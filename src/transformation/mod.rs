//! Polygon ordering, polygon triangulation and tetrahedralization.

pub use self::convex_hull2::{convex_hull2, ConvexHull2};
pub use self::convex_splitter::ConvexSplitter;
pub use self::ear_clipping::{order_by_angle, triangulate_ear_clipping};

mod convex_hull2;
mod convex_splitter;
mod ear_clipping;

/*!
xcut3d
========

**xcut3d** cuts a volumetric finite-element mesh with an embedded interface
surface mesh and decomposes every cut element into boundary-conforming
integration cells, written with the rust programming language.

For each target element touched by the cutter it produces tetrahedral domain
integration cells and triangular boundary integration cells, both given in
element-local and physical coordinates. See [`cut::compute_intersection`].
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::type_complexity)]
#![allow(clippy::needless_range_loop)] // Index loops mirror the reference tables.

extern crate alloc;

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
#[macro_use]
extern crate approx;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod cut;
pub mod mesh;
pub mod partitioning;
pub mod query;
pub mod shape;
pub mod transformation;
pub mod utils;

/// Aliases for the mathematical types used throughout this crate.
pub mod math {
    pub use na::{Matrix3, Point2, Point3, Vector2, Vector3};

    /// The scalar type used throughout this crate.
    pub type Real = f64;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;

    /// The matrix type.
    pub use Matrix3 as Matrix;
}

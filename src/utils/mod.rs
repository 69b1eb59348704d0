//! Various unsorted geometrical and logical operators.

pub use self::consts::{TOL12, TOL14, TOL7};
pub use self::point_compare::{compare_points, compare_points2, PointIdentity};
pub use self::sorted_pair::SortedPair;

mod consts;
pub mod hashmap;
pub mod point_compare;
pub mod point_in_triangle;
mod sorted_pair;
pub mod spade;

//! Spatial partitioning of the cutter mesh.

pub use self::cutter_tree::{linear_candidates, CutterTree};

mod cutter_tree;

//! Reference shapes of the finite elements, their topology and shape functions.

pub use self::reference_shape::{ReferenceShape, MAX_NODES};
pub use self::shape_functions::{shape_derivatives, shape_values};
pub use self::shape_kind::ShapeKind;

mod reference_shape;
mod shape_functions;
mod shape_kind;

use crate::math::Real;

/// Tolerance used to decide whether two element-local coordinates coincide.
pub const TOL7: Real = 1.0e-7;
/// Tolerance used to detect singular linearizations.
pub const TOL12: Real = 1.0e-12;
/// Residual tolerance of the Newton iterations.
pub const TOL14: Real = 1.0e-14;

//! Conversions to the spade point type.

use crate::math::{Point2, Real};

/// Clamps a coordinate into the range of values spade accepts.
///
/// Values smaller than `spade::MIN_ALLOWED_VALUE` in magnitude become zero.
pub fn sanitize_spade_coord(coord: Real) -> Real {
    let abs = coord.abs();

    if abs <= spade::MIN_ALLOWED_VALUE {
        return 0.0;
    }

    if abs > spade::MAX_ALLOWED_VALUE {
        return spade::MAX_ALLOWED_VALUE * coord.signum();
    }

    coord
}

/// Converts a point to spade's point type, sanitizing its coordinates.
pub fn to_spade_point(point: &Point2<Real>) -> spade::Point2<Real> {
    spade::Point2::new(sanitize_spade_coord(point.x), sanitize_spade_coord(point.y))
}

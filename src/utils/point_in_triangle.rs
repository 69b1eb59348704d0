//! Orientation predicates on 2D points.

use crate::math::{Point2, Real};

#[derive(Eq, PartialEq, Debug, Copy, Clone)]
/// The winding direction of a corner or polygon.
pub enum Orientation {
    /// Counter-clockwise
    Ccw,
    /// Clockwise
    Cw,
    /// Neither (a straight line, or a NaN input)
    None,
}

/// Returns the winding direction of the corner `p1`, `p2`, `p3`.
pub fn corner_direction(p1: &Point2<Real>, p2: &Point2<Real>, p3: &Point2<Real>) -> Orientation {
    let v1 = p2 - p1;
    let v2 = p3 - p2;
    let cross: Real = v1.perp(&v2);

    if cross > 0.0 {
        Orientation::Ccw
    } else if cross < 0.0 {
        Orientation::Cw
    } else {
        Orientation::None
    }
}

/// Signed area of the closed polygon `pts`, positive when counter-clockwise.
pub fn signed_area(pts: &[Point2<Real>]) -> Real {
    let n = pts.len();
    (0..n)
        .map(|i| pts[i].coords.perp(&pts[(i + 1) % n].coords))
        .sum::<Real>()
        * 0.5
}

/// Returns `true` if point `p` is in the triangle `v1`, `v2`, `v3`.
///
/// Returns `None` if the triangle is flat.
pub fn is_point_in_triangle(
    p: &Point2<Real>,
    v1: &Point2<Real>,
    v2: &Point2<Real>,
    v3: &Point2<Real>,
) -> Option<bool> {
    let d = [
        corner_direction(p, v1, v2),
        corner_direction(p, v2, v3),
        corner_direction(p, v3, v1),
    ];

    if d.iter().all(|o| *o == Orientation::None) {
        return None;
    }

    let has_cw = d.contains(&Orientation::Cw);
    let has_ccw = d.contains(&Orientation::Ccw);
    Some(!(has_cw && has_ccw))
}

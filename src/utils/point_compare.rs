//! Tolerance-based point comparison.

use crate::math::{Point, Point2, Real};

/// Returns `true` if every coordinate of `a` and `b` differs by at most `tol`.
#[inline]
pub fn compare_points(a: &Point<Real>, b: &Point<Real>, tol: Real) -> bool {
    abs_diff_eq!(a, b, epsilon = tol)
}

/// Returns `true` if every coordinate of the 2D points `a` and `b` differs by at most `tol`.
#[inline]
pub fn compare_points2(a: &Point2<Real>, b: &Point2<Real>, tol: Real) -> bool {
    abs_diff_eq!(a, b, epsilon = tol)
}

/// Something that can locate an already-stored point by coordinate.
pub trait PointIdentity {
    /// Index of the first stored point matching `pt` within `tol`, if any.
    fn find_point(&self, pt: &Point<Real>, tol: Real) -> Option<usize>;
}

impl PointIdentity for [Point<Real>] {
    fn find_point(&self, pt: &Point<Real>, tol: Real) -> Option<usize> {
        self.iter().position(|p| compare_points(p, pt, tol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_within_tolerance_match() {
        let a = Point::new(0.5, 0.5, 0.0);
        let b = Point::new(0.5 + 1.0e-9, 0.5, -1.0e-9);
        assert!(compare_points(&a, &b, 1.0e-7));
        assert!(!compare_points(&a, &Point::new(0.5, 0.5, 1.0e-6), 1.0e-7));

        let pts = [Point::origin(), a];
        assert_eq!(pts.find_point(&b, 1.0e-7), Some(1));
    }
}

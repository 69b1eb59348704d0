use crate::math::{Point, Real, Vector};
use crate::utils::compare_points;
use alloc::vec::Vec;

/// Points shared by all the cells of a tetrahedralization.
pub(super) struct PointPool {
    pub points: Vec<Point<Real>>,
    pub markers: Vec<i32>,
    tolerance: Real,
}

impl PointPool {
    pub fn new(tolerance: Real) -> Self {
        Self {
            points: Vec::new(),
            markers: Vec::new(),
            tolerance,
        }
    }

    /// Appends a point without looking for duplicates.
    pub fn push(&mut self, pt: Point<Real>, marker: i32) -> usize {
        self.points.push(pt);
        self.markers.push(marker);
        self.points.len() - 1
    }

    /// Index of a point equal to `pt`, appending `pt` if there is none.
    pub fn insert(&mut self, pt: Point<Real>, marker: i32) -> usize {
        match self
            .points
            .iter()
            .position(|p| compare_points(p, &pt, self.tolerance))
        {
            Some(i) => i,
            None => self.push(pt, marker),
        }
    }

    #[inline]
    pub fn get(&self, i: usize) -> &Point<Real> {
        &self.points[i]
    }
}

/// The oriented plane `normal · x = offset`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(super) struct SplitPlane {
    pub normal: Vector<Real>,
    pub offset: Real,
}

impl SplitPlane {
    pub fn new(normal: Vector<Real>, origin: &Point<Real>) -> Self {
        Self {
            normal,
            offset: normal.dot(&origin.coords),
        }
    }

    /// The plane of a planar polygon, oriented by its winding. `None` if degenerate.
    pub fn from_polygon(pts: &[Point<Real>]) -> Option<Self> {
        let normal = newell_normal(pts).try_normalize(0.0)?;
        let center = polygon_center(pts);
        Some(Self::new(normal, &center))
    }

    #[inline]
    pub fn signed_distance(&self, pt: &Point<Real>) -> Real {
        self.normal.dot(&pt.coords) - self.offset
    }

    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            offset: -self.offset,
        }
    }

    /// Are `self` and `other` the same unoriented plane, up to `tol`?
    pub fn is_coplanar_with(&self, other: &SplitPlane, tol: Real) -> bool {
        let cos = self.normal.dot(&other.normal);
        if cos >= 1.0 - 1.0e-12 {
            (self.offset - other.offset).abs() <= tol
        } else if cos <= -1.0 + 1.0e-12 {
            (self.offset + other.offset).abs() <= tol
        } else {
            false
        }
    }
}

/// Twice the area vector of a polygon (Newell's method).
pub(super) fn newell_normal(pts: &[Point<Real>]) -> Vector<Real> {
    let n = pts.len();
    let c = polygon_center(pts);
    (0..n)
        .map(|i| (pts[i] - c).cross(&(pts[(i + 1) % n] - c)))
        .sum()
}

pub(super) fn polygon_center(pts: &[Point<Real>]) -> Point<Real> {
    let sum = pts.iter().fold(Vector::zeros(), |acc, p| acc + p.coords);
    Point::from(sum / pts.len().max(1) as Real)
}

/// Area of a planar polygon.
pub(super) fn polygon_area(pts: &[Point<Real>]) -> Real {
    0.5 * newell_normal(pts).norm()
}

/// The largest distance between two points of `pts`.
pub(super) fn diameter(pts: &[Point<Real>]) -> Real {
    pts.iter()
        .flat_map(|a| pts.iter().map(move |b| na::distance(a, b)))
        .fold(0.0, Real::max)
}

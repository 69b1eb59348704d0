use crate::cut::CutError;
use crate::math::{Point2, Real, Vector2};
use crate::utils::hashmap::HashMap;
use crate::utils::point_in_triangle::signed_area;
use crate::utils::spade::to_spade_point;
use alloc::vec::Vec;
use ordered_float::OrderedFloat;
use spade::{DelaunayTriangulation, Triangulation};

/// The ordered convex hull of a 2D point set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvexHull2 {
    /// Indices of the hull vertices into the input, counter-clockwise.
    ///
    /// For collinear input this lists every distinct point sorted along the line.
    pub vertices: Vec<usize>,
    /// Are all the points on one line?
    pub collinear: bool,
}

impl ConvexHull2 {
    /// Number of hull vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Does the hull have no vertices?
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Computes the counter-clockwise convex hull of `points`.
///
/// Points on hull edges are kept as hull vertices. Duplicate points appear once.
/// The number of returned vertices is smaller than the number of input points
/// if some points are strictly inside the hull.
pub fn convex_hull2(points: &[Point2<Real>]) -> Result<ConvexHull2, CutError> {
    let mut triangulation = DelaunayTriangulation::<spade::Point2<Real>>::new();
    let mut handle_to_input = Vec::new();

    for (i, pt) in points.iter().enumerate() {
        let handle = triangulation
            .insert(to_spade_point(pt))
            .map_err(|_| CutError::HullDegenerate)?;
        if handle.index() == handle_to_input.len() {
            handle_to_input.push(i);
        }
    }

    if triangulation.num_inner_faces() == 0 {
        return Ok(ConvexHull2 {
            vertices: sort_along_line(points, &handle_to_input),
            collinear: true,
        });
    }

    let mut next = HashMap::new();
    for edge in triangulation.convex_hull() {
        let _ = next.insert(edge.from().fix().index(), edge.to().fix().index());
    }

    let first = next.keys().copied().min().ok_or(CutError::HullDegenerate)?;
    let mut vertices = Vec::with_capacity(next.len());
    let mut curr = first;
    loop {
        vertices.push(handle_to_input[curr]);
        curr = *next.get(&curr).ok_or(CutError::HullDegenerate)?;
        if curr == first {
            break;
        }
        if vertices.len() > next.len() {
            return Err(CutError::HullDegenerate);
        }
    }

    let hull_pts: Vec<_> = vertices.iter().map(|i| points[*i]).collect();
    if signed_area(&hull_pts) < 0.0 {
        vertices.reverse();
    }

    Ok(ConvexHull2 {
        vertices,
        collinear: false,
    })
}

fn sort_along_line(points: &[Point2<Real>], distinct: &[usize]) -> Vec<usize> {
    let Some(first) = distinct.first() else {
        return Vec::new();
    };
    let origin = points[*first];
    let dir = distinct
        .iter()
        .map(|i| points[*i] - origin)
        .max_by_key(|v| OrderedFloat(v.norm_squared()))
        .unwrap_or_else(Vector2::zeros);

    let mut result = distinct.to_vec();
    result.sort_by_key(|i| OrderedFloat((points[*i] - origin).dot(&dir)));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_with_interior_point() {
        let pts = [
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 0.0),
            Point2::new(0.5, 0.5),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        let hull = convex_hull2(&pts).unwrap();
        assert!(!hull.collinear);
        assert_eq!(hull.len(), 4);
        assert!(!hull.vertices.contains(&2));
        let ordered: Vec<_> = hull.vertices.iter().map(|i| pts[*i]).collect();
        assert!(signed_area(&ordered) > 0.0);
    }

    #[test]
    fn collinear_points_are_sorted() {
        let pts = [
            Point2::new(0.5, 0.5),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.5, 0.5),
        ];
        let hull = convex_hull2(&pts).unwrap();
        assert!(hull.collinear);
        assert_eq!(hull.vertices.len(), 3);
        let x: Vec<_> = hull.vertices.iter().map(|i| pts[*i].x).collect();
        assert!(x == [0.0, 0.5, 1.0] || x == [1.0, 0.5, 0.0]);
    }
}

//! Ear-clipping triangulation of simple polygons.

use crate::math::{Point2, Real};
use crate::utils::point_in_triangle::{corner_direction, is_point_in_triangle, Orientation};
use alloc::{vec, vec::Vec};
use ordered_float::OrderedFloat;

/// Per-vertex state of the ear-clipping loop.
#[derive(Clone, Default)]
struct VertexInfo {
    /// Not clipped yet.
    is_active: bool,
    /// Convex, with no other vertex inside the triangle it forms with its neighbors.
    is_ear: bool,
    /// Cosine of the corner angle. The sharpest ear is clipped first.
    pointiness: Real,
    p_prev: usize,
    p_next: usize,
}

/// Refreshes `pointiness` and `is_ear`. Returns `false` on degenerate input.
fn update_vertex(idx: usize, info: &mut VertexInfo, points: &[Point2<Real>]) -> bool {
    let p = points[idx];
    let p1 = points[info.p_prev];
    let p3 = points[info.p_next];

    let (Some(v1), Some(v3)) = ((p1 - p).try_normalize(0.0), (p3 - p).try_normalize(0.0)) else {
        return false;
    };
    info.pointiness = v1.dot(&v3);

    let mut error = false;
    info.is_ear = corner_direction(&p1, &p, &p3) == Orientation::Ccw
        && (0..points.len())
            .filter(|&i| i != info.p_prev && i != idx && i != info.p_next)
            .all(|i| match is_point_in_triangle(&points[i], &p1, &p, &p3) {
                Some(inside) => !inside,
                None => {
                    error = true;
                    true
                }
            });
    !error
}

/// Triangulates the counter-clockwise simple polygon `vertices`.
///
/// Returns `None` if the polygon is clockwise, self-intersecting or degenerate.
pub fn triangulate_ear_clipping(vertices: &[Point2<Real>]) -> Option<Vec<[usize; 3]>> {
    let n = vertices.len();
    if n < 3 {
        return None;
    }

    let mut infos = vec![VertexInfo::default(); n];
    let ok = infos.iter_mut().enumerate().all(|(i, info)| {
        info.is_active = true;
        info.p_prev = if i == 0 { n - 1 } else { i - 1 };
        info.p_next = if i == n - 1 { 0 } else { i + 1 };
        update_vertex(i, info, vertices)
    });
    if !ok {
        return None;
    }

    let mut triangles = Vec::with_capacity(n - 2);

    for i in 0..n - 3 {
        let (ear, _) = infos
            .iter()
            .enumerate()
            .filter(|(_, info)| info.is_active && info.is_ear)
            .max_by_key(|(_, info)| OrderedFloat(info.pointiness))?;

        infos[ear].is_active = false;
        let VertexInfo { p_prev, p_next, .. } = infos[ear];
        triangles.push([p_prev, ear, p_next]);

        infos[p_prev].p_next = p_next;
        infos[p_next].p_prev = p_prev;

        // The last three vertices form a convex triangle.
        if i == n - 4 {
            break;
        }

        if !update_vertex(p_prev, &mut infos[p_prev], vertices)
            || !update_vertex(p_next, &mut infos[p_next], vertices)
        {
            return None;
        }
    }

    let (last, info) = infos.iter().enumerate().find(|(_, info)| info.is_active)?;
    triangles.push([info.p_prev, last, info.p_next]);

    Some(triangles)
}

/// Orders `points` counter-clockwise by angle around their centroid.
///
/// This recovers the boundary of a star-shaped polygon whose vertex order is
/// unknown.
pub fn order_by_angle(points: &[Point2<Real>]) -> Vec<usize> {
    if points.is_empty() {
        return Vec::new();
    }

    let center = points
        .iter()
        .fold(Point2::origin(), |acc, p| acc + p.coords)
        / points.len() as Real;
    let mut order: Vec<_> = (0..points.len()).collect();
    order.sort_by_key(|i| {
        let d = points[*i] - center;
        OrderedFloat(d.y.atan2(d.x))
    });
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_ccw() {
        let vertices = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let triangles = triangulate_ear_clipping(&vertices).unwrap();
        assert_eq!(triangles.len(), 2);
    }

    #[test]
    fn square_cw_is_rejected() {
        let vertices = [
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 0.0),
        ];
        assert!(triangulate_ear_clipping(&vertices).is_none());
    }

    #[test]
    fn dented_square() {
        let vertices = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 0.5),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let triangles = triangulate_ear_clipping(&vertices).unwrap();
        assert_eq!(triangles.len(), 3);

        // The reflex vertex 2 is never the tip of an ear.
        let area: Real = triangles
            .iter()
            .map(|t| {
                let (a, b, c) = (vertices[t[0]], vertices[t[1]], vertices[t[2]]);
                0.5 * (b - a).perp(&(c - a))
            })
            .sum();
        assert_relative_eq!(area, 0.75, epsilon = 1.0e-12);
    }

    #[test]
    fn angular_order_is_ccw() {
        let pts = [
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 0.0),
        ];
        assert_eq!(order_by_angle(&pts), vec![1, 3, 0, 2]);
    }
}

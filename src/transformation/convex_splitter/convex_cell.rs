use super::point_pool::{diameter, newell_normal, polygon_area, polygon_center, PointPool, SplitPlane};
use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::utils::hashmap::HashMap;
use crate::utils::SortedPair;
use alloc::vec::Vec;
use ordered_float::OrderedFloat;

/// Position of a point relative to a plane, up to a tolerance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Side {
    Below,
    On,
    Above,
}

/// A convex polyhedron given by its faces.
///
/// Each face lists pool indices counter-clockwise seen from outside the cell.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct ConvexCell {
    pub faces: Vec<Vec<usize>>,
}

impl ConvexCell {
    /// The box `aabb`, its corners appended to `pool`.
    pub fn cuboid(pool: &mut PointPool, aabb: &Aabb, marker: i32) -> Self {
        let c: Vec<usize> = (0..8)
            .map(|b: usize| {
                let pick = |k: usize| {
                    if (b >> k) & 1 == 0 {
                        aabb.mins[k]
                    } else {
                        aabb.maxs[k]
                    }
                };
                pool.insert(Point::new(pick(0), pick(1), pick(2)), marker)
            })
            .collect();

        let faces = [
            [0, 2, 3, 1],
            [4, 5, 7, 6],
            [0, 1, 5, 4],
            [2, 6, 7, 3],
            [0, 4, 6, 2],
            [1, 3, 7, 5],
        ];
        Self {
            faces: faces
                .iter()
                .map(|f| f.iter().map(|i| c[*i]).collect())
                .collect(),
        }
    }

    /// The distinct vertices of the cell, sorted.
    pub fn vertices(&self) -> Vec<usize> {
        let mut result: Vec<usize> = self.faces.iter().flatten().copied().collect();
        result.sort_unstable();
        result.dedup();
        result
    }

    /// The average of the cell vertices, a point strictly inside non-flat cells.
    pub fn centroid(&self, pool: &PointPool) -> Point<Real> {
        let pts: Vec<_> = self.vertices().iter().map(|i| *pool.get(*i)).collect();
        polygon_center(&pts)
    }

    pub fn face_points(&self, face: usize, pool: &PointPool) -> Vec<Point<Real>> {
        self.faces[face].iter().map(|i| *pool.get(*i)).collect()
    }

    /// The outward plane of a face. `None` if the face is degenerate.
    pub fn face_plane(&self, face: usize, pool: &PointPool) -> Option<SplitPlane> {
        SplitPlane::from_polygon(&self.face_points(face, pool))
    }

    /// Clips the planar polygon or segment `region` to this cell.
    pub fn clip(&self, region: &[Point<Real>], pool: &PointPool, tol: Real) -> Vec<Point<Real>> {
        let mut result = region.to_vec();
        for f in 0..self.faces.len() {
            if result.is_empty() {
                break;
            }
            if let Some(plane) = self.face_plane(f, pool) {
                result = clip_against(&result, &plane, tol);
            }
        }
        result
    }

    /// Does `region` overlap this cell with a positive area (or length for a segment)?
    pub fn overlaps(&self, region: &[Point<Real>], pool: &PointPool, tol: Real) -> bool {
        let clipped = self.clip(region, pool, tol);
        if region.len() >= 3 {
            clipped.len() >= 3 && polygon_area(&clipped) > tol * diameter(&clipped)
        } else {
            diameter(&clipped) > tol
        }
    }

    /// Splits this cell by `plane` into its parts below and above it.
    ///
    /// A part is `None` when the cell does not extend strictly to that side.
    pub fn split(
        &self,
        plane: &SplitPlane,
        pool: &mut PointPool,
        tol: Real,
        marker: i32,
    ) -> (Option<ConvexCell>, Option<ConvexCell>) {
        let mut distances: HashMap<usize, Real> = HashMap::default();
        for v in self.vertices() {
            let _ = distances.insert(v, plane.signed_distance(pool.get(v)));
        }
        let side = |v: usize| {
            let d = distances[&v];
            if d < -tol {
                Side::Below
            } else if d > tol {
                Side::Above
            } else {
                Side::On
            }
        };

        if distances.keys().all(|v| side(*v) != Side::Above) {
            return (Some(self.clone()), None);
        }
        if distances.keys().all(|v| side(*v) != Side::Below) {
            return (None, Some(self.clone()));
        }

        let mut crossings: HashMap<SortedPair<usize>, usize> = HashMap::default();
        let mut cap: Vec<usize> = self
            .vertices()
            .into_iter()
            .filter(|v| side(*v) == Side::On)
            .collect();
        let mut below = Vec::new();
        let mut above = Vec::new();

        for face in &self.faces {
            let mut lo = Vec::new();
            let mut hi = Vec::new();
            for i in 0..face.len() {
                let a = face[i];
                let b = face[(i + 1) % face.len()];
                let (sa, sb) = (side(a), side(b));
                if sa != Side::Above {
                    lo.push(a);
                }
                if sa != Side::Below {
                    hi.push(a);
                }
                if (sa == Side::Below && sb == Side::Above) || (sa == Side::Above && sb == Side::Below) {
                    let key = SortedPair::new(a, b);
                    let p = match crossings.get(&key) {
                        Some(p) => *p,
                        None => {
                            // Always computed from the same end point.
                            let (s, e) = *key;
                            let (ds, de) = (distances[&s], distances[&e]);
                            let pt = pool.get(s) + (pool.get(e) - pool.get(s)) * (ds / (ds - de));
                            let p = pool.insert(pt, marker);
                            let _ = crossings.insert(key, p);
                            cap.push(p);
                            p
                        }
                    };
                    lo.push(p);
                    hi.push(p);
                }
            }
            if let Some(f) = cleaned(lo) {
                below.push(f);
            }
            if let Some(f) = cleaned(hi) {
                above.push(f);
            }
        }

        cap.sort_unstable();
        cap.dedup();
        let cap = order_around(&cap, &plane.normal, pool);

        let lower = (cap.len() >= 3).then(|| {
            below.push(cap.clone());
            ConvexCell { faces: below }
        });
        let upper = (cap.len() >= 3).then(|| {
            above.push(cap.iter().rev().copied().collect());
            ConvexCell { faces: above }
        });

        (
            lower.filter(|c| c.faces.len() >= 4),
            upper.filter(|c| c.faces.len() >= 4),
        )
    }

    /// Signed volume of the cell.
    pub fn volume(&self, pool: &PointPool) -> Real {
        let center = self.centroid(pool);
        let mut result = 0.0;
        for f in 0..self.faces.len() {
            let pts = self.face_points(f, pool);
            let fc = polygon_center(&pts);
            result += newell_normal(&pts).dot(&(fc - center)) / 6.0;
        }
        result
    }
}

/// Removes consecutive duplicates. `None` if fewer than three vertices remain.
fn cleaned(mut face: Vec<usize>) -> Option<Vec<usize>> {
    face.dedup();
    while face.len() > 1 && face.first() == face.last() {
        let _ = face.pop();
    }
    (face.len() >= 3).then_some(face)
}

/// Orders coplanar points counter-clockwise around `normal`.
fn order_around(pts: &[usize], normal: &Vector<Real>, pool: &PointPool) -> Vec<usize> {
    let coords: Vec<_> = pts.iter().map(|i| *pool.get(*i)).collect();
    let center = polygon_center(&coords);
    let u = coords
        .iter()
        .map(|p| p - center)
        .find_map(|d| (d - normal * normal.dot(&d)).try_normalize(0.0))
        .unwrap_or_else(|| normal.cross(&Vector::x()));
    let w = normal.cross(&u);

    let mut keyed: Vec<_> = pts
        .iter()
        .zip(coords.iter())
        .map(|(i, p)| {
            let d = p - center;
            (OrderedFloat(w.dot(&d).atan2(u.dot(&d))), *i)
        })
        .collect();
    keyed.sort();
    keyed.into_iter().map(|(_, i)| i).collect()
}

/// Sutherland-Hodgman clipping of a polygon to the half-space below `plane`.
fn clip_against(poly: &[Point<Real>], plane: &SplitPlane, tol: Real) -> Vec<Point<Real>> {
    let n = poly.len();
    let mut result = Vec::with_capacity(n + 1);
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        let (da, db) = (plane.signed_distance(&a), plane.signed_distance(&b));
        let a_in = da <= tol;
        let b_in = db <= tol;
        if a_in {
            result.push(a);
        }
        if a_in != b_in && (da - db).abs() > 0.0 && n > 1 {
            result.push(a + (b - a) * (da / (da - db)));
        }
    }
    result
}

//! Moves the interface nodes of quadratic cells onto a curved cutter.
//!
//! The tetrahedralization sees the interface as flat triangles. Two kinds of
//! nodes have to be brought back onto the true cutter surface:
//!
//! - the points the engine inserted on interface triangles (Steiner points);
//! - the edge midpoints of the quadratic interface triangles.
//!
//! Each one is moved along a probe line, or within a probe plane, until it
//! hits the cutter element (or a line of it) it belongs to. A node that cannot
//! be moved stays where it is and is counted as missed.

use crate::cut::context::CutContext;
use crate::cut::polygon::sub_geometry;
use crate::cut::{
    BoundaryFace, CurveSurfaceSolver, CutOptions, TetMesh, BOUNDARY_POINT_MARKER,
    INTERFACE_POINT_MARKER,
};
use crate::math::{Point, Real, Vector};
use crate::query::{faces_containing, ElementGeometry};
use crate::shape::ShapeKind;
use crate::utils::hashmap::HashSet;
use crate::utils::{TOL14, TOL7};
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use ordered_float::OrderedFloat;
use smallvec::SmallVec;

/// How a Steiner point is brought back onto the cutter.
#[derive(Clone, Debug)]
enum SteinerCase {
    /// Inside one cutter element: along the mean normal of its triangles.
    Surface,
    /// On a line shared by two cutter elements: within the plane through the
    /// point orthogonal to the triangle edge towards `towards`.
    Edge { line: ElementGeometry, towards: usize },
    /// On the target face `face`: within that face, orthogonal to the
    /// triangle edge towards `towards`.
    Boundary { face: usize, towards: usize },
}

/// An interface triangle of the tetrahedralization.
struct InterfaceFace<'m> {
    face: &'m BoundaryFace,
    cutter: usize,
}

impl InterfaceFace<'_> {
    fn corners(&self) -> &[usize] {
        &self.face.nodes[..3]
    }
}

/// The point of `line` on the plane through `origin` with normal `normal`.
fn plane_line_intersection(
    line: &ElementGeometry,
    origin: &Point<Real>,
    normal: &Vector<Real>,
    max_iterations: usize,
) -> Option<Point<Real>> {
    let mut t = 0.0;
    for _ in 0..max_iterations {
        let xi = Point::new(t, 0.0, 0.0);
        let f = (line.point_at(&xi) - origin).dot(normal);
        let df = line.tangents(&xi).column(0).dot(normal);
        if df.abs() <= TOL14 {
            return None;
        }
        let dt = f / df;
        t -= dt;
        if dt.abs() <= TOL14 {
            break;
        }
    }

    let x = line.point_at(&Point::new(t, 0.0, 0.0));
    let converged = (x - origin).dot(normal).abs() <= TOL7 * line.length_scale();
    (converged && t.abs() <= 1.0 + TOL7).then_some(x)
}

impl<'a> CutContext<'a> {
    /// Lifts the Steiner points and the interface edge midpoints of `mesh`.
    ///
    /// `local` holds the target-local coordinates of the mesh points and is
    /// updated in place, so every cell sharing a node sees the new position.
    pub fn recover_curved_interface(
        &mut self,
        local: &mut [Point<Real>],
        markers: &mut [i32],
        mesh: &TetMesh,
        options: &CutOptions,
    ) {
        let faces: Vec<InterfaceFace> = mesh
            .boundary_faces
            .iter()
            .filter(|f| f.nodes.len() >= 6)
            .filter_map(|face| {
                let cutter = usize::try_from(face.marker - options.facet_marker_offset).ok()?;
                (cutter < self.cutters.len()).then_some(InterfaceFace { face, cutter })
            })
            .collect();

        let missed = self.lift_steiner_points(local, markers, &faces, options)
            + self.lift_midpoints(local, &faces, options);
        self.missed_points += missed;
    }

    fn lift_steiner_points(
        &self,
        local: &mut [Point<Real>],
        markers: &mut [i32],
        faces: &[InterfaceFace],
        options: &CutOptions,
    ) -> usize {
        let mut steiner: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (f, face) in faces.iter().enumerate() {
            for p in face.corners() {
                if markers[*p] != INTERFACE_POINT_MARKER && markers[*p] != BOUNDARY_POINT_MARKER {
                    steiner.entry(*p).or_default().push(f);
                }
            }
        }

        let kind = self.target.kind;
        let mut missed = 0;
        for (s, adjacent) in steiner {
            let on_faces = faces_containing(kind, &local[s], TOL7);
            let case = if let Some(face) = on_faces.first().copied() {
                markers[s] = BOUNDARY_POINT_MARKER;
                let towards = adjacent
                    .iter()
                    .flat_map(|f| faces[*f].corners().iter().copied())
                    .find(|p| *p != s && faces_containing(kind, &local[*p], TOL7).contains(&face))
                    .unwrap_or(s);
                SteinerCase::Boundary { face, towards }
            } else {
                markers[s] = INTERFACE_POINT_MARKER;
                self.edge_case(s, &adjacent, faces).unwrap_or(SteinerCase::Surface)
            };

            let x = self.geometry.point_at(&local[s]);
            let cutter = faces[adjacent[0]].cutter;
            let lifted = match &case {
                SteinerCase::Surface => {
                    let normals: SmallVec<[Vector<Real>; 4]> = adjacent
                        .iter()
                        .filter_map(|f| self.face_normal(local, faces[*f].corners()))
                        .collect();
                    let mean = normals
                        .iter()
                        .fold(Vector::zeros(), |acc, n| acc + n.scale(n.dot(&normals[0]).signum()));
                    mean.try_normalize(TOL14)
                        .into_iter()
                        .chain(normals.iter().copied())
                        .find_map(|n| self.probe(cutter, &x, &n, options))
                }
                SteinerCase::Edge { line, towards } => {
                    let r = self.geometry.point_at(&local[*towards]) - x;
                    r.try_normalize(TOL14).and_then(|r| {
                        plane_line_intersection(line, &x, &r, options.max_recovery_iterations)
                    })
                }
                SteinerCase::Boundary { face, towards } => {
                    let e = self.geometry.point_at(&local[*towards]) - x;
                    self.target_face_normal(*face, &x)
                        .and_then(|n| n.cross(&e).try_normalize(TOL14))
                        .and_then(|d| self.probe(cutter, &x, &d, options))
                }
            };

            if !self.store_lifted(local, s, lifted) {
                missed += 1;
                log::warn!(
                    "Steiner point {} of target element {} ({:?}) stays on the straight interface",
                    s,
                    self.target.id,
                    case
                );
            }
        }
        missed
    }

    /// The edge case of the Steiner point `s`, if two of its triangles come
    /// from cutter elements sharing a line.
    fn edge_case(&self, s: usize, adjacent: &[usize], faces: &[InterfaceFace]) -> Option<SteinerCase> {
        for (i, fa) in adjacent.iter().enumerate() {
            for fb in &adjacent[i + 1..] {
                let (a, b) = (&faces[*fa], &faces[*fb]);
                if a.cutter == b.cutter {
                    continue;
                }
                let shared = a
                    .corners()
                    .iter()
                    .copied()
                    .find(|p| *p != s && b.corners().contains(p));
                let towards = a.corners().iter().copied().find(|p| *p != s && Some(*p) != shared);
                if let (Some(_), Some(towards), Some(line)) =
                    (shared, towards, self.common_cutter_line(a.cutter, b.cutter))
                {
                    return Some(SteinerCase::Edge { line, towards });
                }
            }
        }
        None
    }

    fn lift_midpoints(&self, local: &mut [Point<Real>], faces: &[InterfaceFace], options: &CutOptions) -> usize {
        let kind = self.target.kind;
        let mut visited = HashSet::default();
        let mut missed = 0;

        for (f, face) in faces.iter().enumerate() {
            for k in 0..3 {
                let (a, b) = (face.face.nodes[k], face.face.nodes[(k + 1) % 3]);
                let mid = face.face.nodes[3 + k];
                if !visited.insert(mid) {
                    continue;
                }

                local[mid] = na::center(&local[a], &local[b]);
                let x = self.geometry.point_at(&local[mid]);
                let e = self.geometry.point_at(&local[b]) - self.geometry.point_at(&local[a]);
                let common_face = faces_containing(kind, &local[a], TOL7)
                    .into_iter()
                    .find(|s| faces_containing(kind, &local[b], TOL7).contains(s));

                let lifted = if let Some(s) = common_face {
                    self.target_face_normal(s, &x)
                        .and_then(|n| n.cross(&e).try_normalize(TOL14))
                        .and_then(|d| self.probe(face.cutter, &x, &d, options))
                        .or_else(|| {
                            let line = self.cutter_line_through(face.cutter, &[a, b], local)?;
                            let normal = e.try_normalize(TOL14)?;
                            plane_line_intersection(&line, &x, &normal, options.max_recovery_iterations)
                        })
                } else {
                    let neighbor = faces.iter().enumerate().find(|(g, other)| {
                        *g != f && other.corners().contains(&a) && other.corners().contains(&b)
                    });
                    let own = self.face_normal(local, face.corners());

                    match neighbor {
                        Some((_, other)) if other.cutter != face.cutter => self
                            .common_cutter_line(face.cutter, other.cutter)
                            .and_then(|line| {
                                let normal = e.try_normalize(TOL14)?;
                                plane_line_intersection(&line, &x, &normal, options.max_recovery_iterations)
                            })
                            .or_else(|| own.and_then(|n| self.probe(face.cutter, &x, &n, options))),
                        _ => {
                            let other = neighbor.and_then(|(_, g)| self.face_normal(local, g.corners()));
                            let normal = match (own, other) {
                                (Some(n1), Some(n2)) => (n1 + n2.scale(n2.dot(&n1).signum()))
                                    .try_normalize(TOL14)
                                    .or(Some(n1)),
                                (n1, n2) => n1.or(n2),
                            };
                            normal.and_then(|n| self.probe(face.cutter, &x, &n, options))
                        }
                    }
                };

                if !self.store_lifted(local, mid, lifted) {
                    missed += 1;
                    log::warn!(
                        "edge midpoint {} of target element {} stays on the straight interface",
                        mid,
                        self.target.id
                    );
                }
            }
        }
        missed
    }

    /// Writes the physical point `lifted` into `local[i]`. Returns `false` if
    /// there is nothing to write.
    fn store_lifted(&self, local: &mut [Point<Real>], i: usize, lifted: Option<Point<Real>>) -> bool {
        match lifted.and_then(|x| self.geometry.to_local(&x)) {
            Some(xi) => {
                local[i] = xi;
                true
            }
            None => false,
        }
    }

    /// The intersection closest to `x` of the cutter element at position
    /// `cutter` with the line through `x` along `dir`.
    fn probe(
        &self,
        cutter: usize,
        x: &Point<Real>,
        dir: &Vector<Real>,
        options: &CutOptions,
    ) -> Option<Point<Real>> {
        let h = self.geometry.length_scale();
        let probe = ElementGeometry::new(ShapeKind::Line2, alloc::vec![x - dir * h, x + dir * h]);
        let surface = &self.cutters[cutter].geometry;
        CurveSurfaceSolver::new(surface, &probe, options.max_newton_iterations)
            .solve()
            .into_iter()
            .min_by_key(|r| OrderedFloat(r.z.abs()))
            .map(|r| surface.point_at(&Point::new(r.x, r.y, 0.0)))
    }

    /// Physical unit normal of the triangle `corners`.
    fn face_normal(&self, local: &[Point<Real>], corners: &[usize]) -> Option<Vector<Real>> {
        let x: SmallVec<[Point<Real>; 3]> = corners
            .iter()
            .map(|i| self.geometry.point_at(&local[*i]))
            .collect();
        (x[1] - x[0]).cross(&(x[2] - x[0])).try_normalize(TOL14)
    }

    /// Physical unit normal of the target face `face` near `x`.
    fn target_face_normal(&self, face: usize, x: &Point<Real>) -> Option<Vector<Real>> {
        let kind = self.target.kind;
        let surface = sub_geometry(kind.surface_kind()?, kind.surfaces()[face], self.geometry.nodes());
        let projection = surface.project_point(x, false);
        surface.normal(&projection.local)
    }

    /// A line of the cutter element at position `a` that is also a line of the
    /// cutter element at position `b`.
    fn common_cutter_line(&self, a: usize, b: usize) -> Option<ElementGeometry> {
        let (ea, eb) = (self.cutters[a].element, self.cutters[b].element);
        let line_kind = ea.kind.line_kind()?;
        ea.kind
            .lines()
            .iter()
            .find(|line| {
                let (n0, n1) = (ea.nodes[line[0]], ea.nodes[line[1]]);
                eb.kind.lines().iter().any(|l| {
                    let (m0, m1) = (eb.nodes[l[0]], eb.nodes[l[1]]);
                    (n0 == m0 && n1 == m1) || (n0 == m1 && n1 == m0)
                })
            })
            .map(|line| sub_geometry(line_kind, line, self.cutters[a].geometry.nodes()))
    }

    /// A line of the cutter element at position `cutter` passing through all
    /// the given points.
    fn cutter_line_through(
        &self,
        cutter: usize,
        points: &[usize],
        local: &[Point<Real>],
    ) -> Option<ElementGeometry> {
        let owner = &self.cutters[cutter];
        let line_kind = owner.element.kind.line_kind()?;
        let tol = TOL7 * self.geometry.length_scale();
        owner
            .element
            .kind
            .lines()
            .iter()
            .map(|line| sub_geometry(line_kind, line, owner.geometry.nodes()))
            .find(|line| {
                points.iter().all(|p| {
                    let x = self.geometry.point_at(&local[*p]);
                    let projection = line.project_point(&x, false);
                    projection.distance <= tol && line.contains_local(&projection.local, TOL7)
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshElement;
    use alloc::vec;

    /// The unit cube `[0, 1]^3`, whose local coordinates are `2 x - 1`.
    fn unit_cube() -> ElementGeometry {
        let nodes = ShapeKind::Hex8
            .reference()
            .nodes
            .iter()
            .map(|c| Point::new(0.5 * (c[0] + 1.0), 0.5 * (c[1] + 1.0), 0.5 * (c[2] + 1.0)))
            .collect();
        ElementGeometry::new(ShapeKind::Hex8, nodes)
    }

    #[test]
    fn unreachable_nodes_keep_their_straight_position() {
        let hex = MeshElement::new(0, ShapeKind::Hex8, (0..8).collect()).unwrap();
        let quad = MeshElement::new(4, ShapeKind::Quad4, vec![10, 11, 12, 13]).unwrap();
        let plane = ElementGeometry::new(
            ShapeKind::Quad4,
            vec![
                Point::new(-0.5, -0.5, 0.5),
                Point::new(1.5, -0.5, 0.5),
                Point::new(1.5, 1.5, 0.5),
                Point::new(-0.5, 1.5, 0.5),
            ],
        );
        let mut ctx = CutContext::new(&hex, unit_cube());
        let cutter = ctx.push_cutter(&quad, plane);
        let options = CutOptions::quadratic();

        // Two corners on the cutter plane z = 0.5 and an engine point ten units
        // above it, out of reach of the recovery search.
        let straight = vec![
            Point::new(-1.0, -1.0, 0.0),
            Point::new(1.0, -1.0, 0.0),
            Point::new(0.0, 0.0, 20.0),
            Point::new(0.0, -1.0, 0.0),
            Point::new(0.5, -0.5, 10.0),
            Point::new(-0.5, -0.5, 10.0),
        ];
        let mesh = TetMesh {
            points: straight.iter().map(|p| p * options.scale_factor).collect(),
            point_markers: vec![INTERFACE_POINT_MARKER, INTERFACE_POINT_MARKER, 0, 0, 0, 0],
            tets: Vec::new(),
            corners_per_tet: 10,
            boundary_faces: vec![BoundaryFace {
                nodes: (0..6).collect(),
                marker: cutter as i32 + options.facet_marker_offset,
                adjacent_tets: [None, None],
            }],
        };
        let mut local = straight.clone();
        let mut markers = mesh.point_markers.clone();
        ctx.recover_curved_interface(&mut local, &mut markers, &mesh, &options);

        // The Steiner point and the midpoints of its two edges.
        assert_eq!(ctx.missed_points, 3);
        assert_eq!(local[2], straight[2]);
        assert_relative_eq!(local[4], straight[4], epsilon = 1.0e-12);
        assert_relative_eq!(local[5], straight[5], epsilon = 1.0e-12);
        assert_eq!(markers[2], INTERFACE_POINT_MARKER);
        // The midpoint between the two corners already lies on the cutter.
        assert_relative_eq!(local[3], straight[3], epsilon = 1.0e-9);
    }

    #[test]
    fn plane_meets_a_curved_line() {
        // x(t) = t, z(t) = 1 - t^2 on a quadratic line.
        let line = ElementGeometry::new(
            ShapeKind::Line3,
            vec![
                Point::new(-1.0, 0.0, 0.0),
                Point::new(1.0, 0.0, 0.0),
                Point::new(0.0, 0.0, 1.0),
            ],
        );
        let hit = plane_line_intersection(&line, &Point::new(0.5, 3.0, 0.0), &Vector::x(), 50).unwrap();
        assert_relative_eq!(hit, Point::new(0.5, 0.0, 0.75), epsilon = 1.0e-12);

        // Beyond the end of the line.
        assert!(plane_line_intersection(&line, &Point::new(2.0, 0.0, 0.0), &Vector::x(), 50).is_none());
        // Parallel to the plane.
        let straight = ElementGeometry::new(
            ShapeKind::Line2,
            vec![Point::new(0.0, 0.0, 0.0), Point::new(0.0, 1.0, 0.0)],
        );
        assert!(plane_line_intersection(&straight, &Point::origin(), &Vector::x(), 50).is_none());
    }
}

//! Interface points of one cutter element and their assembly into a polygon.

use crate::cut::context::CutContext;
use crate::cut::{
    CutError, CutFlags, CutOptions, CurveSurfaceSolver, InterfacePoint, IntersectionKey,
    ShapeRole,
};
use crate::math::{Point, Point2, Real};
use crate::mesh::MeshElement;
use crate::query::{is_within_limits, ElementGeometry, GeometryType};
use crate::shape::ShapeKind;
use crate::transformation::{convex_hull2, order_by_angle, triangulate_ear_clipping};
use crate::utils::{compare_points2, TOL7};
use alloc::vec::Vec;
use ordered_float::OrderedFloat;

/// An interface point together with its local coordinates on the cutter element.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct CutterPoint {
    pub cutter_local: Point2<Real>,
    pub point: InterfacePoint,
}

/// The interface points of one cutter element, unique by cutter-local
/// coordinates.
#[derive(Clone, Debug, Default)]
pub(crate) struct CutterPoints {
    points: Vec<CutterPoint>,
}

impl CutterPoints {
    fn insert(&mut self, cutter_local: Point2<Real>, point: InterfacePoint) {
        if !self
            .points
            .iter()
            .any(|p| compare_points2(&p.cutter_local, &cutter_local, TOL7))
        {
            self.points.push(CutterPoint {
                cutter_local,
                point,
            });
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The points, in lexicographic order of their cutter-local coordinates.
    pub fn into_sorted(mut self) -> Vec<CutterPoint> {
        self.points.sort_by_key(|p| {
            (
                OrderedFloat(p.cutter_local.x),
                OrderedFloat(p.cutter_local.y),
            )
        });
        self.points
    }
}

/// How the polygon of a cutter element is split into triangles.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Triangulation {
    /// Fan from the first vertex. The polygon is flat and convex.
    FanFromFirst,
    /// Fan around an extra point, given in target-local coordinates.
    FanAround(Point<Real>),
    /// Explicit triangles over the polygon vertices.
    Explicit(Vec<[usize; 3]>),
    /// The points are collinear: an open chain of segments.
    Chain,
}

/// The point `xi` of the reference line of `kind` numbered `line`.
fn reference_line_point(kind: ShapeKind, line: usize, xi: Real) -> Option<Point<Real>> {
    let line_kind = kind.line_kind()?;
    let nodes = kind.lines()[line]
        .iter()
        .map(|n| Point::from(kind.node_coords(*n)))
        .collect();
    Some(ElementGeometry::new(line_kind, nodes).point_at(&Point::new(xi, 0.0, 0.0)))
}

pub(super) fn sub_geometry(kind: ShapeKind, local_nodes: &[usize], nodes: &[Point<Real>]) -> ElementGeometry {
    ElementGeometry::new(kind, local_nodes.iter().map(|n| nodes[*n]).collect())
}

impl<'a> CutContext<'a> {
    /// Roots of `line` against `surface`, from the cache when possible.
    fn cached_roots(
        &mut self,
        key: IntersectionKey,
        surface: &ElementGeometry,
        line: &ElementGeometry,
        max_iterations: usize,
    ) -> Vec<Point<Real>> {
        if let Some(cached) = self.cache.get(&key) {
            return cached.roots.clone();
        }

        let roots = CurveSurfaceSolver::new(surface, line, max_iterations).solve();
        self.cache.insert(key, roots).roots.clone()
    }

    /// Finds every interface point of the cutter element `cutter` in the
    /// target element.
    ///
    /// These are the cutter corners inside the element, the intersections of
    /// the target lines with the cutter, and the intersections of the cutter
    /// lines with the target faces.
    pub fn collect_cutter_points(
        &mut self,
        cutter: &MeshElement,
        geometry: &ElementGeometry,
        options: &CutOptions,
    ) -> Result<CutterPoints, CutError> {
        let kind = self.target.kind;
        let unsupported_target = CutError::UnsupportedShape {
            kind,
            role: ShapeRole::Target,
        };
        let unsupported_cutter = CutError::UnsupportedShape {
            kind: cutter.kind,
            role: ShapeRole::Cutter,
        };
        let line_kind = kind.line_kind().ok_or(unsupported_target.clone())?;
        let surface_kind = kind.surface_kind().ok_or(unsupported_target)?;
        let cutter_line_kind = cutter.kind.line_kind().ok_or(unsupported_cutter)?;
        let mut result = CutterPoints::default();

        for m in 0..cutter.kind.num_corners() {
            let x = geometry.nodes()[m];
            let target = &self.geometry;
            let inside = *self.node_inside.entry(cutter.nodes[m]).or_insert_with(|| {
                target
                    .to_local(&x)
                    .filter(|xi| is_within_limits(kind, xi, TOL7))
            });

            if let Some(xi) = inside {
                let point = InterfacePoint::classify(kind, &xi)?;
                let c = cutter.kind.node_coords(m);
                result.insert(Point2::new(c[0], c[1]), point);
            }
        }

        for (m, line) in kind.lines().iter().enumerate() {
            let key = IntersectionKey::cutter_surface(
                cutter.id,
                self.target.nodes[line[0]],
                self.target.nodes[line[1]],
            );
            let line_geometry = sub_geometry(line_kind, line, self.geometry.nodes());
            let roots = self.cached_roots(key, geometry, &line_geometry, options.max_newton_iterations);

            for root in roots {
                let point = if (root.z + 1.0).abs() < TOL7 {
                    InterfacePoint::corner(kind, line[0])
                } else if (root.z - 1.0).abs() < TOL7 {
                    InterfacePoint::corner(kind, line[1])
                } else {
                    let Some(coord) = reference_line_point(kind, m, root.z) else {
                        continue;
                    };
                    InterfacePoint::on_line(kind, m, &coord)
                };
                result.insert(Point2::new(root.x, root.y), point);
            }
        }

        for (p, face) in kind.surfaces().iter().enumerate() {
            let face_geometry = sub_geometry(surface_kind, face, self.geometry.nodes());

            for (m, line) in cutter.kind.lines().iter().enumerate() {
                let key = IntersectionKey::target_surface(
                    p,
                    cutter.nodes[line[0]],
                    cutter.nodes[line[1]],
                );
                let line_geometry = sub_geometry(cutter_line_kind, line, geometry.nodes());
                let roots =
                    self.cached_roots(key, &face_geometry, &line_geometry, options.max_newton_iterations);

                for root in roots {
                    let x = face_geometry.point_at(&Point::new(root.x, root.y, 0.0));
                    let Some(xi) = self.geometry.to_local(&x) else {
                        log::debug!(
                            "intersection of cutter element {} with face {} of target element {} cannot be mapped back",
                            cutter.id,
                            p,
                            self.target.id
                        );
                        continue;
                    };
                    let Some(c) = reference_line_point(cutter.kind, m, root.z) else {
                        continue;
                    };
                    let point = InterfacePoint::on_face(kind, p, &xi)?;
                    result.insert(Point2::new(c.x, c.y), point);
                }
            }
        }

        Ok(result)
    }

    /// Orders the interface points of the cutter element at position `cutter`
    /// into a polygon and stores it in the piecewise-linear complex.
    pub fn add_cutter_polygon(
        &mut self,
        cutter: usize,
        points: Vec<CutterPoint>,
        options: &CutOptions,
    ) -> Result<(), CutError> {
        let n = points.len();
        if n == 0 {
            return Ok(());
        }

        let in_plane = n == 3
            || (self.geometry.geometry_type() == GeometryType::Cartesian
                && self.cutters[cutter].geometry.is_planar());
        let mut order: Vec<usize> = (0..n).collect();
        let mut triangulation = if in_plane {
            Triangulation::FanFromFirst
        } else {
            Triangulation::FanAround(Point::origin())
        };

        if n > 2 {
            let plane: Vec<Point2<Real>> = points.iter().map(|p| p.cutter_local).collect();
            let hull = convex_hull2(&plane)?;
            order = hull.vertices.clone();

            if hull.collinear {
                log::warn!(
                    "interface points of cutter element {} in target element {} are collinear",
                    self.cutters[cutter].element.id,
                    self.target.id
                );
                triangulation = Triangulation::Chain;
            } else if hull.len() < n {
                self.concave_polygons += 1;
                log::warn!(
                    "interface polygon of cutter element {} in target element {} is not convex: {} of {} points on its hull",
                    self.cutters[cutter].element.id,
                    self.target.id,
                    hull.len(),
                    n
                );

                if options.has(CutFlags::EAR_CLIP_CONCAVE) {
                    let by_angle = order_by_angle(&plane);
                    let outline: Vec<_> = by_angle.iter().map(|i| plane[*i]).collect();
                    if let Some(triangles) = triangulate_ear_clipping(&outline) {
                        order = by_angle;
                        triangulation = Triangulation::Explicit(triangles);
                    } else {
                        log::warn!("ear clipping failed, keeping the hull ordering");
                    }
                }
            }

            if let Triangulation::FanAround(ref mut mid) = triangulation {
                *mid = self.polygon_midpoint(cutter, &plane, &points, &order);
            }
        }

        let raw: Vec<usize> = order
            .iter()
            .map(|i| self.insert_point(points[*i].point.clone()))
            .collect();
        let mut positions: Vec<usize> = Vec::with_capacity(raw.len());
        for p in &raw {
            if !positions.contains(p) {
                positions.push(*p);
            }
        }

        // Vertices merged by the target-local deduplication shift the explicit
        // triangles: map them through the point indices instead.
        if let Triangulation::Explicit(triangles) = &mut triangulation {
            let mapped = triangles
                .iter()
                .map(|t| {
                    let nodes = t.map(|i| raw[i]);
                    nodes.map(|p| positions.iter().position(|q| *q == p).unwrap_or(0))
                })
                .filter(|t| t[0] != t[1] && t[1] != t[2] && t[2] != t[0])
                .collect();
            *triangles = mapped;
        }

        let surface = if positions.len() > 1 {
            self.common_surface(cutter, &positions)
        } else {
            None
        };

        log::debug!(
            "cutter element {} leaves {} points in target element {}",
            self.cutters[cutter].element.id,
            positions.len(),
            self.target.id
        );
        self.store_plc(cutter, surface, &positions, triangulation)
    }

    /// The center of the polygon on the cutter element, in target-local
    /// coordinates.
    fn polygon_midpoint(
        &self,
        cutter: usize,
        plane: &[Point2<Real>],
        points: &[CutterPoint],
        order: &[usize],
    ) -> Point<Real> {
        let center = order
            .iter()
            .fold(Point2::origin(), |acc, i| acc + plane[*i].coords)
            / order.len() as Real;
        let x = self.cutters[cutter]
            .geometry
            .point_at(&Point::new(center.x, center.y, 0.0));

        self.geometry.to_local(&x).unwrap_or_else(|| {
            // Average of the vertices as a fallback.
            order
                .iter()
                .fold(Point::origin(), |acc, i| acc + points[*i].point.coord.coords)
                / order.len() as Real
        })
    }

    /// The target face containing every position, if the cutter element lies
    /// in that face.
    fn common_surface(&self, cutter: usize, positions: &[usize]) -> Option<usize> {
        (0..self.target.kind.num_surfaces()).find(|s| {
            let count = positions
                .iter()
                .filter(|p| self.points[**p].surfaces.contains(s))
                .count();
            if count > 2 && count < positions.len() {
                log::debug!(
                    "{} of {} interface points of target element {} lie on face {}",
                    count,
                    positions.len(),
                    self.target.id,
                    s
                );
            }
            count > 2 && count == positions.len() && self.cutter_lies_on_face(cutter, positions)
        })
    }

    fn cutter_lies_on_face(&self, cutter: usize, positions: &[usize]) -> bool {
        let mid = positions
            .iter()
            .fold(Point::origin(), |acc, p| acc + self.points[*p].coord.coords)
            / positions.len() as Real;
        let x = self.geometry.point_at(&mid);
        let projection = self.cutters[cutter].geometry.project_point(&x, false);
        projection.distance < TOL7 * self.geometry.length_scale()
    }
}

//! Bookkeeping of the piecewise-linear complex of one target element.

use crate::cut::context::{CutContext, SurfaceTriangle};
use crate::cut::polygon::Triangulation;
use crate::cut::{CutError, InterfacePoint, PointType};
use crate::math::{Point, Real};
use crate::query::snap_to_faces;
use crate::utils::hashmap::HashSet;
use crate::utils::SortedPair;
use alloc::vec::Vec;
use smallvec::SmallVec;

fn is_degenerate(t: &[usize; 3]) -> bool {
    t[0] == t[1] || t[1] == t[2] || t[2] == t[0]
}

/// Fan triangles `(p_i, p_i+1, center)` around a closed polygon.
fn fan_around(positions: &[usize], center: usize) -> Vec<[usize; 3]> {
    let n = positions.len();
    (0..n)
        .map(|i| [positions[i], positions[(i + 1) % n], center])
        .collect()
}

/// Fan triangles `(p_0, p_i, p_i+1)` of a convex polygon.
fn fan_from_first(positions: &[usize]) -> Vec<[usize; 3]> {
    (1..positions.len().saturating_sub(1))
        .map(|i| [positions[0], positions[i], positions[i + 1]])
        .collect()
}

impl<'a> CutContext<'a> {
    /// Adds the segment `a`-`b` to every target face containing both points.
    ///
    /// Segments along a target line are implied by the element outline and
    /// are not stored.
    pub fn store_single_segment(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (pa, pb) = (&self.points[a], &self.points[b]);
        if pa.shares_line_with(pb) {
            return;
        }

        let key = SortedPair::new(a, b);
        for s in pa.common_surfaces(pb) {
            if !self.segments[s].contains(&key) {
                self.segments[s].push(key);
            }
        }
    }

    /// Stores the segments of the closed polygon `positions`.
    pub fn store_segments(&mut self, positions: &[usize]) {
        let n = positions.len();
        for i in 0..n {
            self.store_single_segment(positions[i], positions[(i + 1) % n]);
        }
    }

    /// Stores the segments of the open chain `positions`.
    fn store_chain(&mut self, positions: &[usize]) {
        for pair in positions.windows(2) {
            self.store_single_segment(pair[0], pair[1]);
        }
    }

    /// Stores the segments from `center` to every point of `positions`.
    fn store_spokes(&mut self, center: usize, positions: &[usize]) {
        for p in positions {
            self.store_single_segment(center, *p);
        }
    }

    /// Records the boundary points of `positions` that no segment reaches.
    ///
    /// Each such point is recorded once, on the first of its faces.
    pub fn store_isolated_points(&mut self, positions: &[usize]) {
        for p in positions {
            let point = &self.points[*p];
            if !matches!(point.kind, PointType::Line | PointType::Surface) {
                continue;
            }

            let on_segment = point.surfaces.iter().any(|s| {
                self.segments[*s].iter().any(|seg| {
                    let (a, b) = **seg;
                    a == *p || b == *p
                })
            });
            let recorded = point.surfaces.iter().any(|s| self.isolated[*s].contains(p));
            if !on_segment && !recorded {
                if let Some(s) = point.surfaces.first() {
                    self.isolated[*s].push(*p);
                }
            }
        }
    }

    fn store_triangles(&mut self, cutter: usize, triangles: &[[usize; 3]]) {
        for t in triangles.iter().filter(|t| !is_degenerate(t)) {
            self.triangles.push(*t);
            self.triangle_markers.push(cutter);
        }
    }

    fn store_surface_triangles(&mut self, cutter: usize, triangles: &[[usize; 3]]) {
        for t in triangles.iter().filter(|t| !is_degenerate(t)) {
            self.surface_triangles.push(SurfaceTriangle { cutter, nodes: *t });
        }
    }

    /// Stores the center of a polygon, on the face `surface` if given.
    fn store_center(&mut self, coord: &Point<Real>, surface: Option<usize>) -> Result<usize, CutError> {
        let kind = self.target.kind;
        let point = match surface {
            Some(s) => InterfacePoint {
                coord: snap_to_faces(kind, coord, &[s]),
                kind: PointType::Surface,
                node: None,
                lines: SmallVec::new(),
                surfaces: SmallVec::from_slice(&[s]),
            },
            None => InterfacePoint::classify(kind, coord)?,
        };
        Ok(self.insert_point(point))
    }

    /// Stores the polygon `positions` of the cutter element at position
    /// `cutter`.
    ///
    /// A polygon lying in the target face `surface` becomes surface
    /// triangles. Any other polygon becomes interface triangles.
    pub fn store_plc(
        &mut self,
        cutter: usize,
        surface: Option<usize>,
        positions: &[usize],
        triangulation: Triangulation,
    ) -> Result<(), CutError> {
        let n = positions.len();
        if let Triangulation::Chain = triangulation {
            self.store_chain(positions);
            self.store_isolated_points(positions);
            return Ok(());
        }

        if n > 1 {
            self.store_segments(positions);
        }

        if n > 2 {
            let triangles = match triangulation {
                Triangulation::FanFromFirst => fan_from_first(positions),
                Triangulation::Explicit(triangles) => triangles
                    .iter()
                    .map(|t| t.map(|i| positions[i]))
                    .collect(),
                Triangulation::FanAround(center) => {
                    let center = self.store_center(&center, surface)?;
                    if surface.is_some() {
                        self.store_spokes(center, positions);
                    }
                    let triangles = fan_around(positions, center);
                    if surface.is_none() {
                        self.store_isolated_points(&[center]);
                    }
                    triangles
                }
                Triangulation::Chain => Vec::new(),
            };

            if surface.is_some() {
                self.store_surface_triangles(cutter, &triangles);
            } else {
                self.store_triangles(cutter, &triangles);
            }
        }

        if surface.is_none() || n == 1 {
            self.store_isolated_points(positions);
        }
        Ok(())
    }

    /// Drops the isolated points that ended up on a segment.
    pub fn complete_plc(&mut self) {
        let on_segments: HashSet<usize> = self
            .segments
            .iter()
            .flatten()
            .flat_map(|seg| {
                let (a, b) = **seg;
                [a, b]
            })
            .collect();
        for list in &mut self.isolated {
            list.retain(|p| !on_segments.contains(p));
        }
    }

    /// Does the element need a tetrahedralization, i.e. was any triangle stored?
    pub fn needs_tetrahedralization(&self) -> bool {
        !self.triangles.is_empty() || !self.surface_triangles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshElement;
    use crate::query::ElementGeometry;
    use crate::shape::ShapeKind;
    use alloc::vec;

    fn context(hex: &MeshElement) -> CutContext<'_> {
        let nodes = ShapeKind::Hex8
            .reference()
            .nodes
            .iter()
            .map(|c| Point::from(*c))
            .collect();
        CutContext::new(hex, ElementGeometry::new(ShapeKind::Hex8, nodes))
    }

    fn classified(ctx: &mut CutContext, x: Real, y: Real, z: Real) -> usize {
        let point = InterfacePoint::classify(ShapeKind::Hex8, &Point::new(x, y, z)).unwrap();
        ctx.insert_point(point)
    }

    #[test]
    fn segments_skip_element_lines() {
        let hex = MeshElement::new(0, ShapeKind::Hex8, (0..8).collect()).unwrap();
        let mut ctx = context(&hex);
        let a = classified(&mut ctx, 1.0, -1.0, 0.0);
        let b = classified(&mut ctx, 1.0, -1.0, 0.5);
        // Both on the line 1-5.
        ctx.store_single_segment(a, b);
        assert!(ctx.segments.iter().all(|s| s.is_empty()));

        let c = classified(&mut ctx, 1.0, 1.0, 0.0);
        ctx.store_single_segment(a, c);
        ctx.store_single_segment(c, a);
        assert_eq!(ctx.segments[2], vec![SortedPair::new(a, c)]);
        assert_eq!(ctx.segments.iter().map(|s| s.len()).sum::<usize>(), 1);
    }

    #[test]
    fn isolated_points_are_recorded_once() {
        let hex = MeshElement::new(0, ShapeKind::Hex8, (0..8).collect()).unwrap();
        let mut ctx = context(&hex);
        let a = classified(&mut ctx, 1.0, -1.0, 0.0);
        let inner = classified(&mut ctx, 0.0, 0.0, 0.0);
        ctx.store_isolated_points(&[a, inner]);
        ctx.store_isolated_points(&[a]);
        assert_eq!(ctx.isolated.iter().map(|s| s.len()).sum::<usize>(), 1);
        assert_eq!(ctx.isolated[1], vec![a]);

        let c = classified(&mut ctx, 1.0, 1.0, 0.0);
        ctx.store_single_segment(a, c);
        ctx.complete_plc();
        assert!(ctx.isolated.iter().all(|s| s.is_empty()));
        assert!(!ctx.needs_tetrahedralization());
    }

    #[test]
    fn fan_around_a_center() {
        let hex = MeshElement::new(0, ShapeKind::Hex8, (0..8).collect()).unwrap();
        let mut ctx = context(&hex);
        let positions = [
            classified(&mut ctx, -1.0, -1.0, 0.1),
            classified(&mut ctx, 1.0, -1.0, 0.0),
            classified(&mut ctx, 1.0, 1.0, -0.1),
            classified(&mut ctx, -1.0, 1.0, 0.0),
        ];
        ctx.store_plc(
            0,
            None,
            &positions,
            Triangulation::FanAround(Point::new(0.0, 0.0, 0.0)),
        )
        .unwrap();

        assert_eq!(ctx.points.len(), 13);
        assert_eq!(ctx.triangles.len(), 4);
        assert!(ctx.triangles.iter().all(|t| t[2] == 12));
        assert_eq!(ctx.triangles[3], [positions[3], positions[0], 12]);
        assert_eq!(ctx.triangle_markers, vec![0; 4]);
        assert!(ctx.needs_tetrahedralization());
    }
}

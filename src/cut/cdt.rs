//! Tetrahedralization of the piecewise-linear complex of one target element
//! and extraction of the integration cells.

use crate::cut::cells::{tet_volume, triangle_area};
use crate::cut::context::CutContext;
use crate::cut::{
    BoundaryIntCell, CutError, CutFlags, CutOptions, DomainIntCell, Plc, PlcFacet,
    Tetrahedralizer, BOUNDARY_POINT_MARKER, INTERFACE_POINT_MARKER,
};
use crate::math::{Point, Real};
use crate::utils::TOL14;
use alloc::vec::Vec;
use smallvec::SmallVec;

/// Local edges of a quadratic triangle, in midpoint order.
const TRI_EDGES: [(usize, usize); 3] = [(0, 1), (1, 2), (2, 0)];

/// The integration cells of one target element.
#[derive(Clone, Debug, Default)]
pub(crate) struct ElementCells {
    pub domain: Vec<DomainIntCell>,
    pub boundary: Vec<BoundaryIntCell>,
}

/// Moves a scaled point of the slanted face `x + y + z = scale` of a
/// tetrahedron exactly onto it.
///
/// Coordinates already on the element outline (`0` or `scale`) are kept and
/// the first free one absorbs the rounding error.
fn round_on_slanted_face(pt: &mut Point<Real>, scale: Real) {
    let fixed = |c: Real| c == 0.0 || c == scale;
    let free: SmallVec<[usize; 3]> = (0..3).filter(|k| !fixed(pt[*k])).collect();
    let Some(k) = free.last().copied() else {
        return;
    };
    let others: Real = (0..3).filter(|j| *j != k).map(|j| pt[j]).sum();
    pt[k] = scale - others;
}

impl<'a> CutContext<'a> {
    /// The piecewise-linear complex of the element, in scaled and rounded
    /// local coordinates.
    ///
    /// The target faces come first, carrying their segments and isolated
    /// points, then one facet per interface triangle.
    pub fn build_plc(&self, options: &CutOptions) -> Plc {
        let kind = self.target.kind;
        let scale = options.scale_factor;
        let offset = options.facet_marker_offset;

        let mut points: Vec<Point<Real>> = self
            .points
            .iter()
            .map(|p| (p.coord * scale).map(|c| c.round()))
            .collect();
        let mut point_markers = alloc::vec![INTERFACE_POINT_MARKER; points.len()];
        for m in point_markers.iter_mut().take(self.num_corners()) {
            *m = BOUNDARY_POINT_MARKER;
        }

        let on_faces: Vec<usize> = self
            .segments
            .iter()
            .flatten()
            .flat_map(|seg| {
                let (a, b) = **seg;
                [a, b]
            })
            .chain(self.isolated.iter().flatten().copied())
            .collect();
        // The only face of a tetrahedron not containing the origin.
        let slanted = kind
            .is_simplex()
            .then(|| kind.surfaces().iter().position(|s| !s.contains(&0)))
            .flatten();
        for p in on_faces {
            point_markers[p] = BOUNDARY_POINT_MARKER;
            if let Some(s) = slanted {
                if p >= self.num_corners() && self.points[p].surfaces.contains(&s) {
                    round_on_slanted_face(&mut points[p], scale);
                }
            }
        }

        let corners = kind.surface_corners();
        let mut facets: Vec<PlcFacet> = kind
            .surfaces()
            .iter()
            .enumerate()
            .map(|(s, face)| {
                let mut polygons = alloc::vec![face[..corners].to_vec()];
                polygons.extend(self.segments[s].iter().map(|seg| {
                    let (a, b) = **seg;
                    alloc::vec![a, b]
                }));
                polygons.extend(self.isolated[s].iter().map(|p| alloc::vec![*p]));
                PlcFacet {
                    polygons,
                    marker: self.face_markers[s] + offset,
                }
            })
            .collect();

        facets.extend(
            self.triangles
                .iter()
                .zip(self.triangle_markers.iter())
                .map(|(t, m)| PlcFacet {
                    polygons: alloc::vec![t.to_vec()],
                    marker: *m as i32 + offset,
                }),
        );

        Plc {
            points,
            point_markers,
            facets,
        }
    }

    /// Tetrahedralizes the element and reads the integration cells back.
    pub fn integration_cells<T: Tetrahedralizer + ?Sized>(
        &mut self,
        options: &CutOptions,
        engine: &T,
    ) -> Result<ElementCells, CutError> {
        let plc = self.build_plc(options);
        let switches = options.switches();
        let mesh = engine.tetrahedralize(&plc, &switches)?;

        let required = options.nodes_per_tet();
        if mesh.corners_per_tet < required {
            return Err(CutError::MissingQuadraticNodes {
                required,
                found: mesh.corners_per_tet,
            });
        }
        log::debug!(
            "target element {}: {} points, {} facets, {} tetrahedra",
            self.target.id,
            plc.points.len(),
            plc.facets.len(),
            mesh.tets.len()
        );

        let mut local: Vec<Point<Real>> = mesh
            .points
            .iter()
            .map(|p| p / options.scale_factor)
            .collect();
        let quadratic = options.has(CutFlags::QUADRATIC_CELLS);
        if quadratic && options.has(CutFlags::RECOVER_CURVED_INTERFACE) {
            let mut markers = mesh.point_markers.clone();
            self.recover_curved_interface(&mut local, &mut markers, &mesh, options);
        }

        let mut result = ElementCells::default();
        for tet in &mesh.tets {
            let nodes: Vec<Point<Real>> = tet[..required].iter().map(|i| local[*i]).collect();
            if tet_volume(&nodes) <= options.degenerate_volume_tolerance {
                continue;
            }
            let physical = nodes.iter().map(|x| self.geometry.point_at(x)).collect();
            result.domain.push(DomainIntCell {
                local: nodes,
                physical,
            });
        }

        for triangle in &self.surface_triangles {
            let mut nodes: Vec<Point<Real>> = triangle.nodes.iter().map(|i| local[*i]).collect();
            if quadratic {
                for (a, b) in TRI_EDGES {
                    nodes.push(na::center(&nodes[a], &nodes[b]));
                }
            }
            if let Some(cell) = self.boundary_cell(triangle.cutter, nodes) {
                result.boundary.push(cell);
            }
        }

        let per_face = if quadratic { 6 } else { 3 };
        for face in &mesh.boundary_faces {
            let Ok(cutter) = usize::try_from(face.marker - options.facet_marker_offset) else {
                continue;
            };
            if cutter >= self.cutters.len() {
                log::debug!("boundary face with unknown marker {}", face.marker);
                continue;
            }
            let nodes = face
                .nodes
                .get(..per_face)
                .ok_or(CutError::MissingQuadraticNodes {
                    required: per_face,
                    found: face.nodes.len(),
                })?;
            let nodes = nodes.iter().map(|i| local[*i]).collect();
            if let Some(cell) = self.boundary_cell(cutter, nodes) {
                result.boundary.push(cell);
            }
        }

        Ok(result)
    }

    /// A boundary cell on the cutter element at position `cutter`, unless it
    /// has no area.
    fn boundary_cell(&self, cutter: usize, local: Vec<Point<Real>>) -> Option<BoundaryIntCell> {
        let physical: Vec<Point<Real>> = local.iter().map(|x| self.geometry.point_at(x)).collect();
        let scale = self.geometry.length_scale();
        if triangle_area(&physical) <= TOL14 * scale * scale {
            return None;
        }

        let owner = &self.cutters[cutter];
        let cutter_local = physical
            .iter()
            .map(|x| {
                let xi = owner.geometry.project_point(x, false).local;
                Point::new(xi.x, xi.y, 0.0)
            })
            .collect();
        Some(BoundaryIntCell {
            local,
            cutter_local,
            physical,
            cutter_id: owner.element.id,
        })
    }
}

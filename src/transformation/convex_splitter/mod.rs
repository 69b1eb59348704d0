//! A tetrahedralization engine for convex domains split by interface facets.
//!
//! The domain is the convex hull of the input points. It is cut into convex
//! cells by the planes of the interface facets and of their edges, restricted
//! each time to the cells the facet overlaps, so that every facet ends up a
//! union of cell faces. Each cell is then fanned into tetrahedra from its
//! centroid.
//!
//! Neighbouring cells are split independently, so their common faces need not
//! match vertex-to-vertex. This is harmless for integration cells but makes
//! the output unsuitable as a finite-element mesh.

use self::convex_cell::ConvexCell;
use self::point_pool::{PointPool, SplitPlane};
use crate::bounding_volume::Aabb;
use crate::cut::{
    BoundaryFace, CutError, Plc, Switches, TetMesh, Tetrahedralizer, STEINER_POINT_MARKER,
};
use crate::math::{Point, Real, Vector};
use crate::utils::hashmap::HashMap;
use crate::utils::SortedPair;
use alloc::string::ToString;
use alloc::vec::Vec;

mod convex_cell;
mod point_pool;

/// Local edges of a quadratic tetrahedron, in midpoint order.
const TET_EDGES: [(usize, usize); 6] = [(0, 1), (1, 2), (2, 0), (0, 3), (1, 3), (2, 3)];

/// The role of a facet of the input.
#[derive(Clone, Debug)]
struct ClassifiedFacet {
    /// Oriented so that the domain lies below it for hull facets.
    plane: SplitPlane,
    outline: Vec<usize>,
    /// Segments drawn inside the facet.
    segments: Vec<[usize; 2]>,
    marker: i32,
    on_hull: bool,
}

/// A [`Tetrahedralizer`] splitting the convex hull of the input into convex cells.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConvexSplitter {
    /// Geometric tolerance, relative to the diagonal of the input bounding box.
    pub relative_tolerance: Real,
}

impl Default for ConvexSplitter {
    fn default() -> Self {
        Self {
            relative_tolerance: 1.0e-10,
        }
    }
}

impl Tetrahedralizer for ConvexSplitter {
    fn tetrahedralize(&self, plc: &Plc, switches: &Switches) -> Result<TetMesh, CutError> {
        if plc.points.len() < 4 {
            return Err(CutError::Tetrahedralization(
                "fewer than four input points".to_string(),
            ));
        }

        let aabb = Aabb::from_points(&plc.points);
        let tol = self.relative_tolerance * aabb.diagonal();
        let mut pool = PointPool::new(tol);
        for (pt, marker) in plc.points.iter().zip(plc.point_markers.iter()) {
            let _ = pool.push(*pt, *marker);
        }

        let facets = classify_facets(plc, tol);
        if facets.iter().filter(|f| f.on_hull).count() < 4 {
            return Err(CutError::Tetrahedralization(
                "the input facets do not bound a volume".to_string(),
            ));
        }

        let mut cells = alloc::vec![ConvexCell::cuboid(&mut pool, &aabb, STEINER_POINT_MARKER)];
        for facet in facets.iter().filter(|f| f.on_hull) {
            cells = cells
                .iter()
                .filter_map(|c| c.split(&facet.plane, &mut pool, tol, STEINER_POINT_MARKER).0)
                .collect();
        }

        // Segments drawn on the hull.
        for facet in facets.iter().filter(|f| f.on_hull) {
            for seg in &facet.segments {
                let (a, b) = (plc.points[seg[0]], plc.points[seg[1]]);
                if let Some(normal) = (b - a).cross(&facet.plane.normal).try_normalize(0.0) {
                    let plane = SplitPlane::new(normal, &a);
                    split_overlapping(&mut cells, &[a, b], &plane, &mut pool, tol);
                }
            }
        }

        let edge_owners = interface_edges(&facets);
        for (f, facet) in facets.iter().enumerate().filter(|(_, f)| !f.on_hull) {
            let region: Vec<_> = facet.outline.iter().map(|i| plc.points[*i]).collect();
            split_overlapping(&mut cells, &region, &facet.plane, &mut pool, tol);

            for k in 0..facet.outline.len() {
                let a = facet.outline[k];
                let b = facet.outline[(k + 1) % facet.outline.len()];
                let shared_in_plane = edge_owners[&SortedPair::new(a, b)].iter().any(|g| {
                    *g != f
                        && facets[*g].marker == facet.marker
                        && facets[*g].plane.is_coplanar_with(&facet.plane, tol)
                });
                if shared_in_plane {
                    continue;
                }

                let (pa, pb) = (plc.points[a], plc.points[b]);
                if let Some(normal) = (pb - pa).cross(&facet.plane.normal).try_normalize(0.0) {
                    let plane = SplitPlane::new(normal, &pa);
                    split_overlapping(&mut cells, &region, &plane, &mut pool, tol);
                }
            }
        }

        cells.retain(|c| c.volume(&pool).abs() > tol * tol * tol);
        let mut mesh = assemble(&cells, &facets, plc, &mut pool, tol);
        if switches.quadratic {
            add_midpoints(&mut mesh, &mut pool);
        }
        mesh.points = pool.points;
        mesh.point_markers = pool.markers;

        if !switches.quiet {
            log::debug!(
                "{} cells, {} tetrahedra, {} boundary faces",
                cells.len(),
                mesh.tets.len(),
                mesh.boundary_faces.len()
            );
        }
        Ok(mesh)
    }
}

fn classify_facets(plc: &Plc, tol: Real) -> Vec<ClassifiedFacet> {
    plc.facets
        .iter()
        .filter_map(|facet| {
            let outline = facet.polygons.first()?.clone();
            let pts: Vec<_> = outline.iter().map(|i| plc.points[*i]).collect();
            let plane = SplitPlane::from_polygon(&pts)?;
            let (lo, hi) = plc
                .points
                .iter()
                .map(|p| plane.signed_distance(p))
                .fold((Real::MAX, Real::MIN), |(lo, hi), d| (lo.min(d), hi.max(d)));

            let (plane, on_hull) = if hi <= tol {
                (plane, true)
            } else if lo >= -tol {
                (plane.flipped(), true)
            } else {
                (plane, false)
            };
            let segments = facet
                .polygons
                .iter()
                .skip(1)
                .filter(|p| p.len() == 2)
                .map(|p| [p[0], p[1]])
                .collect();
            Some(ClassifiedFacet {
                plane,
                outline,
                segments,
                marker: facet.marker,
                on_hull,
            })
        })
        .collect()
}

/// The interface facets owning each outline edge.
fn interface_edges(facets: &[ClassifiedFacet]) -> HashMap<SortedPair<usize>, Vec<usize>> {
    let mut result: HashMap<SortedPair<usize>, Vec<usize>> = HashMap::default();
    for (f, facet) in facets.iter().enumerate().filter(|(_, f)| !f.on_hull) {
        for k in 0..facet.outline.len() {
            let key = SortedPair::new(facet.outline[k], facet.outline[(k + 1) % facet.outline.len()]);
            result.entry(key).or_default().push(f);
        }
    }
    result
}

/// Splits by `plane` every cell that `region` overlaps.
fn split_overlapping(
    cells: &mut Vec<ConvexCell>,
    region: &[Point<Real>],
    plane: &SplitPlane,
    pool: &mut PointPool,
    tol: Real,
) {
    let mut result = Vec::with_capacity(cells.len());
    for cell in cells.drain(..) {
        if cell.overlaps(region, pool, tol) {
            let (lo, hi) = cell.split(plane, pool, tol, STEINER_POINT_MARKER);
            result.extend(lo);
            result.extend(hi);
        } else {
            result.push(cell);
        }
    }
    *cells = result;
}

/// Is `pt`, lying on the plane of `outline`, inside it?
fn outline_contains(outline: &[Point<Real>], normal: &Vector<Real>, pt: &Point<Real>, tol: Real) -> bool {
    let n = outline.len();
    let mut crossings = 0;
    for i in 0..n {
        let (a, b) = (outline[i], outline[(i + 1) % n]);
        let ab = b - a;
        let t = (ab.dot(&(pt - a)) / ab.norm_squared().max(Real::MIN_POSITIVE)).clamp(0.0, 1.0);
        if na::distance(&(a + ab * t), pt) <= tol {
            return true;
        }
    }

    // Crossing test in the plane, along a ray orthogonal to the normal.
    let u = (outline[0] - pt)
        .cross(normal)
        .try_normalize(0.0)
        .unwrap_or_else(|| normal.cross(&Vector::x()));
    let w = normal.cross(&u);
    let project = |p: &Point<Real>| ((p - pt).dot(&u), (p - pt).dot(&w));
    for i in 0..n {
        let (ax, ay) = project(&outline[i]);
        let (bx, by) = project(&outline[(i + 1) % n]);
        if (ay > 0.0) != (by > 0.0) {
            let x = ax + (bx - ax) * (-ay / (by - ay));
            if x > 0.0 {
                crossings += 1;
            }
        }
    }
    crossings % 2 == 1
}

/// The facet a cell face lies on, if any.
///
/// Returns the facet index, and whether the face triangles are emitted.
fn facet_of_face(
    face: &[Point<Real>],
    outward: &Vector<Real>,
    facets: &[ClassifiedFacet],
    plc: &Plc,
    tol: Real,
) -> Option<(usize, bool)> {
    let center = point_pool::polygon_center(face);
    let mut coplanar_hull = None;

    for (f, facet) in facets.iter().enumerate() {
        if !face.iter().all(|p| facet.plane.signed_distance(p).abs() <= tol) {
            continue;
        }
        let outline: Vec<_> = facet.outline.iter().map(|i| plc.points[*i]).collect();
        let inside = outline_contains(&outline, &facet.plane.normal, &center, tol);
        if facet.on_hull {
            if inside {
                return Some((f, true));
            }
            coplanar_hull = coplanar_hull.or(Some(f));
        } else if inside {
            return Some((f, outward.dot(&facet.plane.normal) < 0.0));
        }
    }

    coplanar_hull.map(|f| (f, true))
}

fn assemble(
    cells: &[ConvexCell],
    facets: &[ClassifiedFacet],
    plc: &Plc,
    pool: &mut PointPool,
    tol: Real,
) -> TetMesh {
    let mut tets = Vec::new();
    let mut boundary_faces = Vec::new();

    for cell in cells {
        let centroid = cell.centroid(pool);
        let center = pool.insert(centroid, STEINER_POINT_MARKER);
        for (f, face) in cell.faces.iter().enumerate() {
            let pts = cell.face_points(f, pool);
            let owner = cell
                .face_plane(f, pool)
                .and_then(|plane| facet_of_face(&pts, &plane.normal, facets, plc, tol));

            for k in 1..face.len() - 1 {
                let (a, b, c) = (face[0], face[k], face[k + 1]);
                tets.push(alloc::vec![a, c, b, center]);

                if let Some((g, true)) = owner {
                    let nodes = if facets[g].on_hull {
                        alloc::vec![a, b, c]
                    } else {
                        alloc::vec![a, c, b]
                    };
                    boundary_faces.push(BoundaryFace {
                        nodes,
                        marker: facets[g].marker,
                        adjacent_tets: [Some(tets.len() - 1), None],
                    });
                }
            }
        }
    }

    TetMesh {
        points: Vec::new(),
        point_markers: Vec::new(),
        tets,
        corners_per_tet: 4,
        boundary_faces,
    }
}

/// Appends the edge midpoints of every tetrahedron and boundary face.
fn add_midpoints(mesh: &mut TetMesh, pool: &mut PointPool) {
    let mut mids: HashMap<SortedPair<usize>, usize> = HashMap::default();
    let mut midpoint = |a: usize, b: usize, pool: &mut PointPool| {
        *mids.entry(SortedPair::new(a, b)).or_insert_with(|| {
            let pt = na::center(pool.get(a), pool.get(b));
            pool.push(pt, STEINER_POINT_MARKER)
        })
    };

    for tet in &mut mesh.tets {
        for (i, j) in TET_EDGES {
            let m = midpoint(tet[i], tet[j], pool);
            tet.push(m);
        }
    }
    for face in &mut mesh.boundary_faces {
        for (i, j) in [(0, 1), (1, 2), (2, 0)] {
            let m = midpoint(face.nodes[i], face.nodes[j], pool);
            face.nodes.push(m);
        }
    }
    mesh.corners_per_tet = 10;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cut::{PlcFacet, BOUNDARY_POINT_MARKER, INTERFACE_POINT_MARKER};
    use alloc::vec;

    fn tet_volume(mesh: &TetMesh, tet: &[usize]) -> Real {
        let p = |i: usize| mesh.points[tet[i]];
        (p(1) - p(0)).cross(&(p(2) - p(0))).dot(&(p(3) - p(0))) / 6.0
    }

    fn switches(quadratic: bool) -> Switches {
        Switches {
            plc: true,
            quality: true,
            quiet: true,
            quadratic,
        }
    }

    /// The unit cube with a square cut at height `z`, made of two triangles.
    fn cut_cube(z: Real) -> Plc {
        let mut points = Vec::new();
        for k in 0..2 {
            for j in 0..2 {
                for i in 0..2 {
                    points.push(Point::new(i as Real, j as Real, k as Real));
                }
            }
        }
        points.extend([
            Point::new(0.0, 0.0, z),
            Point::new(1.0, 0.0, z),
            Point::new(1.0, 1.0, z),
            Point::new(0.0, 1.0, z),
        ]);
        let mut point_markers = vec![BOUNDARY_POINT_MARKER; 8];
        point_markers.extend([INTERFACE_POINT_MARKER; 4]);

        let faces = [
            vec![0, 2, 3, 1],
            vec![4, 5, 7, 6],
            vec![0, 1, 9, 5, 4, 8],
            vec![2, 11, 6, 7, 10, 3],
            vec![0, 8, 4, 6, 11, 2],
            vec![1, 3, 10, 7, 5, 9],
        ];
        let mut facets: Vec<_> = faces
            .into_iter()
            .enumerate()
            .map(|(m, outline)| PlcFacet {
                polygons: vec![outline],
                marker: m as i32,
            })
            .collect();
        facets.push(PlcFacet {
            polygons: vec![vec![8, 9, 10]],
            marker: 20,
        });
        facets.push(PlcFacet {
            polygons: vec![vec![8, 10, 11]],
            marker: 20,
        });
        Plc {
            points,
            point_markers,
            facets,
        }
    }

    #[test]
    fn cube_cut_by_a_plane() {
        let plc = cut_cube(0.25);
        let mesh = ConvexSplitter::default()
            .tetrahedralize(&plc, &switches(false))
            .unwrap();

        assert_eq!(&mesh.points[..12], &plc.points[..]);
        let mut below = 0.0;
        let mut above = 0.0;
        for tet in &mesh.tets {
            let vol = tet_volume(&mesh, tet);
            assert!(vol >= 0.0);
            let centroid_z: Real = tet.iter().map(|i| mesh.points[*i].z).sum::<Real>() / 4.0;
            if centroid_z < 0.25 {
                below += vol;
            } else {
                above += vol;
            }
        }
        assert_relative_eq!(below, 0.25, epsilon = 1.0e-12);
        assert_relative_eq!(above, 0.75, epsilon = 1.0e-12);

        let interface: Vec<_> = mesh.boundary_faces.iter().filter(|f| f.marker == 20).collect();
        let area: Real = interface
            .iter()
            .map(|f| {
                let p = |i: usize| mesh.points[f.nodes[i]];
                let n = (p(1) - p(0)).cross(&(p(2) - p(0)));
                // Oriented like the facets.
                assert!(n.z > 0.0);
                n.norm() / 2.0
            })
            .sum();
        assert_relative_eq!(area, 1.0, epsilon = 1.0e-12);
        for f in &interface {
            assert!(f.nodes.iter().all(|i| (mesh.points[*i].z - 0.25).abs() < 1.0e-12));
            assert!(f.adjacent_tets[0].is_some());
        }

        let hull_area: Real = mesh
            .boundary_faces
            .iter()
            .filter(|f| f.marker < 6)
            .map(|f| {
                let p = |i: usize| mesh.points[f.nodes[i]];
                (p(1) - p(0)).cross(&(p(2) - p(0))).norm() / 2.0
            })
            .sum();
        assert_relative_eq!(hull_area, 6.0, epsilon = 1.0e-12);
    }

    #[test]
    fn tetrahedron_domain() {
        let plc = Plc {
            points: vec![
                Point::origin(),
                Point::new(1.0, 0.0, 0.0),
                Point::new(0.0, 1.0, 0.0),
                Point::new(0.0, 0.0, 1.0),
            ],
            point_markers: vec![BOUNDARY_POINT_MARKER; 4],
            facets: [[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]]
                .iter()
                .enumerate()
                .map(|(m, f)| PlcFacet {
                    polygons: vec![f.to_vec()],
                    marker: m as i32,
                })
                .collect(),
        };
        let mesh = ConvexSplitter::default()
            .tetrahedralize(&plc, &switches(true))
            .unwrap();
        assert_eq!(mesh.corners_per_tet, 10);
        let volume: Real = mesh.tets.iter().map(|t| tet_volume(&mesh, t)).sum();
        assert_relative_eq!(volume, 1.0 / 6.0, epsilon = 1.0e-12);
        for tet in &mesh.tets {
            assert_eq!(tet.len(), 10);
            let mid = na::center(&mesh.points[tet[0]], &mesh.points[tet[3]]);
            assert_relative_eq!(mesh.points[tet[7]], mid, epsilon = 1.0e-12);
        }
        assert!(mesh.boundary_faces.iter().all(|f| f.nodes.len() == 6));
    }

    #[test]
    fn open_input_is_rejected() {
        let mut plc = cut_cube(0.5);
        plc.facets.truncate(3);
        assert!(ConvexSplitter::default()
            .tetrahedralize(&plc, &switches(false))
            .is_err());
    }
}

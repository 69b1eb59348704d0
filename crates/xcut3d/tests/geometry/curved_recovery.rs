use super::common::{cut, horizontal_quad, mapped_cutter, physical_volume, unit_cube};
use approx::assert_relative_eq;
use na::Point3;
use xcut3d::cut::{
    compute_intersection, BoundaryFace, CutError, CutFlags, CutOptions, Plc, Switches, TetMesh,
    Tetrahedralizer, STEINER_POINT_MARKER,
};
use xcut3d::query::ElementGeometry;
use xcut3d::shape::ShapeKind;
use xcut3d::transformation::ConvexSplitter;

/// Height of the curved cutter above `x`.
fn height(x: f64) -> f64 {
    let xi = x - 0.5;
    0.5 + 0.05 * (1.0 - xi * xi)
}

/// A quadratic cutter over `[-0.5, 1.5]^2`, bent along x.
fn curved_cutter() -> xcut3d::mesh::Discretization {
    mapped_cutter(ShapeKind::Quad9, 11, |xi, eta| {
        Point3::new(0.5 + xi, 0.5 + eta, 0.5 + 0.05 * (1.0 - xi * xi))
    })
}

#[test]
fn recovered_nodes_lie_on_the_curved_cutter() {
    let target = unit_cube();
    let cutter = curved_cutter();
    let result = cut(&target, &cutter, &CutOptions::quadratic());

    assert_eq!(result.report.intersected_elements, 1);
    assert_eq!(result.report.missed_points, 0);
    let boundary = &result.boundary_cells[&0];
    assert!(!boundary.is_empty());

    let nodes: Vec<_> = cutter
        .element_positions(&cutter.elements()[0])
        .unwrap();
    let surface = ElementGeometry::new(ShapeKind::Quad9, nodes);

    for cell in boundary {
        assert_eq!(cell.num_nodes(), 6);
        assert_eq!(cell.cutter_id, 11);
        for (x, s) in cell.physical.iter().zip(&cell.cutter_local) {
            // On the true surface, not on the chord.
            assert_relative_eq!(x.z, height(x.x), epsilon = 1.0e-6);
            // The cutter-local coordinates map back to the node.
            assert_relative_eq!(surface.point_at(s), *x, epsilon = 1.0e-6);
        }
    }

    let midpoints_off_the_chord = boundary.iter().any(|cell| {
        (0..3).any(|k| {
            let chord = na::center(&cell.physical[k], &cell.physical[(k + 1) % 3]);
            (chord.z - cell.physical[3 + k].z).abs() > 1.0e-6
        })
    });
    assert!(midpoints_off_the_chord);
}

fn on_cube_edge(c: f64) -> bool {
    c.abs() < 1.0e-12 || (c - 1.0).abs() < 1.0e-12
}

#[test]
fn corners_are_exact_without_recovery() {
    let target = unit_cube();
    let cutter = curved_cutter();
    let options = CutOptions {
        flags: CutFlags::QUADRATIC_CELLS,
        ..CutOptions::default()
    };
    let result = cut(&target, &cutter, &options);
    let boundary = &result.boundary_cells[&0];

    // The cut points on the vertical cube edges lie on the surface.
    let on_edges: Vec<_> = boundary
        .iter()
        .flat_map(|c| c.physical[..3].iter().copied())
        .filter(|x| on_cube_edge(x.x) && on_cube_edge(x.y))
        .collect();
    assert!(!on_edges.is_empty());
    for x in on_edges {
        assert_relative_eq!(x.z, 0.5375, epsilon = 1.0e-7);
    }

    // Straight cells still tile the cube.
    assert_relative_eq!(physical_volume(&result.domain_cells[&0]), 1.0, epsilon = 1.0e-9);
    assert_eq!(result.report.missed_points, 0);
}

/// The splitter, followed by one more interface triangle whose third corner is
/// an engine point far above the cutter.
struct StrayPoint;

impl Tetrahedralizer for StrayPoint {
    fn tetrahedralize(&self, plc: &Plc, switches: &Switches) -> Result<TetMesh, CutError> {
        let mut mesh = ConvexSplitter::default().tetrahedralize(plc, switches)?;
        let offset = CutOptions::default().facet_marker_offset;
        let Some(face) = mesh.boundary_faces.iter().find(|f| f.marker >= offset).cloned() else {
            return Ok(mesh);
        };

        let (a, b) = (face.nodes[0], face.nodes[1]);
        // Local (0, 0, 20), i.e. physical (0.5, 0.5, 10.5).
        let stray = Point3::new(0.0, 0.0, 2.0e8);
        let corners = [mesh.points[a], mesh.points[b], stray];
        let first = mesh.points.len();
        mesh.points.push(stray);
        mesh.point_markers.push(STEINER_POINT_MARKER);
        for (i, j) in [(0, 1), (1, 2), (2, 0)] {
            mesh.points.push(na::center(&corners[i], &corners[j]));
            mesh.point_markers.push(STEINER_POINT_MARKER);
        }
        mesh.boundary_faces.push(BoundaryFace {
            nodes: vec![a, b, first, first + 1, first + 2, first + 3],
            marker: face.marker,
            adjacent_tets: [None, None],
        });
        Ok(mesh)
    }
}

#[test]
fn unreachable_engine_points_are_counted() {
    let target = unit_cube();
    let cutter = horizontal_quad(9, 0.5, -0.5, 1.5);
    let result =
        compute_intersection(&target, &cutter, &CutOptions::quadratic(), &StrayPoint).unwrap();

    // The stray point and the midpoints of its two edges.
    assert!(result.report.missed_points >= 3);
    let stray = Point3::new(0.5, 0.5, 10.5);
    let kept = result.boundary_cells[&0]
        .iter()
        .flat_map(|c| c.physical.iter())
        .any(|x| (x - stray).norm() < 1.0e-9);
    assert!(kept);

    // The regular cells are unaffected.
    assert_relative_eq!(physical_volume(&result.domain_cells[&0]), 1.0, epsilon = 1.0e-9);
}

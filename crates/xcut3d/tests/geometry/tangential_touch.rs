use super::common::{cut, mapped_cutter, unit_cube};
use na::Point3;
use xcut3d::cut::CutOptions;
use xcut3d::shape::ShapeKind;

#[test]
fn triangle_touching_a_corner() {
    // The plane x + y + z = 0 only touches the cube at the origin.
    let corners = [
        Point3::new(2.0, -1.0, -1.0),
        Point3::new(-1.0, 2.0, -1.0),
        Point3::new(-1.0, -1.0, 2.0),
    ];
    let cutter = mapped_cutter(ShapeKind::Tri3, 5, |xi, eta| {
        let zeta = 1.0 - xi - eta;
        Point3::from(corners[0].coords * zeta + corners[1].coords * xi + corners[2].coords * eta)
    });

    let result = cut(&unit_cube(), &cutter, &CutOptions::default());
    assert!(result.boundary_cells.values().all(|cells| cells.is_empty()));
    assert!(!result.is_cut(0));
}

#[test]
fn quad_lying_on_a_face() {
    // A cutter lying in the face z = 1.
    let cutter = mapped_cutter(ShapeKind::Quad4, 2, |xi, eta| {
        Point3::new(0.5 + 0.25 * xi, 0.5 + 0.25 * eta, 1.0)
    });
    let result = cut(&unit_cube(), &cutter, &CutOptions::default());

    // Reported directly as boundary cells on the face.
    assert!(result.is_cut(0));
    let cells = &result.boundary_cells[&0];
    let area: f64 = cells.iter().map(|c| c.physical_area()).sum();
    assert!((area - 0.25).abs() < 1.0e-9);
    assert!(cells.iter().all(|c| c.physical.iter().all(|x| (x.z - 1.0).abs() < 1.0e-9)));
    let volume: f64 = result.domain_cells[&0].iter().map(|c| c.physical_volume()).sum();
    assert!((volume - 1.0).abs() < 1.0e-9);
}

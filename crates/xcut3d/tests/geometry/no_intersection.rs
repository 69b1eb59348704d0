use super::common::{add_unit_hex, cut, horizontal_quad, mapped_cutter, physical_volume, unit_cube};
use approx::assert_relative_eq;
use na::Point3;
use xcut3d::cut::CutOptions;
use xcut3d::mesh::Discretization;
use xcut3d::shape::ShapeKind;

#[test]
fn far_away_cutter() {
    let target = unit_cube();
    let cutter = horizontal_quad(0, 0.5, 5.0, 6.0);
    let result = cut(&target, &cutter, &CutOptions::default());
    assert!(result.domain_cells.is_empty());
    assert!(result.boundary_cells.is_empty());
    assert_eq!(result.report.intersected_elements, 0);
}

#[test]
fn overlapping_boxes_without_a_cut() {
    // The plane x + y + z = 3.3 passes beside the corner (1, 1, 1).
    let corners = [
        Point3::new(3.3, 0.0, 0.0),
        Point3::new(0.0, 3.3, 0.0),
        Point3::new(0.0, 0.0, 3.3),
    ];
    let cutter = mapped_cutter(ShapeKind::Tri3, 0, |xi, eta| {
        Point3::from(corners[0].coords * (1.0 - xi - eta) + corners[1].coords * xi + corners[2].coords * eta)
    });
    let result = cut(&unit_cube(), &cutter, &CutOptions::default());
    assert!(!result.is_cut(0));
    assert!(result.boundary_cells.is_empty());
}

#[test]
fn only_the_cut_element_is_registered() {
    let mut target = Discretization::new();
    add_unit_hex(&mut target, 0, Point3::origin());
    add_unit_hex(&mut target, 1, Point3::new(3.0, 0.0, 0.0));
    let cutter = horizontal_quad(9, 0.5, -0.5, 1.5);

    let result = cut(&target, &cutter, &CutOptions::default());
    assert!(result.is_cut(0));
    assert!(!result.is_cut(1));
    assert!(!result.boundary_cells.contains_key(&1));
    assert_eq!(result.report.intersected_elements, 1);
    assert_relative_eq!(physical_volume(&result.domain_cells[&0]), 1.0, epsilon = 1.0e-9);
}

#[test]
fn empty_cutter_mesh() {
    let result = cut(&unit_cube(), &Discretization::new(), &CutOptions::default());
    assert_eq!(result, Default::default());
}

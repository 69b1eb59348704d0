use super::common::{centroid, cut, horizontal_quad, physical_volume, unit_cube};
use approx::assert_relative_eq;
use xcut3d::cut::{CutFlags, CutOptions};

#[test]
fn cube_cut_by_a_horizontal_plane() {
    let target = unit_cube();
    let cutter = horizontal_quad(42, 0.5, -0.5, 1.5);
    let result = cut(&target, &cutter, &CutOptions::default());

    assert_eq!(result.report.intersected_elements, 1);
    assert_eq!(result.report.missed_points, 0);
    let domain = &result.domain_cells[&0];
    let boundary = &result.boundary_cells[&0];
    assert!(domain.iter().all(|c| c.num_nodes() == 4));

    // Closure, in physical and in reference space.
    assert_relative_eq!(physical_volume(domain), 1.0, epsilon = 1.0e-9);
    let local: f64 = domain.iter().map(|c| c.local_volume()).sum();
    assert_relative_eq!(local, 8.0, epsilon = 1.0e-9);

    let below: f64 = domain
        .iter()
        .filter(|c| centroid(&c.physical).z < 0.5)
        .map(|c| c.physical_volume())
        .sum();
    assert_relative_eq!(below, 0.5, epsilon = 1.0e-9);

    assert!(!boundary.is_empty());
    let area: f64 = boundary.iter().map(|c| c.physical_area()).sum();
    assert_relative_eq!(area, 1.0, epsilon = 1.0e-9);
    for cell in boundary {
        assert_eq!(cell.cutter_id, 42);
        assert_eq!(cell.num_nodes(), 3);
        for ((x, xi), s) in cell.physical.iter().zip(&cell.local).zip(&cell.cutter_local) {
            assert_relative_eq!(x.z, 0.5, epsilon = 1.0e-7);
            assert_relative_eq!(xi.z, 0.0, epsilon = 1.0e-7);
            // The cutter spans [-0.5, 1.5]^2 with unit local scaling.
            assert_relative_eq!(s.x, x.x - 0.5, epsilon = 1.0e-7);
            assert_relative_eq!(s.y, x.y - 0.5, epsilon = 1.0e-7);
            assert_eq!(s.z, 0.0);
        }
    }
}

#[test]
fn quadratic_cells_of_a_flat_cut() {
    let target = unit_cube();
    let cutter = horizontal_quad(1, 0.25, -0.5, 1.5);
    let result = cut(&target, &cutter, &CutOptions::quadratic());

    let domain = &result.domain_cells[&0];
    assert!(domain.iter().all(|c| c.num_nodes() == 10));
    assert_relative_eq!(physical_volume(domain), 1.0, epsilon = 1.0e-9);

    // The interface is flat: recovery leaves the midpoints where they are.
    for cell in &result.boundary_cells[&0] {
        assert_eq!(cell.num_nodes(), 6);
        for (k, (a, b)) in [(0, 1), (1, 2), (2, 0)].iter().enumerate() {
            let straight = na::center(&cell.physical[*a], &cell.physical[*b]);
            assert_relative_eq!(cell.physical[3 + k], straight, epsilon = 1.0e-7);
        }
        assert!(cell.physical.iter().all(|x| (x.z - 0.25).abs() < 1.0e-7));
    }
    assert_eq!(result.report.missed_points, 0);
}

#[test]
fn both_candidate_searches_agree() {
    let target = unit_cube();
    let cutter = horizontal_quad(3, 0.3, -0.5, 1.5);
    let tree = cut(&target, &cutter, &CutOptions::default());
    let options = CutOptions {
        flags: CutFlags::LINEAR_CANDIDATE_SEARCH,
        ..CutOptions::default()
    };
    let linear = cut(&target, &cutter, &options);
    assert_eq!(tree, linear);
}

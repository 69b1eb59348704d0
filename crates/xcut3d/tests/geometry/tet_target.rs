use super::common::{cut, horizontal_quad, physical_volume};
use approx::assert_relative_eq;
use na::Point3;
use xcut3d::cut::CutOptions;
use xcut3d::mesh::{Discretization, MeshElement};
use xcut3d::shape::ShapeKind;

fn unit_tet() -> Discretization {
    let mut dis = Discretization::new();
    for (i, c) in ShapeKind::Tet4.reference().nodes.iter().enumerate() {
        dis.set_node(i, Point3::from(*c));
    }
    dis.add_element(MeshElement::new(3, ShapeKind::Tet4, (0..4).collect()).unwrap());
    dis
}

#[test]
fn tetrahedron_cut_below_its_apex() {
    let target = unit_tet();
    let cutter = horizontal_quad(5, 0.25, -0.5, 1.5);
    let result = cut(&target, &cutter, &CutOptions::default());

    assert!(result.is_cut(3));
    let domain = &result.domain_cells[&3];
    let boundary = &result.boundary_cells[&3];
    assert_relative_eq!(physical_volume(domain), 1.0 / 6.0, epsilon = 1.0e-9);

    let area: f64 = boundary.iter().map(|c| c.physical_area()).sum();
    assert_relative_eq!(area, 0.28125, epsilon = 1.0e-9);
    for cell in boundary {
        assert_eq!(cell.cutter_id, 5);
        for x in &cell.physical {
            assert_relative_eq!(x.z, 0.25, epsilon = 1.0e-7);
            assert!(x.x + x.y <= 0.75 + 1.0e-7);
        }
    }

    // The part above the cut is the scaled tetrahedron at the apex.
    let above: f64 = domain
        .iter()
        .filter(|c| c.physical.iter().all(|x| x.z >= 0.25 - 1.0e-9))
        .map(|c| c.physical_volume())
        .sum();
    assert_relative_eq!(above, 0.75f64.powi(3) / 6.0, epsilon = 1.0e-9);
}

#[test]
fn quadratic_tetrahedron_cells() {
    let target = unit_tet();
    let cutter = horizontal_quad(5, 0.25, -0.5, 1.5);
    let result = cut(&target, &cutter, &CutOptions::quadratic());

    assert!(result.domain_cells[&3].iter().all(|c| c.num_nodes() == 10));
    assert!(result.boundary_cells[&3].iter().all(|c| c.num_nodes() == 6));
    assert_eq!(result.report.missed_points, 0);
    for cell in &result.boundary_cells[&3] {
        for x in &cell.physical {
            assert_relative_eq!(x.z, 0.25, epsilon = 1.0e-7);
        }
    }
}

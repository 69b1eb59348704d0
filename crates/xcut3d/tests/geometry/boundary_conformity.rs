use super::common::{centroid, cut, is_on_triangle, mapped_cutter, unit_cube};
use na::Point3;
use xcut3d::cut::CutOptions;
use xcut3d::mesh::{Discretization, MeshElement};
use xcut3d::shape::ShapeKind;

/// Faces of a tetrahedron, by corner index.
const TET_FACES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [1, 2, 3], [0, 2, 3]];

#[test]
fn boundary_cells_are_faces_of_domain_cells() {
    let target = unit_cube();
    // A tilted plane crossing four vertical edges of the cube at different heights.
    let cutter = mapped_cutter(ShapeKind::Quad4, 6, |xi, eta| {
        Point3::new(0.5 + xi, 0.5 + eta, 0.45 + 0.2 * xi + 0.1 * eta)
    });
    let result = cut(&target, &cutter, &CutOptions::default());
    let domain = &result.domain_cells[&0];
    let boundary = &result.boundary_cells[&0];
    assert!(!boundary.is_empty());

    for cell in boundary {
        let center = centroid(&cell.local);
        let on_a_face = domain.iter().any(|tet| {
            TET_FACES.iter().any(|f| {
                let face = f.map(|i| tet.local[i]);
                cell.local
                    .iter()
                    .chain(core::iter::once(&center))
                    .all(|p| is_on_triangle(p, &face[0], &face[1], &face[2], 1.0e-9))
            })
        });
        assert!(on_a_face, "boundary cell {:?} is not a face of any domain cell", cell.local);
    }

    let area: f64 = boundary.iter().map(|c| c.physical_area()).sum();
    let n = na::Vector3::<f64>::new(-0.2, -0.1, 1.0);
    // The area of the plane z = 0.45 + 0.2 (x - 0.5) + 0.1 (y - 0.5) over the unit square.
    assert!((area - n.norm()).abs() < 1.0e-7);
}

#[test]
fn two_cutters_share_the_cut() {
    // Two flat triangles splitting the cube along z = 0.5, meeting on a diagonal.
    let corners = [
        Point3::new(-0.5, -0.5, 0.5),
        Point3::new(1.5, -0.5, 0.5),
        Point3::new(1.5, 1.5, 0.5),
        Point3::new(-0.5, 1.5, 0.5),
    ];
    let mut cutter = Discretization::new();
    for (n, x) in corners.iter().enumerate() {
        cutter.set_node(1000 + n, *x);
    }
    for (id, nodes) in [[1000, 1001, 1002], [1000, 1002, 1003]].iter().enumerate() {
        cutter.add_element(MeshElement::new(id, ShapeKind::Tri3, nodes.to_vec()).unwrap());
    }

    let result = cut(&unit_cube(), &cutter, &CutOptions::default());
    let boundary = &result.boundary_cells[&0];
    let area = |id: usize| -> f64 {
        boundary
            .iter()
            .filter(|c| c.cutter_id == id)
            .map(|c| c.physical_area())
            .sum()
    };
    assert!((area(0) - 0.5).abs() < 1.0e-9);
    assert!((area(1) - 0.5).abs() < 1.0e-9);
    let volume: f64 = result.domain_cells[&0].iter().map(|c| c.physical_volume()).sum();
    assert!((volume - 1.0).abs() < 1.0e-9);
}

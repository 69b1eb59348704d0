use super::common::{add_unit_hex, horizontal_quad, mapped_cutter, unit_cube};
use na::Point3;
use xcut3d::cut::{compute_intersection, CutError, CutOptions, ShapeRole};
use xcut3d::mesh::{Discretization, MeshElement};
use xcut3d::shape::ShapeKind;
use xcut3d::transformation::ConvexSplitter;

fn run(target: &Discretization, cutter: &Discretization) -> Result<(), CutError> {
    compute_intersection(target, cutter, &CutOptions::default(), &ConvexSplitter::default())
        .map(|_| ())
}

#[test]
fn volume_cutter_is_rejected() {
    let mut cutter = Discretization::new();
    add_unit_hex(&mut cutter, 2, Point3::new(0.5, 0.5, 0.5));
    assert_eq!(
        run(&unit_cube(), &cutter),
        Err(CutError::UnsupportedShape {
            kind: ShapeKind::Hex8,
            role: ShapeRole::Cutter
        })
    );
}

#[test]
fn surface_target_is_rejected() {
    let target = horizontal_quad(0, 0.0, 0.0, 1.0);
    let cutter = mapped_cutter(ShapeKind::Tri3, 1, |xi, eta| Point3::new(xi, eta, 0.5));
    assert_eq!(
        run(&target, &cutter),
        Err(CutError::UnsupportedShape {
            kind: ShapeKind::Quad4,
            role: ShapeRole::Target
        })
    );
}

#[test]
fn missing_node_positions_are_reported() {
    let cutter = horizontal_quad(0, 0.5, -0.5, 1.5);
    let mut target = Discretization::new();
    target.add_element(MeshElement::new(0, ShapeKind::Hex8, (0..8).collect()).unwrap());
    assert_eq!(run(&target, &cutter), Err(CutError::NodeNotFound(0)));
}

#[test]
fn wrong_node_count_is_rejected_early() {
    assert_eq!(
        MeshElement::new(4, ShapeKind::Tet4, vec![0, 1, 2]),
        Err(CutError::WrongNodeCount {
            element: 4,
            kind: ShapeKind::Tet4,
            found: 3
        })
    );
}

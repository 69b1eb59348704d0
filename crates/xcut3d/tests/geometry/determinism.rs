use super::common::{cut, horizontal_quad, mapped_cutter, unit_cube};
use na::Point3;
use oorandom::Rand64;
use xcut3d::cut::{
    CurveSurfaceSolver, CutOptions, InterfacePoint, IntersectionCache, IntersectionKey,
};
use xcut3d::query::ElementGeometry;
use xcut3d::shape::ShapeKind;

#[test]
fn identical_runs_give_identical_cells() {
    let target = unit_cube();
    let cutter = mapped_cutter(ShapeKind::Quad4, 4, |xi, eta| {
        Point3::new(0.5 + xi, 0.5 + eta, 0.4 + 0.1 * xi + 0.05 * eta)
    });
    let first = cut(&target, &cutter, &CutOptions::default());
    let second = cut(&target, &cutter, &CutOptions::default());
    assert_eq!(first, second);

    let first = cut(&target, &cutter, &CutOptions::quadratic());
    let second = cut(&target, &cutter, &CutOptions::quadratic());
    assert_eq!(first, second);
}

#[test]
fn cached_roots_match_a_fresh_search() {
    let cutter = horizontal_quad(0, 0.5, -0.5, 1.5);
    let element = &cutter.elements()[0];
    let surface = ElementGeometry::new(element.kind, cutter.element_positions(element).unwrap());
    let line = ElementGeometry::new(
        ShapeKind::Line2,
        vec![Point3::new(0.3, 0.2, 0.0), Point3::new(0.3, 0.2, 1.0)],
    );

    let fresh = CurveSurfaceSolver::new(&surface, &line, 30).solve();
    let mut cache = IntersectionCache::new();
    let key = IntersectionKey::cutter_surface(element.id, 1, 2);
    let stored = cache.insert(key, fresh.clone()).clone();
    let again = cache.get(&key).unwrap();

    assert_eq!(stored.roots, fresh);
    assert_eq!(again.roots, fresh);
    assert_eq!(again.intersects, !fresh.is_empty());
    assert!(again.intersects);
}

#[test]
fn classification_is_idempotent_on_random_boundary_points() {
    let mut rng = Rand64::new(7);
    for kind in [ShapeKind::Hex8, ShapeKind::Tet4] {
        for _ in 0..200 {
            let mut xi = Point3::new(rng.rand_float(), rng.rand_float(), rng.rand_float());
            if kind == ShapeKind::Hex8 {
                xi = xi.map(|c| 2.0 * c - 1.0);
                // Push some coordinates onto the faces.
                for k in 0..3 {
                    if rng.rand_range(0..3) == 0 {
                        xi[k] = if rng.rand_range(0..2) == 0 { -1.0 } else { 1.0 };
                    }
                }
            } else {
                let sum = xi.x + xi.y + xi.z;
                if sum > 1.0 {
                    xi /= sum;
                }
                if rng.rand_range(0..3) == 0 {
                    xi.z = 0.0;
                }
            }

            let first = InterfacePoint::classify(kind, &xi).unwrap();
            let second = InterfacePoint::classify(kind, &first.coord).unwrap();
            assert_eq!(first, second);
        }
    }
}

use na::Point3;
use xcut3d::cut::{compute_intersection, CutOptions, CutResult, DomainIntCell};
use xcut3d::mesh::{Discretization, MeshElement};
use xcut3d::shape::ShapeKind;
use xcut3d::transformation::ConvexSplitter;

/// Adds an axis-aligned hexahedron with its lowest corner at `origin` and unit
/// edges.
pub fn add_unit_hex(dis: &mut Discretization, id: usize, origin: Point3<f64>) {
    let first = id * 8;
    for (i, c) in ShapeKind::Hex8.reference().nodes.iter().enumerate() {
        dis.set_node(
            first + i,
            origin + na::Vector3::new(0.5 * (c[0] + 1.0), 0.5 * (c[1] + 1.0), 0.5 * (c[2] + 1.0)),
        );
    }
    dis.add_element(MeshElement::new(id, ShapeKind::Hex8, (first..first + 8).collect()).unwrap());
}

/// The unit cube `[0, 1]^3` as a single hexahedron with id 0.
pub fn unit_cube() -> Discretization {
    let mut dis = Discretization::new();
    add_unit_hex(&mut dis, 0, Point3::origin());
    dis
}

/// A cutter made of one element of shape `kind` whose node `i` is at
/// `f(reference coordinates of node i)`.
pub fn mapped_cutter(kind: ShapeKind, id: usize, f: impl Fn(f64, f64) -> Point3<f64>) -> Discretization {
    let mut dis = Discretization::new();
    for (i, c) in kind.reference().nodes.iter().enumerate() {
        dis.set_node(1000 + i, f(c[0], c[1]));
    }
    let nodes = (1000..1000 + kind.num_nodes()).collect();
    dis.add_element(MeshElement::new(id, kind, nodes).unwrap());
    dis
}

/// A flat horizontal quadrilateral at height `z`, spanning `[lo, hi]^2`.
pub fn horizontal_quad(id: usize, z: f64, lo: f64, hi: f64) -> Discretization {
    let half = 0.5 * (hi - lo);
    let center = 0.5 * (hi + lo);
    mapped_cutter(ShapeKind::Quad4, id, |xi, eta| {
        Point3::new(center + half * xi, center + half * eta, z)
    })
}

pub fn cut(target: &Discretization, cutter: &Discretization, options: &CutOptions) -> CutResult {
    compute_intersection(target, cutter, options, &ConvexSplitter::default()).unwrap()
}

pub fn physical_volume(cells: &[DomainIntCell]) -> f64 {
    cells.iter().map(|c| c.physical_volume()).sum()
}

pub fn centroid(pts: &[Point3<f64>]) -> Point3<f64> {
    pts.iter().fold(Point3::origin(), |acc, p| acc + p.coords) / pts.len() as f64
}

/// Is `p` on the triangle `abc`, up to `tol`?
pub fn is_on_triangle(p: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>, tol: f64) -> bool {
    let n = (b - a).cross(&(c - a));
    let area2 = n.norm();
    if area2 <= tol {
        return false;
    }
    let n = n / area2;
    if n.dot(&(p - a)).abs() > tol {
        return false;
    }
    let edges = [(a, b), (b, c), (c, a)];
    edges
        .iter()
        .all(|(u, v)| (*v - *u).cross(&(p - *u)).dot(&n) >= -tol)
}

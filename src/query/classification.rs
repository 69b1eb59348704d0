use crate::math::{Point, Real, Vector};
use crate::shape::ShapeKind;
use smallvec::SmallVec;

/// Is the element-local point `xi` inside the parameter domain of `kind`, up to `tol`?
pub fn is_within_limits(kind: ShapeKind, xi: &Point<Real>, tol: Real) -> bool {
    let dim = kind.dim();
    if kind.is_simplex() {
        (0..dim).all(|k| xi[k] >= -tol) && (0..dim).map(|k| xi[k]).sum::<Real>() <= 1.0 + tol
    } else {
        (0..dim).all(|k| xi[k].abs() <= 1.0 + tol)
    }
}

/// The plane `n · xi = d` of the reference face `surface`, with `n` scaled to a
/// unit largest component.
fn reference_face_plane(kind: ShapeKind, surface: usize) -> (Vector<Real>, Real) {
    let s = kind.surfaces()[surface];
    let c = |i: usize| Point::from(kind.node_coords(s[i]));
    let n = (c(1) - c(0)).cross(&(c(2) - c(0)));
    let n = n / n.amax();
    (n, n.dot(&c(0).coords))
}

/// The reference faces of the volume shape `kind` containing the local point `xi`.
///
/// The point is assumed to lie inside the element.
pub fn faces_containing(kind: ShapeKind, xi: &Point<Real>, tol: Real) -> SmallVec<[usize; 3]> {
    (0..kind.num_surfaces())
        .filter(|s| {
            let (n, d) = reference_face_plane(kind, *s);
            (n.dot(&xi.coords) - d).abs() <= tol
        })
        .collect()
}

/// Moves `xi` exactly onto the reference planes of the given faces.
///
/// Axis-aligned faces have their fixed coordinate set. A face that is not
/// axis-aligned (the slanted face of a tetrahedron) is left as is.
pub fn snap_to_faces(kind: ShapeKind, xi: &Point<Real>, faces: &[usize]) -> Point<Real> {
    let mut result = *xi;
    for s in faces {
        let (n, d) = reference_face_plane(kind, *s);
        let axes: SmallVec<[usize; 3]> = (0..3).filter(|k| n[*k] != 0.0).collect();
        if axes.len() == 1 {
            let k = axes[0];
            result[k] = d / n[k];
        }
    }
    result
}

/// The line shared by the two faces `s1` and `s2` of `kind`, if they are adjacent.
pub fn common_line(kind: ShapeKind, s1: usize, s2: usize) -> Option<usize> {
    let a = kind.surfaces()[s1];
    let b = kind.surfaces()[s2];
    kind.lines()
        .iter()
        .position(|l| a.contains(&l[0]) && a.contains(&l[1]) && b.contains(&l[0]) && b.contains(&l[1]))
}

/// The corner node shared by all the given faces of `kind`.
pub fn common_node(kind: ShapeKind, faces: &[usize]) -> Option<usize> {
    (0..kind.num_corners()).find(|node| {
        faces
            .iter()
            .all(|s| kind.surfaces()[*s].contains(node))
    })
}

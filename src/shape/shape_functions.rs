//! Shape functions and their first derivatives for every [`ShapeKind`].

use crate::math::Real;
use crate::shape::{ShapeKind, MAX_NODES};
use arrayvec::ArrayVec;

/// Linear 1D Lagrange polynomial attached to the node at `c` (`-1` or `1`).
#[inline]
fn linear_1d(c: Real, x: Real) -> (Real, Real) {
    (0.5 * (1.0 + c * x), 0.5 * c)
}

/// Quadratic 1D Lagrange polynomial attached to the node at `c` (`-1`, `0` or `1`).
#[inline]
fn quadratic_1d(c: Real, x: Real) -> (Real, Real) {
    if c < -0.5 {
        (0.5 * x * (x - 1.0), x - 0.5)
    } else if c > 0.5 {
        (0.5 * x * (x + 1.0), x + 0.5)
    } else {
        (1.0 - x * x, -2.0 * x)
    }
}

/// Tensor-product Lagrange basis (line2/3, quad4/9, hex8/27).
fn tensor_product(
    kind: ShapeKind,
    xi: &[Real; 3],
    quadratic: bool,
    values: &mut ArrayVec<Real, MAX_NODES>,
    derivs: &mut ArrayVec<[Real; 3], MAX_NODES>,
) {
    let dim = kind.dim();
    for node in kind.reference().nodes {
        let mut f = [1.0; 3];
        let mut df = [0.0; 3];
        for k in 0..dim {
            let (v, d) = if quadratic {
                quadratic_1d(node[k], xi[k])
            } else {
                linear_1d(node[k], xi[k])
            };
            f[k] = v;
            df[k] = d;
        }
        values.push(f[0] * f[1] * f[2]);
        derivs.push([df[0] * f[1] * f[2], f[0] * df[1] * f[2], f[0] * f[1] * df[2]]);
    }
}

/// Serendipity basis (quad8, hex20).
fn serendipity(
    kind: ShapeKind,
    xi: &[Real; 3],
    values: &mut ArrayVec<Real, MAX_NODES>,
    derivs: &mut ArrayVec<[Real; 3], MAX_NODES>,
) {
    let dim = kind.dim();
    // Scales: 1/4 and 1/2 in 2D, 1/8 and 1/4 in 3D.
    let corner_scale = if dim == 2 { 0.25 } else { 0.125 };
    let mid_scale = 2.0 * corner_scale;
    let shift = (dim - 1) as Real;

    for (i, node) in kind.reference().nodes.iter().enumerate() {
        let mut d = [0.0; 3];
        if i < kind.num_corners() {
            let lin: Real = (0..dim).map(|k| 1.0 + node[k] * xi[k]).product();
            let sum: Real = (0..dim).map(|k| node[k] * xi[k]).sum();
            values.push(corner_scale * lin * (sum - shift));
            for k in 0..dim {
                let others: Real = (0..dim)
                    .filter(|j| *j != k)
                    .map(|j| 1.0 + node[j] * xi[j])
                    .product();
                d[k] = corner_scale * node[k] * others * (2.0 * node[k] * xi[k] + sum
                    - node[k] * xi[k]
                    - shift
                    + 1.0);
            }
        } else {
            // Exactly one reference coordinate of a mid node is zero.
            let zero = (0..dim).position(|k| node[k] == 0.0).unwrap_or(0);
            let bubble = 1.0 - xi[zero] * xi[zero];
            let others: Real = (0..dim)
                .filter(|j| *j != zero)
                .map(|j| 1.0 + node[j] * xi[j])
                .product();
            values.push(mid_scale * bubble * others);
            for k in 0..dim {
                d[k] = if k == zero {
                    -2.0 * mid_scale * xi[zero] * others
                } else {
                    let rest: Real = (0..dim)
                        .filter(|j| *j != zero && *j != k)
                        .map(|j| 1.0 + node[j] * xi[j])
                        .product();
                    mid_scale * bubble * node[k] * rest
                };
            }
        }
        derivs.push(d);
    }
}

/// Simplex basis (tri3/6, tet4/10) in barycentric form.
fn simplex(
    kind: ShapeKind,
    xi: &[Real; 3],
    values: &mut ArrayVec<Real, MAX_NODES>,
    derivs: &mut ArrayVec<[Real; 3], MAX_NODES>,
) {
    let dim = kind.dim();
    let mut bary = [0.0; 4];
    let mut dbary = [[0.0; 3]; 4];
    bary[0] = 1.0 - (0..dim).map(|k| xi[k]).sum::<Real>();
    for k in 0..dim {
        bary[k + 1] = xi[k];
        dbary[0][k] = -1.0;
        dbary[k + 1][k] = 1.0;
    }

    let quadratic = kind.is_quadratic();
    for c in 0..kind.num_corners() {
        if quadratic {
            values.push(bary[c] * (2.0 * bary[c] - 1.0));
            let s = 4.0 * bary[c] - 1.0;
            derivs.push([s * dbary[c][0], s * dbary[c][1], s * dbary[c][2]]);
        } else {
            values.push(bary[c]);
            derivs.push(dbary[c]);
        }
    }

    if quadratic {
        for line in kind.lines() {
            let (a, b) = (line[0], line[1]);
            values.push(4.0 * bary[a] * bary[b]);
            let mut d = [0.0; 3];
            for k in 0..3 {
                d[k] = 4.0 * (dbary[a][k] * bary[b] + bary[a] * dbary[b][k]);
            }
            derivs.push(d);
        }
    }
}

fn evaluate(
    kind: ShapeKind,
    xi: &[Real; 3],
) -> (ArrayVec<Real, MAX_NODES>, ArrayVec<[Real; 3], MAX_NODES>) {
    let mut values = ArrayVec::new();
    let mut derivs = ArrayVec::new();

    match kind {
        ShapeKind::Line2 | ShapeKind::Quad4 | ShapeKind::Hex8 => {
            tensor_product(kind, xi, false, &mut values, &mut derivs)
        }
        ShapeKind::Line3 | ShapeKind::Quad9 | ShapeKind::Hex27 => {
            tensor_product(kind, xi, true, &mut values, &mut derivs)
        }
        ShapeKind::Quad8 | ShapeKind::Hex20 => serendipity(kind, xi, &mut values, &mut derivs),
        ShapeKind::Tri3 | ShapeKind::Tri6 | ShapeKind::Tet4 | ShapeKind::Tet10 => {
            simplex(kind, xi, &mut values, &mut derivs)
        }
    }

    (values, derivs)
}

/// Values of every shape function of `kind` at the parameter-space point `xi`.
///
/// Components of `xi` beyond the shape's dimension are ignored.
pub fn shape_values(kind: ShapeKind, xi: &[Real; 3]) -> ArrayVec<Real, MAX_NODES> {
    evaluate(kind, xi).0
}

/// First derivatives `dN_i/dxi_k` of every shape function of `kind` at `xi`.
///
/// Derivatives with respect to components beyond the shape's dimension are zero.
pub fn shape_derivatives(kind: ShapeKind, xi: &[Real; 3]) -> ArrayVec<[Real; 3], MAX_NODES> {
    evaluate(kind, xi).1
}

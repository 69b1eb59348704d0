use crate::bounding_volume::Aabb;
use crate::math::{Matrix, Point, Real, Vector};
use crate::query::{is_within_limits, solve_linearized, GeometryType};
use crate::shape::{shape_derivatives, shape_values, ShapeKind};
use crate::utils::{TOL14, TOL7};
use alloc::vec::Vec;
use na::{Matrix2, Vector2};

const MAX_MAPPING_ITERATIONS: usize = 50;

/// The projection of a physical point onto a surface or line element.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct LocalProjection {
    /// Element-local coordinates of the projection (unused components are zero).
    pub local: Point<Real>,
    /// The projected point, in physical space.
    pub point: Point<Real>,
    /// Distance between the query point and its projection.
    pub distance: Real,
}

/// An element shape together with the physical positions of its nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementGeometry {
    kind: ShapeKind,
    nodes: Vec<Point<Real>>,
}

impl ElementGeometry {
    /// Creates the geometry of an element of shape `kind` with the given node positions.
    ///
    /// The positions must be given in the reference node order of `kind`.
    pub fn new(kind: ShapeKind, nodes: Vec<Point<Real>>) -> Self {
        debug_assert_eq!(nodes.len(), kind.num_nodes());
        Self { kind, nodes }
    }

    /// The reference shape.
    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// The node positions.
    #[inline]
    pub fn nodes(&self) -> &[Point<Real>] {
        &self.nodes
    }

    /// The tight AABB of the nodes.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(&self.nodes)
    }

    /// A characteristic length, used to make tolerances relative.
    pub fn length_scale(&self) -> Real {
        self.aabb().diagonal().max(TOL14)
    }

    /// The center of the parameter space.
    pub fn local_center(&self) -> Point<Real> {
        match self.kind {
            ShapeKind::Tri3 | ShapeKind::Tri6 => Point::new(1.0 / 3.0, 1.0 / 3.0, 0.0),
            ShapeKind::Tet4 | ShapeKind::Tet10 => Point::new(0.25, 0.25, 0.25),
            _ => Point::origin(),
        }
    }

    /// Maps the element-local point `xi` to physical space.
    pub fn point_at(&self, xi: &Point<Real>) -> Point<Real> {
        let n = shape_values(self.kind, &xi.coords.into());
        self.nodes
            .iter()
            .zip(n.iter())
            .fold(Point::origin(), |acc, (x, w)| acc + x.coords * *w)
    }

    /// The tangent vectors `dx/dxi_k` as the columns of a matrix.
    ///
    /// Columns beyond the element dimension are zero.
    pub fn tangents(&self, xi: &Point<Real>) -> Matrix<Real> {
        let d = shape_derivatives(self.kind, &xi.coords.into());
        let mut result = Matrix::zeros();
        for (x, dn) in self.nodes.iter().zip(d.iter()) {
            for k in 0..self.kind.dim() {
                let mut col = result.column_mut(k);
                col += x.coords * dn[k];
            }
        }
        result
    }

    /// Unit normal of a surface element at `xi`.
    pub fn normal(&self, xi: &Point<Real>) -> Option<Vector<Real>> {
        let t = self.tangents(xi);
        t.column(0).cross(&t.column(1)).try_normalize(TOL14)
    }

    /// Maps the physical point `x` to the local frame of this volume element.
    ///
    /// Returns `None` if the Newton iteration does not converge. The result is not
    /// restricted to the element: check it with [`is_within_limits`].
    pub fn to_local(&self, x: &Point<Real>) -> Option<Point<Real>> {
        debug_assert_eq!(self.kind.dim(), 3);
        let scale = self.length_scale();
        let mut xi = self.local_center();

        for _ in 0..MAX_MAPPING_ITERATIONS {
            let residual = x - self.point_at(&xi);
            if residual.norm() <= TOL14 * scale {
                return Some(xi);
            }

            let step = solve_linearized(&self.tangents(&xi), &residual)?;
            if step.is_singular() {
                return None;
            }
            xi += *step.increment();

            if step.increment().norm() <= TOL14 {
                return Some(xi);
            }
        }

        let residual = x - self.point_at(&xi);
        (residual.norm() <= TOL7 * scale).then_some(xi)
    }

    /// Projects `x` orthogonally on this surface or line element.
    ///
    /// With `clamp` set, the local coordinates are kept inside the parameter
    /// domain so the result is the nearest point of the element. Otherwise the
    /// projection onto the element's natural extension is returned.
    pub fn project_point(&self, x: &Point<Real>, clamp: bool) -> LocalProjection {
        let dim = self.kind.dim();
        debug_assert!(dim == 1 || dim == 2);
        let mut xi = self.local_center();

        for _ in 0..MAX_MAPPING_ITERATIONS {
            let residual = x - self.point_at(&xi);
            let t = self.tangents(&xi);

            let step = if dim == 1 {
                let t0 = t.column(0);
                let denom = t0.norm_squared();
                if denom <= TOL14 {
                    break;
                }
                Vector::new(t0.dot(&residual) / denom, 0.0, 0.0)
            } else {
                let (t0, t1) = (t.column(0), t.column(1));
                let a = Matrix2::new(t0.dot(&t0), t0.dot(&t1), t1.dot(&t0), t1.dot(&t1));
                let b = Vector2::new(t0.dot(&residual), t1.dot(&residual));
                match a.try_inverse() {
                    Some(inv) => {
                        let s = inv * b;
                        Vector::new(s.x, s.y, 0.0)
                    }
                    None => break,
                }
            };

            let previous = xi;
            xi += step;
            if clamp {
                xi = self.clamp_local(&xi);
            }
            if (xi - previous).norm() <= TOL14 {
                break;
            }
        }

        let point = self.point_at(&xi);
        LocalProjection {
            local: xi,
            point,
            distance: na::distance(x, &point),
        }
    }

    /// Moves `xi` to the closest point of the parameter domain.
    pub fn clamp_local(&self, xi: &Point<Real>) -> Point<Real> {
        let dim = self.kind.dim();
        let mut result = *xi;
        if self.kind.is_simplex() {
            for k in 0..dim {
                result[k] = result[k].max(0.0);
            }
            let sum: Real = (0..dim).map(|k| result[k]).sum();
            if sum > 1.0 {
                for k in 0..dim {
                    result[k] /= sum;
                }
            }
        } else {
            for k in 0..dim {
                result[k] = result[k].clamp(-1.0, 1.0);
            }
        }
        result
    }

    /// Is `xi` inside the parameter domain, up to `tol`?
    pub fn contains_local(&self, xi: &Point<Real>, tol: Real) -> bool {
        is_within_limits(self.kind, xi, tol)
    }

    /// Classifies the geometry of this element.
    pub fn geometry_type(&self) -> GeometryType {
        let tol = TOL7 * self.length_scale();

        if self.kind.is_quadratic() {
            // Higher-order nodes that sit where the corners alone would put them
            // do not bend the element.
            let linear = self.linear_kind();
            for (i, node) in self.nodes.iter().enumerate().skip(self.kind.num_corners()) {
                let xi = Point::from(self.kind.node_coords(i));
                let n = shape_values(linear, &xi.coords.into());
                let straight = self.nodes[..linear.num_nodes()]
                    .iter()
                    .zip(n.iter())
                    .fold(Point::origin(), |acc, (x, w)| acc + x.coords * *w);
                if na::distance(node, &straight) > tol {
                    return GeometryType::HigherOrder;
                }
            }
        }

        let axis_aligned = self.kind.lines().iter().all(|line| {
            let d = self.nodes[line[1]] - self.nodes[line[0]];
            d.iter().filter(|c| c.abs() > tol).count() <= 1
        });

        if axis_aligned {
            GeometryType::Cartesian
        } else {
            GeometryType::Linear
        }
    }

    /// Is this surface element flat (all nodes on one plane, no curvature)?
    pub fn is_planar(&self) -> bool {
        if self.geometry_type() == GeometryType::HigherOrder {
            return false;
        }
        if self.kind.num_corners() <= 3 {
            return true;
        }

        let c = &self.nodes;
        let n = match (c[1] - c[0]).cross(&(c[2] - c[0])).try_normalize(TOL14) {
            Some(n) => n,
            None => return false,
        };
        let tol = TOL7 * self.length_scale();
        c[..self.kind.num_corners()]
            .iter()
            .all(|p| n.dot(&(p - c[0])).abs() <= tol)
    }

    /// The linear shape sharing the corners of this element's shape.
    pub fn linear_kind(&self) -> ShapeKind {
        match self.kind {
            ShapeKind::Line3 => ShapeKind::Line2,
            ShapeKind::Tri6 => ShapeKind::Tri3,
            ShapeKind::Quad8 | ShapeKind::Quad9 => ShapeKind::Quad4,
            ShapeKind::Tet10 => ShapeKind::Tet4,
            ShapeKind::Hex20 | ShapeKind::Hex27 => ShapeKind::Hex8,
            other => other,
        }
    }
}

//! Roots of "a point of a line element lies on a surface element".

use crate::math::{Point, Real, Vector};
use crate::query::{solve_linearized, ElementGeometry, GeometryType};
use crate::utils::{compare_points, TOL14, TOL7};
use alloc::vec::Vec;

/// More singular linearizations than this abort a Newton iteration.
const MAX_SINGULAR_STEPS: usize = 5;
/// Safety cap on the roots of one line/surface pair.
///
/// Only reached when the line lies inside a curved surface, where the roots
/// are not isolated.
const MAX_ROOTS: usize = 64;

/// A search box in (surface, surface, line) parameter space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchBox {
    /// Lower bounds.
    pub lo: Point<Real>,
    /// Upper bounds.
    pub up: Point<Real>,
}

impl SearchBox {
    /// The full parameter domain of a line/surface pair.
    pub fn full(surface: &ElementGeometry) -> Self {
        if surface.kind().is_simplex() {
            Self {
                lo: Point::new(0.0, 0.0, -1.0),
                up: Point::new(1.0, 1.0, 1.0),
            }
        } else {
            Self {
                lo: Point::new(-1.0, -1.0, -1.0),
                up: Point::new(1.0, 1.0, 1.0),
            }
        }
    }

    /// The center of the box.
    pub fn midpoint(&self) -> Point<Real> {
        na::center(&self.lo, &self.up)
    }

    /// Has the box shrunk to a single point?
    pub fn is_collapsed(&self) -> bool {
        compare_points(&self.lo, &self.up, TOL7)
    }

    /// Does the box contain `x`, up to [`TOL7`]?
    pub fn contains(&self, x: &Point<Real>) -> bool {
        (0..3).all(|k| x[k] >= self.lo[k] - TOL7 && x[k] <= self.up[k] + TOL7)
    }

    /// The eight boxes obtained by splitting each surface parameter and the line
    /// parameter at `root`.
    pub fn split_at(&self, root: &Point<Real>) -> [SearchBox; 8] {
        let mut result = [*self; 8];
        for (i, b) in result.iter_mut().enumerate() {
            for k in 0..3 {
                if (i >> k) & 1 == 0 {
                    b.up[k] = root[k];
                } else {
                    b.lo[k] = root[k];
                }
            }
        }
        result
    }
}

/// Finds every intersection of a line element with a surface element.
pub struct CurveSurfaceSolver<'a> {
    surface: &'a ElementGeometry,
    line: &'a ElementGeometry,
    max_iterations: usize,
    scale: Real,
}

impl<'a> CurveSurfaceSolver<'a> {
    /// A solver for the pair `surface`/`line`.
    pub fn new(surface: &'a ElementGeometry, line: &'a ElementGeometry, max_iterations: usize) -> Self {
        let scale = surface.length_scale().max(line.length_scale());
        Self {
            surface,
            line,
            max_iterations,
            scale,
        }
    }

    /// Is the closed-form plane intersection exact for this pair?
    ///
    /// A flat surface and a straight line meet at most once.
    pub fn use_fast_path(&self) -> bool {
        self.surface.is_planar() && self.line.geometry_type() != GeometryType::HigherOrder
    }

    /// All the roots, as (surface parameter, surface parameter, line parameter).
    ///
    /// Roots are pairwise distinct within [`TOL7`] and ordered by discovery.
    pub fn solve(&self) -> Vec<Point<Real>> {
        let margin = TOL7 * self.scale;
        if !self
            .surface
            .aabb()
            .loosened(margin)
            .intersects(&self.line.aabb().loosened(margin))
        {
            return Vec::new();
        }

        if self.use_fast_path() {
            self.solve_planar().into_iter().collect()
        } else {
            self.solve_recursive()
        }
    }

    /// Closed-form intersection of a straight line with a flat surface.
    pub fn solve_planar(&self) -> Option<Point<Real>> {
        let center = self.surface.local_center();
        let normal = self.surface.normal(&center)?;
        let origin = self.surface.point_at(&center);

        let p0 = self.line.point_at(&Point::new(-1.0, 0.0, 0.0));
        let p1 = self.line.point_at(&Point::new(1.0, 0.0, 0.0));
        let dir = p1 - p0;

        let d0 = normal.dot(&(p0 - origin));
        let d1 = normal.dot(&(p1 - origin));
        let tol = TOL7 * self.scale;
        // Both end points strictly on the same side.
        if (d0 > tol && d1 > tol) || (d0 < -tol && d1 < -tol) {
            return None;
        }

        let denom = normal.dot(&dir);
        if denom.abs() <= TOL14 * dir.norm() {
            return None;
        }

        let s = (-d0 / denom).clamp(0.0, 1.0);
        let hit = p0 + dir * s;
        let proj = self.surface.project_point(&hit, false);
        if !self.surface.contains_local(&proj.local, TOL7) || proj.distance > tol {
            return None;
        }

        let local = self.surface.clamp_local(&proj.local);
        Some(Point::new(local.x, local.y, 2.0 * s - 1.0))
    }

    /// Newton iteration on `S(xi, eta) - L(t) = 0` starting at `start`.
    ///
    /// Returns the root only if it converges inside `bounds` (up to [`TOL7`]) and
    /// inside the parameter domains of both elements.
    pub fn newton(&self, start: &Point<Real>, bounds: &SearchBox) -> Option<Point<Real>> {
        let mut x = *start;
        let mut singular = 0;

        for _ in 0..self.max_iterations {
            let residual = self.residual(&x);
            if residual.norm() <= TOL14 * self.scale {
                break;
            }

            let step = solve_linearized(&self.jacobian(&x), &-residual)?;
            if step.is_singular() {
                singular += 1;
                if singular > MAX_SINGULAR_STEPS {
                    return None;
                }
            }

            x += *step.increment();
            if step.increment().norm() <= TOL14 {
                break;
            }
        }

        if self.residual(&x).norm() > TOL7 * self.scale || !bounds.contains(&x) {
            return None;
        }

        let surface_local = Point::new(x.x, x.y, 0.0);
        let line_local = Point::new(x.z, 0.0, 0.0);
        if !self.surface.contains_local(&surface_local, TOL7)
            || !self.line.contains_local(&line_local, TOL7)
        {
            return None;
        }

        let surface_local = self.surface.clamp_local(&surface_local);
        Some(Point::new(
            surface_local.x,
            surface_local.y,
            x.z.clamp(-1.0, 1.0),
        ))
    }

    /// Finds every root by Newton iterations on a worklist of shrinking boxes.
    ///
    /// Each new root splits the box it was found in into eight sub-boxes that are
    /// searched in turn. A box is dropped when it collapses to a point or when
    /// its search finds nothing new.
    pub fn solve_recursive(&self) -> Vec<Point<Real>> {
        let mut roots: Vec<Point<Real>> = Vec::new();
        let full = SearchBox::full(self.surface);
        let start = if self.surface.kind().is_simplex() {
            Point::new(0.3, 0.3, 0.0)
        } else {
            full.midpoint()
        };

        // The last flag allows one level of blind subdivision when the first
        // iteration fails, e.g. when started on a fold of the surface.
        let mut stack = alloc::vec![(full, start, true)];
        while let Some((bounds, start, retry)) = stack.pop() {
            let Some(root) = self.newton(&start, &bounds) else {
                if retry {
                    let center = bounds.midpoint();
                    for sub in bounds.split_at(&center).iter().rev() {
                        stack.push((*sub, sub.midpoint(), false));
                    }
                }
                continue;
            };

            if roots.iter().any(|r| compare_points(r, &root, TOL7)) {
                continue;
            }

            roots.push(root);
            if roots.len() >= MAX_ROOTS {
                log::warn!("root search stopped after {} roots", MAX_ROOTS);
                break;
            }

            for sub in bounds.split_at(&root).iter().rev() {
                if !sub.is_collapsed() {
                    stack.push((*sub, sub.midpoint(), false));
                }
            }
        }

        roots
    }

    fn residual(&self, x: &Point<Real>) -> Vector<Real> {
        self.surface.point_at(&Point::new(x.x, x.y, 0.0)) - self.line.point_at(&Point::new(x.z, 0.0, 0.0))
    }

    fn jacobian(&self, x: &Point<Real>) -> crate::math::Matrix<Real> {
        let mut j = self.surface.tangents(&Point::new(x.x, x.y, 0.0));
        let lt = self.line.tangents(&Point::new(x.z, 0.0, 0.0));
        j.set_column(2, &-lt.column(0));
        j
    }
}

use crate::math::{Matrix, Real, Vector};
use crate::utils::TOL12;

/// Outcome of one linearized Newton step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum LinearSolve {
    /// The system was regular and solved by LU decomposition.
    Regular(Vector<Real>),
    /// The system was (nearly) singular and solved in the least-squares sense by SVD.
    Singular(Vector<Real>),
}

impl LinearSolve {
    pub fn increment(&self) -> &Vector<Real> {
        match self {
            LinearSolve::Regular(dx) | LinearSolve::Singular(dx) => dx,
        }
    }

    pub fn is_singular(&self) -> bool {
        matches!(self, LinearSolve::Singular(_))
    }
}

/// Solves `j * dx = rhs`, falling back to a pseudo-inverse when `j` is singular.
///
/// Returns `None` only if even the SVD fails to produce a finite increment.
pub(crate) fn solve_linearized(j: &Matrix<Real>, rhs: &Vector<Real>) -> Option<LinearSolve> {
    let scale = j.amax().max(1.0);
    if j.determinant().abs() > TOL12 * scale * scale * scale {
        if let Some(dx) = j.lu().solve(rhs) {
            if dx.iter().all(|v| v.is_finite()) {
                return Some(LinearSolve::Regular(dx));
            }
        }
    }

    let svd = j.svd(true, true);
    let dx = svd.solve(rhs, TOL12 * scale).ok()?;
    if dx.iter().all(|v| v.is_finite()) {
        Some(LinearSolve::Singular(dx))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_systems_use_the_pseudo_inverse() {
        let j = Matrix::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0);
        let sol = solve_linearized(&j, &Vector::new(1.0, 2.0, 3.0)).unwrap();
        assert!(sol.is_singular());
        assert_relative_eq!(*sol.increment(), Vector::new(1.0, 2.0, 0.0), epsilon = 1.0e-12);

        let sol = solve_linearized(&Matrix::identity(), &Vector::new(1.0, 2.0, 3.0)).unwrap();
        assert!(!sol.is_singular());
    }
}

//! Axis Aligned Bounding Box.

use crate::math::{Point, Real, Vector, DIM};

/// An Axis-Aligned Bounding Box (AABB).
///
/// Used both as the conservative extent of a mesh element and as the envelope
/// stored in the cutter search tree.
///
/// # Invariant
///
/// `mins.x ≤ maxs.x`, `mins.y ≤ maxs.y` and `mins.z ≤ maxs.z`, except for the
/// result of [`Aabb::new_invalid`] which is meant to be grown with
/// [`Aabb::take_point`].
#[derive(Debug, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// The point with the smallest coordinates on each axis.
    pub mins: Point<Real>,
    /// The point with the largest coordinates on each axis.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// Creates a new AABB from its two extreme corners.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with `mins` components set to `Real::MAX` and
    /// `maxs` components set to `-Real::MAX`.
    ///
    /// Growing it with at least one point makes it valid.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::MAX).into(),
            Vector::repeat(-Real::MAX).into(),
        )
    }

    /// Creates the smallest AABB enclosing all the given points.
    pub fn from_points<'a, I>(pts: I) -> Self
    where
        I: IntoIterator<Item = &'a Point<Real>>,
    {
        let mut result = Self::new_invalid();
        for pt in pts {
            result.take_point(*pt);
        }
        result
    }

    /// Is this AABB grown by at least one point?
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..DIM).all(|i| self.mins[i] <= self.maxs[i])
    }

    /// The center of this AABB.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The extents of this AABB along each axis.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// Length of the diagonal of this AABB.
    #[inline]
    pub fn diagonal(&self) -> Real {
        self.extents().norm()
    }

    /// Enlarges this AABB so it also contains the point `pt`.
    pub fn take_point(&mut self, pt: Point<Real>) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// Enlarges this AABB so it also contains `other`.
    #[inline]
    pub fn merge(&mut self, other: &Aabb) {
        self.mins = self.mins.inf(&other.mins);
        self.maxs = self.maxs.sup(&other.maxs);
    }

    /// The smallest AABB containing both `self` and `other`.
    #[inline]
    pub fn merged(&self, other: &Aabb) -> Aabb {
        let mut result = *self;
        result.merge(other);
        result
    }

    /// Enlarges this AABB by `amount` on every side.
    #[inline]
    pub fn loosen(&mut self, amount: Real) {
        assert!(amount >= 0.0, "The loosening margin must be positive.");
        self.mins -= Vector::repeat(amount);
        self.maxs += Vector::repeat(amount);
    }

    /// A copy of this AABB enlarged by `amount` on every side.
    #[inline]
    pub fn loosened(&self, amount: Real) -> Aabb {
        let mut result = *self;
        result.loosen(amount);
        result
    }

    /// Checks whether this AABB intersects `other`. Touching boxes intersect.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.maxs) && na::partial_ge(&self.maxs, &other.mins)
    }

    /// Checks whether the point `point` lies inside this AABB (boundary included).
    #[inline]
    pub fn contains_local_point(&self, point: &Point<Real>) -> bool {
        (0..DIM).all(|i| point[i] >= self.mins[i] && point[i] <= self.maxs[i])
    }
}

impl From<Aabb> for rstar::AABB<[Real; 3]> {
    fn from(aabb: Aabb) -> Self {
        rstar::AABB::from_corners(aabb.mins.into(), aabb.maxs.into())
    }
}

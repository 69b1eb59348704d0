/// How general the geometry of an element is.
///
/// The curve/surface solver uses it to pick the closed-form plane intersection
/// over the iterative root search.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum GeometryType {
    /// Straight edges, each parallel to a coordinate axis.
    Cartesian,
    /// Straight edges, general orientation.
    Linear,
    /// Curved edges or faces.
    HigherOrder,
}

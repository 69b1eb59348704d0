use crate::shape::reference_shape::{ReferenceShape, REFERENCE_SHAPES};
use core::fmt;
use smallvec::SmallVec;

/// The closed set of element shapes understood by the cut pipeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum ShapeKind {
    /// 2-node line.
    Line2 = 0,
    /// 3-node line, the mid node comes last.
    Line3,
    /// 3-node triangle.
    Tri3,
    /// 6-node triangle.
    Tri6,
    /// 4-node quadrilateral.
    Quad4,
    /// 8-node serendipity quadrilateral.
    Quad8,
    /// 9-node Lagrange quadrilateral.
    Quad9,
    /// 4-node tetrahedron.
    Tet4,
    /// 10-node tetrahedron.
    Tet10,
    /// 8-node hexahedron.
    Hex8,
    /// 20-node serendipity hexahedron.
    Hex20,
    /// 27-node Lagrange hexahedron.
    Hex27,
}

impl ShapeKind {
    /// The number of shape kinds.
    pub const COUNT: usize = 12;

    /// The reference record of this shape.
    #[inline]
    pub fn reference(self) -> &'static ReferenceShape {
        &REFERENCE_SHAPES[self as usize]
    }

    /// Total number of nodes.
    #[inline]
    pub fn num_nodes(self) -> usize {
        self.reference().nodes.len()
    }

    /// Number of corner (vertex) nodes.
    #[inline]
    pub fn num_corners(self) -> usize {
        self.reference().num_corners
    }

    /// Dimension of the parameter space.
    #[inline]
    pub fn dim(self) -> usize {
        self.reference().dim
    }

    /// Is this a simplex (line, triangle, tetrahedron) parameterized on `[0, 1]`?
    pub fn is_simplex(self) -> bool {
        matches!(
            self,
            ShapeKind::Tri3 | ShapeKind::Tri6 | ShapeKind::Tet4 | ShapeKind::Tet10
        )
    }

    /// Does this shape carry nodes beyond its corners?
    pub fn is_quadratic(self) -> bool {
        self.num_nodes() > self.num_corners()
    }

    /// The shape of the lines of this element.
    pub fn line_kind(self) -> Option<ShapeKind> {
        self.reference().line_kind
    }

    /// The shape of the surfaces of this element.
    pub fn surface_kind(self) -> Option<ShapeKind> {
        self.reference().surface_kind
    }

    /// Number of lines (edges).
    pub fn num_lines(self) -> usize {
        self.reference().lines.len()
    }

    /// Number of surfaces (faces). A surface element has itself as its only surface.
    pub fn num_surfaces(self) -> usize {
        self.reference().surfaces.len()
    }

    /// Node indices of every line, corners first.
    pub fn lines(self) -> &'static [&'static [usize]] {
        self.reference().lines
    }

    /// Node indices of every surface, corners first.
    pub fn surfaces(self) -> &'static [&'static [usize]] {
        self.reference().surfaces
    }

    /// Reference coordinates of the node `i`.
    pub fn node_coords(self, i: usize) -> [crate::math::Real; 3] {
        self.reference().nodes[i]
    }

    /// The lines containing both corners `a` and `b`.
    pub fn line_with_corners(self, a: usize, b: usize) -> Option<usize> {
        self.lines()
            .iter()
            .position(|l| (l[0] == a && l[1] == b) || (l[0] == b && l[1] == a))
    }

    /// Surfaces containing the given line.
    pub fn surfaces_of_line(self, line: usize) -> SmallVec<[usize; 2]> {
        let l = self.lines()[line];
        self.surfaces()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.contains(&l[0]) && s.contains(&l[1]))
            .map(|(i, _)| i)
            .collect()
    }

    /// Lines attached to the corner node `node`.
    pub fn lines_of_node(self, node: usize) -> SmallVec<[usize; 3]> {
        self.lines()
            .iter()
            .enumerate()
            .filter(|(_, l)| l[0] == node || l[1] == node)
            .map(|(i, _)| i)
            .collect()
    }

    /// Surfaces attached to the corner node `node`.
    pub fn surfaces_of_node(self, node: usize) -> SmallVec<[usize; 3]> {
        self.surfaces()
            .iter()
            .enumerate()
            .filter(|(_, s)| s[..self.surface_corners()].contains(&node))
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of corners of each surface.
    pub fn surface_corners(self) -> usize {
        self.surface_kind().map(|s| s.num_corners()).unwrap_or(0)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ShapeKind::Line2 => "line2",
            ShapeKind::Line3 => "line3",
            ShapeKind::Tri3 => "tri3",
            ShapeKind::Tri6 => "tri6",
            ShapeKind::Quad4 => "quad4",
            ShapeKind::Quad8 => "quad8",
            ShapeKind::Quad9 => "quad9",
            ShapeKind::Tet4 => "tet4",
            ShapeKind::Tet10 => "tet10",
            ShapeKind::Hex8 => "hex8",
            ShapeKind::Hex20 => "hex20",
            ShapeKind::Hex27 => "hex27",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::ShapeKind;

    #[test]
    fn hex8_adjacency() {
        let hex = ShapeKind::Hex8;
        assert_eq!(hex.num_lines(), 12);
        assert_eq!(hex.num_surfaces(), 6);
        // Line 0 joins nodes 0 and 1, shared by the bottom and front faces.
        assert_eq!(hex.surfaces_of_line(0).as_slice(), &[0, 1]);
        assert_eq!(hex.lines_of_node(0).as_slice(), &[0, 3, 4]);
        assert_eq!(hex.surfaces_of_node(6).as_slice(), &[2, 3, 5]);
        assert_eq!(hex.line_with_corners(7, 4), Some(11));
    }

    #[test]
    fn tet4_adjacency() {
        let tet = ShapeKind::Tet4;
        assert_eq!(tet.surfaces_of_line(0).as_slice(), &[0, 3]);
        assert_eq!(tet.surfaces_of_node(3).as_slice(), &[0, 1, 2]);
        assert!(tet.is_simplex());
        assert!(ShapeKind::Tet10.is_quadratic());
    }
}

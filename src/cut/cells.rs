use crate::math::{Point, Real};
use crate::mesh::ElementId;
use alloc::vec::Vec;

/// A tetrahedral integration cell of a cut target element.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct DomainIntCell {
    /// Node coordinates in the local frame of the target element.
    ///
    /// Four corners, followed by the six edge midpoints (edges `0-1`, `1-2`,
    /// `2-0`, `0-3`, `1-3`, `2-3`) for quadratic cells.
    pub local: Vec<Point<Real>>,
    /// The same nodes in physical space.
    pub physical: Vec<Point<Real>>,
}

impl DomainIntCell {
    /// Number of nodes: 4 or 10.
    pub fn num_nodes(&self) -> usize {
        self.local.len()
    }

    /// Volume of the straight tetrahedron spanned by the local corners.
    pub fn local_volume(&self) -> Real {
        tet_volume(&self.local)
    }

    /// Volume of the straight tetrahedron spanned by the physical corners.
    pub fn physical_volume(&self) -> Real {
        tet_volume(&self.physical)
    }
}

/// A triangular integration cell on the interface inside a cut target element.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BoundaryIntCell {
    /// Node coordinates in the local frame of the target element.
    ///
    /// Three corners, followed by the three edge midpoints (edges `0-1`, `1-2`,
    /// `2-0`) for quadratic cells.
    pub local: Vec<Point<Real>>,
    /// The same nodes in the local frame of the cutter element (third
    /// component zero).
    pub cutter_local: Vec<Point<Real>>,
    /// The same nodes in physical space.
    pub physical: Vec<Point<Real>>,
    /// The cutter element this cell lies on.
    pub cutter_id: ElementId,
}

impl BoundaryIntCell {
    /// Number of nodes: 3 or 6.
    pub fn num_nodes(&self) -> usize {
        self.local.len()
    }

    /// Area of the straight triangle spanned by the physical corners.
    pub fn physical_area(&self) -> Real {
        triangle_area(&self.physical)
    }

    /// Area of the straight triangle spanned by the local corners.
    pub fn local_area(&self) -> Real {
        triangle_area(&self.local)
    }
}

pub(crate) fn tet_volume(pts: &[Point<Real>]) -> Real {
    let a = pts[1] - pts[0];
    let b = pts[2] - pts[0];
    let c = pts[3] - pts[0];
    a.cross(&b).dot(&c).abs() / 6.0
}

pub(crate) fn triangle_area(pts: &[Point<Real>]) -> Real {
    (pts[1] - pts[0]).cross(&(pts[2] - pts[0])).norm() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn unit_simplices() {
        let tet = vec![
            Point::origin(),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
        ];
        let cell = DomainIntCell {
            local: tet.clone(),
            physical: tet.iter().map(|p| p * 2.0).collect(),
        };
        assert_relative_eq!(cell.local_volume(), 1.0 / 6.0);
        assert_relative_eq!(cell.physical_volume(), 8.0 / 6.0);

        let tri = BoundaryIntCell {
            local: tet[..3].to_vec(),
            cutter_local: tet[..3].to_vec(),
            physical: tet[1..].to_vec(),
            cutter_id: 0,
        };
        assert_relative_eq!(tri.local_area(), 0.5);
        assert_relative_eq!(tri.physical_area(), (3.0 as Real).sqrt() / 2.0);
    }
}

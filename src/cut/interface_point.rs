use crate::cut::CutError;
use crate::math::{Point, Real};
use crate::query::{common_line, common_node, faces_containing, snap_to_faces};
use crate::shape::ShapeKind;
use crate::utils::TOL7;
use smallvec::SmallVec;

/// Where an interface point lies with respect to the target element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum PointType {
    /// Strictly inside the element.
    Internal,
    /// On exactly one face.
    Surface,
    /// On an edge, i.e. on two faces.
    Line,
    /// On a corner, i.e. on three faces.
    Node,
}

/// A point of the cut, in target-element local coordinates, with its topology.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct InterfacePoint {
    /// Element-local coordinates.
    pub coord: Point<Real>,
    /// The point type.
    pub kind: PointType,
    /// The corner node, for [`PointType::Node`].
    pub node: Option<usize>,
    /// The lines the point lies on: one for a line point, all lines of a node.
    pub lines: SmallVec<[usize; 3]>,
    /// The faces the point lies on.
    pub surfaces: SmallVec<[usize; 3]>,
}

impl InterfacePoint {
    /// The corner `node` of a `target` element.
    pub fn corner(target: ShapeKind, node: usize) -> Self {
        Self {
            coord: Point::from(target.node_coords(node)),
            kind: PointType::Node,
            node: Some(node),
            lines: target.lines_of_node(node),
            surfaces: target.surfaces_of_node(node),
        }
    }

    /// Classifies the local point `coord` against the faces of `target`.
    ///
    /// Points on faces are snapped exactly onto them, so classifying the result
    /// again yields the same point.
    pub fn classify(target: ShapeKind, coord: &Point<Real>) -> Result<Self, CutError> {
        let faces = faces_containing(target, coord, TOL7);
        let inconsistent = CutError::InconsistentClassification {
            kind: target,
            faces: faces.len(),
        };

        match faces.len() {
            0 => Ok(Self {
                coord: *coord,
                kind: PointType::Internal,
                node: None,
                lines: SmallVec::new(),
                surfaces: SmallVec::new(),
            }),
            1 => Ok(Self {
                coord: snap_to_faces(target, coord, &faces),
                kind: PointType::Surface,
                node: None,
                lines: SmallVec::new(),
                surfaces: faces,
            }),
            2 => {
                let line = common_line(target, faces[0], faces[1]).ok_or(inconsistent)?;
                Ok(Self {
                    coord: snap_to_faces(target, coord, &faces),
                    kind: PointType::Line,
                    node: None,
                    lines: SmallVec::from_slice(&[line]),
                    surfaces: faces,
                })
            }
            3 => {
                let node = common_node(target, &faces).ok_or(inconsistent)?;
                Ok(Self::corner(target, node))
            }
            _ => Err(inconsistent),
        }
    }

    /// The point `coord` of the target line `line`, which must not be one of
    /// its end nodes.
    pub fn on_line(target: ShapeKind, line: usize, coord: &Point<Real>) -> Self {
        let surfaces: SmallVec<[usize; 3]> = target.surfaces_of_line(line).iter().copied().collect();
        Self {
            coord: snap_to_faces(target, coord, &surfaces),
            kind: PointType::Line,
            node: None,
            lines: SmallVec::from_slice(&[line]),
            surfaces,
        }
    }

    /// The point `coord` of the target face `face`, within the face or on its
    /// border.
    ///
    /// Classifies like [`InterfacePoint::classify`], except that a point found
    /// slightly off every face is put on `face`.
    pub fn on_face(target: ShapeKind, face: usize, coord: &Point<Real>) -> Result<Self, CutError> {
        let point = Self::classify(target, coord)?;
        if point.kind != PointType::Internal {
            return Ok(point);
        }

        Ok(Self {
            coord: snap_to_faces(target, coord, &[face]),
            kind: PointType::Surface,
            node: None,
            lines: SmallVec::new(),
            surfaces: SmallVec::from_slice(&[face]),
        })
    }

    /// Does this point lie on the boundary of the target element?
    #[inline]
    pub fn is_on_boundary(&self) -> bool {
        self.kind != PointType::Internal
    }

    /// The faces shared by `self` and `other`.
    pub fn common_surfaces(&self, other: &InterfacePoint) -> SmallVec<[usize; 3]> {
        self.surfaces
            .iter()
            .copied()
            .filter(|s| other.surfaces.contains(s))
            .collect()
    }

    /// Do `self` and `other` lie on the same target line?
    pub fn shares_line_with(&self, other: &InterfacePoint) -> bool {
        matches!(self.kind, PointType::Node | PointType::Line)
            && matches!(other.kind, PointType::Node | PointType::Line)
            && self.lines.iter().any(|l| other.lines.contains(l))
    }
}

use crate::math::Real;
use crate::shape::ShapeKind;
use static_assertions::const_assert_eq;

/// The largest node count of any supported shape.
pub const MAX_NODES: usize = 27;

/// Reference-geometry record of one shape kind.
///
/// Lines and surfaces list node indices with the corners first, followed by the
/// higher-order nodes in the order of the sub-element's own numbering.
#[derive(Debug)]
pub struct ReferenceShape {
    /// The shape this record describes.
    pub kind: ShapeKind,
    /// Dimension of the parameter space.
    pub dim: usize,
    /// Number of corner nodes.
    pub num_corners: usize,
    /// Parameter-space coordinates of every node (unused components are zero).
    pub nodes: &'static [[Real; 3]],
    /// Node indices of the lines.
    pub lines: &'static [&'static [usize]],
    /// Node indices of the surfaces.
    pub surfaces: &'static [&'static [usize]],
    /// Shape of the lines.
    pub line_kind: Option<ShapeKind>,
    /// Shape of the surfaces.
    pub surface_kind: Option<ShapeKind>,
}

const LINE_NODES: [[Real; 3]; 3] = [[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]];

const TRI_NODES: [[Real; 3]; 6] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.5, 0.0, 0.0],
    [0.5, 0.5, 0.0],
    [0.0, 0.5, 0.0],
];
const TRI3_LINES: [&[usize]; 3] = [&[0, 1], &[1, 2], &[2, 0]];
const TRI6_LINES: [&[usize]; 3] = [&[0, 1, 3], &[1, 2, 4], &[2, 0, 5]];

const QUAD_NODES: [[Real; 3]; 9] = [
    [-1.0, -1.0, 0.0],
    [1.0, -1.0, 0.0],
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 0.0, 0.0],
];
const QUAD4_LINES: [&[usize]; 4] = [&[0, 1], &[1, 2], &[2, 3], &[3, 0]];
const QUAD8_LINES: [&[usize]; 4] = [&[0, 1, 4], &[1, 2, 5], &[2, 3, 6], &[3, 0, 7]];

const TET_NODES: [[Real; 3]; 10] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.5, 0.0, 0.0],
    [0.5, 0.5, 0.0],
    [0.0, 0.5, 0.0],
    [0.0, 0.0, 0.5],
    [0.5, 0.0, 0.5],
    [0.0, 0.5, 0.5],
];
const TET4_LINES: [&[usize]; 6] = [&[0, 1], &[1, 2], &[2, 0], &[0, 3], &[1, 3], &[2, 3]];
const TET10_LINES: [&[usize]; 6] = [
    &[0, 1, 4],
    &[1, 2, 5],
    &[2, 0, 6],
    &[0, 3, 7],
    &[1, 3, 8],
    &[2, 3, 9],
];
// Outward oriented: eta = 0, xi + eta + zeta = 1, xi = 0, zeta = 0.
const TET4_SURFACES: [&[usize]; 4] = [&[0, 1, 3], &[1, 2, 3], &[0, 3, 2], &[0, 2, 1]];
const TET10_SURFACES: [&[usize]; 4] = [
    &[0, 1, 3, 4, 8, 7],
    &[1, 2, 3, 5, 9, 8],
    &[0, 3, 2, 7, 9, 6],
    &[0, 2, 1, 6, 5, 4],
];

const HEX_NODES: [[Real; 3]; 27] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [0.0, -1.0, -1.0],
    [1.0, 0.0, -1.0],
    [0.0, 1.0, -1.0],
    [-1.0, 0.0, -1.0],
    [-1.0, -1.0, 0.0],
    [1.0, -1.0, 0.0],
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [0.0, -1.0, 1.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [-1.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
    [0.0, -1.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, 0.0],
];
const HEX8_LINES: [&[usize]; 12] = [
    &[0, 1],
    &[1, 2],
    &[2, 3],
    &[0, 3],
    &[0, 4],
    &[1, 5],
    &[2, 6],
    &[3, 7],
    &[4, 5],
    &[5, 6],
    &[6, 7],
    &[4, 7],
];
const HEX20_LINES: [&[usize]; 12] = [
    &[0, 1, 8],
    &[1, 2, 9],
    &[2, 3, 10],
    &[0, 3, 11],
    &[0, 4, 12],
    &[1, 5, 13],
    &[2, 6, 14],
    &[3, 7, 15],
    &[4, 5, 16],
    &[5, 6, 17],
    &[6, 7, 18],
    &[4, 7, 19],
];
// Outward oriented: zeta = -1, eta = -1, xi = 1, eta = 1, xi = -1, zeta = 1.
const HEX8_SURFACES: [&[usize]; 6] = [
    &[0, 3, 2, 1],
    &[0, 1, 5, 4],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[0, 4, 7, 3],
    &[4, 5, 6, 7],
];
const HEX20_SURFACES: [&[usize]; 6] = [
    &[0, 3, 2, 1, 11, 10, 9, 8],
    &[0, 1, 5, 4, 8, 13, 16, 12],
    &[1, 2, 6, 5, 9, 14, 17, 13],
    &[2, 3, 7, 6, 10, 15, 18, 14],
    &[0, 4, 7, 3, 12, 19, 15, 11],
    &[4, 5, 6, 7, 16, 17, 18, 19],
];
const HEX27_SURFACES: [&[usize]; 6] = [
    &[0, 3, 2, 1, 11, 10, 9, 8, 20],
    &[0, 1, 5, 4, 8, 13, 16, 12, 21],
    &[1, 2, 6, 5, 9, 14, 17, 13, 22],
    &[2, 3, 7, 6, 10, 15, 18, 14, 23],
    &[0, 4, 7, 3, 12, 19, 15, 11, 24],
    &[4, 5, 6, 7, 16, 17, 18, 19, 25],
];

const_assert_eq!(HEX8_LINES.len(), 12);
const_assert_eq!(HEX8_SURFACES.len(), 6);
const_assert_eq!(TET4_SURFACES.len(), 4);
const_assert_eq!(HEX_NODES.len(), MAX_NODES);

/// One record per [`ShapeKind`], indexed by the discriminant.
pub(crate) static REFERENCE_SHAPES: [ReferenceShape; ShapeKind::COUNT] = [
    ReferenceShape {
        kind: ShapeKind::Line2,
        dim: 1,
        num_corners: 2,
        nodes: &[LINE_NODES[0], LINE_NODES[1]],
        lines: &[&[0, 1]],
        surfaces: &[],
        line_kind: Some(ShapeKind::Line2),
        surface_kind: None,
    },
    ReferenceShape {
        kind: ShapeKind::Line3,
        dim: 1,
        num_corners: 2,
        nodes: &LINE_NODES,
        lines: &[&[0, 1, 2]],
        surfaces: &[],
        line_kind: Some(ShapeKind::Line3),
        surface_kind: None,
    },
    ReferenceShape {
        kind: ShapeKind::Tri3,
        dim: 2,
        num_corners: 3,
        nodes: &[TRI_NODES[0], TRI_NODES[1], TRI_NODES[2]],
        lines: &TRI3_LINES,
        surfaces: &[&[0, 1, 2]],
        line_kind: Some(ShapeKind::Line2),
        surface_kind: Some(ShapeKind::Tri3),
    },
    ReferenceShape {
        kind: ShapeKind::Tri6,
        dim: 2,
        num_corners: 3,
        nodes: &TRI_NODES,
        lines: &TRI6_LINES,
        surfaces: &[&[0, 1, 2, 3, 4, 5]],
        line_kind: Some(ShapeKind::Line3),
        surface_kind: Some(ShapeKind::Tri6),
    },
    ReferenceShape {
        kind: ShapeKind::Quad4,
        dim: 2,
        num_corners: 4,
        nodes: &[QUAD_NODES[0], QUAD_NODES[1], QUAD_NODES[2], QUAD_NODES[3]],
        lines: &QUAD4_LINES,
        surfaces: &[&[0, 1, 2, 3]],
        line_kind: Some(ShapeKind::Line2),
        surface_kind: Some(ShapeKind::Quad4),
    },
    ReferenceShape {
        kind: ShapeKind::Quad8,
        dim: 2,
        num_corners: 4,
        nodes: &[
            QUAD_NODES[0],
            QUAD_NODES[1],
            QUAD_NODES[2],
            QUAD_NODES[3],
            QUAD_NODES[4],
            QUAD_NODES[5],
            QUAD_NODES[6],
            QUAD_NODES[7],
        ],
        lines: &QUAD8_LINES,
        surfaces: &[&[0, 1, 2, 3, 4, 5, 6, 7]],
        line_kind: Some(ShapeKind::Line3),
        surface_kind: Some(ShapeKind::Quad8),
    },
    ReferenceShape {
        kind: ShapeKind::Quad9,
        dim: 2,
        num_corners: 4,
        nodes: &QUAD_NODES,
        lines: &QUAD8_LINES,
        surfaces: &[&[0, 1, 2, 3, 4, 5, 6, 7, 8]],
        line_kind: Some(ShapeKind::Line3),
        surface_kind: Some(ShapeKind::Quad9),
    },
    ReferenceShape {
        kind: ShapeKind::Tet4,
        dim: 3,
        num_corners: 4,
        nodes: &[TET_NODES[0], TET_NODES[1], TET_NODES[2], TET_NODES[3]],
        lines: &TET4_LINES,
        surfaces: &TET4_SURFACES,
        line_kind: Some(ShapeKind::Line2),
        surface_kind: Some(ShapeKind::Tri3),
    },
    ReferenceShape {
        kind: ShapeKind::Tet10,
        dim: 3,
        num_corners: 4,
        nodes: &TET_NODES,
        lines: &TET10_LINES,
        surfaces: &TET10_SURFACES,
        line_kind: Some(ShapeKind::Line3),
        surface_kind: Some(ShapeKind::Tri6),
    },
    ReferenceShape {
        kind: ShapeKind::Hex8,
        dim: 3,
        num_corners: 8,
        nodes: &[
            HEX_NODES[0],
            HEX_NODES[1],
            HEX_NODES[2],
            HEX_NODES[3],
            HEX_NODES[4],
            HEX_NODES[5],
            HEX_NODES[6],
            HEX_NODES[7],
        ],
        lines: &HEX8_LINES,
        surfaces: &HEX8_SURFACES,
        line_kind: Some(ShapeKind::Line2),
        surface_kind: Some(ShapeKind::Quad4),
    },
    ReferenceShape {
        kind: ShapeKind::Hex20,
        dim: 3,
        num_corners: 8,
        nodes: &[
            HEX_NODES[0],
            HEX_NODES[1],
            HEX_NODES[2],
            HEX_NODES[3],
            HEX_NODES[4],
            HEX_NODES[5],
            HEX_NODES[6],
            HEX_NODES[7],
            HEX_NODES[8],
            HEX_NODES[9],
            HEX_NODES[10],
            HEX_NODES[11],
            HEX_NODES[12],
            HEX_NODES[13],
            HEX_NODES[14],
            HEX_NODES[15],
            HEX_NODES[16],
            HEX_NODES[17],
            HEX_NODES[18],
            HEX_NODES[19],
        ],
        lines: &HEX20_LINES,
        surfaces: &HEX20_SURFACES,
        line_kind: Some(ShapeKind::Line3),
        surface_kind: Some(ShapeKind::Quad8),
    },
    ReferenceShape {
        kind: ShapeKind::Hex27,
        dim: 3,
        num_corners: 8,
        nodes: &HEX_NODES,
        lines: &HEX20_LINES,
        surfaces: &HEX27_SURFACES,
        line_kind: Some(ShapeKind::Line3),
        surface_kind: Some(ShapeKind::Quad9),
    },
];

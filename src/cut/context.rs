//! The working state of the cut of one target element.

use crate::cut::{InterfacePoint, IntersectionCache};
use crate::math::{Point, Real};
use crate::mesh::{MeshElement, NodeId};
use crate::query::ElementGeometry;
use crate::utils::hashmap::HashMap;
use crate::utils::{compare_points, SortedPair, TOL7};
use alloc::vec::Vec;

/// A cutter element producing at least one interface point in the current
/// target element.
#[derive(Clone, Debug)]
pub(crate) struct IntersectingCutter<'a> {
    pub element: &'a MeshElement,
    pub geometry: ElementGeometry,
}

/// A triangle of a cut lying on a face of the target element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct SurfaceTriangle {
    /// Position of the cutter element in [`CutContext::cutters`].
    pub cutter: usize,
    pub nodes: [usize; 3],
}

/// Everything gathered while cutting one target element.
///
/// Indices into `points` are the vocabulary of the segment, isolated point and
/// triangle lists. The corners of the target element come first, in node
/// order.
pub(crate) struct CutContext<'a> {
    pub target: &'a MeshElement,
    pub geometry: ElementGeometry,
    pub points: Vec<InterfacePoint>,
    /// One marker per target face.
    pub face_markers: Vec<i32>,
    /// Segments drawn on each target face, in insertion order.
    pub segments: Vec<Vec<SortedPair<usize>>>,
    /// Isolated points of each target face.
    pub isolated: Vec<Vec<usize>>,
    /// Interface triangles crossing the element.
    pub triangles: Vec<[usize; 3]>,
    /// Position in `cutters` of the element each triangle comes from.
    pub triangle_markers: Vec<usize>,
    pub surface_triangles: Vec<SurfaceTriangle>,
    pub cutters: Vec<IntersectingCutter<'a>>,
    pub cache: IntersectionCache,
    /// Local coordinates of the cutter nodes inside the target element.
    pub node_inside: HashMap<NodeId, Option<Point<Real>>>,
    /// Interface polygons whose convex hull dropped some points.
    pub concave_polygons: usize,
    /// Interface nodes left on the straight interface by the recovery.
    pub missed_points: usize,
}

impl<'a> CutContext<'a> {
    pub fn new(target: &'a MeshElement, geometry: ElementGeometry) -> Self {
        let mut result = Self {
            target,
            geometry,
            points: Vec::new(),
            face_markers: Vec::new(),
            segments: Vec::new(),
            isolated: Vec::new(),
            triangles: Vec::new(),
            triangle_markers: Vec::new(),
            surface_triangles: Vec::new(),
            cutters: Vec::new(),
            cache: IntersectionCache::new(),
            node_inside: HashMap::default(),
            concave_polygons: 0,
            missed_points: 0,
        };
        result.seed();
        result
    }

    /// Clears everything and starts over with another target element,
    /// keeping the allocations.
    pub fn reset(&mut self, target: &'a MeshElement, geometry: ElementGeometry) {
        self.target = target;
        self.geometry = geometry;
        self.points.clear();
        self.face_markers.clear();
        self.segments.clear();
        self.isolated.clear();
        self.triangles.clear();
        self.triangle_markers.clear();
        self.surface_triangles.clear();
        self.cutters.clear();
        self.cache.clear();
        self.node_inside.clear();
        self.concave_polygons = 0;
        self.missed_points = 0;
        self.seed();
    }

    fn seed(&mut self) {
        let kind = self.target.kind;
        self.points
            .extend((0..kind.num_corners()).map(|n| InterfacePoint::corner(kind, n)));
        let faces = kind.num_surfaces();
        self.face_markers.resize(faces, -1);
        self.segments.resize_with(faces, Vec::new);
        self.isolated.resize_with(faces, Vec::new);
    }

    /// Number of target corners at the head of `points`.
    #[inline]
    pub fn num_corners(&self) -> usize {
        self.target.kind.num_corners()
    }

    /// Adds `point` unless a point with the same coordinates exists, and
    /// returns its index.
    pub fn insert_point(&mut self, point: InterfacePoint) -> usize {
        if let Some(i) = self
            .points
            .iter()
            .position(|p| compare_points(&p.coord, &point.coord, TOL7))
        {
            return i;
        }
        self.points.push(point);
        self.points.len() - 1
    }

    /// Registers a cutter element and returns its position.
    pub fn push_cutter(&mut self, element: &'a MeshElement, geometry: ElementGeometry) -> usize {
        self.cutters.push(IntersectingCutter { element, geometry });
        self.cutters.len() - 1
    }
}

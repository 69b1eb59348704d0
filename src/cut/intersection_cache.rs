use crate::math::{Point, Real};
use crate::mesh::{ElementId, NodeId};
use crate::utils::hashmap::{Entry, HashMap};
use alloc::vec::Vec;

/// Identifies one line/surface root search.
///
/// Exactly one of `cutter` and `surface` is set: target lines are intersected
/// with a cutter element, cutter lines with a face of the target element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct IntersectionKey {
    /// The cutter element owning the surface.
    pub cutter: Option<ElementId>,
    /// The target face used as surface.
    pub surface: Option<usize>,
    /// First end node of the line.
    pub start: NodeId,
    /// Second end node of the line.
    pub end: NodeId,
}

impl IntersectionKey {
    /// Key of a target line against a cutter element.
    pub fn cutter_surface(cutter: ElementId, start: NodeId, end: NodeId) -> Self {
        Self {
            cutter: Some(cutter),
            surface: None,
            start,
            end,
        }
    }

    /// Key of a cutter line against a target face.
    pub fn target_surface(surface: usize, start: NodeId, end: NodeId) -> Self {
        Self {
            cutter: None,
            surface: Some(surface),
            start,
            end,
        }
    }

    /// The same search with the line traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            ..*self
        }
    }
}

/// The result of a root search.
#[derive(Clone, Debug, PartialEq)]
pub struct CachedRoots {
    /// Roots as (surface parameter, surface parameter, line parameter).
    pub roots: Vec<Point<Real>>,
    /// Whether the line intersects the surface at all.
    pub intersects: bool,
}

/// Root searches already performed for the current target element.
///
/// Entries are written once and never modified until the cache is cleared.
#[derive(Clone, Debug, Default)]
pub struct IntersectionCache {
    entries: HashMap<IntersectionKey, CachedRoots>,
}

impl IntersectionCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored searches (both directions of a line count separately).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the cache empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The stored result of `key`, if any.
    pub fn get(&self, key: &IntersectionKey) -> Option<&CachedRoots> {
        self.entries.get(key)
    }

    /// Stores the roots found for `key`, and the same roots with a negated line
    /// parameter for the reversed key.
    ///
    /// An existing entry is kept untouched.
    pub fn insert(&mut self, key: IntersectionKey, roots: Vec<Point<Real>>) -> &CachedRoots {
        let reversed: Vec<_> = roots.iter().map(|r| Point::new(r.x, r.y, -r.z)).collect();
        if let Entry::Vacant(e) = self.entries.entry(key.reversed()) {
            let _ = e.insert(CachedRoots {
                intersects: !reversed.is_empty(),
                roots: reversed,
            });
        }

        self.entries.entry(key).or_insert_with(|| CachedRoots {
            intersects: !roots.is_empty(),
            roots,
        })
    }
}

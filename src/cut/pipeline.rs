use crate::bounding_volume::Aabb;
use crate::cut::cdt::ElementCells;
use crate::cut::context::CutContext;
use crate::cut::{
    BoundaryIntCell, CutError, CutFlags, CutOptions, DomainIntCell, ShapeRole, Tetrahedralizer,
};
use crate::mesh::{Discretization, ElementId, MeshElement};
use crate::partitioning::{linear_candidates, CutterTree};
use crate::query::ElementGeometry;
use crate::shape::ShapeKind;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Counters of a cut.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CutReport {
    /// Target elements that received integration cells.
    pub intersected_elements: usize,
    /// Interface nodes of quadratic cells that could not be moved onto the
    /// curved cutter and kept their straight position.
    pub missed_points: usize,
    /// Interface polygons whose convex hull dropped some of their points.
    pub concave_polygons: usize,
}

/// The integration cells of every cut target element.
///
/// Target elements the cutter does not cut have no entry.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CutResult {
    /// Domain integration cells, by target element id.
    pub domain_cells: BTreeMap<ElementId, Vec<DomainIntCell>>,
    /// Boundary integration cells, by target element id.
    pub boundary_cells: BTreeMap<ElementId, Vec<BoundaryIntCell>>,
    /// Counters.
    pub report: CutReport,
}

impl CutResult {
    /// Is the target element `id` cut?
    pub fn is_cut(&self, id: ElementId) -> bool {
        self.domain_cells.contains_key(&id)
    }
}

/// The cut of one target element.
struct ElementOutcome {
    id: ElementId,
    cells: ElementCells,
    missed_points: usize,
    concave_polygons: usize,
}

enum CandidateSearch<'a> {
    Tree(CutterTree),
    Linear(&'a Discretization),
}

impl CandidateSearch<'_> {
    fn candidates(&self, aabb: &Aabb) -> Result<Vec<ElementId>, CutError> {
        match self {
            CandidateSearch::Tree(tree) => Ok(tree.candidates(aabb)),
            CandidateSearch::Linear(cutter) => linear_candidates(cutter, aabb),
        }
    }
}

fn check_shape(kind: ShapeKind, role: ShapeRole) -> Result<(), CutError> {
    let supported = match role {
        ShapeRole::Target => matches!(
            kind,
            ShapeKind::Hex8 | ShapeKind::Hex20 | ShapeKind::Hex27 | ShapeKind::Tet4 | ShapeKind::Tet10
        ),
        ShapeRole::Cutter => matches!(
            kind,
            ShapeKind::Tri3 | ShapeKind::Tri6 | ShapeKind::Quad4 | ShapeKind::Quad8 | ShapeKind::Quad9
        ),
    };
    if supported {
        Ok(())
    } else {
        Err(CutError::UnsupportedShape { kind, role })
    }
}

/// Cuts the elements of `target` with the surface elements of `cutter`.
///
/// The target mesh is given in reference positions and the cutter mesh in its
/// current positions. Target elements must be hexahedra or tetrahedra, cutter
/// elements triangles or quadrilaterals.
///
/// Every cut target element gets tetrahedral domain integration cells tiling
/// its reference domain, and triangular boundary integration cells tiling the
/// part of the cutter inside it. Elements the cutter misses, or only touches,
/// are left out of the result.
///
/// `tetrahedralizer` is shared between the elements, which are processed in
/// parallel when the `parallel` feature is enabled.
pub fn compute_intersection<T: Tetrahedralizer + Sync + ?Sized>(
    target: &Discretization,
    cutter: &Discretization,
    options: &CutOptions,
    tetrahedralizer: &T,
) -> Result<CutResult, CutError> {
    let start = Instant::now();
    for element in target.elements() {
        check_shape(element.kind, ShapeRole::Target)?;
    }
    for element in cutter.elements() {
        check_shape(element.kind, ShapeRole::Cutter)?;
    }

    let mut result = CutResult::default();
    if cutter.num_elements() == 0 {
        return Ok(result);
    }

    let search = if options.has(CutFlags::LINEAR_CANDIDATE_SEARCH) {
        CandidateSearch::Linear(cutter)
    } else {
        CandidateSearch::Tree(CutterTree::new(cutter)?)
    };

    #[cfg(not(feature = "parallel"))]
    let outcomes = {
        let mut context: Option<CutContext> = None;
        let mut outcomes = Vec::new();
        for element in target.elements() {
            let geometry = ElementGeometry::new(element.kind, target.element_positions(element)?);
            let ctx = match context.as_mut() {
                Some(ctx) => {
                    ctx.reset(element, geometry);
                    ctx
                }
                None => context.insert(CutContext::new(element, geometry)),
            };
            outcomes.push(cut_element(ctx, target, cutter, &search, options, tetrahedralizer)?);
        }
        outcomes
    };

    #[cfg(feature = "parallel")]
    let outcomes = target
        .elements()
        .par_iter()
        .map(|element| {
            let geometry = ElementGeometry::new(element.kind, target.element_positions(element)?);
            let mut ctx = CutContext::new(element, geometry);
            cut_element(&mut ctx, target, cutter, &search, options, tetrahedralizer)
        })
        .collect::<Result<Vec<_>, CutError>>()?;

    for outcome in outcomes.into_iter().flatten() {
        result.report.intersected_elements += 1;
        result.report.missed_points += outcome.missed_points;
        result.report.concave_polygons += outcome.concave_polygons;
        let _ = result.domain_cells.insert(outcome.id, outcome.cells.domain);
        let _ = result.boundary_cells.insert(outcome.id, outcome.cells.boundary);
    }

    log::info!(
        "cut {} of {} target elements in {:.3?}",
        result.report.intersected_elements,
        target.num_elements(),
        start.elapsed()
    );
    if result.report.missed_points > 0 {
        log::info!(
            "{} interface nodes could not be moved onto the curved interface",
            result.report.missed_points
        );
    }
    if result.report.concave_polygons > 0 {
        log::info!(
            "{} interface polygons were not convex",
            result.report.concave_polygons
        );
    }
    Ok(result)
}

fn cut_element<'a, T: Tetrahedralizer + ?Sized>(
    ctx: &mut CutContext<'a>,
    target: &Discretization,
    cutter: &'a Discretization,
    search: &CandidateSearch,
    options: &CutOptions,
    tetrahedralizer: &T,
) -> Result<Option<ElementOutcome>, CutError> {
    let element: &MeshElement = ctx.target;
    let candidates = search.candidates(&target.element_aabb(element)?)?;
    if candidates.is_empty() {
        return Ok(None);
    }
    log::debug!(
        "target element {}: {} cutter candidates",
        element.id,
        candidates.len()
    );

    for id in candidates {
        let cutter_element = cutter.element(id)?;
        let geometry = ElementGeometry::new(
            cutter_element.kind,
            cutter.element_positions(cutter_element)?,
        );
        let points = ctx.collect_cutter_points(cutter_element, &geometry, options)?;
        if points.is_empty() {
            continue;
        }
        let position = ctx.push_cutter(cutter_element, geometry);
        ctx.add_cutter_polygon(position, points.into_sorted(), options)?;
    }

    ctx.complete_plc();
    if !ctx.needs_tetrahedralization() {
        return Ok(None);
    }

    let cells = ctx.integration_cells(options, tetrahedralizer)?;
    Ok(Some(ElementOutcome {
        id: element.id,
        cells,
        missed_points: ctx.missed_points,
        concave_polygons: ctx.concave_polygons,
    }))
}

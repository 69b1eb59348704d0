use crate::math::Real;
use core::fmt;

#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
/// Controls which optional stages of the cut pipeline run.
pub struct CutFlags(u8);

bitflags::bitflags! {
    impl CutFlags: u8 {
        /// If set, domain cells are 10-node tetrahedra and boundary cells 6-node triangles.
        const QUADRATIC_CELLS = 1;
        /// If set, the nodes the tetrahedralization adds on the interface are moved onto
        /// the curved cutter surface.
        ///
        /// Only has an effect together with [`CutFlags::QUADRATIC_CELLS`].
        const RECOVER_CURVED_INTERFACE = 1 << 1;
        /// If set, interface polygons whose convex hull drops some of their points are
        /// ordered by angle around their centroid and triangulated by ear clipping
        /// instead of using the incomplete hull ordering.
        const EAR_CLIP_CONCAVE = 1 << 2;
        /// If set, cutter candidates are found by testing every cutter element instead
        /// of querying the search tree.
        const LINEAR_CANDIDATE_SEARCH = 1 << 3;
    }
}

/// Parameters of a cut.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CutOptions {
    /// Optional stages.
    pub flags: CutFlags,
    /// Element-local coordinates are multiplied by this factor and rounded before
    /// tetrahedralization.
    pub scale_factor: Real,
    /// Offset added to the position of a cutter element to form a facet marker.
    ///
    /// Must exceed the face count of every target shape.
    pub facet_marker_offset: i32,
    /// Domain cells with a reference volume below this are dropped.
    pub degenerate_volume_tolerance: Real,
    /// Iteration cap of the curve/surface root search.
    pub max_newton_iterations: usize,
    /// Iteration cap of the curved-interface recovery.
    pub max_recovery_iterations: usize,
}

impl Default for CutOptions {
    fn default() -> Self {
        Self {
            flags: CutFlags::empty(),
            scale_factor: 1.0e7,
            facet_marker_offset: 11,
            degenerate_volume_tolerance: 1.0e-14,
            max_newton_iterations: 30,
            max_recovery_iterations: 50,
        }
    }
}

impl CutOptions {
    /// Options producing quadratic cells lifted onto the curved interface.
    pub fn quadratic() -> Self {
        Self {
            flags: CutFlags::QUADRATIC_CELLS | CutFlags::RECOVER_CURVED_INTERFACE,
            ..Self::default()
        }
    }

    /// Is `flag` set?
    #[inline]
    pub fn has(&self, flag: CutFlags) -> bool {
        self.flags.contains(flag)
    }

    /// Nodes per domain cell.
    pub fn nodes_per_tet(&self) -> usize {
        if self.has(CutFlags::QUADRATIC_CELLS) {
            10
        } else {
            4
        }
    }

    /// The switches passed to the tetrahedralization engine.
    pub fn switches(&self) -> Switches {
        Switches {
            plc: true,
            quality: true,
            quiet: true,
            quadratic: self.has(CutFlags::QUADRATIC_CELLS),
        }
    }
}

/// Behavior requested from the tetrahedralization engine.
///
/// Displays as the classic single-letter switch string, e.g. `pqQo2`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Switches {
    /// Read the input as a piecewise-linear complex (`p`).
    pub plc: bool,
    /// Quality meshing (`q`).
    pub quality: bool,
    /// No terminal output (`Q`).
    pub quiet: bool,
    /// Second-order tetrahedra (`o2`).
    pub quadratic: bool,
}

impl fmt::Display for Switches {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.plc {
            f.write_str("p")?;
        }
        if self.quality {
            f.write_str("q")?;
        }
        if self.quiet {
            f.write_str("Q")?;
        }
        if self.quadratic {
            f.write_str("o2")?;
        }
        Ok(())
    }
}

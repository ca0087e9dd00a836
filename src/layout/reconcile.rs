//! Zone list reconciliation after a dimension or zone list change.
//!
//! Existing zones are placed in order against the new grid until the first
//! one that no longer fits. That prefix is kept as-is; every cell it leaves
//! free becomes exactly one 1x1 zone. Zones past the break point that survive
//! truncation are reduced to 1x1 so they fill those cells, and blank zones
//! are appended when the list is too short.

use crate::geometry::{GridDims, Span};
use crate::layout::grid::{PackMode, place_zones};
use crate::zone::{Zone, ZoneIdAllocator};

/// Outcome of [`reconcile`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub zones: Vec<Zone>,
    /// Leading zones that kept their placement.
    pub kept: usize,
    /// Blank zones appended.
    pub added: usize,
    /// Zones dropped from the tail.
    pub removed: usize,
    /// Surviving zones past the break point whose span was reset to 1x1.
    pub collapsed: usize,
}

impl Reconciliation {
    pub fn changed(&self) -> bool {
        self.added > 0 || self.removed > 0 || self.collapsed > 0
    }
}

/// Resize `zones` so that a full pack on `dims` tiles the grid exactly.
pub fn reconcile(dims: GridDims, mut zones: Vec<Zone>, ids: &mut ZoneIdAllocator) -> Reconciliation {
    let (prefix, occupancy) = place_zones(dims, &zones, PackMode::StopAtFirstMiss);
    let kept = prefix.placed_count();
    let needed = kept + occupancy.empty_cells();

    let mut removed = 0;
    if zones.len() > needed {
        removed = zones.len() - needed;
        zones.truncate(needed);
    }

    let mut collapsed = 0;
    for zone in zones.iter_mut().skip(kept) {
        if zone.span() != Span::UNIT {
            zone.set_span(Span::UNIT);
            collapsed += 1;
        }
    }

    let mut added = 0;
    while zones.len() < needed {
        zones.push(ids.blank_zone());
        added += 1;
    }

    Reconciliation {
        zones,
        kept,
        added,
        removed,
        collapsed,
    }
}

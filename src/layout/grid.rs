//! Grid packer - deterministic first-fit placement of zones onto a fixed grid
//!
//! Zones are placed in list order. Each zone takes the first top-left cell,
//! scanning row-major, whose footprint stays inside the grid and touches no
//! occupied cell. Spans larger than the grid are clamped, never rejected.
//! A zone that fits nowhere is left out of the [`PlacementMap`]; packing
//! itself never fails.
//!
//! # Example
//! ```
//! use signage_grid::{GridDims, Zone, pack};
//!
//! let dims = GridDims::new(2, 2)?;
//! let zones = vec![
//!     Zone::blank(0).with_span(1, 2),   // whole first row
//!     Zone::blank(1),
//!     Zone::blank(2),
//! ];
//!
//! let placement = pack(dims, &zones);
//! assert!(placement.is_exact_tiling());
//! assert_eq!(placement.get(2).map(|p| (p.area.row, p.area.col)), Some((1, 1)));
//! # Ok::<(), signage_grid::LayoutError>(())
//! ```

use serde::Serialize;

use crate::geometry::{Footprint, GridDims, Span};
use crate::zone::{Zone, ZoneId};

/// Ephemeral per-pass record of covered cells.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    dims: GridDims,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            cells: vec![false; dims.cell_count()],
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.dims.cols() + col]
    }

    /// True when `area` lies inside the grid and every covered cell is free.
    pub fn fits(&self, area: &Footprint) -> bool {
        area.fits_within(self.dims) && area.cells().all(|(r, c)| !self.is_occupied(r, c))
    }

    pub fn mark(&mut self, area: &Footprint) {
        let cols = self.dims.cols();
        for (r, c) in area.cells() {
            self.cells[r * cols + c] = true;
        }
    }

    /// First free footprint of `span` in row-major order of its top-left cell.
    pub fn first_fit(&self, span: Span) -> Option<Footprint> {
        let (rows, cols) = (self.dims.rows(), self.dims.cols());
        for r in 0..rows {
            for c in 0..cols {
                if self.is_occupied(r, c) {
                    continue;
                }
                let candidate = Footprint::at(r, c, span);
                if self.fits(&candidate) {
                    return Some(candidate);
                }
            }
        }
        None
    }

    pub fn empty_cells(&self) -> usize {
        self.cells.iter().filter(|occupied| !**occupied).count()
    }
}

/// Where one zone landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub zone_id: ZoneId,
    pub area: Footprint,
}

/// Result of a packing pass, indexed by zone list position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementMap {
    dims: GridDims,
    slots: Vec<Option<Placement>>,
}

impl PlacementMap {
    fn with_capacity(dims: GridDims, len: usize) -> Self {
        Self {
            dims,
            slots: Vec::with_capacity(len),
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Placement of the zone at list `index`, if it was placed.
    pub fn get(&self, index: usize) -> Option<&Placement> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Number of zones considered by the pass, placed or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn placed_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// List indices of zones that could not be placed.
    pub fn unplaced(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.is_none().then_some(index))
            .collect()
    }

    /// Placed zones in list order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Placement)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|p| (index, p)))
    }

    /// List index of the zone covering a cell.
    pub fn owner_at(&self, row: usize, col: usize) -> Option<usize> {
        self.iter()
            .find(|(_, placement)| placement.area.contains(row, col))
            .map(|(index, _)| index)
    }

    /// Row-major count of footprints covering each cell.
    pub fn coverage(&self) -> Vec<u32> {
        let cols = self.dims.cols();
        let mut counts = vec![0u32; self.dims.cell_count()];
        for (_, placement) in self.iter() {
            for (r, c) in placement.area.cells() {
                counts[r * cols + c] += 1;
            }
        }
        counts
    }

    /// Every cell covered exactly once and every zone placed.
    pub fn is_exact_tiling(&self) -> bool {
        self.placed_count() == self.len() && self.coverage().iter().all(|count| *count == 1)
    }
}

/// How a pass treats the first zone that fits nowhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PackMode {
    /// Skip it and keep placing later zones.
    Full,
    /// Stop the pass there.
    StopAtFirstMiss,
}

pub(crate) fn place_zones(
    dims: GridDims,
    zones: &[Zone],
    mode: PackMode,
) -> (PlacementMap, OccupancyGrid) {
    let mut occupancy = OccupancyGrid::new(dims);
    let mut map = PlacementMap::with_capacity(dims, zones.len());

    for zone in zones {
        let slot = occupancy
            .first_fit(zone.effective_span(dims))
            .map(|area| {
                occupancy.mark(&area);
                Placement {
                    zone_id: zone.id,
                    area,
                }
            });

        let missed = slot.is_none();
        map.slots.push(slot);
        if missed && mode == PackMode::StopAtFirstMiss {
            break;
        }
    }

    (map, occupancy)
}

/// Place `zones` onto a grid of `dims`. Pure: equal inputs give equal output.
pub fn pack(dims: GridDims, zones: &[Zone]) -> PlacementMap {
    place_zones(dims, zones, PackMode::Full).0
}

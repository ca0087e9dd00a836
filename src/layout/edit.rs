//! Merge and split of placed zones.
//!
//! Both operations return a new zone list and leave the input untouched;
//! callers re-pack the result to get the final placement.

use std::collections::BTreeSet;

use crate::error::{LayoutError, Result, SelectionError};
use crate::geometry::{Footprint, GridDims, Span};
use crate::layout::grid::PlacementMap;
use crate::zone::{Zone, ZoneIdAllocator};

/// Check that `selection` names at least two placed zones whose footprints
/// tile a rectangle exactly, and return that rectangle.
pub fn selection_bounds(
    placement: &PlacementMap,
    zone_count: usize,
    selection: &[usize],
) -> std::result::Result<Footprint, SelectionError> {
    let distinct: BTreeSet<usize> = selection.iter().copied().collect();
    if distinct.len() < 2 {
        return Err(SelectionError::TooFewZones(distinct.len()));
    }

    let mut areas = Vec::with_capacity(distinct.len());
    for &index in &distinct {
        if index >= zone_count {
            return Err(SelectionError::IndexOutOfRange(index));
        }
        let placed = placement
            .get(index)
            .ok_or(SelectionError::UnplacedZone(index))?;
        areas.push(placed.area);
    }

    let top = areas.iter().map(|a| a.row).min().unwrap_or(0);
    let left = areas.iter().map(|a| a.col).min().unwrap_or(0);
    let bottom = areas.iter().map(Footprint::bottom).max().unwrap_or(0);
    let right = areas.iter().map(Footprint::right).max().unwrap_or(0);
    let bounds = Footprint::new(top, left, bottom - top, right - left);

    let width = bounds.col_span;
    let mut covered = vec![false; bounds.area()];
    for area in &areas {
        for (r, c) in area.cells() {
            let slot = &mut covered[(r - top) * width + (c - left)];
            if *slot {
                return Err(SelectionError::Overlap { row: r, col: c });
            }
            *slot = true;
        }
    }

    if let Some((r, c)) = bounds
        .cells()
        .find(|&(r, c)| !covered[(r - top) * width + (c - left)])
    {
        return Err(SelectionError::NotRectangular { row: r, col: c });
    }

    Ok(bounds)
}

/// Merge the selected zones into the one with the lowest list index.
///
/// That zone keeps its id and payload and takes the span of the selection's
/// bounding rectangle; the other selected zones are removed.
pub fn merge(zones: &[Zone], placement: &PlacementMap, selection: &[usize]) -> Result<Vec<Zone>> {
    let bounds = selection_bounds(placement, zones.len(), selection)?;

    let distinct: BTreeSet<usize> = selection.iter().copied().collect();
    let mut merged = zones.to_vec();
    let mut indices = distinct.into_iter();
    let keep = indices.next().unwrap_or(0);
    merged[keep].set_span(bounds.span());

    // Highest first so earlier removals never shift pending ones.
    let mut doomed: Vec<usize> = indices.collect();
    doomed.sort_unstable_by(|a, b| b.cmp(a));
    for index in doomed {
        merged.remove(index);
    }

    Ok(merged)
}

/// Reduce the zone at `index` to 1x1 and insert fresh unit zones right
/// after it, one per vacated cell. Zones already 1x1 on `dims` are left alone.
pub fn split(
    dims: GridDims,
    zones: &[Zone],
    index: usize,
    ids: &mut ZoneIdAllocator,
) -> Result<Vec<Zone>> {
    let target = zones.get(index).ok_or(LayoutError::ZoneIndexOutOfRange {
        index,
        len: zones.len(),
    })?;

    let span = target.effective_span(dims);
    if span.is_unit() {
        return Ok(zones.to_vec());
    }

    let extra = span.area() - 1;
    let mut result = Vec::with_capacity(zones.len() + extra);
    result.extend_from_slice(&zones[..index]);
    let mut unit = target.clone();
    unit.set_span(Span::UNIT);
    result.push(unit);
    result.extend((0..extra).map(|_| ids.blank_zone()));
    result.extend_from_slice(&zones[index + 1..]);

    Ok(result)
}

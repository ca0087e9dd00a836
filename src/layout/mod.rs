//! Layout module orchestrator.
//!
//! `grid` owns placement, `reconcile` resizes the zone list to fit the grid,
//! and `edit` implements merge and split on top of a placement.

pub mod edit;
pub mod grid;
pub mod reconcile;

pub use edit::{merge, selection_bounds, split};
pub use grid::{OccupancyGrid, Placement, PlacementMap, pack};
pub use reconcile::{Reconciliation, reconcile};

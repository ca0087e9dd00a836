//! Registry module orchestrator. Change tracking lives in `core`.

mod core;

pub use core::{PlacementRegistry, ZoneState};

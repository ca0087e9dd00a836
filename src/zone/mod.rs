//! Zone module orchestrator.
//!
//! Zones are the entries of the ordered zone list. List position drives
//! placement order; `ZoneId` follows a zone through merge and split.

mod core;

pub use core::{Zone, ZoneBackground, ZoneId, ZoneIdAllocator, ZoneKind, ZonePayload};

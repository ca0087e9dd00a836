//! Zone-grid packing engine for signage layouts.
//!
//! A display is a fixed rows x cols grid tiled by an ordered list of zones,
//! each spanning one or more cells. The engine places zones first-fit in
//! list order, resizes the list when the grid changes, and merges or splits
//! zones while keeping the grid covered exactly once. Rendering the widgets
//! inside zones is left to the caller.

pub mod audit;
pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod registry;
pub mod render;
pub mod session;
pub mod width;
pub mod zone;

pub use audit::{
    BufferedLayoutAudit, LayoutAudit, LayoutAuditEvent, LayoutAuditEventBuilder,
    LayoutAuditStage, NullLayoutAudit,
};
pub use config::{LayoutConfig, Orientation, TopBar, TopBarMode};
pub use error::{LayoutError, Result, SelectionError};
pub use geometry::{Footprint, GridDims, Span};
pub use layout::{
    OccupancyGrid, Placement, PlacementMap, Reconciliation, merge, pack, reconcile,
    selection_bounds, split,
};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, json_kv,
};
pub use metrics::{LayoutMetrics, MetricSnapshot};
pub use registry::{PlacementRegistry, ZoneState};
pub use render::{PreviewSettings, TextPreview};
pub use session::{LayoutSession, SessionConfig};
pub use width::display_width;
pub use zone::{Zone, ZoneBackground, ZoneId, ZoneIdAllocator, ZoneKind, ZonePayload};

use thiserror::Error;

/// Unified result type for the signage grid crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors surfaced by the zone-grid engine.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("grid dimensions must be at least 1x1 (got {rows}x{cols})")]
    InvalidDimensions { rows: u16, cols: u16 },
    #[error("invalid selection: {0}")]
    InvalidSelection(#[from] SelectionError),
    #[error("zone index {index} out of range (zone count {len})")]
    ZoneIndexOutOfRange { index: usize, len: usize },
    #[error("layout config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reasons a merge selection is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("at least two zones are required (got {0})")]
    TooFewZones(usize),
    #[error("zone index {0} does not exist")]
    IndexOutOfRange(usize),
    #[error("zone {0} has no placement")]
    UnplacedZone(usize),
    #[error("selected zones overlap at cell ({row}, {col})")]
    Overlap { row: usize, col: usize },
    #[error("selected zones leave cell ({row}, {col}) uncovered")]
    NotRectangular { row: usize, col: usize },
}

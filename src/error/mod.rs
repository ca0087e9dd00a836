//! Error module orchestrator. The concrete types live in `types`.

mod types;

pub use types::{LayoutError, Result, SelectionError};

//! Render module orchestrator. The text preview lives in `core`.

mod core;

pub use core::{PreviewSettings, TextPreview};

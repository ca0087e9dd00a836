//! Persisted layout document.
//!
//! ```json
//! { "grid": {"rows": 2, "cols": 2},
//!   "zones": [{"id": 0, "type": "clock", "row_span": 1, "col_span": 2, ...}],
//!   "global_font": "Arial, sans-serif",
//!   "top_bar": {"mode": "visible", "show_seconds": true},
//!   "orientation": "landscape" }
//! ```
//! Fields this crate does not model are kept in `extra` and written back.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::Result;
use crate::geometry::GridDims;
use crate::zone::{Zone, ZoneBackground, ZoneKind, ZonePayload};

pub const DEFAULT_FONT: &str = "Arial, sans-serif";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopBarMode {
    #[default]
    Visible,
    Hidden,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopBar {
    #[serde(default)]
    pub mode: TopBarMode,
    #[serde(default = "default_true")]
    pub show_seconds: bool,
}

impl Default for TopBar {
    fn default() -> Self {
        Self {
            mode: TopBarMode::Visible,
            show_seconds: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub grid: GridDims,
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default = "default_font")]
    pub global_font: String,
    #[serde(default)]
    pub top_bar: TopBar,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_true() -> bool {
    true
}

fn default_font() -> String {
    DEFAULT_FONT.to_string()
}

impl Default for LayoutConfig {
    /// The stock 2x2 display: clock, iframe, welcome announcement, RSS.
    fn default() -> Self {
        let styled = |kind: ZoneKind, font_size: &str| ZonePayload {
            kind,
            font_family: DEFAULT_FONT.to_string(),
            font_size: font_size.to_string(),
            ..ZonePayload::default()
        };

        let mut clock = styled(ZoneKind::Clock, "16px");
        clock.extra.insert("date_format".to_string(), json!("full"));
        clock.extra.insert("time_format".to_string(), json!("24h"));

        let mut announcement = styled(ZoneKind::Announcement, "24px")
            .with_content("Welcome to Digital Signage!");
        announcement.background = ZoneBackground::Glassmorphism {
            blur: Some(10),
            opacity: Some(0.2),
        };

        let zones = vec![
            Zone::new(0, clock),
            Zone::new(1, styled(ZoneKind::Iframe, "16px")),
            Zone::new(2, announcement),
            Zone::new(3, styled(ZoneKind::Rss, "14px")),
        ];

        Self {
            grid: GridDims::default(),
            zones,
            global_font: default_font(),
            top_bar: TopBar::default(),
            orientation: Orientation::default(),
            extra: Map::new(),
        }
    }
}

impl LayoutConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json_string_pretty()?)?;
        Ok(())
    }
}

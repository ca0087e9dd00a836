use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::geometry::{GridDims, Span};

/// Stable identifier assigned to a zone when it is created.
pub type ZoneId = u64;

/// Content role of a zone. Unknown roles round-trip untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ZoneKind {
    #[default]
    Empty,
    Clock,
    Iframe,
    Announcement,
    Rss,
    Image,
    Video,
    Slideshow,
    Weather,
    Other(String),
}

impl ZoneKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Empty => "empty",
            Self::Clock => "clock",
            Self::Iframe => "iframe",
            Self::Announcement => "announcement",
            Self::Rss => "rss",
            Self::Image => "image",
            Self::Video => "video",
            Self::Slideshow => "slideshow",
            Self::Weather => "weather",
            Self::Other(name) => name,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<String> for ZoneKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "empty" => Self::Empty,
            "clock" => Self::Clock,
            "iframe" => Self::Iframe,
            "announcement" => Self::Announcement,
            "rss" => Self::Rss,
            "image" => Self::Image,
            "video" => Self::Video,
            "slideshow" => Self::Slideshow,
            "weather" => Self::Weather,
            _ => Self::Other(value),
        }
    }
}

impl From<ZoneKind> for String {
    fn from(kind: ZoneKind) -> Self {
        match kind {
            ZoneKind::Other(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

/// Zone background fill. Unrecognized `type`s are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ZoneBackground {
    #[default]
    Transparent,
    Color {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        opacity: Option<f64>,
    },
    Glassmorphism {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        blur: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        opacity: Option<f64>,
    },
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    #[serde(untagged)]
    Other(Map<String, Value>),
}

/// Everything about a zone that packing ignores.
///
/// Widget-specific settings (clock formats, weather location, schedules and
/// so on) are kept in `extra` so they survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonePayload {
    #[serde(rename = "type", default)]
    pub kind: ZoneKind,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: String,
    #[serde(default)]
    pub background: ZoneBackground,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ZonePayload {
    fn default() -> Self {
        Self {
            kind: ZoneKind::Empty,
            content: String::new(),
            opacity: default_opacity(),
            font_family: String::new(),
            font_size: default_font_size(),
            background: ZoneBackground::Transparent,
            extra: Map::new(),
        }
    }
}

impl ZonePayload {
    /// Payload given to zones synthesized by reconciliation and split.
    pub fn blank() -> Self {
        let mut extra = Map::new();
        extra.insert("date_format".to_string(), json!("full"));
        extra.insert("time_format".to_string(), json!("24h"));
        Self {
            extra,
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: ZoneKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}

fn default_opacity() -> f64 {
    1.0
}

fn default_font_size() -> String {
    "16px".to_string()
}

fn default_span() -> u16 {
    1
}

/// One entry of the ordered zone list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(default)]
    pub id: ZoneId,
    #[serde(default = "default_span")]
    pub row_span: u16,
    #[serde(default = "default_span")]
    pub col_span: u16,
    #[serde(flatten)]
    pub payload: ZonePayload,
}

impl Zone {
    pub fn new(id: ZoneId, payload: ZonePayload) -> Self {
        Self {
            id,
            row_span: 1,
            col_span: 1,
            payload,
        }
    }

    pub fn blank(id: ZoneId) -> Self {
        Self::new(id, ZonePayload::blank())
    }

    pub fn with_span(mut self, row_span: u16, col_span: u16) -> Self {
        self.set_span(Span::new(row_span, col_span));
        self
    }

    pub fn span(&self) -> Span {
        Span::new(self.row_span, self.col_span)
    }

    pub fn set_span(&mut self, span: Span) {
        self.row_span = span.rows;
        self.col_span = span.cols;
    }

    /// Span actually used for placement on `dims`.
    pub fn effective_span(&self, dims: GridDims) -> Span {
        dims.clamp_span(self.span())
    }
}

/// Hands out fresh zone ids.
#[derive(Debug, Clone, Default)]
pub struct ZoneIdAllocator {
    next: ZoneId,
}

impl ZoneIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start allocating after the largest id already in `zones`.
    pub fn seeded_from(zones: &[Zone]) -> Self {
        let next = zones
            .iter()
            .map(|zone| zone.id.saturating_add(1))
            .max()
            .unwrap_or(0);
        Self { next }
    }

    pub fn next_id(&mut self) -> ZoneId {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }

    pub fn blank_zone(&mut self) -> Zone {
        Zone::blank(self.next_id())
    }
}

//! Layout session audit hooks.
//!
//! Callers that want a record of every command (for an edit history or a
//! debugging overlay) install a [`LayoutAudit`] sink. Each record carries the
//! command stage plus structured details.

use std::sync::Mutex;
use std::time::SystemTime;

use serde_json::Value;

/// Distinct checkpoints emitted by `LayoutSession`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutAuditStage {
    /// A session was built from a layout config.
    SessionOpened,
    /// Grid dimensions changed.
    DimensionsChanged,
    /// Zones were merged.
    ZonesMerged,
    /// A zone was split into units.
    ZoneSplit,
    /// A zone's span or payload was edited.
    ZoneEdited,
    /// A zone was deleted.
    ZoneRemoved,
    /// A command failed validation and changed nothing.
    CommandRejected,
}

/// Structured audit entry.
#[derive(Debug, Clone)]
pub struct LayoutAuditEvent {
    pub timestamp: SystemTime,
    pub stage: LayoutAuditStage,
    pub details: Vec<(String, Value)>,
}

impl LayoutAuditEvent {
    fn new(stage: LayoutAuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

/// Builder helper to append fields ergonomically.
pub struct LayoutAuditEventBuilder {
    event: LayoutAuditEvent,
}

impl LayoutAuditEventBuilder {
    pub fn new(stage: LayoutAuditStage) -> Self {
        Self {
            event: LayoutAuditEvent::new(stage),
        }
    }

    pub fn detail(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.event.details.push((key.into(), value));
        self
    }

    pub fn finish(self) -> LayoutAuditEvent {
        self.event
    }
}

/// Trait implemented by any audit sink.
pub trait LayoutAudit: Send + Sync {
    fn record(&self, event: LayoutAuditEvent);
}

/// Default no-op implementation used when auditing is disabled.
#[derive(Debug, Default)]
pub struct NullLayoutAudit;

impl LayoutAudit for NullLayoutAudit {
    fn record(&self, _event: LayoutAuditEvent) {}
}

/// Keeps every record; handy for edit histories and tests.
#[derive(Debug, Default)]
pub struct BufferedLayoutAudit {
    events: Mutex<Vec<LayoutAuditEvent>>,
}

impl BufferedLayoutAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stages(&self) -> Vec<LayoutAuditStage> {
        self.events
            .lock()
            .map(|events| events.iter().map(|e| e.stage).collect())
            .unwrap_or_default()
    }

    pub fn events(&self) -> Vec<LayoutAuditEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl LayoutAudit for BufferedLayoutAudit {
    fn record(&self, event: LayoutAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

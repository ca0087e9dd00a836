use crate::logging::{LogEvent, LogFields, LogLevel};
use serde::Serialize;
use serde_json::json;

/// Counters accumulated by a layout session.
#[derive(Debug, Default, Clone)]
pub struct LayoutMetrics {
    packs: u64,
    reconciles: u64,
    merges: u64,
    splits: u64,
    rejected: u64,
    zones_added: u64,
    zones_removed: u64,
}

impl LayoutMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_pack(&mut self) {
        self.packs = self.packs.saturating_add(1);
    }

    pub fn record_reconcile(&mut self, added: usize, removed: usize) {
        self.reconciles = self.reconciles.saturating_add(1);
        self.zones_added = self.zones_added.saturating_add(added as u64);
        self.zones_removed = self.zones_removed.saturating_add(removed as u64);
    }

    pub fn record_merge(&mut self) {
        self.merges = self.merges.saturating_add(1);
    }

    pub fn record_split(&mut self) {
        self.splits = self.splits.saturating_add(1);
    }

    pub fn record_rejected(&mut self) {
        self.rejected = self.rejected.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            packs: self.packs,
            reconciles: self.reconciles,
            merges: self.merges,
            splits: self.splits,
            rejected: self.rejected,
            zones_added: self.zones_added,
            zones_removed: self.zones_removed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricSnapshot {
    pub packs: u64,
    pub reconciles: u64,
    pub merges: u64,
    pub splits: u64,
    pub rejected: u64,
    pub zones_added: u64,
    pub zones_removed: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::new(LogLevel::Info, target, "layout_metrics").extend_fields(self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("packs".to_string(), json!(self.packs));
        map.insert("reconciles".to_string(), json!(self.reconciles));
        map.insert("merges".to_string(), json!(self.merges));
        map.insert("splits".to_string(), json!(self.splits));
        map.insert("rejected".to_string(), json!(self.rejected));
        map.insert("zones_added".to_string(), json!(self.zones_added));
        map.insert("zones_removed".to_string(), json!(self.zones_removed));
        map
    }
}

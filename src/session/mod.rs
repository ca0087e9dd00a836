//! Layout editing session.
//!
//! `LayoutSession` owns the grid dimensions and the zone list for one display
//! and is the only thing that mutates them. Every command validates first,
//! then rebuilds the zone list, reconciles it against the grid and re-packs,
//! so after any successful command the placement tiles the grid exactly.
//! A rejected command leaves the session untouched.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Value, json};

use crate::audit::{LayoutAudit, LayoutAuditEventBuilder, LayoutAuditStage, NullLayoutAudit};
use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::geometry::{GridDims, Span};
use crate::layout::{PlacementMap, Reconciliation, merge, pack, reconcile, split};
use crate::logging::{LogEvent, LogLevel, Logger, json_kv};
use crate::metrics::{LayoutMetrics, MetricSnapshot};
use crate::registry::{PlacementRegistry, ZoneState};
use crate::render::TextPreview;
use crate::zone::{Zone, ZoneId, ZoneIdAllocator, ZonePayload};

/// Observability knobs for a session.
#[derive(Clone)]
pub struct SessionConfig {
    /// Optional structured logger.
    pub logger: Option<Logger>,
    /// Receives one record per command.
    pub audit: Arc<dyn LayoutAudit>,
    /// Target field used for session log events.
    pub log_target: String,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            logger: None,
            audit: Arc::new(NullLayoutAudit),
            log_target: "signage::layout.session".to_string(),
            metrics_target: "signage::layout.metrics".to_string(),
        }
    }
}

pub struct LayoutSession {
    dims: GridDims,
    zones: Vec<Zone>,
    ids: ZoneIdAllocator,
    placement: PlacementMap,
    registry: PlacementRegistry,
    metrics: LayoutMetrics,
    // Document fields the engine does not touch; zones and grid live above.
    document: LayoutConfig,
    config: SessionConfig,
}

impl LayoutSession {
    pub fn new(layout: LayoutConfig) -> Self {
        Self::with_config(layout, SessionConfig::default())
    }

    pub fn with_config(mut layout: LayoutConfig, config: SessionConfig) -> Self {
        let dims = layout.grid;
        let mut zones = std::mem::take(&mut layout.zones);
        let ids = assign_unique_ids(&mut zones);

        let mut session = Self {
            dims,
            zones: Vec::new(),
            ids,
            placement: pack(dims, &[]),
            registry: PlacementRegistry::new(),
            metrics: LayoutMetrics::new(),
            document: layout,
            config,
        };
        let details = session.commit(zones);
        session.emit(LayoutAuditStage::SessionOpened, "open", details);
        session
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(Self::new(LayoutConfig::from_json_str(raw)?))
    }

    pub fn config_mut(&mut self) -> &mut SessionConfig {
        &mut self.config
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn placement(&self) -> &PlacementMap {
        &self.placement
    }

    /// List index of the zone with `id`.
    pub fn index_of(&self, id: ZoneId) -> Option<usize> {
        self.zones.iter().position(|zone| zone.id == id)
    }

    /// Placed zones whose footprint or payload changed since the last call.
    pub fn take_dirty(&mut self) -> Vec<(ZoneId, ZoneState)> {
        self.registry.take_dirty()
    }

    /// Ids of zones that disappeared since the last call.
    pub fn take_removed(&mut self) -> Vec<ZoneId> {
        self.registry.take_removed()
    }

    pub fn metrics_snapshot(&self) -> MetricSnapshot {
        self.metrics.snapshot()
    }

    /// Log the current metrics snapshot.
    pub fn emit_metrics(&self) {
        if let Some(logger) = &self.config.logger {
            let event = self.metrics.snapshot().to_log_event(&self.config.metrics_target);
            let _ = logger.log_event(event);
        }
    }

    pub fn render_preview(&self, preview: &TextPreview) -> String {
        preview.render(&self.zones, &self.placement)
    }

    /// Current state as a persistable document.
    pub fn to_config(&self) -> LayoutConfig {
        LayoutConfig {
            grid: self.dims,
            zones: self.zones.clone(),
            ..self.document.clone()
        }
    }

    pub fn set_dimensions(&mut self, rows: u16, cols: u16) -> Result<&PlacementMap> {
        let dims = match GridDims::new(rows, cols) {
            Ok(dims) => dims,
            Err(err) => return Err(self.reject("set_dimensions", err)),
        };

        let previous = self.dims;
        self.dims = dims;
        let zones = std::mem::take(&mut self.zones);
        let mut details = self.commit(zones);
        details.push(json_kv(
            "from",
            json!([previous.rows(), previous.cols()]),
        ));
        details.push(json_kv("to", json!([rows, cols])));
        self.emit(LayoutAuditStage::DimensionsChanged, "set_dimensions", details);
        Ok(&self.placement)
    }

    /// Merge the zones at `selection` (list indices) into one spanning zone.
    pub fn apply_merge(&mut self, selection: &[usize]) -> Result<&PlacementMap> {
        let merged = match merge(&self.zones, &self.placement, selection) {
            Ok(zones) => zones,
            Err(err) => return Err(self.reject("merge", err)),
        };

        let removed = self.zones.len() - merged.len();
        self.metrics.record_merge();
        let mut details = self.commit(merged);
        details.push(json_kv("selection", json!(selection)));
        details.push(json_kv("merged_away", removed));
        self.emit(LayoutAuditStage::ZonesMerged, "merge", details);
        Ok(&self.placement)
    }

    /// Split the zone at `index` back into unit zones.
    ///
    /// The new units are inserted right after the target, so a later spanning
    /// zone can lose its fit. Reconciliation then resets it to 1x1 and the
    /// audit record counts it under `collapsed`.
    pub fn apply_split(&mut self, index: usize) -> Result<&PlacementMap> {
        let result = match split(self.dims, &self.zones, index, &mut self.ids) {
            Ok(zones) => zones,
            Err(err) => return Err(self.reject("split", err)),
        };

        let inserted = result.len() - self.zones.len();
        if inserted > 0 {
            self.metrics.record_split();
        }
        let mut details = self.commit(result);
        details.push(json_kv("index", index));
        details.push(json_kv("inserted", inserted));
        details.push(json_kv("changed", inserted > 0));
        self.emit(LayoutAuditStage::ZoneSplit, "split", details);
        Ok(&self.placement)
    }

    pub fn set_zone_span(
        &mut self,
        index: usize,
        row_span: u16,
        col_span: u16,
    ) -> Result<&PlacementMap> {
        if let Err(err) = self.check_index(index) {
            return Err(self.reject("set_zone_span", err));
        }

        let mut zones = self.zones.clone();
        zones[index].set_span(Span::new(row_span, col_span));
        let mut details = self.commit(zones);
        details.push(json_kv("index", index));
        details.push(json_kv("span", json!([row_span, col_span])));
        self.emit(LayoutAuditStage::ZoneEdited, "set_zone_span", details);
        Ok(&self.placement)
    }

    pub fn set_zone_payload(&mut self, index: usize, payload: ZonePayload) -> Result<&PlacementMap> {
        if let Err(err) = self.check_index(index) {
            return Err(self.reject("set_zone_payload", err));
        }

        let kind = payload.kind.as_str().to_string();
        let mut zones = self.zones.clone();
        zones[index].payload = payload;
        let mut details = self.commit(zones);
        details.push(json_kv("index", index));
        details.push(json_kv("type", kind));
        self.emit(LayoutAuditStage::ZoneEdited, "set_zone_payload", details);
        Ok(&self.placement)
    }

    /// Delete a zone. Reconciliation backfills the freed cells with blanks.
    pub fn remove_zone(&mut self, index: usize) -> Result<&PlacementMap> {
        if let Err(err) = self.check_index(index) {
            return Err(self.reject("remove_zone", err));
        }

        let mut zones = self.zones.clone();
        let gone = zones.remove(index);
        let mut details = self.commit(zones);
        details.push(json_kv("index", index));
        details.push(json_kv("zone_id", gone.id));
        self.emit(LayoutAuditStage::ZoneRemoved, "remove_zone", details);
        Ok(&self.placement)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.zones.len() {
            return Err(LayoutError::ZoneIndexOutOfRange {
                index,
                len: self.zones.len(),
            });
        }
        Ok(())
    }

    fn commit(&mut self, zones: Vec<Zone>) -> Vec<(String, Value)> {
        let Reconciliation {
            zones,
            kept,
            added,
            removed,
            collapsed,
        } = reconcile(self.dims, zones, &mut self.ids);
        self.metrics.record_reconcile(added, removed);

        self.placement = pack(self.dims, &zones);
        self.metrics.record_pack();
        self.zones = zones;
        self.registry.sync(&self.zones, &self.placement);
        debug_assert!(self.placement.is_exact_tiling());

        vec![
            json_kv("zones", self.zones.len()),
            json_kv("kept", kept),
            json_kv("added", added),
            json_kv("removed", removed),
            json_kv("collapsed", collapsed),
        ]
    }

    fn emit(&self, stage: LayoutAuditStage, command: &str, details: Vec<(String, Value)>) {
        if let Some(logger) = &self.config.logger {
            let event = LogEvent::new(LogLevel::Debug, &self.config.log_target, command)
                .extend_fields(details.iter().cloned());
            let _ = logger.log_event(event);
        }

        let mut builder = LayoutAuditEventBuilder::new(stage);
        builder.detail("command", json!(command));
        for (key, value) in details {
            builder.detail(key, value);
        }
        self.config.audit.record(builder.finish());
    }

    fn reject(&mut self, command: &str, err: LayoutError) -> LayoutError {
        self.metrics.record_rejected();
        let details = vec![
            json_kv("command", command),
            json_kv("reason", err.to_string()),
        ];

        if let Some(logger) = &self.config.logger {
            let event = LogEvent::new(LogLevel::Warn, &self.config.log_target, "command_rejected")
                .extend_fields(details.iter().cloned());
            let _ = logger.log_event(event);
        }

        let mut builder = LayoutAuditEventBuilder::new(LayoutAuditStage::CommandRejected);
        for (key, value) in details {
            builder.detail(key, value);
        }
        self.config.audit.record(builder.finish());
        err
    }
}

/// Give duplicate ids fresh values; returns an allocator past every id in use.
///
/// A list holding `ZoneId::MAX` leaves no room to allocate after it, so it is
/// renumbered in list order first.
fn assign_unique_ids(zones: &mut [Zone]) -> ZoneIdAllocator {
    if zones.iter().any(|zone| zone.id == ZoneId::MAX) {
        for (id, zone) in (0..).zip(zones.iter_mut()) {
            zone.id = id;
        }
    }
    let mut ids = ZoneIdAllocator::seeded_from(zones);
    let mut seen = HashSet::new();
    for zone in zones.iter_mut() {
        if !seen.insert(zone.id) {
            zone.id = ids.next_id();
            seen.insert(zone.id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::BufferedLayoutAudit;
    use crate::error::SelectionError;
    use crate::logging::MemorySink;
    use crate::zone::ZoneKind;

    fn grid(rows: u16, cols: u16, zones: Vec<Zone>) -> LayoutConfig {
        LayoutConfig {
            grid: GridDims::new(rows, cols).unwrap(),
            zones,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn opening_reconciles_short_zone_list() {
        let session = LayoutSession::new(grid(2, 3, vec![Zone::blank(0)]));
        assert_eq!(session.zones().len(), 6);
        assert!(session.placement().is_exact_tiling());
    }

    #[test]
    fn duplicate_ids_are_reassigned() {
        let raw = r#"{"grid":{"rows":1,"cols":3},"zones":[{"type":"clock"},{"type":"rss"},{"type":"iframe"}]}"#;
        let session = LayoutSession::from_json_str(raw).unwrap();
        let ids: Vec<_> = session.zones().iter().map(|z| z.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(session.zones()[1].payload.kind, ZoneKind::Rss);
    }

    #[test]
    fn max_id_forces_renumbering() {
        let zones = vec![Zone::blank(ZoneId::MAX), Zone::blank(5)];
        let mut session = LayoutSession::new(grid(1, 3, zones));
        let ids: Vec<_> = session.zones().iter().map(|z| z.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);

        session.set_dimensions(1, 5).unwrap();
        let ids: HashSet<_> = session.zones().iter().map(|z| z.id).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn zero_dimensions_leave_session_untouched() {
        let mut session = LayoutSession::new(LayoutConfig::default());
        let before = session.zones().to_vec();
        assert!(matches!(
            session.set_dimensions(0, 4),
            Err(LayoutError::InvalidDimensions { rows: 0, cols: 4 })
        ));
        assert_eq!(session.zones(), before.as_slice());
        assert_eq!(session.dims(), GridDims::default());
        assert_eq!(session.metrics_snapshot().rejected, 1);
    }

    #[test]
    fn rejected_merge_is_logged_and_audited() {
        let sink = MemorySink::new();
        let audit = Arc::new(BufferedLayoutAudit::new());
        let config = SessionConfig {
            logger: Some(Logger::new(sink.clone())),
            audit: audit.clone(),
            ..SessionConfig::default()
        };
        let mut session = LayoutSession::with_config(LayoutConfig::default(), config);

        let err = session.apply_merge(&[0, 3]).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidSelection(SelectionError::NotRectangular { .. })
        ));
        assert_eq!(
            audit.stages(),
            vec![LayoutAuditStage::SessionOpened, LayoutAuditStage::CommandRejected]
        );
        let events = sink.events();
        let last = events.last().unwrap();
        assert_eq!(last.level, LogLevel::Warn);
        assert_eq!(last.fields["command"], json!("merge"));

        let rejected = audit.events().pop().unwrap();
        assert_eq!(rejected.detail("command"), Some(&json!("merge")));
        assert!(rejected.detail("reason").is_some());
        assert_eq!(rejected.detail("collapsed"), None);
    }

    #[test]
    fn span_edit_reflows_following_zones() {
        let mut session = LayoutSession::new(LayoutConfig::default());
        session.set_zone_span(0, 1, 2).unwrap();
        assert_eq!(session.zones().len(), 3);
        // The RSS zone no longer fits and is dropped.
        assert_eq!(session.zones()[1].payload.kind, ZoneKind::Iframe);
        assert!(session.placement().is_exact_tiling());
    }

    #[test]
    fn payload_edit_marks_zone_dirty() {
        let mut session = LayoutSession::new(LayoutConfig::default());
        session.take_dirty();
        let payload = ZonePayload::blank().with_kind(ZoneKind::Weather);
        session.set_zone_payload(3, payload).unwrap();
        let dirty = session.take_dirty();
        assert_eq!(dirty.len(), 1);
        assert_eq!(dirty[0].1.payload.kind, ZoneKind::Weather);
    }

    #[test]
    fn remove_zone_backfills_with_blank() {
        let mut session = LayoutSession::new(LayoutConfig::default());
        session.take_removed();
        session.remove_zone(1).unwrap();
        assert_eq!(session.zones().len(), 4);
        assert!(session.zones()[3].payload.kind.is_empty());
        assert_eq!(session.take_removed(), vec![1]);
        assert!(session.remove_zone(9).is_err());
    }

    #[test]
    fn split_assigns_fresh_ids() {
        let mut session = LayoutSession::new(LayoutConfig::default());
        session.apply_merge(&[0, 1]).unwrap();
        session.apply_split(0).unwrap();
        let ids: Vec<_> = session.zones().iter().map(|z| z.id).collect();
        assert_eq!(ids, vec![0, 4, 2, 3]);
        assert_eq!(session.index_of(4), Some(1));
        assert_eq!(session.metrics_snapshot().splits, 1);
    }

    #[test]
    fn split_collapses_later_spanning_zone() {
        let audit = Arc::new(BufferedLayoutAudit::new());
        let config = SessionConfig {
            audit: audit.clone(),
            ..SessionConfig::default()
        };
        let zones = vec![Zone::blank(0).with_span(2, 1), Zone::blank(1).with_span(3, 3)];
        let mut session = LayoutSession::with_config(grid(2, 4, zones), config);
        assert_eq!(session.zones().len(), 2);

        session.apply_split(0).unwrap();
        let ids: Vec<_> = session.zones().iter().map(|z| z.id).collect();
        assert_eq!(ids, vec![0, 2, 1, 3, 4, 5, 6, 7]);
        assert!(session.zones().iter().all(|z| z.span() == Span::UNIT));
        assert!(session.placement().is_exact_tiling());

        let event = audit.events().pop().unwrap();
        assert_eq!(event.stage, LayoutAuditStage::ZoneSplit);
        assert_eq!(event.detail("inserted"), Some(&json!(1)));
        assert_eq!(event.detail("collapsed"), Some(&json!(1)));
        assert_eq!(event.detail("added"), Some(&json!(5)));
        assert_eq!(event.detail("changed"), Some(&json!(true)));
    }

    #[test]
    fn unit_split_reports_no_change() {
        let audit = Arc::new(BufferedLayoutAudit::new());
        let config = SessionConfig {
            audit: audit.clone(),
            ..SessionConfig::default()
        };
        let mut session = LayoutSession::with_config(LayoutConfig::default(), config);
        let before = session.zones().to_vec();
        session.apply_split(2).unwrap();
        assert_eq!(session.zones(), before.as_slice());
        assert_eq!(session.metrics_snapshot().splits, 0);
        let event = audit.events().pop().unwrap();
        assert_eq!(event.detail("changed"), Some(&json!(false)));
        assert_eq!(event.detail("inserted"), Some(&json!(0)));
    }

    #[test]
    fn to_config_keeps_document_fields() {
        let mut layout = LayoutConfig::default();
        layout.global_font = "Verdana".to_string();
        let mut session = LayoutSession::new(layout);
        session.set_dimensions(1, 2).unwrap();
        let saved = session.to_config();
        assert_eq!(saved.global_font, "Verdana");
        assert_eq!(saved.zones.len(), 2);
        assert_eq!((saved.grid.rows(), saved.grid.cols()), (1, 2));
    }

    #[test]
    fn metrics_snapshot_is_logged() {
        let sink = MemorySink::new();
        let mut session = LayoutSession::new(LayoutConfig::default());
        session.config_mut().logger = Some(Logger::new(sink.clone()));
        session.emit_metrics();
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].target, "signage::layout.metrics");
        assert_eq!(events[0].fields["packs"], json!(1));
    }
}

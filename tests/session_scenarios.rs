//! End-to-end layout scenarios through the public API.
//!
//! Exercises: pack → reconcile → merge/split → persisted config.

use signage_grid::{
    GridDims, LayoutConfig, LayoutError, LayoutSession, PlacementMap, SelectionError, Span, Zone,
    ZoneIdAllocator, ZoneKind, ZonePayload, pack, reconcile,
};

// ── Helpers ────────────────────────────────────────────────────────────

fn dims(rows: u16, cols: u16) -> GridDims {
    GridDims::new(rows, cols).unwrap()
}

fn units(count: u64) -> Vec<Zone> {
    (0..count).map(Zone::blank).collect()
}

fn session(rows: u16, cols: u16, zones: Vec<Zone>) -> LayoutSession {
    LayoutSession::new(LayoutConfig {
        grid: dims(rows, cols),
        zones,
        ..LayoutConfig::default()
    })
}

fn origins(map: &PlacementMap) -> Vec<(usize, usize)> {
    map.iter().map(|(_, p)| (p.area.row, p.area.col)).collect()
}

// ── Scenarios ──────────────────────────────────────────────────────────

#[test]
fn scenario_a_unit_zones_fill_row_major() {
    let map = pack(dims(2, 2), &units(4));
    assert_eq!(origins(&map), vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
}

#[test]
fn scenario_b_shrinking_grid_keeps_leading_zones() {
    let mut layout = session(3, 3, units(9));
    layout.set_dimensions(2, 2).unwrap();
    let ids: Vec<_> = layout.zones().iter().map(|z| z.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);
    assert!(layout.placement().is_exact_tiling());
}

#[test]
fn scenario_c_wide_zone_with_two_units() {
    let zones = vec![Zone::blank(0).with_span(1, 2), Zone::blank(1), Zone::blank(2)];
    let map = pack(dims(2, 2), &zones);
    assert_eq!(map.get(0).unwrap().area.col_span, 2);
    assert_eq!(origins(&map), vec![(0, 0), (1, 0), (1, 1)]);

    // A longer list is trimmed to exactly three entries.
    let mut long = zones.clone();
    long.push(Zone::blank(3));
    let mut ids = ZoneIdAllocator::seeded_from(&long);
    assert_eq!(reconcile(dims(2, 2), long, &mut ids).zones.len(), 3);
}

#[test]
fn scenario_d_merge_first_row() {
    let mut layout = session(2, 2, units(4));
    layout.apply_merge(&[0, 1]).unwrap();
    assert_eq!(layout.zones().len(), 3);
    assert_eq!(layout.zones()[0].span(), Span::new(1, 2));
    assert!(layout.placement().is_exact_tiling());
}

#[test]
fn scenario_e_diagonal_merge_rejected_without_mutation() {
    let mut layout = session(2, 2, units(4));
    let before = layout.zones().to_vec();
    let err = layout.apply_merge(&[0, 3]).unwrap_err();
    assert!(matches!(
        err,
        LayoutError::InvalidSelection(SelectionError::NotRectangular { .. })
    ));
    assert_eq!(layout.zones(), before.as_slice());
}

// ── Properties ─────────────────────────────────────────────────────────

#[test]
fn unit_zones_always_tile() {
    for rows in 1..=6u16 {
        for cols in 1..=6u16 {
            let grid = dims(rows, cols);
            let map = pack(grid, &units(grid.cell_count() as u64));
            assert!(map.coverage().iter().all(|count| *count == 1));
        }
    }
}

#[test]
fn oversized_row_span_is_clamped_to_grid() {
    let grid = dims(3, 4);
    let zones = vec![Zone::blank(0).with_span(3 + 5, 1)];
    assert_eq!(pack(grid, &zones).get(0).unwrap().area.row_span, 3);
}

#[test]
fn reconcile_twice_equals_once() {
    let zones = vec![
        Zone::blank(0).with_span(2, 2),
        Zone::blank(1).with_span(1, 3),
        Zone::blank(2),
        Zone::blank(3).with_span(4, 1),
    ];
    for (rows, cols) in [(1, 1), (2, 3), (3, 3), (4, 5)] {
        let grid = dims(rows, cols);
        let mut ids = ZoneIdAllocator::seeded_from(&zones);
        let once = reconcile(grid, zones.clone(), &mut ids).zones;
        let twice = reconcile(grid, once.clone(), &mut ids).zones;
        assert_eq!(once, twice, "{rows}x{cols}");
        assert!(pack(grid, &once).is_exact_tiling(), "{rows}x{cols}");
    }
}

#[test]
fn merge_then_split_yields_four_zones_again() {
    let mut layout = session(2, 2, units(4));
    layout.apply_merge(&[0, 1, 2, 3]).unwrap();
    assert_eq!(layout.zones().len(), 1);
    layout.apply_split(0).unwrap();
    assert_eq!(layout.zones().len(), 4);
    assert_eq!(layout.zones()[0].id, 0);
    assert!(layout.zones()[1..].iter().all(|z| z.payload.kind.is_empty()));
    assert!(layout.placement().is_exact_tiling());
}

#[test]
fn every_command_keeps_exact_tiling() {
    let mut layout = LayoutSession::new(LayoutConfig::default());
    layout.set_dimensions(3, 4).unwrap();
    layout.apply_merge(&[5, 6, 9, 10]).unwrap();
    layout.set_zone_span(0, 2, 2).unwrap();
    layout.set_dimensions(4, 3).unwrap();
    layout.apply_split(0).unwrap();
    layout.remove_zone(2).unwrap();
    layout.set_dimensions(1, 1).unwrap();
    assert!(layout.placement().is_exact_tiling());
    assert_eq!(layout.zones().len(), 1);
    assert_eq!(layout.zones()[0].payload.kind, ZoneKind::Clock);
}

#[test]
fn merged_payload_survives_persistence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("display.json");

    let mut layout = LayoutSession::new(LayoutConfig::default());
    layout.apply_merge(&[1, 3]).unwrap();
    layout
        .set_zone_payload(0, ZonePayload::blank().with_kind(ZoneKind::Weather))
        .unwrap();
    layout.to_config().save(&path).unwrap();

    let reopened = LayoutSession::new(LayoutConfig::load(&path).unwrap());
    assert_eq!(reopened.zones(), layout.zones());
    assert_eq!(reopened.zones()[1].span(), Span::new(2, 1));
    assert_eq!(reopened.placement(), layout.placement());
}

use std::collections::{HashMap, HashSet};

use blake3::{Hash, Hasher};

use crate::geometry::Footprint;
use crate::layout::PlacementMap;
use crate::zone::{Zone, ZoneId, ZonePayload};

/// Last known render state of a placed zone.
#[derive(Debug, Clone)]
pub struct ZoneState {
    pub index: usize,
    pub area: Footprint,
    pub payload: ZonePayload,
    digest: Hash,
    pub is_dirty: bool,
}

impl ZoneState {
    fn new(index: usize, area: Footprint, payload: &ZonePayload) -> Self {
        Self {
            index,
            area,
            payload: payload.clone(),
            digest: payload_digest(payload),
            is_dirty: true,
        }
    }

    fn update(&mut self, index: usize, area: Footprint, payload: &ZonePayload) -> bool {
        let digest = payload_digest(payload);
        let changed = self.index != index || self.area != area || self.digest != digest;
        if changed {
            self.index = index;
            self.area = area;
            self.payload = payload.clone();
            self.digest = digest;
            self.is_dirty = true;
        }
        changed
    }
}

fn payload_digest(payload: &ZonePayload) -> Hash {
    let mut hasher = Hasher::new();
    // Writing JSON into a hasher cannot fail for plain payload data.
    let _ = serde_json::to_writer(&mut hasher, payload);
    hasher.finalize()
}

/// Tracks which placed zones changed since the renderer last looked.
#[derive(Debug, Default)]
pub struct PlacementRegistry {
    entries: HashMap<ZoneId, ZoneState>,
    dirty: HashSet<ZoneId>,
    removed: HashSet<ZoneId>,
}

impl PlacementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync(&mut self, zones: &[Zone], placement: &PlacementMap) {
        use std::collections::hash_map::Entry;

        let mut seen = HashSet::new();
        for (index, placed) in placement.iter() {
            let Some(zone) = zones.get(index) else {
                continue;
            };
            seen.insert(zone.id);
            match self.entries.entry(zone.id) {
                Entry::Occupied(mut entry) => {
                    if entry.get_mut().update(index, placed.area, &zone.payload) {
                        self.dirty.insert(zone.id);
                    }
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(ZoneState::new(index, placed.area, &zone.payload));
                    self.removed.remove(&zone.id);
                    self.dirty.insert(zone.id);
                }
            }
        }

        // Forget zones that are gone or no longer placed.
        let stale: Vec<_> = self
            .entries
            .keys()
            .filter(|id| !seen.contains(*id))
            .copied()
            .collect();
        for id in stale {
            self.entries.remove(&id);
            self.dirty.remove(&id);
            self.removed.insert(id);
        }
    }

    /// Drain changed zones in list order.
    pub fn take_dirty(&mut self) -> Vec<(ZoneId, ZoneState)> {
        let mut changed: Vec<_> = self
            .dirty
            .drain()
            .filter_map(|id| {
                self.entries.get_mut(&id).map(|state| {
                    state.is_dirty = false;
                    (id, state.clone())
                })
            })
            .collect();
        changed.sort_by_key(|(_, state)| state.index);
        changed
    }

    /// Drain ids of zones dropped since the last call.
    pub fn take_removed(&mut self) -> Vec<ZoneId> {
        let mut ids: Vec<_> = self.removed.drain().collect();
        ids.sort_unstable();
        ids
    }

    pub fn area_of(&self, zone_id: ZoneId) -> Option<Footprint> {
        self.entries.get(&zone_id).map(|state| state.area)
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

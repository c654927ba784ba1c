//! In-memory mirror of backend-reported fleet state
//!
//! Pure data sink. Pollers and the command dispatcher write whole payloads
//! into it; the presentation layer reads snapshots out of it. There is no
//! merging and no change detection: each replace is atomic and wholesale,
//! so replaying an identical payload leaves the observable state unchanged.

use crate::model::{SessionRecord, StationMap};
use std::sync::RwLock;

#[derive(Debug, Default)]
struct FleetState {
    stations: StationMap,
    sessions: Vec<SessionRecord>,
}

/// Shared mirror of stations and recent sessions
#[derive(Debug, Default)]
pub struct FleetRegistry {
    inner: RwLock<FleetState>,
}

impl FleetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole station map with a freshly fetched one
    pub fn replace_stations(&self, stations: StationMap) {
        if let Ok(mut guard) = self.inner.write() {
            guard.stations = stations;
        }
    }

    /// Replace the whole session list with a freshly fetched one
    pub fn replace_sessions(&self, sessions: Vec<SessionRecord>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.sessions = sessions;
        }
    }

    /// Discard all mirrored state; used when the session ends
    pub fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.stations.clear();
            guard.sessions.clear();
        }
    }

    /// Snapshot of the station map
    pub fn stations(&self) -> StationMap {
        self.inner
            .read()
            .map(|guard| guard.stations.clone())
            .unwrap_or_default()
    }

    /// Snapshot of the session list, in backend order
    pub fn sessions(&self) -> Vec<SessionRecord> {
        self.inner
            .read()
            .map(|guard| guard.sessions.clone())
            .unwrap_or_default()
    }

    /// Number of mirrored stations
    pub fn station_count(&self) -> usize {
        self.inner.read().map(|guard| guard.stations.len()).unwrap_or(0)
    }
}

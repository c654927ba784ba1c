#![allow(dead_code)]

//! Shared test doubles: a scriptable in-memory backend and auth helpers.

use chrono::{TimeZone, Utc};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use voltboard::api::BackendApi;
use voltboard::auth::AuthSessionManager;
use voltboard::error::{Result, VoltboardError};
use voltboard::model::{SessionRecord, Station, StationMap, StationStatus};
use voltboard::persistence::TokenStore;

/// In-memory stand-in for the fleet backend, recording every call
#[derive(Default)]
pub struct ScriptedBackend {
    calls: Mutex<Vec<String>>,
    stations: Mutex<StationMap>,
    sessions: Mutex<Vec<SessionRecord>>,
    /// Fail this many station fetches with a network error first
    stations_failures: AtomicUsize,
    /// Answer the next sessions fetch the way a 401 would
    sessions_unauthorized: AtomicBool,
    auth: Mutex<Option<Arc<AuthSessionManager>>>,
    command_hold_ms: AtomicU64,
    commands_in_flight: AtomicUsize,
    max_commands_in_flight: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_stations(&self, stations: StationMap) {
        *self.stations.lock().unwrap() = stations;
    }

    pub fn set_sessions(&self, sessions: Vec<SessionRecord>) {
        *self.sessions.lock().unwrap() = sessions;
    }

    pub fn fail_station_fetches(&self, count: usize) {
        self.stations_failures.store(count, Ordering::SeqCst);
    }

    /// Make the next sessions fetch behave like a 401: the auth side
    /// effect fires and the call returns an expired error, exactly what
    /// the REST facade does.
    pub fn reject_next_sessions_fetch(&self, auth: Arc<AuthSessionManager>) {
        *self.auth.lock().unwrap() = Some(auth);
        self.sessions_unauthorized.store(true, Ordering::SeqCst);
    }

    pub fn hold_commands_ms(&self, ms: u64) {
        self.command_hold_ms.store(ms, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn max_commands_in_flight(&self) -> usize {
        self.max_commands_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    async fn enter_command(&self) {
        let n = self.commands_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_commands_in_flight.fetch_max(n, Ordering::SeqCst);
        let hold = self.command_hold_ms.load(Ordering::SeqCst);
        if hold > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(hold)).await;
        }
    }

    fn leave_command(&self) {
        self.commands_in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl BackendApi for ScriptedBackend {
    async fn fetch_stations(&self) -> Result<StationMap> {
        self.record("stations".to_string());
        let remaining = self.stations_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.stations_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(VoltboardError::network("connection refused"));
        }
        Ok(self.stations.lock().unwrap().clone())
    }

    async fn fetch_sessions(&self) -> Result<Vec<SessionRecord>> {
        self.record("sessions".to_string());
        if self.sessions_unauthorized.swap(false, Ordering::SeqCst) {
            if let Some(auth) = self.auth.lock().unwrap().clone() {
                auth.handle_unauthorized();
            }
            return Err(VoltboardError::expired("/sessions answered 401"));
        }
        Ok(self.sessions.lock().unwrap().clone())
    }

    async fn start_charging(&self, station_id: &str, car_id: &str) -> Result<()> {
        self.record(format!("start {} {}", station_id, car_id));
        self.enter_command().await;
        // Mirror what the backend does: the bay becomes occupied
        if let Some(station) = self.stations.lock().unwrap().get_mut(station_id) {
            station.status = StationStatus::Other("occupied".to_string());
            station.car_id = Some(car_id.to_string());
            station.is_charging = true;
        }
        self.leave_command();
        Ok(())
    }

    async fn stop_charging(&self, station_id: &str) -> Result<()> {
        self.record(format!("stop {}", station_id));
        self.enter_command().await;
        if let Some(station) = self.stations.lock().unwrap().get_mut(station_id) {
            station.status = StationStatus::Available;
            station.car_id = None;
            station.current_kwh = 0.0;
            station.is_charging = false;
        }
        self.leave_command();
        Ok(())
    }
}

pub fn station(status: StationStatus, car_id: Option<&str>, current_kwh: f64) -> Station {
    Station {
        status,
        car_id: car_id.map(|s| s.to_string()),
        current_kwh,
        is_charging: false,
    }
}

pub fn available_station() -> Station {
    station(StationStatus::Available, None, 0.0)
}

pub fn session_record(id: i64, station_id: &str, car_id: &str, active: bool) -> SessionRecord {
    SessionRecord {
        id,
        station_id: station_id.to_string(),
        car_id: car_id.to_string(),
        start_time: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
        end_time: if active {
            None
        } else {
            Some(Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap())
        },
        kwh_delivered: 12.5,
        is_active: active,
    }
}

/// Auth manager with a token already installed, restored from disk the
/// same way a reloaded dashboard would restore it.
pub fn signed_in_auth(token_file: &Path) -> Arc<AuthSessionManager> {
    let path = token_file.to_string_lossy().to_string();
    TokenStore::new(&path).save("test-token").unwrap();
    Arc::new(AuthSessionManager::new("http://127.0.0.1:9", TokenStore::new(&path)).unwrap())
}

/// Auth manager with no session
pub fn signed_out_auth(token_file: &Path) -> Arc<AuthSessionManager> {
    let path = token_file.to_string_lossy().to_string();
    Arc::new(AuthSessionManager::new("http://127.0.0.1:9", TokenStore::new(&path)).unwrap())
}

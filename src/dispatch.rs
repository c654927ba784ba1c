//! Start/stop charging command dispatch
//!
//! Commands mutate backend state, so every completed command is followed by
//! an awaited out-of-band station re-fetch; the mirror afterwards reflects
//! backend truth from after the command, not before it.
//!
//! Command failures are logged and swallowed: the operator sees the outcome
//! through the refreshed station grid, not through an error surface. The
//! global busy flag is a UI-binding gate only; actual exclusion is per
//! station, through an in-memory lock map, so two commands against the same
//! bay can never interleave even when invoked programmatically.

use crate::api::BackendApi;
use crate::logging::get_logger;
use crate::registry::FleetRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Issues charging commands and refreshes the mirror afterwards
pub struct CommandDispatcher {
    api: Arc<dyn BackendApi>,
    registry: Arc<FleetRegistry>,
    busy: AtomicBool,
    car_entry: std::sync::RwLock<String>,
    station_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    logger: crate::logging::StructuredLogger,
}

impl CommandDispatcher {
    pub fn new(api: Arc<dyn BackendApi>, registry: Arc<FleetRegistry>) -> Self {
        let logger = get_logger("dispatch");

        Self {
            api,
            registry,
            busy: AtomicBool::new(false),
            car_entry: std::sync::RwLock::new(String::new()),
            station_locks: Mutex::new(HashMap::new()),
            logger,
        }
    }

    /// Whether a command is in flight; the presentation layer disables its
    /// controls while this is set
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Store the operator's car-id entry for the next start command
    pub fn set_car_entry(&self, value: &str) {
        if let Ok(mut guard) = self.car_entry.write() {
            *guard = value.to_string();
        }
    }

    /// Read the current car-id entry
    pub fn car_entry(&self) -> String {
        self.car_entry.read().map(|g| g.clone()).unwrap_or_default()
    }

    /// Start charging `car_id` at `station_id`
    ///
    /// A blank station or car id makes the whole call a silent no-op: no
    /// network traffic, no state change. Otherwise the stored car-id entry
    /// is cleared on dispatch, before the outcome is known.
    pub async fn start_charging(&self, station_id: &str, car_id: &str) {
        if station_id.is_empty() || car_id.is_empty() {
            self.logger
                .debug("Start command skipped, station or car id missing");
            return;
        }

        self.busy.store(true, Ordering::SeqCst);
        self.set_car_entry("");

        let lock = self.station_lock(station_id).await;
        let _guard = lock.lock().await;

        if let Err(e) = self.api.start_charging(station_id, car_id).await {
            self.logger.error(&format!(
                "Start command failed on station {}: {}",
                station_id, e
            ));
        }

        self.refresh_stations().await;
        self.busy.store(false, Ordering::SeqCst);
    }

    /// Stop charging at `station_id`
    pub async fn stop_charging(&self, station_id: &str) {
        self.busy.store(true, Ordering::SeqCst);

        let lock = self.station_lock(station_id).await;
        let _guard = lock.lock().await;

        if let Err(e) = self.api.stop_charging(station_id).await {
            self.logger.error(&format!(
                "Stop command failed on station {}: {}",
                station_id, e
            ));
        }

        self.refresh_stations().await;
        self.busy.store(false, Ordering::SeqCst);
    }

    /// Out-of-band station refresh after a command settles
    async fn refresh_stations(&self) {
        match self.api.fetch_stations().await {
            Ok(stations) => self.registry.replace_stations(stations),
            Err(e) => {
                self.logger
                    .warn(&format!("Post-command station refresh failed: {}", e));
            }
        }
    }

    async fn station_lock(&self, station_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.station_locks.lock().await;
        locks
            .entry(station_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

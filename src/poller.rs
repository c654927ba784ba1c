//! Periodic state synchronization against the backend
//!
//! One poller instance exists per signed-in session. On entry it runs a
//! single sequential cycle (stations awaited before sessions), then arms a
//! repeating ticker. Every later tick launches both fetches concurrently
//! without waiting for the previous tick to finish; a slow response may
//! overlap a later one, and the last response to land wins the mirror.
//!
//! The poller ends itself when the auth state flips to signed out, whether
//! from an explicit logout or from a 401 observed by the API facade. A tick
//! that fires after sign-out performs no network call.

use crate::api::BackendApi;
use crate::auth::AuthState;
use crate::logging::{StructuredLogger, get_logger};
use crate::registry::FleetRegistry;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, interval};

/// Driver of the poll cadence for one authenticated session
pub struct StatePoller {
    api: Arc<dyn BackendApi>,
    registry: Arc<FleetRegistry>,
    auth_rx: watch::Receiver<AuthState>,
    interval_ms: u64,
    logger: StructuredLogger,
}

impl StatePoller {
    pub fn new(
        api: Arc<dyn BackendApi>,
        registry: Arc<FleetRegistry>,
        auth_rx: watch::Receiver<AuthState>,
        interval_ms: u64,
    ) -> Self {
        let logger = get_logger("poller");

        Self {
            api,
            registry,
            auth_rx,
            interval_ms,
            logger,
        }
    }

    /// Spawn the poll loop onto the runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run the poll loop until the session ends
    pub async fn run(mut self) {
        if *self.auth_rx.borrow() != AuthState::SignedIn {
            self.logger.debug("Not signed in, poller exiting");
            return;
        }

        self.logger
            .info(&format!("Polling started, interval {} ms", self.interval_ms));

        // Initial cycle: stations first, sessions only after it settled
        fetch_stations_into(&self.api, &self.registry, &self.logger).await;
        if *self.auth_rx.borrow() == AuthState::SignedIn {
            fetch_sessions_into(&self.api, &self.registry, &self.logger).await;
        }

        let mut ticker = interval(Duration::from_millis(self.interval_ms));
        // Consume the immediate first tick; the initial cycle covered it
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if *self.auth_rx.borrow() != AuthState::SignedIn {
                        break;
                    }
                    // Both fetches run concurrently and detached from the
                    // schedule; an in-flight pair is never canceled by the
                    // next tick
                    let api = Arc::clone(&self.api);
                    let registry = Arc::clone(&self.registry);
                    let logger = self.logger.clone();
                    tokio::spawn(async move {
                        fetch_stations_into(&api, &registry, &logger).await;
                    });
                    let api = Arc::clone(&self.api);
                    let registry = Arc::clone(&self.registry);
                    let logger = self.logger.clone();
                    tokio::spawn(async move {
                        fetch_sessions_into(&api, &registry, &logger).await;
                    });
                }
                changed = self.auth_rx.changed() => {
                    match changed {
                        Ok(()) => {
                            if *self.auth_rx.borrow() != AuthState::SignedIn {
                                break;
                            }
                        }
                        // Auth manager gone; nothing left to poll for
                        Err(_) => break,
                    }
                }
            }
        }

        self.logger.info("Polling stopped");
    }
}

/// Fetch the station map and replace the mirror; failures skip the tick
async fn fetch_stations_into(
    api: &Arc<dyn BackendApi>,
    registry: &Arc<FleetRegistry>,
    logger: &StructuredLogger,
) {
    match api.fetch_stations().await {
        Ok(stations) => registry.replace_stations(stations),
        Err(e) if e.is_transient() => {
            logger.warn(&format!("Station fetch failed, tick skipped: {}", e));
        }
        Err(e) => {
            // Expired: the facade already ended the session
            logger.debug(&format!("Station fetch ended: {}", e));
        }
    }
}

/// Fetch the session list and replace the mirror; failures skip the tick
async fn fetch_sessions_into(
    api: &Arc<dyn BackendApi>,
    registry: &Arc<FleetRegistry>,
    logger: &StructuredLogger,
) {
    match api.fetch_sessions().await {
        Ok(sessions) => registry.replace_sessions(sessions),
        Err(e) if e.is_transient() => {
            logger.warn(&format!("Session fetch failed, tick skipped: {}", e));
        }
        Err(e) => {
            logger.debug(&format!("Session fetch ended: {}", e));
        }
    }
}

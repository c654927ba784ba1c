//! Backend API surface consumed by the console
//!
//! The trait is the seam between the synchronization logic and the wire:
//! production code uses the reqwest-backed [`rest::RestClient`], tests
//! substitute an in-memory fake.

pub mod rest;

pub use rest::RestClient;

use crate::error::Result;
use crate::model::{SessionRecord, StationMap};

/// Authorized operations against the fleet backend
#[async_trait::async_trait]
pub trait BackendApi: Send + Sync {
    /// Fetch the full station map; the result replaces the mirror wholesale
    async fn fetch_stations(&self) -> Result<StationMap>;

    /// Fetch the recent-session list, most recent first as the backend
    /// returns it
    async fn fetch_sessions(&self) -> Result<Vec<SessionRecord>>;

    /// Ask the backend to start charging a car at a station
    async fn start_charging(&self, station_id: &str, car_id: &str) -> Result<()>;

    /// Ask the backend to stop charging at a station
    async fn stop_charging(&self, station_id: &str) -> Result<()>;
}

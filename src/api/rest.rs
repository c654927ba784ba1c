//! Reqwest-backed implementation of the backend API
//!
//! The client binds the base address only. The bearer token is read from
//! the auth manager on every single request, never captured at
//! construction, so a token change is visible to the very next call.

use crate::auth::AuthSessionManager;
use crate::error::{Result, VoltboardError};
use crate::logging::get_logger;
use crate::model::{SessionRecord, StationMap};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct StartChargingRequest<'a> {
    station_id: &'a str,
    car_id: &'a str,
}

#[derive(Debug, Serialize)]
struct StopChargingRequest<'a> {
    station_id: &'a str,
}

/// HTTP client facade over the fleet backend
pub struct RestClient {
    base_url: String,
    http: reqwest::Client,
    auth: Arc<AuthSessionManager>,
    sessions_limit: u32,
    logger: crate::logging::StructuredLogger,
}

impl RestClient {
    /// Create a client bound to the backend base address
    pub fn new(
        base_url: &str,
        sessions_limit: u32,
        auth: Arc<AuthSessionManager>,
    ) -> Result<Self> {
        let logger = get_logger("api");
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| VoltboardError::network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            auth,
            sessions_limit,
            logger,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the current token and send, mapping an unauthorized answer to
    /// the session-ending side effect.
    async fn send_authorized(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let token = self
            .auth
            .current_token()
            .ok_or_else(|| VoltboardError::expired("no token installed"))?;

        let resp = req.bearer_auth(token).send().await?;

        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.auth.handle_unauthorized();
            return Err(VoltboardError::expired(format!(
                "{} answered 401",
                resp.url().path()
            )));
        }
        if !resp.status().is_success() {
            return Err(VoltboardError::api(format!(
                "{} answered {}",
                resp.url().path(),
                resp.status()
            )));
        }

        Ok(resp)
    }
}

#[async_trait::async_trait]
impl super::BackendApi for RestClient {
    async fn fetch_stations(&self) -> Result<StationMap> {
        let resp = self
            .send_authorized(self.http.get(self.url("/stations")))
            .await?;
        let stations: StationMap = resp.json().await?;
        self.logger
            .debug(&format!("Fetched {} stations", stations.len()));
        Ok(stations)
    }

    async fn fetch_sessions(&self) -> Result<Vec<SessionRecord>> {
        let resp = self
            .send_authorized(
                self.http
                    .get(self.url("/sessions"))
                    .query(&[("limit", self.sessions_limit)]),
            )
            .await?;
        let sessions: Vec<SessionRecord> = resp.json().await?;
        self.logger
            .debug(&format!("Fetched {} sessions", sessions.len()));
        Ok(sessions)
    }

    async fn start_charging(&self, station_id: &str, car_id: &str) -> Result<()> {
        let body = StartChargingRequest { station_id, car_id };
        self.send_authorized(
            self.http
                .post(self.url(&format!("/stations/{}/start_charging", station_id)))
                .json(&body),
        )
        .await?;
        self.logger.info(&format!(
            "Requested charging start on station {} for car {}",
            station_id, car_id
        ));
        Ok(())
    }

    async fn stop_charging(&self, station_id: &str) -> Result<()> {
        let body = StopChargingRequest { station_id };
        self.send_authorized(
            self.http
                .post(self.url(&format!("/stations/{}/stop_charging", station_id)))
                .json(&body),
        )
        .await?;
        self.logger
            .info(&format!("Requested charging stop on station {}", station_id));
        Ok(())
    }
}

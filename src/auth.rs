//! Operator authentication and session lifecycle
//!
//! `AuthSessionManager` is the sole writer of the bearer token: it installs
//! the token on login, clears it on logout, and broadcasts the signed-in /
//! signed-out transition so the poller can start and stop with it. Every
//! other component only reads the current token through it.

use crate::error::{Result, VoltboardError};
use crate::logging::get_logger;
use crate::persistence::TokenStore;
use serde::Deserialize;
use std::sync::RwLock;
use tokio::sync::watch;

/// Authentication state, broadcast on every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No token; nothing may be fetched
    SignedOut,
    /// A token is installed and attached to authorized requests
    SignedIn,
}

/// Token endpoint response body
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Owner of the bearer token and its persisted copy
pub struct AuthSessionManager {
    base_url: String,
    http: reqwest::Client,
    store: TokenStore,
    token: RwLock<Option<String>>,
    state_tx: watch::Sender<AuthState>,
    state_rx: watch::Receiver<AuthState>,
    logger: crate::logging::StructuredLogger,
}

impl AuthSessionManager {
    /// Create a manager bound to the backend token endpoint
    ///
    /// A token persisted by a previous run is restored here, so a restart
    /// resumes the session without a new login.
    pub fn new(base_url: &str, store: TokenStore) -> Result<Self> {
        let logger = get_logger("auth");
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| VoltboardError::network(e.to_string()))?;

        let restored = store.load();
        let initial = if restored.is_some() {
            AuthState::SignedIn
        } else {
            AuthState::SignedOut
        };
        let (state_tx, state_rx) = watch::channel(initial);

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            store,
            token: RwLock::new(restored),
            state_tx,
            state_rx,
            logger,
        })
    }

    /// Submit credentials to the backend token endpoint
    ///
    /// The request is form-encoded. Any non-2xx answer is an invalid-login
    /// rejection; there is no retry. On success the issued token is
    /// persisted, installed, and returned.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let url = format!("{}/token", self.base_url);
        let resp = self
            .http
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        if !resp.status().is_success() {
            self.logger
                .warn(&format!("Login rejected for '{}': {}", username, resp.status()));
            return Err(VoltboardError::invalid_credentials(format!(
                "login rejected with status {}",
                resp.status()
            )));
        }

        let body: TokenResponse = resp.json().await?;
        self.install_token(body.access_token.clone());
        self.logger.info(&format!("Operator '{}' signed in", username));
        Ok(body.access_token)
    }

    /// Clear the session, unconditionally and without a backend call
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            self.logger
                .warn(&format!("Failed to clear persisted token: {}", e));
        }
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
        self.state_tx.send(AuthState::SignedOut).ok();
        self.logger.info("Signed out");
    }

    /// Entry point for the 401 side effect: any authorized call that comes
    /// back unauthorized ends the session. This is the sole automatic
    /// expiry mechanism; there is no token refresh.
    pub fn handle_unauthorized(&self) {
        if self.is_authenticated() {
            self.logger.warn("Backend rejected the token, signing out");
            self.logout();
        }
    }

    /// Read the current token, if any
    pub fn current_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    /// Whether a token is currently installed
    pub fn is_authenticated(&self) -> bool {
        self.token.read().map(|g| g.is_some()).unwrap_or(false)
    }

    /// Subscribe to signed-in / signed-out transitions
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state_rx.clone()
    }

    fn install_token(&self, token: String) {
        if let Err(e) = self.store.save(&token) {
            self.logger
                .warn(&format!("Token not persisted, session will not survive restart: {}", e));
        }
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token);
        }
        self.state_tx.send(AuthState::SignedIn).ok();
    }
}

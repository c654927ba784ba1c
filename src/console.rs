//! Composition root for the operator console
//!
//! Wires the auth manager, API facade, registry, dispatcher and poller
//! together and owns the poller lifecycle: exactly one poller runs per
//! signed-in session, and none survives a sign-out.

use crate::api::{BackendApi, RestClient};
use crate::auth::AuthSessionManager;
use crate::config::Config;
use crate::dispatch::CommandDispatcher;
use crate::error::Result;
use crate::logging::get_logger;
use crate::persistence::TokenStore;
use crate::poller::StatePoller;
use crate::registry::FleetRegistry;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// The assembled client core
pub struct OperatorConsole {
    config: Config,
    auth: Arc<AuthSessionManager>,
    api: Arc<dyn BackendApi>,
    registry: Arc<FleetRegistry>,
    dispatcher: CommandDispatcher,
    poller_task: Mutex<Option<JoinHandle<()>>>,
    signout_watch: JoinHandle<()>,
    logger: crate::logging::StructuredLogger,
}

impl OperatorConsole {
    /// Build the console from configuration, with the REST backend facade
    pub fn new(config: Config) -> Result<Self> {
        let store = TokenStore::new(&config.auth.token_file);
        let auth = Arc::new(AuthSessionManager::new(&config.backend.base_url, store)?);
        let api: Arc<dyn BackendApi> = Arc::new(RestClient::new(
            &config.backend.base_url,
            config.backend.sessions_limit,
            Arc::clone(&auth),
        )?);

        Ok(Self::assemble(config, auth, api))
    }

    /// Build the console around an existing backend facade
    pub fn with_backend(
        config: Config,
        auth: Arc<AuthSessionManager>,
        api: Arc<dyn BackendApi>,
    ) -> Self {
        Self::assemble(config, auth, api)
    }

    fn assemble(config: Config, auth: Arc<AuthSessionManager>, api: Arc<dyn BackendApi>) -> Self {
        let logger = get_logger("console");
        let registry = Arc::new(FleetRegistry::new());
        let dispatcher = CommandDispatcher::new(Arc::clone(&api), Arc::clone(&registry));

        // Mirrored entities live exactly as long as the session: any
        // sign-out, explicit or 401-driven, discards them
        let signout_watch = {
            let registry = Arc::clone(&registry);
            let mut auth_rx = auth.subscribe();
            tokio::spawn(async move {
                while auth_rx.changed().await.is_ok() {
                    if *auth_rx.borrow() == crate::auth::AuthState::SignedOut {
                        registry.clear();
                    }
                }
            })
        };

        Self {
            config,
            auth,
            api,
            registry,
            dispatcher,
            poller_task: Mutex::new(None),
            signout_watch,
            logger,
        }
    }

    /// Submit credentials; on success polling starts immediately
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.auth.login(username, password).await?;
        self.start_polling();
        Ok(())
    }

    /// Resume a session restored from the persisted token
    ///
    /// Returns whether a session was resumed; polling starts when it was.
    pub fn resume(&self) -> bool {
        if self.auth.is_authenticated() {
            self.logger.info("Resuming persisted session");
            self.start_polling();
            true
        } else {
            false
        }
    }

    /// End the session: token cleared, poller stopped, mirror discarded
    pub fn logout(&self) {
        self.auth.logout();
        self.stop_polling();
        self.registry.clear();
    }

    /// Whether an operator session is active
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    pub fn auth(&self) -> &Arc<AuthSessionManager> {
        &self.auth
    }

    pub fn registry(&self) -> &Arc<FleetRegistry> {
        &self.registry
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stop background work; called on process shutdown
    pub fn shutdown(&self) {
        self.stop_polling();
    }

    fn start_polling(&self) {
        let poller = StatePoller::new(
            Arc::clone(&self.api),
            Arc::clone(&self.registry),
            self.auth.subscribe(),
            self.config.poll_interval_ms,
        );

        if let Ok(mut guard) = self.poller_task.lock() {
            // A previous poller must never stay active alongside a new one
            if let Some(task) = guard.take() {
                task.abort();
            }
            *guard = Some(poller.spawn());
        }
    }

    fn stop_polling(&self) {
        if let Ok(mut guard) = self.poller_task.lock()
            && let Some(task) = guard.take()
        {
            task.abort();
        }
    }
}

impl Drop for OperatorConsole {
    fn drop(&mut self) {
        self.stop_polling();
        self.signout_watch.abort();
    }
}

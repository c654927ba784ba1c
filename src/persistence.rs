//! Persistence layer for the operator session
//!
//! This module handles the single durable piece of client state: the bearer
//! token, which must survive process restarts until an explicit logout.

use crate::error::Result;
use crate::logging::get_logger;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk token file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    access_token: String,
}

/// Durable store for the bearer token
pub struct TokenStore {
    file_path: String,
    logger: crate::logging::StructuredLogger,
}

impl TokenStore {
    /// Create a new token store backed by the given file
    pub fn new(file_path: &str) -> Self {
        let logger = get_logger("token_store");

        Self {
            file_path: file_path.to_string(),
            logger,
        }
    }

    /// Load the persisted token, if any
    ///
    /// A missing file means no session; an unreadable or malformed file is
    /// treated the same way after a warning, since the operator can always
    /// log in again.
    pub fn load(&self) -> Option<String> {
        let path = Path::new(&self.file_path);

        if !path.exists() {
            self.logger.debug("No token file found, starting signed out");
            return None;
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                self.logger
                    .warn(&format!("Failed to read token file: {}", e));
                return None;
            }
        };

        match serde_json::from_str::<StoredToken>(&contents) {
            Ok(stored) if !stored.access_token.is_empty() => {
                self.logger.info("Restored persisted session token");
                Some(stored.access_token)
            }
            Ok(_) => None,
            Err(e) => {
                self.logger
                    .warn(&format!("Malformed token file, ignoring: {}", e));
                None
            }
        }
    }

    /// Persist a token to disk
    pub fn save(&self, token: &str) -> Result<()> {
        let stored = StoredToken {
            access_token: token.to_string(),
        };
        let contents = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&self.file_path, contents)?;
        self.logger.debug("Persisted session token");

        Ok(())
    }

    /// Remove the persisted token
    ///
    /// Clearing a token that was never persisted is not an error.
    pub fn clear(&self) -> Result<()> {
        let path = Path::new(&self.file_path);
        if path.exists() {
            std::fs::remove_file(path)?;
            self.logger.debug("Cleared persisted session token");
        }

        Ok(())
    }
}

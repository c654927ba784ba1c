//! Configuration management for Voltboard
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files.

use crate::error::{Result, VoltboardError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fleet backend connection configuration
    pub backend: BackendConfig,

    /// Auth/token storage configuration
    pub auth: AuthConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

/// Fleet backend connection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the fleet REST backend
    pub base_url: String,

    /// Page size requested from the sessions endpoint
    pub sessions_limit: u32,
}

/// Auth/token storage parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Path of the durable token file; the session survives restarts
    /// through this file until an explicit logout
    pub token_file: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Path to log file (or directory for rotated files)
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            sessions_limit: 100,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_file: "/data/voltboard_token.json".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: "/tmp/voltboard.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::default(),
            poll_interval_ms: 5000,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the default locations
    pub fn load() -> Result<Self> {
        let default_paths = [
            "voltboard_config.yaml",
            "/data/voltboard_config.yaml",
            "/etc/voltboard/config.yaml",
        ];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        // Fall back to default configuration
        Ok(Config::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.backend.base_url.is_empty() {
            return Err(VoltboardError::validation(
                "backend.base_url",
                "Base URL cannot be empty",
            ));
        }

        if !self.backend.base_url.starts_with("http://")
            && !self.backend.base_url.starts_with("https://")
        {
            return Err(VoltboardError::validation(
                "backend.base_url",
                "Base URL must start with http:// or https://",
            ));
        }

        if self.backend.sessions_limit == 0 {
            return Err(VoltboardError::validation(
                "backend.sessions_limit",
                "Must be greater than 0",
            ));
        }

        if self.auth.token_file.is_empty() {
            return Err(VoltboardError::validation(
                "auth.token_file",
                "Token file path cannot be empty",
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(VoltboardError::validation(
                "poll_interval_ms",
                "Must be greater than 0",
            ));
        }

        Ok(())
    }
}

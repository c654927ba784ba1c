//! Error types and handling for Voltboard
//!
//! This module defines the error types used throughout the application,
//! providing consistent error handling and reporting.

use thiserror::Error;

/// Result type alias for Voltboard operations
pub type Result<T> = std::result::Result<T, VoltboardError>;

/// Main error type for Voltboard
#[derive(Debug, Error)]
pub enum VoltboardError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Login rejected by the backend token endpoint
    #[error("Invalid credentials: {message}")]
    InvalidCredentials { message: String },

    /// Authorized call answered with 401; the session is gone
    #[error("Session expired: {message}")]
    Expired { message: String },

    /// Network-level failures (connect, DNS, transport)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Backend answered with an unexpected non-2xx status
    #[error("API error: {message}")]
    Api { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Generic errors with context
    #[error("Error: {message}")]
    Generic { message: String },
}

impl VoltboardError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        VoltboardError::Config {
            message: message.into(),
        }
    }

    /// Create a new invalid-credentials error
    pub fn invalid_credentials<S: Into<String>>(message: S) -> Self {
        VoltboardError::InvalidCredentials {
            message: message.into(),
        }
    }

    /// Create a new session-expired error
    pub fn expired<S: Into<String>>(message: S) -> Self {
        VoltboardError::Expired {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        VoltboardError::Network {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        VoltboardError::Api {
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        VoltboardError::Io {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        VoltboardError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        VoltboardError::Generic {
            message: message.into(),
        }
    }

    /// Whether this error is a transient fetch failure: logged, the
    /// operation is skipped, and the schedule continues. Auth errors are
    /// not transient; they end the session instead.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            VoltboardError::Network { .. }
                | VoltboardError::Api { .. }
                | VoltboardError::Serialization { .. }
        )
    }
}

impl From<std::io::Error> for VoltboardError {
    fn from(err: std::io::Error) -> Self {
        VoltboardError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for VoltboardError {
    fn from(err: serde_yaml::Error) -> Self {
        VoltboardError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for VoltboardError {
    fn from(err: serde_json::Error) -> Self {
        VoltboardError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for VoltboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            VoltboardError::Serialization {
                message: err.to_string(),
            }
        } else {
            VoltboardError::network(err.to_string())
        }
    }
}

//! Error types for Rover Photos
//!
//! This module defines the error taxonomy for every component of the library.
//! Transport failures come from the remote client and propagate to the caller of
//! the operation that triggered them; navigation failures are semantic and belong
//! to the view layer. An empty result is never an error.

use std::path::PathBuf;
use thiserror::Error;

/// Network, status and payload failures from the remote client
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// Upstream returned a non-success status
    #[error("Upstream error: HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Upstream rejected the request rate for the configured credential
    #[error("Rate limit exceeded. Upstream responded with HTTP 429")]
    RateLimited,

    /// Call exceeded the configured bound
    #[error("Request to {path} timed out after {millis} ms")]
    Timeout { path: String, millis: u64 },

    /// Request URL could not be built
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Response body did not have the documented shape
    #[error("Malformed payload from {path}: {reason}")]
    MalformedPayload { path: String, reason: String },
}

/// Errors raised by navigation state and the detail view
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// Requested photo is not in the currently known collection
    #[error("Photo not found: {photo_id}")]
    NotFound { photo_id: u64 },

    /// Selected index outside the active collection
    #[error("Index {index} out of bounds for collection of {len} photos")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// I/O error reading the configuration file
    #[error("Failed to read configuration file")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Configuration validation failed
    #[error("Configuration validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<String> },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Transport error
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Navigation error
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable (worth offering a retry)
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Transport(TransportError::Http(_))
            | AppError::Transport(TransportError::RateLimited)
            | AppError::Transport(TransportError::Timeout { .. }) => true,

            AppError::Transport(TransportError::Status { status, .. }) => *status >= 500,

            AppError::Transport(TransportError::InvalidUrl { .. })
            | AppError::Transport(TransportError::MalformedPayload { .. })
            | AppError::Navigation(_)
            | AppError::Config(_) => false,

            AppError::Generic { .. } => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Transport(_) => "transport",
            AppError::Navigation(_) => "navigation",
            AppError::Config(_) => "config",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Transport result type alias
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Navigation result type alias
pub type NavigationResult<T> = std::result::Result<T, NavigationError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// src/error.rs

//! Unified error handling for the slot watcher.

use std::fmt;

use thiserror::Error;

use crate::models::LocationId;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built or a request could not be prepared
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Connection failure or timeout while querying a location
    #[error("Transport error for location {location}: {message}")]
    Transport { location: LocationId, message: String },

    /// Unexpected HTTP status or embedded API status
    #[error("Protocol error for location {location}: HTTP {http_status}, API status {api_status:?}")]
    Protocol {
        location: LocationId,
        http_status: u16,
        api_status: Option<i64>,
    },

    /// Response did not have the expected shape
    #[error("Malformed record for location {location}: {message}")]
    MalformedRecord { location: LocationId, message: String },

    /// The current cycle produced no slots
    #[error("Snapshot is empty")]
    EmptySnapshot,

    /// All attempts for a location failed
    #[error("Location {location} failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        location: LocationId,
        attempts: u32,
        last: Box<AppError>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a transport error.
    pub fn transport(location: LocationId, message: impl fmt::Display) -> Self {
        Self::Transport {
            location,
            message: message.to_string(),
        }
    }

    /// Create a protocol error.
    pub fn protocol(location: LocationId, http_status: u16, api_status: Option<i64>) -> Self {
        Self::Protocol {
            location,
            http_status,
            api_status,
        }
    }

    /// Create a malformed record error.
    pub fn malformed(location: LocationId, message: impl fmt::Display) -> Self {
        Self::MalformedRecord {
            location,
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the location fetcher should try again after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Protocol { .. })
    }

    /// Short label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Http(_) => "http",
            Self::Json(_) => "json",
            Self::Toml(_) | Self::TomlSerialize(_) => "toml",
            Self::Url(_) => "url",
            Self::Transport { .. } => "transport",
            Self::Protocol { .. } => "protocol",
            Self::MalformedRecord { .. } => "malformed-record",
            Self::EmptySnapshot => "empty-snapshot",
            Self::RetriesExhausted { last, .. } => last.kind(),
            Self::Config(_) => "config",
            Self::Validation(_) => "validation",
        }
    }
}

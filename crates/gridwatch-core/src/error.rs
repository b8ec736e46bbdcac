//! Core error types for gridwatch-core.
//!
//! This module defines the error hierarchy using thiserror. Each subsystem
//! (calendar ingestion, alert config, standings, delivery, storage) has its
//! own enum, wrapped by [`CoreError`] at the crate boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for gridwatch-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Calendar ingestion or refresh errors
    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    /// Alert configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Standings retrieval errors
    #[error("Standings error: {0}")]
    Standings(#[from] StandingsError),

    /// Notification delivery errors
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Calendar ingestion errors.
///
/// An unrecognized session is a hard failure: an event must never be
/// silently dropped or defaulted to a guessed type.
#[derive(Error, Debug)]
pub enum CalendarError {
    /// Calendar file could not be read
    #[error("Failed to read calendar at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Calendar body is not valid iCalendar data
    #[error("Failed to parse calendar: {0}")]
    ParseFailed(String),

    /// Event text matched no known session type
    #[error("Unknown event type: {0}")]
    UnknownEventType(String),

    /// A VEVENT is missing a required property
    #[error("Calendar event missing required property: {0}")]
    MissingProperty(&'static str),

    /// Calendar download failed
    #[error("Failed to download calendar: {0}")]
    DownloadFailed(#[from] reqwest::Error),
}

/// Alert configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Standings retrieval errors.
#[derive(Error, Debug)]
pub enum StandingsError {
    /// HTTP request failed
    #[error("Standings request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Unexpected standings response: {0}")]
    UnexpectedResponse(String),
}

/// Notification delivery errors.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// No webhook URL available
    #[error("No webhook URL configured")]
    NotConfigured,

    /// Stored credential could not be read or written
    #[error("Credential store error: {0}")]
    Credentials(String),

    /// HTTP request failed before a response arrived
    #[error("Webhook request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The webhook endpoint rejected the payload
    #[error("Webhook rejected notification (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored row could not be mapped back to an event
    #[error("Corrupt event row: {0}")]
    CorruptRow(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        DatabaseError::QueryFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

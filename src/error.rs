use thiserror::Error;

use crate::models::BookingId;

/// Errors returned by ledger mutations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Booking not found: {0}")]
    NotFound(BookingId),
    #[error("Booking id already exists: {0}")]
    DuplicateId(BookingId),
}

impl LedgerError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Errors raised by the durable key-value store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to (de)serialize stored value: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors raised by a remote listing/booking source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Errors raised while loading [`crate::config::AppConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(String),
}

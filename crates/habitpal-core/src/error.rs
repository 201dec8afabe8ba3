//! Core error types for habitpal-core.
//!
//! This module defines the error hierarchy using thiserror. Scoring and
//! storage failures are distinct types that fold into [`CoreError`].

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Core error type for habitpal-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Habit completion was rejected
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    /// Key-value store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced record does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejections from the scoring engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// The habit already has this calendar day recorded.
    #[error("habit {habit_id} is already completed for {date}")]
    AlreadyCompleted { habit_id: String, date: NaiveDate },
}

/// Key-value store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Store file is locked by another process
    #[error("Store is locked")]
    Locked,

    /// A stored value could not be encoded or decoded
    #[error("Invalid value stored under '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Malformed calendar day
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Malformed time of day
    #[error("Invalid time '{0}': expected HH:MM")]
    InvalidTime(String),

    /// Empty required field
    #[error("Field '{0}' must not be empty")]
    EmptyField(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Store(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

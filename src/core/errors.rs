//! Shared error types for the application

use serde::Serialize;
use thiserror::Error;

/// Main error type for delaymap operations
#[derive(Debug, Error)]
pub enum Error {
    /// Required inputs absent; fatal to the calling operation
    #[error("Precondition violation: {0}")]
    Precondition(String),

    /// Malformed or missing per-activity data; never fatal, reported
    /// alongside best-effort results
    #[error("Data quality issue for {activity_id}: {message}")]
    DataQuality {
        activity_id: String,
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn precondition(message: impl Into<String>) -> Self {
        Error::Precondition(message.into())
    }
}

/// Structural defects in the dependency graph. Accumulated and returned
/// alongside best-effort CPM results, never thrown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
pub enum GraphAnomaly {
    /// Activities forming at least one dependency cycle; excluded from date
    /// propagation
    #[error("dependency cycle through {}", members.join(" -> "))]
    Cycle { members: Vec<String> },

    /// A connected component separate from the main graph body
    #[error("disconnected fragment: {}", members.join(", "))]
    DisconnectedFragment { members: Vec<String> },
}

pub type Result<T> = std::result::Result<T, Error>;

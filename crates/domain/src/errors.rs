//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Chairside ports and adapters
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ChairsideError {
    /// The booking backend refused a write because it would double-book.
    #[error("Scheduling conflict: {0}")]
    Conflict(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChairsideError {
    /// Whether the backend rejected the write as a scheduling conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Stable label suitable for logging fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Conflict(_) => "conflict",
            Self::Persistence(_) => "persistence",
            Self::Network(_) => "network",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for Chairside operations
pub type Result<T> = std::result::Result<T, ChairsideError>;

/// A booking record whose interval cannot be used for scheduling.
///
/// Records carrying one of these are excluded from layout and conflict
/// computations and reported instead of failing the whole calendar.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntervalError {
    #[error("unparseable start instant {value:?}")]
    UnparseableStart { value: String },

    #[error("duration must be positive, got {minutes} minutes")]
    NonPositiveDuration { minutes: i64 },

    #[error("duration of {minutes} minutes exceeds a full day")]
    DurationTooLong { minutes: i64 },
}

impl From<IntervalError> for ChairsideError {
    fn from(err: IntervalError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

//! Error classification shared across Chairside crates
//!
//! Every crate defines its own error enums (with `thiserror`); this module
//! provides the vocabulary they share so callers can make uniform decisions
//! about retrying, alerting and logging without matching on foreign variants.
//!
//! # Error Handling Architecture
//!
//! 1. **`ErrorClassification` trait**: A standard interface for classifying
//!    errors by their characteristics (retryability, severity, criticality)
//!
//! 2. **`ErrorSeverity` enum**: A unified severity level system for monitoring
//!    and alerting across all error types
//!
//! ## ErrorSeverity Levels
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected, user-recoverable conditions | Slot already booked, nothing to undo |
//! | **Warning** | Degraded but operational | Backend rejected a write, stale snapshot |
//! | **Error** | Failure requiring attention | Invalid configuration, malformed records |
//! | **Critical** | System integrity at risk | Internal invariant violations |
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//!
//! use chairside_common::error::{ErrorClassification, ErrorSeverity};
//!
//! #[derive(Debug)]
//! enum SlotError {
//!     Taken,
//!     Backend,
//! }
//!
//! impl ErrorClassification for SlotError {
//!     fn is_retryable(&self) -> bool {
//!         matches!(self, Self::Backend)
//!     }
//!
//!     fn severity(&self) -> ErrorSeverity {
//!         match self {
//!             Self::Taken => ErrorSeverity::Info,
//!             Self::Backend => ErrorSeverity::Warning,
//!         }
//!     }
//!
//!     fn is_critical(&self) -> bool {
//!         false
//!     }
//!
//!     fn retry_after(&self) -> Option<Duration> {
//!         None
//!     }
//! }
//!
//! assert!(SlotError::Backend.is_retryable());
//! assert_eq!(SlotError::Taken.severity(), ErrorSeverity::Info);
//! ```

use std::fmt;
use std::time::Duration;

/// Trait for classifying errors by their operational characteristics
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient issues that may succeed if attempted
    /// again, such as network failures or a temporarily unavailable backend.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    ///
    /// Used for monitoring, alerting, and logging decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically an expected outcome
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Emit a `tracing` event for a classified error at the level matching its
/// severity.
///
/// `operation` should be a stable identifier (e.g. `"edit::drop"`) without
/// user data.
#[cfg(feature = "observability")]
pub fn report<E>(operation: &str, err: &E)
where
    E: ErrorClassification + fmt::Display,
{
    let severity = err.severity();
    let retryable = err.is_retryable();
    match severity {
        ErrorSeverity::Info => {
            tracing::info!(operation, %severity, retryable, error = %err, "operation_declined");
        }
        ErrorSeverity::Warning => {
            tracing::warn!(operation, %severity, retryable, error = %err, "operation_failed");
        }
        ErrorSeverity::Error | ErrorSeverity::Critical => {
            tracing::error!(operation, %severity, retryable, error = %err, "operation_failed");
        }
    }
}

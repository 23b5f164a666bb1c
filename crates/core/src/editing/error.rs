//! Edit controller error types
//!
//! Integrates with the shared error classification so the presentation layer
//! can decide what to show and whether to offer a retry.

use std::time::Duration;

use chairside_common::error::{ErrorClassification, ErrorSeverity};
use chairside_domain::{AppointmentId, ChairsideError, IntervalError};
use thiserror::Error;

/// Why an edit was not applied
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("appointment {appointment_id} would overlap {conflicting:?}")]
    Conflict { appointment_id: AppointmentId, conflicting: Vec<AppointmentId> },

    #[error("appointment {0} would fall outside business hours")]
    OutsideBusinessHours(AppointmentId),

    /// The backend refused or failed the write; local state was rolled back.
    #[error("backend rejected edit of appointment {appointment_id}: {source}")]
    PersistenceRejected {
        appointment_id: AppointmentId,
        #[source]
        source: ChairsideError,
    },

    /// Bookings for the visible range could not be loaded.
    #[error("booking source unavailable: {0}")]
    Unavailable(#[source] ChairsideError),

    #[error(transparent)]
    InvalidInterval(#[from] IntervalError),

    #[error("appointment {0} is not in the current calendar")]
    NotFound(AppointmentId),

    #[error("no drag or resize in progress")]
    NoActiveGesture,

    #[error("another drag or resize is already in progress")]
    GestureInProgress,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,
}

/// Edit result type
pub type EditResult<T> = Result<T, EditError>;

impl EditError {
    /// Whether the edit failed because the time is taken, whether detected
    /// locally or by the backend.
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Conflict { .. } => true,
            Self::PersistenceRejected { source, .. } => source.is_conflict(),
            _ => false,
        }
    }

    /// Short non-technical text for the person at the front desk.
    pub fn user_message(&self) -> &'static str {
        if self.is_conflict() {
            return "That time slot is no longer available.";
        }
        match self {
            Self::OutsideBusinessHours(_) => "The salon is closed at that time.",
            Self::NotFound(_) => "This appointment no longer exists. Refresh the calendar.",
            Self::Unavailable(_) => "Appointments could not be loaded. Please try again.",
            Self::NothingToUndo => "Nothing to undo.",
            Self::NothingToRedo => "Nothing to redo.",
            _ => "Something went wrong. Please try again.",
        }
    }
}

impl ErrorClassification for EditError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::PersistenceRejected { source, .. } | Self::Unavailable(source) => {
                matches!(source, ChairsideError::Network(_) | ChairsideError::Persistence(_))
            }
            _ => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Conflict { .. }
            | Self::OutsideBusinessHours(_)
            | Self::NoActiveGesture
            | Self::GestureInProgress
            | Self::NothingToUndo
            | Self::NothingToRedo => ErrorSeverity::Info,
            Self::PersistenceRejected { source, .. } if source.is_conflict() => ErrorSeverity::Info,
            Self::PersistenceRejected { .. } | Self::Unavailable(_) | Self::NotFound(_) => {
                ErrorSeverity::Warning
            }
            Self::InvalidInterval(_) => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        self.is_retryable().then(|| Duration::from_secs(2))
    }
}

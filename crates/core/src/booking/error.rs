//! Booking flow errors

use std::time::Duration;

use chairside_common::error::{ErrorClassification, ErrorSeverity};
use chairside_domain::{AppointmentId, ChairsideError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("duration of {minutes} minutes is outside {min}-{max}")]
    InvalidDuration { minutes: u32, min: u32, max: u32 },

    #[error("requested time is outside business hours")]
    OutsideBusinessHours,

    /// Detected locally (`conflicting` lists the bookings in the way) or by
    /// the backend (`conflicting` is empty).
    #[error("requested time overlaps {conflicting:?}")]
    Conflict { conflicting: Vec<AppointmentId> },

    #[error("invalid timezone {0:?}")]
    InvalidTimezone(String),

    #[error(transparent)]
    Backend(ChairsideError),
}

impl From<ChairsideError> for BookingError {
    fn from(err: ChairsideError) -> Self {
        match err {
            ChairsideError::Conflict(_) => Self::Conflict { conflicting: Vec::new() },
            other => Self::Backend(other),
        }
    }
}

impl BookingError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidDuration { .. } => "Please choose a valid service length.",
            Self::OutsideBusinessHours => "The salon is closed at that time.",
            Self::Conflict { .. } => "That time slot is no longer available.",
            Self::InvalidTimezone(_) | Self::Backend(_) => "Something went wrong. Please try again.",
        }
    }
}

impl ErrorClassification for BookingError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend(ChairsideError::Network(_) | ChairsideError::Persistence(_)))
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidDuration { .. } | Self::OutsideBusinessHours | Self::Conflict { .. } => {
                ErrorSeverity::Info
            }
            Self::Backend(ChairsideError::Internal(_)) => ErrorSeverity::Critical,
            Self::Backend(_) => ErrorSeverity::Warning,
            Self::InvalidTimezone(_) => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::Backend(ChairsideError::Internal(_)))
    }

    fn retry_after(&self) -> Option<Duration> {
        self.is_retryable().then(|| Duration::from_secs(2))
    }
}

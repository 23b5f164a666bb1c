//! Port interfaces for the booking backend and the business-hours source
//!
//! These traits define the boundaries between the scheduling engine and
//! infrastructure implementations.

use std::fmt;

use async_trait::async_trait;
use chairside_domain::{
    Appointment, AppointmentId, AppointmentPatch, AppointmentRecord, BusinessHours, DateRange,
    NewAppointment, Result,
};
use serde::{Deserialize, Serialize};

/// Salon (tenant) whose calendar is being scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait for reading and writing bookings
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Bookings whose interval intersects `range`, as raw stored rows.
    ///
    /// Rows that cannot be interpreted (bad start, bad duration) must still be
    /// returned so callers can report them.
    async fn fetch_bookings(&self, range: DateRange) -> Result<Vec<AppointmentRecord>>;

    /// Create a booking and return it with its assigned id
    async fn create_booking(&self, booking: NewAppointment) -> Result<Appointment>;

    /// Apply a partial update
    ///
    /// # Errors
    /// `ChairsideError::Conflict` when the backend detects a double booking,
    /// `ChairsideError::NotFound` for unknown ids.
    async fn update_booking(&self, id: &AppointmentId, patch: AppointmentPatch) -> Result<()>;

    /// Permanently remove a booking
    async fn delete_booking(&self, id: &AppointmentId) -> Result<()>;
}

/// Trait for looking up a tenant's weekly opening hours
#[async_trait]
pub trait BusinessHoursProvider: Send + Sync {
    /// `Ok(None)` means the tenant has not configured hours yet.
    async fn fetch_business_hours(&self, tenant: &TenantId) -> Result<Option<BusinessHours>>;
}

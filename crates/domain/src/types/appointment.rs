//! Appointment records as stored by the booking backend and as used by the
//! scheduling engine

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::constants::{ANY_STAFF_SENTINEL, MAX_RECORD_DURATION_MINUTES};
use crate::errors::IntervalError;
use crate::impl_domain_status_conversions;
use crate::types::range::Interval;

/// Opaque booking identifier assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(String);

impl AppointmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppointmentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AppointmentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Which staff member performs an appointment.
///
/// Persisted as a plain string where `"any"` (or an empty string) means the
/// booking is not tied to anyone yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StaffAssignment {
    #[default]
    Any,
    Staff(String),
}

impl StaffAssignment {
    pub fn staff(id: impl Into<String>) -> Self {
        Self::from(id.into())
    }

    /// Whether two assignments can collide on the same chair time.
    ///
    /// An unassigned booking may end up with anyone, so it competes with all.
    pub fn competes_with(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Staff(a), Self::Staff(b)) => a == b,
            _ => true,
        }
    }
}

impl From<String> for StaffAssignment {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ANY_STAFF_SENTINEL) {
            Self::Any
        } else {
            Self::Staff(trimmed.to_string())
        }
    }
}

impl From<StaffAssignment> for String {
    fn from(value: StaffAssignment) -> Self {
        match value {
            StaffAssignment::Any => ANY_STAFF_SENTINEL.to_string(),
            StaffAssignment::Staff(id) => id,
        }
    }
}

impl fmt::Display for StaffAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(ANY_STAFF_SENTINEL),
            Self::Staff(id) => f.write_str(id),
        }
    }
}

/// Appointment lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Booked,
    Confirmed,
    Completed,
    /// Logically deleted; never blocks the calendar.
    Cancelled,
    NoShow,
}

impl_domain_status_conversions!(AppointmentStatus {
    Booked => "booked",
    Confirmed => "confirmed",
    Completed => "completed",
    Cancelled => "cancelled",
    NoShow => "no_show",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    DepositPaid,
    Paid,
    Refunded,
}

impl_domain_status_conversions!(PaymentStatus {
    Unpaid => "unpaid",
    DepositPaid => "deposit_paid",
    Paid => "paid",
    Refunded => "refunded",
});

/// A validated booking.
///
/// Unlike [`AppointmentRecord`], the start is a typed instant and the duration
/// is known to be positive, so every `Appointment` has a usable interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub staff: StaffAssignment,
    pub service_id: String,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Appointment {
    pub fn end(&self) -> DateTime<Utc> {
        self.scheduled_at + Duration::minutes(i64::from(self.duration_minutes))
    }

    pub fn interval(&self) -> Interval {
        Interval::from_start(self.scheduled_at, self.duration_minutes)
    }

    /// Cancelled appointments are treated as deleted.
    pub fn is_active(&self) -> bool {
        self.status != AppointmentStatus::Cancelled
    }

    /// Apply every field present in `patch`.
    pub fn apply_patch(&mut self, patch: &AppointmentPatch) {
        if let Some(scheduled_at) = patch.scheduled_at {
            self.scheduled_at = scheduled_at;
        }
        if let Some(duration) = patch.duration_minutes {
            self.duration_minutes = duration;
        }
        if let Some(staff) = &patch.staff {
            self.staff = staff.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(notes) = &patch.notes {
            self.notes = Some(notes.clone());
        }
    }
}

/// Booking row exactly as returned by the data source.
///
/// Rows may be malformed (hand-edited, migrated, or written by older
/// clients), so the start stays a string and the duration is signed until
/// converted with `Appointment::try_from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: String,
    pub scheduled_at: String,
    pub duration_minutes: i64,
    #[serde(default)]
    pub staff: StaffAssignment,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TryFrom<AppointmentRecord> for Appointment {
    type Error = IntervalError;

    fn try_from(record: AppointmentRecord) -> Result<Self, Self::Error> {
        let (scheduled_at, duration_minutes) =
            validate_interval(&record.scheduled_at, record.duration_minutes)?;
        Ok(Self {
            id: AppointmentId(record.id),
            scheduled_at,
            duration_minutes,
            staff: record.staff,
            service_id: record.service_id,
            status: record.status,
            payment_status: record.payment_status,
            notes: record.notes,
        })
    }
}

impl From<&Appointment> for AppointmentRecord {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: appointment.id.to_string(),
            scheduled_at: appointment.scheduled_at.to_rfc3339(),
            duration_minutes: i64::from(appointment.duration_minutes),
            staff: appointment.staff.clone(),
            service_id: appointment.service_id.clone(),
            status: appointment.status,
            payment_status: appointment.payment_status,
            notes: appointment.notes.clone(),
        }
    }
}

/// Parse a stored start instant and duration into a usable pair.
///
/// Accepts RFC 3339 timestamps with a `Z` or numeric offset.
pub fn validate_interval(
    scheduled_at: &str,
    duration_minutes: i64,
) -> Result<(DateTime<Utc>, u32), IntervalError> {
    let start = DateTime::parse_from_rfc3339(scheduled_at.trim())
        .map_err(|_| IntervalError::UnparseableStart { value: scheduled_at.to_string() })?
        .with_timezone(&Utc);

    if duration_minutes <= 0 {
        return Err(IntervalError::NonPositiveDuration { minutes: duration_minutes });
    }
    if duration_minutes > MAX_RECORD_DURATION_MINUTES {
        return Err(IntervalError::DurationTooLong { minutes: duration_minutes });
    }
    let duration = u32::try_from(duration_minutes)
        .map_err(|_| IntervalError::DurationTooLong { minutes: duration_minutes })?;

    Ok((start, duration))
}

/// Request to create a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub staff: StaffAssignment,
    pub service_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewAppointment {
    pub fn interval(&self) -> Interval {
        Interval::from_start(self.scheduled_at, self.duration_minutes)
    }
}

/// Partial update sent to the backend. `None` leaves a field untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppointmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff: Option<StaffAssignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AppointmentPatch {
    pub fn status(status: AppointmentStatus) -> Self {
        Self { status: Some(status), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.scheduled_at.is_none()
            && self.duration_minutes.is_none()
            && self.staff.is_none()
            && self.status.is_none()
            && self.notes.is_none()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn record(start: &str, duration: i64) -> AppointmentRecord {
        AppointmentRecord {
            id: "apt-1".to_string(),
            scheduled_at: start.to_string(),
            duration_minutes: duration,
            staff: StaffAssignment::Any,
            service_id: "cut".to_string(),
            status: AppointmentStatus::Booked,
            payment_status: PaymentStatus::Unpaid,
            notes: None,
        }
    }

    #[test]
    fn test_record_converts_with_offset() {
        let apt = Appointment::try_from(record("2025-03-10T11:00:00+01:00", 45)).unwrap();
        assert_eq!(apt.scheduled_at, Utc.with_ymd_and_hms(2025, 3, 10, 10, 0, 0).unwrap());
        assert_eq!(apt.end(), Utc.with_ymd_and_hms(2025, 3, 10, 10, 45, 0).unwrap());
        assert_eq!(apt.id.as_str(), "apt-1");
    }

    #[test]
    fn test_record_rejects_bad_start() {
        let err = Appointment::try_from(record("yesterday-ish", 30)).unwrap_err();
        assert_eq!(err, IntervalError::UnparseableStart { value: "yesterday-ish".to_string() });
    }

    #[test]
    fn test_record_rejects_bad_durations() {
        let zero = Appointment::try_from(record("2025-03-10T10:00:00Z", 0)).unwrap_err();
        assert_eq!(zero, IntervalError::NonPositiveDuration { minutes: 0 });

        let negative = Appointment::try_from(record("2025-03-10T10:00:00Z", -15)).unwrap_err();
        assert_eq!(negative, IntervalError::NonPositiveDuration { minutes: -15 });

        let huge = Appointment::try_from(record("2025-03-10T10:00:00Z", 1441)).unwrap_err();
        assert_eq!(huge, IntervalError::DurationTooLong { minutes: 1441 });
    }

    #[test]
    fn test_staff_assignment_sentinel() {
        assert_eq!(StaffAssignment::from("any".to_string()), StaffAssignment::Any);
        assert_eq!(StaffAssignment::from(" ".to_string()), StaffAssignment::Any);
        assert_eq!(StaffAssignment::staff("jo"), StaffAssignment::Staff("jo".to_string()));

        let json = serde_json::to_string(&StaffAssignment::Any).unwrap();
        assert_eq!(json, "\"any\"");
    }

    #[test]
    fn test_staff_competition() {
        let jo = StaffAssignment::staff("jo");
        let sam = StaffAssignment::staff("sam");
        assert!(jo.competes_with(&jo));
        assert!(!jo.competes_with(&sam));
        assert!(StaffAssignment::Any.competes_with(&sam));
        assert!(jo.competes_with(&StaffAssignment::Any));
    }

    #[test]
    fn test_apply_patch_and_cancel() {
        let mut apt = Appointment::try_from(record("2025-03-10T10:00:00Z", 30)).unwrap();
        assert!(apt.is_active());

        let patch = AppointmentPatch {
            duration_minutes: Some(60),
            status: Some(AppointmentStatus::Cancelled),
            ..AppointmentPatch::default()
        };
        apt.apply_patch(&patch);

        assert_eq!(apt.duration_minutes, 60);
        assert!(!apt.is_active());
        assert!(AppointmentPatch::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_record_deserializes_from_backend_row() {
        let json = r#"{
            "id": "b7",
            "scheduled_at": "2025-03-10T09:30:00Z",
            "duration_minutes": 30,
            "staff": "any",
            "service_id": "colour",
            "status": "no_show",
            "payment_status": "deposit_paid"
        }"#;
        let row: AppointmentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(row.status, AppointmentStatus::NoShow);
        assert_eq!(row.payment_status, PaymentStatus::DepositPaid);

        let apt = Appointment::try_from(row).unwrap();
        let back = AppointmentRecord::from(&apt);
        assert_eq!(back.duration_minutes, 30);
        assert_eq!(back.scheduled_at, "2025-03-10T09:30:00+00:00");
    }
}

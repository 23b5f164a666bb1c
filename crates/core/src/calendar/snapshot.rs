//! Local copy of the bookings in the visible range
//!
//! The snapshot is what conflict checks and layout run against between
//! fetches. It may be stale with respect to other sessions; the backend
//! remains the authority and rejects writes that would double-book.

use chairside_domain::{
    Appointment, AppointmentId, AppointmentPatch, AppointmentRecord, DateRange,
    RejectedAppointment,
};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookingSnapshot {
    range: Option<DateRange>,
    appointments: Vec<Appointment>,
    rejected: Vec<RejectedAppointment>,
}

impl BookingSnapshot {
    /// Build from fetched rows; rows with an unusable interval are dropped and
    /// logged.
    pub fn from_records(range: DateRange, records: Vec<AppointmentRecord>) -> Self {
        let mut snapshot = Self::default();
        snapshot.replace(range, records);
        snapshot
    }

    /// Replace everything with a fresh fetch.
    pub fn replace(&mut self, range: DateRange, records: Vec<AppointmentRecord>) {
        let mut appointments = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();

        for record in records {
            let id = record.id.clone();
            match Appointment::try_from(record) {
                Ok(appointment) => appointments.push(appointment),
                Err(reason) => {
                    warn!(appointment_id = %id, reason = %reason, "Excluding malformed booking from snapshot");
                    rejected.push(RejectedAppointment { id, reason });
                }
            }
        }

        self.range = Some(range);
        self.appointments = appointments;
        self.rejected = rejected;
    }

    pub fn range(&self) -> Option<DateRange> {
        self.range
    }

    /// Every valid booking, including cancelled ones.
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn active(&self) -> impl Iterator<Item = &Appointment> {
        self.appointments.iter().filter(|apt| apt.is_active())
    }

    pub fn rejected(&self) -> &[RejectedAppointment] {
        &self.rejected
    }

    pub fn get(&self, id: &AppointmentId) -> Option<&Appointment> {
        self.appointments.iter().find(|apt| apt.id == *id)
    }

    /// Apply `patch` to one booking. Returns `false` when the id is unknown.
    pub fn apply_patch(&mut self, id: &AppointmentId, patch: &AppointmentPatch) -> bool {
        match self.appointments.iter_mut().find(|apt| apt.id == *id) {
            Some(appointment) => {
                appointment.apply_patch(patch);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.range = None;
        self.appointments.clear();
        self.rejected.clear();
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chairside_domain::{AppointmentStatus, PaymentStatus, StaffAssignment};
    use chrono::{TimeZone, Utc};

    use super::*;

    fn record(id: &str, start: &str, minutes: i64) -> AppointmentRecord {
        AppointmentRecord {
            id: id.to_string(),
            scheduled_at: start.to_string(),
            duration_minutes: minutes,
            staff: StaffAssignment::Any,
            service_id: "cut".to_string(),
            status: AppointmentStatus::Booked,
            payment_status: PaymentStatus::Unpaid,
            notes: None,
        }
    }

    fn range() -> DateRange {
        DateRange::days_from(Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap(), 1)
    }

    #[test]
    fn test_malformed_rows_are_excluded() {
        let snapshot = BookingSnapshot::from_records(
            range(),
            vec![
                record("ok", "2025-06-02T10:00:00Z", 30),
                record("bad", "2025-06-02 10:00", 30),
                record("neg", "2025-06-02T11:00:00Z", -30),
            ],
        );
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.rejected().len(), 2);
        assert!(snapshot.get(&AppointmentId::new("ok")).is_some());
        assert!(snapshot.get(&AppointmentId::new("bad")).is_none());
    }

    #[test]
    fn test_apply_patch_and_active_filter() {
        let mut snapshot =
            BookingSnapshot::from_records(range(), vec![record("a", "2025-06-02T10:00:00Z", 30)]);
        let id = AppointmentId::new("a");

        assert!(snapshot.apply_patch(&id, &AppointmentPatch::status(AppointmentStatus::Cancelled)));
        assert_eq!(snapshot.active().count(), 0);
        assert_eq!(snapshot.appointments().len(), 1);
        assert!(!snapshot.apply_patch(&AppointmentId::new("zz"), &AppointmentPatch::default()));
    }

    #[test]
    fn test_replace_discards_previous_contents() {
        let mut snapshot =
            BookingSnapshot::from_records(range(), vec![record("a", "2025-06-02T10:00:00Z", 30)]);
        snapshot.replace(range(), vec![record("b", "2025-06-02T12:00:00Z", 45)]);
        assert!(snapshot.get(&AppointmentId::new("a")).is_none());
        assert_eq!(snapshot.range(), Some(range()));

        snapshot.clear();
        assert!(snapshot.is_empty());
        assert!(snapshot.range().is_none());
    }
}

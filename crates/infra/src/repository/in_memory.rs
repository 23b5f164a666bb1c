//! In-memory implementation of the `BookingRepository` port.
//!
//! Keeps rows in a `parking_lot::RwLock`, enforces the same overlap rule a
//! real backend would (via an exclusion constraint) and hands out UUID ids.
//! Suited to demos, local development and tests that need a backend which
//! behaves like the real one without the network.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chairside_core::find_conflicts;
use chairside_core::ports::BookingRepository;
use chairside_domain::{
    Appointment, AppointmentId, AppointmentPatch, AppointmentRecord, ChairsideError, ConflictScope,
    DateRange, NewAppointment, Result as DomainResult,
};
use parking_lot::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

/// Booking store held in process memory.
///
/// Rows are stored in their wire shape so that seeded data may contain
/// malformed intervals; those rows are returned by `fetch_bookings` (the
/// caller reports them) but never block other bookings.
#[derive(Debug, Default)]
pub struct InMemoryBookingRepository {
    rows: RwLock<BTreeMap<String, AppointmentRecord>>,
    scope: ConflictScope,
}

impl InMemoryBookingRepository {
    pub fn new(scope: ConflictScope) -> Self {
        Self { rows: RwLock::new(BTreeMap::new()), scope }
    }

    /// Seed the store with existing rows. Overlaps are not checked.
    pub fn with_records(scope: ConflictScope, records: impl IntoIterator<Item = AppointmentRecord>) -> Self {
        let repository = Self::new(scope);
        {
            let mut rows = repository.rows.write();
            for record in records {
                rows.insert(record.id.clone(), record);
            }
        }
        repository
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    pub fn get(&self, id: &AppointmentId) -> Option<AppointmentRecord> {
        self.rows.read().get(id.as_str()).cloned()
    }

    /// Valid appointments other than `exclude`.
    fn parsed(rows: &BTreeMap<String, AppointmentRecord>, exclude: Option<&str>) -> Vec<Appointment> {
        rows.values()
            .filter(|record| Some(record.id.as_str()) != exclude)
            .filter_map(|record| Appointment::try_from(record.clone()).ok())
            .collect()
    }

    fn ensure_free(
        &self,
        candidate: &Appointment,
        rows: &BTreeMap<String, AppointmentRecord>,
    ) -> DomainResult<()> {
        if !candidate.is_active() {
            return Ok(());
        }
        let others = Self::parsed(rows, Some(candidate.id.as_str()));
        let conflicting: Vec<String> =
            find_conflicts(&candidate.interval(), &candidate.staff, &others, None, self.scope)
                .into_iter()
                .map(|apt| apt.id.to_string())
                .collect();

        if conflicting.is_empty() {
            Ok(())
        } else {
            warn!(
                appointment_id = %candidate.id,
                conflicting = ?conflicting,
                "Rejected overlapping booking"
            );
            Err(ChairsideError::Conflict(format!(
                "{} overlaps {}",
                candidate.id,
                conflicting.join(", ")
            )))
        }
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn fetch_bookings(&self, range: DateRange) -> DomainResult<Vec<AppointmentRecord>> {
        let rows = self.rows.read();
        let records: Vec<AppointmentRecord> = rows
            .values()
            .filter(|record| match Appointment::try_from((*record).clone()) {
                Ok(apt) => range.intersects(&apt.interval()),
                Err(_) => true,
            })
            .cloned()
            .collect();

        debug!(
            range_start = %range.start,
            range_end = %range.end,
            rows = records.len(),
            "Fetched bookings"
        );
        Ok(records)
    }

    async fn create_booking(&self, booking: NewAppointment) -> DomainResult<Appointment> {
        let appointment = Appointment {
            id: AppointmentId::new(Uuid::new_v4().to_string()),
            scheduled_at: booking.scheduled_at,
            duration_minutes: booking.duration_minutes,
            staff: booking.staff,
            service_id: booking.service_id,
            status: Default::default(),
            payment_status: Default::default(),
            notes: booking.notes,
        };

        let mut rows = self.rows.write();
        self.ensure_free(&appointment, &rows)?;
        rows.insert(appointment.id.to_string(), AppointmentRecord::from(&appointment));
        debug!(appointment_id = %appointment.id, "Inserted booking");
        Ok(appointment)
    }

    async fn update_booking(&self, id: &AppointmentId, patch: AppointmentPatch) -> DomainResult<()> {
        let mut rows = self.rows.write();
        let record =
            rows.get(id.as_str()).cloned().ok_or_else(|| ChairsideError::NotFound(id.to_string()))?;
        let mut appointment = Appointment::try_from(record)?;
        appointment.apply_patch(&patch);

        self.ensure_free(&appointment, &rows)?;
        rows.insert(id.to_string(), AppointmentRecord::from(&appointment));
        debug!(appointment_id = %id, "Updated booking");
        Ok(())
    }

    async fn delete_booking(&self, id: &AppointmentId) -> DomainResult<()> {
        self.rows
            .write()
            .remove(id.as_str())
            .map(|_| debug!(appointment_id = %id, "Deleted booking"))
            .ok_or_else(|| ChairsideError::NotFound(id.to_string()))
    }
}

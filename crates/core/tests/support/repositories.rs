//! Mock port implementations for testing
//!
//! In-memory stand-ins for the booking backend and hours source, enabling
//! deterministic controller and service tests without a real backend.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chairside_core::ports::{BookingRepository, BusinessHoursProvider, TenantId};
use chairside_domain::{
    Appointment, AppointmentId, AppointmentPatch, AppointmentRecord, BusinessHours, ChairsideError,
    DateRange, NewAppointment, Result as DomainResult,
};
use tokio::sync::Notify;

/// Booking repository that records every call and can be told to fail.
///
/// Rows are kept as raw records so tests can seed malformed data.
#[derive(Default, Clone)]
pub struct RecordingBookingRepository {
    records: Arc<Mutex<Vec<AppointmentRecord>>>,
    updates: Arc<Mutex<Vec<(AppointmentId, AppointmentPatch)>>>,
    update_failures: Arc<Mutex<VecDeque<ChairsideError>>>,
    fetch_failure: Arc<Mutex<Option<ChairsideError>>>,
    fetch_calls: Arc<AtomicUsize>,
    update_gate: Arc<Mutex<Option<Arc<Notify>>>>,
    next_id: Arc<AtomicUsize>,
}

impl RecordingBookingRepository {
    /// Create a new mock seeded with the provided rows.
    pub fn new(records: Vec<AppointmentRecord>) -> Self {
        let repo = Self::default();
        *repo.records.lock().unwrap() = records;
        repo
    }

    /// Fail the next `update_booking` call with `err`. Calls queue up.
    pub fn fail_next_update(&self, err: ChairsideError) {
        self.update_failures.lock().unwrap().push_back(err);
    }

    /// Fail every `fetch_bookings` call until cleared with `None`.
    pub fn set_fetch_failure(&self, err: Option<ChairsideError>) {
        *self.fetch_failure.lock().unwrap() = err;
    }

    /// Make `update_booking` wait for `gate` before answering.
    pub fn hold_updates(&self, gate: Arc<Notify>) {
        *self.update_gate.lock().unwrap() = Some(gate);
    }

    /// Add a row behind the caller's back, as another session would.
    pub fn insert(&self, record: AppointmentRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn records(&self) -> Vec<AppointmentRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn record(&self, id: &str) -> Option<AppointmentRecord> {
        self.records.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }

    /// Updates that reached the backend, including failed ones.
    pub fn updates(&self) -> Vec<(AppointmentId, AppointmentPatch)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BookingRepository for RecordingBookingRepository {
    async fn fetch_bookings(&self, range: DateRange) -> DomainResult<Vec<AppointmentRecord>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fetch_failure.lock().unwrap().clone() {
            return Err(err);
        }

        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| match Appointment::try_from((*record).clone()) {
                Ok(apt) => range.intersects(&apt.interval()),
                // Malformed rows are always returned so callers can report them
                Err(_) => true,
            })
            .cloned()
            .collect())
    }

    async fn create_booking(&self, booking: NewAppointment) -> DomainResult<Appointment> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let appointment = Appointment {
            id: AppointmentId::new(format!("new-{n}")),
            scheduled_at: booking.scheduled_at,
            duration_minutes: booking.duration_minutes,
            staff: booking.staff,
            service_id: booking.service_id,
            status: Default::default(),
            payment_status: Default::default(),
            notes: booking.notes,
        };
        self.records.lock().unwrap().push(AppointmentRecord::from(&appointment));
        Ok(appointment)
    }

    async fn update_booking(&self, id: &AppointmentId, patch: AppointmentPatch) -> DomainResult<()> {
        let gate = self.update_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.updates.lock().unwrap().push((id.clone(), patch.clone()));
        if let Some(err) = self.update_failures.lock().unwrap().pop_front() {
            return Err(err);
        }

        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id.as_str())
            .ok_or_else(|| ChairsideError::NotFound(id.to_string()))?;
        let mut appointment = Appointment::try_from(record.clone())
            .map_err(|err| ChairsideError::InvalidInput(err.to_string()))?;
        appointment.apply_patch(&patch);
        *record = AppointmentRecord::from(&appointment);
        Ok(())
    }

    async fn delete_booking(&self, id: &AppointmentId) -> DomainResult<()> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id.as_str());
        if records.len() == before {
            return Err(ChairsideError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Hours provider returning a fixed answer.
#[derive(Default, Clone)]
pub struct StaticHoursProvider {
    hours: Option<BusinessHours>,
    failure: Option<ChairsideError>,
}

impl StaticHoursProvider {
    pub fn new(hours: Option<BusinessHours>) -> Self {
        Self { hours, failure: None }
    }

    pub fn failing(err: ChairsideError) -> Self {
        Self { hours: None, failure: Some(err) }
    }
}

#[async_trait]
impl BusinessHoursProvider for StaticHoursProvider {
    async fn fetch_business_hours(&self, _tenant: &TenantId) -> DomainResult<Option<BusinessHours>> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.hours.clone()),
        }
    }
}

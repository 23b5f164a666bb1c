//! Schedule service - day views, availability and booking

use std::sync::Arc;

use chairside_common::error::report;
use chairside_domain::{
    Appointment, AppointmentId, AppointmentPatch, AppointmentStatus, BusinessHours, Config,
    DateRange, LayoutResult, NewAppointment, SchedulingConfig, StaffAssignment, TimeSlot,
};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::error::BookingError;
use crate::calendar::time::{day_range, local_parts};
use crate::calendar::BookingSnapshot;
use crate::ports::{BookingRepository, BusinessHoursProvider, TenantId};
use crate::scheduling::conflict::find_conflicts;
use crate::scheduling::hours::interval_within_business_hours;
use crate::scheduling::layout::layout_day;
use crate::scheduling::slots::{
    available_start_times, generate_slots_with, AvailabilityQuery, SlotGridOptions,
};

/// Everything the day view renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
    pub layout: LayoutResult,
    /// `false` when the tenant has no hours and the default grid is shown
    pub hours_configured: bool,
}

/// Schedule service
pub struct ScheduleService {
    repository: Arc<dyn BookingRepository>,
    hours_provider: Arc<dyn BusinessHoursProvider>,
    tenant: TenantId,
    tz: Tz,
    config: SchedulingConfig,
}

impl ScheduleService {
    /// Create a new schedule service with default scheduling rules
    pub fn new(
        repository: Arc<dyn BookingRepository>,
        hours_provider: Arc<dyn BusinessHoursProvider>,
        tenant: TenantId,
        tz: Tz,
    ) -> Self {
        Self { repository, hours_provider, tenant, tz, config: SchedulingConfig::default() }
    }

    /// Build from loaded configuration.
    ///
    /// # Errors
    /// `BookingError::InvalidTimezone` if `salon.timezone` is not an IANA
    /// zone name.
    pub fn from_config(
        repository: Arc<dyn BookingRepository>,
        hours_provider: Arc<dyn BusinessHoursProvider>,
        config: &Config,
    ) -> Result<Self, BookingError> {
        let tz: Tz = config
            .salon
            .timezone
            .parse()
            .map_err(|_| BookingError::InvalidTimezone(config.salon.timezone.clone()))?;
        Ok(Self::new(repository, hours_provider, TenantId::new(config.salon.tenant_id.clone()), tz)
            .with_config(config.scheduling.clone()))
    }

    pub fn with_config(mut self, config: SchedulingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    /// Current hours for the tenant.
    ///
    /// A failing hours source is logged and treated like missing hours so the
    /// calendar still renders on the default grid.
    pub async fn business_hours(&self) -> Option<BusinessHours> {
        match self.hours_provider.fetch_business_hours(&self.tenant).await {
            Ok(Some(hours)) => Some(hours),
            Ok(None) => {
                debug!(tenant = %self.tenant, "No business hours configured; using default grid");
                None
            }
            Err(err) => {
                warn!(tenant = %self.tenant, error = %err, "Business hours unavailable; using default grid");
                None
            }
        }
    }

    /// Slot grid and packed layout for one local day.
    pub async fn day_view(&self, date: NaiveDate) -> Result<DayView, BookingError> {
        let hours = self.business_hours().await;
        let slots = generate_slots_with(date, hours.as_ref(), &SlotGridOptions::from(&self.config));

        let snapshot = self.fetch(day_range(date, self.tz)).await?;
        let mut layout = layout_day(snapshot.appointments(), date, self.tz);
        layout.rejected.extend(snapshot.rejected().iter().cloned());

        Ok(DayView { date, slots, layout, hours_configured: hours.is_some() })
    }

    /// Start times on `date` where a service of `duration_minutes` fits.
    pub async fn available_start_times(
        &self,
        date: NaiveDate,
        duration_minutes: u32,
        staff: StaffAssignment,
    ) -> Result<Vec<TimeSlot>, BookingError> {
        self.check_duration(duration_minutes)?;
        let hours = self.business_hours().await;
        let snapshot = self.fetch(day_range(date, self.tz)).await?;

        let query =
            AvailabilityQuery { date, duration_minutes, staff, scope: self.config.conflict_scope };
        Ok(available_start_times(
            &query,
            hours.as_ref(),
            snapshot.appointments(),
            self.tz,
            &SlotGridOptions::from(&self.config),
        ))
    }

    /// Create a booking after checking duration, hours and overlaps.
    ///
    /// The local overlap check runs against a fresh fetch; the backend still
    /// has the final word and its conflict is reported the same way.
    pub async fn book(&self, booking: NewAppointment) -> Result<Appointment, BookingError> {
        let result = self.try_book(booking).await;
        if let Err(err) = &result {
            report("booking::create", err);
        }
        result
    }

    async fn try_book(&self, booking: NewAppointment) -> Result<Appointment, BookingError> {
        self.check_duration(booking.duration_minutes)?;

        if self.config.enforce_business_hours {
            if let Some(hours) = self.business_hours().await {
                let (_, day, time) = local_parts(booking.scheduled_at, self.tz);
                if !interval_within_business_hours(&hours, day, time, booking.duration_minutes) {
                    return Err(BookingError::OutsideBusinessHours);
                }
            }
        }

        let interval = booking.interval();
        let snapshot = self.fetch(DateRange::new(interval.start(), interval.end())).await?;
        let conflicting: Vec<AppointmentId> = find_conflicts(
            &interval,
            &booking.staff,
            snapshot.appointments(),
            None,
            self.config.conflict_scope,
        )
        .into_iter()
        .map(|apt| apt.id.clone())
        .collect();
        if !conflicting.is_empty() {
            return Err(BookingError::Conflict { conflicting });
        }

        let created = self.repository.create_booking(booking).await?;
        info!(
            appointment_id = %created.id,
            scheduled_at = %created.scheduled_at,
            duration_minutes = created.duration_minutes,
            "Created booking"
        );
        Ok(created)
    }

    /// Cancel a booking. The row is kept with status `cancelled` and stops
    /// blocking the calendar.
    pub async fn cancel(&self, id: &AppointmentId) -> Result<(), BookingError> {
        self.repository
            .update_booking(id, AppointmentPatch::status(AppointmentStatus::Cancelled))
            .await?;
        info!(appointment_id = %id, "Cancelled booking");
        Ok(())
    }

    /// Permanently remove a booking.
    pub async fn delete(&self, id: &AppointmentId) -> Result<(), BookingError> {
        self.repository.delete_booking(id).await?;
        info!(appointment_id = %id, "Deleted booking");
        Ok(())
    }

    fn check_duration(&self, minutes: u32) -> Result<(), BookingError> {
        let (min, max) = (self.config.min_duration_minutes, self.config.max_duration_minutes);
        if (min..=max).contains(&minutes) {
            Ok(())
        } else {
            Err(BookingError::InvalidDuration { minutes, min, max })
        }
    }

    async fn fetch(&self, range: DateRange) -> Result<BookingSnapshot, BookingError> {
        let records = self.repository.fetch_bookings(range).await?;
        Ok(BookingSnapshot::from_records(range, records))
    }
}

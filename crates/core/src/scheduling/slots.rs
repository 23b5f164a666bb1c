//! Slot grid for the booking picker and day view

use chairside_domain::constants::{
    DEFAULT_CLOSE_MINUTES, DEFAULT_OPEN_MINUTES, DEFAULT_SLOT_GRANULARITY_MINUTES,
    SLOT_MARGIN_MINUTES,
};
use chairside_domain::types::hours::weekday_index;
use chairside_domain::{
    Appointment, BusinessHours, ConflictScope, Interval, SchedulingConfig, SlotUnavailableReason,
    StaffAssignment, TimeOfDay, TimeSlot,
};
use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

use super::conflict::find_conflicts;
use super::hours::{
    earliest_open_time, interval_within_business_hours, is_open_on, is_within_business_hours,
    latest_close_time,
};
use crate::calendar::time::at_local_time;

/// Shape of the grid independent of the day being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotGridOptions {
    pub granularity_minutes: u16,
    /// Shown before the earliest opening and after the latest closing
    pub margin_minutes: u16,
    pub outer_open: TimeOfDay,
    pub outer_close: TimeOfDay,
}

impl Default for SlotGridOptions {
    fn default() -> Self {
        Self {
            granularity_minutes: DEFAULT_SLOT_GRANULARITY_MINUTES,
            margin_minutes: SLOT_MARGIN_MINUTES,
            outer_open: TimeOfDay::saturating_from_minutes(i32::from(DEFAULT_OPEN_MINUTES)),
            outer_close: TimeOfDay::saturating_from_minutes(i32::from(DEFAULT_CLOSE_MINUTES)),
        }
    }
}

impl From<&SchedulingConfig> for SlotGridOptions {
    fn from(config: &SchedulingConfig) -> Self {
        Self {
            granularity_minutes: config.slot_granularity_minutes,
            margin_minutes: config.margin_minutes,
            outer_open: config.outer_open,
            outer_close: config.outer_close,
        }
    }
}

/// Slots for `date` every `granularity_minutes` (0 falls back to 15).
///
/// The grid spans the earliest opening to the latest closing of the week,
/// widened by an hour on each side and clamped to 07:00-22:00. Slots outside
/// the day's hours are disabled. Without business hours the whole 07:00-22:00
/// grid is offered.
pub fn generate_slots(
    date: NaiveDate,
    granularity_minutes: u16,
    hours: Option<&BusinessHours>,
) -> Vec<TimeSlot> {
    let options = SlotGridOptions { granularity_minutes, ..SlotGridOptions::default() };
    generate_slots_with(date, hours, &options)
}

/// [`generate_slots`] with a configurable grid shape.
pub fn generate_slots_with(
    date: NaiveDate,
    hours: Option<&BusinessHours>,
    options: &SlotGridOptions,
) -> Vec<TimeSlot> {
    let step = if options.granularity_minutes == 0 {
        DEFAULT_SLOT_GRANULARITY_MINUTES
    } else {
        options.granularity_minutes
    };
    let margin = i32::from(options.margin_minutes);

    let Some(hours) = hours else {
        return grid(options.outer_open, options.outer_close, step).map(TimeSlot::available).collect();
    };

    let start = earliest_open_time(hours).add_minutes(-margin).max(options.outer_open);
    let end = latest_close_time(hours).add_minutes(margin).min(options.outer_close);
    let day = weekday_index(date.weekday());
    let open_today = is_open_on(hours, day);

    grid(start, end, step)
        .map(|time| {
            if !open_today {
                TimeSlot::unavailable(time, SlotUnavailableReason::DayClosed)
            } else if !is_within_business_hours(hours, day, time) {
                TimeSlot::unavailable(time, SlotUnavailableReason::OutsideBusinessHours)
            } else {
                TimeSlot::available(time)
            }
        })
        .collect()
}

/// Start times in `[start, end)` every `step` minutes.
fn grid(start: TimeOfDay, end: TimeOfDay, step: u16) -> impl Iterator<Item = TimeOfDay> {
    (start.minutes()..end.minutes())
        .step_by(usize::from(step))
        .filter_map(TimeOfDay::from_minutes)
}

/// What the booking flow is looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    pub duration_minutes: u32,
    pub staff: StaffAssignment,
    pub scope: ConflictScope,
}

/// Slot grid for a booking of a given length.
///
/// On top of the hours check, a slot is disabled when the service would run
/// past closing (`TooShort`) or when it overlaps an existing booking
/// (`Booked`).
pub fn available_start_times(
    query: &AvailabilityQuery,
    hours: Option<&BusinessHours>,
    bookings: &[Appointment],
    tz: Tz,
    options: &SlotGridOptions,
) -> Vec<TimeSlot> {
    let day = weekday_index(query.date.weekday());
    let mut slots = generate_slots_with(query.date, hours, options);

    for slot in &mut slots {
        if slot.disabled {
            continue;
        }
        if let Some(hours) = hours {
            if !interval_within_business_hours(hours, day, slot.time, query.duration_minutes) {
                slot.disable(SlotUnavailableReason::TooShort);
                continue;
            }
        }

        let start = at_local_time(query.date, slot.time, tz);
        let candidate = Interval::from_start(start, query.duration_minutes);
        if !find_conflicts(&candidate, &query.staff, bookings, None, query.scope).is_empty() {
            slot.disable(SlotUnavailableReason::Booked);
        }
    }

    slots
}

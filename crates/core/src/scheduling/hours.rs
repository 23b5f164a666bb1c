//! Business-hours resolution

use chairside_domain::constants::{DEFAULT_CLOSE_MINUTES, DEFAULT_OPEN_MINUTES};
use chairside_domain::{BusinessHours, TimeOfDay};

/// Whether `time` on weekday `day_of_week` (0 = Sunday) is inside opening
/// hours.
///
/// Opening time is inclusive, closing time exclusive. A closed day, or a day
/// with no configured entry, is never open.
pub fn is_within_business_hours(hours: &BusinessHours, day_of_week: u8, time: TimeOfDay) -> bool {
    match hours.day(day_of_week) {
        Some(day) if !day.closed => day.open <= time && time < day.close,
        _ => false,
    }
}

/// Earliest opening time across all open days, 07:00 when nothing is open.
pub fn earliest_open_time(hours: &BusinessHours) -> TimeOfDay {
    hours
        .open_days()
        .map(|day| day.open)
        .min()
        .unwrap_or_else(|| TimeOfDay::saturating_from_minutes(i32::from(DEFAULT_OPEN_MINUTES)))
}

/// Latest closing time across all open days, 22:00 when nothing is open.
pub fn latest_close_time(hours: &BusinessHours) -> TimeOfDay {
    hours
        .open_days()
        .map(|day| day.close)
        .max()
        .unwrap_or_else(|| TimeOfDay::saturating_from_minutes(i32::from(DEFAULT_CLOSE_MINUTES)))
}

/// Whether the salon opens at all on `day_of_week`; read from the `closed`
/// flag only.
pub fn is_open_on(hours: &BusinessHours, day_of_week: u8) -> bool {
    hours.day(day_of_week).is_some_and(|day| !day.closed)
}

/// Whether a service of `duration_minutes` starting at `start` finishes by
/// closing time on the same day.
pub fn interval_within_business_hours(
    hours: &BusinessHours,
    day_of_week: u8,
    start: TimeOfDay,
    duration_minutes: u32,
) -> bool {
    let Some(day) = hours.day(day_of_week).filter(|day| !day.closed) else {
        return false;
    };
    let end = u32::from(start.minutes()) + duration_minutes;
    day.open <= start && end <= u32::from(day.close.minutes())
}

//! Conversions between salon-local wall time and UTC instants

use chairside_domain::types::hours::weekday_index;
use chairside_domain::{DateRange, TimeOfDay};
use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Utc,
};
use chrono_tz::Tz;

/// UTC instant of local wall time `naive` in `tz`.
///
/// Ambiguous times (clock going back) resolve to the earlier instant. Times
/// that fall in a gap (clock going forward) use the offset in force before
/// the gap, which lands the same distance past it.
pub fn resolve_local(naive: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(local) | LocalResult::Ambiguous(local, _) => local.with_timezone(&Utc),
        LocalResult::None => {
            let before = naive - Duration::days(1);
            let offset = tz.offset_from_utc_datetime(&before).fix().local_minus_utc();
            Utc.from_utc_datetime(&(naive - Duration::seconds(i64::from(offset))))
        }
    }
}

/// Start of `date` in `tz`.
pub fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    resolve_local(date.and_time(NaiveTime::MIN), tz)
}

/// Instant of `time` on `date`; `24:00` maps to the next local midnight.
pub fn at_local_time(date: NaiveDate, time: TimeOfDay, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(time.minutes()));
    resolve_local(naive, tz)
}

/// `[midnight, next midnight)` of `date` in `tz`.
pub fn day_range(date: NaiveDate, tz: Tz) -> DateRange {
    let next = date.checked_add_days(Days::new(1)).unwrap_or(date);
    DateRange::new(local_midnight(date, tz), local_midnight(next, tz))
}

/// Local calendar date, weekday index (0 = Sunday) and time of day of
/// `instant`.
pub fn local_parts(instant: DateTime<Utc>, tz: Tz) -> (NaiveDate, u8, TimeOfDay) {
    let local = instant.with_timezone(&tz);
    let date = local.date_naive();
    (date, weekday_index(date.weekday()), TimeOfDay::from_naive_time(local.time()))
}

/// Round `instant` to the nearest multiple of `step_minutes`, dropping
/// seconds. Halfway rounds up.
pub fn snap_to_grid(instant: DateTime<Utc>, step_minutes: u32) -> DateTime<Utc> {
    let step = i64::from(step_minutes.max(1));
    let minute = instant.timestamp().div_euclid(60);
    let snapped = (minute + step / 2).div_euclid(step) * step;
    Utc.timestamp_opt(snapped * 60, 0).single().unwrap_or(instant)
}

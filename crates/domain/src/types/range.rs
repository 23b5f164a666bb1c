//! Half-open time spans used for scheduling arithmetic

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` span measured in whole minutes since the Unix
/// epoch.
///
/// All overlap tests run on integer minutes. An instant that falls inside a
/// minute widens the span outwards, so a sub-minute start never hides an
/// overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    pub start_minute: i64,
    pub end_minute: i64,
}

impl Interval {
    /// Smallest whole-minute span covering `duration_minutes` from `start`.
    pub fn from_start(start: DateTime<Utc>, duration_minutes: u32) -> Self {
        let seconds = start.timestamp();
        let start_minute = seconds.div_euclid(60);
        let partial = seconds.rem_euclid(60) != 0 || start.timestamp_subsec_nanos() != 0;
        Self {
            start_minute,
            end_minute: start_minute + i64::from(duration_minutes) + i64::from(partial),
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        self.end_minute - self.start_minute
    }

    /// Standard half-open overlap test; touching intervals do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_minute < other.end_minute && other.start_minute < self.end_minute
    }

    pub fn start(&self) -> DateTime<Utc> {
        minute_to_instant(self.start_minute)
    }

    pub fn end(&self) -> DateTime<Utc> {
        minute_to_instant(self.end_minute)
    }
}

fn minute_to_instant(minute: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(minute.saturating_mul(60), 0).single().unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// A `[start, end)` range of instants, typically the visible calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if end < start {
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    /// Range covering `days` whole days starting at `start`.
    pub fn days_from(start: DateTime<Utc>, days: i64) -> Self {
        Self::new(start, start + Duration::days(days))
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Whether any part of `interval` falls inside this range.
    pub fn intersects(&self, interval: &Interval) -> bool {
        let own = Interval {
            start_minute: self.start.timestamp().div_euclid(60),
            end_minute: self.end.timestamp().div_euclid(60),
        };
        own.overlaps(interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_back_to_back_intervals_do_not_overlap() {
        let first = Interval::from_start(at(10, 0), 30);
        let second = Interval::from_start(at(10, 30), 30);
        assert!(!first.overlaps(&second));
        assert!(!second.overlaps(&first));
    }

    #[test]
    fn test_partial_overlap_detected() {
        let first = Interval::from_start(at(10, 0), 30);
        let second = Interval::from_start(at(10, 15), 30);
        assert!(first.overlaps(&second));
        assert_eq!(second.end(), at(10, 45));
    }

    #[test]
    fn test_sub_minute_start_widens_to_cover() {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 10, 0, 42).unwrap();
        let interval = Interval::from_start(start, 15);
        assert_eq!(interval.start(), at(10, 0));
        assert_eq!(interval.end(), at(10, 16));

        let whole = Interval::from_start(at(10, 0), 15);
        assert_eq!(whole.duration_minutes(), 15);
    }

    #[test]
    fn test_range_normalizes_reversed_bounds() {
        let range = DateRange::new(at(18, 0), at(9, 0));
        assert_eq!(range.start, at(9, 0));
        assert!(range.contains(at(9, 0)));
        assert!(!range.contains(at(18, 0)));
    }

    #[test]
    fn test_range_intersects_interval() {
        let range = DateRange::new(at(9, 0), at(12, 0));
        assert!(range.intersects(&Interval::from_start(at(11, 45), 60)));
        assert!(!range.intersects(&Interval::from_start(at(12, 0), 30)));
    }
}

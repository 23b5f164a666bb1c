//! Weekly business hours and time-of-day values

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MINUTES_PER_DAY;
use crate::errors::{ChairsideError, Result};

/// Wall-clock time of day with minute precision.
///
/// Stored as minutes since midnight. `24:00` (1440) is allowed so a closing
/// time can mean "end of day".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

/// Error returned when a `"HH:MM"` string cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid time of day {0:?}, expected HH:MM")]
pub struct ParseTimeOfDayError(pub String);

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self(0);
    pub const END_OF_DAY: Self = Self(MINUTES_PER_DAY);

    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        Self::from_minutes(hour.checked_mul(60)?.checked_add(minute)?)
    }

    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes <= MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Clamp any signed minute count into the valid `[00:00, 24:00]` range.
    pub fn saturating_from_minutes(minutes: i32) -> Self {
        let clamped = minutes.clamp(0, i32::from(MINUTES_PER_DAY));
        Self(u16::try_from(clamped).unwrap_or(MINUTES_PER_DAY))
    }

    pub fn from_naive_time(time: NaiveTime) -> Self {
        // hour() < 24 and minute() < 60, so the sum always fits
        let minutes = time.hour() * 60 + time.minute();
        Self(u16::try_from(minutes).unwrap_or(0))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    pub fn add_minutes(self, minutes: i32) -> Self {
        Self::saturating_from_minutes(i32::from(self.0) + minutes)
    }

    /// `"HH:MM"` label used by slot grids.
    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseTimeOfDayError;

    /// Accepts `HH:MM` and `HH:MM:SS` (seconds are ignored).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut parts = trimmed.split(':');
        let (Some(hour), Some(minute)) = (parts.next(), parts.next()) else {
            return Err(ParseTimeOfDayError(s.to_string()));
        };
        if let Some(seconds) = parts.next() {
            if seconds.parse::<u8>().map_or(true, |sec| sec >= 60) {
                return Err(ParseTimeOfDayError(s.to_string()));
            }
        }
        if parts.next().is_some() {
            return Err(ParseTimeOfDayError(s.to_string()));
        }

        let hour = hour.parse::<u16>().map_err(|_| ParseTimeOfDayError(s.to_string()))?;
        let minute = minute.parse::<u16>().map_err(|_| ParseTimeOfDayError(s.to_string()))?;
        Self::new(hour, minute).ok_or_else(|| ParseTimeOfDayError(s.to_string()))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ParseTimeOfDayError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Opening hours for one weekday.
///
/// `day_of_week` uses 0 = Sunday through 6 = Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub day_of_week: u8,
    pub open: TimeOfDay,
    pub close: TimeOfDay,
    #[serde(default)]
    pub closed: bool,
}

impl DayHours {
    pub fn open(day_of_week: u8, open: TimeOfDay, close: TimeOfDay) -> Self {
        Self { day_of_week, open, close, closed: false }
    }

    pub fn closed(day_of_week: u8) -> Self {
        Self { day_of_week, open: TimeOfDay::MIDNIGHT, close: TimeOfDay::MIDNIGHT, closed: true }
    }
}

/// A tenant's weekly schedule, one optional entry per weekday.
///
/// Weekdays without an entry are treated as closed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<DayHours>", into = "Vec<DayHours>")]
pub struct BusinessHours {
    days: [Option<DayHours>; 7],
}

impl BusinessHours {
    /// Build a schedule from per-day entries.
    ///
    /// # Errors
    /// Returns `ChairsideError::InvalidInput` when a weekday index is out of
    /// range, appears twice, or an open day does not satisfy `open < close`.
    pub fn from_entries(entries: impl IntoIterator<Item = DayHours>) -> Result<Self> {
        let mut days: [Option<DayHours>; 7] = [None; 7];
        for entry in entries {
            let index = usize::from(entry.day_of_week);
            let Some(slot) = days.get_mut(index) else {
                return Err(ChairsideError::InvalidInput(format!(
                    "day_of_week must be 0-6, got {}",
                    entry.day_of_week
                )));
            };
            if slot.is_some() {
                return Err(ChairsideError::InvalidInput(format!(
                    "duplicate business hours for day {}",
                    entry.day_of_week
                )));
            }
            if !entry.closed && entry.open >= entry.close {
                return Err(ChairsideError::InvalidInput(format!(
                    "day {} opens at {} but closes at {}",
                    entry.day_of_week, entry.open, entry.close
                )));
            }
            *slot = Some(entry);
        }
        Ok(Self { days })
    }

    pub fn day(&self, day_of_week: u8) -> Option<&DayHours> {
        self.days.get(usize::from(day_of_week)).and_then(Option::as_ref)
    }

    pub fn for_weekday(&self, weekday: Weekday) -> Option<&DayHours> {
        self.day(weekday_index(weekday))
    }

    /// Entries for days that are open, in weekday order.
    pub fn open_days(&self) -> impl Iterator<Item = &DayHours> {
        self.days.iter().flatten().filter(|day| !day.closed)
    }

    pub fn entries(&self) -> impl Iterator<Item = &DayHours> {
        self.days.iter().flatten()
    }
}

impl TryFrom<Vec<DayHours>> for BusinessHours {
    type Error = ChairsideError;

    fn try_from(value: Vec<DayHours>) -> Result<Self> {
        Self::from_entries(value)
    }
}

impl From<BusinessHours> for Vec<DayHours> {
    fn from(value: BusinessHours) -> Self {
        value.days.into_iter().flatten().collect()
    }
}

/// 0 = Sunday .. 6 = Saturday
pub fn weekday_index(weekday: Weekday) -> u8 {
    // num_days_from_sunday() is always 0..=6
    u8::try_from(weekday.num_days_from_sunday()).unwrap_or(0)
}

//! Calendar view state (mode and anchor date)
//!
//! Passed explicitly to whoever renders or fetches the calendar; there is no
//! process-wide "current view".

use chairside_domain::DateRange;
use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::time::local_midnight;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Day,
    /// Monday to Sunday
    Week,
    Month,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarView {
    pub mode: ViewMode,
    pub anchor: NaiveDate,
}

impl CalendarView {
    pub fn new(mode: ViewMode, anchor: NaiveDate) -> Self {
        Self { mode, anchor }
    }

    /// First and last visible dates, inclusive.
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        match self.mode {
            ViewMode::Day => (self.anchor, self.anchor),
            ViewMode::Week => {
                let monday = self.anchor.week(Weekday::Mon).first_day();
                (monday, monday.checked_add_days(Days::new(6)).unwrap_or(monday))
            }
            ViewMode::Month => {
                let first = self.anchor.with_day(1).unwrap_or(self.anchor);
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(first);
                (first, last)
            }
        }
    }

    pub fn visible_dates(&self) -> Vec<NaiveDate> {
        let (first, last) = self.bounds();
        first.iter_days().take_while(|day| *day <= last).collect()
    }

    /// Instants covered by the view in the salon's zone.
    pub fn visible_range(&self, tz: Tz) -> DateRange {
        let (first, last) = self.bounds();
        let after = last.succ_opt().unwrap_or(last);
        DateRange::new(local_midnight(first, tz), local_midnight(after, tz))
    }

    #[must_use]
    pub fn next(&self) -> Self {
        self.shifted(true)
    }

    #[must_use]
    pub fn previous(&self) -> Self {
        self.shifted(false)
    }

    #[must_use]
    pub fn go_to(&self, date: NaiveDate) -> Self {
        Self { anchor: date, ..*self }
    }

    #[must_use]
    pub fn with_mode(&self, mode: ViewMode) -> Self {
        Self { mode, ..*self }
    }

    fn shifted(&self, forward: bool) -> Self {
        let anchor = match (self.mode, forward) {
            (ViewMode::Day, true) => self.anchor.checked_add_days(Days::new(1)),
            (ViewMode::Day, false) => self.anchor.checked_sub_days(Days::new(1)),
            (ViewMode::Week, true) => self.anchor.checked_add_days(Days::new(7)),
            (ViewMode::Week, false) => self.anchor.checked_sub_days(Days::new(7)),
            (ViewMode::Month, true) => self.anchor.checked_add_months(Months::new(1)),
            (ViewMode::Month, false) => self.anchor.checked_sub_months(Months::new(1)),
        };
        Self { anchor: anchor.unwrap_or(self.anchor), ..*self }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_starts_on_monday() {
        // Sunday 2025-06-08 belongs to the week starting Monday 2025-06-02
        let view = CalendarView::new(ViewMode::Week, date(2025, 6, 8));
        let dates = view.visible_dates();
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], date(2025, 6, 2));
        assert_eq!(dates[6], date(2025, 6, 8));
    }

    #[test]
    fn test_month_bounds() {
        let view = CalendarView::new(ViewMode::Month, date(2024, 2, 17));
        assert_eq!(view.bounds(), (date(2024, 2, 1), date(2024, 2, 29)));
        assert_eq!(view.visible_dates().len(), 29);
    }

    #[test]
    fn test_navigation() {
        let day = CalendarView::new(ViewMode::Day, date(2025, 1, 31));
        assert_eq!(day.next().anchor, date(2025, 2, 1));
        assert_eq!(day.previous().anchor, date(2025, 1, 30));

        let month = day.with_mode(ViewMode::Month);
        assert_eq!(month.next().anchor, date(2025, 2, 28));

        let week = day.with_mode(ViewMode::Week).go_to(date(2025, 3, 3));
        assert_eq!(week.previous().anchor, date(2025, 2, 24));
    }

    #[test]
    fn test_visible_range_in_zone() {
        let tz: Tz = "Europe/Berlin".parse().unwrap();
        let view = CalendarView::new(ViewMode::Day, date(2025, 6, 2));
        let range = view.visible_range(tz);
        assert_eq!(range.start, Utc.with_ymd_and_hms(2025, 6, 1, 22, 0, 0).unwrap());
        assert_eq!(range.end - range.start, Duration::hours(24));
    }
}

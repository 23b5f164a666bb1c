//! Shared test helpers for `chairside-core` integration tests.
//!
//! These helpers provide reusable fixtures and lightweight mocks so that
//! controller and service tests can focus on behaviour instead of
//! boilerplate.

#![allow(dead_code)]

pub mod repositories;

use chairside_domain::{
    AppointmentRecord, AppointmentStatus, BusinessHours, DayHours, PaymentStatus,
    StaffAssignment, TimeOfDay,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Monday 2025-06-02, the day every fixture lives on.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, hour, minute, 0).unwrap()
}

pub fn tod(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

/// A valid booked row on the fixture Monday.
pub fn row(id: &str, hour: u32, minute: u32, duration: i64) -> AppointmentRecord {
    AppointmentRecord {
        id: id.to_string(),
        scheduled_at: at(hour, minute).to_rfc3339(),
        duration_minutes: duration,
        staff: StaffAssignment::Any,
        service_id: "cut".to_string(),
        status: AppointmentStatus::Booked,
        payment_status: PaymentStatus::Unpaid,
        notes: None,
    }
}

pub fn staffed_row(id: &str, hour: u32, minute: u32, duration: i64, staff: &str) -> AppointmentRecord {
    AppointmentRecord { staff: StaffAssignment::staff(staff), ..row(id, hour, minute, duration) }
}

/// Weekdays 09:00-17:00, weekends closed.
pub fn weekday_hours() -> BusinessHours {
    BusinessHours::from_entries((0..7).map(|day| {
        if day == 0 || day == 6 {
            DayHours::closed(day)
        } else {
            DayHours::open(day, tod("09:00"), tod("17:00"))
        }
    }))
    .unwrap()
}

//! Overlap layout for the day/week time grid
//!
//! Appointments that overlap in time are placed side by side. The packer
//! works in three passes:
//!
//! 1. Sort by start ascending, longer duration first on ties, then id, so the
//!    output does not depend on input order.
//! 2. Sweep into overlap groups: a booking joins the current group while it
//!    starts before the latest end seen in that group.
//! 3. Inside each group assign the lowest column whose previous occupant has
//!    already ended, then stamp the group's column count on every member.
//!
//! Records with an unusable interval are left out and reported in
//! [`LayoutResult::rejected`].

use std::cmp::Reverse;

use chairside_domain::types::appointment::validate_interval;
use chairside_domain::{
    Appointment, Interval, LayoutInput, LayoutResult, PositionedAppointment, RejectedAppointment,
};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::calendar::time::day_range;

#[derive(Debug, Clone)]
struct Placeable {
    id: String,
    scheduled_at: DateTime<Utc>,
    duration_minutes: u32,
    interval: Interval,
}

impl Placeable {
    fn new(id: String, scheduled_at: DateTime<Utc>, duration_minutes: u32) -> Self {
        Self { id, scheduled_at, duration_minutes, interval: Interval::from_start(scheduled_at, duration_minutes) }
    }
}

/// Compute column positions for a set of raw bookings.
pub fn calculate_appointment_positions(items: &[LayoutInput]) -> LayoutResult {
    let mut valid = Vec::with_capacity(items.len());
    let mut rejected = Vec::new();

    for item in items {
        match validate_interval(&item.scheduled_at, item.duration_minutes) {
            Ok((start, duration)) => valid.push(Placeable::new(item.id.clone(), start, duration)),
            Err(reason) => {
                warn!(appointment_id = %item.id, reason = %reason, "Skipping appointment with invalid interval");
                rejected.push(RejectedAppointment { id: item.id.clone(), reason });
            }
        }
    }

    LayoutResult { positioned: pack(valid), rejected }
}

/// Layout of the active appointments that intersect local day `date`.
pub fn layout_day(appointments: &[Appointment], date: NaiveDate, tz: Tz) -> LayoutResult {
    let range = day_range(date, tz);
    let placeable = appointments
        .iter()
        .filter(|apt| apt.is_active() && range.intersects(&apt.interval()))
        .map(|apt| Placeable::new(apt.id.to_string(), apt.scheduled_at, apt.duration_minutes))
        .collect();

    LayoutResult { positioned: pack(placeable), rejected: Vec::new() }
}

fn pack(mut items: Vec<Placeable>) -> Vec<PositionedAppointment> {
    items.sort_by(|a, b| {
        (a.interval.start_minute, Reverse(a.interval.duration_minutes()), &a.id).cmp(&(
            b.interval.start_minute,
            Reverse(b.interval.duration_minutes()),
            &b.id,
        ))
    });

    let mut positioned = Vec::with_capacity(items.len());
    let mut group: Vec<Placeable> = Vec::new();
    let mut group_end = i64::MIN;
    let mut group_index = 0u32;

    for item in items {
        if !group.is_empty() && item.interval.start_minute >= group_end {
            place_group(std::mem::take(&mut group), group_index, &mut positioned);
            group_index += 1;
        }
        group_end = if group.is_empty() {
            item.interval.end_minute
        } else {
            group_end.max(item.interval.end_minute)
        };
        group.push(item);
    }
    if !group.is_empty() {
        place_group(group, group_index, &mut positioned);
    }

    positioned
}

fn place_group(group: Vec<Placeable>, group_index: u32, out: &mut Vec<PositionedAppointment>) {
    // End minute of the last booking placed in each column
    let mut column_ends: Vec<i64> = Vec::new();
    let mut columns = Vec::with_capacity(group.len());

    for item in &group {
        let free = column_ends.iter().position(|end| *end <= item.interval.start_minute);
        let column = match free {
            Some(index) => {
                column_ends[index] = item.interval.end_minute;
                index
            }
            None => {
                column_ends.push(item.interval.end_minute);
                column_ends.len() - 1
            }
        };
        columns.push(column);
    }

    let total_columns = u32::try_from(column_ends.len()).unwrap_or(u32::MAX).max(1);
    let width = 100.0 / f64::from(total_columns);
    debug!(group_index, members = group.len(), total_columns, "Packed overlap group");

    for (item, column) in group.into_iter().zip(columns) {
        let column_index = u32::try_from(column).unwrap_or(u32::MAX);
        out.push(PositionedAppointment {
            id: item.id,
            scheduled_at: item.scheduled_at,
            duration_minutes: item.duration_minutes,
            column_index,
            total_columns,
            left_percent: f64::from(column_index) * width,
            width_percent: width,
            group_index,
        });
    }
}

//! Column layout of concurrent appointments in a time-grid view

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::errors::IntervalError;
use crate::types::appointment::Appointment;

/// Minimal booking shape accepted by the layout packer.
///
/// The start is kept as the raw stored string so malformed rows can be
/// reported rather than crash the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInput {
    pub id: String,
    pub scheduled_at: String,
    pub duration_minutes: i64,
}

impl From<&Appointment> for LayoutInput {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: appointment.id.to_string(),
            scheduled_at: appointment.scheduled_at.to_rfc3339(),
            duration_minutes: i64::from(appointment.duration_minutes),
        }
    }
}

/// An appointment with its horizontal placement inside its overlap group.
///
/// Every member of a group carries the same `total_columns`, so widths line
/// up across the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct PositionedAppointment {
    pub id: String,

    pub scheduled_at: DateTime<Utc>,

    pub duration_minutes: u32,

    /// Zero-based column within the overlap group
    pub column_index: u32,

    /// Column count of the whole overlap group
    pub total_columns: u32,

    pub left_percent: f64,

    pub width_percent: f64,

    /// Index of the overlap group in start order
    pub group_index: u32,
}

/// A record left out of the layout because its interval is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedAppointment {
    pub id: String,
    pub reason: IntervalError,
}

/// Packer output: placed appointments in start order plus anything skipped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutResult {
    pub positioned: Vec<PositionedAppointment>,
    pub rejected: Vec<RejectedAppointment>,
}

impl LayoutResult {
    pub fn get(&self, id: &str) -> Option<&PositionedAppointment> {
        self.positioned.iter().find(|item| item.id == id)
    }

    /// Number of distinct overlap groups.
    pub fn group_count(&self) -> usize {
        self.positioned.iter().map(|item| item.group_index + 1).max().map_or(0, |n| n as usize)
    }
}

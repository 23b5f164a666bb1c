//! Reversible edits produced by direct manipulation of the calendar

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::appointment::{Appointment, AppointmentId, AppointmentPatch, StaffAssignment};

/// Which part of an appointment an edit touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditField {
    /// Drag-move: start changes, duration is kept.
    ScheduledAt,
    /// Bottom-edge resize: start is kept.
    DurationMinutes,
    /// Top-edge resize: start and duration change together, end is kept.
    Interval,
    Staff,
}

impl fmt::Display for EditField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ScheduledAt => "scheduled_at",
            Self::DurationMinutes => "duration_minutes",
            Self::Interval => "interval",
            Self::Staff => "staff",
        };
        f.write_str(name)
    }
}

/// Value of an [`EditField`] before or after an edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    ScheduledAt(DateTime<Utc>),
    DurationMinutes(u32),
    Interval { scheduled_at: DateTime<Utc>, duration_minutes: u32 },
    Staff(StaffAssignment),
}

impl FieldValue {
    pub fn field(&self) -> EditField {
        match self {
            Self::ScheduledAt(_) => EditField::ScheduledAt,
            Self::DurationMinutes(_) => EditField::DurationMinutes,
            Self::Interval { .. } => EditField::Interval,
            Self::Staff(_) => EditField::Staff,
        }
    }

    /// Current value of `field` on `appointment`.
    pub fn read(appointment: &Appointment, field: EditField) -> Self {
        match field {
            EditField::ScheduledAt => Self::ScheduledAt(appointment.scheduled_at),
            EditField::DurationMinutes => Self::DurationMinutes(appointment.duration_minutes),
            EditField::Interval => Self::Interval {
                scheduled_at: appointment.scheduled_at,
                duration_minutes: appointment.duration_minutes,
            },
            EditField::Staff => Self::Staff(appointment.staff.clone()),
        }
    }

    /// Patch that writes this value.
    pub fn to_patch(&self) -> AppointmentPatch {
        match self {
            Self::ScheduledAt(at) => {
                AppointmentPatch { scheduled_at: Some(*at), ..AppointmentPatch::default() }
            }
            Self::DurationMinutes(minutes) => {
                AppointmentPatch { duration_minutes: Some(*minutes), ..AppointmentPatch::default() }
            }
            Self::Interval { scheduled_at, duration_minutes } => AppointmentPatch {
                scheduled_at: Some(*scheduled_at),
                duration_minutes: Some(*duration_minutes),
                ..AppointmentPatch::default()
            },
            Self::Staff(staff) => {
                AppointmentPatch { staff: Some(staff.clone()), ..AppointmentPatch::default() }
            }
        }
    }
}

/// One committed (or in-flight) change to a single appointment.
///
/// Undo, redo and rollback after a failed write all go through
/// [`PendingEdit::inverted`]; there is no separate inverse logic per edit kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEdit {
    pub appointment_id: AppointmentId,
    pub field: EditField,
    pub old_value: FieldValue,
    pub new_value: FieldValue,
}

impl PendingEdit {
    /// Edit of `appointment` to `new_value`, capturing the current value as
    /// `old_value`.
    pub fn capture(appointment: &Appointment, new_value: FieldValue) -> Self {
        let field = new_value.field();
        Self {
            appointment_id: appointment.id.clone(),
            field,
            old_value: FieldValue::read(appointment, field),
            new_value,
        }
    }

    /// The edit that undoes this one.
    #[must_use]
    pub fn inverted(&self) -> Self {
        Self {
            appointment_id: self.appointment_id.clone(),
            field: self.field,
            old_value: self.new_value.clone(),
            new_value: self.old_value.clone(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.old_value == self.new_value
    }

    pub fn forward_patch(&self) -> AppointmentPatch {
        self.new_value.to_patch()
    }

    pub fn inverse_patch(&self) -> AppointmentPatch {
        self.old_value.to_patch()
    }

    /// Start and duration the appointment has once this edit is applied.
    pub fn resulting_interval(&self, appointment: &Appointment) -> (DateTime<Utc>, u32) {
        match &self.new_value {
            FieldValue::ScheduledAt(at) => (*at, appointment.duration_minutes),
            FieldValue::DurationMinutes(minutes) => (appointment.scheduled_at, *minutes),
            FieldValue::Interval { scheduled_at, duration_minutes } => {
                (*scheduled_at, *duration_minutes)
            }
            FieldValue::Staff(_) => (appointment.scheduled_at, appointment.duration_minutes),
        }
    }
}

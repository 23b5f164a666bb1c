//! Input-agnostic drag and resize gestures
//!
//! A gesture only knows the appointment it started on and the latest pointer
//! instant. Mouse, touch and keyboard front ends all reduce to
//! `begin -> update_pointer* -> drop | cancel`.

use chairside_domain::{Appointment, AppointmentId, FieldValue};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::time::snap_to_grid;

/// Lifecycle of one edit, published to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging,
    Validating,
    /// Waiting for the backend; the UI shows the edit as pending.
    Committing,
    /// Last edit was refused; held until the next gesture or `cancel`.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeEdge {
    /// End stays put, start moves.
    Top,
    /// Start stays put, end moves.
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "edge")]
pub enum GestureKind {
    Move,
    Resize(ResizeEdge),
}

/// Grid and duration limits applied while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapRules {
    pub snap_minutes: u32,
    pub min_duration_minutes: u32,
    pub max_duration_minutes: u32,
}

/// Ghost rendered under the pointer; nothing is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    pub appointment_id: AppointmentId,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    /// Would dropping here collide with another booking
    pub conflict: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gesture {
    pub appointment_id: AppointmentId,
    pub kind: GestureKind,
    origin_start: DateTime<Utc>,
    origin_duration: u32,
    proposal: Option<(DateTime<Utc>, u32)>,
}

impl Gesture {
    pub fn begin(appointment: &Appointment, kind: GestureKind) -> Self {
        Self {
            appointment_id: appointment.id.clone(),
            kind,
            origin_start: appointment.scheduled_at,
            origin_duration: appointment.duration_minutes,
            proposal: None,
        }
    }

    /// Recompute the proposal from a pointer instant.
    ///
    /// For a move the pointer is the proposed start. For a top resize it is
    /// the proposed start, for a bottom resize the proposed end.
    pub fn track(&mut self, pointer: DateTime<Utc>, rules: &SnapRules) -> (DateTime<Utc>, u32) {
        let snapped = snap_to_grid(pointer, rules.snap_minutes);
        let clamp = |minutes: i64| {
            let bounded = minutes.clamp(
                i64::from(rules.min_duration_minutes),
                i64::from(rules.max_duration_minutes),
            );
            u32::try_from(bounded).unwrap_or(rules.min_duration_minutes)
        };

        let proposal = match self.kind {
            GestureKind::Move => (snapped, self.origin_duration),
            GestureKind::Resize(ResizeEdge::Bottom) => {
                let duration = clamp((snapped - self.origin_start).num_minutes());
                (self.origin_start, duration)
            }
            GestureKind::Resize(ResizeEdge::Top) => {
                let end = self.origin_start + Duration::minutes(i64::from(self.origin_duration));
                let duration = clamp((end - snapped).num_minutes());
                (end - Duration::minutes(i64::from(duration)), duration)
            }
        };
        self.proposal = Some(proposal);
        proposal
    }

    /// Latest proposal, if the pointer ever moved.
    pub fn proposal(&self) -> Option<(DateTime<Utc>, u32)> {
        self.proposal
    }

    /// Field value the drop would write.
    pub fn target_value(&self) -> Option<FieldValue> {
        let (start, duration) = self.proposal?;
        Some(match self.kind {
            GestureKind::Move => FieldValue::ScheduledAt(start),
            GestureKind::Resize(ResizeEdge::Bottom) => FieldValue::DurationMinutes(duration),
            GestureKind::Resize(ResizeEdge::Top) => {
                FieldValue::Interval { scheduled_at: start, duration_minutes: duration }
            }
        })
    }
}

//! Drag/resize transaction controller with undo/redo
//!
//! Owns the booking snapshot for the visible range and drives every edit
//! through the same pipeline:
//!
//! ```text
//! Idle -> Dragging -> Validating -> Committing -> Idle
//!                          |              |
//!                          +-> Rejected <-+
//! ```
//!
//! `Rejected` stays published until the next gesture starts or `cancel` is
//! called.
//!
//! Commits are optimistic: the snapshot changes before the backend answers
//! and is rolled back if the write fails, or if the commit future is dropped
//! before the backend answers. Undo and redo replay stored [`PendingEdit`]s
//! through the same validation and commit path.

use std::sync::Arc;

use chairside_common::error::report;
use chairside_domain::{
    AppointmentId, BusinessHours, ConflictScope, DateRange, EditField, FieldValue, Interval,
    PendingEdit, SchedulingConfig, StaffAssignment,
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::error::{EditError, EditResult};
use super::gesture::{Gesture, GestureKind, GesturePhase, Preview, ResizeEdge, SnapRules};
use super::history::UndoHistory;
use crate::calendar::time::local_parts;
use crate::calendar::BookingSnapshot;
use crate::ports::BookingRepository;
use crate::scheduling::conflict::find_conflicts;
use crate::scheduling::hours::interval_within_business_hours;

/// Rules the controller applies to every edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditRules {
    pub snap: SnapRules,
    pub conflict_scope: ConflictScope,
    pub enforce_business_hours: bool,
    pub refresh_after_commit: bool,
}

impl Default for EditRules {
    fn default() -> Self {
        Self::from(&SchedulingConfig::default())
    }
}

impl From<&SchedulingConfig> for EditRules {
    fn from(config: &SchedulingConfig) -> Self {
        Self {
            snap: SnapRules {
                snap_minutes: config.snap_minutes,
                min_duration_minutes: config.min_duration_minutes,
                max_duration_minutes: config.max_duration_minutes,
            },
            conflict_scope: config.conflict_scope,
            enforce_business_hours: config.enforce_business_hours,
            refresh_after_commit: config.refresh_after_commit,
        }
    }
}

/// Result of dropping a gesture or submitting a form edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "edit", rename_all = "snake_case")]
pub enum DropOutcome {
    Committed(PendingEdit),
    /// Nothing changed (pointer never moved, or snapped back to the origin).
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Undo,
    Redo,
}

pub struct EditController {
    repository: Arc<dyn BookingRepository>,
    tz: Tz,
    rules: EditRules,
    business_hours: Option<BusinessHours>,
    snapshot: BookingSnapshot,
    history: UndoHistory,
    gesture: Option<Gesture>,
    phase: watch::Sender<GesturePhase>,
}

impl EditController {
    pub fn new(repository: Arc<dyn BookingRepository>, tz: Tz) -> Self {
        let (phase, _) = watch::channel(GesturePhase::Idle);
        Self {
            repository,
            tz,
            rules: EditRules::default(),
            business_hours: None,
            snapshot: BookingSnapshot::default(),
            history: UndoHistory::new(),
            gesture: None,
            phase,
        }
    }

    pub fn with_rules(mut self, rules: EditRules) -> Self {
        self.rules = rules;
        self
    }

    /// Hours used when `enforce_business_hours` is on.
    pub fn with_business_hours(mut self, hours: Option<BusinessHours>) -> Self {
        self.business_hours = hours;
        self
    }

    pub fn set_business_hours(&mut self, hours: Option<BusinessHours>) {
        self.business_hours = hours;
    }

    /// Observe phase changes, e.g. to show a pending indicator while
    /// `Committing`.
    pub fn subscribe(&self) -> watch::Receiver<GesturePhase> {
        self.phase.subscribe()
    }

    pub fn phase(&self) -> GesturePhase {
        *self.phase.borrow()
    }

    pub fn snapshot(&self) -> &BookingSnapshot {
        &self.snapshot
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    pub fn active_gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    /// Load the bookings of a new visible range.
    ///
    /// Edits recorded against the previous range are discarded along with any
    /// gesture in progress, even when the fetch fails.
    pub async fn set_range(&mut self, range: DateRange) -> EditResult<()> {
        self.gesture = None;
        self.history.clear();
        self.snapshot.clear();
        self.set_phase(GesturePhase::Idle);

        let records = self.repository.fetch_bookings(range).await.map_err(|err| {
            let err = EditError::Unavailable(err);
            report("edit::set_range", &err);
            err
        })?;
        self.snapshot.replace(range, records);

        info!(
            range_start = %range.start,
            range_end = %range.end,
            bookings = self.snapshot.len(),
            rejected = self.snapshot.rejected().len(),
            "Loaded calendar range"
        );
        Ok(())
    }

    /// Drop all transient state, e.g. when the calendar is closed.
    pub fn reset(&mut self) {
        self.gesture = None;
        self.history.clear();
        self.set_phase(GesturePhase::Idle);
    }

    pub fn begin_move(&mut self, id: &AppointmentId) -> EditResult<()> {
        self.begin(id, GestureKind::Move)
    }

    pub fn begin_resize(&mut self, id: &AppointmentId, edge: ResizeEdge) -> EditResult<()> {
        self.begin(id, GestureKind::Resize(edge))
    }

    fn begin(&mut self, id: &AppointmentId, kind: GestureKind) -> EditResult<()> {
        if self.gesture.is_some()
            || !matches!(self.phase(), GesturePhase::Idle | GesturePhase::Rejected)
        {
            return Err(EditError::GestureInProgress);
        }
        let appointment = self
            .snapshot
            .get(id)
            .filter(|apt| apt.is_active())
            .ok_or_else(|| EditError::NotFound(id.clone()))?;

        self.gesture = Some(Gesture::begin(appointment, kind));
        debug!(appointment_id = %id, kind = ?kind, "Gesture started");
        self.set_phase(GesturePhase::Dragging);
        Ok(())
    }

    /// Move the ghost. Commits nothing.
    pub fn update_pointer(&mut self, pointer: DateTime<Utc>) -> EditResult<Preview> {
        let rules = self.rules;
        let gesture = self.gesture.as_mut().ok_or(EditError::NoActiveGesture)?;
        let (scheduled_at, duration_minutes) = gesture.track(pointer, &rules.snap);
        let appointment_id = gesture.appointment_id.clone();

        let staff =
            self.snapshot.get(&appointment_id).map(|apt| apt.staff.clone()).unwrap_or_default();
        let conflict = !conflicting_ids(
            &self.snapshot,
            &appointment_id,
            Interval::from_start(scheduled_at, duration_minutes),
            &staff,
            rules.conflict_scope,
        )
        .is_empty();

        Ok(Preview { appointment_id, scheduled_at, duration_minutes, conflict })
    }

    /// Abandon the gesture without side effects.
    pub fn cancel(&mut self) {
        if let Some(gesture) = self.gesture.take() {
            debug!(appointment_id = %gesture.appointment_id, "Gesture cancelled");
        }
        self.set_phase(GesturePhase::Idle);
    }

    /// Validate and commit the current gesture.
    pub async fn drop_gesture(&mut self) -> EditResult<DropOutcome> {
        let gesture = self.gesture.take().ok_or(EditError::NoActiveGesture)?;

        let Some(new_value) = gesture.target_value() else {
            self.set_phase(GesturePhase::Idle);
            return Ok(DropOutcome::Unchanged);
        };
        let Some(appointment) = self.snapshot.get(&gesture.appointment_id) else {
            let err = EditError::NotFound(gesture.appointment_id);
            return Err(self.reject("edit::drop", err));
        };

        let edit = PendingEdit::capture(appointment, new_value);
        if edit.is_noop() {
            debug!(appointment_id = %edit.appointment_id, "Drop left appointment unchanged");
            self.set_phase(GesturePhase::Idle);
            return Ok(DropOutcome::Unchanged);
        }

        self.apply(edit, Direction::Forward).await.map(DropOutcome::Committed)
    }

    /// Move an appointment to another staff member.
    pub async fn reassign_staff(
        &mut self,
        id: &AppointmentId,
        staff: StaffAssignment,
    ) -> EditResult<DropOutcome> {
        if self.gesture.is_some() {
            return Err(EditError::GestureInProgress);
        }
        let appointment = self.snapshot.get(id).ok_or_else(|| EditError::NotFound(id.clone()))?;
        let edit = PendingEdit::capture(appointment, FieldValue::Staff(staff));
        if edit.is_noop() {
            return Ok(DropOutcome::Unchanged);
        }

        self.apply(edit, Direction::Forward).await.map(DropOutcome::Committed)
    }

    /// Revert the most recent committed edit. Returns the edit that was
    /// applied to do so.
    pub async fn undo(&mut self) -> EditResult<PendingEdit> {
        if self.gesture.is_some() {
            return Err(EditError::GestureInProgress);
        }
        let entry = self.history.pop_undo().ok_or(EditError::NothingToUndo)?;
        self.apply(entry, Direction::Undo).await
    }

    /// Re-apply the most recently undone edit.
    pub async fn redo(&mut self) -> EditResult<PendingEdit> {
        if self.gesture.is_some() {
            return Err(EditError::GestureInProgress);
        }
        let entry = self.history.pop_redo().ok_or(EditError::NothingToRedo)?;
        self.apply(entry, Direction::Redo).await
    }

    async fn apply(&mut self, entry: PendingEdit, direction: Direction) -> EditResult<PendingEdit> {
        let edit = match direction {
            Direction::Forward | Direction::Redo => entry.clone(),
            Direction::Undo => entry.inverted(),
        };

        self.set_phase(GesturePhase::Validating);
        if let Err(err) = self.validate(&edit, direction == Direction::Forward) {
            // A stale entry for a booking that no longer exists is dropped
            if !matches!(err, EditError::NotFound(_)) {
                self.restore(entry, direction);
            }
            return Err(self.reject("edit::validate", err));
        }

        self.set_phase(GesturePhase::Committing);
        let patch = edit.forward_patch();
        self.snapshot.apply_patch(&edit.appointment_id, &patch);
        let cleared_redo = match direction {
            Direction::Forward => self.history.record(entry.clone()),
            Direction::Undo | Direction::Redo => Vec::new(),
        };

        let rollback = Rollback { edit: edit.clone(), entry, direction, cleared_redo };
        let repository = Arc::clone(&self.repository);
        let guard = CommitGuard::arm(self, rollback.clone());
        let result = repository.update_booking(&edit.appointment_id, patch).await;
        guard.disarm();

        match result {
            Ok(()) => {
                match direction {
                    Direction::Forward => {}
                    Direction::Undo => self.history.push_redo(rollback.entry),
                    Direction::Redo => self.history.push_undo(rollback.entry),
                }
                info!(
                    appointment_id = %edit.appointment_id,
                    field = %edit.field,
                    direction = ?direction,
                    "Committed appointment edit"
                );
                // Write settled; the refresh is best effort
                self.set_phase(GesturePhase::Idle);
                if self.rules.refresh_after_commit {
                    self.refresh().await;
                }
                Ok(edit)
            }
            Err(source) => {
                self.roll_back(rollback);
                warn!(
                    appointment_id = %edit.appointment_id,
                    error = %source,
                    "Rolled back optimistic edit"
                );
                let err = EditError::PersistenceRejected { appointment_id: edit.appointment_id, source };
                Err(self.reject("edit::commit", err))
            }
        }
    }

    fn validate(&self, edit: &PendingEdit, check_hours: bool) -> EditResult<()> {
        let appointment = self
            .snapshot
            .get(&edit.appointment_id)
            .ok_or_else(|| EditError::NotFound(edit.appointment_id.clone()))?;
        let (start, duration) = edit.resulting_interval(appointment);

        let (staff, scope) = match &edit.new_value {
            FieldValue::Staff(staff) => (staff, ConflictScope::PerStaff),
            _ => (&appointment.staff, self.rules.conflict_scope),
        };
        let conflicting = conflicting_ids(
            &self.snapshot,
            &edit.appointment_id,
            Interval::from_start(start, duration),
            staff,
            scope,
        );
        if !conflicting.is_empty() {
            return Err(EditError::Conflict {
                appointment_id: edit.appointment_id.clone(),
                conflicting,
            });
        }

        if check_hours && self.rules.enforce_business_hours && edit.field != EditField::Staff {
            if let Some(hours) = &self.business_hours {
                let (_, day, time) = local_parts(start, self.tz);
                if !interval_within_business_hours(hours, day, time, duration) {
                    return Err(EditError::OutsideBusinessHours(edit.appointment_id.clone()));
                }
            }
        }
        Ok(())
    }

    /// Undo the optimistic half of a commit: snapshot and history.
    fn roll_back(&mut self, rollback: Rollback) {
        let Rollback { edit, entry, direction, cleared_redo } = rollback;
        self.snapshot.apply_patch(&edit.appointment_id, &edit.inverse_patch());
        match direction {
            Direction::Forward => {
                self.history.rollback_record(cleared_redo);
            }
            Direction::Undo | Direction::Redo => self.restore(entry, direction),
        }
    }

    fn restore(&mut self, entry: PendingEdit, direction: Direction) {
        match direction {
            Direction::Forward => {}
            Direction::Undo => self.history.push_undo(entry),
            Direction::Redo => self.history.push_redo(entry),
        }
    }

    async fn refresh(&mut self) {
        let Some(range) = self.snapshot.range() else {
            return;
        };
        match self.repository.fetch_bookings(range).await {
            Ok(records) => self.snapshot.replace(range, records),
            Err(err) => {
                warn!(error = %err, "Refresh after commit failed; keeping local snapshot");
            }
        }
    }

    fn reject(&mut self, operation: &str, err: EditError) -> EditError {
        report(operation, &err);
        self.set_phase(GesturePhase::Rejected);
        err
    }

    fn set_phase(&self, phase: GesturePhase) {
        let previous = self.phase.send_replace(phase);
        if previous != phase {
            debug!(from = ?previous, to = ?phase, "Edit phase changed");
        }
    }
}

/// What a commit changed locally before the backend answered.
#[derive(Debug, Clone)]
struct Rollback {
    edit: PendingEdit,
    entry: PendingEdit,
    direction: Direction,
    cleared_redo: Vec<PendingEdit>,
}

/// Rolls an in-flight commit back when the future driving it is dropped.
///
/// Whether the backend applied the write is unknown at that point; the next
/// `set_range` refetch settles it.
struct CommitGuard<'a> {
    controller: &'a mut EditController,
    rollback: Option<Rollback>,
}

impl<'a> CommitGuard<'a> {
    fn arm(controller: &'a mut EditController, rollback: Rollback) -> Self {
        Self { controller, rollback: Some(rollback) }
    }

    /// The backend answered; the caller settles the commit itself.
    fn disarm(mut self) {
        self.rollback = None;
    }
}

impl Drop for CommitGuard<'_> {
    fn drop(&mut self) {
        let Some(rollback) = self.rollback.take() else {
            return;
        };
        warn!(
            appointment_id = %rollback.edit.appointment_id,
            "Commit abandoned before the backend answered; rolled back"
        );
        self.controller.roll_back(rollback);
        self.controller.set_phase(GesturePhase::Idle);
    }
}

fn conflicting_ids(
    snapshot: &BookingSnapshot,
    id: &AppointmentId,
    candidate: Interval,
    staff: &StaffAssignment,
    scope: ConflictScope,
) -> Vec<AppointmentId> {
    find_conflicts(&candidate, staff, snapshot.appointments(), Some(id), scope)
        .into_iter()
        .map(|apt| apt.id.clone())
        .collect()
}

//! Double-booking detection
//!
//! Two bookings `[s1, e1)` and `[s2, e2)` conflict iff `s1 < e2 && s2 < e1`,
//! so back-to-back bookings never collide. All arithmetic is on whole minutes
//! (see [`Interval`]).

use chairside_domain::{Appointment, AppointmentId, ConflictScope, Interval, StaffAssignment};
use chrono::{DateTime, Utc};

/// Whether a candidate booking overlaps any active booking in `existing`.
///
/// `exclude_id` skips the appointment being edited so it never collides with
/// its own previous position. Every booking competes for the same time; use
/// [`find_conflicts`] for per-staff scoping.
pub fn has_conflict(
    candidate_start: DateTime<Utc>,
    candidate_duration_minutes: u32,
    existing: &[Appointment],
    exclude_id: Option<&AppointmentId>,
) -> bool {
    let candidate = Interval::from_start(candidate_start, candidate_duration_minutes);
    existing.iter().any(|other| blocks(other, &candidate, exclude_id))
}

/// Every active booking that collides with `candidate` under `scope`, in input
/// order.
pub fn find_conflicts<'a>(
    candidate: &Interval,
    staff: &StaffAssignment,
    existing: &'a [Appointment],
    exclude_id: Option<&AppointmentId>,
    scope: ConflictScope,
) -> Vec<&'a Appointment> {
    existing
        .iter()
        .filter(|other| blocks(other, candidate, exclude_id))
        .filter(|other| match scope {
            ConflictScope::Salon => true,
            ConflictScope::PerStaff => staff.competes_with(&other.staff),
        })
        .collect()
}

fn blocks(other: &Appointment, candidate: &Interval, exclude_id: Option<&AppointmentId>) -> bool {
    other.is_active()
        && exclude_id.map_or(true, |id| *id != other.id)
        && other.interval().overlaps(candidate)
}

#[cfg(test)]
mod tests {
    use chairside_domain::{AppointmentStatus, PaymentStatus};
    use chrono::{Duration, TimeZone};

    use super::*;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, hour, minute, 0).unwrap()
    }

    fn booking(id: &str, start: DateTime<Utc>, minutes: u32, staff: &str) -> Appointment {
        Appointment {
            id: AppointmentId::new(id),
            scheduled_at: start,
            duration_minutes: minutes,
            staff: StaffAssignment::staff(staff),
            service_id: "cut".to_string(),
            status: AppointmentStatus::Booked,
            payment_status: PaymentStatus::Unpaid,
            notes: None,
        }
    }

    #[test]
    fn test_back_to_back_is_not_a_conflict() {
        let existing = vec![booking("a", at(10, 0), 30, "jo")];
        assert!(!has_conflict(at(10, 30), 30, &existing, None));
        assert!(!has_conflict(at(9, 30), 30, &existing, None));
    }

    #[test]
    fn test_overlap_detected() {
        let existing = vec![booking("a", at(10, 0), 30, "jo")];
        assert!(has_conflict(at(10, 15), 30, &existing, None));
        assert!(has_conflict(at(9, 45), 30, &existing, None));
        assert!(has_conflict(at(9, 0), 180, &existing, None));
    }

    #[test]
    fn test_uses_each_bookings_own_duration() {
        let existing = vec![booking("long", at(9, 0), 120, "jo")];
        assert!(has_conflict(at(10, 45), 15, &existing, None));
    }

    #[test]
    fn test_conflict_is_symmetric() {
        let a = booking("a", at(10, 0), 45, "jo");
        let b = booking("b", at(10, 30), 60, "jo");
        let forward = has_conflict(a.scheduled_at, a.duration_minutes, std::slice::from_ref(&b), None);
        let backward = has_conflict(b.scheduled_at, b.duration_minutes, std::slice::from_ref(&a), None);
        assert_eq!(forward, backward);
        assert!(forward);
    }

    #[test]
    fn test_excluded_id_never_conflicts_with_itself() {
        let existing = vec![booking("a", at(10, 0), 60, "jo")];
        let id = AppointmentId::new("a");
        assert!(!has_conflict(at(10, 15), 60, &existing, Some(&id)));
        assert!(has_conflict(at(10, 15), 60, &existing, None));
    }

    #[test]
    fn test_cancelled_bookings_are_ignored() {
        let mut cancelled = booking("a", at(10, 0), 60, "jo");
        cancelled.status = AppointmentStatus::Cancelled;
        assert!(!has_conflict(at(10, 0), 60, &[cancelled], None));
    }

    #[test]
    fn test_sub_minute_offsets_never_hide_an_overlap() {
        let existing = vec![booking("a", at(10, 0), 30, "jo")];
        let start = at(10, 30) - Duration::seconds(20);
        assert!(has_conflict(start, 30, &existing, None));
        assert!(!has_conflict(at(10, 30) + Duration::seconds(59), 30, &existing, None));

        // Stored at 10:00:30, so it runs until 10:30:30
        let late = vec![booking("b", at(10, 0) + Duration::seconds(30), 30, "jo")];
        assert!(has_conflict(at(10, 30), 30, &late, None));
        assert!(!has_conflict(at(10, 31), 30, &late, None));
    }

    #[test]
    fn test_per_staff_scope() {
        let existing = vec![
            booking("jo-cut", at(10, 0), 60, "jo"),
            booking("sam-cut", at(10, 0), 60, "sam"),
        ];
        let candidate = Interval::from_start(at(10, 30), 30);

        let for_jo = find_conflicts(
            &candidate,
            &StaffAssignment::staff("jo"),
            &existing,
            None,
            ConflictScope::PerStaff,
        );
        assert_eq!(for_jo.len(), 1);
        assert_eq!(for_jo[0].id.as_str(), "jo-cut");

        let for_anyone =
            find_conflicts(&candidate, &StaffAssignment::Any, &existing, None, ConflictScope::PerStaff);
        assert_eq!(for_anyone.len(), 2);

        let salon = find_conflicts(
            &candidate,
            &StaffAssignment::staff("alex"),
            &existing,
            None,
            ConflictScope::Salon,
        );
        assert_eq!(salon.len(), 2);
    }
}

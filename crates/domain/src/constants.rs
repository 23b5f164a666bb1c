//! Application constants
//!
//! Centralized location for all domain-level scheduling constants.

// Business-hours fallbacks (minutes since midnight)
pub const DEFAULT_OPEN_MINUTES: u16 = 7 * 60;
pub const DEFAULT_CLOSE_MINUTES: u16 = 22 * 60;

// Slot grid
pub const DEFAULT_SLOT_GRANULARITY_MINUTES: u16 = 15;
pub const SLOT_MARGIN_MINUTES: u16 = 60;

// Appointment durations
pub const MIN_APPOINTMENT_MINUTES: u32 = 15;
pub const MAX_APPOINTMENT_MINUTES: u32 = 480;
pub const SNAP_INCREMENT_MINUTES: u32 = 15;
/// Records claiming more than a full day are treated as malformed.
pub const MAX_RECORD_DURATION_MINUTES: i64 = 24 * 60;

// Staff assignment sentinel meaning "unassigned / any staff member"
pub const ANY_STAFF_SENTINEL: &str = "any";

pub const MINUTES_PER_DAY: u16 = 24 * 60;
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_TENANT_ID: &str = "default";

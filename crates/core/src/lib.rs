//! # Chairside Core
//!
//! Scheduling engine - no infrastructure dependencies.
//!
//! This crate contains:
//! - Business-hours resolution, conflict detection, overlap layout and slot
//!   grids (pure functions in [`scheduling`])
//! - Calendar view state and the in-memory booking snapshot
//! - The drag/resize edit controller with undo/redo
//! - The booking service composing the ports
//! - Port interfaces (traits) for the booking backend and hours source
//!
//! ## Architecture Principles
//! - Only depends on `chairside-common` and `chairside-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod booking;
pub mod calendar;
pub mod editing;
pub mod ports;
pub mod scheduling;

pub use booking::{BookingError, DayView, ScheduleService};
pub use calendar::{BookingSnapshot, CalendarView, ViewMode};
pub use editing::{
    DropOutcome, EditController, EditError, EditRules, GesturePhase, Preview, ResizeEdge,
    UndoHistory,
};
pub use ports::{BookingRepository, BusinessHoursProvider, TenantId};
pub use scheduling::conflict::{find_conflicts, has_conflict};
pub use scheduling::hours::{
    earliest_open_time, interval_within_business_hours, is_open_on, is_within_business_hours,
    latest_close_time,
};
pub use scheduling::layout::{calculate_appointment_positions, layout_day};
pub use scheduling::slots::{
    available_start_times, generate_slots, generate_slots_with, AvailabilityQuery, SlotGridOptions,
};

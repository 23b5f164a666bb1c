//! Domain types and models
//!
//! Scheduling data shared by the core engine, its ports and the adapters.

pub mod appointment;
pub mod edit;
pub mod hours;
pub mod layout;
pub mod range;
pub mod slot;

pub use appointment::{
    Appointment, AppointmentId, AppointmentPatch, AppointmentRecord, AppointmentStatus,
    NewAppointment, PaymentStatus, StaffAssignment,
};
pub use edit::{EditField, FieldValue, PendingEdit};
pub use hours::{BusinessHours, DayHours, ParseTimeOfDayError, TimeOfDay};
pub use layout::{LayoutInput, LayoutResult, PositionedAppointment, RejectedAppointment};
pub use range::{DateRange, Interval};
pub use slot::{SlotUnavailableReason, TimeSlot};

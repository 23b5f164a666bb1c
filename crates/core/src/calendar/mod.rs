//! Calendar state: visible range, booking snapshot and local-time helpers

pub mod snapshot;
pub mod time;
pub mod view;

pub use snapshot::BookingSnapshot;
pub use view::{CalendarView, ViewMode};

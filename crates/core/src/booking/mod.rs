//! Booking flow: day views, availability search and booking lifecycle

pub mod error;
pub mod service;

pub use error::BookingError;
pub use service::{DayView, ScheduleService};

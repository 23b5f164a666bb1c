//! Business-hours provider adapters

pub mod configured;

pub use configured::ConfiguredHoursProvider;

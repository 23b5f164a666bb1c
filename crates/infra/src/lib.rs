//! # Chairside Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Configuration loading (environment variables, JSON/TOML files)
//! - An in-memory booking repository with an overlap constraint
//! - A business-hours provider backed by configuration
//! - Tracing subscriber initialisation
//!
//! ## Architecture
//! - Implements traits defined in `chairside-core`
//! - Contains all "impure" code (I/O, environment, global subscribers)

pub mod config;
pub mod hours;
pub mod observability;
pub mod repository;

// Re-export commonly used items
pub use hours::ConfiguredHoursProvider;
pub use observability::init_tracing;
pub use repository::InMemoryBookingRepository;

//! Configuration management

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CLOSE_MINUTES, DEFAULT_OPEN_MINUTES, DEFAULT_SLOT_GRANULARITY_MINUTES,
    DEFAULT_TENANT_ID, DEFAULT_TIMEZONE, MAX_APPOINTMENT_MINUTES, MIN_APPOINTMENT_MINUTES,
    SLOT_MARGIN_MINUTES, SNAP_INCREMENT_MINUTES,
};
use crate::errors::{ChairsideError, Result};
use crate::types::hours::TimeOfDay;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub salon: SalonConfig,
    pub scheduling: SchedulingConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Validate the configuration
    ///
    /// # Errors
    /// Returns `ChairsideError::Config` naming the first out-of-range value.
    pub fn validate(&self) -> Result<()> {
        if self.salon.tenant_id.trim().is_empty() {
            return Err(ChairsideError::Config("salon.tenant_id must not be empty".to_string()));
        }
        if self.salon.timezone.trim().is_empty() {
            return Err(ChairsideError::Config("salon.timezone must not be empty".to_string()));
        }
        self.scheduling.validate()
    }
}

/// Which salon this process schedules for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalonConfig {
    pub tenant_id: String,
    /// IANA zone name, e.g. `Europe/Dublin`
    pub timezone: String,
}

impl Default for SalonConfig {
    fn default() -> Self {
        Self { tenant_id: DEFAULT_TENANT_ID.to_string(), timezone: DEFAULT_TIMEZONE.to_string() }
    }
}

/// Which bookings compete for the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictScope {
    /// One chair: every active booking blocks every other.
    #[default]
    Salon,
    /// Only bookings of the same staff member collide; unassigned bookings
    /// collide with everyone.
    PerStaff,
}

impl fmt::Display for ConflictScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Salon => f.write_str("salon"),
            Self::PerStaff => f.write_str("per_staff"),
        }
    }
}

impl FromStr for ConflictScope {
    type Err = ChairsideError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "salon" => Ok(Self::Salon),
            "per_staff" | "staff" => Ok(Self::PerStaff),
            other => Err(ChairsideError::Config(format!("unknown conflict scope: {other}"))),
        }
    }
}

/// Slot grid and edit rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    pub slot_granularity_minutes: u16,
    /// Extra grid shown before opening and after closing
    pub margin_minutes: u16,
    /// Outer clamp of the slot grid
    pub outer_open: TimeOfDay,
    pub outer_close: TimeOfDay,
    pub min_duration_minutes: u32,
    pub max_duration_minutes: u32,
    pub snap_minutes: u32,
    pub conflict_scope: ConflictScope,
    /// Reject drops and bookings that fall outside business hours
    pub enforce_business_hours: bool,
    /// Refetch the visible range after every committed edit
    pub refresh_after_commit: bool,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            slot_granularity_minutes: DEFAULT_SLOT_GRANULARITY_MINUTES,
            margin_minutes: SLOT_MARGIN_MINUTES,
            outer_open: TimeOfDay::saturating_from_minutes(i32::from(DEFAULT_OPEN_MINUTES)),
            outer_close: TimeOfDay::saturating_from_minutes(i32::from(DEFAULT_CLOSE_MINUTES)),
            min_duration_minutes: MIN_APPOINTMENT_MINUTES,
            max_duration_minutes: MAX_APPOINTMENT_MINUTES,
            snap_minutes: SNAP_INCREMENT_MINUTES,
            conflict_scope: ConflictScope::Salon,
            enforce_business_hours: false,
            refresh_after_commit: true,
        }
    }
}

impl SchedulingConfig {
    /// # Errors
    /// Returns `ChairsideError::Config` for zero or inverted bounds.
    pub fn validate(&self) -> Result<()> {
        if self.slot_granularity_minutes == 0 || self.slot_granularity_minutes > 240 {
            return Err(ChairsideError::Config(format!(
                "scheduling.slot_granularity_minutes must be 1-240, got {}",
                self.slot_granularity_minutes
            )));
        }
        if self.outer_open >= self.outer_close {
            return Err(ChairsideError::Config(format!(
                "scheduling.outer_open ({}) must be before outer_close ({})",
                self.outer_open, self.outer_close
            )));
        }
        if self.min_duration_minutes == 0 || self.min_duration_minutes > self.max_duration_minutes
        {
            return Err(ChairsideError::Config(format!(
                "scheduling duration bounds invalid: min {} max {}",
                self.min_duration_minutes, self.max_duration_minutes
            )));
        }
        if self.snap_minutes == 0 {
            return Err(ChairsideError::Config(
                "scheduling.snap_minutes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

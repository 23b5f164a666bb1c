//! Time-grid slots offered to the booking UI

use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::types::hours::TimeOfDay;

/// Why a slot cannot be picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum SlotUnavailableReason {
    /// The salon is closed the whole day.
    DayClosed,
    /// Before opening or at/after closing.
    OutsideBusinessHours,
    /// An existing booking overlaps the requested service.
    Booked,
    /// The requested service would run past closing.
    TooShort,
}

/// One selectable start time in the day grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct TimeSlot {
    #[cfg_attr(feature = "ts-gen", ts(type = "string"))]
    pub time: TimeOfDay,

    /// `"HH:MM"`
    pub label: String,

    pub disabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "ts-gen", ts(optional))]
    pub reason: Option<SlotUnavailableReason>,
}

impl TimeSlot {
    pub fn available(time: TimeOfDay) -> Self {
        Self { time, label: time.label(), disabled: false, reason: None }
    }

    pub fn unavailable(time: TimeOfDay, reason: SlotUnavailableReason) -> Self {
        Self { time, label: time.label(), disabled: true, reason: Some(reason) }
    }

    /// Mark the slot unavailable unless it already is.
    ///
    /// The first reason wins so hours-related reasons are not hidden by later
    /// booking checks.
    pub fn disable(&mut self, reason: SlotUnavailableReason) {
        if !self.disabled {
            self.disabled = true;
            self.reason = Some(reason);
        }
    }
}

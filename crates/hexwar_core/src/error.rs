//! Error types for the combat-resolution core.
//!
//! Only two kinds of failure ever reach the caller: capacity errors (mounting
//! into a full location) and rejected conversion requests. Arithmetic
//! overshoot (armor going negative, MP below zero) is clamped where it
//! happens and never surfaces as an error.

use thiserror::Error;

use crate::conversion::ConversionMode;
use crate::location::Location;

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Top-level error type for the combat-resolution core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Not enough free critical slots for the item being mounted.
    #[error("Location {location} is full: need {needed} slots, {free} free")]
    LocationFull {
        /// Location the mount was attempted in.
        location: Location,
        /// Slots the item needs.
        needed: u8,
        /// Slots still free in the location.
        free: u8,
    },

    /// Location index outside the unit's location table.
    #[error("Invalid location index: {0}")]
    InvalidLocation(u8),

    /// Slot index outside the location's slot range.
    #[error("Invalid slot {slot} in location {location}")]
    InvalidSlot {
        /// Location of the slot.
        location: Location,
        /// Requested slot index.
        slot: u8,
    },

    /// A bay co-mount was attempted on a slot that cannot take one.
    #[error("Slot {slot} in location {location} has no free bay")]
    BayUnavailable {
        /// Location of the slot.
        location: Location,
        /// Slot index.
        slot: u8,
    },

    /// The unit's damage state forbids the requested conversion.
    #[error("Conversion from {from} to {to} rejected: {reason}")]
    ConversionRejected {
        /// Mode the unit is currently in.
        from: ConversionMode,
        /// Mode that was requested.
        to: ConversionMode,
        /// Which system blocked the conversion.
        reason: &'static str,
    },

    /// Conversion was requested on a unit that cannot change configuration.
    #[error("Unit cannot change configuration")]
    NotConvertible,

    /// Unit handle does not resolve in the registry.
    #[error("Unit not found: {0}")]
    UnitNotFound(u32),

    /// Squadron already holds its maximum number of fighters.
    #[error("Squadron is full")]
    SquadronFull,

    /// Only aerospace fighters may join a squadron.
    #[error("Unit {0} is not an aerospace fighter")]
    NotAFighter(u32),

    /// Squadron operation on a unit that is not a squadron.
    #[error("Unit {0} is not a fighter squadron")]
    NotASquadron(u32),

    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path (or label) of the data that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Invalid state or input.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl CoreError {
    /// Returns true for conditions the caller may retry with a different
    /// target (another location, another conversion mode).
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::LocationFull { .. }
                | Self::BayUnavailable { .. }
                | Self::ConversionRejected { .. }
                | Self::SquadronFull
        )
    }
}

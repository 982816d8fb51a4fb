//! Conversion state machine for units that change configuration.
//!
//! Land-air Meks move between Mek, AirMek and Fighter modes (bimodal LAMs
//! have no AirMek). QuadVees move between Mek and Vehicle modes. A request
//! is checked against the critical damage relevant to both the origin and
//! the destination mode and either applied in full or rejected with no
//! side effect.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::{debug, warn};

use crate::criticals::SystemKind;
use crate::error::{CoreError, Result};
use crate::unit::Unit;
use crate::unit_kind::{Chassis, LamKind, MovementMode};
use crate::weapon_groups::WeaponGroups;

/// Configuration of a convertible unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum ConversionMode {
    /// Walking on legs.
    Mek,
    /// LAM intermediate mode: legs plus flight.
    AirMek,
    /// LAM fighter mode.
    Fighter,
    /// QuadVee tracked vehicle mode.
    Vehicle,
}

impl ConversionMode {
    /// Mode uses the legs.
    #[must_use]
    pub const fn is_legged(self) -> bool {
        matches!(self, Self::Mek | Self::AirMek)
    }

    /// Mode can fly.
    #[must_use]
    pub const fn is_flight(self) -> bool {
        matches!(self, Self::AirMek | Self::Fighter)
    }

    /// Movement mode a unit of `chassis` has in this configuration.
    #[must_use]
    pub const fn movement_mode(self, chassis: Chassis) -> MovementMode {
        match self {
            Self::Mek => chassis.default_movement_mode(),
            Self::AirMek => MovementMode::AirMek,
            Self::Fighter => MovementMode::Aerodyne,
            Self::Vehicle => MovementMode::Tracked,
        }
    }

    /// Modes available to a chassis, empty for non-convertible chassis.
    #[must_use]
    pub const fn modes_for(chassis: Chassis) -> &'static [Self] {
        match chassis {
            Chassis::LandAirMek(LamKind::Standard) => &[Self::Mek, Self::AirMek, Self::Fighter],
            Chassis::LandAirMek(LamKind::Bimodal) => &[Self::Mek, Self::Fighter],
            Chassis::QuadVee => &[Self::Mek, Self::Vehicle],
            _ => &[],
        }
    }
}

/// Outcome of an accepted conversion request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum ConversionOutcome {
    /// Target equals the current mode.
    Unchanged,
    /// Moved to a new mode.
    Converted,
    /// Returned to the mode held at the start of the round.
    Reverted,
}

/// Conversion bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionState {
    mode: ConversionMode,
    previous_mode: ConversionMode,
    converting: bool,
    stash: Option<WeaponGroups>,
}

impl ConversionState {
    /// Start in `mode`.
    #[must_use]
    pub const fn new(mode: ConversionMode) -> Self {
        Self {
            mode,
            previous_mode: mode,
            converting: false,
            stash: None,
        }
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> ConversionMode {
        self.mode
    }

    /// Mode at the start of this round.
    #[must_use]
    pub const fn previous_mode(&self) -> ConversionMode {
        self.previous_mode
    }

    /// Converting this round.
    #[must_use]
    pub const fn is_converting(&self) -> bool {
        self.converting
    }
}

impl Unit {
    /// First reason the damage state forbids moving from `from` to `to`.
    fn conversion_blocker(&self, from: ConversionMode, to: ConversionMode) -> Option<&'static str> {
        if !ConversionMode::modes_for(self.chassis()).contains(&to) {
            return Some("mode not available");
        }
        if self.hits_on(SystemKind::Gyro) > 0 {
            return Some("gyro damaged");
        }
        if from.is_legged() || to.is_legged() {
            if self.hits_on(SystemKind::Hip) > 0 {
                return Some("hip damaged");
            }
            if self.destroyed_legs() > 0 {
                return Some("leg destroyed");
            }
        }
        if from.is_flight() || to.is_flight() {
            if self.hits_on(SystemKind::Avionics) > 0 {
                return Some("avionics damaged");
            }
            if self.hits_on(SystemKind::LandingGear) > 0 {
                return Some("landing gear damaged");
            }
        }
        if self.chassis() == Chassis::QuadVee && self.hits_on(SystemKind::ConversionEquipment) > 0 {
            return Some("conversion equipment damaged");
        }
        None
    }

    /// Check whether a request for `target` would be accepted.
    #[must_use]
    pub fn can_convert_to(&self, target: ConversionMode) -> bool {
        self.conversion.as_ref().is_some_and(|state| {
            state.mode == target || self.conversion_blocker(state.mode, target).is_none()
        })
    }

    /// Request a change of configuration.
    ///
    /// Returns `Unchanged` when `target` is the current mode, `Reverted`
    /// when it is the mode the unit started the round in, `Converted`
    /// otherwise. Rejected requests leave every piece of state untouched.
    pub fn request_conversion(&mut self, target: ConversionMode) -> Result<ConversionOutcome> {
        let Some(state) = self.conversion.as_ref() else {
            return Err(CoreError::NotConvertible);
        };
        let from = state.mode;
        if from == target {
            return Ok(ConversionOutcome::Unchanged);
        }
        if let Some(reason) = self.conversion_blocker(from, target) {
            warn!(unit = %self.name(), %from, to = %target, reason, "conversion rejected");
            return Err(CoreError::ConversionRejected {
                from,
                to: target,
                reason,
            });
        }

        let fresh_groups = WeaponGroups::build(&self.equipment, target == ConversionMode::Fighter);
        let Some(state) = self.conversion.as_mut() else {
            return Err(CoreError::NotConvertible);
        };
        let current_groups = std::mem::take(&mut self.weapon_groups);

        let outcome = if target == state.previous_mode {
            self.weapon_groups = state.stash.take().unwrap_or(fresh_groups);
            state.converting = false;
            ConversionOutcome::Reverted
        } else {
            if state.stash.is_none() {
                state.stash = Some(current_groups);
            }
            self.weapon_groups = fresh_groups;
            state.converting = true;
            ConversionOutcome::Converted
        };
        state.mode = target;

        self.movement_mode = target.movement_mode(self.chassis());
        self.refresh_bomb_suppression();
        debug!(unit = %self.name(), %from, to = %target, %outcome, "conversion accepted");
        Ok(outcome)
    }

    /// Start a new round: the current mode becomes the round's starting
    /// mode and the converting flag clears.
    pub fn new_round(&mut self) {
        if let Some(state) = self.conversion.as_mut() {
            state.previous_mode = state.mode;
            state.converting = false;
            state.stash = None;
        }
    }

    /// Mode the unit started the round in.
    #[must_use]
    pub fn previous_mode(&self) -> Option<ConversionMode> {
        self.conversion.as_ref().map(ConversionState::previous_mode)
    }
}

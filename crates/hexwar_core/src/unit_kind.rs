//! Chassis identity for units.
//!
//! This module provides the closed set of chassis families a unit can be:
//! - [`Chassis`]: the variant tag that selects location table, hit tables
//!   and structural MP rules
//! - [`ChassisTraits`]: bitflags for fast classification queries
//! - [`WeightClass`] and [`MovementMode`]: descriptive attributes
//!
//! Every rule that differs by chassis dispatches once on [`Chassis`].

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Land-air Mek family.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, Display, EnumString,
)]
pub enum LamKind {
    /// Three modes: Mek, AirMek, Fighter.
    #[default]
    Standard,
    /// Two modes: Mek and Fighter.
    Bimodal,
}

/// Chassis family of a unit.
///
/// The tag is fixed at construction and never changes. Hybrids change
/// *mode* through their conversion state, not their chassis.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Chassis {
    /// Two-legged walker.
    Biped,
    /// Four-legged walker.
    Quad,
    /// Three-legged walker.
    Tripod,
    /// Biped walker convertible to an aerospace fighter.
    #[strum(serialize = "LandAirMek", serialize = "lam")]
    LandAirMek(LamKind),
    /// Quad walker convertible to a tracked vehicle.
    QuadVee,
    /// Aerospace fighter (wings).
    AerospaceFighter,
    /// Small craft (sides instead of wings).
    SmallCraft,
    /// Grouping of aerospace fighters acting as one unit.
    FighterSquadron,
    /// Conventional infantry platoon.
    InfantryPlatoon,
}

bitflags::bitflags! {
    /// Classification flags derived from the chassis.
    ///
    /// Enables O(1) queries like "does this unit track heat?"
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ChassisTraits: u16 {
        /// Walks on legs in at least one mode.
        const LEGGED = 1 << 0;
        /// Flies in at least one mode.
        const FLIGHT = 1 << 1;
        /// Owns a conversion state machine.
        const CONVERTIBLE = 1 << 2;
        /// Builds up heat and suffers heat MP penalties.
        const HEAT_TRACKING = 1 << 3;
        /// Structure is a trooper headcount.
        const HEADCOUNT = 1 << 4;
        /// Hit resolution delegates to a member unit.
        const GROUPED = 1 << 5;
        /// Has a gyro and makes gyro-based piloting rolls.
        const GYRO = 1 << 6;
        /// Uses structural integrity instead of per-location internals.
        const STRUCTURAL_INTEGRITY = 1 << 7;
        /// Can mount jump jets.
        const JUMP_CAPABLE = 1 << 8;
    }
}

impl Chassis {
    /// Classification flags for this chassis.
    #[must_use]
    pub const fn traits(self) -> ChassisTraits {
        let walker = ChassisTraits::LEGGED
            .union(ChassisTraits::HEAT_TRACKING)
            .union(ChassisTraits::GYRO)
            .union(ChassisTraits::JUMP_CAPABLE);
        match self {
            Self::Biped | Self::Quad | Self::Tripod => walker,
            Self::LandAirMek(_) => walker
                .union(ChassisTraits::FLIGHT)
                .union(ChassisTraits::CONVERTIBLE),
            Self::QuadVee => walker
                .difference(ChassisTraits::JUMP_CAPABLE)
                .union(ChassisTraits::CONVERTIBLE),
            Self::AerospaceFighter | Self::SmallCraft => ChassisTraits::FLIGHT
                .union(ChassisTraits::HEAT_TRACKING)
                .union(ChassisTraits::STRUCTURAL_INTEGRITY),
            Self::FighterSquadron => ChassisTraits::FLIGHT.union(ChassisTraits::GROUPED),
            Self::InfantryPlatoon => ChassisTraits::HEADCOUNT.union(ChassisTraits::JUMP_CAPABLE),
        }
    }

    /// Check a single trait.
    #[must_use]
    pub const fn has(self, traits: ChassisTraits) -> bool {
        self.traits().contains(traits)
    }

    /// Count of legs for walker chassis, zero otherwise.
    #[must_use]
    pub const fn leg_count(self) -> u8 {
        match self {
            Self::Biped | Self::LandAirMek(_) => 2,
            Self::Tripod => 3,
            Self::Quad | Self::QuadVee => 4,
            _ => 0,
        }
    }

    /// True for walker chassis (biped, quad, tripod and the hybrids built
    /// on them).
    #[must_use]
    pub const fn is_walker(self) -> bool {
        self.has(ChassisTraits::LEGGED)
    }

    /// True for single aerospace craft (not squadrons).
    #[must_use]
    pub const fn is_aerospace(self) -> bool {
        self.has(ChassisTraits::STRUCTURAL_INTEGRITY)
    }

    /// Default movement mode at construction.
    #[must_use]
    pub const fn default_movement_mode(self) -> MovementMode {
        match self {
            Self::Biped | Self::LandAirMek(_) => MovementMode::Biped,
            Self::Quad | Self::QuadVee => MovementMode::Quad,
            Self::Tripod => MovementMode::Tripod,
            Self::AerospaceFighter | Self::FighterSquadron => MovementMode::Aerodyne,
            Self::SmallCraft => MovementMode::Spheroid,
            Self::InfantryPlatoon => MovementMode::InfantryLeg,
        }
    }
}

/// Weight class derived from tonnage.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
pub enum WeightClass {
    /// Under 20 tons.
    Ultralight,
    /// 20 to 35 tons.
    Light,
    /// 40 to 55 tons.
    Medium,
    /// 60 to 75 tons.
    Heavy,
    /// 80 to 100 tons.
    Assault,
    /// Over 100 tons.
    SuperHeavy,
}

impl WeightClass {
    /// Classify a tonnage.
    #[must_use]
    pub const fn from_tonnage(tons: u32) -> Self {
        match tons {
            0..=19 => Self::Ultralight,
            20..=39 => Self::Light,
            40..=59 => Self::Medium,
            60..=79 => Self::Heavy,
            80..=100 => Self::Assault,
            _ => Self::SuperHeavy,
        }
    }
}

/// How a unit is currently moving.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Display,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum MovementMode {
    /// Immobile.
    #[default]
    None,
    /// Two legs.
    Biped,
    /// Four legs.
    Quad,
    /// Three legs.
    Tripod,
    /// Tracks.
    Tracked,
    /// Wheels.
    Wheeled,
    /// Hovercraft.
    Hover,
    /// Vertical take-off and landing.
    Vtol,
    /// Surface naval.
    Naval,
    /// Submerged.
    Submarine,
    /// Foot infantry.
    InfantryLeg,
    /// Motorized infantry.
    InfantryMotorized,
    /// Jump infantry.
    InfantryJump,
    /// Winged flight.
    Aerodyne,
    /// Spheroid (thrust-borne) flight.
    Spheroid,
    /// Wing-in-ground-effect.
    Wige,
    /// LAM AirMek flight.
    AirMek,
}

impl MovementMode {
    /// True for modes that move on legs.
    #[must_use]
    pub const fn is_legged(self) -> bool {
        matches!(self, Self::Biped | Self::Quad | Self::Tripod)
    }

    /// True for airborne modes.
    #[must_use]
    pub const fn is_flight(self) -> bool {
        matches!(
            self,
            Self::Aerodyne | Self::Spheroid | Self::Vtol | Self::Wige | Self::AirMek
        )
    }

    /// True for conventional infantry modes.
    #[must_use]
    pub const fn is_infantry(self) -> bool {
        matches!(
            self,
            Self::InfantryLeg | Self::InfantryMotorized | Self::InfantryJump
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_walker_traits() {
        assert!(Chassis::Biped.has(ChassisTraits::LEGGED));
        assert!(Chassis::Biped.has(ChassisTraits::GYRO));
        assert!(!Chassis::Biped.has(ChassisTraits::FLIGHT));
        assert!(Chassis::LandAirMek(LamKind::Standard).has(ChassisTraits::CONVERTIBLE));
        assert!(Chassis::QuadVee.has(ChassisTraits::CONVERTIBLE));
        assert!(!Chassis::QuadVee.has(ChassisTraits::JUMP_CAPABLE));
    }

    #[test]
    fn test_non_walker_traits() {
        assert!(Chassis::InfantryPlatoon.has(ChassisTraits::HEADCOUNT));
        assert!(Chassis::FighterSquadron.has(ChassisTraits::GROUPED));
        assert!(Chassis::AerospaceFighter.has(ChassisTraits::STRUCTURAL_INTEGRITY));
        assert!(!Chassis::AerospaceFighter.has(ChassisTraits::GYRO));
    }

    #[test]
    fn test_leg_counts() {
        assert_eq!(Chassis::Biped.leg_count(), 2);
        assert_eq!(Chassis::Tripod.leg_count(), 3);
        assert_eq!(Chassis::QuadVee.leg_count(), 4);
        assert_eq!(Chassis::SmallCraft.leg_count(), 0);
        assert!(!Chassis::InfantryPlatoon.is_walker());
    }

    #[test]
    fn test_predicates_follow_traits() {
        for chassis in Chassis::iter().chain([Chassis::LandAirMek(LamKind::Bimodal)]) {
            assert_eq!(chassis.is_walker(), chassis.leg_count() > 0, "{chassis}");
            assert_eq!(
                chassis.is_aerospace(),
                matches!(chassis, Chassis::AerospaceFighter | Chassis::SmallCraft),
                "{chassis}"
            );
            if chassis.has(ChassisTraits::GROUPED) {
                assert!(chassis.has(ChassisTraits::FLIGHT));
                assert!(!chassis.is_walker());
            }
        }
    }

    #[test]
    fn test_weight_class() {
        assert_eq!(WeightClass::from_tonnage(20), WeightClass::Light);
        assert_eq!(WeightClass::from_tonnage(55), WeightClass::Medium);
        assert_eq!(WeightClass::from_tonnage(100), WeightClass::Assault);
        assert_eq!(WeightClass::from_tonnage(135), WeightClass::SuperHeavy);
        assert!(WeightClass::Heavy > WeightClass::Medium);
    }

    #[test]
    fn test_chassis_parse() {
        assert_eq!("quad".parse::<Chassis>(), Ok(Chassis::Quad));
        assert_eq!("QuadVee".parse::<Chassis>(), Ok(Chassis::QuadVee));
        assert_eq!(Chassis::iter().count(), 9);
    }

    #[test]
    fn test_movement_mode_categories() {
        assert!(MovementMode::Quad.is_legged());
        assert!(MovementMode::Spheroid.is_flight());
        assert!(MovementMode::InfantryJump.is_infantry());
        assert!(!MovementMode::Tracked.is_legged());
    }
}

//! Location tables.
//!
//! Every chassis owns a fixed, ordered list of damage locations. Indices
//! into that list ([`Location`]) are stable for the lifetime of a unit.
//! Only fighter squadrons derive their table at runtime, one location per
//! member, see [`crate::squadron`].

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::unit_kind::Chassis;

/// Index into a unit's location table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location(u8);

impl Location {
    /// Sentinel for "no location" (a shot absorbed by cover, an unmounted
    /// item).
    pub const NONE: Self = Self(u8::MAX);

    /// Create a location index.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Raw value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Check this is not [`Location::NONE`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != u8::MAX
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.0)
        } else {
            f.write_str("none")
        }
    }
}

/// Walker locations (biped, tripod, LAM).
pub mod mek {
    use super::Location;

    /// Head.
    pub const HEAD: Location = Location::new(0);
    /// Center torso.
    pub const CENTER_TORSO: Location = Location::new(1);
    /// Right torso.
    pub const RIGHT_TORSO: Location = Location::new(2);
    /// Left torso.
    pub const LEFT_TORSO: Location = Location::new(3);
    /// Right arm.
    pub const RIGHT_ARM: Location = Location::new(4);
    /// Left arm.
    pub const LEFT_ARM: Location = Location::new(5);
    /// Right leg.
    pub const RIGHT_LEG: Location = Location::new(6);
    /// Left leg.
    pub const LEFT_LEG: Location = Location::new(7);
    /// Center leg (tripods only).
    pub const CENTER_LEG: Location = Location::new(8);
}

/// Quad walker locations (quad, QuadVee).
pub mod quad {
    use super::Location;

    /// Head.
    pub const HEAD: Location = Location::new(0);
    /// Center torso.
    pub const CENTER_TORSO: Location = Location::new(1);
    /// Right torso.
    pub const RIGHT_TORSO: Location = Location::new(2);
    /// Left torso.
    pub const LEFT_TORSO: Location = Location::new(3);
    /// Front right leg.
    pub const FRONT_RIGHT_LEG: Location = Location::new(4);
    /// Front left leg.
    pub const FRONT_LEFT_LEG: Location = Location::new(5);
    /// Rear right leg.
    pub const REAR_RIGHT_LEG: Location = Location::new(6);
    /// Rear left leg.
    pub const REAR_LEFT_LEG: Location = Location::new(7);
}

/// Aerospace locations. Small craft use the same indices with sides in
/// place of wings.
pub mod aero {
    use super::Location;

    /// Nose.
    pub const NOSE: Location = Location::new(0);
    /// Left wing (left side for small craft).
    pub const LEFT_WING: Location = Location::new(1);
    /// Right wing (right side for small craft).
    pub const RIGHT_WING: Location = Location::new(2);
    /// Aft.
    pub const AFT: Location = Location::new(3);
    /// Fuselage (hull for small craft), carries the system criticals.
    pub const FUSELAGE: Location = Location::new(4);
}

/// Infantry platoon locations.
pub mod infantry {
    use super::Location;

    /// The troopers themselves. Internal structure is the headcount.
    pub const TROOPERS: Location = Location::new(0);
    /// Field gun mounts.
    pub const FIELD_GUNS: Location = Location::new(1);
}

/// Category of a location, used by movement and cover rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationKind {
    /// Walker head.
    Head,
    /// Walker torso segment.
    Torso,
    /// Arm.
    Arm,
    /// Leg.
    Leg,
    /// Craft section (nose, wings, aft, hull).
    Section,
    /// Troopers of an infantry platoon.
    Troopers,
    /// Mount point with no body of its own (field guns).
    Mount,
    /// Member fighter of a squadron.
    Member,
}

/// Static description of one location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationInfo {
    /// Full name.
    pub name: Cow<'static, str>,
    /// Abbreviation used in reports.
    pub abbreviation: Cow<'static, str>,
    /// Number of critical slots.
    pub slots: u8,
    /// Location category.
    pub kind: LocationKind,
    /// Carries a separate rear armor value.
    pub rear_armor: bool,
}

impl LocationInfo {
    const fn fixed(
        name: &'static str,
        abbreviation: &'static str,
        slots: u8,
        kind: LocationKind,
        rear_armor: bool,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            abbreviation: Cow::Borrowed(abbreviation),
            slots,
            kind,
            rear_armor,
        }
    }

    /// Build a squadron member location.
    #[must_use]
    pub fn member(ordinal: usize) -> Self {
        Self {
            name: Cow::Owned(format!("Fighter {ordinal}")),
            abbreviation: Cow::Owned(format!("F{ordinal}")),
            slots: 0,
            kind: LocationKind::Member,
            rear_armor: false,
        }
    }

    /// Arms and legs.
    #[must_use]
    pub const fn is_appendage(&self) -> bool {
        matches!(self.kind, LocationKind::Arm | LocationKind::Leg)
    }

    /// Legs only.
    #[must_use]
    pub const fn is_leg(&self) -> bool {
        matches!(self.kind, LocationKind::Leg)
    }
}

use LocationKind::{Arm, Head, Leg, Mount, Section, Torso, Troopers};

/// Biped and LAM location table.
pub static BIPED_LOCATIONS: [LocationInfo; 8] = [
    LocationInfo::fixed("Head", "HD", 6, Head, false),
    LocationInfo::fixed("Center Torso", "CT", 12, Torso, true),
    LocationInfo::fixed("Right Torso", "RT", 12, Torso, true),
    LocationInfo::fixed("Left Torso", "LT", 12, Torso, true),
    LocationInfo::fixed("Right Arm", "RA", 12, Arm, false),
    LocationInfo::fixed("Left Arm", "LA", 12, Arm, false),
    LocationInfo::fixed("Right Leg", "RL", 6, Leg, false),
    LocationInfo::fixed("Left Leg", "LL", 6, Leg, false),
];

/// Tripod location table.
pub static TRIPOD_LOCATIONS: [LocationInfo; 9] = [
    LocationInfo::fixed("Head", "HD", 6, Head, false),
    LocationInfo::fixed("Center Torso", "CT", 12, Torso, true),
    LocationInfo::fixed("Right Torso", "RT", 12, Torso, true),
    LocationInfo::fixed("Left Torso", "LT", 12, Torso, true),
    LocationInfo::fixed("Right Arm", "RA", 12, Arm, false),
    LocationInfo::fixed("Left Arm", "LA", 12, Arm, false),
    LocationInfo::fixed("Right Leg", "RL", 6, Leg, false),
    LocationInfo::fixed("Left Leg", "LL", 6, Leg, false),
    LocationInfo::fixed("Center Leg", "CL", 6, Leg, false),
];

/// Quad and QuadVee location table.
pub static QUAD_LOCATIONS: [LocationInfo; 8] = [
    LocationInfo::fixed("Head", "HD", 6, Head, false),
    LocationInfo::fixed("Center Torso", "CT", 12, Torso, true),
    LocationInfo::fixed("Right Torso", "RT", 12, Torso, true),
    LocationInfo::fixed("Left Torso", "LT", 12, Torso, true),
    LocationInfo::fixed("Front Right Leg", "FRL", 6, Leg, false),
    LocationInfo::fixed("Front Left Leg", "FLL", 6, Leg, false),
    LocationInfo::fixed("Rear Right Leg", "RRL", 6, Leg, false),
    LocationInfo::fixed("Rear Left Leg", "RLL", 6, Leg, false),
];

/// Aerospace fighter location table.
pub static FIGHTER_LOCATIONS: [LocationInfo; 5] = [
    LocationInfo::fixed("Nose", "NOS", 25, Section, false),
    LocationInfo::fixed("Left Wing", "LWG", 25, Section, false),
    LocationInfo::fixed("Right Wing", "RWG", 25, Section, false),
    LocationInfo::fixed("Aft", "AFT", 25, Section, false),
    LocationInfo::fixed("Fuselage", "FUS", 12, Section, false),
];

/// Small craft location table.
pub static SMALL_CRAFT_LOCATIONS: [LocationInfo; 5] = [
    LocationInfo::fixed("Nose", "NOS", 30, Section, false),
    LocationInfo::fixed("Left Side", "LS", 30, Section, false),
    LocationInfo::fixed("Right Side", "RS", 30, Section, false),
    LocationInfo::fixed("Aft", "AFT", 30, Section, false),
    LocationInfo::fixed("Hull", "HUL", 12, Section, false),
];

/// Infantry platoon location table.
pub static INFANTRY_LOCATIONS: [LocationInfo; 2] = [
    LocationInfo::fixed("Troopers", "MEN", 8, Troopers, false),
    LocationInfo::fixed("Field Guns", "FGN", 4, Mount, false),
];

/// Static location table for a chassis.
///
/// Squadrons have no static table and return an empty slice.
#[must_use]
pub fn static_locations(chassis: Chassis) -> &'static [LocationInfo] {
    match chassis {
        Chassis::Biped | Chassis::LandAirMek(_) => &BIPED_LOCATIONS,
        Chassis::Tripod => &TRIPOD_LOCATIONS,
        Chassis::Quad | Chassis::QuadVee => &QUAD_LOCATIONS,
        Chassis::AerospaceFighter => &FIGHTER_LOCATIONS,
        Chassis::SmallCraft => &SMALL_CRAFT_LOCATIONS,
        Chassis::InfantryPlatoon => &INFANTRY_LOCATIONS,
        Chassis::FighterSquadron => &[],
    }
}

/// Location destroyed together with `location` (an arm hanging off a
/// destroyed side torso).
#[must_use]
pub fn dependent_location(chassis: Chassis, location: Location) -> Option<Location> {
    match chassis {
        Chassis::Biped | Chassis::Tripod | Chassis::LandAirMek(_) => match location {
            mek::LEFT_TORSO => Some(mek::LEFT_ARM),
            mek::RIGHT_TORSO => Some(mek::RIGHT_ARM),
            _ => None,
        },
        _ => None,
    }
}

/// Location that damage transfers into once `location` is destroyed.
#[must_use]
pub fn transfer_location(chassis: Chassis, location: Location) -> Option<Location> {
    match chassis {
        Chassis::Biped | Chassis::Tripod | Chassis::LandAirMek(_) => match location {
            mek::RIGHT_ARM | mek::RIGHT_LEG => Some(mek::RIGHT_TORSO),
            mek::LEFT_ARM | mek::LEFT_LEG => Some(mek::LEFT_TORSO),
            mek::RIGHT_TORSO | mek::LEFT_TORSO | mek::CENTER_LEG => Some(mek::CENTER_TORSO),
            _ => None,
        },
        Chassis::Quad | Chassis::QuadVee => match location {
            quad::FRONT_RIGHT_LEG | quad::REAR_RIGHT_LEG => Some(quad::RIGHT_TORSO),
            quad::FRONT_LEFT_LEG | quad::REAR_LEFT_LEG => Some(quad::LEFT_TORSO),
            quad::RIGHT_TORSO | quad::LEFT_TORSO => Some(quad::CENTER_TORSO),
            _ => None,
        },
        Chassis::AerospaceFighter | Chassis::SmallCraft => match location {
            aero::FUSELAGE => None,
            _ => Some(aero::FUSELAGE),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_location_sentinel() {
        assert!(mek::HEAD.is_valid());
        assert!(!Location::NONE.is_valid());
        assert_eq!(Location::NONE.to_string(), "none");
        assert_eq!(mek::LEFT_LEG.to_string(), "7");
    }

    #[test]
    fn test_slot_counts() {
        let biped = static_locations(Chassis::Biped);
        let slots: Vec<u8> = biped.iter().map(|l| l.slots).collect();
        assert_eq!(slots, vec![6, 12, 12, 12, 12, 12, 6, 6]);

        let quad_legs = static_locations(Chassis::Quad)
            .iter()
            .filter(|l| l.is_leg())
            .count();
        assert_eq!(quad_legs, 4);
    }

    #[test]
    fn test_appendages() {
        let tripod = static_locations(Chassis::Tripod);
        assert!(tripod[mek::CENTER_LEG.index()].is_appendage());
        assert!(tripod[mek::LEFT_ARM.index()].is_appendage());
        assert!(!tripod[mek::CENTER_TORSO.index()].is_appendage());
    }

    #[test]
    fn test_leg_tables_match_chassis() {
        for chassis in Chassis::iter() {
            let legs = static_locations(chassis)
                .iter()
                .filter(|l| l.is_leg())
                .count();
            assert_eq!(legs, chassis.leg_count() as usize, "{chassis}");
        }
    }

    #[test]
    fn test_dependent_and_transfer() {
        assert_eq!(
            dependent_location(Chassis::Biped, mek::LEFT_TORSO),
            Some(mek::LEFT_ARM)
        );
        assert_eq!(dependent_location(Chassis::Quad, quad::LEFT_TORSO), None);
        assert_eq!(
            transfer_location(Chassis::Tripod, mek::CENTER_LEG),
            Some(mek::CENTER_TORSO)
        );
        assert_eq!(transfer_location(Chassis::Biped, mek::CENTER_TORSO), None);
        assert_eq!(
            transfer_location(Chassis::AerospaceFighter, aero::NOSE),
            Some(aero::FUSELAGE)
        );
    }

    #[test]
    fn test_member_location_names() {
        let info = LocationInfo::member(3);
        assert_eq!(info.name, "Fighter 3");
        assert_eq!(info.abbreviation, "F3");
        assert_eq!(info.kind, LocationKind::Member);
    }
}

//! Test fixtures and helpers.
//!
//! Pre-built units and environments for consistent testing. Every builder
//! here uses layouts that always fit, so the constructors panic only on a
//! broken core.

use fixed::types::I32F32;
use hexwar_core::prelude::*;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Biped walker with uniform armor and standard systems.
///
/// # Panics
///
/// Panics if the standard biped layout cannot be built.
#[must_use]
pub fn biped(walk: u32) -> Unit {
    Unit::builder("Test Biped", Chassis::Biped)
        .walk(walk)
        .uniform(10, 4, 8)
        .build()
        .expect("biped fixture")
}

/// Quad walker with uniform armor and standard systems.
///
/// # Panics
///
/// Panics if the standard quad layout cannot be built.
#[must_use]
pub fn quad(walk: u32) -> Unit {
    Unit::builder("Test Quad", Chassis::Quad)
        .walk(walk)
        .uniform(10, 4, 8)
        .build()
        .expect("quad fixture")
}

/// Three-mode LAM starting in Mek mode.
///
/// # Panics
///
/// Panics if the LAM layout cannot be built.
#[must_use]
pub fn lam(walk: u32) -> Unit {
    Unit::builder("Test LAM", Chassis::LandAirMek(LamKind::Standard))
        .tonnage(30)
        .walk(walk)
        .uniform(6, 2, 4)
        .build()
        .expect("lam fixture")
}

/// QuadVee starting in Mek mode.
///
/// # Panics
///
/// Panics if the QuadVee layout cannot be built.
#[must_use]
pub fn quadvee(walk: u32) -> Unit {
    Unit::builder("Test QuadVee", Chassis::QuadVee)
        .walk(walk)
        .uniform(8, 3, 5)
        .build()
        .expect("quadvee fixture")
}

/// Aerospace fighter with structural integrity.
///
/// # Panics
///
/// Panics if the fighter layout cannot be built.
#[must_use]
pub fn fighter(safe_thrust: u32) -> Unit {
    Unit::builder("Test Fighter", Chassis::AerospaceFighter)
        .walk(safe_thrust)
        .uniform(12, 0, 0)
        .structural_integrity(8)
        .build()
        .expect("fighter fixture")
}

/// Infantry platoon of `squads` squads of `squad_size` troopers.
///
/// # Panics
///
/// Panics if the platoon layout cannot be built.
#[must_use]
pub fn platoon(squads: u8, squad_size: u8) -> Unit {
    Unit::builder("Test Platoon", Chassis::InfantryPlatoon)
        .walk(1)
        .platoon(squads, squad_size)
        .build()
        .expect("platoon fixture")
}

/// One representative unit per chassis family, squadrons excluded.
#[must_use]
pub fn roster() -> Vec<Unit> {
    vec![biped(5), quad(4), lam(6), quadvee(5), fighter(6), platoon(4, 7)]
}

/// First slot in `location` holding `kind`.
#[must_use]
pub fn slot_of(unit: &Unit, location: Location, kind: SystemKind) -> Option<u8> {
    unit.criticals()
        .slots(location)
        .iter()
        .position(|slot| slot.holds(kind))
        .and_then(|index| u8::try_from(index).ok())
}

/// Environment with default rules and the given conditions.
#[must_use]
pub fn env_with(conditions: PlanetaryConditions) -> Environment {
    Environment::new(GameOptions::default(), conditions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_builds() {
        let roster = roster();
        assert_eq!(roster.len(), 6);
        assert!(roster.iter().all(|unit| !unit.is_destroyed()));
    }

    #[test]
    fn test_slot_of_finds_gyro() {
        let unit = biped(4);
        let location = hexwar_core::location::mek::CENTER_TORSO;
        assert!(slot_of(&unit, location, SystemKind::Gyro).is_some());
        assert!(slot_of(&unit, location, SystemKind::Avionics).is_none());
    }
}

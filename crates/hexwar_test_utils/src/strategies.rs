//! Property-based testing strategies.
//!
//! Generators for the inputs the core pipelines take: chassis, MP
//! settings, planetary conditions and hit requests.

use hexwar_core::movement::MpKind;
use hexwar_core::prelude::*;
use proptest::prelude::*;
use proptest::sample::select;

use crate::fixtures::fixed;

/// Every chassis a single unit can be built with. Squadrons only exist
/// through a registry and are left out.
#[must_use]
pub fn single_chassis() -> Vec<Chassis> {
    vec![
        Chassis::Biped,
        Chassis::Quad,
        Chassis::Tripod,
        Chassis::LandAirMek(LamKind::Standard),
        Chassis::LandAirMek(LamKind::Bimodal),
        Chassis::QuadVee,
        Chassis::AerospaceFighter,
        Chassis::SmallCraft,
        Chassis::InfantryPlatoon,
    ]
}

/// Any single-unit chassis.
pub fn chassis() -> impl Strategy<Value = Chassis> {
    select(single_chassis())
}

/// Walker chassis only.
pub fn walker_chassis() -> impl Strategy<Value = Chassis> {
    select(vec![
        Chassis::Biped,
        Chassis::Quad,
        Chassis::Tripod,
        Chassis::LandAirMek(LamKind::Standard),
        Chassis::QuadVee,
    ])
}

/// A freshly built unit of the given chassis with standard systems.
///
/// # Panics
///
/// Panics if the chassis layout cannot be built.
#[must_use]
pub fn build_unit(chassis: Chassis, walk: u32) -> Unit {
    let builder = Unit::builder(format!("Generated {chassis}"), chassis)
        .tonnage(30)
        .walk(walk)
        .uniform(9, 3, 6);
    let builder = match chassis {
        Chassis::InfantryPlatoon => builder.platoon(4, 7),
        c if c.is_aerospace() => builder.structural_integrity(6),
        _ => builder,
    };
    builder.build().expect("generated unit")
}

/// Any single unit with a walk (or thrust) rating in `1..=8`.
pub fn unit() -> impl Strategy<Value = Unit> {
    (chassis(), 1u32..=8).prop_map(|(chassis, walk)| build_unit(chassis, walk))
}

/// Any combination of pipeline toggles.
pub fn mp_settings() -> impl Strategy<Value = MpSettings> {
    any::<u16>().prop_map(MpSettings::from_bits_truncate)
}

/// Any MP kind.
pub fn mp_kind() -> impl Strategy<Value = MpKind> {
    select(vec![MpKind::Walk, MpKind::Run, MpKind::Jump, MpKind::Sprint])
}

/// Any weather.
pub fn weather() -> impl Strategy<Value = Weather> {
    select(vec![
        Weather::Clear,
        Weather::LightRain,
        Weather::ModerateRain,
        Weather::HeavyRain,
        Weather::Downpour,
        Weather::LightSnow,
        Weather::ModerateSnow,
        Weather::HeavySnow,
        Weather::Sleet,
        Weather::IceStorm,
        Weather::LightHail,
        Weather::HeavyHail,
    ])
}

/// Any wind.
pub fn wind() -> impl Strategy<Value = Wind> {
    select(vec![
        Wind::Calm,
        Wind::LightGale,
        Wind::ModerateGale,
        Wind::StrongGale,
        Wind::Storm,
        Wind::TornadoF1ToF3,
        Wind::TornadoF4,
    ])
}

/// Planetary conditions with gravity between 0.5 and 2 G.
pub fn planetary_conditions() -> impl Strategy<Value = PlanetaryConditions> {
    (
        weather(),
        wind(),
        -60i32..=80,
        1i32..=4,
        select(vec![
            Atmosphere::Vacuum,
            Atmosphere::Thin,
            Atmosphere::Standard,
            Atmosphere::High,
        ]),
    )
        .prop_map(|(weather, wind, temperature, half_g, atmosphere)| PlanetaryConditions {
            weather,
            wind,
            temperature,
            gravity: fixed(half_g) / 2,
            atmosphere,
        })
}

/// Environment with default rules and arbitrary conditions.
pub fn environment() -> impl Strategy<Value = Environment> {
    planetary_conditions().prop_map(|conditions| Environment::new(GameOptions::default(), conditions))
}

/// Unaimed hit request on any table from any side, with optional cover.
pub fn hit_request() -> impl Strategy<Value = HitRequest> {
    (
        select(vec![
            HitTable::Normal,
            HitTable::Punch,
            HitTable::Kick,
            HitTable::Swarm,
            HitTable::Above,
            HitTable::Below,
        ]),
        select(vec![
            AttackSide::Front,
            AttackSide::Left,
            AttackSide::Right,
            AttackSide::Rear,
        ]),
        any::<u8>().prop_map(Cover::from_bits_truncate),
    )
        .prop_map(|(table, side, cover)| HitRequest::new(table, side).with_cover(cover))
}

/// A script of raw die results, each in `1..=12`.
pub fn dice_script() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(1u8..=12, 1..6)
}

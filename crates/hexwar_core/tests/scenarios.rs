//! End-to-end combat-resolution scenarios.
//!
//! These tests drive the public API the way a turn scheduler would:
//! build units, apply damage, then query MP, hit locations, piloting
//! targets and conversions.

use hexwar_core::conversion::ConversionMode;
use hexwar_core::data::{EnvironmentData, MIN_GRAVITY};
use hexwar_core::movement::MpStage;
use hexwar_core::location::{infantry, mek, quad};
use hexwar_core::prelude::*;
use hexwar_test_utils::determinism::{hash_serialized, verify_determinism};
use hexwar_test_utils::fixtures::{self, env_with, slot_of};
use hexwar_test_utils::proptest::prelude::*;
use hexwar_test_utils::strategies;

fn walk(unit: &Unit, env: Option<&Environment>) -> u32 {
    unit.compute_mp(MpKind::Walk, MpSettings::NONE, env)
}

fn destroy_gyro(unit: &mut Unit) {
    let slot = slot_of(unit, mek::CENTER_TORSO, SystemKind::Gyro).expect("gyro slot");
    unit.apply_hit(mek::CENTER_TORSO, slot).expect("first gyro hit");
    unit.apply_hit(mek::CENTER_TORSO, slot + 1).expect("second gyro hit");
}

// =============================================================================
// Movement
// =============================================================================

#[test]
fn test_quad_leg_loss_walk_points() {
    let mut unit = fixtures::quad(6);
    unit.set_internal(quad::FRONT_RIGHT_LEG, 0);
    assert_eq!(walk(&unit, None), 5);

    unit.set_internal(quad::REAR_LEFT_LEG, 0);
    assert_eq!(walk(&unit, None), 1);

    // Two legs gone fixes the value against heat and weather
    unit.set_heat(25);
    let storm = env_with(PlanetaryConditions {
        weather: Weather::HeavySnow,
        wind: Wind::Storm,
        ..PlanetaryConditions::default()
    });
    assert_eq!(walk(&unit, Some(&storm)), 1);
}

#[test]
fn test_ideal_walk_matches_base_rating() {
    for unit in fixtures::roster() {
        assert_eq!(
            unit.compute_mp(MpKind::Walk, MpSettings::ALL, None),
            unit.base_walk(),
            "{}",
            unit.name()
        );
    }
}

// =============================================================================
// Hit location
// =============================================================================

#[test]
fn test_forced_front_roll_hits_center_torso() {
    let unit = fixtures::biped(5);
    let request = HitRequest::new(HitTable::Normal, AttackSide::Front);

    let mut dice = ScriptedDice::new([7]);
    let first = unit.roll_hit_location(&request, &mut dice, None);
    assert_eq!(first.location, mek::CENTER_TORSO);
    assert!(!first.rear);
    assert_eq!(first.effects, HitEffects::empty());
    assert_eq!(dice.consumed(), 1);

    let mut again = ScriptedDice::new([7]);
    assert_eq!(unit.roll_hit_location(&request, &mut again, None), first);
}

#[test]
fn test_seeded_hits_are_reproducible() {
    let result = verify_determinism(
        3,
        40,
        || (fixtures::quad(4), SeededDice::new(2024), Vec::new()),
        |(unit, dice, hits): &mut (Unit, SeededDice, Vec<HitResult>)| {
            hits.push(unit.roll_hit_location(&HitRequest::default(), dice, None));
        },
        |(_, _, hits)| hash_serialized(hits),
    );
    result.assert_deterministic();
}

// =============================================================================
// Damage state
// =============================================================================

#[test]
fn test_platoon_at_one_fifth_strength() {
    let mut unit = fixtures::platoon(5, 6);
    assert_eq!(unit.active_troopers(), 30);

    unit.set_internal(infantry::TROOPERS, 6);
    assert!(unit.is_crippled());
    assert!(unit.is_dmg_heavy());
    assert!(!unit.is_destroyed());
    assert_eq!(unit.active_troopers(), 6);
}

// =============================================================================
// Conversion
// =============================================================================

#[test]
fn test_destroyed_gyro_rejects_every_transition() {
    let mut lam = fixtures::lam(6);
    destroy_gyro(&mut lam);
    assert!(lam.is_gyro_destroyed());
    for target in [ConversionMode::AirMek, ConversionMode::Fighter] {
        assert!(!lam.can_convert_to(target));
        assert!(matches!(
            lam.request_conversion(target),
            Err(CoreError::ConversionRejected { .. })
        ));
    }
    assert_eq!(lam.conversion_mode(), Some(ConversionMode::Mek));

    let mut quadvee = fixtures::quadvee(5);
    destroy_gyro(&mut quadvee);
    assert!(quadvee.request_conversion(ConversionMode::Vehicle).is_err());
    assert_eq!(quadvee.conversion_mode(), Some(ConversionMode::Mek));
}

#[test]
fn test_gyro_loss_fails_piloting() {
    let mut unit = fixtures::biped(5);
    destroy_gyro(&mut unit);
    let roll = unit.base_piloting_roll(&PilotingContext::default());
    assert_eq!(roll.value(), RollTarget::Sentinel(RollSentinel::AutomaticFail));
}

#[test]
fn test_lam_round_trip_restores_walk() {
    let mut lam = fixtures::lam(6);
    let before = walk(&lam, None);
    lam.request_conversion(ConversionMode::Fighter).expect("to fighter");
    assert!(lam.is_converting());
    assert_eq!(
        lam.request_conversion(ConversionMode::Mek).expect("back to mek"),
        ConversionOutcome::Reverted
    );
    assert!(!lam.is_converting());
    assert_eq!(walk(&lam, None), before);
}

// =============================================================================
// Squadrons
// =============================================================================

#[test]
fn test_registry_squadron_follows_membership() {
    let mut registry = UnitRegistry::new();
    let squadron = registry.insert(
        Unit::builder("Red Flight", Chassis::FighterSquadron)
            .build()
            .expect("squadron"),
    );
    let fast = registry.insert(fixtures::fighter(7));
    let slow = registry.insert(fixtures::fighter(5));
    registry.join_squadron(squadron, fast).expect("join fast");
    registry.join_squadron(squadron, slow).expect("join slow");

    let mp = registry.compute_mp(squadron, MpKind::Walk, MpSettings::NONE, None);
    assert_eq!(mp.expect("squadron mp"), 5);

    assert!(registry.leave_squadron(squadron, slow).expect("leave"));
    let mp = registry.compute_mp(squadron, MpKind::Walk, MpSettings::NONE, None);
    assert_eq!(mp.expect("squadron mp"), 7);
    assert_eq!(registry.get(squadron).expect("squadron").location_count(), 1);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_layout_tables_agree(chassis in strategies::chassis()) {
        let unit = strategies::build_unit(chassis, 4);
        prop_assert_eq!(unit.layout().len(), unit.location_count());
        prop_assert_eq!(unit.criticals().location_count(), unit.location_count());
        prop_assert_eq!(unit.ledger().location_count(), unit.location_count());
    }

    #[test]
    fn prop_set_never_exceeds_original(
        chassis in strategies::chassis(),
        index in 0u8..9,
        value in 0u32..100,
        rear in any::<bool>(),
    ) {
        let mut unit = strategies::build_unit(chassis, 4);
        let location = Location::new(index);
        let original_armor = unit.ledger().original_armor(location, rear);
        let original_internal = unit.ledger().original_internal(location);
        prop_assert!(unit.set_armor(location, value, rear) <= original_armor);
        prop_assert!(unit.set_internal(location, value) <= original_internal);
    }

    #[test]
    fn prop_breakdown_total_matches_query(
        unit in strategies::unit(),
        kind in strategies::mp_kind(),
        settings in strategies::mp_settings(),
        env in strategies::environment(),
        heat in 0u32..40,
    ) {
        let mut unit = unit;
        unit.set_heat(heat);
        let breakdown = unit.mp_breakdown(kind, settings, Some(&env));
        prop_assert_eq!(breakdown.total, unit.compute_mp(kind, settings, Some(&env)));
        prop_assert_eq!(breakdown.stages.first().map(|s| s.stage), Some(MpStage::Base));
        if let Some(floor) = breakdown.after(MpStage::Floor) {
            prop_assert!(floor >= 0);
        }
    }

    #[test]
    fn prop_validated_gravity_keeps_mp_finite(
        unit in strategies::unit(),
        kind in strategies::mp_kind(),
        settings in strategies::mp_settings(),
        bits in MIN_GRAVITY.to_bits()..=Fixed::from_num(64).to_bits(),
    ) {
        let data = EnvironmentData {
            id: "drift".to_string(),
            name: String::new(),
            options: GameOptions::default(),
            conditions: PlanetaryConditions {
                gravity: Fixed::from_bits(bits),
                ..PlanetaryConditions::default()
            },
        };
        prop_assert!(data.validate().is_ok());
        let env = data.environment();
        let light = unit.compute_mp(kind, settings, Some(&env));
        let standard = unit.compute_mp(kind, settings, None);
        if env.conditions.gravity >= Fixed::from_num(1) {
            prop_assert!(light <= standard + 1);
        }
    }

    #[test]
    fn prop_ideal_walk_ignores_damage(
        unit in strategies::unit(),
        env in strategies::environment(),
        heat in 0u32..40,
    ) {
        let mut unit = unit;
        let base = unit.base_walk();
        unit.set_heat(heat);
        for index in 0..unit.location_count() {
            let location = Location::new(u8::try_from(index).unwrap_or(u8::MAX));
            unit.set_internal(location, 0);
        }
        prop_assert_eq!(unit.compute_mp(MpKind::Walk, MpSettings::ALL, Some(&env)), base);
    }

    #[test]
    fn prop_hit_resolution_is_pure(
        unit in strategies::unit(),
        request in strategies::hit_request(),
        script in strategies::dice_script(),
    ) {
        let before = unit.clone();
        let first = unit.roll_hit_location(&request, &mut ScriptedDice::new(script.clone()), None);
        let second = unit.roll_hit_location(&request, &mut ScriptedDice::new(script), None);
        prop_assert_eq!(first, second);
        prop_assert_eq!(&unit, &before);
        if !first.is_absorbed() {
            prop_assert!(first.location.index() < unit.location_count());
        }
    }

    #[test]
    fn prop_conversion_rejected_iff_disqualifying_hit(
        gyro in any::<bool>(),
        hip in any::<bool>(),
        avionics in any::<bool>(),
        gear in any::<bool>(),
    ) {
        let mut lam = fixtures::lam(6);
        let hits = [
            (gyro, mek::CENTER_TORSO, SystemKind::Gyro),
            (hip, mek::LEFT_LEG, SystemKind::Hip),
            (avionics, mek::HEAD, SystemKind::Avionics),
            (gear, mek::CENTER_TORSO, SystemKind::LandingGear),
        ];
        for (apply, location, kind) in hits {
            if apply {
                let slot = slot_of(&lam, location, kind).expect("system slot");
                lam.apply_hit(location, slot).expect("hit");
            }
        }
        let disqualified = gyro || hip || avionics || gear;
        let before = lam.clone();
        let result = lam.request_conversion(ConversionMode::Fighter);
        prop_assert_eq!(result.is_err(), disqualified);
        if disqualified {
            prop_assert_eq!(&lam, &before);
        }
    }
}

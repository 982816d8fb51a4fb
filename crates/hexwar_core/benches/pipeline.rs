//! Resolution pipeline benchmarks for hexwar_core.
//!
//! Run with: `cargo bench -p hexwar_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hexwar_core::location::mek;
use hexwar_core::prelude::*;

fn bench_unit() -> Unit {
    Unit::builder("Marauder", Chassis::Biped)
        .tonnage(75)
        .walk(4)
        .uniform(20, 8, 12)
        .build()
        .expect("bench unit")
}

/// MP pipeline with and without an environment.
pub fn movement_benchmark(c: &mut Criterion) {
    let mut unit = bench_unit();
    unit.set_heat(12);
    unit.set_internal(mek::LEFT_ARM, 0);
    let env = Environment::new(
        GameOptions::default(),
        PlanetaryConditions {
            weather: Weather::HeavySnow,
            wind: Wind::StrongGale,
            ..PlanetaryConditions::default()
        },
    );

    c.bench_function("compute_mp_walk_no_env", |b| {
        b.iter(|| black_box(&unit).compute_mp(MpKind::Walk, MpSettings::NONE, None))
    });
    c.bench_function("compute_mp_run_snow", |b| {
        b.iter(|| black_box(&unit).compute_mp(MpKind::Run, MpSettings::NONE, Some(&env)))
    });
}

/// Hit-location resolution with seeded dice.
pub fn hit_location_benchmark(c: &mut Criterion) {
    let unit = bench_unit();
    let plain = HitRequest::default();
    let covered = HitRequest::new(HitTable::Normal, AttackSide::Left)
        .with_cover(Cover::LOW_LEFT | Cover::LOW_RIGHT);

    c.bench_function("roll_hit_location_front", |b| {
        let mut dice = SeededDice::new(1);
        b.iter(|| unit.roll_hit_location(black_box(&plain), &mut dice, None))
    });
    c.bench_function("roll_hit_location_cover", |b| {
        let mut dice = SeededDice::new(2);
        b.iter(|| unit.roll_hit_location(black_box(&covered), &mut dice, None))
    });
}

/// Piloting aggregation on a damaged unit.
pub fn piloting_benchmark(c: &mut Criterion) {
    let mut unit = bench_unit();
    unit.set_velocity(12);
    let context = PilotingContext {
        action: PilotingAction::Skid,
        terrain: Terrain::Ice,
        env: None,
    };

    c.bench_function("base_piloting_roll", |b| {
        b.iter(|| black_box(&unit).base_piloting_roll(black_box(&context)))
    });
}

criterion_group!(
    benches,
    movement_benchmark,
    hit_location_benchmark,
    piloting_benchmark
);
criterion_main!(benches);

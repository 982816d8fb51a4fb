//! Determinism testing utilities.
//!
//! Provides a harness for verifying that combat resolution produces
//! identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! Resolution must be 100% reproducible: two peers replaying the same
//! dice against the same units must agree bit for bit. Sources of
//! non-determinism include:
//!
//! - **Floating-point math**: percentages use [`hexwar_core::math::Fixed`].
//!
//! - **HashMap iteration order**: the registry is a `BTreeMap` keyed by
//!   unit id, so serialization order is stable.
//!
//! - **System randomness**: every roll comes from an injected
//!   [`hexwar_core::dice::DiceRoller`].

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use tracing::debug;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps applied per run.
    pub steps: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic resolution).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that resolution was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Resolution is non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a scenario multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the scenario
/// * `steps` - Number of steps to apply per run
/// * `setup` - Function to create the initial state
/// * `step` - Function to advance the state by one step
/// * `hash` - Function to compute the state hash
///
/// # Example
///
/// ```ignore
/// use hexwar_test_utils::determinism::{hash_serialized, verify_determinism};
///
/// let result = verify_determinism(
///     5,
///     20,
///     || (fixtures::biped(5), SeededDice::new(7)),
///     |(unit, dice)| { unit.roll_hit_location(&HitRequest::default(), dice, None); },
///     |(unit, _)| hash_serialized(unit),
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for run in 0..runs {
        let mut state = setup();

        for _ in 0..steps {
            step(&mut state);
        }

        let digest = hash(&state);
        debug!(run, steps, hash = digest, "determinism run finished");
        hashes.push(digest);
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        steps,
    }
}

/// Hash any serializable state through its bincode encoding.
///
/// # Panics
///
/// Panics if the value cannot be serialized.
#[must_use]
pub fn hash_serialized<T: Serialize>(value: &T) -> u64 {
    let bytes = bincode::serialize(value).expect("state should serialize");
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

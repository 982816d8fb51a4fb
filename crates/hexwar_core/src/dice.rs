//! Dice sources for hit-location resolution.
//!
//! The core never touches system randomness. Every roll is drawn from a
//! [`DiceRoller`] passed in by the caller: a seeded [`SeededDice`] for play,
//! or a [`ScriptedDice`] that replays forced results.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of dice results.
pub trait DiceRoller {
    /// Roll `count` six-sided dice and return the total.
    fn roll_d6(&mut self, count: u8) -> u8;

    /// Pick an index uniformly in `0..len`. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Roll 2d6.
    fn roll_2d6(&mut self) -> u8 {
        self.roll_d6(2)
    }

    /// Roll 1d6.
    fn roll_1d6(&mut self) -> u8 {
        self.roll_d6(1)
    }
}

/// Seeded ChaCha dice. Same seed, same sequence.
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: ChaCha8Rng,
}

impl SeededDice {
    /// Create dice from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl DiceRoller for SeededDice {
    fn roll_d6(&mut self, count: u8) -> u8 {
        (0..count).map(|_| self.rng.gen_range(1..=6u8)).sum()
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len.max(1))
    }
}

/// Replays a fixed list of results.
///
/// Each call to [`DiceRoller::roll_d6`] or [`DiceRoller::pick_index`]
/// consumes the next scripted value regardless of how many dice were
/// requested, so a script of `[7]` forces a 2d6 roll of 7. Results are
/// clamped into the legal range of the request. An exhausted script keeps
/// returning the lowest legal result.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    results: VecDeque<u8>,
    consumed: usize,
}

impl ScriptedDice {
    /// Create dice that return `results` in order.
    #[must_use]
    pub fn new(results: impl IntoIterator<Item = u8>) -> Self {
        Self {
            results: results.into_iter().collect(),
            consumed: 0,
        }
    }

    /// Number of scripted results consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.consumed
    }

    /// Scripted results not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.results.len()
    }

    fn next(&mut self) -> Option<u8> {
        let next = self.results.pop_front();
        if next.is_some() {
            self.consumed += 1;
        }
        next
    }
}

impl DiceRoller for ScriptedDice {
    fn roll_d6(&mut self, count: u8) -> u8 {
        let low = count;
        let high = count.saturating_mul(6);
        self.next().map_or(low, |value| value.clamp(low, high))
    }

    fn pick_index(&mut self, len: usize) -> usize {
        let last = len.saturating_sub(1);
        self.next().map_or(0, |value| usize::from(value).min(last))
    }
}

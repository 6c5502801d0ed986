//! The single roll primitive every game decision funnels through.
//!
//! Production play uses [`SeededDice`]; tests and replays script exact
//! values with [`ScriptedDice`].

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform integer rolls.
pub trait RollSource {
    /// Roll an integer in `[1, max]`. A `max` of 0 is treated as 1.
    fn roll(&mut self, max: u32) -> u32;

    /// Roll a d100.
    fn d100(&mut self) -> u32 {
        self.roll(100)
    }
}

/// Dice backed by a seeded `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededDice {
    seed: u64,
    rng: StdRng,
}

impl SeededDice {
    /// Create dice from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The seed these dice were created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RollSource for SeededDice {
    fn roll(&mut self, max: u32) -> u32 {
        self.rng.random_range(1..=max.max(1))
    }
}

/// Dice that return a fixed sequence of values.
///
/// Values are clamped into `[1, max]` of the roll they answer. Once the
/// script runs out every roll returns 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    values: VecDeque<u32>,
}

impl ScriptedDice {
    /// Create dice that answer with `values` in order.
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Append more values to the script.
    pub fn push(&mut self, values: impl IntoIterator<Item = u32>) {
        self.values.extend(values);
    }

    /// Number of scripted values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RollSource for ScriptedDice {
    fn roll(&mut self, max: u32) -> u32 {
        let max = max.max(1);
        self.values.pop_front().unwrap_or(1).clamp(1, max)
    }
}

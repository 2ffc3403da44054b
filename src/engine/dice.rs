//! D20 resolution.

use rand::{Rng, rngs::ThreadRng};

use crate::model::RollMode;

/// A source of twenty-sided die results.
pub trait Dice {
    /// One uniformly distributed value in `1..=20`.
    fn d20(&mut self) -> u8;
}

/// Dice backed by a random number generator.
pub struct RandomDice<R = ThreadRng> {
    rng: R,
}

impl RandomDice {
    /// Dice drawing from the thread-local generator.
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl Default for RandomDice {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomDice<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Dice for RandomDice<R> {
    fn d20(&mut self) -> u8 {
        self.rng.gen_range(1..=20)
    }
}

/// Resolves two drawn dice under `mode`.
///
/// Returns the final value and the details line shown under it. Both dice
/// are always drawn; `Normal` uses only the first.
pub fn resolve(mode: RollMode, d1: u8, d2: u8) -> (u8, String) {
    match mode {
        RollMode::Normal => (d1, d1.to_string()),
        RollMode::Advantage => (d1.max(d2), format!("Rolled {d1} & {d2} (take high)")),
        RollMode::Disadvantage => (d1.min(d2), format!("Rolled {d1} & {d2} (take low)")),
    }
}

//! Random draws used by the engine.
//!
//! Every roll goes through [`Dice`] so a whole run can be replayed from a seed
//! ([`RandomDice`]) or driven by a fixed script in tests ([`ScriptedDice`]).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

pub trait Dice {
    /// Uniform integer in `1..=20`.
    fn d20(&mut self) -> i32;
    /// Uniform float in `[0, 1)`.
    fn chance(&mut self) -> f64;
    /// Uniform index in `0..len`. Callers never pass zero.
    fn pick(&mut self, len: usize) -> usize;
}

#[derive(Debug, Clone)]
pub struct RandomDice<R = StdRng> {
    rng: R,
}

impl RandomDice<StdRng> {
    /// Seeded when `seed` is set, otherwise drawn from OS entropy.
    pub fn from_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        RandomDice::new(rng)
    }
}

impl<R: Rng> RandomDice<R> {
    pub fn new(rng: R) -> Self {
        RandomDice { rng }
    }
}

impl<R: Rng> Dice for RandomDice<R> {
    fn d20(&mut self) -> i32 {
        self.rng.gen_range(1..=20)
    }

    fn chance(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

/// Dice that replay queued values in order.
///
/// Once a queue runs dry it keeps answering with a neutral value: `10` for
/// d20, a chance just under `1.0` (so no probability gate opens), and index
/// `0` for picks.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<i32>,
    chances: VecDeque<f64>,
    picks: VecDeque<usize>,
}

impl ScriptedDice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rolls(mut self, rolls: &[i32]) -> Self {
        self.push_rolls(rolls);
        self
    }

    pub fn with_chances(mut self, chances: &[f64]) -> Self {
        self.push_chances(chances);
        self
    }

    pub fn with_picks(mut self, picks: &[usize]) -> Self {
        self.push_picks(picks);
        self
    }

    pub fn push_rolls(&mut self, rolls: &[i32]) {
        self.rolls.extend(rolls.iter().copied());
    }

    pub fn push_chances(&mut self, chances: &[f64]) {
        self.chances.extend(chances.iter().copied());
    }

    pub fn push_picks(&mut self, picks: &[usize]) {
        self.picks.extend(picks.iter().copied());
    }
}

impl Dice for ScriptedDice {
    fn d20(&mut self) -> i32 {
        self.rolls.pop_front().unwrap_or(10).clamp(1, 20)
    }

    fn chance(&mut self) -> f64 {
        self.chances.pop_front().unwrap_or(0.999)
    }

    fn pick(&mut self, len: usize) -> usize {
        let i = self.picks.pop_front().unwrap_or(0);
        i.min(len.saturating_sub(1))
    }
}

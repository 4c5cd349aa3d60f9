//! # Random Sources
//!
//! Every chance-based rule (debris placement, crop growth, seed return) asks a
//! [`Dice`] for a roll instead of touching a global generator.

use rand::Rng;
use std::collections::VecDeque;

/// Source of uniform rolls in `[0, 1)`.
///
/// Implemented for every [`rand::Rng`], so a seeded `StdRng` works in the
/// game while tests can use [`ScriptedDice`] to force exact outcomes.
pub trait Dice {
    /// Returns the next roll in `[0, 1)`.
    fn roll(&mut self) -> f64;

    /// Returns true with the given probability.
    ///
    /// A roll succeeds when it is strictly below `probability`.
    fn chance(&mut self, probability: f64) -> bool {
        self.roll() < probability
    }
}

impl<R: Rng> Dice for R {
    fn roll(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Deterministic dice that replays a fixed sequence of rolls.
///
/// Once the script is exhausted every further roll returns `fallback`.
///
/// # Examples
///
/// ```
/// use tithe::{Dice, ScriptedDice};
///
/// let mut dice = ScriptedDice::new(vec![0.1, 0.9]);
/// assert!(dice.chance(0.5));
/// assert!(!dice.chance(0.5));
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    rolls: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedDice {
    /// Creates dice that replay `rolls`, then always roll 0.999 (every chance fails).
    pub fn new(rolls: Vec<f64>) -> Self {
        Self {
            rolls: rolls.into(),
            fallback: 0.999,
        }
    }

    /// Dice where every chance succeeds.
    pub fn always() -> Self {
        Self::constant(0.0)
    }

    /// Dice where every chance fails.
    pub fn never() -> Self {
        Self::constant(0.999)
    }

    /// Dice that always roll the same value.
    pub fn constant(value: f64) -> Self {
        Self {
            rolls: VecDeque::new(),
            fallback: value,
        }
    }

    /// Number of scripted rolls not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self) -> f64 {
        self.rolls.pop_front().unwrap_or(self.fallback)
    }
}

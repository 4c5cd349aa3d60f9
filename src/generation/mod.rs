//! # Generation Module
//!
//! Builds the farm at the start of every new game.
//!
//! The layout itself is fixed (fence ring, barn, pond); only debris
//! placement is random. All rolls come from the caller's [`Dice`] so a
//! seeded generator reproduces the same farm.

pub mod farm;

pub use farm::*;

use crate::config::{GRID_HEIGHT, GRID_WIDTH, SPAWN_X, SPAWN_Y};
use crate::game::Position;
use crate::utils::Dice;
use crate::{TitheError, TitheResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Inclusive rectangle of tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRect {
    pub top_left: Position,
    pub width: u32,
    pub height: u32,
}

impl TileRect {
    /// Creates a rectangle from its top-left corner and size.
    pub fn new(top_left: Position, width: u32, height: u32) -> Self {
        Self {
            top_left,
            width,
            height,
        }
    }

    /// Bottom-right corner (inclusive).
    pub fn bottom_right(&self) -> Position {
        Position::new(
            self.top_left.x + self.width as i32 - 1,
            self.top_left.y + self.height as i32 - 1,
        )
    }

    /// Checks if a position lies inside the rectangle.
    pub fn contains(&self, pos: Position) -> bool {
        let br = self.bottom_right();
        pos.x >= self.top_left.x && pos.x <= br.x && pos.y >= self.top_left.y && pos.y <= br.y
    }
}

/// Configuration for farm generation.
///
/// # Examples
///
/// ```
/// use tithe::{GenerationConfig, Position};
///
/// let config = GenerationConfig::default();
/// assert_eq!(config.width, 40);
/// assert_eq!(config.spawn, Position::new(20, 20));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Grid width in tiles
    pub width: u32,
    /// Grid height in tiles
    pub height: u32,
    /// Where the player starts
    pub spawn: Position,
    /// Chebyshev radius around spawn that never receives debris
    pub spawn_clearance: u32,
    /// Top-left tile of the 2x2 barn
    pub barn_origin: Position,
    /// The pond
    pub pond: TileRect,
    /// Probability that an open grass tile gets debris
    pub debris_chance: f64,
    /// Share of debris that is rock rather than stump
    pub rock_share: f64,
}

impl GenerationConfig {
    /// Creates the standard farm layout with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            spawn: Position::new(SPAWN_X, SPAWN_Y),
            spawn_clearance: 3,
            barn_origin: Position::new(8, 5),
            pond: TileRect::new(Position::new(31, 31), 5, 4),
            debris_chance: 0.08,
            rock_share: 0.5,
        }
    }

    /// A debris-free layout, handy for scripted tests.
    pub fn clear_field(seed: u64) -> Self {
        Self {
            debris_chance: 0.0,
            ..Self::new(seed)
        }
    }

    /// The four barn tiles, top-left first.
    pub fn barn_rect(&self) -> TileRect {
        TileRect::new(self.barn_origin, 2, 2)
    }

    /// Checks that every fixed feature fits inside the fence.
    pub fn validate(&self) -> TitheResult<()> {
        if self.width < 3 || self.height < 3 {
            return Err(TitheError::GenerationFailed(format!(
                "Farm of {}x{} is too small for a fence ring",
                self.width, self.height
            )));
        }
        let interior = TileRect::new(Position::new(1, 1), self.width - 2, self.height - 2);
        let features = [
            ("spawn", self.spawn, self.spawn),
            (
                "barn",
                self.barn_rect().top_left,
                self.barn_rect().bottom_right(),
            ),
            ("pond", self.pond.top_left, self.pond.bottom_right()),
        ];
        for (name, top_left, bottom_right) in features {
            if !interior.contains(top_left) || !interior.contains(bottom_right) {
                return Err(TitheError::GenerationFailed(format!(
                    "The {} does not fit inside a {}x{} farm",
                    name, self.width, self.height
                )));
            }
        }
        if self.barn_rect().contains(self.spawn) || self.pond.contains(self.spawn) {
            return Err(TitheError::GenerationFailed(
                "Spawn point is inside a building or the pond".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.debris_chance) || !(0.0..=1.0).contains(&self.rock_share) {
            return Err(TitheError::GenerationFailed(
                "Debris probabilities must lie in [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random source.
    fn generate(&self, config: &GenerationConfig, dice: &mut dyn Dice) -> TitheResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> TitheResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Creates a seeded random number generator from the config.
pub fn create_rng(config: &GenerationConfig) -> StdRng {
    StdRng::seed_from_u64(config.seed)
}

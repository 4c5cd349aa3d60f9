//! # Tithe
//!
//! A small single-player farming survival game on a bounded tile grid.
//!
//! ## Architecture Overview
//!
//! The crate is split between a pure rules core and thin presentation plumbing:
//!
//! - **Game State**: the world grid, player, inventory and progression in one value
//! - **Action System**: every player command is a [`ConcreteAction`] applied to the state
//! - **Generation System**: deterministic farm layout plus randomized debris
//! - **Persistence**: JSON snapshots with a validating upgrade path
//! - **Controller**: one mutex-guarded state shared with the growth ticker and auto-save
//! - **Rendering/Input**: a macroquad front end that only reads state and issues actions
//!
//! All randomness flows through the [`Dice`] trait so that rules can be driven by
//! scripted rolls in tests.

pub mod controller;
pub mod game;
pub mod generation;
pub mod input;
pub mod persistence;
pub mod rendering;
pub mod scenes;
pub mod utils;

// Core module re-exports
pub use controller::*;
pub use game::*;
pub use generation::*;
pub use input::*;
pub use persistence::*;
pub use rendering::*;
pub use scenes::*;
pub use utils::*;

/// Core error type for the Tithe engine.
///
/// Game transitions never fail; errors only surface at the edges (world
/// generation, persistence and application startup).
#[derive(thiserror::Error, Debug)]
pub enum TitheError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Persisted snapshot failed validation
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Tithe codebase.
pub type TitheResult<T> = Result<T, TitheError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default farm width in tiles
    pub const GRID_WIDTH: u32 = 40;

    /// Default farm height in tiles
    pub const GRID_HEIGHT: u32 = 40;

    /// Player spawn column
    pub const SPAWN_X: i32 = 20;

    /// Player spawn row
    pub const SPAWN_Y: i32 = 20;

    /// Starting player energy (reserved, no rule consumes it)
    pub const DEFAULT_PLAYER_ENERGY: u32 = 100;

    /// Harvested crops required by the end of the season
    pub const QUOTA_TARGET: u32 = 40;

    /// Last playable day
    pub const MAX_DAYS: u32 = 7;

    /// Seeds of each kind in a fresh inventory
    pub const STARTING_SEEDS: u32 = 20;

    /// Highest crop growth stage; crops at this stage can be harvested
    pub const MAX_GROWTH_STAGE: u8 = 3;

    /// Overnight growth chance for a watered crop
    pub const SLEEP_GROWTH_CHANCE_WATERED: f64 = 0.6;

    /// Overnight growth chance for a dry crop
    pub const SLEEP_GROWTH_CHANCE_DRY: f64 = 0.2;

    /// Per-tick passive growth chance for a watered crop
    pub const TICK_GROWTH_CHANCE_WATERED: f64 = 0.15;

    /// Per-tick passive growth chance for a dry crop
    pub const TICK_GROWTH_CHANCE_DRY: f64 = 0.05;

    /// Chance that harvesting returns a seed
    pub const SEED_RETURN_CHANCE: f64 = 0.6;

    /// Milliseconds between passive growth ticks
    pub const GROWTH_TICK_INTERVAL_MS: u64 = 2_000;

    /// Milliseconds between auto-saves
    pub const AUTO_SAVE_INTERVAL_MS: u64 = 60_000;

    /// Viewport width in tiles
    pub const VIEWPORT_WIDTH_TILES: i32 = 15;

    /// Viewport height in tiles
    pub const VIEWPORT_HEIGHT_TILES: i32 = 10;

    /// Milliseconds between repeated steps while a movement key is held
    pub const MOVE_REPEAT_MS: u64 = 150;
}

//! # Game State Module
//!
//! Central game state: the farm, the farmer, their inventory and the
//! season's progression.
//!
//! [`GameState`] is a plain value. Every change goes through an action (see
//! [`crate::game::actions`]) or one of the day/tick transitions defined
//! here, and every transition is total: an action whose preconditions are
//! not met leaves the state untouched.

use crate::config::{MAX_DAYS, QUOTA_TARGET};
use crate::game::{
    dry_out, grow_crops, Action, ConcreteAction, CropKind, GameEvent, GrowthChances, Inventory,
    Player, Position, Tile, Tool, World,
};
use crate::generation::{FarmGenerator, GenerationConfig, Generator};
use crate::utils::Dice;
use crate::TitheResult;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Outcome of the season.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameStatus {
    /// Season still running
    #[default]
    Playing,
    /// Quota met by the end of the last day
    Won,
    /// Quota missed
    Lost,
}

impl GameStatus {
    /// Won and Lost are terminal until a full reset.
    pub fn is_terminal(self) -> bool {
        self != GameStatus::Playing
    }
}

/// Season length and harvest quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    /// Last playable day; sleeping past it ends the game
    pub max_days: u32,
    /// Total crops that must be harvested to win
    pub quota_target: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            max_days: MAX_DAYS,
            quota_target: QUOTA_TARGET,
        }
    }
}

/// Everything that makes up a running game.
///
/// Serializes to the save format (camelCase keys, grid under `grid`). The
/// rules are not part of a save; they come from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// The farm grid
    #[serde(rename = "grid")]
    pub world: World,
    /// The farmer
    pub player: Player,
    /// Seeds, harvest and tools
    pub inventory: Inventory,
    /// Seed kind used by planting
    pub selected_seed: CropKind,
    /// Equipped tool
    pub selected_tool: Tool,
    /// Whether the watering can holds water
    pub can_is_full: bool,
    /// Current day, starting at 1
    pub day: u32,
    /// Crops harvested over the whole season
    pub harvested_total: u32,
    /// Outcome so far
    pub game_status: GameStatus,
    /// Milliseconds since the Unix epoch of the last save, 0 if never saved
    pub last_saved: u64,
    /// Season length and quota
    #[serde(skip)]
    pub rules: GameRules,
}

impl GameState {
    /// Starts a fresh game on a newly generated farm.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use tithe::{GameRules, GameState, GameStatus, GenerationConfig};
    ///
    /// let mut rng = StdRng::seed_from_u64(12345);
    /// let state = GameState::new_game(&GenerationConfig::default(), GameRules::default(), &mut rng).unwrap();
    /// assert_eq!(state.day, 1);
    /// assert_eq!(state.game_status, GameStatus::Playing);
    /// ```
    pub fn new_game(
        config: &GenerationConfig,
        rules: GameRules,
        dice: &mut dyn Dice,
    ) -> TitheResult<Self> {
        let generator = FarmGenerator::new();
        let world = generator.generate(config, dice)?;
        generator.validate(&world, config)?;
        info!(
            "Generated {}x{} farm, spawning at {:?}",
            world.width(),
            world.height(),
            config.spawn
        );
        Ok(Self::with_world(world, config.spawn, rules))
    }

    /// Starts a game on a prepared world with the starting inventory.
    pub fn with_world(world: World, spawn: Position, rules: GameRules) -> Self {
        Self {
            world,
            player: Player::new(spawn),
            inventory: Inventory::starting(),
            selected_seed: CropKind::Wheat,
            selected_tool: Tool::None,
            can_is_full: false,
            day: 1,
            harvested_total: 0,
            game_status: GameStatus::Playing,
            last_saved: 0,
            rules,
        }
    }

    /// Whether actions still have an effect.
    pub fn is_playing(&self) -> bool {
        self.game_status == GameStatus::Playing
    }

    /// The tile the player stands on.
    pub fn current_tile(&self) -> Option<&Tile> {
        self.world.get_tile(self.player.position)
    }

    /// The tile the player faces, if it is on the grid.
    pub fn faced_tile(&self) -> Option<&Tile> {
        self.world.get_tile(self.player.faced_position())
    }

    /// Whether the player faces the barn.
    ///
    /// Both the interact rule and the front end's shed menu use this one
    /// predicate to decide that the barn was reached.
    pub fn is_at_barn_door(&self) -> bool {
        self.faced_tile().is_some_and(|tile| tile.terrain.is_barn())
    }

    /// The selected tool if it is owned, otherwise the empty hand.
    pub fn equipped_tool(&self) -> Tool {
        if self.inventory.owns(self.selected_tool) {
            self.selected_tool
        } else {
            Tool::None
        }
    }

    /// Crops still needed to meet the quota.
    pub fn quota_remaining(&self) -> u32 {
        self.rules.quota_target.saturating_sub(self.harvested_total)
    }

    /// Executes an action in place and returns what happened.
    pub fn execute(&mut self, action: &ConcreteAction, dice: &mut dyn Dice) -> Vec<GameEvent> {
        action.execute(self, dice)
    }

    /// Pure form of [`GameState::execute`]: returns the next state and leaves
    /// `self` untouched.
    pub fn apply(&self, action: &ConcreteAction, dice: &mut dyn Dice) -> (GameState, Vec<GameEvent>) {
        let mut next = self.clone();
        let events = next.execute(action, dice);
        (next, events)
    }

    /// Sleeps through the night.
    ///
    /// Increments the day, rolls overnight growth (watered soil grows
    /// faster), dries every tile, and decides the season once the day
    /// passes `max_days`. This is the only place the day changes and the
    /// only place the game can be won or lost. No-op once the game is over.
    pub fn advance_day(&mut self, dice: &mut dyn Dice) -> Vec<GameEvent> {
        if !self.is_playing() {
            return Vec::new();
        }

        self.day += 1;
        let mut events: Vec<GameEvent> = grow_crops(&mut self.world, GrowthChances::SLEEP, dice)
            .into_iter()
            .map(|(position, stage)| GameEvent::CropGrew { position, stage })
            .collect();
        dry_out(&mut self.world);
        events.push(GameEvent::DayAdvanced { day: self.day });
        info!("Day {} begins ({} harvested)", self.day, self.harvested_total);

        if self.day > self.rules.max_days {
            self.game_status = if self.harvested_total >= self.rules.quota_target {
                GameStatus::Won
            } else {
                GameStatus::Lost
            };
            info!(
                "Season over: {:?} with {}/{} harvested",
                self.game_status, self.harvested_total, self.rules.quota_target
            );
            events.push(GameEvent::GameEnded {
                status: self.game_status,
            });
        }

        events
    }

    /// One pass of the real-time growth ticker. No-op once the game is over.
    pub fn passive_growth_tick(&mut self, dice: &mut dyn Dice) -> Vec<GameEvent> {
        if !self.is_playing() {
            return Vec::new();
        }
        let events: Vec<GameEvent> = grow_crops(&mut self.world, GrowthChances::TICK, dice)
            .into_iter()
            .map(|(position, stage)| GameEvent::CropGrew { position, stage })
            .collect();
        if !events.is_empty() {
            debug!("Passive growth advanced {} crops", events.len());
        }
        events
    }
}

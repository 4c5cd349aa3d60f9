//! # Action System
//!
//! Every player command is a [`ConcreteAction`]. Executing one against a
//! [`GameState`] mutates it in place and reports what happened as
//! [`GameEvent`]s. Actions never fail: a command whose preconditions do not
//! hold is a no-op (a blocked move still turns the player).

use crate::config::SEED_RETURN_CHANCE;
use crate::game::{Crop, CropKind, Direction, GameState, GameStatus, Position, TileType, Tool};
use crate::utils::{now_millis, Dice};
use log::debug;
use serde::{Deserialize, Serialize};

/// Something that happened as the result of an action or transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player stepped to a new tile
    PlayerMoved { from: Position, to: Position },
    /// The step was blocked; only the facing changed
    PlayerTurned { facing: Direction },
    /// Grass was tilled into soil
    SoilTilled { position: Position },
    /// A ripe crop was cut
    CropHarvested {
        position: Position,
        kind: CropKind,
        seed_returned: bool,
    },
    /// The watering can was refilled at the pond
    CanFilled,
    /// Soil was watered and the can emptied
    SoilWatered { position: Position },
    /// A rock or stump was turned back into grass
    DebrisCleared { position: Position, debris: TileType },
    /// A seed went into the ground
    CropPlanted { position: Position, kind: CropKind },
    /// A crop advanced a growth stage
    CropGrew { position: Position, stage: u8 },
    /// The player slept and a new day started
    DayAdvanced { day: u32 },
    /// The season was decided
    GameEnded { status: GameStatus },
    /// A tool was equipped
    ToolSelected { tool: Tool },
    /// A seed kind was selected for planting
    SeedSelected { kind: CropKind },
    /// A tool was taken from the shed
    ToolAcquired { tool: Tool },
}

impl GameEvent {
    /// A short line for the message log, for events worth telling the player.
    pub fn message(&self) -> Option<String> {
        match self {
            GameEvent::CropHarvested {
                kind,
                seed_returned,
                ..
            } => Some(if *seed_returned {
                format!("Harvested {} and saved a seed", kind.name())
            } else {
                format!("Harvested {}", kind.name())
            }),
            GameEvent::CanFilled => Some("The can is full".to_string()),
            GameEvent::DebrisCleared { debris, .. } => Some(match debris {
                TileType::Rock => "Broke the rock".to_string(),
                _ => "Cleared the stump".to_string(),
            }),
            GameEvent::DayAdvanced { day } => Some(format!("Day {} dawns", day)),
            GameEvent::GameEnded { status } => Some(match status {
                GameStatus::Won => "The tithe is paid. You are spared.".to_string(),
                _ => "The quota was not met.".to_string(),
            }),
            GameEvent::ToolAcquired { tool } => Some(format!("Took the {}", tool.name())),
            _ => None,
        }
    }
}

/// Kinds of actions, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    Move,
    Interact,
    Plant,
    AdvanceDay,
    SelectSeed,
    SelectTool,
    AcquireTool,
}

/// Trait for everything that can be executed against the game state.
pub trait Action {
    /// Applies the action. Never fails; unmet preconditions leave the state unchanged.
    fn execute(&self, state: &mut GameState, dice: &mut dyn Dice) -> Vec<GameEvent>;

    /// The kind of action.
    fn action_type(&self) -> ActionType;
}

/// A single step request.
///
/// `dx`/`dy` should be a unit cardinal step; anything else only turns the
/// player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveAction {
    pub dx: i32,
    pub dy: i32,
    pub facing: Direction,
}

impl MoveAction {
    /// Builds a step from its raw parts.
    pub fn new(dx: i32, dy: i32, facing: Direction) -> Self {
        Self { dx, dy, facing }
    }

    /// A step in `direction`.
    pub fn toward(direction: Direction) -> Self {
        let delta = direction.to_delta();
        Self::new(delta.x, delta.y, direction)
    }
}

/// Every command the input layer can issue.
///
/// # Examples
///
/// ```
/// use tithe::{ConcreteAction, Direction, GameRules, GameState, Position, ScriptedDice, World};
///
/// let mut state = GameState::with_world(World::new(10, 10), Position::new(5, 5), GameRules::default());
/// let mut dice = ScriptedDice::never();
/// state.execute(&ConcreteAction::step(Direction::Right), &mut dice);
/// assert_eq!(state.player.position, Position::new(6, 5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcreteAction {
    Move(MoveAction),
    Interact,
    Plant,
    AdvanceDay,
    SelectSeed(CropKind),
    SelectTool(Tool),
    AcquireTool(Tool),
}

impl ConcreteAction {
    /// A one-tile step in `direction`.
    pub fn step(direction: Direction) -> Self {
        ConcreteAction::Move(MoveAction::toward(direction))
    }
}

impl Action for ConcreteAction {
    fn execute(&self, state: &mut GameState, dice: &mut dyn Dice) -> Vec<GameEvent> {
        let events = match self {
            ConcreteAction::Move(step) => move_player(state, *step),
            ConcreteAction::Interact => interact(state, dice),
            ConcreteAction::Plant => plant(state),
            ConcreteAction::AdvanceDay => state.advance_day(dice),
            ConcreteAction::SelectSeed(kind) => select_seed(state, *kind),
            ConcreteAction::SelectTool(tool) => select_tool(state, *tool),
            ConcreteAction::AcquireTool(tool) => acquire_tool(state, *tool),
        };
        debug!("{:?} -> {} events", self.action_type(), events.len());
        events
    }

    fn action_type(&self) -> ActionType {
        match self {
            ConcreteAction::Move(_) => ActionType::Move,
            ConcreteAction::Interact => ActionType::Interact,
            ConcreteAction::Plant => ActionType::Plant,
            ConcreteAction::AdvanceDay => ActionType::AdvanceDay,
            ConcreteAction::SelectSeed(_) => ActionType::SelectSeed,
            ConcreteAction::SelectTool(_) => ActionType::SelectTool,
            ConcreteAction::AcquireTool(_) => ActionType::AcquireTool,
        }
    }
}

fn move_player(state: &mut GameState, step: MoveAction) -> Vec<GameEvent> {
    if !state.is_playing() {
        return Vec::new();
    }

    state.player.facing = step.facing;

    let turned = vec![GameEvent::PlayerTurned {
        facing: step.facing,
    }];
    let from = state.player.position;
    let Some(direction) = Direction::from_delta(Position::new(step.dx, step.dy)) else {
        return turned;
    };
    let target = from.step(direction);
    if state.world.is_blocked(target) {
        return turned;
    }

    state.player.position = target;
    vec![GameEvent::PlayerMoved { from, to: target }]
}

fn interact(state: &mut GameState, dice: &mut dyn Dice) -> Vec<GameEvent> {
    if !state.is_playing() {
        return Vec::new();
    }

    let tool = state.equipped_tool();
    let here = state.player.position;
    let Some(tile) = state.world.get_tile(here) else {
        return Vec::new();
    };
    let terrain = tile.terrain;
    let has_crop = tile.crop.is_some();
    let ripe = tile.crop.is_some_and(|crop| crop.is_harvestable());

    // Own tile first.
    match tool {
        Tool::Hoe if terrain == TileType::Grass => {
            state.world.set_terrain(here, TileType::Dirt);
            return vec![GameEvent::SoilTilled { position: here }];
        }
        Tool::Scythe if ripe => {
            return harvest(state, here, dice);
        }
        Tool::Can => {
            if state.world.is_near_water(here) {
                state.can_is_full = true;
                return vec![GameEvent::CanFilled];
            }
            if state.can_is_full && (terrain == TileType::Dirt || has_crop) {
                if let Some(tile) = state.world.get_tile_mut(here) {
                    tile.watered = true;
                }
                state.can_is_full = false;
                return vec![GameEvent::SoilWatered { position: here }];
            }
        }
        _ => {}
    }

    // Then the faced tile.
    let faced = state.player.faced_position();
    let Some(faced_terrain) = state.world.get_tile(faced).map(|tile| tile.terrain) else {
        return Vec::new();
    };

    if faced_terrain.is_barn() {
        return state.advance_day(dice);
    }

    let clears = matches!(
        (tool, faced_terrain),
        (Tool::Hoe, TileType::Rock) | (Tool::Scythe, TileType::Stump)
    );
    if clears {
        state.world.set_terrain(faced, TileType::Grass);
        return vec![GameEvent::DebrisCleared {
            position: faced,
            debris: faced_terrain,
        }];
    }

    Vec::new()
}

fn harvest(state: &mut GameState, position: Position, dice: &mut dyn Dice) -> Vec<GameEvent> {
    let Some(crop) = state
        .world
        .get_tile_mut(position)
        .and_then(|tile| tile.crop.take())
    else {
        return Vec::new();
    };

    *state.inventory.crops.get_mut(crop.kind) += 1;
    state.harvested_total += 1;

    let seed_returned = dice.chance(SEED_RETURN_CHANCE);
    if seed_returned {
        *state.inventory.seeds.get_mut(crop.kind) += 1;
    }

    vec![GameEvent::CropHarvested {
        position,
        kind: crop.kind,
        seed_returned,
    }]
}

fn plant(state: &mut GameState) -> Vec<GameEvent> {
    if !state.is_playing() {
        return Vec::new();
    }

    let here = state.player.position;
    let kind = state.selected_seed;
    let plantable = state.world.get_tile(here).is_some_and(|tile| tile.can_plant());
    if !plantable || state.inventory.seeds.get(kind) == 0 {
        return Vec::new();
    }

    state.inventory.take_seed(kind);
    if let Some(tile) = state.world.get_tile_mut(here) {
        tile.crop = Some(Crop::new(kind, now_millis()));
    }
    vec![GameEvent::CropPlanted {
        position: here,
        kind,
    }]
}

fn select_seed(state: &mut GameState, kind: CropKind) -> Vec<GameEvent> {
    state.selected_seed = kind;
    vec![GameEvent::SeedSelected { kind }]
}

fn select_tool(state: &mut GameState, tool: Tool) -> Vec<GameEvent> {
    if !state.inventory.owns(tool) {
        return Vec::new();
    }
    state.selected_tool = tool;
    vec![GameEvent::ToolSelected { tool }]
}

fn acquire_tool(state: &mut GameState, tool: Tool) -> Vec<GameEvent> {
    if !state.inventory.add_tool(tool) {
        return Vec::new();
    }
    state.selected_tool = tool;
    vec![GameEvent::ToolAcquired { tool }]
}

//! # Persistence Module
//!
//! Saves and restores the game as a single JSON snapshot.
//!
//! The snapshot is the serialized [`GameState`] plus a `version` field.
//! Loading never trusts the file: the grid and the player are validated,
//! every other field is optional and falls back to its starting value, and
//! anything that cannot be repaired makes the whole snapshot count as
//! absent (a fresh game starts instead).

pub mod store;

pub use store::*;

use crate::game::{CropKind, GameRules, GameState, GameStatus, Inventory, Player, Tool, TileType, World};
use crate::config::MAX_GROWTH_STAGE;
use crate::generation::GenerationConfig;
use crate::utils::now_millis;
use crate::{TitheError, TitheResult};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u32 = 5;

/// Serializes a state to snapshot JSON stamped with `saved_at`.
pub fn encode_snapshot(state: &GameState, saved_at: u64) -> TitheResult<String> {
    let mut value = serde_json::to_value(state)?;
    let object = value.as_object_mut().ok_or_else(|| {
        TitheError::InvalidState("game state did not serialize to an object".to_string())
    })?;
    object.insert("lastSaved".to_string(), Value::from(saved_at));
    object.insert("version".to_string(), Value::from(SNAPSHOT_VERSION));
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Parses and upgrades snapshot JSON into a playable state.
///
/// Fails with [`TitheError::InvalidSnapshot`] if the grid or the player is
/// missing or malformed, or does not fit the configured farm.
///
/// # Examples
///
/// ```
/// use tithe::{upgrade_snapshot, GameRules, GameStatus, GenerationConfig, Tool};
///
/// let config = GenerationConfig { width: 3, height: 3, ..GenerationConfig::default() };
/// let row = r#"[{"type":"GRASS","isCollidable":false},{"type":"GRASS","isCollidable":false},{"type":"GRASS","isCollidable":false}]"#;
/// let json = format!(r#"{{"grid":[{row},{row},{row}],"player":{{"x":1,"y":1}}}}"#);
///
/// let state = upgrade_snapshot(&json, &config, GameRules::default()).unwrap();
/// assert_eq!(state.day, 1);
/// assert_eq!(state.game_status, GameStatus::Playing);
/// assert_eq!(state.selected_tool, Tool::None);
/// ```
pub fn upgrade_snapshot(
    json: &str,
    config: &GenerationConfig,
    rules: GameRules,
) -> TitheResult<GameState> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| TitheError::InvalidSnapshot(format!("not valid JSON: {}", e)))?;
    let object = value
        .as_object()
        .ok_or_else(|| invalid("snapshot is not an object"))?;

    if let Some(version) = object.get("version").and_then(Value::as_u64) {
        if version != u64::from(SNAPSHOT_VERSION) {
            warn!(
                "Snapshot has version {} but current version is {}; loading anyway",
                version, SNAPSHOT_VERSION
            );
        }
    }

    let mut world = read_world(object, config)?;
    let player = read_player(object, &world)?;

    sanitize_crops(&mut world);

    let (inventory, selected_seed) = match optional::<Inventory>(object, "inventory") {
        Some(inventory) => (
            inventory,
            optional(object, "selectedSeed").unwrap_or(CropKind::Wheat),
        ),
        None => (Inventory::starting(), CropKind::Wheat),
    };

    let mut selected_tool = optional(object, "selectedTool").unwrap_or(Tool::None);
    if !inventory.owns(selected_tool) {
        debug!("Dropping unowned selected tool {:?}", selected_tool);
        selected_tool = Tool::None;
    }

    Ok(GameState {
        world,
        player,
        inventory,
        selected_seed,
        selected_tool,
        can_is_full: optional(object, "canIsFull").unwrap_or(false),
        day: optional::<u32>(object, "day").unwrap_or(1).max(1),
        harvested_total: optional(object, "harvestedTotal").unwrap_or(0),
        game_status: optional(object, "gameStatus").unwrap_or(GameStatus::Playing),
        last_saved: optional(object, "lastSaved").unwrap_or(0),
        rules,
    })
}

/// Loads the saved game, or `None` if there is no usable save.
///
/// Read failures and invalid snapshots are logged and treated as absent.
pub fn load_game(
    store: &dyn SnapshotStore,
    config: &GenerationConfig,
    rules: GameRules,
) -> Option<GameState> {
    let json = match store.load_raw() {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            warn!("Failed to read save data: {}", e);
            return None;
        }
    };

    match upgrade_snapshot(&json, config, rules) {
        Ok(state) => {
            info!(
                "Loaded save from day {} ({} harvested)",
                state.day, state.harvested_total
            );
            Some(state)
        }
        Err(e) => {
            warn!("Discarding save data: {}", e);
            None
        }
    }
}

/// Writes a snapshot of `state` and stamps `last_saved` on success.
///
/// On failure the in-memory state is left exactly as it was.
pub fn save_game(store: &dyn SnapshotStore, state: &mut GameState) -> TitheResult<()> {
    let saved_at = now_millis();
    let json = encode_snapshot(state, saved_at)?;
    store.save(&json)?;
    state.last_saved = saved_at;
    debug!("Saved game on day {}", state.day);
    Ok(())
}

fn invalid(message: &str) -> TitheError {
    TitheError::InvalidSnapshot(message.to_string())
}

/// A field that may be missing or malformed; either way it reads as `None`.
fn optional<T: DeserializeOwned>(object: &Map<String, Value>, key: &str) -> Option<T> {
    let value = object.get(key)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!("Ignoring malformed snapshot field {}: {}", key, e);
            None
        }
    }
}

fn read_world(object: &Map<String, Value>, config: &GenerationConfig) -> TitheResult<World> {
    let grid = object
        .get("grid")
        .filter(|grid| grid.is_array())
        .ok_or_else(|| invalid("missing grid"))?;
    let mut grid = grid.clone();
    clamp_growth_stages(&mut grid);
    let world: World = serde_json::from_value(grid)
        .map_err(|e| TitheError::InvalidSnapshot(format!("malformed grid: {}", e)))?;

    if !world.is_rectangular()
        || world.width() != config.width
        || world.height() != config.height
    {
        return Err(TitheError::InvalidSnapshot(format!(
            "grid is not {}x{}",
            config.width, config.height
        )));
    }
    Ok(world)
}

fn read_player(object: &Map<String, Value>, world: &World) -> TitheResult<Player> {
    let player = object
        .get("player")
        .and_then(Value::as_object)
        .ok_or_else(|| invalid("missing player"))?;
    let has_coordinates = ["x", "y"]
        .iter()
        .all(|key| player.get(*key).is_some_and(Value::is_number));
    if !has_coordinates {
        return Err(invalid("player has no numeric coordinates"));
    }

    let player: Player = serde_json::from_value(Value::Object(player.clone()))
        .map_err(|e| TitheError::InvalidSnapshot(format!("malformed player: {}", e)))?;
    if !world.in_bounds(player.position) {
        return Err(TitheError::InvalidSnapshot(format!(
            "player at {:?} is off the grid",
            player.position
        )));
    }
    Ok(player)
}

/// Pulls every numeric `growthStage` into range before the grid is typed,
/// so a stage of 300 or -1 is repaired rather than failing the whole grid.
fn clamp_growth_stages(grid: &mut Value) {
    let Some(rows) = grid.as_array_mut() else {
        return;
    };
    let tiles = rows.iter_mut().filter_map(Value::as_array_mut).flatten();
    for tile in tiles {
        let Some(stage) = tile.pointer_mut("/crop/growthStage") else {
            continue;
        };
        if let Some(raw) = stage.as_f64() {
            let clamped = raw.clamp(0.0, f64::from(MAX_GROWTH_STAGE)).floor() as u8;
            *stage = Value::from(clamped);
        }
    }
}

/// Drops crops that are not on soil and caps growth stages.
fn sanitize_crops(world: &mut World) {
    for (pos, tile) in world.iter_mut() {
        if tile.crop.is_some() && tile.terrain != TileType::Dirt {
            debug!("Dropping crop on {:?} tile at {:?}", tile.terrain, pos);
            tile.crop = None;
        }
        if let Some(crop) = tile.crop.as_mut() {
            crop.growth_stage = crop.growth_stage.min(MAX_GROWTH_STAGE);
        }
    }
}

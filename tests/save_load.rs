//! Saving to disk and resuming, including saves in older or damaged shapes.

use serde_json::{json, Value};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tithe::{
    encode_snapshot, load_game, save_game, upgrade_snapshot, CropKind, GameController, GameRules,
    GameState, GameStatus, GenerationConfig, Inventory, JsonFileStore, Position, ScriptedDice,
    SnapshotStore, TileType, TitheResult, Tool,
};

fn config() -> GenerationConfig {
    GenerationConfig::clear_field(11)
}

fn fresh_state() -> GameState {
    GameState::new_game(&config(), GameRules::default(), &mut ScriptedDice::never()).unwrap()
}

#[test]
fn test_file_round_trip_preserves_the_game() -> TitheResult<()> {
    let dir = TempDir::new()?;
    let store = JsonFileStore::new(dir.path().join("nested").join("tithe.json"));

    let mut state = fresh_state();
    state.inventory.add_tool(Tool::Hoe);
    state.selected_tool = Tool::Hoe;
    state.selected_seed = CropKind::Corn;
    state.day = 5;
    state.harvested_total = 2;
    state.inventory.crops.wheat = 2;
    state.world.set_terrain(Position::new(20, 21), TileType::Dirt);
    state.world.get_tile_mut(Position::new(20, 21)).unwrap().watered = true;

    save_game(&store, &mut state)?;
    let loaded = load_game(&store, &config(), GameRules::default()).expect("save should load");
    assert_eq!(loaded, state);
    Ok(())
}

#[test]
fn test_save_file_uses_camel_case_keys() -> TitheResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("tithe.json");
    let store = JsonFileStore::new(&path);
    save_game(&store, &mut fresh_state())?;

    let value: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    for key in [
        "grid",
        "player",
        "inventory",
        "selectedSeed",
        "selectedTool",
        "canIsFull",
        "day",
        "harvestedTotal",
        "gameStatus",
        "lastSaved",
        "version",
    ] {
        assert!(value.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(value["gameStatus"], json!("PLAYING"));
    assert_eq!(value["player"], json!({"x": 20, "y": 20, "facing": "DOWN", "energy": 100}));
    assert_eq!(value["grid"][0][0], json!({"type": "FENCE", "isCollidable": true, "isWatered": false}));
    assert_eq!(value["inventory"]["seeds"], json!({"WHEAT": 20, "CORN": 20}));
    Ok(())
}

#[test]
fn test_legacy_save_without_progress_fields() {
    // An early save: grid and player only, plus a selected tool the player
    // never owned.
    let mut value: Value = serde_json::from_str(&encode_snapshot(&fresh_state(), 0).unwrap()).unwrap();
    let object = value.as_object_mut().unwrap();
    for key in ["gameStatus", "harvestedTotal", "inventory", "day", "canIsFull", "version"] {
        object.remove(key);
    }
    object.insert("selectedTool".to_string(), json!("SCYTHE"));

    let state = upgrade_snapshot(&value.to_string(), &config(), GameRules::default()).unwrap();
    assert_eq!(state.game_status, GameStatus::Playing);
    assert_eq!(state.harvested_total, 0);
    assert_eq!(state.inventory, Inventory::starting());
    assert_eq!(state.selected_seed, CropKind::Wheat);
    assert_eq!(state.selected_tool, Tool::None);
    assert_eq!(state.day, 1);
    assert!(!state.can_is_full);
}

#[test]
fn test_corrupt_save_starts_a_new_game() -> TitheResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("tithe.json");
    fs::write(&path, "{\"grid\": [], \"player\": {\"x\": \"twenty\"}}")?;

    let controller = GameController::with_dice(
        config(),
        GameRules::default(),
        Arc::new(JsonFileStore::new(&path)),
        Box::new(ScriptedDice::never()),
    )?;
    let state = controller.snapshot();
    assert_eq!(state.day, 1);
    assert_eq!(state.player.position, Position::new(20, 20));
    assert_eq!(state.world.width(), 40);
    Ok(())
}

#[test]
fn test_save_for_a_different_farm_size_is_ignored() -> TitheResult<()> {
    let dir = TempDir::new()?;
    let store = JsonFileStore::new(dir.path().join("tithe.json"));
    save_game(&store, &mut fresh_state())?;

    let small = GenerationConfig {
        width: 20,
        height: 20,
        spawn: Position::new(10, 10),
        barn_origin: Position::new(3, 3),
        pond: tithe::TileRect::new(Position::new(14, 14), 3, 3),
        ..config()
    };
    assert!(load_game(&store, &small, GameRules::default()).is_none());
    Ok(())
}

#[test]
fn test_reset_removes_the_save_file() -> TitheResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("tithe.json");
    let store = Arc::new(JsonFileStore::new(&path));
    let controller = GameController::with_dice(
        config(),
        GameRules::default(),
        store.clone(),
        Box::new(ScriptedDice::never()),
    )?;
    controller.advance_day();
    controller.save_now()?;
    assert!(store.load_raw()?.is_some());

    controller.reset_game()?;
    assert!(!path.exists());
    assert_eq!(controller.snapshot().day, 1);
    Ok(())
}

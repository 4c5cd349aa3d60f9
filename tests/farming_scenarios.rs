//! End-to-end farming scenarios on the standard farm layout.

use tithe::{
    ConcreteAction, CropKind, Direction, GameEvent, GameRules, GameState, GameStatus,
    GenerationConfig, Position, ScriptedDice, TileType, Tool,
};

/// A debris-free standard farm with the player at spawn.
fn fresh_game() -> GameState {
    GameState::new_game(
        &GenerationConfig::clear_field(1),
        GameRules::default(),
        &mut ScriptedDice::never(),
    )
    .unwrap()
}

fn run(state: &mut GameState, dice: &mut ScriptedDice, actions: &[ConcreteAction]) -> Vec<GameEvent> {
    actions
        .iter()
        .flat_map(|action| state.execute(action, &mut *dice))
        .collect()
}

fn walk(state: &mut GameState, direction: Direction, steps: usize) {
    let actions = vec![ConcreteAction::step(direction); steps];
    run(state, &mut ScriptedDice::never(), &actions);
}

#[test]
fn test_till_and_plant_at_spawn() {
    let mut state = fresh_game();
    let inventory_before = state.inventory.clone();
    let mut dice = ScriptedDice::never();

    run(&mut state, &mut dice, &[ConcreteAction::AcquireTool(Tool::Hoe)]);
    let inventory_with_hoe = state.inventory.clone();
    run(&mut state, &mut dice, &[ConcreteAction::Interact]);

    let tile = state.current_tile().unwrap();
    assert_eq!(tile.terrain, TileType::Dirt);
    assert!(!tile.collidable);
    assert_eq!(state.inventory, inventory_with_hoe);
    assert_eq!(state.inventory.seeds, inventory_before.seeds);

    run(&mut state, &mut dice, &[ConcreteAction::Plant]);
    let crop = state.current_tile().unwrap().crop.unwrap();
    assert_eq!(crop.kind, CropKind::Wheat);
    assert_eq!(crop.growth_stage, 0);
    assert_eq!(state.inventory.seeds.wheat, 19);
    assert_eq!(state.inventory.seeds.corn, 20);
}

#[test]
fn test_can_fills_beside_the_pond_without_watering() {
    let mut state = fresh_game();
    // Stand at (30, 32), just west of the pond, on tilled soil.
    walk(&mut state, Direction::Right, 10);
    walk(&mut state, Direction::Down, 12);
    assert_eq!(state.player.position, Position::new(30, 32));
    state.world.set_terrain(Position::new(30, 32), TileType::Dirt);

    let mut dice = ScriptedDice::never();
    run(&mut state, &mut dice, &[ConcreteAction::AcquireTool(Tool::Can)]);
    let grid_before = state.world.clone();
    let events = run(&mut state, &mut dice, &[ConcreteAction::Interact]);

    assert_eq!(events, vec![GameEvent::CanFilled]);
    assert!(state.can_is_full);
    assert_eq!(state.world, grid_before);

    // Two tiles away from the water the full can waters soil instead.
    walk(&mut state, Direction::Left, 2);
    state.world.set_terrain(Position::new(28, 32), TileType::Dirt);
    run(&mut state, &mut dice, &[ConcreteAction::Interact]);
    assert!(state.current_tile().unwrap().watered);
    assert!(!state.can_is_full);
}

#[test]
fn test_walking_into_the_pond_only_turns() {
    let mut state = fresh_game();
    walk(&mut state, Direction::Right, 10);
    walk(&mut state, Direction::Down, 12);
    walk(&mut state, Direction::Right, 1);
    assert_eq!(state.player.position, Position::new(30, 32));
    assert_eq!(state.player.facing, Direction::Right);
}

#[test]
fn test_one_crop_from_seed_to_harvest() {
    let mut state = fresh_game();
    let mut dice = ScriptedDice::always();

    run(
        &mut state,
        &mut dice,
        &[
            ConcreteAction::AcquireTool(Tool::Hoe),
            ConcreteAction::Interact,
            ConcreteAction::SelectSeed(CropKind::Corn),
            ConcreteAction::Plant,
        ],
    );
    for day in 2..=4 {
        let events = state.advance_day(&mut dice);
        assert!(events.contains(&GameEvent::DayAdvanced { day }));
    }
    assert!(state.current_tile().unwrap().crop.unwrap().is_harvestable());

    let events = run(
        &mut state,
        &mut dice,
        &[
            ConcreteAction::AcquireTool(Tool::Scythe),
            ConcreteAction::Interact,
        ],
    );
    assert!(events.contains(&GameEvent::CropHarvested {
        position: Position::new(20, 20),
        kind: CropKind::Corn,
        seed_returned: true,
    }));
    assert!(state.current_tile().unwrap().crop.is_none());
    assert_eq!(state.current_tile().unwrap().terrain, TileType::Dirt);
    assert_eq!(state.harvested_total, 1);
    assert_eq!(state.inventory.crops.corn, 1);
    // 20 - 1 planted + 1 returned
    assert_eq!(state.inventory.seeds.corn, 20);
}

#[test]
fn test_scythe_on_unripe_crop_does_nothing() {
    let mut state = fresh_game();
    let mut dice = ScriptedDice::always();
    run(
        &mut state,
        &mut dice,
        &[
            ConcreteAction::AcquireTool(Tool::Hoe),
            ConcreteAction::Interact,
            ConcreteAction::Plant,
            ConcreteAction::AcquireTool(Tool::Scythe),
        ],
    );
    let before = state.clone();
    let events = run(&mut state, &mut dice, &[ConcreteAction::Interact]);
    assert!(events.is_empty());
    assert_eq!(state, before);
}

#[test]
fn test_clearing_debris() {
    let mut state = fresh_game();
    state.world.set_terrain(Position::new(20, 21), TileType::Rock);
    state.world.set_terrain(Position::new(21, 20), TileType::Stump);
    let mut dice = ScriptedDice::never();

    // The scythe cannot break rock.
    run(&mut state, &mut dice, &[ConcreteAction::AcquireTool(Tool::Scythe), ConcreteAction::Interact]);
    assert_eq!(state.faced_tile().unwrap().terrain, TileType::Rock);

    run(&mut state, &mut dice, &[ConcreteAction::AcquireTool(Tool::Hoe)]);
    // The hoe tills the grass underfoot before it looks at the rock.
    run(&mut state, &mut dice, &[ConcreteAction::Interact]);
    assert_eq!(state.current_tile().unwrap().terrain, TileType::Dirt);
    run(&mut state, &mut dice, &[ConcreteAction::Interact]);
    let rock = state.faced_tile().unwrap();
    assert_eq!(rock.terrain, TileType::Grass);
    assert!(!rock.collidable);

    run(
        &mut state,
        &mut dice,
        &[
            ConcreteAction::step(Direction::Right),
            ConcreteAction::SelectTool(Tool::Scythe),
            ConcreteAction::Interact,
        ],
    );
    assert_eq!(state.player.position, Position::new(20, 20));
    assert_eq!(state.faced_tile().unwrap().terrain, TileType::Grass);
    run(&mut state, &mut dice, &[ConcreteAction::step(Direction::Right)]);
    assert_eq!(state.player.position, Position::new(21, 20));
}

#[test]
fn test_sleeping_at_the_barn_door() {
    let mut state = fresh_game();
    walk(&mut state, Direction::Left, 11);
    walk(&mut state, Direction::Up, 13);
    assert_eq!(state.player.position, Position::new(9, 7));
    assert!(state.is_at_barn_door());

    let events = run(&mut state, &mut ScriptedDice::never(), &[ConcreteAction::Interact]);
    assert!(events.contains(&GameEvent::DayAdvanced { day: 2 }));
    assert_eq!(state.day, 2);
}

#[test]
fn test_last_night_before_the_deadline() {
    let mut state = fresh_game();
    state.day = state.rules.max_days - 1;
    state.harvested_total = 10;
    state.advance_day(&mut ScriptedDice::never());
    assert_eq!(state.day, state.rules.max_days);
    assert_eq!(state.game_status, GameStatus::Playing);

    let events = state.advance_day(&mut ScriptedDice::never());
    assert_eq!(state.game_status, GameStatus::Lost);
    assert!(events.contains(&GameEvent::GameEnded {
        status: GameStatus::Lost
    }));

    // Terminal: nothing moves any more.
    let before = state.clone();
    run(
        &mut state,
        &mut ScriptedDice::always(),
        &[
            ConcreteAction::step(Direction::Up),
            ConcreteAction::Interact,
            ConcreteAction::Plant,
            ConcreteAction::AdvanceDay,
        ],
    );
    assert_eq!(state, before);
}

#[test]
fn test_meeting_the_quota_wins() {
    let mut state = fresh_game();
    state.day = state.rules.max_days;
    state.harvested_total = state.rules.quota_target;
    state.advance_day(&mut ScriptedDice::never());
    assert_eq!(state.game_status, GameStatus::Won);
}

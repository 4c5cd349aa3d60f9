//! # Game Controller
//!
//! Owns the running game behind a single mutex. Player commands, the
//! passive growth ticker and auto-save all go through it, so every
//! transition sees and leaves a consistent state.
//!
//! The two background jobs are tokio tasks spawned by
//! [`GameController::start_background`]; they read the current state each
//! time they fire.

use crate::config::{AUTO_SAVE_INTERVAL_MS, GROWTH_TICK_INTERVAL_MS};
use crate::game::{
    ConcreteAction, CropKind, Direction, GameEvent, GameRules, GameState, GameStatus, MoveAction,
    Tool,
};
use crate::generation::{create_rng, GenerationConfig};
use crate::persistence::{encode_snapshot, load_game, SnapshotStore};
use crate::utils::{now_millis, Dice};
use crate::{TitheError, TitheResult};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Timer periods for the background jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub growth_tick: Duration,
    pub auto_save: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            growth_tick: Duration::from_millis(GROWTH_TICK_INTERVAL_MS),
            auto_save: Duration::from_millis(AUTO_SAVE_INTERVAL_MS),
        }
    }
}

struct Shared {
    state: Mutex<GameState>,
    dice: Mutex<Box<dyn Dice + Send>>,
    store: Arc<dyn SnapshotStore>,
    config: GenerationConfig,
    rules: GameRules,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, GameState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn dice(&self) -> MutexGuard<'_, Box<dyn Dice + Send>> {
        self.dice.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs one growth tick. Returns false once the game has left PLAYING.
    fn growth_tick(&self) -> bool {
        let mut state = self.state();
        if !state.is_playing() {
            return false;
        }
        let mut dice = self.dice();
        state.passive_growth_tick(&mut **dice);
        true
    }

    /// Encodes the current state under the lock. The write happens later,
    /// with the lock released.
    fn pending_save(&self, only_while_playing: bool) -> TitheResult<Option<PendingSave>> {
        let state = self.state();
        if only_while_playing && !state.is_playing() {
            return Ok(None);
        }
        let saved_at = now_millis();
        Ok(Some(PendingSave {
            json: encode_snapshot(&state, saved_at)?,
            saved_at,
            day: state.day,
        }))
    }

    fn mark_saved(&self, save: &PendingSave) {
        self.state().last_saved = save.saved_at;
        debug!("Saved game on day {}", save.day);
    }
}

/// An encoded snapshot waiting to be written.
struct PendingSave {
    json: String,
    saved_at: u64,
    day: u32,
}

/// Background task bookkeeping.
#[derive(Default)]
struct Tasks {
    runtime: Option<Handle>,
    growth: Option<JoinHandle<()>>,
    auto_save: Option<JoinHandle<()>>,
}

/// The single point through which the game state changes.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tithe::{Direction, GameController, GameRules, GenerationConfig, MemoryStore};
///
/// let controller = GameController::new(
///     GenerationConfig::default(),
///     GameRules::default(),
///     Arc::new(MemoryStore::new()),
/// )
/// .unwrap();
/// controller.move_player(0, -1, Direction::Up);
/// assert_eq!(controller.snapshot().player.facing, Direction::Up);
/// ```
pub struct GameController {
    shared: Arc<Shared>,
    schedule: Schedule,
    tasks: Mutex<Tasks>,
}

impl GameController {
    /// Resumes the saved game or starts a new one, rolling with a generator
    /// seeded from `config.seed`.
    pub fn new(
        config: GenerationConfig,
        rules: GameRules,
        store: Arc<dyn SnapshotStore>,
    ) -> TitheResult<Self> {
        let rng = create_rng(&config);
        Self::with_dice(config, rules, store, Box::new(rng))
    }

    /// Like [`GameController::new`] with an explicit random source.
    pub fn with_dice(
        config: GenerationConfig,
        rules: GameRules,
        store: Arc<dyn SnapshotStore>,
        mut dice: Box<dyn Dice + Send>,
    ) -> TitheResult<Self> {
        let state = match load_game(store.as_ref(), &config, rules) {
            Some(state) => state,
            None => {
                info!("No usable save, starting a new game");
                GameState::new_game(&config, rules, &mut *dice)?
            }
        };

        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                dice: Mutex::new(dice),
                store,
                config,
                rules,
            }),
            schedule: Schedule::default(),
            tasks: Mutex::new(Tasks::default()),
        })
    }

    /// Overrides the background timer periods. Takes effect on the next
    /// [`GameController::start_background`].
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Spawns the growth ticker and auto-save on the current tokio runtime.
    ///
    /// Fails outside a runtime context. Calling it again replaces the
    /// running tasks.
    pub fn start_background(&self) -> TitheResult<()> {
        let runtime = Handle::try_current()
            .map_err(|e| TitheError::InvalidState(format!("no tokio runtime: {}", e)))?;
        let mut tasks = self.tasks();
        tasks.abort_all();
        tasks.auto_save = Some(runtime.spawn(run_auto_save(
            Arc::clone(&self.shared),
            self.schedule.auto_save,
        )));
        tasks.growth = Some(runtime.spawn(run_growth_ticker(
            Arc::clone(&self.shared),
            self.schedule.growth_tick,
        )));
        tasks.runtime = Some(runtime);
        debug!("Background tasks started with {:?}", self.schedule);
        Ok(())
    }

    /// Whether the growth ticker task is alive.
    pub fn is_growth_ticker_running(&self) -> bool {
        self.tasks()
            .growth
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Applies one action and returns what happened.
    pub fn perform(&self, action: ConcreteAction) -> Vec<GameEvent> {
        let mut state = self.shared.state();
        let mut dice = self.shared.dice();
        let events = state.execute(&action, &mut **dice);
        for event in &events {
            debug!("{:?}", event);
        }
        events
    }

    pub fn move_player(&self, dx: i32, dy: i32, facing: Direction) -> Vec<GameEvent> {
        self.perform(ConcreteAction::Move(MoveAction::new(dx, dy, facing)))
    }

    pub fn interact(&self) -> Vec<GameEvent> {
        self.perform(ConcreteAction::Interact)
    }

    pub fn plant(&self) -> Vec<GameEvent> {
        self.perform(ConcreteAction::Plant)
    }

    /// Sleeps until the next morning.
    pub fn advance_day(&self) -> Vec<GameEvent> {
        self.perform(ConcreteAction::AdvanceDay)
    }

    pub fn select_seed(&self, kind: CropKind) -> Vec<GameEvent> {
        self.perform(ConcreteAction::SelectSeed(kind))
    }

    pub fn select_tool(&self, tool: Tool) -> Vec<GameEvent> {
        self.perform(ConcreteAction::SelectTool(tool))
    }

    pub fn acquire_tool(&self, tool: Tool) -> Vec<GameEvent> {
        self.perform(ConcreteAction::AcquireTool(tool))
    }

    /// Throws the current game away and starts over on a new farm.
    ///
    /// The save is cleared first. If generation fails the current game is
    /// kept. The growth ticker is restarted when background tasks are
    /// running.
    pub fn reset_game(&self) -> TitheResult<()> {
        if let Err(e) = self.shared.store.clear() {
            warn!("Failed to clear save data: {}", e);
        }
        let fresh = {
            let mut dice = self.shared.dice();
            GameState::new_game(&self.shared.config, self.shared.rules, &mut **dice)?
        };
        *self.shared.state() = fresh;
        info!("Game reset");

        let mut tasks = self.tasks();
        if let Some(runtime) = tasks.runtime.clone() {
            if let Some(old) = tasks.growth.take() {
                old.abort();
            }
            tasks.growth = Some(runtime.spawn(run_growth_ticker(
                Arc::clone(&self.shared),
                self.schedule.growth_tick,
            )));
        }
        Ok(())
    }

    /// A copy of the current state for rendering.
    pub fn snapshot(&self) -> GameState {
        self.shared.state().clone()
    }

    pub fn status(&self) -> GameStatus {
        self.shared.state().game_status
    }

    /// See [`GameState::is_at_barn_door`].
    pub fn is_at_barn_door(&self) -> bool {
        self.shared.state().is_at_barn_door()
    }

    /// Saves immediately, whatever the game status.
    ///
    /// The state lock is only held while encoding, not during the write.
    pub fn save_now(&self) -> TitheResult<()> {
        if let Some(save) = self.shared.pending_save(false)? {
            self.shared.store.save(&save.json)?;
            self.shared.mark_saved(&save);
        }
        Ok(())
    }

    /// Stops the background tasks and writes a final save.
    pub fn shutdown(&self) -> TitheResult<()> {
        self.tasks().abort_all();
        self.save_now()?;
        info!("Game saved on exit");
        Ok(())
    }

    #[cfg(test)]
    fn update<R>(&self, f: impl FnOnce(&mut GameState) -> R) -> R {
        f(&mut self.shared.state())
    }

    fn tasks(&self) -> MutexGuard<'_, Tasks> {
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Tasks {
    fn abort_all(&mut self) {
        for handle in [self.growth.take(), self.auto_save.take()].into_iter().flatten() {
            handle.abort();
        }
    }
}

impl Drop for GameController {
    fn drop(&mut self) {
        self.tasks().abort_all();
    }
}

async fn run_growth_ticker(shared: Arc<Shared>, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        if !shared.growth_tick() {
            debug!("Growth ticker stopped: game is over");
            break;
        }
    }
}

async fn run_auto_save(shared: Arc<Shared>, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let save = match shared.pending_save(true) {
            Ok(Some(save)) => save,
            Ok(None) => continue,
            Err(e) => {
                warn!("Auto-save failed: {}", e);
                continue;
            }
        };

        let store = Arc::clone(&shared.store);
        let json = save.json.clone();
        match tokio::task::spawn_blocking(move || store.save(&json)).await {
            Ok(Ok(())) => shared.mark_saved(&save),
            Ok(Err(e)) => warn!("Auto-save failed: {}", e),
            Err(e) => warn!("Auto-save task failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Crop, Position, TileType};
    use crate::persistence::MemoryStore;
    use crate::utils::ScriptedDice;

    fn controller_with(store: Arc<MemoryStore>, dice: ScriptedDice) -> GameController {
        GameController::with_dice(
            GenerationConfig::clear_field(7),
            GameRules::default(),
            store,
            Box::new(dice),
        )
        .unwrap()
    }

    fn plant_at_spawn(controller: &GameController) {
        controller.update(|state| {
            let pos = state.player.position;
            let tile = state.world.get_tile_mut(pos).unwrap();
            tile.set_terrain(TileType::Dirt);
            tile.crop = Some(Crop::new(CropKind::Wheat, 0));
        });
    }

    fn spawn_stage(controller: &GameController) -> Option<u8> {
        let state = controller.snapshot();
        state
            .current_tile()
            .and_then(|tile| tile.crop)
            .map(|crop| crop.growth_stage)
    }

    #[test]
    fn test_new_game_when_store_empty() {
        let store = Arc::new(MemoryStore::new());
        let controller = controller_with(store.clone(), ScriptedDice::never());
        let state = controller.snapshot();
        assert_eq!(state.day, 1);
        assert_eq!(state.player.position, Position::new(20, 20));
        assert_eq!(store.contents(), None);
    }

    #[test]
    fn test_resumes_saved_game() {
        let store = Arc::new(MemoryStore::new());
        let first = controller_with(store.clone(), ScriptedDice::never());
        first.acquire_tool(Tool::Hoe);
        first.move_player(1, 0, Direction::Right);
        first.save_now().unwrap();

        let second = controller_with(store, ScriptedDice::never());
        let state = second.snapshot();
        assert_eq!(state.player.position, Position::new(21, 20));
        assert_eq!(state.selected_tool, Tool::Hoe);
        assert!(state.inventory.owns(Tool::Hoe));
    }

    #[test]
    fn test_actions_route_through_rules() {
        let controller = controller_with(Arc::new(MemoryStore::new()), ScriptedDice::never());
        controller.acquire_tool(Tool::Hoe);
        let events = controller.interact();
        assert_eq!(events.len(), 1);
        assert_eq!(
            controller.snapshot().current_tile().unwrap().terrain,
            TileType::Dirt
        );

        controller.select_seed(CropKind::Corn);
        controller.plant();
        let state = controller.snapshot();
        assert_eq!(state.current_tile().unwrap().crop.unwrap().kind, CropKind::Corn);
        assert_eq!(state.inventory.seeds.corn, 19);

        controller.advance_day();
        assert_eq!(controller.snapshot().day, 2);
    }

    #[test]
    fn test_reset_clears_save_and_restarts() {
        let store = Arc::new(MemoryStore::new());
        let controller = controller_with(store.clone(), ScriptedDice::never());
        controller.advance_day();
        controller.save_now().unwrap();
        assert!(store.contents().is_some());

        controller.reset_game().unwrap();
        assert_eq!(store.contents(), None);
        let state = controller.snapshot();
        assert_eq!(state.day, 1);
        assert_eq!(state.game_status, GameStatus::Playing);
        assert!(state.inventory.tools.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_growth_ticker_grows_crops() {
        let controller = controller_with(Arc::new(MemoryStore::new()), ScriptedDice::always());
        plant_at_spawn(&controller);
        controller.start_background().unwrap();

        tokio::time::sleep(Duration::from_millis(GROWTH_TICK_INTERVAL_MS - 100)).await;
        assert_eq!(spawn_stage(&controller), Some(0));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(spawn_stage(&controller), Some(1));

        tokio::time::sleep(Duration::from_millis(GROWTH_TICK_INTERVAL_MS * 5)).await;
        assert_eq!(spawn_stage(&controller), Some(3));
        assert!(controller.is_growth_ticker_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_growth_ticker_stops_when_game_ends_and_restarts_on_reset() {
        let controller = controller_with(Arc::new(MemoryStore::new()), ScriptedDice::never());
        controller.start_background().unwrap();
        controller.update(|state| state.game_status = GameStatus::Lost);

        tokio::time::sleep(Duration::from_millis(GROWTH_TICK_INTERVAL_MS + 100)).await;
        assert!(!controller.is_growth_ticker_running());

        controller.reset_game().unwrap();
        assert!(controller.is_growth_ticker_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_save_only_while_playing() {
        let store = Arc::new(MemoryStore::new());
        let controller = controller_with(store.clone(), ScriptedDice::never());
        controller.start_background().unwrap();

        tokio::time::sleep(Duration::from_millis(AUTO_SAVE_INTERVAL_MS + 100)).await;
        let saved = store.contents().unwrap();
        assert!(saved.contains("\"day\": 1"));
        assert!(controller.snapshot().last_saved > 0);

        controller.update(|state| {
            state.day = 8;
            state.game_status = GameStatus::Won;
        });
        tokio::time::sleep(Duration::from_millis(AUTO_SAVE_INTERVAL_MS)).await;
        assert_eq!(store.contents().unwrap(), saved);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_saves_and_stops_tasks() {
        let store = Arc::new(MemoryStore::new());
        let controller = controller_with(store.clone(), ScriptedDice::never());
        controller.start_background().unwrap();
        controller.shutdown().unwrap();
        assert!(store.contents().is_some());
        assert!(!controller.is_growth_ticker_running());
    }

    /// A store whose writes take a while.
    struct SlowStore {
        inner: MemoryStore,
        delay: Duration,
    }

    impl SnapshotStore for SlowStore {
        fn load_raw(&self) -> TitheResult<Option<String>> {
            self.inner.load_raw()
        }

        fn save(&self, json: &str) -> TitheResult<()> {
            std::thread::sleep(self.delay);
            self.inner.save(json)
        }

        fn clear(&self) -> TitheResult<()> {
            self.inner.clear()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_slow_auto_save_does_not_block_actions() {
        let store = Arc::new(SlowStore {
            inner: MemoryStore::new(),
            delay: Duration::from_millis(400),
        });
        let controller = GameController::with_dice(
            GenerationConfig::clear_field(7),
            GameRules::default(),
            store.clone(),
            Box::new(ScriptedDice::never()),
        )
        .unwrap()
        .with_schedule(Schedule {
            growth_tick: Duration::from_secs(60),
            auto_save: Duration::from_millis(20),
        });
        controller.start_background().unwrap();

        // Let the first write start.
        tokio::time::sleep(Duration::from_millis(80)).await;
        let started = std::time::Instant::now();
        controller.move_player(1, 0, Direction::Right);
        assert!(started.elapsed() < Duration::from_millis(200));
        assert_eq!(controller.snapshot().player.position, Position::new(21, 20));

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(store.inner.contents().is_some());
        assert!(controller.snapshot().last_saved > 0);
        controller.shutdown().unwrap();
    }

    #[test]
    fn test_start_background_needs_runtime() {
        let controller = controller_with(Arc::new(MemoryStore::new()), ScriptedDice::never());
        assert!(controller.start_background().is_err());
        assert!(!controller.is_growth_ticker_running());
    }

    #[test]
    fn test_failed_save_is_reported_not_fatal() {
        let controller = controller_with(Arc::new(MemoryStore::failing()), ScriptedDice::never());
        assert!(controller.save_now().is_err());
        controller.move_player(0, 1, Direction::Down);
        assert_eq!(controller.snapshot().player.position, Position::new(20, 21));
    }
}

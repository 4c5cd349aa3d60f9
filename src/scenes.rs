//! # Scene Management System
//!
//! Decides which view is active (farm, shed, seed bag, help, season over)
//! and routes each input either to a menu or to the controller.
//!
//! Input handling is separate from drawing so transitions can be driven
//! without a window.

use crate::controller::GameController;
use crate::game::{ConcreteAction, GameEvent, GameState};
use crate::input::{seed_for_slot, tool_for_slot, InputHandler, PlayerInput};
use crate::rendering::{
    draw_panel, game_over_lines, help_lines, seed_menu_lines, shed_menu_lines, MacroquadDisplay,
};
use crate::TitheResult;
use log::{info, warn};
use macroquad::prelude::*;

/// Represents the current scene in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneType {
    /// Normal gameplay
    Playing,
    /// Barn menu: take tools or sleep
    Shed,
    /// Seed selection
    Seeds,
    /// Controls reference
    Help,
    /// Season decided; restart or quit
    GameOver,
}

/// What the main loop should do after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The main scene manager that coordinates all game scenes
pub struct SceneManager {
    current_scene: SceneType,
    controller: GameController,
    display: MacroquadDisplay,
    input_handler: InputHandler,
}

impl SceneManager {
    pub fn new(controller: GameController) -> Self {
        let mut display = MacroquadDisplay::new();
        let state = controller.snapshot();
        display.add_message(format!(
            "Day {} of {}. Harvest {} crops before the tithe is due.",
            state.day, state.rules.max_days, state.rules.quota_target
        ));
        display.add_message("Visit the barn to take your tools. H for help.".to_string());

        let current_scene = if state.game_status.is_terminal() {
            SceneType::GameOver
        } else {
            SceneType::Playing
        };
        Self {
            current_scene,
            controller,
            display,
            input_handler: InputHandler::new(),
        }
    }

    pub fn scene(&self) -> SceneType {
        self.current_scene
    }

    pub fn controller(&self) -> &GameController {
        &self.controller
    }

    /// Runs the main scene loop until the player quits, then saves.
    pub async fn run(&mut self) -> TitheResult<()> {
        loop {
            if let Some(input) = self.input_handler.get_input() {
                if self.handle_input(input) == Flow::Exit {
                    break;
                }
            }
            self.sync_with_status();
            self.render();
            next_frame().await;
        }

        info!("Player quit the game");
        self.controller.shutdown()
    }

    /// Applies one input to the active scene.
    pub fn handle_input(&mut self, input: PlayerInput) -> Flow {
        if input == PlayerInput::Quit {
            return Flow::Exit;
        }

        match self.current_scene {
            SceneType::Playing => self.update_playing_scene(input),
            SceneType::Shed => self.update_shed_scene(input),
            SceneType::Seeds => self.update_seed_scene(input),
            SceneType::Help => {
                if matches!(input, PlayerInput::Help | PlayerInput::Cancel) {
                    self.current_scene = SceneType::Playing;
                }
            }
            SceneType::GameOver => {
                if input == PlayerInput::NewGame {
                    self.start_new_game();
                }
            }
        }
        self.sync_with_status();
        Flow::Continue
    }

    fn update_playing_scene(&mut self, input: PlayerInput) {
        match input {
            PlayerInput::Help => self.current_scene = SceneType::Help,
            PlayerInput::Seeds => self.current_scene = SceneType::Seeds,
            PlayerInput::Interact if self.controller.is_at_barn_door() => {
                self.current_scene = SceneType::Shed;
            }
            _ => {
                let state = self.controller.snapshot();
                if let Some(action) = self.input_handler.input_to_action(input, &state) {
                    let events = self.controller.perform(action);
                    self.report(&events);
                }
            }
        }
    }

    fn update_shed_scene(&mut self, input: PlayerInput) {
        match input {
            PlayerInput::MenuChoice(slot) => {
                if let Some(tool) = tool_for_slot(slot) {
                    let events = self.controller.acquire_tool(tool);
                    self.report(&events);
                }
            }
            PlayerInput::Interact => {
                let events = self.controller.perform(ConcreteAction::AdvanceDay);
                self.report(&events);
                self.current_scene = SceneType::Playing;
            }
            PlayerInput::Cancel => self.current_scene = SceneType::Playing,
            _ => {}
        }
    }

    fn update_seed_scene(&mut self, input: PlayerInput) {
        match input {
            PlayerInput::MenuChoice(slot) => {
                if let Some(kind) = seed_for_slot(slot) {
                    self.controller.select_seed(kind);
                    self.current_scene = SceneType::Playing;
                }
            }
            PlayerInput::Seeds | PlayerInput::Cancel => self.current_scene = SceneType::Playing,
            _ => {}
        }
    }

    /// Moves to the end screen once the season is decided.
    fn sync_with_status(&mut self) {
        if self.controller.status().is_terminal() {
            self.current_scene = SceneType::GameOver;
        }
    }

    fn start_new_game(&mut self) {
        match self.controller.reset_game() {
            Ok(()) => {
                self.current_scene = SceneType::Playing;
                self.display.messages.clear();
                self.display.add_message("A new season begins.".to_string());
            }
            Err(e) => warn!("Could not start a new game: {}", e),
        }
    }

    fn report(&mut self, events: &[GameEvent]) {
        for message in events.iter().filter_map(GameEvent::message) {
            self.display.add_message(message);
        }
    }

    fn render(&self) {
        let state: GameState = self.controller.snapshot();
        self.display.render_game(&state);
        match self.current_scene {
            SceneType::Playing => {}
            SceneType::Shed => draw_panel("Tool Shed", &shed_menu_lines(&state)),
            SceneType::Seeds => draw_panel("Seed Bag", &seed_menu_lines(&state)),
            SceneType::Help => draw_panel("How to Farm", &help_lines()),
            SceneType::GameOver => draw_panel("The Season Is Over", &game_over_lines(&state)),
        }
    }
}

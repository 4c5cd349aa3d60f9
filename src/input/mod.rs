//! # Input Module
//!
//! Turns keyboard state into player commands.
//!
//! Movement keys repeat while held: the first press moves at once, then
//! one more step fires every [`MOVE_REPEAT_MS`](crate::config::MOVE_REPEAT_MS)
//! for as long as the key stays down. All other keys fire once per press.

use crate::config::MOVE_REPEAT_MS;
use crate::game::{ConcreteAction, CropKind, Direction, GameState, Tool};
use macroquad::prelude::*;

/// Player input types that can be processed by the input handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// Step (or turn) in a direction
    Move(Direction),
    /// Use the equipped tool, or open the shed when facing the barn
    Interact,
    /// Plant the selected seed
    Plant,
    /// Open or close the seed menu
    Seeds,
    /// Pick a numbered menu entry (1-based)
    MenuChoice(u8),
    /// Show the help screen
    Help,
    /// Close the current menu
    Cancel,
    /// Start over once the season has ended
    NewGame,
    /// Save and leave
    Quit,
}

/// Held-key repeat timer for movement.
///
/// Kept free of macroquad so it can be driven by plain timestamps.
#[derive(Debug, Clone, Default)]
pub struct MoveRepeat {
    held: Option<Direction>,
    last_fired_ms: f64,
}

impl MoveRepeat {
    /// Feeds the currently held direction at time `now_ms`; returns the
    /// direction to step in this frame, if any.
    pub fn poll(&mut self, held: Option<Direction>, now_ms: f64) -> Option<Direction> {
        let Some(direction) = held else {
            self.held = None;
            return None;
        };

        let fresh_press = self.held != Some(direction);
        if fresh_press || now_ms - self.last_fired_ms >= MOVE_REPEAT_MS as f64 {
            self.held = Some(direction);
            self.last_fired_ms = now_ms;
            return Some(direction);
        }
        None
    }
}

/// Input handler for processing player commands.
#[derive(Debug, Default)]
pub struct InputHandler {
    repeat: MoveRepeat,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads this frame's keyboard state.
    ///
    /// Returns the corresponding player input, or None if nothing fired.
    pub fn get_input(&mut self) -> Option<PlayerInput> {
        let now_ms = get_time() * 1000.0;
        if let Some(direction) = self.repeat.poll(held_direction(), now_ms) {
            return Some(PlayerInput::Move(direction));
        }

        let pressed = [
            (KeyCode::E, PlayerInput::Interact),
            (KeyCode::Space, PlayerInput::Interact),
            (KeyCode::F, PlayerInput::Plant),
            (KeyCode::I, PlayerInput::Seeds),
            (KeyCode::Key1, PlayerInput::MenuChoice(1)),
            (KeyCode::Key2, PlayerInput::MenuChoice(2)),
            (KeyCode::Key3, PlayerInput::MenuChoice(3)),
            (KeyCode::H, PlayerInput::Help),
            (KeyCode::F1, PlayerInput::Help),
            (KeyCode::Escape, PlayerInput::Cancel),
            (KeyCode::N, PlayerInput::NewGame),
            (KeyCode::Q, PlayerInput::Quit),
        ];
        pressed
            .into_iter()
            .find(|(key, _)| is_key_pressed(*key))
            .map(|(_, input)| input)
    }

    /// Converts input to a game action for the plain playing view.
    ///
    /// Menu navigation and quitting are handled by the scenes and map to
    /// `None` here. Number keys pick tools from the tool bar.
    pub fn input_to_action(&self, input: PlayerInput, state: &GameState) -> Option<ConcreteAction> {
        match input {
            PlayerInput::Move(direction) => Some(ConcreteAction::step(direction)),
            PlayerInput::Interact => Some(ConcreteAction::Interact),
            PlayerInput::Plant => Some(ConcreteAction::Plant),
            PlayerInput::MenuChoice(n) => {
                let tool = tool_for_slot(n)?;
                // Pressing the slot of the equipped tool puts it away.
                if state.selected_tool == tool {
                    Some(ConcreteAction::SelectTool(Tool::None))
                } else {
                    Some(ConcreteAction::SelectTool(tool))
                }
            }
            _ => None,
        }
    }
}

/// Tool bar slot (1-based) to tool.
pub fn tool_for_slot(slot: u8) -> Option<Tool> {
    Tool::all().get(usize::from(slot).checked_sub(1)?).copied()
}

/// Seed menu entry (1-based) to crop kind.
pub fn seed_for_slot(slot: u8) -> Option<CropKind> {
    CropKind::all().get(usize::from(slot).checked_sub(1)?).copied()
}

fn held_direction() -> Option<Direction> {
    let bindings = [
        (KeyCode::W, KeyCode::Up, Direction::Up),
        (KeyCode::S, KeyCode::Down, Direction::Down),
        (KeyCode::A, KeyCode::Left, Direction::Left),
        (KeyCode::D, KeyCode::Right, Direction::Right),
    ];
    bindings
        .into_iter()
        .find(|(letter, arrow, _)| is_key_down(*letter) || is_key_down(*arrow))
        .map(|(_, _, direction)| direction)
}

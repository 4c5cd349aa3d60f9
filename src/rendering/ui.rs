//! # User Interface Elements
//!
//! Modal panels drawn over the farm: the tool shed, the seed bag, help and
//! the end-of-season screen.
//!
//! Panel contents are built as plain [`MenuLine`]s from the state so the
//! wording can be tested without a window.

use crate::game::{CropKind, GameState, GameStatus, Tool};
use macroquad::prelude::*;

/// One line of a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuLine {
    pub text: String,
    /// Greyed out when false
    pub enabled: bool,
}

impl MenuLine {
    fn new(text: impl Into<String>, enabled: bool) -> Self {
        Self {
            text: text.into(),
            enabled,
        }
    }
}

/// Tool shed contents: tools to take, then sleep.
pub fn shed_menu_lines(state: &GameState) -> Vec<MenuLine> {
    let mut lines: Vec<MenuLine> = Tool::all()
        .into_iter()
        .enumerate()
        .map(|(i, tool)| {
            let owned = state.inventory.owns(tool);
            let text = if owned {
                format!("{}  {} (taken)", i + 1, tool.name())
            } else {
                format!("{}  Take the {}", i + 1, tool.name())
            };
            MenuLine::new(text, !owned)
        })
        .collect();
    lines.push(MenuLine::new(
        format!("E  Sleep until day {}", state.day + 1),
        true,
    ));
    lines.push(MenuLine::new("Esc  Back", true));
    lines
}

/// Seed bag contents.
pub fn seed_menu_lines(state: &GameState) -> Vec<MenuLine> {
    let mut lines: Vec<MenuLine> = CropKind::all()
        .into_iter()
        .enumerate()
        .map(|(i, kind)| {
            let count = state.inventory.seeds.get(kind);
            let marker = if state.selected_seed == kind { ">" } else { " " };
            MenuLine::new(
                format!("{}{} {} seeds: {}", marker, i + 1, kind.name(), count),
                count > 0,
            )
        })
        .collect();
    lines.push(MenuLine::new("Esc  Close", true));
    lines
}

/// Controls reference.
pub fn help_lines() -> Vec<MenuLine> {
    [
        "WASD / arrows  Move (hold to keep walking)",
        "E / Space      Use tool, or open the shed at the barn",
        "F              Plant the selected seed",
        "I              Seed bag",
        "1 2 3          Equip hoe, scythe, can",
        "H              This help",
        "Q              Save and quit",
        "",
        "Hoe tills grass and breaks rocks. Scythe cuts ripe crops",
        "and clears stumps. Fill the can beside the pond, then",
        "water soil. Sleep in the barn to end the day.",
    ]
    .into_iter()
    .map(|text| MenuLine::new(text, true))
    .collect()
}

/// End of season summary.
pub fn game_over_lines(state: &GameState) -> Vec<MenuLine> {
    let verdict = match state.game_status {
        GameStatus::Won => "The tithe is paid. The farm is yours another year.",
        GameStatus::Lost => "The tithe fell short. The farm is forfeit.",
        GameStatus::Playing => "The season continues.",
    };
    vec![
        MenuLine::new(verdict, true),
        MenuLine::new(
            format!(
                "Harvested {} of {} ({} wheat, {} corn)",
                state.harvested_total,
                state.rules.quota_target,
                state.inventory.crops.wheat,
                state.inventory.crops.corn
            ),
            true,
        ),
        MenuLine::new("N  New season", true),
        MenuLine::new("Q  Quit", true),
    ]
}

/// Draws a centred panel with a title and lines.
pub fn draw_panel(title: &str, lines: &[MenuLine]) {
    let line_height = 24.0;
    let width = 560.0_f32.min(screen_width() - 40.0);
    let height = 64.0 + line_height * lines.len() as f32;
    let x = (screen_width() - width) / 2.0;
    let y = (screen_height() - height) / 2.0;

    draw_rectangle(0.0, 0.0, screen_width(), screen_height(), Color::new(0.0, 0.0, 0.0, 0.5));
    draw_rectangle(x, y, width, height, Color::from_rgba(40, 32, 24, 240));
    draw_rectangle_lines(x, y, width, height, 3.0, Color::from_rgba(200, 160, 96, 255));
    draw_text(title, x + 20.0, y + 34.0, 28.0, GOLD);

    for (i, line) in lines.iter().enumerate() {
        let color = if line.enabled { WHITE } else { GRAY };
        draw_text(
            &line.text,
            x + 20.0,
            y + 64.0 + line_height * i as f32,
            20.0,
            color,
        );
    }
}

//! # Display Management
//!
//! Draws the visible part of the farm, the farmer and the HUD.

use crate::config::{VIEWPORT_HEIGHT_TILES, VIEWPORT_WIDTH_TILES};
use crate::game::{GameState, Tool};
use crate::rendering::{crop_color, terrain_color, Viewport};
use macroquad::prelude::*;

/// Height of the HUD strip at the top of the screen, in pixels.
const HUD_HEIGHT: f32 = 56.0;

/// Height of the message strip at the bottom, in pixels.
const MESSAGE_AREA_HEIGHT: f32 = 64.0;

/// Macroquad display manager for the game.
pub struct MacroquadDisplay {
    /// Message history, newest last
    pub messages: Vec<String>,
    /// Maximum number of messages to keep
    pub max_messages: usize,
}

impl Default for MacroquadDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl MacroquadDisplay {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            max_messages: 50,
        }
    }

    /// Tile edge in pixels so the viewport fills the play area.
    fn tile_size(&self) -> f32 {
        let play_height = screen_height() - HUD_HEIGHT - MESSAGE_AREA_HEIGHT;
        (screen_width() / VIEWPORT_WIDTH_TILES as f32)
            .min(play_height / VIEWPORT_HEIGHT_TILES as f32)
            .floor()
    }

    /// Renders the farm, HUD and message log.
    pub fn render_game(&self, state: &GameState) {
        clear_background(Color::from_rgba(24, 20, 16, 255));

        let view = Viewport::around_player(state.player.position, &state.world);
        let tile_size = self.tile_size();
        let offset_x = (screen_width() - tile_size * view.width as f32) / 2.0;
        let offset_y = HUD_HEIGHT;

        for pos in view.positions() {
            let Some(tile) = state.world.get_tile(pos) else {
                continue;
            };
            let Some((col, row)) = view.to_screen(pos) else {
                continue;
            };
            let x = offset_x + col as f32 * tile_size;
            let y = offset_y + row as f32 * tile_size;

            draw_rectangle(x, y, tile_size, tile_size, terrain_color(tile));
            if let Some(crop) = tile.crop {
                // Crops grow visibly with each stage.
                let scale = 0.3 + 0.2 * f32::from(crop.growth_stage);
                let size = tile_size * scale;
                let inset = (tile_size - size) / 2.0;
                draw_rectangle(
                    x + inset,
                    y + inset,
                    size,
                    size,
                    crop_color(crop.kind, crop.is_harvestable()),
                );
            }
        }

        if let Some((col, row)) = view.to_screen(state.player.position) {
            let x = offset_x + col as f32 * tile_size;
            let y = offset_y + row as f32 * tile_size;
            self.render_player(state, x, y, tile_size);
        }

        self.render_hud(state);
        self.render_messages();
    }

    fn render_player(&self, state: &GameState, x: f32, y: f32, tile_size: f32) {
        let center = vec2(x + tile_size / 2.0, y + tile_size / 2.0);
        draw_circle(center.x, center.y, tile_size * 0.35, Color::from_rgba(250, 226, 180, 255));

        let facing = state.player.facing.to_delta();
        let nose = center + vec2(facing.x as f32, facing.y as f32) * tile_size * 0.3;
        draw_circle(nose.x, nose.y, tile_size * 0.1, DARKBROWN);

        // Faced tile outline, so the target of E is always visible.
        let faced = state.player.faced_position() - state.player.position;
        draw_rectangle_lines(
            x + faced.x as f32 * tile_size,
            y + faced.y as f32 * tile_size,
            tile_size,
            tile_size,
            2.0,
            Color::new(1.0, 1.0, 1.0, 0.5),
        );
    }

    fn render_hud(&self, state: &GameState) {
        draw_rectangle(0.0, 0.0, screen_width(), HUD_HEIGHT, Color::new(0.0, 0.0, 0.0, 0.85));

        let summary = format!(
            "Day {}/{}    Harvest {}/{}    Wheat seeds {}  Corn seeds {}    Planting {}",
            state.day,
            state.rules.max_days,
            state.harvested_total,
            state.rules.quota_target,
            state.inventory.seeds.wheat,
            state.inventory.seeds.corn,
            state.selected_seed.name(),
        );
        draw_text(&summary, 12.0, 22.0, 20.0, WHITE);

        let mut x = 12.0;
        for (slot, tool) in Tool::all().into_iter().enumerate() {
            let owned = state.inventory.owns(tool);
            let selected = state.equipped_tool() == tool;
            let mut label = format!("{}:{}", slot + 1, tool.name());
            if tool == Tool::Can {
                label.push_str(if state.can_is_full { " (full)" } else { " (empty)" });
            }
            let color = match (owned, selected) {
                (true, true) => YELLOW,
                (true, false) => WHITE,
                (false, _) => DARKGRAY,
            };
            draw_text(&label, x, 46.0, 18.0, color);
            x += measure_text(&label, None, 18, 1.0).width + 24.0;
        }

        if state.is_at_barn_door() {
            draw_text("E: enter the shed", x + 12.0, 46.0, 18.0, SKYBLUE);
        }
    }

    fn render_messages(&self) {
        let top = screen_height() - MESSAGE_AREA_HEIGHT;
        draw_rectangle(0.0, top, screen_width(), MESSAGE_AREA_HEIGHT, Color::new(0.0, 0.0, 0.0, 0.8));
        for (i, message) in self.recent_messages(3).iter().enumerate() {
            draw_text(message, 12.0, top + 20.0 + i as f32 * 18.0, 16.0, WHITE);
        }
    }

    /// The last `count` messages, oldest first.
    pub fn recent_messages(&self, count: usize) -> &[String] {
        let start = self.messages.len().saturating_sub(count);
        &self.messages[start..]
    }

    /// Adds a message to the message history.
    pub fn add_message(&mut self, message: String) {
        self.messages.push(message);

        if self.messages.len() > self.max_messages {
            self.messages.remove(0);
        }
    }
}

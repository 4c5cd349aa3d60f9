//! # Rendering Module
//!
//! Draws the farm with macroquad as flat coloured tiles.
//!
//! The renderer only reads a [`GameState`](crate::GameState) snapshot.
//! Camera placement and tile colours are plain functions so they can be
//! checked without a window.

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::*;

use crate::config::{VIEWPORT_HEIGHT_TILES, VIEWPORT_WIDTH_TILES};
use crate::game::{CropKind, Position, Tile, TileType, World};
use macroquad::color::Color;

/// The window of the farm currently on screen, in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// World position of the top-left visible tile
    pub origin: Position,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    /// Centres a `width` x `height` window on `focus`, clamped so it never
    /// shows past the edge of the world. A world smaller than the window
    /// is pinned to the top-left.
    ///
    /// # Examples
    ///
    /// ```
    /// use tithe::{Position, Viewport, World};
    ///
    /// let world = World::new(40, 40);
    /// let view = Viewport::follow(Position::new(1, 38), &world, 15, 10);
    /// assert_eq!(view.origin, Position::new(0, 30));
    /// ```
    pub fn follow(focus: Position, world: &World, width: i32, height: i32) -> Self {
        let clamp_axis = |focus: i32, span: i32, extent: i32| {
            (focus - span / 2).clamp(0, (extent - span).max(0))
        };
        Self {
            origin: Position::new(
                clamp_axis(focus.x, width, world.width() as i32),
                clamp_axis(focus.y, height, world.height() as i32),
            ),
            width,
            height,
        }
    }

    /// The standard on-screen window around the player.
    pub fn around_player(focus: Position, world: &World) -> Self {
        Self::follow(focus, world, VIEWPORT_WIDTH_TILES, VIEWPORT_HEIGHT_TILES)
    }

    /// Screen cell (column, row) of a world position, if visible.
    pub fn to_screen(&self, pos: Position) -> Option<(i32, i32)> {
        let local = pos - self.origin;
        let visible = (0..self.width).contains(&local.x) && (0..self.height).contains(&local.y);
        visible.then_some((local.x, local.y))
    }

    /// Visible world positions, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |dy| {
            (0..self.width).map(move |dx| Position::new(self.origin.x + dx, self.origin.y + dy))
        })
    }
}

/// Ground colour for a tile.
pub fn terrain_color(tile: &Tile) -> Color {
    match tile.terrain {
        TileType::Grass => Color::from_rgba(92, 160, 72, 255),
        TileType::Dirt if tile.watered => Color::from_rgba(84, 56, 36, 255),
        TileType::Dirt => Color::from_rgba(140, 98, 60, 255),
        TileType::Water => Color::from_rgba(58, 118, 196, 255),
        TileType::BarnTopLeft
        | TileType::BarnTopRight
        | TileType::BarnBottomLeft
        | TileType::BarnBottomRight => Color::from_rgba(164, 48, 40, 255),
        TileType::Fence => Color::from_rgba(120, 92, 60, 255),
        TileType::Rock => Color::from_rgba(128, 128, 132, 255),
        TileType::Stump => Color::from_rgba(96, 70, 40, 255),
    }
}

/// Crop colour; ripe crops are drawn in their harvest colour.
pub fn crop_color(kind: CropKind, ripe: bool) -> Color {
    match (kind, ripe) {
        (_, false) => Color::from_rgba(120, 200, 90, 255),
        (CropKind::Wheat, true) => Color::from_rgba(226, 196, 92, 255),
        (CropKind::Corn, true) => Color::from_rgba(246, 170, 40, 255),
    }
}

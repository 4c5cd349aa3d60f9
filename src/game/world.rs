//! # Farm World
//!
//! The fixed-size tile grid the player works on.
//!
//! A [`World`] never changes size after generation. Tiles mutate in place:
//! terrain changes (tilling, clearing debris), crops come and go, and the
//! watered flag is set by the can and cleared every night.

use crate::config::MAX_GROWTH_STAGE;
use crate::game::Position;
use serde::{Deserialize, Serialize};

/// Terrain of a single tile.
///
/// Serialized names follow the save format (`BARN_TL` etc.); the long
/// quadrant names are accepted on load as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileType {
    Grass,
    Dirt,
    Water,
    #[serde(rename = "BARN_TL", alias = "BARN_TOP_LEFT")]
    BarnTopLeft,
    #[serde(rename = "BARN_TR", alias = "BARN_TOP_RIGHT")]
    BarnTopRight,
    #[serde(rename = "BARN_BL", alias = "BARN_BOTTOM_LEFT")]
    BarnBottomLeft,
    #[serde(rename = "BARN_BR", alias = "BARN_BOTTOM_RIGHT")]
    BarnBottomRight,
    Fence,
    Rock,
    Stump,
}

impl TileType {
    /// Whether freshly placed terrain of this type blocks movement.
    pub fn is_collidable_by_default(self) -> bool {
        !matches!(self, TileType::Grass | TileType::Dirt)
    }

    /// Any of the four barn quadrants.
    pub fn is_barn(self) -> bool {
        matches!(
            self,
            TileType::BarnTopLeft
                | TileType::BarnTopRight
                | TileType::BarnBottomLeft
                | TileType::BarnBottomRight
        )
    }

    /// Rocks and stumps can be cleared back to grass.
    pub fn is_debris(self) -> bool {
        matches!(self, TileType::Rock | TileType::Stump)
    }
}

/// Crop species that can be planted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CropKind {
    #[default]
    Wheat,
    Corn,
}

impl CropKind {
    /// Returns every crop kind.
    pub fn all() -> [CropKind; 2] {
        [CropKind::Wheat, CropKind::Corn]
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            CropKind::Wheat => "Wheat",
            CropKind::Corn => "Corn",
        }
    }
}

/// A planted crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    #[serde(rename = "type")]
    pub kind: CropKind,
    /// 0 is a fresh seed, [`MAX_GROWTH_STAGE`] is ready to harvest
    pub growth_stage: u8,
    /// Milliseconds since the Unix epoch; informational only
    #[serde(default)]
    pub planted_at: u64,
}

impl Crop {
    /// Creates a stage-0 crop.
    pub fn new(kind: CropKind, planted_at: u64) -> Self {
        Self {
            kind,
            growth_stage: 0,
            planted_at,
        }
    }

    /// Whether the scythe can take this crop.
    pub fn is_harvestable(&self) -> bool {
        self.growth_stage >= MAX_GROWTH_STAGE
    }

    /// Advances one growth stage. Returns false if already mature.
    pub fn grow(&mut self) -> bool {
        if self.is_harvestable() {
            return false;
        }
        self.growth_stage += 1;
        true
    }
}

/// A single cell of the farm grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    #[serde(rename = "type")]
    pub terrain: TileType,
    #[serde(rename = "isCollidable")]
    pub collidable: bool,
    #[serde(rename = "isWatered", default)]
    pub watered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<Crop>,
}

impl Tile {
    /// Creates a bare tile with collision derived from the terrain.
    pub fn new(terrain: TileType) -> Self {
        Self {
            terrain,
            collidable: terrain.is_collidable_by_default(),
            watered: false,
            crop: None,
        }
    }

    /// Replaces the terrain and re-derives collision.
    pub fn set_terrain(&mut self, terrain: TileType) {
        self.terrain = terrain;
        self.collidable = terrain.is_collidable_by_default();
    }

    /// Only empty tilled soil accepts a seed.
    pub fn can_plant(&self) -> bool {
        self.terrain == TileType::Dirt && self.crop.is_none()
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::new(TileType::Grass)
    }
}

/// The farm grid, stored row-major (`tiles[y][x]`).
///
/// Serializes as a bare array of rows, which is how saves store the grid.
///
/// # Examples
///
/// ```
/// use tithe::{Position, TileType, World};
///
/// let world = World::new(10, 8);
/// assert_eq!(world.width(), 10);
/// assert_eq!(world.height(), 8);
/// assert_eq!(world.get_tile(Position::new(3, 3)).unwrap().terrain, TileType::Grass);
/// assert!(world.get_tile(Position::new(10, 0)).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct World {
    pub tiles: Vec<Vec<Tile>>,
}

impl World {
    /// Creates an all-grass world.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            tiles: vec![vec![Tile::default(); width as usize]; height as usize],
        }
    }

    /// Width in tiles (length of the first row).
    pub fn width(&self) -> u32 {
        self.tiles.first().map_or(0, |row| row.len() as u32)
    }

    /// Height in tiles.
    pub fn height(&self) -> u32 {
        self.tiles.len() as u32
    }

    /// True when every row has the same length and the grid is non-empty.
    pub fn is_rectangular(&self) -> bool {
        let width = self.width();
        width > 0 && self.tiles.iter().all(|row| row.len() as u32 == width)
    }

    /// Checks if a position is inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width() && (pos.y as u32) < self.height()
    }

    /// Gets the tile at a position.
    pub fn get_tile(&self, pos: Position) -> Option<&Tile> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        self.tiles
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
    }

    /// Gets the tile at a position mutably.
    pub fn get_tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        self.tiles
            .get_mut(pos.y as usize)
            .and_then(|row| row.get_mut(pos.x as usize))
    }

    /// Replaces the terrain at a position. Out-of-bounds writes are ignored.
    pub fn set_terrain(&mut self, pos: Position, terrain: TileType) {
        if let Some(tile) = self.get_tile_mut(pos) {
            tile.set_terrain(terrain);
        }
    }

    /// Whether the position is off the grid or blocked.
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.get_tile(pos).map_or(true, |tile| tile.collidable)
    }

    /// Whether any tile in the 8-neighbourhood of `pos` is water.
    pub fn is_near_water(&self, pos: Position) -> bool {
        pos.adjacent_positions().into_iter().any(|p| {
            self.get_tile(p)
                .is_some_and(|tile| tile.terrain == TileType::Water)
        })
    }

    /// Iterates every tile with its position, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Tile)> {
        self.tiles.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, tile)| (Position::new(x as i32, y as i32), tile))
        })
    }

    /// Iterates every tile mutably with its position, row by row.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Position, &mut Tile)> {
        self.tiles.iter_mut().enumerate().flat_map(|(y, row)| {
            row.iter_mut()
                .enumerate()
                .map(move |(x, tile)| (Position::new(x as i32, y as i32), tile))
        })
    }

    /// Positions of every tile with the given terrain.
    pub fn positions_of(&self, terrain: TileType) -> Vec<Position> {
        self.iter()
            .filter(|(_, tile)| tile.terrain == terrain)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Number of planted crops.
    pub fn crop_count(&self) -> usize {
        self.iter().filter(|(_, tile)| tile.crop.is_some()).count()
    }
}

//! # Farm Generation
//!
//! Fence ring, barn and pond at fixed places; rocks and stumps scattered
//! over the remaining grass, keeping the area around spawn clear.

use crate::game::{Position, TileType, World};
use crate::generation::{GenerationConfig, Generator};
use crate::utils::Dice;
use crate::{TitheError, TitheResult};
use log::debug;

/// Generator for the single farm map.
#[derive(Debug, Default)]
pub struct FarmGenerator;

impl FarmGenerator {
    /// Creates a new farm generator.
    pub fn new() -> Self {
        Self
    }

    /// Lays out the deterministic features on an all-grass world.
    fn place_fixed_features(&self, world: &mut World, config: &GenerationConfig) {
        let (width, height) = (config.width as i32, config.height as i32);
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    world.set_terrain(Position::new(x, y), TileType::Fence);
                }
            }
        }

        let barn = config.barn_origin;
        world.set_terrain(barn, TileType::BarnTopLeft);
        world.set_terrain(Position::new(barn.x + 1, barn.y), TileType::BarnTopRight);
        world.set_terrain(Position::new(barn.x, barn.y + 1), TileType::BarnBottomLeft);
        world.set_terrain(
            Position::new(barn.x + 1, barn.y + 1),
            TileType::BarnBottomRight,
        );

        let pond = config.pond;
        let br = pond.bottom_right();
        for y in pond.top_left.y..=br.y {
            for x in pond.top_left.x..=br.x {
                world.set_terrain(Position::new(x, y), TileType::Water);
            }
        }
    }

    /// Scatters debris over open grass outside the spawn clearance.
    ///
    /// Two rolls per candidate tile: one for whether it gets debris, one for
    /// rock versus stump.
    fn scatter_debris(&self, world: &mut World, config: &GenerationConfig, dice: &mut dyn Dice) {
        let mut placed = 0usize;
        for (pos, tile) in world.iter_mut() {
            if tile.terrain != TileType::Grass
                || pos.chebyshev_distance(config.spawn) <= config.spawn_clearance
            {
                continue;
            }
            if dice.chance(config.debris_chance) {
                let debris = if dice.chance(config.rock_share) {
                    TileType::Rock
                } else {
                    TileType::Stump
                };
                tile.set_terrain(debris);
                placed += 1;
            }
        }
        debug!("Scattered {} pieces of debris", placed);
    }
}

impl Generator<World> for FarmGenerator {
    fn generate(&self, config: &GenerationConfig, dice: &mut dyn Dice) -> TitheResult<World> {
        config.validate()?;
        let mut world = World::new(config.width, config.height);
        self.place_fixed_features(&mut world, config);
        self.scatter_debris(&mut world, config, dice);
        Ok(world)
    }

    fn validate(&self, world: &World, config: &GenerationConfig) -> TitheResult<()> {
        if world.width() != config.width || world.height() != config.height {
            return Err(TitheError::GenerationFailed(format!(
                "Expected a {}x{} farm, got {}x{}",
                config.width,
                config.height,
                world.width(),
                world.height()
            )));
        }
        if world.is_blocked(config.spawn) {
            return Err(TitheError::GenerationFailed(
                "Spawn tile is blocked".to_string(),
            ));
        }
        if world.positions_of(TileType::Water).is_empty() {
            return Err(TitheError::GenerationFailed(
                "Farm has no water source".to_string(),
            ));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "farm"
    }
}

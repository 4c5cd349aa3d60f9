//! # Crop Growth
//!
//! Stochastic growth shared by the overnight sleep transition and the
//! real-time passive ticker. Each immature crop gets one independent roll
//! per pass; tiles are visited row by row so scripted dice line up with
//! crops in reading order.

use crate::config::{
    SLEEP_GROWTH_CHANCE_DRY, SLEEP_GROWTH_CHANCE_WATERED, TICK_GROWTH_CHANCE_DRY,
    TICK_GROWTH_CHANCE_WATERED,
};
use crate::game::{Position, World};
use crate::utils::Dice;
use serde::{Deserialize, Serialize};

/// Probability of a crop advancing one stage in a single growth pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthChances {
    pub watered: f64,
    pub dry: f64,
}

impl GrowthChances {
    /// Chances applied once per night.
    pub const SLEEP: GrowthChances = GrowthChances {
        watered: SLEEP_GROWTH_CHANCE_WATERED,
        dry: SLEEP_GROWTH_CHANCE_DRY,
    };

    /// Chances applied on every passive tick.
    pub const TICK: GrowthChances = GrowthChances {
        watered: TICK_GROWTH_CHANCE_WATERED,
        dry: TICK_GROWTH_CHANCE_DRY,
    };

    /// Chance for a tile with the given watered flag.
    pub fn for_tile(&self, watered: bool) -> f64 {
        if watered {
            self.watered
        } else {
            self.dry
        }
    }
}

/// Rolls growth for every immature crop in the world.
///
/// Returns the positions and new stages of the crops that grew.
pub fn grow_crops(
    world: &mut World,
    chances: GrowthChances,
    dice: &mut dyn Dice,
) -> Vec<(Position, u8)> {
    let mut grown = Vec::new();
    for (pos, tile) in world.iter_mut() {
        let watered = tile.watered;
        if let Some(crop) = tile.crop.as_mut() {
            if crop.is_harvestable() {
                continue;
            }
            if dice.chance(chances.for_tile(watered)) && crop.grow() {
                grown.push((pos, crop.growth_stage));
            }
        }
    }
    grown
}

/// Clears the watered flag on every tile.
pub fn dry_out(world: &mut World) {
    for (_, tile) in world.iter_mut() {
        tile.watered = false;
    }
}

//! # Player and Inventory
//!
//! The farmer's position and facing, the tools they can equip, and what
//! they carry.

use crate::config::{DEFAULT_PLAYER_ENERGY, STARTING_SEEDS};
use crate::game::{CropKind, Direction, Position};
use serde::{Deserialize, Serialize};

/// The farmer.
///
/// # Examples
///
/// ```
/// use tithe::{Direction, Player, Position};
///
/// let player = Player::new(Position::new(20, 20));
/// assert_eq!(player.facing, Direction::Down);
/// assert_eq!(player.faced_position(), Position::new(20, 21));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    #[serde(flatten)]
    pub position: Position,
    #[serde(default)]
    pub facing: Direction,
    /// Reserved; no rule reads or spends it yet
    #[serde(default = "default_energy")]
    pub energy: u32,
}

fn default_energy() -> u32 {
    DEFAULT_PLAYER_ENERGY
}

impl Player {
    /// Creates a player facing down at `position`.
    pub fn new(position: Position) -> Self {
        Self {
            position,
            facing: Direction::Down,
            energy: DEFAULT_PLAYER_ENERGY,
        }
    }

    /// The tile one step in the facing direction.
    pub fn faced_position(&self) -> Position {
        self.position.step(self.facing)
    }
}

/// Equippable tools. `None` is the empty hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tool {
    #[default]
    None,
    Hoe,
    Scythe,
    Can,
}

impl Tool {
    /// The three real tools, in hotbar order.
    pub fn all() -> [Tool; 3] {
        [Tool::Hoe, Tool::Scythe, Tool::Can]
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Tool::None => "Hands",
            Tool::Hoe => "Hoe",
            Tool::Scythe => "Scythe",
            Tool::Can => "Watering Can",
        }
    }
}

/// A count per crop kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropCounts {
    #[serde(rename = "WHEAT", default)]
    pub wheat: u32,
    #[serde(rename = "CORN", default)]
    pub corn: u32,
}

impl CropCounts {
    /// Same count for every kind.
    pub fn uniform(count: u32) -> Self {
        Self {
            wheat: count,
            corn: count,
        }
    }

    /// Count for one kind.
    pub fn get(&self, kind: CropKind) -> u32 {
        match kind {
            CropKind::Wheat => self.wheat,
            CropKind::Corn => self.corn,
        }
    }

    /// Mutable count for one kind.
    pub fn get_mut(&mut self, kind: CropKind) -> &mut u32 {
        match kind {
            CropKind::Wheat => &mut self.wheat,
            CropKind::Corn => &mut self.corn,
        }
    }

    /// Sum across kinds.
    pub fn total(&self) -> u32 {
        self.wheat + self.corn
    }
}

/// Seeds, harvested crops and owned tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub seeds: CropCounts,
    pub crops: CropCounts,
    #[serde(default)]
    pub tools: Vec<Tool>,
}

impl Inventory {
    /// The inventory a new game starts with: seeds only, no tools.
    pub fn starting() -> Self {
        Self {
            seeds: CropCounts::uniform(STARTING_SEEDS),
            crops: CropCounts::default(),
            tools: Vec::new(),
        }
    }

    /// Whether the tool can be equipped. The empty hand is always available.
    pub fn owns(&self, tool: Tool) -> bool {
        tool == Tool::None || self.tools.contains(&tool)
    }

    /// Adds a tool. Returns false if it was already owned.
    pub fn add_tool(&mut self, tool: Tool) -> bool {
        if self.owns(tool) {
            return false;
        }
        self.tools.push(tool);
        true
    }

    /// Takes one seed of `kind`. Returns false if none are left.
    pub fn take_seed(&mut self, kind: CropKind) -> bool {
        let count = self.seeds.get_mut(kind);
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::starting()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_inventory() {
        let inventory = Inventory::starting();
        assert_eq!(inventory.seeds.get(CropKind::Wheat), 20);
        assert_eq!(inventory.seeds.get(CropKind::Corn), 20);
        assert_eq!(inventory.crops.total(), 0);
        assert!(inventory.tools.is_empty());
    }

    #[test]
    fn test_tool_ownership() {
        let mut inventory = Inventory::starting();
        assert!(inventory.owns(Tool::None));
        assert!(!inventory.owns(Tool::Hoe));

        assert!(inventory.add_tool(Tool::Hoe));
        assert!(!inventory.add_tool(Tool::Hoe));
        assert!(!inventory.add_tool(Tool::None));
        assert_eq!(inventory.tools, vec![Tool::Hoe]);
    }

    #[test]
    fn test_take_seed_stops_at_zero() {
        let mut inventory = Inventory::starting();
        inventory.seeds.corn = 1;
        assert!(inventory.take_seed(CropKind::Corn));
        assert!(!inventory.take_seed(CropKind::Corn));
        assert_eq!(inventory.seeds.corn, 0);
    }

    #[test]
    fn test_player_faced_position_follows_facing() {
        let mut player = Player::new(Position::new(5, 5));
        player.facing = Direction::Left;
        assert_eq!(player.faced_position(), Position::new(4, 5));
    }

    #[test]
    fn test_inventory_serializes_with_kind_keys() {
        let json = serde_json::to_value(Inventory::starting()).unwrap();
        assert_eq!(json["seeds"]["WHEAT"], 20);
        assert_eq!(json["crops"]["CORN"], 0);
        assert_eq!(json["tools"], serde_json::json!([]));
    }
}

//! Player state: resources in hand and pieces left to place.

use crate::board::{PlayerId, Resource};
use serde::{Deserialize, Serialize};

/// Roads each player starts with
pub const STARTING_ROADS: u32 = 15;

/// Settlements each player starts with
pub const STARTING_SETTLEMENTS: u32 = 5;

/// Cities each player starts with
pub const STARTING_CITIES: u32 = 4;

/// Player color, assigned by seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerColor {
    Red,
    Blue,
    Orange,
    White,
}

impl PlayerColor {
    /// Get color for a player index
    pub fn for_player(id: PlayerId) -> Self {
        match id % 4 {
            0 => PlayerColor::Red,
            1 => PlayerColor::Blue,
            2 => PlayerColor::Orange,
            _ => PlayerColor::White,
        }
    }
}

impl std::fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PlayerColor::Red => "Red",
            PlayerColor::Blue => "Blue",
            PlayerColor::Orange => "Orange",
            PlayerColor::White => "White",
        };
        f.write_str(name)
    }
}

/// A hand of resources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHand {
    pub lumber: u32,
    pub wool: u32,
    pub grain: u32,
    pub brick: u32,
    pub ore: u32,
}

impl ResourceHand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a hand from `(resource, count)` pairs
    pub fn of(items: &[(Resource, u32)]) -> Self {
        let mut hand = Self::new();
        for &(resource, count) in items {
            hand.add(resource, count);
        }
        hand
    }

    /// Total number of resource cards
    pub fn total(&self) -> u32 {
        Resource::ALL.iter().map(|r| self.get(*r)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Lumber => self.lumber,
            Resource::Wool => self.wool,
            Resource::Grain => self.grain,
            Resource::Brick => self.brick,
            Resource::Ore => self.ore,
        }
    }

    fn slot(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Lumber => &mut self.lumber,
            Resource::Wool => &mut self.wool,
            Resource::Grain => &mut self.grain,
            Resource::Brick => &mut self.brick,
            Resource::Ore => &mut self.ore,
        }
    }

    pub fn add(&mut self, resource: Resource, amount: u32) {
        *self.slot(resource) += amount;
    }

    /// Check if this hand covers a cost
    pub fn can_afford(&self, cost: &ResourceHand) -> bool {
        Resource::ALL.iter().all(|r| self.get(*r) >= cost.get(*r))
    }

    /// Remove a cost from this hand. Leaves the hand untouched and returns
    /// false if it does not cover the cost.
    pub fn try_subtract(&mut self, cost: &ResourceHand) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        for resource in Resource::ALL {
            *self.slot(resource) -= cost.get(resource);
        }
        true
    }
}

/// Pieces a player has not yet placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceStock {
    pub roads: u32,
    pub settlements: u32,
    pub cities: u32,
}

impl Default for PieceStock {
    fn default() -> Self {
        Self {
            roads: STARTING_ROADS,
            settlements: STARTING_SETTLEMENTS,
            cities: STARTING_CITIES,
        }
    }
}

/// A player's off-board state. Victory points are read from the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub color: PlayerColor,
    pub resources: ResourceHand,
    pub pieces: PieceStock,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            color: PlayerColor::for_player(id),
            resources: ResourceHand::new(),
            pieces: PieceStock::default(),
        }
    }
}

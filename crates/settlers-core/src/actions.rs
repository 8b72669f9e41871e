//! Game actions that players can take.
//!
//! This module defines all possible actions in the game and the events
//! that result from those actions.

use crate::board::{EdgeId, PlayerId, VertexId};
use crate::production::Production;
use serde::{Deserialize, Serialize};

/// All possible actions a player can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    // ==================== Setup Phase ====================
    /// Place a free settlement during setup
    PlaceInitialSettlement(VertexId),
    /// Place a free road during setup (must touch the settlement just placed)
    PlaceInitialRoad(EdgeId),

    // ==================== Turn Actions ====================
    /// Roll the dice (must be done at start of turn)
    RollDice,
    /// Build a settlement at a vertex reached by one of the player's roads
    BuildSettlement(VertexId),
    /// Upgrade one of the player's settlements to a city
    BuildCity(VertexId),
    /// Build a road extending the player's network
    BuildRoad(EdgeId),
    /// Do nothing this turn (or skip a setup placement with no legal spot)
    Pass,
}

impl GameAction {
    /// Whether this action spends resources on a piece
    pub fn is_build(&self) -> bool {
        matches!(
            self,
            GameAction::BuildSettlement(_) | GameAction::BuildCity(_) | GameAction::BuildRoad(_)
        )
    }
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Dice were rolled
    DiceRolled { player: PlayerId, total: u32 },

    /// Structures on matching tiles produced resources
    ResourcesProduced { production: Vec<Production> },

    /// A settlement was placed (free during setup, paid otherwise)
    SettlementBuilt {
        player: PlayerId,
        vertex: VertexId,
        setup: bool,
    },

    /// A settlement was replaced by a city
    CityBuilt { player: PlayerId, vertex: VertexId },

    /// A road was placed
    RoadBuilt {
        player: PlayerId,
        edge: EdgeId,
        setup: bool,
    },

    /// The player took no build action
    Passed { player: PlayerId },

    /// Every player has placed their initial pieces
    SetupCompleted,

    /// Every player has taken a turn in this round
    RoundCompleted {
        round: u32,
        victory_points: Vec<(PlayerId, u32)>,
    },

    /// The game is over
    GameWon {
        winner: PlayerId,
        victory_points: u32,
        /// Decided by the round limit rather than by reaching the target
        by_round_limit: bool,
    },
}

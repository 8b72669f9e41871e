//! Building costs and payment.
//!
//! Costs are an immutable [`CostTable`] built once and handed to the
//! [`Bank`]. The bank never looks at the board: the orchestrator validates a
//! placement first and only then asks the bank to settle payment.

use crate::board::Resource;
use crate::player::{PieceStock, Player, ResourceHand};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Purchasable piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Road,
    Settlement,
    City,
}

impl PieceKind {
    fn remaining(self, stock: &PieceStock) -> u32 {
        match self {
            PieceKind::Road => stock.roads,
            PieceKind::Settlement => stock.settlements,
            PieceKind::City => stock.cities,
        }
    }

    fn stock_slot(self, stock: &mut PieceStock) -> &mut u32 {
        match self {
            PieceKind::Road => &mut stock.roads,
            PieceKind::Settlement => &mut stock.settlements,
            PieceKind::City => &mut stock.cities,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    #[error("Cannot afford a {0:?}")]
    CannotAfford(PieceKind),

    #[error("No {0:?} pieces remaining")]
    NoPiecesRemaining(PieceKind),
}

/// What each piece costs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostTable {
    pub road: ResourceHand,
    pub settlement: ResourceHand,
    pub city: ResourceHand,
}

impl CostTable {
    /// Standard costs: road = lumber + brick, settlement = lumber + brick +
    /// wool + grain, city = 3 ore + 2 grain
    pub fn standard() -> Self {
        Self {
            road: ResourceHand::of(&[(Resource::Lumber, 1), (Resource::Brick, 1)]),
            settlement: ResourceHand::of(&[
                (Resource::Lumber, 1),
                (Resource::Brick, 1),
                (Resource::Wool, 1),
                (Resource::Grain, 1),
            ]),
            city: ResourceHand::of(&[(Resource::Ore, 3), (Resource::Grain, 2)]),
        }
    }

    pub fn cost(&self, kind: PieceKind) -> &ResourceHand {
        match kind {
            PieceKind::Road => &self.road,
            PieceKind::Settlement => &self.settlement,
            PieceKind::City => &self.city,
        }
    }
}

impl Default for CostTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Settles payment for pieces against players' hands and stocks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bank {
    costs: CostTable,
}

impl Bank {
    pub fn new(costs: CostTable) -> Self {
        Self { costs }
    }

    pub fn cost(&self, kind: PieceKind) -> &ResourceHand {
        self.costs.cost(kind)
    }

    /// The player holds the resources and still has a piece of this kind
    pub fn can_afford(&self, player: &Player, kind: PieceKind) -> bool {
        player.resources.can_afford(self.cost(kind)) && kind.remaining(&player.pieces) > 0
    }

    /// Deduct the cost and take one piece from the player's stock. On error
    /// the player is left unchanged.
    pub fn commit(&self, player: &mut Player, kind: PieceKind) -> Result<(), BankError> {
        if kind.remaining(&player.pieces) == 0 {
            return Err(BankError::NoPiecesRemaining(kind));
        }
        if !player.resources.try_subtract(self.cost(kind)) {
            return Err(BankError::CannotAfford(kind));
        }
        *kind.stock_slot(&mut player.pieces) -= 1;
        Ok(())
    }

    /// Take one piece without payment, as during setup
    pub fn take_setup_piece(&self, player: &mut Player, kind: PieceKind) -> Result<(), BankError> {
        let slot = kind.stock_slot(&mut player.pieces);
        if *slot == 0 {
            return Err(BankError::NoPiecesRemaining(kind));
        }
        *slot -= 1;
        Ok(())
    }
}

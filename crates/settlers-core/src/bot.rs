//! Random bot players.
//!
//! A bot first picks one kind of action uniformly at random (build a
//! settlement, upgrade, build a road, pass, ...) and then one target of that
//! kind. Picking the kind first keeps the many road and settlement targets
//! from crowding out passing or upgrading.

use crate::actions::GameAction;
use crate::board::PlayerId;
use crate::game::Game;
use rand::prelude::*;
use std::mem::{discriminant, Discriminant};

/// A bot player that can decide on actions
pub struct Bot {
    pub player_id: PlayerId,
    rng: StdRng,
}

impl Bot {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(player_id: PlayerId, seed: u64) -> Self {
        Self {
            player_id,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Choose an action from the valid actions, or `None` if it is not this
    /// bot's turn
    pub fn choose_action(&mut self, game: &Game) -> Option<GameAction> {
        let valid_actions = game.valid_actions(self.player_id);
        self.choose_from(&valid_actions)
    }

    fn choose_from(&mut self, actions: &[GameAction]) -> Option<GameAction> {
        let mut kinds: Vec<Discriminant<GameAction>> = Vec::new();
        for action in actions {
            let kind = discriminant(action);
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }

        let kind = *kinds.choose(&mut self.rng)?;
        let targets: Vec<&GameAction> = actions
            .iter()
            .filter(|a| discriminant(*a) == kind)
            .collect();
        targets.choose(&mut self.rng).map(|a| **a)
    }
}

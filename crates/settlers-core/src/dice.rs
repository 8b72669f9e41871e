//! Sources of the trigger value rolled each turn.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sides on each standard die
pub const DIE_SIDES: u32 = 6;

pub trait TriggerSource {
    /// Roll two dice with `sides` faces each and return the sum, saturating
    /// at `u32::MAX`
    fn roll_two(&mut self, sides: u32) -> u32 {
        self.roll_one(sides).saturating_add(self.roll_one(sides))
    }

    /// Roll one die, returning a value in `1..=sides`. A die with zero sides
    /// is treated as one-sided and always rolls 1.
    fn roll_one(&mut self, sides: u32) -> u32;
}

/// Dice backed by a seedable RNG
pub struct Dice {
    rng: StdRng,
}

impl Dice {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for Dice {
    fn default() -> Self {
        Self::new()
    }
}

impl TriggerSource for Dice {
    fn roll_one(&mut self, sides: u32) -> u32 {
        self.rng.gen_range(1..=sides.max(1))
    }
}

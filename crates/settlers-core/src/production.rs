//! Resource production for a roll.

use crate::board::{PlayerId, Resource};
use crate::player::ResourceHand;
use crate::topology::Topology;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Roll that produces nothing
pub const NO_PRODUCTION_ROLL: u8 = 7;

/// One tile paying one structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Production {
    pub player: PlayerId,
    pub resource: Resource,
    pub amount: u32,
}

/// Compute what a roll produces.
///
/// Every tile whose token equals `roll` pays each structure on its boundary
/// the structure's multiplier in the tile's resource. A player with
/// structures on several matching tiles gets one event per tile and vertex.
/// Events come out in tile id order, then boundary order within a tile.
pub fn produce(topology: &Topology, roll: u8) -> Vec<Production> {
    if roll == NO_PRODUCTION_ROLL {
        return Vec::new();
    }

    let mut events = Vec::new();
    for tile in topology.tiles().iter().filter(|t| t.token == roll) {
        let Some(resource) = tile.resource() else {
            continue;
        };
        for &vertex in &tile.vertices {
            if let Some(structure) = topology.vertex(vertex).and_then(|v| v.structure()) {
                events.push(Production {
                    player: structure.owner,
                    resource,
                    amount: structure.multiplier(),
                });
            }
        }
    }
    events
}

/// Sum production events per player
pub fn totals(events: &[Production]) -> BTreeMap<PlayerId, ResourceHand> {
    let mut totals: BTreeMap<PlayerId, ResourceHand> = BTreeMap::new();
    for event in events {
        totals
            .entry(event.player)
            .or_default()
            .add(event.resource, event.amount);
    }
    totals
}

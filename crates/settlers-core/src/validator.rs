//! Placement rules.
//!
//! Every rule is a pure predicate over a [`Topology`]. A broken rule and an
//! id that does not resolve both answer `false`; nothing here panics or
//! mutates.
//!
//! The three placement predicates cover occupancy, the distance rule and the
//! setup-phase road rule. Reachability through a player's road network during
//! normal play is answered by [`PlacementValidator::touches_own_road`] and
//! [`PlacementValidator::extends_network`], which the orchestrator combines
//! with the placement predicates.

use crate::board::{EdgeId, PlayerId, VertexId};
use crate::topology::Topology;

pub trait PlacementValidator {
    /// A settlement may stand on `vertex` if it and all of its neighbors are
    /// empty. The phase does not change this check.
    fn can_place_settlement(
        &self,
        topology: &Topology,
        vertex: VertexId,
        player: PlayerId,
        is_setup: bool,
    ) -> bool;

    /// A road may go on a free `edge`. During setup one endpoint must also
    /// hold a structure owned by `player`.
    fn can_place_road(
        &self,
        topology: &Topology,
        edge: EdgeId,
        player: PlayerId,
        is_setup: bool,
    ) -> bool;

    /// Only a settlement owned by `player` can become a city
    fn can_upgrade_to_city(&self, topology: &Topology, vertex: VertexId, player: PlayerId) -> bool;

    /// `player` owns a road on some edge ending at `vertex`
    fn touches_own_road(&self, topology: &Topology, vertex: VertexId, player: PlayerId) -> bool;

    /// `edge` would connect to `player`'s network: an endpoint holds one of
    /// their structures, or a neighboring edge holds one of their roads
    fn extends_network(&self, topology: &Topology, edge: EdgeId, player: PlayerId) -> bool;
}

/// The standard rule set
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardValidator;

impl PlacementValidator for StandardValidator {
    fn can_place_settlement(
        &self,
        topology: &Topology,
        vertex: VertexId,
        _player: PlayerId,
        _is_setup: bool,
    ) -> bool {
        let Some(vertex) = topology.vertex(vertex) else {
            return false;
        };
        if vertex.is_occupied() {
            return false;
        }
        // Distance rule
        !vertex
            .adjacent_vertices()
            .any(|adj| topology.vertex(adj).is_some_and(|v| v.is_occupied()))
    }

    fn can_place_road(
        &self,
        topology: &Topology,
        edge: EdgeId,
        player: PlayerId,
        is_setup: bool,
    ) -> bool {
        let Some(edge) = topology.edge(edge) else {
            return false;
        };
        if edge.is_occupied() {
            return false;
        }
        if !is_setup {
            return true;
        }
        edge.endpoints()
            .iter()
            .any(|&v| topology.vertex(v).and_then(|v| v.owner()) == Some(player))
    }

    fn can_upgrade_to_city(&self, topology: &Topology, vertex: VertexId, player: PlayerId) -> bool {
        topology
            .vertex(vertex)
            .and_then(|v| v.structure())
            .is_some_and(|s| s.owner == player && s.is_upgradeable())
    }

    fn touches_own_road(&self, topology: &Topology, vertex: VertexId, player: PlayerId) -> bool {
        topology
            .edges_at(vertex)
            .any(|e| e.owner() == Some(player))
    }

    fn extends_network(&self, topology: &Topology, edge: EdgeId, player: PlayerId) -> bool {
        let Some(edge) = topology.edge(edge) else {
            return false;
        };
        edge.endpoints().iter().any(|&v| {
            topology.vertex(v).and_then(|v| v.owner()) == Some(player)
                || topology
                    .edges_at(v)
                    .any(|other| other.id != edge.id && other.owner() == Some(player))
        })
    }
}

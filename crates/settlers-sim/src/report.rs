//! Human-readable game reporting.

use settlers_core::board::DESERT_TOKEN;
use settlers_core::{GameEvent, PlayerColor, PlayerId, Topology};

/// One line per tile: id, cube position, terrain and token
pub fn tile_table(topology: &Topology) -> String {
    let mut out = String::from("Tile | Location (q,s,r) | Terrain   | Token\n");
    out.push_str("-----|------------------|-----------|------\n");
    for tile in topology.tiles() {
        let token = if tile.token == DESERT_TOKEN {
            "-".to_string()
        } else {
            tile.token.to_string()
        };
        out.push_str(&format!(
            "{:<4} | ({:>2},{:>2},{:>2})       | {:<9} | {}\n",
            tile.id,
            tile.coord.q,
            tile.coord.s(),
            tile.coord.r,
            format!("{:?}", tile.terrain),
            token
        ));
    }
    out
}

/// Describe an event for the log, prefixed with the round. `colors` is
/// indexed by player id.
pub fn describe(round: u32, event: &GameEvent, colors: &[PlayerColor]) -> String {
    let name = |id: PlayerId| {
        colors
            .get(id as usize)
            .map(|c| c.to_string())
            .unwrap_or_else(|| format!("Player {id}"))
    };

    match event {
        GameEvent::DiceRolled { player, total } => {
            format!("{round} / {}: Rolled {total}", name(*player))
        }
        GameEvent::ResourcesProduced { production } => production
            .iter()
            .map(|p| {
                if p.amount > 1 {
                    format!("{round} / {}: Received {}x {}", name(p.player), p.amount, p.resource)
                } else {
                    format!("{round} / {}: Received {}", name(p.player), p.resource)
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        GameEvent::SettlementBuilt {
            player,
            vertex,
            setup,
        } => {
            let verb = if *setup { "Placed" } else { "Built" };
            format!("{round} / {}: {verb} settlement on vertex {vertex}", name(*player))
        }
        GameEvent::CityBuilt { player, vertex } => {
            format!("{round} / {}: Built city on vertex {vertex}", name(*player))
        }
        GameEvent::RoadBuilt {
            player,
            edge,
            setup,
        } => {
            let verb = if *setup { "Placed" } else { "Built" };
            format!("{round} / {}: {verb} road on edge {edge}", name(*player))
        }
        GameEvent::Passed { player } => format!("{round} / {}: Pass", name(*player)),
        GameEvent::SetupCompleted => "Setup complete".to_string(),
        GameEvent::RoundCompleted {
            round,
            victory_points,
        } => {
            let scores: Vec<String> = victory_points
                .iter()
                .map(|(id, vp)| format!("{} {vp} VP", name(*id)))
                .collect();
            format!("End of round {round}: {}", scores.join(", "))
        }
        GameEvent::GameWon {
            winner,
            victory_points,
            by_round_limit,
        } => {
            let reason = if *by_round_limit {
                " (round limit reached)"
            } else {
                ""
            };
            format!(
                "{} wins with {victory_points} victory points{reason}",
                name(*winner)
            )
        }
    }
}

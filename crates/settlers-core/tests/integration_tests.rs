//! Integration tests for the settlers game engine.
//!
//! These tests verify complete game flows from setup through to victory.

use pretty_assertions::assert_eq;
use settlers_core::generator::check_quotas;
use settlers_core::topology::{EDGE_COUNT, TILE_COUNT, VERTEX_COUNT};
use settlers_core::*;
use std::collections::BTreeSet;

/// Helper to get any valid action of a specific type
fn find_action<F>(game: &Game, player: PlayerId, filter: F) -> Option<GameAction>
where
    F: Fn(&GameAction) -> bool,
{
    game.valid_actions(player).into_iter().find(filter)
}

/// Run through complete setup phase with valid placements
fn complete_setup(game: &mut Game) {
    let mut iterations = 0;
    let max_iterations = 100;

    while matches!(game.phase(), GamePhase::Setup { .. }) && iterations < max_iterations {
        let player = game.current_player();
        let action = game.valid_actions(player)[0];
        game.apply_action(player, action).unwrap();
        iterations += 1;
    }

    assert!(
        !matches!(game.phase(), GamePhase::Setup { .. }),
        "Game should complete setup within {} iterations",
        max_iterations
    );
}

/// Play bots until the game ends, returning every event
fn play_out(game: &mut Game, seed: u64) -> Vec<GameEvent> {
    let mut bots: Vec<Bot> = (0..game.player_count() as PlayerId)
        .map(|id| Bot::with_seed(id, seed + id as u64))
        .collect();
    let mut events = Vec::new();

    while !game.is_finished() {
        let player = game.current_player();
        let action = bots[player as usize]
            .choose_action(game)
            .expect("current player always has an action");
        events.extend(game.apply_action(player, action).unwrap());
    }
    events
}

fn limited(players: u8, rounds: u32) -> GameSettings {
    GameSettings {
        players,
        max_rounds: Some(rounds),
        ..GameSettings::default()
    }
}

#[test]
fn test_generated_board_shape() {
    for seed in 0..20 {
        let topology = generate(Some(seed)).unwrap();
        assert_eq!(topology.tiles().len(), TILE_COUNT);
        assert_eq!(topology.vertices().len(), VERTEX_COUNT);
        assert_eq!(topology.edges().len(), EDGE_COUNT);
        check_quotas(&topology).unwrap();

        for vertex in topology.vertices() {
            let tiles = vertex.adjacent_tiles().count();
            let neighbors = vertex.adjacent_vertices().count();
            assert!((1..=3).contains(&tiles), "vertex {} on {tiles} tiles", vertex.id);
            assert!((2..=3).contains(&neighbors), "vertex {} has {neighbors} neighbors", vertex.id);
        }
    }
}

#[test]
fn test_same_seed_same_board() {
    let a = generate(Some(2024)).unwrap();
    let b = generate(Some(2024)).unwrap();
    assert_eq!(a, b);

    let differs = (0..10u64).any(|seed| generate(Some(seed)).unwrap() != a);
    assert!(differs);
}

#[test]
fn test_center_tile_lookup() {
    let topology = generate(Some(1)).unwrap();
    let center = topology.tile_at(0, 0, 0).unwrap();
    assert_eq!(center.coord, CubeCoord::new(0, 0));
    assert!(topology.tile_at(3, -3, 0).is_none());
    assert!(topology.tile_at(1, 1, 1).is_none());
}

#[test]
fn test_setup_phase_completes() {
    let mut game = Game::seeded(GameSettings::default(), Some(42)).unwrap();
    complete_setup(&mut game);

    assert_eq!(game.phase(), GamePhase::PreRoll);
    for player in game.players() {
        let settlements = game.topology().structures_of(player.id).count();
        let roads: Vec<&Edge> = game.topology().roads_of(player.id).collect();
        assert_eq!(settlements, 2);
        assert_eq!(roads.len(), 2);

        // Every setup road touches one of the player's settlements
        for road in roads {
            assert!(road
                .endpoints()
                .iter()
                .any(|&v| game.topology().vertex(v).unwrap().owner() == Some(player.id)));
        }
    }

    // Distance rule holds across all players
    for vertex in game.topology().vertices().iter().filter(|v| v.is_occupied()) {
        for adj in vertex.adjacent_vertices() {
            assert!(!game.topology().vertex(adj).unwrap().is_occupied());
        }
    }
}

#[test]
fn test_normal_turn_flow() {
    let mut game = Game::seeded(limited(3, 50), Some(7)).unwrap();
    complete_setup(&mut game);

    for expected in [0, 1, 2, 0] {
        assert_eq!(game.current_player(), expected);
        assert_eq!(game.valid_actions(expected), vec![GameAction::RollDice]);

        let events = game.apply_action(expected, GameAction::RollDice).unwrap();
        assert!(matches!(events[0], GameEvent::DiceRolled { player, .. } if player == expected));
        assert_eq!(game.phase(), GamePhase::MainPhase);

        let action = find_action(&game, expected, |a| a.is_build())
            .unwrap_or(GameAction::Pass);
        game.apply_action(expected, action).unwrap();
    }
    assert_eq!(game.round(), 2);
}

#[test]
fn test_building_requires_resources() {
    let mut game = Game::seeded(limited(2, 50), Some(9)).unwrap();
    complete_setup(&mut game);
    game.apply_action(0, GameAction::RollDice).unwrap();

    let player = game.get_player(0).unwrap().clone();
    let can_road = game.bank().can_afford(&player, PieceKind::Road);
    let road = game
        .topology()
        .edges()
        .iter()
        .find(|e| {
            !e.is_occupied() && StandardValidator.extends_network(game.topology(), e.id, 0)
        })
        .unwrap()
        .id;

    let result = game.apply_action(0, GameAction::BuildRoad(road));
    if can_road {
        assert!(result.is_ok());
    } else {
        assert_eq!(
            result,
            Err(GameError::Bank(BankError::CannotAfford(PieceKind::Road)))
        );
        assert_eq!(game.get_player(0).unwrap(), &player);
    }
}

#[test]
fn test_random_game_simulation() {
    for seed in [1, 2, 3] {
        let mut game = Game::seeded(limited(4, 300), Some(seed)).unwrap();
        let events = play_out(&mut game, seed * 10);

        let winner = game.winner().unwrap();
        let best = game.scores().iter().map(|(_, vp)| *vp).max().unwrap();
        assert_eq!(game.victory_points(winner), best);
        assert!(game.round() <= 300);

        let won: Vec<&GameEvent> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameWon { .. }))
            .collect();
        assert_eq!(won.len(), 1);
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::SetupCompleted).count(),
            1
        );
    }
}

#[test]
fn test_simulated_game_keeps_board_legal() {
    let mut game = Game::seeded(limited(4, 200), Some(99)).unwrap();
    play_out(&mut game, 5);

    let topology = game.topology();
    for vertex in topology.vertices().iter().filter(|v| v.is_occupied()) {
        for adj in vertex.adjacent_vertices() {
            assert!(
                !topology.vertex(adj).unwrap().is_occupied(),
                "vertices {} and {adj} are both built",
                vertex.id
            );
        }
    }

    // Every road connects to its owner's network
    for edge in topology.edges().iter().filter(|e| e.is_occupied()) {
        let owner = edge.owner().unwrap();
        let connected = edge.endpoints().iter().any(|&v| {
            topology.vertex(v).unwrap().owner() == Some(owner)
                || topology
                    .edges_at(v)
                    .any(|other| other.id != edge.id && other.owner() == Some(owner))
        });
        assert!(connected, "road {} is isolated", edge.id);
    }

    // Piece stocks match what is on the board
    for player in game.players() {
        let roads = topology.roads_of(player.id).count() as u32;
        let cities = topology
            .structures_of(player.id)
            .filter(|v| v.structure().unwrap().kind == StructureKind::City)
            .count() as u32;
        assert_eq!(player.pieces.roads + roads, 15);
        assert_eq!(player.pieces.cities + cities, 4);
    }
}

#[test]
fn test_round_limit_leader_wins() {
    let mut game = Game::seeded(limited(2, 1), Some(3)).unwrap();
    let events = play_out(&mut game, 3);

    let completed: BTreeSet<u32> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::RoundCompleted { round, .. } => Some(*round),
            _ => None,
        })
        .collect();
    assert_eq!(completed, BTreeSet::from([1]));
    assert!(matches!(
        events.last(),
        Some(GameEvent::GameWon {
            by_round_limit: true,
            ..
        })
    ));
}

#[test]
fn test_production_matches_roll() {
    let mut game = Game::seeded(limited(4, 100), Some(17)).unwrap();
    complete_setup(&mut game);

    for _ in 0..20 {
        if game.is_finished() {
            break;
        }
        let player = game.current_player();
        let before: Vec<ResourceHand> = game.players().iter().map(|p| p.resources).collect();
        let expected_board = game.topology().clone();

        let events = game.apply_action(player, GameAction::RollDice).unwrap();
        let roll = game.last_roll().unwrap() as u8;
        let expected = produce(&expected_board, roll);
        if expected.is_empty() {
            assert_eq!(events.len(), 1);
        } else {
            assert_eq!(
                events[1],
                GameEvent::ResourcesProduced {
                    production: expected.clone()
                }
            );
        }

        let gained: u32 = expected.iter().map(|p| p.amount).sum();
        let after: u32 = game.players().iter().map(|p| p.resources.total()).sum();
        let before: u32 = before.iter().map(|h| h.total()).sum();
        assert_eq!(after, before + gained);

        let action = find_action(&game, player, |a| a.is_build()).unwrap_or(GameAction::Pass);
        game.apply_action(player, action).unwrap();
    }
}

#[test]
fn test_tiles_sharing_an_edge_are_neighbors() {
    let topology = generate(Some(11)).unwrap();
    let sides: Vec<BTreeSet<(VertexId, VertexId)>> = topology
        .tiles()
        .iter()
        .map(|tile| tile.boundary_pairs().map(|(a, b)| (a.min(b), a.max(b))).collect())
        .collect();

    let mut shared_sides = 0;
    for (i, a) in topology.tiles().iter().enumerate() {
        for (j, b) in topology.tiles().iter().enumerate().skip(i + 1) {
            let shared = sides[i].intersection(&sides[j]).count();
            assert!(shared <= 1, "tiles {i} and {j} share {shared} sides");
            assert_eq!(
                shared == 1,
                a.coord.distance_to(&b.coord) == 1,
                "tiles {i} at {} and {j} at {}",
                a.coord,
                b.coord
            );
            shared_sides += shared;
        }
    }
    // Interior edges of a radius-2 hexagon
    assert_eq!(shared_sides, 42);
}

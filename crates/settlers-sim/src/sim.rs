//! Drive a full game between random bots.

use crate::config::SimConfig;
use crate::report;
use anyhow::{bail, Context, Result};
use settlers_core::{Bot, Game, GameEvent, GameSettings, PlayerColor, PlayerId};
use tracing::info;

/// How a simulated game ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub winner: PlayerId,
    pub color: PlayerColor,
    pub victory_points: u32,
    pub rounds: u32,
    pub by_round_limit: bool,
    /// Final points in seat order
    pub scores: Vec<(PlayerId, u32)>,
}

/// Build the game described by `config`
pub fn new_game(config: &SimConfig) -> Result<Game> {
    let settings = GameSettings {
        players: config.players,
        max_rounds: Some(config.turns),
        ..GameSettings::default()
    };
    Game::seeded(settings, config.seed).context("failed to set up game")
}

/// Play `game` to the end with one bot per seat, logging every event
pub fn play(game: &mut Game, seed: Option<u64>) -> Result<Outcome> {
    let colors: Vec<PlayerColor> = game.players().iter().map(|p| p.color).collect();
    let mut bots: Vec<Bot> = game
        .players()
        .iter()
        .map(|p| match seed {
            Some(seed) => Bot::with_seed(p.id, seed.wrapping_add(100 + p.id as u64)),
            None => Bot::new(p.id),
        })
        .collect();

    let mut by_round_limit = false;
    while !game.is_finished() {
        let player = game.current_player();
        let Some(action) = bots
            .get_mut(player as usize)
            .and_then(|bot| bot.choose_action(game))
        else {
            bail!("no action available for player {player}");
        };

        let events = game
            .apply_action(player, action)
            .with_context(|| format!("player {player} could not apply {action:?}"))?;
        for event in &events {
            if let GameEvent::GameWon {
                by_round_limit: limit,
                ..
            } = event
            {
                by_round_limit = *limit;
            }
            info!("{}", report::describe(game.round(), event, &colors));
        }
    }

    let winner = game.winner().context("game ended without a winner")?;
    let color = colors
        .get(winner as usize)
        .copied()
        .context("winner has no seat")?;
    Ok(Outcome {
        winner,
        color,
        victory_points: game.victory_points(winner),
        rounds: game.round(),
        by_round_limit,
        scores: game.scores(),
    })
}

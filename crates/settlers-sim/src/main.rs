//! Settlers simulation runner: generates a board and plays bots to the end.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod report;
mod sim;

use config::SimConfig;

#[derive(Debug, Parser)]
#[command(author, version, about = "Simulate a settlers game between random bots")]
struct Cli {
    /// Path to a YAML config file (`turns`, `players`, `seed`)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of players (2-4)
    #[arg(long)]
    players: Option<u8>,

    /// Override the seed for the board, dice and bots
    #[arg(long)]
    seed: Option<u64>,

    /// Override the round limit (1-8192)
    #[arg(long)]
    turns: Option<u32>,

    /// Print the generated board as JSON before playing
    #[arg(long)]
    print_board: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };
        if let Some(players) = self.players {
            config.players = players;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(turns) = self.turns {
            config.turns = turns;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    info!(
        players = config.players,
        turns = config.turns,
        seed = ?config.seed,
        "Starting settlers simulation"
    );

    let mut game = sim::new_game(&config)?;
    if cli.print_board {
        let json = serde_json::to_string_pretty(game.topology())
            .context("failed to serialize board")?;
        println!("{json}");
    }
    info!("Board:\n{}", report::tile_table(game.topology()));

    let outcome = sim::play(&mut game, config.seed)?;
    println!(
        "{} player wins with {} victory points after {} rounds",
        outcome.color, outcome.victory_points, outcome.rounds
    );
    Ok(())
}

//! Simulation configuration loaded from YAML.

use serde::{Deserialize, Serialize};
use settlers_core::game::{MAX_PLAYERS, MIN_PLAYERS};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fewest rounds a game may be limited to
pub const MIN_TURNS: u32 = 1;

/// Most rounds a game may be limited to
pub const MAX_TURNS: u32 = 8192;

fn default_turns() -> u32 {
    500
}

fn default_players() -> u8 {
    MAX_PLAYERS
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("turns must be between {MIN_TURNS} and {MAX_TURNS}, found {0}")]
    TurnsOutOfRange(u32),

    #[error("players must be between {MIN_PLAYERS} and {MAX_PLAYERS}, found {0}")]
    PlayersOutOfRange(u8),
}

/// Settings for one simulated game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Round limit
    pub turns: u32,
    #[serde(default = "default_players")]
    pub players: u8,
    /// Seed for the board, dice and bots; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            turns: default_turns(),
            players: default_players(),
            seed: None,
        }
    }
}

impl SimConfig {
    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&data)
    }

    pub fn from_yaml_str(data: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_yaml::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TURNS..=MAX_TURNS).contains(&self.turns) {
            return Err(ConfigError::TurnsOutOfRange(self.turns));
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players) {
            return Err(ConfigError::PlayersOutOfRange(self.players));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_minimal_config() {
        let config = SimConfig::from_yaml_str("turns: 25\n").unwrap();
        assert_eq!(
            config,
            SimConfig {
                turns: 25,
                players: 4,
                seed: None,
            }
        );
    }

    #[test]
    fn test_full_config() {
        let config = SimConfig::from_yaml_str("turns: 8192\nplayers: 2\nseed: 99\n").unwrap();
        assert_eq!(config.turns, 8192);
        assert_eq!(config.players, 2);
        assert_eq!(config.seed, Some(99));
    }

    #[test]
    fn test_turn_bounds() {
        assert!(matches!(
            SimConfig::from_yaml_str("turns: 0"),
            Err(ConfigError::TurnsOutOfRange(0))
        ));
        assert!(matches!(
            SimConfig::from_yaml_str("turns: 8193"),
            Err(ConfigError::TurnsOutOfRange(8193))
        ));
        assert!(SimConfig::from_yaml_str("turns: 1").is_ok());
    }

    #[test]
    fn test_player_bounds() {
        assert!(matches!(
            SimConfig::from_yaml_str("turns: 10\nplayers: 5"),
            Err(ConfigError::PlayersOutOfRange(5))
        ));
        assert!(matches!(
            SimConfig::from_yaml_str("turns: 10\nplayers: 1"),
            Err(ConfigError::PlayersOutOfRange(1))
        ));
    }

    #[test]
    fn test_missing_or_malformed_turns() {
        assert!(matches!(
            SimConfig::from_yaml_str("players: 3"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SimConfig::from_yaml_str("turns: many"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.yaml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "turns: 40").unwrap();
        writeln!(file, "seed: 3").unwrap();

        let config = SimConfig::load(&path).unwrap();
        assert_eq!(config.turns, 40);
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SimConfig::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

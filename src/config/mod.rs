//! # Configuration Management Module
//!
//! All runtime knobs for tinyquest live in a single TOML file. Every section and
//! every field has a default, so a partial file (or no file at all) still yields a
//! playable setup.
//!
//! ## Configuration Structure
//!
//! - [`GameConfig`] - starting stats, navigation mode, scoring rule, rewards
//! - [`StorageConfig`] - catalog directory and leaderboard location
//! - [`LoggingConfig`] - log level and optional log file
//!
//! ## Configuration File Format
//!
//! ```toml
//! [game]
//! player_name = "Player"
//! ask_name = false
//! start_location = "forest"
//! starting_hp = 100
//! starting_gold = 10
//! navigation = "graph"
//! scoring = "progress"
//!
//! [storage]
//! data_dir = "./data"
//! catalog_dir = "./data/catalog"
//! leaderboard_file = "leaderboard.json"
//!
//! [logging]
//! level = "warn"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

use crate::game::{NavigationMode, ScoringRule};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Name recorded on the leaderboard when `ask_name` is off.
    pub player_name: String,
    /// Treat the first line of input as the player's name.
    pub ask_name: bool,
    /// Location id every run starts in (and returns to after permadeath).
    pub start_location: String,
    pub starting_hp: i32,
    pub starting_gold: u32,
    pub navigation: NavigationMode,
    pub scoring: ScoringRule,
    /// Gold granted for each defeated NPC.
    pub kill_gold: u32,
    /// Experience granted for each defeated NPC.
    pub kill_xp: u32,
    /// Fixed seed for reproducible runs; entropy when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            ask_name: false,
            start_location: "forest".to_string(),
            starting_hp: 100,
            starting_gold: 10,
            navigation: NavigationMode::default(),
            scoring: ScoringRule::default(),
            kill_gold: 5,
            kill_xp: 10,
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub catalog_dir: String,
    /// Leaderboard file name, resolved relative to `data_dir`.
    pub leaderboard_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            catalog_dir: "./data/catalog".to_string(),
            leaderboard_file: "leaderboard.json".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn leaderboard_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.leaderboard_file)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Parse the configured level; unknown strings fall back to `Warn`.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Warn)
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}

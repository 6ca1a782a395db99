//! # Tinyquest - a turn-based text adventure engine
//!
//! Tinyquest drives a small adventure: the player walks a graph of locations
//! (or teleports between them), meets NPCs and merchants, fights with d20
//! rolls, trades gold for gear, and leaves a score on a persistent top-ten
//! leaderboard when the run ends. Death is permanent: the run is scored and
//! everything starts over.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tinyquest::config::Config;
//! use tinyquest::game::{spawn_engine, Catalog, GameSession, Leaderboard, RandomDice};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let world = Catalog::load_dir(&config.storage.catalog_dir);
//!     let (board, _) = Leaderboard::load_or_empty(config.storage.leaderboard_path());
//!     let dice = RandomDice::from_seed(config.game.rng_seed);
//!
//!     let session = GameSession::new(config.game, world.catalog, board, dice);
//!     let (engine, _task) = spawn_engine(session);
//!     for line in engine.submit("explore").await?.messages {
//!         println!("{}", line);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - the simulation engine and its session task
//! - [`config`] - TOML configuration
//! - [`validation`] - player name rules and log-safe rendering of input

pub mod config;
pub mod game;
pub mod validation;

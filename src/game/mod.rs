//! # Game Engine
//!
//! The turn-based simulation: world navigation, encounters, d20 combat, the
//! merchant economy, and the scored leaderboard. All mutable state lives in a
//! [`GameSession`]; the component modules are free functions over it.
//!
//! - [`catalog`] - read-only world data loaded from JSON
//! - [`navigation`] - `go` along exits or `travel` by teleport
//! - [`encounter`] - `explore` and arrival encounters
//! - [`combat`] - one d20 exchange per `attack`
//! - [`economy`] - inventory stacks, shops, buy/sell/equip/use
//! - [`leaderboard`] - scoring rules and the persisted top ten
//! - [`session`] - command dispatch, permadeath, status snapshots
//! - [`engine`] - tokio task that owns a session

pub mod catalog;
pub mod combat;
pub mod commands;
pub mod dice;
pub mod economy;
pub mod encounter;
pub mod engine;
pub mod errors;
pub mod leaderboard;
pub mod navigation;
pub mod session;
pub mod types;

pub use catalog::{Catalog, CatalogLoad, CatalogSources};
pub use combat::{CombatOutcome, Strike};
pub use commands::{parse_command, Command};
pub use dice::{Dice, RandomDice, ScriptedDice};
pub use engine::{spawn_engine, EngineHandle};
pub use errors::{GameError, Rejection};
pub use leaderboard::{format_entries, Leaderboard, LeaderboardEntry, ScoringRule, LEADERBOARD_LIMIT};
pub use navigation::NavigationMode;
pub use session::{EndReason, GameOver, GameSession, Outcome, Phase, Status};
pub use types::{Item, ItemKind, ItemStack, Location, Npc, Player, Shop, ShopListing};

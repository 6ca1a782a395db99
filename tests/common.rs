//! Shared helpers for the integration tests.

use std::path::Path;

use tinyquest::config::GameConfig;
use tinyquest::game::{Catalog, CatalogSources, GameSession, Leaderboard, ScriptedDice};

/// A session on the bundled starter world with its leaderboard under `dir`.
#[allow(dead_code)]
pub fn starter_session(dir: &Path, config: GameConfig, dice: ScriptedDice) -> GameSession<ScriptedDice> {
    GameSession::new(
        config,
        Catalog::starter().catalog,
        Leaderboard::empty(dir.join("leaderboard.json")),
        dice,
    )
}

/// A one-room world: a den where `beast` is always waiting.
#[allow(dead_code)]
pub fn arena(beast_hp: i32, beast_attack: i32) -> Catalog {
    let load = Catalog::from_sources(&CatalogSources {
        locations: Some(
            r#"{"den": {"name": "den", "description": "A damp den.",
                        "npcs": ["beast"], "encounter_rate": 1.0, "drop_rate": 0.0}}"#
                .to_string(),
        ),
        items: Some(r#"{"fang": {"name": "fang", "price": 2}}"#.to_string()),
        npcs: Some(format!(
            r#"{{"beast": {{"name": "rat", "hp": {}, "attack": {}, "defense": 1,
                          "responses": ["The rat squeaks."], "drops": ["fang"]}}}}"#,
            beast_hp, beast_attack
        )),
        shops: Some("{}".to_string()),
    });
    assert!(load.warnings.is_empty(), "arena warnings: {:?}", load.warnings);
    load.catalog
}

#[allow(dead_code)]
pub fn arena_config() -> GameConfig {
    GameConfig {
        start_location: "den".to_string(),
        ..GameConfig::default()
    }
}

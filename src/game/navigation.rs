//! World navigation: directional moves along exits, or random teleports.

use serde::{Deserialize, Serialize};

use super::dice::Dice;
use super::encounter;
use super::errors::Rejection;
use super::session::GameSession;

/// How `go` / `travel` pick the next location. A session uses one mode for its
/// whole lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    /// Follow the current location's named exits.
    #[default]
    Graph,
    /// Jump to a uniformly random location; the direction word is flavour.
    Teleport,
}

/// Route a movement command through the configured mode.
pub fn advance<D: Dice>(
    session: &mut GameSession<D>,
    direction: &str,
    out: &mut Vec<String>,
) -> Result<(), Rejection> {
    match session.config.navigation {
        NavigationMode::Graph => go(session, direction, out),
        NavigationMode::Teleport => travel(session, direction, out),
    }
}

/// Move along an exit of the current location. Unknown directions change
/// nothing.
pub fn go<D: Dice>(
    session: &mut GameSession<D>,
    direction: &str,
    out: &mut Vec<String>,
) -> Result<(), Rejection> {
    let dir = direction.trim().to_lowercase();
    if dir.is_empty() {
        return Err(Rejection::MissingArgument("go"));
    }
    let target = session
        .current_location()
        .and_then(|loc| loc.exits.get(&dir))
        .cloned()
        .ok_or(Rejection::NoExit)?;
    arrive(session, target, &format!("You move {} to the", dir), out);
    Ok(())
}

/// Teleport to a random catalog location, possibly the current one.
pub fn travel<D: Dice>(
    session: &mut GameSession<D>,
    direction: &str,
    out: &mut Vec<String>,
) -> Result<(), Rejection> {
    let count = session.catalog.locations.len();
    if count == 0 {
        return Err(Rejection::NoDestinations);
    }
    let index = session.dice.pick(count);
    let target = session
        .catalog
        .locations
        .keys()
        .nth(index)
        .cloned()
        .ok_or(Rejection::NoDestinations)?;
    let dir = direction.trim().to_lowercase();
    let lead = if dir.is_empty() {
        "You travel and arrive at the".to_string()
    } else {
        format!("You travel {} and arrive at the", dir)
    };
    arrive(session, target, &lead, out);
    Ok(())
}

/// Shared arrival: leave any foe or shop behind, count the move, describe the
/// place, then roll for an encounter.
fn arrive<D: Dice>(session: &mut GameSession<D>, target: String, lead: &str, out: &mut Vec<String>) {
    if let Some(npc) = session.current_npc.take() {
        out.push(format!("You slip away from the {}.", npc.name));
    }
    if let Some(shop) = session.current_shop.take() {
        out.push(format!("You leave {}.", shop.name));
    }
    session.location = target;
    session.player.navigation_count += 1;
    if let Some(loc) = session.current_location() {
        out.push(format!("{} {}. {}", lead, loc.name, loc.description));
    }
    encounter::explore(session, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::{Catalog, Leaderboard, ScriptedDice};

    fn session(mode: NavigationMode, dice: ScriptedDice) -> GameSession<ScriptedDice> {
        let config = GameConfig {
            navigation: mode,
            ..GameConfig::default()
        };
        GameSession::new(
            config,
            Catalog::starter().catalog,
            Leaderboard::empty("unused.json"),
            dice,
        )
    }

    #[test]
    fn go_follows_exit_and_counts_move() {
        let mut s = session(NavigationMode::Graph, ScriptedDice::new());
        let mut out = Vec::new();
        go(&mut s, "North", &mut out).unwrap();
        assert_eq!(s.location_id(), "village");
        assert_eq!(s.player().navigation_count, 1);
        assert!(out[0].starts_with("You move north to the village."));
    }

    #[test]
    fn unknown_direction_changes_nothing() {
        let mut s = session(NavigationMode::Graph, ScriptedDice::new());
        let mut out = Vec::new();
        assert_eq!(go(&mut s, "up", &mut out), Err(Rejection::NoExit));
        assert_eq!(go(&mut s, "  ", &mut out), Err(Rejection::MissingArgument("go")));
        assert!(out.is_empty());
        assert_eq!(s.location_id(), "forest");
        assert_eq!(s.player().navigation_count, 0);
    }

    #[test]
    fn teleport_picks_from_catalog() {
        // Keys sort as castle, forest, river, village.
        let mut s = session(NavigationMode::Teleport, ScriptedDice::new().with_picks(&[2]));
        let mut out = Vec::new();
        advance(&mut s, "north", &mut out).unwrap();
        assert_eq!(s.location_id(), "river");
        assert!(out[0].starts_with("You travel north and arrive at the river."));
        assert_eq!(s.player().navigation_count, 1);
    }

    #[test]
    fn teleport_without_locations_is_rejected() {
        let mut s = GameSession::new(
            GameConfig {
                navigation: NavigationMode::Teleport,
                ..GameConfig::default()
            },
            Catalog::default(),
            Leaderboard::empty("unused.json"),
            ScriptedDice::new(),
        );
        let mut out = Vec::new();
        assert_eq!(travel(&mut s, "", &mut out), Err(Rejection::NoDestinations));
    }

    #[test]
    fn moving_leaves_foe_behind() {
        let mut s = session(NavigationMode::Graph, ScriptedDice::new());
        s.current_npc = Some(s.catalog.npcs["wolf"].clone());
        let mut out = Vec::new();
        go(&mut s, "east", &mut out).unwrap();
        assert_eq!(out[0], "You slip away from the wolf.");
        assert!(s.current_npc().is_none());
    }
}

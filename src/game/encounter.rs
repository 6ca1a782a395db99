//! Encounter generation for `explore` and for every arrival.
//!
//! Towns roll once for an NPC, then once for an item, and otherwise send a
//! merchant over; only one of the three happens. Everywhere else the NPC and
//! item rolls are independent, so both can fire on the same call.

use log::debug;

use super::dice::Dice;
use super::economy::{add_item, shop_listing_lines};
use super::navigation::NavigationMode;
use super::session::GameSession;

pub fn explore<D: Dice>(session: &mut GameSession<D>, out: &mut Vec<String>) {
    let Some(loc) = session.current_location() else {
        out.push("There is nothing here to explore.".to_string());
        return;
    };
    let (is_town, encounter_rate, drop_rate) = (loc.is_town, loc.encounter_rate, loc.drop_rate);

    let found = if is_town {
        if session.dice.chance() < encounter_rate {
            spawn_npc(session, out)
        } else if session.dice.chance() < drop_rate {
            spawn_item(session, out)
        } else {
            spawn_merchant(session, out)
        }
    } else {
        let npc = session.dice.chance() < encounter_rate && spawn_npc(session, out);
        let item = session.dice.chance() < drop_rate && spawn_item(session, out);
        npc || item
    };

    if !found {
        out.push("You find nothing of interest.".to_string());
    }
}

/// NPC ids that can appear at the current location. Teleport worlds fall back
/// to the whole catalog when a location lists none.
fn npc_pool<D: Dice>(session: &GameSession<D>) -> Vec<String> {
    let local = session
        .current_location()
        .map(|l| l.npcs.clone())
        .unwrap_or_default();
    if local.is_empty() && session.config.navigation == NavigationMode::Teleport {
        session.catalog.npcs.keys().cloned().collect()
    } else {
        local
    }
}

/// Shop ids a wandering merchant can come from: the location's own shops, or
/// any shop when it lists none.
fn merchant_pool<D: Dice>(session: &GameSession<D>) -> Vec<String> {
    let local = session
        .current_location()
        .map(|l| l.shops.clone())
        .unwrap_or_default();
    if local.is_empty() {
        session.catalog.shops.keys().cloned().collect()
    } else {
        local
    }
}

fn spawn_npc<D: Dice>(session: &mut GameSession<D>, out: &mut Vec<String>) -> bool {
    let pool = npc_pool(session);
    if pool.is_empty() {
        return false;
    }
    let index = session.dice.pick(pool.len());
    let Some(npc) = session.catalog.npcs.get(&pool[index]).cloned() else {
        return false;
    };
    debug!("encounter: npc {} at {}", npc.id, session.location);
    out.push(format!("You encounter a {}. {}", npc.name, npc.greeting()));
    session.engage(npc, out);
    true
}

fn spawn_item<D: Dice>(session: &mut GameSession<D>, out: &mut Vec<String>) -> bool {
    let count = session.catalog.items.len();
    if count == 0 {
        return false;
    }
    let index = session.dice.pick(count);
    let Some(item) = session.catalog.items.values().nth(index).cloned() else {
        return false;
    };
    debug!("encounter: item {} at {}", item.id, session.location);
    out.push(format!("You find a {}.", item.name));
    add_item(&mut session.player, &item, 1);
    true
}

fn spawn_merchant<D: Dice>(session: &mut GameSession<D>, out: &mut Vec<String>) -> bool {
    if session.current_npc.is_some() {
        return false;
    }
    let pool = merchant_pool(session);
    if pool.is_empty() {
        return false;
    }
    let index = session.dice.pick(pool.len());
    let Some(shop) = session.catalog.shops.get(&pool[index]).cloned() else {
        return false;
    };
    out.push(format!("A merchant from {} waves you over. {}", shop.name, shop.description));
    out.extend(shop_listing_lines(&shop));
    session.open_shop(shop);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::{Catalog, Leaderboard, ScriptedDice};

    fn session_at(location: &str, dice: ScriptedDice) -> GameSession<ScriptedDice> {
        let mut s = GameSession::new(
            GameConfig::default(),
            Catalog::starter().catalog,
            Leaderboard::empty("unused.json"),
            dice,
        );
        s.location = location.to_string();
        s
    }

    #[test]
    fn wild_location_can_yield_npc_and_item_together() {
        // forest npcs: [wolf, bandit]; item keys sort bread first.
        let dice = ScriptedDice::new().with_chances(&[0.0, 0.0]).with_picks(&[1, 0]);
        let mut s = session_at("forest", dice);
        let mut out = Vec::new();
        explore(&mut s, &mut out);
        assert_eq!(s.current_npc().unwrap().id, "bandit");
        assert_eq!(s.player().inventory[0].item.id, "bread");
        assert!(out[0].starts_with("You encounter a bandit."));
        assert_eq!(out[1], "You find a bread.");
    }

    #[test]
    fn nothing_happens_when_rolls_miss() {
        let mut s = session_at("forest", ScriptedDice::new());
        let mut out = Vec::new();
        explore(&mut s, &mut out);
        assert_eq!(out, vec!["You find nothing of interest.".to_string()]);
        assert!(s.current_npc().is_none());
        assert!(s.player().inventory.is_empty());
    }

    #[test]
    fn town_outcomes_are_exclusive() {
        // NPC roll hits: the item roll is never taken.
        let dice = ScriptedDice::new().with_chances(&[0.0, 0.0]);
        let mut s = session_at("village", dice);
        let mut out = Vec::new();
        explore(&mut s, &mut out);
        assert_eq!(s.current_npc().unwrap().id, "thief");
        assert!(s.player().inventory.is_empty());
        assert!(s.current_shop().is_none());
    }

    #[test]
    fn town_falls_through_to_merchant() {
        let dice = ScriptedDice::new().with_picks(&[1]);
        let mut s = session_at("village", dice);
        let mut out = Vec::new();
        explore(&mut s, &mut out);
        let shop = s.current_shop().expect("merchant");
        assert_eq!(shop.id, "smithy");
        assert!(out[0].starts_with("A merchant from the smithy waves you over."));
        assert!(out.iter().any(|l| l == "iron sword: 30 gold"));
    }

    #[test]
    fn town_npc_roll_with_empty_pool_finds_nothing() {
        let dice = ScriptedDice::new().with_chances(&[0.0, 0.0]);
        let mut s = session_at("village", dice);
        s.catalog.locations.get_mut("village").unwrap().npcs.clear();
        let mut out = Vec::new();
        explore(&mut s, &mut out);
        assert_eq!(out, vec!["You find nothing of interest.".to_string()]);
        assert!(s.current_npc().is_none());
        assert!(s.player().inventory.is_empty());
        assert!(s.current_shop().is_none());
    }

    #[test]
    fn spawned_npc_is_a_working_copy() {
        let dice = ScriptedDice::new().with_chances(&[0.0]);
        let mut s = session_at("forest", dice);
        let mut out = Vec::new();
        explore(&mut s, &mut out);
        s.current_npc.as_mut().unwrap().hp = 1;
        assert_eq!(s.catalog().npcs["wolf"].hp, 12);
    }

    #[test]
    fn empty_catalog_finds_nothing() {
        let mut s = GameSession::new(
            GameConfig::default(),
            Catalog::default(),
            Leaderboard::empty("unused.json"),
            ScriptedDice::new().with_chances(&[0.0, 0.0]),
        );
        let mut out = Vec::new();
        explore(&mut s, &mut out);
        assert_eq!(out, vec!["There is nothing here to explore.".to_string()]);
    }
}

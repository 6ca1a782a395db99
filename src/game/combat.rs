//! d20 combat against the active NPC.
//!
//! Each `attack` command is one exchange: the player's strike, then (if the
//! NPC is still standing) one counter-strike. Both strikes use the same rules:
//!
//! - natural 1: the attacker fumbles and takes 1 damage
//! - natural 20: the defender takes 10 damage whatever it rolled
//! - otherwise `roll + attack` against `roll + defense`, damage is the margin

use log::debug;

use super::dice::Dice;
use super::economy::add_item;
use super::errors::Rejection;
use super::session::GameSession;
use super::types::Npc;

pub const FUMBLE_DAMAGE: i32 = 1;
pub const CRITICAL_DAMAGE: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strike {
    Fumble,
    Critical,
    Hit(i32),
    Miss,
}

/// Resolve one strike from the raw rolls and modifiers.
pub fn resolve_strike(attack_roll: i32, attack_mod: i32, defense_roll: i32, defense_mod: i32) -> Strike {
    match attack_roll {
        1 => Strike::Fumble,
        20 => Strike::Critical,
        _ => {
            let margin = (attack_roll + attack_mod) - (defense_roll + defense_mod);
            if margin > 0 {
                Strike::Hit(margin)
            } else {
                Strike::Miss
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatOutcome {
    /// Both sides are still standing.
    Continue,
    /// The NPC fell; carries its final state.
    NpcDefeated(Npc),
    /// The player fell; the session takes over from here.
    PlayerDefeated,
}

pub fn attack<D: Dice>(
    session: &mut GameSession<D>,
    target: &str,
    out: &mut Vec<String>,
) -> Result<CombatOutcome, Rejection> {
    if let Some(shop) = &session.current_shop {
        return Err(Rejection::InShop(shop.name.clone()));
    }
    let npc = session.current_npc.as_mut().ok_or(Rejection::NoTarget)?;
    let target = target.trim();
    if !target.is_empty() && !npc.answers_to(target) {
        return Err(Rejection::WrongTarget(target.to_string()));
    }
    let player = &mut session.player;
    let dice = &mut session.dice;

    let player_roll = dice.d20();
    let npc_roll = dice.d20();
    debug!("combat: player {} vs {} {}", player_roll, npc.id, npc_roll);
    out.push(format!("You roll a {} to attack.", player_roll));
    out.push(format!("The {} rolls a {} to defend.", npc.name, npc_roll));
    match resolve_strike(player_roll, player.attack, npc_roll, npc.defense) {
        Strike::Fumble => {
            player.take_damage(FUMBLE_DAMAGE);
            out.push(format!("You fumble and hurt yourself for {} damage.", FUMBLE_DAMAGE));
        }
        Strike::Critical => {
            npc.hp -= CRITICAL_DAMAGE;
            out.push(format!(
                "Critical hit! You deal {} damage to the {}.",
                CRITICAL_DAMAGE, npc.name
            ));
        }
        Strike::Hit(damage) => {
            npc.hp -= damage;
            out.push(format!("You hit the {} for {} damage.", npc.name, damage));
        }
        Strike::Miss => out.push(format!("You miss the {}.", npc.name)),
    }

    if player.is_dead() {
        return Ok(CombatOutcome::PlayerDefeated);
    }
    if npc.is_defeated() {
        return Ok(defeat(session, out));
    }

    let counter_roll = dice.d20();
    let guard_roll = dice.d20();
    out.push(format!("The {} rolls a {} to attack.", npc.name, counter_roll));
    out.push(format!("You roll a {} to defend.", guard_roll));
    match resolve_strike(counter_roll, npc.attack, guard_roll, player.defense) {
        Strike::Fumble => {
            npc.hp -= FUMBLE_DAMAGE;
            out.push(format!(
                "The {} stumbles and hurts itself for {} damage.",
                npc.name, FUMBLE_DAMAGE
            ));
        }
        Strike::Critical => {
            player.take_damage(CRITICAL_DAMAGE);
            out.push(format!(
                "The {} lands a critical hit for {} damage!",
                npc.name, CRITICAL_DAMAGE
            ));
        }
        Strike::Hit(damage) => {
            player.take_damage(damage);
            out.push(format!("The {} hits you for {} damage.", npc.name, damage));
        }
        Strike::Miss => out.push(format!("The {} misses you.", npc.name)),
    }

    if player.is_dead() {
        Ok(CombatOutcome::PlayerDefeated)
    } else if npc.is_defeated() {
        Ok(defeat(session, out))
    } else {
        Ok(CombatOutcome::Continue)
    }
}

/// Clear the NPC and pay out the reward, exactly once per defeat.
fn defeat<D: Dice>(session: &mut GameSession<D>, out: &mut Vec<String>) -> CombatOutcome {
    let Some(npc) = session.current_npc.take() else {
        return CombatOutcome::Continue;
    };
    let (gold, xp) = (session.config.kill_gold, session.config.kill_xp);
    let player = &mut session.player;
    player.gold = player.gold.saturating_add(gold);
    player.kills += 1;
    out.push(format!("You have defeated the {}.", npc.name));
    out.push(format!(
        "You find {} gold on the {} and gain {} XP.",
        gold, npc.name, xp
    ));
    for id in &npc.drops {
        if let Some(item) = session.catalog.items.get(id) {
            add_item(player, item, 1);
            out.push(format!("The {} dropped a {}.", npc.name, item.name));
        }
    }
    if let Some(level) = player.gain_xp(xp) {
        out.push(format!("You leveled up! You are now level {}.", level));
    }
    CombatOutcome::NpcDefeated(npc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::{Catalog, Leaderboard, ScriptedDice};

    fn session_facing(npc_id: &str, hp: i32, dice: ScriptedDice) -> GameSession<ScriptedDice> {
        let mut s = GameSession::new(
            GameConfig::default(),
            Catalog::starter().catalog,
            Leaderboard::empty("unused.json"),
            dice,
        );
        let mut npc = s.catalog.npcs[npc_id].clone();
        npc.hp = hp;
        s.current_npc = Some(npc);
        s
    }

    #[test]
    fn strike_rules() {
        assert_eq!(resolve_strike(20, 0, 20, 50), Strike::Critical);
        assert_eq!(resolve_strike(1, 50, 1, 0), Strike::Fumble);
        assert_eq!(resolve_strike(15, 1, 9, 1), Strike::Hit(6));
        assert_eq!(resolve_strike(9, 1, 9, 1), Strike::Miss);
        assert_eq!(resolve_strike(5, 1, 12, 1), Strike::Miss);
    }

    #[test]
    fn critical_defeats_weak_npc_and_pays_once() {
        let mut s = session_facing("wolf", 5, ScriptedDice::new().with_rolls(&[20, 19]));
        let mut out = Vec::new();
        let outcome = attack(&mut s, "wolf", &mut out).unwrap();
        match outcome {
            CombatOutcome::NpcDefeated(npc) => assert_eq!(npc.hp, -5),
            other => panic!("unexpected {:?}", other),
        }
        assert!(s.current_npc().is_none());
        assert_eq!(s.player().gold, 15);
        assert_eq!(s.player().xp, 10);
        assert_eq!(s.player().kills, 1);
        assert_eq!(s.player().inventory[0].item.id, "wolf_pelt");
        assert!(out.contains(&"You have defeated the wolf.".to_string()));
        // No counter-attack after a defeat.
        assert!(!out.iter().any(|l| l.contains("to attack.") && l.starts_with("The")));
        assert_eq!(attack(&mut s, "", &mut out), Err(Rejection::NoTarget));
        assert_eq!(s.player().gold, 15);
    }

    #[test]
    fn fumble_hurts_only_the_player() {
        // Player fumbles, wolf counter misses (10+1 vs 10+1).
        let mut s = session_facing("wolf", 12, ScriptedDice::new().with_rolls(&[1, 20, 10, 10]));
        let mut out = Vec::new();
        assert_eq!(attack(&mut s, "", &mut out), Ok(CombatOutcome::Continue));
        assert_eq!(s.player().hp, 99);
        assert_eq!(s.current_npc().unwrap().hp, 12);
        assert_eq!(out.last().unwrap(), "The wolf misses you.");
    }

    #[test]
    fn margin_hit_then_counter_hit() {
        let mut s = session_facing("wolf", 12, ScriptedDice::new().with_rolls(&[15, 5, 14, 4]));
        let mut out = Vec::new();
        assert_eq!(attack(&mut s, "WOLF", &mut out), Ok(CombatOutcome::Continue));
        assert_eq!(s.current_npc().unwrap().hp, 2);
        assert_eq!(s.player().hp, 90);
    }

    #[test]
    fn npc_critical_can_kill_the_player() {
        let mut s = session_facing("troll", 30, ScriptedDice::new().with_rolls(&[2, 10, 20, 1]));
        s.player.hp = 7;
        let mut out = Vec::new();
        assert_eq!(attack(&mut s, "", &mut out), Ok(CombatOutcome::PlayerDefeated));
        assert_eq!(s.player().hp, 0);
    }

    #[test]
    fn attack_rejections_leave_state_alone() {
        let mut s = session_facing("bandit", 20, ScriptedDice::new());
        let mut out = Vec::new();
        assert_eq!(
            attack(&mut s, "dragon", &mut out),
            Err(Rejection::WrongTarget("dragon".to_string()))
        );
        let shop = s.catalog.shops["smithy"].clone();
        s.current_npc = None;
        s.open_shop(shop);
        assert_eq!(
            attack(&mut s, "", &mut out),
            Err(Rejection::InShop("the smithy".to_string()))
        );
        assert!(out.is_empty());
        assert_eq!(s.player().hp, 100);
    }

    #[test]
    fn level_up_after_enough_kills() {
        let mut s = session_facing("wolf", 1, ScriptedDice::new().with_rolls(&[20, 1]));
        s.player.xp = 95;
        let mut out = Vec::new();
        attack(&mut s, "", &mut out).unwrap();
        assert_eq!(s.player().level, 2);
        assert_eq!(s.player().xp, 0);
        assert_eq!(out.last().unwrap(), "You leveled up! You are now level 2.");
    }
}

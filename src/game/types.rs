//! Core data model: the player, catalog entities, and inventory stacks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// XP needed per level before the next level-up (`xp >= level * XP_PER_LEVEL`).
pub const XP_PER_LEVEL: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Weapon,
    Armor,
    Consumable,
    #[default]
    Misc,
}

impl ItemKind {
    pub fn is_equipable(self) -> bool {
        matches!(self, ItemKind::Weapon | ItemKind::Armor)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStats {
    #[serde(default)]
    pub attack: i32,
    #[serde(default)]
    pub defense: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEffect {
    #[serde(default)]
    pub hp_restore: i32,
}

/// Catalog item template. Inventory stacks hold their own copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub stats: ItemStats,
    pub effect: ItemEffect,
    /// Base price in gold; also what a merchant pays when the item is sold.
    pub price: u32,
}

impl Item {
    /// A plain `misc` item for wares that have no catalog entry.
    pub fn misc(name: &str, price: u32) -> Self {
        Item {
            id: name.to_lowercase().replace(' ', "_"),
            name: name.to_string(),
            kind: ItemKind::Misc,
            stats: ItemStats::default(),
            effect: ItemEffect::default(),
            price,
        }
    }

    /// Case-insensitive match against the display name or the catalog id.
    pub fn answers_to(&self, query: &str) -> bool {
        self.name.eq_ignore_ascii_case(query) || self.id.eq_ignore_ascii_case(query)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub description: String,
    /// direction -> location id; empty in teleport worlds.
    pub exits: BTreeMap<String, String>,
    /// NPC ids that may be encountered here.
    pub npcs: Vec<String>,
    /// Shop ids that trade here.
    pub shops: Vec<String>,
    pub is_town: bool,
    pub encounter_rate: f64,
    pub drop_rate: f64,
}

/// An NPC. Catalog entries are templates; an encounter works on a clone so
/// damage never leaks back into the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Npc {
    pub id: String,
    pub name: String,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub responses: Vec<String>,
    /// Item ids released on defeat.
    pub drops: Vec<String>,
}

impl Npc {
    pub fn greeting(&self) -> &str {
        self.responses
            .first()
            .map(String::as_str)
            .unwrap_or("It regards you warily.")
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    pub fn answers_to(&self, query: &str) -> bool {
        self.name.eq_ignore_ascii_case(query) || self.id.eq_ignore_ascii_case(query)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopListing {
    pub item: Item,
    pub price: u32,
    /// Remaining units; `None` means unlimited.
    pub stock: Option<u32>,
}

impl ShopListing {
    pub fn in_stock(&self) -> bool {
        self.stock.map_or(true, |q| q > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: String,
    pub name: String,
    pub description: String,
    pub listings: Vec<ShopListing>,
}

impl Shop {
    pub fn listing(&self, query: &str) -> Option<&ShopListing> {
        self.listings.iter().find(|l| l.item.answers_to(query))
    }

    pub fn listing_mut(&mut self, query: &str) -> Option<&mut ShopListing> {
        self.listings.iter_mut().find(|l| l.item.answers_to(query))
    }

    pub fn answers_to(&self, query: &str) -> bool {
        self.name.eq_ignore_ascii_case(query) || self.id.eq_ignore_ascii_case(query)
    }
}

/// One inventory line: an item copy plus how many of it the player carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: Item,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub gold: u32,
    pub inventory: Vec<ItemStack>,
    pub kills: u32,
    pub xp: u32,
    pub level: u32,
    pub navigation_count: u32,
}

impl Player {
    pub fn new(name: &str, hp: i32, gold: u32) -> Self {
        Player {
            name: name.to_string(),
            hp,
            attack: 1,
            defense: 1,
            gold,
            inventory: Vec::new(),
            kills: 0,
            xp: 0,
            level: 1,
            navigation_count: 0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Apply damage; hp never drops below zero.
    pub fn take_damage(&mut self, amount: i32) {
        self.hp = (self.hp - amount).max(0);
    }

    /// Add experience and run the level-up check. Returns the new level when
    /// the threshold was crossed.
    pub fn gain_xp(&mut self, amount: u32) -> Option<u32> {
        self.xp = self.xp.saturating_add(amount);
        if self.xp >= self.level.saturating_mul(XP_PER_LEVEL) {
            self.level += 1;
            self.xp = 0;
            Some(self.level)
        } else {
            None
        }
    }

    pub fn total_item_quantity(&self) -> u64 {
        self.inventory.iter().map(|s| u64::from(s.quantity)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_clamps_at_zero() {
        let mut p = Player::new("t", 5, 10);
        p.take_damage(12);
        assert_eq!(p.hp, 0);
        assert!(p.is_dead());
    }

    #[test]
    fn level_up_resets_xp() {
        let mut p = Player::new("t", 100, 10);
        for _ in 0..9 {
            assert_eq!(p.gain_xp(10), None);
        }
        assert_eq!(p.gain_xp(10), Some(2));
        assert_eq!(p.xp, 0);
        // Level 2 needs 200.
        assert_eq!(p.gain_xp(150), None);
        assert_eq!(p.gain_xp(50), Some(3));
    }

    #[test]
    fn item_matching_ignores_case() {
        let item = Item::misc("Old Coin", 3);
        assert_eq!(item.id, "old_coin");
        assert!(item.answers_to("old coin"));
        assert!(item.answers_to("OLD_COIN"));
        assert!(!item.answers_to("coin"));
    }

    #[test]
    fn npc_greeting_falls_back() {
        let npc = Npc {
            id: "rat".into(),
            name: "Rat".into(),
            hp: 3,
            attack: 1,
            defense: 1,
            responses: vec![],
            drops: vec![],
        };
        assert_eq!(npc.greeting(), "It regards you warily.");
    }
}

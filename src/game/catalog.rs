//! Catalog loaders for data-driven world content.
//!
//! Four JSON files in the catalog directory describe the world: `locations.json`,
//! `items.json`, `npcs.json` and `shops.json`. Each file may be either an object
//! keyed by id or an array of records carrying their own `id` (or `name`).
//!
//! Loading never fails. A missing or unparsable file becomes an empty collection,
//! a record with missing/ill-typed fields is skipped, and references to unknown
//! ids are dropped. Every such problem is logged and returned as a warning line.

use log::warn;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::errors::GameError;
use super::types::{Item, ItemEffect, ItemKind, ItemStats, Location, Npc, Shop, ShopListing};

pub const LOCATIONS_FILE: &str = "locations.json";
pub const ITEMS_FILE: &str = "items.json";
pub const NPCS_FILE: &str = "npcs.json";
pub const SHOPS_FILE: &str = "shops.json";

const STARTER_LOCATIONS: &str = include_str!("../../data/catalog/locations.json");
const STARTER_ITEMS: &str = include_str!("../../data/catalog/items.json");
const STARTER_NPCS: &str = include_str!("../../data/catalog/npcs.json");
const STARTER_SHOPS: &str = include_str!("../../data/catalog/shops.json");

const DEFAULT_ENCOUNTER_RATE: f64 = 0.4;
const DEFAULT_DROP_RATE: f64 = 0.1;

/// Read-only world definitions, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub locations: BTreeMap<String, Location>,
    pub items: BTreeMap<String, Item>,
    pub npcs: BTreeMap<String, Npc>,
    pub shops: BTreeMap<String, Shop>,
}

/// A loaded catalog plus every data-integrity warning raised while building it.
#[derive(Debug, Clone, Default)]
pub struct CatalogLoad {
    pub catalog: Catalog,
    pub warnings: Vec<String>,
}

/// Raw file contents; `None` marks a file that does not exist.
#[derive(Debug, Clone, Default)]
pub struct CatalogSources {
    pub locations: Option<String>,
    pub items: Option<String>,
    pub npcs: Option<String>,
    pub shops: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocationSeed {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    description: String,
    #[serde(default)]
    exits: BTreeMap<String, String>,
    #[serde(default)]
    npcs: Vec<String>,
    #[serde(default)]
    shops: Vec<String>,
    #[serde(default)]
    is_town: bool,
    #[serde(default = "default_encounter_rate")]
    encounter_rate: f64,
    #[serde(default = "default_drop_rate")]
    drop_rate: f64,
}

#[derive(Debug, Deserialize)]
struct ItemSeed {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    kind: ItemKind,
    #[serde(default)]
    stats: ItemStats,
    #[serde(default)]
    effect: ItemEffect,
    #[serde(default)]
    price: u32,
}

#[derive(Debug, Deserialize)]
struct NpcSeed {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(alias = "health")]
    hp: i32,
    #[serde(default = "default_modifier")]
    attack: i32,
    #[serde(default = "default_modifier")]
    defense: i32,
    #[serde(default)]
    responses: Vec<String>,
    #[serde(default, alias = "drop_table")]
    drops: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ShopSeed {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    items: BTreeMap<String, ListingSeed>,
}

#[derive(Debug, Deserialize)]
struct ListingSeed {
    price: u32,
    #[serde(default)]
    stock: Option<u32>,
}

fn default_encounter_rate() -> f64 {
    DEFAULT_ENCOUNTER_RATE
}

fn default_drop_rate() -> f64 {
    DEFAULT_DROP_RATE
}

fn default_modifier() -> i32 {
    1
}

fn note(warnings: &mut Vec<String>, msg: String) {
    warn!("catalog: {}", msg);
    warnings.push(msg);
}

/// Split a catalog file into `(map key, record)` pairs, skipping records that do
/// not deserialize.
fn parse_records<S: DeserializeOwned>(
    file: &str,
    text: Option<&str>,
    warnings: &mut Vec<String>,
) -> Vec<(Option<String>, S)> {
    let Some(text) = text else {
        note(warnings, format!("{} not found; using an empty collection", file));
        return Vec::new();
    };
    if text.trim().is_empty() {
        note(warnings, format!("{} is empty; using an empty collection", file));
        return Vec::new();
    }
    let raw: Vec<(Option<String>, Value)> = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map.into_iter().map(|(k, v)| (Some(k), v)).collect(),
        Ok(Value::Array(list)) => list.into_iter().map(|v| (None, v)).collect(),
        Ok(_) => {
            note(
                warnings,
                format!("{} must hold an object or an array; ignoring it", file),
            );
            return Vec::new();
        }
        Err(e) => {
            note(warnings, format!("{} is malformed ({}); ignoring it", file, e));
            return Vec::new();
        }
    };
    raw.into_iter()
        .enumerate()
        .filter_map(|(i, (key, value))| {
            let label = key.clone().unwrap_or_else(|| format!("#{}", i));
            match serde_json::from_value::<S>(value) {
                Ok(seed) => Some((key, seed)),
                Err(e) => {
                    note(warnings, format!("{} record {} skipped: {}", file, label, e));
                    None
                }
            }
        })
        .collect()
}

/// Pick a record id: map key first, then the explicit `id`, then the `name`.
fn record_id(key: Option<String>, id: &Option<String>, name: &Option<String>) -> Option<String> {
    key.or_else(|| id.clone())
        .or_else(|| name.clone())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn clamp_rate(file: &str, id: &str, field: &str, rate: f64, warnings: &mut Vec<String>) -> f64 {
    if rate.is_finite() && (0.0..=1.0).contains(&rate) {
        return rate;
    }
    let fixed = if rate.is_finite() { rate.clamp(0.0, 1.0) } else { 0.0 };
    note(
        warnings,
        format!("{} {}: {} {} out of range; using {}", file, id, field, rate, fixed),
    );
    fixed
}

impl Catalog {
    /// Load all four catalog files from `dir`.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> CatalogLoad {
        let dir = dir.as_ref();
        let mut read_warnings = Vec::new();
        let mut read = |file: &str| match fs::read_to_string(dir.join(file)) {
            Ok(s) => Some(s),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                note(&mut read_warnings, format!("{} unreadable: {}", file, e));
                Some(String::new())
            }
        };
        let sources = CatalogSources {
            locations: read(LOCATIONS_FILE),
            items: read(ITEMS_FILE),
            npcs: read(NPCS_FILE),
            shops: read(SHOPS_FILE),
        };
        let mut load = Catalog::from_sources(&sources);
        read_warnings.append(&mut load.warnings);
        load.warnings = read_warnings;
        load
    }

    /// The bundled starter world.
    pub fn starter() -> CatalogLoad {
        Catalog::from_sources(&CatalogSources {
            locations: Some(STARTER_LOCATIONS.to_string()),
            items: Some(STARTER_ITEMS.to_string()),
            npcs: Some(STARTER_NPCS.to_string()),
            shops: Some(STARTER_SHOPS.to_string()),
        })
    }

    /// Write the starter world into `dir`, leaving existing files untouched.
    /// Returns the names of files that were written.
    pub fn write_starter<P: AsRef<Path>>(dir: P) -> Result<Vec<&'static str>, GameError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let mut written = Vec::new();
        for (file, body) in [
            (LOCATIONS_FILE, STARTER_LOCATIONS),
            (ITEMS_FILE, STARTER_ITEMS),
            (NPCS_FILE, STARTER_NPCS),
            (SHOPS_FILE, STARTER_SHOPS),
        ] {
            let path = dir.join(file);
            if path.exists() {
                continue;
            }
            fs::write(&path, body)?;
            written.push(file);
        }
        Ok(written)
    }

    /// Build a catalog from raw JSON sources, validating records and cross
    /// references.
    pub fn from_sources(sources: &CatalogSources) -> CatalogLoad {
        let mut warnings = Vec::new();
        let mut catalog = Catalog::default();

        for (key, seed) in parse_records::<ItemSeed>(ITEMS_FILE, sources.items.as_deref(), &mut warnings) {
            let Some(id) = record_id(key, &seed.id, &seed.name) else {
                note(&mut warnings, format!("{} record without id or name skipped", ITEMS_FILE));
                continue;
            };
            let name = seed.name.clone().unwrap_or_else(|| id.replace('_', " "));
            catalog.items.insert(
                id.clone(),
                Item {
                    id,
                    name,
                    kind: seed.kind,
                    stats: seed.stats,
                    effect: seed.effect,
                    price: seed.price,
                },
            );
        }

        for (key, seed) in parse_records::<NpcSeed>(NPCS_FILE, sources.npcs.as_deref(), &mut warnings) {
            let Some(id) = record_id(key, &seed.id, &seed.name) else {
                note(&mut warnings, format!("{} record without id or name skipped", NPCS_FILE));
                continue;
            };
            if seed.hp <= 0 {
                note(&mut warnings, format!("{} {} has no health; skipped", NPCS_FILE, id));
                continue;
            }
            let mut drops = Vec::with_capacity(seed.drops.len());
            for drop in seed.drops {
                if catalog.items.contains_key(&drop) {
                    drops.push(drop);
                } else {
                    note(
                        &mut warnings,
                        format!("{} {}: unknown drop item {} removed", NPCS_FILE, id, drop),
                    );
                }
            }
            let name = seed.name.unwrap_or_else(|| id.clone());
            catalog.npcs.insert(
                id.clone(),
                Npc {
                    id,
                    name,
                    hp: seed.hp,
                    attack: seed.attack,
                    defense: seed.defense,
                    responses: seed.responses,
                    drops,
                },
            );
        }

        for (key, seed) in parse_records::<ShopSeed>(SHOPS_FILE, sources.shops.as_deref(), &mut warnings) {
            let Some(id) = record_id(key, &seed.id, &seed.name) else {
                note(&mut warnings, format!("{} record without id or name skipped", SHOPS_FILE));
                continue;
            };
            let listings = seed
                .items
                .into_iter()
                .map(|(item_key, listing)| {
                    let item = catalog
                        .find_item(&item_key)
                        .cloned()
                        .unwrap_or_else(|| Item::misc(&item_key, listing.price));
                    ShopListing {
                        item,
                        price: listing.price,
                        stock: listing.stock,
                    }
                })
                .collect();
            let name = seed.name.unwrap_or_else(|| id.clone());
            catalog.shops.insert(
                id.clone(),
                Shop {
                    id,
                    name,
                    description: seed.description,
                    listings,
                },
            );
        }

        let seeds = parse_records::<LocationSeed>(
            LOCATIONS_FILE,
            sources.locations.as_deref(),
            &mut warnings,
        );
        let mut pending = Vec::with_capacity(seeds.len());
        for (key, seed) in seeds {
            match record_id(key, &seed.id, &seed.name) {
                Some(id) => pending.push((id, seed)),
                None => note(
                    &mut warnings,
                    format!("{} record without id or name skipped", LOCATIONS_FILE),
                ),
            }
        }
        let known: Vec<String> = pending.iter().map(|(id, _)| id.clone()).collect();
        for (id, seed) in pending {
            let mut exits = BTreeMap::new();
            for (dir, target) in seed.exits {
                if known.contains(&target) {
                    exits.insert(dir.to_lowercase(), target);
                } else {
                    note(
                        &mut warnings,
                        format!("{} {}: exit {} leads to unknown {}; removed", LOCATIONS_FILE, id, dir, target),
                    );
                }
            }
            let npcs = seed
                .npcs
                .into_iter()
                .filter(|n| {
                    let ok = catalog.npcs.contains_key(n);
                    if !ok {
                        note(&mut warnings, format!("{} {}: unknown npc {} removed", LOCATIONS_FILE, id, n));
                    }
                    ok
                })
                .collect();
            let shops = seed
                .shops
                .into_iter()
                .filter(|s| {
                    let ok = catalog.shops.contains_key(s);
                    if !ok {
                        note(&mut warnings, format!("{} {}: unknown shop {} removed", LOCATIONS_FILE, id, s));
                    }
                    ok
                })
                .collect();
            let encounter_rate = clamp_rate(LOCATIONS_FILE, &id, "encounter_rate", seed.encounter_rate, &mut warnings);
            let drop_rate = clamp_rate(LOCATIONS_FILE, &id, "drop_rate", seed.drop_rate, &mut warnings);
            let name = seed.name.unwrap_or_else(|| id.clone());
            catalog.locations.insert(
                id.clone(),
                Location {
                    id,
                    name,
                    description: seed.description,
                    exits,
                    npcs,
                    shops,
                    is_town: seed.is_town,
                    encounter_rate,
                    drop_rate,
                },
            );
        }

        CatalogLoad { catalog, warnings }
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    /// Look up an item by id, then by case-insensitive name.
    pub fn find_item(&self, query: &str) -> Option<&Item> {
        self.items
            .get(query)
            .or_else(|| self.items.values().find(|i| i.answers_to(query)))
    }

    /// Look up a shop by id, then by case-insensitive name.
    pub fn find_shop(&self, query: &str) -> Option<&Shop> {
        self.shops
            .get(query)
            .or_else(|| self.shops.values().find(|s| s.answers_to(query)))
    }
}

//! Inventory and merchant economy.
//!
//! The inventory is a list of quantity stacks, one per distinct item. Every
//! operation validates first and mutates last, so a rejected command leaves
//! gold, hp, stock and inventory exactly as they were.

use super::dice::Dice;
use super::errors::Rejection;
use super::session::GameSession;
use super::types::{Item, ItemKind, ItemStack, Player, Shop};

/// Add `quantity` of `item`, merging with an existing stack of the same item.
/// A merged stack keeps the lower of the two prices.
pub fn add_item(player: &mut Player, item: &Item, quantity: u32) {
    if quantity == 0 {
        return;
    }
    match player
        .inventory
        .iter_mut()
        .find(|s| s.item.id == item.id || s.item.name.eq_ignore_ascii_case(&item.name))
    {
        Some(stack) => {
            stack.quantity = stack.quantity.saturating_add(quantity);
            stack.item.price = stack.item.price.min(item.price);
        }
        None => player.inventory.push(ItemStack {
            item: item.clone(),
            quantity,
        }),
    }
}

/// Index of the stack answering to `query` (name or id, any case).
pub fn find_stack(player: &Player, query: &str) -> Option<usize> {
    player
        .inventory
        .iter()
        .position(|s| s.quantity > 0 && s.item.answers_to(query))
}

/// Take one unit off the stack at `index`, dropping the stack when it empties.
fn remove_one(player: &mut Player, index: usize) -> Item {
    let stack = &mut player.inventory[index];
    stack.quantity -= 1;
    let item = stack.item.clone();
    if stack.quantity == 0 {
        player.inventory.remove(index);
    }
    item
}

pub fn format_inventory(player: &Player) -> String {
    if player.inventory.is_empty() {
        return "Your inventory is empty.".to_string();
    }
    let parts: Vec<String> = player
        .inventory
        .iter()
        .map(|s| format!("{} ({})", s.item.name, s.quantity))
        .collect();
    format!("Inventory: {}", parts.join(", "))
}

/// One `name: price gold` line per listing.
pub fn shop_listing_lines(shop: &Shop) -> Vec<String> {
    if shop.listings.is_empty() {
        return vec!["The shelves are bare.".to_string()];
    }
    shop.listings
        .iter()
        .map(|l| match l.stock {
            Some(0) => format!("{}: {} gold (sold out)", l.item.name, l.price),
            Some(n) => format!("{}: {} gold ({} left)", l.item.name, l.price, n),
            None => format!("{}: {} gold", l.item.name, l.price),
        })
        .collect()
}

fn required<'a>(arg: &'a str, verb: &'static str) -> Result<&'a str, Rejection> {
    let arg = arg.trim();
    if arg.is_empty() {
        Err(Rejection::MissingArgument(verb))
    } else {
        Ok(arg)
    }
}

pub fn buy<D: Dice>(
    session: &mut GameSession<D>,
    query: &str,
    out: &mut Vec<String>,
) -> Result<(), Rejection> {
    let query = required(query, "buy")?;
    let shop = session
        .current_shop
        .as_mut()
        .ok_or(Rejection::NoMerchantToBuy)?;
    let listing = shop.listing_mut(query).ok_or(Rejection::NotInShop)?;
    if !listing.in_stock() {
        return Err(Rejection::SoldOut(listing.item.name.clone()));
    }
    if session.player.gold < listing.price {
        return Err(Rejection::InsufficientGold);
    }

    session.player.gold -= listing.price;
    if let Some(stock) = listing.stock.as_mut() {
        *stock -= 1;
    }
    // The carried copy remembers what was paid for it.
    let mut bought = listing.item.clone();
    bought.price = listing.price;
    add_item(&mut session.player, &bought, 1);
    out.push(format!(
        "You buy the {} for {} gold.",
        listing.item.name, listing.price
    ));
    Ok(())
}

pub fn sell<D: Dice>(
    session: &mut GameSession<D>,
    query: &str,
    out: &mut Vec<String>,
) -> Result<(), Rejection> {
    let query = required(query, "sell")?;
    let shop = session
        .current_shop
        .as_mut()
        .ok_or(Rejection::NoMerchantToSell)?;
    let index = find_stack(&session.player, query).ok_or(Rejection::NotCarried)?;

    let item = remove_one(&mut session.player, index);
    let mut value = item.price;
    // Selling restocks a finite listing of the same item, and never pays more
    // than the merchant asks for it.
    if let Some(listing) = shop.listing_mut(&item.name) {
        value = value.min(listing.price);
        if let Some(stock) = listing.stock.as_mut() {
            *stock += 1;
        }
    }
    session.player.gold = session.player.gold.saturating_add(value);
    out.push(format!("You sell the {} for {} gold.", item.name, value));
    Ok(())
}

/// Equipping is permanent and stacks: every equip adds the item's bonuses
/// again, and the item stays in the inventory.
pub fn equip<D: Dice>(
    session: &mut GameSession<D>,
    query: &str,
    out: &mut Vec<String>,
) -> Result<(), Rejection> {
    let query = required(query, "equip")?;
    let index = find_stack(&session.player, query).ok_or(Rejection::NotCarried)?;
    let item = &session.player.inventory[index].item;
    if !item.kind.is_equipable() {
        return Err(Rejection::NotEquipable(item.name.clone()));
    }
    let (name, stats) = (item.name.clone(), item.stats);

    let player = &mut session.player;
    player.attack += stats.attack;
    player.defense += stats.defense;
    out.push(format!(
        "You equip the {}. Attack {}, defense {}.",
        name, player.attack, player.defense
    ));
    Ok(())
}

pub fn use_item<D: Dice>(
    session: &mut GameSession<D>,
    query: &str,
    out: &mut Vec<String>,
) -> Result<(), Rejection> {
    let query = required(query, "use")?;
    let index = find_stack(&session.player, query).ok_or(Rejection::NotCarried)?;
    let item = &session.player.inventory[index].item;
    if item.kind != ItemKind::Consumable || item.effect.hp_restore <= 0 {
        return Err(Rejection::NotUsable(item.name.clone()));
    }

    let item = remove_one(&mut session.player, index);
    // No upper bound on hp.
    session.player.hp = session.player.hp.saturating_add(item.effect.hp_restore);
    out.push(format!(
        "You use the {} and restore {} HP. You now have {} HP.",
        item.name, item.effect.hp_restore, session.player.hp
    ));
    Ok(())
}

/// List the active merchant's wares. `who` may name the shop, or be empty or
/// the word `merchant`.
pub fn trade<D: Dice>(
    session: &mut GameSession<D>,
    who: &str,
    out: &mut Vec<String>,
) -> Result<(), Rejection> {
    let shop = session.current_shop.as_ref().ok_or(Rejection::NoMerchant)?;
    let who = who.trim();
    if !who.is_empty() && !who.eq_ignore_ascii_case("merchant") && !shop.answers_to(who) {
        return Err(Rejection::WrongTarget(who.to_string()));
    }
    out.push(format!("{} offers:", shop.name));
    out.extend(shop_listing_lines(shop));
    Ok(())
}

pub fn leave<D: Dice>(session: &mut GameSession<D>, out: &mut Vec<String>) -> Result<(), Rejection> {
    let shop = session
        .current_shop
        .take()
        .ok_or(Rejection::NothingToLeave)?;
    out.push(format!("You leave {}.", shop.name));
    Ok(())
}

/// Enter a shop that trades at the current location. Towns host every shop;
/// elsewhere only the location's listed shops. The entered shop is a fresh
/// working copy, so its stock is full again.
pub fn enter_shop<D: Dice>(
    session: &mut GameSession<D>,
    name: &str,
    out: &mut Vec<String>,
) -> Result<(), Rejection> {
    let name = required(name, "shop")?;
    if let Some(npc) = &session.current_npc {
        return Err(Rejection::Threatened(npc.name.clone()));
    }
    let unknown = || Rejection::UnknownShop(name.to_string());
    let loc = session.current_location().ok_or_else(unknown)?;
    let shop = session.catalog.find_shop(name).ok_or_else(unknown)?;
    if !loc.is_town && !loc.shops.contains(&shop.id) {
        return Err(unknown());
    }
    let shop = shop.clone();

    out.push(format!("You enter {}. {}", shop.name, shop.description));
    out.extend(shop_listing_lines(&shop));
    session.open_shop(shop);
    Ok(())
}

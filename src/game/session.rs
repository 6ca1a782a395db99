//! The game session: sole owner of all mutable run state.
//!
//! Every command goes through [`GameSession::handle`], which dispatches to the
//! navigation, encounter, combat and economy components and returns the
//! narrative lines plus a fresh status snapshot. A player at 0 HP is scored,
//! written to the leaderboard, and reset before `handle` returns, so the next
//! command always starts from a live player.

use log::{debug, error, info, warn};

use super::catalog::Catalog;
use super::commands::{parse_command, Command, HELP_TEXT};
use super::dice::Dice;
use super::errors::Rejection;
use super::leaderboard::{Leaderboard, LeaderboardEntry};
use super::types::{Location, Npc, Player, Shop};
use super::{combat, economy, encounter, navigation};
use crate::config::GameConfig;
use crate::validation::{escape_for_log, validate_player_name};

/// Where the session currently is in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingName,
    Active,
    InCombat,
    InShop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Defeated,
    Quit,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOver {
    pub name: String,
    pub score: u64,
    /// 1-based leaderboard position, if the score made the cut.
    pub rank: Option<usize>,
    pub reason: EndReason,
    /// Whether the leaderboard write succeeded.
    pub persisted: bool,
}

/// Values the presentation shell redraws after every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub hp: i32,
    pub gold: u32,
    pub level: u32,
    pub xp: u32,
    pub location: String,
    /// Active NPC as `name (hp)`, if any.
    pub npc: Option<String>,
    pub shop: Option<String>,
}

impl Status {
    pub fn line(&self) -> String {
        let mut s = format!(
            "HP {} | Gold {} | Level {} | XP {} | {}",
            self.hp, self.gold, self.level, self.xp, self.location
        );
        if let Some(npc) = &self.npc {
            s.push_str(" | Foe: ");
            s.push_str(npc);
        }
        if let Some(shop) = &self.shop {
            s.push_str(" | Shop: ");
            s.push_str(shop);
        }
        s
    }
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub messages: Vec<String>,
    pub status: Status,
    pub game_over: Option<GameOver>,
}

enum Flow {
    Continue,
    EndRequested,
}

pub struct GameSession<D: Dice> {
    pub(crate) config: GameConfig,
    pub(crate) catalog: Catalog,
    pub(crate) leaderboard: Leaderboard,
    pub(crate) dice: D,
    pub(crate) awaiting_name: bool,
    pub(crate) player: Player,
    pub(crate) location: String,
    pub(crate) current_npc: Option<Npc>,
    pub(crate) current_shop: Option<Shop>,
    start_location: String,
    pending_warnings: Vec<String>,
}

impl<D: Dice> GameSession<D> {
    pub fn new(config: GameConfig, catalog: Catalog, leaderboard: Leaderboard, dice: D) -> Self {
        let mut pending_warnings = Vec::new();
        let start_location = if catalog.location(&config.start_location).is_some() {
            config.start_location.clone()
        } else if let Some(first) = catalog.locations.keys().next() {
            let msg = format!(
                "start location {} is not in the catalog; starting in {}",
                config.start_location, first
            );
            warn!("{}", msg);
            pending_warnings.push(msg);
            first.clone()
        } else {
            let msg = "the catalog has no locations".to_string();
            warn!("{}", msg);
            pending_warnings.push(msg);
            String::new()
        };
        let player = Player::new(&config.player_name, config.starting_hp, config.starting_gold);
        GameSession {
            awaiting_name: config.ask_name,
            config,
            catalog,
            leaderboard,
            dice,
            player,
            location: start_location.clone(),
            current_npc: None,
            current_shop: None,
            start_location,
            pending_warnings,
        }
    }

    /// Queue data-integrity warnings to show with the opening outcome.
    pub fn with_warnings<I: IntoIterator<Item = String>>(mut self, warnings: I) -> Self {
        self.pending_warnings.extend(warnings);
        self
    }

    /// The first screen: any load warnings, then a name prompt or the welcome.
    pub fn opening(&mut self) -> Outcome {
        let mut out: Vec<String> = self
            .pending_warnings
            .drain(..)
            .map(|w| format!("Warning: {}", w))
            .collect();
        if self.awaiting_name {
            out.push("Welcome, traveller! What is your name?".to_string());
        } else {
            out.push(self.welcome_line());
        }
        self.outcome(out, None)
    }

    /// Run one line of player input to completion.
    pub fn handle(&mut self, line: &str) -> Outcome {
        let mut out = Vec::new();
        if self.awaiting_name {
            match validate_player_name(line) {
                Ok(name) => {
                    info!("player name set to {}", escape_for_log(&name));
                    self.player.name = name;
                    self.awaiting_name = false;
                    out.push(self.welcome_line());
                }
                Err(e) => out.push(Rejection::InvalidName(e.to_string()).to_string()),
            }
            return self.outcome(out, None);
        }

        let Some(command) = parse_command(line) else {
            return self.outcome(out, None);
        };
        debug!("dispatch {:?} ({})", command.verb(), escape_for_log(line));

        let mut game_over = match self.dispatch(command, &mut out) {
            Ok(Flow::Continue) => None,
            Ok(Flow::EndRequested) => Some(self.end_session(EndReason::Quit, &mut out)),
            Err(rejection) => {
                debug!("rejected: {}", rejection);
                out.push(rejection.to_string());
                None
            }
        };
        if game_over.is_none() && self.player.is_dead() {
            game_over = Some(self.end_session(EndReason::Defeated, &mut out));
        }
        self.outcome(out, game_over)
    }

    fn dispatch(&mut self, command: Command, out: &mut Vec<String>) -> Result<Flow, Rejection> {
        match command {
            Command::Go(dir) | Command::Travel(dir) => navigation::advance(self, &dir, out)?,
            Command::Explore => encounter::explore(self, out),
            Command::Attack(target) => {
                combat::attack(self, target.as_deref().unwrap_or(""), out)?;
            }
            Command::Trade(who) => economy::trade(self, who.as_deref().unwrap_or(""), out)?,
            Command::Buy(item) => economy::buy(self, &item, out)?,
            Command::Sell(item) => economy::sell(self, &item, out)?,
            Command::Equip(item) => economy::equip(self, &item, out)?,
            Command::Use(item) => economy::use_item(self, &item, out)?,
            Command::Shop(name) => economy::enter_shop(self, &name, out)?,
            Command::Leave => economy::leave(self, out)?,
            Command::Inventory => out.push(economy::format_inventory(&self.player)),
            Command::Help => out.extend(HELP_TEXT.lines().map(str::to_string)),
            Command::End => return Ok(Flow::EndRequested),
            Command::Unknown(_) => {}
        }
        Ok(Flow::Continue)
    }

    /// Score the run, write the leaderboard through to disk, and start over.
    pub fn end_session(&mut self, reason: EndReason, out: &mut Vec<String>) -> GameOver {
        let score = self.config.scoring.score(&self.player);
        let name = self.player.name.clone();
        let rank = self.leaderboard.record(LeaderboardEntry::new(&name, score));
        let persisted = match self.leaderboard.save() {
            Ok(()) => true,
            Err(e) => {
                error!(
                    "failed to save leaderboard to {}: {}",
                    self.leaderboard.path().display(),
                    e
                );
                false
            }
        };
        info!(
            "session over: {} scored {} ({:?}, rank {:?})",
            escape_for_log(&name),
            score,
            reason,
            rank
        );

        out.push(format!("Game over! Your score: {}", score));
        match reason {
            EndReason::Defeated => out.push(
                "You have died and lost all your progress. This is permadeath.".to_string(),
            ),
            EndReason::Quit => out.push("You end your journey here.".to_string()),
        }
        if let Some(rank) = rank {
            out.push(format!("You placed #{} on the leaderboard.", rank));
        }
        if !persisted {
            out.push("Warning: the leaderboard could not be saved.".to_string());
        }

        self.reset();
        out.push(self.restart_line());

        GameOver {
            name,
            score,
            rank,
            reason,
            persisted,
        }
    }

    /// Back to starting values; the player's name survives.
    fn reset(&mut self) {
        self.player = Player::new(
            &self.player.name,
            self.config.starting_hp,
            self.config.starting_gold,
        );
        self.location = self.start_location.clone();
        self.current_npc = None;
        self.current_shop = None;
    }

    fn welcome_line(&self) -> String {
        match self.current_location() {
            Some(loc) => format!(
                "Welcome to the game, {}! You start in the {}. {}",
                self.player.name, loc.name, loc.description
            ),
            None => format!(
                "Welcome to the game, {}! The world is empty; there is nowhere to go.",
                self.player.name
            ),
        }
    }

    fn restart_line(&self) -> String {
        match self.current_location() {
            Some(loc) => format!("A new adventure begins in the {}. {}", loc.name, loc.description),
            None => "A new adventure begins.".to_string(),
        }
    }

    fn outcome(&self, messages: Vec<String>, game_over: Option<GameOver>) -> Outcome {
        Outcome {
            messages,
            status: self.status(),
            game_over,
        }
    }

    pub fn status(&self) -> Status {
        Status {
            hp: self.player.hp,
            gold: self.player.gold,
            level: self.player.level,
            xp: self.player.xp,
            location: self
                .current_location()
                .map(|l| l.name.clone())
                .unwrap_or_default(),
            npc: self
                .current_npc
                .as_ref()
                .map(|n| format!("{} ({})", n.name, n.hp)),
            shop: self.current_shop.as_ref().map(|s| s.name.clone()),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.awaiting_name {
            Phase::AwaitingName
        } else if self.current_npc.is_some() {
            Phase::InCombat
        } else if self.current_shop.is_some() {
            Phase::InShop
        } else {
            Phase::Active
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn location_id(&self) -> &str {
        &self.location
    }

    pub fn current_location(&self) -> Option<&Location> {
        self.catalog.location(&self.location)
    }

    pub fn current_npc(&self) -> Option<&Npc> {
        self.current_npc.as_ref()
    }

    pub fn current_shop(&self) -> Option<&Shop> {
        self.current_shop.as_ref()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Scripted dice can be topped up between commands.
    pub fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }

    /// Make `npc` the active foe, closing any open shop.
    pub(crate) fn engage(&mut self, npc: Npc, out: &mut Vec<String>) {
        if let Some(shop) = self.current_shop.take() {
            out.push(format!("You leave {}.", shop.name));
        }
        self.current_npc = Some(npc);
    }

    /// Make `shop` the active merchant, replacing any previous one.
    pub(crate) fn open_shop(&mut self, shop: Shop) {
        info!("entering shop {}", shop.id);
        self.current_shop = Some(shop);
    }
}

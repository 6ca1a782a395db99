//! Command parsing for the player's input line.

/// Parsed player command. Arguments keep the player's spelling; matching
/// against catalog names is case-insensitive downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Movement
    Go(String),     // go north
    Travel(String), // travel north
    Explore,

    // Combat
    Attack(Option<String>), // attack, attack wolf

    // Merchants and inventory
    Trade(Option<String>), // trade, trade merchant
    Buy(String),
    Sell(String),
    Equip(String),
    Use(String),
    Shop(String), // shop smithy
    Leave,
    Inventory,

    // System
    Help,
    End,

    // Ignored without a reply
    Unknown(String),
}

impl Command {
    /// Canonical verb, for logs.
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Go(_) => "go",
            Command::Travel(_) => "travel",
            Command::Explore => "explore",
            Command::Attack(_) => "attack",
            Command::Trade(_) => "trade",
            Command::Buy(_) => "buy",
            Command::Sell(_) => "sell",
            Command::Equip(_) => "equip",
            Command::Use(_) => "use",
            Command::Shop(_) => "shop",
            Command::Leave => "leave",
            Command::Inventory => "inventory",
            Command::Help => "help",
            Command::End => "end",
            Command::Unknown(_) => "unknown",
        }
    }
}

pub const HELP_TEXT: &str = "\
Commands:
  go <direction>     move along an exit (travel <direction> in teleport worlds)
  explore            look around for trouble, treasure or traders
  attack [target]    fight the creature in front of you
  trade [merchant]   list the merchant's wares
  buy <item>         buy from the merchant
  sell <item>        sell to the merchant
  equip <item>       equip a weapon or armor
  use <item>         use a consumable
  shop <name>        enter a shop that trades here
  leave              leave the merchant
  inventory          list what you carry
  end                end this run and record your score";

/// Split a line into a command. Returns `None` for blank input.
pub fn parse_command(input: &str) -> Option<Command> {
    let mut parts = input.split_whitespace();
    let verb = parts.next()?.to_lowercase();
    let rest = parts.collect::<Vec<_>>().join(" ");
    let optional = |rest: String| if rest.is_empty() { None } else { Some(rest) };

    let command = match verb.as_str() {
        "go" => Command::Go(rest),
        "travel" => Command::Travel(rest),
        "explore" => Command::Explore,
        "attack" => Command::Attack(optional(rest)),
        "trade" => Command::Trade(optional(rest)),
        "buy" => Command::Buy(rest),
        "sell" => Command::Sell(rest),
        "equip" => Command::Equip(rest),
        "use" => Command::Use(rest),
        "shop" => Command::Shop(rest),
        "leave" => Command::Leave,
        "inventory" | "inv" | "i" => Command::Inventory,
        "help" | "?" => Command::Help,
        "end" => Command::End,
        _ => Command::Unknown(verb),
    };
    Some(command)
}

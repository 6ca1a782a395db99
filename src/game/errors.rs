use thiserror::Error;

/// Errors at the storage edges of the engine (catalog writes, the leaderboard
/// file) and from a stopped engine task.
#[derive(Debug, Error)]
pub enum GameError {
    /// Wrapper around IO errors (reading catalogs, writing the leaderboard).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around JSON parse and serialize errors.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The engine task has stopped and can no longer take commands.
    #[error("game engine is not running")]
    EngineClosed,
}

/// A player command that was refused before any state changed.
///
/// The `Display` text is the narrative line shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("You can't go that way.")]
    NoExit,

    #[error("There is nowhere to travel.")]
    NoDestinations,

    #[error("There is no one to attack.")]
    NoTarget,

    #[error("There is no {0} here.")]
    WrongTarget(String),

    #[error("You can't start a fight inside {0}.")]
    InShop(String),

    #[error("The {0} won't let you near the shops.")]
    Threatened(String),

    #[error("There is no merchant to trade with.")]
    NoMerchant,

    #[error("There is no merchant to buy from.")]
    NoMerchantToBuy,

    #[error("There is no merchant to sell to.")]
    NoMerchantToSell,

    #[error("The merchant does not have that item.")]
    NotInShop,

    #[error("The {0} is sold out.")]
    SoldOut(String),

    #[error("You do not have enough gold to buy that.")]
    InsufficientGold,

    #[error("You do not have that item.")]
    NotCarried,

    #[error("You can't equip the {0}.")]
    NotEquipable(String),

    #[error("You can't use the {0}.")]
    NotUsable(String),

    #[error("There is no one to leave.")]
    NothingToLeave,

    #[error("There is no shop called {0} here.")]
    UnknownShop(String),

    #[error("What do you want to {0}?")]
    MissingArgument(&'static str),

    #[error("{0}")]
    InvalidName(String),
}

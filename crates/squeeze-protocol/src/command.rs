//! Commands the client sends to the hub.
//!
//! Every command is one ASCII line: space-separated fields ending in
//! `\n`. [`Command`]'s `Display` impl produces exactly that line.

use std::fmt;

use crate::ShuffleMode;

/// How many entries a listing command asks for. Large enough to cover any
/// real hub in one page.
pub const LISTING_LIMIT: u32 = 9999;

/// A command line sent to the hub.
///
/// Player and favorite ids are sent exactly as the hub listed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `players 0 9999`: list every connected player.
    Players,

    /// `favorites items 0 9999`: list every saved favorite.
    Favorites,

    /// Start a favorite on a player. Fire-and-forget.
    PlayFavorite {
        player_id: String,
        favorite_id: String,
    },

    /// Ask a player for its current shuffle mode.
    QueryShuffle { player_id: String },

    /// Set a player's shuffle mode. Fire-and-forget.
    SetShuffle {
        player_id: String,
        mode: ShuffleMode,
    },
}

impl Command {
    /// Renders the command as a newline-terminated wire line.
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Players => writeln!(f, "players 0 {LISTING_LIMIT}"),
            Command::Favorites => writeln!(f, "favorites items 0 {LISTING_LIMIT}"),
            Command::PlayFavorite {
                player_id,
                favorite_id,
            } => writeln!(f, "{player_id} favorites playlist play item_id:{favorite_id}"),
            Command::QueryShuffle { player_id } => {
                writeln!(f, "{player_id} playlist shuffle ?")
            }
            Command::SetShuffle { player_id, mode } => {
                writeln!(f, "{player_id} playlist shuffle {}", mode.as_state())
            }
        }
    }
}

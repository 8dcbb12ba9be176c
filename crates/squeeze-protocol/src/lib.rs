//! Wire protocol for the squeeze hub client.
//!
//! This crate knows what goes over the socket and what comes back, but
//! nothing about connections:
//!
//! - **Commands** ([`Command`]) render the newline-terminated lines the
//!   hub accepts.
//! - **Listings** ([`Listing`], [`PlayerRecord`], [`FavoriteRecord`])
//!   decode the hub's fixed-width, percent-encoded listing responses.
//! - **Shuffle** ([`ShuffleMode`]) reads and toggles playlist shuffle.
//! - **Errors** ([`ProtocolError`]) describe a response that does not
//!   fit the expected shape.
//!
//! ```text
//! Transport (bytes) → Protocol (records) → Session (catalog, dispatch)
//! ```

mod command;
mod error;
mod listing;
mod shuffle;
mod token;

pub use command::{Command, LISTING_LIMIT};
pub use error::ProtocolError;
pub use listing::{
    parse_favorites, parse_listing, parse_players, FavoriteRecord, Listing, PlayerRecord,
    RawRecord, PREAMBLE_TOKENS,
};
pub use shuffle::{parse_shuffle_state, ShuffleMode};
pub use token::{decode_field, decode_token, encode_token};

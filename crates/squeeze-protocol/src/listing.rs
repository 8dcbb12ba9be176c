//! Listing responses: the hub's answer to `players` and `favorites items`.
//!
//! A listing response is one line of space-separated, percent-encoded
//! tokens:
//!
//! ```text
//! <preamble: 5 tokens> <record 1: WIDTH tokens> ... <record k> [trailer]
//! ```
//!
//! Each data token is a `key:value` field. Records are fixed width, so
//! fields are grouped purely by position. Both listing shapes share one
//! decoder, [`parse_listing`]; the shapes differ only in the constants on
//! their [`Listing`] impl.

use std::collections::HashMap;

use serde::Serialize;

use crate::token::decode_field;
use crate::{Command, ProtocolError};

/// Leading tokens of every listing response that carry count and offset
/// metadata rather than data fields.
pub const PREAMBLE_TOKENS: usize = 5;

// ---------------------------------------------------------------------------
// RawRecord
// ---------------------------------------------------------------------------

/// The decoded fields of one record, before they are mapped onto a
/// typed record. If a key repeats inside a record, the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    /// Decodes one record's worth of tokens.
    pub fn decode(tokens: &[&str]) -> Result<Self, ProtocolError> {
        let mut fields = HashMap::with_capacity(tokens.len());
        for token in tokens {
            let (key, value) = decode_field(token)?;
            fields.insert(key, value);
        }
        Ok(Self { fields })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Removes and returns a field that must be present.
    pub fn require(&mut self, key: &'static str) -> Result<String, ProtocolError> {
        self.fields.remove(key).ok_or(ProtocolError::MissingField(key))
    }

    /// Removes and returns an optional field.
    pub fn take(&mut self, key: &str) -> Option<String> {
        self.fields.remove(key)
    }

    /// Removes an optional `0`/`1` flag field. Other values read as absent.
    pub fn take_flag(&mut self, key: &str) -> Option<bool> {
        match self.fields.remove(key).as_deref() {
            Some("1") => Some(true),
            Some("0") => Some(false),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Listing trait
// ---------------------------------------------------------------------------

/// A record type that can be decoded from a listing response.
///
/// Implementors fix the shape of one listing: which command requests it,
/// how many tokens form a record, and how many tokens trail the data.
pub trait Listing: Sized {
    /// The command that requests this listing.
    const COMMAND: Command;

    /// Number of tokens per record.
    const WIDTH: usize;

    /// Tokens after the last record that are not data (dropped).
    const TRAILING_TOKENS: usize;

    /// Builds the typed record from its decoded fields.
    fn from_record(record: RawRecord) -> Result<Self, ProtocolError>;

    /// The display name, used as the catalog key.
    fn name(&self) -> &str;

    /// The protocol id the catalog maps the name to.
    fn id(&self) -> &str;
}

/// Decodes a complete listing response into records.
///
/// The trailing line terminator is stripped, then the response is split
/// on single spaces. Parsing is strict: a response shorter than the
/// preamble, a token count that does not fill whole records, a token
/// without `:`, or a record missing its key fields all fail the entire
/// listing.
///
/// # Errors
/// Returns the first [`ProtocolError`] encountered; no records are
/// returned in that case.
pub fn parse_listing<L: Listing>(data: &[u8]) -> Result<Vec<L>, ProtocolError> {
    let text = std::str::from_utf8(data)
        .map_err(|e| ProtocolError::InvalidResponse(format!("listing is not UTF-8: {e}")))?;
    let tokens: Vec<&str> = text.trim_end_matches(['\r', '\n']).split(' ').collect();

    let overhead = PREAMBLE_TOKENS + L::TRAILING_TOKENS;
    if tokens.len() < overhead {
        return Err(ProtocolError::TooShort {
            expected: overhead,
            found: tokens.len(),
        });
    }

    let data_tokens = &tokens[PREAMBLE_TOKENS..tokens.len() - L::TRAILING_TOKENS];
    let trailing = data_tokens.len() % L::WIDTH;
    if trailing != 0 {
        return Err(ProtocolError::TruncatedRecord {
            width: L::WIDTH,
            trailing,
        });
    }

    let records = data_tokens
        .chunks_exact(L::WIDTH)
        .map(|chunk| RawRecord::decode(chunk).and_then(L::from_record))
        .collect::<Result<Vec<L>, _>>()?;

    tracing::debug!(
        records = records.len(),
        width = L::WIDTH,
        "decoded listing"
    );
    Ok(records)
}

/// Decodes a player listing. See [`parse_listing`].
pub fn parse_players(data: &[u8]) -> Result<Vec<PlayerRecord>, ProtocolError> {
    parse_listing(data)
}

/// Decodes a favorites listing. See [`parse_listing`].
pub fn parse_favorites(data: &[u8]) -> Result<Vec<FavoriteRecord>, ProtocolError> {
    parse_listing(data)
}

// ---------------------------------------------------------------------------
// PlayerRecord
// ---------------------------------------------------------------------------

/// One player from a `players` listing.
///
/// Only `name` and `playerid` are required. The rest of the fourteen
/// fields are kept when they carry something useful and ignored
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRecord {
    pub name: String,
    /// The id used to address this player in commands (usually its MAC).
    pub player_id: String,
    pub ip: Option<String>,
    pub model: Option<String>,
    pub connected: Option<bool>,
}

impl Listing for PlayerRecord {
    const COMMAND: Command = Command::Players;
    const WIDTH: usize = 14;
    const TRAILING_TOKENS: usize = 0;

    fn from_record(mut record: RawRecord) -> Result<Self, ProtocolError> {
        Ok(Self {
            name: record.require("name")?,
            player_id: record.require("playerid")?,
            ip: record.take("ip"),
            model: record.take("model"),
            connected: record.take_flag("connected"),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &str {
        &self.player_id
    }
}

// ---------------------------------------------------------------------------
// FavoriteRecord
// ---------------------------------------------------------------------------

/// One favorite from a `favorites items` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteRecord {
    pub id: String,
    pub name: String,
    /// The hub's item type, e.g. `audio` or `playlist`.
    pub kind: Option<String>,
    pub is_audio: Option<bool>,
    pub has_items: Option<bool>,
}

impl Listing for FavoriteRecord {
    const COMMAND: Command = Command::Favorites;
    const WIDTH: usize = 5;
    // The listing ends with one terminator token that is not a field.
    const TRAILING_TOKENS: usize = 1;

    fn from_record(mut record: RawRecord) -> Result<Self, ProtocolError> {
        Ok(Self {
            id: record.require("id")?,
            name: record.require("name")?,
            kind: record.take("type"),
            is_audio: record.take_flag("isaudio"),
            has_items: record.take_flag("hasitems"),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &str {
        &self.id
    }
}

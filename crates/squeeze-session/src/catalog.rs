//! The catalog: player and favorite names mapped to protocol ids.
//!
//! Built once when a session opens and read for every lookup after
//! that. Names are what the user types; ids are what the hub expects in
//! commands.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::SessionError;

// ---------------------------------------------------------------------------
// CatalogKind
// ---------------------------------------------------------------------------

/// Which half of the catalog a name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Player,
    Favorite,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Player => write!(f, "player"),
            CatalogKind::Favorite => write!(f, "favorite"),
        }
    }
}

// ---------------------------------------------------------------------------
// NameIndex
// ---------------------------------------------------------------------------

/// An insertion-ordered map from display name to id.
///
/// The hub does not guarantee unique names. Inserting a name again
/// replaces its id (last occurrence wins) but keeps the position of the
/// first occurrence, so iteration reproduces the hub's listing order.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    entries: Vec<(String, String)>,
    /// Position of each name in `entries`. Kept in sync with it.
    positions: HashMap<String, usize>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a name. Returns the id it previously mapped to.
    pub fn insert(&mut self, name: impl Into<String>, id: impl Into<String>) -> Option<String> {
        let name = name.into();
        let id = id.into();
        if let Some(&pos) = self.positions.get(&name) {
            return Some(std::mem::replace(&mut self.entries[pos].1, id));
        }
        self.positions.insert(name.clone(), self.entries.len());
        self.entries.push((name, id));
        None
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.positions
            .get(name)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
    }
}

// ---------------------------------------------------------------------------
// LoadStatus
// ---------------------------------------------------------------------------

/// How loading one half of the catalog went.
///
/// An empty index alone cannot tell "the hub has no favorites" from "the
/// favorites listing was garbage", so the status is kept next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadStatus {
    /// No listing was requested yet.
    NotLoaded,
    /// The listing parsed; this many records were read.
    Loaded { records: usize },
    /// The hub sent nothing before the response deadline.
    NoResponse,
    /// The listing did not parse. The index is left empty.
    Malformed { reason: String },
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Player and favorite directories for one session.
#[derive(Debug, Clone)]
pub struct Catalog {
    players: NameIndex,
    favorites: NameIndex,
    player_status: LoadStatus,
    favorite_status: LoadStatus,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            players: NameIndex::new(),
            favorites: NameIndex::new(),
            player_status: LoadStatus::NotLoaded,
            favorite_status: LoadStatus::NotLoaded,
        }
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a player's id by name.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if no player has that name.
    pub fn lookup_player(&self, name: &str) -> Result<&str, SessionError> {
        self.lookup(CatalogKind::Player, name)
    }

    /// Looks up a favorite's id by name.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if no favorite has that name.
    pub fn lookup_favorite(&self, name: &str) -> Result<&str, SessionError> {
        self.lookup(CatalogKind::Favorite, name)
    }

    pub fn lookup(&self, kind: CatalogKind, name: &str) -> Result<&str, SessionError> {
        self.index(kind)
            .get(name)
            .ok_or_else(|| SessionError::NotFound {
                kind,
                name: name.to_string(),
            })
    }

    pub fn players(&self) -> &NameIndex {
        &self.players
    }

    pub fn favorites(&self) -> &NameIndex {
        &self.favorites
    }

    pub fn index(&self, kind: CatalogKind) -> &NameIndex {
        match kind {
            CatalogKind::Player => &self.players,
            CatalogKind::Favorite => &self.favorites,
        }
    }

    pub fn status(&self, kind: CatalogKind) -> &LoadStatus {
        match kind {
            CatalogKind::Player => &self.player_status,
            CatalogKind::Favorite => &self.favorite_status,
        }
    }

    /// Replaces one half of the catalog with freshly parsed entries.
    pub fn fill<'a>(
        &mut self,
        kind: CatalogKind,
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) {
        let (index, status) = self.parts_mut(kind);
        index.clear();
        let mut records = 0;
        for (name, id) in entries {
            if let Some(previous) = index.insert(name, id) {
                tracing::debug!(%kind, name, previous = %previous, "duplicate name, keeping last id");
            }
            records += 1;
        }
        *status = LoadStatus::Loaded { records };
    }

    /// Marks one half of the catalog as not loaded for `status`, leaving it
    /// empty.
    pub fn mark_unavailable(&mut self, kind: CatalogKind, status: LoadStatus) {
        let (index, slot) = self.parts_mut(kind);
        index.clear();
        *slot = status;
    }

    /// A snapshot of all names, in listing order.
    pub fn listing(&self) -> CatalogListing {
        CatalogListing {
            players: self.players.names().map(String::from).collect(),
            favorites: self.favorites.names().map(String::from).collect(),
            player_status: self.player_status.clone(),
            favorite_status: self.favorite_status.clone(),
        }
    }

    fn parts_mut(&mut self, kind: CatalogKind) -> (&mut NameIndex, &mut LoadStatus) {
        match kind {
            CatalogKind::Player => (&mut self.players, &mut self.player_status),
            CatalogKind::Favorite => (&mut self.favorites, &mut self.favorite_status),
        }
    }
}

// ---------------------------------------------------------------------------
// CatalogListing
// ---------------------------------------------------------------------------

/// Every player name followed by every favorite name.
///
/// `Display` renders the tab-indented text listing; `Serialize` gives the
/// same data for machine consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogListing {
    pub players: Vec<String>,
    pub favorites: Vec<String>,
    pub player_status: LoadStatus,
    pub favorite_status: LoadStatus,
}

impl fmt::Display for CatalogListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_section(f, "Players", &self.players, &self.player_status)?;
        write_section(f, "Favorites", &self.favorites, &self.favorite_status)
    }
}

fn write_section(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    names: &[String],
    status: &LoadStatus,
) -> fmt::Result {
    writeln!(f, "\n\t{title}:")?;
    for name in names {
        writeln!(f, "\t\t{name}")?;
    }
    if let LoadStatus::Malformed { reason } = status {
        writeln!(f, "\t\t(listing unavailable: {reason})")?;
    }
    Ok(())
}

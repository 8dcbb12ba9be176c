//! The session: one connection, one catalog, one dispatched action.
//!
//! ```text
//!   open() ──→ Loading ──(players, favorites)──→ Ready ──(action)──→ close() ──→ Closed
//! ```
//!
//! There is no reconnect and no retry. Every awaited reply is bounded by
//! [`SessionConfig::response_timeout`]; a reply that does not arrive in
//! time leaves the corresponding data absent.

use std::time::Duration;

use squeeze_protocol::{
    parse_listing, parse_shuffle_state, Command, FavoriteRecord, Listing, PlayerRecord,
    ShuffleMode,
};
use squeeze_transport::{Connection, TransportError};

use crate::{Catalog, CatalogKind, CatalogListing, LoadStatus, SessionError};

/// How long to wait for each reply unless configured otherwise.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Upper bound on the wait for each reply. Applies per reply, not to
    /// the session as a whole.
    ///
    /// Default: 10 seconds.
    pub response_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connected; the catalog is being fetched.
    Loading,
    /// Catalog loaded; commands can be dispatched.
    Ready,
    /// The connection has been closed. Terminal.
    Closed,
}

/// What a shuffle toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShuffleToggle {
    /// The player reported `from`; `to` was sent.
    Toggled { from: ShuffleMode, to: ShuffleMode },
    /// The player never reported its state, so nothing was sent.
    NoResponse,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A control session with the hub.
///
/// Owns the connection exclusively. The catalog is only ever handed out
/// as a shared reference.
#[derive(Debug)]
pub struct Session<C: Connection<Error = TransportError>> {
    conn: C,
    config: SessionConfig,
    catalog: Catalog,
    state: SessionState,
}

impl<C: Connection<Error = TransportError>> Session<C> {
    /// Starts a session on an open connection and loads the catalog.
    ///
    /// # Errors
    /// Fails only on transport errors. A listing that times out or does
    /// not parse leaves that half of the catalog empty instead. The
    /// connection is closed before an error is returned.
    pub async fn open(conn: C, config: SessionConfig) -> Result<Self, SessionError> {
        let mut session = Self {
            conn,
            config,
            catalog: Catalog::new(),
            state: SessionState::Loading,
        };

        if let Err(e) = session.load_catalog().await {
            tracing::warn!(error = %e, "catalog load failed, closing connection");
            if let Err(close_err) = session.close().await {
                tracing::debug!(error = %close_err, "close after failed load");
            }
            return Err(e);
        }

        session.state = SessionState::Ready;
        tracing::info!(
            players = session.catalog.players().len(),
            favorites = session.catalog.favorites().len(),
            "session ready"
        );
        Ok(session)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Fetches the player listing into the catalog.
    pub async fn load_players(&mut self) -> Result<&LoadStatus, SessionError> {
        self.load_listing::<PlayerRecord>(CatalogKind::Player).await
    }

    /// Fetches the favorites listing into the catalog.
    pub async fn load_favorites(&mut self) -> Result<&LoadStatus, SessionError> {
        self.load_listing::<FavoriteRecord>(CatalogKind::Favorite)
            .await
    }

    /// Lists every player name, then every favorite name, in the order the
    /// hub listed them.
    pub fn list_all(&self) -> Result<CatalogListing, SessionError> {
        self.ensure_ready()?;
        Ok(self.catalog.listing())
    }

    /// Starts a favorite on a player.
    ///
    /// # Errors
    /// Returns [`SessionError::Unresolved`] naming both inputs if either
    /// name is unknown; nothing is sent in that case.
    pub async fn start_favorite(
        &mut self,
        player_name: &str,
        favorite_name: &str,
    ) -> Result<(), SessionError> {
        self.ensure_ready()?;

        let (Ok(player_id), Ok(favorite_id)) = (
            self.catalog.lookup_player(player_name),
            self.catalog.lookup_favorite(favorite_name),
        ) else {
            return Err(SessionError::Unresolved {
                player: player_name.to_string(),
                favorite: favorite_name.to_string(),
            });
        };
        let command = Command::PlayFavorite {
            player_id: player_id.to_string(),
            favorite_id: favorite_id.to_string(),
        };

        self.conn.send_command(&command.to_line()).await?;
        tracing::info!(player = player_name, favorite = favorite_name, "favorite started");
        Ok(())
    }

    /// Flips a player's playlist shuffle between off and shuffle-by-song.
    ///
    /// Queries the current mode first. If the player does not answer
    /// within the response timeout the toggle is skipped.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] for an unknown player and
    /// [`SessionError::Protocol`] if the reply carries no shuffle state.
    pub async fn toggle_shuffle(&mut self, player_name: &str) -> Result<ShuffleToggle, SessionError> {
        self.ensure_ready()?;
        let player_id = self.catalog.lookup_player(player_name)?.to_string();

        let query = Command::QueryShuffle {
            player_id: player_id.clone(),
        };
        self.conn.send_command(&query.to_line()).await?;

        let Some(reply) = self
            .conn
            .await_response(self.config.response_timeout)
            .await?
        else {
            tracing::warn!(player = player_name, "no shuffle state reported, leaving it unchanged");
            return Ok(ShuffleToggle::NoResponse);
        };

        let from = parse_shuffle_state(&reply)?;
        let to = from.toggled();
        let set = Command::SetShuffle {
            player_id,
            mode: to,
        };
        self.conn.send_command(&set.to_line()).await?;

        tracing::info!(player = player_name, %from, %to, "shuffle toggled");
        Ok(ShuffleToggle::Toggled { from, to })
    }

    /// Closes the connection. Calling it again is a no-op.
    pub async fn close(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.state = SessionState::Closed;
        self.conn.close().await?;
        Ok(())
    }

    async fn load_catalog(&mut self) -> Result<(), SessionError> {
        self.load_players().await?;
        self.load_favorites().await?;
        Ok(())
    }

    /// Sends a listing command and fills one half of the catalog from the
    /// reply. Only transport failures are errors.
    async fn load_listing<L: Listing>(
        &mut self,
        kind: CatalogKind,
    ) -> Result<&LoadStatus, SessionError> {
        self.conn.send_command(&L::COMMAND.to_line()).await?;

        match self
            .conn
            .await_response(self.config.response_timeout)
            .await?
        {
            None => {
                tracing::debug!(%kind, "listing got no response");
                self.catalog.mark_unavailable(kind, LoadStatus::NoResponse);
            }
            Some(data) => match parse_listing::<L>(&data) {
                Ok(records) => {
                    self.catalog
                        .fill(kind, records.iter().map(|r| (r.name(), r.id())));
                }
                Err(e) => {
                    tracing::warn!(%kind, error = %e, "discarding malformed listing");
                    self.catalog.mark_unavailable(
                        kind,
                        LoadStatus::Malformed {
                            reason: e.to_string(),
                        },
                    );
                }
            },
        }

        Ok(self.catalog.status(kind))
    }

    fn ensure_ready(&self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Closed => Err(SessionError::Closed),
            SessionState::Loading | SessionState::Ready => Ok(()),
        }
    }
}

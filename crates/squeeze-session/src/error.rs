//! Error types for the session layer.

use squeeze_protocol::ProtocolError;
use squeeze_transport::TransportError;

use crate::CatalogKind;

/// Errors that can occur while loading the catalog or dispatching a
/// command.
///
/// `NotFound` and `Unresolved` are ordinary outcomes of a user typing a
/// name the hub does not know; callers report them rather than abort.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The name is not in the catalog.
    #[error("{kind} {name:?} not available")]
    NotFound { kind: CatalogKind, name: String },

    /// A player/favorite pair could not be resolved. Both names are
    /// reported, whichever one was missing.
    #[error("player {player:?} or favorite {favorite:?} not available")]
    Unresolved { player: String, favorite: String },

    /// A transport-level failure (send, receive).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The hub's reply did not have the expected shape.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The session was already closed.
    #[error("session is closed")]
    Closed,
}

impl SessionError {
    /// Whether this error is about the user's input or the hub's reply,
    /// rather than the connection itself.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SessionError::NotFound { .. }
                | SessionError::Unresolved { .. }
                | SessionError::Protocol(_)
        )
    }
}

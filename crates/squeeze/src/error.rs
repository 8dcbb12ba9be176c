//! Unified error type for the squeeze client.

use squeeze_session::SessionError;
use squeeze_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum SqueezeError {
    /// A transport-level error (connect, send, receive).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A session-level error (lookup, closed session).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The client was configured without a hub host.
    #[error("no hub host configured")]
    MissingHost,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::Closed;
        let squeeze_err: SqueezeError = err.into();
        assert!(matches!(squeeze_err, SqueezeError::Transport(_)));
        assert_eq!(squeeze_err.to_string(), "connection closed");
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::Closed;
        let squeeze_err: SqueezeError = err.into();
        assert!(matches!(squeeze_err, SqueezeError::Session(_)));
        assert_eq!(squeeze_err.to_string(), "session is closed");
    }
}

//! Playlist shuffle state.

use std::fmt;

use serde::Serialize;

use crate::ProtocolError;

/// A player's playlist shuffle mode, as the hub numbers it.
///
/// Any nonzero state counts as shuffled, including numbers this client
/// has no name for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShuffleMode {
    /// `0`: play in order.
    Off,
    /// `1`: shuffle by song.
    BySong,
    /// `2`: shuffle by album.
    ByAlbum,
    /// Any other state the hub reports.
    Other(i64),
}

impl ShuffleMode {
    /// Maps the hub's numeric state to a mode.
    pub fn from_state(state: i64) -> Self {
        match state {
            0 => ShuffleMode::Off,
            1 => ShuffleMode::BySong,
            2 => ShuffleMode::ByAlbum,
            other => ShuffleMode::Other(other),
        }
    }

    /// The numeric state sent on the wire.
    pub fn as_state(self) -> i64 {
        match self {
            ShuffleMode::Off => 0,
            ShuffleMode::BySong => 1,
            ShuffleMode::ByAlbum => 2,
            ShuffleMode::Other(state) => state,
        }
    }

    pub fn is_shuffled(self) -> bool {
        self.as_state() != 0
    }

    /// The mode a toggle switches to: any shuffling turns it off,
    /// otherwise shuffle by song.
    pub fn toggled(self) -> Self {
        if self.is_shuffled() {
            ShuffleMode::Off
        } else {
            ShuffleMode::BySong
        }
    }
}

impl fmt::Display for ShuffleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShuffleMode::Off => write!(f, "off"),
            ShuffleMode::BySong => write!(f, "by song"),
            ShuffleMode::ByAlbum => write!(f, "by album"),
            ShuffleMode::Other(state) => write!(f, "state {state}"),
        }
    }
}

/// Parses the reply to a shuffle query.
///
/// The hub echoes the query with the state as its final token, e.g.
/// `AA%3ABB playlist shuffle 1\n`.
///
/// # Errors
/// Returns [`ProtocolError::InvalidResponse`] when the reply is empty or
/// its last token is not an integer.
pub fn parse_shuffle_state(data: &[u8]) -> Result<ShuffleMode, ProtocolError> {
    let text = String::from_utf8_lossy(data);
    let last = text
        .split_whitespace()
        .last()
        .ok_or_else(|| ProtocolError::InvalidResponse("empty shuffle reply".into()))?;

    last.parse::<i64>()
        .map(ShuffleMode::from_state)
        .map_err(|_| ProtocolError::InvalidResponse(format!("shuffle state {last:?} is not a number")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trailing_state() {
        assert_eq!(
            parse_shuffle_state(b"AA%3ABB playlist shuffle 0\n").unwrap(),
            ShuffleMode::Off
        );
        assert_eq!(
            parse_shuffle_state(b"AA%3ABB playlist shuffle 1\n").unwrap(),
            ShuffleMode::BySong
        );
        assert_eq!(
            parse_shuffle_state(b"AA%3ABB playlist shuffle 2").unwrap(),
            ShuffleMode::ByAlbum
        );
    }

    #[test]
    fn test_unknown_nonzero_state_counts_as_shuffled() {
        let mode = parse_shuffle_state(b"AA playlist shuffle 3\n").unwrap();
        assert_eq!(mode, ShuffleMode::Other(3));
        assert!(mode.is_shuffled());
        assert_eq!(mode.toggled(), ShuffleMode::Off);

        let mode = parse_shuffle_state(b"AA playlist shuffle -1\n").unwrap();
        assert_eq!(mode.toggled(), ShuffleMode::Off);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_shuffle_state(b"").is_err());
        assert!(parse_shuffle_state(b"AA playlist shuffle ?\n").is_err());
        assert!(parse_shuffle_state(b"AA playlist shuffle on\n").is_err());
    }

    #[test]
    fn test_toggle_turns_any_shuffle_off() {
        assert_eq!(ShuffleMode::Off.toggled(), ShuffleMode::BySong);
        assert_eq!(ShuffleMode::BySong.toggled(), ShuffleMode::Off);
        assert_eq!(ShuffleMode::ByAlbum.toggled(), ShuffleMode::Off);
    }

    #[test]
    fn test_state_numbers_round_trip() {
        for state in [0, 1, 2, 3, -1] {
            assert_eq!(ShuffleMode::from_state(state).as_state(), state);
        }
        assert_eq!(ShuffleMode::from_state(2), ShuffleMode::ByAlbum);
    }
}

//! Error types for the protocol layer.
//!
//! Every variant means the hub sent something that does not fit the
//! expected response shape. A listing that fails to parse yields no
//! records at all; there is no partial result.

/// Errors raised while decoding a hub response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The response had fewer tokens than the fixed preamble.
    #[error("response too short: expected at least {expected} tokens, got {found}")]
    TooShort { expected: usize, found: usize },

    /// The data tokens do not divide into whole records.
    ///
    /// `trailing` is how many tokens were left over after the last
    /// complete record.
    #[error("truncated record: {trailing} trailing tokens do not fill a record of width {width}")]
    TruncatedRecord { width: usize, trailing: usize },

    /// A data token had no `:` between field name and value.
    #[error("malformed field token {0:?}: missing ':' separator")]
    MissingSeparator(String),

    /// A token did not percent-decode to valid UTF-8.
    #[error("malformed field token {0:?}: not valid UTF-8 once decoded")]
    InvalidEncoding(String),

    /// A record lacked a field the listing needs.
    #[error("record is missing required field {0:?}")]
    MissingField(&'static str),

    /// The response is otherwise not what the command expects.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

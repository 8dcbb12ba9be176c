//! Percent-encoding of individual wire tokens.
//!
//! The hub separates fields with single spaces, so any space, colon or
//! percent sign inside a value travels as `%20`, `%3A` and `%25`.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::ProtocolError;

/// Characters escaped when encoding a token value.
const TOKEN_ESCAPES: &AsciiSet = &CONTROLS.add(b' ').add(b':').add(b'%');

/// Percent-encodes a value so it can travel as one token.
pub fn encode_token(value: &str) -> String {
    utf8_percent_encode(value, TOKEN_ESCAPES).to_string()
}

/// Decodes one percent-encoded token.
///
/// # Errors
/// Returns [`ProtocolError::InvalidEncoding`] when the decoded bytes are
/// not UTF-8.
pub fn decode_token(token: &str) -> Result<String, ProtocolError> {
    percent_decode_str(token)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| ProtocolError::InvalidEncoding(token.to_string()))
}

/// Decodes a `key:value` field token, splitting on the first `:` after
/// decoding. Values may themselves contain colons (player ids do).
///
/// # Errors
/// Returns [`ProtocolError::MissingSeparator`] if the decoded token has no
/// `:`, or [`ProtocolError::InvalidEncoding`] if it is not UTF-8.
pub fn decode_field(token: &str) -> Result<(String, String), ProtocolError> {
    let decoded = decode_token(token)?;
    match decoded.split_once(':') {
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(ProtocolError::MissingSeparator(token.to_string())),
    }
}

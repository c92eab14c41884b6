//! Encode/decode primitives

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped by `encodeURIComponent`: everything except
/// alphanumerics and `- _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Standard alphabet; `=` padding optional on decode, as `atob` allows.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Errors produced by [`try_decode`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Token is not valid base64
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A `%` not followed by two hex digits
    #[error("malformed escape at offset {offset}")]
    MalformedEscape {
        /// Byte offset of the offending `%` in the unwrapped text
        offset: usize,
    },

    /// Escaped bytes do not form valid UTF-8
    #[error("escaped bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// Encode text into a transport-safe token
///
/// Deterministic; the output contains only base64 alphabet characters.
#[must_use]
pub fn encode(text: &str) -> String {
    let escaped = utf8_percent_encode(text, URI_COMPONENT).to_string();
    STANDARD.encode(escaped.as_bytes())
}

/// Decode a token, reporting why it is unusable
///
/// # Errors
/// Returns [`DecodeError`] if the token is not valid base64, contains a
/// malformed `%` escape, or the escapes do not decode to UTF-8.
pub fn try_decode(token: &str) -> Result<String, DecodeError> {
    let raw = LENIENT.decode(token.trim())?;

    // Each byte maps to the code point of the same value, so non-ASCII
    // bytes pass through as Latin-1 characters.
    let unwrapped: String = raw.iter().map(|&b| char::from(b)).collect();

    validate_escapes(&unwrapped)?;

    percent_decode_str(&unwrapped)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .map_err(|_| DecodeError::InvalidUtf8)
}

/// Decode a token back into text
///
/// Malformed tokens yield an empty string. Callers must treat an empty
/// result as "no usable content", which is distinct from a slot that was
/// never written.
#[must_use]
pub fn decode(token: &str) -> String {
    match try_decode(token) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "discarding malformed token");
            String::new()
        }
    }
}

fn validate_escapes(s: &str) -> Result<(), DecodeError> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let well_formed = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !well_formed {
                return Err(DecodeError::MalformedEscape { offset: i });
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

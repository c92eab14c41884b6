//! Strongly-typed encoded token
//!
//! Provides [`Token`], the encoded form of a document as it travels to
//! storage or the clipboard.

use crate::codec::{self, DecodeError};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// An encoded document snapshot
///
/// Always ASCII when produced by [`Token::encode`]. Tokens read back from
/// external storage are wrapped with [`Token::from_raw`] without checks,
/// since a malformed token must still decode (to empty) rather than fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Encode text into a token
    #[inline]
    #[must_use]
    pub fn encode(text: &str) -> Self {
        Self(codec::encode(text))
    }

    /// Wrap an externally sourced token string as-is
    #[inline]
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Decode to text; empty on malformed input
    #[inline]
    #[must_use]
    pub fn decode(&self) -> String {
        codec::decode(&self.0)
    }

    /// Decode to text, surfacing the reason a token is unusable
    ///
    /// # Errors
    /// See [`crate::try_decode`].
    #[inline]
    pub fn try_decode(&self) -> Result<String, DecodeError> {
        codec::try_decode(&self.0)
    }

    /// Borrow the token string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the token string
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Token length in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the token of the empty document
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Token {
    type Err = DecodeError;

    /// Parse a token, rejecting anything that would not decode
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        codec::try_decode(s)?;
        Ok(Self(s.trim().to_string()))
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

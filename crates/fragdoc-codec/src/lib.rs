//! Fragdoc Codec
//!
//! Reversible conversion between document text and an ASCII-safe token.
//!
//! # Token format
//!
//! ```text
//! text ──UTF-8──► bytes ──percent-encode──► ASCII ──base64──► token
//! ```
//!
//! Only the URI-component unreserved set (`A-Z a-z 0-9 - _ . ! ~ * ' ( )`)
//! survives percent-encoding unescaped, so tokens are interchangeable with
//! those produced by browser front-ends using `btoa(encodeURIComponent(s))`.
//!
//! # Example
//!
//! ```rust
//! use fragdoc_codec::{decode, encode};
//!
//! let token = encode("Grüße, world");
//! assert_eq!(decode(&token), "Grüße, world");
//!
//! // Malformed input never fails loudly
//! assert_eq!(decode("***"), "");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod codec;
mod token;

pub use codec::{decode, encode, try_decode, DecodeError};
pub use token::Token;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

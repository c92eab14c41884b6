//! Slot store trait

use crate::error::StorageError;
use async_trait::async_trait;
use fragdoc_codec::Token;

/// Persistence of a single encoded token per slot name
///
/// # Contract
/// - `save` overwrites the slot wholesale; prior content is discarded
/// - `load` fails with [`StorageError::NotFound`] for never-written or
///   cleared slots
/// - `exists` never fails
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug {
    /// Replace the slot's content with `token`
    async fn save(&self, name: &str, token: &Token) -> Result<(), StorageError>;

    /// Read the slot's content
    async fn load(&self, name: &str) -> Result<Token, StorageError>;

    /// Check whether the slot holds a token
    async fn exists(&self, name: &str) -> bool;

    /// Remove the slot; clearing an empty slot is not an error
    async fn clear(&self, name: &str) -> Result<(), StorageError>;

    /// Backend name (for logging)
    fn backend(&self) -> &'static str;
}

/// Reject names that cannot safely address a slot
///
/// # Errors
/// Returns [`StorageError::InvalidName`] for empty names, `.`/`..`, and
/// names containing path separators or NUL.
pub fn validate_slot_name(name: &str) -> Result<(), StorageError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}

//! In-process slot store

use crate::error::StorageError;
use crate::store::{validate_slot_name, BlobStore};
use async_trait::async_trait;
use dashmap::DashMap;
use fragdoc_codec::Token;

/// Concurrent in-memory store
///
/// Equivalent of browser local storage: lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: DashMap<String, Token>,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no slot is occupied
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn save(&self, name: &str, token: &Token) -> Result<(), StorageError> {
        validate_slot_name(name)?;
        self.slots.insert(name.to_string(), token.clone());
        tracing::debug!(slot = name, bytes = token.len(), "memory slot written");
        Ok(())
    }

    async fn load(&self, name: &str) -> Result<Token, StorageError> {
        self.slots
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StorageError::not_found(name))
    }

    async fn exists(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    async fn clear(&self, name: &str) -> Result<(), StorageError> {
        self.slots.remove(name);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

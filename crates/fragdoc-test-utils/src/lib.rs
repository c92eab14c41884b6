//! Testing utilities for the fragdoc workspace
//!
//! Shared fixtures and failing collaborators.

#![allow(missing_docs)]

use async_trait::async_trait;
use fragdoc_catalog::{FragmentCatalog, RawFragment, RawGroups};
use fragdoc_codec::Token;
use fragdoc_composition::RichTextSurface;
use fragdoc_core::{Clipboard, NotificationLog, Session, SessionConfig, SessionError};
use fragdoc_ingest::DocumentConverter;
use fragdoc_storage::{BlobStore, MemoryStore, StorageError};
use parking_lot::Mutex;
use std::sync::Arc;

/// `{"A": [{id: 1, content: "x"}]}`
pub fn single_fragment_catalog() -> FragmentCatalog {
    catalog(vec![("A", vec![(1, "x")])])
}

/// `{"A": [{1, "x"}, {2, "y"}]}`
pub fn two_fragment_catalog() -> FragmentCatalog {
    catalog(vec![("A", vec![(1, "x"), (2, "y")])])
}

/// Claim-letter style catalog with several groups
pub fn sample_catalog() -> FragmentCatalog {
    catalog(vec![
        ("dynamic", vec![(1, "Policy Number"), (2, "Claim Date"), (3, "Insured Name")]),
        ("claim", vec![(1, "We have received your claim.")]),
        ("enclosures", vec![(1, "Copy of policy"), (2, "Claim form")]),
        ("disclaimers", vec![(1, "This letter is not a waiver of rights.")]),
    ])
}

/// Build a catalog from `(group, [(id, content)])` pairs
pub fn catalog(groups: Vec<(&str, Vec<(i64, &str)>)>) -> FragmentCatalog {
    let mut raw = RawGroups::new();
    for (group, items) in groups {
        raw.insert(
            group.to_string(),
            items
                .into_iter()
                .map(|(id, content)| RawFragment::new(id, content))
                .collect(),
        );
    }
    FragmentCatalog::load(raw)
}

/// Session handles used by most tests
pub struct Harness {
    pub session: Session,
    pub log: Arc<NotificationLog>,
    pub store: Arc<MemoryStore>,
}

/// Session over `catalog` with an in-memory store and a notification log
pub fn harness(catalog: FragmentCatalog) -> Harness {
    harness_with_store(catalog, Arc::new(MemoryStore::new()))
}

/// Session over `catalog` with the given memory store
pub fn harness_with_store(catalog: FragmentCatalog, store: Arc<MemoryStore>) -> Harness {
    let log = Arc::new(NotificationLog::new());
    let session = Session::new(SessionConfig::default(), Arc::new(catalog), store.clone())
        .with_notifier(log.clone());
    Harness { session, log, store }
}

/// Store whose writes and reads always fail
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl BlobStore for FailingStore {
    async fn save(&self, _name: &str, _token: &Token) -> Result<(), StorageError> {
        Err(StorageError::Backend("disk full".into()))
    }

    async fn load(&self, _name: &str) -> Result<Token, StorageError> {
        Err(StorageError::Backend("device unavailable".into()))
    }

    async fn exists(&self, _name: &str) -> bool {
        false
    }

    async fn clear(&self, _name: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

/// Converter returning fixed markup
#[derive(Debug, Clone)]
pub struct StaticConverter {
    pub markup: String,
}

impl StaticConverter {
    pub fn new(markup: impl Into<String>) -> Self {
        Self { markup: markup.into() }
    }
}

#[async_trait]
impl DocumentConverter for StaticConverter {
    fn name(&self) -> &str {
        "static"
    }

    fn extensions(&self) -> &[&str] {
        &["docx"]
    }

    async fn convert(&self, _bytes: &[u8]) -> Result<String, String> {
        Ok(self.markup.clone())
    }
}

/// Converter that rejects every document
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingConverter;

#[async_trait]
impl DocumentConverter for FailingConverter {
    fn name(&self) -> &str {
        "failing"
    }

    fn extensions(&self) -> &[&str] {
        &["docx"]
    }

    async fn convert(&self, _bytes: &[u8]) -> Result<String, String> {
        Err("end of central directory record not found".into())
    }
}

/// Clipboard that refuses writes
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingClipboard;

#[async_trait]
impl Clipboard for FailingClipboard {
    async fn set_text(&self, _text: &str) -> Result<(), SessionError> {
        Err(SessionError::clipboard("permission denied"))
    }
}

/// Cursor-capable surface that records every cursor insertion
///
/// Inserts at a fixed byte position (clamped to the markup length) so
/// tests can predict the result.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    markup: String,
    cursor: usize,
    inserted: Arc<Mutex<Vec<String>>>,
}

impl RecordingSurface {
    pub fn new(markup: impl Into<String>, cursor: usize) -> Self {
        Self {
            markup: markup.into(),
            cursor,
            inserted: Arc::default(),
        }
    }

    /// Shared view of inserted texts, usable after the surface is boxed
    pub fn inserted(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.inserted)
    }
}

impl RichTextSurface for RecordingSurface {
    fn markup(&self) -> String {
        self.markup.clone()
    }

    fn replace_markup(&mut self, markup: &str) {
        self.markup = markup.to_string();
    }

    fn insert_at_cursor(&mut self, text: &str) -> Option<String> {
        let mut at = self.cursor.min(self.markup.len());
        while !self.markup.is_char_boundary(at) {
            at -= 1;
        }
        self.markup.insert_str(at, text);
        self.cursor = at + text.len();
        self.inserted.lock().push(text.to_string());
        Some(self.markup.clone())
    }
}

//! Session configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! slot_name = "editor-content.b64"
//! drop_zone = "editor"
//! source_url = "http://localhost:5000/call_document_api/41"
//! storage_dir = "/var/lib/fragdoc"
//! ```

use crate::error::SessionError;
use fragdoc_ingest::{IngestionNormalizer, DEFAULT_ALLOWED_MIME_TYPES, DEFAULT_STRUCTURED_EXTENSIONS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Slot every save and load of a session goes to
pub const DEFAULT_SLOT_NAME: &str = "editor-content.b64";

/// Drop zone id of the editor
pub const DEFAULT_DROP_ZONE: &str = "editor";

/// Endpoint the initial document is fetched from
pub const DEFAULT_SOURCE_URL: &str = "http://localhost:5000/call_document_api/41";

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Fixed persistence slot name
    pub slot_name: String,
    /// Designated editor drop-zone id
    pub drop_zone: String,
    /// Initial content endpoint
    pub source_url: String,
    /// MIME types accepted for non-structured uploads
    pub allowed_mime_types: Vec<String>,
    /// Extensions routed to a document converter
    pub structured_extensions: Vec<String>,
    /// Directory for the file-backed store; in-memory when unset
    pub storage_dir: Option<PathBuf>,
    /// Directory receiving a best-effort copy of each saved token
    pub export_dir: Option<PathBuf>,
    /// Fragment catalog JSON file
    pub fragments_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            slot_name: DEFAULT_SLOT_NAME.to_string(),
            drop_zone: DEFAULT_DROP_ZONE.to_string(),
            source_url: DEFAULT_SOURCE_URL.to_string(),
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES.iter().map(|m| (*m).to_string()).collect(),
            structured_extensions: DEFAULT_STRUCTURED_EXTENSIONS
                .iter()
                .map(|e| (*e).to_string())
                .collect(),
            storage_dir: None,
            export_dir: None,
            fragments_path: None,
        }
    }
}

impl SessionConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] on malformed TOML or an empty
    /// slot name / drop zone.
    pub fn from_toml_str(text: &str) -> Result<Self, SessionError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SessionError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded session config");
        Ok(config)
    }

    /// Check required fields
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] naming the first empty field.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.slot_name.trim().is_empty() {
            return Err(SessionError::Config("slot_name must not be empty".into()));
        }
        if self.drop_zone.trim().is_empty() {
            return Err(SessionError::Config("drop_zone must not be empty".into()));
        }
        Ok(())
    }

    /// With slot name
    #[inline]
    #[must_use]
    pub fn with_slot_name(mut self, name: impl Into<String>) -> Self {
        self.slot_name = name.into();
        self
    }

    /// With drop zone
    #[inline]
    #[must_use]
    pub fn with_drop_zone(mut self, zone: impl Into<String>) -> Self {
        self.drop_zone = zone.into();
        self
    }

    /// With source URL
    #[inline]
    #[must_use]
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    /// With storage directory
    #[inline]
    #[must_use]
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    /// With export directory
    #[inline]
    #[must_use]
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(dir.into());
        self
    }

    /// With fragment catalog path
    #[inline]
    #[must_use]
    pub fn with_fragments_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fragments_path = Some(path.into());
        self
    }

    /// Normalizer honoring the configured allow-lists
    #[must_use]
    pub fn normalizer(&self) -> IngestionNormalizer {
        IngestionNormalizer::new()
            .with_allowed_mime_types(&self.allowed_mime_types)
            .with_structured_extensions(&self.structured_extensions)
    }
}

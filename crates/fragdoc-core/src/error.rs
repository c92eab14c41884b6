//! Error types for fragdoc sessions
//!
//! Every failure a session action can hit maps to one [`ErrorKind`]:
//! - Initial content fetch
//! - Upload type rejection and conversion
//! - Slot save and load
//! - Clipboard copy
//! - Configuration
//!
//! A persisted token that does not decode is not an error here; restore
//! reports it as [`crate::RestoreOutcome::Unusable`].

use fragdoc_ingest::IngestError;
use fragdoc_storage::StorageError;

/// Main session error type
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Initial content could not be fetched
    #[error("network fetch failed: {0}")]
    NetworkFetchFailed(String),

    /// Upload neither structured nor an allowed MIME type
    #[error("unsupported file type: {mime}")]
    UnsupportedFileType {
        /// Reported MIME type
        mime: String,
    },

    /// Structured document conversion failed
    #[error("conversion failed: {0}")]
    ConversionFailed(#[source] IngestError),

    /// Persisting the encoded token failed
    #[error("storage save failed: {0}")]
    StorageSaveFailed(#[source] StorageError),

    /// Reading the persisted token failed
    #[error("storage load failed: {0}")]
    StorageLoadFailed(#[source] StorageError),

    /// Clipboard write failed or there was nothing to copy
    #[error("clipboard failed: {0}")]
    ClipboardFailed(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Discriminant of [`SessionError`] for matching and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`SessionError::NetworkFetchFailed`]
    NetworkFetchFailed,
    /// See [`SessionError::UnsupportedFileType`]
    UnsupportedFileType,
    /// See [`SessionError::ConversionFailed`]
    ConversionFailed,
    /// See [`SessionError::StorageSaveFailed`]
    StorageSaveFailed,
    /// See [`SessionError::StorageLoadFailed`]
    StorageLoadFailed,
    /// See [`SessionError::ClipboardFailed`]
    ClipboardFailed,
    /// See [`SessionError::Config`]
    Config,
}

impl SessionError {
    /// Kind of this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NetworkFetchFailed(_) => ErrorKind::NetworkFetchFailed,
            Self::UnsupportedFileType { .. } => ErrorKind::UnsupportedFileType,
            Self::ConversionFailed(_) => ErrorKind::ConversionFailed,
            Self::StorageSaveFailed(_) => ErrorKind::StorageSaveFailed,
            Self::StorageLoadFailed(_) => ErrorKind::StorageLoadFailed,
            Self::ClipboardFailed(_) => ErrorKind::ClipboardFailed,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Check if a load failed only because nothing was saved
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::StorageLoadFailed(e) if e.is_not_found())
    }

    /// Create network fetch error
    #[inline]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkFetchFailed(message.into())
    }

    /// Create clipboard error
    #[inline]
    pub fn clipboard(message: impl Into<String>) -> Self {
        Self::ClipboardFailed(message.into())
    }
}

impl From<IngestError> for SessionError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::UnsupportedType { mime, .. } => Self::UnsupportedFileType { mime },
            other => Self::ConversionFailed(other),
        }
    }
}

impl From<toml::de::Error> for SessionError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

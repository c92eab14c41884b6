//! Storage error types

use std::path::PathBuf;

/// Errors raised by [`crate::BlobStore`] implementations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Slot was never written or has been cleared
    #[error("slot '{name}' not found")]
    NotFound {
        /// Slot name
        name: String,
    },

    /// Slot name cannot be used as a storage key
    #[error("invalid slot name: '{0}'")]
    InvalidName(String),

    /// Filesystem failure
    #[error("io error on {}: {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Backend-specific failure
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Create not-found error for slot
    #[inline]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create IO error for path
    #[inline]
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if this is the not-found sub-case
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = StorageError::not_found("editor-content.b64");
        assert_eq!(err.to_string(), "slot 'editor-content.b64' not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn io_error_is_not_not_found() {
        let err = StorageError::io_error(
            "/tmp/x",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("/tmp/x"));
    }
}

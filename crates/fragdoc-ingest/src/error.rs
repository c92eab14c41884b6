//! Ingestion error types

/// Errors while turning an upload into content
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// MIME type outside the allow-list for non-structured files
    #[error("unsupported file type '{mime}' for {filename}")]
    UnsupportedType {
        /// Uploaded file name
        filename: String,
        /// Reported MIME type
        mime: String,
    },

    /// Structured document with no converter registered for it
    #[error("no converter registered for extension: '{0}'")]
    NoConverter(String),

    /// Converter rejected the bytes
    #[error("conversion of {filename} failed: {message}")]
    ConversionFailed {
        /// Uploaded file name
        filename: String,
        /// Converter message
        message: String,
    },
}

impl IngestError {
    /// Create conversion failure for file
    #[inline]
    pub fn conversion_failed(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConversionFailed {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Check if the upload was rejected by type rather than by content
    #[inline]
    #[must_use]
    pub fn is_unsupported_type(&self) -> bool {
        matches!(self, Self::UnsupportedType { .. })
    }
}

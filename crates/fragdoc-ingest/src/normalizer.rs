//! Upload normalization

use crate::converter::{extension_of, ConverterRegistry, DocumentConverter};
use crate::error::IngestError;
use crate::sanitize::sanitize_text;
use crate::{DEFAULT_ALLOWED_MIME_TYPES, DEFAULT_STRUCTURED_EXTENSIONS};
use std::sync::Arc;

/// Where normalized content came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Produced by a structured-document converter
    Structured {
        /// Converter name
        converter: String,
    },
    /// Decoded and sanitized plain-text-family upload
    PlainText {
        /// Accepted MIME type (normalized)
        mime: String,
    },
}

/// Content ready to become the composition document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    /// Original upload name, for user feedback
    pub filename: String,
    /// Markup or sanitized text
    pub content: String,
    /// How the content was produced
    pub source: SourceKind,
}

/// Turns uploads into document content
///
/// Structured documents (by extension) go through the converter registry;
/// everything else must carry an allowed MIME type and is sanitized as text.
#[derive(Debug, Clone)]
pub struct IngestionNormalizer {
    converters: ConverterRegistry,
    allowed_mime_types: Vec<String>,
    structured_extensions: Vec<String>,
}

impl Default for IngestionNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl IngestionNormalizer {
    /// Create normalizer with default allow-lists and no converters
    #[must_use]
    pub fn new() -> Self {
        Self {
            converters: ConverterRegistry::new(),
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES.iter().map(|m| (*m).to_string()).collect(),
            structured_extensions: DEFAULT_STRUCTURED_EXTENSIONS
                .iter()
                .map(|e| (*e).to_string())
                .collect(),
        }
    }

    /// Replace the MIME allow-list
    #[must_use]
    pub fn with_allowed_mime_types<I, S>(mut self, mimes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_mime_types = mimes.into_iter().map(|m| essence(m.as_ref())).collect();
        self
    }

    /// Replace the structured extension list
    #[must_use]
    pub fn with_structured_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.structured_extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Register a converter for structured documents
    #[must_use]
    pub fn with_converter<C: DocumentConverter>(mut self, converter: C) -> Self {
        self.converters.register(converter);
        self
    }

    /// Register an already shared converter
    #[must_use]
    pub fn with_converter_arc(mut self, converter: Arc<dyn DocumentConverter>) -> Self {
        self.converters.register_arc(converter);
        self
    }

    /// Registered converters
    #[inline]
    #[must_use]
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Accepted MIME types
    #[inline]
    #[must_use]
    pub fn allowed_mime_types(&self) -> &[String] {
        &self.allowed_mime_types
    }

    /// Check if a file name names a structured document
    #[must_use]
    pub fn is_structured(&self, filename: &str) -> bool {
        extension_of(filename)
            .map(|ext| self.structured_extensions.iter().any(|e| *e == ext))
            .unwrap_or(false)
    }

    /// Check if a MIME type is on the allow-list
    #[must_use]
    pub fn is_allowed_mime(&self, mime: &str) -> bool {
        let mime = essence(mime);
        self.allowed_mime_types.iter().any(|m| *m == mime)
    }

    /// Normalize an upload into content
    ///
    /// # Errors
    ///
    /// - [`IngestError::UnsupportedType`] for a non-structured file whose
    ///   MIME type is not allowed
    /// - [`IngestError::NoConverter`] for a structured file nobody converts
    /// - [`IngestError::ConversionFailed`] when the converter fails
    pub async fn normalize(
        &self,
        filename: &str,
        bytes: &[u8],
        mime: &str,
    ) -> Result<NormalizedDocument, IngestError> {
        if self.is_structured(filename) {
            return self.convert_structured(filename, bytes).await;
        }

        if !self.is_allowed_mime(mime) {
            tracing::debug!(filename, mime, "rejected upload type");
            return Err(IngestError::UnsupportedType {
                filename: filename.to_string(),
                mime: mime.to_string(),
            });
        }

        let text = String::from_utf8_lossy(bytes);
        let content = sanitize_text(&text);
        tracing::debug!(
            filename,
            mime,
            bytes = bytes.len(),
            chars = content.chars().count(),
            "normalized text upload"
        );

        Ok(NormalizedDocument {
            filename: filename.to_string(),
            content,
            source: SourceKind::PlainText { mime: essence(mime) },
        })
    }

    async fn convert_structured(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<NormalizedDocument, IngestError> {
        let Some(converter) = self.converters.find_for(filename) else {
            let extension = extension_of(filename).unwrap_or_default();
            tracing::warn!(filename, %extension, "no converter for structured upload");
            return Err(IngestError::NoConverter(extension));
        };

        let content = converter
            .convert(bytes)
            .await
            .map_err(|message| IngestError::conversion_failed(filename, message))?;

        tracing::debug!(
            filename,
            converter = converter.name(),
            chars = content.chars().count(),
            "converted structured upload"
        );

        Ok(NormalizedDocument {
            filename: filename.to_string(),
            content,
            source: SourceKind::Structured {
                converter: converter.name().to_string(),
            },
        })
    }
}

/// MIME type without parameters, lowercased
fn essence(mime: &str) -> String {
    mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    struct Html(&'static str);

    #[async_trait]
    impl DocumentConverter for Html {
        fn name(&self) -> &str {
            "html"
        }

        fn extensions(&self) -> &[&str] {
            &["docx"]
        }

        async fn convert(&self, _bytes: &[u8]) -> Result<String, String> {
            Ok(self.0.to_string())
        }
    }

    struct Broken;

    #[async_trait]
    impl DocumentConverter for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn extensions(&self) -> &[&str] {
            &["docx"]
        }

        async fn convert(&self, _bytes: &[u8]) -> Result<String, String> {
            Err("not a zip archive".into())
        }
    }

    #[tokio::test]
    async fn plain_text_is_sanitized() {
        let normalizer = IngestionNormalizer::new();
        let doc = normalizer
            .normalize("notes.txt", "\u{FEFF}a\tb\r\nc".as_bytes(), "text/plain")
            .await
            .unwrap();
        assert_eq!(doc.content, "ab\nc");
        assert_eq!(doc.filename, "notes.txt");
        assert_eq!(doc.source, SourceKind::PlainText { mime: "text/plain".into() });
    }

    #[tokio::test]
    async fn markdown_and_html_are_allowed() {
        let normalizer = IngestionNormalizer::new();
        for mime in ["text/markdown", "text/html", "TEXT/HTML; charset=utf-8"] {
            assert!(normalizer.normalize("x", b"# hi", mime).await.is_ok(), "{mime}");
        }
    }

    #[tokio::test]
    async fn unsupported_type_rejected() {
        let normalizer = IngestionNormalizer::new();
        let err = normalizer
            .normalize("report.pdf", b"%PDF", "application/pdf")
            .await
            .unwrap_err();
        assert!(err.is_unsupported_type());
    }

    #[tokio::test]
    async fn empty_mime_rejected() {
        let normalizer = IngestionNormalizer::new();
        let err = normalizer.normalize("notes.md", b"x", "").await.unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedType { .. }));
    }

    #[tokio::test]
    async fn invalid_utf8_is_replaced() {
        let normalizer = IngestionNormalizer::new();
        let doc = normalizer
            .normalize("a.txt", &[b'o', b'k', 0xFF], "text/plain")
            .await
            .unwrap();
        assert_eq!(doc.content, "ok\u{FFFD}");
    }

    #[tokio::test]
    async fn structured_markup_taken_verbatim() {
        let normalizer = IngestionNormalizer::new().with_converter(Html("<p>\tHi</p>"));
        let doc = normalizer
            .normalize("Letter.DOCX", b"PK\x03\x04", "application/octet-stream")
            .await
            .unwrap();
        assert_eq!(doc.content, "<p>\tHi</p>");
        assert_eq!(doc.source, SourceKind::Structured { converter: "html".into() });
    }

    #[tokio::test]
    async fn bare_docx_name_is_structured() {
        let normalizer = IngestionNormalizer::new().with_converter(Html("<p>ok</p>"));
        assert!(normalizer.is_structured(".docx"));
        let doc = normalizer
            .normalize(".docx", b"PK\x03\x04", "")
            .await
            .unwrap();
        assert_eq!(doc.content, "<p>ok</p>");
    }

    #[tokio::test]
    async fn structured_without_converter() {
        let normalizer = IngestionNormalizer::new();
        let err = normalizer
            .normalize("a.docx", b"PK", "text/plain")
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::NoConverter(ref ext) if ext == "docx"));
    }

    #[tokio::test]
    async fn converter_failure_reported() {
        let normalizer = IngestionNormalizer::new().with_converter(Broken);
        let err = normalizer.normalize("a.docx", b"", "").await.unwrap_err();
        match err {
            IngestError::ConversionFailed { filename, message } => {
                assert_eq!(filename, "a.docx");
                assert_eq!(message, "not a zip archive");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn custom_allow_lists() {
        let normalizer = IngestionNormalizer::new()
            .with_allowed_mime_types(["application/json"])
            .with_structured_extensions([".ODT"]);
        assert!(normalizer.is_allowed_mime("application/json"));
        assert!(!normalizer.is_allowed_mime("text/plain"));
        assert!(normalizer.is_structured("a.odt"));
        assert!(!normalizer.is_structured("a.docx"));
    }
}

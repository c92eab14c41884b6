//! Structured-document converters
//!
//! A converter turns the raw bytes of a binary document (e.g. `.docx`)
//! into rich-text markup. Converters are registered by extension and
//! tried in priority order.

use async_trait::async_trait;
use std::sync::Arc;

/// Converts structured document bytes into markup
///
/// Implement this trait to support a new structured format.
#[async_trait]
pub trait DocumentConverter: Send + Sync + 'static {
    /// Human-readable converter name for logs
    fn name(&self) -> &str;

    /// Supported file extensions (lowercase, without dot)
    fn extensions(&self) -> &[&str];

    /// Converter priority (higher = tried first when several match)
    fn priority(&self) -> i32 {
        0
    }

    /// Check if this converter handles the given file name
    fn can_convert(&self, filename: &str) -> bool {
        extension_of(filename)
            .map(|ext| self.extensions().iter().any(|e| e.eq_ignore_ascii_case(&ext)))
            .unwrap_or(false)
    }

    /// Convert bytes into markup
    ///
    /// Error messages should describe the failure; the normalizer attaches
    /// the file name.
    async fn convert(&self, bytes: &[u8]) -> Result<String, String>;
}

/// Lowercased text after the last `.` of the file name, if any
///
/// A bare `.docx` counts as having the extension `docx`.
#[must_use]
pub fn extension_of(filename: &str) -> Option<String> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    name.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .map(str::to_ascii_lowercase)
}

/// Converter registration, highest priority first
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: Vec<Arc<dyn DocumentConverter>>,
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("converter_count", &self.converters.len())
            .field("extensions", &self.all_extensions())
            .finish()
    }
}

impl ConverterRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter
    pub fn register<C: DocumentConverter>(&mut self, converter: C) {
        self.register_arc(Arc::new(converter));
    }

    /// Register an already shared converter
    pub fn register_arc(&mut self, converter: Arc<dyn DocumentConverter>) {
        tracing::debug!(
            converter = converter.name(),
            extensions = ?converter.extensions(),
            "registered document converter"
        );
        self.converters.push(converter);
        // Stable sort keeps registration order among equal priorities
        self.converters
            .sort_by_key(|c| std::cmp::Reverse(c.priority()));
    }

    /// Find converter for file name
    #[must_use]
    pub fn find_for(&self, filename: &str) -> Option<&Arc<dyn DocumentConverter>> {
        self.converters.iter().find(|c| c.can_convert(filename))
    }

    /// Get all registered extensions
    #[must_use]
    pub fn all_extensions(&self) -> Vec<&str> {
        self.converters
            .iter()
            .flat_map(|c| c.extensions())
            .copied()
            .collect()
    }

    /// Number of registered converters
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Check if no converter is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

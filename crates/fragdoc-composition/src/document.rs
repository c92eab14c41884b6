//! The composition document
//!
//! Single source of truth for the document body. Typed edits and fragment
//! insertions both go through [`CompositionDocument::set_content`], so
//! dirty tracking does not depend on where a change came from.

/// Current document content and its persistence flags
///
/// # Invariant
/// `is_dirty()` is false only right after [`Self::mark_saved`], or after
/// [`Self::mark_loaded`] with no edit since.
#[derive(Debug, Clone, Default)]
pub struct CompositionDocument {
    content: String,
    dirty: bool,
    loaded: bool,
}

impl CompositionDocument {
    /// Create empty, clean, not-loaded document
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace content; the document becomes dirty
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.dirty = true;
        tracing::trace!(len = self.content.len(), "document content replaced");
    }

    /// Record that the current content has been persisted
    pub fn mark_saved(&mut self) {
        self.dirty = false;
        tracing::debug!(len = self.content.len(), "document marked saved");
    }

    /// Replace content from a load; leaves the dirty flag untouched
    pub fn mark_loaded(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.loaded = true;
    }

    /// Set the loaded flag without touching content
    #[inline]
    pub fn flag_loaded(&mut self) {
        self.loaded = true;
    }

    /// Current content
    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether there are unsaved changes
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether content has been loaded from a source or upload
    #[inline]
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_is_clean() {
        let doc = CompositionDocument::new();
        assert_eq!(doc.content(), "");
        assert!(!doc.is_dirty());
        assert!(!doc.is_loaded());
    }

    #[test]
    fn set_content_dirties() {
        let mut doc = CompositionDocument::new();
        doc.set_content("abc");
        assert_eq!(doc.content(), "abc");
        assert!(doc.is_dirty());
    }

    #[test]
    fn mark_saved_cleans() {
        let mut doc = CompositionDocument::new();
        doc.set_content("abc");
        doc.mark_saved();
        assert!(!doc.is_dirty());
        assert_eq!(doc.content(), "abc");
    }

    #[test]
    fn mark_loaded_does_not_dirty() {
        let mut doc = CompositionDocument::new();
        doc.mark_loaded("fetched");
        assert_eq!(doc.content(), "fetched");
        assert!(doc.is_loaded());
        assert!(!doc.is_dirty());
    }

    #[test]
    fn mark_loaded_keeps_existing_dirty_flag() {
        let mut doc = CompositionDocument::new();
        doc.set_content("typed");
        doc.mark_loaded("fetched");
        assert!(doc.is_dirty());
    }

    #[test]
    fn identical_edit_is_still_dirty() {
        let mut doc = CompositionDocument::new();
        doc.set_content("same");
        doc.mark_saved();
        doc.set_content("same");
        assert!(doc.is_dirty());
    }
}

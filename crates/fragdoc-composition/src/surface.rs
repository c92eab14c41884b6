//! Rich-text editing surface collaborator
//!
//! The surface renders and edits markup; this crate only needs to read it,
//! push content into it, and, when the surface supports it, insert text at
//! its cursor.

/// An editing surface the document is displayed in
pub trait RichTextSurface: Send {
    /// Current content as markup
    fn markup(&self) -> String;

    /// Replace the displayed content
    fn replace_markup(&mut self, markup: &str);

    /// Insert literal text at the cursor, returning the resulting markup
    ///
    /// `None` means the surface has no cursor-insertion capability; callers
    /// fall back to appending.
    fn insert_at_cursor(&mut self, _text: &str) -> Option<String> {
        None
    }
}

/// Plain-text surface with a character-offset cursor
#[derive(Debug, Clone, Default)]
pub struct PlainTextSurface {
    text: String,
    /// Cursor position in chars
    cursor: usize,
}

impl PlainTextSurface {
    /// Create surface with text, cursor at end
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    /// Move the cursor, clamped to the text length
    pub fn set_cursor(&mut self, position: usize) {
        self.cursor = position.min(self.text.chars().count());
    }

    /// Cursor position in chars
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Simulate a user edit; returns the markup a change notification carries
    pub fn edit(&mut self, text: impl Into<String>) -> String {
        self.replace_markup(&text.into());
        self.text.clone()
    }

    fn byte_offset(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

impl RichTextSurface for PlainTextSurface {
    fn markup(&self) -> String {
        self.text.clone()
    }

    fn replace_markup(&mut self, markup: &str) {
        self.text = markup.to_string();
        self.cursor = self.cursor.min(self.text.chars().count());
    }

    fn insert_at_cursor(&mut self, text: &str) -> Option<String> {
        let at = self.byte_offset();
        self.text.insert_str(at, text);
        self.cursor += text.chars().count();
        Some(self.text.clone())
    }
}

/// Surface without a cursor-insertion capability
#[derive(Debug, Clone, Default)]
pub struct AppendOnlySurface {
    text: String,
}

impl AppendOnlySurface {
    /// Create surface with text
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl RichTextSurface for AppendOnlySurface {
    fn markup(&self) -> String {
        self.text.clone()
    }

    fn replace_markup(&mut self, markup: &str) {
        self.text = markup.to_string();
    }
}

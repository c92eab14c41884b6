//! Clipboard collaborator

use crate::error::SessionError;
use async_trait::async_trait;
use parking_lot::Mutex;

/// Best-effort system clipboard
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Replace clipboard text
    ///
    /// # Errors
    ///
    /// Implementations return [`SessionError::ClipboardFailed`].
    async fn set_text(&self, text: &str) -> Result<(), SessionError>;
}

/// In-process clipboard
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: Mutex<Option<String>>,
}

impl MemoryClipboard {
    /// Create empty clipboard
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clipboard text
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.text.lock().clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn set_text(&self, text: &str) -> Result<(), SessionError> {
        *self.text.lock() = Some(text.to_string());
        Ok(())
    }
}

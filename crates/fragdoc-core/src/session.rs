//! The composition session
//!
//! Owns every piece of mutable state for one document and routes each
//! user action through it:
//! - Initial load and restore from the persistence slot
//! - Typed edits and uploads
//! - Drag-and-drop fragment insertion
//! - Save and copy of the encoded token
//!
//! Each action either applies fully or leaves the state as it was, and
//! reports exactly one [`Notification`] when it changes (or fails to
//! change) something.

use crate::clipboard::Clipboard;
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::notify::{Notification, Notifier, TracingNotifier};
use crate::source::ContentSource;
use fragdoc_catalog::{Fragment, FragmentCatalog, FragmentId};
use fragdoc_codec::Token;
use fragdoc_composition::{
    CompositionDocument, DragSession, DragState, DropOutcome, InsertionContext, InsertionProtocol,
    RichTextSurface, UsageMeter, UsageSet,
};
use fragdoc_ingest::{DocumentConverter, IngestError, IngestionNormalizer};
use fragdoc_storage::BlobStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ulid::Ulid;

/// Unique session identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Ulid);

impl SessionId {
    /// Generate new session ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of restoring the persisted slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Slot decoded and replaced the document
    Restored {
        /// Characters restored
        chars: usize,
    },
    /// Slot holds a token that does not decode; nothing changed
    Unusable,
}

/// One document composition session
pub struct Session {
    id: SessionId,
    config: SessionConfig,
    document: CompositionDocument,
    usage: UsageSet,
    meter: UsageMeter,
    drag: DragSession,
    protocol: InsertionProtocol,
    catalog: Arc<FragmentCatalog>,
    store: Arc<dyn BlobStore>,
    normalizer: IngestionNormalizer,
    notifier: Arc<dyn Notifier>,
    surface: Option<Box<dyn RichTextSurface>>,
    last_token: Option<Token>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("slot", &self.config.slot_name)
            .field("document", &self.document)
            .field("usage", &self.usage)
            .field("meter", &self.meter)
            .field("drag", &self.drag)
            .field("catalog_len", &self.catalog.len())
            .field("store", &self.store.backend())
            .field("surface", &self.surface.is_some())
            .field("has_token", &self.last_token.is_some())
            .finish()
    }
}

impl Session {
    /// Create session over a catalog and store
    ///
    /// Notifications go to tracing until [`Self::with_notifier`] is used.
    #[must_use]
    pub fn new(
        config: SessionConfig,
        catalog: Arc<FragmentCatalog>,
        store: Arc<dyn BlobStore>,
    ) -> Self {
        let id = SessionId::new();
        tracing::debug!(
            session = %id,
            slot = %config.slot_name,
            fragments = catalog.len(),
            backend = store.backend(),
            "session created"
        );
        Self {
            id,
            protocol: InsertionProtocol::new(config.drop_zone.clone()),
            normalizer: config.normalizer(),
            config,
            document: CompositionDocument::new(),
            usage: UsageSet::new(),
            meter: UsageMeter::new(),
            drag: DragSession::new(),
            catalog,
            store,
            notifier: Arc::new(TracingNotifier),
            surface: None,
            last_token: None,
        }
    }

    /// With notification sink
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// With rich-text surface; the surface is synced to the current content
    #[must_use]
    pub fn with_surface(mut self, mut surface: Box<dyn RichTextSurface>) -> Self {
        surface.replace_markup(self.document.content());
        self.surface = Some(surface);
        self
    }

    /// With structured-document converter
    #[must_use]
    pub fn with_converter<C: DocumentConverter>(mut self, converter: C) -> Self {
        self.normalizer = self.normalizer.with_converter(converter);
        self
    }

    /// With shared structured-document converter
    #[must_use]
    pub fn with_converter_arc(mut self, converter: Arc<dyn DocumentConverter>) -> Self {
        self.normalizer = self.normalizer.with_converter_arc(converter);
        self
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Fetch the initial document
    ///
    /// On success the content replaces the document and it is marked
    /// loaded; the dirty flag is left alone.
    ///
    /// # Errors
    ///
    /// [`SessionError::NetworkFetchFailed`]; the document is unchanged.
    pub async fn load_initial(&mut self, source: &dyn ContentSource) -> Result<(), SessionError> {
        match source.fetch().await {
            Ok(text) => {
                tracing::info!(session = %self.id, source = %source.describe(), chars = text.chars().count(), "initial content loaded");
                self.document.mark_loaded(text);
                self.sync_surface();
                self.notify(Notification::success("Content loaded from URL"));
                Ok(())
            }
            Err(e) => {
                tracing::error!(session = %self.id, source = %source.describe(), error = %e, "initial content fetch failed");
                self.notify(Notification::error("Failed to load content from URL"));
                Err(e)
            }
        }
    }

    /// Replace the document with the persisted slot
    ///
    /// Restored content equals the stored snapshot, so the document is
    /// clean afterwards. A token that does not decode is
    /// [`RestoreOutcome::Unusable`], not an error.
    ///
    /// # Errors
    ///
    /// [`SessionError::StorageLoadFailed`], including the not-found case.
    pub async fn restore_saved(&mut self) -> Result<RestoreOutcome, SessionError> {
        let token = match self.store.load(&self.config.slot_name).await {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(session = %self.id, slot = %self.config.slot_name, error = %e, "restore failed");
                self.notify(Notification::error("Failed to load saved content"));
                return Err(SessionError::StorageLoadFailed(e));
            }
        };

        let text = token.decode();
        if text.is_empty() && !token.is_empty() {
            tracing::warn!(session = %self.id, slot = %self.config.slot_name, len = token.len(), "persisted token is malformed");
            return Ok(RestoreOutcome::Unusable);
        }

        let chars = text.chars().count();
        self.document.mark_loaded(text);
        self.document.mark_saved();
        self.last_token = Some(token);
        self.sync_surface();
        tracing::info!(session = %self.id, slot = %self.config.slot_name, chars, "restored saved content");
        self.notify(Notification::success("Content restored from storage"));
        Ok(RestoreOutcome::Restored { chars })
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Record an edit; the attached surface is brought in line with it
    pub fn on_edit(&mut self, markup: impl Into<String>) {
        self.document.set_content(markup);
        self.sync_surface();
        tracing::debug!(session = %self.id, "content edited");
    }

    /// Replace the document with an uploaded file
    ///
    /// # Errors
    ///
    /// - [`SessionError::UnsupportedFileType`] for a disallowed MIME type
    /// - [`SessionError::ConversionFailed`] when a structured document
    ///   cannot be converted
    ///
    /// Either way the document is unchanged.
    pub async fn upload(
        &mut self,
        filename: &str,
        bytes: &[u8],
        mime: &str,
    ) -> Result<(), SessionError> {
        match self.normalizer.normalize(filename, bytes, mime).await {
            Ok(doc) => {
                self.document.set_content(doc.content);
                self.document.flag_loaded();
                self.sync_surface();
                tracing::info!(session = %self.id, filename, source = ?doc.source, "upload loaded");
                self.notify(Notification::success(format!(
                    "File \"{}\" loaded successfully",
                    doc.filename
                )));
                Ok(())
            }
            Err(e @ IngestError::UnsupportedType { .. }) => {
                tracing::warn!(session = %self.id, filename, mime, "upload rejected");
                self.notify(Notification::error(
                    "Please upload only text or Word (.docx) files",
                ));
                Err(e.into())
            }
            Err(e) => {
                tracing::error!(session = %self.id, filename, error = %e, "upload conversion failed");
                self.notify(Notification::error("Error processing file content"));
                Err(e.into())
            }
        }
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Encode the content and write it to the slot
    ///
    /// # Errors
    ///
    /// [`SessionError::StorageSaveFailed`]; the document stays dirty and the
    /// previously saved token is kept.
    pub async fn save(&mut self) -> Result<Token, SessionError> {
        let token = Token::encode(self.document.content());
        match self.store.save(&self.config.slot_name, &token).await {
            Ok(()) => {
                self.document.mark_saved();
                self.last_token = Some(token.clone());
                tracing::info!(session = %self.id, slot = %self.config.slot_name, len = token.len(), "content saved");
                self.notify(Notification::success("Content saved successfully"));
                Ok(token)
            }
            Err(e) => {
                tracing::error!(session = %self.id, slot = %self.config.slot_name, error = %e, "save failed");
                self.notify(Notification::error("Failed to save content"));
                Err(SessionError::StorageSaveFailed(e))
            }
        }
    }

    /// Copy the last saved token to the clipboard
    ///
    /// # Errors
    ///
    /// [`SessionError::ClipboardFailed`] when nothing was saved yet or the
    /// clipboard refuses the write.
    pub async fn copy_token(&self, clipboard: &dyn Clipboard) -> Result<(), SessionError> {
        let Some(token) = &self.last_token else {
            self.notify(Notification::error("No content to copy"));
            return Err(SessionError::clipboard("no saved token"));
        };

        match clipboard.set_text(token.as_str()).await {
            Ok(()) => {
                self.notify(Notification::success("Base64 content copied to clipboard"));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(session = %self.id, error = %e, "clipboard write failed");
                self.notify(Notification::error("Failed to copy to clipboard"));
                Err(e)
            }
        }
    }

    /// Acknowledge a template save
    pub fn save_template(&self) {
        self.notify(Notification::success("Template saved successfully"));
    }

    /// Acknowledge a review request
    pub fn send_for_review(&self) {
        self.notify(Notification::success("Content sent for review"));
    }

    // ------------------------------------------------------------------
    // Drag and drop
    // ------------------------------------------------------------------

    /// Start dragging a fragment
    pub fn drag_start(&mut self, id: impl Into<FragmentId>) {
        self.protocol.on_drag_start(&mut self.drag, id);
    }

    /// Finish the active drag over `drop_target`
    pub fn drag_end(&mut self, drop_target: Option<&str>) -> DropOutcome {
        let surface: Option<&mut dyn RichTextSurface> = match self.surface.as_mut() {
            Some(surface) => Some(surface.as_mut()),
            None => None,
        };
        let mut ctx = InsertionContext {
            document: &mut self.document,
            usage: &mut self.usage,
            meter: &mut self.meter,
            drag: &mut self.drag,
            catalog: &self.catalog,
            surface,
        };
        let outcome = self.protocol.on_drag_end(&mut ctx, drop_target);

        if outcome.is_inserted() {
            self.notify(Notification::success("Text added to editor"));
        }
        outcome
    }

    /// Abandon the active drag; returns whether one was active
    pub fn drag_cancel(&mut self) -> bool {
        self.protocol.on_drag_cancel(&mut self.drag)
    }

    /// Fragment being dragged, for a drag preview
    #[must_use]
    pub fn active_fragment(&self) -> Option<&Fragment> {
        self.drag
            .active()
            .and_then(|id| self.catalog.get(id.as_str()))
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Session id
    #[inline]
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Document state
    #[inline]
    #[must_use]
    pub fn document(&self) -> &CompositionDocument {
        &self.document
    }

    /// Current content
    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        self.document.content()
    }

    /// Check for unsaved changes
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.document.is_dirty()
    }

    /// Check if content was loaded from a source or upload
    #[inline]
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.document.is_loaded()
    }

    /// Check if saving would persist anything new
    #[inline]
    #[must_use]
    pub fn can_save(&self) -> bool {
        self.document.is_dirty()
    }

    /// Fragments used so far
    #[inline]
    #[must_use]
    pub fn usage(&self) -> &UsageSet {
        &self.usage
    }

    /// Total insertions, counting reuse
    #[inline]
    #[must_use]
    pub fn insertions(&self) -> u64 {
        self.meter.insertions()
    }

    /// Insertions per catalog fragment, as a percentage
    #[inline]
    #[must_use]
    pub fn usage_ratio(&self) -> f64 {
        self.meter.ratio()
    }

    /// Fragments of `group` not used yet
    #[must_use]
    pub fn unused_in_group(&self, group: &str) -> usize {
        self.catalog.unused_in_group(group, &self.usage)
    }

    /// Fragment catalog
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &FragmentCatalog {
        &self.catalog
    }

    /// Drag state
    #[inline]
    #[must_use]
    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    /// Token written by the last successful save or restore
    #[inline]
    #[must_use]
    pub fn last_token(&self) -> Option<&Token> {
        self.last_token.as_ref()
    }

    /// Attached surface
    #[must_use]
    pub fn surface(&self) -> Option<&dyn RichTextSurface> {
        self.surface.as_deref()
    }

    /// Attached surface, mutably
    #[must_use]
    pub fn surface_mut(&mut self) -> Option<&mut (dyn RichTextSurface + 'static)> {
        self.surface.as_deref_mut()
    }

    fn sync_surface(&mut self) {
        if let Some(surface) = self.surface.as_deref_mut() {
            surface.replace_markup(self.document.content());
        }
    }

    fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }
}

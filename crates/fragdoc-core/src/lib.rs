//! Fragdoc Core - document composition sessions
//!
//! Ties the codec, storage, catalog, composition and ingestion crates into
//! one [`Session`] that a front-end drives with user actions.
//!
//! # Core Concepts
//!
//! - [`Session`]: owns the document, usage, drag slot and token
//! - [`SessionConfig`]: slot name, drop zone, source URL, allow-lists
//! - [`Notifier`]: receives one [`Notification`] per state-changing action
//! - [`ContentSource`] / [`Clipboard`]: external collaborators
//!
//! # Example
//!
//! ```rust
//! use fragdoc_catalog::{FragmentCatalog, RawFragment, RawGroups};
//! use fragdoc_core::{Session, SessionConfig, StaticContentSource};
//! use fragdoc_storage::MemoryStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), fragdoc_core::SessionError> {
//! let mut groups = RawGroups::new();
//! groups.insert("A".into(), vec![RawFragment::numbered(1, "x")]);
//!
//! let mut session = Session::new(
//!     SessionConfig::default(),
//!     Arc::new(FragmentCatalog::load(groups)),
//!     Arc::new(MemoryStore::new()),
//! );
//!
//! session.load_initial(&StaticContentSource::ok("Hello")).await?;
//! session.drag_start("A-1");
//! session.drag_end(Some("editor"));
//! let token = session.save().await?;
//!
//! assert_eq!(session.content(), "Hello\n[x]");
//! assert!(!session.is_dirty());
//! assert_eq!(token.decode(), "Hello\n[x]");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod clipboard;
pub mod config;
pub mod error;
pub mod notify;
pub mod session;
pub mod source;

// Re-exports for convenience
pub use clipboard::{Clipboard, MemoryClipboard};
pub use config::{SessionConfig, DEFAULT_DROP_ZONE, DEFAULT_SLOT_NAME, DEFAULT_SOURCE_URL};
pub use error::{ErrorKind, SessionError};
pub use notify::{Notification, NotificationLog, Notifier, Severity, TracingNotifier};
pub use session::{RestoreOutcome, Session, SessionId};
pub use source::{ContentSource, HttpContentSource, StaticContentSource};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with fragdoc sessions
    pub use crate::{
        Clipboard, ContentSource, Notification, NotificationLog, Notifier, RestoreOutcome,
        Session, SessionConfig, SessionError,
    };
    pub use fragdoc_catalog::{Fragment, FragmentCatalog, FragmentId};
    pub use fragdoc_codec::Token;
    pub use fragdoc_composition::{DropOutcome, RichTextSurface};
    pub use fragdoc_storage::BlobStore;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

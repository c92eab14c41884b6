//! Fragdoc Composition
//!
//! Document state and the drag-and-drop protocol that turns a dropped
//! fragment into a content mutation.
//!
//! # Core Concepts
//!
//! - [`CompositionDocument`]: current content plus dirty/loaded flags
//! - [`UsageSet`] / [`UsageMeter`]: which fragments were used, and how often
//! - [`DragSession`]: single-slot `IDLE ⇄ DRAGGING(id)` state
//! - [`InsertionProtocol`]: drag-start / drag-end / cancel transitions
//! - [`RichTextSurface`]: the editing surface, optionally cursor-capable
//!
//! # Example
//!
//! ```rust
//! use fragdoc_catalog::{FragmentCatalog, RawFragment, RawGroups};
//! use fragdoc_composition::{
//!     CompositionDocument, DragSession, InsertionContext, InsertionProtocol, UsageMeter, UsageSet,
//! };
//!
//! let mut groups = RawGroups::new();
//! groups.insert("A".into(), vec![RawFragment::numbered(1, "x")]);
//! let catalog = FragmentCatalog::load(groups);
//!
//! let mut document = CompositionDocument::new();
//! document.mark_loaded("Hello");
//! let mut usage = UsageSet::new();
//! let mut meter = UsageMeter::new();
//! let mut drag = DragSession::new();
//! let protocol = InsertionProtocol::new("editor");
//!
//! protocol.on_drag_start(&mut drag, "A-1");
//! let mut ctx = InsertionContext {
//!     document: &mut document,
//!     usage: &mut usage,
//!     meter: &mut meter,
//!     drag: &mut drag,
//!     catalog: &catalog,
//!     surface: None,
//! };
//! protocol.on_drag_end(&mut ctx, Some("editor"));
//!
//! assert_eq!(document.content(), "Hello\n[x]");
//! assert!(usage.contains("A-1"));
//! assert!(drag.is_idle());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod document;
mod drag;
mod protocol;
mod surface;
mod usage;

pub use document::CompositionDocument;
pub use drag::{DragSession, DragState};
pub use protocol::{DropOutcome, InsertionContext, InsertionProtocol, InsertionReport, Placement};
pub use surface::{AppendOnlySurface, PlainTextSurface, RichTextSurface};
pub use usage::{UsageMeter, UsageSet};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

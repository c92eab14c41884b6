//! Drag-and-drop insertion protocol
//!
//! ```text
//!            on_drag_start(id)
//!   IDLE ─────────────────────────► DRAGGING(id)
//!    ▲                                   │
//!    └────── on_drag_end / cancel ───────┘
//! ```
//!
//! A drop onto the designated editor zone inserts the dragged fragment's
//! wrapped content; every other ending only returns to `IDLE`.

use crate::document::CompositionDocument;
use crate::drag::DragSession;
use crate::surface::RichTextSurface;
use crate::usage::{UsageMeter, UsageSet};
use fragdoc_catalog::{FragmentCatalog, FragmentId};

/// Where inserted text landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// At the surface's cursor
    Cursor,
    /// Appended to the end of the document
    Append,
}

/// Effect of a successful drop
#[derive(Debug, Clone, PartialEq)]
pub struct InsertionReport {
    /// Inserted fragment
    pub fragment_id: FragmentId,
    /// Text that was inserted
    pub inserted: String,
    /// Where it went
    pub placement: Placement,
    /// Whether this was the fragment's first use
    pub first_use: bool,
    /// Usage ratio after this insertion
    pub ratio: f64,
}

/// Result of ending a drag
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// Fragment inserted
    Inserted(InsertionReport),
    /// Dropped outside the editor zone (or over nothing)
    Rejected {
        /// Dragged fragment
        fragment_id: FragmentId,
        /// Zone it was dropped on
        target: Option<String>,
    },
    /// Dragged id does not resolve in the catalog
    Unresolved {
        /// Dragged id
        fragment_id: FragmentId,
    },
    /// No drag was active
    NoActiveDrag,
}

impl DropOutcome {
    /// Check if content changed
    #[inline]
    #[must_use]
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}

/// Mutable session state a drop operates on
///
/// Borrowed from the session owner for the duration of one transition.
pub struct InsertionContext<'a> {
    /// Document being composed
    pub document: &'a mut CompositionDocument,
    /// Fragments used so far
    pub usage: &'a mut UsageSet,
    /// Insertion counter
    pub meter: &'a mut UsageMeter,
    /// Active drag slot
    pub drag: &'a mut DragSession,
    /// Fragment source
    pub catalog: &'a FragmentCatalog,
    /// Editing surface, when attached
    pub surface: Option<&'a mut dyn RichTextSurface>,
}

impl std::fmt::Debug for InsertionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsertionContext")
            .field("document", &self.document)
            .field("usage", &self.usage)
            .field("drag", &self.drag)
            .field("catalog_len", &self.catalog.len())
            .field("surface", &self.surface.is_some())
            .finish()
    }
}

/// Drag-start / drag-end state machine
///
/// Holds no per-drag state of its own; the drag slot lives in
/// [`DragSession`] so any front-end can drive transitions synchronously.
#[derive(Debug, Clone)]
pub struct InsertionProtocol {
    drop_zone: String,
}

impl InsertionProtocol {
    /// Create protocol accepting drops on `drop_zone`
    #[inline]
    #[must_use]
    pub fn new(drop_zone: impl Into<String>) -> Self {
        Self {
            drop_zone: drop_zone.into(),
        }
    }

    /// Designated editor drop zone
    #[inline]
    #[must_use]
    pub fn drop_zone(&self) -> &str {
        &self.drop_zone
    }

    /// `IDLE → DRAGGING(id)`
    ///
    /// Taken even when `id` is unknown; the later drop is then a no-op.
    pub fn on_drag_start(&self, drag: &mut DragSession, id: impl Into<FragmentId>) {
        let id = id.into();
        tracing::debug!(fragment = %id, "drag started");
        if let Some(previous) = drag.begin(id) {
            tracing::warn!(fragment = %previous, "drag started while another was active");
        }
    }

    /// `DRAGGING(id) → IDLE`, inserting when dropped on the editor zone
    ///
    /// The drag slot is cleared on every path. Content, usage and meter are
    /// only touched on [`DropOutcome::Inserted`], and then all together.
    pub fn on_drag_end(
        &self,
        ctx: &mut InsertionContext<'_>,
        drop_target: Option<&str>,
    ) -> DropOutcome {
        let Some(fragment_id) = ctx.drag.finish() else {
            tracing::debug!("drag end without active drag");
            return DropOutcome::NoActiveDrag;
        };

        if drop_target != Some(self.drop_zone.as_str()) {
            tracing::debug!(fragment = %fragment_id, target = ?drop_target, "drop outside editor zone");
            return DropOutcome::Rejected {
                fragment_id,
                target: drop_target.map(str::to_string),
            };
        }

        let Some(fragment) = ctx.catalog.get(fragment_id.as_str()) else {
            tracing::debug!(fragment = %fragment_id, "dropped fragment not in catalog");
            return DropOutcome::Unresolved { fragment_id };
        };

        let wrapped = fragment.wrapped();
        if let Some(surface) = ctx.surface.as_deref_mut() {
            if surface.markup() != ctx.document.content() {
                tracing::debug!("surface out of date, resyncing before drop");
                surface.replace_markup(ctx.document.content());
            }
        }
        let (content, placement) = match ctx
            .surface
            .as_deref_mut()
            .and_then(|surface| surface.insert_at_cursor(&wrapped))
        {
            Some(markup) => (markup, Placement::Cursor),
            None => (append(ctx.document.content(), &wrapped), Placement::Append),
        };

        if placement == Placement::Append {
            if let Some(surface) = ctx.surface.as_deref_mut() {
                surface.replace_markup(&content);
            }
        }

        ctx.document.set_content(content);
        let first_use = ctx.usage.insert(fragment_id.clone());
        let ratio = ctx.meter.record(ctx.catalog.len());

        tracing::debug!(
            fragment = %fragment_id,
            ?placement,
            first_use,
            ratio,
            "fragment inserted"
        );

        DropOutcome::Inserted(InsertionReport {
            fragment_id,
            inserted: wrapped,
            placement,
            first_use,
            ratio,
        })
    }

    /// Abort the active drag without a drop; returns whether one was active
    pub fn on_drag_cancel(&self, drag: &mut DragSession) -> bool {
        match drag.finish() {
            Some(id) => {
                tracing::debug!(fragment = %id, "drag cancelled");
                true
            }
            None => false,
        }
    }
}

fn append(content: &str, wrapped: &str) -> String {
    if content.is_empty() {
        wrapped.to_string()
    } else {
        format!("{content}\n{wrapped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{AppendOnlySurface, PlainTextSurface};
    use fragdoc_catalog::{RawFragment, RawGroups};
    use pretty_assertions::assert_eq;

    struct Fixture {
        document: CompositionDocument,
        usage: UsageSet,
        meter: UsageMeter,
        drag: DragSession,
        catalog: FragmentCatalog,
        protocol: InsertionProtocol,
    }

    impl Fixture {
        fn new(content: &str) -> Self {
            let mut groups = RawGroups::new();
            groups.insert(
                "A".into(),
                vec![RawFragment::numbered(1, "x"), RawFragment::numbered(2, "y")],
            );
            let mut document = CompositionDocument::new();
            document.mark_loaded(content);
            Self {
                document,
                usage: UsageSet::new(),
                meter: UsageMeter::new(),
                drag: DragSession::new(),
                catalog: FragmentCatalog::load(groups),
                protocol: InsertionProtocol::new("editor"),
            }
        }

        fn drop_on<'s>(
            &'s mut self,
            id: &str,
            target: Option<&str>,
            surface: Option<&'s mut dyn RichTextSurface>,
        ) -> DropOutcome {
            self.protocol.on_drag_start(&mut self.drag, id);
            let mut ctx = InsertionContext {
                document: &mut self.document,
                usage: &mut self.usage,
                meter: &mut self.meter,
                drag: &mut self.drag,
                catalog: &self.catalog,
                surface,
            };
            self.protocol.on_drag_end(&mut ctx, target)
        }
    }

    #[test]
    fn append_fallback_without_surface() {
        let mut fx = Fixture::new("Hello");
        let outcome = fx.drop_on("A-1", Some("editor"), None);

        assert!(outcome.is_inserted());
        assert_eq!(fx.document.content(), "Hello\n[x]");
        assert!(fx.document.is_dirty());
        assert!(fx.usage.contains("A-1"));
        assert!(fx.drag.is_idle());
    }

    #[test]
    fn append_to_empty_has_no_separator() {
        let mut fx = Fixture::new("");
        fx.drop_on("A-1", Some("editor"), None);
        assert_eq!(fx.document.content(), "[x]");
    }

    #[test]
    fn reinsertion_appends_again_without_duplicate_usage() {
        let mut fx = Fixture::new("Hello");
        fx.drop_on("A-1", Some("editor"), None);
        let outcome = fx.drop_on("A-1", Some("editor"), None);

        assert_eq!(fx.document.content(), "Hello\n[x]\n[x]");
        assert_eq!(fx.usage.len(), 1);
        let DropOutcome::Inserted(report) = outcome else {
            panic!("expected insertion");
        };
        assert!(!report.first_use);
    }

    #[test]
    fn cursor_insertion_when_supported() {
        let mut fx = Fixture::new("Hello world");
        let mut surface = PlainTextSurface::new("Hello world");
        surface.set_cursor(6);

        let outcome = fx.drop_on("A-2", Some("editor"), Some(&mut surface));

        let DropOutcome::Inserted(report) = outcome else {
            panic!("expected insertion");
        };
        assert_eq!(report.placement, Placement::Cursor);
        assert_eq!(fx.document.content(), "Hello [y]world");
        assert_eq!(surface.markup(), "Hello [y]world");
    }

    #[test]
    fn stale_surface_is_resynced_before_cursor_drop() {
        let mut fx = Fixture::new("");
        fx.document.set_content("Hello");
        let mut surface = PlainTextSurface::new("");

        fx.drop_on("A-1", Some("editor"), Some(&mut surface));

        assert_eq!(fx.document.content(), "[x]Hello");
        assert_eq!(surface.markup(), "[x]Hello");
    }

    #[test]
    fn append_fallback_syncs_surface() {
        let mut fx = Fixture::new("Hello");
        let mut surface = AppendOnlySurface::new("Hello");

        fx.drop_on("A-1", Some("editor"), Some(&mut surface));

        assert_eq!(surface.markup(), "Hello\n[x]");
        assert_eq!(fx.document.content(), "Hello\n[x]");
    }

    #[test]
    fn drop_outside_editor_changes_nothing() {
        let mut fx = Fixture::new("Hello");
        let outcome = fx.drop_on("A-1", Some("predefined-panel"), None);

        assert_eq!(
            outcome,
            DropOutcome::Rejected {
                fragment_id: "A-1".into(),
                target: Some("predefined-panel".into()),
            }
        );
        assert_eq!(fx.document.content(), "Hello");
        assert!(!fx.document.is_dirty());
        assert!(fx.usage.is_empty());
        assert_eq!(fx.meter.insertions(), 0);
        assert!(fx.drag.is_idle());
    }

    #[test]
    fn drop_over_nothing_is_rejected() {
        let mut fx = Fixture::new("Hello");
        let outcome = fx.drop_on("A-1", None, None);
        assert!(matches!(outcome, DropOutcome::Rejected { target: None, .. }));
        assert!(fx.drag.is_idle());
    }

    #[test]
    fn unknown_fragment_is_noop() {
        let mut fx = Fixture::new("Hello");
        let outcome = fx.drop_on("Z-9", Some("editor"), None);

        assert_eq!(outcome, DropOutcome::Unresolved { fragment_id: "Z-9".into() });
        assert_eq!(fx.document.content(), "Hello");
        assert!(!fx.document.is_dirty());
        assert!(fx.drag.is_idle());
    }

    #[test]
    fn drag_end_without_start() {
        let mut fx = Fixture::new("Hello");
        let mut ctx = InsertionContext {
            document: &mut fx.document,
            usage: &mut fx.usage,
            meter: &mut fx.meter,
            drag: &mut fx.drag,
            catalog: &fx.catalog,
            surface: None,
        };
        assert_eq!(fx.protocol.on_drag_end(&mut ctx, Some("editor")), DropOutcome::NoActiveDrag);
    }

    #[test]
    fn cancel_clears_drag() {
        let mut fx = Fixture::new("Hello");
        fx.protocol.on_drag_start(&mut fx.drag, "A-1");
        assert!(fx.protocol.on_drag_cancel(&mut fx.drag));
        assert!(fx.drag.is_idle());
        assert!(!fx.protocol.on_drag_cancel(&mut fx.drag));
        assert_eq!(fx.document.content(), "Hello");
        assert!(fx.usage.is_empty());
    }

    #[test]
    fn ratio_counts_insertions_not_unique_fragments() {
        let mut fx = Fixture::new("");
        fx.drop_on("A-1", Some("editor"), None);
        fx.drop_on("A-1", Some("editor"), None);
        fx.drop_on("A-2", Some("editor"), None);

        assert_eq!(fx.meter.insertions(), 3);
        assert_eq!(format!("{:.2}", fx.meter.ratio()), "150.00");
    }
}

//! Single-slot drag session

use fragdoc_catalog::FragmentId;

/// Drag state; at most one drag is active
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    /// No drag in progress
    #[default]
    Idle,
    /// A fragment is being dragged
    Dragging(FragmentId),
}

/// Holder of the active drag, if any
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    /// Create idle session
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Id of the fragment being dragged
    #[inline]
    #[must_use]
    pub fn active(&self) -> Option<&FragmentId> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging(id) => Some(id),
        }
    }

    /// Check if no drag is active
    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    /// Enter `DRAGGING(id)`, returning any drag it displaced
    pub(crate) fn begin(&mut self, id: FragmentId) -> Option<FragmentId> {
        match std::mem::replace(&mut self.state, DragState::Dragging(id)) {
            DragState::Idle => None,
            DragState::Dragging(previous) => Some(previous),
        }
    }

    /// Return to `IDLE`, yielding the dragged id
    pub(crate) fn finish(&mut self) -> Option<FragmentId> {
        match std::mem::take(&mut self.state) {
            DragState::Idle => None,
            DragState::Dragging(id) => Some(id),
        }
    }
}

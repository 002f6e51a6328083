#![forbid(unsafe_code)]

//! Linear snapshot history for undo/redo.
//!
//! [`LayoutHistory`] keeps whole-dashboard snapshots behind `Arc` on a
//! pair of stacks. Pushing a snapshot starts a new branch (the redo
//! stack is cleared), so history is strictly linear: undo walks back
//! one snapshot at a time, redo walks forward, and a fresh mutation
//! truncates any undone future.
//!
//! # Invariants
//!
//! 1. The bottom of the undo stack is the state captured when the edit
//!    session opened; depth eviction never removes it.
//! 2. `undo` refuses to pop past that base snapshot.
//! 3. Every push clears the redo stack.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use crate::state::DashboardState;

/// Default maximum number of retained snapshots.
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// Undo/redo stack of dashboard snapshots.
pub struct LayoutHistory {
    /// Past and current states; the current state is at the back.
    undo_stack: VecDeque<Arc<DashboardState>>,
    /// Undone states; the next redo target is at the back.
    redo_stack: VecDeque<Arc<DashboardState>>,
    max_depth: usize,
}

impl fmt::Debug for LayoutHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutHistory")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl Default for LayoutHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl LayoutHistory {
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            // Base and current snapshots must both survive eviction.
            max_depth: max_depth.max(2),
        }
    }

    /// Push a snapshot, clearing any undone future.
    pub fn push(&mut self, state: DashboardState) {
        self.redo_stack.clear();
        self.undo_stack.push_back(Arc::new(state));
        // Evict the oldest mid-history snapshots, but never the session
        // base at the bottom of the stack.
        while self.undo_stack.len() > self.max_depth {
            let _ = self.undo_stack.remove(1);
        }
    }

    /// Step back one snapshot, returning the state to restore.
    ///
    /// `None` when already at the session base.
    pub fn undo(&mut self) -> Option<Arc<DashboardState>> {
        if self.undo_stack.len() < 2 {
            return None;
        }
        let current = self.undo_stack.pop_back()?;
        self.redo_stack.push_back(current);
        self.undo_stack.back().cloned()
    }

    /// Step forward one snapshot, returning the state to restore.
    pub fn redo(&mut self) -> Option<Arc<DashboardState>> {
        let next = self.redo_stack.pop_back()?;
        self.undo_stack.push_back(next);
        self.undo_stack.back().cloned()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() >= 2
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// The snapshot captured when the session opened.
    #[must_use]
    pub fn base(&self) -> Option<&Arc<DashboardState>> {
        self.undo_stack.front()
    }

    /// The snapshot matching the live state.
    #[must_use]
    pub fn current(&self) -> Option<&Arc<DashboardState>> {
        self.undo_stack.back()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use dashgrid_core::{GridRect, Widget, WidgetId};

    fn state(n: u64) -> DashboardState {
        DashboardState {
            widgets: vec![
                Widget::new(WidgetId(n), "clock").with_wide(GridRect::new(0, 0, 6, 4)),
            ],
            linkage: Default::default(),
        }
    }

    #[test]
    fn fresh_history_has_nothing_to_do() {
        let mut h = LayoutHistory::default();
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert!(h.undo().is_none());
        assert!(h.redo().is_none());
        assert!(h.is_empty());
    }

    #[test]
    fn base_snapshot_cannot_be_undone() {
        let mut h = LayoutHistory::default();
        h.push(state(1));
        assert!(!h.can_undo());
        assert!(h.undo().is_none());
    }

    #[test]
    fn undo_returns_previous_state() {
        let mut h = LayoutHistory::default();
        h.push(state(1));
        h.push(state(2));
        let restored = h.undo().unwrap();
        assert_eq!(*restored, state(1));
        assert!(h.can_redo());
    }

    #[test]
    fn redo_returns_undone_state() {
        let mut h = LayoutHistory::default();
        h.push(state(1));
        h.push(state(2));
        h.undo();
        let restored = h.redo().unwrap();
        assert_eq!(*restored, state(2));
        assert!(!h.can_redo());
        assert!(h.can_undo());
    }

    #[test]
    fn push_truncates_future() {
        let mut h = LayoutHistory::default();
        h.push(state(1));
        h.push(state(2));
        h.push(state(3));
        h.undo();
        h.undo();
        assert!(h.can_redo());

        h.push(state(4));
        assert!(!h.can_redo());
        assert_eq!(**h.current().unwrap(), state(4));
        // Undo goes back to 1, not 2 or 3.
        assert_eq!(*h.undo().unwrap(), state(1));
    }

    #[test]
    fn depth_limit_preserves_base() {
        let mut h = LayoutHistory::new(3);
        for n in 1..=6 {
            h.push(state(n));
        }
        assert_eq!(h.depth(), 3);
        assert_eq!(**h.base().unwrap(), state(1));
        assert_eq!(**h.current().unwrap(), state(6));
        // Walking all the way back lands on the base.
        assert_eq!(*h.undo().unwrap(), state(5));
        assert_eq!(*h.undo().unwrap(), state(1));
        assert!(h.undo().is_none());
    }

    #[test]
    fn clear_resets_everything() {
        let mut h = LayoutHistory::default();
        h.push(state(1));
        h.push(state(2));
        h.undo();
        h.clear();
        assert!(h.is_empty());
        assert!(!h.can_redo());
        assert!(h.base().is_none());
    }

    #[test]
    fn full_cycle_restores_both_ends() {
        let mut h = LayoutHistory::default();
        for n in 1..=4 {
            h.push(state(n));
        }
        while h.can_undo() {
            h.undo();
        }
        assert_eq!(**h.current().unwrap(), state(1));
        while h.can_redo() {
            h.redo();
        }
        assert_eq!(**h.current().unwrap(), state(4));
    }
}

#![forbid(unsafe_code)]

//! In-memory dashboard state: the unit of snapshotting.
//!
//! [`DashboardState`] is the live, mutable form of a dashboard held by
//! the edit session. It is a plain deep-cloneable value; the history
//! stack stores whole clones behind `Arc`, which keeps undo/redo a
//! pointer swap.

use dashgrid_core::{GridRect, Widget, WidgetId};
use dashgrid_layout::{DashboardSnapshot, LayoutLinkage};

/// The full widget set plus the narrow-mode linkage flag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardState {
    pub widgets: Vec<Widget>,
    pub linkage: LayoutLinkage,
}

impl DashboardState {
    #[must_use]
    pub fn from_snapshot(snapshot: DashboardSnapshot) -> Self {
        Self {
            widgets: snapshot.widgets,
            linkage: snapshot.linkage,
        }
    }

    #[must_use]
    pub fn to_snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot::new(self.widgets.clone(), self.linkage)
    }

    #[must_use]
    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    #[must_use]
    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| w.id == id)
    }

    /// Smallest id not yet in use (ids are never recycled within a
    /// session because deletion keeps the running maximum).
    #[must_use]
    pub fn next_id(&self) -> WidgetId {
        let max = self.widgets.iter().map(|w| w.id.raw()).max().unwrap_or(0);
        WidgetId(max + 1)
    }

    /// First free row below every wide rect, where new widgets land.
    #[must_use]
    pub fn wide_bottom(&self) -> u16 {
        self.widgets
            .iter()
            .filter_map(|w| w.wide.map(|r| r.y_end()))
            .max()
            .unwrap_or(0)
            .min(u32::from(u16::MAX)) as u16
    }

    /// Remove a widget, returning it if present.
    pub fn remove(&mut self, id: WidgetId) -> Option<Widget> {
        let idx = self.widgets.iter().position(|w| w.id == id)?;
        Some(self.widgets.remove(idx))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use dashgrid_core::GridRect;

    fn widget(id: u64, y: u16, h: u16) -> Widget {
        Widget::new(WidgetId(id), "clock").with_wide(GridRect::new(0, y, 6, h))
    }

    #[test]
    fn snapshot_round_trip() {
        let state = DashboardState {
            widgets: vec![widget(1, 0, 4)],
            linkage: LayoutLinkage::Independent,
        };
        let back = DashboardState::from_snapshot(state.to_snapshot());
        assert_eq!(state, back);
    }

    #[test]
    fn next_id_skips_used_ids() {
        let state = DashboardState {
            widgets: vec![widget(3, 0, 2), widget(7, 2, 2)],
            linkage: LayoutLinkage::Linked,
        };
        assert_eq!(state.next_id(), WidgetId(8));
        assert_eq!(DashboardState::default().next_id(), WidgetId(1));
    }

    #[test]
    fn wide_bottom_tracks_tallest_stack() {
        let state = DashboardState {
            widgets: vec![widget(1, 0, 4), widget(2, 4, 5)],
            linkage: LayoutLinkage::Linked,
        };
        assert_eq!(state.wide_bottom(), 9);
        assert_eq!(DashboardState::default().wide_bottom(), 0);
    }

    #[test]
    fn wide_bottom_ignores_layoutless_widgets() {
        let state = DashboardState {
            widgets: vec![Widget::new(WidgetId(1), "clock")],
            linkage: LayoutLinkage::Linked,
        };
        assert_eq!(state.wide_bottom(), 0);
    }

    #[test]
    fn remove_returns_widget() {
        let mut state = DashboardState {
            widgets: vec![widget(1, 0, 4), widget(2, 4, 4)],
            linkage: LayoutLinkage::Linked,
        };
        let removed = state.remove(WidgetId(1)).unwrap();
        assert_eq!(removed.id, WidgetId(1));
        assert_eq!(state.widgets.len(), 1);
        assert!(state.remove(WidgetId(9)).is_none());
    }
}

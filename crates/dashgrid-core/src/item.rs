#![forbid(unsafe_code)]

//! Positioned-item construction.
//!
//! [`build_item`] converts a persisted [`Widget`] into the
//! [`PositionedItem`] a drag/resize-capable rendering grid consumes.
//! It is the single place where unset sizes are resolved from catalog
//! defaults and where rects are pulled inside the grid and the scaled
//! bounds. Every component downstream assumes fully populated layouts.
//!
//! # Invariants
//!
//! 1. The produced rect is sized (`w >= 1`, `h >= 1`), inside the
//!    breakpoint's columns, and admitted by the item's bounds.
//! 2. Building is pure and order-preserving; [`build_items`] never
//!    reorders widgets.
//!
//! # Failure Modes
//!
//! A widget with no rect for either breakpoint yields `None` and is
//! simply not rendered. Out-of-bounds persisted rects are clamped, not
//! rejected.

use crate::catalog::WidgetCatalog;
use crate::constraint::{SizeBounds, scale};
use crate::grid::{Breakpoint, GridSpec};
use crate::widget::{GridRect, Widget, WidgetId, WidgetKind};

/// The positional record a rendering grid consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedItem {
    pub id: WidgetId,
    pub kind: WidgetKind,
    pub rect: GridRect,
    /// Resolved bounds for the breakpoint the item was built for.
    pub bounds: SizeBounds,
    pub is_global: bool,
}

/// Build the positional record for one widget at one breakpoint.
///
/// Chooses the breakpoint's rect (narrow falls back to wide before the
/// first derivation), fills unset dimensions from the catalog's default
/// size, clamps the size into the scaled bounds, and pulls the rect
/// left so it fits the grid.
#[must_use]
pub fn build_item(
    widget: &Widget,
    bp: Breakpoint,
    grid: &GridSpec,
    catalog: &dyn WidgetCatalog,
) -> Option<PositionedItem> {
    let mut rect = *widget.layout_for(bp)?;
    let metadata = catalog.metadata(&widget.kind);
    let bounds = scale(&metadata.constraint, bp, grid);
    let columns = grid.columns(bp);

    if rect.w == 0 {
        // Default sizes are declared in wide units; on the narrow grid
        // the clamp below pulls them into the narrow envelope.
        rect.w = metadata.default_w;
    }
    if rect.h == 0 {
        rect.h = metadata.default_h;
    }

    let (w, h) = bounds.clamp_size(rect.w, rect.h);
    rect.w = w.min(columns);
    rect.h = h;

    if rect.right() > u32::from(columns) {
        rect.x = columns - rect.w;
    }

    Some(PositionedItem {
        id: widget.id,
        kind: widget.kind.clone(),
        rect,
        bounds,
        is_global: metadata.is_global,
    })
}

/// Build positional records for a widget set, preserving order.
///
/// Widgets with no layout for the breakpoint are skipped.
#[must_use]
pub fn build_items(
    widgets: &[Widget],
    bp: Breakpoint,
    grid: &GridSpec,
    catalog: &dyn WidgetCatalog,
) -> Vec<PositionedItem> {
    widgets
        .iter()
        .filter_map(|w| build_item(w, bp, grid, catalog))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{StaticCatalog, WidgetMetadata};
    use crate::constraint::SizeConstraint;

    fn grid() -> GridSpec {
        GridSpec::DEFAULT
    }

    fn catalog() -> StaticCatalog {
        StaticCatalog::new()
            .with(
                "clock",
                WidgetMetadata::new(6, 4)
                    .with_constraint(SizeConstraint::none().with_min(4, 2).with_max(12, 8)),
            )
            .with("search", WidgetMetadata::new(12, 1).global())
    }

    #[test]
    fn builds_wide_rect_verbatim_when_in_bounds() {
        let w = Widget::new(WidgetId(1), "clock").with_wide(GridRect::new(2, 3, 6, 4));
        let item = build_item(&w, Breakpoint::Wide, &grid(), &catalog()).unwrap();
        assert_eq!(item.rect, GridRect::new(2, 3, 6, 4));
        assert_eq!(item.bounds.min_w, 4);
        assert!(!item.is_global);
    }

    #[test]
    fn no_layout_yields_none() {
        let w = Widget::new(WidgetId(1), "clock");
        assert!(build_item(&w, Breakpoint::Wide, &grid(), &catalog()).is_none());
    }

    #[test]
    fn narrow_falls_back_to_wide_before_derivation() {
        let w = Widget::new(WidgetId(1), "clock").with_wide(GridRect::new(0, 0, 6, 4));
        let item = build_item(&w, Breakpoint::Narrow, &grid(), &catalog()).unwrap();
        // 6 wide columns cannot fit a 4-column grid; clamped to the
        // narrow max width.
        assert!(item.rect.w <= 4);
        assert!(item.rect.is_sized());
    }

    #[test]
    fn unset_size_resolved_from_default() {
        let w = Widget::new(WidgetId(1), "clock").with_wide(GridRect::new(0, 0, 0, 0));
        let item = build_item(&w, Breakpoint::Wide, &grid(), &catalog()).unwrap();
        assert_eq!(item.rect.w, 6);
        assert_eq!(item.rect.h, 4);
    }

    #[test]
    fn undersized_rect_clamped_up_to_min() {
        let w = Widget::new(WidgetId(1), "clock").with_wide(GridRect::new(0, 0, 1, 1));
        let item = build_item(&w, Breakpoint::Wide, &grid(), &catalog()).unwrap();
        assert_eq!(item.rect.w, 4);
        assert_eq!(item.rect.h, 2);
    }

    #[test]
    fn oversized_rect_clamped_down_to_max() {
        let w = Widget::new(WidgetId(1), "clock").with_wide(GridRect::new(0, 0, 20, 20));
        let item = build_item(&w, Breakpoint::Wide, &grid(), &catalog()).unwrap();
        assert_eq!(item.rect.w, 12);
        assert_eq!(item.rect.h, 8);
    }

    #[test]
    fn overflowing_rect_pulled_left() {
        let w = Widget::new(WidgetId(1), "clock").with_wide(GridRect::new(22, 0, 6, 4));
        let item = build_item(&w, Breakpoint::Wide, &grid(), &catalog()).unwrap();
        assert_eq!(item.rect.x, 18);
        assert_eq!(item.rect.right(), 24);
    }

    #[test]
    fn unknown_kind_uses_fallback_metadata() {
        let w = Widget::new(WidgetId(1), "ghost").with_wide(GridRect::new(0, 0, 0, 0));
        let item = build_item(&w, Breakpoint::Wide, &grid(), &catalog()).unwrap();
        assert_eq!(item.rect.w, 1);
        assert!(item.rect.h >= 1);
    }

    #[test]
    fn global_flag_propagates() {
        let w = Widget::new(WidgetId(2), "search").with_wide(GridRect::new(0, 0, 12, 1));
        let item = build_item(&w, Breakpoint::Wide, &grid(), &catalog()).unwrap();
        assert!(item.is_global);
    }

    #[test]
    fn batch_preserves_order_and_skips_layoutless() {
        let widgets = vec![
            Widget::new(WidgetId(3), "clock").with_wide(GridRect::new(0, 0, 6, 4)),
            Widget::new(WidgetId(1), "clock"),
            Widget::new(WidgetId(2), "clock").with_wide(GridRect::new(6, 0, 6, 4)),
        ];
        let items = build_items(&widgets, Breakpoint::Wide, &grid(), &catalog());
        let ids: Vec<u64> = items.iter().map(|i| i.id.raw()).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn building_is_deterministic() {
        let w = Widget::new(WidgetId(1), "clock").with_wide(GridRect::new(22, 0, 20, 0));
        let a = build_item(&w, Breakpoint::Narrow, &grid(), &catalog());
        let b = build_item(&w, Breakpoint::Narrow, &grid(), &catalog());
        assert_eq!(a, b);
    }
}

#![forbid(unsafe_code)]

//! Manual resize/reposition editor.
//!
//! A [`PlacementEditor`] backs the numeric-input dialog for setting a
//! widget's exact column, row, width, and height. Every setter clamps
//! immediately against the field's limits, so the held rect is valid
//! after each keystroke, never only on submit. The result is read with
//! [`PlacementEditor::rect`] and fed back through the session's move
//! and resize actions; the editor itself never writes persisted state.
//!
//! # Invariants
//!
//! 1. After any setter, `rect` satisfies the scaled bounds and fits the
//!    breakpoint's columns.
//! 2. Growing the width past the right edge pulls `x` left just enough
//!    to fit instead of rejecting the width.

use dashgrid_core::{Breakpoint, GridRect, GridSpec, PositionedItem, SizeBounds};

/// Inclusive limits for one input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLimits {
    pub min: u16,
    pub max: u16,
}

impl FieldLimits {
    #[must_use]
    pub fn clamp(&self, value: u16) -> u16 {
        value.clamp(self.min, self.max)
    }
}

/// Constrained numeric editing of one widget's placement.
#[derive(Debug, Clone)]
pub struct PlacementEditor {
    columns: u16,
    bounds: SizeBounds,
    rect: GridRect,
}

impl PlacementEditor {
    /// Build an editor from the renderer's positional record.
    ///
    /// The item already carries the resolved rect and the scaled bounds
    /// for its breakpoint, so the editor agrees with the grid exactly.
    #[must_use]
    pub fn new(item: &PositionedItem, bp: Breakpoint, grid: &GridSpec) -> Self {
        Self {
            columns: grid.columns(bp),
            bounds: item.bounds,
            rect: item.rect,
        }
    }

    /// The rect as edited so far; always valid.
    #[must_use]
    pub fn rect(&self) -> GridRect {
        self.rect
    }

    // ========================================================================
    // Field limits
    // ========================================================================

    #[must_use]
    pub fn x_limits(&self) -> FieldLimits {
        FieldLimits {
            min: 0,
            max: self.columns.saturating_sub(self.rect.w),
        }
    }

    #[must_use]
    pub fn y_limits(&self) -> FieldLimits {
        FieldLimits {
            min: 0,
            max: u16::MAX,
        }
    }

    #[must_use]
    pub fn w_limits(&self) -> FieldLimits {
        FieldLimits {
            min: self.bounds.min_w,
            max: self.bounds.max_w.min(self.columns),
        }
    }

    #[must_use]
    pub fn h_limits(&self) -> FieldLimits {
        FieldLimits {
            min: self.bounds.min_h,
            max: self.bounds.max_h,
        }
    }

    // ========================================================================
    // Setters (validate immediately)
    // ========================================================================

    /// Set the column; returns the value actually applied.
    pub fn set_x(&mut self, x: u16) -> u16 {
        self.rect.x = self.x_limits().clamp(x);
        self.rect.x
    }

    /// Set the row; returns the value actually applied.
    pub fn set_y(&mut self, y: u16) -> u16 {
        self.rect.y = self.y_limits().clamp(y);
        self.rect.y
    }

    /// Set the width; returns the value actually applied.
    ///
    /// A width that would push the widget past the right edge pulls `x`
    /// left just enough to stay in bounds.
    pub fn set_w(&mut self, w: u16) -> u16 {
        self.rect.w = self.w_limits().clamp(w);
        if self.rect.right() > u32::from(self.columns) {
            self.rect.x = self.columns - self.rect.w;
        }
        self.rect.w
    }

    /// Set the height; returns the value actually applied.
    pub fn set_h(&mut self, h: u16) -> u16 {
        self.rect.h = self.h_limits().clamp(h);
        self.rect.h
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use dashgrid_core::{
        GridRect, SizeConstraint, StaticCatalog, Widget, WidgetId, WidgetMetadata, build_item,
    };

    fn editor_at(rect: GridRect) -> PlacementEditor {
        let grid = GridSpec::DEFAULT;
        let catalog = StaticCatalog::new().with(
            "clock",
            WidgetMetadata::new(6, 4)
                .with_constraint(SizeConstraint::none().with_min(4, 2).with_max(12, 8)),
        );
        let widget = Widget::new(WidgetId(1), "clock").with_wide(rect);
        let item = build_item(&widget, Breakpoint::Wide, &grid, &catalog)
            .expect("widget has a wide rect");
        PlacementEditor::new(&item, Breakpoint::Wide, &grid)
    }

    #[test]
    fn limits_derive_from_bounds_and_columns() {
        let editor = editor_at(GridRect::new(0, 0, 6, 4));
        assert_eq!(editor.w_limits(), FieldLimits { min: 4, max: 12 });
        assert_eq!(editor.h_limits(), FieldLimits { min: 2, max: 8 });
        assert_eq!(editor.x_limits(), FieldLimits { min: 0, max: 18 });
    }

    #[test]
    fn setters_clamp_immediately() {
        let mut editor = editor_at(GridRect::new(0, 0, 6, 4));
        assert_eq!(editor.set_w(100), 12);
        assert_eq!(editor.set_w(1), 4);
        assert_eq!(editor.set_h(100), 8);
        assert_eq!(editor.set_h(0), 2);
        assert_eq!(editor.set_x(50), 20, "x clamps to columns minus width");
    }

    #[test]
    fn growing_width_pulls_x_left() {
        let mut editor = editor_at(GridRect::new(18, 0, 6, 4));
        assert_eq!(editor.set_w(12), 12);
        let rect = editor.rect();
        assert_eq!(rect.x, 12);
        assert_eq!(rect.right(), 24);
    }

    #[test]
    fn width_within_bounds_keeps_x() {
        let mut editor = editor_at(GridRect::new(2, 3, 6, 4));
        editor.set_w(8);
        assert_eq!(editor.rect().x, 2);
    }

    #[test]
    fn x_limit_shrinks_as_width_grows() {
        let mut editor = editor_at(GridRect::new(0, 0, 6, 4));
        assert_eq!(editor.x_limits().max, 18);
        editor.set_w(12);
        assert_eq!(editor.x_limits().max, 12);
    }

    #[test]
    fn y_is_vertically_unbounded() {
        let mut editor = editor_at(GridRect::new(0, 0, 6, 4));
        assert_eq!(editor.set_y(500), 500);
    }

    #[test]
    fn rect_stays_valid_through_arbitrary_edits() {
        let mut editor = editor_at(GridRect::new(0, 0, 6, 4));
        for (x, y, w, h) in [(30u16, 9u16, 1u16, 99u16), (0, 0, 24, 1), (19, 2, 9, 9)] {
            editor.set_x(x);
            editor.set_y(y);
            editor.set_w(w);
            editor.set_h(h);
            let rect = editor.rect();
            assert!(rect.right() <= 24);
            assert!(rect.w >= 4 && rect.w <= 12);
            assert!(rect.h >= 2 && rect.h <= 8);
        }
    }
}

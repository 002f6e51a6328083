#![forbid(unsafe_code)]

//! Narrow-layout derivation: the band-detection sweep.
//!
//! The wide layout is a free 2-D arrangement; the narrow layout is a
//! single-column stack. Derivation bridges them while preserving the
//! visual grouping of the wide arrangement: widgets that sit
//! side-by-side on desktop stay adjacent in the mobile stack.
//!
//! The sweep groups widgets into horizontal *bands*. Walking widgets in
//! `(y, x, id)` order, a new band starts whenever a widget's top edge
//! clears the running maximum bottom edge of the current band (a hard
//! horizontal cut across the grid). Band members are then re-read
//! left-to-right and stacked in that visiting order.
//!
//! # Invariants
//!
//! 1. Deterministic: ties on `(y, x)` break by ascending id, so input
//!    order never influences the output.
//! 2. Idempotent: no clock, no randomness; the same wide layout always
//!    derives byte-identical narrow rects.
//! 3. Gapless and overlap-free: sorted by `y`, each derived rect starts
//!    exactly where the previous one ends, and the first starts at 0.
//!
//! # Failure Modes
//!
//! A widget with no wide rect is excluded from derivation entirely; it
//! neither faults the batch nor receives a derived rect. An empty
//! widget set derives an empty layout.

use dashgrid_core::{
    Breakpoint, GridRect, GridSpec, Widget, WidgetCatalog, WidgetId, scale,
};
use rustc_hash::FxHashMap;

/// One derived narrow placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedPlacement {
    pub id: WidgetId,
    pub rect: GridRect,
}

/// Derive the narrow stack from the wide placement of `widgets`.
///
/// Returns one placement per widget that has a wide rect, in stack
/// order (ascending `y`). Each placement spans the full narrow width;
/// its height is the widget's wide height floored at the type's
/// minimum height.
#[must_use]
pub fn derive_narrow(
    widgets: &[Widget],
    grid: &GridSpec,
    catalog: &dyn WidgetCatalog,
) -> Vec<DerivedPlacement> {
    struct Entry {
        id: WidgetId,
        rect: GridRect,
        min_h: u16,
    }

    let mut entries: Vec<Entry> = widgets
        .iter()
        .filter_map(|w| {
            w.wide.map(|rect| Entry {
                id: w.id,
                rect,
                min_h: scale(&catalog.metadata(&w.kind).constraint, Breakpoint::Narrow, grid)
                    .min_h,
            })
        })
        .collect();

    // Visiting order within the sweep: top-to-bottom, then
    // left-to-right, with id as the deterministic tie-break.
    entries.sort_by_key(|e| (e.rect.y, e.rect.x, e.id));

    // Sweep into bands. A band ends at the first widget whose top edge
    // is at or below everything seen so far in the band.
    let mut bands: Vec<Vec<Entry>> = Vec::new();
    let mut current: Vec<Entry> = Vec::new();
    let mut band_max_end: u32 = 0;
    for entry in entries {
        if !current.is_empty() && u32::from(entry.rect.y) >= band_max_end {
            bands.push(std::mem::take(&mut current));
            band_max_end = entry.rect.y_end();
        } else {
            band_max_end = band_max_end.max(entry.rect.y_end());
        }
        current.push(entry);
    }
    if !current.is_empty() {
        bands.push(current);
    }

    // Reading order inside a band is left-to-right.
    for band in &mut bands {
        band.sort_by_key(|e| (e.rect.x, e.rect.y, e.id));
    }

    let narrow_cols = grid.columns(Breakpoint::Narrow);
    let mut out = Vec::new();
    let mut running_y: u32 = 0;
    for entry in bands.into_iter().flatten() {
        // TODO: decide whether derived heights should also clamp to the
        // type's narrow max height; today a tall desktop widget keeps
        // its full height in the stack.
        let h = entry.rect.h.max(entry.min_h);
        let y = running_y.min(u32::from(u16::MAX)) as u16;
        out.push(DerivedPlacement {
            id: entry.id,
            rect: GridRect::new(0, y, narrow_cols, h),
        });
        running_y += u32::from(h);
    }
    out
}

/// Derive and write the narrow rects back into the widget set.
///
/// Widgets without a wide rect keep whatever narrow rect they had.
pub fn apply_derivation(widgets: &mut [Widget], grid: &GridSpec, catalog: &dyn WidgetCatalog) {
    let derived = derive_narrow(widgets, grid, catalog);
    let by_id: FxHashMap<WidgetId, GridRect> =
        derived.into_iter().map(|p| (p.id, p.rect)).collect();
    for widget in widgets.iter_mut() {
        if let Some(rect) = by_id.get(&widget.id) {
            widget.narrow = Some(*rect);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

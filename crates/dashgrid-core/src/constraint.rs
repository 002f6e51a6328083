#![forbid(unsafe_code)]

//! Per-breakpoint constraint scaling.
//!
//! Widget types declare sizing bounds in wide-grid column units.
//! [`scale`] resolves them for a target breakpoint, proportionally
//! compressing width bounds when moving to the narrower grid. Height
//! bounds pass through unscaled because the row height is shared
//! across breakpoints.
//!
//! # Invariants
//!
//! 1. [`scale`] is pure: identical inputs always produce identical
//!    outputs. The derivation engine and the renderer both consume it
//!    and must agree bit-for-bit on bounds.
//! 2. `1 <= min_w <= max_w <= columns(breakpoint)` on every resolved
//!    [`SizeBounds`].
//! 3. Width scaling uses integer round-half-up, never floating point.
//!
//! # Failure Modes
//!
//! None. Out-of-range declared bounds are clamped into the grid, which
//! is the expected interactive feedback for constraint violations.

use serde::{Deserialize, Serialize};

use crate::grid::{Breakpoint, GridSpec};

/// Default minimum widget height in rows when a type declares none.
pub const DEFAULT_MIN_ROWS: u16 = 1;

/// Default maximum widget height in rows when a type declares none.
pub const DEFAULT_MAX_ROWS: u16 = 64;

/// Optional bounds a widget type declares, in wide-grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SizeConstraint {
    #[serde(default)]
    pub min_w: Option<u16>,
    #[serde(default)]
    pub min_h: Option<u16>,
    #[serde(default)]
    pub max_w: Option<u16>,
    #[serde(default)]
    pub max_h: Option<u16>,
}

impl SizeConstraint {
    /// A constraint with no declared bounds; everything defaults.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_min(mut self, w: u16, h: u16) -> Self {
        self.min_w = Some(w);
        self.min_h = Some(h);
        self
    }

    #[must_use]
    pub fn with_max(mut self, w: u16, h: u16) -> Self {
        self.max_w = Some(w);
        self.max_h = Some(h);
        self
    }
}

/// Fully resolved bounds for one breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeBounds {
    pub min_w: u16,
    pub min_h: u16,
    pub max_w: u16,
    pub max_h: u16,
}

impl SizeBounds {
    /// Clamp a size into these bounds.
    #[must_use]
    pub fn clamp_size(&self, w: u16, h: u16) -> (u16, u16) {
        (w.clamp(self.min_w, self.max_w), h.clamp(self.min_h, self.max_h))
    }

    /// Whether a size already satisfies the bounds.
    #[must_use]
    pub fn admits(&self, w: u16, h: u16) -> bool {
        (self.min_w..=self.max_w).contains(&w) && (self.min_h..=self.max_h).contains(&h)
    }
}

/// Integer round-half-up of `value * num / den`.
fn scale_round(value: u16, num: u16, den: u16) -> u16 {
    let num = u32::from(num);
    let den = u32::from(den).max(1);
    let scaled = (u32::from(value) * num + den / 2) / den;
    scaled.min(u32::from(u16::MAX)) as u16
}

/// Resolve a type constraint for a breakpoint.
///
/// The minimum width compresses by `columns(narrow) / columns(wide)`
/// when moving to the narrow grid; the maximum width is only clamped to
/// the column count, so a widget that may fill the wide grid may also
/// fill the narrow one. Absent bounds fall back to
/// `{1, DEFAULT_MIN_ROWS, columns, DEFAULT_MAX_ROWS}`.
#[must_use]
pub fn scale(constraint: &SizeConstraint, bp: Breakpoint, grid: &GridSpec) -> SizeBounds {
    let columns = grid.columns(bp);
    let wide_cols = grid.columns(Breakpoint::Wide);

    let scale_min_w = |w: u16| match bp {
        Breakpoint::Wide => w,
        Breakpoint::Narrow => scale_round(w, columns, wide_cols),
    };

    let max_w = constraint.max_w.unwrap_or(columns).clamp(1, columns);
    let min_w = constraint
        .min_w
        .map(scale_min_w)
        .unwrap_or(1)
        .clamp(1, max_w);

    let max_h = constraint.max_h.unwrap_or(DEFAULT_MAX_ROWS).max(1);
    let min_h = constraint
        .min_h
        .unwrap_or(DEFAULT_MIN_ROWS)
        .clamp(1, max_h);

    SizeBounds {
        min_w,
        min_h,
        max_w,
        max_h,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

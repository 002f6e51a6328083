#![forbid(unsafe_code)]

//! Grid coordinate model: the two breakpoints and their resolutions.
//!
//! A dashboard is laid out against exactly two grids: a wide one (the
//! desktop arrangement) and a narrow one (the stacked mobile
//! arrangement). Both share a single row height in pixels; only the
//! column count differs. Every component that needs a column count or
//! row height reads it from [`GridSpec`] so the derivation engine and
//! the renderer can never disagree on resolution.
//!
//! # Invariants
//!
//! 1. `wide_cols > narrow_cols >= 1` (enforced by [`GridSpec::new`]).
//! 2. `row_height_px >= 1`.
//! 3. [`GridSpec`] is immutable after construction; there is no way to
//!    reconfigure breakpoints at runtime.
//!
//! # Failure Modes
//!
//! Construction with a degenerate resolution returns [`GridSpecError`];
//! [`GridSpec::DEFAULT`] is always valid.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two layout tiers.
///
/// Ordinals follow width order: slot 0 is the narrow tier, slot 1 the
/// wide tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    /// Single-column-ish mobile grid.
    Narrow,
    /// Full desktop grid.
    Wide,
}

impl Breakpoint {
    /// All breakpoints in ascending width order.
    pub const ALL: [Breakpoint; 2] = [Breakpoint::Narrow, Breakpoint::Wide];

    /// Lowercase name, stable across releases (used in persisted keys).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Breakpoint::Narrow => "narrow",
            Breakpoint::Wide => "wide",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable grid resolution shared by the whole engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    wide_cols: u16,
    narrow_cols: u16,
    row_height_px: u16,
    margin_px: u16,
    narrow_max_width_px: u16,
}

/// Error constructing a [`GridSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSpecError {
    /// The wide grid must have strictly more columns than the narrow one.
    ColumnsNotDescending { wide: u16, narrow: u16 },
    /// A grid with zero columns cannot place anything.
    ZeroColumns,
    /// Rows must be at least one pixel tall.
    ZeroRowHeight,
}

impl fmt::Display for GridSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnsNotDescending { wide, narrow } => write!(
                f,
                "wide grid must be wider than narrow grid ({wide} <= {narrow} columns)"
            ),
            Self::ZeroColumns => write!(f, "grid must have at least one column"),
            Self::ZeroRowHeight => write!(f, "row height must be at least one pixel"),
        }
    }
}

impl std::error::Error for GridSpecError {}

impl GridSpec {
    /// The stock dashboard grid: 24 desktop columns, 4 mobile columns,
    /// 40 px rows, 8 px margins, mobile below 768 px.
    pub const DEFAULT: GridSpec = GridSpec {
        wide_cols: 24,
        narrow_cols: 4,
        row_height_px: 40,
        margin_px: 8,
        narrow_max_width_px: 768,
    };

    /// Build a custom grid resolution.
    pub fn new(
        wide_cols: u16,
        narrow_cols: u16,
        row_height_px: u16,
    ) -> Result<Self, GridSpecError> {
        if narrow_cols == 0 {
            return Err(GridSpecError::ZeroColumns);
        }
        if wide_cols <= narrow_cols {
            return Err(GridSpecError::ColumnsNotDescending {
                wide: wide_cols,
                narrow: narrow_cols,
            });
        }
        if row_height_px == 0 {
            return Err(GridSpecError::ZeroRowHeight);
        }
        Ok(Self {
            wide_cols,
            narrow_cols,
            row_height_px,
            margin_px: Self::DEFAULT.margin_px,
            narrow_max_width_px: Self::DEFAULT.narrow_max_width_px,
        })
    }

    /// Override the pixel width below which the narrow tier applies.
    #[must_use]
    pub fn with_narrow_max_width(mut self, px: u16) -> Self {
        self.narrow_max_width_px = px;
        self
    }

    /// Override the margin between cells.
    #[must_use]
    pub fn with_margin(mut self, px: u16) -> Self {
        self.margin_px = px;
        self
    }

    /// Column count for a breakpoint.
    #[must_use]
    pub fn columns(&self, bp: Breakpoint) -> u16 {
        match bp {
            Breakpoint::Narrow => self.narrow_cols,
            Breakpoint::Wide => self.wide_cols,
        }
    }

    /// Shared row height in pixels.
    #[must_use]
    pub fn row_height_px(&self) -> u16 {
        self.row_height_px
    }

    /// Margin between cells in pixels.
    #[must_use]
    pub fn margin_px(&self) -> u16 {
        self.margin_px
    }

    /// Classify a viewport width into the active breakpoint.
    #[must_use]
    pub fn classify_width(&self, px: u16) -> Breakpoint {
        if px < self.narrow_max_width_px {
            Breakpoint::Narrow
        } else {
            Breakpoint::Wide
        }
    }

    /// Whether a width change crosses the breakpoint boundary.
    ///
    /// Returns `Some((old, new))` on a transition, `None` otherwise.
    #[must_use]
    pub fn detect_transition(&self, old_px: u16, new_px: u16) -> Option<(Breakpoint, Breakpoint)> {
        let old_bp = self.classify_width(old_px);
        let new_bp = self.classify_width(new_px);
        if old_bp != new_bp { Some((old_bp, new_bp)) } else { None }
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spec_is_valid() {
        let spec = GridSpec::DEFAULT;
        assert_eq!(spec.columns(Breakpoint::Wide), 24);
        assert_eq!(spec.columns(Breakpoint::Narrow), 4);
        assert_eq!(spec.row_height_px(), 40);
    }

    #[test]
    fn new_rejects_inverted_columns() {
        assert_eq!(
            GridSpec::new(4, 24, 40),
            Err(GridSpecError::ColumnsNotDescending { wide: 4, narrow: 24 })
        );
        assert_eq!(
            GridSpec::new(12, 12, 40),
            Err(GridSpecError::ColumnsNotDescending { wide: 12, narrow: 12 })
        );
    }

    #[test]
    fn new_rejects_zero_columns() {
        assert_eq!(GridSpec::new(12, 0, 40), Err(GridSpecError::ZeroColumns));
    }

    #[test]
    fn new_rejects_zero_row_height() {
        assert_eq!(GridSpec::new(12, 4, 0), Err(GridSpecError::ZeroRowHeight));
    }

    #[test]
    fn classify_width_boundary() {
        let spec = GridSpec::DEFAULT;
        assert_eq!(spec.classify_width(767), Breakpoint::Narrow);
        assert_eq!(spec.classify_width(768), Breakpoint::Wide);
        assert_eq!(spec.classify_width(1920), Breakpoint::Wide);
        assert_eq!(spec.classify_width(0), Breakpoint::Narrow);
    }

    #[test]
    fn custom_narrow_max_width() {
        let spec = GridSpec::DEFAULT.with_narrow_max_width(1000);
        assert_eq!(spec.classify_width(900), Breakpoint::Narrow);
        assert_eq!(spec.classify_width(1000), Breakpoint::Wide);
    }

    #[test]
    fn detect_transition() {
        let spec = GridSpec::DEFAULT;
        assert_eq!(
            spec.detect_transition(500, 900),
            Some((Breakpoint::Narrow, Breakpoint::Wide))
        );
        assert_eq!(spec.detect_transition(800, 900), None);
    }

    #[test]
    fn breakpoint_order_and_names() {
        assert!(Breakpoint::Narrow < Breakpoint::Wide);
        assert_eq!(Breakpoint::ALL[0].name(), "narrow");
        assert_eq!(format!("{}", Breakpoint::Wide), "wide");
    }

    #[test]
    fn serde_round_trip() {
        let spec = GridSpec::new(12, 2, 32).unwrap();
        let json = serde_json::to_string(&spec).unwrap();
        let back: GridSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }

    #[test]
    fn breakpoint_serde_names() {
        assert_eq!(serde_json::to_string(&Breakpoint::Wide).unwrap(), "\"wide\"");
        let bp: Breakpoint = serde_json::from_str("\"narrow\"").unwrap();
        assert_eq!(bp, Breakpoint::Narrow);
    }
}

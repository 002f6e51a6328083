#![forbid(unsafe_code)]

//! Widget placement records.
//!
//! A [`Widget`] is the unit of placement: an opaque id, a registry kind
//! key, one layout rect per breakpoint, and a config payload the layout
//! engine passes through untouched. The narrow rect is optional; it is
//! absent until the derivation engine first produces it.
//!
//! # Invariants
//!
//! 1. `WidgetId` is nonzero ([`WidgetId::new`] rejects 0).
//! 2. A resolved rect satisfies `w >= 1`, `h >= 1`, and
//!    `x + w <= columns(breakpoint)`. Violations are
//!    [`LayoutModelError`] values, never panics.
//! 3. `w == 0` / `h == 0` only appear on freshly loaded records and mean
//!    "use the widget type's default size"; the item builder is the
//!    single place that resolves them.
//!
//! # Failure Modes
//!
//! A record with no wide rect cannot participate in derivation and is
//! skipped there; [`Widget::validate`] only checks rects that are
//! present.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::{Breakpoint, GridSpec};

/// Stable, opaque widget identifier, unique within a dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct WidgetId(pub u64);

impl WidgetId {
    /// Create a widget id, rejecting the reserved zero value.
    pub fn new(raw: u64) -> Result<Self, LayoutModelError> {
        if raw == 0 {
            return Err(LayoutModelError::ZeroWidgetId);
        }
        Ok(Self(raw))
    }

    /// Raw numeric value.
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key into the external widget-type registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetKind(String);

impl WidgetKind {
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetKind {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A placement in grid units for one breakpoint.
///
/// `w`/`h` deserialize to 0 when missing; 0 is never a legal resolved
/// size (the `w >= 1` invariant), so it unambiguously means "unset".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GridRect {
    pub x: u16,
    pub y: u16,
    #[serde(default)]
    pub w: u16,
    #[serde(default)]
    pub h: u16,
}

impl GridRect {
    #[must_use]
    pub fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// Exclusive right edge in columns (u32 to avoid overflow).
    #[must_use]
    pub fn right(&self) -> u32 {
        u32::from(self.x) + u32::from(self.w)
    }

    /// Exclusive bottom edge in rows (u32 to avoid overflow).
    #[must_use]
    pub fn y_end(&self) -> u32 {
        u32::from(self.y) + u32::from(self.h)
    }

    /// Whether both dimensions have been resolved to a real size.
    #[must_use]
    pub fn is_sized(&self) -> bool {
        self.w >= 1 && self.h >= 1
    }
}

/// Per-widget configuration payload.
///
/// Tagged by widget family; the layout engine never interprets it
/// beyond cloning it through snapshots and saves. `Custom` is the
/// escape hatch for genuinely open-ended user content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetConfig {
    /// No configuration.
    #[default]
    None,
    /// User-authored markup body (custom HTML/text widgets).
    Markup { body: String },
    /// A polled external endpoint binding.
    Endpoint {
        url: String,
        #[serde(default = "default_interval_secs")]
        interval_secs: u32,
    },
    /// Open-ended key-value payload for kinds this core does not know.
    Custom {
        #[serde(default)]
        fields: BTreeMap<String, String>,
    },
}

fn default_interval_secs() -> u32 {
    60
}

/// The unit of placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    pub id: WidgetId,
    pub kind: WidgetKind,
    /// Placement on the wide (desktop) grid. Absent on malformed or
    /// half-migrated records; such widgets are excluded from derivation.
    #[serde(default)]
    pub wide: Option<GridRect>,
    /// Placement on the narrow (mobile) grid; absent until first derived.
    #[serde(default)]
    pub narrow: Option<GridRect>,
    #[serde(default)]
    pub config: WidgetConfig,
}

impl Widget {
    #[must_use]
    pub fn new(id: WidgetId, kind: impl Into<WidgetKind>) -> Self {
        Self {
            id,
            kind: kind.into(),
            wide: None,
            narrow: None,
            config: WidgetConfig::None,
        }
    }

    /// Builder: set the wide placement.
    #[must_use]
    pub fn with_wide(mut self, rect: GridRect) -> Self {
        self.wide = Some(rect);
        self
    }

    /// Builder: set the narrow placement.
    #[must_use]
    pub fn with_narrow(mut self, rect: GridRect) -> Self {
        self.narrow = Some(rect);
        self
    }

    /// Builder: set the config payload.
    #[must_use]
    pub fn with_config(mut self, config: WidgetConfig) -> Self {
        self.config = config;
        self
    }

    /// The rect to render for a breakpoint.
    ///
    /// The narrow tier falls back to the wide rect before the first
    /// derivation; the wide tier never falls back.
    #[must_use]
    pub fn layout_for(&self, bp: Breakpoint) -> Option<&GridRect> {
        match bp {
            Breakpoint::Wide => self.wide.as_ref(),
            Breakpoint::Narrow => self.narrow.as_ref().or(self.wide.as_ref()),
        }
    }

    /// Mutable access to the rect stored for a breakpoint (no fallback).
    #[must_use]
    pub fn layout_mut(&mut self, bp: Breakpoint) -> Option<&mut GridRect> {
        match bp {
            Breakpoint::Wide => self.wide.as_mut(),
            Breakpoint::Narrow => self.narrow.as_mut(),
        }
    }

    /// Validate every present rect against the grid.
    pub fn validate(&self, grid: &GridSpec) -> Result<(), LayoutModelError> {
        for bp in Breakpoint::ALL {
            let rect = match bp {
                Breakpoint::Wide => self.wide,
                Breakpoint::Narrow => self.narrow,
            };
            let Some(rect) = rect else { continue };
            if !rect.is_sized() {
                return Err(LayoutModelError::UnsizedRect {
                    id: self.id,
                    breakpoint: bp,
                });
            }
            let columns = grid.columns(bp);
            if rect.right() > u32::from(columns) {
                return Err(LayoutModelError::OutOfColumns {
                    id: self.id,
                    breakpoint: bp,
                    x: rect.x,
                    w: rect.w,
                    columns,
                });
            }
        }
        Ok(())
    }
}

/// Structural errors in widget placement records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutModelError {
    /// Widget id 0 is reserved.
    ZeroWidgetId,
    /// A rect present on a record has a zero dimension.
    UnsizedRect { id: WidgetId, breakpoint: Breakpoint },
    /// A rect extends past the right edge of its grid.
    OutOfColumns {
        id: WidgetId,
        breakpoint: Breakpoint,
        x: u16,
        w: u16,
        columns: u16,
    },
}

impl fmt::Display for LayoutModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroWidgetId => write!(f, "widget id 0 is invalid"),
            Self::UnsizedRect { id, breakpoint } => {
                write!(f, "widget {id} has a zero-sized {breakpoint} rect")
            }
            Self::OutOfColumns {
                id,
                breakpoint,
                x,
                w,
                columns,
            } => write!(
                f,
                "widget {id} overflows the {breakpoint} grid (x={x} w={w} columns={columns})"
            ),
        }
    }
}

impl std::error::Error for LayoutModelError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridSpec {
        GridSpec::DEFAULT
    }

    #[test]
    fn widget_id_rejects_zero() {
        assert_eq!(WidgetId::new(0), Err(LayoutModelError::ZeroWidgetId));
        assert_eq!(WidgetId::new(7).unwrap().raw(), 7);
    }

    #[test]
    fn layout_for_narrow_falls_back_to_wide() {
        let w = Widget::new(WidgetId(1), "clock").with_wide(GridRect::new(0, 0, 6, 4));
        assert_eq!(w.layout_for(Breakpoint::Narrow), Some(&GridRect::new(0, 0, 6, 4)));
        assert_eq!(w.layout_for(Breakpoint::Wide), Some(&GridRect::new(0, 0, 6, 4)));
    }

    #[test]
    fn layout_for_prefers_explicit_narrow() {
        let w = Widget::new(WidgetId(1), "clock")
            .with_wide(GridRect::new(0, 0, 6, 4))
            .with_narrow(GridRect::new(0, 2, 4, 4));
        assert_eq!(w.layout_for(Breakpoint::Narrow), Some(&GridRect::new(0, 2, 4, 4)));
    }

    #[test]
    fn wide_tier_never_falls_back() {
        let w = Widget::new(WidgetId(1), "clock").with_narrow(GridRect::new(0, 0, 4, 4));
        assert_eq!(w.layout_for(Breakpoint::Wide), None);
    }

    #[test]
    fn validate_accepts_full_width_rect() {
        let w = Widget::new(WidgetId(1), "clock").with_wide(GridRect::new(0, 0, 24, 4));
        assert!(w.validate(&grid()).is_ok());
    }

    #[test]
    fn validate_rejects_overflow() {
        let w = Widget::new(WidgetId(1), "clock").with_wide(GridRect::new(20, 0, 6, 4));
        assert_eq!(
            w.validate(&grid()),
            Err(LayoutModelError::OutOfColumns {
                id: WidgetId(1),
                breakpoint: Breakpoint::Wide,
                x: 20,
                w: 6,
                columns: 24,
            })
        );
    }

    #[test]
    fn validate_rejects_zero_height() {
        let w = Widget::new(WidgetId(1), "clock").with_wide(GridRect::new(0, 0, 6, 0));
        assert_eq!(
            w.validate(&grid()),
            Err(LayoutModelError::UnsizedRect {
                id: WidgetId(1),
                breakpoint: Breakpoint::Wide,
            })
        );
    }

    #[test]
    fn validate_checks_narrow_against_narrow_columns() {
        let w = Widget::new(WidgetId(1), "clock")
            .with_wide(GridRect::new(0, 0, 6, 4))
            .with_narrow(GridRect::new(0, 0, 6, 4));
        assert!(matches!(
            w.validate(&grid()),
            Err(LayoutModelError::OutOfColumns {
                breakpoint: Breakpoint::Narrow,
                ..
            })
        ));
    }

    #[test]
    fn validate_skips_absent_rects() {
        let w = Widget::new(WidgetId(1), "clock");
        assert!(w.validate(&grid()).is_ok());
    }

    #[test]
    fn rect_edges_do_not_overflow_u16() {
        let r = GridRect::new(u16::MAX, u16::MAX, u16::MAX, u16::MAX);
        assert_eq!(r.right(), u32::from(u16::MAX) * 2);
        assert_eq!(r.y_end(), u32::from(u16::MAX) * 2);
    }

    #[test]
    fn rect_missing_size_deserializes_as_zero() {
        let r: GridRect = serde_json::from_str(r#"{"x": 3, "y": 5}"#).unwrap();
        assert_eq!(r, GridRect::new(3, 5, 0, 0));
        assert!(!r.is_sized());
    }

    #[test]
    fn widget_serde_round_trip() {
        let w = Widget::new(WidgetId(9), "notes")
            .with_wide(GridRect::new(2, 1, 8, 3))
            .with_config(WidgetConfig::Markup {
                body: "<b>hi</b>".into(),
            });
        let json = serde_json::to_string(&w).unwrap();
        let back: Widget = serde_json::from_str(&json).unwrap();
        assert_eq!(w, back);
    }

    #[test]
    fn config_tag_names() {
        let json = serde_json::to_string(&WidgetConfig::Endpoint {
            url: "http://svc".into(),
            interval_secs: 30,
        })
        .unwrap();
        assert!(json.contains("\"type\":\"endpoint\""));

        let cfg: WidgetConfig = serde_json::from_str(r#"{"type":"none"}"#).unwrap();
        assert_eq!(cfg, WidgetConfig::None);
    }

    #[test]
    fn config_endpoint_interval_defaults() {
        let cfg: WidgetConfig =
            serde_json::from_str(r#"{"type":"endpoint","url":"http://svc"}"#).unwrap();
        assert_eq!(
            cfg,
            WidgetConfig::Endpoint {
                url: "http://svc".into(),
                interval_secs: 60,
            }
        );
    }

    #[test]
    fn config_custom_fields_round_trip() {
        let mut fields = BTreeMap::new();
        fields.insert("city".to_string(), "Utrecht".to_string());
        let cfg = WidgetConfig::Custom { fields };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: WidgetConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn error_display() {
        let err = LayoutModelError::OutOfColumns {
            id: WidgetId(3),
            breakpoint: Breakpoint::Wide,
            x: 20,
            w: 6,
            columns: 24,
        };
        let msg = err.to_string();
        assert!(msg.contains("widget 3"));
        assert!(msg.contains("wide"));
    }
}

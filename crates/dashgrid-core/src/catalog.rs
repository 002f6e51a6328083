#![forbid(unsafe_code)]

//! Widget-type registry interface.
//!
//! The catalog is an external collaborator: a read-only lookup from a
//! [`WidgetKind`] to the metadata the layout engine needs (default
//! size, declared bounds, whether the widget is pinned across
//! dashboards). [`StaticCatalog`] is the in-memory implementation used
//! by tests and small deployments.

use rustc_hash::FxHashMap;

use crate::constraint::{DEFAULT_MIN_ROWS, SizeConstraint};
use crate::widget::WidgetKind;

/// Layout-relevant metadata for a widget type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetMetadata {
    /// Width in wide-grid columns a freshly added widget gets.
    pub default_w: u16,
    /// Height in rows a freshly added widget gets.
    pub default_h: u16,
    /// Declared bounds in wide-grid units.
    pub constraint: SizeConstraint,
    /// Pinned widgets render on every dashboard page.
    pub is_global: bool,
}

impl WidgetMetadata {
    #[must_use]
    pub fn new(default_w: u16, default_h: u16) -> Self {
        Self {
            default_w: default_w.max(1),
            default_h: default_h.max(1),
            constraint: SizeConstraint::none(),
            is_global: false,
        }
    }

    #[must_use]
    pub fn with_constraint(mut self, constraint: SizeConstraint) -> Self {
        self.constraint = constraint;
        self
    }

    #[must_use]
    pub fn global(mut self) -> Self {
        self.is_global = true;
        self
    }

    /// Metadata for kinds the catalog does not know.
    ///
    /// A dashboard referencing a stale plugin kind still lays out: one
    /// column wide, minimum height, unconstrained.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(1, DEFAULT_MIN_ROWS)
    }
}

/// Read-only widget-type lookup.
pub trait WidgetCatalog {
    /// Metadata for a kind. Unknown kinds get [`WidgetMetadata::fallback`].
    fn metadata(&self, kind: &WidgetKind) -> WidgetMetadata;
}

/// In-memory catalog backed by a hash map.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: FxHashMap<WidgetKind, WidgetMetadata>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: register a kind.
    #[must_use]
    pub fn with(mut self, kind: impl Into<WidgetKind>, metadata: WidgetMetadata) -> Self {
        self.entries.insert(kind.into(), metadata);
        self
    }

    /// Register or replace a kind.
    pub fn register(&mut self, kind: impl Into<WidgetKind>, metadata: WidgetMetadata) {
        self.entries.insert(kind.into(), metadata);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl WidgetCatalog for StaticCatalog {
    fn metadata(&self, kind: &WidgetKind) -> WidgetMetadata {
        self.entries
            .get(kind)
            .cloned()
            .unwrap_or_else(WidgetMetadata::fallback)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

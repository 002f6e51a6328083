#![forbid(unsafe_code)]

//! Persisted dashboard schema v1 with versioning and validation.
//!
//! A [`DashboardSnapshot`] is the durable form of a dashboard: the full
//! widget set (both layouts) plus the linkage flag that records whether
//! the narrow layout is still auto-derived from the wide one. Unknown
//! additive fields ride in `extensions` so older payloads round-trip.
//!
//! # Schema Versioning Policy
//!
//! - Additive fields may be carried in `extensions` without a version
//!   bump.
//! - Breaking changes require incrementing [`DASHBOARD_SCHEMA_VERSION`]
//!   and a migration path; loaders reject unknown versions with an
//!   actionable error.

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use dashgrid_core::{GridSpec, LayoutModelError, Widget, WidgetId};

/// Current dashboard schema version.
pub const DASHBOARD_SCHEMA_VERSION: u16 = 1;

/// Whether the narrow layout follows the wide one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutLinkage {
    /// Narrow is re-derived from wide on every save.
    #[default]
    Linked,
    /// The user has unlinked narrow and maintains it by hand.
    Independent,
}

/// The durable form of a dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Schema version for migration detection.
    #[serde(default = "default_schema_version")]
    pub schema_version: u16,
    pub widgets: Vec<Widget>,
    #[serde(default)]
    pub linkage: LayoutLinkage,
    /// Forward-compatible extension bag.
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,
}

fn default_schema_version() -> u16 {
    DASHBOARD_SCHEMA_VERSION
}

impl DashboardSnapshot {
    #[must_use]
    pub fn new(widgets: Vec<Widget>, linkage: LayoutLinkage) -> Self {
        Self {
            schema_version: DASHBOARD_SCHEMA_VERSION,
            widgets,
            linkage,
            extensions: BTreeMap::new(),
        }
    }

    /// An empty linked dashboard.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), LayoutLinkage::Linked)
    }

    /// Validate schema version, id uniqueness, and every stored rect.
    pub fn validate(&self, grid: &GridSpec) -> Result<(), SnapshotError> {
        if self.schema_version != DASHBOARD_SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.schema_version,
                expected: DASHBOARD_SCHEMA_VERSION,
            });
        }

        let mut seen: FxHashSet<WidgetId> = FxHashSet::default();
        for widget in &self.widgets {
            if widget.id.raw() == 0 {
                return Err(SnapshotError::Model(LayoutModelError::ZeroWidgetId));
            }
            if !seen.insert(widget.id) {
                return Err(SnapshotError::DuplicateWidgetId { id: widget.id });
            }
            widget.validate(grid).map_err(SnapshotError::Model)?;
        }
        Ok(())
    }

    /// Find a widget by id.
    #[must_use]
    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Validation errors on a persisted dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotError {
    UnsupportedVersion { found: u16, expected: u16 },
    DuplicateWidgetId { id: WidgetId },
    Model(LayoutModelError),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, expected } => write!(
                f,
                "unsupported dashboard schema version {found} (expected {expected})"
            ),
            Self::DuplicateWidgetId { id } => write!(f, "duplicate widget id {id}"),
            Self::Model(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Model(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LayoutModelError> for SnapshotError {
    fn from(err: LayoutModelError) -> Self {
        Self::Model(err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

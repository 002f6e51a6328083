#![forbid(unsafe_code)]

//! Layout derivation and persistence schema for dashgrid.
//!
//! The centerpiece is the band-detection sweep in [`derive`]: it turns
//! the unordered 2-D desktop placement of a widget set into the
//! deterministic, gapless single-column stack the narrow breakpoint
//! renders. [`snapshot`] holds the versioned persisted form of a
//! dashboard (both layouts plus the linkage flag between them).

pub mod derive;
pub mod snapshot;

pub use derive::{DerivedPlacement, apply_derivation, derive_narrow};
pub use snapshot::{
    DASHBOARD_SCHEMA_VERSION, DashboardSnapshot, LayoutLinkage, SnapshotError,
};

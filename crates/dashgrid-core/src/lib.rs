#![forbid(unsafe_code)]

//! Core model for the dashgrid layout engine.
//!
//! This crate holds the pieces every other dashgrid crate agrees on:
//! the two-tier grid coordinate model, the widget placement records,
//! the per-breakpoint constraint scaler, and the builder that turns a
//! persisted widget into the positional record a rendering grid
//! consumes.
//!
//! Nothing here performs I/O or owns mutable session state; everything
//! is a value type or a pure function so the derivation engine and the
//! renderer agree bit-for-bit on sizes and bounds.

pub mod catalog;
pub mod constraint;
pub mod grid;
pub mod item;
pub mod widget;

pub use catalog::{StaticCatalog, WidgetCatalog, WidgetMetadata};
pub use constraint::{DEFAULT_MAX_ROWS, DEFAULT_MIN_ROWS, SizeBounds, SizeConstraint, scale};
pub use grid::{Breakpoint, GridSpec, GridSpecError};
pub use item::{PositionedItem, build_item, build_items};
pub use widget::{GridRect, LayoutModelError, Widget, WidgetConfig, WidgetId, WidgetKind};

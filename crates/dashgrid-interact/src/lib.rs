#![forbid(unsafe_code)]

//! Interactive editing surfaces for dashgrid.
//!
//! [`autoscroll`] keeps the viewport moving while a widget is dragged
//! near an edge; [`editor`] is the constrained numeric-input surface
//! for setting a widget's exact position and size. Both operate purely
//! on injected collaborators and produce values the session applies;
//! neither touches persisted state.

pub mod autoscroll;
pub mod editor;

pub use autoscroll::{
    AutoScrollConfig, AutoScroller, PointerProvider, ScrollSurface,
};
pub use editor::{FieldLimits, PlacementEditor};

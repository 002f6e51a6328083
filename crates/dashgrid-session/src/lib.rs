#![forbid(unsafe_code)]

//! Edit-session layer for dashgrid.
//!
//! [`EditSession`](session::EditSession) owns the widget collection
//! while the user rearranges it: edit-mode on/off, the dirty flag, a
//! linear undo/redo history of layout snapshots, save/cancel against an
//! external store, the linked/independent narrow-layout transition, and
//! a short suppression window that keeps freshly arriving live data
//! from clobbering an optimistic local mutation.
//!
//! All external collaborators enter through the traits in [`ports`];
//! nothing in this crate touches a transport or a file.

pub mod history;
pub mod ports;
pub mod session;
pub mod state;
pub mod suppress;

pub use history::LayoutHistory;
pub use ports::{
    DashboardStore, LiveDataSource, LiveSubscription, MemoryStore, Notifier, ObserverEvent,
    RecordingNotifier, RecordingObserver, SessionObserver, StoreError,
};
pub use session::{
    EditSession, LayoutAction, LiveIngest, LiveUpdate, MutateError, SaveRejected, SessionPhase,
};
pub use state::DashboardState;
pub use suppress::{DEFAULT_SUPPRESSION_WINDOW, SuppressionGate};

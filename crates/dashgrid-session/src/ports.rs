#![forbid(unsafe_code)]

//! External collaborator interfaces.
//!
//! The session talks to the outside world through these traits only:
//! a persistence store, a user-visible error notifier, and typed
//! observer callbacks registered at construction. Test doubles for all
//! three live here as well, so downstream crates and tests share one
//! set of fakes.

use std::fmt;

use dashgrid_core::WidgetId;
use dashgrid_layout::{DashboardSnapshot, LayoutLinkage};

use crate::session::LiveUpdate;

/// Durable persistence for the dashboard layouts.
pub trait DashboardStore {
    fn load_all(&self) -> Result<DashboardSnapshot, StoreError>;
    fn save_all(&mut self, snapshot: &DashboardSnapshot) -> Result<(), StoreError>;
}

/// User-visible failure reporting.
pub trait Notifier {
    fn show_error(&mut self, title: &str, message: &str);
}

/// Typed session callbacks.
///
/// All methods default to no-ops; implement what you need. These are
/// explicit registrations handed to the session at construction, not
/// an ambient event bus.
pub trait SessionObserver {
    fn widget_added(&mut self, _id: WidgetId) {}
    fn widget_removed(&mut self, _id: WidgetId) {}
    fn config_changed(&mut self, _id: WidgetId) {}
    fn linkage_changed(&mut self, _linkage: LayoutLinkage) {}
    fn edit_mode_changed(&mut self, _editing: bool) {}
}

/// Shared-handle adapters so a test or host can keep a handle to a
/// collaborator after moving it into the session. A poisoned lock
/// skips the callback rather than panicking.
impl<T: Notifier> Notifier for std::sync::Arc<std::sync::Mutex<T>> {
    fn show_error(&mut self, title: &str, message: &str) {
        if let Ok(mut inner) = self.lock() {
            inner.show_error(title, message);
        }
    }
}

impl<T: SessionObserver> SessionObserver for std::sync::Arc<std::sync::Mutex<T>> {
    fn widget_added(&mut self, id: WidgetId) {
        if let Ok(mut inner) = self.lock() {
            inner.widget_added(id);
        }
    }

    fn widget_removed(&mut self, id: WidgetId) {
        if let Ok(mut inner) = self.lock() {
            inner.widget_removed(id);
        }
    }

    fn config_changed(&mut self, id: WidgetId) {
        if let Ok(mut inner) = self.lock() {
            inner.config_changed(id);
        }
    }

    fn linkage_changed(&mut self, linkage: LayoutLinkage) {
        if let Ok(mut inner) = self.lock() {
            inner.linkage_changed(linkage);
        }
    }

    fn edit_mode_changed(&mut self, editing: bool) {
        if let Ok(mut inner) = self.lock() {
            inner.edit_mode_changed(editing);
        }
    }
}

/// Source of asynchronous per-widget pushes.
///
/// The transport is out of scope here; implementations deliver
/// [`LiveUpdate`]s to the callback at whatever cadence they have. The
/// returned handle unsubscribes when dropped, so a torn-down session
/// can never leak a delivery loop.
pub trait LiveDataSource {
    fn subscribe(
        &mut self,
        topic: &str,
        on_data: Box<dyn FnMut(LiveUpdate) + Send>,
    ) -> LiveSubscription;
}

/// Handle to an active subscription; unsubscribes on drop.
pub struct LiveSubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl LiveSubscription {
    #[must_use]
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle with nothing to cancel (already-closed sources).
    #[must_use]
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Unsubscribe explicitly instead of on drop.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for LiveSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for LiveSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveSubscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Persistence failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not be reached.
    Unavailable { detail: String },
    /// The backend refused the payload.
    Rejected { reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { detail } => write!(f, "layout store unavailable: {detail}"),
            Self::Rejected { reason } => write!(f, "layout store rejected save: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {}

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// In-memory store; can be armed to fail the next save.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: DashboardSnapshot,
    fail_next_save: bool,
    pub save_count: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new(snapshot: DashboardSnapshot) -> Self {
        Self {
            snapshot,
            fail_next_save: false,
            save_count: 0,
        }
    }

    /// Arm the store so the next `save_all` fails once.
    pub fn fail_next_save(&mut self) {
        self.fail_next_save = true;
    }

    /// The last successfully saved snapshot.
    #[must_use]
    pub fn stored(&self) -> &DashboardSnapshot {
        &self.snapshot
    }
}

impl DashboardStore for MemoryStore {
    fn load_all(&self) -> Result<DashboardSnapshot, StoreError> {
        Ok(self.snapshot.clone())
    }

    fn save_all(&mut self, snapshot: &DashboardSnapshot) -> Result<(), StoreError> {
        if self.fail_next_save {
            self.fail_next_save = false;
            return Err(StoreError::Unavailable {
                detail: "armed test failure".into(),
            });
        }
        self.snapshot = snapshot.clone();
        self.save_count += 1;
        Ok(())
    }
}

/// Notifier that records every error it is asked to show.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    pub errors: Vec<(String, String)>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for RecordingNotifier {
    fn show_error(&mut self, title: &str, message: &str) {
        self.errors.push((title.to_string(), message.to_string()));
    }
}

/// One recorded observer callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserverEvent {
    WidgetAdded(WidgetId),
    WidgetRemoved(WidgetId),
    ConfigChanged(WidgetId),
    LinkageChanged(LayoutLinkage),
    EditModeChanged(bool),
}

/// Observer that records every callback in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub events: Vec<ObserverEvent>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionObserver for RecordingObserver {
    fn widget_added(&mut self, id: WidgetId) {
        self.events.push(ObserverEvent::WidgetAdded(id));
    }

    fn widget_removed(&mut self, id: WidgetId) {
        self.events.push(ObserverEvent::WidgetRemoved(id));
    }

    fn config_changed(&mut self, id: WidgetId) {
        self.events.push(ObserverEvent::ConfigChanged(id));
    }

    fn linkage_changed(&mut self, linkage: LayoutLinkage) {
        self.events.push(ObserverEvent::LinkageChanged(linkage));
    }

    fn edit_mode_changed(&mut self, editing: bool) {
        self.events.push(ObserverEvent::EditModeChanged(editing));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#![forbid(unsafe_code)]

//! The edit-session state machine.
//!
//! An [`EditSession`] owns the widget collection for one dashboard.
//! Outside edit mode it is a read-through view of the persisted state;
//! entering edit mode captures a base snapshot and every subsequent
//! mutation flows through [`EditSession::apply`], which clamps sizes
//! into the scaled bounds, pushes an undo snapshot, and marks the
//! session dirty.
//!
//! Saving is split-phase because the external store call is the only
//! suspension point: [`EditSession::begin_save`] produces the payload
//! and marks a save in flight (a second call is rejected), and
//! [`EditSession::finish_save`] applies the outcome. The session stays
//! mutable in between.
//!
//! # State diagram
//!
//! ```text
//! Viewing --enter_edit--> Editing --begin_save--> Saving --finish_save(Ok)--> Viewing
//!                            |  ^                   |
//!                            |  +--finish_save(Err)-+
//!                            +--cancel--> Viewing
//! ```
//!
//! # Invariants
//!
//! 1. At most one save is in flight; at most one session owns a
//!    dashboard's widgets (`&mut self` enforces serial access).
//! 2. While linkage is `Linked`, a direct narrow-layout edit never
//!    applies without an explicit [`EditSession::confirm_unlink`].
//! 3. A failed save changes nothing in memory: still editing, still
//!    dirty, one error notification.

use dashgrid_core::{
    Breakpoint, GridRect, GridSpec, PositionedItem, Widget, WidgetCatalog, WidgetConfig, WidgetId,
    WidgetKind, build_items, scale,
};
use dashgrid_layout::{DashboardSnapshot, LayoutLinkage, apply_derivation};
use web_time::Instant;

use crate::history::LayoutHistory;
use crate::ports::{DashboardStore, Notifier, SessionObserver, StoreError};
use crate::state::DashboardState;
use crate::suppress::SuppressionGate;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Viewing,
    Editing,
    /// A save is in flight; the session is still mutable.
    Saving,
}

/// A layout mutation requested by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutAction {
    Add {
        kind: WidgetKind,
        config: WidgetConfig,
    },
    Delete {
        id: WidgetId,
    },
    Duplicate {
        id: WidgetId,
    },
    Move {
        id: WidgetId,
        breakpoint: Breakpoint,
        x: u16,
        y: u16,
    },
    Resize {
        id: WidgetId,
        breakpoint: Breakpoint,
        w: u16,
        h: u16,
    },
    UpdateConfig {
        id: WidgetId,
        config: WidgetConfig,
    },
}

impl LayoutAction {
    /// Whether this action edits the narrow layout directly.
    fn touches_narrow(&self) -> bool {
        matches!(
            self,
            LayoutAction::Move {
                breakpoint: Breakpoint::Narrow,
                ..
            } | LayoutAction::Resize {
                breakpoint: Breakpoint::Narrow,
                ..
            }
        )
    }
}

/// Why a mutation did not apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutateError {
    /// The session is not in edit mode.
    NotEditing,
    /// No widget with this id.
    UnknownWidget { id: WidgetId },
    /// The widget has no rect for the targeted breakpoint.
    MissingLayout { id: WidgetId, breakpoint: Breakpoint },
    /// The action edits the narrow layout while it is still linked;
    /// it is parked until [`EditSession::confirm_unlink`] or
    /// [`EditSession::dismiss_unlink`].
    UnlinkConfirmationRequired,
    /// A parked narrow edit is still awaiting confirmation.
    ConfirmationPending,
    /// `confirm_unlink` was called with nothing parked.
    NoPendingUnlink,
}

impl std::fmt::Display for MutateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotEditing => write!(f, "session is not in edit mode"),
            Self::UnknownWidget { id } => write!(f, "no widget with id {id}"),
            Self::MissingLayout { id, breakpoint } => {
                write!(f, "widget {id} has no {breakpoint} layout to edit")
            }
            Self::UnlinkConfirmationRequired => {
                write!(f, "editing the narrow layout requires unlinking it first")
            }
            Self::ConfirmationPending => {
                write!(f, "a narrow-layout edit is awaiting unlink confirmation")
            }
            Self::NoPendingUnlink => write!(f, "no narrow-layout edit is awaiting confirmation"),
        }
    }
}

impl std::error::Error for MutateError {}

/// Why a save did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveRejected {
    NotEditing,
    /// An earlier save is still outstanding.
    AlreadySaving,
}

impl std::fmt::Display for SaveRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotEditing => write!(f, "session is not in edit mode"),
            Self::AlreadySaving => write!(f, "a save is already in flight"),
        }
    }
}

impl std::error::Error for SaveRejected {}

/// An asynchronously arriving config/content push for one widget.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveUpdate {
    pub id: WidgetId,
    pub config: WidgetConfig,
}

/// What happened to a live push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveIngest {
    Applied,
    /// Dropped by the optimistic suppression window. Routine.
    Suppressed,
    UnknownWidget,
}

/// Single-active edit session for one dashboard.
pub struct EditSession {
    grid: GridSpec,
    catalog: Box<dyn WidgetCatalog>,
    notifier: Box<dyn Notifier>,
    observers: Vec<Box<dyn SessionObserver>>,
    /// Last known durable copy.
    persisted: DashboardState,
    /// Working copy; the single source of truth for both breakpoints.
    live: DashboardState,
    editing: bool,
    dirty: bool,
    /// Payload of the outstanding save, if any.
    inflight: Option<DashboardSnapshot>,
    history: LayoutHistory,
    pending_unlink: Option<LayoutAction>,
    gate: SuppressionGate,
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("phase", &self.phase())
            .field("dirty", &self.dirty)
            .field("widgets", &self.live.widgets.len())
            .field("linkage", &self.live.linkage)
            .field("history", &self.history)
            .finish()
    }
}

impl EditSession {
    #[must_use]
    pub fn new(
        initial: DashboardSnapshot,
        grid: GridSpec,
        catalog: Box<dyn WidgetCatalog>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let persisted = DashboardState::from_snapshot(initial);
        Self {
            grid,
            catalog,
            notifier,
            observers: Vec::new(),
            live: persisted.clone(),
            persisted,
            editing: false,
            dirty: false,
            inflight: None,
            history: LayoutHistory::default(),
            pending_unlink: None,
            gate: SuppressionGate::default(),
        }
    }

    /// Construct by loading the durable copy from a store.
    pub fn load_from(
        store: &dyn DashboardStore,
        grid: GridSpec,
        catalog: Box<dyn WidgetCatalog>,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self, StoreError> {
        let snapshot = store.load_all()?;
        Ok(Self::new(snapshot, grid, catalog, notifier))
    }

    /// Register an observer (builder form, used at construction).
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn SessionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.inflight.is_some() {
            SessionPhase::Saving
        } else if self.editing {
            SessionPhase::Editing
        } else {
            SessionPhase::Viewing
        }
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    #[must_use]
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn linkage(&self) -> LayoutLinkage {
        self.live.linkage
    }

    #[must_use]
    pub fn widgets(&self) -> &[Widget] {
        &self.live.widgets
    }

    /// The parked narrow edit awaiting unlink confirmation, if any.
    #[must_use]
    pub fn pending_unlink(&self) -> Option<&LayoutAction> {
        self.pending_unlink.as_ref()
    }

    /// Positional records for the renderer at a breakpoint.
    ///
    /// While linkage is `Linked`, the narrow tier is derived from the
    /// wide placement on the fly, so switching breakpoints always shows
    /// the stacked layout even before the first save.
    #[must_use]
    pub fn items(&self, bp: Breakpoint) -> Vec<PositionedItem> {
        if bp == Breakpoint::Narrow && self.live.linkage == LayoutLinkage::Linked {
            let mut widgets = self.live.widgets.clone();
            apply_derivation(&mut widgets, &self.grid, self.catalog.as_ref());
            return build_items(&widgets, bp, &self.grid, self.catalog.as_ref());
        }
        build_items(&self.live.widgets, bp, &self.grid, self.catalog.as_ref())
    }

    // ========================================================================
    // Edit-mode lifecycle
    // ========================================================================

    /// Enter edit mode, capturing the base history snapshot.
    ///
    /// Returns `false` if the session is already editing.
    pub fn enter_edit(&mut self) -> bool {
        if self.editing {
            return false;
        }
        tracing::debug!("entering edit mode");
        self.editing = true;
        self.dirty = false;
        self.history.clear();
        self.history.push(self.live.clone());
        self.notify(|o| o.edit_mode_changed(true));
        true
    }

    /// Enter edit mode when viewing; leave it when editing with no
    /// unsaved changes. A dirty session stays editing (save or cancel
    /// first).
    pub fn toggle_edit(&mut self) -> SessionPhase {
        if !self.editing {
            self.enter_edit();
        } else if !self.dirty && self.inflight.is_none() {
            tracing::debug!("leaving edit mode (clean)");
            self.editing = false;
            self.history.clear();
            self.pending_unlink = None;
            self.notify(|o| o.edit_mode_changed(false));
        }
        self.phase()
    }

    /// Discard every in-session mutation and return to viewing.
    ///
    /// Rejected (returns `false`) while a save is in flight.
    pub fn cancel(&mut self) -> bool {
        if !self.editing || self.inflight.is_some() {
            return false;
        }
        tracing::debug!("cancelling edit session");
        let previous_linkage = self.live.linkage;
        self.live = self.persisted.clone();
        self.history.clear();
        self.pending_unlink = None;
        self.dirty = false;
        self.editing = false;
        if self.live.linkage != previous_linkage {
            let linkage = self.live.linkage;
            self.notify(|o| o.linkage_changed(linkage));
        }
        self.notify(|o| o.edit_mode_changed(false));
        true
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Apply a layout mutation.
    ///
    /// Sizes are silently clamped into the scaled bounds; a direct
    /// narrow edit while linkage is `Linked` is parked and
    /// [`MutateError::UnlinkConfirmationRequired`] returned.
    pub fn apply(&mut self, action: LayoutAction) -> Result<(), MutateError> {
        if !self.editing {
            return Err(MutateError::NotEditing);
        }
        if self.pending_unlink.is_some() {
            return Err(MutateError::ConfirmationPending);
        }
        if action.touches_narrow() && self.live.linkage == LayoutLinkage::Linked {
            self.pending_unlink = Some(action);
            return Err(MutateError::UnlinkConfirmationRequired);
        }
        self.apply_unchecked(action)?;
        self.commit_mutation();
        Ok(())
    }

    /// Confirm the parked narrow edit: switch to independent narrow
    /// maintenance and apply it.
    pub fn confirm_unlink(&mut self) -> Result<(), MutateError> {
        let action = self
            .pending_unlink
            .take()
            .ok_or(MutateError::NoPendingUnlink)?;
        tracing::debug!("unlinking narrow layout");
        self.apply_unchecked(action)?;
        self.live.linkage = LayoutLinkage::Independent;
        self.notify(|o| o.linkage_changed(LayoutLinkage::Independent));
        self.commit_mutation();
        Ok(())
    }

    /// Drop the parked narrow edit and stay linked.
    pub fn dismiss_unlink(&mut self) {
        self.pending_unlink = None;
    }

    /// Re-derive the narrow layout from wide and link it again.
    pub fn relink_narrow(&mut self) -> Result<(), MutateError> {
        if !self.editing {
            return Err(MutateError::NotEditing);
        }
        self.pending_unlink = None;
        self.live.linkage = LayoutLinkage::Linked;
        apply_derivation(&mut self.live.widgets, &self.grid, self.catalog.as_ref());
        self.notify(|o| o.linkage_changed(LayoutLinkage::Linked));
        self.commit_mutation();
        Ok(())
    }

    /// Restore the previous history snapshot. Returns `false` at the
    /// session base.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.restore(snapshot.as_ref().clone());
        true
    }

    /// Restore the next history snapshot. Returns `false` with no
    /// undone future.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.restore(snapshot.as_ref().clone());
        true
    }

    fn restore(&mut self, state: DashboardState) {
        let previous_linkage = self.live.linkage;
        self.live = state;
        self.dirty = self.live != self.persisted;
        if self.live.linkage != previous_linkage {
            let linkage = self.live.linkage;
            self.notify(|o| o.linkage_changed(linkage));
        }
    }

    fn commit_mutation(&mut self) {
        self.history.push(self.live.clone());
        self.dirty = true;
    }

    fn apply_unchecked(&mut self, action: LayoutAction) -> Result<(), MutateError> {
        match action {
            LayoutAction::Add { kind, config } => {
                let id = self.live.next_id();
                let metadata = self.catalog.metadata(&kind);
                let bounds = scale(&metadata.constraint, Breakpoint::Wide, &self.grid);
                let (w, h) = bounds.clamp_size(metadata.default_w, metadata.default_h);
                let rect = GridRect::new(
                    0,
                    self.live.wide_bottom(),
                    w.min(self.grid.columns(Breakpoint::Wide)),
                    h,
                );
                self.live
                    .widgets
                    .push(Widget::new(id, kind).with_wide(rect).with_config(config));
                self.notify(|o| o.widget_added(id));
                Ok(())
            }
            LayoutAction::Delete { id } => {
                self.live
                    .remove(id)
                    .ok_or(MutateError::UnknownWidget { id })?;
                self.notify(|o| o.widget_removed(id));
                Ok(())
            }
            LayoutAction::Duplicate { id } => {
                let source = self
                    .live
                    .widget(id)
                    .ok_or(MutateError::UnknownWidget { id })?
                    .clone();
                let copy_id = self.live.next_id();
                let mut copy = Widget::new(copy_id, source.kind.clone())
                    .with_config(source.config.clone());
                if let Some(rect) = source.wide {
                    // The copy lands below everything, keeping x and size.
                    copy.wide = Some(GridRect::new(
                        rect.x,
                        self.live.wide_bottom(),
                        rect.w,
                        rect.h,
                    ));
                }
                self.live.widgets.push(copy);
                self.notify(|o| o.widget_added(copy_id));
                Ok(())
            }
            LayoutAction::Move {
                id,
                breakpoint,
                x,
                y,
            } => {
                let columns = self.grid.columns(breakpoint);
                let widget = self
                    .live
                    .widget_mut(id)
                    .ok_or(MutateError::UnknownWidget { id })?;
                let mut rect = *widget
                    .layout_for(breakpoint)
                    .ok_or(MutateError::MissingLayout { id, breakpoint })?;
                // A narrow move may start from the wide fallback rect,
                // which can be wider than the narrow grid.
                rect.w = rect.w.min(columns);
                rect.x = x.min(columns.saturating_sub(rect.w));
                rect.y = y;
                Self::store_rect(widget, breakpoint, rect);
                Ok(())
            }
            LayoutAction::Resize {
                id,
                breakpoint,
                w,
                h,
            } => {
                let columns = self.grid.columns(breakpoint);
                let metadata = {
                    let widget = self
                        .live
                        .widget(id)
                        .ok_or(MutateError::UnknownWidget { id })?;
                    self.catalog.metadata(&widget.kind)
                };
                let bounds = scale(&metadata.constraint, breakpoint, &self.grid);
                let widget = self
                    .live
                    .widget_mut(id)
                    .ok_or(MutateError::UnknownWidget { id })?;
                let mut rect = *widget
                    .layout_for(breakpoint)
                    .ok_or(MutateError::MissingLayout { id, breakpoint })?;
                let (w, h) = bounds.clamp_size(w, h);
                rect.w = w.min(columns);
                rect.h = h;
                // Growing past the right edge pulls the widget left.
                if rect.right() > u32::from(columns) {
                    rect.x = columns - rect.w;
                }
                Self::store_rect(widget, breakpoint, rect);
                Ok(())
            }
            LayoutAction::UpdateConfig { id, config } => {
                let widget = self
                    .live
                    .widget_mut(id)
                    .ok_or(MutateError::UnknownWidget { id })?;
                widget.config = config;
                self.notify(|o| o.config_changed(id));
                Ok(())
            }
        }
    }

    fn store_rect(widget: &mut Widget, breakpoint: Breakpoint, rect: GridRect) {
        match breakpoint {
            Breakpoint::Wide => widget.wide = Some(rect),
            Breakpoint::Narrow => widget.narrow = Some(rect),
        }
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Start a save: returns the payload for the external store and
    /// marks the save in flight.
    ///
    /// While linkage is `Linked`, the narrow layout is re-derived from
    /// wide first, so the payload always carries both layouts.
    pub fn begin_save(&mut self) -> Result<DashboardSnapshot, SaveRejected> {
        if !self.editing {
            return Err(SaveRejected::NotEditing);
        }
        if self.inflight.is_some() {
            return Err(SaveRejected::AlreadySaving);
        }
        if self.live.linkage == LayoutLinkage::Linked {
            apply_derivation(&mut self.live.widgets, &self.grid, self.catalog.as_ref());
        }
        let payload = self.live.to_snapshot();
        tracing::debug!(widgets = payload.widgets.len(), "save started");
        self.inflight = Some(payload.clone());
        Ok(payload)
    }

    /// Complete the outstanding save with the store's outcome.
    ///
    /// Success makes the payload durable, clears dirty and history, and
    /// returns to viewing (unless further edits arrived while the save
    /// was in flight, in which case the session stays editing and
    /// dirty). Failure changes nothing in memory and reports one error
    /// notification.
    pub fn finish_save(&mut self, result: Result<(), StoreError>) {
        let Some(payload) = self.inflight.take() else {
            tracing::warn!("finish_save called with no save in flight");
            return;
        };
        match result {
            Ok(()) => {
                self.persisted = DashboardState::from_snapshot(payload);
                if self.live == self.persisted {
                    tracing::debug!("save succeeded, leaving edit mode");
                    self.dirty = false;
                    self.editing = false;
                    self.history.clear();
                    self.pending_unlink = None;
                    self.notify(|o| o.edit_mode_changed(false));
                } else {
                    // The user kept editing while the save ran.
                    tracing::debug!("save succeeded with newer local edits pending");
                    self.dirty = true;
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "save failed");
                self.notifier
                    .show_error("Failed to save layout", &err.to_string());
            }
        }
    }

    /// Synchronous save against a store: `begin_save` plus
    /// `finish_save` in one call. Store failures are reported through
    /// the notifier and leave the session editing and dirty.
    pub fn save_with(&mut self, store: &mut dyn DashboardStore) -> Result<(), SaveRejected> {
        let payload = self.begin_save()?;
        let result = store.save_all(&payload);
        self.finish_save(result);
        Ok(())
    }

    // ========================================================================
    // Live data
    // ========================================================================

    /// Record a locally initiated action against a bound external
    /// resource, opening the suppression window.
    pub fn note_local_action(&mut self) {
        self.gate.note_local_action();
    }

    /// Test-friendly form with an injected timestamp.
    pub fn note_local_action_at(&mut self, now: Instant) {
        self.gate.note_local_action_at(now);
    }

    /// Offer an asynchronously arriving push to the session.
    pub fn ingest_live(&mut self, update: LiveUpdate) -> LiveIngest {
        self.ingest_live_at(update, Instant::now())
    }

    /// Test-friendly form with an injected timestamp.
    pub fn ingest_live_at(&mut self, update: LiveUpdate, now: Instant) -> LiveIngest {
        if !self.gate.should_apply_at(now) {
            return LiveIngest::Suppressed;
        }
        let Some(widget) = self.live.widget_mut(update.id) else {
            return LiveIngest::UnknownWidget;
        };
        widget.config = update.config.clone();
        // The push is remote truth; keep the durable mirror in sync so
        // config drift never reads as an unsaved layout edit.
        if let Some(mirror) = self.persisted.widget_mut(update.id) {
            mirror.config = update.config;
        }
        self.notify(|o| o.config_changed(update.id));
        LiveIngest::Applied
    }

    fn notify(&mut self, mut f: impl FnMut(&mut dyn SessionObserver)) {
        for observer in &mut self.observers {
            f(observer.as_mut());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

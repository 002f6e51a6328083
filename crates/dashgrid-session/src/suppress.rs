#![forbid(unsafe_code)]

//! Optimistic suppression window for live-data pushes.
//!
//! After a locally initiated mutating action against a bound external
//! resource, the UI already shows the expected outcome. A live-data
//! push that was read *before* the action landed would clobber that
//! optimistic state, so the session drops pushes for a short window
//! after each local action.
//!
//! This is a plain monotonic-clock gate. It accepts the rare stale
//! overwrite that arrives after the window closes in exchange for not
//! needing version vectors on every payload.
//!
//! # Invariants
//!
//! 1. Consecutive local actions extend the window; it never shortens.
//! 2. A push at exactly `suppress_until` is applied (the window is
//!    half-open).
//!
//! # Failure Modes
//!
//! None. Suppression drops are routine and logged at trace level only.

use web_time::{Duration, Instant};

/// Window length applied after each local action.
pub const DEFAULT_SUPPRESSION_WINDOW: Duration = Duration::from_secs(3);

/// Monotonic-clock gate between local actions and live-data pushes.
#[derive(Debug, Clone)]
pub struct SuppressionGate {
    window: Duration,
    suppress_until: Option<Instant>,
}

impl Default for SuppressionGate {
    fn default() -> Self {
        Self::new(DEFAULT_SUPPRESSION_WINDOW)
    }
}

impl SuppressionGate {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            suppress_until: None,
        }
    }

    /// Record a local action now.
    pub fn note_local_action(&mut self) {
        self.note_local_action_at(Instant::now());
    }

    /// Record a local action at an injected timestamp.
    pub fn note_local_action_at(&mut self, now: Instant) {
        let until = now + self.window;
        // Never pull an existing deadline earlier.
        if self.suppress_until.is_none_or(|cur| until > cur) {
            self.suppress_until = Some(until);
        }
    }

    /// Whether a push arriving now should be applied.
    #[must_use]
    pub fn should_apply(&self) -> bool {
        self.should_apply_at(Instant::now())
    }

    /// Whether a push arriving at `now` should be applied.
    #[must_use]
    pub fn should_apply_at(&self, now: Instant) -> bool {
        match self.suppress_until {
            Some(until) if now < until => {
                tracing::trace!("live push inside suppression window, dropping");
                false
            }
            _ => true,
        }
    }

    /// Drop any active window (session teardown).
    pub fn clear(&mut self) {
        self.suppress_until = None;
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#![forbid(unsafe_code)]

//! Drag-proximity auto-scroll.
//!
//! While a drag gesture is active, a per-frame tick samples the pointer
//! and scrolls the viewport when the pointer sits in an edge zone. The
//! speed ramps nonlinearly from a crawl at the zone's outer boundary to
//! a maximum at the viewport edge, and the applied speed is
//! interpolated toward that target each tick instead of snapping, so
//! scrolling accelerates and decays smoothly.
//!
//! The pointer is read through an injected [`PointerProvider`] owned by
//! the gesture, not process-wide state, so concurrent tests and
//! back-to-back gestures never bleed into each other.
//!
//! # Invariants
//!
//! 1. No scrolling before the pointer has moved the grace distance from
//!    its grab point.
//! 2. Each tick reads the pointer exactly once.
//! 3. [`AutoScroller::end_gesture`] synchronously clears all per-gesture
//!    state; the next gesture starts from zero speed and an un-cleared
//!    grace latch.
//! 4. In down-only mode the top zone never produces scrolling.
//!
//! # Failure Modes
//!
//! A missing pointer sample (gesture source briefly dropped) decays the
//! speed toward zero instead of holding the last value.

use web_time::Duration;

/// Per-gesture pointer sampler, created when a drag starts.
pub trait PointerProvider {
    /// Latest vertical pointer position in viewport coordinates, if a
    /// sample is available this frame.
    fn pointer_y(&self) -> Option<f32>;
}

/// The scrollable viewport the drag happens in.
pub trait ScrollSurface {
    /// Top of the visible viewport in the same coordinates as the
    /// pointer.
    fn viewport_top(&self) -> f32;
    /// Visible viewport height in pixels.
    fn viewport_height(&self) -> f32;
    /// Scroll the content by `dy` pixels (positive scrolls down).
    fn scroll_by(&mut self, dy: f32);
}

/// Tuning for the proximity ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoScrollConfig {
    /// Pointer travel required after grab before scrolling may start.
    pub grace_distance_px: f32,
    /// Depth of the top and bottom activation zones.
    pub edge_zone_px: f32,
    /// Crawl speed at the zone's outer boundary, px/s.
    pub min_speed: f32,
    /// Speed at the viewport edge, px/s.
    pub max_speed: f32,
    /// Ramp exponent; values above 2 keep the outer zone gentle.
    pub ramp_power: f32,
    /// Per-tick interpolation factor toward the target speed (0..1].
    pub smoothing: f32,
    /// Exponential smoothing factor for the pointer velocity (0..1].
    pub velocity_alpha: f32,
    /// Smoothed velocity beyond which the pointer counts as clearly
    /// moving away from an edge, px/s.
    pub away_velocity_px_s: f32,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            grace_distance_px: 24.0,
            edge_zone_px: 96.0,
            min_speed: 60.0,
            max_speed: 900.0,
            ramp_power: 2.5,
            smoothing: 0.25,
            velocity_alpha: 0.3,
            away_velocity_px_s: 150.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct GestureState {
    start_y: f32,
    last_y: f32,
    grace_cleared: bool,
    /// Smoothed pointer velocity, px/s, positive downward.
    velocity: f32,
    /// Currently applied scroll speed, px/s, positive downward.
    speed: f32,
}

/// Edge-proximity scroll controller for one drag surface.
#[derive(Debug, Clone)]
pub struct AutoScroller {
    config: AutoScrollConfig,
    down_only: bool,
    gesture: Option<GestureState>,
}

impl Default for AutoScroller {
    fn default() -> Self {
        Self::new(AutoScrollConfig::default())
    }
}

impl AutoScroller {
    #[must_use]
    pub fn new(config: AutoScrollConfig) -> Self {
        Self {
            config,
            down_only: false,
            gesture: None,
        }
    }

    /// Start tracking a drag that grabbed the widget at `start_y`.
    pub fn begin_gesture(&mut self, start_y: f32) {
        tracing::trace!(start_y, "drag gesture started");
        self.gesture = Some(GestureState {
            start_y,
            last_y: start_y,
            grace_cleared: false,
            velocity: 0.0,
            speed: 0.0,
        });
    }

    /// Stop tracking; clears all per-gesture state immediately.
    pub fn end_gesture(&mut self) {
        if self.gesture.take().is_some() {
            tracing::trace!("drag gesture ended");
        }
    }

    /// Suppress the top zone (resize gestures only grow downward).
    pub fn set_down_only(&mut self, down_only: bool) {
        self.down_only = down_only;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Currently applied speed in px/s; zero when idle.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.gesture.map_or(0.0, |g| g.speed)
    }

    /// Advance one animation frame.
    ///
    /// Samples the pointer once, updates the smoothed velocity, picks a
    /// target speed from the edge zones, interpolates the applied speed
    /// toward it, and scrolls the surface.
    pub fn tick(
        &mut self,
        pointer: &dyn PointerProvider,
        surface: &mut dyn ScrollSurface,
        dt: Duration,
    ) {
        let config = self.config;
        let down_only = self.down_only;
        let Some(state) = self.gesture.as_mut() else {
            return;
        };
        let dt_s = dt.as_secs_f32();
        if dt_s <= 0.0 {
            return;
        }

        let target = match pointer.pointer_y() {
            None => 0.0,
            Some(y) => {
                let instant_velocity = (y - state.last_y) / dt_s;
                state.velocity += config.velocity_alpha * (instant_velocity - state.velocity);
                state.last_y = y;

                if !state.grace_cleared
                    && (y - state.start_y).abs() >= config.grace_distance_px
                {
                    state.grace_cleared = true;
                }

                if state.grace_cleared {
                    Self::target_speed(&config, down_only, state.velocity, y, surface)
                } else {
                    0.0
                }
            }
        };

        state.speed += (target - state.speed) * config.smoothing.clamp(0.0, 1.0);
        // Settle to a hard stop instead of an asymptotic crawl.
        if target == 0.0 && state.speed.abs() < 1.0 {
            state.speed = 0.0;
        }
        if state.speed != 0.0 {
            surface.scroll_by(state.speed * dt_s);
        }
    }

    /// Target speed for the current pointer position; zero outside the
    /// zones or while the pointer clearly retreats from the edge.
    fn target_speed(
        config: &AutoScrollConfig,
        down_only: bool,
        velocity: f32,
        y: f32,
        surface: &dyn ScrollSurface,
    ) -> f32 {
        let top = surface.viewport_top();
        let bottom = top + surface.viewport_height();
        let zone = config.edge_zone_px.max(1.0);

        if !down_only && y < top + zone {
            // Moving down is moving away from the top edge.
            if velocity > config.away_velocity_px_s {
                return 0.0;
            }
            let depth = ((top + zone - y) / zone).clamp(0.0, 1.0);
            -Self::ramp(config, depth)
        } else if y > bottom - zone {
            // Moving up is moving away from the bottom edge.
            if velocity < -config.away_velocity_px_s {
                return 0.0;
            }
            let depth = ((y - (bottom - zone)) / zone).clamp(0.0, 1.0);
            Self::ramp(config, depth)
        } else {
            0.0
        }
    }

    fn ramp(config: &AutoScrollConfig, depth: f32) -> f32 {
        config.min_speed
            + (config.max_speed - config.min_speed) * depth.powf(config.ramp_power.max(1.0))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

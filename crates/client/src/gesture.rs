//! Swipe gesture interpreter.
//!
//! Turns a horizontal drag into a like/pass decision. The interpreter only
//! computes positions and animation targets; drawing is up to the caller.
//!
//! ```text
//!            drag_start / drag_move
//!   Settled ─────────────────────────▶ Dragging
//!      ▲                                  │ drag_end
//!      │   |offset| <= threshold          │
//!      ├──────────────────────────────────┤
//!      │                                  │ |offset| > threshold
//!      │          finish_exit             ▼
//!      └────────────────────────────── Exiting
//! ```

use std::time::Duration;

use swipey_core::SwipeDecision;

/// Horizontal distance a drag must exceed to count as a decision.
pub const SWIPE_THRESHOLD: f64 = 80.0;
/// How far past the release point an exiting card travels.
pub const EXIT_DISTANCE: f64 = 1000.0;
/// Final rotation of an exiting card, in degrees.
pub const EXIT_ROTATION_DEG: f64 = 30.0;
/// Length of the exit animation.
pub const EXIT_DURATION: Duration = Duration::from_millis(500);

const DRAG_ROTATION_RANGE: f64 = 200.0;
const MAX_DRAG_ROTATION_DEG: f64 = 20.0;
const INDICATOR_RANGE: f64 = 100.0;

/// Where an exiting card flies to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitAnimation {
    pub decision: SwipeDecision,
    pub from_offset: f64,
    pub target_offset: f64,
    pub target_rotation: f64,
    pub duration: Duration,
}

impl ExitAnimation {
    fn new(decision: SwipeDecision, from_offset: f64) -> Self {
        let direction = decision.direction();
        Self {
            decision,
            from_offset,
            target_offset: direction.mul_add(EXIT_DISTANCE, from_offset),
            target_rotation: direction * EXIT_ROTATION_DEG,
            duration: EXIT_DURATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    /// Card centered, no pointer down.
    Settled,
    /// Pointer down; `offset` is the horizontal displacement in pixels.
    Dragging { offset: f64 },
    /// Card is flying off-screen after a decision.
    Exiting(ExitAnimation),
}

/// Classify a release offset. The comparison is strict: exactly the
/// threshold springs back.
#[must_use]
pub fn decide(offset: f64, threshold: f64) -> Option<SwipeDecision> {
    if offset > threshold {
        Some(SwipeDecision::Like)
    } else if offset < -threshold {
        Some(SwipeDecision::Pass)
    } else {
        None
    }
}

#[derive(Debug, Clone)]
pub struct SwipeInterpreter {
    state: GestureState,
    threshold: f64,
}

impl Default for SwipeInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl SwipeInterpreter {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_threshold(SWIPE_THRESHOLD)
    }

    #[must_use]
    pub const fn with_threshold(threshold: f64) -> Self {
        Self {
            state: GestureState::Settled,
            threshold,
        }
    }

    #[must_use]
    pub const fn state(&self) -> GestureState {
        self.state
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub const fn is_exiting(&self) -> bool {
        matches!(self.state, GestureState::Exiting(_))
    }

    /// Pointer down. Ignored while a card is exiting.
    pub const fn drag_start(&mut self) -> bool {
        match self.state {
            GestureState::Exiting(_) => false,
            GestureState::Settled | GestureState::Dragging { .. } => {
                self.state = GestureState::Dragging { offset: 0.0 };
                true
            }
        }
    }

    /// Pointer moved to `offset`. Starts a drag if none is active.
    pub fn drag_move(&mut self, offset: f64) {
        if self.is_exiting() || !offset.is_finite() {
            return;
        }
        self.state = GestureState::Dragging { offset };
    }

    /// Pointer released at `offset`.
    ///
    /// Past the threshold this returns the decision and starts the exit;
    /// otherwise the card springs back to the center.
    pub fn drag_end(&mut self, offset: f64) -> Option<SwipeDecision> {
        if self.is_exiting() {
            return None;
        }
        let offset = if offset.is_finite() { offset } else { 0.0 };
        match decide(offset, self.threshold) {
            Some(decision) => {
                self.state = GestureState::Exiting(ExitAnimation::new(decision, offset));
                Some(decision)
            }
            None => {
                self.state = GestureState::Settled;
                None
            }
        }
    }

    /// Start an exit without a drag, as the like/pass buttons do.
    pub fn trigger(&mut self, decision: SwipeDecision) -> bool {
        if self.is_exiting() {
            return false;
        }
        self.state = GestureState::Exiting(ExitAnimation::new(decision, self.offset()));
        true
    }

    /// The exit animation finished; ready for the next card.
    pub const fn finish_exit(&mut self) -> Option<SwipeDecision> {
        match self.state {
            GestureState::Exiting(exit) => {
                self.state = GestureState::Settled;
                Some(exit.decision)
            }
            GestureState::Settled | GestureState::Dragging { .. } => None,
        }
    }

    /// Current horizontal offset. While exiting, the exit target.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        match self.state {
            GestureState::Settled => 0.0,
            GestureState::Dragging { offset } => offset,
            GestureState::Exiting(exit) => exit.target_offset,
        }
    }

    /// Card rotation in degrees.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        match self.state {
            GestureState::Exiting(exit) => exit.target_rotation,
            GestureState::Settled | GestureState::Dragging { .. } => drag_rotation(self.offset()),
        }
    }

    /// Opacity of the "like" indicator, 0 to 1.
    #[must_use]
    pub fn like_opacity(&self) -> f64 {
        indicator_opacity(self.drag_offset())
    }

    /// Opacity of the "nope" indicator, 0 to 1.
    #[must_use]
    pub fn pass_opacity(&self) -> f64 {
        indicator_opacity(-self.drag_offset())
    }

    const fn drag_offset(&self) -> f64 {
        match self.state {
            GestureState::Dragging { offset } => offset,
            GestureState::Settled | GestureState::Exiting(_) => 0.0,
        }
    }
}

fn drag_rotation(offset: f64) -> f64 {
    (offset / DRAG_ROTATION_RANGE * MAX_DRAG_ROTATION_DEG)
        .clamp(-MAX_DRAG_ROTATION_DEG, MAX_DRAG_ROTATION_DEG)
}

fn indicator_opacity(offset: f64) -> f64 {
    (offset / INDICATOR_RANGE).clamp(0.0, 1.0)
}

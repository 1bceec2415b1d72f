#![forbid(unsafe_code)]

//! Per-view gesture state shared by the swipe engines.
//!
//! [`GestureState`] records where a touch sequence started, where the finger
//! is now, and which [`GesturePhase`] the sequence is in. The engines layer
//! their own fields on top; this module owns only what both need.
//!
//! # Invariants
//!
//! 1. Exactly one phase is active at a time.
//! 2. Within one gesture, phases only move forward:
//!    `Idle → Classifying → {HorizontalActive | VerticalRejected} → [Completing] → Idle`.
//!    `Classifying → Idle` is allowed when the finger lifts before the axis
//!    is decided.
//! 3. [`begin`](GestureState::begin) is the only way to leave `Idle` and
//!    always starts a new [`GestureGeneration`], from any phase.
//! 4. Once [`AxisLock`] reports `Horizontal` or `Vertical`, later
//!    observations in the same gesture return the same answer.

use crate::geometry::{AxisClass, Point, SwipeDirection, classify_axis};

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Phase of the live gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    /// Touch is down but movement is still within the axis threshold.
    Classifying,
    /// Horizontal drag recognised; the view follows the finger.
    HorizontalActive,
    /// Vertical drag recognised; the rest of the gesture is ignored.
    VerticalRejected,
    /// Finger lifted; a commit or cancel animation is running.
    Completing,
}

impl GesturePhase {
    /// Whether moving from `self` to `next` respects the phase order.
    ///
    /// `next == Classifying` from any phase is a new gesture superseding the
    /// current one, which is always permitted.
    #[must_use]
    pub const fn can_advance_to(self, next: GesturePhase) -> bool {
        use GesturePhase::*;
        match (self, next) {
            (_, Classifying) => true,
            (_, Idle) => true,
            (Classifying, HorizontalActive | VerticalRejected) => true,
            (HorizontalActive, Completing) => true,
            _ => false,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Classifying => "classifying",
            Self::HorizontalActive => "horizontal_active",
            Self::VerticalRejected => "vertical_rejected",
            Self::Completing => "completing",
        }
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Identifier of one touch sequence on one view.
///
/// Deferred work captures the generation that scheduled it and is dropped if
/// a newer gesture has started by the time it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct GestureGeneration(u32);

impl GestureGeneration {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The following generation.
    ///
    /// Wrapping is fine: a view never holds four billion pending gestures.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

// ---------------------------------------------------------------------------
// AxisLock
// ---------------------------------------------------------------------------

/// Sticky axis classification for one gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisLock {
    locked: Option<AxisClass>,
}

impl AxisLock {
    /// Classify the displacement, locking on the first decisive answer.
    pub fn observe(&mut self, delta_x: f64, delta_y: f64, threshold: f64) -> AxisClass {
        if let Some(axis) = self.locked {
            return axis;
        }
        let axis = classify_axis(delta_x, delta_y, threshold);
        if axis.is_decided() {
            self.locked = Some(axis);
        }
        axis
    }

    #[inline]
    #[must_use]
    pub fn locked(&self) -> Option<AxisClass> {
        self.locked
    }

    pub fn reset(&mut self) {
        self.locked = None;
    }
}

// ---------------------------------------------------------------------------
// GestureState
// ---------------------------------------------------------------------------

/// Touch coordinates and phase for the live gesture on one view.
#[derive(Debug, Clone, Default)]
pub struct GestureState {
    touch_start: Point,
    current: Point,
    phase: GesturePhase,
    axis: AxisLock,
    direction: Option<SwipeDirection>,
    generation: GestureGeneration,
}

impl GestureState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a new gesture at `point`.
    ///
    /// Overrides whatever the previous gesture was doing and returns the new
    /// generation.
    pub fn begin(&mut self, point: Point) -> GestureGeneration {
        self.generation = self.generation.next();
        self.touch_start = point;
        self.current = point;
        self.phase = GesturePhase::Classifying;
        self.axis.reset();
        self.direction = None;
        self.generation
    }

    /// Invalidate the current gesture without tracking a new one.
    ///
    /// Used when a touch starts somewhere the engine ignores: the previous
    /// gesture is superseded, but no new one becomes live.
    pub fn supersede(&mut self) -> GestureGeneration {
        self.generation = self.generation.next();
        self.phase = GesturePhase::Idle;
        self.axis.reset();
        self.direction = None;
        self.current = self.touch_start;
        self.generation
    }

    /// Return to `Idle`, keeping the generation.
    pub fn reset(&mut self) {
        self.phase = GesturePhase::Idle;
        self.axis.reset();
        self.direction = None;
        self.current = self.touch_start;
    }

    /// Move to `next`, which must respect the phase order.
    pub fn advance(&mut self, next: GesturePhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal gesture phase transition {:?} -> {:?}",
            self.phase,
            next
        );
        self.phase = next;
    }

    /// Classify the displacement from the touch start to `point`, sticky
    /// per gesture. Does not move [`current`](Self::current).
    pub fn observe_axis(&mut self, point: Point, threshold: f64) -> AxisClass {
        let (dx, dy) = point.delta_from(self.touch_start);
        self.axis.observe(dx, dy, threshold)
    }

    pub fn set_current(&mut self, point: Point) {
        self.current = point;
    }

    pub fn set_direction(&mut self, direction: Option<SwipeDirection>) {
        self.direction = direction;
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub fn generation(&self) -> GestureGeneration {
        self.generation
    }

    #[inline]
    #[must_use]
    pub fn touch_start(&self) -> Point {
        self.touch_start
    }

    #[inline]
    #[must_use]
    pub fn current(&self) -> Point {
        self.current
    }

    #[inline]
    #[must_use]
    pub fn direction(&self) -> Option<SwipeDirection> {
        self.direction
    }

    #[inline]
    #[must_use]
    pub fn axis(&self) -> Option<AxisClass> {
        self.axis.locked()
    }

    /// Signed horizontal travel since the touch started.
    #[inline]
    #[must_use]
    pub fn delta_x(&self) -> f64 {
        self.current.x - self.touch_start.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_bumps_generation_and_resets() {
        let mut g = GestureState::new();
        let first = g.begin(Point::new(10.0, 10.0));
        assert_eq!(
            g.observe_axis(Point::new(60.0, 12.0), 10.0),
            AxisClass::Horizontal
        );
        g.set_current(Point::new(60.0, 12.0));
        g.advance(GesturePhase::HorizontalActive);

        let second = g.begin(Point::new(5.0, 5.0));
        assert_ne!(first, second);
        assert_eq!(g.phase(), GesturePhase::Classifying);
        assert_eq!(g.axis(), None);
        assert_eq!(g.delta_x(), 0.0);
    }

    #[test]
    fn axis_lock_is_sticky() {
        let mut lock = AxisLock::default();
        assert_eq!(lock.observe(3.0, 2.0, 10.0), AxisClass::Undetermined);
        assert_eq!(lock.observe(30.0, 2.0, 10.0), AxisClass::Horizontal);
        // Later drift that would classify as vertical on its own.
        assert_eq!(lock.observe(31.0, 200.0, 10.0), AxisClass::Horizontal);
        lock.reset();
        assert_eq!(lock.observe(31.0, 200.0, 10.0), AxisClass::Vertical);
    }

    #[test]
    fn phase_order() {
        use GesturePhase::*;
        assert!(Idle.can_advance_to(Classifying));
        assert!(Classifying.can_advance_to(HorizontalActive));
        assert!(Classifying.can_advance_to(VerticalRejected));
        assert!(Classifying.can_advance_to(Idle));
        assert!(HorizontalActive.can_advance_to(Completing));
        assert!(Completing.can_advance_to(Idle));
        assert!(Completing.can_advance_to(Classifying));
        assert!(!Idle.can_advance_to(HorizontalActive));
        assert!(!VerticalRejected.can_advance_to(HorizontalActive));
        assert!(!VerticalRejected.can_advance_to(Completing));
        assert!(!Completing.can_advance_to(HorizontalActive));
    }

    #[test]
    fn supersede_leaves_idle_with_new_generation() {
        let mut g = GestureState::new();
        let first = g.begin(Point::new(1.0, 1.0));
        let second = g.supersede();
        assert_ne!(first, second);
        assert_eq!(g.phase(), GesturePhase::Idle);
    }

    #[test]
    fn generation_wraps() {
        let g = GestureGeneration::new(u32::MAX);
        assert_eq!(g.next().get(), 0);
    }
}

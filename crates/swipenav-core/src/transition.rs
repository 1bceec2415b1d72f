#![forbid(unsafe_code)]

//! Transition math: where each page sits for a given gesture snapshot.
//!
//! The engines never store positions. They build a small snapshot of their
//! state and ask these functions for `translateX`, opacity and progress, so
//! the values are recomputed from the same inputs on every read.
//!
//! # Invariants
//!
//! 1. Swipe-back `translateX` is always within `[0, width]`.
//! 2. Tab `translateX` is always within `[-width, width]`.
//! 3. Progress and opacity are always within `[0, 1]`, and `0` when the
//!    viewport width is unusable.

use crate::geometry::{SwipeDirection, clamp_or_floor};
use crate::gesture::GesturePhase;

// ---------------------------------------------------------------------------
// Swipe back
// ---------------------------------------------------------------------------

/// How a finished swipe-back gesture resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackOutcome {
    /// Slide the page off and navigate back.
    Commit,
    /// Slide the page back to rest.
    Cancel,
}

/// Inputs for the swipe-back page position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackSnapshot {
    pub phase: GesturePhase,
    /// Set while `phase == Completing`.
    pub outcome: Option<BackOutcome>,
    /// `current.x - touch_start.x`.
    pub delta_x: f64,
    pub viewport_width: f64,
}

/// Horizontal offset of the current page during a swipe-back gesture.
#[must_use]
pub fn back_translate_x(s: &BackSnapshot) -> f64 {
    let width = usable(s.viewport_width);
    match s.phase {
        GesturePhase::Completing => match s.outcome {
            Some(BackOutcome::Commit) => width,
            _ => 0.0,
        },
        GesturePhase::HorizontalActive => clamp_or_floor(s.delta_x, 0.0, width),
        _ => 0.0,
    }
}

/// Opacity of the previous page for a given reveal distance.
#[must_use]
pub fn reveal_opacity(delta_x: f64, viewport_width: f64) -> f64 {
    let width = usable(viewport_width);
    if width == 0.0 {
        return 0.0;
    }
    clamp_or_floor(delta_x / width, 0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Tab swipe
// ---------------------------------------------------------------------------

/// Inputs for the tab-swipe page positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabMotion {
    pub phase: GesturePhase,
    /// Direction classified for the live gesture.
    pub direction: Option<SwipeDirection>,
    /// Direction frozen when a completing transition commits; `None` while
    /// returning to rest.
    pub final_direction: Option<SwipeDirection>,
    /// Whether a neighbour exists in `direction` from the snapshotted tab.
    pub has_next: bool,
    /// `current.x - touch_start.x`.
    pub delta_x: f64,
    pub viewport_width: f64,
}

/// Horizontal offset of the current tab's content.
#[must_use]
pub fn tab_translate_x(m: &TabMotion) -> f64 {
    let width = usable(m.viewport_width);
    match m.phase {
        GesturePhase::Completing => m.final_direction.map_or(0.0, |d| d.sign() * width),
        GesturePhase::HorizontalActive => clamp_or_floor(m.delta_x, -width, width),
        _ => 0.0,
    }
}

/// Horizontal offset of the incoming tab's content.
///
/// The incoming page enters from the side opposite the drag and tracks the
/// current page 1:1.
#[must_use]
pub fn next_page_translate_x(m: &TabMotion) -> f64 {
    let width = usable(m.viewport_width);
    let parked = |direction: Option<SwipeDirection>| match direction {
        Some(SwipeDirection::Right) => -width,
        _ => width,
    };
    match m.phase {
        GesturePhase::Completing => {
            if m.final_direction.is_some() {
                0.0
            } else {
                parked(m.direction)
            }
        }
        GesturePhase::HorizontalActive => match m.direction {
            Some(direction) if m.has_next => -direction.sign() * width + tab_translate_x(m),
            _ => width,
        },
        GesturePhase::Idle => width,
        _ => parked(m.direction),
    }
}

/// Fraction of the viewport the current tab has travelled, in `[0, 1]`.
#[must_use]
pub fn swipe_progress(m: &TabMotion) -> f64 {
    let width = usable(m.viewport_width);
    if width == 0.0 {
        return 0.0;
    }
    clamp_or_floor(tab_translate_x(m).abs() / width, 0.0, 1.0)
}

#[inline]
fn usable(width: f64) -> f64 {
    if width.is_finite() && width > 0.0 {
        width
    } else {
        0.0
    }
}

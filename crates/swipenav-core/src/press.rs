#![forbid(unsafe_code)]

//! Press tracking for tappable list items that also sit inside swipeable
//! views.
//!
//! A press that travels more than [`PressConfig::movement_threshold`] on
//! either axis is a swipe, not a press: the tracker ends the press early and
//! suppresses the click that would otherwise follow the release.
//!
//! ```
//! use swipenav_core::geometry::Point;
//! use swipenav_core::press::{PressSignal, PressTracker};
//!
//! let mut press = PressTracker::default();
//! assert_eq!(press.press(Point::new(10.0, 10.0)), Some(PressSignal::Started));
//! assert_eq!(press.motion(Point::new(40.0, 12.0)), Some(PressSignal::Ended));
//! assert_eq!(press.release(), Some(PressSignal::Ended));
//! assert!(!press.take_click());
//! ```

use crate::event::{TouchEvent, TouchKind};
use crate::geometry::Point;

#[cfg(feature = "policy-config")]
use serde::{Deserialize, Serialize};

/// Press tracking parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct PressConfig {
    /// Movement (px) on either axis that turns a press into a swipe.
    pub movement_threshold: f64,
}

impl Default for PressConfig {
    fn default() -> Self {
        Self {
            movement_threshold: 10.0,
        }
    }
}

/// Press lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PressSignal {
    /// Visual press feedback should start.
    Started,
    /// Visual press feedback should stop.
    Ended,
}

/// Tracks one pointer press at a time.
#[derive(Debug, Clone, Default)]
pub struct PressTracker {
    config: PressConfig,
    origin: Option<Point>,
    moved: bool,
}

impl PressTracker {
    #[must_use]
    pub fn new(config: PressConfig) -> Self {
        Self {
            config,
            origin: None,
            moved: false,
        }
    }

    /// Touch start or mouse down.
    pub fn press(&mut self, at: Point) -> Option<PressSignal> {
        self.origin = Some(at);
        self.moved = false;
        Some(PressSignal::Started)
    }

    /// Touch move or mouse move. Ends the press the first time the pointer
    /// travels past the threshold.
    pub fn motion(&mut self, at: Point) -> Option<PressSignal> {
        let origin = self.origin?;
        if self.moved {
            return None;
        }
        let (dx, dy) = at.delta_from(origin);
        let limit = self.config.movement_threshold;
        if dx.abs() > limit || dy.abs() > limit {
            self.moved = true;
            return Some(PressSignal::Ended);
        }
        None
    }

    /// Touch end or mouse up.
    ///
    /// The movement flag survives until [`take_click`](Self::take_click) so
    /// the click that follows a release can still be suppressed.
    pub fn release(&mut self) -> Option<PressSignal> {
        self.origin.take().map(|_| PressSignal::Ended)
    }

    /// Mouse left the element; no click will follow.
    pub fn leave(&mut self) -> Option<PressSignal> {
        self.moved = false;
        self.origin.take().map(|_| PressSignal::Ended)
    }

    /// Whether a click should fire for the interaction that just ended.
    /// Resets the movement flag for the next interaction.
    pub fn take_click(&mut self) -> bool {
        let fire = !self.moved;
        self.moved = false;
        fire
    }

    #[inline]
    #[must_use]
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    #[inline]
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.origin.is_some()
    }

    /// Dispatch a touch event to the matching method.
    pub fn handle_touch(&mut self, event: &TouchEvent) -> Option<PressSignal> {
        match event.kind {
            TouchKind::Start => self.press(event.primary()?),
            TouchKind::Move => self.motion(event.primary()?),
            TouchKind::End => self.release(),
            TouchKind::Cancel => self.leave(),
        }
    }
}

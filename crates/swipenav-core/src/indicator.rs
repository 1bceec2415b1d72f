#![forbid(unsafe_code)]

//! Active-tab indicator geometry.
//!
//! Tab buttons are laid out with a fixed maximum width and symmetric
//! margins: spread evenly across the bar, or centred with side padding once
//! the row reaches its maximum total width. The indicator's `left` and
//! `width` are derived from that layout analytically instead of being
//! measured from rendered elements.
//!
//! # Failure Modes
//!
//! - `tab_count == 0`, an unusable viewport width, or an unknown current tab
//!   yield [`IndicatorStyle::fallback`] (`left: 0px, width: 80px,
//!   transform: translateX(0)`).

use crate::geometry::SwipeDirection;
use crate::gesture::GesturePhase;

#[cfg(feature = "policy-config")]
use serde::{Deserialize, Serialize};

/// Maximum width of a tab button (px).
pub const TAB_MAX_WIDTH: f64 = 80.0;
/// Margin on each side of a tab button (px).
pub const TAB_MARGIN: f64 = 4.0;

/// Sizing rules of the tab bar.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct TabBarMetrics {
    pub max_tab_width: f64,
    /// Applied on both the left and the right of each button.
    pub tab_margin: f64,
}

impl Default for TabBarMetrics {
    fn default() -> Self {
        Self {
            max_tab_width: TAB_MAX_WIDTH,
            tab_margin: TAB_MARGIN,
        }
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Resolved horizontal layout of a tab bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabBarLayout {
    pub tab_width: f64,
    pub padding: f64,
    pub margin: f64,
}

impl TabBarLayout {
    /// Lay out `tab_count` tabs across `viewport_width`.
    ///
    /// Returns `None` when there is nothing to lay out.
    #[must_use]
    pub fn compute(viewport_width: f64, tab_count: usize, metrics: TabBarMetrics) -> Option<Self> {
        if tab_count == 0 || !viewport_width.is_finite() || viewport_width <= 0.0 {
            return None;
        }
        let n = tab_count as f64;
        let margin = metrics.tab_margin;
        let total_margin = n * margin * 2.0;
        let flex_width = (viewport_width - total_margin) / n;
        let tab_width = flex_width.min(metrics.max_tab_width);
        let width_at_max = n * metrics.max_tab_width + total_margin;
        let padding = if viewport_width >= width_at_max {
            (viewport_width - width_at_max) / 2.0
        } else {
            0.0
        };
        Some(Self {
            tab_width,
            padding,
            margin,
        })
    }

    /// Left edge of the button at `index`.
    #[inline]
    #[must_use]
    pub fn slot_left(&self, index: usize) -> f64 {
        self.padding + self.margin + index as f64 * (self.tab_width + self.margin * 2.0)
    }
}

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// Horizontal transform applied on top of `left`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorTransform {
    /// Resting on a slot: `translateX(0)`.
    Rest,
    /// Interpolating between slots: `translateX({px}px)`.
    Offset(f64),
}

/// Position of the active-tab indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorStyle {
    pub left: f64,
    pub width: f64,
    pub transform: IndicatorTransform,
}

impl IndicatorStyle {
    /// Style used whenever geometry cannot be computed.
    #[must_use]
    pub const fn fallback() -> Self {
        Self {
            left: 0.0,
            width: TAB_MAX_WIDTH,
            transform: IndicatorTransform::Rest,
        }
    }

    fn resting(layout: &TabBarLayout, index: usize) -> Self {
        Self {
            left: layout.slot_left(index),
            width: layout.tab_width,
            transform: IndicatorTransform::Rest,
        }
    }

    /// Offset applied by the transform, in px.
    #[must_use]
    pub fn offset(&self) -> f64 {
        match self.transform {
            IndicatorTransform::Rest => 0.0,
            IndicatorTransform::Offset(px) => px,
        }
    }

    /// Where the indicator is drawn: `left + transform offset`.
    #[must_use]
    pub fn visual_left(&self) -> f64 {
        self.left + self.offset()
    }

    /// CSS values as `{transform, width, left}` strings.
    #[must_use]
    pub fn to_css(&self) -> IndicatorCss {
        let transform = match self.transform {
            IndicatorTransform::Rest => "translateX(0)".to_string(),
            IndicatorTransform::Offset(px) => format!("translateX({px}px)"),
        };
        IndicatorCss {
            transform,
            width: format!("{}px", self.width),
            left: format!("{}px", self.left),
        }
    }
}

impl Default for IndicatorStyle {
    fn default() -> Self {
        Self::fallback()
    }
}

/// String form of [`IndicatorStyle`] ready for an inline style binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorCss {
    pub transform: String,
    pub width: String,
    pub left: String,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Everything the indicator depends on, captured at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub viewport_width: f64,
    pub tab_count: usize,
    pub metrics: TabBarMetrics,
    pub phase: GesturePhase,
    /// Live current tab, `None` if the current value is not in the tab list.
    pub current_index: Option<usize>,
    /// Current tab captured when the gesture started.
    pub swipe_start_index: Option<usize>,
    /// Target frozen when a completing transition committed.
    pub completing_target_index: Option<usize>,
    /// Live direction, falling back to the committed one.
    pub direction: Option<SwipeDirection>,
    /// Swipe progress in `[0, 1]`.
    pub progress: f64,
}

/// Compute the indicator position for `s`.
#[must_use]
pub fn indicator_style(s: &IndicatorSnapshot) -> IndicatorStyle {
    let Some(layout) = TabBarLayout::compute(s.viewport_width, s.tab_count, s.metrics) else {
        return IndicatorStyle::fallback();
    };
    let in_range = |i: usize| (i < s.tab_count).then_some(i);

    match s.phase {
        GesturePhase::HorizontalActive => {}
        GesturePhase::Completing => {
            if let Some(target) = s.completing_target_index.and_then(in_range) {
                return IndicatorStyle::resting(&layout, target);
            }
        }
        _ => {
            return match s.current_index.and_then(in_range) {
                Some(current) => IndicatorStyle::resting(&layout, current),
                None => IndicatorStyle::fallback(),
            };
        }
    }

    let Some(base) = s.swipe_start_index.or(s.current_index).and_then(in_range) else {
        return IndicatorStyle::fallback();
    };
    let Some(next) = s.direction.and_then(|d| d.step(base, s.tab_count)) else {
        return IndicatorStyle::resting(&layout, base);
    };

    let progress = if s.progress.is_finite() {
        s.progress.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let base_left = layout.slot_left(base);
    let delta = layout.slot_left(next) - base_left;
    IndicatorStyle {
        left: base_left,
        width: layout.tab_width,
        transform: IndicatorTransform::Offset(delta * progress),
    }
}

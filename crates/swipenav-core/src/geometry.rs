#![forbid(unsafe_code)]

//! Geometry and threshold primitives for touch gestures.
//!
//! Everything here is a pure function of its arguments. Coordinates are CSS
//! pixels in client space (origin at the top-left of the viewport), carried
//! as `f64` to match what touch events report.
//!
//! # Failure Modes
//!
//! - A missing viewport ([`Viewport::UNAVAILABLE`], or any non-finite or
//!   non-positive dimension) makes every zone test return `false` and every
//!   ratio return `0.0`. Nothing here panics or yields NaN.

/// Movement (px) a touch must exceed on either axis before it is classified.
pub const DEFAULT_AXIS_THRESHOLD: f64 = 10.0;

// ---------------------------------------------------------------------------
// Point / Viewport
// ---------------------------------------------------------------------------

/// A position in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Signed displacement from `origin` to `self`.
    #[inline]
    #[must_use]
    pub fn delta_from(self, origin: Point) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// Size of the visible window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// A viewport that could not be measured (no window, server render, tests).
    pub const UNAVAILABLE: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are usable for geometry.
    #[inline]
    #[must_use]
    pub fn is_available(&self) -> bool {
        usable(self.width) && usable(self.height)
    }

    /// Width if usable, otherwise `0.0`.
    #[inline]
    #[must_use]
    pub fn usable_width(&self) -> f64 {
        if usable(self.width) { self.width } else { 0.0 }
    }
}

#[inline]
fn usable(extent: f64) -> bool {
    extent.is_finite() && extent > 0.0
}

// ---------------------------------------------------------------------------
// Direction / axis
// ---------------------------------------------------------------------------

/// Horizontal swipe direction, named after where the finger travels.
///
/// `Left` advances to the next item, `Right` goes back to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    /// Direction implied by a signed horizontal delta; `None` for zero.
    #[must_use]
    pub fn from_delta(delta_x: f64) -> Option<Self> {
        if delta_x > 0.0 {
            Some(Self::Right)
        } else if delta_x < 0.0 {
            Some(Self::Left)
        } else {
            None
        }
    }

    /// `-1.0` for `Left`, `+1.0` for `Right`.
    #[inline]
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Index reached by advancing one step from `index`, if it exists.
    #[must_use]
    pub fn step(self, index: usize, count: usize) -> Option<usize> {
        let next = match self {
            Self::Left => index.checked_add(1)?,
            Self::Right => index.checked_sub(1)?,
        };
        (next < count).then_some(next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl std::fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a displacement by dominant axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisClass {
    Horizontal,
    Vertical,
    /// Movement is still within the disambiguation threshold, or tied.
    Undetermined,
}

impl AxisClass {
    #[inline]
    #[must_use]
    pub const fn is_decided(self) -> bool {
        !matches!(self, Self::Undetermined)
    }
}

// ---------------------------------------------------------------------------
// Threshold functions
// ---------------------------------------------------------------------------

/// Classify a displacement by its dominant axis.
///
/// Returns [`AxisClass::Undetermined`] while both `|delta_x|` and `|delta_y|`
/// are at or below `threshold`. Once either exceeds it, the larger absolute
/// delta wins; an exact tie stays undetermined.
#[must_use]
pub fn classify_axis(delta_x: f64, delta_y: f64, threshold: f64) -> AxisClass {
    let (ax, ay) = (delta_x.abs(), delta_y.abs());
    if !ax.is_finite() || !ay.is_finite() {
        return AxisClass::Undetermined;
    }
    if ax <= threshold && ay <= threshold {
        return AxisClass::Undetermined;
    }
    if ax > ay {
        AxisClass::Horizontal
    } else if ay > ax {
        AxisClass::Vertical
    } else {
        AxisClass::Undetermined
    }
}

/// Whether `x` lies in the left-edge hot zone (`x <= width * fraction`).
#[must_use]
pub fn is_in_edge_zone(x: f64, window_width: f64, edge_fraction: f64) -> bool {
    if !usable(window_width) || !x.is_finite() {
        return false;
    }
    x <= window_width * edge_fraction
}

/// Whether `y` lies between the top and bottom dead zones (bounds inclusive).
///
/// Touches above `height * top_fraction` (status bar, header controls) or
/// below `height * (1 - bottom_fraction)` (tab bar) are outside.
#[must_use]
pub fn is_in_vertical_dead_zone(
    y: f64,
    window_height: f64,
    top_fraction: f64,
    bottom_fraction: f64,
) -> bool {
    if !usable(window_height) || !y.is_finite() {
        return false;
    }
    let top = window_height * top_fraction;
    let bottom = window_height * (1.0 - bottom_fraction);
    y >= top && y <= bottom
}

/// Whether a swipe in `direction` may leave `current_index`.
///
/// No `Left` advance from the last index and no `Right` advance from the
/// first. An index outside `0..item_count` never advances.
#[must_use]
pub fn can_advance(direction: SwipeDirection, current_index: usize, item_count: usize) -> bool {
    if current_index >= item_count {
        return false;
    }
    match direction {
        SwipeDirection::Left => current_index + 1 != item_count,
        SwipeDirection::Right => current_index != 0,
    }
}

/// Clamp `value` to `[lo, hi]`, mapping NaN to `lo`.
#[inline]
#[must_use]
pub fn clamp_or_floor(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        return lo;
    }
    value.max(lo).min(hi)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

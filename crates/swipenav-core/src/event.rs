#![forbid(unsafe_code)]

//! Touch input events as delivered by the host view.
//!
//! # Design
//!
//! - [`TouchEvent`] mirrors the browser `TouchEvent` fields the gesture
//!   engines read: the active touch list, `cancelable`, and the target.
//! - The target is described structurally ([`TouchTarget`]) rather than as a
//!   live DOM node, so engines stay testable outside a browser.
//! - Handlers never mutate the event; they return a [`TouchResponse`] telling
//!   the host whether to call `preventDefault` / `stopPropagation`.

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::geometry::Point;

// ---------------------------------------------------------------------------
// TouchEvent
// ---------------------------------------------------------------------------

/// Lifecycle position of a touch event within a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchKind {
    Start,
    Move,
    End,
    /// The platform aborted the sequence (e.g. an incoming call overlay).
    Cancel,
}

/// A raw touch event.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub kind: TouchKind,
    /// Active touches in client coordinates. Empty on `End`/`Cancel`.
    pub touches: SmallVec<[Point; 2]>,
    /// Whether the host may still prevent the default action.
    pub cancelable: bool,
    pub target: TouchTarget,
}

impl TouchEvent {
    fn with_point(kind: TouchKind, x: f64, y: f64) -> Self {
        let mut touches = SmallVec::new();
        touches.push(Point::new(x, y));
        Self {
            kind,
            touches,
            cancelable: true,
            target: TouchTarget::default(),
        }
    }

    /// A `touchstart` with a single finger at `(x, y)`.
    #[must_use]
    pub fn start(x: f64, y: f64) -> Self {
        Self::with_point(TouchKind::Start, x, y)
    }

    /// A `touchmove` with a single finger at `(x, y)`.
    #[must_use]
    pub fn moved(x: f64, y: f64) -> Self {
        Self::with_point(TouchKind::Move, x, y)
    }

    /// A `touchend` (no remaining touches).
    #[must_use]
    pub fn end() -> Self {
        Self {
            kind: TouchKind::End,
            touches: SmallVec::new(),
            cancelable: true,
            target: TouchTarget::default(),
        }
    }

    /// A `touchcancel`.
    #[must_use]
    pub fn cancel() -> Self {
        Self {
            kind: TouchKind::Cancel,
            ..Self::end()
        }
    }

    /// Replace the target (builder pattern).
    #[must_use]
    pub fn with_target(mut self, target: TouchTarget) -> Self {
        self.target = target;
        self
    }

    /// Mark the event as not cancelable (builder pattern).
    #[must_use]
    pub fn non_cancelable(mut self) -> Self {
        self.cancelable = false;
        self
    }

    /// The first active touch, if any.
    #[inline]
    #[must_use]
    pub fn primary(&self) -> Option<Point> {
        self.touches.first().copied()
    }
}

// ---------------------------------------------------------------------------
// Targets and selectors
// ---------------------------------------------------------------------------

/// Structural description of one element on the touch target's path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementInfo {
    /// Lower-case tag name (`button`, `div`, `ion-tab-button`, ...).
    pub tag: String,
    pub role: Option<String>,
    pub classes: SmallVec<[String; 4]>,
    /// Names of attributes present on the element.
    pub attributes: SmallVec<[String; 2]>,
}

impl ElementInfo {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }
}

/// The touched element followed by its ancestors, innermost first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TouchTarget {
    pub path: Vec<ElementInfo>,
}

impl TouchTarget {
    #[must_use]
    pub fn new(path: Vec<ElementInfo>) -> Self {
        Self { path }
    }

    /// A target consisting of a single element with no known ancestors.
    #[must_use]
    pub fn element(element: ElementInfo) -> Self {
        Self {
            path: vec![element],
        }
    }
}

/// Error returned for selector syntax outside the supported subset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported selector syntax: {0:?}")]
pub struct SelectorError(pub String);

/// The selector subset used to mark interactive elements.
///
/// Supports `tag`, `.class`, `[attr]` and `[role="value"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Tag(String),
    Class(String),
    Attribute(String),
    Role(String),
}

impl Selector {
    /// Parse a selector from its CSS spelling.
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let s = source.trim();
        let invalid = || SelectorError(source.to_string());
        if s.is_empty() {
            return Err(invalid());
        }
        if let Some(class) = s.strip_prefix('.') {
            if class.is_empty() || !is_ident(class) {
                return Err(invalid());
            }
            return Ok(Self::Class(class.to_string()));
        }
        if let Some(inner) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            return match inner.split_once('=') {
                None if is_ident(inner) => Ok(Self::Attribute(inner.to_string())),
                Some((name, value)) if name.trim() == "role" => {
                    let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
                    if value.is_empty() {
                        Err(invalid())
                    } else {
                        Ok(Self::Role(value.to_string()))
                    }
                }
                _ => Err(invalid()),
            };
        }
        if is_ident(s) {
            return Ok(Self::Tag(s.to_ascii_lowercase()));
        }
        Err(invalid())
    }

    /// Whether `element` matches this selector.
    #[must_use]
    pub fn matches(&self, element: &ElementInfo) -> bool {
        match self {
            Self::Tag(tag) => element.tag == *tag,
            Self::Class(class) => element.classes.iter().any(|c| c == class),
            Self::Attribute(name) => element.attributes.iter().any(|a| a == name),
            Self::Role(role) => element.role.as_deref() == Some(role.as_str()),
        }
    }
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Elements a swipe must never compete with.
pub const INTERACTIVE_SELECTORS: &[&str] = &[
    "button",
    "a",
    "input",
    "select",
    "textarea",
    "[role=\"button\"]",
    "ion-button",
    "ion-tab-button",
    "ion-back-button",
    "ion-buttons",
    ".clickable",
    "[data-no-swipe]",
];

/// Matches touch targets against a set of interactive selectors.
///
/// Matching follows `Element.closest` semantics: a target is interactive if
/// it or any ancestor matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveFilter {
    selectors: Vec<Selector>,
}

impl InteractiveFilter {
    /// Build a filter from selector strings.
    pub fn from_selectors<S: AsRef<str>>(selectors: &[S]) -> Result<Self, SelectorError> {
        let selectors = selectors
            .iter()
            .map(|s| Selector::parse(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { selectors })
    }

    /// A filter that never matches.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            selectors: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_interactive(&self, target: &TouchTarget) -> bool {
        target
            .path
            .iter()
            .any(|el| self.selectors.iter().any(|sel| sel.matches(el)))
    }

    #[must_use]
    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }
}

impl Default for InteractiveFilter {
    fn default() -> Self {
        // The built-in list is known-good syntax.
        let selectors = INTERACTIVE_SELECTORS
            .iter()
            .filter_map(|s| Selector::parse(s).ok())
            .collect();
        Self { selectors }
    }
}

// ---------------------------------------------------------------------------
// TouchResponse
// ---------------------------------------------------------------------------

bitflags! {
    /// What the host should do with the event after a handler ran.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TouchResponse: u8 {
        /// Leave the event alone.
        const NONE             = 0b00;
        /// Call `preventDefault()` (suppresses native scrolling).
        const PREVENT_DEFAULT  = 0b01;
        /// Call `stopPropagation()` / `stopImmediatePropagation()`.
        const STOP_PROPAGATION = 0b10;
    }
}

impl Default for TouchResponse {
    fn default() -> Self {
        Self::NONE
    }
}

impl TouchResponse {
    #[inline]
    #[must_use]
    pub fn prevents_default(self) -> bool {
        self.contains(Self::PREVENT_DEFAULT)
    }
}

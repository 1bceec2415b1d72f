#![forbid(unsafe_code)]

//! Navigation collaborators and previous-page resolution.
//!
//! The engines decide *when* to navigate; the router decides *what*
//! navigating means. [`Navigator`] and [`TabNavigator`] are the seams, and
//! [`RouteHistory`] / [`RouteTable`] implement the policy for which page a
//! swipe-back would reveal.
//!
//! # Previous path policy
//!
//! 1. The session record of the last visited path, if it differs from the
//!    current path.
//! 2. Otherwise the history-state `back` hint, when the history holds more
//!    than one entry.
//! 3. A candidate equal to the current path counts as no previous page.
//!
//! Routes whose pattern contains a `:param` segment are never previewed:
//! rendering them without their parameters fails.

use std::fmt;

use swipenav_core::{GestureGeneration, SwipeDirection};

use crate::error::{GuardError, ResolveError};

// ---------------------------------------------------------------------------
// Tickets
// ---------------------------------------------------------------------------

/// Correlates an asynchronous page resolution with the gesture that asked
/// for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageTicket(GestureGeneration);

impl PageTicket {
    #[must_use]
    pub const fn new(generation: GestureGeneration) -> Self {
        Self(generation)
    }

    #[must_use]
    pub const fn generation(self) -> GestureGeneration {
        self.0
    }
}

/// Correlates a deferred leave-guard decision with its gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuardTicket(GestureGeneration);

impl GuardTicket {
    #[must_use]
    pub const fn new(generation: GestureGeneration) -> Self {
        Self(generation)
    }

    #[must_use]
    pub const fn generation(self) -> GestureGeneration {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Router operations used by the swipe-back engine.
pub trait Navigator {
    /// Renderable handle for a page (a component, a view factory, ...).
    type Page: Clone + fmt::Debug;

    /// Path a back navigation would reveal, per the previous path policy.
    fn resolve_previous_path(&self) -> Option<String>;

    /// Start loading the page for `path`. The answer is delivered to
    /// `SwipeBackEngine::previous_page_resolved` with the same ticket,
    /// possibly before this call returns.
    fn request_page(&mut self, path: &str, ticket: PageTicket);

    /// Perform the back navigation.
    fn navigate_back(&mut self);
}

/// Tab switching used by the tab-swipe engine.
pub trait TabNavigator {
    /// `Left` moves to the next tab, `Right` to the previous one.
    fn navigate_to_tab(&mut self, direction: SwipeDirection);
}

impl<F: FnMut(SwipeDirection)> TabNavigator for F {
    fn navigate_to_tab(&mut self, direction: SwipeDirection) {
        self(direction)
    }
}

/// Outcome of asking a [`LeaveGuard`] whether the page may be left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardDecision {
    Allow,
    Deny,
    /// The guard will answer later through `SwipeBackEngine::resolve_guard`
    /// with the same ticket (e.g. after a confirmation dialog).
    Deferred,
}

/// Veto hook consulted before a committed swipe-back navigates.
pub trait LeaveGuard {
    fn check(&mut self, ticket: GuardTicket) -> Result<GuardDecision, GuardError>;
}

impl<F: FnMut() -> bool> LeaveGuard for F {
    fn check(&mut self, _ticket: GuardTicket) -> Result<GuardDecision, GuardError> {
        Ok(if self() {
            GuardDecision::Allow
        } else {
            GuardDecision::Deny
        })
    }
}

// ---------------------------------------------------------------------------
// RouteHistory
// ---------------------------------------------------------------------------

/// Bookkeeping the router updates on every route change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteHistory {
    last_path: Option<String>,
    back_hint: Option<String>,
    history_len: usize,
}

impl RouteHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a route change; `from` becomes the last visited path.
    pub fn record_navigation(&mut self, from: &str, to: &str) {
        if from.is_empty() || from == to {
            return;
        }
        self.last_path = Some(from.to_string());
    }

    /// Mirror the browser history state (`history.state.back`,
    /// `history.length`).
    pub fn set_history_state(&mut self, back: Option<&str>, length: usize) {
        self.back_hint = back.map(str::to_string);
        self.history_len = length;
    }

    #[must_use]
    pub fn last_path(&self) -> Option<&str> {
        self.last_path.as_deref()
    }

    /// Path a back navigation from `current` would reveal.
    #[must_use]
    pub fn previous_path(&self, current: &str) -> Option<String> {
        let session = self.last_path.as_deref().filter(|p| *p != current);
        let candidate = session.or_else(|| {
            if self.history_len > 1 {
                self.back_hint.as_deref()
            } else {
                None
            }
        })?;
        (candidate != current).then(|| candidate.to_string())
    }
}

// ---------------------------------------------------------------------------
// RouteTable
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A route path pattern such as `/workouts` or `/training-program/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let segments = split_path(source)
            .map(|seg| match seg.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(seg.to_string()),
            })
            .collect();
        Self {
            source: source.to_string(),
            segments,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn is_parameterized(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Param(_)))
    }

    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let mut parts = split_path(path);
        for segment in &self.segments {
            let Some(part) = parts.next() else {
                return false;
            };
            if let Segment::Literal(lit) = segment
                && lit != part
            {
                return false;
            }
        }
        parts.next().is_none()
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty())
}

/// Maps route patterns to pages.
#[derive(Debug, Clone)]
pub struct RouteTable<P> {
    routes: Vec<(RoutePattern, P)>,
}

impl<P> Default for RouteTable<P> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<P> RouteTable<P> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route (builder pattern). Earlier routes win.
    #[must_use]
    pub fn route(mut self, pattern: &str, page: P) -> Self {
        self.add(pattern, page);
        self
    }

    pub fn add(&mut self, pattern: &str, page: P) {
        self.routes.push((RoutePattern::parse(pattern), page));
    }

    /// Page to preview for `path`.
    pub fn resolve(&self, path: &str) -> Result<&P, ResolveError> {
        let (pattern, page) = self
            .routes
            .iter()
            .find(|(pattern, _)| pattern.matches(path))
            .ok_or_else(|| ResolveError::NoMatch {
                path: path.to_string(),
            })?;
        if pattern.is_parameterized() {
            return Err(ResolveError::Parameterized {
                pattern: pattern.as_str().to_string(),
            });
        }
        Ok(page)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// A resolved previous page and the path it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviousPage<P> {
    pub path: String,
    pub page: P,
}

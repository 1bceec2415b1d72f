#![forbid(unsafe_code)]

//! Test doubles for the engine collaborators.
//!
//! Enabled for this crate's own tests and, through the `test-helpers`
//! feature, for downstream integration tests. Nothing here touches a real
//! router or DOM.

use swipenav_core::SwipeDirection;

use crate::error::{HostError, ResolveError};
use crate::host::{PageSlot, TransitionHost};
use crate::navigation::{Navigator, PageTicket, RouteHistory, RouteTable, TabNavigator};

// ---------------------------------------------------------------------------
// RecordingHost
// ---------------------------------------------------------------------------

/// One call made to a [`RecordingHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostCall {
    SuspendNativeTransitions,
    HideCurrentPage,
    ResetPageTransform(PageSlot),
    RemovePreviousPageArtifacts,
    ResetAllOverrides,
}

/// Host that records every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
    failing: Vec<HostCall>,
}

impl RecordingHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `call` fail with [`HostError::ElementMissing`]. The call is
    /// still recorded.
    #[must_use]
    pub fn failing(mut self, call: HostCall) -> Self {
        self.failing.push(call);
        self
    }

    #[must_use]
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    fn record(&mut self, call: HostCall, element: &'static str) -> Result<(), HostError> {
        self.calls.push(call);
        if self.failing.contains(&call) {
            Err(HostError::ElementMissing(element))
        } else {
            Ok(())
        }
    }
}

impl TransitionHost for RecordingHost {
    fn suspend_native_transitions(&mut self) -> Result<(), HostError> {
        self.record(HostCall::SuspendNativeTransitions, "ion-router-outlet")
    }

    fn hide_current_page(&mut self) -> Result<(), HostError> {
        self.record(HostCall::HideCurrentPage, ".swipe-back-page")
    }

    fn reset_page_transform(&mut self, slot: PageSlot) -> Result<(), HostError> {
        let element = match slot {
            PageSlot::SwipeBackPage => ".swipe-back-page",
            PageSlot::TabCurrentPage => ".swipe-page.current-page",
        };
        self.record(HostCall::ResetPageTransform(slot), element)
    }

    fn remove_previous_page_artifacts(&mut self) -> Result<(), HostError> {
        self.record(
            HostCall::RemovePreviousPageArtifacts,
            ".swipe-back-previous-page",
        )
    }

    fn reset_all_overrides(&mut self) -> Result<(), HostError> {
        self.record(HostCall::ResetAllOverrides, "ion-page")
    }
}

// ---------------------------------------------------------------------------
// ScriptedNavigator
// ---------------------------------------------------------------------------

/// Router stand-in: a route table, a history record, and a log of requests.
///
/// Page requests are not answered automatically. A test takes the request
/// with [`take_request`](Self::take_request), looks the page up with
/// [`page_for`](Self::page_for), and hands the result to the engine, which
/// lets it deliver answers late or out of order.
#[derive(Debug, Clone)]
pub struct ScriptedNavigator {
    current: String,
    history: RouteHistory,
    routes: RouteTable<&'static str>,
    load_failures: Vec<(String, String)>,
    requests: Vec<(PageTicket, String)>,
    unanswered: Option<(PageTicket, String)>,
    back_count: usize,
}

impl ScriptedNavigator {
    #[must_use]
    pub fn new(current: &str) -> Self {
        Self {
            current: current.to_string(),
            history: RouteHistory::new(),
            routes: RouteTable::new(),
            load_failures: Vec::new(),
            requests: Vec::new(),
            unanswered: None,
            back_count: 0,
        }
    }

    /// Pretend the user arrived at the current path from `path`.
    #[must_use]
    pub fn with_previous(mut self, path: &str) -> Self {
        self.history.record_navigation(path, &self.current);
        self
    }

    #[must_use]
    pub fn with_history_state(mut self, back: Option<&str>, length: usize) -> Self {
        self.history.set_history_state(back, length);
        self
    }

    #[must_use]
    pub fn with_page(mut self, pattern: &str, page: &'static str) -> Self {
        self.routes.add(pattern, page);
        self
    }

    /// Make loading `path` fail with `reason`.
    #[must_use]
    pub fn with_load_failure(mut self, path: &str, reason: &str) -> Self {
        self.load_failures
            .push((path.to_string(), reason.to_string()));
        self
    }

    /// Move to `path`, recording the route change.
    pub fn navigate_to(&mut self, path: &str) {
        self.history.record_navigation(&self.current, path);
        self.current = path.to_string();
    }

    /// Most recent request not yet taken.
    pub fn take_request(&mut self) -> Option<(PageTicket, String)> {
        self.unanswered.take()
    }

    /// What the router would answer for `path`.
    pub fn page_for(&self, path: &str) -> Result<Option<&'static str>, ResolveError> {
        if let Some((_, reason)) = self.load_failures.iter().find(|(p, _)| p == path) {
            return Err(ResolveError::Load {
                path: path.to_string(),
                reason: reason.clone(),
            });
        }
        self.routes.resolve(path).map(|page| Some(*page))
    }

    /// Every page request made so far.
    #[must_use]
    pub fn requests(&self) -> &[(PageTicket, String)] {
        &self.requests
    }

    #[must_use]
    pub fn back_count(&self) -> usize {
        self.back_count
    }

    /// Path the router is currently showing.
    #[must_use]
    pub fn current_path(&self) -> &str {
        &self.current
    }

    #[must_use]
    pub fn history(&self) -> &RouteHistory {
        &self.history
    }
}

impl Navigator for ScriptedNavigator {
    type Page = &'static str;

    fn resolve_previous_path(&self) -> Option<String> {
        self.history.previous_path(&self.current)
    }

    fn request_page(&mut self, path: &str, ticket: PageTicket) {
        self.requests.push((ticket, path.to_string()));
        self.unanswered = Some((ticket, path.to_string()));
    }

    fn navigate_back(&mut self) {
        self.back_count += 1;
        if let Some(previous) = self.resolve_previous_path() {
            self.navigate_to(&previous);
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingTabNavigator
// ---------------------------------------------------------------------------

/// Tab navigator that records requested directions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingTabNavigator {
    calls: Vec<SwipeDirection>,
}

impl RecordingTabNavigator {
    #[must_use]
    pub fn calls(&self) -> &[SwipeDirection] {
        &self.calls
    }
}

impl TabNavigator for RecordingTabNavigator {
    fn navigate_to_tab(&mut self, direction: SwipeDirection) {
        self.calls.push(direction);
    }
}

#![forbid(unsafe_code)]

//! Edge-swipe-back engine.
//!
//! A horizontal drag that starts near the left edge of the window pulls the
//! current page to the right, revealing the previous page underneath.
//! Releasing past the threshold slides the page off and navigates back;
//! anything less slides it back into place.
//!
//! # Lifecycle
//!
//! ```text
//! touch start (edge zone)      -> Classifying   (previous page requested)
//! move, horizontal, rightward  -> HorizontalActive
//! move, vertical               -> VerticalRejected
//! end, dx >= threshold         -> leave guard -> Completing(Commit)
//!   +animation_duration          NavigateBack: hide page, navigate_back()
//!   transition_complete          +settle_delay -> Settle -> Idle
//! end, dx < threshold / cancel -> Completing(Cancel)
//!   +animation_duration          Settle -> Idle
//! ```
//!
//! # Invariants
//!
//! 1. A touch start on a non-interactive target supersedes the previous
//!    gesture: its deferred work is dropped and its overrides are released.
//!    A committed navigation that has not run yet runs first.
//! 2. Every deferred task runs only if the gesture that scheduled it is
//!    still live.
//! 3. Overrides are released on every terminal path (commit settle, cancel
//!    settle, supersession).
//! 4. A page resolution or guard answer carrying a stale ticket is ignored.
//!
//! # Failure Modes
//!
//! - Previous-page resolution errors are logged at `warn` (parameterized
//!   routes at `debug`) and the gesture proceeds without a preview.
//! - A guard error vetoes the navigation.
//! - Host override failures are logged at `debug` and skipped.

use std::fmt;

use swipenav_core::config::SwipeBackConfig;
use swipenav_core::event::{InteractiveFilter, SelectorError, TouchEvent, TouchKind, TouchResponse};
use swipenav_core::geometry::{
    AxisClass, Point, Viewport, is_in_edge_zone, is_in_vertical_dead_zone,
};
use swipenav_core::gesture::{GestureGeneration, GesturePhase, GestureState};
use swipenav_core::transition::{BackOutcome, BackSnapshot, back_translate_x, reveal_opacity};
use web_time::Instant;

use crate::deferred::DeferredQueue;
use crate::error::{GuardError, ResolveError};
use crate::host::{NullHost, OverrideLedger, TransitionHost};
use crate::navigation::{
    GuardDecision, GuardTicket, LeaveGuard, Navigator, PageTicket, PreviousPage,
};

const TARGET: &str = "swipenav.back";

/// Work the engine defers until an animation has played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackTask {
    /// Commit animation finished: hide the page and navigate.
    NavigateBack,
    /// Clear all gesture state and release overrides.
    Settle,
}

/// Edge-swipe-back state machine for one view.
pub struct SwipeBackEngine<N: Navigator, H: TransitionHost = NullHost> {
    config: SwipeBackConfig,
    filter: InteractiveFilter,
    viewport: Viewport,
    gesture: GestureState,
    started_from_edge: bool,
    outcome: Option<BackOutcome>,
    /// Committed, `NavigateBack` not yet run.
    navigation_pending: bool,
    /// Finger lifted past the threshold; waiting on a deferred guard.
    pending_guard: Option<GuardTicket>,
    pending_page: Option<(PageTicket, String)>,
    previous_page: Option<PreviousPage<N::Page>>,
    should_render_previous_page: bool,
    previous_page_opacity: f64,
    /// One-shot transition-complete listener, armed by `NavigateBack`.
    awaiting_transition: Option<GestureGeneration>,
    overrides: OverrideLedger,
    tasks: DeferredQueue<BackTask>,
    guard: Option<Box<dyn LeaveGuard>>,
    navigator: N,
    host: H,
}

impl<N: Navigator> SwipeBackEngine<N, NullHost> {
    /// Engine without DOM overrides.
    pub fn new(config: SwipeBackConfig, navigator: N) -> Result<Self, SelectorError> {
        Self::with_host(config, navigator, NullHost)
    }
}

impl<N: Navigator, H: TransitionHost> SwipeBackEngine<N, H> {
    /// Engine that applies overrides through `host`.
    pub fn with_host(
        config: SwipeBackConfig,
        navigator: N,
        host: H,
    ) -> Result<Self, SelectorError> {
        let filter = config.interactive_filter()?;
        Ok(Self {
            config,
            filter,
            viewport: Viewport::UNAVAILABLE,
            gesture: GestureState::new(),
            started_from_edge: false,
            outcome: None,
            navigation_pending: false,
            pending_guard: None,
            pending_page: None,
            previous_page: None,
            should_render_previous_page: false,
            previous_page_opacity: 0.0,
            awaiting_transition: None,
            overrides: OverrideLedger::default(),
            tasks: DeferredQueue::new(),
            guard: None,
            navigator,
            host,
        })
    }

    /// Install a leave guard (builder pattern).
    #[must_use]
    pub fn with_guard(mut self, guard: impl LeaveGuard + 'static) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    /// Set the viewport (builder pattern).
    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn set_guard(&mut self, guard: Option<Box<dyn LeaveGuard>>) {
        self.guard = guard;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    // -----------------------------------------------------------------------
    // Touch input
    // -----------------------------------------------------------------------

    /// Dispatch a touch event.
    pub fn handle_touch(&mut self, event: &TouchEvent, now: Instant) -> TouchResponse {
        match event.kind {
            TouchKind::Start => self.touch_start(event),
            TouchKind::Move => self.touch_move(event),
            TouchKind::End => self.touch_end(event, now),
            TouchKind::Cancel => self.touch_cancel(now),
        }
    }

    pub fn touch_start(&mut self, event: &TouchEvent) -> TouchResponse {
        if !self.config.enabled {
            return TouchResponse::NONE;
        }
        let Some(point) = event.primary() else {
            return TouchResponse::NONE;
        };
        if self.filter.is_interactive(&event.target) {
            tracing::trace!(target: TARGET, "touch on interactive element ignored");
            return TouchResponse::NONE;
        }

        let in_zone = self.viewport.is_available()
            && is_in_edge_zone(point.x, self.viewport.width, self.config.edge_threshold)
            && is_in_vertical_dead_zone(
                point.y,
                self.viewport.height,
                self.config.top_dead_zone,
                self.config.bottom_dead_zone,
            );

        let was = self.gesture.phase();
        let flushed = self.navigation_pending;
        if flushed {
            self.navigate_back();
        }
        let generation = if in_zone {
            self.gesture.begin(point)
        } else {
            self.gesture.supersede()
        };
        let dropped = self.tasks.retain_generation(generation);
        self.clear_gesture();

        if was != GesturePhase::Idle || dropped > 0 {
            tracing::debug!(
                target: TARGET,
                superseded = was.as_str(),
                dropped_tasks = dropped,
                flushed_navigation = flushed,
                generation = generation.get(),
                "gesture superseded"
            );
        }

        if !in_zone {
            return TouchResponse::NONE;
        }

        self.started_from_edge = true;
        tracing::debug!(
            target: TARGET,
            x = point.x,
            y = point.y,
            generation = generation.get(),
            "edge swipe started"
        );
        if let Some(path) = self.navigator.resolve_previous_path() {
            let ticket = PageTicket::new(generation);
            self.pending_page = Some((ticket, path.clone()));
            self.navigator.request_page(&path, ticket);
        }
        TouchResponse::NONE
    }

    pub fn touch_move(&mut self, event: &TouchEvent) -> TouchResponse {
        if !self.config.enabled || !self.started_from_edge || self.pending_guard.is_some() {
            return TouchResponse::NONE;
        }
        let Some(point) = event.primary() else {
            return TouchResponse::NONE;
        };
        let start = self.gesture.touch_start();

        if self.gesture.phase() == GesturePhase::Classifying {
            match self.gesture.observe_axis(point, self.config.axis_threshold) {
                AxisClass::Horizontal if point.x > start.x => self.activate(),
                AxisClass::Vertical => {
                    self.gesture.advance(GesturePhase::VerticalRejected);
                    self.started_from_edge = false;
                    self.should_render_previous_page = false;
                    tracing::debug!(target: TARGET, "vertical swipe, gesture rejected");
                    return TouchResponse::NONE;
                }
                _ => {}
            }
        }

        if self.gesture.phase() != GesturePhase::HorizontalActive || point.x <= start.x {
            return TouchResponse::NONE;
        }

        self.gesture.set_current(point);
        let dx = point.x - start.x;
        self.previous_page_opacity = reveal_opacity(dx, self.viewport.width);

        if self.config.prevent_vertical_scroll
            && event.cancelable
            && dx.abs() > self.config.axis_threshold
        {
            TouchResponse::PREVENT_DEFAULT
        } else {
            TouchResponse::NONE
        }
    }

    pub fn touch_end(&mut self, event: &TouchEvent, now: Instant) -> TouchResponse {
        if !self.config.enabled {
            return TouchResponse::NONE;
        }
        match self.gesture.phase() {
            GesturePhase::HorizontalActive if self.pending_guard.is_none() => {}
            GesturePhase::HorizontalActive | GesturePhase::Completing => {
                return TouchResponse::NONE;
            }
            _ => {
                self.reset_untracked();
                return TouchResponse::NONE;
            }
        }

        let mut response = TouchResponse::STOP_PROPAGATION;
        if event.cancelable {
            response |= TouchResponse::PREVENT_DEFAULT;
        }

        let dx = self.gesture.delta_x();
        if dx < self.config.swipe_threshold {
            self.cancel(now);
            return response;
        }

        let ticket = GuardTicket::new(self.gesture.generation());
        let decision = match self.guard.as_mut() {
            None => Ok(GuardDecision::Allow),
            Some(guard) => guard.check(ticket),
        };
        match decision {
            Ok(GuardDecision::Allow) => self.commit(now),
            Ok(GuardDecision::Deny) => {
                tracing::debug!(target: TARGET, "leave guard denied navigation");
                self.cancel(now);
            }
            Ok(GuardDecision::Deferred) => {
                tracing::debug!(target: TARGET, "waiting on leave guard");
                self.pending_guard = Some(ticket);
            }
            Err(err) => {
                tracing::debug!(target: TARGET, error = %err, "leave guard failed, cancelling");
                self.cancel(now);
            }
        }
        response
    }

    /// The platform aborted the touch sequence.
    pub fn touch_cancel(&mut self, now: Instant) -> TouchResponse {
        match self.gesture.phase() {
            GesturePhase::HorizontalActive if self.pending_guard.is_none() => self.cancel(now),
            GesturePhase::HorizontalActive | GesturePhase::Completing => {}
            _ => self.reset_untracked(),
        }
        TouchResponse::NONE
    }

    // -----------------------------------------------------------------------
    // Asynchronous answers
    // -----------------------------------------------------------------------

    /// Deliver the result of [`Navigator::request_page`].
    ///
    /// Returns `false` if the ticket is stale.
    pub fn previous_page_resolved(
        &mut self,
        ticket: PageTicket,
        result: Result<Option<N::Page>, ResolveError>,
    ) -> bool {
        let path = match self.pending_page.take() {
            Some((pending, path)) if pending == ticket => path,
            other => {
                self.pending_page = other;
                tracing::trace!(
                    target: TARGET,
                    ticket = ticket.generation().get(),
                    "stale page resolution ignored"
                );
                return false;
            }
        };

        match result {
            Ok(Some(page)) => {
                tracing::debug!(target: TARGET, path = %path, "previous page resolved");
                self.previous_page = Some(PreviousPage { path, page });
                if self.gesture.phase() == GesturePhase::HorizontalActive {
                    self.show_preview();
                }
            }
            Ok(None) => {
                tracing::debug!(target: TARGET, path = %path, "no previous page to preview");
            }
            Err(err @ ResolveError::Parameterized { .. }) => {
                tracing::debug!(target: TARGET, path = %path, error = %err, "preview skipped");
            }
            Err(err) => {
                tracing::warn!(
                    target: TARGET,
                    path = %path,
                    error = %err,
                    "previous page resolution failed"
                );
            }
        }
        true
    }

    /// Deliver a deferred leave-guard decision. An error vetoes.
    ///
    /// Returns `false` if the ticket is stale.
    pub fn resolve_guard(
        &mut self,
        ticket: GuardTicket,
        allowed: Result<bool, GuardError>,
        now: Instant,
    ) -> bool {
        if self.pending_guard != Some(ticket) || ticket.generation() != self.gesture.generation() {
            tracing::trace!(target: TARGET, "stale guard answer ignored");
            return false;
        }
        self.pending_guard = None;
        match allowed {
            Ok(true) => self.commit(now),
            Ok(false) => self.cancel(now),
            Err(err) => {
                tracing::debug!(target: TARGET, error = %err, "leave guard failed, cancelling");
                self.cancel(now);
            }
        }
        true
    }

    /// The router finished the transition started by `navigate_back`.
    ///
    /// Disarms the one-shot listener. Returns `false` if it was not armed.
    pub fn transition_complete(&mut self, now: Instant) -> bool {
        let Some(generation) = self.awaiting_transition.take() else {
            return false;
        };
        if generation == self.gesture.generation() {
            self.tasks
                .schedule(now, self.config.settle_delay, generation, BackTask::Settle);
        } else {
            tracing::debug!(
                target: TARGET,
                generation = generation.get(),
                "transition completed for superseded gesture"
            );
        }
        true
    }

    /// Run deferred tasks that are due. Returns how many ran.
    pub fn tick(&mut self, now: Instant) -> usize {
        let due = self.tasks.drain_due(now, self.gesture.generation());
        let ran = due.len();
        for task in due {
            match task {
                BackTask::NavigateBack => self.navigate_back(),
                BackTask::Settle => self.settle(),
            }
        }
        ran
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    fn activate(&mut self) {
        self.gesture.advance(GesturePhase::HorizontalActive);
        self.overrides.mark_page_moved();
        if self.previous_page.is_some() {
            self.show_preview();
        }
        tracing::debug!(target: TARGET, "horizontal swipe active");
    }

    fn show_preview(&mut self) {
        self.should_render_previous_page = true;
        self.overrides.mark_preview_mounted();
    }

    fn commit(&mut self, now: Instant) {
        self.gesture.advance(GesturePhase::Completing);
        self.outcome = Some(BackOutcome::Commit);
        self.previous_page_opacity = 1.0;
        self.navigation_pending = true;
        self.overrides.suspend_native_transitions(&mut self.host);
        self.tasks.schedule(
            now,
            self.config.animation_duration,
            self.gesture.generation(),
            BackTask::NavigateBack,
        );
        tracing::debug!(
            target: TARGET,
            delta_x = self.gesture.delta_x(),
            generation = self.gesture.generation().get(),
            "swipe back committed"
        );
    }

    fn cancel(&mut self, now: Instant) {
        self.gesture.advance(GesturePhase::Completing);
        self.outcome = Some(BackOutcome::Cancel);
        self.started_from_edge = false;
        self.should_render_previous_page = false;
        self.previous_page_opacity = 0.0;
        self.tasks.schedule(
            now,
            self.config.animation_duration,
            self.gesture.generation(),
            BackTask::Settle,
        );
        tracing::debug!(
            target: TARGET,
            delta_x = self.gesture.delta_x(),
            "swipe back cancelled"
        );
    }

    fn navigate_back(&mut self) {
        self.navigation_pending = false;
        self.overrides.hide_current_page(&mut self.host);
        self.navigator.navigate_back();
        self.awaiting_transition = Some(self.gesture.generation());
        tracing::debug!(target: TARGET, "navigated back");
    }

    fn settle(&mut self) {
        self.gesture.reset();
        self.clear_gesture();
        tracing::debug!(target: TARGET, "swipe back settled");
    }

    /// Release without an animation (gesture never went horizontal).
    fn reset_untracked(&mut self) {
        self.gesture.reset();
        self.clear_gesture();
    }

    /// Drop every per-gesture field and release overrides.
    fn clear_gesture(&mut self) {
        self.started_from_edge = false;
        self.outcome = None;
        self.navigation_pending = false;
        self.pending_guard = None;
        self.pending_page = None;
        self.previous_page = None;
        self.should_render_previous_page = false;
        self.previous_page_opacity = 0.0;
        self.overrides.release(&mut self.host);
    }

    // -----------------------------------------------------------------------
    // Derived state
    // -----------------------------------------------------------------------

    /// Current page offset, in `[0, viewport width]`.
    #[must_use]
    pub fn translate_x(&self) -> f64 {
        back_translate_x(&BackSnapshot {
            phase: self.gesture.phase(),
            outcome: self.outcome,
            delta_x: self.gesture.delta_x(),
            viewport_width: self.viewport.width,
        })
    }

    /// The previous page stays in place and only fades in.
    #[must_use]
    pub fn previous_page_translate_x(&self) -> f64 {
        0.0
    }

    #[must_use]
    pub fn previous_page_opacity(&self) -> f64 {
        self.previous_page_opacity
    }

    #[must_use]
    pub fn is_swiping(&self) -> bool {
        self.gesture.phase() == GesturePhase::HorizontalActive
    }

    #[must_use]
    pub fn is_completing(&self) -> bool {
        self.gesture.phase() == GesturePhase::Completing
    }

    #[must_use]
    pub fn should_render_previous_page(&self) -> bool {
        self.should_render_previous_page
    }

    #[must_use]
    pub fn previous_page(&self) -> Option<&PreviousPage<N::Page>> {
        self.previous_page.as_ref()
    }

    #[must_use]
    pub fn started_from_edge(&self) -> bool {
        self.started_from_edge
    }

    #[must_use]
    pub fn outcome(&self) -> Option<BackOutcome> {
        self.outcome
    }

    /// Ticket of a guard decision the engine is waiting on.
    #[must_use]
    pub fn pending_guard(&self) -> Option<GuardTicket> {
        self.pending_guard
    }

    /// Ticket of the page resolution the engine is waiting on.
    #[must_use]
    pub fn pending_page(&self) -> Option<PageTicket> {
        self.pending_page.as_ref().map(|(ticket, _)| *ticket)
    }

    #[must_use]
    pub fn is_awaiting_transition(&self) -> bool {
        self.awaiting_transition.is_some()
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.gesture.phase()
    }

    #[inline]
    #[must_use]
    pub fn generation(&self) -> GestureGeneration {
        self.gesture.generation()
    }

    #[must_use]
    pub fn touch_start_point(&self) -> Point {
        self.gesture.touch_start()
    }

    /// When the host should next call [`tick`](Self::tick).
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.next_deadline()
    }

    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn config(&self) -> &SwipeBackConfig {
        &self.config
    }

    #[must_use]
    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<N, H> fmt::Debug for SwipeBackEngine<N, H>
where
    N: Navigator + fmt::Debug,
    H: TransitionHost + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwipeBackEngine")
            .field("phase", &self.gesture.phase())
            .field("generation", &self.gesture.generation())
            .field("outcome", &self.outcome)
            .field("started_from_edge", &self.started_from_edge)
            .field("previous_page", &self.previous_page)
            .field("pending_tasks", &self.tasks.len())
            .field("guard", &self.guard.is_some())
            .field("navigator", &self.navigator)
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

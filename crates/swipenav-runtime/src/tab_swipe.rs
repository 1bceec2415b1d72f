#![forbid(unsafe_code)]

//! Tab-swipe engine.
//!
//! Any horizontal drag over the tab content moves the current tab with the
//! finger while its neighbour slides in from the opposite side. Releasing
//! past the threshold commits the switch; otherwise both pages return.
//!
//! The tab the gesture started on is captured in a [`TabSnapshot`] at touch
//! start. The router may update the current tab mid-animation; everything
//! the animation draws keeps reading from the snapshot, so the indicator and
//! the incoming page never jump twice.
//!
//! # Invariants
//!
//! 1. A touch start resets all transient fields, including a running
//!    completion, and drops its deferred reset.
//! 2. `completing_next_tab` / `completing_target_tab_index` are set only
//!    while completing with a direction, and only to a valid neighbour of
//!    the start tab.
//! 3. `navigate_to_tab` is called at most once per gesture.

use std::fmt;

use swipenav_core::config::TabSwipeConfig;
use swipenav_core::event::{InteractiveFilter, TouchEvent, TouchKind, TouchResponse};
use swipenav_core::geometry::{AxisClass, SwipeDirection, Viewport, can_advance};
use swipenav_core::gesture::{GestureGeneration, GesturePhase, GestureState};
use swipenav_core::indicator::{IndicatorSnapshot, IndicatorStyle, indicator_style};
use swipenav_core::transition::{
    TabMotion, next_page_translate_x, swipe_progress, tab_translate_x,
};
use web_time::Instant;

use crate::deferred::DeferredQueue;
use crate::host::{NullHost, PageSlot, TransitionHost, log_host};
use crate::navigation::TabNavigator;

const TARGET: &str = "swipenav.tab";

/// State frozen for the duration of one tab gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSnapshot<T> {
    /// Current tab when the gesture started.
    pub swipe_start_tab_index: Option<usize>,
    /// Committed direction; `None` while returning to rest.
    pub final_direction: Option<SwipeDirection>,
    pub completing_next_tab: Option<T>,
    pub completing_target_tab_index: Option<usize>,
}

impl<T> Default for TabSnapshot<T> {
    fn default() -> Self {
        Self {
            swipe_start_tab_index: None,
            final_direction: None,
            completing_next_tab: None,
            completing_target_tab_index: None,
        }
    }
}

/// Tab-swipe state machine for one tab container.
pub struct TabSwipeEngine<T, N, H = NullHost>
where
    T: Clone + PartialEq + fmt::Debug,
    N: TabNavigator,
    H: TransitionHost,
{
    config: TabSwipeConfig,
    filter: InteractiveFilter,
    viewport: Viewport,
    tabs: Vec<T>,
    current: Option<usize>,
    gesture: GestureState,
    snapshot: TabSnapshot<T>,
    tasks: DeferredQueue<()>,
    navigator: N,
    host: H,
}

impl<T, N> TabSwipeEngine<T, N, NullHost>
where
    T: Clone + PartialEq + fmt::Debug,
    N: TabNavigator,
{
    #[must_use]
    pub fn new(config: TabSwipeConfig, tabs: Vec<T>, navigator: N) -> Self {
        Self::with_host(config, tabs, navigator, NullHost)
    }
}

impl<T, N, H> TabSwipeEngine<T, N, H>
where
    T: Clone + PartialEq + fmt::Debug,
    N: TabNavigator,
    H: TransitionHost,
{
    #[must_use]
    pub fn with_host(config: TabSwipeConfig, tabs: Vec<T>, navigator: N, host: H) -> Self {
        let current = if tabs.is_empty() { None } else { Some(0) };
        Self {
            config,
            filter: InteractiveFilter::default(),
            viewport: Viewport::UNAVAILABLE,
            tabs,
            current,
            gesture: GestureState::new(),
            snapshot: TabSnapshot::default(),
            tasks: DeferredQueue::new(),
            navigator,
            host,
        }
    }

    /// Set the viewport (builder pattern).
    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Replace the selectors used when `ignore_interactive` is on.
    #[must_use]
    pub fn with_interactive_filter(mut self, filter: InteractiveFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Follow the router's current tab. Returns `false` (and forgets the
    /// current tab) if `tab` is not in the tab list.
    pub fn set_current_tab(&mut self, tab: &T) -> bool {
        self.current = self.tabs.iter().position(|t| t == tab);
        if self.current.is_none() {
            tracing::debug!(target: TARGET, tab = ?tab, "current tab not in tab list");
        }
        self.current.is_some()
    }

    // -----------------------------------------------------------------------
    // Touch input
    // -----------------------------------------------------------------------

    /// Dispatch a touch event.
    pub fn handle_touch(&mut self, event: &TouchEvent, now: Instant) -> TouchResponse {
        match event.kind {
            TouchKind::Start => self.touch_start(event),
            TouchKind::Move => self.touch_move(event),
            TouchKind::End | TouchKind::Cancel => self.touch_end(now),
        }
    }

    pub fn touch_start(&mut self, event: &TouchEvent) -> TouchResponse {
        if !self.config.enabled {
            return TouchResponse::NONE;
        }
        let Some(point) = event.primary() else {
            return TouchResponse::NONE;
        };
        if self.config.ignore_interactive && self.filter.is_interactive(&event.target) {
            return TouchResponse::NONE;
        }
        let was = self.gesture.phase();
        let generation = self.gesture.begin(point);
        let dropped = self.tasks.retain_generation(generation);
        self.snapshot = TabSnapshot {
            swipe_start_tab_index: self.current,
            ..TabSnapshot::default()
        };
        if was == GesturePhase::Completing || dropped > 0 {
            tracing::debug!(
                target: TARGET,
                superseded = was.as_str(),
                generation = generation.get(),
                "tab completion interrupted"
            );
        }
        TouchResponse::NONE
    }

    pub fn touch_move(&mut self, event: &TouchEvent) -> TouchResponse {
        if !self.config.enabled {
            return TouchResponse::NONE;
        }
        let Some(point) = event.primary() else {
            return TouchResponse::NONE;
        };
        let start = self.gesture.touch_start();

        if self.gesture.phase() == GesturePhase::Classifying {
            match self.gesture.observe_axis(point, self.config.axis_threshold) {
                AxisClass::Horizontal => {
                    self.gesture.advance(GesturePhase::HorizontalActive);
                    self.gesture
                        .set_direction(SwipeDirection::from_delta(point.x - start.x));
                    tracing::debug!(
                        target: TARGET,
                        direction = ?self.gesture.direction(),
                        "tab swipe active"
                    );
                }
                AxisClass::Vertical => {
                    self.gesture.advance(GesturePhase::VerticalRejected);
                    return TouchResponse::NONE;
                }
                AxisClass::Undetermined => {}
            }
        }

        if self.gesture.phase() != GesturePhase::HorizontalActive {
            return TouchResponse::NONE;
        }
        self.gesture.set_current(point);

        if self.config.prevent_vertical_scroll
            && event.cancelable
            && (point.x - start.x).abs() > self.config.axis_threshold
        {
            TouchResponse::PREVENT_DEFAULT
        } else {
            TouchResponse::NONE
        }
    }

    /// Finger lifted or the sequence was cancelled.
    pub fn touch_end(&mut self, now: Instant) -> TouchResponse {
        if !self.config.enabled {
            return TouchResponse::NONE;
        }
        match self.gesture.phase() {
            GesturePhase::HorizontalActive => {}
            GesturePhase::Completing => return TouchResponse::NONE,
            _ => {
                self.gesture.reset();
                self.snapshot = TabSnapshot::default();
                return TouchResponse::NONE;
            }
        }

        let dx = self.gesture.delta_x();
        let base = self.base_index();
        let commit = self.gesture.direction().filter(|&direction| {
            dx.abs() >= self.config.swipe_threshold
                && base.is_some_and(|b| can_advance(direction, b, self.tabs.len()))
        });

        self.gesture.advance(GesturePhase::Completing);
        match commit {
            Some(direction) => {
                let target = base.and_then(|b| direction.step(b, self.tabs.len()));
                self.snapshot.completing_target_tab_index = target;
                self.snapshot.completing_next_tab = target.and_then(|i| self.tabs.get(i).cloned());
                self.snapshot.final_direction = Some(direction);
                tracing::debug!(
                    target: TARGET,
                    direction = direction.as_str(),
                    to = ?target,
                    "tab swipe committed"
                );
                self.navigator.navigate_to_tab(direction);
            }
            None => {
                self.snapshot.final_direction = None;
                self.snapshot.completing_next_tab = None;
                tracing::debug!(target: TARGET, delta_x = dx, "tab swipe returning to rest");
            }
        }
        self.tasks.schedule(
            now,
            self.config.animation_duration,
            self.gesture.generation(),
            (),
        );
        TouchResponse::NONE
    }

    /// Run the post-animation reset if it is due. Returns how many tasks ran.
    pub fn tick(&mut self, now: Instant) -> usize {
        let due = self.tasks.drain_due(now, self.gesture.generation());
        let ran = due.len();
        if ran > 0 {
            self.settle();
        }
        ran
    }

    fn settle(&mut self) {
        self.snapshot = TabSnapshot::default();
        self.gesture.reset();
        log_host(
            "reset_page_transform",
            self.host.reset_page_transform(PageSlot::TabCurrentPage),
        );
        tracing::debug!(target: TARGET, "tab swipe settled");
    }

    fn base_index(&self) -> Option<usize> {
        self.snapshot.swipe_start_tab_index.or(self.current)
    }

    // -----------------------------------------------------------------------
    // Derived state
    // -----------------------------------------------------------------------

    fn motion(&self) -> TabMotion {
        let has_next = match (self.gesture.direction(), self.base_index()) {
            (Some(d), Some(b)) => d.step(b, self.tabs.len()).is_some(),
            _ => false,
        };
        TabMotion {
            phase: self.gesture.phase(),
            direction: self.gesture.direction(),
            final_direction: self.snapshot.final_direction,
            has_next,
            delta_x: self.gesture.delta_x(),
            viewport_width: self.viewport.width,
        }
    }

    /// Offset of the current tab's content, in `[-width, width]`.
    #[must_use]
    pub fn translate_x(&self) -> f64 {
        tab_translate_x(&self.motion())
    }

    #[must_use]
    pub fn next_page_translate_x(&self) -> f64 {
        next_page_translate_x(&self.motion())
    }

    #[must_use]
    pub fn swipe_progress(&self) -> f64 {
        swipe_progress(&self.motion())
    }

    /// Tab sliding in: the frozen target while completing, otherwise the
    /// neighbour of the start tab in the live direction.
    #[must_use]
    pub fn next_tab(&self) -> Option<&T> {
        match self.gesture.phase() {
            GesturePhase::Completing => {
                if let Some(index) = self.snapshot.completing_target_tab_index {
                    return self.tabs.get(index);
                }
            }
            GesturePhase::HorizontalActive => {}
            _ => return None,
        }
        let direction = self.gesture.direction().or(self.snapshot.final_direction)?;
        let next = direction.step(self.base_index()?, self.tabs.len())?;
        self.tabs.get(next)
    }

    /// Position of the active-tab indicator.
    #[must_use]
    pub fn indicator_style(&self) -> IndicatorStyle {
        indicator_style(&self.indicator_snapshot())
    }

    #[must_use]
    pub fn indicator_snapshot(&self) -> IndicatorSnapshot {
        IndicatorSnapshot {
            viewport_width: self.viewport.width,
            tab_count: self.tabs.len(),
            metrics: self.config.tab_bar,
            phase: self.gesture.phase(),
            current_index: self.current,
            swipe_start_index: self.snapshot.swipe_start_tab_index,
            completing_target_index: self.snapshot.completing_target_tab_index,
            direction: self.gesture.direction().or(self.snapshot.final_direction),
            progress: self.swipe_progress(),
        }
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
    pub fn snapshot(&self) -> &TabSnapshot<T> {
        &self.snapshot
    }

    #[must_use]
    pub fn current_tab(&self) -> Option<&T> {
        self.current.and_then(|i| self.tabs.get(i))
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    #[must_use]
    pub fn tabs(&self) -> &[T] {
        &self.tabs
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
    pub fn direction(&self) -> Option<SwipeDirection> {
        self.gesture.direction()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.next_deadline()
    }

    #[must_use]
    pub fn config(&self) -> &TabSwipeConfig {
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

impl<T, N, H> fmt::Debug for TabSwipeEngine<T, N, H>
where
    T: Clone + PartialEq + fmt::Debug,
    N: TabNavigator,
    H: TransitionHost,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabSwipeEngine")
            .field("tabs", &self.tabs)
            .field("current", &self.current)
            .field("phase", &self.gesture.phase())
            .field("direction", &self.gesture.direction())
            .field("snapshot", &self.snapshot)
            .field("pending_tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

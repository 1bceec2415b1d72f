#![forbid(unsafe_code)]

//! End-to-end gesture scenarios through the public facade.
//!
//! Each test drives an engine with a realistic touch sequence and a
//! simulated clock, then checks what the user would see (`translate_x`,
//! indicator) and what the router was asked to do.
//!
//! Run:
//!   cargo test -p swipenav --test e2e_gesture_scenarios

use swipenav::prelude::*;
use swipenav::core::indicator::TabBarLayout;
use swipenav::{BackOutcome, PageSlot, TabBarMetrics};
use swipenav_runtime::testing::{HostCall, RecordingHost, RecordingTabNavigator, ScriptedNavigator};
use web_time::{Duration, Instant};

// ============================================================================
// Helpers
// ============================================================================

fn at(t0: Instant, ms: u64) -> Instant {
    t0 + Duration::from_millis(ms)
}

fn back_engine() -> SwipeBackEngine<ScriptedNavigator, RecordingHost> {
    let nav = ScriptedNavigator::new("/workouts/new")
        .with_previous("/workouts")
        .with_page("/workouts", "WorkoutsPage")
        .with_page("/workouts/new", "NewWorkoutPage");
    SwipeBackEngine::with_host(SwipeBackConfig::default(), nav, RecordingHost::default())
        .unwrap()
        .with_viewport(Viewport::new(400.0, 800.0))
}

fn tab_engine(
    tabs: &[&'static str],
    current: &'static str,
) -> TabSwipeEngine<&'static str, RecordingTabNavigator, RecordingHost> {
    let mut engine = TabSwipeEngine::with_host(
        TabSwipeConfig::default(),
        tabs.to_vec(),
        RecordingTabNavigator::default(),
        RecordingHost::default(),
    )
    .with_viewport(Viewport::new(400.0, 800.0));
    assert!(engine.set_current_tab(&current));
    engine
}

/// Run the engine's deferred work up to `until`, one frame every 16ms.
fn run_frames<N, H>(engine: &mut SwipeBackEngine<N, H>, from: Instant, until: Instant)
where
    N: Navigator,
    H: TransitionHost,
{
    let mut now = from;
    while now <= until {
        engine.tick(now);
        now += Duration::from_millis(16);
    }
}

// ============================================================================
// Swipe back
// ============================================================================

#[test]
fn scenario_1_edge_swipe_past_threshold_navigates_back() {
    let t0 = Instant::now();
    let mut e = back_engine();

    e.handle_touch(&TouchEvent::start(50.0, 400.0), t0);
    assert_eq!(e.phase(), GesturePhase::Classifying);
    let (ticket, path) = e.navigator_mut().take_request().unwrap();
    assert_eq!(path, "/workouts");
    let page = e.navigator().page_for(&path);
    assert!(e.previous_page_resolved(ticket, page));

    let r = e.handle_touch(&TouchEvent::moved(90.0, 402.0), at(t0, 16));
    assert!(r.prevents_default());
    assert_eq!(e.phase(), GesturePhase::HorizontalActive);
    assert_eq!(e.translate_x(), 40.0);
    assert!(e.should_render_previous_page());
    assert_eq!(e.previous_page_translate_x(), 0.0);

    e.handle_touch(&TouchEvent::moved(200.0, 405.0), at(t0, 32));
    e.handle_touch(&TouchEvent::end(), at(t0, 48));
    assert_eq!(e.outcome(), Some(BackOutcome::Commit));
    assert_eq!(e.translate_x(), 400.0);
    assert_eq!(e.navigator().back_count(), 0);

    run_frames(&mut e, at(t0, 48), at(t0, 260));
    assert_eq!(e.navigator().back_count(), 1);
    assert_eq!(e.navigator().current_path(), "/workouts");

    assert!(e.transition_complete(at(t0, 300)));
    run_frames(&mut e, at(t0, 300), at(t0, 400));
    assert_eq!(e.phase(), GesturePhase::Idle);
    assert_eq!(e.translate_x(), 0.0);
    assert!(e.previous_page().is_none());
    assert_eq!(e.next_deadline(), None);
    assert_eq!(
        e.host().calls().last(),
        Some(&HostCall::ResetAllOverrides)
    );
}

#[test]
fn scenario_2_short_edge_swipe_returns_to_rest() {
    let t0 = Instant::now();
    let mut e = back_engine();

    e.handle_touch(&TouchEvent::start(50.0, 400.0), t0);
    e.handle_touch(&TouchEvent::moved(90.0, 400.0), at(t0, 16));
    e.handle_touch(&TouchEvent::moved(120.0, 400.0), at(t0, 32));
    assert_eq!(e.translate_x(), 70.0);
    e.handle_touch(&TouchEvent::end(), at(t0, 48));
    assert_eq!(e.outcome(), Some(BackOutcome::Cancel));
    assert_eq!(e.translate_x(), 0.0);

    run_frames(&mut e, at(t0, 48), at(t0, 500));
    assert_eq!(e.phase(), GesturePhase::Idle);
    assert_eq!(e.navigator().back_count(), 0);
    assert_eq!(e.navigator().current_path(), "/workouts/new");
    assert_eq!(
        e.host().calls(),
        &[HostCall::ResetPageTransform(PageSlot::SwipeBackPage)]
    );
}

#[test]
fn unresolved_preview_does_not_block_commit() {
    let t0 = Instant::now();
    let mut e = back_engine();
    e.handle_touch(&TouchEvent::start(10.0, 400.0), t0);
    e.handle_touch(&TouchEvent::moved(250.0, 400.0), at(t0, 16));
    e.handle_touch(&TouchEvent::end(), at(t0, 32));
    assert!(!e.should_render_previous_page());
    run_frames(&mut e, at(t0, 32), at(t0, 300));
    assert_eq!(e.navigator().back_count(), 1);

    // The answer arrives after the gesture has committed; it is still
    // accepted and there is nothing left to show.
    let (ticket, path) = e.navigator_mut().take_request().unwrap();
    let page = e.navigator().page_for(&path);
    e.previous_page_resolved(ticket, page);
    assert!(!e.should_render_previous_page());
}

#[test]
fn parameterized_previous_route_is_not_previewed() {
    let nav = ScriptedNavigator::new("/exercises")
        .with_previous("/training-program/12")
        .with_page("/training-program/:id", "ProgramPage");
    let mut e = SwipeBackEngine::new(SwipeBackConfig::default(), nav)
        .unwrap()
        .with_viewport(Viewport::new(400.0, 800.0));
    e.handle_touch(&TouchEvent::start(20.0, 400.0), Instant::now());
    let (ticket, path) = e.navigator_mut().take_request().unwrap();
    let page = e.navigator().page_for(&path);
    assert!(page.is_err());
    assert!(e.previous_page_resolved(ticket, page));
    e.handle_touch(&TouchEvent::moved(100.0, 400.0), Instant::now());
    assert!(e.is_swiping());
    assert!(!e.should_render_previous_page());
}

#[test]
fn history_hint_is_used_without_session_record() {
    let nav = ScriptedNavigator::new("/profile").with_history_state(Some("/home"), 2);
    let mut e = SwipeBackEngine::new(SwipeBackConfig::default(), nav)
        .unwrap()
        .with_viewport(Viewport::new(400.0, 800.0));
    e.handle_touch(&TouchEvent::start(20.0, 400.0), Instant::now());
    assert_eq!(e.navigator().requests()[0].1, "/home");
}

#[test]
fn themed_duration_delays_navigation() {
    let t0 = Instant::now();
    let mut config = SwipeBackConfig::default();
    config.apply_theme_duration("0.35s").unwrap();
    let mut e = SwipeBackEngine::with_host(
        config,
        ScriptedNavigator::new("/b").with_previous("/a"),
        RecordingHost::default(),
    )
    .unwrap()
    .with_viewport(Viewport::new(400.0, 800.0));
    e.handle_touch(&TouchEvent::start(20.0, 400.0), t0);
    e.handle_touch(&TouchEvent::moved(300.0, 400.0), t0);
    e.handle_touch(&TouchEvent::end(), t0);
    assert_eq!(e.tick(at(t0, 349)), 0);
    assert_eq!(e.tick(at(t0, 350)), 1);
    assert_eq!(e.navigator().back_count(), 1);
}

// ============================================================================
// Tab swipe
// ============================================================================

#[test]
fn scenario_3_tab_swipe_left_completes_to_next_tab() {
    let t0 = Instant::now();
    let mut e = tab_engine(&["home", "workouts", "profile"], "workouts");
    e.handle_touch(&TouchEvent::start(300.0, 400.0), t0);
    e.handle_touch(&TouchEvent::moved(260.0, 401.0), at(t0, 16));
    assert_eq!(e.direction(), Some(SwipeDirection::Left));
    e.handle_touch(&TouchEvent::moved(220.0, 402.0), at(t0, 32));
    e.handle_touch(&TouchEvent::end(), at(t0, 48));

    assert!(e.is_completing());
    assert_eq!(e.snapshot().completing_target_tab_index, Some(2));
    assert_eq!(e.snapshot().completing_next_tab, Some("profile"));
    assert_eq!(e.navigator().calls(), &[SwipeDirection::Left]);

    // Router catches up while the animation is still running.
    e.set_current_tab(&"profile");
    assert_eq!(e.next_tab(), Some(&"profile"));

    assert_eq!(e.tick(at(t0, 348)), 1);
    assert_eq!(e.phase(), GesturePhase::Idle);
    assert_eq!(e.translate_x(), 0.0);
    assert_eq!(
        e.host().calls(),
        &[HostCall::ResetPageTransform(PageSlot::TabCurrentPage)]
    );
}

#[test]
fn scenario_4_tab_swipe_left_on_last_tab_returns_to_rest() {
    let t0 = Instant::now();
    let mut e = tab_engine(&["home", "workouts", "profile"], "profile");
    e.handle_touch(&TouchEvent::start(300.0, 400.0), t0);
    e.handle_touch(&TouchEvent::moved(260.0, 401.0), at(t0, 16));
    e.handle_touch(&TouchEvent::moved(220.0, 402.0), at(t0, 32));
    assert_eq!(e.next_tab(), None);
    e.handle_touch(&TouchEvent::end(), at(t0, 48));

    assert!(e.is_completing());
    assert_eq!(e.snapshot().final_direction, None);
    assert_eq!(e.snapshot().completing_target_tab_index, None);
    assert_eq!(e.translate_x(), 0.0);
    assert!(e.navigator().calls().is_empty());

    e.tick(at(t0, 348));
    assert_eq!(e.phase(), GesturePhase::Idle);
    let layout = TabBarLayout::compute(400.0, 3, TabBarMetrics::default()).unwrap();
    assert_eq!(e.indicator_style().left, layout.slot_left(2));
}

#[test]
fn tab_swipe_right_from_middle_goes_back_one_tab() {
    let t0 = Instant::now();
    let mut e = tab_engine(&["home", "workouts", "progress", "profile"], "progress");
    e.handle_touch(&TouchEvent::start(100.0, 400.0), t0);
    e.handle_touch(&TouchEvent::moved(200.0, 400.0), at(t0, 16));
    assert_eq!(e.next_tab(), Some(&"workouts"));
    assert_eq!(e.next_page_translate_x(), -300.0);
    e.handle_touch(&TouchEvent::end(), at(t0, 32));
    assert_eq!(e.translate_x(), 400.0);
    assert_eq!(e.navigator().calls(), &[SwipeDirection::Right]);
    assert_eq!(e.snapshot().completing_target_tab_index, Some(1));
}

#[test]
fn vertical_scroll_over_tabs_is_left_alone() {
    let mut e = tab_engine(&["home", "workouts"], "home");
    e.handle_touch(&TouchEvent::start(200.0, 400.0), Instant::now());
    let r = e.handle_touch(&TouchEvent::moved(190.0, 300.0), Instant::now());
    assert!(!r.prevents_default());
    let r = e.handle_touch(&TouchEvent::moved(50.0, 300.0), Instant::now());
    assert!(!r.prevents_default());
    e.handle_touch(&TouchEvent::end(), Instant::now());
    assert_eq!(e.phase(), GesturePhase::Idle);
    assert!(e.navigator().calls().is_empty());
}

// ============================================================================
// Policy wiring
// ============================================================================

#[test]
fn engines_from_policy_share_selectors() {
    let mut policy = NavigationPolicy::default();
    policy.swipe_back.interactive_selectors = vec![".chart".into()];
    policy.tab_swipe.ignore_interactive = true;
    let (mut back, mut tab) = swipenav::engines_from_policy(
        &policy,
        ScriptedNavigator::new("/progress").with_previous("/home"),
        vec!["home", "progress"],
        RecordingTabNavigator::default(),
    )
    .unwrap();
    back.set_viewport(Viewport::new(400.0, 800.0));
    tab.set_viewport(Viewport::new(400.0, 800.0));

    let chart = swipenav::TouchTarget::new(vec![
        swipenav::ElementInfo::new("canvas"),
        swipenav::ElementInfo::new("div").with_class("chart"),
    ]);
    back.handle_touch(
        &TouchEvent::start(20.0, 400.0).with_target(chart.clone()),
        Instant::now(),
    );
    tab.handle_touch(
        &TouchEvent::start(200.0, 400.0).with_target(chart),
        Instant::now(),
    );
    assert_eq!(back.phase(), GesturePhase::Idle);
    assert_eq!(tab.phase(), GesturePhase::Idle);
}

#[test]
fn bad_selector_in_policy_is_reported() {
    let mut policy = NavigationPolicy::default();
    policy.swipe_back.interactive_selectors = vec!["div > span".into()];
    let result = swipenav::engines_from_policy(
        &policy,
        ScriptedNavigator::new("/"),
        Vec::<&str>::new(),
        RecordingTabNavigator::default(),
    );
    assert!(matches!(
        result,
        Err(swipenav::Error::Config(swipenav::ConfigError::Selector(_)))
    ));
}

// ============================================================================
// Press tracking next to a swipe
// ============================================================================

#[test]
fn swiping_a_list_item_suppresses_its_click() {
    use swipenav::{PressConfig, PressSignal, PressTracker};

    let mut press = PressTracker::new(PressConfig::default());
    assert_eq!(
        press.handle_touch(&TouchEvent::start(100.0, 300.0)),
        Some(PressSignal::Started)
    );
    assert_eq!(
        press.handle_touch(&TouchEvent::moved(140.0, 302.0)),
        Some(PressSignal::Ended)
    );
    press.handle_touch(&TouchEvent::end());
    assert!(!press.take_click());

    press.handle_touch(&TouchEvent::start(100.0, 300.0));
    press.handle_touch(&TouchEvent::moved(104.0, 301.0));
    press.handle_touch(&TouchEvent::end());
    assert!(press.take_click());
}

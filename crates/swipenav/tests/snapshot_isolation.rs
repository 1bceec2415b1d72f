#![forbid(unsafe_code)]

//! The tab a gesture started on is frozen for the whole gesture.
//!
//! The router may change the current tab at any moment (deep link, a
//! notification tap, the commit itself). Neither the incoming page nor the
//! indicator may jump because of it.

use swipenav::prelude::*;
use swipenav::IndicatorStyle;
use swipenav_runtime::testing::RecordingTabNavigator;
use web_time::{Duration, Instant};

const TABS: [&str; 4] = ["home", "workouts", "progress", "profile"];

fn engine() -> TabSwipeEngine<&'static str, RecordingTabNavigator> {
    let mut e = TabSwipeEngine::new(
        TabSwipeConfig::default(),
        TABS.to_vec(),
        RecordingTabNavigator::default(),
    )
    .with_viewport(Viewport::new(400.0, 800.0));
    e.set_current_tab(&"workouts");
    e
}

fn observe(e: &TabSwipeEngine<&'static str, RecordingTabNavigator>) -> (Option<&'static str>, IndicatorStyle) {
    (e.next_tab().copied(), e.indicator_style())
}

#[test]
fn external_tab_change_mid_drag_does_not_move_targets() {
    let mut e = engine();
    e.handle_touch(&TouchEvent::start(300.0, 400.0), Instant::now());
    e.handle_touch(&TouchEvent::moved(200.0, 400.0), Instant::now());
    let before = observe(&e);
    assert_eq!(before.0, Some("progress"));

    for tab in ["profile", "home", "progress"] {
        e.set_current_tab(&tab);
        assert_eq!(observe(&e), before, "changed after switching to {tab}");
    }
}

#[test]
fn commit_target_survives_router_update_and_clears_after_settle() {
    let t0 = Instant::now();
    let mut e = engine();
    e.handle_touch(&TouchEvent::start(300.0, 400.0), t0);
    e.handle_touch(&TouchEvent::moved(150.0, 400.0), t0);
    e.handle_touch(&TouchEvent::end(), t0);
    let frozen = observe(&e);
    assert_eq!(frozen.0, Some("progress"));

    e.set_current_tab(&"progress");
    assert_eq!(observe(&e), frozen);
    e.set_current_tab(&"home");
    assert_eq!(observe(&e), frozen);

    e.tick(t0 + Duration::from_millis(300));
    assert_eq!(e.snapshot().swipe_start_tab_index, None);
    // At rest the indicator follows the router again.
    assert_eq!(e.indicator_style().left, 28.0);
    assert_eq!(e.next_tab(), None);
}

#[test]
fn snapshot_is_taken_at_touch_start_not_at_classification() {
    let mut e = engine();
    e.handle_touch(&TouchEvent::start(300.0, 400.0), Instant::now());
    // Changes before the finger has moved far enough to classify.
    e.set_current_tab(&"profile");
    e.handle_touch(&TouchEvent::moved(295.0, 400.0), Instant::now());
    e.handle_touch(&TouchEvent::moved(200.0, 400.0), Instant::now());
    assert_eq!(e.snapshot().swipe_start_tab_index, Some(1));
    assert_eq!(e.next_tab(), Some(&"progress"));
}

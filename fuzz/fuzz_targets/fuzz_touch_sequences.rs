#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use swipenav_core::{GesturePhase, SwipeBackConfig, TabSwipeConfig, TouchEvent, Viewport};
use swipenav_runtime::testing::{RecordingHost, RecordingTabNavigator, ScriptedNavigator};
use swipenav_runtime::{SwipeBackEngine, TabSwipeEngine};
use web_time::{Duration, Instant};

#[derive(Debug, Arbitrary)]
enum Op {
    Start { x: i16, y: i16 },
    Move { x: i16, y: i16 },
    End,
    Cancel,
    Wait { ms: u16 },
    TransitionComplete,
    DeliverPage,
    SetTab { index: u8 },
    Resize { width: u16, height: u16 },
}

#[derive(Debug, Arbitrary)]
struct Input {
    tab_count: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let tab_count = usize::from(input.tab_count % 8);
    let tabs: Vec<usize> = (0..tab_count).collect();
    let viewport = Viewport::new(390.0, 844.0);

    let Ok(back) = SwipeBackEngine::with_host(
        SwipeBackConfig::default(),
        ScriptedNavigator::new("/b")
            .with_previous("/a")
            .with_page("/a", "A"),
        RecordingHost::default(),
    ) else {
        return;
    };
    let mut back = back.with_viewport(viewport);
    let mut tab = TabSwipeEngine::with_host(
        TabSwipeConfig::default(),
        tabs,
        RecordingTabNavigator::default(),
        RecordingHost::default(),
    )
    .with_viewport(viewport);

    let mut now = Instant::now();
    let mut width = viewport.width;
    let mut starts = 0usize;
    for op in input.ops.iter().take(256) {
        match *op {
            Op::Start { x, y } => {
                starts += 1;
                let ev = TouchEvent::start(f64::from(x), f64::from(y));
                back.handle_touch(&ev, now);
                tab.handle_touch(&ev, now);
            }
            Op::Move { x, y } => {
                let ev = TouchEvent::moved(f64::from(x), f64::from(y));
                back.handle_touch(&ev, now);
                tab.handle_touch(&ev, now);
            }
            Op::End => {
                back.handle_touch(&TouchEvent::end(), now);
                tab.handle_touch(&TouchEvent::end(), now);
            }
            Op::Cancel => {
                back.handle_touch(&TouchEvent::cancel(), now);
                tab.handle_touch(&TouchEvent::cancel(), now);
            }
            Op::Wait { ms } => {
                now += Duration::from_millis(u64::from(ms));
                back.tick(now);
                tab.tick(now);
            }
            Op::TransitionComplete => {
                back.transition_complete(now);
            }
            Op::DeliverPage => {
                if let Some((ticket, path)) = back.navigator_mut().take_request() {
                    let page = back.navigator().page_for(&path);
                    back.previous_page_resolved(ticket, page);
                }
            }
            Op::SetTab { index } => {
                tab.set_current_tab(&usize::from(index));
            }
            Op::Resize { width: w, height: h } => {
                width = f64::from(w);
                let vp = Viewport::new(width, f64::from(h));
                back.set_viewport(vp);
                tab.set_viewport(vp);
            }
        }

        let t = back.translate_x();
        assert!(t.is_finite() && t >= 0.0 && t <= width.max(0.0), "back translate {t}");
        let t = tab.translate_x();
        assert!(t.is_finite() && t.abs() <= width.max(0.0), "tab translate {t}");
        let style = tab.indicator_style();
        assert!(style.left.is_finite() && style.width.is_finite());
        assert!(style.offset().is_finite());
        assert!(tab.navigator().calls().len() <= starts);
    }

    // Drain: both engines come to rest.
    back.handle_touch(&TouchEvent::end(), now);
    tab.handle_touch(&TouchEvent::end(), now);
    now += Duration::from_secs(2);
    back.tick(now);
    tab.tick(now);
    back.transition_complete(now);
    now += Duration::from_secs(2);
    back.tick(now);
    assert_eq!(back.phase(), GesturePhase::Idle);
    assert_eq!(tab.phase(), GesturePhase::Idle);
});

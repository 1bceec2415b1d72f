#![no_main]

use libfuzzer_sys::fuzz_target;
use swipenav_core::NavigationPolicy;
use swipenav_core::config::parse_css_duration;
use swipenav_core::event::Selector;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Parsers must reject, never panic.
    if let Ok(policy) = NavigationPolicy::from_toml_str(text) {
        let _ = policy.validate();
    }
    if let Ok(policy) = NavigationPolicy::from_json_str(text) {
        let _ = policy.validate();
    }
    if let Ok(d) = parse_css_duration(text) {
        assert!(d.as_secs_f64().is_finite());
    }
    let _ = Selector::parse(text);
});

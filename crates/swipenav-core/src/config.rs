#![forbid(unsafe_code)]

//! Tunable parameters for the swipe engines.
//!
//! Every field defaults to the value the app ships with, so
//! `NavigationPolicy::default()` reproduces stock behaviour. With the
//! `policy-config` feature the whole policy loads from TOML or JSON:
//!
//! ```toml
//! [swipe_back]
//! edge_threshold = 0.25
//! animation_duration = "0.25s"
//!
//! [tab_swipe]
//! swipe_threshold = 60
//! ```
//!
//! Durations accept CSS spellings (`"0.2s"`, `"200ms"`) or a bare integer
//! number of milliseconds.

#[cfg(feature = "policy-config")]
use std::path::Path;

#[cfg(feature = "policy-config")]
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::event::{INTERACTIVE_SELECTORS, InteractiveFilter, SelectorError};
use crate::geometry::DEFAULT_AXIS_THRESHOLD;
use crate::indicator::TabBarMetrics;
use crate::press::PressConfig;

/// Swipe-back commit/cancel animation when the theme does not override it.
pub const DEFAULT_BACK_DURATION: Duration = Duration::from_millis(200);
/// Tab slide animation.
pub const DEFAULT_TAB_DURATION: Duration = Duration::from_millis(300);
/// Pause between the router's transition completing and the final cleanup.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(50);

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure loading or validating a [`NavigationPolicy`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read policy file: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "policy-config")]
    #[error("invalid TOML policy: {0}")]
    Toml(#[from] toml::de::Error),
    #[cfg(feature = "policy-config")]
    #[error("invalid JSON policy: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSS duration {0:?}")]
    InvalidDuration(String),
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error("policy validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ---------------------------------------------------------------------------
// Durations
// ---------------------------------------------------------------------------

/// Parse a CSS `<time>` value such as `"0.2s"` or `"200ms"`.
///
/// Negative, non-finite, and unit-less values are rejected.
pub fn parse_css_duration(source: &str) -> Result<Duration, ConfigError> {
    let s = source.trim();
    let invalid = || ConfigError::InvalidDuration(source.to_string());
    let (number, nanos_per_unit) = if let Some(ms) = s.strip_suffix("ms") {
        (ms, 1e6)
    } else if let Some(secs) = s.strip_suffix('s') {
        (secs, 1e9)
    } else {
        return Err(invalid());
    };
    let value: f64 = number.trim().parse().map_err(|_| invalid())?;
    let nanos = (value * nanos_per_unit).round();
    if !nanos.is_finite() || nanos < 0.0 || nanos > u64::MAX as f64 {
        return Err(invalid());
    }
    Ok(Duration::from_nanos(nanos as u64))
}

/// Render a duration the way [`parse_css_duration`] reads it back.
#[must_use]
pub fn format_css_duration(duration: Duration) -> String {
    format!("{}ms", duration.as_millis())
}

#[cfg(feature = "policy-config")]
mod css_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use web_time::Duration;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(u64),
        Css(String),
    }

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_css_duration(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        match Raw::deserialize(d)? {
            Raw::Millis(ms) => Ok(Duration::from_millis(ms)),
            Raw::Css(css) => super::parse_css_duration(&css).map_err(serde::de::Error::custom),
        }
    }
}

// ---------------------------------------------------------------------------
// Swipe back
// ---------------------------------------------------------------------------

/// Edge-swipe-back parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct SwipeBackConfig {
    /// Default: true.
    pub enabled: bool,
    /// Fraction of the window width, from the left, where a swipe may
    /// start. Default: 0.3.
    pub edge_threshold: f64,
    /// Travel (px) needed to commit. Default: 100.
    pub swipe_threshold: f64,
    /// Request `preventDefault` on horizontal moves. Default: true.
    pub prevent_vertical_scroll: bool,
    /// Fraction of the window height excluded at the top. Default: 0.25.
    pub top_dead_zone: f64,
    /// Fraction of the window height excluded at the bottom. Default: 0.1.
    pub bottom_dead_zone: f64,
    /// Axis disambiguation distance (px). Default: 10.
    pub axis_threshold: f64,
    /// Commit/cancel animation. Default: 200ms.
    #[cfg_attr(feature = "policy-config", serde(with = "css_duration"))]
    pub animation_duration: Duration,
    /// Default: 50ms.
    #[cfg_attr(feature = "policy-config", serde(with = "css_duration"))]
    pub settle_delay: Duration,
    /// Targets (or ancestors) matching any of these never start a swipe.
    pub interactive_selectors: Vec<String>,
}

impl Default for SwipeBackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            edge_threshold: 0.3,
            swipe_threshold: 100.0,
            prevent_vertical_scroll: true,
            top_dead_zone: 0.25,
            bottom_dead_zone: 0.1,
            axis_threshold: DEFAULT_AXIS_THRESHOLD,
            animation_duration: DEFAULT_BACK_DURATION,
            settle_delay: DEFAULT_SETTLE_DELAY,
            interactive_selectors: INTERACTIVE_SELECTORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SwipeBackConfig {
    /// Apply a themed duration such as the `--swipe-back-duration` custom
    /// property. Keeps the current value if `css` does not parse.
    pub fn apply_theme_duration(&mut self, css: &str) -> Result<(), ConfigError> {
        self.animation_duration = parse_css_duration(css)?;
        Ok(())
    }

    /// Compile [`interactive_selectors`](Self::interactive_selectors).
    pub fn interactive_filter(&self) -> Result<InteractiveFilter, SelectorError> {
        InteractiveFilter::from_selectors(&self.interactive_selectors)
    }
}

// ---------------------------------------------------------------------------
// Tab swipe
// ---------------------------------------------------------------------------

/// Tab-swipe parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct TabSwipeConfig {
    /// Default: true.
    pub enabled: bool,
    /// Travel (px) needed to switch tabs. Default: 50.
    pub swipe_threshold: f64,
    /// Default: true.
    pub prevent_vertical_scroll: bool,
    /// Default: 10.
    pub axis_threshold: f64,
    /// Slide animation. Default: 300ms.
    #[cfg_attr(feature = "policy-config", serde(with = "css_duration"))]
    pub animation_duration: Duration,
    /// Skip touches on interactive elements. Default: false.
    pub ignore_interactive: bool,
    pub tab_bar: TabBarMetrics,
}

impl Default for TabSwipeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            swipe_threshold: 50.0,
            prevent_vertical_scroll: true,
            axis_threshold: DEFAULT_AXIS_THRESHOLD,
            animation_duration: DEFAULT_TAB_DURATION,
            ignore_interactive: false,
            tab_bar: TabBarMetrics::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// NavigationPolicy
// ---------------------------------------------------------------------------

/// All gesture navigation parameters in one loadable document.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct NavigationPolicy {
    pub swipe_back: SwipeBackConfig,
    pub tab_swipe: TabSwipeConfig,
    pub press: PressConfig,
}

impl NavigationPolicy {
    /// Load from a TOML string.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check every parameter is in range. An empty list means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let back = &self.swipe_back;
        let tab = &self.tab_swipe;

        let fraction = |errors: &mut Vec<String>, name: &str, v: f64| {
            if !(0.0..=1.0).contains(&v) {
                errors.push(format!("{name} must be in [0, 1], got {v}"));
            }
        };
        let positive = |errors: &mut Vec<String>, name: &str, v: f64| {
            if !(v.is_finite() && v > 0.0) {
                errors.push(format!("{name} must be > 0, got {v}"));
            }
        };
        let non_negative = |errors: &mut Vec<String>, name: &str, v: f64| {
            if !(v.is_finite() && v >= 0.0) {
                errors.push(format!("{name} must be >= 0, got {v}"));
            }
        };

        fraction(&mut errors, "swipe_back.edge_threshold", back.edge_threshold);
        fraction(&mut errors, "swipe_back.top_dead_zone", back.top_dead_zone);
        fraction(&mut errors, "swipe_back.bottom_dead_zone", back.bottom_dead_zone);
        if back.top_dead_zone + back.bottom_dead_zone >= 1.0 {
            errors.push(format!(
                "swipe_back dead zones cover the whole height ({} + {})",
                back.top_dead_zone, back.bottom_dead_zone
            ));
        }
        positive(&mut errors, "swipe_back.swipe_threshold", back.swipe_threshold);
        non_negative(&mut errors, "swipe_back.axis_threshold", back.axis_threshold);
        for selector in &back.interactive_selectors {
            if let Err(err) = crate::event::Selector::parse(selector) {
                errors.push(format!("swipe_back.interactive_selectors: {err}"));
            }
        }

        positive(&mut errors, "tab_swipe.swipe_threshold", tab.swipe_threshold);
        non_negative(&mut errors, "tab_swipe.axis_threshold", tab.axis_threshold);
        positive(&mut errors, "tab_swipe.tab_bar.max_tab_width", tab.tab_bar.max_tab_width);
        non_negative(&mut errors, "tab_swipe.tab_bar.tab_margin", tab.tab_bar.tab_margin);

        non_negative(
            &mut errors,
            "press.movement_threshold",
            self.press.movement_threshold,
        );

        errors
    }

    /// [`validate`](Self::validate) as a `Result`.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_constants() {
        let p = NavigationPolicy::default();
        assert!(p.swipe_back.enabled);
        assert_eq!(p.swipe_back.edge_threshold, 0.3);
        assert_eq!(p.swipe_back.swipe_threshold, 100.0);
        assert_eq!(p.swipe_back.top_dead_zone, 0.25);
        assert_eq!(p.swipe_back.bottom_dead_zone, 0.1);
        assert_eq!(p.swipe_back.animation_duration, Duration::from_millis(200));
        assert_eq!(p.swipe_back.settle_delay, Duration::from_millis(50));
        assert_eq!(p.tab_swipe.swipe_threshold, 50.0);
        assert_eq!(p.tab_swipe.animation_duration, Duration::from_millis(300));
        assert!(!p.tab_swipe.ignore_interactive);
        assert_eq!(p.press.movement_threshold, 10.0);
        assert!(p.validate().is_empty());
    }

    #[test]
    fn css_durations() {
        assert_eq!(parse_css_duration("0.2s").unwrap(), Duration::from_millis(200));
        assert_eq!(parse_css_duration(" 250ms ").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_css_duration("1s").unwrap(), Duration::from_secs(1));
        assert!(parse_css_duration("200").is_err());
        assert!(parse_css_duration("-1s").is_err());
        assert!(parse_css_duration("fast").is_err());
        assert!(parse_css_duration("").is_err());
    }

    #[test]
    fn theme_duration_overrides_default() {
        let mut cfg = SwipeBackConfig::default();
        cfg.apply_theme_duration("0.35s").unwrap();
        assert_eq!(cfg.animation_duration, Duration::from_millis(350));
        assert!(cfg.apply_theme_duration("nope").is_err());
        assert_eq!(cfg.animation_duration, Duration::from_millis(350));
    }

    #[test]
    fn validation_collects_every_problem() {
        let mut p = NavigationPolicy::default();
        p.swipe_back.edge_threshold = 1.5;
        p.swipe_back.top_dead_zone = 0.6;
        p.swipe_back.bottom_dead_zone = 0.5;
        p.tab_swipe.swipe_threshold = 0.0;
        p.swipe_back.interactive_selectors.push("div > a".into());
        let errors = p.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert!(matches!(
            NavigationPolicy {
                tab_swipe: TabSwipeConfig {
                    swipe_threshold: -1.0,
                    ..TabSwipeConfig::default()
                },
                ..NavigationPolicy::default()
            }
            .validated(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn default_selectors_compile() {
        let filter = SwipeBackConfig::default().interactive_filter().unwrap();
        assert_eq!(filter.selectors().len(), INTERACTIVE_SELECTORS.len());
    }

    #[cfg(feature = "policy-config")]
    mod loading {
        use super::*;

        #[test]
        fn toml_partial_override() {
            let p = NavigationPolicy::from_toml_str(
                r#"
                [swipe_back]
                edge_threshold = 0.2
                animation_duration = "0.25s"
                settle_delay = 80

                [tab_swipe]
                swipe_threshold = 60.0

                [tab_swipe.tab_bar]
                max_tab_width = 96.0
                "#,
            )
            .unwrap();
            assert_eq!(p.swipe_back.edge_threshold, 0.2);
            assert_eq!(p.swipe_back.swipe_threshold, 100.0);
            assert_eq!(p.swipe_back.animation_duration, Duration::from_millis(250));
            assert_eq!(p.swipe_back.settle_delay, Duration::from_millis(80));
            assert_eq!(p.tab_swipe.swipe_threshold, 60.0);
            assert_eq!(p.tab_swipe.tab_bar.max_tab_width, 96.0);
            assert_eq!(p.tab_swipe.tab_bar.tab_margin, 4.0);
        }

        #[test]
        fn json_round_trip() {
            let mut p = NavigationPolicy::default();
            p.tab_swipe.ignore_interactive = true;
            let json = serde_json::to_string(&p).unwrap();
            assert!(json.contains("\"animation_duration\":\"200ms\""));
            assert_eq!(NavigationPolicy::from_json_str(&json).unwrap(), p);
        }

        #[test]
        fn bad_duration_is_a_parse_error() {
            let err = NavigationPolicy::from_toml_str("[swipe_back]\nanimation_duration = \"soon\"")
                .unwrap_err();
            assert!(matches!(err, ConfigError::Toml(_)));
        }

        #[test]
        fn file_loading() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("swipenav.toml");
            std::fs::write(&path, "[press]\nmovement_threshold = 6.0\n").unwrap();
            let p = NavigationPolicy::from_toml_file(&path).unwrap();
            assert_eq!(p.press.movement_threshold, 6.0);

            let missing = dir.path().join("missing.json");
            assert!(matches!(
                NavigationPolicy::from_json_file(missing),
                Err(ConfigError::Io(_))
            ));
        }
    }
}

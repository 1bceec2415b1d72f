#![forbid(unsafe_code)]

//! swipenav public facade crate.
//!
//! Re-exports the gesture math from `swipenav-core` and the engines from
//! `swipenav-runtime`, plus a prelude and policy loading by file extension.

// --- Core re-exports -------------------------------------------------------

pub use swipenav_core::config::{
    DEFAULT_BACK_DURATION, DEFAULT_SETTLE_DELAY, DEFAULT_TAB_DURATION, parse_css_duration,
};
pub use swipenav_core::event::{ElementInfo, INTERACTIVE_SELECTORS, SelectorError};
pub use swipenav_core::indicator::{IndicatorCss, IndicatorStyle, TabBarMetrics};
pub use swipenav_core::press::{PressConfig, PressSignal, PressTracker};
pub use swipenav_core::transition::BackOutcome;
pub use swipenav_core::{
    AxisClass, ConfigError, GestureGeneration, GesturePhase, InteractiveFilter, NavigationPolicy,
    Point, SwipeBackConfig, SwipeDirection, TabSwipeConfig, TouchEvent, TouchKind, TouchResponse,
    TouchTarget, Viewport,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use swipenav_runtime::{
    GuardDecision, GuardError, GuardTicket, HostError, LeaveGuard, Navigator, NullHost, PageSlot,
    PageTicket, PreviousPage, ResolveError, RouteHistory, RouteTable, SwipeBackEngine,
    TabNavigator, TabSnapshot, TabSwipeEngine, TransitionHost,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for swipenav setup.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("unsupported policy file extension {0:?} (expected .toml or .json)")]
    UnsupportedFormat(String),
}

impl From<SelectorError> for Error {
    fn from(err: SelectorError) -> Self {
        Self::Config(ConfigError::Selector(err))
    }
}

/// Standard result type for swipenav setup.
pub type Result<T> = std::result::Result<T, Error>;

/// Load and validate a [`NavigationPolicy`] from a `.toml` or `.json` file.
#[cfg(feature = "policy-config")]
pub fn load_policy(path: impl AsRef<std::path::Path>) -> Result<NavigationPolicy> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let policy = match ext.as_str() {
        "toml" => NavigationPolicy::from_toml_file(path)?,
        "json" => NavigationPolicy::from_json_file(path)?,
        _ => return Err(Error::UnsupportedFormat(ext)),
    };
    Ok(policy.validated()?)
}

/// Build both engines from one policy.
///
/// Fails only if the swipe-back interactive selectors do not parse.
#[cfg(feature = "runtime")]
pub fn engines_from_policy<N, T, TN>(
    policy: &NavigationPolicy,
    navigator: N,
    tabs: Vec<T>,
    tab_navigator: TN,
) -> Result<(SwipeBackEngine<N>, TabSwipeEngine<T, TN>)>
where
    N: Navigator,
    T: Clone + PartialEq + std::fmt::Debug,
    TN: TabNavigator,
{
    let back = SwipeBackEngine::new(policy.swipe_back.clone(), navigator)?;
    let tab = TabSwipeEngine::new(policy.tab_swipe.clone(), tabs, tab_navigator)
        .with_interactive_filter(policy.swipe_back.interactive_filter()?);
    Ok((back, tab))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, GesturePhase, NavigationPolicy, Point, Result, SwipeBackConfig, SwipeDirection,
        TabSwipeConfig, TouchEvent, TouchResponse, Viewport,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{Navigator, SwipeBackEngine, TabNavigator, TabSwipeEngine, TransitionHost};

    pub use crate::core;
    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use swipenav_core as core;
#[cfg(feature = "runtime")]
pub use swipenav_runtime as runtime;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_errors_become_config_errors() {
        let err: Error = SelectorError("div >".into()).into();
        assert!(matches!(err, Error::Config(ConfigError::Selector(_))));
    }

    #[cfg(feature = "policy-config")]
    #[test]
    fn load_policy_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let toml = dir.path().join("gestures.toml");
        std::fs::write(&toml, "[swipe_back]\nswipe_threshold = 120.0\n").unwrap();
        assert_eq!(load_policy(&toml).unwrap().swipe_back.swipe_threshold, 120.0);

        let json = dir.path().join("gestures.JSON");
        std::fs::write(&json, r#"{"tab_swipe": {"swipe_threshold": 40.0}}"#).unwrap();
        assert_eq!(load_policy(&json).unwrap().tab_swipe.swipe_threshold, 40.0);

        let yaml = dir.path().join("gestures.yaml");
        std::fs::write(&yaml, "").unwrap();
        assert!(matches!(
            load_policy(&yaml),
            Err(Error::UnsupportedFormat(ext)) if ext == "yaml"
        ));
    }

    #[cfg(feature = "policy-config")]
    #[test]
    fn load_policy_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[swipe_back]\nedge_threshold = 1.5\n").unwrap();
        assert!(matches!(
            load_policy(&path),
            Err(Error::Config(ConfigError::Validation(_)))
        ));
    }
}

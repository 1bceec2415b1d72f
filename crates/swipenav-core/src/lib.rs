#![forbid(unsafe_code)]

//! Core: touch geometry, gesture state, and transition math.
//!
//! # Role in swipenav
//! `swipenav-core` holds everything that is a pure function of its inputs:
//! threshold tests, the per-view gesture record, page offsets, the tab
//! indicator layout, and configuration. The stateful engines in
//! `swipenav-runtime` feed touch events through these pieces and schedule
//! the side effects.
//!
//! # Primary responsibilities
//! - **geometry**: axis classification, edge and dead-zone tests, advance rule.
//! - **event**: touch events, target descriptions, interactive selectors.
//! - **gesture**: phases, generations, sticky axis lock.
//! - **transition / indicator**: `translateX`, progress, opacity, indicator CSS.
//! - **press**: tap-versus-swipe tracking for list items.
//! - **config**: defaults plus TOML/JSON loading (`policy-config` feature).

pub mod config;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod indicator;
pub mod press;
pub mod transition;

pub use config::{ConfigError, NavigationPolicy, SwipeBackConfig, TabSwipeConfig};
pub use event::{InteractiveFilter, TouchEvent, TouchKind, TouchResponse, TouchTarget};
pub use geometry::{AxisClass, Point, SwipeDirection, Viewport};
pub use gesture::{GestureGeneration, GesturePhase, GestureState};

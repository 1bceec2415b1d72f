#![forbid(unsafe_code)]

//! swipenav runtime
//!
//! Stateful gesture engines built on `swipenav-core`.
//!
//! # Key Components
//!
//! - [`SwipeBackEngine`] - edge swipe that navigates to the previous route
//! - [`TabSwipeEngine`] - horizontal swipe between sibling tabs
//! - [`DeferredQueue`] - generation-checked post-animation work
//! - [`TransitionHost`] - page overrides applied by the view layer
//! - [`Navigator`] / [`TabNavigator`] - router seams
//!
//! # Driving an engine
//! Feed touch events to `handle_touch`, read `translate_x` (and friends)
//! when rendering, and call `tick(now)` from the frame or timer loop until
//! `next_deadline()` returns `None`. Engines never read the clock
//! themselves.

pub mod deferred;
pub mod error;
pub mod host;
pub mod navigation;
pub mod swipe_back;
pub mod tab_swipe;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use deferred::DeferredQueue;
pub use error::{GuardError, HostError, ResolveError};
pub use host::{NullHost, OverrideLedger, PageSlot, TransitionHost};
pub use navigation::{
    GuardDecision, GuardTicket, LeaveGuard, Navigator, PageTicket, PreviousPage, RouteHistory,
    RoutePattern, RouteTable, TabNavigator,
};
pub use swipe_back::{BackTask, SwipeBackEngine};
pub use tab_swipe::{TabSnapshot, TabSwipeEngine};

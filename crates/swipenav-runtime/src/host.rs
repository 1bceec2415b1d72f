#![forbid(unsafe_code)]

//! Page-override capability supplied by the view layer.
//!
//! While a swipe-back animation runs, the engine temporarily overrides what
//! the router's native transition would do: it suspends that transition,
//! hides the outgoing page, and mounts the previous page underneath. Every
//! override must be undone on every exit path. [`OverrideLedger`] records
//! which overrides are active so one idempotent
//! [`release`](OverrideLedger::release) can undo them.
//!
//! # Failure Modes
//!
//! - A missing element ([`HostError::ElementMissing`]) is logged at `debug`
//!   and skipped. The remaining overrides are still released.

use crate::error::HostError;

/// Which page element a transform reset targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageSlot {
    /// The page being swiped away by the swipe-back engine.
    SwipeBackPage,
    /// The active tab's content.
    TabCurrentPage,
}

/// DOM-level side effects the engines need from the host.
pub trait TransitionHost {
    /// Stop the router's own enter/leave animation for the next navigation.
    fn suspend_native_transitions(&mut self) -> Result<(), HostError>;

    /// Hide the page that was just swiped off-screen.
    fn hide_current_page(&mut self) -> Result<(), HostError>;

    /// Put a page's transform back to rest.
    fn reset_page_transform(&mut self, slot: PageSlot) -> Result<(), HostError>;

    /// Remove anything mounted for the previous-page preview.
    fn remove_previous_page_artifacts(&mut self) -> Result<(), HostError>;

    /// Undo every override. Must be safe to call repeatedly.
    fn reset_all_overrides(&mut self) -> Result<(), HostError>;
}

impl<H: TransitionHost + ?Sized> TransitionHost for &mut H {
    fn suspend_native_transitions(&mut self) -> Result<(), HostError> {
        (**self).suspend_native_transitions()
    }
    fn hide_current_page(&mut self) -> Result<(), HostError> {
        (**self).hide_current_page()
    }
    fn reset_page_transform(&mut self, slot: PageSlot) -> Result<(), HostError> {
        (**self).reset_page_transform(slot)
    }
    fn remove_previous_page_artifacts(&mut self) -> Result<(), HostError> {
        (**self).remove_previous_page_artifacts()
    }
    fn reset_all_overrides(&mut self) -> Result<(), HostError> {
        (**self).reset_all_overrides()
    }
}

/// A host with nothing to override (server rendering, headless tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl TransitionHost for NullHost {
    fn suspend_native_transitions(&mut self) -> Result<(), HostError> {
        Ok(())
    }
    fn hide_current_page(&mut self) -> Result<(), HostError> {
        Ok(())
    }
    fn reset_page_transform(&mut self, _slot: PageSlot) -> Result<(), HostError> {
        Ok(())
    }
    fn remove_previous_page_artifacts(&mut self) -> Result<(), HostError> {
        Ok(())
    }
    fn reset_all_overrides(&mut self) -> Result<(), HostError> {
        Ok(())
    }
}

/// Log a host failure and carry on.
pub(crate) fn log_host(op: &'static str, result: Result<(), HostError>) {
    if let Err(err) = result {
        tracing::debug!(
            target: "swipenav.host",
            op,
            error = %err,
            "host override skipped"
        );
    }
}

// ---------------------------------------------------------------------------
// OverrideLedger
// ---------------------------------------------------------------------------

/// Overrides currently applied to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverrideLedger {
    suspended: bool,
    current_hidden: bool,
    preview_mounted: bool,
    page_moved: bool,
}

impl OverrideLedger {
    pub fn suspend_native_transitions(&mut self, host: &mut impl TransitionHost) {
        self.suspended = true;
        log_host("suspend_native_transitions", host.suspend_native_transitions());
    }

    pub fn hide_current_page(&mut self, host: &mut impl TransitionHost) {
        self.current_hidden = true;
        log_host("hide_current_page", host.hide_current_page());
    }

    /// Note that the previous-page preview is on screen.
    pub fn mark_preview_mounted(&mut self) {
        self.preview_mounted = true;
    }

    /// Note that the page has been moved off its resting transform.
    pub fn mark_page_moved(&mut self) {
        self.page_moved = true;
    }

    #[must_use]
    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }

    #[must_use]
    pub fn preview_mounted(&self) -> bool {
        self.preview_mounted
    }

    /// Undo every recorded override. A no-op when nothing is recorded.
    pub fn release(&mut self, host: &mut impl TransitionHost) {
        if self.is_clear() {
            return;
        }
        if self.preview_mounted {
            log_host(
                "remove_previous_page_artifacts",
                host.remove_previous_page_artifacts(),
            );
        }
        if self.page_moved {
            log_host(
                "reset_page_transform",
                host.reset_page_transform(PageSlot::SwipeBackPage),
            );
        }
        if self.suspended || self.current_hidden {
            log_host("reset_all_overrides", host.reset_all_overrides());
        }
        *self = Self::default();
    }
}

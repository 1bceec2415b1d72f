#![forbid(unsafe_code)]

//! Error types for the engines' collaborators.
//!
//! None of these ever abort a gesture loudly: the engines log them and fall
//! back to "the gesture did nothing".

/// Why the previous page could not be resolved for a swipe-back preview.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no route matches {path:?}")]
    NoMatch { path: String },
    #[error("route {pattern:?} takes parameters and cannot be previewed")]
    Parameterized { pattern: String },
    #[error("failed to load page for {path:?}: {reason}")]
    Load { path: String, reason: String },
}

/// A leave guard failed to reach a decision. Treated as a veto.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("leave guard rejected: {0}")]
pub struct GuardError(pub String);

/// A host override could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("element not found: {0}")]
    ElementMissing(&'static str),
    #[error("operation not supported by this host: {0}")]
    Unsupported(&'static str),
}

//! Fault isolation for rendering
//!
//! [`FaultBoundary`] runs a render closure and turns any failure, including
//! a panic, into a [`Fallback`] that replaces the whole subtree. Domain faults
//! keep their own message; everything else gets a generic one. There is no
//! retry and no partial recovery.

use crate::error::ViewerError;
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};

/// Title shown on every default fallback
pub const FALLBACK_TITLE: &str = "Something went wrong";

/// Message shown for anything that is not a domain fault
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred";

/// Replacement view for a failed subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fallback {
    /// Heading
    pub title: String,
    /// Body text
    pub message: String,
    /// Domain error code, when the failure was a domain fault
    pub code: Option<&'static str>,
}

impl Fallback {
    /// Create a custom fallback
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            code: None,
        }
    }

    /// Default fallback for `err`
    #[must_use]
    pub fn for_error(err: &ViewerError) -> Self {
        match err.as_domain() {
            Some(domain) => Self {
                title: FALLBACK_TITLE.to_string(),
                message: domain.to_string(),
                code: Some(domain.code()),
            },
            None => Self::new(FALLBACK_TITLE, UNEXPECTED_MESSAGE),
        }
    }
}

/// Catches render failures of a child and substitutes a fallback
#[derive(Debug, Clone, Default)]
pub struct FaultBoundary {
    custom: Option<Fallback>,
}

impl FaultBoundary {
    /// Boundary with default fallbacks
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Boundary that always shows `fallback` on failure
    #[inline]
    #[must_use]
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.custom = Some(fallback);
        self
    }

    /// Fallback to show for `err`
    #[must_use]
    pub fn fallback_for(&self, err: &ViewerError) -> Fallback {
        self.custom
            .clone()
            .unwrap_or_else(|| Fallback::for_error(err))
    }

    /// Render `child`, intercepting errors and panics
    ///
    /// # Errors
    /// Returns the fallback that replaces the child's output
    pub fn render<T, F>(&self, child: F) -> Result<T, Fallback>
    where
        F: FnOnce() -> Result<T, ViewerError>,
    {
        let err = match panic::catch_unwind(AssertUnwindSafe(child)) {
            Ok(Ok(output)) => return Ok(output),
            Ok(Err(err)) => err,
            Err(payload) => ViewerError::unexpected(panic_message(payload.as_ref())),
        };

        if err.is_domain() {
            tracing::warn!(error = %err, "render failed with domain error");
        } else {
            tracing::error!(error = %err, "render failed unexpectedly");
        }
        Err(self.fallback_for(&err))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic during render".to_string()
    }
}

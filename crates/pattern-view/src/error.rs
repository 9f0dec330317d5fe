//! Error types for the pattern view layer
//!
//! Two kinds of failure reach the fault boundary:
//! - [`ViewerError::Domain`]: a recognized pattern fault with its own message
//! - everything else, shown as a generic failure

use crate::hydration::HydrationState;
use pattern_model::DomainError;

/// Main viewer error type
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// Recognized pattern fault
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Interaction attempted before hydration
    #[error("viewer is not hydrated")]
    NotHydrated,

    /// Hydration state machine violated
    #[error("illegal hydration transition: {from:?} -> {to:?}")]
    IllegalTransition {
        from: HydrationState,
        to: HydrationState,
    },

    /// Anything else
    #[error("unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl ViewerError {
    /// Check if this is a recognized domain fault
    #[inline]
    #[must_use]
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain(_))
    }

    /// Domain fault, if this is one
    #[inline]
    #[must_use]
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(err) => Some(err),
            _ => None,
        }
    }

    /// Create unexpected error from a message
    #[inline]
    pub fn unexpected(message: impl std::fmt::Display) -> Self {
        Self::Unexpected(anyhow::anyhow!("{message}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_passes_message_through() {
        let err = ViewerError::from(DomainError::ConfidenceOutOfRange { value: 2.0 });
        assert!(err.is_domain());
        assert_eq!(err.to_string(), "confidence 2 is outside [0, 1]");
        assert_eq!(err.as_domain().unwrap().code(), "confidence_out_of_range");
    }

    #[test]
    fn other_errors_are_not_domain() {
        assert!(!ViewerError::NotHydrated.is_domain());
        let err = ViewerError::unexpected("render exploded");
        assert!(!err.is_domain());
        assert!(err.to_string().contains("render exploded"));
    }
}

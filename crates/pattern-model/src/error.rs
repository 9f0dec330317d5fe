//! Error types for the pattern model
//!
//! Every recognized pattern fault is a [`DomainError`] variant:
//! - Range violations (confidence, connection strength)
//! - Structural violations (duplicate themes, unordered history)
//! - Referential violations (unresolved connection targets)
//! - Malformed input (missing fields, invalid JSON)
//! - Lookup misses against the working set

/// A recognized, named fault in pattern data or pattern lookups
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Confidence outside [0, 1]
    #[error("confidence {value} is outside [0, 1]")]
    ConfidenceOutOfRange { value: f64 },

    /// Connection or theme strength outside [0, 1]
    #[error("strength {value} is outside [0, 1]")]
    StrengthOutOfRange { value: f64 },

    /// Required field absent from input
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    /// Field present but empty where a value is required
    #[error("field `{field}` must not be empty")]
    EmptyField { field: &'static str },

    /// Theme listed twice on one pattern
    #[error("duplicate theme '{theme}'")]
    DuplicateTheme { theme: String },

    /// Connection id listed twice on one pattern
    #[error("duplicate connection id '{connection_id}'")]
    DuplicateConnection { connection_id: String },

    /// History step earlier than its predecessor
    #[error("evolution step {index} at {timestamp} precedes the previous step")]
    HistoryOutOfOrder { index: usize, timestamp: String },

    /// Evolution stage differs from the last history step
    #[error("evolution stage '{stage}' does not match last recorded stage '{last}'")]
    StageMismatch { stage: String, last: String },

    /// Timestamp is not RFC 3339
    #[error("invalid timestamp '{value}'")]
    InvalidTimestamp { value: String },

    /// Connection points at a pattern outside the working set
    #[error("connection '{connection_id}' targets unknown pattern '{target_id}'")]
    UnresolvedConnection {
        connection_id: String,
        target_id: String,
    },

    /// Two different patterns share an id
    #[error("pattern id '{id}' is already taken by a different pattern")]
    DuplicatePatternId { id: String },

    /// Pattern id not present in the working set
    #[error("pattern not found: {id}")]
    PatternNotFound { id: String },

    /// Theme not carried by the selected pattern
    #[error("theme '{theme}' is not a theme of the selected pattern")]
    UnknownTheme { theme: String },

    /// Theme operation without a selected pattern
    #[error("no pattern selected")]
    NoPatternSelected,

    /// Input could not be parsed at all
    #[error("malformed pattern data: {0}")]
    Malformed(String),
}

impl DomainError {
    /// Stable machine-readable code for this fault
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfidenceOutOfRange { .. } => "confidence_out_of_range",
            Self::StrengthOutOfRange { .. } => "strength_out_of_range",
            Self::MissingField { .. } => "missing_field",
            Self::EmptyField { .. } => "empty_field",
            Self::DuplicateTheme { .. } => "duplicate_theme",
            Self::DuplicateConnection { .. } => "duplicate_connection",
            Self::HistoryOutOfOrder { .. } => "history_out_of_order",
            Self::StageMismatch { .. } => "stage_mismatch",
            Self::InvalidTimestamp { .. } => "invalid_timestamp",
            Self::UnresolvedConnection { .. } => "unresolved_connection",
            Self::DuplicatePatternId { .. } => "duplicate_pattern_id",
            Self::PatternNotFound { .. } => "pattern_not_found",
            Self::UnknownTheme { .. } => "unknown_theme",
            Self::NoPatternSelected => "no_pattern_selected",
            Self::Malformed(_) => "malformed",
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_display() {
        let err = DomainError::ConfidenceOutOfRange { value: 1.5 };
        assert!(err.to_string().contains("1.5"));

        let err = DomainError::MissingField { field: "content" };
        assert_eq!(err.to_string(), "missing required field `content`");
    }

    #[test]
    fn domain_error_codes() {
        assert_eq!(DomainError::NoPatternSelected.code(), "no_pattern_selected");
        assert_eq!(
            DomainError::MissingField { field: "id" }.code(),
            "missing_field"
        );
    }
}

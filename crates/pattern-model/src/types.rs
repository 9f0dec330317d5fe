//! Core pattern types
//!
//! Defines the pattern data model:
//! - [`Pattern`] and its identity [`PatternId`]
//! - [`Evolution`] with its append-only history of [`EvolutionStep`]s
//! - [`Change`] records inside each step
//! - [`Connection`]s between patterns
//!
//! Patterns are immutable once built. All cross-field invariants are checked
//! by [`PatternBuilder`](crate::PatternBuilder) or during deserialization.

use crate::error::DomainError;
use crate::score::Score;
use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique pattern identifier within a working set
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternId(String);

impl PatternId {
    /// Create new pattern id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PatternId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PatternId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PatternId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of change recorded in an evolution step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Pattern first observed
    Creation,
    /// Content or themes edited
    Modification,
    /// Connection added or removed
    Connection,
    /// Stage advanced
    Evolution,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Creation => "creation",
            Self::Modification => "modification",
            Self::Connection => "connection",
            Self::Evolution => "evolution",
        };
        f.write_str(name)
    }
}

/// A single change inside an evolution step
///
/// `before` and `after` are opaque snapshots; the model never inspects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// Change classification
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    /// Human-readable description
    pub description: String,
    /// Snapshot before the change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,
    /// Snapshot after the change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,
}

impl Change {
    /// Create change without snapshots
    #[inline]
    #[must_use]
    pub fn new(kind: ChangeKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            before: None,
            after: None,
        }
    }

    /// With before/after snapshots
    #[inline]
    #[must_use]
    pub fn with_snapshots(
        mut self,
        before: Option<serde_json::Value>,
        after: Option<serde_json::Value>,
    ) -> Self {
        self.before = before;
        self.after = after;
        self
    }
}

/// One entry in a pattern's evolution history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionStep {
    /// Stage reached by this step
    pub stage: String,
    /// When the step happened
    pub timestamp: DateTime<Utc>,
    /// Changes made in this step
    pub changes: Vec<Change>,
}

impl EvolutionStep {
    /// Create step with no changes
    #[inline]
    #[must_use]
    pub fn new(stage: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            stage: stage.into(),
            timestamp,
            changes: Vec::new(),
        }
    }

    /// Create step from an RFC 3339 timestamp
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidTimestamp`] if `timestamp` does not parse
    pub fn at(stage: impl Into<String>, timestamp: &str) -> Result<Self, DomainError> {
        Ok(Self::new(stage, parse_timestamp(timestamp)?))
    }

    /// Add a change
    #[inline]
    #[must_use]
    pub fn with_change(mut self, change: Change) -> Self {
        self.changes.push(change);
        self
    }

    /// Short summary of the step: the first change description, if any
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.changes.first().map(|c| c.description.as_str())
    }
}

/// Parse an RFC 3339 timestamp into UTC
pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| DomainError::InvalidTimestamp {
            value: value.to_string(),
        })
}

/// Stage history of a pattern
///
/// # Invariants
/// - `history` is ordered by non-decreasing timestamp
/// - once `history` is non-empty, `stage` equals the last step's stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evolution {
    stage: String,
    history: Vec<EvolutionStep>,
}

impl Evolution {
    /// Create evolution with no recorded history
    #[inline]
    #[must_use]
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            history: Vec::new(),
        }
    }

    /// Create evolution from a stage and a complete history
    ///
    /// # Errors
    /// Returns error if history is out of order or `stage` does not match the
    /// last step
    pub fn from_history(
        stage: impl Into<String>,
        history: Vec<EvolutionStep>,
    ) -> Result<Self, DomainError> {
        let stage = stage.into();
        let mut evolution = Self::new(stage.clone());
        for step in history {
            evolution.record(step)?;
        }
        if evolution.stage != stage {
            return Err(DomainError::StageMismatch {
                stage,
                last: evolution.stage,
            });
        }
        Ok(evolution)
    }

    /// Append a step; the current stage follows it
    ///
    /// # Errors
    /// Returns [`DomainError::HistoryOutOfOrder`] if `step` is earlier than the
    /// last recorded step
    pub fn record(&mut self, step: EvolutionStep) -> Result<(), DomainError> {
        if let Some(last) = self.latest() {
            if step.timestamp < last.timestamp {
                return Err(DomainError::HistoryOutOfOrder {
                    index: self.history.len(),
                    timestamp: step.timestamp.to_rfc3339(),
                });
            }
        }
        self.stage.clone_from(&step.stage);
        self.history.push(step);
        Ok(())
    }

    /// Current stage
    #[inline]
    #[must_use]
    pub fn stage(&self) -> &str {
        &self.stage
    }

    /// Full history, oldest first
    #[inline]
    #[must_use]
    pub fn history(&self) -> &[EvolutionStep] {
        &self.history
    }

    /// Most recent step
    #[inline]
    #[must_use]
    pub fn latest(&self) -> Option<&EvolutionStep> {
        self.history.last()
    }
}

/// Directed, typed, strength-weighted relation to another pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Identifier, unique within the owning pattern
    pub connection_id: String,
    /// Free-form relation type ("direct", "emerging", ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Relation strength
    pub strength: Score,
    /// Target pattern
    pub target_id: PatternId,
    /// Human-readable description
    pub description: String,
}

impl Connection {
    /// Create connection
    ///
    /// # Errors
    /// Returns [`DomainError::StrengthOutOfRange`] if `strength` is outside [0, 1]
    pub fn new(
        connection_id: impl Into<String>,
        kind: impl Into<String>,
        strength: f64,
        target_id: impl Into<PatternId>,
        description: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let strength =
            Score::new(strength).map_err(|e| DomainError::StrengthOutOfRange { value: e.0 })?;
        Ok(Self {
            connection_id: connection_id.into(),
            kind: kind.into(),
            strength,
            target_id: target_id.into(),
            description: description.into(),
        })
    }
}

/// A tagged content unit with confidence and evolution history
///
/// # Invariants
/// - `id` is non-empty
/// - `themes` holds no duplicates and no empty entries
/// - `confidence` lies in [0, 1]
/// - connection ids are non-empty and unique
///
/// Built by [`PatternBuilder`](crate::PatternBuilder) or deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "crate::record::PatternRecord")]
pub struct Pattern {
    pub(crate) id: PatternId,
    pub(crate) content: String,
    pub(crate) themes: IndexSet<String>,
    pub(crate) confidence: Score,
    pub(crate) evolution: Evolution,
    pub(crate) connections: Vec<Connection>,
}

impl Pattern {
    /// Pattern identity
    #[inline]
    #[must_use]
    pub fn id(&self) -> &PatternId {
        &self.id
    }

    /// Pattern content
    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Themes in declaration order
    #[inline]
    pub fn themes(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.themes.iter().map(String::as_str)
    }

    /// Check whether this pattern carries `theme`
    #[inline]
    #[must_use]
    pub fn has_theme(&self, theme: &str) -> bool {
        self.themes.contains(theme)
    }

    /// Confidence score
    #[inline]
    #[must_use]
    pub fn confidence(&self) -> Score {
        self.confidence
    }

    /// Evolution history
    #[inline]
    #[must_use]
    pub fn evolution(&self) -> &Evolution {
        &self.evolution
    }

    /// Outgoing connections in declaration order
    #[inline]
    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Find connection by id
    #[must_use]
    pub fn connection(&self, connection_id: &str) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|c| c.connection_id == connection_id)
    }

    /// Parse a pattern from JSON, validating every invariant
    ///
    /// # Errors
    /// - [`DomainError::Malformed`] for invalid JSON
    /// - [`DomainError::MissingField`] for an absent required field
    /// - any invariant violation
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let record: crate::record::PatternRecord = serde_json::from_str(json)?;
        Self::try_from(record)
    }

    /// Parse a JSON array of patterns
    ///
    /// # Errors
    /// Returns the first error encountered, as in [`Pattern::from_json`]
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, DomainError> {
        let records: Vec<crate::record::PatternRecord> = serde_json::from_str(json)?;
        records.into_iter().map(Self::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(value: &str) -> DateTime<Utc> {
        parse_timestamp(value).unwrap()
    }

    #[test]
    fn evolution_record_tracks_stage() {
        let mut evolution = Evolution::new("initial");
        assert!(evolution.latest().is_none());

        evolution
            .record(EvolutionStep::new("initial", ts("2024-01-01T00:00:00Z")))
            .unwrap();
        evolution
            .record(EvolutionStep::new("developing", ts("2024-02-01T00:00:00Z")))
            .unwrap();

        assert_eq!(evolution.stage(), "developing");
        assert_eq!(evolution.history().len(), 2);
    }

    #[test]
    fn evolution_rejects_out_of_order() {
        let mut evolution = Evolution::new("initial");
        evolution
            .record(EvolutionStep::new("developing", ts("2024-02-01T00:00:00Z")))
            .unwrap();

        let err = evolution
            .record(EvolutionStep::new("initial", ts("2024-01-01T00:00:00Z")))
            .unwrap_err();
        assert!(matches!(err, DomainError::HistoryOutOfOrder { index: 1, .. }));
        assert_eq!(evolution.history().len(), 1);
    }

    #[test]
    fn evolution_same_timestamp_allowed() {
        let history = vec![
            EvolutionStep::new("initial", ts("2024-01-01T00:00:00Z")),
            EvolutionStep::new("developing", ts("2024-01-01T00:00:00Z")),
        ];
        assert!(Evolution::from_history("developing", history).is_ok());
    }

    #[test]
    fn evolution_from_history_checks_stage() {
        let history = vec![EvolutionStep::new("initial", ts("2024-01-01T00:00:00Z"))];
        let err = Evolution::from_history("developing", history).unwrap_err();
        assert_eq!(
            err,
            DomainError::StageMismatch {
                stage: "developing".into(),
                last: "initial".into()
            }
        );
    }

    #[test]
    fn evolution_empty_history_keeps_any_stage() {
        let evolution = Evolution::from_history("seed", vec![]).unwrap();
        assert_eq!(evolution.stage(), "seed");
    }

    #[test]
    fn timestamps_normalize_to_utc() {
        let step = EvolutionStep::at("initial", "2024-01-01T02:00:00+02:00").unwrap();
        assert_eq!(step.timestamp, ts("2024-01-01T00:00:00Z"));
        assert!(EvolutionStep::at("initial", "yesterday").is_err());
    }

    #[test]
    fn connection_strength_validated() {
        assert!(Connection::new("c1", "direct", 0.5, "p2", "shared theme").is_ok());
        let err = Connection::new("c1", "direct", 1.2, "p2", "").unwrap_err();
        assert_eq!(err, DomainError::StrengthOutOfRange { value: 1.2 });
    }

    #[test]
    fn change_kind_wire_names() {
        let change = Change::new(ChangeKind::Creation, "Pattern discovered");
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["type"], "creation");
        assert!(json.get("before").is_none());
    }

    #[test]
    fn step_summary_uses_first_change() {
        let step = EvolutionStep::new("initial", ts("2024-01-01T00:00:00Z"))
            .with_change(Change::new(ChangeKind::Creation, "Pattern discovered"))
            .with_change(Change::new(ChangeKind::Connection, "Linked"));
        assert_eq!(step.summary(), Some("Pattern discovered"));
    }
}

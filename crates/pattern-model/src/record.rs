//! Wire records for pattern deserialization
//!
//! Every field is optional at the wire level so that an absent field becomes
//! [`DomainError::MissingField`] instead of an opaque parse failure.

use crate::builder::PatternBuilder;
use crate::error::DomainError;
use crate::types::{parse_timestamp, Change, ChangeKind, Connection, Evolution, EvolutionStep, Pattern};
use serde::Deserialize;

/// Unvalidated pattern as it appears on the wire
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PatternRecord {
    id: Option<String>,
    content: Option<String>,
    themes: Option<Vec<String>>,
    confidence: Option<f64>,
    evolution: Option<EvolutionRecord>,
    connections: Option<Vec<ConnectionRecord>>,
}

#[derive(Debug, Deserialize)]
struct EvolutionRecord {
    stage: Option<String>,
    history: Option<Vec<StepRecord>>,
}

#[derive(Debug, Deserialize)]
struct StepRecord {
    stage: Option<String>,
    timestamp: Option<String>,
    changes: Option<Vec<ChangeRecord>>,
}

#[derive(Debug, Deserialize)]
struct ChangeRecord {
    #[serde(rename = "type")]
    kind: Option<ChangeKind>,
    description: Option<String>,
    #[serde(default)]
    before: Option<serde_json::Value>,
    #[serde(default)]
    after: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionRecord {
    connection_id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    strength: Option<f64>,
    target_id: Option<String>,
    description: Option<String>,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, DomainError> {
    value.ok_or(DomainError::MissingField { field })
}

impl TryFrom<ChangeRecord> for Change {
    type Error = DomainError;

    fn try_from(record: ChangeRecord) -> Result<Self, Self::Error> {
        Ok(Change::new(
            required(record.kind, "type")?,
            required(record.description, "description")?,
        )
        .with_snapshots(record.before, record.after))
    }
}

impl TryFrom<StepRecord> for EvolutionStep {
    type Error = DomainError;

    fn try_from(record: StepRecord) -> Result<Self, Self::Error> {
        let timestamp = parse_timestamp(&required(record.timestamp, "timestamp")?)?;
        let changes = required(record.changes, "changes")?
            .into_iter()
            .map(Change::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EvolutionStep {
            stage: required(record.stage, "stage")?,
            timestamp,
            changes,
        })
    }
}

impl TryFrom<EvolutionRecord> for Evolution {
    type Error = DomainError;

    fn try_from(record: EvolutionRecord) -> Result<Self, Self::Error> {
        let history = required(record.history, "history")?
            .into_iter()
            .map(EvolutionStep::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Evolution::from_history(required(record.stage, "stage")?, history)
    }
}

impl TryFrom<ConnectionRecord> for Connection {
    type Error = DomainError;

    fn try_from(record: ConnectionRecord) -> Result<Self, Self::Error> {
        Connection::new(
            required(record.connection_id, "connectionId")?,
            required(record.kind, "type")?,
            required(record.strength, "strength")?,
            required(record.target_id, "targetId")?,
            required(record.description, "description")?,
        )
    }
}

impl TryFrom<PatternRecord> for Pattern {
    type Error = DomainError;

    fn try_from(record: PatternRecord) -> Result<Self, Self::Error> {
        let evolution = Evolution::try_from(required(record.evolution, "evolution")?)?;
        let connections = required(record.connections, "connections")?
            .into_iter()
            .map(Connection::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = PatternBuilder::new(
            required(record.id, "id")?,
            required(record.content, "content")?,
        )
        .themes(required(record.themes, "themes")?)
        .confidence(required(record.confidence, "confidence")?)
        .evolution(evolution);
        for connection in connections {
            builder = builder.connection(connection);
        }
        builder.build()
    }
}

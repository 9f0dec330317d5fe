//! Validated pattern construction
//!
//! [`PatternBuilder`] collects parts and checks every pattern invariant in
//! [`PatternBuilder::build`]. There is no way to obtain a partially built
//! [`Pattern`].

use crate::error::DomainError;
use crate::score::Score;
use crate::types::{Connection, Evolution, Pattern, PatternId};
use indexmap::IndexSet;
use std::collections::HashSet;

/// Builder for [`Pattern`]
#[derive(Debug, Clone)]
pub struct PatternBuilder {
    id: PatternId,
    content: String,
    themes: Vec<String>,
    confidence: f64,
    evolution: Evolution,
    connections: Vec<Connection>,
}

impl PatternBuilder {
    /// Start a pattern with id and content
    ///
    /// Defaults: no themes, confidence 0, stage `"initial"` with empty
    /// history, no connections.
    #[must_use]
    pub fn new(id: impl Into<PatternId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            themes: Vec::new(),
            confidence: 0.0,
            evolution: Evolution::new("initial"),
            connections: Vec::new(),
        }
    }

    /// Add one theme
    #[inline]
    #[must_use]
    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.themes.push(theme.into());
        self
    }

    /// Add several themes
    #[must_use]
    pub fn themes<I, S>(mut self, themes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.themes.extend(themes.into_iter().map(Into::into));
        self
    }

    /// Set confidence
    #[inline]
    #[must_use]
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set evolution
    #[inline]
    #[must_use]
    pub fn evolution(mut self, evolution: Evolution) -> Self {
        self.evolution = evolution;
        self
    }

    /// Add one connection
    #[inline]
    #[must_use]
    pub fn connection(mut self, connection: Connection) -> Self {
        self.connections.push(connection);
        self
    }

    /// Validate and build
    ///
    /// # Errors
    /// Returns the first invariant violation found
    pub fn build(self) -> Result<Pattern, DomainError> {
        if self.id.as_str().is_empty() {
            return Err(DomainError::EmptyField { field: "id" });
        }

        let confidence = Score::new(self.confidence)
            .map_err(|e| DomainError::ConfidenceOutOfRange { value: e.0 })?;

        let mut themes = IndexSet::with_capacity(self.themes.len());
        for theme in self.themes {
            if theme.is_empty() {
                return Err(DomainError::EmptyField { field: "themes" });
            }
            if themes.contains(&theme) {
                return Err(DomainError::DuplicateTheme { theme });
            }
            themes.insert(theme);
        }

        let mut seen = HashSet::with_capacity(self.connections.len());
        for connection in &self.connections {
            if connection.connection_id.is_empty() {
                return Err(DomainError::EmptyField {
                    field: "connectionId",
                });
            }
            if connection.target_id.as_str().is_empty() {
                return Err(DomainError::EmptyField { field: "targetId" });
            }
            if !seen.insert(connection.connection_id.as_str()) {
                return Err(DomainError::DuplicateConnection {
                    connection_id: connection.connection_id.clone(),
                });
            }
        }

        Ok(Pattern {
            id: self.id,
            content: self.content,
            themes,
            confidence,
            evolution: self.evolution,
            connections: self.connections,
        })
    }
}

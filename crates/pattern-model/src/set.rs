//! Working set of patterns
//!
//! [`PatternSet`] is the ordered collection a viewer resolves ids, themes and
//! connection targets against. It keeps a theme index so that theme lookups
//! do not scan every pattern.

use crate::error::DomainError;
use crate::types::{Pattern, PatternId};
use indexmap::IndexMap;
use std::sync::Arc;

/// Ordered, theme-indexed working set of patterns
///
/// # Invariants
/// - ids are unique
/// - every connection target resolves to a member
/// - iteration order is insertion order
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: IndexMap<PatternId, Arc<Pattern>>,
    by_theme: IndexMap<String, Vec<PatternId>>,
}

impl PatternSet {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from patterns, resolving connections across all of them
    ///
    /// Patterns may reference each other in any order.
    ///
    /// # Errors
    /// - [`DomainError::DuplicatePatternId`] if two different patterns share an id
    /// - [`DomainError::UnresolvedConnection`] if a target is not in the set
    pub fn from_patterns<I>(patterns: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = Pattern>,
    {
        let mut set = Self::new();
        for pattern in patterns {
            if let Some(existing) = set.patterns.get(pattern.id()) {
                if **existing != pattern {
                    return Err(DomainError::DuplicatePatternId {
                        id: pattern.id().to_string(),
                    });
                }
                continue;
            }
            set.admit(pattern);
        }

        for pattern in set.patterns.values() {
            set.check_targets(pattern)?;
        }

        tracing::debug!(
            patterns = set.len(),
            themes = set.by_theme.len(),
            "built pattern set"
        );
        Ok(set)
    }

    /// Insert one pattern
    ///
    /// Inserting a pattern identical to a member returns the member.
    ///
    /// # Errors
    /// - [`DomainError::DuplicatePatternId`] if a different pattern has this id
    /// - [`DomainError::UnresolvedConnection`] if a target is neither a member
    ///   nor the pattern itself
    pub fn insert(&mut self, pattern: Pattern) -> Result<Arc<Pattern>, DomainError> {
        if let Some(existing) = self.patterns.get(pattern.id()) {
            if **existing == pattern {
                return Ok(Arc::clone(existing));
            }
            tracing::warn!(id = %pattern.id(), "rejected pattern with taken id");
            return Err(DomainError::DuplicatePatternId {
                id: pattern.id().to_string(),
            });
        }

        for connection in pattern.connections() {
            let target = connection.target_id.as_str();
            if target != pattern.id().as_str() && !self.contains(target) {
                tracing::warn!(
                    id = %pattern.id(),
                    connection = %connection.connection_id,
                    target = %connection.target_id,
                    "rejected pattern with unresolved connection"
                );
                return Err(DomainError::UnresolvedConnection {
                    connection_id: connection.connection_id.clone(),
                    target_id: connection.target_id.to_string(),
                });
            }
        }

        Ok(self.admit(pattern))
    }

    fn admit(&mut self, pattern: Pattern) -> Arc<Pattern> {
        let pattern = Arc::new(pattern);
        for theme in pattern.themes() {
            self.by_theme
                .entry(theme.to_string())
                .or_default()
                .push(pattern.id().clone());
        }
        self.patterns
            .insert(pattern.id().clone(), Arc::clone(&pattern));
        pattern
    }

    fn check_targets(&self, pattern: &Pattern) -> Result<(), DomainError> {
        match pattern
            .connections()
            .iter()
            .find(|c| !self.contains(c.target_id.as_str()))
        {
            Some(c) => Err(DomainError::UnresolvedConnection {
                connection_id: c.connection_id.clone(),
                target_id: c.target_id.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Lookup by id
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<Pattern>> {
        self.patterns.get(id)
    }

    /// Check membership by id
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.patterns.contains_key(id)
    }

    /// Number of patterns
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Patterns in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Pattern>> + '_ {
        self.patterns.values()
    }

    /// Patterns carrying `theme`, in insertion order
    ///
    /// Empty for an unknown theme.
    #[must_use]
    pub fn with_theme(&self, theme: &str) -> Vec<Arc<Pattern>> {
        self.by_theme
            .get(theme)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.patterns.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Distinct themes in first-seen order
    pub fn themes(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_theme.keys().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a PatternSet {
    type Item = &'a Arc<Pattern>;
    type IntoIter = indexmap::map::Values<'a, PatternId, Arc<Pattern>>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.values()
    }
}

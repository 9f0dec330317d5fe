//! External pattern sources
//!
//! The view layer never fetches data itself. A [`PatternSource`] supplies
//! patterns; [`InMemorySource`] serves fixtures.

use crate::error::ViewerError;
use crate::store::PatternStore;
use crate::theme::ThemeLookup;
use async_trait::async_trait;
use pattern_model::{DomainError, Pattern, PatternId, PatternSet};

/// Capability to fetch patterns
#[async_trait]
pub trait PatternSource: Send + Sync {
    /// Fetch one pattern by id
    async fn fetch_pattern(&self, id: &PatternId) -> Result<Pattern, DomainError>;

    /// Fetch every available pattern
    async fn fetch_all(&self) -> Result<Vec<Pattern>, DomainError>;
}

/// Fixture-backed source
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    patterns: PatternSet,
}

impl InMemorySource {
    /// Serve an existing working set
    #[inline]
    #[must_use]
    pub fn new(patterns: PatternSet) -> Self {
        Self { patterns }
    }

    /// Parse a JSON array of patterns
    ///
    /// # Errors
    /// Returns the first malformed pattern or set-level violation
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let patterns = Pattern::list_from_json(json)?;
        Ok(Self::new(PatternSet::from_patterns(patterns)?))
    }

    /// Number of patterns served
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
}

#[async_trait]
impl PatternSource for InMemorySource {
    async fn fetch_pattern(&self, id: &PatternId) -> Result<Pattern, DomainError> {
        self.patterns
            .get(id.as_str())
            .map(|p| Pattern::clone(p))
            .ok_or_else(|| DomainError::PatternNotFound { id: id.to_string() })
    }

    async fn fetch_all(&self) -> Result<Vec<Pattern>, DomainError> {
        Ok(self.patterns.iter().map(|p| Pattern::clone(p)).collect())
    }
}

/// Build a store from everything `source` serves
///
/// # Errors
/// Returns error if fetching fails or the patterns do not form a valid set
pub async fn load_store<S, L>(source: &S, lookup: L) -> Result<PatternStore, ViewerError>
where
    S: PatternSource + ?Sized,
    L: ThemeLookup + 'static,
{
    let patterns = source.fetch_all().await?;
    let set = PatternSet::from_patterns(patterns)?;
    tracing::info!(patterns = set.len(), "loaded pattern store");
    Ok(PatternStore::with_lookup(set, lookup))
}

//! Pattern view-model
//!
//! [`PatternStore`] holds the working set, the selected pattern and the active
//! theme with its derived data. Selection never mutates pattern contents.

use crate::theme::{IndexedThemeLookup, ThemeDetails, ThemeLookup};
use pattern_model::{Connection, DomainError, Pattern, PatternSet};
use std::fmt;
use std::sync::Arc;

/// Active theme and the data derived from it
#[derive(Debug, Clone)]
struct ActiveTheme {
    details: ThemeDetails,
    related: Vec<Arc<Pattern>>,
}

/// Selection state over a working set of patterns
pub struct PatternStore {
    patterns: PatternSet,
    lookup: Box<dyn ThemeLookup>,
    current: Option<Arc<Pattern>>,
    theme: Option<ActiveTheme>,
}

impl fmt::Debug for PatternStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternStore")
            .field("patterns", &self.patterns.len())
            .field("current", &self.current.as_ref().map(|p| p.id()))
            .field("theme", &self.active_theme())
            .finish_non_exhaustive()
    }
}

impl Default for PatternStore {
    fn default() -> Self {
        Self::new(PatternSet::new())
    }
}

impl PatternStore {
    /// Create store over `patterns` with the indexed theme lookup
    #[inline]
    #[must_use]
    pub fn new(patterns: PatternSet) -> Self {
        Self::with_lookup(patterns, IndexedThemeLookup::new())
    }

    /// Create store with an explicit theme lookup
    #[must_use]
    pub fn with_lookup(patterns: PatternSet, lookup: impl ThemeLookup + 'static) -> Self {
        Self {
            patterns,
            lookup: Box::new(lookup),
            current: None,
            theme: None,
        }
    }

    /// Select a pattern
    ///
    /// `None` is a no-op. Selecting the pattern that is already selected keeps
    /// the active theme; any other pattern clears it. The pattern joins the
    /// working set if it is not already a member.
    ///
    /// # Errors
    /// Returns error if the pattern conflicts with the working set
    pub fn select_pattern(&mut self, pattern: Option<Pattern>) -> Result<(), DomainError> {
        let Some(pattern) = pattern else {
            return Ok(());
        };
        let pattern = self.patterns.insert(pattern)?;
        self.set_current(pattern);
        Ok(())
    }

    /// Select a pattern already in the working set
    ///
    /// # Errors
    /// Returns [`DomainError::PatternNotFound`] for an unknown id
    pub fn select_pattern_by_id(&mut self, id: &str) -> Result<(), DomainError> {
        let pattern = self
            .patterns
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::PatternNotFound { id: id.to_string() })?;
        self.set_current(pattern);
        Ok(())
    }

    fn set_current(&mut self, pattern: Arc<Pattern>) {
        let same = self
            .current
            .as_ref()
            .is_some_and(|c| Arc::ptr_eq(c, &pattern));
        if same {
            return;
        }
        tracing::debug!(id = %pattern.id(), "pattern selected");
        self.current = Some(pattern);
        self.theme = None;
    }

    /// Select one of the current pattern's themes
    ///
    /// # Errors
    /// - [`DomainError::NoPatternSelected`] if nothing is selected
    /// - [`DomainError::UnknownTheme`] if the current pattern lacks `theme`
    /// - [`DomainError::StrengthOutOfRange`] if the lookup misbehaves
    pub fn select_theme(&mut self, theme: &str) -> Result<ThemeDetails, DomainError> {
        let current = self.current.clone().ok_or(DomainError::NoPatternSelected)?;
        if !current.has_theme(theme) {
            return Err(DomainError::UnknownTheme {
                theme: theme.to_string(),
            });
        }

        let metrics = self.lookup.describe(theme, &current, &self.patterns);
        let details = ThemeDetails::from_metrics(theme, metrics).map_err(|err| {
            tracing::warn!(theme, error = %err, "theme lookup returned invalid metrics");
            err
        })?;
        let related = self.related_patterns(theme);

        tracing::debug!(
            theme,
            related = related.len(),
            strength = details.strength.get(),
            "theme selected"
        );
        self.theme = Some(ActiveTheme {
            details: details.clone(),
            related,
        });
        Ok(details)
    }

    /// Drop the active theme
    #[inline]
    pub fn clear_theme(&mut self) {
        self.theme = None;
    }

    /// Patterns sharing `theme`, excluding the selected pattern
    ///
    /// Insertion order; empty for unknown themes.
    #[must_use]
    pub fn related_patterns(&self, theme: &str) -> Vec<Arc<Pattern>> {
        let mut related = self.patterns.with_theme(theme);
        if let Some(current) = &self.current {
            related.retain(|p| p.id() != current.id());
        }
        related
    }

    /// Look up a connection on the selected pattern
    ///
    /// `None` if absent or nothing is selected.
    #[must_use]
    pub fn explore_connection(&self, connection_id: &str) -> Option<&Connection> {
        self.current.as_ref()?.connection(connection_id)
    }

    /// Pattern a connection of the selected pattern points at
    #[must_use]
    pub fn connection_target(&self, connection_id: &str) -> Option<Arc<Pattern>> {
        let connection = self.explore_connection(connection_id)?;
        self.patterns.get(connection.target_id.as_str()).cloned()
    }

    /// Selected pattern
    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<&Arc<Pattern>> {
        self.current.as_ref()
    }

    /// Active theme key
    #[inline]
    #[must_use]
    pub fn active_theme(&self) -> Option<&str> {
        self.theme.as_ref().map(|t| t.details.theme.as_str())
    }

    /// Details of the active theme
    #[inline]
    #[must_use]
    pub fn theme_details(&self) -> Option<&ThemeDetails> {
        self.theme.as_ref().map(|t| &t.details)
    }

    /// Related patterns captured when the active theme was selected
    #[inline]
    #[must_use]
    pub fn active_related(&self) -> &[Arc<Pattern>] {
        self.theme
            .as_ref()
            .map(|t| t.related.as_slice())
            .unwrap_or_default()
    }

    /// Working set
    #[inline]
    #[must_use]
    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{MockThemeLookup, ThemeMetrics};
    use mockall::predicate::eq;
    use pattern_model::PatternBuilder;

    fn p1() -> Pattern {
        PatternBuilder::new("p1", "Learning happens through natural connections")
            .themes(["learning", "growth"])
            .confidence(0.85)
            .build()
            .unwrap()
    }

    fn p2() -> Pattern {
        PatternBuilder::new("p2", "Understanding deepens through exploration")
            .themes(["learning", "depth"])
            .confidence(0.75)
            .connection(Connection::new("c1", "direct", 0.8, "p1", "builds on p1").unwrap())
            .build()
            .unwrap()
    }

    fn store() -> PatternStore {
        PatternStore::new(PatternSet::from_patterns([p1(), p2()]).unwrap())
    }

    #[test]
    fn select_none_is_noop() {
        let mut store = store();
        store.select_pattern(None).unwrap();
        assert!(store.current().is_none());

        store.select_pattern(Some(p1())).unwrap();
        store.select_pattern(None).unwrap();
        assert_eq!(store.current().unwrap().id().as_str(), "p1");
    }

    #[test]
    fn select_theme_scenario() {
        let mut store = PatternStore::default();
        store.select_pattern(Some(p1())).unwrap();

        let details = store.select_theme("learning").unwrap();
        assert!((0.0..=1.0).contains(&details.strength.get()));
        assert!(!details.description.is_empty());
        assert!(details.description.contains("learning"));
        assert_eq!(store.active_theme(), Some("learning"));
    }

    #[test]
    fn select_theme_requires_selection_and_membership() {
        let mut store = store();
        assert_eq!(
            store.select_theme("learning").unwrap_err(),
            DomainError::NoPatternSelected
        );

        store.select_pattern_by_id("p1").unwrap();
        assert_eq!(
            store.select_theme("depth").unwrap_err(),
            DomainError::UnknownTheme {
                theme: "depth".into()
            }
        );
        assert!(store.active_theme().is_none());
    }

    #[test]
    fn related_patterns_exclude_selection() {
        let mut store = store();
        store.select_pattern_by_id("p1").unwrap();

        let related = store.related_patterns("learning");
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].id().as_str(), "p2");
        assert!(store.related_patterns("unknown").is_empty());

        store.select_theme("learning").unwrap();
        assert_eq!(store.active_related().len(), 1);
    }

    #[test]
    fn reselecting_same_pattern_keeps_theme() {
        let mut store = store();
        store.select_pattern(Some(p1())).unwrap();
        store.select_theme("growth").unwrap();

        store.select_pattern(Some(p1())).unwrap();
        assert_eq!(store.active_theme(), Some("growth"));

        store.select_pattern_by_id("p2").unwrap();
        assert!(store.active_theme().is_none());
        assert!(store.active_related().is_empty());
    }

    #[test]
    fn clear_theme_drops_derived_state() {
        let mut store = store();
        store.select_pattern_by_id("p1").unwrap();
        store.select_theme("learning").unwrap();
        assert_eq!(store.active_related().len(), 1);

        store.clear_theme();
        assert!(store.active_theme().is_none());
        assert!(store.theme_details().is_none());
        assert!(store.active_related().is_empty());
        assert_eq!(store.current().unwrap().id().as_str(), "p1");
    }

    #[test]
    fn select_unknown_id_fails() {
        let mut store = store();
        assert_eq!(
            store.select_pattern_by_id("nope").unwrap_err(),
            DomainError::PatternNotFound { id: "nope".into() }
        );
    }

    #[test]
    fn select_conflicting_pattern_fails() {
        let mut store = store();
        let impostor = PatternBuilder::new("p1", "different").build().unwrap();
        assert_eq!(
            store.select_pattern(Some(impostor)).unwrap_err().code(),
            "duplicate_pattern_id"
        );
        assert!(store.current().is_none());
    }

    #[test]
    fn explore_connection_lookup() {
        let mut store = store();
        assert!(store.explore_connection("c1").is_none());

        store.select_pattern_by_id("p2").unwrap();
        let connection = store.explore_connection("c1").unwrap();
        assert_eq!(connection.target_id.as_str(), "p1");
        assert_eq!(store.connection_target("c1").unwrap().id().as_str(), "p1");
        assert!(store.explore_connection("missing").is_none());
        assert!(store.connection_target("missing").is_none());
    }

    #[test]
    fn explore_missing_on_empty_connections() {
        let mut store = PatternStore::default();
        store.select_pattern(Some(p1())).unwrap();
        assert!(store.explore_connection("missing").is_none());
    }

    #[test]
    fn lookup_is_injected() {
        let mut lookup = MockThemeLookup::new();
        lookup
            .expect_describe()
            .with(eq("growth"), mockall::predicate::always(), mockall::predicate::always())
            .times(1)
            .returning(|_, _, _| ThemeMetrics {
                related_pattern_count: 7,
                strength: 0.25,
                description: "custom growth text".into(),
            });

        let mut store =
            PatternStore::with_lookup(PatternSet::from_patterns([p1()]).unwrap(), lookup);
        store.select_pattern_by_id("p1").unwrap();
        let details = store.select_theme("growth").unwrap();

        assert_eq!(details.related_pattern_count, 7);
        assert_eq!(details.strength.get(), 0.25);
        assert_eq!(details.description, "custom growth text");
    }

    #[test]
    fn invalid_lookup_output_is_domain_error() {
        let mut lookup = MockThemeLookup::new();
        lookup.expect_describe().returning(|_, _, _| ThemeMetrics {
            related_pattern_count: 1,
            strength: f64::NAN,
            description: String::new(),
        });

        let mut store =
            PatternStore::with_lookup(PatternSet::from_patterns([p1()]).unwrap(), lookup);
        store.select_pattern_by_id("p1").unwrap();
        let err = store.select_theme("learning").unwrap_err();
        assert_eq!(err.code(), "strength_out_of_range");
        assert!(store.active_theme().is_none());
    }
}

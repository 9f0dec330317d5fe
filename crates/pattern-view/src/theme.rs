//! Theme lookup capability
//!
//! Theme details come from an injected [`ThemeLookup`] so that the store never
//! invents values inline. Two implementations ship with the crate:
//! - [`IndexedThemeLookup`]: derived from the working set, deterministic
//! - [`SeededThemeLookup`]: reproducible placeholder values from a seeded RNG

use pattern_model::{DomainError, Pattern, PatternSet, Score};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Raw theme metrics as produced by a lookup
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeMetrics {
    /// Number of patterns related through the theme
    pub related_pattern_count: usize,
    /// Theme strength; validated by the store
    pub strength: f64,
    /// Human-readable description; empty means "use the default"
    pub description: String,
}

/// Validated theme details for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDetails {
    /// Theme key
    pub theme: String,
    /// Number of related patterns
    pub related_pattern_count: usize,
    /// Theme strength in [0, 1]
    pub strength: Score,
    /// Description mentioning the theme
    pub description: String,
}

impl ThemeDetails {
    /// Validate raw metrics for `theme`
    ///
    /// An empty description is replaced with [`default_description`].
    ///
    /// # Errors
    /// Returns [`DomainError::StrengthOutOfRange`] for a strength outside [0, 1]
    pub fn from_metrics(theme: &str, metrics: ThemeMetrics) -> Result<Self, DomainError> {
        let strength = Score::new(metrics.strength)
            .map_err(|e| DomainError::StrengthOutOfRange { value: e.0 })?;
        let description = if metrics.description.trim().is_empty() {
            default_description(theme)
        } else {
            metrics.description
        };
        Ok(Self {
            theme: theme.to_string(),
            related_pattern_count: metrics.related_pattern_count,
            strength,
            description,
        })
    }
}

/// Description used when a lookup has nothing better
#[must_use]
pub fn default_description(theme: &str) -> String {
    format!("Theme \"{theme}\" represents a key pattern in understanding evolution.")
}

/// Source of theme details
///
/// `selected` is the pattern whose theme was clicked; it is always a member
/// of `patterns`.
#[cfg_attr(test, mockall::automock)]
pub trait ThemeLookup {
    /// Produce metrics for `theme`
    fn describe(&mut self, theme: &str, selected: &Pattern, patterns: &PatternSet)
        -> ThemeMetrics;
}

/// Deterministic lookup derived from the working set
///
/// - count: other patterns carrying the theme
/// - strength: mean confidence of every pattern carrying the theme
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexedThemeLookup;

impl IndexedThemeLookup {
    /// Create lookup
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ThemeLookup for IndexedThemeLookup {
    fn describe(&mut self, theme: &str, selected: &Pattern, patterns: &PatternSet) -> ThemeMetrics {
        let carriers = patterns.with_theme(theme);
        let related_pattern_count = carriers.iter().filter(|p| p.id() != selected.id()).count();

        let strength = if carriers.is_empty() {
            selected.confidence().get()
        } else {
            let total: f64 = carriers.iter().map(|p| p.confidence().get()).sum();
            #[allow(clippy::cast_precision_loss)]
            let mean = total / carriers.len() as f64;
            mean
        };

        ThemeMetrics {
            related_pattern_count,
            // rounding can push the mean a hair past 1.0
            strength: Score::saturating(strength).get(),
            description: default_description(theme),
        }
    }
}

/// Placeholder lookup with reproducible pseudo-random values
///
/// Count lies in `1..=10`, strength in `[0, 1)`. The same seed always yields
/// the same sequence.
#[derive(Debug, Clone)]
pub struct SeededThemeLookup {
    rng: StdRng,
}

impl SeededThemeLookup {
    /// Create lookup from seed
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ThemeLookup for SeededThemeLookup {
    fn describe(&mut self, theme: &str, _selected: &Pattern, _patterns: &PatternSet) -> ThemeMetrics {
        ThemeMetrics {
            related_pattern_count: self.rng.random_range(1..=10),
            strength: self.rng.random::<f64>(),
            description: default_description(theme),
        }
    }
}

impl<T: ThemeLookup + ?Sized> ThemeLookup for Box<T> {
    fn describe(&mut self, theme: &str, selected: &Pattern, patterns: &PatternSet) -> ThemeMetrics {
        (**self).describe(theme, selected, patterns)
    }
}

//! Viewer configuration
//!
//! [`LensConfig`] is read from TOML. Every field has a default, so an empty
//! file is a valid configuration.

use crate::mode::Perspective;
use crate::theme::{IndexedThemeLookup, SeededThemeLookup, ThemeLookup};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which [`ThemeLookup`] to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeLookupKind {
    /// Derived from the working set
    #[default]
    Indexed,
    /// Seeded placeholder values
    Seeded,
}

/// Viewer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    /// Fixture file (JSON array of patterns); built-in fixtures when unset
    pub fixtures: Option<PathBuf>,
    /// Theme lookup implementation
    pub theme_lookup: ThemeLookupKind,
    /// Seed for the seeded lookup
    pub seed: u64,
    /// Pattern selected on start
    pub default_pattern: Option<String>,
    /// Perspective shown on start
    pub default_perspective: Perspective,
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            fixtures: None,
            theme_lookup: ThemeLookupKind::Indexed,
            seed: 42,
            default_pattern: None,
            default_perspective: Perspective::Individual,
            log_filter: "pattern_view=info,pattern_lens=info".to_string(),
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for [`LensConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl LensConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for invalid TOML or field types
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// With fixture file
    #[inline]
    #[must_use]
    pub fn with_fixtures(mut self, path: impl Into<PathBuf>) -> Self {
        self.fixtures = Some(path.into());
        self
    }

    /// With theme lookup kind
    #[inline]
    #[must_use]
    pub fn with_theme_lookup(mut self, kind: ThemeLookupKind) -> Self {
        self.theme_lookup = kind;
        self
    }

    /// With seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// With default pattern
    #[inline]
    #[must_use]
    pub fn with_default_pattern(mut self, id: impl Into<String>) -> Self {
        self.default_pattern = Some(id.into());
        self
    }

    /// Build the configured theme lookup
    #[must_use]
    pub fn build_theme_lookup(&self) -> Box<dyn ThemeLookup> {
        match self.theme_lookup {
            ThemeLookupKind::Indexed => Box::new(IndexedThemeLookup::new()),
            ThemeLookupKind::Seeded => Box::new(SeededThemeLookup::new(self.seed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(LensConfig::from_toml_str("").unwrap(), LensConfig::default());
    }

    #[test]
    fn parses_fields() {
        let config = LensConfig::from_toml_str(
            r#"
            fixtures = "data/patterns.json"
            theme_lookup = "seeded"
            seed = 7
            default_pattern = "example-2"
            default_perspective = "shared"
            "#,
        )
        .unwrap();

        assert_eq!(config.fixtures, Some(PathBuf::from("data/patterns.json")));
        assert_eq!(config.theme_lookup, ThemeLookupKind::Seeded);
        assert_eq!(config.seed, 7);
        assert_eq!(config.default_pattern.as_deref(), Some("example-2"));
        assert_eq!(config.default_perspective, Perspective::Shared);
    }

    #[test]
    fn rejects_unknown_lookup() {
        assert!(matches!(
            LensConfig::from_toml_str("theme_lookup = \"random\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed = 99").unwrap();

        let config = LensConfig::load(file.path()).unwrap();
        assert_eq!(config.seed, 99);

        let missing = LensConfig::load(file.path().with_extension("absent"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn builder_methods() {
        let config = LensConfig::new()
            .with_seed(3)
            .with_theme_lookup(ThemeLookupKind::Seeded)
            .with_fixtures("f.json")
            .with_default_pattern("p1");
        assert_eq!(config.seed, 3);
        assert_eq!(config.fixtures.as_deref(), Some(Path::new("f.json")));
        assert_eq!(config.default_pattern.as_deref(), Some("p1"));
    }
}

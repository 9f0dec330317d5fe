//! View-mode toggles
//!
//! Pure UI state: switching modes changes which sub-view renders and nothing
//! else.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Explorer sub-view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplorerView {
    /// Themes, related patterns, evolution timeline
    #[default]
    Outside,
    /// How the system works under the hood
    Inside,
}

impl ExplorerView {
    /// The other view
    #[inline]
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Outside => Self::Inside,
            Self::Inside => Self::Outside,
        }
    }

    /// Flip in place
    #[inline]
    pub fn toggle(&mut self) {
        *self = self.toggled();
    }
}

/// Whose understanding is being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perspective {
    /// Personal insights
    #[default]
    Individual,
    /// Group insights
    Shared,
    /// How it works
    System,
}

impl Perspective {
    /// All perspectives in display order
    pub const ALL: [Self; 3] = [Self::Individual, Self::Shared, Self::System];

    /// Display heading
    #[must_use]
    pub fn heading(self) -> &'static str {
        match self {
            Self::Individual => "Your Understanding",
            Self::Shared => "Shared Understanding",
            Self::System => "System View",
        }
    }
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Individual => "individual",
            Self::Shared => "shared",
            Self::System => "system",
        };
        f.write_str(name)
    }
}

/// Unrecognized perspective name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown perspective '{0}' (expected individual, shared or system)")]
pub struct UnknownPerspective(pub String);

impl FromStr for Perspective {
    type Err = UnknownPerspective;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPerspective(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explorer_toggle_round_trips() {
        let mut view = ExplorerView::default();
        view.toggle();
        assert_eq!(view, ExplorerView::Inside);
        view.toggle();
        assert_eq!(view, ExplorerView::Outside);
    }

    #[test]
    fn perspective_parse() {
        assert_eq!("shared".parse::<Perspective>().unwrap(), Perspective::Shared);
        assert_eq!("SYSTEM".parse::<Perspective>().unwrap(), Perspective::System);
        assert!("group".parse::<Perspective>().is_err());
    }

    #[test]
    fn perspective_serde_names() {
        assert_eq!(
            serde_json::to_string(&Perspective::Individual).unwrap(),
            "\"individual\""
        );
    }
}

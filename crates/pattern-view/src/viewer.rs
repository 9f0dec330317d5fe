//! Interactive pattern viewer
//!
//! [`PatternViewer`] composes a [`PatternStore`] with the hydration gate, the
//! view-mode toggles and a [`FaultBoundary`]. Its output is a
//! [`ViewSnapshot`]: the derived view state a display surface draws.
//!
//! Lifecycle:
//! 1. Construct with props (working set, optional pattern)
//! 2. [`mount`](PatternViewer::mount) once; before that, rendering yields a
//!    placeholder and interactions fail with [`ViewerError::NotHydrated`]
//! 3. Interact; render at any point
//!
//! Failures while applying a pattern are captured by the boundary and replace
//! the rendered subtree. Failures inside interaction handlers are returned to
//! the caller instead.

use crate::boundary::{Fallback, FaultBoundary};
use crate::error::ViewerError;
use crate::hydration::{HydrationGate, HydrationState};
use crate::mode::{ExplorerView, Perspective};
use crate::store::PatternStore;
use crate::theme::ThemeDetails;
use pattern_model::{Connection, Pattern};
use serde::Serialize;

/// Render output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "lowercase")]
pub enum Rendered<T = ViewSnapshot> {
    /// Pre-hydration loading placeholder
    Placeholder,
    /// Interactive view
    View(T),
    /// Subtree replaced after a failure
    Fallback(Fallback),
}

impl<T> Rendered<T> {
    /// Check for interactive output
    #[inline]
    #[must_use]
    pub fn is_view(&self) -> bool {
        matches!(self, Self::View(_))
    }

    /// Interactive output, if any
    #[inline]
    #[must_use]
    pub fn view(&self) -> Option<&T> {
        match self {
            Self::View(v) => Some(v),
            _ => None,
        }
    }
}

/// Theme chip with active flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeChip {
    pub name: String,
    pub active: bool,
}

/// Selected pattern header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternSummary {
    pub id: String,
    pub content: String,
    pub confidence_percent: u8,
    pub stage: String,
    pub themes: Vec<ThemeChip>,
}

/// Related pattern card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedSummary {
    pub id: String,
    pub content: String,
    pub themes: Vec<ThemeChip>,
}

/// Active theme panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemePanel {
    pub details: ThemeDetails,
    pub related: Vec<RelatedSummary>,
}

/// One evolution timeline entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub stage: String,
    pub timestamp: String,
    pub summary: Option<String>,
    /// Most recent step
    pub current: bool,
}

/// Connection row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionSummary {
    pub connection_id: String,
    pub kind: String,
    pub strength_percent: u8,
    pub target_id: String,
    /// Target content, when the target is in the working set
    pub target_content: Option<String>,
    pub description: String,
}

/// Derived view state
///
/// Outside-view sections (`theme`, `timeline`) are empty while the inside
/// view is showing; the underlying selection state is kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub view: ExplorerView,
    pub perspective: Perspective,
    pub pattern: Option<PatternSummary>,
    pub theme: Option<ThemePanel>,
    pub timeline: Vec<TimelineEntry>,
    pub connections: Vec<ConnectionSummary>,
    pub explored: Option<ConnectionSummary>,
}

/// Interactive pattern viewer component
#[derive(Debug)]
pub struct PatternViewer {
    gate: HydrationGate,
    store: PatternStore,
    boundary: FaultBoundary,
    view: ExplorerView,
    perspective: Perspective,
    pending: Option<Pattern>,
    explored: Option<String>,
    fault: Option<Fallback>,
}

impl PatternViewer {
    /// Create an unmounted viewer over `store`
    #[must_use]
    pub fn new(store: PatternStore) -> Self {
        Self {
            gate: HydrationGate::new(),
            store,
            boundary: FaultBoundary::new(),
            view: ExplorerView::default(),
            perspective: Perspective::default(),
            pending: None,
            explored: None,
            fault: None,
        }
    }

    /// With initial pattern, applied on mount
    #[inline]
    #[must_use]
    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pending = Some(pattern);
        self
    }

    /// With a custom fault boundary
    #[inline]
    #[must_use]
    pub fn with_boundary(mut self, boundary: FaultBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// With initial perspective
    #[inline]
    #[must_use]
    pub fn with_perspective(mut self, perspective: Perspective) -> Self {
        self.perspective = perspective;
        self
    }

    /// Hydration state
    #[inline]
    #[must_use]
    pub fn state(&self) -> HydrationState {
        self.gate.state()
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &PatternStore {
        &self.store
    }

    /// Mount on the client
    ///
    /// Runs once; later calls do nothing. Applies the pending pattern.
    pub fn mount(&mut self) {
        if !self.gate.mount() {
            return;
        }
        let pending = self.pending.take();
        self.apply_pattern(pending);
    }

    /// Supply a new pattern prop
    ///
    /// Before mount it is held until [`mount`](Self::mount). A failure to
    /// apply it trips the fault boundary.
    pub fn set_pattern(&mut self, pattern: Option<Pattern>) {
        if self.gate.is_hydrated() {
            self.apply_pattern(pattern);
        } else if pattern.is_some() {
            self.pending = pattern;
        }
    }

    fn apply_pattern(&mut self, pattern: Option<Pattern>) {
        if pattern.is_none() {
            return;
        }
        let before = self.store.current().cloned();
        if let Err(err) = self.store.select_pattern(pattern) {
            let err = ViewerError::from(err);
            tracing::warn!(error = %err, "pattern rejected; showing fallback");
            self.fault = Some(self.boundary.fallback_for(&err));
            return;
        }
        self.fault = None;
        let changed = match (&before, self.store.current()) {
            (Some(a), Some(b)) => a.id() != b.id(),
            (None, Some(_)) => true,
            _ => false,
        };
        if changed {
            self.explored = None;
        }
    }

    /// Theme chip clicked
    ///
    /// # Errors
    /// Fails before hydration or for a theme the selected pattern lacks
    pub fn click_theme(&mut self, theme: &str) -> Result<ThemeDetails, ViewerError> {
        self.gate.ensure_hydrated()?;
        Ok(self.store.select_theme(theme)?)
    }

    /// Related pattern card clicked
    ///
    /// Choosing the pattern already selected keeps theme and exploration.
    ///
    /// # Errors
    /// Fails before hydration or for an unknown id
    pub fn select_related(&mut self, id: &str) -> Result<(), ViewerError> {
        self.gate.ensure_hydrated()?;
        let changed = self.store.current().map_or(true, |c| c.id().as_str() != id);
        self.store.select_pattern_by_id(id)?;
        if changed {
            self.explored = None;
        }
        Ok(())
    }

    /// Connection explored
    ///
    /// Returns `None` for an unknown connection id, leaving the previous
    /// exploration in place.
    ///
    /// # Errors
    /// Fails before hydration
    pub fn explore_connection(
        &mut self,
        connection_id: &str,
    ) -> Result<Option<Connection>, ViewerError> {
        self.gate.ensure_hydrated()?;
        let found = self.store.explore_connection(connection_id).cloned();
        if found.is_some() {
            self.explored = Some(connection_id.to_string());
        }
        Ok(found)
    }

    /// Toggle inside/outside view
    ///
    /// # Errors
    /// Fails before hydration
    pub fn toggle_view(&mut self) -> Result<ExplorerView, ViewerError> {
        self.gate.ensure_hydrated()?;
        self.view.toggle();
        Ok(self.view)
    }

    /// Switch perspective
    ///
    /// # Errors
    /// Fails before hydration
    pub fn set_perspective(&mut self, perspective: Perspective) -> Result<(), ViewerError> {
        self.gate.ensure_hydrated()?;
        self.perspective = perspective;
        Ok(())
    }

    /// Render the current view state
    #[must_use]
    pub fn render(&self) -> Rendered {
        self.render_with(|snapshot| Ok(snapshot.clone()))
    }

    /// Render through `surface`, inside the fault boundary
    pub fn render_with<T, F>(&self, surface: F) -> Rendered<T>
    where
        F: FnOnce(&ViewSnapshot) -> Result<T, ViewerError>,
    {
        if !self.gate.is_hydrated() {
            return Rendered::Placeholder;
        }
        if let Some(fallback) = &self.fault {
            return Rendered::Fallback(fallback.clone());
        }
        match self.boundary.render(|| surface(&self.snapshot()?)) {
            Ok(output) => Rendered::View(output),
            Err(fallback) => Rendered::Fallback(fallback),
        }
    }

    fn snapshot(&self) -> Result<ViewSnapshot, ViewerError> {
        let current = self.store.current();
        let active = self.store.active_theme();

        if let (Some(theme), Some(pattern)) = (active, current) {
            if !pattern.has_theme(theme) {
                return Err(ViewerError::unexpected(format!(
                    "active theme '{theme}' not on pattern '{}'",
                    pattern.id()
                )));
            }
        }

        let pattern = current.map(|p| PatternSummary {
            id: p.id().to_string(),
            content: p.content().to_string(),
            confidence_percent: p.confidence().percent(),
            stage: p.evolution().stage().to_string(),
            themes: chips(p, active),
        });

        let outside = self.view == ExplorerView::Outside;

        let theme = match (outside, self.store.theme_details()) {
            (true, Some(details)) => Some(ThemePanel {
                details: details.clone(),
                related: self
                    .store
                    .active_related()
                    .iter()
                    .map(|p| RelatedSummary {
                        id: p.id().to_string(),
                        content: p.content().to_string(),
                        themes: chips(p, active),
                    })
                    .collect(),
            }),
            _ => None,
        };

        let timeline = match (outside, current) {
            (true, Some(p)) => {
                let history = p.evolution().history();
                history
                    .iter()
                    .enumerate()
                    .map(|(i, step)| TimelineEntry {
                        stage: step.stage.clone(),
                        timestamp: step.timestamp.to_rfc3339(),
                        summary: step.summary().map(str::to_string),
                        current: i + 1 == history.len(),
                    })
                    .collect()
            }
            _ => Vec::new(),
        };

        let connections = current
            .map(|p| p.connections().iter().map(|c| self.summarize(c)).collect())
            .unwrap_or_default();

        let explored = self
            .explored
            .as_deref()
            .and_then(|id| self.store.explore_connection(id))
            .map(|c| self.summarize(c));

        Ok(ViewSnapshot {
            view: self.view,
            perspective: self.perspective,
            pattern,
            theme,
            timeline,
            connections,
            explored,
        })
    }

    fn summarize(&self, connection: &Connection) -> ConnectionSummary {
        ConnectionSummary {
            connection_id: connection.connection_id.clone(),
            kind: connection.kind.clone(),
            strength_percent: connection.strength.percent(),
            target_id: connection.target_id.to_string(),
            target_content: self
                .store
                .patterns()
                .get(connection.target_id.as_str())
                .map(|t| t.content().to_string()),
            description: connection.description.clone(),
        }
    }
}

fn chips(pattern: &Pattern, active: Option<&str>) -> Vec<ThemeChip> {
    pattern
        .themes()
        .map(|name| ThemeChip {
            name: name.to_string(),
            active: active == Some(name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pattern_model::{PatternBuilder, PatternSet};
    use pretty_assertions::assert_eq;

    fn pattern() -> Pattern {
        PatternBuilder::new("p1", "Learning happens through natural connections")
            .themes(["learning", "growth"])
            .confidence(0.85)
            .build()
            .unwrap()
    }

    #[test]
    fn placeholder_before_mount() {
        let mut viewer = PatternViewer::new(PatternStore::default()).with_pattern(pattern());
        assert_eq!(viewer.render(), Rendered::Placeholder);
        assert!(matches!(
            viewer.click_theme("learning"),
            Err(ViewerError::NotHydrated)
        ));
        assert!(matches!(viewer.toggle_view(), Err(ViewerError::NotHydrated)));
        assert!(viewer.store().current().is_none());
    }

    #[test]
    fn mount_applies_pending_pattern() {
        let mut viewer = PatternViewer::new(PatternStore::default()).with_pattern(pattern());
        viewer.mount();
        assert_eq!(viewer.state(), HydrationState::Hydrated);

        let rendered = viewer.render();
        let snapshot = rendered.view().unwrap();
        let summary = snapshot.pattern.as_ref().unwrap();
        assert_eq!(summary.id, "p1");
        assert_eq!(summary.confidence_percent, 85);
    }

    #[test]
    fn same_pattern_is_idempotent() {
        let mut viewer = PatternViewer::new(PatternStore::default()).with_pattern(pattern());
        viewer.mount();
        viewer.click_theme("learning").unwrap();
        let first = viewer.render();

        viewer.set_pattern(Some(pattern()));
        viewer.mount();
        assert_eq!(viewer.render(), first);
    }

    #[test]
    fn inside_view_hides_outside_sections() {
        let mut viewer = PatternViewer::new(PatternStore::default()).with_pattern(pattern());
        viewer.mount();
        viewer.click_theme("growth").unwrap();

        assert_eq!(viewer.toggle_view().unwrap(), ExplorerView::Inside);
        let inside = viewer.render();
        assert!(inside.view().unwrap().theme.is_none());

        viewer.toggle_view().unwrap();
        let outside = viewer.render();
        let panel = outside.view().unwrap().theme.as_ref().unwrap();
        assert_eq!(panel.details.theme, "growth");
    }

    #[test]
    fn conflicting_pattern_trips_boundary() {
        let set = PatternSet::from_patterns([pattern()]).unwrap();
        let mut viewer = PatternViewer::new(PatternStore::new(set));
        viewer.mount();

        let impostor = PatternBuilder::new("p1", "not the same").build().unwrap();
        viewer.set_pattern(Some(impostor));

        match viewer.render() {
            Rendered::Fallback(fallback) => {
                assert_eq!(fallback.code, Some("duplicate_pattern_id"));
            }
            other => panic!("expected fallback, got {other:?}"),
        }

        viewer.set_pattern(Some(pattern()));
        assert!(viewer.render().is_view());
    }

    #[test]
    fn surface_failure_renders_fallback() {
        let mut viewer = PatternViewer::new(PatternStore::default());
        viewer.mount();
        let rendered: Rendered<()> =
            viewer.render_with(|_| Err(ViewerError::unexpected("surface broke")));
        match rendered {
            Rendered::Fallback(f) => assert_eq!(f.message, crate::boundary::UNEXPECTED_MESSAGE),
            other => panic!("expected fallback, got {other:?}"),
        }
    }
}

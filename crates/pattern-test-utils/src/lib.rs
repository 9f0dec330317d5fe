//! Testing utilities for the Pattern Lens workspace
//!
//! Shared fixtures and setup helpers.

#![allow(missing_docs)]

use pattern_model::{
    Change, ChangeKind, Connection, Evolution, EvolutionStep, Pattern, PatternBuilder, PatternSet,
};
use pattern_view::{IndexedThemeLookup, PatternStore, PatternViewer};

pub const CREATED_AT: &str = "2024-01-01T00:00:00.000Z";
pub const DEVELOPED_AT: &str = "2024-02-01T00:00:00.000Z";

pub fn step(stage: &str, timestamp: &str, description: &str) -> EvolutionStep {
    let kind = if stage == "initial" {
        ChangeKind::Creation
    } else {
        ChangeKind::Evolution
    };
    EvolutionStep::at(stage, timestamp)
        .unwrap()
        .with_change(Change::new(kind, description))
}

/// Initial step followed by a "developing" step
pub fn developing_evolution() -> Evolution {
    Evolution::from_history(
        "developing",
        vec![
            step("initial", CREATED_AT, "Pattern discovered"),
            step("developing", DEVELOPED_AT, "Pattern refined"),
        ],
    )
    .unwrap()
}

pub fn connection(id: &str, target: &str, strength: f64) -> Connection {
    let description = format!("Shares themes with {target}");
    Connection::new(id, "thematic", strength, target, description).unwrap()
}

/// `p1` with themes learning and growth at 0.85
pub fn scenario_pattern() -> Pattern {
    PatternBuilder::new("p1", "Learning happens through natural connections")
        .themes(["learning", "growth"])
        .confidence(0.85)
        .build()
        .unwrap()
}

pub fn main_pattern() -> Pattern {
    PatternBuilder::new("pattern-1", "Learning happens through natural connections")
        .themes(["learning", "connections", "natural"])
        .confidence(0.85)
        .evolution(developing_evolution())
        .connection(connection("c-1-3", "pattern-3", 0.7))
        .build()
        .unwrap()
}

pub fn related_patterns() -> Vec<Pattern> {
    vec![
        PatternBuilder::new("pattern-2", "Understanding deepens over time")
            .themes(["understanding", "time", "depth"])
            .confidence(0.75)
            .evolution(developing_evolution())
            .build()
            .unwrap(),
        PatternBuilder::new("pattern-3", "Patterns connect naturally")
            .themes(["patterns", "natural", "connections"])
            .confidence(0.65)
            .evolution(developing_evolution())
            .connection(connection("c-3-1", "pattern-1", 0.7))
            .build()
            .unwrap(),
    ]
}

/// pattern-1 through pattern-3
pub fn learning_set() -> PatternSet {
    let mut patterns = vec![main_pattern()];
    patterns.extend(related_patterns());
    PatternSet::from_patterns(patterns).unwrap()
}

pub fn setup_test_store() -> PatternStore {
    PatternStore::with_lookup(learning_set(), IndexedThemeLookup::new())
}

/// Mounted viewer with pattern-1 selected
pub fn setup_test_viewer() -> PatternViewer {
    let mut viewer = PatternViewer::new(setup_test_store()).with_pattern(main_pattern());
    viewer.mount();
    viewer
}

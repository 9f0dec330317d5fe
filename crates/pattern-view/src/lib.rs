//! Pattern View
//!
//! The view-model behind pattern exploration:
//! - Selects patterns and themes over a working set
//! - Derives theme details through an injected lookup
//! - Gates interaction behind one-time hydration
//! - Isolates render failures behind a fault boundary
//!
//! # Example
//!
//! ```rust
//! use pattern_model::{PatternBuilder, PatternSet};
//! use pattern_view::{PatternStore, PatternViewer};
//!
//! let pattern = PatternBuilder::new("p1", "Learning happens through connections")
//!     .themes(["learning", "growth"])
//!     .confidence(0.85)
//!     .build()
//!     .unwrap();
//!
//! let mut viewer = PatternViewer::new(PatternStore::new(PatternSet::new()))
//!     .with_pattern(pattern);
//! assert!(!viewer.render().is_view());
//!
//! viewer.mount();
//! let details = viewer.click_theme("learning").unwrap();
//! assert!(details.description.contains("learning"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod boundary;
pub mod config;
pub mod error;
pub mod hydration;
pub mod mode;
pub mod source;
pub mod store;
pub mod theme;
pub mod viewer;

// Re-exports for convenience
pub use boundary::{Fallback, FaultBoundary};
pub use config::{ConfigError, LensConfig, ThemeLookupKind};
pub use error::ViewerError;
pub use hydration::{HydrationGate, HydrationState};
pub use mode::{ExplorerView, Perspective};
pub use source::{load_store, InMemorySource, PatternSource};
pub use store::PatternStore;
pub use theme::{IndexedThemeLookup, SeededThemeLookup, ThemeDetails, ThemeLookup, ThemeMetrics};
pub use viewer::{PatternViewer, Rendered, ViewSnapshot};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a viewer
    pub use crate::{
        ExplorerView, LensConfig, PatternSource, PatternStore, PatternViewer, Perspective,
        Rendered, ThemeDetails, ThemeLookup, ViewSnapshot, ViewerError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

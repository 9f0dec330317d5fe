//! Pattern Model
//!
//! Validated data model for pattern exploration.
//!
//! # Core Concepts
//!
//! - [`Pattern`]: Tagged content unit with confidence, evolution and connections
//! - [`PatternBuilder`]: The only way to assemble a pattern from parts
//! - [`Evolution`]: Append-only stage history
//! - [`Connection`]: Typed, strength-weighted relation to another pattern
//! - [`PatternSet`]: Theme-indexed working set with resolved connections
//! - [`Score`]: Value in `[0, 1]` used for confidence and strength
//!
//! # Example
//!
//! ```rust
//! use pattern_model::{PatternBuilder, PatternSet};
//!
//! let pattern = PatternBuilder::new("p1", "Learning happens through connections")
//!     .themes(["learning", "growth"])
//!     .confidence(0.85)
//!     .build()
//!     .unwrap();
//!
//! let set = PatternSet::from_patterns([pattern]).unwrap();
//! assert_eq!(set.with_theme("learning").len(), 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod builder;
mod error;
mod record;
mod score;
mod set;
mod types;

pub use builder::PatternBuilder;
pub use error::DomainError;
pub use score::{OutOfRange, Score};
pub use set::PatternSet;
pub use types::{Change, ChangeKind, Connection, Evolution, EvolutionStep, Pattern, PatternId};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with patterns
    pub use crate::{
        Connection, DomainError, Evolution, EvolutionStep, Pattern, PatternBuilder, PatternId,
        PatternSet, Score,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

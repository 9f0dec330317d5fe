//! Pattern Lens command line viewer
//!
//! Loads pattern fixtures, drives a [`pattern_view::PatternViewer`] through
//! the requested interactions and prints the rendered view.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod app;
pub mod render;

pub use app::{build_cli, resolve_config, run, Report, ShowOptions, BUILTIN_FIXTURES};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

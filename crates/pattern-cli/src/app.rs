//! Command definitions and handlers
//!
//! Handlers return a [`Report`] instead of printing so they can be tested;
//! `main` decides where the body goes and how to exit.

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use pattern_model::{Pattern, PatternId, PatternSet};
use pattern_view::{
    load_store, InMemorySource, LensConfig, PatternSource, PatternViewer, Perspective, Rendered,
    ThemeLookupKind, ViewerError,
};
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Fixtures served when no fixture file is configured
pub const BUILTIN_FIXTURES: &str = include_str!("../fixtures/patterns.json");

/// Command output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub body: String,
    pub success: bool,
}

impl Report {
    fn success(body: String) -> Self {
        Self {
            body,
            success: true,
        }
    }

    fn failure(body: String) -> Self {
        Self {
            body,
            success: false,
        }
    }
}

/// Options of the `show` command
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    pub pattern: Option<String>,
    pub theme: Option<String>,
    pub explore: Option<String>,
    pub inside: bool,
    pub perspective: Option<Perspective>,
    pub json: bool,
}

impl ShowOptions {
    fn from_matches(args: &ArgMatches) -> Self {
        Self {
            pattern: args.get_one::<String>("pattern").cloned(),
            theme: args.get_one::<String>("theme").cloned(),
            explore: args.get_one::<String>("explore").cloned(),
            inside: args.get_flag("inside"),
            perspective: args.get_one::<Perspective>("perspective").copied(),
            json: args.get_flag("json"),
        }
    }
}

pub fn build_cli() -> Command {
    Command::new("pattern-lens")
        .version(crate::VERSION)
        .about("Explore patterns, their themes and connections")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("fixtures")
                .long("fixtures")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("JSON file holding an array of patterns"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .global(true)
                .value_parser(value_parser!(u64))
                .help("Use the seeded theme lookup with this seed"),
        )
        .subcommand(
            Command::new("show")
                .about("Render the view of one pattern")
                .arg(
                    Arg::new("pattern")
                        .long("pattern")
                        .help("Pattern id (defaults to the configured or first pattern)"),
                )
                .arg(
                    Arg::new("theme")
                        .long("theme")
                        .help("Select one of the pattern's themes"),
                )
                .arg(
                    Arg::new("explore")
                        .long("explore")
                        .help("Explore a connection by id"),
                )
                .arg(
                    Arg::new("inside")
                        .long("inside")
                        .action(ArgAction::SetTrue)
                        .help("Show the inside view"),
                )
                .arg(
                    Arg::new("perspective")
                        .long("perspective")
                        .value_parser(value_parser!(Perspective))
                        .help("individual, shared or system"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output the rendered view as JSON"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a fixture file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(Command::new("themes").about("List themes with their pattern counts"))
}

/// Load the configuration named by `--config` and apply flag overrides
///
/// # Errors
/// Returns error if the config file cannot be loaded
pub fn resolve_config(matches: &ArgMatches) -> Result<LensConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => LensConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LensConfig::default(),
    };
    if let Some(path) = matches.get_one::<PathBuf>("fixtures") {
        config = config.with_fixtures(path.clone());
    }
    if let Some(seed) = matches.get_one::<u64>("seed") {
        config = config
            .with_theme_lookup(ThemeLookupKind::Seeded)
            .with_seed(*seed);
    }
    Ok(config)
}

/// Run the selected subcommand
///
/// # Errors
/// Returns error for unreadable input or a failed interaction
pub async fn run(matches: &ArgMatches, config: &LensConfig) -> Result<Report> {
    match matches.subcommand() {
        Some(("show", args)) => show(config, &ShowOptions::from_matches(args)).await,
        Some(("validate", args)) => {
            let path = args
                .get_one::<PathBuf>("file")
                .context("missing fixture file")?;
            validate(path)
        }
        Some(("themes", _)) => themes(config).await,
        Some((other, _)) => bail!("unknown command '{other}'"),
        None => bail!("no command given"),
    }
}

/// Serve the configured fixtures
///
/// # Errors
/// Returns error if the fixture file cannot be read or is invalid
pub fn load_source(config: &LensConfig) -> Result<InMemorySource> {
    match &config.fixtures {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading fixtures {}", path.display()))?;
            InMemorySource::from_json(&json)
                .with_context(|| format!("invalid fixtures {}", path.display()))
        }
        None => InMemorySource::from_json(BUILTIN_FIXTURES).context("invalid built-in fixtures"),
    }
}

/// Mount a viewer, replay the requested interactions and render it
///
/// # Errors
/// Returns error if the pattern does not exist or an interaction is rejected
pub async fn show(config: &LensConfig, options: &ShowOptions) -> Result<Report> {
    let source = load_source(config)?;
    let store = load_store(&source, config.build_theme_lookup()).await?;

    let id = match options
        .pattern
        .as_deref()
        .or(config.default_pattern.as_deref())
    {
        Some(id) => PatternId::new(id),
        None => store
            .patterns()
            .iter()
            .next()
            .map(|p| p.id().clone())
            .context("no patterns to show")?,
    };
    let pattern = source.fetch_pattern(&id).await?;

    let perspective = options.perspective.unwrap_or(config.default_perspective);
    let mut viewer = PatternViewer::new(store)
        .with_pattern(pattern)
        .with_perspective(perspective);
    viewer.mount();

    if let Some(theme) = &options.theme {
        viewer
            .click_theme(theme)
            .with_context(|| format!("selecting theme '{theme}'"))?;
    }
    if let Some(connection) = &options.explore {
        if viewer.explore_connection(connection)?.is_none() {
            tracing::warn!(connection = %connection, pattern = %id, "connection not found");
        }
    }
    if options.inside {
        viewer.toggle_view()?;
    }

    if options.json {
        let rendered = viewer.render();
        let body = serde_json::to_string_pretty(&rendered)?;
        return Ok(if rendered.is_view() {
            Report::success(body)
        } else {
            Report::failure(body)
        });
    }

    let rendered = viewer.render_with(|snapshot| {
        crate::render::snapshot_text(snapshot).map_err(ViewerError::unexpected)
    });
    match rendered {
        Rendered::View(body) => Ok(Report::success(body)),
        Rendered::Fallback(fallback) => {
            Ok(Report::failure(crate::render::fallback_text(&fallback)))
        }
        Rendered::Placeholder => bail!("viewer did not hydrate"),
    }
}

/// Check that a fixture file parses into a valid working set
///
/// Invalid data is a failed report, not an error.
///
/// # Errors
/// Returns error only if the file cannot be read
pub fn validate(path: &Path) -> Result<Report> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading fixtures {}", path.display()))?;

    match Pattern::list_from_json(&json).and_then(PatternSet::from_patterns) {
        Ok(set) => Ok(Report::success(format!(
            "{}: {} patterns, {} themes\n",
            path.display(),
            set.len(),
            set.themes().count()
        ))),
        Err(err) => {
            tracing::warn!(code = err.code(), path = %path.display(), "fixture validation failed");
            Ok(Report::failure(format!(
                "{}: [{}] {err}\n",
                path.display(),
                err.code()
            )))
        }
    }
}

/// List every theme with the number of patterns carrying it
///
/// # Errors
/// Returns error if the fixtures cannot be loaded
pub async fn themes(config: &LensConfig) -> Result<Report> {
    let source = load_source(config)?;
    let set = PatternSet::from_patterns(source.fetch_all().await?)?;

    let mut body = String::new();
    for theme in set.themes() {
        writeln!(body, "{theme:<16} {}", set.with_theme(theme).len())?;
    }
    Ok(Report::success(body))
}

//! Plain-text display surface

use pattern_view::viewer::{ConnectionSummary, ThemeChip};
use pattern_view::{ExplorerView, Fallback, ViewSnapshot};
use std::fmt::{self, Write};

/// Render a snapshot as indented text
///
/// # Errors
/// Only fails if formatting fails
pub fn snapshot_text(snapshot: &ViewSnapshot) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let view = match snapshot.view {
        ExplorerView::Outside => "outside",
        ExplorerView::Inside => "inside",
    };
    writeln!(out, "{} ({view} view)", snapshot.perspective.heading())?;

    let Some(pattern) = &snapshot.pattern else {
        writeln!(out, "No pattern selected")?;
        return Ok(out);
    };

    writeln!(out)?;
    writeln!(out, "{}  {}", pattern.id, pattern.content)?;
    writeln!(
        out,
        "  confidence {}%  stage {}",
        pattern.confidence_percent, pattern.stage
    )?;
    writeln!(out, "  themes: {}", chip_list(&pattern.themes))?;

    if let Some(panel) = &snapshot.theme {
        let details = &panel.details;
        writeln!(out)?;
        writeln!(
            out,
            "Theme {} (strength {}, {} related)",
            details.theme, details.strength, details.related_pattern_count
        )?;
        writeln!(out, "  {}", details.description)?;
        for related in &panel.related {
            writeln!(
                out,
                "  - {}  {}  [{}]",
                related.id,
                related.content,
                chip_list(&related.themes)
            )?;
        }
    }

    if !snapshot.timeline.is_empty() {
        writeln!(out)?;
        writeln!(out, "Evolution")?;
        for entry in &snapshot.timeline {
            let marker = if entry.current { '*' } else { ' ' };
            write!(out, "  {marker} {}  {}", entry.timestamp, entry.stage)?;
            match &entry.summary {
                Some(summary) => writeln!(out, "  {summary}")?,
                None => writeln!(out)?,
            }
        }
    }

    if !snapshot.connections.is_empty() {
        writeln!(out)?;
        writeln!(out, "Connections")?;
        for connection in &snapshot.connections {
            writeln!(out, "  {}", connection_line(connection))?;
        }
    }

    if let Some(explored) = &snapshot.explored {
        writeln!(out)?;
        writeln!(out, "Exploring {}", connection_line(explored))?;
        writeln!(out, "  {}", explored.description)?;
    }

    Ok(out)
}

/// Render a fallback as text
#[must_use]
pub fn fallback_text(fallback: &Fallback) -> String {
    match fallback.code {
        Some(code) => format!("{}\n  {} [{code}]\n", fallback.title, fallback.message),
        None => format!("{}\n  {}\n", fallback.title, fallback.message),
    }
}

fn chip_list(chips: &[ThemeChip]) -> String {
    chips
        .iter()
        .map(|chip| {
            if chip.active {
                format!("[{}]", chip.name)
            } else {
                chip.name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn connection_line(connection: &ConnectionSummary) -> String {
    let target = match &connection.target_content {
        Some(content) => format!("{} ({content})", connection.target_id),
        None => connection.target_id.clone(),
    };
    format!(
        "{} {} {}% -> {target}",
        connection.connection_id, connection.kind, connection.strength_percent
    )
}

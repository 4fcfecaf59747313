//! Markers command: show the headings and links a dialect recognizes.

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use prosecheck_core::config::Config;
use prosecheck_core::markup::{Marker, MarkerKind, find_markers};

use super::{DocumentOptions, read_input_file, resolve_document};

/// Arguments for the `markers` subcommand.
#[derive(Args, Debug)]
pub struct MarkersArgs {
    /// File to scan.
    pub file: Utf8PathBuf,

    /// Dialect selection.
    #[command(flatten)]
    pub options: DocumentOptions,
}

#[derive(Serialize)]
struct MarkerLine<'a> {
    #[serde(flatten)]
    marker: Marker,
    text: &'a str,
}

/// First line of the marker's source text, for display.
fn excerpt<'a>(content: &'a str, marker: &Marker) -> &'a str {
    content
        .get(marker.span.start..marker.span.end)
        .and_then(|s| s.lines().next())
        .unwrap_or_default()
        .trim()
}

/// List the markers found in a file, in document order.
#[instrument(name = "cmd_markers", skip_all, fields(file = %args.file))]
pub fn cmd_markers(
    args: MarkersArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, "executing markers command");

    let content = read_input_file(&args.file, max_input_bytes)?;
    let (dialect, _rules) = resolve_document(&args.file, &args.options, config)?;
    let markers = find_markers(&content, &dialect);

    if global_json {
        let lines: Vec<_> = markers
            .iter()
            .map(|m| MarkerLine {
                marker: *m,
                text: excerpt(&content, m),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&lines)?);
        return Ok(());
    }

    println!("{} ({})", args.file.bold(), dialect.name().dimmed());
    if markers.is_empty() {
        println!("  {}", "no headings or links found".dimmed());
    }
    for marker in &markers {
        let label = match (marker.kind, marker.level) {
            (MarkerKind::Heading, Some(level)) => format!("h{level}"),
            (MarkerKind::Heading, None) => "heading".to_string(),
            (MarkerKind::Link, _) => "link".to_string(),
        };
        let label = format!("{label:<8}");
        println!(
            "  {:>6}..{:<6} {} {}",
            marker.span.start,
            marker.span.end,
            label.cyan(),
            excerpt(&content, marker)
        );
    }
    Ok(())
}

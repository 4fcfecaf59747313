//! Metrics command: print the measurements rules are evaluated against.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use prosecheck_core::config::Config;
use prosecheck_core::measure;
use prosecheck_core::metrics::{LinkDensity, Metrics};

use super::{DocumentOptions, read_input_file, resolve_document};

/// Arguments for the `metrics` subcommand.
#[derive(Args, Debug)]
pub struct MetricsArgs {
    /// File to measure.
    pub file: Utf8PathBuf,

    /// Dialect and rule settings.
    #[command(flatten)]
    pub options: DocumentOptions,
}

fn percent(ratio: Option<f64>) -> String {
    ratio.map_or_else(|| "n/a".to_string(), |r| format!("{:.1}%", r * 100.0))
}

fn print_metrics(metrics: &Metrics) {
    println!("  {} {}", "Words:".cyan(), metrics.word_count);
    println!("  {} {}", "Sentences:".cyan(), metrics.sentence_count);
    println!("  {} {}", "Syllables:".cyan(), metrics.syllable_count);
    match metrics.readability_score {
        Some(score) => println!("  {} {:.1}", "Reading ease:".cyan(), score),
        None => println!("  {} n/a", "Reading ease:".cyan()),
    }
    println!(
        "  {} {}",
        "Passive:".cyan(),
        percent(metrics.passive_sentence_ratio)
    );
    println!(
        "  {} {}",
        "Transitions:".cyan(),
        percent(metrics.transition_sentence_ratio)
    );
    match metrics.link_density {
        LinkDensity::NoLinks => println!("  {} none", "Links:".cyan()),
        LinkDensity::WordsPerLink(density) => println!(
            "  {} {} ({:.1} words per link)",
            "Links:".cyan(),
            metrics.link_count,
            density
        ),
    }
}

/// Compute and print metrics for a file.
#[instrument(name = "cmd_metrics", skip_all, fields(file = %args.file))]
pub fn cmd_metrics(
    args: MetricsArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, "executing metrics command");

    let content = read_input_file(&args.file, max_input_bytes)?;
    let (dialect, rules) = resolve_document(&args.file, &args.options, config)?;
    let metrics = measure(&content, &dialect, &rules)
        .with_context(|| format!("failed to measure {}", args.file))?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        println!("{} ({})", args.file.bold(), dialect.name().dimmed());
        print_metrics(&metrics);
    }
    Ok(())
}

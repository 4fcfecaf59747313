//! Check command: validate files against the rule set.

use std::io::IsTerminal;

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use prosecheck_core::config::Config;
use prosecheck_core::report::ValidationReport;
use prosecheck_core::validate;

use super::{DocumentOptions, read_input_file, resolve_document};

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Files to check.
    #[arg(required = true)]
    pub files: Vec<Utf8PathBuf>,

    /// Dialect and rule settings.
    #[command(flatten)]
    pub options: DocumentOptions,
}

#[derive(Serialize)]
struct FileReport {
    file: Utf8PathBuf,
    dialect: String,
    passed: bool,
    #[serde(flatten)]
    report: ValidationReport,
}

fn progress_bar(len: usize, global_json: bool) -> ProgressBar {
    if global_json || len < 2 || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{pos}/{len}] {wide_msg}") {
        bar.set_style(style);
    }
    bar
}

fn print_report(file: &Utf8PathBuf, report: &ValidationReport) {
    println!("{}", file.bold());
    for verdict in report {
        let status = if verdict.passed {
            "PASS".green().to_string()
        } else {
            "FAIL".red().to_string()
        };
        let rule = format!("{:<28}", verdict.rule.as_str());
        println!("  {} {} {}", status, rule.cyan(), verdict.message);
    }
}

/// Validate each file and print one verdict per rule.
///
/// Fails when any rule fails for any file.
#[instrument(name = "cmd_check", skip_all, fields(files = args.files.len()))]
pub fn cmd_check(
    args: CheckArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(files = ?args.files, settings = ?args.options.settings, "executing check command");

    let bar = progress_bar(args.files.len(), global_json);
    let mut reports = Vec::with_capacity(args.files.len());

    for file in &args.files {
        bar.set_message(file.to_string());
        let content = read_input_file(file, max_input_bytes)?;
        let (dialect, rules) = resolve_document(file, &args.options, config)?;
        let report = validate(&content, &dialect, &rules)
            .with_context(|| format!("failed to check {file}"))?;

        if !global_json {
            bar.suspend(|| print_report(file, &report));
        }
        reports.push(FileReport {
            file: file.clone(),
            dialect: dialect.name().to_string(),
            passed: report.passed(),
            report,
        });
        bar.inc(1);
    }
    bar.finish_and_clear();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    let failed = reports.iter().filter(|r| !r.passed).count();
    if failed > 0 {
        bail!("{failed} of {} file(s) failed prose checks", reports.len());
    }
    if !global_json && reports.len() > 1 {
        println!("{} {} files", "PASS:".green(), reports.len());
    }
    Ok(())
}

//! Rules command: list the rule table with effective thresholds.

use anyhow::Context;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use prosecheck_core::config::Config;
use prosecheck_core::rules::describe;

/// Arguments for the `rules` subcommand.
#[derive(Args, Debug, Default)]
pub struct RulesArgs {
    /// Override a rule option before listing (repeatable).
    #[arg(long = "set", value_name = "RULE.OPTION=VALUE")]
    pub settings: Vec<String>,
}

/// Print every rule, whether it is enabled, and its thresholds.
#[instrument(name = "cmd_rules", skip_all)]
pub fn cmd_rules(args: RulesArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(settings = ?args.settings, "executing rules command");

    let mut rules = config.rules.clone();
    for setting in &args.settings {
        rules
            .apply_setting(setting)
            .with_context(|| format!("invalid --set {setting}"))?;
    }
    rules
        .validate_thresholds()
        .context("invalid rule thresholds")?;
    let summaries = describe(&rules).context("invalid rule configuration")?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    for summary in &summaries {
        let id = format!("{:<28}", summary.id.as_str());
        if summary.enabled {
            println!("{} {}", id.cyan(), summary.title);
        } else {
            println!("{} {} {}", id.dimmed(), summary.title.dimmed(), "(disabled)".yellow());
        }
        if !summary.options.is_empty() {
            let options: Vec<_> = summary
                .options
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            println!("  {}", options.join(" ").dimmed());
        }
    }
    Ok(())
}

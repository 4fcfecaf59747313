//! Command implementations.

use anyhow::Context;
use camino::Utf8Path;
use clap::Args;

use prosecheck_core::config::{Config, DialectKind};
use prosecheck_core::markup::MarkupDialect;
use prosecheck_core::overrides::OverrideSet;
use prosecheck_core::rules::RuleConfig;

pub mod check;
pub mod info;
pub mod markers;
pub mod metrics;
pub mod rules;
#[cfg(feature = "mcp")]
pub mod serve;

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Per-document flags shared by `check`, `metrics` and `markers`.
#[derive(Args, Debug, Default, Clone)]
pub struct DocumentOptions {
    /// Markup dialect (default: from overrides, config, then file extension).
    #[arg(long, value_enum)]
    pub dialect: Option<DialectKind>,

    /// Override a rule option (repeatable), e.g. `sentence-length.max-words=25`.
    #[arg(long = "set", value_name = "RULE.OPTION=VALUE")]
    pub settings: Vec<String>,

    /// Count markup syntax as text instead of stripping it.
    #[arg(long)]
    pub no_normalize: bool,
}

/// Work out the dialect and rule thresholds for one file.
///
/// Dialect precedence: `--dialect`, a matching path override, config
/// `dialect`, the file extension, then HTML. Rule settings layer config,
/// path overrides and `--set` in that order.
pub fn resolve_document(
    path: &Utf8Path,
    options: &DocumentOptions,
    config: &Config,
) -> anyhow::Result<(MarkupDialect, RuleConfig)> {
    let resolved = OverrideSet::compile(&config.overrides).resolve(path.as_str());

    let kind = options
        .dialect
        .or(resolved.dialect)
        .or(config.dialect)
        .or_else(|| path.extension().and_then(DialectKind::from_extension))
        .unwrap_or(DialectKind::Html);
    let normalize = if options.no_normalize {
        Some(false)
    } else {
        resolved.normalize
    };
    let dialect = config
        .dialect_for(kind, normalize)
        .with_context(|| format!("failed to build {kind} dialect"))?;

    let mut rules = config.rules.clone();
    resolved
        .apply(&mut rules)
        .with_context(|| format!("invalid override setting for {path}"))?;
    for setting in &options.settings {
        rules
            .apply_setting(setting)
            .with_context(|| format!("invalid --set {setting}"))?;
    }

    tracing::debug!(file = %path, dialect = dialect.name(), normalize = dialect.normalizes(), "document settings resolved");
    Ok((dialect, rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prosecheck_core::overrides::Override;

    fn options() -> DocumentOptions {
        DocumentOptions::default()
    }

    #[test]
    fn extension_picks_dialect() {
        let config = Config::default();
        let (dialect, _) = resolve_document(Utf8Path::new("a.md"), &options(), &config).unwrap();
        assert_eq!(dialect.name(), "markdown");
        let (dialect, _) = resolve_document(Utf8Path::new("a.txt"), &options(), &config).unwrap();
        assert_eq!(dialect.name(), "html");
    }

    #[test]
    fn flag_beats_override_beats_config() {
        let config = Config {
            dialect: Some(DialectKind::ClassSpans),
            overrides: vec![Override {
                paths: vec!["docs/*.md".to_string()],
                dialect: Some(DialectKind::BoldHeadings),
                ..Default::default()
            }],
            ..Default::default()
        };
        let path = Utf8Path::new("docs/a.md");
        let (dialect, _) = resolve_document(path, &options(), &config).unwrap();
        assert_eq!(dialect.name(), "bold-headings");

        let (dialect, _) = resolve_document(Utf8Path::new("b.md"), &options(), &config).unwrap();
        assert_eq!(dialect.name(), "class-spans");

        let flagged = DocumentOptions {
            dialect: Some(DialectKind::Markdown),
            ..Default::default()
        };
        let (dialect, _) = resolve_document(path, &flagged, &config).unwrap();
        assert_eq!(dialect.name(), "markdown");
    }

    #[test]
    fn set_flags_apply_after_overrides() {
        let config = Config {
            overrides: vec![Override {
                paths: vec!["**".to_string()],
                set: [(
                    "content-length.min-words".to_string(),
                    serde_json::json!(300),
                )]
                .into_iter()
                .collect(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let (_, rules) = resolve_document(Utf8Path::new("x.md"), &options(), &config).unwrap();
        assert_eq!(rules.content_length.min_words, 300);

        let flagged = DocumentOptions {
            settings: vec!["content-length.min-words=10".to_string()],
            ..Default::default()
        };
        let (_, rules) = resolve_document(Utf8Path::new("x.md"), &flagged, &config).unwrap();
        assert_eq!(rules.content_length.min_words, 10);
    }

    #[test]
    fn no_normalize_flag_disables_stripping() {
        let flagged = DocumentOptions {
            no_normalize: true,
            ..Default::default()
        };
        let (dialect, _) =
            resolve_document(Utf8Path::new("x.html"), &flagged, &Config::default()).unwrap();
        assert!(!dialect.normalizes());
    }

    #[test]
    fn malformed_setting_is_an_error() {
        let flagged = DocumentOptions {
            settings: vec!["nonsense".to_string()],
            ..Default::default()
        };
        assert!(resolve_document(Utf8Path::new("x.md"), &flagged, &Config::default()).is_err());
    }

    #[test]
    fn oversized_input_is_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("big.md");
        std::fs::write(&path, "word ".repeat(100)).unwrap();
        let path = camino::Utf8PathBuf::try_from(path).unwrap();
        let err = read_input_file(&path, Some(10)).unwrap_err();
        assert!(err.to_string().contains("input too large"));
        assert!(read_input_file(&path, None).is_ok());
    }
}

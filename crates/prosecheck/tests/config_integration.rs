//! Configuration integration tests.
//!
//! These tests verify config discovery, format parsing, and precedence
//! from an end-to-end perspective using the compiled binary. Tests use
//! `info --json` and `rules --json` to assert actual config values, not
//! just process success.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

/// Run a JSON-producing subcommand from `dir` and parse stdout.
fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = cmd()
        .args(["-C", dir.to_str().unwrap(), "--json"])
        .args(args)
        .env("PROSECHECK_LOG_DIR", dir)
        .env_remove("PROSECHECK_DIALECT")
        .output()
        .expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("invalid JSON output")
}

fn info_json(dir: &Path) -> Value {
    run_json(dir, &["info"])
}

/// Find one rule in `rules --json` output.
fn rule<'a>(rules: &'a Value, id: &str) -> &'a Value {
    rules
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["id"] == id)
        .unwrap_or_else(|| panic!("rule {id} not listed"))
}

// =============================================================================
// Config File Discovery
// =============================================================================

#[test]
fn runs_without_config_file() {
    let tmp = TempDir::new().unwrap();
    let json = info_json(tmp.path());

    assert_eq!(json["config"]["log_level"], "info");
    assert!(json["config"]["config_file"].is_null());
    assert!(json["config"]["dialect"].is_null());
    assert_eq!(json["config"]["normalize"], true);
}

#[test]
fn discovers_dotfile_config_in_current_dir() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".prosecheck.toml"), "dialect = \"markdown\"\n").unwrap();

    let json = info_json(tmp.path());

    assert_eq!(json["config"]["dialect"], "markdown");
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(reported.ends_with(".prosecheck.toml"), "reported {reported}");
}

#[test]
fn discovers_prose_config_in_parent_directory() {
    let tmp = TempDir::new().unwrap();
    let sub_dir = tmp.path().join("nested").join("deep");
    fs::create_dir_all(&sub_dir).unwrap();
    fs::write(tmp.path().join("prose.toml"), "dialect = \"class-spans\"\n").unwrap();

    let json = info_json(&sub_dir);

    assert_eq!(json["config"]["dialect"], "class-spans");
}

#[test]
fn prosecheck_name_overrides_prose_name() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".prose.toml"), "dialect = \"html\"\n").unwrap();
    fs::write(tmp.path().join("prosecheck.toml"), "dialect = \"bold-headings\"\n").unwrap();

    let json = info_json(tmp.path());

    assert_eq!(json["config"]["dialect"], "bold-headings");
}

// =============================================================================
// Config Format Parsing
// =============================================================================

#[test]
fn parses_yaml_rules() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".prosecheck.yaml"),
        "rules:\n  disable: [link-density]\n  sentence-length:\n    max-words: 30\n",
    )
    .unwrap();

    let rules = run_json(tmp.path(), &["rules"]);
    assert_eq!(rule(&rules, "link-density")["enabled"], false);
    assert_eq!(rule(&rules, "sentence-length")["options"]["max-words"], "30");
}

#[test]
fn parses_json_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".prosecheck.json"),
        r#"{"max_input_bytes": 2048, "rules": {"readability": {"min-score": 40}}}"#,
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["max_input_bytes"], 2048);

    let rules = run_json(tmp.path(), &["rules"]);
    assert_eq!(rule(&rules, "readability")["options"]["min-score"], "40");
}

#[test]
fn disable_input_limit_is_reported() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".prosecheck.toml"), "disable_input_limit = true\n").unwrap();

    let json = info_json(tmp.path());
    assert!(json["config"]["max_input_bytes"].is_null());
}

#[test]
fn overrides_are_counted() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".prosecheck.toml"),
        r#"
[[overrides]]
paths = ["docs/**/*.md"]
dialect = "markdown"

[[overrides]]
paths = ["blog/*.html"]
[overrides.set]
"content-length.min-words" = 100
"#,
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["overrides"], 2);
}

// =============================================================================
// Precedence
// =============================================================================

#[test]
fn explicit_config_overrides_discovered() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".prosecheck.toml"), "dialect = \"html\"\n").unwrap();
    let explicit = tmp.path().join("explicit.toml");
    fs::write(&explicit, "dialect = \"markdown\"\n").unwrap();

    let json = run_json(tmp.path(), &["--config", explicit.to_str().unwrap(), "info"]);

    assert_eq!(json["config"]["dialect"], "markdown");
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(reported.ends_with("explicit.toml"));
}

#[test]
fn env_var_overrides_file_dialect() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".prosecheck.toml"), "dialect = \"html\"\n").unwrap();

    let output = cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "--json", "info"])
        .env("PROSECHECK_LOG_DIR", tmp.path())
        .env("PROSECHECK_DIALECT", "markdown")
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["config"]["dialect"], "markdown");
}

#[test]
fn set_flag_overrides_config_threshold() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".prosecheck.toml"),
        "[rules.content-length]\nmin-words = 900\n",
    )
    .unwrap();

    let rules = run_json(tmp.path(), &["rules", "--set", "content-length.min-words=10"]);
    assert_eq!(rule(&rules, "content-length")["options"]["min-words"], "10");
}

// =============================================================================
// Invalid Config
// =============================================================================

#[test]
fn invalid_toml_config_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".prosecheck.toml"), "dialect = [unclosed").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn unknown_dialect_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".prosecheck.toml"), "dialect = \"rtf\"\n").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure();
}

#[test]
fn unknown_rule_section_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".prosecheck.toml"),
        "[rules.sentence-size]\nmax-words = 3\n",
    )
    .unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure();
}

#[test]
fn unknown_top_level_field_is_ignored() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".prosecheck.toml"),
        "dialect = \"markdown\"\nsome_future_field = true\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["dialect"], "markdown");
}

#[test]
fn disabling_unknown_rule_fails_at_use() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".prosecheck.toml"), "[rules]\ndisable = [\"nope\"]\n").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "rules"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

// =============================================================================
// Git Boundary
// =============================================================================

#[test]
fn git_boundary_stops_config_search() {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("repo");
    let work = repo.join("docs");
    fs::create_dir_all(&work).unwrap();
    fs::create_dir(repo.join(".git")).unwrap();

    // Beyond the boundary
    fs::write(tmp.path().join(".prosecheck.toml"), "dialect = \"markdown\"\n").unwrap();

    let json = info_json(&work);
    assert!(json["config"]["dialect"].is_null());
}

#[test]
fn config_in_same_dir_as_git_is_found() {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("repo");
    let work = repo.join("docs");
    fs::create_dir_all(&work).unwrap();
    fs::create_dir(repo.join(".git")).unwrap();
    fs::write(repo.join(".prosecheck.toml"), "dialect = \"markdown\"\n").unwrap();

    let json = info_json(&work);
    assert_eq!(json["config"]["dialect"], "markdown");
}

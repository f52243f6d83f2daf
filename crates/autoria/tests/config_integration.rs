//! Configuration integration tests.
//!
//! These tests run the compiled binary against temporary project trees and
//! read back `info --json` (or an analysis report) to check which settings
//! actually took effect.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ESSAY: &str = "Na minha pesquisa de campo, conversei com doze agricultores da região. \
Eu percebi que a maioria desconfia das cooperativas, e confesso que isso me surpreendeu. \
Um deles me disse, rindo, que a última reunião terminou em briga por causa de um trator.";

/// Returns a Command configured to run our binary, logging into a temp dir.
#[allow(deprecated)]
fn cmd() -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env("AUTORIA_LOG_DIR", std::env::temp_dir().join("autoria-test-logs"));
    cmd.env_remove("AUTORIA_MODE")
        .env_remove("AUTORIA_CONTENT_TYPE")
        .env_remove("AUTORIA_ACADEMIC_LEVEL");
    cmd
}

/// Run `info --json` from a directory and parse the JSON output.
fn info_json(dir: &Path) -> Value {
    let output = cmd()
        .args(["-C", dir.to_str().unwrap(), "info", "--json"])
        .output()
        .expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("invalid JSON output")
}

/// Analyze `ESSAY` from `dir` and parse the report.
fn analyze_json(dir: &Path, extra: &[&str]) -> Value {
    fs::write(dir.join("ensaio.txt"), ESSAY).unwrap();
    let output = cmd()
        .args(["-C", dir.to_str().unwrap(), "--json", "analyze", "ensaio.txt"])
        .args(extra)
        .output()
        .expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("invalid JSON output")
}

// =============================================================================
// Discovery
// =============================================================================

#[test]
fn defaults_without_config_file() {
    let tmp = TempDir::new().unwrap();
    let json = info_json(tmp.path());

    assert_eq!(json["config"]["log_level"], "info");
    assert_eq!(json["config"]["selector"], "academic");
    assert_eq!(json["config"]["pattern_budget_ms"], 250);
    assert_eq!(json["config"]["history_limit"], 50);
    assert!(json["config"]["config_file"].is_null());
}

#[test]
fn discovers_dotfile_in_parent_directory() {
    let tmp = TempDir::new().unwrap();
    let nested = tmp.path().join("capitulos").join("um");
    fs::create_dir_all(&nested).unwrap();
    fs::write(tmp.path().join(".autoria.toml"), r#"content_type = "creative""#).unwrap();

    let json = info_json(&nested);

    assert_eq!(json["config"]["selector"], "creative");
    assert_eq!(json["config"]["context"], "Criativo");
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(reported.ends_with(".autoria.toml"), "reported: {reported}");
}

#[test]
fn regular_name_overrides_dotfile() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".autoria.toml"), r#"content_type = "casual""#).unwrap();
    fs::write(tmp.path().join("autoria.toml"), r#"content_type = "business""#).unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["selector"], "business");
}

#[test]
fn git_boundary_stops_search() {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir(repo.join(".git")).unwrap();
    fs::write(tmp.path().join(".autoria.toml"), r#"history_limit = 3"#).unwrap();

    let json = info_json(&src);
    assert_eq!(json["config"]["history_limit"], 50);
    assert!(json["config"]["config_file"].is_null());
}

// =============================================================================
// Formats and Keys
// =============================================================================

#[test]
fn yaml_selects_academic_level_mode() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".autoria.yaml"),
        "mode: academic-level\nacademic_level: doctoral\nsubject_area: natural\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["selector"], "doctoral");
    assert_eq!(json["config"]["context"], "Doutorado");
}

#[test]
fn json_sets_engine_limits() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".autoria.json"),
        r#"{"pattern_budget_ms": 100, "backtrack_limit": 5000, "max_input_bytes": 2048}"#,
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["pattern_budget_ms"], 100);
    assert_eq!(json["config"]["backtrack_limit"], 5000);
    assert_eq!(json["config"]["max_input_bytes"], 2048);
}

#[test]
fn disabled_input_limit_is_reported_absent() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".autoria.toml"), "disable_input_limit = true\n").unwrap();

    let json = info_json(tmp.path());
    assert!(json["config"]["max_input_bytes"].is_null());
}

#[test]
fn explicit_config_overrides_discovered() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".autoria.toml"), r#"content_type = "casual""#).unwrap();
    let explicit = tmp.path().join("outro.toml");
    fs::write(&explicit, r#"content_type = "technical""#).unwrap();

    let output = cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "--config",
            explicit.to_str().unwrap(),
            "info",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["config"]["selector"], "technical");
}

#[test]
fn environment_overrides_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".autoria.toml"), r#"content_type = "casual""#).unwrap();

    let output = cmd()
        .env("AUTORIA_CONTENT_TYPE", "creative")
        .args(["-C", tmp.path().to_str().unwrap(), "info", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["config"]["selector"], "creative");
}

#[test]
fn invalid_mode_value_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".autoria.toml"), r#"mode = "forensic""#).unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn invalid_toml_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".autoria.toml"), "isto não é toml [[[").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure();
}

// =============================================================================
// Config Reaching the Engine
// =============================================================================

#[test]
fn configured_content_type_reaches_report() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".autoria.toml"), r#"content_type = "technical""#).unwrap();

    let report = analyze_json(tmp.path(), &[]);
    assert_eq!(report["mode"]["mode"], "content-type");
    assert_eq!(report["mode"]["content_type"], "technical");
    assert_eq!(report["context"]["label"], "Técnico");
}

#[test]
fn flag_overrides_configured_mode() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".autoria.toml"), r#"content_type = "technical""#).unwrap();

    let report = analyze_json(tmp.path(), &["--content-type", "casual"]);
    assert_eq!(report["mode"]["content_type"], "casual");
}

#[test]
fn configured_input_limit_rejects_large_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".autoria.toml"), "max_input_bytes = 32\n").unwrap();
    fs::write(tmp.path().join("ensaio.txt"), ESSAY).unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "analyze", "ensaio.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not be analyzed"));
}

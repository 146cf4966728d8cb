//! End-to-end integration tests for the breeding tracker binary.
//!
//! Exercises the full pipeline: register animal → record events → status/overview.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn herd_binary() -> String {
    env!("CARGO_BIN_EXE_herd").to_string()
}

/// Writes a config file pointing at a database inside the temp directory.
fn write_config(temp: &Path) -> std::path::PathBuf {
    let db_file = temp.join("herd.db");
    let config_file = temp.join("config.toml");
    std::fs::write(
        &config_file,
        format!(r#"database_path = "{}""#, db_file.display()),
    )
    .unwrap();
    config_file
}

fn herd(config: &Path, args: &[&str]) -> std::process::Output {
    Command::new(herd_binary())
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("failed to run herd")
}

fn herd_ok(config: &Path, args: &[&str]) -> String {
    let output = herd(config, args);
    assert!(
        output.status.success(),
        "herd {args:?} should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_full_breeding_cycle_flow() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    herd_ok(
        &config,
        &[
            "animal", "add", "cow-1", "--born", "2021-06-01", "--status", "lactating",
        ],
    );

    // Fresh heat puts the animal into a heat window.
    herd_ok(&config, &["record", "heat", "cow-1", "--sign", "standing"]);
    let status = herd_ok(&config, &["status", "cow-1"]);
    assert!(status.contains("Window: early"), "got: {status}");
    assert!(status.contains("action: breed"), "got: {status}");

    // Insemination supersedes the heat banner.
    herd_ok(&config, &["record", "insemination", "cow-1", "--sire", "SIRE-9"]);
    let status = herd_ok(&config, &["status", "cow-1"]);
    assert!(status.contains("Window: waiting"), "got: {status}");

    // A positive check makes her pregnant.
    herd_ok(&config, &["record", "check", "cow-1", "positive"]);
    let status = herd_ok(&config, &["status", "cow-1"]);
    assert!(status.contains("Window: pregnant"), "got: {status}");
    assert!(
        status.contains("an active pregnancy is on record"),
        "got: {status}"
    );

    // Calving closes the cycle and starts postpartum recovery.
    herd_ok(&config, &["record", "calving", "cow-1"]);
    let status = herd_ok(&config, &["status", "cow-1"]);
    assert!(status.contains("Window: post_calving"), "got: {status}");
    assert!(status.contains("postpartum recovery"), "got: {status}");

    let history = herd_ok(&config, &["history", "cow-1"]);
    assert_eq!(history.lines().count(), 4, "got: {history}");
    assert!(history.lines().next().unwrap().contains("calving"));
}

#[test]
fn test_overview_lists_registered_animals() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    herd_ok(
        &config,
        &["animal", "add", "cow-2", "--born", "2020-01-15", "--status", "dry"],
    );
    let six_months_ago = (chrono::Utc::now() - chrono::Duration::days(200))
        .format("%Y-%m-%d")
        .to_string();
    herd_ok(&config, &["animal", "add", "cow-1", "--born", &six_months_ago]);

    let overview = herd_ok(&config, &["overview"]);
    assert!(overview.contains("Herd overview (2 animals)"), "got: {overview}");
    // Born six-ish months ago, so below breeding age.
    assert!(overview.contains("cow-1: eligible=no"), "got: {overview}");
    assert!(overview.contains("cow-2: eligible=yes"), "got: {overview}");
}

#[test]
fn test_settings_roundtrip() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    let shown = herd_ok(&config, &["settings", "show"]);
    assert!(shown.contains("gestation period: 280 days"), "got: {shown}");

    let shown = herd_ok(
        &config,
        &[
            "settings",
            "set",
            "--gestation-days",
            "283",
            "--auto-schedule-check",
            "true",
        ],
    );
    assert!(shown.contains("gestation period: 283 days"), "got: {shown}");
    assert!(
        shown.contains("auto-schedule pregnancy check: on"),
        "got: {shown}"
    );

    // The hint fires now that auto-scheduling is on.
    herd_ok(
        &config,
        &["animal", "add", "cow-1", "--born", "2021-06-01", "--status", "lactating"],
    );
    let recorded = herd_ok(
        &config,
        &["record", "insemination", "cow-1", "--date", "2025-06-01"],
    );
    assert!(
        recorded.contains("Pregnancy check due around 2025-07-01."),
        "got: {recorded}"
    );
}

#[test]
fn test_unknown_animal_fails_with_error() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    let output = herd(&config, &["status", "ghost"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown animal ghost"), "got: {stderr}");
}

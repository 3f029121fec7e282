use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_cupsmith")
}

fn unique_temp_dir(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("cupsmith-{name}-{stamp}"));
    fs::create_dir_all(&dir).expect("temp dir should be created");
    dir
}

#[test]
fn missing_subcommand_prints_usage() {
    let output = Command::new(bin()).output().expect("cupsmith should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: cupsmith <import|validate-cup|check-rankings|validate-bundle>"));
}

#[test]
fn unknown_subcommand_prints_usage() {
    let output = Command::new(bin())
        .arg("frobnicate")
        .output()
        .expect("cupsmith should run");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn import_without_arguments_is_a_usage_error() {
    let output = Command::new(bin())
        .arg("import")
        .output()
        .expect("import should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: cupsmith import"));
}

#[test]
fn import_with_unparseable_league_is_a_usage_error() {
    let output = Command::new(bin())
        .args(["import", "remix", "heavyweight"])
        .output()
        .expect("import should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid league 'heavyweight'"));
}

#[test]
fn import_without_source_root_explains_how_to_set_it() {
    let cwd = unique_temp_dir("no-root-cwd");
    let output = Command::new(bin())
        .args(["import", "remix", "1500"])
        .env_remove("PVPOKE_SRC_ROOT")
        .current_dir(&cwd)
        .output()
        .expect("import should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("PVPOKE_SRC_ROOT is not set"));
    assert!(stderr.contains("export PVPOKE_SRC_ROOT="));

    let _ = fs::remove_dir_all(cwd);
}

#[test]
fn source_root_can_come_from_the_config_file() {
    let cwd = unique_temp_dir("config-cwd");
    let configured_root = cwd.join("pvpoke-src");
    fs::write(
        cwd.join("cupsmith.yaml"),
        format!("source_root: {}\n", configured_root.display()),
    )
    .expect("config should be written");

    let output = Command::new(bin())
        .args(["import", "remix", "1500"])
        .env_remove("PVPOKE_SRC_ROOT")
        .current_dir(&cwd)
        .output()
        .expect("import should run");

    // The configured root has no data, so loading fails, but the error
    // names the gamemaster path under the configured root.
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("gamemaster.json"));
    assert!(!stderr.contains("PVPOKE_SRC_ROOT is not set"));

    let _ = fs::remove_dir_all(cwd);
}

#[test]
fn validate_cup_without_arguments_is_a_usage_error() {
    let output = Command::new(bin())
        .arg("validate-cup")
        .output()
        .expect("validate-cup should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: cupsmith validate-cup"));
}

#[test]
fn check_rankings_without_arguments_is_a_usage_error() {
    let output = Command::new(bin())
        .args(["check-rankings", "only.csv"])
        .output()
        .expect("check-rankings should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: cupsmith check-rankings"));
}

#[test]
fn check_rankings_rejects_unknown_shadow_mode() {
    let output = Command::new(bin())
        .args([
            "check-rankings",
            "rankings.csv",
            "cup.json",
            "--shadow-check",
            "loud",
        ])
        .output()
        .expect("check-rankings should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid --shadow-check 'loud'"));
}

#[test]
fn validate_bundle_without_arguments_is_a_usage_error() {
    let output = Command::new(bin())
        .arg("validate-bundle")
        .output()
        .expect("validate-bundle should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: cupsmith validate-bundle"));
}

//! End-to-end tests for `xtask feature-matrix` using `sh` as a stand-in build
//! tool. Each fake build appends its argv to a log file so tests can see
//! exactly which combinations were attempted.

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Write a config whose build command logs its feature list and, when
/// `fail_on` is `Some((features, code))`, exits with `code` for that list.
fn fake_build_config(dir: &Path, catalog: &str, fail_on: Option<(&str, i32)>) -> (PathBuf, PathBuf) {
    let log = dir.join("builds.log");
    let check = match fail_on {
        Some((features, code)) => format!(r#"[ "$2" = "{features}" ] && exit {code}; "#),
        None => String::new(),
    };
    let script = format!(r#"echo "${{2:-<none>}}" >> "{}"; {check}exit 0"#, log.display());
    let config = format!(
        r#"
[command]
program = "sh"
args = ["-c", {script:?}, "fake-build"]
isolate_args = []
feature_flag = "--features"

[catalog]
{catalog}
"#
    );
    let path = dir.join("featmatrix.toml");
    fs::write(&path, config).unwrap();
    (path, log)
}

fn logged_builds(log: &Path) -> Vec<String> {
    fs::read_to_string(log).unwrap_or_default().lines().map(str::to_owned).collect()
}

#[test]
fn full_matrix_passes_and_builds_every_combination() {
    let tmp = TempDir::new().unwrap();
    let (config, log) = fake_build_config(
        tmp.path(),
        r#"independent = ["x"]
groups = [["a", "b"]]"#,
        None,
    );

    let mut cmd = cargo_bin_cmd!("xtask");
    cmd.args(["--config", config.to_str().unwrap(), "feature-matrix", "--full"]).env_remove("RUST_LOG");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[1/7] testing baseline (no optional features)"))
        .stdout(predicate::str::contains("[7/7] testing [x,b]"))
        .stdout(predicate::str::contains("all 7 combinations passed"));

    // 1 + 2^1 * 3
    assert_eq!(logged_builds(&log), ["<none>", "<none>", "a", "b", "x", "x,a", "x,b"]);
}

#[test]
fn first_failure_stops_the_run_and_propagates_status() {
    let tmp = TempDir::new().unwrap();
    let (config, log) = fake_build_config(tmp.path(), r#"groups = [["a", "b"]]"#, Some(("a", 1)));

    let mut cmd = cargo_bin_cmd!("xtask");
    cmd.args(["--config", config.to_str().unwrap(), "feature-matrix", "--full"]);
    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Feature matrix FAILED at 3 of 4: [a]"))
        .stdout(predicate::str::contains("testing [b]").not());

    assert_eq!(logged_builds(&log), ["<none>", "<none>", "a"]);
}

#[test]
fn reduced_scope_is_the_default() {
    let tmp = TempDir::new().unwrap();
    let (config, log) = fake_build_config(
        tmp.path(),
        r#"independent = ["x"]
groups = [["a", "b"]]"#,
        None,
    );

    let mut cmd = cargo_bin_cmd!("xtask");
    cmd.args(["--config", config.to_str().unwrap(), "feature-matrix"]);
    cmd.assert().success();
    assert_eq!(logged_builds(&log), ["<none>", "<none>", "x"]);
}

#[test]
fn nonstandard_failure_status_is_passed_through() {
    let tmp = TempDir::new().unwrap();
    let (config, _log) = fake_build_config(tmp.path(), r#"independent = ["x"]"#, Some(("x", 101)));

    let mut cmd = cargo_bin_cmd!("xtask");
    cmd.args(["--config", config.to_str().unwrap(), "feature-matrix"]);
    cmd.assert().failure().code(101);
}

#[test]
fn build_status_matching_a_harness_code_is_normalized() {
    let tmp = TempDir::new().unwrap();
    // `make` reports an ordinary failure as 2.
    let (config, _log) = fake_build_config(tmp.path(), r#"independent = ["x"]"#, Some(("x", 2)));

    let mut cmd = cargo_bin_cmd!("xtask");
    cmd.args(["--config", config.to_str().unwrap(), "feature-matrix"]);
    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("✗ FAIL (exit 2)"));
}

#[test]
fn invalid_catalog_fails_before_any_build() {
    let tmp = TempDir::new().unwrap();
    let (config, log) =
        fake_build_config(tmp.path(), r#"independent = ["a"]
groups = [["a", "b"]]"#, None);

    let mut cmd = cargo_bin_cmd!("xtask");
    cmd.args(["--config", config.to_str().unwrap(), "feature-matrix", "--full"]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("flag `a` is declared in both independent and group #0"));
    assert!(logged_builds(&log).is_empty());
}

#[test]
fn missing_explicit_config_is_a_configuration_error() {
    let tmp = TempDir::new().unwrap();
    let mut cmd = cargo_bin_cmd!("xtask");
    cmd.args(["--config", tmp.path().join("nope.toml").to_str().unwrap(), "feature-matrix"]);
    cmd.assert().failure().code(2);
}

#[test]
fn unlaunchable_build_tool_exits_with_launch_code() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("featmatrix.toml");
    fs::write(&path, "[command]\nprogram = \"featmatrix-no-such-build-tool\"\n").unwrap();

    let mut cmd = cargo_bin_cmd!("xtask");
    cmd.args(["--config", path.to_str().unwrap(), "feature-matrix"]);
    cmd.assert()
        .failure()
        .code(3)
        .stdout(predicate::str::contains("Feature matrix FAILED at 1 of 2: baseline"));
}

#[test]
fn list_prints_plan_without_building() {
    let tmp = TempDir::new().unwrap();
    let (config, log) = fake_build_config(tmp.path(), r#"independent = ["x", "y"]"#, None);

    let mut cmd = cargo_bin_cmd!("xtask");
    cmd.args(["--config", config.to_str().unwrap(), "feature-matrix", "--list"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("5 combinations (Reduced scope)"))
        .stdout(predicate::str::contains("--features x,y"));
    assert!(logged_builds(&log).is_empty());
}

#[test]
fn dry_run_builds_nothing() {
    let tmp = TempDir::new().unwrap();
    let (config, log) = fake_build_config(tmp.path(), r#"independent = ["x"]"#, None);

    let mut cmd = cargo_bin_cmd!("xtask");
    cmd.args(["--config", config.to_str().unwrap(), "feature-matrix", "--dry-run"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[DRY-RUN] sh -c"))
        .stdout(predicate::str::contains("3 combinations would be checked"));
    assert!(logged_builds(&log).is_empty());
}

#[test]
fn summary_file_records_the_failure() {
    let tmp = TempDir::new().unwrap();
    let (config, _log) = fake_build_config(tmp.path(), r#"independent = ["x"]"#, Some(("x", 1)));
    let summary = tmp.path().join("summary.json");

    let mut cmd = cargo_bin_cmd!("xtask");
    cmd.args([
        "--config",
        config.to_str().unwrap(),
        "feature-matrix",
        "--summary",
        summary.to_str().unwrap(),
    ]);
    cmd.assert().failure().code(1);

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(v["total"], 3);
    assert_eq!(v["records"][2]["status"], "failed");
    assert_eq!(v["records"][2]["combination"]["tokens"][0], "x");
}

#[test]
fn config_from_environment_variable() {
    let tmp = TempDir::new().unwrap();
    let (config, log) = fake_build_config(tmp.path(), r#"independent = ["x"]"#, None);

    let work = tmp.path().join("work");
    fs::create_dir(&work).unwrap();

    let mut cmd = cargo_bin_cmd!("xtask");
    cmd.arg("feature-matrix").env("FEATMATRIX_CONFIG", &config).current_dir(&work);
    cmd.assert().success();
    assert_eq!(logged_builds(&log).len(), 3);
}

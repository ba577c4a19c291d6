use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn tsbun(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("tsbun").unwrap();
    cmd.current_dir(dir)
        .env("TSBUN_BUN", "tsbun-test-missing-bun")
        .env("TSBUN_TSC", "tsbun-test-missing-tsc")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn version_prints_name_at_version() {
    let dir = tempfile::tempdir().unwrap();
    let expected = format!("tsbun@{}\n", env!("CARGO_PKG_VERSION"));

    tsbun(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(expected.clone());

    tsbun(dir.path()).arg("-v").assert().success().stdout(expected);
}

#[test]
fn help_exits_zero() {
    let dir = tempfile::tempdir().unwrap();

    tsbun(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--watch"));
}

#[test]
fn version_ignores_broken_config() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("tsbun.config.ts"), "export default {").unwrap();

    tsbun(dir.path())
        .arg("-v")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn missing_entry_exits_one() {
    let dir = tempfile::tempdir().unwrap();

    tsbun(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not find entry point"));
}

#[test]
fn unknown_flag_prints_help_and_exits_one() {
    let dir = tempfile::tempdir().unwrap();

    tsbun(dir.path())
        .arg("--frobnicate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"))
        .stderr(predicate::str::contains("Failed to parse arguments"));
}

#[test]
fn bundler_failure_skips_type_generation() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.ts"), "export const answer = 42;\n").unwrap();

    tsbun(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("tsbun-test-missing-bun"))
        .stderr(predicate::str::contains("Bundling failed"))
        .stderr(predicate::str::contains("Generating type declarations").not());
}

#[test]
fn unloadable_config_only_warns() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("tsbun.config.ts"), "export default {").unwrap();
    fs::write(dir.path().join("index.ts"), "export const answer = 42;\n").unwrap();

    // The warning is printed and the build goes on to the bundler.
    tsbun(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Ignoring tsbun.config.ts"))
        .stderr(predicate::str::contains("Bundling failed"));
}

#[test]
fn existing_outdir_is_cleaned_before_bundling() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.ts"), "export const answer = 42;\n").unwrap();
    fs::create_dir_all(dir.path().join("dist")).unwrap();
    fs::write(dir.path().join("dist/stale.js"), "old").unwrap();

    tsbun(dir.path()).assert().code(1);

    assert!(!dir.path().join("dist").exists());
}

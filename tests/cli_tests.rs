//! Integration tests for the `cucumber-converter` binary using `assert_cmd`.
//!
//! Each test isolates the preferences file inside a temporary directory so
//! the developer's own remembered paths never leak in.

use anyhow::{Context, Result, ensure};
use assert_cmd::Command;
use camino::Utf8PathBuf;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use test_support::{FeatureTree, snapshot};

fn scenarios() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/scenarios")
}

/// Binary with a private preferences file and no path overrides.
fn converter(tree: &FeatureTree) -> Result<Command> {
    let mut cmd = Command::cargo_bin("cucumber-converter").context("locate binary")?;
    cmd.env("CUCUMBER_CONVERTER_CONFIG_PATH", tree.base().join("prefs.toml"))
        .env_remove("CUCUMBER_CONVERTER_SCENARIOS")
        .env_remove("CUCUMBER_CONVERTER_OUTPUT")
        .arg("--progress")
        .arg("false");
    Ok(cmd)
}

#[rstest]
fn generate_writes_the_mirrored_tree() -> Result<()> {
    let tree = FeatureTree::new()?;
    converter(&tree)?
        .arg("generate")
        .arg("--scenarios")
        .arg(scenarios())
        .arg("--output")
        .arg(tree.output())
        .assert()
        .success()
        .stderr(predicate::str::contains("Generated 3 of 3 files"));

    let files: Vec<_> = snapshot(&tree.output())?.into_keys().collect();
    ensure!(
        files
            == [
                "Login/sign_in.swift",
                "Login/sign_out.swift",
                "Search/basic.swift"
            ],
        "unexpected output files: {files:?}"
    );

    let sign_in = fs::read_to_string(tree.output().join("Login/sign_in.swift"))
        .context("read sign_in.swift")?;
    for expected in [
        "final class Sign_in: XCTestCase {",
        "    func successful_sign_in() throws {",
        r#"        try i_am_on_the_screen("Login")"#,
        r#"        try i_enter_and("ann@example.com", "secret")"#,
        "    func locked_account() throws {",
        r#"        try the_following_users_exist:([["email", "locked"]: [["bob@example.com", "yes"]]])"#,
        r#"        try i_should_be_told("Account locked")"#,
    ] {
        ensure!(sign_in.contains(expected), "missing {expected:?} in:\n{sign_in}");
    }
    Ok(())
}

#[rstest]
fn generate_is_the_default_command() -> Result<()> {
    let tree = FeatureTree::new()?;
    converter(&tree)?
        .env("CUCUMBER_CONVERTER_SCENARIOS", scenarios())
        .env("CUCUMBER_CONVERTER_OUTPUT", tree.output())
        .assert()
        .success();
    ensure!(
        tree.output().join("Search/basic.swift").is_file(),
        "default command did not generate"
    );
    Ok(())
}

#[rstest]
fn relative_paths_resolve_against_the_working_directory() -> Result<()> {
    let tree = FeatureTree::new()?.with("Search/basic.feature", "Scenario: S\nGiven a step\n")?;
    let stale = test_support::write_file(&tree.output().join("Old/stale.swift"), "// stale\n")?;
    let work = tree.base().join("work");
    fs::create_dir_all(&work).context("create working directory")?;

    converter(&tree)?
        .current_dir(&work)
        .arg("generate")
        .arg("--scenarios")
        .arg("../features")
        .arg("--output")
        .arg("../UITests/Generated")
        .assert()
        .success()
        .stderr(predicate::str::contains("Generated 1 of 1 files"));

    ensure!(!stale.exists(), "stale output survived the purge");
    let files: Vec<_> = snapshot(&tree.output())?.into_keys().collect();
    ensure!(files == ["Search/basic.swift"], "unexpected files: {files:?}");
    ensure!(snapshot(&work)?.is_empty(), "output leaked into the working directory");
    Ok(())
}

#[rstest]
fn relative_paths_from_the_environment_are_used_by_default() -> Result<()> {
    let tree = FeatureTree::new()?.with("Search/basic.feature", "Scenario: S\nGiven a step\n")?;
    converter(&tree)?
        .current_dir(tree.base())
        .env("CUCUMBER_CONVERTER_SCENARIOS", "features")
        .env("CUCUMBER_CONVERTER_OUTPUT", "UITests/Generated")
        .assert()
        .success();
    ensure!(
        tree.output().join("Search/basic.swift").is_file(),
        "default command ignored the environment"
    );
    Ok(())
}

#[rstest]
fn empty_scenarios_root_fails() -> Result<()> {
    let tree = FeatureTree::new()?;
    converter(&tree)?
        .arg("generate")
        .arg("--scenarios")
        .arg(tree.root())
        .arg("--output")
        .arg(tree.output())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No scenarios found"));
    Ok(())
}

#[rstest]
fn missing_paths_fail_with_a_hint() -> Result<()> {
    let tree = FeatureTree::new()?;
    converter(&tree)?
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no scenarios folder given"));
    Ok(())
}

#[rstest]
fn remembered_paths_are_reused_until_forgotten() -> Result<()> {
    let tree = FeatureTree::new()?;
    converter(&tree)?
        .arg("generate")
        .arg("--scenarios")
        .arg(scenarios())
        .arg("--output")
        .arg(tree.output())
        .arg("--remember")
        .assert()
        .success();
    let prefs = tree.base().join("prefs.toml");
    ensure!(prefs.is_file(), "preferences were not written");

    fs::remove_dir_all(tree.output()).context("remove output")?;
    converter(&tree)?.arg("generate").assert().success();
    ensure!(
        tree.output().join("Login/sign_out.swift").is_file(),
        "remembered paths were not used"
    );

    converter(&tree)?
        .arg("generate")
        .arg("--forget")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no scenarios folder given"));
    ensure!(!prefs.exists(), "preferences survived --forget");
    Ok(())
}

#[rstest]
#[case("scenarios", true)]
#[case("deep_only", true)]
#[case("missing", false)]
fn check_reports_root_validity(#[case] dir: &str, #[case] valid: bool) -> Result<()> {
    let tree = FeatureTree::new()?;
    let path = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(dir);
    let assert = converter(&tree)?.arg("check").arg(path).assert();
    if valid {
        assert.success();
    } else {
        assert.failure();
    }
    Ok(())
}

#[rstest]
fn list_prints_folders_and_files() -> Result<()> {
    let tree = FeatureTree::new()?;
    converter(&tree)?
        .arg("list")
        .arg(scenarios())
        .assert()
        .success()
        .stdout("Login/\n  sign_in.feature\n  sign_out.feature\nSearch/\n  basic.feature\n");
    Ok(())
}

#[rstest]
fn list_json_is_an_ordered_mapping() -> Result<()> {
    let tree = FeatureTree::new()?;
    let output = converter(&tree)?
        .arg("list")
        .arg("--json")
        .arg(scenarios())
        .output()
        .context("run list --json")?;
    ensure!(output.status.success(), "list --json failed");
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).context("parse listing")?;
    assert_eq!(
        value,
        serde_json::json!({
            "Login": ["sign_in.feature", "sign_out.feature"],
            "Search": ["basic.feature"],
        })
    );
    Ok(())
}

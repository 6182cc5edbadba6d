use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn webbuild() -> Command {
    let mut cmd = Command::cargo_bin("webbuild").expect("binary exists");
    cmd.env_remove("WEBBUILD_LOG");
    cmd
}

#[test]
fn help_displays_usage() {
    webbuild()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("build"));
}

#[test]
fn build_reads_default_config_from_working_directory() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    fs::write(temp.path().join("page.html"), "<p>@NAME@</p>")?;
    fs::write(
        temp.path().join("build_config.json"),
        r#"{
  "common": {
    "paths": [
      { "type": "file", "source": "page.html", "dest": "page.html",
        "actions": [{ "action": "literal-replace" }] }
    ]
  },
  "debug": { "replacements": [{ "from": "@NAME@", "to": "dev" }] },
  "release": { "replacements": [{ "from": "@NAME@", "to": "prod" }] }
}"#,
    )?;

    webbuild()
        .current_dir(temp.path())
        .args(["build", "out", "--debug"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 transformed"));

    assert_eq!(
        fs::read_to_string(temp.path().join("out/page.html"))?,
        "<p>dev</p>"
    );
    Ok(())
}

#[test]
fn missing_config_exits_with_failure() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    webbuild()
        .current_dir(temp.path())
        .args(["build", "out", "--config", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
    Ok(())
}

#[test]
fn strict_flag_rejects_unknown_actions() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    fs::write(temp.path().join("a.txt"), "a")?;
    fs::write(
        temp.path().join("site.json"),
        r#"{ "common": { "paths": [
  { "type": "file", "source": "a.txt", "dest": "a.txt", "actions": [{ "action": "sparkle" }] }
] } }"#,
    )?;

    webbuild()
        .current_dir(temp.path())
        .args(["build", "out", "--config", "site.json", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sparkle"));

    webbuild()
        .current_dir(temp.path())
        .args(["build", "out", "--config", "site.json"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(temp.path().join("out/a.txt"))?, "a");
    Ok(())
}

#[test]
fn completions_are_generated() {
    webbuild()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("webbuild"));
}

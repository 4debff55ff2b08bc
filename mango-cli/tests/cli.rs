//! Basic CLI surface tests: help, version, argument validation, completions.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let env = TestEnv::new();
    env.command_bare()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("up"))
        .stdout(predicate::str::contains("down"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_version() {
    let env = TestEnv::new();
    env.command_bare()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mango"));
}

#[test]
fn test_up_requires_a_migration() {
    let env = TestEnv::new();
    env.command()
        .arg("up")
        .assert()
        .failure()
        .stderr(predicate::str::contains("MIGRATION"));
}

#[test]
fn test_unknown_subcommand() {
    let env = TestEnv::new();
    env.command_bare().arg("sideways").assert().failure();
}

#[test]
fn test_completions_bash() {
    let env = TestEnv::new();
    env.command_bare()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_mango"));
}

#[test]
fn test_completions_quiet_has_no_banner() {
    let env = TestEnv::new();
    env.command_bare()
        .args(["--quiet", "completions", "zsh"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

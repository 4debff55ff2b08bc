//! Build script for mango-cli.
//!
//! Generates the `mango.1` man page into OUT_DIR with clap_mangen.
//!
//! Build scripts cannot depend on the crate being built, so the command
//! structure is declared again here.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Mirrors the global options and subcommands in src/cli.rs.
fn build_cli() -> Command {
    let flag = |name: &'static str, help: &'static str| {
        Arg::new(name)
            .long(name)
            .help(help)
            .global(true)
            .action(ArgAction::SetTrue)
    };
    let value = |name: &'static str, value_name: &'static str, help: &'static str| {
        Arg::new(name)
            .long(name)
            .help(help)
            .value_name(value_name)
            .global(true)
    };

    Command::new("mango")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Apply and revert SQL migrations in dependency order")
        .long_about(
            "Applies SQL migration files to a SQLite database. Files declare their \
             prerequisites with `--mango requires` directives; mango applies them in \
             dependency order and records each one in a ledger table.",
        )
        .arg(flag("verbose", "Enable verbose output"))
        .arg(flag("quiet", "Suppress non-essential output"))
        .arg(
            value("config", "FILE", "Configuration file to use instead of discovering mango.yaml")
                .env("MANGO_CONFIG"),
        )
        .arg(value("db", "PATH", "Target SQLite database"))
        .arg(value("dir", "PATH", "Directory holding the migration files"))
        .arg(value("table", "NAME", "Name of the ledger table"))
        .arg(value(
            "busy-timeout",
            "SECONDS",
            "Override the default busy timeout (in seconds)",
        ))
        .subcommands(vec![
            Command::new("up")
                .about("Apply migrations and their prerequisites")
                .long_about("Apply the named migrations (or `*`/`all`), applying unapplied dependencies first"),
            Command::new("down")
                .about("Revert migrations")
                .long_about("Revert the named migrations; dependents that are still applied block the revert"),
            Command::new("status")
                .about("Show every migration and whether it is applied")
                .long_about("List migrations in dependency order with their applied state, plus orphaned ledger records"),
            Command::new("validate")
                .about("Check configuration and migration files without touching the ledger"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("failed to create man directory");

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).expect("failed to render man page");

    fs::write(man_dir.join("mango.1"), buffer).expect("failed to write man page");

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}

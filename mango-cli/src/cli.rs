//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CompletionsCommand, DownCommand, StatusCommand, UpCommand, ValidateCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dependency-aware SQL schema migrations.
#[derive(Parser)]
#[command(name = "mango")]
#[command(version, about = "Apply and revert SQL migrations in dependency order", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Configuration file to use instead of discovering mango.yaml
    #[arg(long, value_name = "FILE", global = true, env = "MANGO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Target SQLite database
    #[arg(long = "db", value_name = "PATH", global = true)]
    pub database: Option<PathBuf>,

    /// Directory holding the migration files
    #[arg(long = "dir", value_name = "PATH", global = true)]
    pub migrations_dir: Option<PathBuf>,

    /// Name of the ledger table
    #[arg(long, value_name = "NAME", global = true)]
    pub table: Option<String>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true)]
    pub busy_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Apply migrations and their prerequisites
    Up(UpCommand),

    /// Revert migrations
    Down(DownCommand),

    /// Show every migration and whether it is applied
    Status(StatusCommand),

    /// Check configuration and migration files without touching the ledger
    Validate(ValidateCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}

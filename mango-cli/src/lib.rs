//! Library exports for mango-cli.
//!
//! This module exports the CLI structure for use by the build script
//! and the CLI benchmarks.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::Cli;

//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `up`: Apply migrations and their prerequisites
//! - `down`: Revert migrations, dependents first
//! - `status`: Show the applied state of every migration
//! - `validate`: Check configuration and migration sources
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod down;
pub mod status;
pub mod up;
pub mod validate;

pub use completions::CompletionsCommand;
pub use down::DownCommand;
pub use status::StatusCommand;
pub use up::UpCommand;
pub use validate::ValidateCommand;

//! Shell completion generation command.
//!
//! This module provides the `completions` command which generates shell completion
//! scripts for bash, zsh, fish, and PowerShell.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use std::io;

/// Name of the installed binary.
const BIN_NAME: &str = "mango";

/// Generate shell completion scripts
#[derive(Parser)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Execute the completions command.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut cmd = Cli::command();

        if !global.quiet {
            match self.shell {
                Shell::Bash => {
                    eprintln!("# Install with:");
                    eprintln!(
                        "#   mango completions bash > ~/.local/share/bash-completion/completions/mango"
                    );
                }
                Shell::Zsh => {
                    eprintln!("# Install with:");
                    eprintln!("#   mango completions zsh > ~/.zsh/completions/_mango");
                }
                Shell::Fish => {
                    eprintln!("# Install with:");
                    eprintln!("#   mango completions fish > ~/.config/fish/completions/mango.fish");
                }
                Shell::PowerShell => {
                    eprintln!("# Install with:");
                    eprintln!("#   mango completions powershell | Out-String | Invoke-Expression");
                }
                _ => {}
            }
        }

        generate(self.shell, &mut cmd, BIN_NAME, &mut io::stdout());

        Ok(())
    }
}

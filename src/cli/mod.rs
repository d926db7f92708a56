//! CLI module for MedHub
//!
//! Provides command-line interface parsing for the medhub binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;
pub mod repl;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MedHub - Hospital Delegation Hub
///
/// Routes patient requests through an LLM Navigator to the specialist role
/// responsible for them.
#[derive(Parser, Debug)]
#[command(
    name = "medhub",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "MedHub - Hospital Delegation Hub",
    long_about = "MedHub - Hospital Delegation Hub\n\n\
                  A conversational front door for hospital requests. The Navigator validates\n\
                  intent and delegates to Medical Records, Billing & Finance, Patient Admin,\n\
                  or Scheduling.\n\n\
                  Run without arguments to start an interactive chat.",
    after_help = "EXAMPLES:\n    \
                  medhub                        # Interactive chat in the terminal\n    \
                  medhub serve --port 8080      # Serve the HTTP API\n    \
                  medhub roles                  # List roles and their mandates\n    \
                  medhub --config my.toml chat  # Use a custom config file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "medhub.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Chat with the hub in the terminal (default)
    Chat,

    /// Serve the HTTP API
    Serve {
        /// Host address (overrides [server].host)
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides [server].port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List roles, their mandates, and search settings
    Roles,

    /// Show configuration information
    Config {
        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The subcommand to run, defaulting to `chat`
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Chat)
    }
}

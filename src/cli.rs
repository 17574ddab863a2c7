//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// adscope - ad intelligence catalogue, favorites and agent task API
#[derive(Parser, Debug)]
#[command(name = "adscope")]
#[command(version)]
#[command(about = "Ad intelligence API server", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Load the bundled ad fixture into the configured backend
    Seed,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate an example configuration file
    Generate {
        /// Output path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}

//! Command-line interface for prism.
//!
//! The `prism` binary builds a template cache from the configured patterns and
//! either reports on it or renders a single page:
//!
//! - `list` - show every page key and the templates compiled into it
//! - `check` - compile all pages and report success
//! - `render` - render one page entry with JSON data to stdout
//!
//! # Configuration
//!
//! Patterns come from `prism.toml` (see [`crate::config`]), located via
//! `--config`, `PRISM_CONFIG`, or the working directory. Every subcommand also
//! accepts `--layouts`, `--pages`, and `--partials` to override one pattern.
//!
//! # Logging
//!
//! Log output goes to stderr. `RUST_LOG` takes precedence; otherwise `--verbose`
//! selects `debug`, `--quiet` selects `error`, and the default is `info`.

mod check;
mod common;
mod list;
mod render;


pub use check::CheckCommand;
pub use common::PatternArgs;
pub use list::{ListCommand, OutputFormat};
pub use render::RenderCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Settings derived from global flags, applied once before a command runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: Option<String>,

    /// Explicit configuration file from `--config`.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Configuration with no log level and no explicit config file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the stderr tracing subscriber.
    ///
    /// Safe to call more than once; later calls are ignored.
    pub fn init_logging(&self) {
        let filter = match std::env::var("RUST_LOG") {
            Ok(value) if !value.is_empty() => EnvFilter::new(value),
            _ => EnvFilter::new(self.log_level.as_deref().unwrap_or("info")),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Top-level `prism` command.
#[derive(Parser, Debug)]
#[command(
    name = "prism",
    about = "Compile and render HTML layouts, pages, and partials",
    version,
    long_about = "Prism compiles every page together with all layouts and partials into its own \
                  template set and renders pages by name with JSON data."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug output (equivalent to `RUST_LOG=debug`)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a prism.toml configuration file
    ///
    /// Relative patterns in the file are resolved against the file's directory.
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List page keys and the templates compiled into each
    List(ListCommand),

    /// Compile every page and report problems
    Check(CheckCommand),

    /// Render a page entry to stdout
    Render(RenderCommand),
}

impl Cli {
    /// Initialize logging and run the selected subcommand.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config)
    }

    /// Translate global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Run the subcommand with an explicit configuration.
    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let config_path = config.config_path.as_deref();
        match self.command {
            Commands::List(cmd) => cmd.execute(config_path),
            Commands::Check(cmd) => cmd.execute(config_path),
            Commands::Render(cmd) => cmd.execute(config_path),
        }
    }
}

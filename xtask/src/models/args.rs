//! # CLI Argument Definitions
//!
//! This module defines the command-line interface (CLI) structure using the `clap` crate.

use clap::{Parser, Subcommand};

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "cargo xtask")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Developer toolkit for the featureflag workspace")]
pub struct Cli {
    /// The main subcommand to execute.
    #[command(subcommand)]
    pub command: AppCommands,
}

/// Enumeration of available subcommands.
#[derive(Debug, Subcommand)]
pub enum AppCommands {
    /// Build and test every entry of the CI feature matrix
    Ci {
        /// Run a single matrix entry ('' for no features, 'all' for every feature)
        #[arg(short, long)]
        features: Option<String>,
        /// Print the cargo commands instead of running them
        #[arg(long)]
        dry_run: bool,
    },
    /// Run tests (workspace by default)
    Test {
        /// Run tests for a specific crate (auto-prefixes with 'featureflag-' if missing)
        project: Option<String>,
    },
    /// Run doc tests (workspace by default)
    Doctest {
        /// Run doc tests for a specific crate (auto-prefixes with 'featureflag-' if missing)
        project: Option<String>,
    },
    /// Run an example of the featureflag crate
    Example {
        /// Example name, e.g. 'basic'
        name: String,
        /// Comma-separated features to enable
        #[arg(short, long)]
        features: Option<String>,
    },
}

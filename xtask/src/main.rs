#![warn(rust_2018_idioms, unused_lifetimes)]
#![allow(clippy::print_stderr, clippy::print_stdout, clippy::disallowed_methods, clippy::disallowed_types)]

pub mod handlers;
pub mod models;
pub mod services;

use crate::handlers::{ci, run, testing};
use crate::models::args::{AppCommands, Cli};

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        AppCommands::Ci { features, dry_run } => ci::run_ci(features.as_deref(), dry_run)?,
        AppCommands::Test { project } => testing::run_tests(project.as_deref())?,
        AppCommands::Doctest { project } => testing::run_doctests(project.as_deref())?,
        AppCommands::Example { name, features } => run::run_example(&name, features.as_deref())?,
    }

    Ok(())
}

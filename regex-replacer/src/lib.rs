// regex-replacer/src/lib.rs
//! # regex-replacer CLI Application
//!
//! Command-line front end for `regex-replacer-core`. The binary in `main.rs`
//! only parses arguments and dispatches to `commands`.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
pub mod utils;

use anyhow::Result;

use cli::{Cli, Commands};

/// Runs a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Replace(cmd) => commands::replace::run_replace(cmd, cli.quiet),
        Commands::Stats(cmd) => commands::stats::run_stats(cmd),
        Commands::Check(cmd) => commands::check::run_check(cmd),
    }
}

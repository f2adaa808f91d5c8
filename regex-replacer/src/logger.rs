//! Logger setup for the binary. Library crates only use the `log` facade.

use env_logger::{Builder, Env};
use log::LevelFilter;

const CRATES: [&str; 2] = ["regex_replacer", "regex_replacer_core"];

/// Initializes `env_logger` from `RUST_LOG` (default `warn`).
///
/// `Some(LevelFilter::Off)` silences everything. Any other override is applied
/// to this workspace's crates only, leaving `RUST_LOG` in charge of the rest.
pub fn init_logger(level_override: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    builder.format_timestamp(None);

    match level_override {
        Some(LevelFilter::Off) => {
            builder.filter_level(LevelFilter::Off);
        }
        Some(level) => {
            for krate in CRATES {
                builder.filter_module(krate, level);
            }
        }
        None => {}
    }

    // A second initialization (e.g. from tests) is harmless.
    let _ = builder.try_init();
}

/// Maps the global CLI flags onto a level override.
pub fn level_from_flags(quiet: bool, debug: bool, disable_debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if disable_debug {
        Some(LevelFilter::Info)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}

//! Subcommand implementations.

pub mod check;
pub mod replace;
pub mod stats;

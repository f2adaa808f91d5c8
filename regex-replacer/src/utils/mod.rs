//! Helpers shared by the subcommands.

pub mod input;
pub mod rules;

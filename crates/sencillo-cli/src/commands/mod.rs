//! Subcommand implementations.

pub mod engines;
pub mod fold;
pub mod process;

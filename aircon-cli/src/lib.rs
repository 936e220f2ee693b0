//! Library exports for aircon-cli.
//!
//! Exposes the CLI structure so tooling can render man pages and completions.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::Cli;

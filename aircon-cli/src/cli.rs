//! CLI structure and command definitions.

use crate::commands::{CheckCommand, CompletionsCommand, GenerateCommand, InspectCommand};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Compile remote configuration declarations into typed provider code.
#[derive(Parser)]
#[command(name = "aircon")]
#[command(version, about = "Compile remote configuration declarations into provider code", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Use this settings file instead of discovering aircon.yaml
    #[arg(long, value_name = "PATH", global = true, env = "AIRCON_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Compile schemas and write provider modules
    Generate(GenerateCommand),

    /// Check schemas and report every diagnostic
    Check(CheckCommand),

    /// Show the resolved configs of a schema
    Inspect(InspectCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}

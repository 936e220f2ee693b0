//! Build script for aircon-cli.
//!
//! Renders the `aircon.1` man page into `OUT_DIR` with `clap_mangen`.
//!
//! Build scripts cannot depend on the crate being built, so the command
//! structure is declared here as well.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// Keep in sync with src/cli.rs and src/commands/.
fn build_cli() -> Command {
    Command::new("aircon")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile remote configuration declarations into provider code")
        .long_about(
            "Compiles YAML declarations of remotely controlled configs into typed Rust provider modules",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("settings")
                .long("settings")
                .help("Use this settings file instead of discovering aircon.yaml")
                .value_name("PATH")
                .global(true)
                .env("AIRCON_SETTINGS"),
        )
        .subcommands(vec![
            Command::new("generate")
                .about("Compile schemas and write provider modules")
                .long_about("Compile schema files and write one provider module per config group"),
            Command::new("check")
                .about("Check schemas and report every diagnostic")
                .long_about("Resolve schema files and print all diagnostics without writing output"),
            Command::new("inspect")
                .about("Show the resolved configs of a schema")
                .long_about("Print resolved configs as a table, JSON, YAML, or CSV"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("aircon.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}

//! Generate command implementation.

use crate::error::CliError;
use crate::utils::{load_declarations, load_settings, schema_paths, GlobalOptions};
use aircon::{Compiler, Settings};
use clap::Args;
use std::path::PathBuf;

/// Compile schemas and write provider modules.
#[derive(Args)]
pub struct GenerateCommand {
    /// Schema files, compiled together in order (default: `schemas` from settings)
    #[arg(value_name = "SCHEMA")]
    pub schemas: Vec<PathBuf>,

    /// Directory to write generated modules into
    #[arg(long, short = 'o', value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Path generated code imports the runtime from
    #[arg(long, value_name = "PATH")]
    pub runtime_path: Option<String>,

    /// Comment text added to every generated file header
    #[arg(long, value_name = "TEXT")]
    pub header: Option<String>,

    /// Do not write a mod.rs declaring the generated modules
    #[arg(long)]
    pub no_mod_file: bool,

    /// Print the files that would be written without writing them
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    /// Execute the generate command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let overrides = Settings {
            output_dir: self.out_dir,
            runtime_path: self.runtime_path,
            emit_mod_file: self.no_mod_file.then_some(false),
            header: self.header,
            schemas: None,
        };
        let settings = load_settings(global, overrides)?;
        let paths = schema_paths(&self.schemas, &settings)?;
        let decls = load_declarations(&paths)?;

        let output = Compiler::from_settings(&settings).compile(&decls)?;
        let out_dir = settings.output_dir();

        if self.dry_run {
            for unit in &output.units {
                println!("{}", out_dir.join(&unit.file_name).display());
            }
            return Ok(());
        }

        let written = output.write_to(&out_dir)?;
        if !global.quiet {
            eprintln!(
                "Generated {} file(s) in {}",
                written.len(),
                out_dir.display()
            );
        }
        if global.verbose {
            for path in &written {
                eprintln!("  {}", path.display());
            }
        }
        Ok(())
    }
}

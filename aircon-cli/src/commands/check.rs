//! Check command implementation.

use crate::error::CliError;
use crate::utils::{load_declarations, load_settings, schema_paths, write_diagnostics, GlobalOptions};
use aircon::{Compiler, Error, Settings};
use clap::{Args, ValueEnum};
use std::io::Write;
use std::path::PathBuf;

/// Check schemas and report every diagnostic.
#[derive(Args)]
pub struct CheckCommand {
    /// Schema files, checked together in order (default: `schemas` from settings)
    #[arg(value_name = "SCHEMA")]
    pub schemas: Vec<PathBuf>,

    /// Diagnostic output format
    #[arg(long, value_enum, default_value = "text", ignore_case = true)]
    pub format: DiagnosticFormat,
}

/// How diagnostics are printed.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum DiagnosticFormat {
    /// One line per diagnostic
    Text,
    /// A JSON array of diagnostic objects
    Json,
}

impl CheckCommand {
    /// Execute the check command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let settings = load_settings(global, Settings::default())?;
        let paths = schema_paths(&self.schemas, &settings)?;
        let decls = load_declarations(&paths)?;

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();

        match Compiler::from_settings(&settings).check(&decls) {
            Ok(schema) => {
                match self.format {
                    DiagnosticFormat::Json => writeln!(handle, "[]")?,
                    DiagnosticFormat::Text if !global.quiet => writeln!(
                        handle,
                        "OK: {} config(s) in {} group(s)",
                        schema.configs.len(),
                        schema.groups.len()
                    )?,
                    DiagnosticFormat::Text => {}
                }
                Ok(())
            }
            Err(Error::Compile(diagnostics)) => {
                match self.format {
                    DiagnosticFormat::Text => write_diagnostics(&mut handle, &diagnostics)?,
                    DiagnosticFormat::Json => {
                        serde_json::to_writer_pretty(&mut handle, &diagnostics)?;
                        writeln!(handle)?;
                    }
                }
                Err(CliError::Diagnostics(diagnostics.len()))
            }
            Err(other) => Err(other.into()),
        }
    }
}

//! Utility functions shared by the CLI commands.

use crate::error::CliError;
use aircon::declaration::Declarations;
use aircon::{Diagnostics, Settings, SettingsBuilder};
use std::io::Write;
use std::path::PathBuf;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Explicit settings file.
    pub settings: Option<PathBuf>,
}

/// Loads layered settings, applying command-line overrides last.
///
/// Any failure is reported as a settings error.
pub fn load_settings(global: &GlobalOptions, overrides: Settings) -> Result<Settings, CliError> {
    let mut builder = SettingsBuilder::new().with_settings(overrides);
    if let Some(path) = &global.settings {
        if !path.is_file() {
            return Err(CliError::Settings(format!(
                "settings file not found: {}",
                path.display()
            )));
        }
        builder = builder.with_settings_file(path);
    }
    builder
        .build()
        .map_err(|e| CliError::Settings(e.to_string()))
}

/// The schema files to compile: those given on the command line, or else the
/// `schemas` list from settings.
pub fn schema_paths(args: &[PathBuf], settings: &Settings) -> Result<Vec<PathBuf>, CliError> {
    let paths = if args.is_empty() {
        settings.schemas.clone().unwrap_or_default()
    } else {
        args.to_vec()
    };
    if paths.is_empty() {
        return Err(CliError::InvalidArguments(
            "no schema files given and none configured in settings".to_string(),
        ));
    }
    if let Some(missing) = paths.iter().find(|p| !p.is_file()) {
        return Err(CliError::InvalidArguments(format!(
            "schema file not found: {}",
            missing.display()
        )));
    }
    Ok(paths)
}

/// Loads and concatenates schema files.
pub fn load_declarations(paths: &[PathBuf]) -> Result<Declarations, CliError> {
    Ok(Declarations::load_all(paths)?)
}

/// Writes one diagnostic per line.
pub fn write_diagnostics(out: &mut impl Write, diagnostics: &Diagnostics) -> Result<(), CliError> {
    for diagnostic in diagnostics.iter() {
        writeln!(out, "{diagnostic}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_schema_paths_prefers_arguments() {
        let dir = TempDir::new().unwrap();
        let given = dir.path().join("given.yaml");
        let configured = dir.path().join("configured.yaml");
        fs::write(&given, "").unwrap();
        fs::write(&configured, "").unwrap();
        let settings = Settings {
            schemas: Some(vec![configured.clone()]),
            ..Default::default()
        };

        assert_eq!(schema_paths(&[given.clone()], &settings).unwrap(), [given]);
        assert_eq!(schema_paths(&[], &settings).unwrap(), [configured]);
    }

    #[test]
    fn test_schema_paths_errors() {
        assert!(matches!(
            schema_paths(&[], &Settings::default()),
            Err(CliError::InvalidArguments(_))
        ));
        assert!(matches!(
            schema_paths(&[PathBuf::from("/nonexistent/schema.yaml")], &Settings::default()),
            Err(CliError::InvalidArguments(_))
        ));
    }
}

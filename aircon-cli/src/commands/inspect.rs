//! Inspect command implementation.
//!
//! Prints one row per resolved config in table, JSON, YAML, or CSV form.

use crate::error::CliError;
use crate::utils::{load_declarations, load_settings, schema_paths, GlobalOptions};
use aircon::resolve::ConfigSummary;
use aircon::{Compiler, Settings};
use clap::{Args, ValueEnum};
use std::io::Write;
use std::path::PathBuf;

/// Column headers for table and CSV output.
const COLUMN_HEADERS: [&str; 10] = [
    "key",
    "type",
    "exposed_type",
    "source",
    "mutable",
    "group",
    "default",
    "validator",
    "adapter",
    "mock",
];

/// Show the resolved configs of a schema.
#[derive(Args)]
pub struct InspectCommand {
    /// Schema files (default: `schemas` from settings)
    #[arg(value_name = "SCHEMA")]
    pub schemas: Vec<PathBuf>,

    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "table",
        env = "AIRCON_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,

    /// Only show configs of this group
    #[arg(long, value_name = "GROUP")]
    pub group: Option<String>,
}

/// Output format for the inspect command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// CSV format
    Csv,
}

impl InspectCommand {
    /// Execute the inspect command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let settings = load_settings(global, Settings::default())?;
        let paths = schema_paths(&self.schemas, &settings)?;
        let decls = load_declarations(&paths)?;
        let schema = Compiler::from_settings(&settings).check(&decls)?;

        let mut rows = schema.summary();
        if let Some(group) = &self.group {
            if schema.group(group).is_none() {
                return Err(CliError::InvalidArguments(format!("unknown group '{group}'")));
            }
            rows.retain(|row| &row.group == group);
        }

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        match self.format {
            OutputFormat::Table => format_as_table(&mut handle, &rows)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut handle, &rows)?;
                writeln!(handle)?;
            }
            OutputFormat::Yaml => {
                let text = serde_yaml::to_string(&rows).map_err(|e| CliError::Io(std::io::Error::other(e)))?;
                write!(handle, "{text}")?;
            }
            OutputFormat::Csv => format_as_csv(&mut handle, &rows)?,
        }
        Ok(())
    }
}

fn cells(row: &ConfigSummary, empty: &str) -> [String; 10] {
    let or_empty = |value: &Option<String>| value.clone().unwrap_or_else(|| empty.to_string());
    [
        row.key.clone(),
        row.value_type.clone(),
        row.exposed_type.clone(),
        row.source.clone(),
        row.mutable.to_string(),
        row.group.clone(),
        row.default.clone(),
        or_empty(&row.validator),
        or_empty(&row.adapter),
        or_empty(&row.mock),
    ]
}

/// Format rows as a human-readable table.
fn format_as_table(out: &mut impl Write, rows: &[ConfigSummary]) -> Result<(), CliError> {
    let header_line = COLUMN_HEADERS
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(out, "{header_line}")?;

    for row in rows {
        writeln!(out, "{}", cells(row, "-").join("\t"))?;
    }
    Ok(())
}

/// Format rows as CSV.
fn format_as_csv(out: &mut impl Write, rows: &[ConfigSummary]) -> Result<(), CliError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(COLUMN_HEADERS)?;
    for row in rows {
        writer.write_record(cells(row, ""))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ConfigSummary {
        ConfigSummary {
            key: "MESSAGE".into(),
            value_type: "string".into(),
            exposed_type: "String".into(),
            source: "remote".into(),
            mutable: false,
            group: "MY_GROUP".into(),
            default: "resource onboarding_message".into(),
            validator: None,
            adapter: None,
            mock: Some("crate::mocks::message".into()),
        }
    }

    #[test]
    fn test_table_uses_dashes_for_missing_bindings() {
        let mut out = Vec::new();
        format_as_table(&mut out, &[row()]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("KEY\tTYPE\tEXPOSED_TYPE"));
        assert_eq!(
            lines.next().unwrap(),
            "MESSAGE\tstring\tString\tremote\tfalse\tMY_GROUP\tresource onboarding_message\t-\t-\tcrate::mocks::message"
        );
    }

    #[test]
    fn test_csv_quotes_and_blanks() {
        let mut out = Vec::new();
        format_as_csv(&mut out, &[row()]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.lines().nth(1).unwrap(),
            "MESSAGE,string,String,remote,false,MY_GROUP,resource onboarding_message,,,crate::mocks::message"
        );
    }
}

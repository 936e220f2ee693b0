//! Settings file structure.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::emit::EmitOptions;
use crate::model::CANONICAL_RUNTIME;

/// Output directory used when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "generated";

/// Compiler settings, as read from `settings.yaml` / `aircon.yaml`.
///
/// Every field is optional so that layers can be merged; accessors fill in the
/// built-in defaults.
///
/// # Examples
///
/// ```
/// use aircon::settings::Settings;
///
/// let settings: Settings = serde_yaml::from_str("runtime_path: my_app::runtime").unwrap();
/// assert_eq!(settings.emit_options().runtime_path, "my_app::runtime");
/// assert!(settings.emit_options().emit_mod_file);
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Where generated files are written.
    pub output_dir: Option<PathBuf>,

    /// Path generated code imports the runtime from.
    pub runtime_path: Option<String>,

    /// Whether to write a `mod.rs` declaring every unit.
    pub emit_mod_file: Option<bool>,

    /// Extra comment lines for generated file headers.
    pub header: Option<String>,

    /// Schema files compiled when none are given on the command line.
    pub schemas: Option<Vec<PathBuf>>,
}

impl Settings {
    /// Emitter options with defaults applied.
    #[must_use]
    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            runtime_path: self
                .runtime_path
                .clone()
                .unwrap_or_else(|| CANONICAL_RUNTIME.to_string()),
            header: self.header.clone(),
            emit_mod_file: self.emit_mod_file.unwrap_or(true),
        }
    }

    /// The output directory with the default applied.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    /// Resolves relative paths against `base`, the directory of the file the
    /// settings were read from.
    pub(crate) fn rebase(&mut self, base: &Path) {
        if let Some(dir) = &mut self.output_dir {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        if let Some(schemas) = &mut self.schemas {
            for schema in schemas.iter_mut() {
                if schema.is_relative() {
                    *schema = base.join(&*schema);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.emit_options(), EmitOptions::default());
        assert_eq!(settings.output_dir(), PathBuf::from(DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<Settings, _> = serde_yaml::from_str("output: x");
        assert!(result.is_err());
    }

    #[test]
    fn test_rebase() {
        let mut settings = Settings {
            output_dir: Some(PathBuf::from("out")),
            schemas: Some(vec![PathBuf::from("a.yaml"), PathBuf::from("/abs/b.yaml")]),
            ..Default::default()
        };
        settings.rebase(Path::new("/project"));
        assert_eq!(settings.output_dir, Some(PathBuf::from("/project/out")));
        assert_eq!(
            settings.schemas,
            Some(vec![
                PathBuf::from("/project/a.yaml"),
                PathBuf::from("/abs/b.yaml")
            ])
        );
    }
}

//! Layered settings construction.

use std::path::PathBuf;

use crate::error::Result;
use crate::settings::environment::SettingsEnvironment;
use crate::settings::loader::SettingsLoader;
use crate::settings::merger::SettingsMerger;
use crate::settings::schema::Settings;
use crate::settings::validator::SettingsValidator;

/// Builds [`Settings`] from every layer.
///
/// Precedence, lowest first: built-in defaults, the user settings file, the
/// project file (or an explicit file), `AIRCON_*` variables, and overrides
/// passed to [`SettingsBuilder::with_settings`].
///
/// # Examples
///
/// ```
/// use aircon::settings::{Settings, SettingsBuilder};
///
/// let settings = SettingsBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_settings(Settings { header: Some("team: growth".into()), ..Default::default() })
///     .build()
///     .unwrap();
/// assert_eq!(settings.header.as_deref(), Some("team: growth"));
/// ```
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    working_dir: Option<PathBuf>,
    user_dir: Option<PathBuf>,
    settings_file: Option<PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Option<Settings>,
}

impl SettingsBuilder {
    /// A builder that reads every layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory project discovery starts from (default: current directory).
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Replaces `~/.aircon` as the user settings directory.
    #[must_use]
    pub fn with_user_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_dir = Some(dir.into());
        self
    }

    /// Uses `path` instead of discovering `aircon.yaml`.
    #[must_use]
    pub fn with_settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_file = Some(path.into());
        self
    }

    /// Ignores settings files.
    #[must_use]
    pub fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Ignores environment variables.
    #[must_use]
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Programmatic overrides, applied last.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.overrides = Some(settings);
        self
    }

    /// Loads, merges and validates.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file cannot be read or parsed, an
    /// environment variable is malformed, or the merged result is invalid.
    pub fn build(self) -> Result<Settings> {
        let mut settings = if self.skip_files {
            Settings::default()
        } else {
            self.load_files()?
        };

        if !self.skip_env {
            SettingsEnvironment::apply_overrides(&mut settings)?;
        }
        if let Some(overrides) = &self.overrides {
            SettingsMerger::merge_into(&mut settings, overrides);
        }

        SettingsValidator::validate(&settings)?;
        Ok(settings)
    }

    fn load_files(&self) -> Result<Settings> {
        let working_dir = match &self.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        let user_dir = self.user_dir.as_deref();

        let files = match &self.settings_file {
            Some(path) => SettingsLoader::load_user_settings(user_dir)?
                .into_iter()
                .chain(std::iter::once(SettingsLoader::load_at(path, 2)?))
                .collect(),
            None => SettingsLoader::load_all(&working_dir, user_dir)?,
        };
        Ok(SettingsMerger::merge(files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_only() {
        let settings = SettingsBuilder::new().skip_files().skip_env().build().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_project_overrides_user() {
        let user = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        fs::write(user.path().join("settings.yaml"), "header: user\nemit_mod_file: false").unwrap();
        fs::write(project.path().join("aircon.yaml"), "header: project").unwrap();

        let settings = SettingsBuilder::new()
            .with_working_dir(project.path())
            .with_user_dir(user.path())
            .skip_env()
            .build()
            .unwrap();
        assert_eq!(settings.header.as_deref(), Some("project"));
        assert_eq!(settings.emit_mod_file, Some(false));
    }

    #[test]
    fn test_explicit_file_replaces_discovery() {
        let user = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("aircon.yaml"), "header: discovered").unwrap();
        let explicit = project.path().join("custom.yaml");
        fs::write(&explicit, "header: explicit").unwrap();

        let settings = SettingsBuilder::new()
            .with_working_dir(project.path())
            .with_user_dir(user.path())
            .with_settings_file(&explicit)
            .skip_env()
            .build()
            .unwrap();
        assert_eq!(settings.header.as_deref(), Some("explicit"));
    }

    #[test]
    fn test_invalid_result_rejected() {
        let result = SettingsBuilder::new()
            .skip_files()
            .skip_env()
            .with_settings(Settings {
                runtime_path: Some("no good".into()),
                ..Default::default()
            })
            .build();
        assert!(result.is_err());
    }
}

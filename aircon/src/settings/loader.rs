//! Settings file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::settings::schema::Settings;

/// Name of the project settings file.
pub const PROJECT_FILE: &str = "aircon.yaml";

/// Name of the user settings file inside the user directory.
pub const USER_FILE: &str = "settings.yaml";

/// A loaded settings file and its precedence.
///
/// Lower precedence values are overridden by higher ones.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    /// Path the settings were read from.
    pub path: PathBuf,
    /// Precedence level (higher values take priority).
    pub precedence: u8,
    /// Parsed settings, with relative paths resolved against the file.
    pub settings: Settings,
}

/// Loads settings files.
///
/// # Examples
///
/// ```no_run
/// use aircon::settings::SettingsLoader;
/// use std::path::Path;
///
/// let files = SettingsLoader::load_all(Path::new("."), None).unwrap();
/// println!("found {} settings file(s)", files.len());
/// ```
pub struct SettingsLoader;

impl SettingsLoader {
    /// Discovers and loads every settings file, lowest precedence first.
    ///
    /// 1. User settings at `~/.aircon/settings.yaml` (precedence 1); `user_dir`
    ///    replaces `~/.aircon`.
    /// 2. The nearest `aircon.yaml` walking up from `working_dir` (precedence 2).
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but cannot be read or parsed.
    pub fn load_all(working_dir: &Path, user_dir: Option<&Path>) -> Result<Vec<SettingsFile>> {
        let mut files = Vec::new();
        if let Some(user) = Self::load_user_settings(user_dir)? {
            files.push(user);
        }
        if let Some(path) = Self::discover_project_file(working_dir) {
            files.push(Self::load_at(&path, 2)?);
        }
        files.sort_by_key(|f| f.precedence);
        Ok(files)
    }

    /// Loads the user settings file, if there is one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_user_settings(user_dir: Option<&Path>) -> Result<Option<SettingsFile>> {
        let path = match user_dir {
            Some(dir) => dir.join(USER_FILE),
            None => match Self::default_user_dir() {
                Some(dir) => dir.join(USER_FILE),
                None => {
                    log::debug!("no home directory; skipping user settings");
                    return Ok(None);
                }
            },
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_at(&path, 1).map(Some)
    }

    /// `~/.aircon`, if the home directory is known.
    #[must_use]
    pub fn default_user_dir() -> Option<PathBuf> {
        home::home_dir().map(|home| home.join(".aircon"))
    }

    /// The nearest `aircon.yaml` at or above `start_dir`.
    #[must_use]
    pub fn discover_project_file(start_dir: &Path) -> Option<PathBuf> {
        start_dir
            .ancestors()
            .map(|dir| dir.join(PROJECT_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Loads one file at the given precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_at(path: &Path, precedence: u8) -> Result<SettingsFile> {
        let mut settings = Self::load_file(path)?;
        if let Some(base) = path.parent() {
            settings.rebase(base);
        }
        log::debug!("loaded settings from {}", path.display());
        Ok(SettingsFile {
            path: path.to_path_buf(),
            precedence,
            settings,
        })
    }

    /// Parses a settings file as is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Parse`]
    /// if it is not valid settings YAML.
    pub fn load_file(path: &Path) -> Result<Settings> {
        let contents = fs::read_to_string(path)?;
        serde_yaml::from_str(&contents).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

//! `AIRCON_*` environment variable overrides.

use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::settings::schema::Settings;

/// Overrides `output_dir`.
pub const OUTPUT_DIR_ENV: &str = "AIRCON_OUTPUT_DIR";
/// Overrides `runtime_path`.
pub const RUNTIME_PATH_ENV: &str = "AIRCON_RUNTIME_PATH";
/// Overrides `emit_mod_file`.
pub const EMIT_MOD_FILE_ENV: &str = "AIRCON_EMIT_MOD_FILE";
/// Overrides `header`.
pub const HEADER_ENV: &str = "AIRCON_HEADER";

/// Applies environment overrides to settings.
///
/// # Examples
///
/// ```no_run
/// use aircon::settings::{Settings, SettingsEnvironment};
///
/// let mut settings = Settings::default();
/// SettingsEnvironment::apply_overrides(&mut settings).unwrap();
/// ```
pub struct SettingsEnvironment;

impl SettingsEnvironment {
    /// Reads every `AIRCON_*` variable and applies it over `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Settings`] if a value cannot be parsed.
    pub fn apply_overrides(settings: &mut Settings) -> Result<()> {
        if let Ok(dir) = env::var(OUTPUT_DIR_ENV) {
            settings.output_dir = Some(PathBuf::from(dir));
        }
        if let Ok(path) = env::var(RUNTIME_PATH_ENV) {
            settings.runtime_path = Some(path);
        }
        if let Ok(value) = env::var(EMIT_MOD_FILE_ENV) {
            settings.emit_mod_file = Some(Self::parse_bool(EMIT_MOD_FILE_ENV, &value)?);
        }
        if let Ok(header) = env::var(HEADER_ENV) {
            settings.header = Some(header);
        }
        Ok(())
    }

    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Settings {
                field: field.into(),
                message: format!(
                    "invalid boolean value '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct EnvGuard {
        key: &'static str,
        old: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let old = env::var(key).ok();
            env::set_var(key, value);
            Self { key, old }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old {
                Some(value) => env::set_var(self.key, value),
                None => env::remove_var(self.key),
            }
        }
    }

    #[test]
    fn test_parse_bool() {
        assert!(SettingsEnvironment::parse_bool("x", "YES").unwrap());
        assert!(!SettingsEnvironment::parse_bool("x", "off").unwrap());
        assert!(SettingsEnvironment::parse_bool("x", "maybe").is_err());
    }

    #[test]
    #[serial]
    fn test_overrides_applied() {
        let _dir = EnvGuard::set(OUTPUT_DIR_ENV, "/tmp/gen");
        let _mod = EnvGuard::set(EMIT_MOD_FILE_ENV, "false");
        let mut settings = Settings {
            header: Some("kept".into()),
            ..Default::default()
        };
        SettingsEnvironment::apply_overrides(&mut settings).unwrap();
        assert_eq!(settings.output_dir, Some(PathBuf::from("/tmp/gen")));
        assert_eq!(settings.emit_mod_file, Some(false));
        assert_eq!(settings.header.as_deref(), Some("kept"));
    }

    #[test]
    #[serial]
    fn test_invalid_bool_is_a_settings_error() {
        let _mod = EnvGuard::set(EMIT_MOD_FILE_ENV, "sometimes");
        let mut settings = Settings::default();
        assert!(matches!(
            SettingsEnvironment::apply_overrides(&mut settings),
            Err(Error::Settings { .. })
        ));
    }
}

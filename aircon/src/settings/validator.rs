//! Settings validation.

use crate::emit::naming;
use crate::error::{Error, Result};
use crate::settings::schema::Settings;

/// Validates merged settings.
///
/// # Examples
///
/// ```
/// use aircon::settings::{Settings, SettingsValidator};
///
/// SettingsValidator::validate(&Settings::default()).unwrap();
///
/// let bad = Settings { runtime_path: Some("not a path".into()), ..Default::default() };
/// assert!(SettingsValidator::validate(&bad).is_err());
/// ```
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validates every field that is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Settings`] naming the first invalid field.
    pub fn validate(settings: &Settings) -> Result<()> {
        if let Some(path) = &settings.runtime_path {
            Self::validate_rust_path("runtime_path", path)?;
        }
        if let Some(dir) = &settings.output_dir {
            if dir.as_os_str().is_empty() {
                return Err(Error::Settings {
                    field: "output_dir".into(),
                    message: "cannot be empty".into(),
                });
            }
        }
        if let Some(schemas) = &settings.schemas {
            if schemas.iter().any(|s| s.as_os_str().is_empty()) {
                return Err(Error::Settings {
                    field: "schemas".into(),
                    message: "schema paths cannot be empty".into(),
                });
            }
        }
        Ok(())
    }

    /// A `::`-separated path of identifiers, optionally with a leading `::`.
    fn validate_rust_path(field: &str, path: &str) -> Result<()> {
        let trimmed = path.strip_prefix("::").unwrap_or(path);
        let valid = !trimmed.is_empty()
            && trimmed.split("::").all(|segment| {
                let mut chars = segment.chars();
                chars
                    .next()
                    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            });
        if !valid {
            return Err(Error::Settings {
                field: field.into(),
                message: format!("'{path}' is not a Rust module path"),
            });
        }
        let keyword = trimmed.split("::").find(|segment| {
            !matches!(*segment, "crate" | "self" | "super") && naming::escape(segment) != *segment
        });
        if let Some(keyword) = keyword {
            return Err(Error::Settings {
                field: field.into(),
                message: format!("'{path}' contains the keyword '{keyword}'"),
            });
        }
        Ok(())
    }
}

//! Settings layering.

use crate::settings::loader::SettingsFile;
use crate::settings::schema::Settings;

/// Merges settings layers; later layers win field by field.
///
/// # Examples
///
/// ```
/// use aircon::settings::{Settings, SettingsMerger};
///
/// let low = Settings { header: Some("low".into()), ..Default::default() };
/// let high = Settings { header: Some("high".into()), ..Default::default() };
///
/// let mut result = low;
/// SettingsMerger::merge_into(&mut result, &high);
/// assert_eq!(result.header.as_deref(), Some("high"));
/// ```
pub struct SettingsMerger;

impl SettingsMerger {
    /// Merges files given lowest precedence first.
    #[must_use]
    pub fn merge(files: Vec<SettingsFile>) -> Settings {
        let mut result = Settings::default();
        for file in files {
            Self::merge_into(&mut result, &file.settings);
        }
        result
    }

    /// Overwrites each field of `target` that `source` sets. The schema list
    /// is replaced, not concatenated.
    pub fn merge_into(target: &mut Settings, source: &Settings) {
        if source.output_dir.is_some() {
            target.output_dir.clone_from(&source.output_dir);
        }
        if source.runtime_path.is_some() {
            target.runtime_path.clone_from(&source.runtime_path);
        }
        if source.emit_mod_file.is_some() {
            target.emit_mod_file = source.emit_mod_file;
        }
        if source.header.is_some() {
            target.header.clone_from(&source.header);
        }
        if source.schemas.is_some() {
            target.schemas.clone_from(&source.schemas);
        }
    }
}

//! Property-based tests for settings merging and validation.

use std::path::PathBuf;

use proptest::prelude::*;

use super::*;

fn arb_settings() -> impl Strategy<Value = Settings> {
    (
        proptest::option::of("[a-z]{1,8}(/[a-z]{1,8}){0,2}"),
        proptest::option::of("x[a-z0-9_]{0,6}(::x[a-z0-9_]{0,6}){0,2}"),
        proptest::option::of(any::<bool>()),
        proptest::option::of("[ -~]{0,20}"),
    )
        .prop_map(|(dir, runtime, emit_mod, header)| Settings {
            output_dir: dir.map(PathBuf::from),
            runtime_path: runtime,
            emit_mod_file: emit_mod,
            header,
            schemas: None,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn merging_default_is_identity(settings in arb_settings()) {
        let mut merged = settings.clone();
        SettingsMerger::merge_into(&mut merged, &Settings::default());
        prop_assert_eq!(merged, settings);
    }

    #[test]
    fn merging_is_idempotent(base in arb_settings(), layer in arb_settings()) {
        let mut once = base.clone();
        SettingsMerger::merge_into(&mut once, &layer);
        let mut twice = once.clone();
        SettingsMerger::merge_into(&mut twice, &layer);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn set_fields_win(base in arb_settings(), layer in arb_settings()) {
        let mut merged = base.clone();
        SettingsMerger::merge_into(&mut merged, &layer);
        if layer.header.is_some() {
            prop_assert_eq!(&merged.header, &layer.header);
        } else {
            prop_assert_eq!(&merged.header, &base.header);
        }
        if layer.emit_mod_file.is_some() {
            prop_assert_eq!(merged.emit_mod_file, layer.emit_mod_file);
        }
    }

    #[test]
    fn generated_runtime_paths_validate(
        segments in proptest::collection::vec("x[a-z0-9_]{2,8}", 1..4)
    ) {
        let settings = Settings {
            runtime_path: Some(segments.join("::")),
            ..Default::default()
        };
        prop_assert!(SettingsValidator::validate(&settings).is_ok());
    }
}

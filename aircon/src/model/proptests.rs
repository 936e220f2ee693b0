//! Property-based tests for declaration checking.

use proptest::prelude::*;

use crate::declaration::Declarations;
use crate::error::DiagnosticKind;
use crate::model::ModelBuilder;

fn feature_yaml(name: &str, keys: &[String]) -> String {
    let configs: Vec<String> = keys
        .iter()
        .map(|key| format!("      - {{ key: {key}, type: boolean }}"))
        .collect();
    format!("  - name: {name}\n    source: remote\n    configs:\n{}\n", configs.join("\n"))
}

fn schema_yaml(features: &[(String, Vec<String>)]) -> String {
    let mut yaml = String::from("sources: [{ id: remote }]\nfeatures:\n");
    for (name, keys) in features {
        yaml.push_str(&feature_yaml(name, keys));
    }
    yaml
}

/// Keys without underscores, so distinct keys keep distinct accessor names.
fn arb_keys() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::btree_set("K[A-Z0-9]{1,6}", 2..8)
        .prop_map(|keys| keys.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn distinct_keys_build(keys in arb_keys()) {
        let decls = Declarations::from_yaml_str(&schema_yaml(&[("Feature".into(), keys.clone())])).unwrap();
        let graph = ModelBuilder::build(&decls).unwrap();
        prop_assert_eq!(graph.elements.len(), keys.len());
    }

    #[test]
    fn duplicates_detected_in_any_order(
        keys in arb_keys(),
        pick in any::<prop::sample::Index>(),
        split in any::<prop::sample::Index>(),
        shuffle_seed in any::<u64>(),
    ) {
        let duplicate = keys[pick.index(keys.len())].clone();
        let mut all = keys.clone();
        all.push(duplicate.clone());

        // Deterministic shuffle from the seed.
        let mut state = shuffle_seed | 1;
        for i in (1..all.len()).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let j = usize::try_from(state % (i as u64 + 1)).unwrap();
            all.swap(i, j);
        }

        let at = split.index(all.len() + 1);
        let features = vec![
            ("First".to_string(), all[..at].to_vec()),
            ("Second".to_string(), all[at..].to_vec()),
        ];
        let features: Vec<_> = features.into_iter().filter(|(_, k)| !k.is_empty()).collect();

        let decls = Declarations::from_yaml_str(&schema_yaml(&features)).unwrap();
        let err = ModelBuilder::build(&decls).unwrap_err();
        let diagnostics = err.diagnostics().unwrap();
        prop_assert!(diagnostics.has_kind(DiagnosticKind::DuplicateKey));
        let reported = diagnostics.iter().next().unwrap();
        prop_assert_eq!(&reported.keys, &vec![duplicate]);
    }
}

fn enum_yaml(constants: &[(String, String)], default: &str) -> String {
    let body: Vec<String> = constants
        .iter()
        .map(|(name, raw)| format!("{{ name: {name}, value: '{raw}' }}"))
        .collect();
    format!(
        "sources: [{{ id: S }}]\nfeatures:\n  - name: Modes\n    source: S\n    configs:\n      - key: MODE\n        type: string-enum\n        enum: {{ name: Mode, constants: [{}] }}\n        default: {{ value: {default} }}\n",
        body.join(", ")
    )
}

fn arb_constants() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::btree_map("V[a-z]{1,6}", "[a-z]{1,6}", 1..6).prop_map(|map| {
        let mut seen = std::collections::BTreeSet::new();
        map.into_iter()
            .filter(|(_, raw)| seen.insert(raw.clone()))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn enum_raw_values_decode_to_their_constant(
        constants in arb_constants(),
        unknown in "[A-Z]{1,6}",
    ) {
        use std::sync::Arc;
        use crate::interpreter::{FunctionTable, Interpreter, Value};
        use crate::resolve::Resolver;
        use crate::runtime::{MemorySource, ProviderContext, RawValue};

        let default = constants[0].0.clone();
        let decls = Declarations::from_yaml_str(&enum_yaml(&constants, &default)).unwrap();
        let graph = ModelBuilder::build(&decls).unwrap();
        let schema = Resolver::resolve(&graph).unwrap();

        for (name, raw) in &constants {
            let source = MemorySource::read_only().with("MODE", RawValue::String(raw.clone()));
            let ctx = Arc::new(ProviderContext::default().with_source("S", source));
            let interpreter = Interpreter::new(&schema, ctx, FunctionTable::new());
            prop_assert_eq!(interpreter.get("MODE").unwrap(), Value::Enum(name.clone()));
        }

        // Raw values are lowercase, so an uppercase one is never declared.
        let source = MemorySource::read_only().with("MODE", RawValue::String(unknown));
        let ctx = Arc::new(ProviderContext::default().with_source("S", source));
        let interpreter = Interpreter::new(&schema, ctx, FunctionTable::new());
        prop_assert_eq!(interpreter.get("MODE").unwrap(), Value::Enum(default));
    }

    #[test]
    fn emission_is_deterministic(keys in arb_keys()) {
        use crate::emit::Emitter;
        use crate::resolve::Resolver;

        let yaml = schema_yaml(&[("Feature".into(), keys)]);
        let emit = || {
            let decls = Declarations::from_yaml_str(&yaml).unwrap();
            let graph = ModelBuilder::build(&decls).unwrap();
            Emitter::default().emit(&Resolver::resolve(&graph).unwrap())
        };
        prop_assert_eq!(emit(), emit());
    }
}

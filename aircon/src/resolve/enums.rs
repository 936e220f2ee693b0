//! Enum mapping checks: the raw value to constant mapping must be total and
//! injective.

use std::collections::HashMap;

use super::Resolver;
use crate::emit::naming;
use crate::error::DiagnosticKind;
use crate::model::{ConfigElement, EnumElement, EnumRaw};

fn raw_display(raw: &EnumRaw) -> String {
    match raw {
        EnumRaw::Int(n) => n.to_string(),
        EnumRaw::String(s) => format!("{s:?}"),
    }
}

fn mapping_problems(element: &EnumElement) -> Vec<String> {
    let value_type = element.common.value_type;
    let mut problems = Vec::new();
    if element.constants.is_empty() {
        problems.push(format!("enum {} declares no constants", element.type_name));
    }

    let mut variants: HashMap<String, &str> = HashMap::new();
    let mut raws: HashMap<EnumRaw, &str> = HashMap::new();
    for constant in &element.constants {
        let name = constant.name.as_str();
        let variant = naming::variant_name(name);
        if !naming::is_valid_key(name) || !naming::is_valid_identifier(&variant) {
            problems.push(format!("'{name}' is not a valid constant name"));
            continue;
        }
        if let Some(first) = variants.insert(variant, name) {
            problems.push(format!("constants '{first}' and '{name}' name the same variant"));
        }

        match (&constant.raw, constant.typed_raw(value_type)) {
            (None, _) => problems.push(format!("constant '{name}' has no raw value")),
            (Some(_), None) => problems.push(format!(
                "raw value of '{name}' is not a valid {value_type} value"
            )),
            (Some(_), Some(raw)) => {
                let shown = raw_display(&raw);
                if let Some(first) = raws.insert(raw, name) {
                    problems.push(format!(
                        "constants '{first}' and '{name}' share raw value {shown}"
                    ));
                }
            }
        }
    }
    problems
}

impl Resolver<'_> {
    pub(super) fn resolve_enums(&mut self) {
        let graph = self.graph;
        let mut type_names: HashMap<&str, &str> = HashMap::new();
        for element in &graph.elements {
            let ConfigElement::Enum(enum_element) = element else {
                continue;
            };
            let common = &enum_element.common;
            for problem in mapping_problems(enum_element) {
                self.report(
                    DiagnosticKind::InvalidEnumMapping,
                    [common.key.as_str()],
                    common.ordinal,
                    &common.location,
                    problem,
                );
            }
            if let Some(first) = type_names.insert(&enum_element.type_name, &common.key) {
                self.report(
                    DiagnosticKind::InvalidEnumMapping,
                    [common.key.as_str()],
                    common.ordinal,
                    &common.location,
                    format!(
                        "enum type {} is already declared by '{first}'",
                        enum_element.type_name
                    ),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{kinds, resolve};
    use crate::error::DiagnosticKind;

    fn schema(configs: &str) -> String {
        format!("sources: [{{ id: s }}]\nfeatures: [{{ name: F, source: s, configs: [{configs}] }}]")
    }

    #[test]
    fn test_valid_mappings() {
        let schema = resolve(&schema(
            r"{ key: LEVEL, type: int-enum, enum: { constants: [{ name: Low, value: 1 }, { name: High, value: 2 }] }, default: { value: Low } },
              { key: THEME, type: string-enum, enum: { name: Theme, constants: [{ name: Dark, value: dark }] }, default: { value: Dark } }",
        ));
        assert!(schema.is_ok());
    }

    #[test]
    fn test_invalid_mappings() {
        for body in [
            "constants: []",
            "constants: [{ name: A }]",
            "constants: [{ name: A, value: x }]",
            "constants: [{ name: A, value: 5000000000 }]",
            "constants: [{ name: A, value: 1 }, { name: B, value: 1 }]",
            "constants: [{ name: A, value: 1 }, { name: A, value: 2 }]",
            "constants: [{ name: 'not valid', value: 1 }]",
            "constants: [{ name: SELF, value: 1 }]",
        ] {
            let config = format!("{{ key: E, type: int-enum, enum: {{ {body} }}, default: {{ config: D }} }}, {{ key: D, type: int-enum, enum: {{ name: Other, constants: [{{ name: Z, value: 0 }}] }}, default: {{ value: Z }} }}");
            let found = kinds(&schema(&config));
            assert!(
                found.contains(&DiagnosticKind::InvalidEnumMapping),
                "{body}: {found:?}"
            );
        }
    }

    #[test]
    fn test_duplicate_type_names() {
        let found = kinds(&schema(
            r"{ key: A, type: string-enum, enum: { name: Mode, constants: [{ name: X, value: x }] }, default: { value: X } },
              { key: B, type: string-enum, enum: { name: Mode, constants: [{ name: X, value: x }] }, default: { value: X } }",
        ));
        assert_eq!(found, vec![DiagnosticKind::InvalidEnumMapping]);
    }
}

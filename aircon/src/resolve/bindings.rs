//! Validator, adapter, and mock bindings.

use std::collections::HashMap;

use super::Resolver;
use crate::error::DiagnosticKind;
use crate::model::{BindingKind, Function, TypeRef, ValueType};

/// Functions bound to one config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundFunctions {
    /// `(&T) -> bool`.
    pub validator: Option<Function>,
    /// `(T) -> U`.
    pub adapter: Option<Function>,
    /// `() -> T`.
    pub mock: Option<Function>,
}

impl BoundFunctions {
    fn slot(&mut self, kind: BindingKind) -> &mut Option<Function> {
        match kind {
            BindingKind::Validator => &mut self.validator,
            BindingKind::Adapter => &mut self.adapter,
            BindingKind::Mock => &mut self.mock,
        }
    }
}

/// Whether `function` has the shape a binding of `kind` needs for a config of
/// type `value`.
fn signature_matches(kind: BindingKind, function: &Function, value: &TypeRef) -> bool {
    match kind {
        BindingKind::Validator => {
            matches!(function.params.as_slice(), [p] if p.is_compatible(value))
                && function
                    .returns
                    .is_compatible(&TypeRef::Builtin(ValueType::Boolean))
        }
        BindingKind::Adapter => matches!(function.params.as_slice(), [p] if p.is_compatible(value)),
        BindingKind::Mock => function.params.is_empty() && function.returns.is_compatible(value),
    }
}

fn expected_shape(kind: BindingKind, value: &TypeRef) -> String {
    match kind {
        BindingKind::Validator => format!("(&{value}) -> boolean"),
        BindingKind::Adapter => format!("({value}) -> <any>"),
        BindingKind::Mock => format!("() -> {value}"),
    }
}

impl Resolver<'_> {
    /// Attaches bindings by key. Returns one entry per element, in element
    /// order.
    pub(super) fn resolve_bindings(&mut self) -> Vec<BoundFunctions> {
        let graph = self.graph;
        let mut bound = vec![BoundFunctions::default(); graph.elements.len()];
        let mut first_seen: HashMap<(&str, BindingKind), &str> = HashMap::new();

        for binding in &graph.bindings {
            let key = binding.key.as_str();
            let Some(&index) = self.index.get(key) else {
                self.report(
                    DiagnosticKind::UnknownBindingTarget,
                    [key],
                    binding.ordinal,
                    &binding.location,
                    format!("{} '{}' is bound to undeclared config '{key}'", binding.kind, binding.function),
                );
                continue;
            };

            if let Some(first) = first_seen.get(&(key, binding.kind)) {
                self.report(
                    DiagnosticKind::DuplicateBinding,
                    [key],
                    binding.ordinal,
                    &binding.location,
                    format!("'{key}' already has a {} bound at {first}", binding.kind),
                );
                continue;
            }
            first_seen.insert((key, binding.kind), &binding.location);

            let Some(function) = self.functions.get(binding.function.as_str()).copied() else {
                self.report(
                    DiagnosticKind::UnknownFunction,
                    [key],
                    binding.ordinal,
                    &binding.location,
                    format!("function '{}' is not declared", binding.function),
                );
                continue;
            };

            let value = graph.elements[index].type_ref();
            if !signature_matches(binding.kind, function, &value) {
                self.report(
                    DiagnosticKind::BindingSignature,
                    [key],
                    binding.ordinal,
                    &binding.location,
                    format!(
                        "{} for '{key}' must have shape {}, found {function}",
                        binding.kind,
                        expected_shape(binding.kind, &value)
                    ),
                );
                continue;
            }

            *bound[index].slot(binding.kind) = Some(function.clone());
        }

        bound
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{kinds, resolve};
    use crate::error::DiagnosticKind;
    use crate::model::TypeRef;

    const PRELUDE: &str = r#"
sources: [{ id: remote }]
functions:
  - { name: v::positive, params: [integer], returns: boolean }
  - { name: v::bad, params: [string], returns: boolean }
  - { name: a::label, params: [integer], returns: crate::Label }
  - { name: m::seven, params: [], returns: integer }
"#;

    fn schema(body: &str) -> String {
        format!("{PRELUDE}{body}")
    }

    #[test]
    fn test_binds_all_kinds() {
        let schema = resolve(&schema(
            r#"
features:
  - name: F
    source: remote
    configs: [{ key: N, type: integer, validator: v::positive }]
adapters: [{ key: N, function: a::label }]
mocks: [{ key: N, function: m::seven }]
"#,
        ))
        .unwrap();
        let n = schema.config("N").unwrap();
        assert_eq!(n.functions.validator.as_ref().unwrap().name, "v::positive");
        assert_eq!(n.functions.mock.as_ref().unwrap().name, "m::seven");
        assert_eq!(n.exposed_type(), TypeRef::Named("crate::Label".into()));
    }

    #[test]
    fn test_unknown_target() {
        assert_eq!(
            kinds(&schema(
                "features: [{ name: F, source: remote }]\nvalidators: [{ key: NOPE, function: v::positive }]"
            )),
            vec![DiagnosticKind::UnknownBindingTarget]
        );
    }

    #[test]
    fn test_signature_mismatch() {
        assert_eq!(
            kinds(&schema(
                "features: [{ name: F, source: remote, configs: [{ key: N, type: integer, validator: v::bad }] }]"
            )),
            vec![DiagnosticKind::BindingSignature]
        );
    }

    #[test]
    fn test_inline_and_top_level_count_together() {
        assert_eq!(
            kinds(&schema(
                r#"
features: [{ name: F, source: remote, configs: [{ key: N, type: integer, validator: v::positive }] }]
validators: [{ key: N, function: v::positive }]
"#
            )),
            vec![DiagnosticKind::DuplicateBinding]
        );
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            kinds(&schema(
                "features: [{ name: F, source: remote, configs: [{ key: N, type: integer, mock: m::missing }] }]"
            )),
            vec![DiagnosticKind::UnknownFunction]
        );
    }
}

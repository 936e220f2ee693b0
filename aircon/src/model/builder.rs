//! Builds the element graph from declarations.
//!
//! The builder stops at the first problem it finds: a graph with duplicate
//! keys or unknown types is not worth resolving. Cross-references (defaults,
//! bindings, group members, sources) are left unchecked for the resolver.

use std::collections::HashMap;

use heck::ToUpperCamelCase;

use super::element::{
    ConfigElement, DefaultSpec, ElementCommon, EnumConstant, EnumElement, JsonElement,
    PrimitiveElement, SpecialElement,
};
use super::graph::{Binding, BindingKind, ConfigGroup, ElementGraph, Function, GroupKind, Source};
use super::types::{NumericRange, RangeFallback, TypeRef, ValueType};
use crate::declaration::{ConfigDecl, Declarations, FeatureDecl};
use crate::emit::naming;
use crate::error::{Diagnostic, DiagnosticKind, Error, Result};
use crate::runtime::TimeUnit;

/// Turns [`Declarations`] into an [`ElementGraph`].
///
/// # Examples
///
/// ```
/// use aircon::declaration::Declarations;
/// use aircon::model::ModelBuilder;
///
/// let decls = Declarations::from_yaml_str(
///     r#"
/// sources: [{ id: remote }]
/// features:
///   - name: Onboarding
///     source: remote
///     configs:
///       - { key: ENABLED, type: boolean }
///       - { key: TITLE, type: text, default: { value: Welcome } }
/// "#,
/// )
/// .unwrap();
///
/// let graph = ModelBuilder::build(&decls).unwrap();
/// assert_eq!(graph.elements.len(), 2);
/// assert_eq!(graph.groups[0].members, vec!["ENABLED", "TITLE"]);
/// ```
pub struct ModelBuilder<'d> {
    decls: &'d Declarations,
    next_ordinal: usize,
}

fn invalid(location: &str, key: Option<&str>, message: impl Into<String>) -> Error {
    Diagnostic::new(
        DiagnosticKind::InvalidDeclaration,
        key.into_iter(),
        location,
        message,
    )
    .into()
}

impl<'d> ModelBuilder<'d> {
    /// Builds the graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Compile`] with a single diagnostic of kind
    /// `DuplicateKey`, `UnknownType`, or `InvalidDeclaration`.
    pub fn build(decls: &'d Declarations) -> Result<ElementGraph> {
        let mut builder = Self {
            decls,
            next_ordinal: 0,
        };
        builder.check_duplicates()?;
        builder.check_names()?;
        let graph = builder.assemble()?;
        log::debug!(
            "built element graph: {} config(s), {} group(s), {} binding(s)",
            graph.elements.len(),
            graph.groups.len(),
            graph.bindings.len()
        );
        Ok(graph)
    }

    fn ordinal(&mut self) -> usize {
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        ordinal
    }

    /// Keys of features, configs, and explicit groups share one namespace.
    fn check_duplicates(&self) -> Result<()> {
        let decls = self.decls;
        let mut seen: HashMap<&str, String> = HashMap::new();
        let mut claim = |key: &'d str, location: String| -> Result<()> {
            if let Some(first) = seen.get(key) {
                return Err(Diagnostic::new(
                    DiagnosticKind::DuplicateKey,
                    [key],
                    location.clone(),
                    format!("key '{key}' is declared at both {first} and {location}"),
                )
                .into());
            }
            seen.insert(key, location);
            Ok(())
        };

        for (fi, feature) in decls.features.iter().enumerate() {
            claim(&feature.name, format!("features[{fi}]"))?;
            for (ci, config) in feature.configs.iter().enumerate() {
                claim(&config.key, format!("features[{fi}].configs[{ci}]"))?;
            }
            for (gi, group) in feature.groups.iter().enumerate() {
                claim(&group.key, format!("features[{fi}].groups[{gi}]"))?;
            }
        }

        let mut sources: HashMap<&str, usize> = HashMap::new();
        for (si, source) in decls.sources.iter().enumerate() {
            if let Some(first) = sources.insert(&source.id, si) {
                return Err(Diagnostic::new(
                    DiagnosticKind::DuplicateKey,
                    [source.id.as_str()],
                    format!("sources[{si}]"),
                    format!("source '{}' is already declared at sources[{first}]", source.id),
                )
                .into());
            }
        }

        let mut functions: HashMap<&str, usize> = HashMap::new();
        for (i, function) in decls.functions.iter().enumerate() {
            if let Some(first) = functions.insert(function.name.trim(), i) {
                return Err(Diagnostic::new(
                    DiagnosticKind::DuplicateKey,
                    [function.name.as_str()],
                    format!("functions[{i}]"),
                    format!(
                        "function '{}' is already declared at functions[{first}]",
                        function.name
                    ),
                )
                .into());
            }
        }

        Ok(())
    }

    /// Key syntax, reserved member names, and distinct module names for
    /// every provider unit.
    fn check_names(&self) -> Result<()> {
        let mut units: HashMap<String, String> = HashMap::new();
        let mut claim_unit = |key: &str, location: String| -> Result<()> {
            let module = naming::module_name(key);
            if naming::is_reserved_module(&module) {
                return Err(invalid(
                    &location,
                    Some(key),
                    format!("'{key}' would generate a unit named '{module}', which is reserved"),
                ));
            }
            if let Some(first) = units.get(&module) {
                return Err(invalid(
                    &location,
                    Some(key),
                    format!("'{key}' and the group at {first} both generate module '{module}'"),
                ));
            }
            units.insert(module, location);
            Ok(())
        };

        for (fi, feature) in self.decls.features.iter().enumerate() {
            let location = format!("features[{fi}]");
            if !naming::is_valid_key(&feature.name) {
                return Err(invalid(
                    &location,
                    Some(&feature.name),
                    "feature names must match [A-Za-z][A-Za-z0-9_]*",
                ));
            }
            claim_unit(&feature.name, location)?;

            for (ci, config) in feature.configs.iter().enumerate() {
                let location = format!("features[{fi}].configs[{ci}]");
                if !naming::is_valid_key(&config.key) {
                    return Err(invalid(
                        &location,
                        Some(&config.key),
                        "keys must match [A-Za-z][A-Za-z0-9_]*",
                    ));
                }
                let member = naming::member_name(&config.key);
                if naming::is_reserved_member(&member) {
                    return Err(invalid(
                        &location,
                        Some(&config.key),
                        format!(
                            "'{}' would generate member '{member}', which is reserved",
                            config.key
                        ),
                    ));
                }
            }

            for (gi, group) in feature.groups.iter().enumerate() {
                let location = format!("features[{fi}].groups[{gi}]");
                if !naming::is_valid_key(&group.key) {
                    return Err(invalid(
                        &location,
                        Some(&group.key),
                        "group keys must match [A-Za-z][A-Za-z0-9_]*",
                    ));
                }
                claim_unit(&group.key, location)?;
            }
        }

        Ok(())
    }

    fn assemble(&mut self) -> Result<ElementGraph> {
        let decls = self.decls;
        let mut graph = ElementGraph {
            sources: decls
                .sources
                .iter()
                .map(|s| Source {
                    id: s.id.clone(),
                    writable: s.writable,
                })
                .collect(),
            ..ElementGraph::default()
        };

        for (i, function) in decls.functions.iter().enumerate() {
            if function.name.trim().is_empty() {
                return Err(invalid(
                    &format!("functions[{i}]"),
                    None,
                    "function name cannot be empty",
                ));
            }
            graph.functions.push(Function {
                name: function.name.trim().to_string(),
                params: function.params.iter().map(|p| TypeRef::parse(p)).collect(),
                returns: TypeRef::parse(&function.returns),
            });
        }

        for (fi, feature) in decls.features.iter().enumerate() {
            let mut members = Vec::with_capacity(feature.configs.len());
            for (ci, config) in feature.configs.iter().enumerate() {
                let location = format!("features[{fi}].configs[{ci}]");
                let ordinal = self.ordinal();
                graph
                    .elements
                    .push(Self::build_element(feature, config, ordinal, &location)?);
                members.push(config.key.clone());

                let inline = [
                    (BindingKind::Validator, &config.validator),
                    (BindingKind::Adapter, &config.adapter),
                    (BindingKind::Mock, &config.mock),
                ];
                for (kind, function) in inline {
                    if let Some(function) = function {
                        let ordinal = self.ordinal();
                        graph.bindings.push(Binding {
                            kind,
                            key: config.key.clone(),
                            function: function.trim().to_string(),
                            ordinal,
                            location: format!("{location}.{kind}"),
                        });
                    }
                }
            }

            let ordinal = self.ordinal();
            graph.groups.push(ConfigGroup {
                key: feature.name.clone(),
                kind: GroupKind::Feature,
                members,
                ordinal,
                location: format!("features[{fi}]"),
            });

            for (gi, group) in feature.groups.iter().enumerate() {
                let ordinal = self.ordinal();
                graph.groups.push(ConfigGroup {
                    key: group.key.clone(),
                    kind: GroupKind::Explicit,
                    members: group.configs.clone(),
                    ordinal,
                    location: format!("features[{fi}].groups[{gi}]"),
                });
            }
        }

        let sections = [
            (BindingKind::Validator, "validators", &decls.validators),
            (BindingKind::Adapter, "adapters", &decls.adapters),
            (BindingKind::Mock, "mocks", &decls.mocks),
        ];
        for (kind, section, list) in sections {
            for (i, binding) in list.iter().enumerate() {
                let ordinal = self.ordinal();
                graph.bindings.push(Binding {
                    kind,
                    key: binding.key.clone(),
                    function: binding.function.trim().to_string(),
                    ordinal,
                    location: format!("{section}[{i}]"),
                });
            }
        }

        Ok(graph)
    }

    fn build_element(
        feature: &FeatureDecl,
        config: &ConfigDecl,
        ordinal: usize,
        location: &str,
    ) -> Result<ConfigElement> {
        let key = config.key.as_str();
        let value_type = ValueType::parse(config.value_type.trim()).ok_or_else(|| {
            Error::from(Diagnostic::new(
                DiagnosticKind::UnknownType,
                [key],
                format!("{location}.type"),
                format!("unknown value type '{}'", config.value_type),
            ))
        })?;

        let source = config
            .source
            .as_ref()
            .or(feature.source.as_ref())
            .ok_or_else(|| {
                invalid(
                    location,
                    Some(key),
                    "no source: set `source` on the config or its feature",
                )
            })?;

        Self::check_type_specific_fields(config, value_type, location)?;

        let common = ElementCommon {
            key: key.to_string(),
            value_type,
            source: source.clone(),
            mutable: config.mutable,
            feature: feature.name.clone(),
            description: config.description.clone(),
            default: config
                .default
                .as_ref()
                .map(|d| DefaultSpec {
                    literal: d.value.clone(),
                    resource: d.resource.clone(),
                    config: d.config.clone(),
                    provider: d.provider.clone(),
                })
                .unwrap_or_default(),
            ordinal,
            location: location.to_string(),
        };

        let element = match value_type {
            ValueType::StringEnum | ValueType::IntEnum => {
                let body = config.enum_decl.as_ref().ok_or_else(|| {
                    invalid(location, Some(key), "enum configs need an `enum` body")
                })?;
                let type_name = body
                    .name
                    .clone()
                    .unwrap_or_else(|| key.to_upper_camel_case());
                if !naming::is_valid_type_name(&type_name) {
                    return Err(invalid(
                        &format!("{location}.enum.name"),
                        Some(key),
                        format!("'{type_name}' is not a valid enum type name"),
                    ));
                }
                ConfigElement::Enum(EnumElement {
                    common,
                    type_name,
                    constants: body
                        .constants
                        .iter()
                        .map(|c| EnumConstant {
                            name: c.name.clone(),
                            raw: c.value.clone(),
                        })
                        .collect(),
                })
            }
            ValueType::Json => {
                let target_type = config
                    .json_type
                    .as_ref()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| invalid(location, Some(key), "json configs need `json_type`"))?;
                ConfigElement::Json(JsonElement {
                    common,
                    target_type,
                })
            }
            ValueType::Color | ValueType::Time | ValueType::Text | ValueType::Url => {
                let time_unit = match config.time_unit.as_deref() {
                    None => TimeUnit::default(),
                    Some(name) => TimeUnit::parse(name).ok_or_else(|| {
                        invalid(
                            &format!("{location}.time_unit"),
                            Some(key),
                            format!("unknown time unit '{name}'"),
                        )
                    })?,
                };
                ConfigElement::Special(SpecialElement { common, time_unit })
            }
            ValueType::Boolean
            | ValueType::Integer
            | ValueType::Long
            | ValueType::Float
            | ValueType::String
            | ValueType::StringSet => {
                let range = Self::build_range(config, value_type, location)?;
                ConfigElement::Primitive(PrimitiveElement {
                    common,
                    range,
                    non_empty: config.non_empty,
                })
            }
        };

        Ok(element)
    }

    fn check_type_specific_fields(
        config: &ConfigDecl,
        value_type: ValueType,
        location: &str,
    ) -> Result<()> {
        let key = Some(config.key.as_str());
        let misplaced = [
            (
                "min/max",
                (config.min.is_some() || config.max.is_some()) && !value_type.is_numeric(),
            ),
            (
                "range_fallback",
                config.range_fallback.is_some() && !value_type.is_numeric(),
            ),
            (
                "non_empty",
                config.non_empty && value_type != ValueType::String,
            ),
            (
                "enum",
                config.enum_decl.is_some() && !value_type.is_enum(),
            ),
            (
                "json_type",
                config.json_type.is_some() && value_type != ValueType::Json,
            ),
            (
                "time_unit",
                config.time_unit.is_some() && value_type != ValueType::Time,
            ),
        ];
        for (field, is_misplaced) in misplaced {
            if is_misplaced {
                return Err(invalid(
                    location,
                    key,
                    format!("`{field}` does not apply to {value_type} configs"),
                ));
            }
        }
        Ok(())
    }

    fn build_range(
        config: &ConfigDecl,
        value_type: ValueType,
        location: &str,
    ) -> Result<NumericRange> {
        let key = Some(config.key.as_str());
        let fallback = match config.range_fallback.as_deref() {
            None => RangeFallback::default(),
            Some(name) => RangeFallback::parse(name).ok_or_else(|| {
                invalid(
                    &format!("{location}.range_fallback"),
                    key,
                    format!("unknown range fallback '{name}' (expected default or clamp)"),
                )
            })?,
        };
        let range = NumericRange {
            min: config.min,
            max: config.max,
            fallback,
        };
        if range.is_open() {
            if config.range_fallback.is_some() {
                return Err(invalid(location, key, "`range_fallback` needs `min` or `max`"));
            }
            return Ok(range);
        }

        #[allow(clippy::cast_precision_loss)]
        let (lo, hi) = match value_type {
            ValueType::Integer => (f64::from(i32::MIN), f64::from(i32::MAX)),
            ValueType::Long => (i64::MIN as f64, i64::MAX as f64),
            _ => (f64::from(f32::MIN), f64::from(f32::MAX)),
        };
        for bound in [range.min, range.max].into_iter().flatten() {
            let integral = value_type == ValueType::Float || bound.fract() == 0.0;
            if !bound.is_finite() || !integral || bound < lo || bound > hi {
                return Err(invalid(
                    location,
                    key,
                    format!("bound {bound} is not a valid {value_type}"),
                ));
            }
        }
        if let (Some(min), Some(max)) = (range.min, range.max) {
            if min > max {
                return Err(invalid(location, key, "min must be <= max"));
            }
        }
        Ok(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(yaml: &str) -> Result<ElementGraph> {
        let decls = Declarations::from_yaml_str(yaml).unwrap();
        ModelBuilder::build(&decls)
    }

    fn kind_of(result: Result<ElementGraph>) -> DiagnosticKind {
        let err = result.unwrap_err();
        let diagnostics = err.diagnostics().expect("compile error");
        assert_eq!(diagnostics.len(), 1);
        diagnostics.iter().next().unwrap().kind
    }

    #[test]
    fn test_builds_variants_by_type() {
        let graph = build(
            r#"
features:
  - name: Home
    source: remote
    configs:
      - { key: A, type: boolean }
      - { key: B, type: json, json_type: crate::Banner }
      - key: C
        type: int-enum
        enum: { constants: [{ name: One, value: 1 }] }
      - { key: D, type: time, time_unit: seconds }
"#,
        )
        .unwrap();
        assert!(matches!(graph.elements[0], ConfigElement::Primitive(_)));
        assert!(matches!(graph.elements[1], ConfigElement::Json(_)));
        match &graph.elements[2] {
            ConfigElement::Enum(e) => assert_eq!(e.type_name, "C"),
            other => panic!("expected enum, got {other:?}"),
        }
        match &graph.elements[3] {
            ConfigElement::Special(e) => assert_eq!(e.time_unit, TimeUnit::Seconds),
            other => panic!("expected special, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_key_across_features() {
        let result = build(
            r#"
features:
  - { name: A, source: s, configs: [{ key: FLAG, type: boolean }] }
  - { name: B, source: s, configs: [{ key: FLAG, type: integer }] }
"#,
        );
        let err = result.unwrap_err();
        let d = err.diagnostics().unwrap().iter().next().unwrap().clone();
        assert_eq!(d.kind, DiagnosticKind::DuplicateKey);
        assert_eq!(d.location, "features[1].configs[0]");
        assert!(d.message.contains("features[0].configs[0]"));
    }

    #[test]
    fn test_duplicate_beats_unknown_type() {
        let result = build(
            r#"
features:
  - name: A
    source: s
    configs:
      - { key: X, type: decimal }
      - { key: X, type: boolean }
"#,
        );
        assert_eq!(kind_of(result), DiagnosticKind::DuplicateKey);
    }

    #[test]
    fn test_group_key_collides_with_config_key() {
        let result = build(
            r#"
features:
  - name: A
    source: s
    configs: [{ key: X, type: boolean }]
    groups: [{ key: X, configs: [X] }]
"#,
        );
        assert_eq!(kind_of(result), DiagnosticKind::DuplicateKey);
    }

    #[test]
    fn test_unknown_type() {
        let result = build("features: [{ name: A, source: s, configs: [{ key: X, type: decimal }] }]");
        assert_eq!(kind_of(result), DiagnosticKind::UnknownType);
    }

    #[test]
    fn test_missing_source() {
        let result = build("features: [{ name: A, configs: [{ key: X, type: boolean }] }]");
        assert_eq!(kind_of(result), DiagnosticKind::InvalidDeclaration);
    }

    #[test]
    fn test_misplaced_fields() {
        for config in [
            "{ key: X, type: string, min: 1 }",
            "{ key: X, type: integer, non_empty: true }",
            "{ key: X, type: boolean, json_type: T }",
            "{ key: X, type: url, time_unit: seconds }",
            "{ key: X, type: string-enum }",
            "{ key: X, type: json }",
            "{ key: X, type: integer, range_fallback: clamp }",
            "{ key: X, type: integer, min: 1.5 }",
            "{ key: X, type: integer, min: 5, max: 1 }",
        ] {
            let yaml = format!("features: [{{ name: A, source: s, configs: [{config}] }}]");
            assert_eq!(
                kind_of(build(&yaml)),
                DiagnosticKind::InvalidDeclaration,
                "{config}"
            );
        }
    }

    #[test]
    fn test_invalid_key_syntax() {
        let result = build("features: [{ name: A, source: s, configs: [{ key: 9LIVES, type: boolean }] }]");
        assert_eq!(kind_of(result), DiagnosticKind::InvalidDeclaration);
    }

    #[test]
    fn test_reserved_member_names() {
        for key in ["SELF", "Super", "CRATE", "ALL"] {
            let yaml = format!(
                "features: [{{ name: G, source: s, configs: [{{ key: {key}, type: boolean }}] }}]"
            );
            let err = build(&yaml).unwrap_err();
            let d = err.diagnostics().unwrap().iter().next().unwrap().clone();
            assert_eq!(d.kind, DiagnosticKind::InvalidDeclaration, "{key}");
            assert_eq!(d.location, "features[0].configs[0]");
        }
        // Escapable keywords are fine.
        assert!(build("features: [{ name: G, source: s, configs: [{ key: TYPE, type: boolean }] }]").is_ok());
    }

    #[test]
    fn test_enum_type_name_rules() {
        for name in ["type", "Self", "Arc", "rt", "Option", "String"] {
            let yaml = format!(
                "features: [{{ name: G, source: s, configs: [{{ key: E, type: string-enum, enum: {{ name: {name}, constants: [{{ name: A, value: a }}] }} }}] }}]"
            );
            assert_eq!(kind_of(build(&yaml)), DiagnosticKind::InvalidDeclaration, "{name}");
        }
        // The default type name comes from the key and follows the same rules.
        let result = build(
            "features: [{ name: G, source: s, configs: [{ key: OPTION, type: string-enum, enum: { constants: [{ name: A, value: a }] } }] }]",
        );
        assert_eq!(kind_of(result), DiagnosticKind::InvalidDeclaration);
    }

    #[test]
    fn test_unit_name_collision() {
        let result = build(
            r#"
features:
  - name: MyGroup
    source: s
  - name: Other
    source: s
    configs: [{ key: X, type: boolean }]
    groups: [{ key: MY_GROUP, configs: [X] }]
"#,
        );
        assert_eq!(kind_of(result), DiagnosticKind::InvalidDeclaration);
    }

    #[test]
    fn test_bindings_and_groups_get_increasing_ordinals() {
        let graph = build(
            r#"
features:
  - name: A
    source: s
    configs:
      - { key: X, type: integer, validator: v::positive }
      - { key: Y, type: integer }
    groups: [{ key: G, configs: [Y] }]
validators: [{ key: Y, function: v::positive }]
"#,
        )
        .unwrap();
        assert_eq!(graph.bindings.len(), 2);
        assert_eq!(graph.bindings[0].location, "features[0].configs[0].validator");
        assert_eq!(graph.bindings[1].location, "validators[0]");
        assert!(graph.bindings[0].ordinal < graph.elements[1].common().ordinal);
        assert!(graph.groups[1].ordinal < graph.bindings[1].ordinal);
        assert_eq!(graph.groups[1].kind, GroupKind::Explicit);
    }
}

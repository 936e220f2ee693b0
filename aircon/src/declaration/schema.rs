//! Declaration file structure.
//!
//! These types mirror the YAML surface one-to-one. Value types stay strings
//! here so the model builder, not serde, reports unknown ones.

use serde::{Deserialize, Serialize};

/// A complete declaration document.
///
/// # Examples
///
/// ```
/// use aircon::declaration::Declarations;
///
/// let decls = Declarations::from_yaml_str(
///     r#"
/// sources: [{ id: remote }]
/// features:
///   - name: Onboarding
///     source: remote
///     configs:
///       - { key: ENABLED, type: boolean, default: { value: false } }
/// "#,
/// )
/// .unwrap();
/// assert_eq!(decls.features[0].configs[0].key, "ENABLED");
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Declarations {
    /// Source capability table.
    #[serde(default)]
    pub sources: Vec<SourceDecl>,

    /// External functions available to bindings and provider defaults.
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,

    /// Features, each an implicit group.
    #[serde(default)]
    pub features: Vec<FeatureDecl>,

    /// Validator bindings.
    #[serde(default)]
    pub validators: Vec<BindingDecl>,

    /// Adapter bindings.
    #[serde(default)]
    pub adapters: Vec<BindingDecl>,

    /// Mock bindings.
    #[serde(default)]
    pub mocks: Vec<BindingDecl>,
}

/// A source and whether it accepts writes.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SourceDecl {
    /// Source id.
    pub id: String,

    /// Write capability.
    #[serde(default)]
    pub writable: bool,
}

/// An external function signature.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FunctionDecl {
    /// Rust path.
    pub name: String,

    /// Parameter types: builtin type names or Rust type paths.
    #[serde(default)]
    pub params: Vec<String>,

    /// Return type.
    pub returns: String,
}

/// A feature: an implicit group of configs plus its explicit groups.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FeatureDecl {
    /// Feature name, also the implicit group's key.
    pub name: String,

    /// Source inherited by configs that do not name one.
    pub source: Option<String>,

    /// Configs in declaration order.
    #[serde(default)]
    pub configs: Vec<ConfigDecl>,

    /// Explicit groups.
    #[serde(default)]
    pub groups: Vec<GroupDecl>,
}

/// One config.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigDecl {
    /// Unique key.
    pub key: String,

    /// Value type name.
    #[serde(rename = "type")]
    pub value_type: String,

    /// Source id, overriding the feature's.
    pub source: Option<String>,

    /// Generate a write accessor.
    #[serde(default)]
    pub mutable: bool,

    /// Doc text for the accessor.
    pub description: Option<String>,

    /// Default value.
    pub default: Option<DefaultDecl>,

    /// Inline validator binding.
    pub validator: Option<String>,

    /// Inline adapter binding.
    pub adapter: Option<String>,

    /// Inline mock binding.
    pub mock: Option<String>,

    /// Lower bound (numeric types).
    pub min: Option<f64>,

    /// Upper bound (numeric types).
    pub max: Option<f64>,

    /// `default` or `clamp`.
    pub range_fallback: Option<String>,

    /// Reject empty values (string type).
    #[serde(default)]
    pub non_empty: bool,

    /// Target type (json type).
    pub json_type: Option<String>,

    /// Constants (enum types).
    #[serde(rename = "enum")]
    pub enum_decl: Option<EnumDecl>,

    /// Raw value unit (time type).
    pub time_unit: Option<String>,
}

/// The default-value forms; exactly one should be present.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DefaultDecl {
    /// Literal value.
    pub value: Option<serde_yaml::Value>,

    /// Resource name.
    pub resource: Option<String>,

    /// Another config's key.
    pub config: Option<String>,

    /// Provider function name.
    pub provider: Option<String>,
}

/// Enum type name and constants.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EnumDecl {
    /// Emitted type name; defaults to the key in upper camel case.
    pub name: Option<String>,

    /// Constants in order.
    #[serde(default)]
    pub constants: Vec<EnumConstantDecl>,
}

/// One enum constant.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EnumConstantDecl {
    /// Variant name.
    pub name: String,

    /// Raw value at the source.
    pub value: Option<serde_yaml::Value>,
}

/// An explicit group.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GroupDecl {
    /// Group key.
    pub key: String,

    /// Member keys; order fixes accessor order.
    #[serde(default)]
    pub configs: Vec<String>,
}

/// A top-level binding.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BindingDecl {
    /// Target config key.
    pub key: String,

    /// Function name.
    pub function: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
key: MODE
type: string-enum
source: prefs
mutable: true
description: Playback mode
default: { value: Fast }
enum:
  name: Mode
  constants:
    - { name: Fast, value: fast }
    - { name: Slow, value: slow }
"#;
        let config: ConfigDecl = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.value_type, "string-enum");
        assert!(config.mutable);
        let constants = &config.enum_decl.unwrap().constants;
        assert_eq!(constants.len(), 2);
        assert_eq!(constants[1].value, Some(serde_yaml::Value::from("slow")));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "key: A\ntype: boolean\ncolour: red\n";
        assert!(serde_yaml::from_str::<ConfigDecl>(yaml).is_err());
    }

    #[test]
    fn test_empty_document_sections_default() {
        let decls: Declarations = serde_yaml::from_str("features: []").unwrap();
        assert!(decls.sources.is_empty());
        assert!(decls.mocks.is_empty());
    }
}

//! The config element hierarchy and its visitor.
//!
//! [`ConfigElement`] is a closed sum over the four element variants. Code that
//! treats variants differently implements [`ElementVisitor`], whose methods have
//! no defaults: adding a variant breaks every visitor until it handles it.

use serde::Serialize;

use super::types::{NumericRange, TypeRef, ValueType};
use crate::runtime::TimeUnit;

/// A declared default, before resolution. At most one field may be set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultSpec {
    /// Literal value.
    pub literal: Option<serde_yaml::Value>,
    /// Resource name.
    pub resource: Option<String>,
    /// Key of another config whose current value is the default.
    pub config: Option<String>,
    /// Zero-argument provider function.
    pub provider: Option<String>,
}

impl DefaultSpec {
    /// Names of the forms present, in declaration-field order.
    #[must_use]
    pub fn forms(&self) -> Vec<&'static str> {
        let mut forms = Vec::new();
        if self.literal.is_some() {
            forms.push("value");
        }
        if self.resource.is_some() {
            forms.push("resource");
        }
        if self.config.is_some() {
            forms.push("config");
        }
        if self.provider.is_some() {
            forms.push("provider");
        }
        forms
    }
}

/// Attributes shared by every element variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementCommon {
    /// Unique key, used at the source and in accessor names.
    pub key: String,
    /// Declared value type.
    pub value_type: ValueType,
    /// Id of the source the config reads from.
    pub source: String,
    /// Whether a write accessor is generated.
    pub mutable: bool,
    /// Name of the declaring feature.
    pub feature: String,
    /// Free-form description, rendered as the accessor's doc comment.
    pub description: Option<String>,
    /// Declared default.
    pub default: DefaultSpec,
    /// Position in declaration order.
    pub ordinal: usize,
    /// Location path, e.g. `features[0].configs[1]`.
    pub location: String,
}

/// Booleans, numbers, strings, and string sets.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveElement {
    /// Shared attributes.
    pub common: ElementCommon,
    /// Numeric bounds (numeric types only).
    pub range: NumericRange,
    /// Reject empty strings (string type only).
    pub non_empty: bool,
}

/// Raw value an enum constant is stored as remotely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum EnumRaw {
    /// `int-enum` raw value.
    Int(i32),
    /// `string-enum` raw value.
    String(String),
}

/// One constant of an enum config.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumConstant {
    /// Constant name, emitted as the variant name.
    pub name: String,
    /// Declared raw value, unchecked until resolution.
    pub raw: Option<serde_yaml::Value>,
}

impl EnumConstant {
    /// The raw value typed for `value_type`, `None` when absent or mistyped.
    #[must_use]
    pub fn typed_raw(&self, value_type: ValueType) -> Option<EnumRaw> {
        let raw = self.raw.as_ref()?;
        match value_type {
            ValueType::StringEnum => raw.as_str().map(|s| EnumRaw::String(s.to_string())),
            ValueType::IntEnum => raw
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(EnumRaw::Int),
            _ => None,
        }
    }
}

/// `string-enum` and `int-enum` configs.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumElement {
    /// Shared attributes.
    pub common: ElementCommon,
    /// Name of the emitted enum type.
    pub type_name: String,
    /// Declared constants, in order.
    pub constants: Vec<EnumConstant>,
}

/// `json` configs.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonElement {
    /// Shared attributes.
    pub common: ElementCommon,
    /// Rust type the document decodes into.
    pub target_type: String,
}

/// `color`, `time`, `text`, and `url` configs.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialElement {
    /// Shared attributes.
    pub common: ElementCommon,
    /// Unit of the raw value (time only).
    pub time_unit: TimeUnit,
}

/// A declared config.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigElement {
    /// See [`PrimitiveElement`].
    Primitive(PrimitiveElement),
    /// See [`EnumElement`].
    Enum(EnumElement),
    /// See [`JsonElement`].
    Json(JsonElement),
    /// See [`SpecialElement`].
    Special(SpecialElement),
}

/// Double dispatch over [`ConfigElement`] variants.
pub trait ElementVisitor {
    /// Extra input threaded through each visit.
    type Arg;
    /// Result of a visit.
    type Output;

    /// Handles a primitive element.
    fn visit_primitive(&mut self, element: &PrimitiveElement, arg: Self::Arg) -> Self::Output;
    /// Handles an enum element.
    fn visit_enum(&mut self, element: &EnumElement, arg: Self::Arg) -> Self::Output;
    /// Handles a JSON element.
    fn visit_json(&mut self, element: &JsonElement, arg: Self::Arg) -> Self::Output;
    /// Handles a special-type element.
    fn visit_special(&mut self, element: &SpecialElement, arg: Self::Arg) -> Self::Output;
}

impl ConfigElement {
    /// Dispatches to the visitor method for this variant.
    pub fn accept<V: ElementVisitor>(&self, visitor: &mut V, arg: V::Arg) -> V::Output {
        match self {
            Self::Primitive(e) => visitor.visit_primitive(e, arg),
            Self::Enum(e) => visitor.visit_enum(e, arg),
            Self::Json(e) => visitor.visit_json(e, arg),
            Self::Special(e) => visitor.visit_special(e, arg),
        }
    }

    /// Shared attributes.
    #[must_use]
    pub fn common(&self) -> &ElementCommon {
        match self {
            Self::Primitive(e) => &e.common,
            Self::Enum(e) => &e.common,
            Self::Json(e) => &e.common,
            Self::Special(e) => &e.common,
        }
    }

    /// The config key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.common().key
    }

    /// The declared value type.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.common().value_type
    }

    /// The type a validator, mock, or default of this config works with.
    #[must_use]
    pub fn type_ref(&self) -> TypeRef {
        self.accept(&mut TypeOf, ())
    }
}

struct TypeOf;

impl ElementVisitor for TypeOf {
    type Arg = ();
    type Output = TypeRef;

    fn visit_primitive(&mut self, element: &PrimitiveElement, (): ()) -> TypeRef {
        TypeRef::Builtin(element.common.value_type)
    }

    fn visit_enum(&mut self, element: &EnumElement, (): ()) -> TypeRef {
        TypeRef::Named(element.type_name.clone())
    }

    fn visit_json(&mut self, element: &JsonElement, (): ()) -> TypeRef {
        TypeRef::Named(element.target_type.clone())
    }

    fn visit_special(&mut self, element: &SpecialElement, (): ()) -> TypeRef {
        TypeRef::Builtin(element.common.value_type)
    }
}

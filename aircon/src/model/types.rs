//! Value types and type references.

use std::fmt;

use serde::Serialize;

/// Default runtime path; also used when comparing types for compatibility.
pub const CANONICAL_RUNTIME: &str = "aircon::runtime";

/// The declared value type of a config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueType {
    /// `bool`.
    Boolean,
    /// `i32`.
    Integer,
    /// `i64`.
    Long,
    /// `f32`.
    Float,
    /// `String`.
    String,
    /// Ordered set of strings.
    StringSet,
    /// JSON document decoded into a caller-named type.
    Json,
    /// Enumeration keyed by remote string values.
    StringEnum,
    /// Enumeration keyed by remote integer values.
    IntEnum,
    /// ARGB color.
    Color,
    /// Duration measured in a declared unit.
    Time,
    /// Non-blank display text.
    Text,
    /// Well-formed absolute URL.
    Url,
}

impl ValueType {
    /// Every recognized value type, in declaration-name order.
    pub const ALL: [Self; 13] = [
        Self::Boolean,
        Self::Integer,
        Self::Long,
        Self::Float,
        Self::String,
        Self::StringSet,
        Self::Json,
        Self::StringEnum,
        Self::IntEnum,
        Self::Color,
        Self::Time,
        Self::Text,
        Self::Url,
    ];

    /// The name used in declarations.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Float => "float",
            Self::String => "string",
            Self::StringSet => "string-set",
            Self::Json => "json",
            Self::StringEnum => "string-enum",
            Self::IntEnum => "int-enum",
            Self::Color => "color",
            Self::Time => "time",
            Self::Text => "text",
            Self::Url => "url",
        }
    }

    /// Parses a declaration type name.
    ///
    /// # Examples
    ///
    /// ```
    /// use aircon::model::ValueType;
    ///
    /// assert_eq!(ValueType::parse("string-set"), Some(ValueType::StringSet));
    /// assert_eq!(ValueType::parse("decimal"), None);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Whether a config of this type may omit its default.
    #[must_use]
    pub const fn has_zero(self) -> bool {
        matches!(
            self,
            Self::Boolean
                | Self::Integer
                | Self::Long
                | Self::Float
                | Self::String
                | Self::StringSet
                | Self::Text
                | Self::Time
        )
    }

    /// Whether a resource reference can supply this type's default.
    #[must_use]
    pub const fn supports_resource(self) -> bool {
        !matches!(
            self,
            Self::Json | Self::StringEnum | Self::IntEnum | Self::Time
        )
    }

    /// Whether `min`/`max` range rules apply.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Long | Self::Float)
    }

    /// Whether this is one of the enumeration types.
    #[must_use]
    pub const fn is_enum(self) -> bool {
        matches!(self, Self::StringEnum | Self::IntEnum)
    }

    /// Whether the type carries an inherited special-type validation.
    #[must_use]
    pub const fn is_special(self) -> bool {
        matches!(self, Self::Color | Self::Time | Self::Text | Self::Url)
    }

    /// The Rust type for types that need no declared name, `None` for JSON and
    /// enums.
    #[must_use]
    pub fn builtin_rust_type(self, runtime: &str) -> Option<String> {
        let ty = match self {
            Self::Boolean => "bool".to_string(),
            Self::Integer => "i32".to_string(),
            Self::Long => "i64".to_string(),
            Self::Float => "f32".to_string(),
            Self::String | Self::Text | Self::Url => "String".to_string(),
            Self::StringSet => "std::collections::BTreeSet<String>".to_string(),
            Self::Color => format!("{runtime}::Color"),
            Self::Time => "std::time::Duration".to_string(),
            Self::Json | Self::StringEnum | Self::IntEnum => return None,
        };
        Some(ty)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A type as it appears in a function signature or as a config's value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// One of the builtin value types.
    Builtin(ValueType),
    /// A named Rust type (enum, JSON target, or adapter output).
    Named(String),
}

impl TypeRef {
    /// Parses a signature type. Builtin names resolve to [`TypeRef::Builtin`];
    /// anything else is taken as a Rust type path.
    ///
    /// # Examples
    ///
    /// ```
    /// use aircon::model::{TypeRef, ValueType};
    ///
    /// assert_eq!(TypeRef::parse("integer"), TypeRef::Builtin(ValueType::Integer));
    /// assert_eq!(TypeRef::parse("crate::Label"), TypeRef::Named("crate::Label".into()));
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        match ValueType::parse(name) {
            Some(vt) if vt.builtin_rust_type(CANONICAL_RUNTIME).is_some() => Self::Builtin(vt),
            _ => Self::Named(name.to_string()),
        }
    }

    /// Renders the Rust type.
    #[must_use]
    pub fn rust_type(&self, runtime: &str) -> String {
        match self {
            Self::Builtin(vt) => vt
                .builtin_rust_type(runtime)
                .unwrap_or_else(|| vt.name().to_string()),
            Self::Named(name) => name.clone(),
        }
    }

    /// Two types are compatible when they surface as the same Rust type.
    #[must_use]
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.rust_type(CANONICAL_RUNTIME) == other.rust_type(CANONICAL_RUNTIME)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(vt) => write!(f, "{vt}"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// What happens when a numeric value falls outside its declared range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangeFallback {
    /// Fall back to the resolved default.
    #[default]
    Default,
    /// Clamp to the nearest bound.
    Clamp,
}

impl RangeFallback {
    /// Parses a declaration name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::Default),
            "clamp" => Some(Self::Clamp),
            _ => None,
        }
    }
}

/// Inclusive numeric bounds. Either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NumericRange {
    /// Lower bound.
    pub min: Option<f64>,
    /// Upper bound.
    pub max: Option<f64>,
    /// Out-of-range policy.
    pub fallback: RangeFallback,
}

impl NumericRange {
    /// Whether neither bound is set.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Whether `value` lies within the bounds.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

//! The unresolved element graph produced by the model builder.

use std::fmt;

use serde::Serialize;

use super::element::ConfigElement;
use super::types::TypeRef;

/// A declared source and its capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    /// Source id.
    pub id: String,
    /// Whether the source supports writes.
    pub writable: bool,
}

/// A declared external function and its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// Rust path of the function.
    pub name: String,
    /// Parameter types.
    pub params: Vec<TypeRef>,
    /// Return type.
    pub returns: TypeRef,
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        write!(f, "{}({}) -> {}", self.name, params.join(", "), self.returns)
    }
}

/// Whether a group is a feature's implicit group or an explicit member list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    /// Every config of one feature not claimed by an explicit group.
    Feature,
    /// An ordered list of keys.
    Explicit,
}

/// A group as declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigGroup {
    /// Group key (the feature name for implicit groups).
    pub key: String,
    /// Implicit or explicit.
    pub kind: GroupKind,
    /// Member keys in declaration order, unchecked.
    pub members: Vec<String>,
    /// Position in declaration order.
    pub ordinal: usize,
    /// Location path.
    pub location: String,
}

/// The kinds of function binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    /// `(&T) -> bool`, a failed check falls back to the default.
    Validator,
    /// `(T) -> U`, applied last.
    Adapter,
    /// `() -> T`, replaces retrieval.
    Mock,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validator => write!(f, "validator"),
            Self::Adapter => write!(f, "adapter"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

/// A function bound to a config key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Binding kind.
    pub kind: BindingKind,
    /// Target config key, unchecked.
    pub key: String,
    /// Function name, unchecked.
    pub function: String,
    /// Position in declaration order.
    pub ordinal: usize,
    /// Location path.
    pub location: String,
}

/// Everything the model builder extracted from the declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementGraph {
    /// Declared sources.
    pub sources: Vec<Source>,
    /// Declared functions.
    pub functions: Vec<Function>,
    /// Config elements in declaration order.
    pub elements: Vec<ConfigElement>,
    /// Groups: each feature's implicit group followed by its explicit groups.
    pub groups: Vec<ConfigGroup>,
    /// Bindings in declaration order.
    pub bindings: Vec<Binding>,
}

impl ElementGraph {
    /// Looks up an element by key.
    #[must_use]
    pub fn element(&self, key: &str) -> Option<&ConfigElement> {
        self.elements.iter().find(|e| e.key() == key)
    }
}

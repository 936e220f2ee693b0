//! Resolution: turns an element graph into a fully linked schema.
//!
//! Every step runs to completion and reports into a single [`Diagnostics`] list
//! owned by the [`Resolver`]. The steps touch disjoint data, and the list is
//! sorted by declaration ordinal and then kind before it is returned, so the
//! order the steps run in never shows in the output.

mod bindings;
mod defaults;
mod enums;
mod groups;
mod mutability;

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::error::{Diagnostic, DiagnosticKind, Diagnostics, Error, Result};
use crate::model::{
    ConfigElement, ElementGraph, Function, GroupKind, Source, TypeRef, CANONICAL_RUNTIME,
};
use crate::runtime::Color;

pub use bindings::BoundFunctions;

/// A literal default, checked against the config's type and rules.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `boolean`.
    Bool(bool),
    /// `integer`.
    Int(i32),
    /// `long`.
    Long(i64),
    /// `float`, always finite.
    Float(f32),
    /// `string`, `text`, `url`.
    String(String),
    /// `string-set`.
    StringSet(BTreeSet<String>),
    /// `json`: the document to deserialize into the target type.
    Json(serde_json::Value),
    /// Enum constant name.
    Enum(String),
    /// `color`.
    Color(Color),
    /// `time`, in the config's time unit.
    Time(i64),
}

/// Where a config's default value comes from, once resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedDefault {
    /// The type's implicit zero value.
    Zero,
    /// A literal.
    Literal(Literal),
    /// A named resource.
    Resource(String),
    /// The current value of another config.
    Config(String),
    /// A zero-argument provider function.
    Provider(Function),
}

impl ResolvedDefault {
    /// Short description for listings.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Zero => "zero".to_string(),
            Self::Literal(literal) => format!("value {literal:?}"),
            Self::Resource(name) => format!("resource {name}"),
            Self::Config(key) => format!("config {key}"),
            Self::Provider(function) => format!("provider {}", function.name),
        }
    }
}

/// A config with its default, bindings, and owning group attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// The element as built.
    pub element: ConfigElement,
    /// Resolved default.
    pub default: ResolvedDefault,
    /// Bound functions.
    pub functions: BoundFunctions,
    /// Key of the owning group.
    pub group: String,
}

impl ResolvedConfig {
    /// The config key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.element.key()
    }

    /// The type accessors return: the adapter's return type, else the value type.
    #[must_use]
    pub fn exposed_type(&self) -> TypeRef {
        self.functions
            .adapter
            .as_ref()
            .map_or_else(|| self.element.type_ref(), |f| f.returns.clone())
    }
}

/// A group with its final, conflict-free member list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedGroup {
    /// Group key.
    pub key: String,
    /// Implicit (feature) or explicit.
    pub kind: GroupKind,
    /// Member keys in accessor order.
    pub members: Vec<String>,
}

/// One row of a schema listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSummary {
    /// Config key.
    pub key: String,
    /// Declared value type.
    pub value_type: String,
    /// Exposed Rust type.
    pub exposed_type: String,
    /// Source id.
    pub source: String,
    /// Whether a write accessor exists.
    pub mutable: bool,
    /// Owning group.
    pub group: String,
    /// Default description.
    pub default: String,
    /// Bound validator, if any.
    pub validator: Option<String>,
    /// Bound adapter, if any.
    pub adapter: Option<String>,
    /// Bound mock, if any.
    pub mock: Option<String>,
}

/// The output of resolution: ready for emission.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSchema {
    /// Configs in declaration order.
    pub configs: Vec<ResolvedConfig>,
    /// Groups in declaration order, empty ones included.
    pub groups: Vec<ResolvedGroup>,
    /// Declared sources.
    pub sources: Vec<Source>,
    index: HashMap<String, usize>,
}

impl ResolvedSchema {
    /// Looks up a config by key.
    #[must_use]
    pub fn config(&self, key: &str) -> Option<&ResolvedConfig> {
        self.index.get(key).map(|&i| &self.configs[i])
    }

    /// Looks up a group by key.
    #[must_use]
    pub fn group(&self, key: &str) -> Option<&ResolvedGroup> {
        self.groups.iter().find(|g| g.key == key)
    }

    /// Configs of a group, in accessor order.
    pub fn members<'a>(&'a self, group: &'a ResolvedGroup) -> impl Iterator<Item = &'a ResolvedConfig> {
        group.members.iter().filter_map(|key| self.config(key))
    }

    /// Flat listing rows, one per config in declaration order.
    #[must_use]
    pub fn summary(&self) -> Vec<ConfigSummary> {
        self.configs
            .iter()
            .map(|c| {
                let common = c.element.common();
                ConfigSummary {
                    key: common.key.clone(),
                    value_type: common.value_type.to_string(),
                    exposed_type: c.exposed_type().rust_type(CANONICAL_RUNTIME),
                    source: common.source.clone(),
                    mutable: common.mutable,
                    group: c.group.clone(),
                    default: c.default.describe(),
                    validator: c.functions.validator.as_ref().map(|f| f.name.clone()),
                    adapter: c.functions.adapter.as_ref().map(|f| f.name.clone()),
                    mock: c.functions.mock.as_ref().map(|f| f.name.clone()),
                }
            })
            .collect()
    }
}

/// Links an [`ElementGraph`] into a [`ResolvedSchema`], collecting every
/// defect it finds along the way.
///
/// # Examples
///
/// ```
/// use aircon::declaration::Declarations;
/// use aircon::error::DiagnosticKind;
/// use aircon::model::ModelBuilder;
/// use aircon::resolve::Resolver;
///
/// let decls = Declarations::from_yaml_str(
///     r#"
/// sources: [{ id: remote }]
/// features:
///   - name: Links
///     source: remote
///     configs:
///       - { key: HOME, type: url }
///       - { key: A, type: integer, default: { config: B } }
///       - { key: B, type: integer, default: { config: A } }
/// "#,
/// )
/// .unwrap();
///
/// let graph = ModelBuilder::build(&decls).unwrap();
/// let err = Resolver::resolve(&graph).unwrap_err();
/// let diagnostics = err.diagnostics().unwrap();
/// assert_eq!(diagnostics.len(), 2);
/// assert!(diagnostics.has_kind(DiagnosticKind::MissingDefault));
/// assert!(diagnostics.has_kind(DiagnosticKind::CyclicDefault));
/// ```
pub struct Resolver<'g> {
    graph: &'g ElementGraph,
    index: HashMap<&'g str, usize>,
    functions: HashMap<&'g str, &'g Function>,
    diagnostics: Diagnostics,
}

impl<'g> Resolver<'g> {
    /// Resolves the graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Compile`] carrying every diagnostic found, sorted by
    /// declaration order and then kind.
    pub fn resolve(graph: &'g ElementGraph) -> Result<ResolvedSchema> {
        let mut resolver = Self {
            graph,
            index: graph
                .elements
                .iter()
                .enumerate()
                .map(|(i, e)| (e.key(), i))
                .collect(),
            functions: graph
                .functions
                .iter()
                .map(|f| (f.name.as_str(), f))
                .collect(),
            diagnostics: Diagnostics::new(),
        };

        let bound = resolver.resolve_bindings();
        let defaults = resolver.resolve_defaults(&bound);
        resolver.resolve_enums();
        let (groups, owners) = resolver.resolve_groups();
        resolver.check_member_names(&groups);
        resolver.check_mutability();

        if !resolver.diagnostics.is_empty() {
            let mut diagnostics = resolver.diagnostics;
            diagnostics.sort();
            log::debug!("resolution failed with {} diagnostic(s)", diagnostics.len());
            return Err(Error::Compile(diagnostics));
        }

        let configs: Vec<ResolvedConfig> = graph
            .elements
            .iter()
            .zip(bound)
            .zip(defaults)
            .zip(owners)
            .map(|(((element, functions), default), group)| ResolvedConfig {
                element: element.clone(),
                default,
                functions,
                group,
            })
            .collect();
        let index = configs
            .iter()
            .enumerate()
            .map(|(i, c)| (c.key().to_string(), i))
            .collect();

        Ok(ResolvedSchema {
            configs,
            groups,
            sources: graph.sources.clone(),
            index,
        })
    }

    fn element(&self, key: &str) -> Option<&'g ConfigElement> {
        self.index.get(key).map(|&i| &self.graph.elements[i])
    }

    fn report<I, S>(
        &mut self,
        kind: DiagnosticKind,
        keys: I,
        ordinal: usize,
        location: &str,
        message: impl Into<String>,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.diagnostics
            .push(Diagnostic::new(kind, keys, location, message).at(ordinal));
    }
}

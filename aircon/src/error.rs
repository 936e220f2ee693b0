//! Error types for the aircon library.
//!
//! Compile-time problems in a schema are reported as [`Diagnostic`]s. The
//! model builder stops at its first diagnostic, the resolver collects all of
//! them; either way they reach callers as [`Error::Compile`]. The remaining
//! variants cover I/O, parsing, settings, and the reference interpreter.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Result type alias for operations that may fail with an aircon error.
///
/// # Examples
///
/// ```
/// use aircon::{Error, Result};
///
/// fn example_operation() -> Result<usize> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the aircon library.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema failed to compile.
    #[error("{0}")]
    Compile(Diagnostics),

    /// A schema or settings file could not be parsed.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// The file that failed to parse.
        path: PathBuf,
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// YAML text handed to the library directly could not be parsed.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A settings value is invalid.
    #[error("invalid setting '{field}': {message}")]
    Settings {
        /// The setting that failed validation.
        field: String,
        /// A description of the problem.
        message: String,
    },

    /// The requested config or group does not exist in the compiled schema.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// A bound function has no implementation registered with the interpreter.
    #[error("function '{name}' is not registered")]
    UnregisteredFunction {
        /// The function name from the schema.
        name: String,
    },

    /// A write was attempted on a config without a write accessor.
    #[error("config '{key}' is not mutable")]
    Immutable {
        /// The config key.
        key: String,
    },

    /// A value handed to the interpreter does not match the config's type.
    #[error("type mismatch for '{key}': expected {expected}")]
    TypeMismatch {
        /// The config key.
        key: String,
        /// The expected type.
        expected: String,
    },
}

impl Error {
    /// Returns the diagnostics carried by a compile failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use aircon::{Diagnostic, DiagnosticKind, Diagnostics, Error};
    ///
    /// let err = Error::Compile(Diagnostics::from(vec![Diagnostic::new(
    ///     DiagnosticKind::DuplicateKey,
    ///     ["ENABLED"],
    ///     "features[0].configs[1]",
    ///     "key declared twice",
    /// )]));
    /// assert_eq!(err.diagnostics().unwrap().len(), 1);
    /// ```
    #[must_use]
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            Self::Compile(diagnostics) => Some(diagnostics),
            _ => None,
        }
    }

    /// Check if the error contains a diagnostic of the given kind.
    #[must_use]
    pub fn has_kind(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics().is_some_and(|d| d.has_kind(kind))
    }
}

/// The kind of a compile-time diagnostic.
///
/// Variant order is the tie-breaker when two diagnostics share a declaration
/// ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// Two declarations share a key.
    DuplicateKey,
    /// A config declares a value type outside the recognized set.
    UnknownType,
    /// A config without an implicit zero value declares no default.
    MissingDefault,
    /// Config-reference defaults form a cycle.
    CyclicDefault,
    /// An enum's raw-value mapping is not total or not injective.
    InvalidEnumMapping,
    /// A binding names a key that is not declared.
    UnknownBindingTarget,
    /// A bound function's signature does not fit the config.
    BindingSignature,
    /// A key is claimed by more than one explicit group, or twice by one.
    GroupConflict,
    /// A mutable config reads from a source without write support.
    ImmutableSource,
    /// A declaration is structurally malformed.
    InvalidDeclaration,
    /// A default value is malformed, conflicting, or incompatible.
    InvalidDefault,
    /// A binding or default names an undeclared function.
    UnknownFunction,
    /// A key carries two bindings of the same kind.
    DuplicateBinding,
    /// An explicit group lists an undeclared key.
    UnknownGroupMember,
    /// A config reads from an undeclared source.
    UnknownSource,
}

impl DiagnosticKind {
    /// Returns the stable kebab-case code used in reports.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::DuplicateKey => "duplicate-key",
            Self::UnknownType => "unknown-type",
            Self::MissingDefault => "missing-default",
            Self::CyclicDefault => "cyclic-default",
            Self::InvalidEnumMapping => "invalid-enum-mapping",
            Self::UnknownBindingTarget => "unknown-binding-target",
            Self::BindingSignature => "binding-signature",
            Self::GroupConflict => "group-conflict",
            Self::ImmutableSource => "immutable-source",
            Self::InvalidDeclaration => "invalid-declaration",
            Self::InvalidDefault => "invalid-default",
            Self::UnknownFunction => "unknown-function",
            Self::DuplicateBinding => "duplicate-binding",
            Self::UnknownGroupMember => "unknown-group-member",
            Self::UnknownSource => "unknown-source",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One compile-time defect in a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// The offending key(s).
    pub keys: Vec<String>,
    /// Location path of the offending declaration, e.g. `features[0].configs[2]`.
    pub location: String,
    /// Human-readable explanation.
    pub message: String,
    #[serde(skip)]
    pub(crate) ordinal: usize,
}

impl Diagnostic {
    /// Creates a diagnostic without a declaration ordinal.
    pub fn new<I, S>(
        kind: DiagnosticKind,
        keys: I,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            keys: keys.into_iter().map(Into::into).collect(),
            location: location.into(),
            message: message.into(),
            ordinal: 0,
        }
    }

    #[must_use]
    pub(crate) fn at(mut self, ordinal: usize) -> Self {
        self.ordinal = ordinal;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}] {}", self.kind, self.location)?;
        if !self.keys.is_empty() {
            write!(f, " ({})", self.keys.join(", "))?;
        }
        write!(f, ": {}", self.message)
    }
}

/// An ordered list of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    /// Sorts by declaration ordinal, then by kind. Stable, so diagnostics with
    /// equal keys keep the order they were raised in.
    pub(crate) fn sort(&mut self) {
        self.0.sort_by_key(|d| (d.ordinal, d.kind));
    }

    /// Number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates in report order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    /// Whether any diagnostic has the given kind.
    #[must_use]
    pub fn has_kind(&self, kind: DiagnosticKind) -> bool {
        self.0.iter().any(|d| d.kind == kind)
    }

    /// Diagnostics of the given kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(move |d| d.kind == kind)
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self(diagnostics)
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self(vec![diagnostic])
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "compilation failed with {} error(s)", self.0.len())?;
        for diagnostic in &self.0 {
            write!(f, "\n  {diagnostic}")?;
        }
        Ok(())
    }
}

impl From<Diagnostic> for Error {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::Compile(Diagnostics::from(diagnostic))
    }
}

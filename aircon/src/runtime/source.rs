//! Sources, resources, and the context generated providers read through.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, RwLock};

use super::{Color, RawValue};

/// A provider of raw config values, optionally writable.
pub trait ConfigSource: Send + Sync {
    /// Whether [`ConfigSource::write`] can succeed.
    fn supports_write(&self) -> bool;

    /// Returns the raw value stored under `key`, if any.
    fn read(&self, key: &str) -> Option<RawValue>;

    /// Stores `value` under `key`. Returns `false` on failure.
    fn write(&self, key: &str, value: RawValue) -> bool;
}

/// Typed lookups for resource-reference defaults.
///
/// Implementations decide what a missing resource yields.
pub trait Resources: Send + Sync {
    /// Boolean resource.
    fn boolean(&self, name: &str) -> bool;
    /// Integer resource.
    fn integer(&self, name: &str) -> i32;
    /// Long resource.
    fn long(&self, name: &str) -> i64 {
        i64::from(self.integer(name))
    }
    /// Float resource.
    fn float(&self, name: &str) -> f32;
    /// String resource.
    fn string(&self, name: &str) -> String;
    /// String-array resource.
    fn string_set(&self, name: &str) -> BTreeSet<String>;
    /// Color resource.
    fn color(&self, name: &str) -> Color;
}

/// An in-memory source.
///
/// # Examples
///
/// ```
/// use aircon::runtime::{ConfigSource, MemorySource, RawValue};
///
/// let source = MemorySource::writable();
/// assert!(source.write("COUNT", RawValue::Int(3)));
/// assert_eq!(source.read("COUNT"), Some(RawValue::Int(3)));
/// ```
#[derive(Debug, Default)]
pub struct MemorySource {
    writable: bool,
    values: RwLock<BTreeMap<String, RawValue>>,
}

impl MemorySource {
    /// A source without write support.
    #[must_use]
    pub fn read_only() -> Self {
        Self::default()
    }

    /// A source with write support.
    #[must_use]
    pub fn writable() -> Self {
        Self {
            writable: true,
            ..Self::default()
        }
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(self, key: impl Into<String>, value: RawValue) -> Self {
        self.set(key, value);
        self
    }

    /// Inserts or replaces a value regardless of write support.
    pub fn set(&self, key: impl Into<String>, value: RawValue) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.into(), value);
        }
    }

    /// Removes a value.
    pub fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.write() {
            values.remove(key);
        }
    }
}

impl ConfigSource for MemorySource {
    fn supports_write(&self) -> bool {
        self.writable
    }

    fn read(&self, key: &str) -> Option<RawValue> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn write(&self, key: &str, value: RawValue) -> bool {
        if !self.writable {
            return false;
        }
        match self.values.write() {
            Ok(mut values) => {
                values.insert(key.to_string(), value);
                true
            }
            Err(_) => false,
        }
    }
}

/// In-memory resources. Missing or mistyped entries yield the type's zero value.
#[derive(Debug, Clone, Default)]
pub struct MemoryResources {
    values: BTreeMap<String, RawValue>,
}

impl MemoryResources {
    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: RawValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    fn get(&self, name: &str) -> Option<RawValue> {
        self.values.get(name).cloned()
    }
}

impl Resources for MemoryResources {
    fn boolean(&self, name: &str) -> bool {
        self.get(name).and_then(RawValue::into_bool).unwrap_or_default()
    }

    fn integer(&self, name: &str) -> i32 {
        self.get(name).and_then(RawValue::into_int).unwrap_or_default()
    }

    fn long(&self, name: &str) -> i64 {
        self.get(name).and_then(RawValue::into_long).unwrap_or_default()
    }

    fn float(&self, name: &str) -> f32 {
        self.get(name).and_then(RawValue::into_float).unwrap_or_default()
    }

    fn string(&self, name: &str) -> String {
        self.get(name).and_then(RawValue::into_string).unwrap_or_default()
    }

    fn string_set(&self, name: &str) -> BTreeSet<String> {
        self.get(name)
            .and_then(RawValue::into_string_set)
            .unwrap_or_default()
    }

    fn color(&self, name: &str) -> Color {
        self.get(name).and_then(Color::from_raw).unwrap_or_default()
    }
}

/// The sources and resources a set of generated providers reads through.
pub struct ProviderContext {
    sources: BTreeMap<String, Arc<dyn ConfigSource>>,
    resources: Arc<dyn Resources>,
}

impl ProviderContext {
    /// Creates a context with the given resources and no sources.
    pub fn new(resources: impl Resources + 'static) -> Self {
        Self {
            sources: BTreeMap::new(),
            resources: Arc::new(resources),
        }
    }

    /// Builder-style source registration.
    #[must_use]
    pub fn with_source(mut self, id: impl Into<String>, source: impl ConfigSource + 'static) -> Self {
        self.register(id, Arc::new(source));
        self
    }

    /// Registers (or replaces) the source bound to `id`.
    pub fn register(&mut self, id: impl Into<String>, source: Arc<dyn ConfigSource>) {
        self.sources.insert(id.into(), source);
    }

    /// Reads `key` from source `id`. An unregistered source reads as empty.
    #[must_use]
    pub fn read(&self, id: &str, key: &str) -> Option<RawValue> {
        self.sources.get(id)?.read(key)
    }

    /// Writes `key` to source `id`, failing when the source is missing or
    /// read-only.
    #[must_use]
    pub fn write(&self, id: &str, key: &str, value: RawValue) -> bool {
        self.sources
            .get(id)
            .is_some_and(|source| source.supports_write() && source.write(key, value))
    }

    /// Resources for resource-reference defaults.
    #[must_use]
    pub fn resources(&self) -> &dyn Resources {
        self.resources.as_ref()
    }
}

impl Default for ProviderContext {
    fn default() -> Self {
        Self::new(MemoryResources::default())
    }
}

impl fmt::Debug for ProviderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderContext")
            .field("sources", &self.sources.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

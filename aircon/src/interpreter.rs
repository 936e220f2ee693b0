//! Evaluates a resolved schema directly, without generating code.
//!
//! The [`Interpreter`] applies the same read pipeline the emitter renders:
//! retrieval, decoding, inherited validation, user validator, default, then
//! adapter. Bound functions are looked up by name in a [`FunctionTable`].

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::model::{
    ConfigElement, ElementVisitor, EnumElement, EnumRaw, JsonElement, NumericRange,
    PrimitiveElement, RangeFallback, SpecialElement, ValueType,
};
use crate::resolve::{Literal, ResolvedConfig, ResolvedDefault, ResolvedSchema};
use crate::runtime::{is_valid_text, is_valid_url, Color, ProviderContext, RawValue};

/// A config value as the interpreter sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `boolean`.
    Bool(bool),
    /// `integer`.
    Int(i32),
    /// `long`.
    Long(i64),
    /// `float`.
    Float(f32),
    /// `string`, `text`, `url`.
    String(String),
    /// `string-set`.
    StringSet(BTreeSet<String>),
    /// `json`, kept as a document.
    Json(serde_json::Value),
    /// Enum constant name.
    Enum(String),
    /// `color`.
    Color(Color),
    /// `time`.
    Duration(Duration),
}

/// `Time` literals carry no unit here and are taken as milliseconds.
impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Bool(b) => Self::Bool(b),
            Literal::Int(n) => Self::Int(n),
            Literal::Long(n) => Self::Long(n),
            Literal::Float(f) => Self::Float(f),
            Literal::String(s) => Self::String(s),
            Literal::StringSet(s) => Self::StringSet(s),
            Literal::Json(v) => Self::Json(v),
            Literal::Enum(name) => Self::Enum(name),
            Literal::Color(c) => Self::Color(c),
            Literal::Time(ms) => Self::Duration(Duration::from_millis(ms.unsigned_abs())),
        }
    }
}

type Validator = Box<dyn Fn(&Value) -> bool + Send + Sync>;
type Adapter = Box<dyn Fn(Value) -> Value + Send + Sync>;
type Supplier = Box<dyn Fn() -> Value + Send + Sync>;

/// Implementations of the functions a schema binds, registered by name.
#[derive(Default)]
pub struct FunctionTable {
    validators: HashMap<String, Validator>,
    adapters: HashMap<String, Adapter>,
    suppliers: HashMap<String, Supplier>,
}

impl FunctionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a validator.
    #[must_use]
    pub fn validator(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.validators.insert(name.into(), Box::new(f));
        self
    }

    /// Registers an adapter.
    #[must_use]
    pub fn adapter(
        mut self,
        name: impl Into<String>,
        f: impl Fn(Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.adapters.insert(name.into(), Box::new(f));
        self
    }

    /// Registers a zero-argument function, used for mocks and provider defaults.
    #[must_use]
    pub fn supplier(
        mut self,
        name: impl Into<String>,
        f: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Self {
        self.suppliers.insert(name.into(), Box::new(f));
        self
    }
}

fn sorted_names<V>(map: &HashMap<String, V>) -> Vec<&str> {
    let mut names: Vec<&str> = map.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTable")
            .field("validators", &sorted_names(&self.validators))
            .field("adapters", &sorted_names(&self.adapters))
            .field("suppliers", &sorted_names(&self.suppliers))
            .finish()
    }
}

/// Applies a range rule to a number, `None` when it falls back to default.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn apply_range(range: &NumericRange, value: Value) -> Option<Value> {
    if range.is_open() {
        return Some(value);
    }
    let as_f64 = match &value {
        Value::Int(n) => f64::from(*n),
        Value::Long(n) => *n as f64,
        Value::Float(f) => f64::from(*f),
        _ => return Some(value),
    };
    if range.contains(as_f64) {
        return Some(value);
    }
    match range.fallback {
        RangeFallback::Default => None,
        RangeFallback::Clamp => {
            let lo = range.min.unwrap_or(f64::NEG_INFINITY);
            let hi = range.max.unwrap_or(f64::INFINITY);
            let clamped = as_f64.clamp(lo, hi);
            Some(match value {
                Value::Int(_) => Value::Int(clamped as i32),
                Value::Long(_) => Value::Long(clamped as i64),
                _ => Value::Float(clamped as f32),
            })
        }
    }
}

/// Decoding and inherited validation of one raw value.
struct Decode {
    raw: RawValue,
}

impl ElementVisitor for Decode {
    type Arg = ();
    type Output = Option<Value>;

    fn visit_primitive(&mut self, element: &PrimitiveElement, (): ()) -> Option<Value> {
        let raw = self.raw.clone();
        let value = match element.common.value_type {
            ValueType::Boolean => raw.into_bool().map(Value::Bool),
            ValueType::Integer => raw.into_int().map(Value::Int),
            ValueType::Long => raw.into_long().map(Value::Long),
            ValueType::Float => raw.into_float().map(Value::Float),
            ValueType::StringSet => raw.into_string_set().map(Value::StringSet),
            _ => raw.into_string().map(Value::String),
        }?;
        let value = apply_range(&element.range, value)?;
        if element.non_empty && value == Value::String(String::new()) {
            return None;
        }
        Some(value)
    }

    fn visit_enum(&mut self, element: &EnumElement, (): ()) -> Option<Value> {
        let raw = match element.common.value_type {
            ValueType::IntEnum => EnumRaw::Int(self.raw.clone().into_int()?),
            _ => EnumRaw::String(self.raw.clone().into_string()?),
        };
        element
            .constants
            .iter()
            .find(|c| c.typed_raw(element.common.value_type).as_ref() == Some(&raw))
            .map(|c| Value::Enum(c.name.clone()))
    }

    fn visit_json(&mut self, _element: &JsonElement, (): ()) -> Option<Value> {
        let text = self.raw.clone().into_string()?;
        serde_json::from_str(&text).ok().map(Value::Json)
    }

    fn visit_special(&mut self, element: &SpecialElement, (): ()) -> Option<Value> {
        let raw = self.raw.clone();
        match element.common.value_type {
            ValueType::Color => Color::from_raw(raw).map(Value::Color),
            ValueType::Time => raw
                .into_long()
                .and_then(|amount| element.time_unit.to_duration(amount))
                .map(Value::Duration),
            ValueType::Url => raw
                .into_string()
                .filter(|s| is_valid_url(s))
                .map(Value::String),
            _ => raw
                .into_string()
                .filter(|s| is_valid_text(s))
                .map(Value::String),
        }
    }
}

/// The raw value written for a typed value, `None` on a type mismatch.
struct Encode<'a> {
    value: &'a Value,
}

impl ElementVisitor for Encode<'_> {
    type Arg = ();
    type Output = Option<RawValue>;

    fn visit_primitive(&mut self, element: &PrimitiveElement, (): ()) -> Option<RawValue> {
        match (element.common.value_type, self.value) {
            (ValueType::Boolean, Value::Bool(b)) => Some(RawValue::Bool(*b)),
            (ValueType::Integer, Value::Int(n)) => Some(RawValue::Int(*n)),
            (ValueType::Long, Value::Long(n)) => Some(RawValue::Long(*n)),
            (ValueType::Float, Value::Float(f)) => Some(RawValue::Float(*f)),
            (ValueType::String, Value::String(s)) => Some(RawValue::String(s.clone())),
            (ValueType::StringSet, Value::StringSet(s)) => Some(RawValue::StringSet(s.clone())),
            _ => None,
        }
    }

    fn visit_enum(&mut self, element: &EnumElement, (): ()) -> Option<RawValue> {
        let Value::Enum(name) = self.value else {
            return None;
        };
        let constant = element.constants.iter().find(|c| &c.name == name)?;
        match constant.typed_raw(element.common.value_type)? {
            EnumRaw::Int(n) => Some(RawValue::Int(n)),
            EnumRaw::String(s) => Some(RawValue::String(s)),
        }
    }

    fn visit_json(&mut self, _element: &JsonElement, (): ()) -> Option<RawValue> {
        match self.value {
            Value::Json(document) => Some(RawValue::String(document.to_string())),
            _ => None,
        }
    }

    fn visit_special(&mut self, element: &SpecialElement, (): ()) -> Option<RawValue> {
        match self.value {
            Value::Color(color) => Some(RawValue::String(color.to_hex())),
            Value::Duration(duration) => {
                Some(RawValue::Long(element.time_unit.from_duration(*duration)))
            }
            Value::String(s)
                if matches!(element.common.value_type, ValueType::Text | ValueType::Url) =>
            {
                Some(RawValue::String(s.clone()))
            }
            _ => None,
        }
    }
}

fn zero_value(value_type: ValueType) -> Option<Value> {
    let value = match value_type {
        ValueType::Boolean => Value::Bool(false),
        ValueType::Integer => Value::Int(0),
        ValueType::Long => Value::Long(0),
        ValueType::Float => Value::Float(0.0),
        ValueType::String | ValueType::Text => Value::String(String::new()),
        ValueType::StringSet => Value::StringSet(BTreeSet::new()),
        ValueType::Time => Value::Duration(Duration::ZERO),
        _ => return None,
    };
    Some(value)
}

/// Reads configs of a [`ResolvedSchema`] through a [`ProviderContext`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use aircon::declaration::Declarations;
/// use aircon::interpreter::{FunctionTable, Interpreter, Value};
/// use aircon::model::ModelBuilder;
/// use aircon::resolve::Resolver;
/// use aircon::runtime::{MemoryResources, MemorySource, ProviderContext, RawValue};
///
/// let decls = Declarations::from_yaml_str(
///     r#"
/// sources: [{ id: S }]
/// features:
///   - name: Flags
///     source: S
///     configs:
///       - { key: ENABLED, type: boolean, default: { value: false } }
///       - { key: ANOTHER_FLAG, type: boolean, default: { config: ENABLED } }
/// "#,
/// )
/// .unwrap();
/// let schema = Resolver::resolve(&ModelBuilder::build(&decls).unwrap()).unwrap();
///
/// let source = MemorySource::read_only().with("ENABLED", RawValue::Bool(true));
/// let ctx = Arc::new(ProviderContext::new(MemoryResources::default()).with_source("S", source));
/// let interpreter = Interpreter::new(&schema, ctx, FunctionTable::new());
///
/// assert_eq!(interpreter.get("ANOTHER_FLAG").unwrap(), Value::Bool(true));
/// ```
pub struct Interpreter<'s> {
    schema: &'s ResolvedSchema,
    ctx: Arc<ProviderContext>,
    functions: FunctionTable,
}

impl<'s> Interpreter<'s> {
    /// Creates an interpreter.
    #[must_use]
    pub fn new(schema: &'s ResolvedSchema, ctx: Arc<ProviderContext>, functions: FunctionTable) -> Self {
        Self {
            schema,
            ctx,
            functions,
        }
    }

    fn config(&self, key: &str) -> Result<&'s ResolvedConfig> {
        self.schema.config(key).ok_or_else(|| Error::NotFound {
            resource: format!("config '{key}'"),
        })
    }

    fn supply(&self, name: &str) -> Result<Value> {
        self.functions
            .suppliers
            .get(name)
            .map(|f| f())
            .ok_or_else(|| Error::UnregisteredFunction { name: name.into() })
    }

    fn adapt(&self, config: &ResolvedConfig, value: Value) -> Result<Value> {
        match &config.functions.adapter {
            None => Ok(value),
            Some(adapter) => self
                .functions
                .adapters
                .get(&adapter.name)
                .map(|f| f(value))
                .ok_or_else(|| Error::UnregisteredFunction {
                    name: adapter.name.clone(),
                }),
        }
    }

    /// Reads the current value of a config.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for unknown keys and
    /// [`Error::UnregisteredFunction`] when a bound function has no
    /// implementation in the table.
    pub fn get(&self, key: &str) -> Result<Value> {
        let config = self.config(key)?;
        if let Some(mock) = &config.functions.mock {
            let value = self.supply(&mock.name)?;
            return self.adapt(config, value);
        }

        let common = config.element.common();
        let decoded = self
            .ctx
            .read(&common.source, &common.key)
            .and_then(|raw| config.element.accept(&mut Decode { raw }, ()));
        let validated = match (decoded, &config.functions.validator) {
            (Some(value), Some(validator)) => {
                let check = self.functions.validators.get(&validator.name).ok_or_else(|| {
                    Error::UnregisteredFunction {
                        name: validator.name.clone(),
                    }
                })?;
                Some(value).filter(|v| check(v))
            }
            (decoded, None) => decoded,
            (None, Some(_)) => None,
        };
        let value = match validated {
            Some(value) => value,
            None => self.default_value(config)?,
        };
        self.adapt(config, value)
    }

    /// The resolved default of a config, evaluated now.
    ///
    /// # Errors
    ///
    /// As for [`Interpreter::get`].
    pub fn default_value(&self, config: &ResolvedConfig) -> Result<Value> {
        let common = config.element.common();
        match &config.default {
            ResolvedDefault::Zero => zero_value(common.value_type).ok_or_else(|| Error::TypeMismatch {
                key: common.key.clone(),
                expected: "a declared default".into(),
            }),
            ResolvedDefault::Literal(Literal::Time(amount)) => match &config.element {
                ConfigElement::Special(special) => Ok(Value::Duration(
                    special.time_unit.to_duration(*amount).unwrap_or_default(),
                )),
                _ => Ok(Literal::Time(*amount).into()),
            },
            ResolvedDefault::Literal(literal) => Ok(literal.clone().into()),
            ResolvedDefault::Resource(name) => {
                let resources = self.ctx.resources();
                Ok(match common.value_type {
                    ValueType::Boolean => Value::Bool(resources.boolean(name)),
                    ValueType::Integer => Value::Int(resources.integer(name)),
                    ValueType::Long => Value::Long(resources.long(name)),
                    ValueType::Float => Value::Float(resources.float(name)),
                    ValueType::StringSet => Value::StringSet(resources.string_set(name)),
                    ValueType::Color => Value::Color(resources.color(name)),
                    _ => Value::String(resources.string(name)),
                })
            }
            ResolvedDefault::Config(target) => self.get(target),
            ResolvedDefault::Provider(function) => self.supply(&function.name),
        }
    }

    /// Writes a value through a mutable config's source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Immutable`] if the config has no write accessor and
    /// [`Error::TypeMismatch`] if `value` does not fit its type.
    pub fn set(&self, key: &str, value: &Value) -> Result<bool> {
        let config = self.config(key)?;
        let common = config.element.common();
        if !common.mutable {
            return Err(Error::Immutable { key: key.into() });
        }
        let raw = config
            .element
            .accept(&mut Encode { value }, ())
            .ok_or_else(|| Error::TypeMismatch {
                key: key.into(),
                expected: config.element.type_ref().to_string(),
            })?;
        Ok(self.ctx.write(&common.source, &common.key, raw))
    }

    /// Reads every config of a group, in accessor order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for unknown groups, and any error of
    /// [`Interpreter::get`].
    pub fn get_all(&self, group: &str) -> Result<Vec<(String, Value)>> {
        let group = self.schema.group(group).ok_or_else(|| Error::NotFound {
            resource: format!("group '{group}'"),
        })?;
        group
            .members
            .iter()
            .map(|key| Ok((key.clone(), self.get(key)?)))
            .collect()
    }
}

impl fmt::Debug for Interpreter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("configs", &self.schema.configs.len())
            .field("ctx", &self.ctx)
            .field("functions", &self.functions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::Declarations;
    use crate::model::ModelBuilder;
    use crate::resolve::Resolver;
    use crate::runtime::{MemoryResources, MemorySource};

    const SCHEMA: &str = r#"
sources: [{ id: remote }, { id: prefs, writable: true }]
functions:
  - { name: positive, params: [integer], returns: boolean }
  - { name: shout, params: [string], returns: string }
  - { name: fixed, params: [], returns: integer }
features:
  - name: F
    source: remote
    configs:
      - { key: LIMIT, type: integer, min: 0, max: 10, default: { value: 5 }, validator: positive }
      - { key: CLAMPED, type: integer, min: 0, max: 10, range_fallback: clamp }
      - { key: NAME, type: string, non_empty: true, default: { resource: app_name }, adapter: shout }
      - { key: LEVEL, type: int-enum, enum: { constants: [{ name: Low, value: 1 }, { name: High, value: 2 }] }, default: { value: Low } }
      - { key: HOME, type: url, default: { value: "https://default.example" } }
      - { key: WAIT, type: time, time_unit: seconds, default: { value: 3 } }
      - { key: PINNED, type: integer, mock: fixed }
      - { key: SAVED, type: long, source: prefs, mutable: true }
"#;

    fn schema() -> ResolvedSchema {
        let decls = Declarations::from_yaml_str(SCHEMA).unwrap();
        Resolver::resolve(&ModelBuilder::build(&decls).unwrap()).unwrap()
    }

    fn functions() -> FunctionTable {
        FunctionTable::new()
            .validator("positive", |v| matches!(v, Value::Int(n) if *n > 0))
            .adapter("shout", |v| match v {
                Value::String(s) => Value::String(s.to_uppercase()),
                other => other,
            })
            .supplier("fixed", || Value::Int(42))
    }

    fn context(remote: MemorySource) -> Arc<ProviderContext> {
        Arc::new(
            ProviderContext::new(MemoryResources::default().with("app_name", RawValue::String("demo".into())))
                .with_source("remote", remote)
                .with_source("prefs", MemorySource::writable()),
        )
    }

    #[test]
    fn test_defaults_when_source_is_empty() {
        let schema = schema();
        let interpreter = Interpreter::new(&schema, context(MemorySource::read_only()), functions());
        assert_eq!(interpreter.get("LIMIT").unwrap(), Value::Int(5));
        assert_eq!(interpreter.get("CLAMPED").unwrap(), Value::Int(0));
        assert_eq!(interpreter.get("NAME").unwrap(), Value::String("DEMO".into()));
        assert_eq!(interpreter.get("LEVEL").unwrap(), Value::Enum("Low".into()));
        assert_eq!(
            interpreter.get("WAIT").unwrap(),
            Value::Duration(Duration::from_secs(3))
        );
    }

    #[test]
    fn test_pipeline() {
        let schema = schema();
        let remote = MemorySource::read_only()
            .with("LIMIT", RawValue::Int(0))
            .with("CLAMPED", RawValue::Int(99))
            .with("NAME", RawValue::String(String::new()))
            .with("LEVEL", RawValue::Int(7))
            .with("HOME", RawValue::String("not a url".into()))
            .with("WAIT", RawValue::Long(2))
            .with("PINNED", RawValue::Int(1));
        let interpreter = Interpreter::new(&schema, context(remote), functions());

        // validator rejects 0
        assert_eq!(interpreter.get("LIMIT").unwrap(), Value::Int(5));
        assert_eq!(interpreter.get("CLAMPED").unwrap(), Value::Int(10));
        // empty string falls back, adapter still runs
        assert_eq!(interpreter.get("NAME").unwrap(), Value::String("DEMO".into()));
        assert_eq!(interpreter.get("LEVEL").unwrap(), Value::Enum("Low".into()));
        assert_eq!(
            interpreter.get("HOME").unwrap(),
            Value::String("https://default.example".into())
        );
        assert_eq!(
            interpreter.get("WAIT").unwrap(),
            Value::Duration(Duration::from_secs(2))
        );
        assert_eq!(interpreter.get("PINNED").unwrap(), Value::Int(42));
    }

    #[test]
    fn test_set_and_read_back() {
        let schema = schema();
        let interpreter = Interpreter::new(&schema, context(MemorySource::read_only()), functions());
        assert!(interpreter.set("SAVED", &Value::Long(9)).unwrap());
        assert_eq!(interpreter.get("SAVED").unwrap(), Value::Long(9));
        assert!(matches!(
            interpreter.set("SAVED", &Value::Int(9)),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            interpreter.set("LIMIT", &Value::Int(1)),
            Err(Error::Immutable { .. })
        ));
    }

    #[test]
    fn test_missing_function() {
        let schema = schema();
        let interpreter = Interpreter::new(&schema, context(MemorySource::read_only()), FunctionTable::new());
        assert!(matches!(
            interpreter.get("PINNED"),
            Err(Error::UnregisteredFunction { name }) if name == "fixed"
        ));
        assert!(matches!(interpreter.get("NOPE"), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_get_all_keeps_member_order() {
        let schema = schema();
        let interpreter = Interpreter::new(&schema, context(MemorySource::read_only()), functions());
        let all = interpreter.get_all("F").unwrap();
        let keys: Vec<_> = all.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["LIMIT", "CLAMPED", "NAME", "LEVEL", "HOME", "WAIT", "PINNED", "SAVED"]
        );
    }
}

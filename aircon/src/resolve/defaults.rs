//! Default resolution and default-reference cycle detection.

use std::collections::BTreeSet;

use serde_yaml::Value;

use super::{BoundFunctions, Literal, ResolvedDefault, Resolver};
use crate::error::DiagnosticKind;
use crate::model::{
    ConfigElement, ElementVisitor, EnumElement, JsonElement, PrimitiveElement, SpecialElement,
    ValueType,
};
use crate::runtime::{is_valid_text, is_valid_url, Color};

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn mismatch(value_type: ValueType, value: &Value) -> String {
    format!("expected a {value_type} literal, found {}", describe(value))
}

/// Checks a literal against the element it defaults.
struct LiteralParser<'a> {
    value: &'a Value,
}

impl ElementVisitor for LiteralParser<'_> {
    type Arg = ();
    type Output = Result<Literal, String>;

    fn visit_primitive(&mut self, element: &PrimitiveElement, (): ()) -> Self::Output {
        let value = self.value;
        let value_type = element.common.value_type;
        let literal = match value_type {
            ValueType::Boolean => value.as_bool().map(Literal::Bool),
            ValueType::Integer => value
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .map(Literal::Int),
            ValueType::Long => value.as_i64().map(Literal::Long),
            #[allow(clippy::cast_possible_truncation)]
            ValueType::Float => value
                .as_f64()
                .filter(|f| f.is_finite() && f.abs() <= f64::from(f32::MAX))
                .map(|f| Literal::Float(f as f32)),
            ValueType::String => value.as_str().map(|s| Literal::String(s.to_string())),
            ValueType::StringSet => value
                .as_sequence()
                .and_then(|items| {
                    items
                        .iter()
                        .map(|item| item.as_str().map(str::to_string))
                        .collect::<Option<BTreeSet<_>>>()
                })
                .map(Literal::StringSet),
            _ => None,
        }
        .ok_or_else(|| mismatch(value_type, value))?;

        #[allow(clippy::cast_precision_loss)]
        let number = match literal {
            Literal::Int(n) => Some(f64::from(n)),
            Literal::Long(n) => Some(n as f64),
            Literal::Float(f) => Some(f64::from(f)),
            _ => None,
        };
        if let Some(number) = number {
            if !element.range.contains(number) {
                return Err(format!("default {number} lies outside the declared range"));
            }
        }
        if element.non_empty && literal == Literal::String(String::new()) {
            return Err("default is empty but the config requires a non-empty value".into());
        }
        Ok(literal)
    }

    fn visit_enum(&mut self, element: &EnumElement, (): ()) -> Self::Output {
        let name = self
            .value
            .as_str()
            .ok_or_else(|| format!("expected a constant name, found {}", describe(self.value)))?;
        if element.constants.iter().any(|c| c.name == name) {
            Ok(Literal::Enum(name.to_string()))
        } else {
            Err(format!("'{name}' is not a constant of {}", element.type_name))
        }
    }

    fn visit_json(&mut self, _element: &JsonElement, (): ()) -> Self::Output {
        let json = match self.value {
            Value::String(text) => serde_json::from_str(text)
                .map_err(|e| format!("default is not a valid JSON document: {e}"))?,
            other => serde_json::to_value(other)
                .map_err(|e| format!("default cannot be represented as JSON: {e}"))?,
        };
        Ok(Literal::Json(json))
    }

    fn visit_special(&mut self, element: &SpecialElement, (): ()) -> Self::Output {
        let value = self.value;
        let value_type = element.common.value_type;
        match value_type {
            ValueType::Color => {
                let color = match value {
                    Value::String(hex) => Color::from_hex(hex),
                    Value::Number(n) => n
                        .as_u64()
                        .and_then(|argb| u32::try_from(argb).ok())
                        .map(Color::from_argb),
                    _ => None,
                };
                color
                    .map(Literal::Color)
                    .ok_or_else(|| "expected `#RRGGBB`, `#AARRGGBB`, or an ARGB integer".into())
            }
            ValueType::Time => {
                let amount = value.as_i64().ok_or_else(|| mismatch(value_type, value))?;
                element
                    .time_unit
                    .to_duration(amount)
                    .map(|_| Literal::Time(amount))
                    .ok_or_else(|| format!("{amount} is not a valid duration"))
            }
            ValueType::Text => match value.as_str() {
                Some(text) if is_valid_text(text) => Ok(Literal::String(text.to_string())),
                Some(_) => Err("text defaults cannot be blank".into()),
                None => Err(mismatch(value_type, value)),
            },
            ValueType::Url => match value.as_str() {
                Some(url) if is_valid_url(url) => Ok(Literal::String(url.to_string())),
                Some(url) => Err(format!("'{url}' is not a well-formed URL")),
                None => Err(mismatch(value_type, value)),
            },
            _ => Err(mismatch(value_type, value)),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl Resolver<'_> {
    /// Resolves each element's default. Elements whose default is defective get
    /// a [`ResolvedDefault::Zero`] placeholder next to their diagnostic.
    pub(super) fn resolve_defaults(&mut self, bound: &[BoundFunctions]) -> Vec<ResolvedDefault> {
        let graph = self.graph;
        let defaults = graph
            .elements
            .iter()
            .map(|element| {
                self.resolve_default(element, bound)
                    .unwrap_or(ResolvedDefault::Zero)
            })
            .collect();
        self.check_default_cycles();
        defaults
    }

    fn resolve_default(
        &mut self,
        element: &ConfigElement,
        bound: &[BoundFunctions],
    ) -> Option<ResolvedDefault> {
        let graph = self.graph;
        let common = element.common();
        let key = common.key.as_str();
        let spec = &common.default;
        let invalid = |resolver: &mut Self, message: String| -> Option<ResolvedDefault> {
            resolver.report(
                DiagnosticKind::InvalidDefault,
                [key],
                common.ordinal,
                &common.location,
                message,
            );
            None
        };

        let forms = spec.forms();
        if forms.len() > 1 {
            return invalid(
                self,
                format!("only one default form is allowed, found {}", forms.join(" and ")),
            );
        }

        if let Some(value) = &spec.literal {
            return match element.accept(&mut LiteralParser { value }, ()) {
                Ok(literal) => Some(ResolvedDefault::Literal(literal)),
                Err(message) => invalid(self, message),
            };
        }

        if let Some(name) = &spec.resource {
            if !common.value_type.supports_resource() {
                return invalid(
                    self,
                    format!("{} configs cannot take a resource default", common.value_type),
                );
            }
            return Some(ResolvedDefault::Resource(name.clone()));
        }

        if let Some(target) = &spec.config {
            let Some(&index) = self.index.get(target.as_str()) else {
                return invalid(self, format!("default refers to undeclared config '{target}'"));
            };
            let target_element = &graph.elements[index];
            let exposed = bound[index]
                .adapter
                .as_ref()
                .map_or_else(|| target_element.type_ref(), |f| f.returns.clone());
            let own = element.type_ref();
            if !exposed.is_compatible(&own) {
                return invalid(
                    self,
                    format!("default refers to '{target}' of type {exposed}, expected {own}"),
                );
            }
            return Some(ResolvedDefault::Config(target.clone()));
        }

        if let Some(name) = &spec.provider {
            let Some(function) = self.functions.get(name.as_str()).copied() else {
                self.report(
                    DiagnosticKind::UnknownFunction,
                    [key],
                    common.ordinal,
                    &common.location,
                    format!("default provider '{name}' is not declared"),
                );
                return None;
            };
            let own = element.type_ref();
            if !function.params.is_empty() || !function.returns.is_compatible(&own) {
                self.report(
                    DiagnosticKind::BindingSignature,
                    [key],
                    common.ordinal,
                    &common.location,
                    format!("default provider must have shape () -> {own}, found {function}"),
                );
                return None;
            }
            return Some(ResolvedDefault::Provider(function.clone()));
        }

        if common.value_type.has_zero() {
            Some(ResolvedDefault::Zero)
        } else {
            self.report(
                DiagnosticKind::MissingDefault,
                [key],
                common.ordinal,
                &common.location,
                format!("{} configs have no implicit default; declare one", common.value_type),
            );
            None
        }
    }

    /// Three-color walk over config-reference defaults. Each element has at
    /// most one outgoing edge, so every cycle is found exactly once.
    fn check_default_cycles(&mut self) {
        let graph = self.graph;
        let next: Vec<Option<usize>> = graph
            .elements
            .iter()
            .map(|e| {
                e.common()
                    .default
                    .config
                    .as_deref()
                    .and_then(|target| self.index.get(target).copied())
            })
            .collect();

        let mut marks = vec![Mark::Unvisited; next.len()];
        let mut cycles: Vec<Vec<usize>> = Vec::new();
        for start in 0..next.len() {
            let mut path = Vec::new();
            let mut node = Some(start);
            while let Some(current) = node {
                match marks[current] {
                    Mark::Unvisited => {
                        marks[current] = Mark::InProgress;
                        path.push(current);
                        node = next[current];
                    }
                    Mark::InProgress => {
                        if let Some(pos) = path.iter().position(|&p| p == current) {
                            cycles.push(path[pos..].to_vec());
                        }
                        break;
                    }
                    Mark::Done => break,
                }
            }
            for visited in path {
                marks[visited] = Mark::Done;
            }
        }

        for mut cycle in cycles {
            // Elements are in ordinal order: the smallest index is the earliest.
            let earliest = cycle
                .iter()
                .min()
                .and_then(|min| cycle.iter().position(|i| i == min))
                .unwrap_or(0);
            cycle.rotate_left(earliest);
            let first = &graph.elements[cycle[0]];
            let keys: Vec<&str> = cycle.iter().map(|&i| graph.elements[i].key()).collect();
            let message = format!("default references form a cycle: {} -> {}", keys.join(" -> "), keys[0]);
            self.report(
                DiagnosticKind::CyclicDefault,
                keys.iter().copied(),
                first.common().ordinal,
                &first.common().location,
                message,
            );
        }
    }
}

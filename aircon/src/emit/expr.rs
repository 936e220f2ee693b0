//! Rust expressions for the read pipeline, defaults, and writes.
//!
//! Generated units import the runtime as `rt`, so every runtime item here is
//! spelled `rt::...`.

use super::naming;
use crate::model::{
    ElementVisitor, EnumElement, JsonElement, NumericRange, PrimitiveElement, RangeFallback,
    SpecialElement, ValueType,
};
use crate::resolve::Literal;

/// Alias the runtime is imported under in generated code.
pub(crate) const RT: &str = "rt";

fn float_literal(value: f32) -> String {
    format!("{value:?}_f32")
}

#[allow(clippy::cast_possible_truncation)]
fn bound_literal(bound: f64, value_type: ValueType) -> String {
    match value_type {
        ValueType::Float => float_literal(bound as f32),
        ValueType::Long => format!("{}_i64", bound as i64),
        _ => format!("{}", bound as i64),
    }
}

/// Range rule as pipeline links.
fn range_links(range: &NumericRange, value_type: ValueType) -> Vec<String> {
    let lo = range.min.map(|b| bound_literal(b, value_type));
    let hi = range.max.map(|b| bound_literal(b, value_type));
    match range.fallback {
        RangeFallback::Default => {
            let checks: Vec<String> = lo
                .map(|lo| format!("*v >= {lo}"))
                .into_iter()
                .chain(hi.map(|hi| format!("*v <= {hi}")))
                .collect();
            if checks.is_empty() {
                Vec::new()
            } else {
                vec![format!(".filter(|v| {})", checks.join(" && "))]
            }
        }
        RangeFallback::Clamp => match (lo, hi) {
            (Some(lo), Some(hi)) => vec![format!(".map(|v| v.clamp({lo}, {hi}))")],
            (Some(lo), None) => vec![format!(".map(|v| v.max({lo}))")],
            (None, Some(hi)) => vec![format!(".map(|v| v.min({hi}))")],
            (None, None) => Vec::new(),
        },
    }
}

fn raw_method(value_type: ValueType) -> &'static str {
    match value_type {
        ValueType::Boolean => "into_bool",
        ValueType::Integer => "into_int",
        ValueType::Long | ValueType::Time => "into_long",
        ValueType::Float => "into_float",
        ValueType::StringSet => "into_string_set",
        _ => "into_string",
    }
}

fn raw_variant(value_type: ValueType) -> &'static str {
    match value_type {
        ValueType::Boolean => "Bool",
        ValueType::Integer => "Int",
        ValueType::Long | ValueType::Time => "Long",
        ValueType::Float => "Float",
        ValueType::StringSet => "StringSet",
        _ => "String",
    }
}

/// Links applied after `read`: decoding and the inherited type rules.
pub(crate) struct DecodeLinks;

impl ElementVisitor for DecodeLinks {
    type Arg = ();
    type Output = Vec<String>;

    fn visit_primitive(&mut self, element: &PrimitiveElement, (): ()) -> Vec<String> {
        let value_type = element.common.value_type;
        let mut links = vec![format!(
            ".and_then({RT}::RawValue::{})",
            raw_method(value_type)
        )];
        links.extend(range_links(&element.range, value_type));
        if element.non_empty {
            links.push(".filter(|v| !v.is_empty())".to_string());
        }
        links
    }

    fn visit_enum(&mut self, element: &EnumElement, (): ()) -> Vec<String> {
        vec![format!(".and_then({}::from_raw)", element.type_name)]
    }

    fn visit_json(&mut self, element: &JsonElement, (): ()) -> Vec<String> {
        vec![
            format!(".and_then({RT}::RawValue::into_string)"),
            format!(
                ".and_then(|text| {RT}::from_json::<{}>(&text))",
                element.target_type
            ),
        ]
    }

    fn visit_special(&mut self, element: &SpecialElement, (): ()) -> Vec<String> {
        match element.common.value_type {
            ValueType::Color => vec![format!(".and_then({RT}::Color::from_raw)")],
            ValueType::Time => vec![
                format!(".and_then({RT}::RawValue::into_long)"),
                format!(
                    ".and_then(|amount| {RT}::TimeUnit::{}.to_duration(amount))",
                    element.time_unit.variant()
                ),
            ],
            ValueType::Url => vec![
                format!(".and_then({RT}::RawValue::into_string)"),
                format!(".filter(|v| {RT}::is_valid_url(v))"),
            ],
            _ => vec![
                format!(".and_then({RT}::RawValue::into_string)"),
                format!(".filter(|v| {RT}::is_valid_text(v))"),
            ],
        }
    }
}

/// The raw value a setter writes for `value`.
pub(crate) struct EncodeValue;

impl ElementVisitor for EncodeValue {
    type Arg = ();
    type Output = String;

    fn visit_primitive(&mut self, element: &PrimitiveElement, (): ()) -> String {
        format!(
            "{RT}::RawValue::{}(value)",
            raw_variant(element.common.value_type)
        )
    }

    fn visit_enum(&mut self, _element: &EnumElement, (): ()) -> String {
        "value.raw()".to_string()
    }

    fn visit_json(&mut self, _element: &JsonElement, (): ()) -> String {
        format!(
            "match {RT}::to_json(&value) {{ Some(text) => {RT}::RawValue::String(text), None => return false }}"
        )
    }

    fn visit_special(&mut self, element: &SpecialElement, (): ()) -> String {
        match element.common.value_type {
            ValueType::Color => format!("{RT}::RawValue::String(value.to_hex())"),
            ValueType::Time => format!(
                "{RT}::RawValue::Long({RT}::TimeUnit::{}.from_duration(value))",
                element.time_unit.variant()
            ),
            _ => format!("{RT}::RawValue::String(value)"),
        }
    }
}

/// A literal that needs no element context to render.
pub(crate) fn plain_literal(literal: &Literal) -> String {
    match literal {
        Literal::Bool(b) => b.to_string(),
        Literal::Int(n) => n.to_string(),
        Literal::Long(n) => format!("{n}_i64"),
        Literal::Float(f) => float_literal(*f),
        Literal::String(s) | Literal::Enum(s) => format!("{s:?}.to_string()"),
        Literal::StringSet(items) if items.is_empty() => {
            "std::collections::BTreeSet::new()".to_string()
        }
        Literal::StringSet(items) => {
            let items: Vec<String> = items.iter().map(|s| format!("{s:?}")).collect();
            format!(
                "[{}].into_iter().map(String::from).collect()",
                items.join(", ")
            )
        }
        Literal::Json(value) => format!("{:?}", value.to_string()),
        Literal::Color(color) => format!("{RT}::Color::from_argb({:#010X})", color.argb()),
        Literal::Time(amount) => format!("std::time::Duration::from_millis({amount})"),
    }
}

/// Renders a literal default for an element.
pub(crate) struct LiteralExpr<'a> {
    pub(crate) literal: &'a Literal,
}

impl ElementVisitor for LiteralExpr<'_> {
    type Arg = ();
    type Output = String;

    fn visit_primitive(&mut self, _element: &PrimitiveElement, (): ()) -> String {
        plain_literal(self.literal)
    }

    fn visit_enum(&mut self, element: &EnumElement, (): ()) -> String {
        match self.literal {
            Literal::Enum(name) => format!("{}::{}", element.type_name, naming::variant_name(name)),
            other => plain_literal(other),
        }
    }

    fn visit_json(&mut self, element: &JsonElement, (): ()) -> String {
        match self.literal {
            Literal::Json(value) => format!(
                "{RT}::json_default::<{}>({:?})",
                element.target_type,
                value.to_string()
            ),
            other => plain_literal(other),
        }
    }

    fn visit_special(&mut self, element: &SpecialElement, (): ()) -> String {
        match self.literal {
            Literal::Time(amount) => {
                let millis = element
                    .time_unit
                    .to_duration(*amount)
                    .map_or(0, |d| d.as_millis());
                format!("std::time::Duration::from_millis({millis})")
            }
            other => plain_literal(other),
        }
    }
}

/// The implicit zero for types that have one.
pub(crate) fn zero_expr(value_type: ValueType) -> String {
    match value_type {
        ValueType::Boolean => "false".to_string(),
        ValueType::Integer => "0".to_string(),
        ValueType::Long => "0_i64".to_string(),
        ValueType::Float => "0.0_f32".to_string(),
        ValueType::String | ValueType::Text => "String::new()".to_string(),
        ValueType::StringSet => "std::collections::BTreeSet::new()".to_string(),
        ValueType::Time => "std::time::Duration::ZERO".to_string(),
        _ => "Default::default()".to_string(),
    }
}

/// Method on `rt::Resources` that supplies a value of `value_type`.
pub(crate) fn resource_method(value_type: ValueType) -> &'static str {
    match value_type {
        ValueType::Boolean => "boolean",
        ValueType::Integer => "integer",
        ValueType::Long => "long",
        ValueType::Float => "float",
        ValueType::StringSet => "string_set",
        ValueType::Color => "color",
        _ => "string",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Color;

    #[test]
    fn test_range_links() {
        let range = NumericRange {
            min: Some(0.0),
            max: Some(10.0),
            fallback: RangeFallback::Default,
        };
        assert_eq!(
            range_links(&range, ValueType::Integer),
            vec![".filter(|v| *v >= 0 && *v <= 10)"]
        );
        let clamp = NumericRange {
            fallback: RangeFallback::Clamp,
            ..range
        };
        assert_eq!(
            range_links(&clamp, ValueType::Float),
            vec![".map(|v| v.clamp(0.0_f32, 10.0_f32))"]
        );
        let floor = NumericRange {
            min: Some(-5.0),
            max: None,
            fallback: RangeFallback::Default,
        };
        assert_eq!(
            range_links(&floor, ValueType::Long),
            vec![".filter(|v| *v >= -5_i64)"]
        );
        assert!(range_links(&NumericRange::default(), ValueType::Integer).is_empty());
    }

    #[test]
    fn test_plain_literals() {
        assert_eq!(plain_literal(&Literal::Float(1.5)), "1.5_f32");
        assert_eq!(
            plain_literal(&Literal::String("say \"hi\"".into())),
            r#""say \"hi\"".to_string()"#
        );
        assert_eq!(
            plain_literal(&Literal::Color(Color::from_argb(0xFF00_FF00))),
            "rt::Color::from_argb(0xFF00FF00)"
        );
        assert_eq!(
            plain_literal(&Literal::StringSet(
                ["b", "a"].into_iter().map(String::from).collect()
            )),
            r#"["a", "b"].into_iter().map(String::from).collect()"#
        );
    }

    #[test]
    fn test_zero_expressions() {
        assert_eq!(zero_expr(ValueType::Boolean), "false");
        assert_eq!(zero_expr(ValueType::Time), "std::time::Duration::ZERO");
    }
}

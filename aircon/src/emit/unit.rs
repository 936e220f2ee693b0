//! Renders one provider unit.

use super::expr::{
    resource_method, zero_expr, DecodeLinks, EncodeValue, LiteralExpr, RT,
};
use super::naming;
use super::writer::CodeWriter;
use super::EmitOptions;
use crate::model::{ConfigElement, EnumElement, EnumRaw, ValueType};
use crate::resolve::{ResolvedConfig, ResolvedDefault, ResolvedGroup, ResolvedSchema};

/// First line of every generated file.
pub const GENERATED_MARKER: &str = "// @generated by aircon. Do not edit.";

pub(crate) fn write_header(w: &mut CodeWriter, options: &EmitOptions) {
    w.line(GENERATED_MARKER);
    if let Some(header) = &options.header {
        for line in header.lines() {
            w.line(format!("// {line}").trim_end());
        }
    }
}

pub(crate) struct UnitRenderer<'a> {
    pub(crate) schema: &'a ResolvedSchema,
    pub(crate) group: &'a ResolvedGroup,
    pub(crate) options: &'a EmitOptions,
}

impl UnitRenderer<'_> {
    pub(crate) fn render(&self) -> String {
        let mut w = CodeWriter::new();
        write_header(&mut w, self.options);
        w.line("#![allow(dead_code, clippy::all)]");
        w.blank();
        w.line("use std::sync::Arc;");
        w.blank();
        w.line(format!("use {} as {RT};", self.options.runtime_path));

        for config in self.schema.members(self.group) {
            if let ConfigElement::Enum(element) = &config.element {
                w.blank();
                Self::render_enum(&mut w, element);
            }
        }

        w.blank();
        self.render_provider(&mut w);
        w.blank();
        self.render_values(&mut w);
        w.finish()
    }

    fn render_enum(w: &mut CodeWriter, element: &EnumElement) {
        let value_type = element.common.value_type;
        let variants: Vec<(String, Option<EnumRaw>)> = element
            .constants
            .iter()
            .map(|c| (naming::variant_name(&c.name), c.typed_raw(value_type)))
            .collect();

        w.doc(&format!("Values of `{}`.", element.common.key));
        w.line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]");
        w.open(format!("pub enum {}", element.type_name));
        for (variant, _) in &variants {
            w.line(format!("{variant},"));
        }
        w.close("");
        w.blank();

        w.open(format!("impl {}", element.type_name));
        w.doc("Decodes a raw source value, `None` for undeclared values.");
        w.open(format!(
            "pub fn from_raw(raw: {RT}::RawValue) -> Option<Self>"
        ));
        if value_type == ValueType::IntEnum {
            w.open("match raw.into_int()?");
        } else {
            w.open("match raw.into_string()?.as_str()");
        }
        for (variant, raw) in &variants {
            match raw {
                Some(EnumRaw::Int(n)) => w.line(format!("{n} => Some(Self::{variant}),")),
                Some(EnumRaw::String(s)) => w.line(format!("{s:?} => Some(Self::{variant}),")),
                None => {}
            }
        }
        w.line("_ => None,");
        w.close("");
        w.close("");
        w.blank();

        w.doc("The raw value stored at the source.");
        w.open(format!("pub fn raw(self) -> {RT}::RawValue"));
        w.open("match self");
        for (variant, raw) in &variants {
            match raw {
                Some(EnumRaw::Int(n)) => {
                    w.line(format!("Self::{variant} => {RT}::RawValue::Int({n}),"));
                }
                Some(EnumRaw::String(s)) => {
                    w.line(format!(
                        "Self::{variant} => {RT}::RawValue::String({s:?}.to_string()),"
                    ));
                }
                None => {}
            }
        }
        w.close("");
        w.close("");
        w.close("");
    }

    fn provider_type(&self) -> String {
        naming::provider_type(&self.group.key)
    }

    fn render_provider(&self, w: &mut CodeWriter) {
        let provider = self.provider_type();
        w.doc(&format!("Accessors for the `{}` group.", self.group.key));
        w.line("#[derive(Debug, Clone)]");
        w.open(format!("pub struct {provider}"));
        w.line(format!("ctx: Arc<{RT}::ProviderContext>,"));
        w.close("");
        w.blank();

        w.open(format!("impl {provider}"));
        w.doc("Creates a provider reading through `ctx`.");
        w.open(format!("pub fn new(ctx: Arc<{RT}::ProviderContext>) -> Self"));
        w.line("Self { ctx }");
        w.close("");

        for config in self.schema.members(self.group) {
            w.blank();
            self.render_getter(w, config);
            if config.element.common().mutable {
                w.blank();
                Self::render_setter(w, config);
            }
        }

        w.blank();
        let values = naming::values_type(&self.group.key);
        w.doc("Reads every config of the group. Values are read fresh on each call.");
        w.open(format!("pub fn get_all(&self) -> {values}"));
        w.open(&values);
        for config in self.schema.members(self.group) {
            w.line(format!(
                "{}: self.{}(),",
                naming::field_name(config.key()),
                naming::accessor("get", config.key())
            ));
        }
        w.close("");
        w.close("");
        w.close("");
    }

    fn render_getter(&self, w: &mut CodeWriter, config: &ResolvedConfig) {
        let common = config.element.common();
        let exposed = config.exposed_type().rust_type(RT);
        let adapter = config.functions.adapter.as_ref().map(|f| f.name.as_str());

        match &common.description {
            Some(description) => w.doc(description),
            None => w.doc(&format!("`{}`.", common.key)),
        }
        w.open(format!(
            "pub fn {}(&self) -> {exposed}",
            naming::accessor("get", &common.key)
        ));

        if let Some(mock) = &config.functions.mock {
            match adapter {
                Some(adapter) => w.line(format!("{adapter}({}())", mock.name)),
                None => w.line(format!("{}()", mock.name)),
            }
            w.close("");
            return;
        }

        if adapter.is_some() {
            w.line("let value = self");
        } else {
            w.line("self");
        }
        w.indent();
        w.line(".ctx");
        w.line(format!(".read({:?}, {:?})", common.source, common.key));
        for link in config.element.accept(&mut DecodeLinks, ()) {
            w.line(link);
        }
        if let Some(validator) = &config.functions.validator {
            w.line(format!(".filter(|v| {}(v))", validator.name));
        }
        let default = self.default_expr(config);
        w.line(format!(
            ".unwrap_or_else(|| {default}){}",
            if adapter.is_some() { ";" } else { "" }
        ));
        w.dedent();
        if let Some(adapter) = adapter {
            w.line(format!("{adapter}(value)"));
        }
        w.close("");
    }

    fn render_setter(w: &mut CodeWriter, config: &ResolvedConfig) {
        let common = config.element.common();
        let value_type = config.element.type_ref().rust_type(RT);
        w.doc(&format!(
            "Writes `{}` to source `{}`. Returns whether the write succeeded.",
            common.key, common.source
        ));
        w.open(format!(
            "pub fn {}(&self, value: {value_type}) -> bool",
            naming::accessor("set", &common.key)
        ));
        w.line(format!(
            "let raw = {};",
            config.element.accept(&mut EncodeValue, ())
        ));
        w.line(format!(
            "self.ctx.write({:?}, {:?}, raw)",
            common.source, common.key
        ));
        w.close("");
    }

    fn default_expr(&self, config: &ResolvedConfig) -> String {
        let value_type = config.element.value_type();
        match &config.default {
            ResolvedDefault::Zero => zero_expr(value_type),
            ResolvedDefault::Literal(literal) => {
                config.element.accept(&mut LiteralExpr { literal }, ())
            }
            ResolvedDefault::Resource(name) => format!(
                "self.ctx.resources().{}({name:?})",
                resource_method(value_type)
            ),
            ResolvedDefault::Config(target) => {
                let getter = naming::accessor("get", target);
                match self.schema.config(target) {
                    Some(other) if other.group != self.group.key => format!(
                        "super::{}::{}::new(Arc::clone(&self.ctx)).{getter}()",
                        naming::escape(&naming::module_name(&other.group)),
                        naming::provider_type(&other.group)
                    ),
                    _ => format!("self.{getter}()"),
                }
            }
            ResolvedDefault::Provider(function) => format!("{}()", function.name),
        }
    }

    fn render_values(&self, w: &mut CodeWriter) {
        w.doc(&format!(
            "A snapshot of every config in the `{}` group.",
            self.group.key
        ));
        w.line("#[derive(Debug, Clone)]");
        w.open(format!("pub struct {}", naming::values_type(&self.group.key)));
        for config in self.schema.members(self.group) {
            w.doc(&format!("`{}`.", config.key()));
            w.line(format!(
                "pub {}: {},",
                naming::field_name(config.key()),
                config.exposed_type().rust_type(RT)
            ));
        }
        w.close("");
    }
}

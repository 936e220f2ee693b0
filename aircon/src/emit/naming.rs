//! Identifier rules for generated code.

use heck::{ToSnakeCase, ToUpperCamelCase};

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords with no raw identifier form.
const UNESCAPABLE: &[&str] = &["self", "super", "crate", "Self"];

/// Names that cannot be used as a module, even as raw identifiers.
const RESERVED_MODULES: &[&str] = &["mod", "self", "super", "crate"];

/// Names a provider unit refers to unqualified.
const UNIT_NAMES: &[&str] = &[
    "Arc", "Option", "Some", "None", "String", "bool", "i32", "i64", "f32", "rt",
];

/// Whether `key` matches `[A-Za-z][A-Za-z0-9_]*`.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whether `name` can name a variant without escaping.
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    is_valid_key(name) && !KEYWORDS.contains(&name) && !UNESCAPABLE.contains(&name)
}

/// Whether `name` can name a generated enum type.
#[must_use]
pub fn is_valid_type_name(name: &str) -> bool {
    is_valid_identifier(name) && !UNIT_NAMES.contains(&name)
}

/// Prefixes `r#` when `ident` is a keyword.
#[must_use]
pub fn escape(ident: &str) -> String {
    if KEYWORDS.contains(&ident) {
        format!("r#{ident}")
    } else {
        ident.to_string()
    }
}

/// Module (and file stem) of the unit generated for a group.
#[must_use]
pub fn module_name(group_key: &str) -> String {
    group_key.to_snake_case()
}

/// Whether a module name cannot be generated.
#[must_use]
pub fn is_reserved_module(module: &str) -> bool {
    RESERVED_MODULES.contains(&module)
}

/// Stem shared by a config's accessors and its values field.
#[must_use]
pub fn member_name(key: &str) -> String {
    key.to_snake_case()
}

/// Whether a member stem would clash with generated code: `self` as a
/// field, or `all` as the `get_all` aggregate.
#[must_use]
pub fn is_reserved_member(member: &str) -> bool {
    UNESCAPABLE.contains(&member) || member == "all"
}

/// `get_enabled`, `set_enabled`.
#[must_use]
pub fn accessor(prefix: &str, key: &str) -> String {
    format!("{prefix}_{}", member_name(key))
}

/// Field of a group's values struct.
#[must_use]
pub fn field_name(key: &str) -> String {
    escape(&member_name(key))
}

/// `MyGroupProvider`.
#[must_use]
pub fn provider_type(group_key: &str) -> String {
    format!("{}Provider", group_key.to_upper_camel_case())
}

/// `MyGroupValues`.
#[must_use]
pub fn values_type(group_key: &str) -> String {
    format!("{}Values", group_key.to_upper_camel_case())
}

/// Enum variant for a declared constant name.
#[must_use]
pub fn variant_name(constant: &str) -> String {
    constant.to_upper_camel_case()
}

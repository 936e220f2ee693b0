//! The typed element model and the builder that produces it.

pub mod builder;
pub mod element;
pub mod graph;
pub mod types;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use builder::ModelBuilder;
pub use element::{
    ConfigElement, DefaultSpec, ElementCommon, ElementVisitor, EnumConstant, EnumElement,
    EnumRaw, JsonElement, PrimitiveElement, SpecialElement,
};
pub use graph::{Binding, BindingKind, ConfigGroup, ElementGraph, Function, GroupKind, Source};
pub use types::{NumericRange, RangeFallback, TypeRef, ValueType, CANONICAL_RUNTIME};

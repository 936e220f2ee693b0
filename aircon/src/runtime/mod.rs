//! Runtime support for generated providers.
//!
//! Generated provider units import this module (as `rt`) and call into it for
//! raw-value retrieval, decoding, and the inherited validation rules of the
//! special value types. The reference [`Interpreter`](crate::Interpreter)
//! uses the same helpers, so both evaluate a config identically.
//!
//! # Examples
//!
//! ```
//! use aircon::runtime::{MemorySource, ProviderContext, RawValue};
//!
//! let ctx = ProviderContext::default()
//!     .with_source("remote", MemorySource::read_only().with("ENABLED", RawValue::Bool(true)));
//!
//! assert_eq!(ctx.read("remote", "ENABLED"), Some(RawValue::Bool(true)));
//! assert_eq!(ctx.read("remote", "MISSING"), None);
//! assert!(!ctx.write("remote", "ENABLED", RawValue::Bool(false)));
//! ```

mod source;
mod validate;
mod value;

pub use source::{ConfigSource, MemoryResources, MemorySource, ProviderContext, Resources};
pub use validate::{from_json, is_valid_text, is_valid_url, json_default, to_json};
pub use value::{Color, RawValue, TimeUnit};

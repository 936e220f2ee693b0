#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # aircon
//!
//! A compiler for remotely controlled configuration.
//!
//! Applications declare their remote configs (key, value type, source,
//! default, validator, adapter, mock, grouping) in YAML. The compiler checks
//! the declarations and generates typed Rust provider modules with one
//! accessor per config, backed by the pluggable sources in [`runtime`].
//!
//! ## Pipeline
//!
//! - [`model::ModelBuilder`]: declarations to an [`model::ElementGraph`];
//!   stops at the first malformed declaration
//! - [`resolve::Resolver`]: links defaults, bindings, enums, groups and
//!   sources, reporting every defect as a [`Diagnostic`]
//! - [`emit::Emitter`]: renders one provider unit per group
//! - [`Interpreter`]: evaluates a resolved schema directly, the way the
//!   generated code would
//!
//! ## Examples
//!
//! ```
//! use aircon::declaration::Declarations;
//! use aircon::runtime::{MemorySource, ProviderContext, RawValue};
//! use aircon::{Compiler, FunctionTable, Interpreter, Value};
//! use std::sync::Arc;
//!
//! let decls = Declarations::from_yaml_str(
//!     r#"
//! sources: [{ id: remote }]
//! features:
//!   - name: Onboarding
//!     source: remote
//!     configs:
//!       - { key: ENABLED, type: boolean, default: { value: false } }
//!       - { key: ANOTHER_FLAG, type: boolean, default: { config: ENABLED } }
//! "#,
//! )
//! .unwrap();
//!
//! let compiler = Compiler::default();
//! let output = compiler.compile(&decls).unwrap();
//! assert!(output.unit("onboarding.rs").is_some());
//!
//! let schema = compiler.check(&decls).unwrap();
//! let ctx = ProviderContext::default().with_source(
//!     "remote",
//!     MemorySource::read_only().with("ENABLED", RawValue::Bool(true)),
//! );
//! let interpreter = Interpreter::new(&schema, Arc::new(ctx), FunctionTable::new());
//! assert_eq!(interpreter.get("ANOTHER_FLAG").unwrap(), Value::Bool(true));
//! ```

pub mod compiler;
pub mod declaration;
pub mod emit;
pub mod error;
pub mod interpreter;
pub mod logging;
pub mod model;
pub mod resolve;
pub mod runtime;
pub mod settings;

// Re-export key types at crate root for convenience
pub use compiler::Compiler;
pub use emit::{EmitOptions, GeneratedOutput, GeneratedUnit};
pub use error::{Diagnostic, DiagnosticKind, Diagnostics, Error, Result};
pub use interpreter::{FunctionTable, Interpreter, Value};
pub use logging::{init_logger, LogLevel, Logger};
pub use resolve::ResolvedSchema;
pub use settings::{Settings, SettingsBuilder};

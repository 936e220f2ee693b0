//! Code emission: renders a resolved schema as Rust provider modules.
//!
//! Emission is a pure function of the schema and the options. Nothing that
//! varies between runs (timestamps, hash-map order) reaches the output, so the
//! same input always yields byte-identical files.

mod expr;
pub mod naming;
mod unit;
mod writer;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::model::CANONICAL_RUNTIME;
use crate::resolve::ResolvedSchema;
use unit::{write_header, UnitRenderer};
use writer::CodeWriter;

pub use unit::GENERATED_MARKER;

/// Options that shape the generated source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Path generated code imports the runtime from.
    pub runtime_path: String,
    /// Extra comment lines placed after the `@generated` marker.
    pub header: Option<String>,
    /// Whether to emit a `mod.rs` declaring every unit.
    pub emit_mod_file: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            runtime_path: CANONICAL_RUNTIME.to_string(),
            header: None,
            emit_mod_file: true,
        }
    }
}

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedUnit {
    /// Module name, `None` for `mod.rs`.
    pub module: Option<String>,
    /// File name relative to the output directory.
    pub file_name: String,
    /// File contents.
    pub contents: String,
}

/// Every file a compilation produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratedOutput {
    /// Units in emission order: group units, then `mod.rs`.
    pub units: Vec<GeneratedUnit>,
}

impl GeneratedOutput {
    /// Looks up a unit by file name.
    #[must_use]
    pub fn unit(&self, file_name: &str) -> Option<&GeneratedUnit> {
        self.units.iter().find(|u| u.file_name == file_name)
    }

    /// Writes every unit into `dir`, creating it if needed. Files whose
    /// contents are already up to date are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory or a file cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(self.units.len());
        for unit in &self.units {
            let path = dir.join(&unit.file_name);
            let unchanged = fs::read_to_string(&path).is_ok_and(|existing| existing == unit.contents);
            if unchanged {
                log::debug!("{} is up to date", path.display());
            } else {
                fs::write(&path, &unit.contents)?;
                log::debug!("wrote {}", path.display());
            }
            written.push(path);
        }
        Ok(written)
    }
}

/// Renders provider units.
///
/// # Examples
///
/// ```
/// use aircon::declaration::Declarations;
/// use aircon::emit::{EmitOptions, Emitter};
/// use aircon::model::ModelBuilder;
/// use aircon::resolve::Resolver;
///
/// let decls = Declarations::from_yaml_str(
///     r#"
/// sources: [{ id: remote }]
/// features:
///   - name: Onboarding
///     source: remote
///     configs: [{ key: ENABLED, type: boolean }]
/// "#,
/// )
/// .unwrap();
/// let graph = ModelBuilder::build(&decls).unwrap();
/// let schema = Resolver::resolve(&graph).unwrap();
///
/// let output = Emitter::new(EmitOptions::default()).emit(&schema);
/// let unit = output.unit("onboarding.rs").unwrap();
/// assert!(unit.contents.contains("pub fn get_enabled(&self) -> bool"));
/// assert!(output.unit("mod.rs").unwrap().contents.contains("pub mod onboarding;"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Emitter {
    options: EmitOptions,
}

impl Emitter {
    /// Creates an emitter.
    #[must_use]
    pub fn new(options: EmitOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    #[must_use]
    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    /// Emits one unit per non-empty group, plus `mod.rs` when enabled.
    #[must_use]
    pub fn emit(&self, schema: &ResolvedSchema) -> GeneratedOutput {
        let mut units = Vec::new();
        for group in schema.groups.iter().filter(|g| !g.members.is_empty()) {
            let module = naming::module_name(&group.key);
            let renderer = UnitRenderer {
                schema,
                group,
                options: &self.options,
            };
            units.push(GeneratedUnit {
                file_name: format!("{module}.rs"),
                module: Some(module),
                contents: renderer.render(),
            });
        }

        if self.options.emit_mod_file {
            let mut w = CodeWriter::new();
            write_header(&mut w, &self.options);
            w.blank();
            for unit in &units {
                if let Some(module) = &unit.module {
                    w.line(format!("pub mod {};", naming::escape(module)));
                }
            }
            units.push(GeneratedUnit {
                module: None,
                file_name: "mod.rs".to_string(),
                contents: w.finish(),
            });
        }

        log::debug!("emitted {} unit(s)", units.len());
        GeneratedOutput { units }
    }
}

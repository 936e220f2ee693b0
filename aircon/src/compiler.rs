//! The end-to-end compile pipeline.

use std::path::{Path, PathBuf};

use crate::declaration::Declarations;
use crate::emit::{EmitOptions, Emitter, GeneratedOutput};
use crate::error::Result;
use crate::model::ModelBuilder;
use crate::resolve::{ResolvedSchema, Resolver};
use crate::settings::Settings;

/// Runs declarations through model building, resolution and emission.
///
/// # Examples
///
/// ```
/// use aircon::declaration::Declarations;
/// use aircon::{Compiler, DiagnosticKind};
///
/// let decls = Declarations::from_yaml_str(
///     r#"
/// sources: [{ id: remote }]
/// features:
///   - name: Onboarding
///     source: remote
///     configs:
///       - { key: A, type: boolean, default: { config: B } }
///       - { key: B, type: boolean, default: { config: A } }
/// "#,
/// )
/// .unwrap();
///
/// let err = Compiler::default().compile(&decls).unwrap_err();
/// assert!(err.has_kind(DiagnosticKind::CyclicDefault));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    emitter: Emitter,
}

impl Compiler {
    /// A compiler emitting with `options`.
    #[must_use]
    pub fn new(options: EmitOptions) -> Self {
        Self {
            emitter: Emitter::new(options),
        }
    }

    /// A compiler configured from settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.emit_options())
    }

    /// Emitter options in effect.
    #[must_use]
    pub fn options(&self) -> &EmitOptions {
        self.emitter.options()
    }

    /// Builds and resolves without emitting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Compile`](crate::Error::Compile) carrying the
    /// declaration error, or every resolution diagnostic.
    pub fn check(&self, decls: &Declarations) -> Result<ResolvedSchema> {
        let graph = ModelBuilder::build(decls)?;
        let schema = Resolver::resolve(&graph)?;
        log::debug!("resolved {} group(s)", schema.groups.len());
        Ok(schema)
    }

    /// Compiles declarations into provider units.
    ///
    /// # Errors
    ///
    /// Same as [`Compiler::check`]; emission itself cannot fail.
    pub fn compile(&self, decls: &Declarations) -> Result<GeneratedOutput> {
        let schema = self.check(decls)?;
        let output = self.emitter.emit(&schema);
        log::info!("generated {} file(s)", output.units.len());
        Ok(output)
    }

    /// Loads schema files, compiles them and writes the result into `out_dir`.
    ///
    /// Returns the path of every generated file.
    ///
    /// # Errors
    ///
    /// Returns load, compile, or I/O errors. Nothing is written unless
    /// compilation succeeds.
    pub fn compile_files<P: AsRef<Path>>(&self, schemas: &[P], out_dir: &Path) -> Result<Vec<PathBuf>> {
        let decls = Declarations::load_all(schemas)?;
        let output = self.compile(&decls)?;
        output.write_to(out_dir)
    }
}

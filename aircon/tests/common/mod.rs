//! Common test utilities for integration tests.

use std::path::PathBuf;
use std::sync::Arc;

use aircon::declaration::Declarations;
use aircon::runtime::{MemoryResources, MemorySource, ProviderContext};
use aircon::{Compiler, ResolvedSchema};

/// Path to a file under `tests/fixtures`.
#[allow(dead_code)]
pub fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

/// Loads a fixture's declarations.
#[allow(dead_code)]
pub fn load_fixture(name: &str) -> Declarations {
    Declarations::load(&fixture_path(name)).unwrap()
}

/// Parses and resolves inline YAML, panicking on any error.
#[allow(dead_code)]
pub fn resolve(yaml: &str) -> ResolvedSchema {
    let decls = Declarations::from_yaml_str(yaml).unwrap();
    Compiler::default().check(&decls).unwrap()
}

/// Sources shared between a test and the context it hands out.
#[allow(dead_code)]
pub struct TestSources {
    pub ctx: Arc<ProviderContext>,
    pub sources: Vec<(String, Arc<MemorySource>)>,
}

impl TestSources {
    /// A context with one in-memory source per `(id, writable)`.
    #[allow(dead_code)]
    pub fn new(ids: &[(&str, bool)], resources: MemoryResources) -> Self {
        let mut ctx = ProviderContext::new(resources);
        let mut sources = Vec::new();
        for &(id, writable) in ids {
            let source = Arc::new(if writable {
                MemorySource::writable()
            } else {
                MemorySource::read_only()
            });
            ctx.register(id, Arc::clone(&source) as Arc<dyn aircon::runtime::ConfigSource>);
            sources.push((id.to_string(), source));
        }
        Self {
            ctx: Arc::new(ctx),
            sources,
        }
    }

    /// The source registered under `id`.
    #[allow(dead_code)]
    pub fn source(&self, id: &str) -> &MemorySource {
        self.sources
            .iter()
            .find(|(name, _)| name == id)
            .map(|(_, source)| source.as_ref())
            .unwrap()
    }
}

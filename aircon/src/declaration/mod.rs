//! Declaration input: parsing and combining schema documents.

pub mod schema;

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

pub use schema::{
    BindingDecl, ConfigDecl, Declarations, DefaultDecl, EnumConstantDecl, EnumDecl, FeatureDecl,
    FunctionDecl, GroupDecl, SourceDecl,
};

impl Declarations {
    /// Parses a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Yaml`] if the document is not valid YAML or does not
    /// match the declaration structure.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Loads and parses one schema file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or [`Error::Parse`]
    /// if its contents are invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        serde_yaml::from_str(&contents).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads several schema files and concatenates them in order.
    ///
    /// # Errors
    ///
    /// Returns the first load error.
    pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut combined = Self::default();
        for path in paths {
            log::debug!("loading schema {}", path.as_ref().display());
            combined.extend(Self::load(path.as_ref())?);
        }
        Ok(combined)
    }

    /// Appends every section of `other` after this document's.
    pub fn extend(&mut self, other: Self) {
        self.sources.extend(other.sources);
        self.functions.extend(other.functions);
        self.features.extend(other.features);
        self.validators.extend(other.validators);
        self.adapters.extend(other.adapters);
        self.mocks.extend(other.mocks);
    }
}

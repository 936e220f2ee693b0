//! Compiler settings.
//!
//! Settings are merged from several layers, highest precedence first:
//!
//! 1. Programmatic overrides (via `SettingsBuilder::with_settings`)
//! 2. Environment variables (`AIRCON_*`)
//! 3. Project settings (`aircon.yaml`, nearest ancestor of the working
//!    directory) or an explicit settings file
//! 4. User settings (`~/.aircon/settings.yaml`)
//! 5. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use aircon::settings::SettingsBuilder;
//! use std::path::Path;
//!
//! let settings = SettingsBuilder::new()
//!     .with_working_dir(Path::new("/path/to/project"))
//!     .build()
//!     .unwrap();
//! println!("writing to {}", settings.output_dir().display());
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use builder::SettingsBuilder;
pub use environment::SettingsEnvironment;
pub use loader::{SettingsFile, SettingsLoader, PROJECT_FILE, USER_FILE};
pub use merger::SettingsMerger;
pub use schema::{Settings, DEFAULT_OUTPUT_DIR};
pub use validator::SettingsValidator;

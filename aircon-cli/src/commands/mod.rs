//! CLI command implementations.
//!
//! - `generate`: Compile schemas and write provider modules
//! - `check`: Report schema diagnostics
//! - `inspect`: Show resolved configs in several formats
//! - `completions`: Generate shell completion scripts

pub mod check;
pub mod completions;
pub mod generate;
pub mod inspect;

pub use check::CheckCommand;
pub use completions::CompletionsCommand;
pub use generate::GenerateCommand;
pub use inspect::InspectCommand;

//! ktwalk - parse Kotlin-subset sources and walk their syntax trees.
//!
//! This crate provides the `ktwalk` binary and the command implementations
//! behind it.
//!
//! ## Modules
//!
//! - `cli` - command implementations (`tokens`, `tree`, `walk`, `outline`, `check`)

pub mod cli;

// Re-export core types for convenience
pub use ktwalk_core::config::{Config, OutputFormat};
pub use ktwalk_core::error::{KtwalkError, OutputErrorCode};
pub use ktwalk_core::output::{ErrorInfo, ErrorResponse, Location, SCHEMA_VERSION};

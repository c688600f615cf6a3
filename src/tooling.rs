//! Tooling & Integration Layer
//!
//! Command-line shell over the application boundary.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};

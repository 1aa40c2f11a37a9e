#![forbid(unsafe_code)]

//! The `lingo` command-line tool.
//!
//! ```text
//! lingo langs  [--json]
//! lingo render <ID> [-p VALUE]... [--case N] [--script] [--limit N] [--strict]
//! lingo glyphs --font FILE [--fallback NAME=FILE]...
//! ```
//!
//! Global flags pick the settings file (`--config`), language directories
//! (`--lang-dir`), the preferred language (`--language`) and JSON logs
//! (`--log-json`).

pub mod cli;
pub mod error;
pub mod logging;
pub mod params;

pub use cli::{Cli, Commands, run, run_from_env};
pub use error::{CliError, Result};

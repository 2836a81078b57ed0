//! Lexcite CLI - Ask questions about a folder of legal documents.
//!
//! This library backs the `lexcite` binary: argument parsing, layered
//! configuration, the ingest/query coordinator, output formatting and the
//! interactive prompt.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod repl;
pub mod session;

pub use cli::{Cli, Mode};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use session::Coordinator;

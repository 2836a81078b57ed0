//! CLI argument parsing.

use clap::{Args, Parser};
use lexcite_domain::SchemaKind;
use std::path::PathBuf;

/// Lexcite - Ask questions about legal documents and check the citations.
#[derive(Debug, Parser)]
#[command(name = "lexcite")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Folder whose .txt, .pdf and .docx files are ingested
    #[arg(long)]
    pub folder: Option<PathBuf>,

    /// Single file to ingest (repeatable)
    #[arg(long = "file", value_name = "FILE")]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub mode: ModeArgs,

    /// Run structured extraction during ingestion
    #[arg(long, overrides_with = "no_extract")]
    pub extract: bool,

    /// Skip structured extraction
    #[arg(long, overrides_with = "extract")]
    pub no_extract: bool,

    /// Extraction schema
    #[arg(long, value_enum)]
    pub schema: Option<SchemaArg>,

    /// Model used for extraction
    #[arg(long)]
    pub extract_model: Option<String>,

    /// Number of extraction passes per document
    #[arg(long)]
    pub extract_passes: Option<u32>,

    /// Directory of the extraction cache
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Delete every cached extraction before running
    #[arg(long)]
    pub clear_cache: bool,

    /// Completion server endpoint
    #[arg(long, env = "LEXCITE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Completion model
    #[arg(long)]
    pub model: Option<String>,

    /// Deadline for each provider call, in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Directory for the iteration log
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Print the log iterations behind each answer
    #[arg(long)]
    pub show_log: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// How questions are supplied; at most one.
#[derive(Debug, Default, Args)]
#[group(multiple = false)]
pub struct ModeArgs {
    /// Single question to ask
    #[arg(short, long)]
    pub query: Option<String>,

    /// File with one question per line (`#` starts a comment line)
    #[arg(long, value_name = "FILE")]
    pub queries: Option<PathBuf>,

    /// Ask questions at a prompt
    #[arg(short, long)]
    pub interactive: bool,
}

/// Where questions come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// `--query`
    Single(String),
    /// `--queries`
    Batch(PathBuf),
    /// `--interactive`
    Interactive,
}

/// Schema argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SchemaArg {
    /// Dates, amounts, parties, obligations and other general entities
    General,
    /// Contract terms: parties, dates, governing law, caps, notice periods
    Contract,
}

impl Cli {
    /// The selected question source, if any.
    pub fn mode(&self) -> Option<Mode> {
        if let Some(query) = &self.mode.query {
            Some(Mode::Single(query.clone()))
        } else if let Some(path) = &self.mode.queries {
            Some(Mode::Batch(path.clone()))
        } else if self.mode.interactive {
            Some(Mode::Interactive)
        } else {
            None
        }
    }

    /// `Some(true)` for `--extract`, `Some(false)` for `--no-extract`.
    pub fn extraction_override(&self) -> Option<bool> {
        match (self.extract, self.no_extract) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

impl From<SchemaArg> for SchemaKind {
    fn from(schema: SchemaArg) -> Self {
        match schema {
            SchemaArg::General => SchemaKind::General,
            SchemaArg::Contract => SchemaKind::Contract,
        }
    }
}

//! Configuration management for the CLI.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use lexcite_extractor::ExtractorConfig;
use lexcite_llm::ollama::{DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES};
use lexcite_worker::WorkerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Base instructions appended after the extraction and custom instructions.
pub const DEFAULT_BASE_PROMPT: &str = "You are a careful legal document analyst. Answer the \
question using only the documents in the context. If the documents do not contain the answer, \
say so.";

/// CLI configuration, stored as `~/.lexcite/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Completion backend
    #[serde(default)]
    pub completion: CompletionSettings,

    /// Extraction provider settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Task runner settings, including whether extraction runs and its schema
    #[serde(default)]
    pub worker: WorkerConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Completion backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    /// Ollama endpoint
    pub endpoint: String,

    /// Completion model
    pub model: String,

    /// Retry attempts per call
    pub max_retries: u32,

    /// Extra instructions placed between the extraction instructions and the base prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,

    /// Base system prompt
    pub base_prompt: String,

    /// Directory for the iteration log; unset disables it unless `--show-log` is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enable colored output
    pub color: bool,

    /// Extraction cache directory; defaults to `~/.lexcite/cache`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    /// Interactive history size
    pub history_size: usize,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: "llama3.1".to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            custom_instructions: None,
            base_prompt: DEFAULT_BASE_PROMPT.to_string(),
            log_dir: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            cache_dir: None,
            history_size: 1000,
        }
    }
}

impl Config {
    /// Directory holding the configuration, cache, logs and history.
    pub fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".lexcite"))
    }

    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Load the default configuration file, or defaults if it does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Apply command-line overrides.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(enabled) = cli.extraction_override() {
            self.worker.extraction_enabled = enabled;
        }
        if let Some(schema) = cli.schema {
            self.worker.schema = lexcite_domain::SchemaKind::from(schema).to_string();
        }
        if let Some(model) = &cli.extract_model {
            self.extractor.model_id = model.clone();
        }
        if let Some(passes) = cli.extract_passes {
            self.extractor.passes = passes;
        }
        if let Some(dir) = &cli.cache_dir {
            self.settings.cache_dir = Some(dir.clone());
        }
        if let Some(endpoint) = &cli.endpoint {
            self.completion.endpoint = endpoint.clone();
        }
        if let Some(model) = &cli.model {
            self.completion.model = model.clone();
        }
        if let Some(secs) = cli.timeout {
            self.worker.provider_timeout_secs = Some(secs);
        }
        if let Some(dir) = &cli.log_dir {
            self.completion.log_dir = Some(dir.clone());
        }
        if cli.no_color {
            self.settings.color = false;
        }
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        if self.completion.endpoint.trim().is_empty() {
            return Err(CliError::Config("completion.endpoint must not be empty".into()));
        }
        if self.completion.model.trim().is_empty() {
            return Err(CliError::Config("completion.model must not be empty".into()));
        }
        self.extractor
            .validate()
            .map_err(|e| CliError::Config(format!("extractor: {}", e)))?;
        self.worker
            .validate()
            .map_err(|e| CliError::Config(format!("worker: {}", e)))
    }

    /// Resolved extraction cache directory.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.settings.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::home_dir()?.join("cache")),
        }
    }

    /// Resolved iteration log directory; `show_log` turns the default one on.
    pub fn log_dir(&self, show_log: bool) -> Result<Option<PathBuf>> {
        match &self.completion.log_dir {
            Some(dir) => Ok(Some(dir.clone())),
            None if show_log => Ok(Some(Self::home_dir()?.join("logs"))),
            None => Ok(None),
        }
    }
}

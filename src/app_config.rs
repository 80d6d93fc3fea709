use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use anyhow::{Context, Result};
use crate::errors::AppError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// How lines are marked
    #[serde(default)]
    pub marking: MarkingConfig,

    /// Where marked documents go
    #[serde(default)]
    pub output: OutputConfig,

    /// Maximum number of documents marked at once in folder mode
    #[serde(default = "default_concurrent_files")]
    pub concurrent_files: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Marking behaviour
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MarkingConfig {
    /// Terminate each marked row with POP DIRECTIONAL FORMATTING (U+202C)
    #[serde(default)]
    pub close_embeddings: bool,

    /// Leave documents whose rows all carry a mark already untouched
    #[serde(default = "default_true")]
    pub skip_marked_documents: bool,
}

impl Default for MarkingConfig {
    fn default() -> Self {
        Self {
            close_embeddings: false,
            skip_marked_documents: default_true(),
        }
    }
}

/// Output naming
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Inserted between file stem and extension: `movie.srt` -> `movie.rtl.srt`
    #[serde(default = "default_output_suffix")]
    pub suffix: String,

    /// Overwrite the input file instead of writing a sibling
    #[serde(default)]
    pub in_place: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: default_output_suffix(),
            in_place: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_concurrent_files() -> usize {
    4
}

fn default_output_suffix() -> String {
    "rtl".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        let suffix = &self.output.suffix;
        if suffix.is_empty() {
            return Err(AppError::Config("Output suffix must not be empty".to_string()));
        }
        if suffix.contains(['.', '/', '\\']) {
            return Err(AppError::Config(format!(
                "Output suffix must not contain '.' or path separators: {}",
                suffix
            )));
        }

        if self.concurrent_files == 0 {
            return Err(AppError::Config("concurrent_files must be at least 1".to_string()));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            marking: MarkingConfig::default(),
            output: OutputConfig::default(),
            concurrent_files: default_concurrent_files(),
            log_level: LogLevel::default(),
        }
    }
}

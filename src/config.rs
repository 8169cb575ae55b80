//! Environment-driven configuration

use crate::persona;
use crate::transport::GenerationSettings;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
    #[error("Failed to read instruction file {path}: {source}")]
    Instruction {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Session configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
    pub generation: GenerationSettings,
    /// File whose contents replace the built-in instruction
    pub instruction_file: Option<PathBuf>,
}

impl Config {
    /// Read settings from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Config::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingApiKey`] when `GEMINI_API_KEY` is unset or blank,
    /// [`ConfigError::InvalidValue`] when a numeric setting does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = var("GEMINI_API_KEY").ok_or(ConfigError::MissingApiKey)?;

        let timeout = match var("NOUR_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse_var("NOUR_TIMEOUT_SECS", value)?),
            None => DEFAULT_TIMEOUT,
        };

        let generation = GenerationSettings {
            temperature: var("NOUR_TEMPERATURE")
                .map(|v| parse_var("NOUR_TEMPERATURE", v))
                .transpose()?,
            max_output_tokens: var("NOUR_MAX_OUTPUT_TOKENS")
                .map(|v| parse_var("NOUR_MAX_OUTPUT_TOKENS", v))
                .transpose()?,
        };

        Ok(Self {
            api_key,
            model: var("NOUR_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: var("NOUR_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timeout,
            generation,
            instruction_file: var("NOUR_INSTRUCTION_FILE").map(PathBuf::from),
        })
    }

    /// Instruction text for this session
    ///
    /// # Errors
    ///
    /// [`ConfigError::Instruction`] when the configured file cannot be read.
    pub fn instruction(&self) -> Result<String, ConfigError> {
        match &self.instruction_file {
            Some(path) => std::fs::read_to_string(path).map_err(|source| ConfigError::Instruction {
                path: path.clone(),
                source,
            }),
            None => Ok(persona::INSTRUCTION.to_string()),
        }
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { var, value })
}

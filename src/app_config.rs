use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::errors::AnalysisError;
use crate::sentences::NormalizeOptions;

// @module: Application configuration (loading, validating and saving conf.json)

/// Environment variable consulted when `analysis.api_key` is empty
pub const API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";

/// Default configuration file name
pub const DEFAULT_CONFIG_PATH: &str = "conf.json";

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Sentence normalization heuristics
    #[serde(default)]
    pub normalizer: NormalizeOptions,

    /// Language-model analysis settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Slang enrichment settings
    #[serde(default)]
    pub slang: SlangConfig,

    /// Upload limits
    #[serde(default)]
    pub upload: UploadConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Language-model analysis configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnalysisConfig {
    // @field: Chat-completions URL
    #[serde(default = "default_analysis_endpoint")]
    pub endpoint: String,

    // @field: Model name
    #[serde(default = "default_analysis_model")]
    pub model: String,

    // @field: API key (falls back to OPENROUTER_API_KEY)
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    // @field: Max tokens per answer
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    // @field: Language of translations and explanations
    #[serde(default = "default_explanation_language")]
    pub explanation_language: String,

    // @field: Max concurrent requests
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    // @field: Whether results are cached per sentence and context
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
}

impl AnalysisConfig {
    /// API key from the config, or from the environment when the config value is empty
    pub fn resolved_api_key(&self) -> String {
        if !self.api_key.trim().is_empty() {
            return self.api_key.clone();
        }
        std::env::var(API_KEY_ENV_VAR).unwrap_or_default()
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: default_analysis_endpoint(),
            model: default_analysis_model(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            explanation_language: default_explanation_language(),
            concurrent_requests: default_concurrent_requests(),
            cache_enabled: true,
        }
    }
}

/// Slang lookup configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SlangConfig {
    // @field: Whether slang terms are looked up at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    // @field: Search endpoint
    #[serde(default = "default_slang_endpoint")]
    pub endpoint: String,

    // @field: Definitions kept per term
    #[serde(default = "default_slang_limit")]
    pub limit: usize,

    // @field: Cache time to live in seconds
    #[serde(default = "default_slang_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for SlangConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_slang_endpoint(),
            limit: default_slang_limit(),
            cache_ttl_secs: default_slang_cache_ttl_secs(),
        }
    }
}

/// Upload limits
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UploadConfig {
    // @field: Largest accepted subtitle file in bytes
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size_bytes(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
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
    // @returns: Matching `log` filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

fn default_analysis_endpoint() -> String {
    crate::providers::openrouter::DEFAULT_ENDPOINT.to_string()
}

fn default_analysis_model() -> String {
    "mistralai/mistral-small-3.2-24b-instruct:free".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_temperature() -> f32 {
    0.4
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_explanation_language() -> String {
    "Russian".to_string()
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_true() -> bool {
    true
}

fn default_slang_endpoint() -> String {
    crate::slang::DEFAULT_ENDPOINT.to_string()
}

fn default_slang_limit() -> usize {
    2
}

fn default_slang_cache_ttl_secs() -> u64 {
    3600
}

fn default_max_file_size_bytes() -> u64 {
    10 * 1024 * 1024
}

impl Config {
    /// Load a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load a configuration file, writing the default one first if it is missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::from_file(path);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<()> {
        if self.normalizer.max_words_without_punct == 0 {
            return Err(anyhow!("normalizer.max_words_without_punct must be greater than 0"));
        }

        if !(0.0..=2.0).contains(&self.analysis.temperature) {
            return Err(anyhow!(
                "analysis.temperature must be between 0.0 and 2.0, got {}",
                self.analysis.temperature
            ));
        }

        if self.analysis.max_tokens == 0 {
            return Err(anyhow!("analysis.max_tokens must be greater than 0"));
        }

        if self.analysis.concurrent_requests == 0 {
            return Err(anyhow!("analysis.concurrent_requests must be greater than 0"));
        }

        if self.analysis.timeout_secs == 0 {
            return Err(anyhow!("analysis.timeout_secs must be greater than 0"));
        }

        if self.slang.enabled && self.slang.limit == 0 {
            return Err(anyhow!("slang.limit must be greater than 0 when slang lookup is enabled"));
        }

        if self.upload.max_file_size_bytes == 0 {
            return Err(anyhow!("upload.max_file_size_bytes must be greater than 0"));
        }

        Ok(())
    }

    /// Validate everything needed to call the analysis provider
    pub fn validate_for_analysis(&self) -> Result<()> {
        self.validate()?;

        if self.analysis.resolved_api_key().trim().is_empty() {
            return Err(AnalysisError::MissingApiKey.into());
        }

        if self.analysis.model.trim().is_empty() {
            return Err(anyhow!("analysis.model must not be empty"));
        }

        Ok(())
    }
}

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use url::Url;

use crate::validation::RatioThresholds;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and overriding configuration settings. The configuration is
/// fixed once the run starts.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Provider connection settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Translation settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Translation gate thresholds
    #[serde(default)]
    pub gate: GateConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Model name
    #[serde(default = "default_model")]
    pub model: String,

    // @field: Full chat endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Sampling temperature, provider default when unset
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            temperature: None,
        }
    }
}

/// Translation settings applicable to every part
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// System prompt template for translation
    /// Placeholders: {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Maximum number of parts translated at the same time.
    /// Output order is kept regardless of this value.
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            concurrent_requests: default_concurrent_requests(),
        }
    }
}

/// Length ratio bounds a translation must respect to be accepted
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GateConfig {
    /// Maximum translated/original character ratio
    #[serde(default = "default_max_ratio")]
    pub max_char_ratio: f64,

    /// Maximum translated/original word ratio
    #[serde(default = "default_max_ratio")]
    pub max_word_ratio: f64,

    /// Minimum translated/original character ratio, disabled when unset
    #[serde(default)]
    pub min_char_ratio: Option<f64>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_char_ratio: default_max_ratio(),
            max_word_ratio: default_max_ratio(),
            min_char_ratio: None,
        }
    }
}

impl From<&GateConfig> for RatioThresholds {
    fn from(gate: &GateConfig) -> Self {
        Self {
            max_char_ratio: gate.max_char_ratio,
            max_word_ratio: gate.max_word_ratio,
            min_char_ratio: gate.min_char_ratio,
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

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_model() -> String {
    "phi4".to_string()
}

fn default_endpoint() -> String {
    "http://localhost:11434/api/chat".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_concurrent_requests() -> usize {
    1
}

fn default_max_ratio() -> f64 {
    2.0
}

fn default_system_prompt() -> String {
    [
        "You are a translation AI.",
        "Your sole purpose is to translate the provided text into {target_language}.",
        "Do not add any extra comments, notes, or meta-information about the source text, its language, or the translation process.",
        "Provide only the {target_language} translation.",
        "For parts you fail to translate, keep the original text",
    ]
    .join(" ")
}

impl Config {
    /// Load a configuration file, falling back to defaults when it does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!("Config file not found at '{}', using defaults.", path.display());
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// Load a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: Config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::validate_language_code(&self.target_language)?;

        if self.provider.model.trim().is_empty() {
            return Err(anyhow!("Model name must not be empty"));
        }

        let endpoint = Url::parse(&self.provider.endpoint)
            .with_context(|| format!("Invalid provider endpoint: {}", self.provider.endpoint))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(anyhow!("Provider endpoint must use http or https: {}", endpoint));
        }

        if self.provider.timeout_secs == 0 {
            return Err(anyhow!("Provider timeout must be greater than zero"));
        }

        if self.translation.concurrent_requests == 0 {
            return Err(anyhow!("concurrent_requests must be at least 1"));
        }

        for (name, value) in [
            ("max_char_ratio", self.gate.max_char_ratio),
            ("max_word_ratio", self.gate.max_word_ratio),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(anyhow!("{} must be a positive number, got {}", name, value));
            }
        }

        if let Some(min) = self.gate.min_char_ratio {
            if !min.is_finite() || min < 0.0 || min >= self.gate.max_char_ratio {
                return Err(anyhow!(
                    "min_char_ratio must be between 0 and max_char_ratio ({}), got {}",
                    self.gate.max_char_ratio,
                    min
                ));
            }
        }

        Ok(())
    }

    /// System prompt with placeholders replaced
    pub fn render_system_prompt(&self) -> Result<String> {
        let language = crate::language_utils::get_language_name(&self.target_language)?;
        Ok(self
            .translation
            .system_prompt
            .replace("{target_language}", &language))
    }

    /// Ratio thresholds for the translation gate
    pub fn ratio_thresholds(&self) -> RatioThresholds {
        RatioThresholds::from(&self.gate)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            provider: ProviderConfig::default(),
            translation: TranslationConfig::default(),
            gate: GateConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

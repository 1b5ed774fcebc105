use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// English variant to translate into
    #[serde(default)]
    pub target_variant: TargetVariant,

    /// Whether slide notes are translated along with the slides
    #[serde(default = "default_true")]
    pub include_notes: bool,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Legacy .ppt conversion config
    #[serde(default)]
    pub conversion: ConversionConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// English variant accepted by the provider
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TargetVariant {
    // @variant: American English
    #[default]
    EnUs,
    // @variant: British English
    EnGb,
}

impl TargetVariant {
    // @returns: Code sent as target_lang
    pub fn deepl_code(&self) -> &'static str {
        match self {
            Self::EnUs => "EN-US",
            Self::EnGb => "EN-GB",
        }
    }
}

impl std::fmt::Display for TargetVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.deepl_code())
    }
}

impl std::str::FromStr for TargetVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "en-us" | "us" => Ok(Self::EnUs),
            "en-gb" | "gb" | "uk" => Ok(Self::EnGb),
            _ => Err(anyhow!("Invalid English variant: {}", s)),
        }
    }
}

/// DeepL endpoint tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeepLTier {
    // @tier: api-free.deepl.com
    Free,
    // @tier: api.deepl.com
    Pro,
}

/// DeepL provider configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DeepLConfig {
    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Endpoint override; empty means "pick from the key"
    #[serde(default = "String::new")]
    pub endpoint: String,
}

impl DeepLConfig {
    /// Free-tier keys end with ":fx" (older ones contain "-free")
    pub fn tier(&self) -> DeepLTier {
        if self.api_key.ends_with(":fx") || self.api_key.contains("-free") {
            DeepLTier::Free
        } else {
            DeepLTier::Pro
        }
    }

    /// Endpoint to post to: the explicit override wins, otherwise the tier decides
    pub fn resolve_endpoint(&self) -> String {
        if !self.endpoint.trim().is_empty() {
            return self.endpoint.trim().to_string();
        }

        match self.tier() {
            DeepLTier::Free => default_free_endpoint(),
            DeepLTier::Pro => default_pro_endpoint(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Maximum number of texts per provider request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// DeepL settings
    #[serde(default)]
    pub deepl: DeepLConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            timeout_secs: default_timeout_secs(),
            deepl: DeepLConfig::default(),
        }
    }
}

/// External converter settings for legacy .ppt input
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConversionConfig {
    /// Command used for conversion (LibreOffice)
    #[serde(default = "default_conversion_command")]
    pub command: String,

    /// Conversion timeout in seconds
    #[serde(default = "default_conversion_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            command: default_conversion_command(),
            timeout_secs: default_conversion_timeout_secs(),
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

/// Most texts sent in one provider request
pub const MAX_BATCH_SIZE: usize = 45;

fn default_source_language() -> String {
    "fr".to_string()
}

fn default_true() -> bool {
    true
}

fn default_batch_size() -> usize {
    MAX_BATCH_SIZE
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_conversion_command() -> String {
    "soffice".to_string()
}

fn default_conversion_timeout_secs() -> u64 {
    120
}

fn default_free_endpoint() -> String {
    "https://api-free.deepl.com/v2/translate".to_string()
}

fn default_pro_endpoint() -> String {
    "https://api.deepl.com/v2/translate".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.validate_settings()?;

        if self.translation.deepl.api_key.trim().is_empty() {
            return Err(anyhow!("DeepL API key is missing; set DEEPL_API_KEY or pass --api-key"));
        }

        Ok(())
    }

    /// Validate everything except provider credentials
    pub fn validate_settings(&self) -> Result<()> {
        crate::language_utils::to_deepl_source_code(&self.source_language)?;

        if self.translation.batch_size == 0 || self.translation.batch_size > MAX_BATCH_SIZE {
            return Err(anyhow!(
                "Batch size must be between 1 and {}, got {}",
                MAX_BATCH_SIZE, self.translation.batch_size
            ));
        }

        let endpoint = self.translation.deepl.endpoint.trim();
        if !endpoint.is_empty() {
            Url::parse(endpoint)
                .map_err(|e| anyhow!("Invalid DeepL endpoint '{}': {}", endpoint, e))?;
        }

        if self.conversion.command.trim().is_empty() {
            return Err(anyhow!("Conversion command cannot be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_variant: TargetVariant::default(),
            include_notes: true,
            translation: TranslationConfig::default(),
            conversion: ConversionConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

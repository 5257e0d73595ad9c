use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings, plus the backend family
/// table that maps display model names to concrete providers.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language, free-form name or ISO code
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Recognized backend families
///
/// Each family groups the display model names that route to one provider
/// protocol and endpoint. Detection is a case-insensitive substring match
/// against `FAMILY_TAGS`, so version suffixes in display names ("deepseek
/// v3.2", "kimi-k2") resolve without per-version entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    DeepSeek,
    Gemini,
    Glm,
    Kimi,
}

/// Substring tags mapped to backend families, matched case-insensitively.
/// None of the known display names carries more than one tag, so table
/// order never decides a match.
const FAMILY_TAGS: &[(&str, BackendKind)] = &[
    ("deepseek", BackendKind::DeepSeek),
    ("gemini", BackendKind::Gemini),
    ("glm", BackendKind::Glm),
    ("zhipu", BackendKind::Glm),
    ("kimi", BackendKind::Kimi),
    ("moonshot", BackendKind::Kimi),
];

impl BackendKind {
    /// Detect the backend family from a display model name
    pub fn detect(display_model: &str) -> Option<Self> {
        let needle = display_model.trim().to_lowercase();
        FAMILY_TAGS.iter()
            .find(|(tag, _)| needle.contains(tag))
            .map(|(_, kind)| *kind)
    }

    /// Capitalized family name
    pub fn display_name(&self) -> &str {
        match self {
            Self::DeepSeek => "DeepSeek",
            Self::Gemini => "Gemini",
            Self::Glm => "GLM",
            Self::Kimi => "Kimi",
        }
    }

    /// Concrete model identifier sent on the wire
    pub fn wire_model(&self) -> &str {
        match self {
            Self::DeepSeek => "deepseek-chat",
            Self::Gemini => "gemini-2.5-flash",
            Self::Glm => "glm-4.6",
            Self::Kimi => "moonshot-v1-8k",
        }
    }

    /// Default API endpoint for the family
    pub fn default_endpoint(&self) -> &str {
        match self {
            Self::DeepSeek => "https://api.deepseek.com",
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Self::Glm => "https://open.bigmodel.cn/api/paas/v4",
            Self::Kimi => "https://api.moonshot.cn/v1",
        }
    }
}

// Implement Display trait for BackendKind
impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// Implement FromStr trait for BackendKind
impl std::str::FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::detect(s).ok_or_else(|| anyhow!("Unknown model selection: {}", s))
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Display model name, matched against the backend family table
    /// (e.g. "gemini-2.5-flash", "deepseek v3.2", "glm-4.6", "kimi-k2")
    #[serde(default = "default_model")]
    pub model: String,

    /// API key for the selected backend
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL (optional, overrides the family default)
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: String::new(),
            common: TranslationCommonConfig::default(),
        }
    }
}

impl TranslationConfig {
    /// Backend family resolved from the display model name
    pub fn backend(&self) -> Option<BackendKind> {
        BackendKind::detect(&self.model)
    }

    /// Get the endpoint, falling back to the family default
    pub fn get_endpoint(&self) -> String {
        if !self.endpoint.is_empty() {
            return self.endpoint.clone();
        }
        self.backend()
            .map(|kind| kind.default_endpoint().to_string())
            .unwrap_or_default()
    }
}

/// Common translation settings applicable to all backends
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template for translation
    /// Placeholder: {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Maximum number of rows grouped into one backend call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Delay in seconds applied after each chunk call, rate-limit pacing
    #[serde(default = "default_inter_chunk_delay_secs")]
    pub inter_chunk_delay_secs: f64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    /// Lower values make output more deterministic, higher values more creative
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            batch_size: default_batch_size(),
            inter_chunk_delay_secs: default_inter_chunk_delay_secs(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
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

fn default_target_language() -> String {
    "French".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_batch_size() -> usize {
    50
}

fn default_inter_chunk_delay_secs() -> f64 {
    1.0
}

fn default_temperature() -> f32 {
    0.3
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_system_prompt() -> String {
    "You are a professional translator. Translate the following text into {target_language}. Rules:\n\
     1. Maintain original formatting, casing, symbols, and HTML tags.\n\
     2. The input may contain multiple lines separated by line breaks. Translate line by line, keep the exact same number of lines, and never merge or split lines.\n\
     3. Return ONLY the translated text. No explanations, no quotes around the output unless present in the source.\n\
     4. If a line is a placeholder or code that should not be translated, return it unchanged.".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language must not be empty"));
        }

        if self.translation.backend().is_none() {
            return Err(anyhow!("Unknown model selection: {}", self.translation.model));
        }

        if self.translation.api_key.trim().is_empty() {
            return Err(anyhow!("Translation API key is required for {} backend",
                self.translation.model));
        }

        if self.translation.common.batch_size == 0 {
            return Err(anyhow!("Batch size must be at least 1"));
        }

        let delay = self.translation.common.inter_chunk_delay_secs;
        if !delay.is_finite() || delay < 0.0 {
            return Err(anyhow!("Inter-chunk delay must be a non-negative number of seconds"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::errors::{Result, TranslateError};
use crate::core::models::RequestStyle;

/// Default translate endpoint (Google Cloud Translation v2)
pub const DEFAULT_TRANSLATE_URL: &str =
    "https://translation.googleapis.com/language/translate/v2";

/// Default detect endpoint
pub const DEFAULT_DETECT_URL: &str =
    "https://translation.googleapis.com/language/translate/v2/detect";

/// Default transport timeout in milliseconds
const DEFAULT_TIMEOUT_MS: u64 = 30000;

/// Configuration for the translation client
///
/// A config is assembled once, validated, and never mutated afterwards. To
/// change a setting, build a new value (see [`TranslatorConfig::builder`])
/// and construct a new client from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Google API key, sent as the `key` query parameter on every request
    pub api_key: String,
    /// Translate endpoint URL
    pub translate_url: String,
    /// Detect endpoint URL
    pub detect_url: String,
    /// Language translated from; detected per call when unset
    pub source_lang: Option<String>,
    /// Language translated into; must be set before `translate` is called
    pub target_lang: Option<String>,
    /// Wire style shared by both endpoints
    pub request_style: RequestStyle,
    /// Transport timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            translate_url: DEFAULT_TRANSLATE_URL.to_string(),
            detect_url: DEFAULT_DETECT_URL.to_string(),
            source_lang: None,
            target_lang: None,
            request_style: RequestStyle::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl TranslatorConfig {
    /// Start building a configuration around the given API key
    pub fn builder(api_key: impl Into<String>) -> TranslatorConfigBuilder {
        TranslatorConfigBuilder {
            config: TranslatorConfig {
                api_key: api_key.into(),
                ..Default::default()
            },
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY").map_err(|_| TranslateError::ConfigError {
            message: "GOOGLE_API_KEY environment variable is required".to_string(),
        })?;

        let translate_url = std::env::var("TRANSLATE_URL")
            .unwrap_or_else(|_| DEFAULT_TRANSLATE_URL.to_string());

        let detect_url =
            std::env::var("DETECT_URL").unwrap_or_else(|_| DEFAULT_DETECT_URL.to_string());

        let request_style = match std::env::var("REQUEST_STYLE") {
            Ok(raw) => raw.parse::<RequestStyle>()?,
            Err(_) => RequestStyle::default(),
        };

        let timeout_ms = std::env::var("REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_MS.to_string())
            .parse::<u64>()
            .map_err(|e| TranslateError::ConfigError {
                message: format!("invalid REQUEST_TIMEOUT_MS: {e}"),
            })?;

        Ok(Self {
            api_key,
            translate_url,
            detect_url,
            source_lang: None,
            target_lang: None,
            request_style,
            timeout_ms,
        })
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(TranslateError::ConfigError {
                message: "no Google API key was provided".to_string(),
            });
        }

        if self.translate_url.is_empty() {
            return Err(TranslateError::ConfigError {
                message: "translate endpoint URL is required".to_string(),
            });
        }

        if self.detect_url.is_empty() {
            return Err(TranslateError::ConfigError {
                message: "detect endpoint URL is required".to_string(),
            });
        }

        if self.timeout_ms == 0 {
            return Err(TranslateError::ConfigError {
                message: "timeout_ms must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Builder producing a validated [`TranslatorConfig`]
#[derive(Debug, Clone)]
pub struct TranslatorConfigBuilder {
    /// Configuration being assembled
    config: TranslatorConfig,
}

impl TranslatorConfigBuilder {
    /// Override the translate endpoint
    pub fn translate_url(mut self, url: impl Into<String>) -> Self {
        self.config.translate_url = url.into();
        self
    }

    /// Override the detect endpoint
    pub fn detect_url(mut self, url: impl Into<String>) -> Self {
        self.config.detect_url = url.into();
        self
    }

    /// Fix the language translated from, disabling per-call detection
    pub fn source_lang(mut self, lang: impl Into<String>) -> Self {
        self.config.source_lang = Some(lang.into());
        self
    }

    /// Set the language translated into
    pub fn target_lang(mut self, lang: impl Into<String>) -> Self {
        self.config.target_lang = Some(lang.into());
        self
    }

    /// Choose how requests are put on the wire
    pub fn request_style(mut self, style: RequestStyle) -> Self {
        self.config.request_style = style;
        self
    }

    /// Override the transport timeout in milliseconds
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.timeout_ms = timeout_ms;
        self
    }

    /// Validate and return the finished configuration
    pub fn build(self) -> Result<TranslatorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

//! Async client for the translate and detect endpoints

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::core::cache::TranslationCache;
use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslateError};
use crate::core::models::{
    first_detection, first_translation, DetectParams, RequestStyle, TranslateParams,
};

/// Async translation client backed by the Google Translate v2 API
///
/// Holds an immutable configuration, an HTTP transport, and an optional
/// persisted response cache. Cheap to clone; clones share the transport,
/// the configuration and the cache.
#[derive(Debug, Clone)]
pub struct Translator {
    client: reqwest::Client,
    config: Arc<TranslatorConfig>,
    cache: Option<TranslationCache>,
}

impl Translator {
    /// Create a new translator from a configuration
    ///
    /// The transport is a reqwest client with the configured timeout; every
    /// other transport setting is left at its default.
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        config.validate()?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
            cache: None,
        })
    }

    /// Create a translator around an injected HTTP transport
    ///
    /// The caller owns every transport setting, timeouts included.
    pub fn with_http_client(config: TranslatorConfig, client: reqwest::Client) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            client,
            config: Arc::new(config),
            cache: None,
        })
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        let config = TranslatorConfig::from_env()?;
        Self::new(config)
    }

    /// Attach a response cache, consulted before every remote translate call
    pub fn with_cache(mut self, cache: TranslationCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Cache in use, if one was attached
    pub fn cache(&self) -> Option<&TranslationCache> {
        self.cache.as_ref()
    }

    /// Detect the language of the given text
    ///
    /// Returns the first detected language code. A response without a usable
    /// detection is a detection error.
    pub async fn detect(&self, text: &str) -> Result<String> {
        let response = self
            .send(&self.config.detect_url, &DetectParams { q: text })
            .await?;

        let language =
            first_detection(&response).ok_or_else(|| TranslateError::DetectionError {
                message: "could not detect provided text language".to_string(),
            })?;

        debug!("Detected source language: {}", language);
        Ok(language)
    }

    /// Translate text into the configured target language
    ///
    /// When no source language is configured, it is detected per call before
    /// the cache is consulted.
    pub async fn translate(&self, text: &str) -> Result<Option<String>> {
        self.translate_with(text, true).await
    }

    /// Translate text, controlling whether a missing source language is detected
    ///
    /// Returns `Ok(None)` when the service answers without any translation; an
    /// empty result is valid and distinct from a failed request.
    pub async fn translate_with(&self, text: &str, auto_detect: bool) -> Result<Option<String>> {
        let target = self
            .config
            .target_lang
            .clone()
            .ok_or_else(|| TranslateError::ConfigError {
                message: "no target language was set".to_string(),
            })?;

        // Resolve the source language before the cache key is formed
        let source = match self.config.source_lang.clone() {
            Some(lang) => lang,
            None if auto_detect => self.detect(text).await?,
            None => {
                return Err(TranslateError::ConfigError {
                    message: "no source language was set with auto-detect turned off".to_string(),
                })
            }
        };

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.lookup(&source, &target, text).await? {
                debug!("Cache hit for {} -> {}", source, target);
                return Ok(first_translation(&hit));
            }
        }

        let params = TranslateParams {
            q: text,
            source: &source,
            target: &target,
        };
        let response = self.send(&self.config.translate_url, &params).await?;
        let translation = first_translation(&response);

        // The raw response is stored even when it carries no translations
        if let Some(cache) = &self.cache {
            cache.store(&source, &target, text, response).await?;
        }

        Ok(translation)
    }

    /// Flush the attached cache to disk; a no-op without a cache
    pub async fn flush_cache(&self) -> Result<()> {
        match &self.cache {
            Some(cache) => cache.flush().await,
            None => Ok(()),
        }
    }

    /// Send one request in the configured wire style and decode the JSON body
    async fn send<P: Serialize + ?Sized>(&self, url: &str, params: &P) -> Result<Value> {
        debug!("Sending {} request to {}", self.config.request_style, url);

        let request = match self.config.request_style {
            RequestStyle::UrlQuery => self
                .client
                .get(url)
                .query(&[("key", self.config.api_key.as_str())])
                .query(params),
            RequestStyle::JsonBody => self
                .client
                .post(url)
                .query(&[("key", self.config.api_key.as_str())])
                .json(params),
        };

        let response = request.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

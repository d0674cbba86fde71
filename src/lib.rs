//! Google Translator - Rust client for the Google Translate v2 API
//!
//! This library provides asynchronous language detection and text translation
//! with a persisted response cache, so repeated translations of the same text
//! never touch the network twice.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub mod cli;
pub mod core;

// Re-export key types for convenience
pub use crate::core::{
    cache::TranslationCache,
    client::Translator,
    config::{TranslatorConfig, TranslatorConfigBuilder},
    errors::TranslateError,
    models::{DetectParams, RequestStyle, TranslateParams},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

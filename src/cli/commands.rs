//! CLI command definitions and handlers

use clap::Subcommand;

/// Commands for the Google translate client
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate text into a target language
    Translate {
        /// Text to translate (required)
        #[arg(short, long)]
        text: String,

        /// Source language (auto-detect if not specified)
        #[arg(long)]
        source_lang: Option<String>,

        /// Target language (required)
        #[arg(long)]
        target_lang: String,

        /// Fail instead of detecting when no source language is given
        #[arg(long)]
        no_detect: bool,

        /// Request style: 'query' for GET or 'json' for POST
        #[arg(long)]
        style: Option<String>,

        /// Skip the persisted response cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Detect the language of a text
    Detect {
        /// Text to examine (required)
        #[arg(short, long)]
        text: String,
    },

    /// Show the persisted cache location and contents
    Cache,
}

/// Handle text translation command
pub async fn handle_translate(
    text: String,
    source_lang: Option<String>,
    target_lang: String,
    no_detect: bool,
    style: Option<String>,
    no_cache: bool,
) -> anyhow::Result<()> {
    use crate::core::cache::TranslationCache;
    use crate::core::client::Translator;
    use crate::core::config::TranslatorConfig;
    use crate::core::models::RequestStyle;
    use std::time::Instant;
    use tracing::info;

    let start_time = Instant::now();

    info!("Starting translation");
    info!("Target language: {}", target_lang);
    info!("Source language: {}", source_lang.as_deref().unwrap_or("(auto)"));

    // Assemble an immutable config for this invocation
    let base = TranslatorConfig::from_env()?;
    let request_style = match style {
        Some(raw) => raw.parse::<RequestStyle>()?,
        None => base.request_style,
    };
    let config = TranslatorConfig {
        source_lang,
        target_lang: Some(target_lang),
        request_style,
        ..base
    };

    let mut translator = Translator::new(config)?;
    if !no_cache {
        translator = translator.with_cache(TranslationCache::from_env());
    }

    match translator.translate_with(&text, !no_detect).await? {
        Some(translation) => println!("{}", translation),
        None => println!("⚠️  The service returned no translation"),
    }

    // Persist anything newly cached
    if !no_cache {
        translator.flush_cache().await?;
    }

    let duration = start_time.elapsed();
    info!("Completed in {:?}", duration);

    Ok(())
}

/// Handle language detection command
pub async fn handle_detect(text: String) -> anyhow::Result<()> {
    use crate::core::client::Translator;
    use tracing::info;

    info!("Detecting language for {} characters", text.len());

    let translator = Translator::from_env()?;
    let language = translator.detect(&text).await?;

    println!("{}", language);

    Ok(())
}

/// Handle cache report command
pub async fn handle_cache() -> anyhow::Result<()> {
    use crate::core::cache::TranslationCache;
    use tracing::info;

    let cache = TranslationCache::from_env();
    println!("Cache file: {}", cache.path().display());

    if !cache.path().exists() {
        println!("⚠️  Cache file does not exist yet (nothing has been flushed)");
        return Ok(());
    }

    cache.load().await?;
    let total = cache.entry_count().await?;
    info!("Loaded {} cached responses", total);

    println!("Cached responses: {}", total);
    for (source, target, count) in cache.pair_counts().await? {
        println!("   {} -> {}: {}", source, target, count);
    }

    Ok(())
}

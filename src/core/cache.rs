//! Persisted cache of raw translate responses

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::core::errors::Result;

/// Directory under the storage root that holds the cache file
pub const CACHE_DIR: &str = "vendor/ddctd143/google-translate";

/// Name of the persisted cache file
pub const CACHE_FILE: &str = "translator_cache.JSON";

/// Storage root used when the `STORAGE_DIR` environment variable is unset
const DEFAULT_STORAGE_DIR: &str = "storage";

/// Nested mapping of source language -> target language -> text -> raw response
type CacheMap = BTreeMap<String, BTreeMap<String, BTreeMap<String, Value>>>;

/// In-memory cache state guarded by the lock
#[derive(Debug, Default)]
struct CacheState {
    /// Cached responses
    entries: CacheMap,
    /// Whether the persisted file has been read into `entries`
    loaded: bool,
}

/// Cache of translate responses keyed by (source, target, text)
///
/// Entries live in memory and are persisted to a single pretty-printed JSON
/// file. The file is read at most once per instance, on first use; nothing is
/// written to disk until [`TranslationCache::flush`] is called. Clones share
/// the same state.
#[derive(Debug, Clone)]
pub struct TranslationCache {
    /// Path of the backing JSON file
    file: PathBuf,
    /// Shared in-memory state
    state: Arc<RwLock<CacheState>>,
}

impl TranslationCache {
    /// Create a cache stored under `<root>/vendor/ddctd143/google-translate/translator_cache.JSON`
    pub fn at_storage_root<P: AsRef<Path>>(root: P) -> Self {
        Self::with_file(root.as_ref().join(CACHE_DIR).join(CACHE_FILE))
    }

    /// Create a cache backed by an explicit file path
    pub fn with_file<P: Into<PathBuf>>(file: P) -> Self {
        Self {
            file: file.into(),
            state: Arc::new(RwLock::new(CacheState::default())),
        }
    }

    /// Create a cache rooted at the `STORAGE_DIR` environment variable
    pub fn from_env() -> Self {
        let root =
            std::env::var("STORAGE_DIR").unwrap_or_else(|_| DEFAULT_STORAGE_DIR.to_string());
        Self::at_storage_root(root)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.file
    }

    /// Read the persisted mapping into memory if it has not been read yet
    ///
    /// A missing file leaves the cache empty. Calling this again is a no-op;
    /// lookups and stores load lazily, so calling it at all is optional.
    pub async fn load(&self) -> Result<()> {
        let mut state = self.state.write().await;
        self.ensure_loaded(&mut state)
    }

    /// Look up the cached response for a (source, target, text) combination
    pub async fn lookup(&self, source: &str, target: &str, text: &str) -> Result<Option<Value>> {
        let mut state = self.state.write().await;
        self.ensure_loaded(&mut state)?;

        Ok(state
            .entries
            .get(source)
            .and_then(|targets| targets.get(target))
            .and_then(|texts| texts.get(text))
            .cloned())
    }

    /// Insert or overwrite the cached response for a (source, target, text) combination
    ///
    /// Only affects memory; the file is untouched until [`TranslationCache::flush`].
    pub async fn store(&self, source: &str, target: &str, text: &str, response: Value) -> Result<()> {
        let mut state = self.state.write().await;
        self.ensure_loaded(&mut state)?;

        state
            .entries
            .entry(source.to_owned())
            .or_default()
            .entry(target.to_owned())
            .or_default()
            .insert(text.to_owned(), response);

        debug!("Cached response for {} -> {}", source, target);
        Ok(())
    }

    /// Total number of cached (source, target, text) entries
    pub async fn entry_count(&self) -> Result<usize> {
        let mut state = self.state.write().await;
        self.ensure_loaded(&mut state)?;

        Ok(state
            .entries
            .values()
            .flat_map(|targets| targets.values())
            .map(|texts| texts.len())
            .sum())
    }

    /// Entry counts per (source, target) language pair, in key order
    pub async fn pair_counts(&self) -> Result<Vec<(String, String, usize)>> {
        let mut state = self.state.write().await;
        self.ensure_loaded(&mut state)?;

        let mut counts = Vec::new();
        for (source, targets) in &state.entries {
            for (target, texts) in targets {
                counts.push((source.clone(), target.clone(), texts.len()));
            }
        }
        Ok(counts)
    }

    /// Write the whole mapping to the cache file as pretty-printed JSON
    ///
    /// Creates the storage directory first (mode 0775 on Unix). The persisted
    /// mapping is read before writing if this instance never loaded it, so an
    /// early flush cannot truncate entries written by an earlier process.
    pub async fn flush(&self) -> Result<()> {
        let mut state = self.state.write().await;
        self.ensure_loaded(&mut state)?;

        if let Some(dir) = self.file.parent() {
            create_storage_dir(dir)?;
        }

        let content = serde_json::to_string_pretty(&state.entries)?;
        std::fs::write(&self.file, content)?;

        let total: usize = state
            .entries
            .values()
            .flat_map(|targets| targets.values())
            .map(|texts| texts.len())
            .sum();
        info!("Flushed {} cached responses to {}", total, self.file.display());
        Ok(())
    }

    /// Read the backing file into `state` unless that already happened
    fn ensure_loaded(&self, state: &mut CacheState) -> Result<()> {
        if state.loaded {
            return Ok(());
        }

        if self.file.exists() {
            let content = std::fs::read_to_string(&self.file)?;
            state.entries = serde_json::from_str(&content)?;

            let total: usize = state
                .entries
                .values()
                .flat_map(|targets| targets.values())
                .map(|texts| texts.len())
                .sum();
            info!("Loaded {} cached responses from {}", total, self.file.display());
        }

        state.loaded = true;
        Ok(())
    }
}

/// Create the storage directory with mode 0775 on Unix
#[cfg(unix)]
fn create_storage_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o775)
        .create(dir)
}

/// Create the storage directory
#[cfg(not(unix))]
fn create_storage_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

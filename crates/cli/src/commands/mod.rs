pub mod admin;
pub mod cache;
pub mod catalog;
pub mod community;

use std::{sync::Arc, time::Duration};

use anyhow::{Context as _, Result};
use gamehub_core::{
    cache::{FileStore, GameCache},
    AppConfig, GameCatalog, HttpSource, RecentSearches,
};
use tracing::info;

use crate::source::AppSource;

/// Everything a command needs, built once from configuration.
pub struct Context {
    pub source: Arc<AppSource>,
    pub cache: GameCache,
    pub recent: RecentSearches,
    pub search_debounce: Duration,
}

impl Context {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let source = match &config.data_url {
            Some(url) => {
                info!("reading catalog from {url}");
                AppSource::Http(HttpSource::new(url).context("invalid data_url")?)
            }
            None => {
                info!("reading catalog from {}", config.data_dir.display());
                AppSource::File(gamehub_core::FileSource::new(&config.data_dir))
            }
        };
        let store = Arc::new(FileStore::new(&config.cache_root));
        let cache = GameCache::new(store.clone()).with_ttl(config.cache_ttl());
        Ok(Self {
            source: Arc::new(source),
            cache,
            recent: RecentSearches::new(store),
            search_debounce: config.search_debounce(),
        })
    }

    /// Catalog with its games loaded. A load error is printed but not fatal
    /// when stale data was served.
    pub async fn catalog(&self) -> Result<GameCatalog<AppSource>> {
        let catalog = GameCatalog::new(Arc::clone(&self.source), self.cache.clone());
        catalog.load().await;
        let view = catalog.view();
        if let Some(err) = view.error {
            if view.games.is_empty() {
                anyhow::bail!("failed to load games: {err}");
            }
            eprintln!("warning: showing cached games ({err})");
        }
        Ok(catalog)
    }
}

pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

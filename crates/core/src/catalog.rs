//! The game catalog as seen by a page: the full list, the filtered view and
//! the loading/error state that goes with them.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{error, info};

use crate::{
    cache::GameCache,
    downloads::parse_downloads,
    error::{CatalogError, CatalogResult},
    filter::{self, FacetCount, FilterOptions, Suggestion},
    models::Game,
    resource::DataSource,
};

/// Snapshot of the catalog state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogView {
    /// Everything the cache returned.
    pub games: Vec<Game>,
    /// `games` with the current filters applied.
    pub filtered_games: Vec<Game>,
    /// True until the first load finishes.
    pub loading: bool,
    /// Last load failure, if any.
    pub error: Option<String>,
}

/// Shared, cloneable catalog handle.
///
/// Errors never escape [`GameCatalog::load`]; they are recorded in
/// [`CatalogView::error`] instead.
pub struct GameCatalog<S> {
    source: Arc<S>,
    cache: GameCache,
    state: Arc<RwLock<CatalogState>>,
}

struct CatalogState {
    games: Vec<Game>,
    filtered: Vec<Game>,
    filters: FilterOptions,
    loading: bool,
    error: Option<String>,
}

impl CatalogState {
    fn recompute(&mut self) {
        self.filtered = filter::apply(&self.games, &self.filters);
    }
}

impl<S> Clone for GameCatalog<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            cache: self.cache.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: DataSource> GameCatalog<S> {
    /// Catalog reading games from `source` through `cache`. Nothing is fetched
    /// until [`GameCatalog::load`].
    pub fn new(source: Arc<S>, cache: GameCache) -> Self {
        Self {
            source,
            cache,
            state: Arc::new(RwLock::new(CatalogState {
                games: Vec::new(),
                filtered: Vec::new(),
                filters: FilterOptions::default(),
                loading: true,
                error: None,
            })),
        }
    }

    /// Start with `filters` instead of the empty filter.
    pub fn with_filters(self, filters: FilterOptions) -> Self {
        self.state.write().filters = filters;
        self
    }

    /// Fetch the list through the cache and recompute the filtered view.
    ///
    /// A stale fallback keeps the old list and records the fetch error; a hard
    /// failure leaves the list untouched.
    pub async fn load(&self) {
        let outcome = self.cache.read(self.source.as_ref()).await;

        let mut state = self.state.write();
        match outcome {
            Ok(outcome) => {
                let (games, stale_error) = outcome.into_parts();
                state.games = games;
                state.error = stale_error.map(|err| err.to_string());
                state.recompute();
            }
            Err(err) => {
                error!("failed to load games: {err}");
                state.error = Some(err.to_string());
            }
        }
        state.loading = false;
    }

    /// Drop the cached envelope and load again.
    pub async fn refresh(&self) {
        if let Err(err) = self.cache.invalidate() {
            error!("failed to clear games cache: {err}");
        }
        self.load().await;
    }

    /// Replace the filters and recompute the view.
    pub fn set_filters(&self, filters: FilterOptions) {
        let mut state = self.state.write();
        state.filters = filters;
        state.recompute();
    }

    /// Replace the list in memory, e.g. after an admin edit, keeping the filters.
    pub fn replace_games(&self, games: Vec<Game>) {
        let mut state = self.state.write();
        state.games = games;
        state.recompute();
    }

    /// Current filters.
    pub fn filters(&self) -> FilterOptions {
        self.state.read().filters.clone()
    }

    /// Full snapshot.
    pub fn view(&self) -> CatalogView {
        let state = self.state.read();
        CatalogView {
            games: state.games.clone(),
            filtered_games: state.filtered.clone(),
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    /// Unfiltered list.
    pub fn games(&self) -> Vec<Game> {
        self.state.read().games.clone()
    }

    /// Filtered list.
    pub fn filtered_games(&self) -> Vec<Game> {
        self.state.read().filtered.clone()
    }

    /// True until the first load completes.
    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    /// Last recorded error.
    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    /// Game with the given slug.
    pub fn find_by_slug(&self, slug: &str) -> CatalogResult<Game> {
        self.state
            .read()
            .games
            .iter()
            .find(|game| game.slug == slug)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("game", slug))
    }

    /// Game with the given id.
    pub fn find_by_id(&self, id: &str) -> CatalogResult<Game> {
        self.state
            .read()
            .games
            .iter()
            .find(|game| game.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("game", id))
    }

    /// Games per category over the full list.
    pub fn categories(&self) -> Vec<FacetCount> {
        filter::category_counts(&self.state.read().games)
    }

    /// Games per platform over the full list.
    pub fn platforms(&self) -> Vec<FacetCount> {
        filter::platform_counts(&self.state.read().games)
    }

    /// Featured games, in list order.
    pub fn featured(&self, limit: usize) -> Vec<Game> {
        self.state
            .read()
            .games
            .iter()
            .filter(|game| game.featured)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Search-box suggestions over the full list.
    pub fn suggestions(&self, term: &str) -> Vec<Suggestion> {
        filter::suggest(&self.state.read().games, term)
    }

    /// Sum of parsed download counts over the filtered view.
    pub fn total_downloads(&self) -> f64 {
        self.state
            .read()
            .filtered
            .iter()
            .map(|game| parse_downloads(&game.downloads))
            .sum()
    }

    /// External download URL for `slug`. The site itself transfers nothing.
    pub fn download_link(&self, slug: &str) -> CatalogResult<String> {
        let game = self.find_by_slug(slug)?;
        info!(game = %game.title, "download tracked");
        Ok(game.download_link)
    }
}

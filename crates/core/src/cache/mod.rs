//! Read-through cache for the game list with a fixed time-to-live.
//!
//! A single envelope `{data, timestamp}` lives under [`GAMES_CACHE_KEY`].
//! Fresh envelopes are served without touching the network; expired ones are
//! replaced by a fetch, and kept as a fallback when that fetch fails.

/// Key-value stores the cache can persist into.
pub mod store;

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    error::{CatalogError, CatalogResult},
    models::Game,
    resource::{load_records, DataSource, Resource},
};

pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Well-known key of the game list envelope.
pub const GAMES_CACHE_KEY: &str = "games_cache";

/// Validity window of a cached envelope.
pub const DEFAULT_TTL: Duration = Duration::from_millis(300_000);

/// Source of the current time in epoch milliseconds.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Cached payload plus its capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// The full game list as last fetched.
    pub data: Vec<Game>,
    /// Capture time in epoch milliseconds.
    pub timestamp: i64,
}

impl Envelope {
    /// Milliseconds elapsed since capture.
    pub fn age_millis(&self, now: i64) -> i64 {
        now - self.timestamp
    }

    /// True while the envelope is younger than `ttl`.
    pub fn is_fresh(&self, now: i64, ttl: Duration) -> bool {
        let ttl = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        self.age_millis(now) < ttl
    }
}

/// Where the data returned by [`GameCache::read`] came from.
#[derive(Debug)]
pub enum CacheOutcome {
    /// Served from a fresh envelope; no fetch was made.
    Hit(Vec<Game>),
    /// Fetched now; the envelope was replaced.
    Fetched(Vec<Game>),
    /// The fetch failed and an older envelope was served instead.
    Stale {
        /// Data from the expired envelope.
        games: Vec<Game>,
        /// Why the fetch failed.
        error: CatalogError,
    },
}

impl CacheOutcome {
    /// The games, regardless of origin.
    pub fn games(&self) -> &[Game] {
        match self {
            CacheOutcome::Hit(games) | CacheOutcome::Fetched(games) => games,
            CacheOutcome::Stale { games, .. } => games,
        }
    }

    /// True for [`CacheOutcome::Stale`].
    pub fn is_stale(&self) -> bool {
        matches!(self, CacheOutcome::Stale { .. })
    }

    /// Split into the games and the fetch error, if one was swallowed.
    pub fn into_parts(self) -> (Vec<Game>, Option<CatalogError>) {
        match self {
            CacheOutcome::Hit(games) | CacheOutcome::Fetched(games) => (games, None),
            CacheOutcome::Stale { games, error } => (games, Some(error)),
        }
    }
}

/// Memoising read-through cache over a [`KeyValueStore`].
///
/// Concurrent reads on an expired envelope may each fetch; fetches are
/// idempotent so the last write wins.
#[derive(Clone)]
pub struct GameCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl GameCache {
    /// Cache persisting into `store` with the default TTL and wall-clock time.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            ttl: DEFAULT_TTL,
        }
    }

    /// Override the validity window.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Override the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validity window.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current time according to the cache clock.
    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// The stored envelope, fresh or not. Unreadable envelopes count as absent.
    pub fn envelope(&self) -> Option<Envelope> {
        let raw = match self.store.get(GAMES_CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!("failed to read cached games: {err}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(envelope) => Some(envelope),
            Err(err) => {
                warn!("discarding corrupt games cache: {err}");
                None
            }
        }
    }

    /// Return the game list, fetching from `source` only when the envelope is
    /// missing or expired.
    ///
    /// A failed fetch falls back to any stored envelope, however old. Only when
    /// nothing is stored does the error propagate.
    pub async fn read<S: DataSource>(&self, source: &S) -> CatalogResult<CacheOutcome> {
        let cached = self.envelope();
        let now = self.clock.now_millis();

        if let Some(envelope) = &cached {
            if envelope.is_fresh(now, self.ttl) {
                debug!(
                    "serving {} cached games ({} ms old)",
                    envelope.data.len(),
                    envelope.age_millis(now)
                );
                return Ok(CacheOutcome::Hit(envelope.data.clone()));
            }
        }

        match load_records::<Game, S>(source, Resource::Games).await {
            Ok(games) => {
                info!("fetched {} games", games.len());
                self.write(&games);
                Ok(CacheOutcome::Fetched(games))
            }
            Err(error) => match cached {
                Some(envelope) => {
                    warn!(
                        "fetch failed, serving {} stale games: {error}",
                        envelope.data.len()
                    );
                    Ok(CacheOutcome::Stale {
                        games: envelope.data,
                        error,
                    })
                }
                None => Err(error),
            },
        }
    }

    /// Delete the envelope so the next read fetches.
    pub fn invalidate(&self) -> CatalogResult<()> {
        info!("invalidating games cache");
        self.store.remove(GAMES_CACHE_KEY)
    }

    fn write(&self, games: &[Game]) {
        let envelope = Envelope {
            data: games.to_vec(),
            timestamp: self.clock.now_millis(),
        };
        let result = serde_json::to_string(&envelope)
            .map_err(|err| CatalogError::Store(err.to_string()))
            .and_then(|serialized| self.store.set(GAMES_CACHE_KEY, &serialized));
        if let Err(err) = result {
            warn!("failed to cache games: {err}");
        }
    }
}

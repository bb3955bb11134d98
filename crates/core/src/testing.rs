//! In-memory doubles shared by the unit tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering},
        Arc,
    },
};

use parking_lot::RwLock;

use crate::{
    cache::Clock,
    error::{CatalogError, CatalogResult},
    models::Game,
    resource::{DataSource, Resource},
};

/// Serves canned documents and counts fetches.
#[derive(Clone, Default)]
pub struct StaticSource {
    documents: Arc<RwLock<HashMap<Resource, Vec<u8>>>>,
    fetches: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl StaticSource {
    pub fn with_games(games: Vec<Game>) -> Self {
        let source = Self::default();
        source.set_games(games);
        source
    }

    pub fn set_games(&self, games: Vec<Game>) {
        let bytes = serde_json::to_vec(&games).expect("games serialize");
        self.documents.write().insert(Resource::Games, bytes);
    }

    pub fn set_document(&self, resource: Resource, json: &str) {
        self.documents
            .write()
            .insert(resource, json.as_bytes().to_vec());
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl DataSource for StaticSource {
    async fn fetch(&self, resource: Resource) -> CatalogResult<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::Status {
                resource,
                status: 503,
            });
        }
        let document = self.documents.read().get(&resource).cloned();
        document.ok_or(CatalogError::Status {
            resource,
            status: 404,
        })
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

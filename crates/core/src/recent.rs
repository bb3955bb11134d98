//! Recently submitted search terms, kept in a [`KeyValueStore`].

use std::sync::Arc;

use tracing::warn;

use crate::{
    cache::KeyValueStore,
    error::{CatalogError, CatalogResult},
};

/// Store key of the term list.
pub const RECENT_SEARCHES_KEY: &str = "recent_searches";
/// Terms kept, newest first.
pub const RECENT_SEARCHES_LIMIT: usize = 5;

/// Newest-first, de-duplicated list of search terms.
#[derive(Clone)]
pub struct RecentSearches {
    store: Arc<dyn KeyValueStore>,
}

impl RecentSearches {
    /// List persisted in `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored terms, newest first. An unreadable list counts as empty.
    pub fn list(&self) -> Vec<String> {
        let raw = match self.store.get(RECENT_SEARCHES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("failed to read recent searches: {err}");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(mut terms) => {
                terms.truncate(RECENT_SEARCHES_LIMIT);
                terms
            }
            Err(err) => {
                warn!("discarding corrupt recent searches: {err}");
                Vec::new()
            }
        }
    }

    /// Move `term` to the front and return the updated list. Blank terms are
    /// not recorded.
    pub fn record(&self, term: &str) -> CatalogResult<Vec<String>> {
        let term = term.trim();
        let mut terms = self.list();
        if term.is_empty() {
            return Ok(terms);
        }
        terms.retain(|existing| existing != term);
        terms.insert(0, term.to_string());
        terms.truncate(RECENT_SEARCHES_LIMIT);

        let serialized =
            serde_json::to_string(&terms).map_err(|err| CatalogError::Store(err.to_string()))?;
        self.store.set(RECENT_SEARCHES_KEY, &serialized)?;
        Ok(terms)
    }

    /// Forget every term.
    pub fn clear(&self) -> CatalogResult<()> {
        self.store.remove(RECENT_SEARCHES_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{FileStore, MemoryStore};
    use tempfile::tempdir;

    #[test]
    fn newest_first_without_duplicates() -> CatalogResult<()> {
        let recent = RecentSearches::new(Arc::new(MemoryStore::new()));
        recent.record("subway")?;
        recent.record("racing")?;
        let terms = recent.record(" subway ")?;
        assert_eq!(terms, vec!["subway", "racing"]);
        assert_eq!(recent.list(), terms);
        Ok(())
    }

    #[test]
    fn keeps_only_five_and_ignores_blank_terms() -> CatalogResult<()> {
        let recent = RecentSearches::new(Arc::new(MemoryStore::new()));
        for term in ["a1", "b2", "c3", "d4", "e5", "f6"] {
            recent.record(term)?;
        }
        assert_eq!(recent.record("   ")?, vec!["f6", "e5", "d4", "c3", "b2"]);
        Ok(())
    }

    #[test]
    fn corrupt_list_reads_as_empty() -> CatalogResult<()> {
        let store = Arc::new(MemoryStore::new());
        store.set(RECENT_SEARCHES_KEY, "not json")?;
        let recent = RecentSearches::new(store);
        assert!(recent.list().is_empty());
        assert_eq!(recent.record("pac")?, vec!["pac"]);
        Ok(())
    }

    #[test]
    fn survives_across_file_stores() -> anyhow::Result<()> {
        let dir = tempdir()?;
        RecentSearches::new(Arc::new(FileStore::new(dir.path()))).record("asphalt")?;

        let reopened = RecentSearches::new(Arc::new(FileStore::new(dir.path())));
        assert_eq!(reopened.list(), vec!["asphalt"]);
        reopened.clear()?;
        assert!(reopened.list().is_empty());
        Ok(())
    }
}

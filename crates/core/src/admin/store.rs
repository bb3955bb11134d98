use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::RwLock;
use tracing::info;

use super::validation::GameDraft;
use crate::{
    cache::{Clock, SystemClock},
    error::{CatalogError, CatalogResult},
    filter::SortOrder,
    models::{Game, GameStatus},
};

/// Rows per page in the admin game table.
pub const ITEMS_PER_PAGE: usize = 10;

/// Admin table filters. `"all"` or an empty category means no category filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminQuery {
    /// Case-insensitive substring of title, description or category.
    pub search: String,
    /// Exact category match.
    pub category: String,
    /// Only games with this status.
    pub status: Option<GameStatus>,
    /// Row order.
    pub sort: SortOrder,
}

impl AdminQuery {
    fn matches(&self, game: &Game) -> bool {
        let search = self.search.trim().to_lowercase();
        let matches_search = search.is_empty()
            || game.title.to_lowercase().contains(&search)
            || game.description.to_lowercase().contains(&search)
            || game.category.to_lowercase().contains(&search);
        let category = self.category.trim();
        let matches_category =
            category.is_empty() || category == "all" || game.category == category;
        let matches_status = self.status.map_or(true, |status| game.status == status);
        matches_search && matches_category && matches_status
    }
}

/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminStats {
    /// All games.
    pub total: usize,
    /// Games with status published.
    pub published: usize,
    /// Games with status draft.
    pub drafts: usize,
    /// Featured games.
    pub featured: usize,
}

/// One page of rows. `page` is 1-based and clamped into range.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Rows on this page.
    pub items: Vec<T>,
    /// Page number actually returned.
    pub page: usize,
    /// Number of pages, at least 1.
    pub total_pages: usize,
    /// Rows across every page.
    pub total_items: usize,
}

impl<T: Clone> Page<T> {
    /// Slice `rows` into the requested page.
    pub fn of(rows: &[T], page: usize) -> Self {
        let total_pages = rows.len().div_ceil(ITEMS_PER_PAGE).max(1);
        let page = page.clamp(1, total_pages);
        let items = rows
            .iter()
            .skip((page - 1) * ITEMS_PER_PAGE)
            .take(ITEMS_PER_PAGE)
            .cloned()
            .collect();
        Self {
            items,
            page,
            total_pages,
            total_items: rows.len(),
        }
    }
}

/// In-memory game table behind the admin pages.
///
/// Edits are held here only; nothing is written back to the static data.
#[derive(Clone)]
pub struct AdminStore {
    games: Arc<RwLock<Vec<Game>>>,
    clock: Arc<dyn Clock>,
}

impl AdminStore {
    /// Store seeded with `games`.
    pub fn new(games: Vec<Game>) -> Self {
        Self {
            games: Arc::new(RwLock::new(games)),
            clock: Arc::new(SystemClock),
        }
    }

    /// Override the time source used for `updatedAt`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Every game in insertion order.
    pub fn games(&self) -> Vec<Game> {
        self.games.read().clone()
    }

    /// Game with `id`.
    pub fn get(&self, id: &str) -> CatalogResult<Game> {
        self.games
            .read()
            .iter()
            .find(|game| game.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("game", id))
    }

    /// Validate `draft` and append it with the next numeric id.
    pub fn create(&self, draft: GameDraft) -> CatalogResult<Game> {
        let draft = draft.with_generated_slug();
        draft.validate().into_result()?;

        let mut games = self.games.write();
        ensure_unique_slug(&games, draft.slug.trim(), None)?;
        let id = next_id(&games);
        let game = draft.into_game(id, self.now());
        games.push(game.clone());
        info!("game created: {} ({})", game.title, game.id);
        Ok(game)
    }

    /// Replace the editable fields of game `id`.
    pub fn update(&self, id: &str, draft: GameDraft) -> CatalogResult<Game> {
        let draft = draft.with_generated_slug();
        draft.validate().into_result()?;

        let mut games = self.games.write();
        let index = position(&games, id)?;
        ensure_unique_slug(&games, draft.slug.trim(), Some(id))?;
        let game = draft.into_game(id.to_string(), self.now());
        games[index] = game.clone();
        info!("game updated: {} ({})", game.title, game.id);
        Ok(game)
    }

    /// Remove game `id` and return it.
    pub fn delete(&self, id: &str) -> CatalogResult<Game> {
        let mut games = self.games.write();
        let index = position(&games, id)?;
        let removed = games.remove(index);
        info!("game deleted: {} ({})", removed.title, removed.id);
        Ok(removed)
    }

    /// Flip the featured flag.
    pub fn toggle_featured(&self, id: &str) -> CatalogResult<Game> {
        self.modify(id, |game| game.featured = !game.featured)
    }

    /// Flip between draft and published.
    pub fn toggle_status(&self, id: &str) -> CatalogResult<Game> {
        self.modify(id, |game| game.status = game.status.toggled())
    }

    /// Dashboard counters.
    pub fn stats(&self) -> AdminStats {
        let games = self.games.read();
        AdminStats {
            total: games.len(),
            published: games
                .iter()
                .filter(|game| game.status == GameStatus::Published)
                .count(),
            drafts: games
                .iter()
                .filter(|game| game.status == GameStatus::Draft)
                .count(),
            featured: games.iter().filter(|game| game.featured).count(),
        }
    }

    /// Matching games in `query.sort` order.
    pub fn query(&self, query: &AdminQuery) -> Vec<Game> {
        let mut rows: Vec<Game> = self
            .games
            .read()
            .iter()
            .filter(|game| query.matches(game))
            .cloned()
            .collect();
        rows.sort_by(|a, b| query.sort.compare(a, b));
        rows
    }

    /// Page `page` of the query result.
    pub fn page(&self, query: &AdminQuery, page: usize) -> Page<Game> {
        Page::of(&self.query(query), page)
    }

    fn modify(&self, id: &str, change: impl FnOnce(&mut Game)) -> CatalogResult<Game> {
        let now = self.now();
        let mut games = self.games.write();
        let index = position(&games, id)?;
        let game = &mut games[index];
        change(game);
        game.updated_at = now;
        Ok(game.clone())
    }

    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.clock.now_millis())
            .single()
            .unwrap_or_else(Utc::now)
    }
}

fn position(games: &[Game], id: &str) -> CatalogResult<usize> {
    games
        .iter()
        .position(|game| game.id == id)
        .ok_or_else(|| CatalogError::not_found("game", id))
}

fn ensure_unique_slug(games: &[Game], slug: &str, except_id: Option<&str>) -> CatalogResult<()> {
    let taken = games
        .iter()
        .any(|game| game.slug == slug && Some(game.id.as_str()) != except_id);
    if taken {
        return Err(CatalogError::Duplicate {
            field: "slug",
            value: slug.to_string(),
        });
    }
    Ok(())
}

fn next_id(games: &[Game]) -> String {
    let max = games
        .iter()
        .filter_map(|game| game.id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    (max + 1).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::fixtures::{date, game},
        testing::ManualClock,
    };

    fn store() -> AdminStore {
        let mut subway = game("1", "Subway Surfers", "arcade");
        subway.downloads = "1B+".to_string();
        subway.featured = true;
        subway.updated_at = date(2024, 3, 1);
        subway.description = "Dash through the tracks".to_string();
        let mut asphalt = game("2", "Asphalt 9", "racing");
        asphalt.downloads = "100M+".to_string();
        asphalt.status = GameStatus::Draft;
        asphalt.updated_at = date(2024, 2, 1);
        asphalt.description = "Street racing".to_string();
        AdminStore::new(vec![subway, asphalt])
            .with_clock(Arc::new(ManualClock::new(1_717_200_000_000)))
    }

    fn draft(title: &str) -> GameDraft {
        GameDraft {
            title: title.to_string(),
            description: "A game".to_string(),
            download_link: "https://downloads.example.com/new".to_string(),
            size: "80 MB".to_string(),
            version: "1.0".to_string(),
            ..GameDraft::default()
        }
    }

    #[test]
    fn create_assigns_next_id_and_slug() -> CatalogResult<()> {
        let store = store();
        let created = store.create(draft("Temple Run 2"))?;
        assert_eq!(created.id, "3");
        assert_eq!(created.slug, "temple-run-2");
        assert_eq!(created.status, GameStatus::Draft);
        assert_eq!(created.updated_at.timestamp_millis(), 1_717_200_000_000);
        assert_eq!(store.stats().total, 3);
        Ok(())
    }

    #[test]
    fn create_rejects_invalid_and_duplicate_drafts() {
        let store = store();
        match store.create(GameDraft::default()) {
            Err(CatalogError::Validation(errors)) => {
                assert_eq!(errors.get("title"), Some("Title is required"))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(matches!(
            store.create(draft("Subway Surfers")),
            Err(CatalogError::Duplicate { field: "slug", .. })
        ));
        assert_eq!(store.games().len(), 2);
    }

    #[test]
    fn update_keeps_id_and_allows_own_slug() -> CatalogResult<()> {
        let store = store();
        let mut edit = GameDraft::from_game(&store.get("1")?);
        edit.version = "3.0".to_string();
        let updated = store.update("1", edit)?;
        assert_eq!(updated.id, "1");
        assert_eq!(updated.version, "3.0");

        let mut clash = GameDraft::from_game(&store.get("2")?);
        clash.slug = "subway-surfers".to_string();
        assert!(matches!(
            store.update("2", clash),
            Err(CatalogError::Duplicate { field: "slug", .. })
        ));
        assert!(matches!(
            store.update("9", draft("Nope")),
            Err(CatalogError::NotFound { .. })
        ));
        Ok(())
    }

    #[test]
    fn toggles_and_stats() -> CatalogResult<()> {
        let store = store();
        assert_eq!(
            store.stats(),
            AdminStats {
                total: 2,
                published: 1,
                drafts: 1,
                featured: 1
            }
        );
        assert!(!store.toggle_featured("1")?.featured);
        assert_eq!(store.toggle_status("2")?.status, GameStatus::Published);
        assert_eq!(store.stats().published, 2);
        store.delete("1")?;
        assert_eq!(store.stats().total, 1);
        Ok(())
    }

    #[test]
    fn query_filters_and_sorts() {
        let store = store();
        let all = AdminQuery {
            category: "all".to_string(),
            sort: SortOrder::Oldest,
            ..AdminQuery::default()
        };
        let titles: Vec<String> = store.query(&all).into_iter().map(|g| g.title).collect();
        assert_eq!(titles, vec!["Asphalt 9", "Subway Surfers"]);

        let drafts = AdminQuery {
            status: Some(GameStatus::Draft),
            ..AdminQuery::default()
        };
        assert_eq!(store.query(&drafts).len(), 1);

        let search = AdminQuery {
            search: "RACING".to_string(),
            ..AdminQuery::default()
        };
        assert_eq!(store.query(&search)[0].id, "2");
    }

    #[test]
    fn pages_hold_ten_rows() -> CatalogResult<()> {
        let store = AdminStore::new(Vec::new());
        for n in 0..23 {
            store.create(draft(&format!("Game {n}")))?;
        }
        let query = AdminQuery::default();
        let first = store.page(&query, 1);
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_items, 23);

        let last = store.page(&query, 7);
        assert_eq!(last.page, 3);
        assert_eq!(last.items.len(), 3);

        let empty = Page::<Game>::of(&[], 0);
        assert_eq!((empty.page, empty.total_pages), (1, 1));
        Ok(())
    }
}

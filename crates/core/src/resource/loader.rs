use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use super::{load_records, DataSource, Resource};
use crate::{
    error::CatalogResult,
    models::{Category, Game, Notification, PlatformInfo, WhatsAppChannel},
};

/// Thread-safe loader for the read-only category and platform lists.
///
/// Each list is fetched once and then served from memory.
pub struct ResourceLoader<S> {
    source: Arc<S>,
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    categories: Option<Vec<Category>>,
    platforms: Option<Vec<PlatformInfo>>,
}

impl<S> Clone for ResourceLoader<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: DataSource> ResourceLoader<S> {
    /// Loader reading through `source`.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    /// Underlying data source.
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Drop the memoised lists so the next call fetches again.
    pub fn refresh(&self) {
        let mut inner = self.inner.write();
        inner.categories = None;
        inner.platforms = None;
    }

    /// All categories, fetched on first use.
    pub async fn categories(&self) -> CatalogResult<Vec<Category>> {
        let cached = self.inner.read().categories.clone();
        if let Some(categories) = cached {
            return Ok(categories);
        }
        let categories: Vec<Category> =
            load_records(self.source.as_ref(), Resource::Categories).await?;
        self.inner.write().categories = Some(categories.clone());
        Ok(categories)
    }

    /// All platforms, fetched on first use.
    pub async fn platforms(&self) -> CatalogResult<Vec<PlatformInfo>> {
        let cached = self.inner.read().platforms.clone();
        if let Some(platforms) = cached {
            return Ok(platforms);
        }
        let platforms: Vec<PlatformInfo> =
            load_records(self.source.as_ref(), Resource::Platforms).await?;
        self.inner.write().platforms = Some(platforms.clone());
        Ok(platforms)
    }

    /// The notifications document. Not memoised; the list is mutable once loaded.
    pub async fn notifications(&self) -> CatalogResult<Vec<Notification>> {
        load_records(self.source.as_ref(), Resource::Notifications).await
    }

    /// The WhatsApp channels document.
    pub async fn channels(&self) -> CatalogResult<Vec<WhatsAppChannel>> {
        load_records(self.source.as_ref(), Resource::WhatsAppChannels).await
    }

    /// Category entry with `slug`, compared case-insensitively.
    pub async fn category(&self, slug: &str) -> CatalogResult<Option<Category>> {
        let categories = self.categories().await?;
        Ok(categories
            .into_iter()
            .find(|category| category.slug.eq_ignore_ascii_case(slug)))
    }

    /// Platform entry with `slug`.
    pub async fn platform(&self, slug: &str) -> CatalogResult<Option<PlatformInfo>> {
        let platforms = self.platforms().await?;
        Ok(platforms
            .into_iter()
            .find(|platform| platform.slug.eq_ignore_ascii_case(slug)))
    }
}

/// Games whose category has no entry in `categories`.
///
/// The static documents are maintained by hand, so dangling references are
/// reported instead of rejected.
pub fn orphaned_games<'a>(games: &'a [Game], categories: &[Category]) -> Vec<&'a Game> {
    let orphans: Vec<&Game> = games
        .iter()
        .filter(|game| {
            !categories
                .iter()
                .any(|category| category.slug.eq_ignore_ascii_case(&game.category))
        })
        .collect();
    for game in &orphans {
        warn!("game {} references unknown category {}", game.slug, game.category);
    }
    orphans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::fixtures::game,
        resource::FileSource,
    };
    use anyhow::Result;
    use tempfile::tempdir;

    fn write_fixture(root: &std::path::Path) -> Result<()> {
        std::fs::create_dir_all(root.join("data"))?;
        std::fs::write(
            root.join("data/categories.json"),
            r##"[
                {"id":"1","name":"Arcade","slug":"arcade","icon":"🕹️","description":"Quick fun","gameCount":2,"color":"#f00"},
                {"id":"2","name":"Racing","slug":"racing","icon":"🏎️","description":"Fast","gameCount":1,"color":"#0f0"}
            ]"##,
        )?;
        std::fs::write(
            root.join("data/platforms.json"),
            r#"[{"id":"1","name":"Android","slug":"android","gameCount":3}]"#,
        )?;
        Ok(())
    }

    #[tokio::test]
    async fn lists_are_memoised_until_refresh() -> Result<()> {
        let dir = tempdir()?;
        write_fixture(dir.path())?;
        let loader = ResourceLoader::new(Arc::new(FileSource::new(dir.path())));

        assert_eq!(loader.categories().await?.len(), 2);
        std::fs::remove_file(dir.path().join("data/categories.json"))?;
        assert_eq!(loader.categories().await?.len(), 2);

        loader.refresh();
        assert!(loader.categories().await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn looks_up_by_slug() -> Result<()> {
        let dir = tempdir()?;
        write_fixture(dir.path())?;
        let loader = ResourceLoader::new(Arc::new(FileSource::new(dir.path())));

        let racing = loader.category("Racing").await?;
        assert_eq!(racing.map(|category| category.name), Some("Racing".to_string()));
        assert!(loader.platform("pc").await?.is_none());
        assert_eq!(loader.platform("android").await?.map(|p| p.game_count), Some(3));
        Ok(())
    }

    #[tokio::test]
    async fn decodes_notifications_and_channels() -> Result<()> {
        let dir = tempdir()?;
        write_fixture(dir.path())?;
        std::fs::write(
            dir.path().join("data/notifications.json"),
            r#"[{"id":"1","type":"announcement","title":"Hi","message":"Welcome","icon":"📢","timestamp":"2024-01-20T10:30:00Z","read":false}]"#,
        )?;
        let loader = ResourceLoader::new(Arc::new(FileSource::new(dir.path())));

        let notifications = loader.notifications().await?;
        assert_eq!(notifications[0].title, "Hi");
        assert!(loader.channels().await.is_err());
        Ok(())
    }

    #[test]
    fn reports_orphaned_categories() {
        let categories = vec![Category {
            id: "1".to_string(),
            name: "Arcade".to_string(),
            slug: "arcade".to_string(),
            icon: String::new(),
            description: String::new(),
            game_count: 1,
            color: String::new(),
        }];
        let games = vec![game("1", "Pac-Man", "Arcade"), game("2", "FIFA", "soccer")];
        let orphans = orphaned_games(&games, &categories);
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].title, "FIFA");
    }
}

//! Static JSON documents and the sources that serve them.

/// Typed access to the read-only reference lists.
pub mod loader;
/// HTTP and filesystem data sources.
pub mod source;

use std::{fmt, future::Future};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CatalogError, CatalogResult};

pub use loader::ResourceLoader;
pub use source::{FileSource, HttpSource};

/// The static documents bundled with the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// `data/games.json`
    Games,
    /// `data/categories.json`
    Categories,
    /// `data/platforms.json`
    Platforms,
    /// `data/notifications.json`
    Notifications,
    /// `data/whatsapp-channels.json`
    WhatsAppChannels,
}

impl Resource {
    /// Path relative to the site root.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Games => "data/games.json",
            Resource::Categories => "data/categories.json",
            Resource::Platforms => "data/platforms.json",
            Resource::Notifications => "data/notifications.json",
            Resource::WhatsAppChannels => "data/whatsapp-channels.json",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Somewhere the static documents can be read from.
///
/// Reads are unauthenticated, unpaginated and never retried.
pub trait DataSource: Send + Sync {
    /// Raw bytes of `resource`.
    fn fetch(&self, resource: Resource) -> impl Future<Output = CatalogResult<Vec<u8>>> + Send;
}

/// Fetch `resource` from `source` and decode it as JSON.
pub async fn load_json<T, S>(source: &S, resource: Resource) -> CatalogResult<T>
where
    T: DeserializeOwned,
    S: DataSource,
{
    let bytes = source.fetch(resource).await?;
    debug!("decoding {} ({} bytes)", resource, bytes.len());
    serde_json::from_slice(&bytes).map_err(|source| CatalogError::Decode { resource, source })
}

/// Fetch a JSON array and decode each element on its own.
///
/// The documents are edited by hand, so an element that does not match `T`
/// is logged and skipped instead of failing the whole list. A document that
/// is not an array at all is still a [`CatalogError::Decode`].
pub async fn load_records<T, S>(source: &S, resource: Resource) -> CatalogResult<Vec<T>>
where
    T: DeserializeOwned,
    S: DataSource,
{
    let values: Vec<Value> = load_json(source, resource).await?;
    let total = values.len();
    let records: Vec<T> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("skipping {resource} entry {index}: {err}");
                None
            }
        })
        .collect();
    if records.len() < total {
        warn!("{resource}: kept {} of {total} entries", records.len());
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::Game, testing::StaticSource};

    #[tokio::test]
    async fn bad_records_are_skipped() -> CatalogResult<()> {
        let source = StaticSource::default();
        source.set_document(
            Resource::Games,
            r#"[
                {"id":"1","slug":"pac-man","title":"Pac-Man","category":"arcade","platform":["android"],"downloadLink":"https://example.com/1","updatedAt":"2024-01-01"},
                {"id":"2","slug":"web-only","title":"Web Only","category":"arcade","platform":["web"],"downloadLink":"https://example.com/2","updatedAt":"2024-01-01"},
                {"id":"3","slug":"no-date","title":"No Date","category":"arcade","platform":["pc"],"downloadLink":"https://example.com/3","updatedAt":"someday"}
            ]"#,
        );
        let games: Vec<Game> = load_records(&source, Resource::Games).await?;
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].title, "Pac-Man");
        Ok(())
    }

    #[tokio::test]
    async fn non_array_document_is_a_decode_error() {
        let source = StaticSource::default();
        source.set_document(Resource::Games, r#"{"games":[]}"#);
        let result: CatalogResult<Vec<Game>> = load_records(&source, Resource::Games).await;
        assert!(matches!(result, Err(CatalogError::Decode { .. })));
    }
}

use gamehub_core::{
    error::CatalogResult,
    resource::{DataSource, FileSource, HttpSource, Resource},
};

/// Either of the two document sources, picked from configuration at startup.
pub enum AppSource {
    Http(HttpSource),
    File(FileSource),
}

impl DataSource for AppSource {
    async fn fetch(&self, resource: Resource) -> CatalogResult<Vec<u8>> {
        match self {
            AppSource::Http(source) => source.fetch(resource).await,
            AppSource::File(source) => source.fetch(resource).await,
        }
    }
}

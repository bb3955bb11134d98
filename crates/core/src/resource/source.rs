use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reqwest::{Client, Url};
use tracing::info;

use super::{DataSource, Resource};
use crate::error::{CatalogError, CatalogResult};

/// Reads documents with plain GET requests below a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    /// Source rooted at `base_url` (e.g. `https://gamehub.example.com`).
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .with_context(|| format!("invalid data url '{base_url}'"))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    /// Absolute URL of `resource`.
    pub fn url_for(&self, resource: Resource) -> Result<Url> {
        self.base
            .join(resource.path())
            .with_context(|| format!("failed to build url for {resource}"))
    }
}

impl DataSource for HttpSource {
    async fn fetch(&self, resource: Resource) -> CatalogResult<Vec<u8>> {
        let url = self
            .url_for(resource)
            .map_err(|err| CatalogError::InvalidUrl {
                resource,
                message: format!("{err:#}"),
            })?;
        info!("fetching {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| CatalogError::Http { resource, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                resource,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| CatalogError::Http { resource, source })?;
        Ok(body.to_vec())
    }
}

/// Reads documents from a local copy of the site's public directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    /// Source rooted at `root`; documents live under `root/data/`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DataSource for FileSource {
    async fn fetch(&self, resource: Resource) -> CatalogResult<Vec<u8>> {
        let path = self.root.join(resource.path());
        info!("reading {}", path.display());
        tokio::fs::read(&path)
            .await
            .map_err(|source| CatalogError::Io { path, source })
    }
}

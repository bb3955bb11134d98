//! Error type shared by the catalog data-access layer.

use std::{collections::BTreeMap, fmt, path::PathBuf};

use thiserror::Error;

use crate::resource::Resource;

/// Failures surfaced by the core crate.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport-level failure talking to the static data host.
    #[error("failed to fetch {resource}: {source}")]
    Http {
        /// Document being fetched.
        resource: Resource,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// The document URL could not be built from the configured base.
    #[error("invalid url for {resource}: {message}")]
    InvalidUrl {
        /// Document being fetched.
        resource: Resource,
        /// Parser message.
        message: String,
    },
    /// The host answered with a non-success status.
    #[error("failed to fetch {resource}: HTTP {status}")]
    Status {
        /// Document being fetched.
        resource: Resource,
        /// Status code returned by the host.
        status: u16,
    },
    /// Reading a local document failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A document did not match the expected JSON shape.
    #[error("failed to decode {resource}: {source}")]
    Decode {
        /// Document being decoded.
        resource: Resource,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The key-value store backing the cache failed.
    #[error("cache store error: {0}")]
    Store(String),
    /// Lookup by id or slug found nothing.
    #[error("{kind} not found: {key}")]
    NotFound {
        /// Entity kind (`game`, `notification`, ...).
        kind: &'static str,
        /// The id or slug that was looked up.
        key: String,
    },
    /// A create or update would break id/slug uniqueness.
    #[error("a game with {field} '{value}' already exists")]
    Duplicate {
        /// Field that collided.
        field: &'static str,
        /// Colliding value.
        value: String,
    },
    /// Admin draft failed validation.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    /// Configuration could not be assembled.
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl CatalogError {
    pub(crate) fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }
}

/// Field-level validation messages, keyed by the form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    /// Record a message for `field`, replacing any earlier one.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.insert(field, message.into());
    }

    /// True when no field failed.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Message recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Iterate over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `Ok(())` when empty, otherwise the errors wrapped in [`CatalogError::Validation`].
    pub fn into_result(self) -> Result<(), CatalogError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Convenience alias used across the crate.
pub type CatalogResult<T> = Result<T, CatalogError>;

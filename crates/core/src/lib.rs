#![warn(clippy::all, missing_docs)]

//! Data-access layer for the GameHub catalog.
//!
//! This crate hosts the game and notification models, the filter/sort
//! engine, the TTL cache in front of the static JSON documents, and the
//! in-memory admin store used by the command line frontend.

pub mod admin;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod debounce;
pub mod downloads;
pub mod error;
pub mod filter;
pub mod models;
pub mod notifications;
pub mod recent;
pub mod resource;
pub mod whatsapp;

#[cfg(test)]
mod testing;

pub use crate::config::AppConfig;
pub use cache::{GameCache, MemoryStore};
pub use catalog::{CatalogView, GameCatalog};
pub use downloads::parse_downloads;
pub use error::{CatalogError, CatalogResult};
pub use filter::{FilterOptions, SortOrder};
pub use models::{Game, GameStatus, Notification, NotificationKind, Platform};
pub use notifications::NotificationCenter;
pub use recent::RecentSearches;
pub use resource::{DataSource, FileSource, HttpSource, Resource, ResourceLoader};
pub use whatsapp::ChannelDirectory;

//! WhatsApp promotional channels.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{error, info};

use crate::{
    downloads::parse_count,
    error::{CatalogError, CatalogResult},
    models::WhatsAppChannel,
    resource::{load_records, DataSource, Resource},
};

/// Aggregate figures shown above the channel list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelStats {
    /// Number of channels.
    pub total_channels: usize,
    /// Sum of parsed member counts.
    pub total_members: f64,
    /// Name of the channel with the most members, empty when there are none.
    pub most_popular: String,
}

/// Read-only channel list.
#[derive(Clone, Default)]
pub struct ChannelDirectory {
    channels: Arc<RwLock<Vec<WhatsAppChannel>>>,
}

impl ChannelDirectory {
    /// Empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory over an already loaded list.
    pub fn from_channels(channels: Vec<WhatsAppChannel>) -> Self {
        Self {
            channels: Arc::new(RwLock::new(channels)),
        }
    }

    /// Replace the list with the static channels document. Failures are logged.
    pub async fn load<S: DataSource>(&self, source: &S) {
        let result: CatalogResult<Vec<WhatsAppChannel>> =
            load_records(source, Resource::WhatsAppChannels).await;
        match result {
            Ok(channels) => *self.channels.write() = channels,
            Err(err) => error!("error loading WhatsApp channels: {err}"),
        }
    }

    /// All channels in document order.
    pub fn channels(&self) -> Vec<WhatsAppChannel> {
        self.channels.read().clone()
    }

    /// Totals and the most popular channel. Ties keep the earlier channel.
    pub fn stats(&self) -> ChannelStats {
        let channels = self.channels.read();
        let total_members = channels.iter().map(|channel| parse_count(&channel.members)).sum();
        let most_popular = channels
            .iter()
            .fold(None::<&WhatsAppChannel>, |best, channel| match best {
                Some(best) if parse_count(&best.members) >= parse_count(&channel.members) => {
                    Some(best)
                }
                _ => Some(channel),
            })
            .map(|channel| channel.name.clone())
            .unwrap_or_default();

        ChannelStats {
            total_channels: channels.len(),
            total_members,
            most_popular,
        }
    }

    /// Channels whose category equals `category`.
    pub fn by_category(&self, category: &str) -> Vec<WhatsAppChannel> {
        self.channels
            .read()
            .iter()
            .filter(|channel| channel.category == category)
            .cloned()
            .collect()
    }

    /// The `limit` largest channels by member count.
    pub fn popular(&self, limit: usize) -> Vec<WhatsAppChannel> {
        let mut channels = self.channels();
        channels.sort_by(|a, b| parse_count(&b.members).total_cmp(&parse_count(&a.members)));
        channels.truncate(limit);
        channels
    }

    /// Invite link of channel `id`; the join is logged.
    pub fn join(&self, id: &str) -> CatalogResult<String> {
        let channels = self.channels.read();
        let channel = channels
            .iter()
            .find(|channel| channel.id == id)
            .ok_or_else(|| CatalogError::not_found("channel", id))?;
        info!("user joined WhatsApp channel: {}", channel.name);
        Ok(channel.link.clone())
    }
}

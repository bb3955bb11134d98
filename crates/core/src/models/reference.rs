#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

/// Entry of the static category list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Matches `Game::category`.
    pub slug: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub game_count: u32,
    #[serde(default)]
    pub color: String,
}

/// Entry of the static platform list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformInfo {
    pub id: String,
    pub name: String,
    /// Matches one of `Game::platform`.
    pub slug: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub game_count: u32,
    #[serde(default)]
    pub color: String,
}

/// A promotional WhatsApp channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppChannel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Human-readable member count (e.g. `15K+`).
    #[serde(default)]
    pub members: String,
    /// Invite link.
    pub link: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub category: String,
}

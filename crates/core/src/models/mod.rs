//! Shared domain models.
//!
//! Field names follow the camelCase keys of the static JSON documents.

mod notification;
mod reference;

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::downloads::parse_downloads;

pub use notification::{NewNotification, Notification, NotificationKind};
pub use reference::{Category, PlatformInfo, WhatsAppChannel};

/// A downloadable game listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Unique identifier.
    pub id: String,
    /// Unique URL slug (e.g. `subway-surfers`).
    pub slug: String,
    /// Human-readable title.
    pub title: String,
    /// Category slug the game belongs to.
    pub category: String,
    /// Platforms the game is available on.
    pub platform: Vec<Platform>,
    /// Cover image path.
    #[serde(default)]
    pub cover: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// External, third-party download URL.
    pub download_link: String,
    /// Display size (e.g. `150 MB`).
    #[serde(default)]
    pub size: String,
    /// Display version (e.g. `1.0.0`).
    #[serde(default)]
    pub version: String,
    /// Average rating between 0 and 5.
    #[serde(default)]
    pub rating: f64,
    /// Human-readable download count (e.g. `1.2M+`).
    #[serde(default)]
    pub downloads: String,
    /// Last update of the listing.
    #[serde(with = "updated_at")]
    pub updated_at: DateTime<Utc>,
    /// Highlighted on the landing page.
    #[serde(default)]
    pub featured: bool,
    /// Publication state.
    #[serde(default)]
    pub status: GameStatus,
}

impl Game {
    /// Numeric download count used for popularity ordering.
    pub fn download_count(&self) -> f64 {
        parse_downloads(&self.downloads)
    }

    /// True when the game lists `platform`.
    pub fn supports(&self, platform: Platform) -> bool {
        self.platform.contains(&platform)
    }
}

/// Platforms a game can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Android phones and tablets.
    Android,
    /// iPhone and iPad.
    Ios,
    /// Desktop computers.
    Pc,
}

impl Platform {
    /// All platforms in display order.
    pub const ALL: [Platform; 3] = [Platform::Android, Platform::Ios, Platform::Pc];

    /// Slug used in URLs and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Pc => "pc",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            "pc" => Ok(Platform::Pc),
            other => Err(format!("unknown platform '{other}'")),
        }
    }
}

/// Publication state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Hidden from visitors.
    Draft,
    /// Visible in the catalog.
    #[default]
    Published,
}

impl GameStatus {
    /// Flip between draft and published.
    pub fn toggled(self) -> Self {
        match self {
            GameStatus::Draft => GameStatus::Published,
            GameStatus::Published => GameStatus::Draft,
        }
    }

    /// Lowercase name used in JSON and queries.
    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::Draft => "draft",
            GameStatus::Published => "published",
        }
    }
}

impl FromStr for GameStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "draft" => Ok(GameStatus::Draft),
            "published" => Ok(GameStatus::Published),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

/// `updatedAt` is either a bare date or a full RFC 3339 timestamp.
mod updated_at {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid updatedAt '{raw}'")))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
            return Some(stamp.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_camel_case_game() {
        let game: Game = serde_json::from_value(json!({
            "id": "1",
            "slug": "subway-surfers",
            "title": "Subway Surfers",
            "category": "arcade",
            "platform": ["android", "ios"],
            "cover": "/images/subway.jpg",
            "description": "Endless runner",
            "downloadLink": "https://example.com/subway",
            "size": "150 MB",
            "version": "3.12.0",
            "rating": 4.5,
            "downloads": "1B+",
            "updatedAt": "2024-01-15"
        }))
        .expect("game decodes");

        assert_eq!(game.download_link, "https://example.com/subway");
        assert!(game.supports(Platform::Ios));
        assert!(!game.supports(Platform::Pc));
        assert_eq!(game.status, GameStatus::Published);
        assert!(!game.featured);
        assert_eq!(game.updated_at, fixtures::date(2024, 1, 15));
        assert_eq!(game.download_count(), 1_000_000_000.0);
    }

    #[test]
    fn accepts_rfc3339_timestamps() {
        let parsed = updated_at::parse("2024-03-01T12:30:00Z").expect("timestamp parses");
        assert_eq!(parsed.to_rfc3339(), "2024-03-01T12:30:00+00:00");
        assert!(updated_at::parse("last tuesday").is_none());
    }

    #[test]
    fn status_toggles() {
        assert_eq!(GameStatus::Draft.toggled(), GameStatus::Published);
        assert_eq!("draft".parse::<GameStatus>(), Ok(GameStatus::Draft));
        assert!("archived".parse::<GameStatus>().is_err());
    }
}

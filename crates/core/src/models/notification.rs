use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kinds of notification the site sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A game was added to the catalog.
    NewGame,
    /// An existing game was updated.
    Update,
    /// General site news.
    Announcement,
    /// WhatsApp channel promotion.
    Whatsapp,
    /// Planned downtime.
    Maintenance,
}

impl NotificationKind {
    /// All kinds in display order.
    pub const ALL: [NotificationKind; 5] = [
        NotificationKind::NewGame,
        NotificationKind::Update,
        NotificationKind::Announcement,
        NotificationKind::Whatsapp,
        NotificationKind::Maintenance,
    ];

    /// Wire name (`new_game`, `update`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::NewGame => "new_game",
            NotificationKind::Update => "update",
            NotificationKind::Announcement => "announcement",
            NotificationKind::Whatsapp => "whatsapp",
            NotificationKind::Maintenance => "maintenance",
        }
    }

    /// Emoji used when a notification of this kind is composed by an admin.
    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::NewGame => "🎮",
            NotificationKind::Update => "⚡",
            NotificationKind::Announcement => "📢",
            NotificationKind::Whatsapp => "💬",
            NotificationKind::Maintenance => "🔧",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        NotificationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value.trim())
            .ok_or_else(|| format!("unknown notification type '{value}'"))
    }
}

/// A notification shown in the bell dropdown and on the notifications page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique identifier.
    pub id: String,
    /// Notification category.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Emoji or icon name.
    #[serde(default)]
    pub icon: String,
    /// Related game, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_slug: Option<String>,
    /// Related category, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Link target, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// When the notification was created.
    pub timestamp: DateTime<Utc>,
    /// Whether the user has seen it.
    #[serde(default)]
    pub read: bool,
}

/// Notification content before the centre assigns id, timestamp and read state.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    /// Notification category.
    pub kind: NotificationKind,
    /// Headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Emoji or icon name.
    pub icon: String,
    /// Related game, if any.
    pub game_slug: Option<String>,
    /// Related category, if any.
    pub category: Option<String>,
    /// Link target, if any.
    pub link: Option<String>,
}

impl NewNotification {
    /// Content with only the required fields set.
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            icon: icon.into(),
            game_slug: None,
            category: None,
            link: None,
        }
    }

    /// Materialise into a stored notification.
    pub fn into_notification(self, id: String, timestamp: DateTime<Utc>) -> Notification {
        Notification {
            id,
            kind: self.kind,
            title: self.title,
            message: self.message,
            icon: self.icon,
            game_slug: self.game_slug,
            category: self.category,
            link: self.link,
            timestamp,
            read: false,
        }
    }
}

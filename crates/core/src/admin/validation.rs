#![allow(missing_docs)]

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::ValidationErrors,
    models::{Game, GameStatus, NewNotification, NotificationKind, Platform},
};

static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("invalid slug regex"));

/// URL slug derived from a title: `"Subway Surfers!"` -> `"subway-surfers"`.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    NON_SLUG_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Game fields as entered in the admin form.
#[derive(Debug, Clone, PartialEq)]
pub struct GameDraft {
    pub slug: String,
    pub title: String,
    pub category: String,
    pub platform: Vec<Platform>,
    pub cover: String,
    pub description: String,
    pub download_link: String,
    pub size: String,
    pub version: String,
    pub rating: f64,
    pub downloads: String,
    pub featured: bool,
    pub status: GameStatus,
}

impl Default for GameDraft {
    fn default() -> Self {
        Self {
            slug: String::new(),
            title: String::new(),
            category: "arcade".to_string(),
            platform: vec![Platform::Android],
            cover: String::new(),
            description: String::new(),
            download_link: String::new(),
            size: String::new(),
            version: String::new(),
            rating: 4.5,
            downloads: "1M+".to_string(),
            featured: false,
            status: GameStatus::Draft,
        }
    }
}

impl GameDraft {
    /// Draft pre-filled from an existing game, for editing.
    pub fn from_game(game: &Game) -> Self {
        Self {
            slug: game.slug.clone(),
            title: game.title.clone(),
            category: game.category.clone(),
            platform: game.platform.clone(),
            cover: game.cover.clone(),
            description: game.description.clone(),
            download_link: game.download_link.clone(),
            size: game.size.clone(),
            version: game.version.clone(),
            rating: game.rating,
            downloads: game.downloads.clone(),
            featured: game.featured,
            status: game.status,
        }
    }

    /// Fill the slug from the title when it is blank.
    pub fn with_generated_slug(mut self) -> Self {
        if self.slug.trim().is_empty() && !self.title.trim().is_empty() {
            self.slug = slugify(&self.title);
        }
        self
    }

    /// Every failing field with its message. Empty means the draft may be saved.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        let required = [
            ("title", &self.title, "Title is required"),
            ("slug", &self.slug, "Slug is required"),
            ("description", &self.description, "Description is required"),
            ("downloadLink", &self.download_link, "Download link is required"),
            ("size", &self.size, "Size is required"),
            ("version", &self.version, "Version is required"),
        ];
        for (field, value, message) in required {
            if value.trim().is_empty() {
                errors.add(field, message);
            }
        }
        if !(0.0..=5.0).contains(&self.rating) {
            errors.add("rating", "Rating must be between 0-5");
        }
        errors
    }

    /// Build the stored game. Text fields are trimmed.
    pub fn into_game(self, id: String, updated_at: DateTime<Utc>) -> Game {
        Game {
            id,
            slug: self.slug.trim().to_string(),
            title: self.title.trim().to_string(),
            category: self.category.trim().to_string(),
            platform: self.platform,
            cover: self.cover.trim().to_string(),
            description: self.description.trim().to_string(),
            download_link: self.download_link.trim().to_string(),
            size: self.size.trim().to_string(),
            version: self.version.trim().to_string(),
            rating: self.rating,
            downloads: self.downloads.trim().to_string(),
            updated_at,
            featured: self.featured,
            status: self.status,
        }
    }
}

/// Notification fields as entered in the admin send form.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub game_slug: String,
    pub category: String,
    pub link: String,
    pub send_to_whatsapp: bool,
    pub send_as_browser_notification: bool,
}

impl Default for NotificationDraft {
    fn default() -> Self {
        Self {
            kind: NotificationKind::Announcement,
            title: String::new(),
            message: String::new(),
            game_slug: String::new(),
            category: String::new(),
            link: String::new(),
            send_to_whatsapp: true,
            send_as_browser_notification: true,
        }
    }
}

impl NotificationDraft {
    /// Title and message are required.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        if self.title.trim().is_empty() {
            errors.add("title", "Title is required");
        }
        if self.message.trim().is_empty() {
            errors.add("message", "Message is required");
        }
        errors
    }

    /// Content delivered to the notification centre. Blank optional fields are dropped.
    pub fn to_notification(&self) -> NewNotification {
        let optional = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        NewNotification {
            kind: self.kind,
            title: self.title.trim().to_string(),
            message: self.message.trim().to_string(),
            icon: self.kind.icon().to_string(),
            game_slug: optional(&self.game_slug),
            category: optional(&self.category),
            link: optional(&self.link),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_collapse_punctuation() {
        assert_eq!(slugify("Subway Surfers!"), "subway-surfers");
        assert_eq!(slugify("  GTA: San Andreas  "), "gta-san-andreas");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn blank_draft_reports_every_required_field() {
        let errors = GameDraft::default().validate();
        assert_eq!(errors.len(), 6);
        assert_eq!(errors.get("title"), Some("Title is required"));
        assert_eq!(errors.get("downloadLink"), Some("Download link is required"));
        assert_eq!(errors.get("rating"), None);
    }

    #[test]
    fn rating_must_stay_in_range() {
        let draft = GameDraft {
            rating: 5.5,
            ..GameDraft::default()
        };
        assert_eq!(draft.validate().get("rating"), Some("Rating must be between 0-5"));
    }

    #[test]
    fn generated_slug_keeps_explicit_one() {
        let draft = GameDraft {
            title: "Asphalt 9: Legends".to_string(),
            ..GameDraft::default()
        }
        .with_generated_slug();
        assert_eq!(draft.slug, "asphalt-9-legends");

        let explicit = GameDraft {
            title: "Asphalt 9".to_string(),
            slug: "asphalt".to_string(),
            ..GameDraft::default()
        }
        .with_generated_slug();
        assert_eq!(explicit.slug, "asphalt");
    }

    #[test]
    fn notification_draft_validation_and_conversion() {
        let draft = NotificationDraft::default();
        let errors = draft.validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.to_string(), "message: Message is required; title: Title is required");

        let draft = NotificationDraft {
            kind: NotificationKind::Maintenance,
            title: " Scheduled Maintenance ".to_string(),
            message: "Saturday night".to_string(),
            link: "  ".to_string(),
            ..NotificationDraft::default()
        };
        assert!(draft.validate().is_empty());
        let content = draft.to_notification();
        assert_eq!(content.title, "Scheduled Maintenance");
        assert_eq!(content.icon, "🔧");
        assert_eq!(content.link, None);
    }
}

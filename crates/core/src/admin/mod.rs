//! Admin-side editing over the static catalog.
//!
//! Nothing here persists: every create, edit, delete and send lives in
//! memory until the process exits.

/// Sent-notification history and delivery onto the notification feed.
pub mod outbox;
/// In-memory game store with listing, paging and stats.
pub mod store;
/// Draft validation and slug generation.
pub mod validation;

pub use outbox::{DeliveryStatus, Outbox, OutboxStats, SentNotification};
pub use store::{AdminQuery, AdminStats, AdminStore, Page, ITEMS_PER_PAGE};
pub use validation::{slugify, GameDraft, NotificationDraft};

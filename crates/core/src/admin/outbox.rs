use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::RwLock;
use tracing::{info, warn};

use super::validation::NotificationDraft;
use crate::{
    cache::{Clock, SystemClock},
    error::CatalogResult,
    models::NotificationKind,
    notifications::FeedPublisher,
};

/// Outcome of a send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// Queued onto the feed.
    Sent,
    /// The feed was closed or full.
    Failed,
}

impl DeliveryStatus {
    /// Lowercase label for listings.
    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Failed => "failed",
        }
    }
}

/// History row for one admin send.
#[derive(Debug, Clone, PartialEq)]
pub struct SentNotification {
    /// Epoch-millisecond id, suffixed on collision.
    pub id: String,
    /// Notification kind.
    pub kind: NotificationKind,
    /// Title as sent.
    pub title: String,
    /// Send time.
    pub sent_at: DateTime<Utc>,
    /// Whether the feed accepted it.
    pub status: DeliveryStatus,
    /// The draft asked for a WhatsApp broadcast too.
    pub whatsapp: bool,
}

/// Summary over the send history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutboxStats {
    /// Successful sends.
    pub total_sent: usize,
    /// Successful sends on the current UTC day.
    pub today_sent: usize,
    /// Most frequent kind; announcement when nothing was sent.
    pub top_kind: NotificationKind,
}

/// Admin notification sender. History is kept in memory, newest first.
#[derive(Clone)]
pub struct Outbox {
    publisher: FeedPublisher,
    history: Arc<RwLock<Vec<SentNotification>>>,
    clock: Arc<dyn Clock>,
}

impl Outbox {
    /// Outbox delivering through `publisher`.
    pub fn new(publisher: FeedPublisher) -> Self {
        Self {
            publisher,
            history: Arc::new(RwLock::new(Vec::new())),
            clock: Arc::new(SystemClock),
        }
    }

    /// Override the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validate `draft`, publish it and record the attempt.
    ///
    /// Validation failures are returned without touching the history; a closed
    /// feed is recorded as [`DeliveryStatus::Failed`].
    pub async fn send(&self, draft: &NotificationDraft) -> CatalogResult<SentNotification> {
        draft.validate().into_result()?;

        let status = if draft.send_as_browser_notification {
            match self.publisher.publish(draft.to_notification()).await {
                Ok(()) => DeliveryStatus::Sent,
                Err(err) => {
                    warn!("failed to deliver notification: {err:#}");
                    DeliveryStatus::Failed
                }
            }
        } else {
            DeliveryStatus::Sent
        };
        if draft.send_to_whatsapp {
            info!("notification queued for WhatsApp broadcast: {}", draft.title.trim());
        }

        let now = self.clock.now_millis();
        let mut history = self.history.write();
        let mut id = now.to_string();
        let mut suffix = 1;
        while history.iter().any(|entry| entry.id == id) {
            id = format!("{now}-{suffix}");
            suffix += 1;
        }
        let sent = SentNotification {
            id,
            kind: draft.kind,
            title: draft.title.trim().to_string(),
            sent_at: Utc.timestamp_millis_opt(now).single().unwrap_or_else(Utc::now),
            status,
            whatsapp: draft.send_to_whatsapp,
        };
        history.insert(0, sent.clone());
        Ok(sent)
    }

    /// Every recorded send, newest first.
    pub fn history(&self) -> Vec<SentNotification> {
        self.history.read().clone()
    }

    /// Totals over successful sends.
    pub fn stats(&self) -> OutboxStats {
        let history = self.history.read();
        let today = Utc
            .timestamp_millis_opt(self.clock.now_millis())
            .single()
            .unwrap_or_else(Utc::now)
            .date_naive();
        let sent: Vec<&SentNotification> = history
            .iter()
            .filter(|entry| entry.status == DeliveryStatus::Sent)
            .collect();

        let top_kind = NotificationKind::ALL
            .iter()
            .copied()
            .map(|kind| (kind, sent.iter().filter(|entry| entry.kind == kind).count()))
            .filter(|(_, count)| *count > 0)
            .fold(None::<(NotificationKind, usize)>, |best, candidate| match best {
                Some(best) if best.1 >= candidate.1 => Some(best),
                _ => Some(candidate),
            })
            .map(|(kind, _)| kind)
            .unwrap_or(NotificationKind::Announcement);

        OutboxStats {
            total_sent: sent.len(),
            today_sent: sent
                .iter()
                .filter(|entry| entry.sent_at.date_naive() == today)
                .count(),
            top_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::CatalogError,
        notifications::{self, FeedEvent},
        testing::ManualClock,
    };

    fn draft(kind: NotificationKind, title: &str) -> NotificationDraft {
        NotificationDraft {
            kind,
            title: title.to_string(),
            message: "Details inside".to_string(),
            ..NotificationDraft::default()
        }
    }

    #[tokio::test]
    async fn send_publishes_and_records_history() -> CatalogResult<()> {
        let (publisher, mut receiver) = notifications::channel(8);
        let clock = Arc::new(ManualClock::new(1_705_750_000_000));
        let outbox = Outbox::new(publisher).with_clock(clock.clone());

        outbox.send(&draft(NotificationKind::NewGame, "New Game: PUBG Mobile")).await?;
        clock.advance(1_000);
        let second = outbox.send(&draft(NotificationKind::Update, "Updates")).await?;

        assert_eq!(second.status, DeliveryStatus::Sent);
        let history = outbox.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].title, "Updates");
        assert_eq!(history[1].id, "1705750000000");

        match receiver.try_recv() {
            Ok(FeedEvent::Delivered(content)) => {
                assert_eq!(content.title, "New Game: PUBG Mobile");
                assert_eq!(content.icon, "🎮");
            }
            other => panic!("unexpected feed event: {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn invalid_draft_is_not_recorded() {
        let (publisher, _receiver) = notifications::channel(1);
        let outbox = Outbox::new(publisher);
        let result = outbox.send(&draft(NotificationKind::Announcement, "  ")).await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));
        assert!(outbox.history().is_empty());
    }

    #[tokio::test]
    async fn closed_feed_is_recorded_as_failed() -> CatalogResult<()> {
        let (publisher, receiver) = notifications::channel(1);
        drop(receiver);
        let outbox = Outbox::new(publisher);
        let sent = outbox.send(&draft(NotificationKind::Maintenance, "Maintenance")).await?;
        assert_eq!(sent.status, DeliveryStatus::Failed);
        assert_eq!(outbox.stats().total_sent, 0);
        Ok(())
    }

    #[tokio::test]
    async fn stats_pick_most_frequent_kind() -> CatalogResult<()> {
        let (publisher, _receiver) = notifications::channel(8);
        let clock = Arc::new(ManualClock::new(1_705_750_000_000));
        let outbox = Outbox::new(publisher).with_clock(clock.clone());
        assert_eq!(outbox.stats().top_kind, NotificationKind::Announcement);

        outbox.send(&draft(NotificationKind::Whatsapp, "Join us")).await?;
        clock.advance(86_400_000);
        outbox.send(&draft(NotificationKind::Update, "Patch")).await?;
        outbox.send(&draft(NotificationKind::Update, "Patch 2")).await?;

        let stats = outbox.stats();
        assert_eq!(stats.total_sent, 3);
        assert_eq!(stats.today_sent, 2);
        assert_eq!(stats.top_kind, NotificationKind::Update);
        Ok(())
    }
}

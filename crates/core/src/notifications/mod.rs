//! In-memory notification list with read tracking and a pluggable event feed.

/// Channel carrying new notifications from their sources.
pub mod feed;
/// Desktop notification abstraction.
pub mod notifier;

use std::{str::FromStr, sync::Arc};

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::RwLock;
use tokio::{
    sync::mpsc::{self, error::TryRecvError},
    task::JoinHandle,
};
use tracing::{error, info, warn};

use crate::{
    cache::{Clock, SystemClock},
    error::{CatalogError, CatalogResult},
    models::{NewNotification, Notification, NotificationKind},
    resource::{load_records, DataSource, Resource},
};

pub use feed::{channel, FeedEvent, FeedPublisher};
pub use notifier::{LogNotifier, Notifier, Permission};

/// Which notifications a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationFilter {
    /// Everything.
    #[default]
    All,
    /// Only unread notifications.
    Unread,
    /// Only one kind.
    Kind(NotificationKind),
}

impl NotificationFilter {
    fn matches(self, notification: &Notification) -> bool {
        match self {
            NotificationFilter::All => true,
            NotificationFilter::Unread => !notification.read,
            NotificationFilter::Kind(kind) => notification.kind == kind,
        }
    }
}

impl FromStr for NotificationFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "all" => Ok(NotificationFilter::All),
            "unread" => Ok(NotificationFilter::Unread),
            other => other.parse().map(NotificationFilter::Kind),
        }
    }
}

/// Shared notification state. All changes are lost when the process exits.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<RwLock<Inner>>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

#[derive(Default)]
struct Inner {
    notifications: Vec<Notification>,
    loading: bool,
}

impl NotificationCenter {
    /// Empty centre forwarding to `notifier`.
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                notifications: Vec::new(),
                loading: true,
            })),
            notifier,
            clock: Arc::new(SystemClock),
        }
    }

    /// Override the time source used for ids and timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the list with the static notifications document.
    ///
    /// Failures are logged and leave the current list in place.
    pub async fn load<S: DataSource>(&self, source: &S) {
        let result: CatalogResult<Vec<Notification>> =
            load_records(source, Resource::Notifications).await;
        let mut inner = self.inner.write();
        match result {
            Ok(notifications) => {
                info!("loaded {} notifications", notifications.len());
                inner.notifications = notifications;
            }
            Err(err) => error!("error loading notifications: {err}"),
        }
        inner.loading = false;
    }

    /// True until the first load completes.
    pub fn is_loading(&self) -> bool {
        self.inner.read().loading
    }

    /// All notifications, newest additions first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.inner.read().notifications.clone()
    }

    /// Notifications matching `filter`.
    pub fn filtered(&self, filter: NotificationFilter) -> Vec<Notification> {
        self.inner
            .read()
            .notifications
            .iter()
            .filter(|notification| filter.matches(notification))
            .cloned()
            .collect()
    }

    /// Number of unread notifications.
    pub fn unread_count(&self) -> usize {
        self.inner
            .read()
            .notifications
            .iter()
            .filter(|notification| !notification.read)
            .count()
    }

    /// Notifications per kind, in [`NotificationKind::ALL`] order.
    pub fn counts(&self) -> Vec<(NotificationKind, usize)> {
        let inner = self.inner.read();
        NotificationKind::ALL
            .into_iter()
            .map(|kind| {
                let count = inner
                    .notifications
                    .iter()
                    .filter(|notification| notification.kind == kind)
                    .count();
                (kind, count)
            })
            .collect()
    }

    /// Mark one notification as read.
    pub fn mark_as_read(&self, id: &str) -> CatalogResult<()> {
        let mut inner = self.inner.write();
        let notification = inner
            .notifications
            .iter_mut()
            .find(|notification| notification.id == id)
            .ok_or_else(|| CatalogError::not_found("notification", id))?;
        notification.read = true;
        Ok(())
    }

    /// Mark everything as read.
    pub fn mark_all_as_read(&self) {
        for notification in self.inner.write().notifications.iter_mut() {
            notification.read = true;
        }
    }

    /// Insert a new unread notification at the top and return it.
    ///
    /// The id is the current epoch-millisecond time, suffixed when two
    /// notifications arrive within the same millisecond.
    pub fn add(&self, content: NewNotification) -> Notification {
        let now = self.clock.now_millis();
        let timestamp: DateTime<Utc> = Utc
            .timestamp_millis_opt(now)
            .single()
            .unwrap_or_else(Utc::now);

        let notification = {
            let mut inner = self.inner.write();
            let mut id = now.to_string();
            let mut suffix = 1;
            while inner.notifications.iter().any(|existing| existing.id == id) {
                id = format!("{now}-{suffix}");
                suffix += 1;
            }
            let notification = content.into_notification(id, timestamp);
            inner.notifications.insert(0, notification.clone());
            notification
        };

        if self.notifier.permission() == Permission::Granted {
            self.notifier.show(&notification);
        }
        notification
    }

    /// Remove one notification.
    pub fn delete(&self, id: &str) -> CatalogResult<Notification> {
        let mut inner = self.inner.write();
        let index = inner
            .notifications
            .iter()
            .position(|notification| notification.id == id)
            .ok_or_else(|| CatalogError::not_found("notification", id))?;
        Ok(inner.notifications.remove(index))
    }

    /// Remove everything.
    pub fn clear_all(&self) {
        self.inner.write().notifications.clear();
    }

    /// Ask for desktop notification permission; when granted, announce it.
    pub fn request_permission(&self) -> Permission {
        let permission = self.notifier.request_permission();
        if permission == Permission::Granted {
            self.add(NewNotification::new(
                NotificationKind::Announcement,
                "Notifications Enabled 🔔",
                "You will now receive browser notifications for new games",
                "🔔",
            ));
        }
        permission
    }

    /// Apply one feed event.
    pub fn handle_event(&self, event: FeedEvent) {
        match event {
            FeedEvent::Delivered(content) => {
                self.add(content);
            }
            FeedEvent::Error(err) => warn!("notification feed error: {err:#}"),
        }
    }

    /// Apply every event already waiting on `receiver` without blocking.
    /// Returns how many were applied.
    pub fn drain(&self, receiver: &mut mpsc::Receiver<FeedEvent>) -> usize {
        let mut applied = 0;
        loop {
            match receiver.try_recv() {
                Ok(event) => {
                    self.handle_event(event);
                    applied += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return applied,
            }
        }
    }

    /// Apply events until every publisher is dropped.
    pub async fn pump(&self, mut receiver: mpsc::Receiver<FeedEvent>) {
        while let Some(event) = receiver.recv().await {
            self.handle_event(event);
        }
        info!("notification feed closed");
    }

    /// Pump `receiver` on a background task.
    pub fn attach(&self, receiver: mpsc::Receiver<FeedEvent>) -> JoinHandle<()> {
        let center = self.clone();
        tokio::spawn(async move { center.pump(receiver).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ManualClock, StaticSource};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        permission: Mutex<Permission>,
        shown: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn permission(&self) -> Permission {
            *self.permission.lock()
        }

        fn request_permission(&self) -> Permission {
            *self.permission.lock() = Permission::Granted;
            Permission::Granted
        }

        fn show(&self, notification: &Notification) {
            self.shown.lock().push(notification.title.clone());
        }
    }

    const DOCUMENT: &str = r#"[
        {"id":"1","type":"new_game","title":"New: Asphalt 9","message":"Race now","icon":"🎮","gameSlug":"asphalt-9","timestamp":"2024-01-20T10:30:00Z","read":false},
        {"id":"2","type":"update","title":"Subway Surfers updated","message":"New city","icon":"⚡","timestamp":"2024-01-19T10:30:00Z","read":true},
        {"id":"3","type":"maintenance","title":"Downtime","message":"Sunday","icon":"🔧","timestamp":"2024-01-18T10:30:00Z","read":false}
    ]"#;

    async fn loaded_center() -> (NotificationCenter, Arc<RecordingNotifier>) {
        let source = StaticSource::default();
        source.set_document(Resource::Notifications, DOCUMENT);
        let notifier = Arc::new(RecordingNotifier::default());
        let center = NotificationCenter::new(notifier.clone())
            .with_clock(Arc::new(ManualClock::new(1_705_750_000_000)));
        center.load(&source).await;
        (center, notifier)
    }

    #[tokio::test]
    async fn loads_and_counts_unread() {
        let (center, _) = loaded_center().await;
        assert!(!center.is_loading());
        assert_eq!(center.notifications().len(), 3);
        assert_eq!(center.unread_count(), 2);
        assert_eq!(center.filtered(NotificationFilter::Unread).len(), 2);
        assert_eq!(
            center.filtered("maintenance".parse().expect("filter parses"))[0].id,
            "3"
        );
        assert_eq!(center.counts()[0], (NotificationKind::NewGame, 1));
    }

    #[tokio::test]
    async fn failed_load_keeps_list_empty() {
        let source = StaticSource::default();
        let center = NotificationCenter::new(Arc::new(LogNotifier::default()));
        center.load(&source).await;
        assert!(!center.is_loading());
        assert!(center.notifications().is_empty());
    }

    #[tokio::test]
    async fn read_tracking_never_goes_negative() -> CatalogResult<()> {
        let (center, _) = loaded_center().await;
        center.mark_as_read("1")?;
        center.mark_as_read("1")?;
        center.mark_as_read("2")?;
        assert_eq!(center.unread_count(), 1);
        center.mark_all_as_read();
        assert_eq!(center.unread_count(), 0);
        assert!(center.mark_as_read("missing").is_err());
        Ok(())
    }

    #[tokio::test]
    async fn add_prepends_and_forwards_when_granted() {
        let (center, notifier) = loaded_center().await;
        let first = center.add(NewNotification::new(
            NotificationKind::Whatsapp,
            "Join our channel",
            "Never miss an update",
            "💬",
        ));
        assert_eq!(first.id, "1705750000000");
        assert!(!first.read);
        assert!(notifier.shown.lock().is_empty());

        assert_eq!(center.request_permission(), Permission::Granted);
        let second = center.add(NewNotification::new(
            NotificationKind::NewGame,
            "New game",
            "Pac-Man",
            "🎮",
        ));
        assert_ne!(second.id, first.id);
        assert_eq!(center.notifications()[0].id, second.id);
        assert_eq!(
            notifier.shown.lock().as_slice(),
            ["Notifications Enabled 🔔".to_string(), "New game".to_string()]
        );
    }

    #[tokio::test]
    async fn delete_and_clear() -> CatalogResult<()> {
        let (center, _) = loaded_center().await;
        let removed = center.delete("1")?;
        assert_eq!(removed.title, "New: Asphalt 9");
        assert_eq!(center.unread_count(), 1);
        assert!(center.delete("1").is_err());
        center.clear_all();
        assert_eq!(center.unread_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn feed_events_are_applied() -> anyhow::Result<()> {
        let (center, _) = loaded_center().await;
        let (publisher, mut receiver) = channel(4);

        publisher
            .publish(NewNotification::new(NotificationKind::Update, "Updated", "v2", "⚡"))
            .await?;
        publisher.report(anyhow::anyhow!("source offline")).await?;
        assert_eq!(center.drain(&mut receiver), 2);
        assert_eq!(center.notifications()[0].title, "Updated");

        let pump = center.attach(receiver);
        publisher.try_publish(NewNotification::new(
            NotificationKind::Announcement,
            "Hello",
            "World",
            "📢",
        ))?;
        drop(publisher);
        pump.await?;
        assert_eq!(center.notifications()[0].title, "Hello");
        Ok(())
    }
}

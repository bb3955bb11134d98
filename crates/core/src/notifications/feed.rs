use anyhow::{Context, Result};
use tokio::sync::mpsc;

use crate::models::NewNotification;

/// Events delivered by a notification source.
#[derive(Debug)]
pub enum FeedEvent {
    /// A notification to insert at the top of the list.
    Delivered(NewNotification),
    /// The source failed; logged by the receiver.
    Error(anyhow::Error),
}

/// Sending half of a notification feed.
#[derive(Debug, Clone)]
pub struct FeedPublisher {
    sender: mpsc::Sender<FeedEvent>,
}

impl FeedPublisher {
    /// Queue `notification` for delivery, waiting for capacity.
    pub async fn publish(&self, notification: NewNotification) -> Result<()> {
        self.sender
            .send(FeedEvent::Delivered(notification))
            .await
            .context("notification feed closed")
    }

    /// Queue without waiting; fails when the feed is full or closed.
    pub fn try_publish(&self, notification: NewNotification) -> Result<()> {
        self.sender
            .try_send(FeedEvent::Delivered(notification))
            .map_err(|err| anyhow::anyhow!("failed to queue notification: {err}"))
    }

    /// Report a source failure to the receiver.
    pub async fn report(&self, error: anyhow::Error) -> Result<()> {
        self.sender
            .send(FeedEvent::Error(error))
            .await
            .context("notification feed closed")
    }
}

/// Bounded channel connecting notification sources to a centre.
pub fn channel(capacity: usize) -> (FeedPublisher, mpsc::Receiver<FeedEvent>) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (FeedPublisher { sender }, receiver)
}

//! Trailing-edge debouncing for search input.

use std::time::Duration;

use tokio::{sync::mpsc, time::sleep};

/// Quiet period used by the catalog search box.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

/// Forward only the last value of each burst, once `delay` passes without a
/// newer one. A value still pending when `input` closes is flushed right away.
///
/// Must be called from within a tokio runtime.
pub fn debounce<T: Send + 'static>(
    mut input: mpsc::Receiver<T>,
    delay: Duration,
) -> mpsc::Receiver<T> {
    let (sender, output) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut pending: Option<T> = None;
        loop {
            let Some(value) = pending.take() else {
                match input.recv().await {
                    Some(value) => pending = Some(value),
                    None => return,
                }
                continue;
            };

            tokio::select! {
                next = input.recv() => match next {
                    Some(newer) => pending = Some(newer),
                    None => {
                        let _ = sender.send(value).await;
                        return;
                    }
                },
                _ = sleep(delay) => {
                    if sender.send(value).await.is_err() {
                        return;
                    }
                }
            }
        }
    });
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn forwards_last_value_of_a_burst() {
        let (sender, receiver) = mpsc::channel(8);
        let mut output = debounce(receiver, DEFAULT_DELAY);

        for term in ["s", "su", "sub"] {
            sender.send(term).await.unwrap();
            sleep(Duration::from_millis(100)).await;
        }
        assert!(output.try_recv().is_err());

        sleep(Duration::from_millis(300)).await;
        assert_eq!(output.recv().await, Some("sub"));
    }

    #[tokio::test(start_paused = true)]
    async fn separate_bursts_each_emit() {
        let (sender, receiver) = mpsc::channel(8);
        let mut output = debounce(receiver, DEFAULT_DELAY);

        sender.send(1).await.unwrap();
        assert_eq!(output.recv().await, Some(1));
        sender.send(2).await.unwrap();
        sender.send(3).await.unwrap();
        assert_eq!(output.recv().await, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn flushes_pending_value_on_close() {
        let (sender, receiver) = mpsc::channel(8);
        let mut output = debounce(receiver, Duration::from_secs(60));

        sender.send("last").await.unwrap();
        drop(sender);
        assert_eq!(output.recv().await, Some("last"));
        assert_eq!(output.recv().await, None);
    }
}

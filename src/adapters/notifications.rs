//! Notification hand-off and delivery.
//!
//! Services enqueue messages through [`ChannelNotificationQueue`] without
//! awaiting delivery. A single [`NotificationDispatcher`] task drains the
//! channel and hands each message to the `Notifier` transport. Delivery is
//! at most once: failures are logged at `error` and dropped.
//!
//! ```text
//! EventRegistry / PublicationGateway
//!         │ enqueue (try_send, never blocks)
//!         ▼
//!   mpsc channel (bounded)
//!         │
//!         ▼
//! NotificationDispatcher::run ──► Notifier::deliver
//! ```
//!
//! ## Graceful Shutdown
//!
//! The dispatcher stops when the shutdown signal flips to `true` or every
//! queue handle is dropped. Messages already queued are delivered first.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use crate::domain::foundation::DomainError;
use crate::domain::notification::Notification;
use crate::ports::{NotificationQueue, Notifier};

/// Creates a bounded queue and the dispatcher that drains it.
pub fn notification_channel(
    capacity: usize,
    notifier: Arc<dyn Notifier>,
) -> (ChannelNotificationQueue, NotificationDispatcher) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (
        ChannelNotificationQueue {
            sender,
            dropped: Arc::new(AtomicU64::new(0)),
        },
        NotificationDispatcher { receiver, notifier },
    )
}

/// Non-blocking producer side of the notification channel.
#[derive(Clone)]
pub struct ChannelNotificationQueue {
    sender: mpsc::Sender<Notification>,
    dropped: Arc<AtomicU64>,
}

impl ChannelNotificationQueue {
    /// Messages rejected because the queue was full or closed.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl NotificationQueue for ChannelNotificationQueue {
    fn enqueue(&self, notification: Notification) {
        if let Err(err) = self.sender.try_send(notification) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            let (reason, message) = match err {
                mpsc::error::TrySendError::Full(message) => ("queue full", message),
                mpsc::error::TrySendError::Closed(message) => ("queue closed", message),
            };
            tracing::warn!(
                user_id = %message.recipient.user_id,
                kind = message.kind.label(),
                reason,
                "notification dropped"
            );
        }
    }
}

/// Consumer side: delivers queued messages one at a time.
pub struct NotificationDispatcher {
    receiver: mpsc::Receiver<Notification>,
    notifier: Arc<dyn Notifier>,
}

impl NotificationDispatcher {
    /// Runs until shutdown is signalled or all queue handles are dropped.
    /// Returns the number of messages delivered successfully.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> u64 {
        let mut delivered = 0;

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        self.receiver.close();
                        while let Some(message) = self.receiver.recv().await {
                            delivered += u64::from(self.deliver(&message).await);
                        }
                        tracing::info!(delivered, "notification dispatcher stopped");
                        return delivered;
                    }
                }

                next = self.receiver.recv() => match next {
                    Some(message) => delivered += u64::from(self.deliver(&message).await),
                    None => {
                        tracing::info!(delivered, "notification queue closed");
                        return delivered;
                    }
                },
            }
        }
    }

    async fn deliver(&self, message: &Notification) -> bool {
        match self.notifier.deliver(message).await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(
                    user_id = %message.recipient.user_id,
                    kind = message.kind.label(),
                    error = %err,
                    "notification delivery failed"
                );
                false
            }
        }
    }
}

/// Notifier that writes each message to the log instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn deliver(&self, notification: &Notification) -> Result<(), DomainError> {
        tracing::info!(
            user_id = %notification.recipient.user_id,
            kind = notification.kind.label(),
            email = notification.via_email,
            sms = notification.sends_sms(),
            summary = %notification.kind.summary(),
            "notification sent"
        );
        Ok(())
    }
}

//! Notification ports.
//!
//! `NotificationQueue` is what the application layer sees: a synchronous,
//! non-blocking hand-off. `Notifier` is the transport the queue's worker
//! drives. Delivery is at most once; nothing here retries.

use crate::domain::foundation::DomainError;
use crate::domain::notification::Notification;
use async_trait::async_trait;

/// Email/SMS transport.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, notification: &Notification) -> Result<(), DomainError>;
}

/// Fire-and-forget hand-off of notifications.
///
/// Must return immediately. Failures after this point are logged by the
/// implementation and never reach the caller.
pub trait NotificationQueue: Send + Sync {
    fn enqueue(&self, notification: Notification);
}

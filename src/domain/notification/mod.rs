//! Notification module - messages to members and campaign subscribers.
//!
//! Messages are built here and delivered elsewhere. Delivery is best effort
//! and never affects the outcome of the operation that produced them.

mod errors;
mod message;
mod subscription;

pub use errors::SubscriptionError;
pub use message::{Notification, NotificationKind, NotifyOptions};
pub use subscription::{NotificationSettings, Subscriber, SubscriptionEntry};

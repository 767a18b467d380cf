//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - in-process storage for tests and database-less runs
//! - `postgres` - sqlx storage
//! - `authorization` - campaign permission grant table
//! - `notifications` - queued, at-most-once notification delivery
//! - `http` - axum routers

pub mod authorization;
pub mod http;
pub mod memory;
pub mod notifications;
pub mod postgres;

pub use authorization::{Grant, StaticAuthorizer};
pub use memory::{InMemoryStore, SeedData};
pub use notifications::{
    notification_channel, ChannelNotificationQueue, NotificationDispatcher, TracingNotifier,
};
pub use postgres::{postgres_storage, run_migrations};

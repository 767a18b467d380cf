//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamp, permissions, errors)
//! - `directory` - User and campaign reference data shown in read models
//! - `event` - Events and their Participant/Watcher membership
//! - `publishing` - Publication of events and announcements
//! - `preference` - Per-user campaign preferences
//! - `board` - Ranking and search for the public board
//! - `notification` - Notification messages and campaign subscriptions

pub mod board;
pub mod directory;
pub mod event;
pub mod foundation;
pub mod notification;
pub mod preference;
pub mod publishing;

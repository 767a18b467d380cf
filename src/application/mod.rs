//! Application layer - services that orchestrate domain rules over ports.
//!
//! Each service validates input, makes one atomic storage call per mutation,
//! then queues notifications. Authorization happens in the caller through
//! [`AuthorizationContext`].

pub mod authorization;
mod event_registry;
mod notification_subscriptions;
mod preference_store;
mod public_board;
mod publication_gateway;
mod storage;

pub use authorization::AuthorizationContext;
pub use event_registry::EventRegistry;
pub use notification_subscriptions::NotificationSubscriptions;
pub use preference_store::PreferenceStore;
pub use public_board::{BoardLimits, BoardQuery, PublicBoard, PublicBoardRanker};
pub use publication_gateway::PublicationGateway;
pub use storage::Storage;

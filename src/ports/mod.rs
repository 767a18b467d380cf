//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `EventRepository` - Events and Participant/Watcher membership
//! - `PublicationRepository` - Published events and announcements
//! - `PreferenceRepository` - Per-user campaign preferences
//! - `SubscriptionRepository` - Campaign notification subscriptions
//!
//! ## Collaborator Ports
//!
//! - `Authorizer` - Campaign permission yes/no check
//! - `Notifier` - Email/SMS transport
//! - `NotificationQueue` - Non-blocking notification hand-off

mod authorizer;
mod event_repository;
mod notifier;
mod preference_repository;
mod publication_repository;
mod subscription_repository;

pub use authorizer::Authorizer;
pub use event_repository::EventRepository;
pub use notifier::{NotificationQueue, Notifier};
pub use preference_repository::PreferenceRepository;
pub use publication_repository::PublicationRepository;
pub use subscription_repository::SubscriptionRepository;

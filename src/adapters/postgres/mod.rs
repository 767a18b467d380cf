//! PostgreSQL adapters - Database implementations of the storage ports.
//!
//! - `PostgresEventRepository` - events and their members
//! - `PostgresPublicationRepository` - published events and announcements
//! - `PostgresPreferenceRepository` - campaign preferences per user
//! - `PostgresSubscriptionRepository` - publication notification subscriptions
//!
//! Users and campaigns are read from the `users` and `campaigns` tables and
//! never written here.

mod event_repository;
mod preference_repository;
mod publication_repository;
mod rows;
mod subscription_repository;

pub use event_repository::PostgresEventRepository;
pub use preference_repository::PostgresPreferenceRepository;
pub use publication_repository::PostgresPublicationRepository;
pub use subscription_repository::PostgresSubscriptionRepository;

use std::sync::Arc;

use sqlx::migrate::MigrateError;
use sqlx::PgPool;

use crate::application::Storage;

/// Storage ports backed by one connection pool.
pub fn postgres_storage(pool: PgPool) -> Storage {
    Storage {
        events: Arc::new(PostgresEventRepository::new(pool.clone())),
        publications: Arc::new(PostgresPublicationRepository::new(pool.clone())),
        preferences: Arc::new(PostgresPreferenceRepository::new(pool.clone())),
        subscriptions: Arc::new(PostgresSubscriptionRepository::new(pool)),
    }
}

/// Applies pending migrations from the crate's `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

//! The four storage ports as one bundle, for wiring.

use std::sync::Arc;

use crate::ports::{
    EventRepository, PreferenceRepository, PublicationRepository, SubscriptionRepository,
};

/// Handles to every storage port the services use.
#[derive(Clone)]
pub struct Storage {
    pub events: Arc<dyn EventRepository>,
    pub publications: Arc<dyn PublicationRepository>,
    pub preferences: Arc<dyn PreferenceRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
}

impl Storage {
    /// One backend serving all four ports.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: EventRepository
            + PublicationRepository
            + PreferenceRepository
            + SubscriptionRepository
            + 'static,
    {
        Self {
            events: store.clone(),
            publications: store.clone(),
            preferences: store.clone(),
            subscriptions: store,
        }
    }
}

//! Shared application state handed to every router.

use std::sync::Arc;

use crate::application::{
    AuthorizationContext, BoardLimits, EventRegistry, NotificationSubscriptions, PreferenceStore,
    PublicBoardRanker, PublicationGateway, Storage,
};
use crate::domain::foundation::UserId;
use crate::ports::{Authorizer, NotificationQueue};

/// Services built once at startup plus the authorizer used per request.
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<EventRegistry>,
    pub publications: Arc<PublicationGateway>,
    pub preferences: Arc<PreferenceStore>,
    pub subscriptions: Arc<NotificationSubscriptions>,
    pub board: Arc<PublicBoardRanker>,
    pub authorizer: Arc<dyn Authorizer>,
}

impl AppState {
    pub fn new(
        storage: Storage,
        authorizer: Arc<dyn Authorizer>,
        notifications: Arc<dyn NotificationQueue>,
        limits: BoardLimits,
    ) -> Self {
        Self {
            events: Arc::new(EventRegistry::new(storage.events.clone(), notifications.clone())),
            publications: Arc::new(PublicationGateway::new(
                storage.publications.clone(),
                storage.subscriptions.clone(),
                notifications,
            )),
            preferences: Arc::new(PreferenceStore::new(storage.preferences.clone())),
            subscriptions: Arc::new(NotificationSubscriptions::new(storage.subscriptions)),
            board: Arc::new(PublicBoardRanker::new(
                storage.publications,
                storage.preferences,
                limits,
            )),
            authorizer,
        }
    }

    /// Access policy for one request's user.
    pub fn authorization(&self, user: UserId) -> AuthorizationContext {
        AuthorizationContext::new(user, self.authorizer.clone())
    }
}

//! Notification subscription repository port.

use crate::domain::foundation::{CampaignGuid, DomainError, UserId};
use crate::domain::notification::{NotificationSettings, Subscriber, SubscriptionEntry};
use async_trait::async_trait;

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Fails `UserNotFound`, `CampaignNotFound`, or `DuplicateKey`.
    async fn subscribe(
        &self,
        user: UserId,
        campaign: CampaignGuid,
        settings: NotificationSettings,
    ) -> Result<(), DomainError>;

    /// Fails `UserNotFound`, `CampaignNotFound`, or `SubscriptionNotFound`.
    async fn update(
        &self,
        user: UserId,
        campaign: CampaignGuid,
        settings: NotificationSettings,
    ) -> Result<(), DomainError>;

    /// Fails `UserNotFound`, `CampaignNotFound`, or `SubscriptionNotFound`.
    async fn unsubscribe(&self, user: UserId, campaign: CampaignGuid) -> Result<(), DomainError>;

    /// Fails `UserNotFound`.
    async fn for_user(&self, user: UserId) -> Result<Vec<SubscriptionEntry>, DomainError>;

    /// Fails `CampaignNotFound`.
    async fn subscribers(&self, campaign: CampaignGuid) -> Result<Vec<Subscriber>, DomainError>;
}

//! NotificationSubscriptions - who hears about a campaign's publications.

use std::sync::Arc;

use crate::domain::foundation::{CampaignGuid, UserId};
use crate::domain::notification::{
    NotificationSettings, Subscriber, SubscriptionEntry, SubscriptionError,
};
use crate::ports::SubscriptionRepository;

pub struct NotificationSubscriptions {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl NotificationSubscriptions {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    pub async fn subscribe(
        &self,
        user: UserId,
        campaign: CampaignGuid,
        settings: NotificationSettings,
    ) -> Result<(), SubscriptionError> {
        settings.validate()?;
        self.subscriptions.subscribe(user, campaign, settings).await?;
        tracing::info!(user_id = %user, campaign_guid = %campaign, "subscribed to campaign notifications");
        Ok(())
    }

    pub async fn update_subscription(
        &self,
        user: UserId,
        campaign: CampaignGuid,
        settings: NotificationSettings,
    ) -> Result<(), SubscriptionError> {
        settings.validate()?;
        self.subscriptions.update(user, campaign, settings).await?;
        tracing::info!(user_id = %user, campaign_guid = %campaign, "notification settings updated");
        Ok(())
    }

    pub async fn unsubscribe(&self, user: UserId, campaign: CampaignGuid) -> Result<(), SubscriptionError> {
        self.subscriptions.unsubscribe(user, campaign).await?;
        tracing::info!(user_id = %user, campaign_guid = %campaign, "unsubscribed from campaign notifications");
        Ok(())
    }

    pub async fn get_subscriptions_for_user(
        &self,
        user: UserId,
    ) -> Result<Vec<SubscriptionEntry>, SubscriptionError> {
        Ok(self.subscriptions.for_user(user).await?)
    }

    pub async fn get_subscribers_for_campaign(
        &self,
        campaign: CampaignGuid,
    ) -> Result<Vec<Subscriber>, SubscriptionError> {
        Ok(self.subscriptions.subscribers(campaign).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::directory::{CampaignSummary, UserContact};
    use crate::domain::foundation::ErrorCode;

    fn user(id: i64) -> UserId {
        UserId::new(id).unwrap()
    }

    fn setup() -> (NotificationSubscriptions, CampaignGuid) {
        let store = Arc::new(InMemoryStore::new());
        store.register_user(UserContact {
            user_id: user(1),
            first_name: Some("Rin".to_string()),
            last_name: None,
            display_name: "rin".to_string(),
            email: "rin@example.org".to_string(),
            phone: None,
            profile_pic_url: None,
        });
        let campaign = CampaignGuid::new();
        store.register_campaign(CampaignSummary {
            guid: campaign,
            name: "Open Streets".to_string(),
            city: None,
            logo_url: None,
        });
        (NotificationSubscriptions::new(store), campaign)
    }

    #[tokio::test]
    async fn subscribe_requires_a_channel() {
        let (subs, campaign) = setup();

        let err = subs
            .subscribe(user(1), campaign, NotificationSettings::new(false, false))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::NotificationSettingsRequired);
        assert!(subs.get_subscriptions_for_user(user(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_subscription_fails() {
        let (subs, campaign) = setup();
        subs.subscribe(user(1), campaign, NotificationSettings::new(true, false))
            .await
            .unwrap();

        let err = subs
            .subscribe(user(1), campaign, NotificationSettings::new(true, true))
            .await
            .unwrap_err();

        assert_eq!(err, SubscriptionError::already_subscribed(user(1), campaign));
    }

    #[tokio::test]
    async fn update_changes_channels_seen_by_campaign() {
        let (subs, campaign) = setup();
        subs.subscribe(user(1), campaign, NotificationSettings::new(true, false))
            .await
            .unwrap();

        subs.update_subscription(user(1), campaign, NotificationSettings::new(false, true))
            .await
            .unwrap();

        let subscribers = subs.get_subscribers_for_campaign(campaign).await.unwrap();
        assert_eq!(subscribers.len(), 1);
        assert_eq!(subscribers[0].settings, NotificationSettings::new(false, true));
        assert_eq!(subscribers[0].contact.email, "rin@example.org");
    }

    #[tokio::test]
    async fn unsubscribe_twice_fails() {
        let (subs, campaign) = setup();
        subs.subscribe(user(1), campaign, NotificationSettings::new(true, false))
            .await
            .unwrap();

        subs.unsubscribe(user(1), campaign).await.unwrap();
        let err = subs.unsubscribe(user(1), campaign).await.unwrap_err();

        assert_eq!(err, SubscriptionError::not_found(user(1), campaign));
    }

    #[tokio::test]
    async fn user_listing_carries_campaign_name() {
        let (subs, campaign) = setup();
        subs.subscribe(user(1), campaign, NotificationSettings::new(true, true))
            .await
            .unwrap();

        let entries = subs.get_subscriptions_for_user(user(1)).await.unwrap();

        assert_eq!(entries[0].campaign.name, "Open Streets");
    }
}

//! Preference and notification-subscription storage over the in-memory state.
//!
//! Both are keyed by (user, campaign) and resolve the same reference data.

use async_trait::async_trait;

use crate::domain::foundation::{CampaignGuid, DomainError, UserId};
use crate::domain::notification::{
    NotificationSettings, Subscriber, SubscriptionEntry, SubscriptionError,
};
use crate::domain::preference::{PreferenceEntry, PreferenceError, PreferenceMap};
use crate::ports::{PreferenceRepository, SubscriptionRepository};

use super::{InMemoryStore, State};

impl State {
    fn check_preference_keys(&self, user: UserId, campaign: CampaignGuid) -> Result<(), DomainError> {
        if self.user(user).is_none() {
            return Err(PreferenceError::user_not_found(user).into());
        }
        if self.campaign(campaign).is_none() {
            return Err(PreferenceError::campaign_not_found(campaign).into());
        }
        Ok(())
    }

    fn check_subscription_keys(&self, user: UserId, campaign: CampaignGuid) -> Result<(), DomainError> {
        if self.user(user).is_none() {
            return Err(SubscriptionError::user_not_found(user).into());
        }
        if self.campaign(campaign).is_none() {
            return Err(SubscriptionError::campaign_not_found(campaign).into());
        }
        Ok(())
    }
}

#[async_trait]
impl PreferenceRepository for InMemoryStore {
    async fn add(&self, user: UserId, campaign: CampaignGuid, is_preferred: bool) -> Result<(), DomainError> {
        let mut state = self.state();
        state.check_preference_keys(user, campaign)?;
        if state.preferences.contains_key(&(user, campaign)) {
            return Err(PreferenceError::already_exists(user, campaign).into());
        }
        state.preferences.insert((user, campaign), is_preferred);
        Ok(())
    }

    async fn update(&self, user: UserId, campaign: CampaignGuid, is_preferred: bool) -> Result<(), DomainError> {
        let mut state = self.state();
        state.check_preference_keys(user, campaign)?;
        match state.preferences.get_mut(&(user, campaign)) {
            Some(flag) => {
                *flag = is_preferred;
                Ok(())
            }
            None => Err(PreferenceError::not_found(user, campaign).into()),
        }
    }

    async fn remove(&self, user: UserId, campaign: CampaignGuid) -> Result<(), DomainError> {
        let mut state = self.state();
        state.check_preference_keys(user, campaign)?;
        match state.preferences.remove(&(user, campaign)) {
            Some(_) => Ok(()),
            None => Err(PreferenceError::not_found(user, campaign).into()),
        }
    }

    async fn list_for_user(&self, user: UserId) -> Result<Vec<PreferenceEntry>, DomainError> {
        let state = self.state();
        if state.user(user).is_none() {
            return Err(PreferenceError::user_not_found(user).into());
        }

        let mut entries: Vec<PreferenceEntry> = state
            .preferences
            .iter()
            .filter(|((owner, _), _)| *owner == user)
            .filter_map(|((_, campaign), is_preferred)| {
                state.campaign(*campaign).map(|summary| PreferenceEntry {
                    campaign: summary.clone(),
                    is_preferred: *is_preferred,
                })
            })
            .collect();
        entries.sort_by(|a, b| a.campaign.name.cmp(&b.campaign.name));
        Ok(entries)
    }

    async fn preference_map(&self, user: UserId) -> Result<PreferenceMap, DomainError> {
        Ok(self
            .state()
            .preferences
            .iter()
            .filter(|((owner, _), _)| *owner == user)
            .map(|((_, campaign), is_preferred)| (*campaign, *is_preferred))
            .collect())
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn subscribe(
        &self,
        user: UserId,
        campaign: CampaignGuid,
        settings: NotificationSettings,
    ) -> Result<(), DomainError> {
        let mut state = self.state();
        state.check_subscription_keys(user, campaign)?;
        if state.subscriptions.contains_key(&(user, campaign)) {
            return Err(SubscriptionError::already_subscribed(user, campaign).into());
        }
        state.subscriptions.insert((user, campaign), settings);
        Ok(())
    }

    async fn update(
        &self,
        user: UserId,
        campaign: CampaignGuid,
        settings: NotificationSettings,
    ) -> Result<(), DomainError> {
        let mut state = self.state();
        state.check_subscription_keys(user, campaign)?;
        match state.subscriptions.get_mut(&(user, campaign)) {
            Some(current) => {
                *current = settings;
                Ok(())
            }
            None => Err(SubscriptionError::not_found(user, campaign).into()),
        }
    }

    async fn unsubscribe(&self, user: UserId, campaign: CampaignGuid) -> Result<(), DomainError> {
        let mut state = self.state();
        state.check_subscription_keys(user, campaign)?;
        match state.subscriptions.remove(&(user, campaign)) {
            Some(_) => Ok(()),
            None => Err(SubscriptionError::not_found(user, campaign).into()),
        }
    }

    async fn for_user(&self, user: UserId) -> Result<Vec<SubscriptionEntry>, DomainError> {
        let state = self.state();
        if state.user(user).is_none() {
            return Err(SubscriptionError::user_not_found(user).into());
        }

        let mut entries: Vec<SubscriptionEntry> = state
            .subscriptions
            .iter()
            .filter(|((owner, _), _)| *owner == user)
            .filter_map(|((_, campaign), settings)| {
                state.campaign(*campaign).map(|summary| SubscriptionEntry {
                    campaign: summary.clone(),
                    settings: *settings,
                })
            })
            .collect();
        entries.sort_by(|a, b| a.campaign.name.cmp(&b.campaign.name));
        Ok(entries)
    }

    async fn subscribers(&self, campaign: CampaignGuid) -> Result<Vec<Subscriber>, DomainError> {
        let state = self.state();
        if state.campaign(campaign).is_none() {
            return Err(SubscriptionError::campaign_not_found(campaign).into());
        }

        let mut subscribers: Vec<Subscriber> = state
            .subscriptions
            .iter()
            .filter(|((_, subscribed), _)| *subscribed == campaign)
            .filter_map(|((user, _), settings)| {
                state.user(*user).map(|contact| Subscriber {
                    contact: contact.clone(),
                    settings: *settings,
                })
            })
            .collect();
        subscribers.sort_by_key(|subscriber| subscriber.contact.user_id);
        Ok(subscribers)
    }
}

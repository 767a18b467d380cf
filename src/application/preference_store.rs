//! PreferenceStore - per-user campaign preferences.

use std::sync::Arc;

use crate::domain::foundation::{CampaignGuid, UserId};
use crate::domain::preference::{PreferenceEntry, PreferenceError};
use crate::ports::PreferenceRepository;

pub struct PreferenceStore {
    preferences: Arc<dyn PreferenceRepository>,
}

impl PreferenceStore {
    pub fn new(preferences: Arc<dyn PreferenceRepository>) -> Self {
        Self { preferences }
    }

    /// Fails `DuplicateKey` if a preference exists; use `update_preference`.
    pub async fn add_preference(
        &self,
        user: UserId,
        campaign: CampaignGuid,
        is_preferred: bool,
    ) -> Result<(), PreferenceError> {
        self.preferences.add(user, campaign, is_preferred).await?;
        tracing::info!(user_id = %user, campaign_guid = %campaign, is_preferred, "preference added");
        Ok(())
    }

    pub async fn update_preference(
        &self,
        user: UserId,
        campaign: CampaignGuid,
        is_preferred: bool,
    ) -> Result<(), PreferenceError> {
        self.preferences.update(user, campaign, is_preferred).await?;
        tracing::info!(user_id = %user, campaign_guid = %campaign, is_preferred, "preference updated");
        Ok(())
    }

    /// Returns the campaign to neutral.
    pub async fn remove_preference(&self, user: UserId, campaign: CampaignGuid) -> Result<(), PreferenceError> {
        self.preferences.remove(user, campaign).await?;
        tracing::info!(user_id = %user, campaign_guid = %campaign, "preference removed");
        Ok(())
    }

    pub async fn get_preferences(&self, user: UserId) -> Result<Vec<PreferenceEntry>, PreferenceError> {
        Ok(self.preferences.list_for_user(user).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::directory::{CampaignSummary, UserContact};

    fn user(id: i64) -> UserId {
        UserId::new(id).unwrap()
    }

    fn setup() -> (PreferenceStore, CampaignGuid) {
        let store = Arc::new(InMemoryStore::new());
        store.register_user(UserContact {
            user_id: user(1),
            first_name: None,
            last_name: None,
            display_name: "lee".to_string(),
            email: "lee@example.org".to_string(),
            phone: None,
            profile_pic_url: None,
        });
        let campaign = CampaignGuid::new();
        store.register_campaign(CampaignSummary {
            guid: campaign,
            name: "Harbor Alliance".to_string(),
            city: Some("Eilat".to_string()),
            logo_url: Some("https://cdn.example.org/harbor.png".to_string()),
        });
        (PreferenceStore::new(store), campaign)
    }

    #[tokio::test]
    async fn add_then_list_includes_campaign_metadata() {
        let (prefs, campaign) = setup();

        prefs.add_preference(user(1), campaign, true).await.unwrap();
        let entries = prefs.get_preferences(user(1)).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_preferred);
        assert_eq!(entries[0].campaign.name, "Harbor Alliance");
    }

    #[tokio::test]
    async fn add_never_upserts() {
        let (prefs, campaign) = setup();
        prefs.add_preference(user(1), campaign, true).await.unwrap();

        let err = prefs.add_preference(user(1), campaign, false).await.unwrap_err();

        assert_eq!(err, PreferenceError::already_exists(user(1), campaign));
        assert!(prefs.get_preferences(user(1)).await.unwrap()[0].is_preferred);
    }

    #[tokio::test]
    async fn update_and_remove_require_existing_row() {
        let (prefs, campaign) = setup();

        assert_eq!(
            prefs.update_preference(user(1), campaign, false).await.unwrap_err(),
            PreferenceError::not_found(user(1), campaign)
        );
        assert_eq!(
            prefs.remove_preference(user(1), campaign).await.unwrap_err(),
            PreferenceError::not_found(user(1), campaign)
        );
    }

    #[tokio::test]
    async fn update_flips_tier_and_remove_returns_to_neutral() {
        let (prefs, campaign) = setup();
        prefs.add_preference(user(1), campaign, true).await.unwrap();

        prefs.update_preference(user(1), campaign, false).await.unwrap();
        assert!(!prefs.get_preferences(user(1)).await.unwrap()[0].is_preferred);

        prefs.remove_preference(user(1), campaign).await.unwrap();
        assert!(prefs.get_preferences(user(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fails_when_user_or_campaign_not_found() {
        let (prefs, campaign) = setup();
        let missing = CampaignGuid::new();

        assert_eq!(
            prefs.add_preference(user(7), campaign, true).await.unwrap_err(),
            PreferenceError::user_not_found(user(7))
        );
        assert_eq!(
            prefs.add_preference(user(1), missing, true).await.unwrap_err(),
            PreferenceError::campaign_not_found(missing)
        );
        assert_eq!(
            prefs.get_preferences(user(7)).await.unwrap_err(),
            PreferenceError::user_not_found(user(7))
        );
    }
}

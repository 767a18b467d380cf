//! Preference repository port.

use crate::domain::foundation::{CampaignGuid, DomainError, UserId};
use crate::domain::preference::{PreferenceEntry, PreferenceMap};
use async_trait::async_trait;

/// At most one row per `(user, campaign)`; no upserts.
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    /// Fails `UserNotFound`, `CampaignNotFound`, or `DuplicateKey`.
    async fn add(&self, user: UserId, campaign: CampaignGuid, is_preferred: bool) -> Result<(), DomainError>;

    /// Fails `UserNotFound`, `CampaignNotFound`, or `PreferenceNotFound`.
    async fn update(&self, user: UserId, campaign: CampaignGuid, is_preferred: bool) -> Result<(), DomainError>;

    /// Fails `UserNotFound`, `CampaignNotFound`, or `PreferenceNotFound`.
    async fn remove(&self, user: UserId, campaign: CampaignGuid) -> Result<(), DomainError>;

    /// Fails `UserNotFound`.
    async fn list_for_user(&self, user: UserId) -> Result<Vec<PreferenceEntry>, DomainError>;

    /// Raw map for ranking. Unknown users simply have no preferences.
    async fn preference_map(&self, user: UserId) -> Result<PreferenceMap, DomainError>;
}

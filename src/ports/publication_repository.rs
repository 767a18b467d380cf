//! Publication repository port.
//!
//! Publish-once semantics are enforced here: the existence check and the
//! insert of a publication are one atomic unit.

use crate::domain::foundation::{AnnouncementGuid, CampaignGuid, DomainError, EventGuid, UserId};
use crate::domain::publishing::{AnnouncementDraft, PublishedAnnouncement, PublishedEvent};
use async_trait::async_trait;

#[async_trait]
pub trait PublicationRepository: Send + Sync {
    /// Records `(publisher, now)` for a campaign event.
    ///
    /// # Errors
    ///
    /// - `EventNotFound`, `UserNotFound`
    /// - `IncorrectEventType` for personal events
    /// - `DuplicateKey` if already published
    async fn publish_event(
        &self,
        event: EventGuid,
        publisher: UserId,
    ) -> Result<PublishedEvent, DomainError>;

    /// # Errors
    ///
    /// - `EventNotFound` if the event has no publication
    async fn unpublish_event(&self, event: EventGuid) -> Result<(), DomainError>;

    /// Stores a validated draft as a new announcement.
    ///
    /// # Errors
    ///
    /// - `CampaignNotFound`, `UserNotFound`
    async fn publish_announcement(
        &self,
        campaign: CampaignGuid,
        publisher: UserId,
        draft: &AnnouncementDraft,
    ) -> Result<PublishedAnnouncement, DomainError>;

    /// # Errors
    ///
    /// - `AnnouncementNotFound`
    async fn unpublish_announcement(&self, announcement: AnnouncementGuid) -> Result<(), DomainError>;

    /// Published events of one campaign. Fails `CampaignNotFound`.
    async fn campaign_published_events(
        &self,
        campaign: CampaignGuid,
    ) -> Result<Vec<PublishedEvent>, DomainError>;

    /// Announcements of one campaign. Fails `CampaignNotFound`.
    async fn campaign_announcements(
        &self,
        campaign: CampaignGuid,
    ) -> Result<Vec<PublishedAnnouncement>, DomainError>;

    /// Every published event, in no particular order.
    async fn published_events(&self) -> Result<Vec<PublishedEvent>, DomainError>;

    /// Every announcement, in no particular order.
    async fn published_announcements(&self) -> Result<Vec<PublishedAnnouncement>, DomainError>;
}

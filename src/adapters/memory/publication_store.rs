//! PublicationRepository over the in-memory state.

use async_trait::async_trait;
use std::cmp::Reverse;

use crate::domain::directory::{CampaignSummary, UserContact};
use crate::domain::foundation::{
    AnnouncementGuid, CampaignGuid, DomainError, EventGuid, Timestamp, UserId,
};
use crate::domain::publishing::{
    Announcement, AnnouncementDraft, Publication, PublishedAnnouncement, PublishedEvent,
    PublishingError,
};
use crate::ports::PublicationRepository;

use super::{InMemoryStore, State};

impl State {
    fn published_event(&self, publication: &Publication) -> Result<PublishedEvent, DomainError> {
        let stored = self
            .events
            .get(&publication.event)
            .ok_or_else(|| DomainError::from(PublishingError::event_not_found(publication.event)))?;
        let campaign = stored
            .event
            .campaign()
            .ok_or_else(|| DomainError::from(PublishingError::incorrect_event_type(publication.event)))?;
        Ok(PublishedEvent {
            event: stored.event.clone(),
            campaign: self.campaign_summary(campaign)?,
            publisher: self.publisher(publication.publisher)?,
            published_at: publication.published_at,
        })
    }

    fn published_announcement(&self, announcement: &Announcement) -> Result<PublishedAnnouncement, DomainError> {
        Ok(PublishedAnnouncement {
            announcement: announcement.clone(),
            campaign: self.campaign_summary(announcement.campaign)?,
            publisher: self.publisher(announcement.publisher)?,
        })
    }

    fn campaign_summary(&self, campaign: CampaignGuid) -> Result<CampaignSummary, DomainError> {
        self.campaign(campaign)
            .cloned()
            .ok_or_else(|| PublishingError::campaign_not_found(campaign).into())
    }

    fn publisher(&self, user: UserId) -> Result<UserContact, DomainError> {
        self.user(user)
            .cloned()
            .ok_or_else(|| PublishingError::user_not_found(user).into())
    }

    fn events_where(
        &self,
        keep: impl Fn(&Publication) -> bool,
    ) -> Result<Vec<PublishedEvent>, DomainError> {
        let mut events = self
            .publications
            .values()
            .filter(|publication| keep(publication))
            .map(|publication| self.published_event(publication))
            .collect::<Result<Vec<_>, _>>()?;
        events.sort_by_key(|item| Reverse(item.published_at));
        Ok(events)
    }

    fn announcements_where(
        &self,
        keep: impl Fn(&Announcement) -> bool,
    ) -> Result<Vec<PublishedAnnouncement>, DomainError> {
        let mut announcements = self
            .announcements
            .values()
            .filter(|announcement| keep(announcement))
            .map(|announcement| self.published_announcement(announcement))
            .collect::<Result<Vec<_>, _>>()?;
        announcements.sort_by_key(|item| Reverse(item.announcement.published_at));
        Ok(announcements)
    }
}

#[async_trait]
impl PublicationRepository for InMemoryStore {
    async fn publish_event(&self, event: EventGuid, publisher: UserId) -> Result<PublishedEvent, DomainError> {
        let mut guard = self.state();
        let state = &mut *guard;

        let stored = state
            .events
            .get(&event)
            .ok_or_else(|| DomainError::from(PublishingError::event_not_found(event)))?;
        state.publisher(publisher)?;
        let publication = Publication::publish(
            &stored.event,
            state.publications.get(&event),
            publisher,
            Timestamp::now(),
        )?;

        let published = state.published_event(&publication)?;
        state.publications.insert(event, publication);
        Ok(published)
    }

    async fn unpublish_event(&self, event: EventGuid) -> Result<(), DomainError> {
        match self.state().publications.remove(&event) {
            Some(_) => Ok(()),
            None => Err(PublishingError::event_not_found(event).into()),
        }
    }

    async fn publish_announcement(
        &self,
        campaign: CampaignGuid,
        publisher: UserId,
        draft: &AnnouncementDraft,
    ) -> Result<PublishedAnnouncement, DomainError> {
        let mut guard = self.state();
        let state = &mut *guard;

        state.campaign_summary(campaign)?;
        state.publisher(publisher)?;

        let announcement = Announcement {
            guid: AnnouncementGuid::new(),
            campaign,
            publisher,
            title: draft.title.trim().to_string(),
            content: draft.content.trim().to_string(),
            published_at: Timestamp::now(),
        };
        let published = state.published_announcement(&announcement)?;
        state.announcements.insert(announcement.guid, announcement);
        Ok(published)
    }

    async fn unpublish_announcement(&self, announcement: AnnouncementGuid) -> Result<(), DomainError> {
        match self.state().announcements.remove(&announcement) {
            Some(_) => Ok(()),
            None => Err(PublishingError::announcement_not_found(announcement).into()),
        }
    }

    async fn campaign_published_events(&self, campaign: CampaignGuid) -> Result<Vec<PublishedEvent>, DomainError> {
        let state = self.state();
        state.campaign_summary(campaign)?;
        state.events_where(|publication| {
            state
                .events
                .get(&publication.event)
                .map_or(false, |stored| stored.event.belongs_to(campaign))
        })
    }

    async fn campaign_announcements(
        &self,
        campaign: CampaignGuid,
    ) -> Result<Vec<PublishedAnnouncement>, DomainError> {
        let state = self.state();
        state.campaign_summary(campaign)?;
        state.announcements_where(|announcement| announcement.campaign == campaign)
    }

    async fn published_events(&self) -> Result<Vec<PublishedEvent>, DomainError> {
        self.state().events_where(|_| true)
    }

    async fn published_announcements(&self) -> Result<Vec<PublishedAnnouncement>, DomainError> {
        self.state().announcements_where(|_| true)
    }
}

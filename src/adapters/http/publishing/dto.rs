//! HTTP DTOs for publishing endpoints.
//!
//! Member views include publisher contact details; general views use the
//! public projections from the domain.

use serde::{Deserialize, Serialize};

use crate::adapters::http::events::dto::EventResponse;
use crate::domain::directory::{CampaignSummary, UserContact};
use crate::domain::foundation::{AnnouncementGuid, Timestamp};
use crate::domain::publishing::{AnnouncementDraft, PublishedAnnouncement, PublishedEvent};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct PublishAnnouncementRequest {
    pub title: String,
    pub content: String,
}

impl From<PublishAnnouncementRequest> for AnnouncementDraft {
    fn from(request: PublishAnnouncementRequest) -> Self {
        AnnouncementDraft::new(request.title, request.content)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedEventResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub campaign: CampaignSummary,
    pub publisher: UserContact,
    pub published_at: Timestamp,
}

impl From<&PublishedEvent> for PublishedEventResponse {
    fn from(item: &PublishedEvent) -> Self {
        Self {
            event: EventResponse::from(&item.event),
            campaign: item.campaign.clone(),
            publisher: item.publisher.clone(),
            published_at: item.published_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedAnnouncementResponse {
    pub announcement_guid: AnnouncementGuid,
    pub title: String,
    pub content: String,
    pub campaign: CampaignSummary,
    pub publisher: UserContact,
    pub published_at: Timestamp,
}

impl From<&PublishedAnnouncement> for PublishedAnnouncementResponse {
    fn from(item: &PublishedAnnouncement) -> Self {
        Self {
            announcement_guid: item.announcement.guid,
            title: item.announcement.title.clone(),
            content: item.announcement.content.clone(),
            campaign: item.campaign.clone(),
            publisher: item.publisher.clone(),
            published_at: item.announcement.published_at,
        }
    }
}

//! Published read models and their public projections.
//!
//! Member views carry the full publisher contact. Public views keep only the
//! publisher's display name and drop every internal id.

use serde::{Deserialize, Serialize};

use crate::domain::directory::{CampaignSummary, UserContact};
use crate::domain::event::Event;
use crate::domain::foundation::{AnnouncementGuid, CampaignGuid, EventGuid, Timestamp};

use super::Announcement;

/// A published event with campaign and publisher details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedEvent {
    pub event: Event,
    pub campaign: CampaignSummary,
    pub publisher: UserContact,
    pub published_at: Timestamp,
}

/// A published announcement with campaign and publisher details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedAnnouncement {
    pub announcement: Announcement,
    pub campaign: CampaignSummary,
    pub publisher: UserContact,
}

/// Campaign fields shown on the public board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicCampaign {
    pub guid: CampaignGuid,
    pub name: String,
    pub logo_url: Option<String>,
}

impl From<&CampaignSummary> for PublicCampaign {
    fn from(summary: &CampaignSummary) -> Self {
        Self {
            guid: summary.guid,
            name: summary.name.clone(),
            logo_url: summary.logo_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicEvent {
    pub event_guid: EventGuid,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub max_attendees: Option<i32>,
    pub is_open_join: bool,
    pub campaign: PublicCampaign,
    pub publisher_name: String,
    pub published_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicAnnouncement {
    pub announcement_guid: AnnouncementGuid,
    pub title: String,
    pub content: String,
    pub campaign: PublicCampaign,
    pub publisher_name: String,
    pub published_at: Timestamp,
}

impl PublishedEvent {
    pub fn to_public(&self) -> PublicEvent {
        PublicEvent {
            event_guid: self.event.guid,
            name: self.event.name.clone(),
            description: self.event.description.clone(),
            location: self.event.location.clone(),
            start_time: self.event.start_time,
            end_time: self.event.end_time,
            max_attendees: self.event.max_attendees,
            is_open_join: self.event.is_open_join,
            campaign: PublicCampaign::from(&self.campaign),
            publisher_name: self.publisher.public_name(),
            published_at: self.published_at,
        }
    }
}

impl PublishedAnnouncement {
    pub fn to_public(&self) -> PublicAnnouncement {
        PublicAnnouncement {
            announcement_guid: self.announcement.guid,
            title: self.announcement.title.clone(),
            content: self.announcement.content.clone(),
            campaign: PublicCampaign::from(&self.campaign),
            publisher_name: self.publisher.public_name(),
            published_at: self.announcement.published_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::EventOwner;
    use crate::domain::foundation::{EventId, UserId};

    fn published() -> PublishedEvent {
        let campaign = CampaignGuid::new();
        PublishedEvent {
            event: Event {
                id: EventId::from_raw(11),
                guid: EventGuid::new(),
                name: "Phone bank".to_string(),
                description: None,
                location: Some("HQ".to_string()),
                start_time: None,
                end_time: None,
                max_attendees: Some(20),
                is_open_join: true,
                creator: UserId::new(8).unwrap(),
                owner: EventOwner::Campaign(campaign),
            },
            campaign: CampaignSummary {
                guid: campaign,
                name: "Vale for Council".to_string(),
                city: Some("Haifa".to_string()),
                logo_url: None,
            },
            publisher: UserContact {
                user_id: UserId::new(8).unwrap(),
                first_name: Some("Dana".to_string()),
                last_name: Some("Vale".to_string()),
                display_name: "dana".to_string(),
                email: "dana@example.org".to_string(),
                phone: Some("+972500000000".to_string()),
                profile_pic_url: None,
            },
            published_at: Timestamp::now(),
        }
    }

    #[test]
    fn public_event_strips_publisher_contact() {
        let public = published().to_public();
        let json = serde_json::to_value(&public).unwrap();

        assert_eq!(json["publisher_name"], "Dana Vale");
        let text = json.to_string();
        assert!(!text.contains("dana@example.org"));
        assert!(!text.contains("+972500000000"));
        assert!(json.get("id").is_none());
        assert!(json.get("creator").is_none());
    }

    #[test]
    fn public_campaign_omits_city() {
        let public = published().to_public();
        let json = serde_json::to_value(&public.campaign).unwrap();
        assert!(json.get("city").is_none());
        assert_eq!(json["name"], "Vale for Council");
    }
}

//! Publication of campaign events.

use serde::{Deserialize, Serialize};

use crate::domain::event::Event;
use crate::domain::foundation::{EventGuid, Timestamp, UserId};

use super::PublishingError;

/// The 1:1 publication record of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub event: EventGuid,
    pub publisher: UserId,
    pub published_at: Timestamp,
}

impl Publication {
    /// Publishes `event` now, provided it is a campaign event without a
    /// publication yet.
    pub fn publish(
        event: &Event,
        existing: Option<&Publication>,
        publisher: UserId,
        now: Timestamp,
    ) -> Result<Self, PublishingError> {
        if !event.is_campaign_event() {
            return Err(PublishingError::incorrect_event_type(event.guid));
        }
        if existing.is_some() {
            return Err(PublishingError::already_published(event.guid));
        }
        Ok(Self {
            event: event.guid,
            publisher,
            published_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::EventOwner;
    use crate::domain::foundation::{CampaignGuid, ErrorCode, EventId};

    fn event(owner: EventOwner) -> Event {
        Event {
            id: EventId::from_raw(7),
            guid: EventGuid::new(),
            name: "Town hall".to_string(),
            description: None,
            location: None,
            start_time: None,
            end_time: None,
            max_attendees: None,
            is_open_join: false,
            creator: UserId::new(1).unwrap(),
            owner,
        }
    }

    #[test]
    fn publishes_campaign_event() {
        let e = event(EventOwner::Campaign(CampaignGuid::new()));
        let now = Timestamp::now();
        let publisher = UserId::new(2).unwrap();

        let publication = Publication::publish(&e, None, publisher, now).unwrap();

        assert_eq!(publication.event, e.guid);
        assert_eq!(publication.publisher, publisher);
        assert_eq!(publication.published_at, now);
    }

    #[test]
    fn personal_event_is_incorrect_type() {
        let e = event(EventOwner::Personal(UserId::new(1).unwrap()));

        let err = Publication::publish(&e, None, UserId::new(1).unwrap(), Timestamp::now())
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::IncorrectEventType);
    }

    #[test]
    fn second_publish_is_duplicate_and_keeps_date() {
        let e = event(EventOwner::Campaign(CampaignGuid::new()));
        let first = Publication::publish(&e, None, UserId::new(2).unwrap(), Timestamp::now()).unwrap();

        let err = Publication::publish(
            &e,
            Some(&first),
            UserId::new(3).unwrap(),
            first.published_at.add_days(1),
        )
        .unwrap_err();

        assert_eq!(err.code(), ErrorCode::DuplicateKey);
    }
}

//! HTTP DTOs for event endpoints.
//!
//! Responses carry external guids only; the internal numeric event id stays
//! in the backend.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::directory::UserContact;
use crate::domain::event::{
    CreatedEvent, Event, EventDetails, EventOwner, EventPatch, FieldPatch, MemberRole,
    MembershipTransition, NewEvent, UserEvent,
};
use crate::domain::foundation::{CampaignGuid, EventGuid, Timestamp, UserId};
use crate::domain::notification::NotifyOptions;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create a personal or campaign event.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_time: Option<Timestamp>,
    #[serde(default)]
    pub end_time: Option<Timestamp>,
    /// Absent means unlimited.
    #[serde(default)]
    pub max_attendees: Option<i32>,
    #[serde(default)]
    pub is_open_join: bool,
}

impl CreateEventRequest {
    pub fn into_new_event(self, creator: UserId, owner: EventOwner) -> NewEvent {
        NewEvent {
            name: self.name,
            description: self.description,
            location: self.location,
            start_time: self.start_time,
            end_time: self.end_time,
            max_attendees: self.max_attendees,
            is_open_join: self.is_open_join,
            creator,
            owner,
        }
    }
}

/// Partial update. For nullable fields an absent key leaves the value,
/// `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub start_time: Option<Option<Timestamp>>,
    #[serde(default, deserialize_with = "present")]
    pub end_time: Option<Option<Timestamp>>,
    #[serde(default, deserialize_with = "present")]
    pub max_attendees: Option<Option<i32>>,
    #[serde(default)]
    pub is_open_join: Option<bool>,
    /// Moves a campaign event to another campaign.
    #[serde(default)]
    pub campaign_guid: Option<CampaignGuid>,
    #[serde(default)]
    pub notify: NotifyOptions,
}

/// Marks a key as present, so `null` becomes `Some(None)`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateEventRequest {
    pub fn into_patch(self) -> (EventPatch, NotifyOptions) {
        let patch = EventPatch {
            name: self.name,
            description: FieldPatch::from_wire(self.description),
            location: FieldPatch::from_wire(self.location),
            start_time: FieldPatch::from_wire(self.start_time),
            end_time: FieldPatch::from_wire(self.end_time),
            max_attendees: FieldPatch::from_wire(self.max_attendees),
            is_open_join: self.is_open_join,
            campaign: self.campaign_guid,
        };
        (patch, self.notify)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedEventResponse {
    pub event_guid: EventGuid,
}

impl From<CreatedEvent> for CreatedEventResponse {
    fn from(created: CreatedEvent) -> Self {
        Self {
            event_guid: created.guid,
        }
    }
}

/// Event fields as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventResponse {
    pub event_guid: EventGuid,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub max_attendees: Option<i32>,
    pub is_open_join: bool,
    /// Set for campaign events only.
    pub campaign_guid: Option<CampaignGuid>,
    pub creator_id: UserId,
}

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        Self {
            event_guid: event.guid,
            name: event.name.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            start_time: event.start_time,
            end_time: event.end_time,
            max_attendees: event.max_attendees,
            is_open_join: event.is_open_join,
            campaign_guid: event.campaign(),
            creator_id: event.creator,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetailsResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub creator: UserContact,
    pub attending: usize,
}

impl From<&EventDetails> for EventDetailsResponse {
    fn from(details: &EventDetails) -> Self {
        Self {
            event: EventResponse::from(&details.event),
            creator: details.creator.clone(),
            attending: details.attending,
        }
    }
}

/// One of the caller's events and whether they attend or watch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEventResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub participating: bool,
}

impl From<&UserEvent> for UserEventResponse {
    fn from(entry: &UserEvent) -> Self {
        Self {
            event: EventResponse::from(&entry.event),
            participating: entry.participating(),
        }
    }
}

/// Outcome of a join or watch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipResponse {
    pub user_id: UserId,
    pub role: MemberRole,
    pub previous_role: Option<MemberRole>,
}

impl From<MembershipTransition> for MembershipResponse {
    fn from(transition: MembershipTransition) -> Self {
        Self {
            user_id: transition.user,
            role: transition.current,
            previous_role: transition.previous,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedResponse {
    pub removed: bool,
}

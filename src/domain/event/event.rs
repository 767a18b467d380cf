//! Event entity, creation input and partial-update patch.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    CampaignGuid, EventGuid, EventId, Timestamp, UserId, ValidationError,
};

use super::{EventError, MemberRole};

/// Who owns an event. Exactly one owner, by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EventOwner {
    Campaign(CampaignGuid),
    Personal(UserId),
}

/// A scheduled event, either personal or campaign-scoped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub guid: EventGuid,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    /// `None` means unlimited.
    pub max_attendees: Option<i32>,
    pub is_open_join: bool,
    pub creator: UserId,
    pub owner: EventOwner,
}

impl Event {
    pub fn campaign(&self) -> Option<CampaignGuid> {
        match self.owner {
            EventOwner::Campaign(campaign) => Some(campaign),
            EventOwner::Personal(_) => None,
        }
    }

    pub fn is_campaign_event(&self) -> bool {
        matches!(self.owner, EventOwner::Campaign(_))
    }

    pub fn is_personal_event(&self) -> bool {
        matches!(self.owner, EventOwner::Personal(_))
    }

    /// True if this is a campaign event of exactly `campaign`.
    pub fn belongs_to(&self, campaign: CampaignGuid) -> bool {
        self.campaign() == Some(campaign)
    }

    pub fn is_created_by(&self, user: UserId) -> bool {
        self.creator == user
    }

    /// Applies `patch` in place.
    ///
    /// `participants` is the current participant count; it is needed to reject
    /// a capacity lower than the number already attending. Callers must hold
    /// whatever lock or transaction protects the event row.
    pub fn apply_patch(&mut self, patch: &EventPatch, participants: usize) -> Result<(), EventError> {
        patch.validate()?;

        if patch.campaign.is_some() && self.is_personal_event() {
            return Err(EventError::incorrect_event_type(self.guid));
        }
        if let FieldPatch::Set(max) = patch.max_attendees {
            if (max as usize) < participants {
                return Err(EventError::capacity_below_participants(max, participants));
            }
        }

        if let Some(campaign) = patch.campaign {
            self.owner = EventOwner::Campaign(campaign);
        }
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        patch.description.clone().apply_to(&mut self.description);
        patch.location.clone().apply_to(&mut self.location);
        patch.start_time.clone().apply_to(&mut self.start_time);
        patch.end_time.clone().apply_to(&mut self.end_time);
        patch.max_attendees.clone().apply_to(&mut self.max_attendees);
        if let Some(open) = patch.is_open_join {
            self.is_open_join = open;
        }
        Ok(())
    }
}

/// Input for creating an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub max_attendees: Option<i32>,
    pub is_open_join: bool,
    pub creator: UserId,
    pub owner: EventOwner,
}

impl NewEvent {
    /// A personal event owned by its creator.
    pub fn personal(creator: UserId, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            location: None,
            start_time: None,
            end_time: None,
            max_attendees: None,
            is_open_join: false,
            creator,
            owner: EventOwner::Personal(creator),
        }
    }

    /// A campaign event created by `creator` on behalf of `campaign`.
    pub fn for_campaign(creator: UserId, campaign: CampaignGuid, name: impl Into<String>) -> Self {
        Self {
            owner: EventOwner::Campaign(campaign),
            ..Self::personal(creator, name)
        }
    }

    pub fn with_max_attendees(mut self, max: i32) -> Self {
        self.max_attendees = Some(max);
        self
    }

    pub fn open_join(mut self) -> Self {
        self.is_open_join = true;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        validate_capacity(self.max_attendees)
    }

    /// The membership granted to the creator when the event is created.
    ///
    /// Personal events start with the creator attending; campaign events start
    /// with the creator watching, outside the capacity count.
    pub fn creator_membership(&self) -> (UserId, MemberRole) {
        match self.owner {
            EventOwner::Personal(_) => (self.creator, MemberRole::Participant),
            EventOwner::Campaign(_) => (self.creator, MemberRole::Watcher),
        }
    }
}

fn validate_capacity(max_attendees: Option<i32>) -> Result<(), ValidationError> {
    match max_attendees {
        Some(max) if max <= 0 => Err(ValidationError::out_of_range(
            "max_attendees",
            1,
            i32::MAX as i64,
            max as i64,
        )),
        _ => Ok(()),
    }
}

/// Change to a nullable field.
///
/// Distinguishes "leave as is" from "set to null", which a plain `Option`
/// cannot express.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldPatch<T> {
    #[default]
    Unchanged,
    Set(T),
    Clear,
}

impl<T> FieldPatch<T> {
    pub fn apply_to(self, target: &mut Option<T>) {
        match self {
            FieldPatch::Unchanged => {}
            FieldPatch::Set(value) => *target = Some(value),
            FieldPatch::Clear => *target = None,
        }
    }

    /// Builds a patch from the wire convention: absent, `null`, or a value.
    pub fn from_wire(value: Option<Option<T>>) -> Self {
        match value {
            None => FieldPatch::Unchanged,
            Some(None) => FieldPatch::Clear,
            Some(Some(v)) => FieldPatch::Set(v),
        }
    }
}

/// Partial update of an event. Unset fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventPatch {
    pub name: Option<String>,
    pub description: FieldPatch<String>,
    pub location: FieldPatch<String>,
    pub start_time: FieldPatch<Timestamp>,
    pub end_time: FieldPatch<Timestamp>,
    pub max_attendees: FieldPatch<i32>,
    pub is_open_join: Option<bool>,
    /// Re-points a campaign event at another campaign.
    pub campaign: Option<CampaignGuid>,
}

impl EventPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::empty_field("name"));
            }
        }
        if let FieldPatch::Set(max) = self.max_attendees {
            validate_capacity(Some(max))?;
        }
        Ok(())
    }
}

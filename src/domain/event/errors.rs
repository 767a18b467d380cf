//! Event-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound / CampaignNotFound / UserNotFound | 404 |
//! | AlreadyFull / AlreadyMember / CapacityBelowParticipants | 409 |
//! | IncorrectEventType / Validation | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{
    CampaignGuid, DomainError, ErrorCode, EventGuid, UserId, ValidationError,
};

use super::MemberRole;

/// Event registry errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// Event does not exist.
    NotFound(EventGuid),

    /// Referenced campaign does not exist.
    CampaignNotFound(CampaignGuid),

    /// User could not be resolved (by id or by email).
    UserNotFound(String),

    /// Participant count already equals capacity.
    AlreadyFull { event: EventGuid, capacity: i32 },

    /// User already holds this role.
    AlreadyMember {
        event: EventGuid,
        user: UserId,
        role: MemberRole,
    },

    /// Requested capacity is lower than the current participant count.
    CapacityBelowParticipants { requested: i32, participants: usize },

    /// Operation needs a campaign event but got a personal one.
    IncorrectEventType(EventGuid),

    /// Input failed validation before reaching storage.
    Validation(ValidationError),

    /// Storage or another collaborator failed.
    Infrastructure(DomainError),
}

impl EventError {
    pub fn not_found(event: EventGuid) -> Self {
        EventError::NotFound(event)
    }

    pub fn campaign_not_found(campaign: CampaignGuid) -> Self {
        EventError::CampaignNotFound(campaign)
    }

    pub fn user_not_found(user: impl ToString) -> Self {
        EventError::UserNotFound(user.to_string())
    }

    pub fn already_full(event: EventGuid, capacity: i32) -> Self {
        EventError::AlreadyFull { event, capacity }
    }

    pub fn already_member(event: EventGuid, user: UserId, role: MemberRole) -> Self {
        EventError::AlreadyMember { event, user, role }
    }

    pub fn capacity_below_participants(requested: i32, participants: usize) -> Self {
        EventError::CapacityBelowParticipants {
            requested,
            participants,
        }
    }

    pub fn incorrect_event_type(event: EventGuid) -> Self {
        EventError::IncorrectEventType(event)
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EventError::NotFound(_) => ErrorCode::EventNotFound,
            EventError::CampaignNotFound(_) => ErrorCode::CampaignNotFound,
            EventError::UserNotFound(_) => ErrorCode::UserNotFound,
            EventError::AlreadyFull { .. } => ErrorCode::EventAlreadyFull,
            EventError::AlreadyMember { .. } => ErrorCode::DuplicateKey,
            EventError::CapacityBelowParticipants { .. } => ErrorCode::CapacityBelowParticipants,
            EventError::IncorrectEventType(_) => ErrorCode::IncorrectEventType,
            EventError::Validation(err) => err.code(),
            EventError::Infrastructure(err) => err.code,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            EventError::NotFound(event) => format!("Event not found: {}", event),
            EventError::CampaignNotFound(campaign) => format!("Campaign not found: {}", campaign),
            EventError::UserNotFound(user) => format!("User not found: {}", user),
            EventError::AlreadyFull { capacity, .. } => {
                format!("Event is full ({} attendees max)", capacity)
            }
            EventError::AlreadyMember { role, .. } => match role {
                MemberRole::Participant => "User is already participating".to_string(),
                MemberRole::Watcher => "User is already watching".to_string(),
            },
            EventError::CapacityBelowParticipants {
                requested,
                participants,
            } => format!(
                "Cannot lower capacity to {} with {} participants",
                requested, participants
            ),
            EventError::IncorrectEventType(_) => {
                "Operation requires a campaign event".to_string()
            }
            EventError::Validation(err) => err.to_string(),
            EventError::Infrastructure(err) => err.message.clone(),
        }
    }
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for EventError {}

impl From<ValidationError> for EventError {
    fn from(err: ValidationError) -> Self {
        EventError::Validation(err)
    }
}

impl From<DomainError> for EventError {
    fn from(err: DomainError) -> Self {
        let rebuilt = match err.code {
            ErrorCode::EventNotFound => err.detail("event_guid").map(EventError::NotFound),
            ErrorCode::CampaignNotFound => {
                err.detail("campaign_guid").map(EventError::CampaignNotFound)
            }
            ErrorCode::UserNotFound => err.details.get("user").cloned().map(EventError::UserNotFound),
            ErrorCode::EventAlreadyFull => err
                .detail("event_guid")
                .zip(err.detail("capacity"))
                .map(|(event, capacity)| EventError::AlreadyFull { event, capacity }),
            ErrorCode::DuplicateKey => match (
                err.detail("event_guid"),
                err.detail("user_id").and_then(|id: i64| UserId::new(id).ok()),
                err.detail("role"),
            ) {
                (Some(event), Some(user), Some(role)) => {
                    Some(EventError::AlreadyMember { event, user, role })
                }
                _ => None,
            },
            ErrorCode::CapacityBelowParticipants => err
                .detail("requested")
                .zip(err.detail("participants"))
                .map(|(requested, participants)| EventError::CapacityBelowParticipants {
                    requested,
                    participants,
                }),
            ErrorCode::IncorrectEventType => {
                err.detail("event_guid").map(EventError::IncorrectEventType)
            }
            _ => None,
        };
        rebuilt.unwrap_or(EventError::Infrastructure(err))
    }
}

impl From<EventError> for DomainError {
    fn from(err: EventError) -> Self {
        let base = DomainError::new(err.code(), err.message());
        match err {
            EventError::NotFound(event) | EventError::IncorrectEventType(event) => {
                base.with_detail("event_guid", event.to_string())
            }
            EventError::CampaignNotFound(campaign) => {
                base.with_detail("campaign_guid", campaign.to_string())
            }
            EventError::UserNotFound(user) => base.with_detail("user", user),
            EventError::AlreadyFull { event, capacity } => base
                .with_detail("event_guid", event.to_string())
                .with_detail("capacity", capacity.to_string()),
            EventError::AlreadyMember { event, user, role } => base
                .with_detail("event_guid", event.to_string())
                .with_detail("user_id", user.to_string())
                .with_detail("role", role.as_str()),
            EventError::CapacityBelowParticipants {
                requested,
                participants,
            } => base
                .with_detail("requested", requested.to_string())
                .with_detail("participants", participants.to_string()),
            EventError::Validation(inner) => inner.into(),
            EventError::Infrastructure(inner) => inner,
        }
    }
}

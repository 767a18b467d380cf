//! Authorization support types.
//!
//! The campaign permission matrix lives outside this service; it is consulted
//! through the `Authorizer` port with a single yes/no question per
//! `(user, campaign, Permission)`. This module defines the vocabulary of that
//! question and the error raised when the answer is "no".
//!
//! ```text
//! foundation/authorization.rs  <- Permission + AccessError (this module)
//! application/authorization.rs <- AuthorizationContext + access policy
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{CampaignGuid, DomainError, ErrorCode, EventGuid, UserId};

/// Resource area a campaign permission applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionTarget {
    Events,
    Publishing,
}

/// What the user wants to do with the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    View,
    Edit,
}

/// A campaign-scoped permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub target: PermissionTarget,
    pub action: PermissionAction,
}

impl Permission {
    pub const fn new(target: PermissionTarget, action: PermissionAction) -> Self {
        Self { target, action }
    }

    pub const fn view(target: PermissionTarget) -> Self {
        Self::new(target, PermissionAction::View)
    }

    pub const fn edit(target: PermissionTarget) -> Self {
        Self::new(target, PermissionAction::Edit)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match self.target {
            PermissionTarget::Events => "events",
            PermissionTarget::Publishing => "publishing",
        };
        let action = match self.action {
            PermissionAction::View => "view",
            PermissionAction::Edit => "edit",
        };
        write!(f, "{}:{}", target, action)
    }
}

/// Access denied, or the access check itself failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// No authenticated user on the request.
    Unauthenticated,

    /// The user lacks the campaign permission.
    PermissionDenied {
        user: UserId,
        campaign: CampaignGuid,
        permission: Permission,
    },

    /// Personal event managed by someone other than its creator.
    NotEventCreator { user: UserId, event: EventGuid },

    /// The event does not belong to the campaign named in the request.
    BoundaryViolation {
        event: EventGuid,
        campaign: CampaignGuid,
    },

    /// The authorizer or storage failed while checking.
    Infrastructure(DomainError),
}

impl AccessError {
    pub fn permission_denied(user: UserId, campaign: CampaignGuid, permission: Permission) -> Self {
        AccessError::PermissionDenied {
            user,
            campaign,
            permission,
        }
    }

    pub fn not_event_creator(user: UserId, event: EventGuid) -> Self {
        AccessError::NotEventCreator { user, event }
    }

    pub fn boundary_violation(event: EventGuid, campaign: CampaignGuid) -> Self {
        AccessError::BoundaryViolation { event, campaign }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AccessError::Unauthenticated => ErrorCode::Unauthorized,
            AccessError::PermissionDenied { .. } | AccessError::NotEventCreator { .. } => {
                ErrorCode::PermissionDenied
            }
            AccessError::BoundaryViolation { .. } => ErrorCode::BoundaryViolation,
            AccessError::Infrastructure(err) => err.code,
        }
    }

    /// Returns a user-facing message.
    pub fn message(&self) -> String {
        match self {
            AccessError::Unauthenticated => "Authentication required".to_string(),
            AccessError::PermissionDenied { permission, .. } => {
                format!("Missing campaign permission {}", permission)
            }
            AccessError::NotEventCreator { .. } => {
                "Only the event creator may manage this event".to_string()
            }
            AccessError::BoundaryViolation { event, campaign } => {
                format!("Event {} does not belong to campaign {}", event, campaign)
            }
            AccessError::Infrastructure(err) => err.message.clone(),
        }
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AccessError {}

impl From<DomainError> for AccessError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Unauthorized => AccessError::Unauthenticated,
            ErrorCode::BoundaryViolation => {
                match (
                    err.detail::<EventGuid>("event_guid"),
                    err.detail::<CampaignGuid>("campaign_guid"),
                ) {
                    (Some(event), Some(campaign)) => AccessError::BoundaryViolation { event, campaign },
                    _ => AccessError::Infrastructure(err),
                }
            }
            _ => AccessError::Infrastructure(err),
        }
    }
}

impl From<AccessError> for DomainError {
    fn from(err: AccessError) -> Self {
        let base = DomainError::new(err.code(), err.message());
        match err {
            AccessError::PermissionDenied {
                user,
                campaign,
                permission,
            } => base
                .with_detail("user_id", user.to_string())
                .with_detail("campaign_guid", campaign.to_string())
                .with_detail("permission", permission.to_string()),
            AccessError::NotEventCreator { user, event } => base
                .with_detail("user_id", user.to_string())
                .with_detail("event_guid", event.to_string()),
            AccessError::BoundaryViolation { event, campaign } => base
                .with_detail("event_guid", event.to_string())
                .with_detail("campaign_guid", campaign.to_string()),
            AccessError::Infrastructure(inner) => inner,
            AccessError::Unauthenticated => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::new(3).unwrap()
    }

    #[test]
    fn permission_displays_target_and_action() {
        assert_eq!(
            Permission::edit(PermissionTarget::Publishing).to_string(),
            "publishing:edit"
        );
        assert_eq!(Permission::view(PermissionTarget::Events).to_string(), "events:view");
    }

    #[test]
    fn denial_kinds_map_to_authorization_codes() {
        let campaign = CampaignGuid::new();
        let event = EventGuid::new();

        assert_eq!(AccessError::Unauthenticated.code(), ErrorCode::Unauthorized);
        assert_eq!(
            AccessError::permission_denied(user(), campaign, Permission::edit(PermissionTarget::Events)).code(),
            ErrorCode::PermissionDenied
        );
        assert_eq!(
            AccessError::not_event_creator(user(), event).code(),
            ErrorCode::PermissionDenied
        );
        assert_eq!(
            AccessError::boundary_violation(event, campaign).code(),
            ErrorCode::BoundaryViolation
        );
    }

    #[test]
    fn boundary_violation_survives_domain_error_roundtrip() {
        let original = AccessError::boundary_violation(EventGuid::new(), CampaignGuid::new());
        let domain: DomainError = original.clone().into();
        assert_eq!(AccessError::from(domain), original);
    }

    #[test]
    fn infrastructure_keeps_original_code() {
        let err = AccessError::from(DomainError::database("connection reset"));
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }
}

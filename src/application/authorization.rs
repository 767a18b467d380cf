//! Access policy for event and publishing operations.
//!
//! Services never authorize; callers do, through an [`AuthorizationContext`]
//! built once per request. Campaign permissions come from the `Authorizer`
//! port. Personal events follow creator-only rules with two exceptions:
//! anyone may remove themselves, and anyone may add themselves to an
//! open-join event.

use std::sync::Arc;

use crate::domain::event::Event;
use crate::domain::foundation::{AccessError, CampaignGuid, Permission, UserId};
use crate::ports::Authorizer;

/// The authenticated user of one request and the authorizer to ask.
#[derive(Clone)]
pub struct AuthorizationContext {
    user: UserId,
    authorizer: Arc<dyn Authorizer>,
}

impl AuthorizationContext {
    pub fn new(user: UserId, authorizer: Arc<dyn Authorizer>) -> Self {
        Self { user, authorizer }
    }

    /// Fails unless the user holds `permission` on `campaign`.
    pub async fn require(&self, campaign: CampaignGuid, permission: Permission) -> Result<(), AccessError> {
        if self.authorizer.is_allowed(self.user, campaign, permission).await? {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %self.user,
                campaign_guid = %campaign,
                permission = %permission,
                "permission denied"
            );
            Err(AccessError::permission_denied(self.user, campaign, permission))
        }
    }

    /// Campaign permission plus the check that `event` belongs to `campaign`.
    pub async fn require_in_campaign(
        &self,
        event: &Event,
        campaign: CampaignGuid,
        permission: Permission,
    ) -> Result<(), AccessError> {
        self.require(campaign, permission).await?;
        ensure_event_in_campaign(event, campaign)
    }

    /// Creator-only management of a personal event.
    pub fn require_creator(&self, event: &Event) -> Result<(), AccessError> {
        if event.is_created_by(self.user) {
            Ok(())
        } else {
            Err(AccessError::not_event_creator(self.user, event.guid))
        }
    }

    /// The creator may add anyone; others only themselves, and only when the
    /// event is open-join.
    pub fn require_can_add_participant(&self, event: &Event, target: UserId) -> Result<(), AccessError> {
        if event.is_created_by(self.user) || (event.is_open_join && target == self.user) {
            Ok(())
        } else {
            Err(AccessError::not_event_creator(self.user, event.guid))
        }
    }

    /// The creator may remove anyone; others only themselves.
    pub fn require_can_remove_participant(&self, event: &Event, target: UserId) -> Result<(), AccessError> {
        if event.is_created_by(self.user) || target == self.user {
            Ok(())
        } else {
            Err(AccessError::not_event_creator(self.user, event.guid))
        }
    }
}

/// Guards against an event guid from another campaign being used under
/// this campaign's permissions.
fn ensure_event_in_campaign(event: &Event, campaign: CampaignGuid) -> Result<(), AccessError> {
    if event.belongs_to(campaign) {
        Ok(())
    } else {
        Err(AccessError::boundary_violation(event.guid, campaign))
    }
}

//! Static grant-table implementation of the `Authorizer` port.
//!
//! The real permission matrix belongs to the campaign administration
//! service. This adapter answers from a fixed set of grants, loaded from
//! seed data at startup or registered directly by tests.
//!
//! # Usage
//!
//! ```ignore
//! use campaign_board::adapters::authorization::StaticAuthorizer;
//!
//! let authorizer = StaticAuthorizer::new()
//!     .grant(user, campaign, Permission::edit(PermissionTarget::Events));
//! ```

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::foundation::{
    CampaignGuid, DomainError, Permission, PermissionAction, PermissionTarget, UserId,
};
use crate::ports::Authorizer;

/// One row of the grant table as it appears in seed files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Grant {
    pub user_id: UserId,
    pub campaign_guid: CampaignGuid,
    pub target: PermissionTarget,
    pub action: PermissionAction,
}

impl Grant {
    pub fn permission(&self) -> Permission {
        Permission::new(self.target, self.action)
    }
}

/// Authorizer backed by an in-process grant set.
///
/// An `Edit` grant does not imply `View`; each permission is granted
/// explicitly.
#[derive(Debug, Default)]
pub struct StaticAuthorizer {
    grants: RwLock<HashSet<(UserId, CampaignGuid, Permission)>>,
    allow_all: bool,
}

impl StaticAuthorizer {
    /// Creates an authorizer that denies everything until grants are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an authorizer that allows every request (local development).
    pub fn allowing_all() -> Self {
        Self {
            allow_all: true,
            ..Self::default()
        }
    }

    pub fn from_grants(grants: impl IntoIterator<Item = Grant>) -> Self {
        let authorizer = Self::new();
        for grant in grants {
            authorizer.insert(grant.user_id, grant.campaign_guid, grant.permission());
        }
        authorizer
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn grant(self, user: UserId, campaign: CampaignGuid, permission: Permission) -> Self {
        self.insert(user, campaign, permission);
        self
    }

    pub fn insert(&self, user: UserId, campaign: CampaignGuid, permission: Permission) {
        self.grants
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((user, campaign, permission));
    }

    pub fn revoke(&self, user: UserId, campaign: CampaignGuid, permission: Permission) -> bool {
        self.grants
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(user, campaign, permission))
    }

    pub fn len(&self) -> usize {
        self.grants.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Authorizer for StaticAuthorizer {
    async fn is_allowed(
        &self,
        user: UserId,
        campaign: CampaignGuid,
        permission: Permission,
    ) -> Result<bool, DomainError> {
        if self.allow_all {
            return Ok(true);
        }
        Ok(self
            .grants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(user, campaign, permission)))
    }
}

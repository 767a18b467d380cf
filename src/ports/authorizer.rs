//! Campaign permission check port.
//!
//! The permission matrix is owned elsewhere. This service only asks one
//! question: may `user` perform `permission` in `campaign`?
//!
//! # Example
//!
//! ```ignore
//! if !authorizer.is_allowed(user, campaign, Permission::edit(PermissionTarget::Events)).await? {
//!     return Err(AccessError::permission_denied(user, campaign, permission));
//! }
//! ```

use crate::domain::foundation::{CampaignGuid, DomainError, Permission, UserId};
use async_trait::async_trait;

#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Returns `Ok(false)` for a denial; `Err` only when the check itself failed.
    async fn is_allowed(
        &self,
        user: UserId,
        campaign: CampaignGuid,
        permission: Permission,
    ) -> Result<bool, DomainError>;
}

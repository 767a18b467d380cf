//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, permissions and error types
//! that form the vocabulary of the campaign board domain.

mod authorization;
mod errors;
mod ids;
mod timestamp;

pub use authorization::{AccessError, Permission, PermissionAction, PermissionTarget};
pub use errors::{DomainError, ErrorCategory, ErrorCode, ValidationError};
pub use ids::{AnnouncementGuid, CampaignGuid, EventGuid, EventId, UserId};
pub use timestamp::Timestamp;

//! Publishing-specific error types.

use crate::domain::foundation::{
    AnnouncementGuid, CampaignGuid, DomainError, ErrorCode, EventGuid, UserId, ValidationError,
};

/// Publication gateway errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishingError {
    /// Event does not exist, or is not published when unpublishing.
    EventNotFound(EventGuid),

    UserNotFound(UserId),

    CampaignNotFound(CampaignGuid),

    AnnouncementNotFound(AnnouncementGuid),

    /// Event already carries a publication.
    AlreadyPublished(EventGuid),

    /// Personal events can never be published.
    IncorrectEventType(EventGuid),

    TitleTooLong { length: usize },

    ContentTooLong { length: usize },

    Validation(ValidationError),

    Infrastructure(DomainError),
}

impl PublishingError {
    pub fn event_not_found(event: EventGuid) -> Self {
        PublishingError::EventNotFound(event)
    }

    pub fn user_not_found(user: UserId) -> Self {
        PublishingError::UserNotFound(user)
    }

    pub fn campaign_not_found(campaign: CampaignGuid) -> Self {
        PublishingError::CampaignNotFound(campaign)
    }

    pub fn announcement_not_found(announcement: AnnouncementGuid) -> Self {
        PublishingError::AnnouncementNotFound(announcement)
    }

    pub fn already_published(event: EventGuid) -> Self {
        PublishingError::AlreadyPublished(event)
    }

    pub fn incorrect_event_type(event: EventGuid) -> Self {
        PublishingError::IncorrectEventType(event)
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PublishingError::EventNotFound(_) => ErrorCode::EventNotFound,
            PublishingError::UserNotFound(_) => ErrorCode::UserNotFound,
            PublishingError::CampaignNotFound(_) => ErrorCode::CampaignNotFound,
            PublishingError::AnnouncementNotFound(_) => ErrorCode::AnnouncementNotFound,
            PublishingError::AlreadyPublished(_) => ErrorCode::DuplicateKey,
            PublishingError::IncorrectEventType(_) => ErrorCode::IncorrectEventType,
            PublishingError::TitleTooLong { .. } => ErrorCode::AnnouncementTitleTooLong,
            PublishingError::ContentTooLong { .. } => ErrorCode::AnnouncementContentTooLong,
            PublishingError::Validation(err) => err.code(),
            PublishingError::Infrastructure(err) => err.code,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            PublishingError::EventNotFound(event) => format!("Event not found: {}", event),
            PublishingError::UserNotFound(user) => format!("User not found: {}", user),
            PublishingError::CampaignNotFound(campaign) => {
                format!("Campaign not found: {}", campaign)
            }
            PublishingError::AnnouncementNotFound(announcement) => {
                format!("Announcement not found: {}", announcement)
            }
            PublishingError::AlreadyPublished(event) => {
                format!("Event {} is already published", event)
            }
            PublishingError::IncorrectEventType(_) => {
                "Only campaign events can be published".to_string()
            }
            PublishingError::TitleTooLong { length } => {
                format!("Announcement title is too long ({} characters)", length)
            }
            PublishingError::ContentTooLong { length } => {
                format!("Announcement content is too long ({} characters)", length)
            }
            PublishingError::Validation(err) => err.to_string(),
            PublishingError::Infrastructure(err) => err.message.clone(),
        }
    }
}

impl std::fmt::Display for PublishingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for PublishingError {}

impl From<ValidationError> for PublishingError {
    fn from(err: ValidationError) -> Self {
        PublishingError::Validation(err)
    }
}

impl From<DomainError> for PublishingError {
    fn from(err: DomainError) -> Self {
        let rebuilt = match err.code {
            ErrorCode::EventNotFound => err.detail("event_guid").map(PublishingError::EventNotFound),
            ErrorCode::UserNotFound => err
                .detail("user_id")
                .and_then(|id: i64| UserId::new(id).ok())
                .map(PublishingError::UserNotFound),
            ErrorCode::CampaignNotFound => err
                .detail("campaign_guid")
                .map(PublishingError::CampaignNotFound),
            ErrorCode::AnnouncementNotFound => err
                .detail("announcement_guid")
                .map(PublishingError::AnnouncementNotFound),
            ErrorCode::DuplicateKey => err
                .detail("event_guid")
                .map(PublishingError::AlreadyPublished),
            ErrorCode::IncorrectEventType => err
                .detail("event_guid")
                .map(PublishingError::IncorrectEventType),
            _ => None,
        };
        rebuilt.unwrap_or(PublishingError::Infrastructure(err))
    }
}

impl From<PublishingError> for DomainError {
    fn from(err: PublishingError) -> Self {
        let base = DomainError::new(err.code(), err.message());
        match err {
            PublishingError::EventNotFound(event)
            | PublishingError::AlreadyPublished(event)
            | PublishingError::IncorrectEventType(event) => {
                base.with_detail("event_guid", event.to_string())
            }
            PublishingError::UserNotFound(user) => base.with_detail("user_id", user.to_string()),
            PublishingError::CampaignNotFound(campaign) => {
                base.with_detail("campaign_guid", campaign.to_string())
            }
            PublishingError::AnnouncementNotFound(announcement) => {
                base.with_detail("announcement_guid", announcement.to_string())
            }
            PublishingError::TitleTooLong { length } | PublishingError::ContentTooLong { length } => {
                base.with_detail("length", length.to_string())
            }
            PublishingError::Validation(inner) => inner.into(),
            PublishingError::Infrastructure(inner) => inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_errors_survive_domain_error_roundtrip() {
        let event = EventGuid::new();
        let cases = vec![
            PublishingError::event_not_found(event),
            PublishingError::user_not_found(UserId::new(4).unwrap()),
            PublishingError::campaign_not_found(CampaignGuid::new()),
            PublishingError::announcement_not_found(AnnouncementGuid::new()),
            PublishingError::already_published(event),
            PublishingError::incorrect_event_type(event),
        ];

        for case in cases {
            let back = PublishingError::from(DomainError::from(case.clone()));
            assert_eq!(back, case);
        }
    }

    #[test]
    fn already_published_is_a_duplicate_key() {
        assert_eq!(
            PublishingError::already_published(EventGuid::new()).code(),
            ErrorCode::DuplicateKey
        );
    }

    #[test]
    fn length_errors_have_dedicated_codes() {
        assert_eq!(
            PublishingError::TitleTooLong { length: 101 }.code(),
            ErrorCode::AnnouncementTitleTooLong
        );
        assert_eq!(
            PublishingError::ContentTooLong { length: 4001 }.code(),
            ErrorCode::AnnouncementContentTooLong
        );
    }
}

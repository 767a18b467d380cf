//! Announcements published to the public board.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AnnouncementGuid, CampaignGuid, Timestamp, UserId, ValidationError};

use super::PublishingError;

/// Maximum announcement title length, in characters.
pub const MAX_TITLE_LENGTH: usize = 100;

/// Maximum announcement content length, in characters.
pub const MAX_CONTENT_LENGTH: usize = 4000;

/// Unvalidated announcement text, as submitted by a campaign member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementDraft {
    pub title: String,
    pub content: String,
}

impl AnnouncementDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Checks presence and length. Whitespace-only text counts as empty.
    pub fn validate(&self) -> Result<(), PublishingError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::empty_field("title").into());
        }
        if self.content.trim().is_empty() {
            return Err(ValidationError::empty_field("content").into());
        }

        let title_length = self.title.chars().count();
        if title_length > MAX_TITLE_LENGTH {
            return Err(PublishingError::TitleTooLong {
                length: title_length,
            });
        }
        let content_length = self.content.chars().count();
        if content_length > MAX_CONTENT_LENGTH {
            return Err(PublishingError::ContentTooLong {
                length: content_length,
            });
        }
        Ok(())
    }
}

/// A published announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub guid: AnnouncementGuid,
    pub campaign: CampaignGuid,
    pub publisher: UserId,
    pub title: String,
    pub content: String,
    pub published_at: Timestamp,
}

//! Publishing module - public exposure of campaign events and announcements.

mod announcement;
mod errors;
mod publication;
mod views;

pub use announcement::{Announcement, AnnouncementDraft, MAX_CONTENT_LENGTH, MAX_TITLE_LENGTH};
pub use errors::PublishingError;
pub use publication::Publication;
pub use views::{
    PublicAnnouncement, PublicCampaign, PublicEvent, PublishedAnnouncement, PublishedEvent,
};

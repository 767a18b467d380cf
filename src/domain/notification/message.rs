//! Notification messages handed to the delivery worker.

use serde::{Deserialize, Serialize};

use crate::domain::directory::UserContact;
use crate::domain::foundation::{AnnouncementGuid, EventGuid};

/// Per-call choice of channels for event notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NotifyOptions {
    #[serde(default)]
    pub email: bool,
    #[serde(default)]
    pub sms: bool,
}

impl NotifyOptions {
    pub const NONE: NotifyOptions = NotifyOptions {
        email: false,
        sms: false,
    };

    pub fn is_any(&self) -> bool {
        self.email || self.sms
    }
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationKind {
    AddedToEvent {
        event_guid: EventGuid,
        event_name: String,
    },
    EventUpdated {
        event_guid: EventGuid,
        event_name: String,
    },
    EventDeleted {
        event_name: String,
    },
    EventPublished {
        event_guid: EventGuid,
        event_name: String,
        campaign_name: String,
    },
    AnnouncementPublished {
        announcement_guid: AnnouncementGuid,
        title: String,
        campaign_name: String,
    },
}

impl NotificationKind {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::AddedToEvent { .. } => "added_to_event",
            NotificationKind::EventUpdated { .. } => "event_updated",
            NotificationKind::EventDeleted { .. } => "event_deleted",
            NotificationKind::EventPublished { .. } => "event_published",
            NotificationKind::AnnouncementPublished { .. } => "announcement_published",
        }
    }

    /// Short human-readable text for email subjects and SMS bodies.
    pub fn summary(&self) -> String {
        match self {
            NotificationKind::AddedToEvent { event_name, .. } => {
                format!("You were added to the event \"{}\"", event_name)
            }
            NotificationKind::EventUpdated { event_name, .. } => {
                format!("The event \"{}\" was updated", event_name)
            }
            NotificationKind::EventDeleted { event_name } => {
                format!("The event \"{}\" was cancelled", event_name)
            }
            NotificationKind::EventPublished {
                event_name,
                campaign_name,
                ..
            } => format!("{} published a new event: {}", campaign_name, event_name),
            NotificationKind::AnnouncementPublished {
                title,
                campaign_name,
                ..
            } => format!("{} published an announcement: {}", campaign_name, title),
        }
    }
}

/// One message to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: UserContact,
    pub kind: NotificationKind,
    pub via_email: bool,
    pub via_sms: bool,
}

impl Notification {
    pub fn new(recipient: UserContact, kind: NotificationKind, via_email: bool, via_sms: bool) -> Self {
        Self {
            recipient,
            kind,
            via_email,
            via_sms,
        }
    }

    /// Builds a message for `recipient` with the per-call channels, or
    /// `None` when no channel was requested.
    pub fn with_options(
        recipient: UserContact,
        kind: NotificationKind,
        options: NotifyOptions,
    ) -> Option<Self> {
        options
            .is_any()
            .then(|| Self::new(recipient, kind, options.email, options.sms))
    }

    /// SMS is dropped for recipients without a phone number.
    pub fn sends_sms(&self) -> bool {
        self.via_sms && self.recipient.phone.is_some()
    }
}

//! Campaign publication subscriptions.

use serde::{Deserialize, Serialize};

use crate::domain::directory::{CampaignSummary, UserContact};

use super::SubscriptionError;

/// Channels a subscriber wants publication news on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub via_email: bool,
    pub via_sms: bool,
}

impl NotificationSettings {
    pub fn new(via_email: bool, via_sms: bool) -> Self {
        Self { via_email, via_sms }
    }

    /// A subscription without any channel is meaningless.
    pub fn validate(&self) -> Result<(), SubscriptionError> {
        if self.via_email || self.via_sms {
            Ok(())
        } else {
            Err(SubscriptionError::SettingsRequired)
        }
    }
}

/// One of the user's subscriptions, with campaign display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionEntry {
    pub campaign: CampaignSummary,
    pub settings: NotificationSettings,
}

/// A campaign subscriber and how to reach them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub contact: UserContact,
    pub settings: NotificationSettings,
}

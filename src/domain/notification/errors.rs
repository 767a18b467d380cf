//! Subscription-specific error types.

use crate::domain::foundation::{CampaignGuid, DomainError, ErrorCode, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    UserNotFound(UserId),

    CampaignNotFound(CampaignGuid),

    AlreadySubscribed { user: UserId, campaign: CampaignGuid },

    NotFound { user: UserId, campaign: CampaignGuid },

    /// Neither email nor SMS was selected.
    SettingsRequired,

    Infrastructure(DomainError),
}

impl SubscriptionError {
    pub fn user_not_found(user: UserId) -> Self {
        SubscriptionError::UserNotFound(user)
    }

    pub fn campaign_not_found(campaign: CampaignGuid) -> Self {
        SubscriptionError::CampaignNotFound(campaign)
    }

    pub fn already_subscribed(user: UserId, campaign: CampaignGuid) -> Self {
        SubscriptionError::AlreadySubscribed { user, campaign }
    }

    pub fn not_found(user: UserId, campaign: CampaignGuid) -> Self {
        SubscriptionError::NotFound { user, campaign }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SubscriptionError::UserNotFound(_) => ErrorCode::UserNotFound,
            SubscriptionError::CampaignNotFound(_) => ErrorCode::CampaignNotFound,
            SubscriptionError::AlreadySubscribed { .. } => ErrorCode::DuplicateKey,
            SubscriptionError::NotFound { .. } => ErrorCode::SubscriptionNotFound,
            SubscriptionError::SettingsRequired => ErrorCode::NotificationSettingsRequired,
            SubscriptionError::Infrastructure(err) => err.code,
        }
    }

    pub fn message(&self) -> String {
        match self {
            SubscriptionError::UserNotFound(user) => format!("User not found: {}", user),
            SubscriptionError::CampaignNotFound(campaign) => {
                format!("Campaign not found: {}", campaign)
            }
            SubscriptionError::AlreadySubscribed { campaign, .. } => {
                format!("Already subscribed to campaign {}", campaign)
            }
            SubscriptionError::NotFound { campaign, .. } => {
                format!("Not subscribed to campaign {}", campaign)
            }
            SubscriptionError::SettingsRequired => {
                "Select at least one of email or SMS".to_string()
            }
            SubscriptionError::Infrastructure(err) => err.message.clone(),
        }
    }
}

impl std::fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SubscriptionError {}

impl From<DomainError> for SubscriptionError {
    fn from(err: DomainError) -> Self {
        let user = err.detail("user_id").and_then(|id: i64| UserId::new(id).ok());
        let campaign = err.detail::<CampaignGuid>("campaign_guid");
        let rebuilt = match err.code {
            ErrorCode::UserNotFound => user.map(SubscriptionError::UserNotFound),
            ErrorCode::CampaignNotFound => campaign.map(SubscriptionError::CampaignNotFound),
            ErrorCode::DuplicateKey => user
                .zip(campaign)
                .map(|(user, campaign)| SubscriptionError::AlreadySubscribed { user, campaign }),
            ErrorCode::SubscriptionNotFound => user
                .zip(campaign)
                .map(|(user, campaign)| SubscriptionError::NotFound { user, campaign }),
            ErrorCode::NotificationSettingsRequired => Some(SubscriptionError::SettingsRequired),
            _ => None,
        };
        rebuilt.unwrap_or(SubscriptionError::Infrastructure(err))
    }
}

impl From<SubscriptionError> for DomainError {
    fn from(err: SubscriptionError) -> Self {
        let base = DomainError::new(err.code(), err.message());
        match err {
            SubscriptionError::UserNotFound(user) => base.with_detail("user_id", user.to_string()),
            SubscriptionError::CampaignNotFound(campaign) => {
                base.with_detail("campaign_guid", campaign.to_string())
            }
            SubscriptionError::AlreadySubscribed { user, campaign }
            | SubscriptionError::NotFound { user, campaign } => base
                .with_detail("user_id", user.to_string())
                .with_detail("campaign_guid", campaign.to_string()),
            SubscriptionError::SettingsRequired => base,
            SubscriptionError::Infrastructure(inner) => inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_errors_survive_domain_error_roundtrip() {
        let user = UserId::new(5).unwrap();
        let campaign = CampaignGuid::new();
        for case in [
            SubscriptionError::user_not_found(user),
            SubscriptionError::campaign_not_found(campaign),
            SubscriptionError::already_subscribed(user, campaign),
            SubscriptionError::not_found(user, campaign),
            SubscriptionError::SettingsRequired,
        ] {
            assert_eq!(SubscriptionError::from(DomainError::from(case.clone())), case);
        }
    }
}

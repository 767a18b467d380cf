//! Preference-specific error types.

use crate::domain::foundation::{CampaignGuid, DomainError, ErrorCode, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceError {
    UserNotFound(UserId),

    CampaignNotFound(CampaignGuid),

    /// A row already exists; changes go through update.
    AlreadyExists { user: UserId, campaign: CampaignGuid },

    NotFound { user: UserId, campaign: CampaignGuid },

    Infrastructure(DomainError),
}

impl PreferenceError {
    pub fn user_not_found(user: UserId) -> Self {
        PreferenceError::UserNotFound(user)
    }

    pub fn campaign_not_found(campaign: CampaignGuid) -> Self {
        PreferenceError::CampaignNotFound(campaign)
    }

    pub fn already_exists(user: UserId, campaign: CampaignGuid) -> Self {
        PreferenceError::AlreadyExists { user, campaign }
    }

    pub fn not_found(user: UserId, campaign: CampaignGuid) -> Self {
        PreferenceError::NotFound { user, campaign }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            PreferenceError::UserNotFound(_) => ErrorCode::UserNotFound,
            PreferenceError::CampaignNotFound(_) => ErrorCode::CampaignNotFound,
            PreferenceError::AlreadyExists { .. } => ErrorCode::DuplicateKey,
            PreferenceError::NotFound { .. } => ErrorCode::PreferenceNotFound,
            PreferenceError::Infrastructure(err) => err.code,
        }
    }

    pub fn message(&self) -> String {
        match self {
            PreferenceError::UserNotFound(user) => format!("User not found: {}", user),
            PreferenceError::CampaignNotFound(campaign) => {
                format!("Campaign not found: {}", campaign)
            }
            PreferenceError::AlreadyExists { campaign, .. } => {
                format!("A preference for campaign {} already exists", campaign)
            }
            PreferenceError::NotFound { campaign, .. } => {
                format!("No preference for campaign {}", campaign)
            }
            PreferenceError::Infrastructure(err) => err.message.clone(),
        }
    }
}

impl std::fmt::Display for PreferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for PreferenceError {}

fn user_detail(err: &DomainError) -> Option<UserId> {
    err.detail("user_id").and_then(|id: i64| UserId::new(id).ok())
}

impl From<DomainError> for PreferenceError {
    fn from(err: DomainError) -> Self {
        let campaign = err.detail::<CampaignGuid>("campaign_guid");
        let rebuilt = match err.code {
            ErrorCode::UserNotFound => user_detail(&err).map(PreferenceError::UserNotFound),
            ErrorCode::CampaignNotFound => campaign.map(PreferenceError::CampaignNotFound),
            ErrorCode::DuplicateKey => user_detail(&err)
                .zip(campaign)
                .map(|(user, campaign)| PreferenceError::AlreadyExists { user, campaign }),
            ErrorCode::PreferenceNotFound => user_detail(&err)
                .zip(campaign)
                .map(|(user, campaign)| PreferenceError::NotFound { user, campaign }),
            _ => None,
        };
        rebuilt.unwrap_or(PreferenceError::Infrastructure(err))
    }
}

impl From<PreferenceError> for DomainError {
    fn from(err: PreferenceError) -> Self {
        let base = DomainError::new(err.code(), err.message());
        match err {
            PreferenceError::UserNotFound(user) => base.with_detail("user_id", user.to_string()),
            PreferenceError::CampaignNotFound(campaign) => {
                base.with_detail("campaign_guid", campaign.to_string())
            }
            PreferenceError::AlreadyExists { user, campaign }
            | PreferenceError::NotFound { user, campaign } => base
                .with_detail("user_id", user.to_string())
                .with_detail("campaign_guid", campaign.to_string()),
            PreferenceError::Infrastructure(inner) => inner,
        }
    }
}

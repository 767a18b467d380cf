//! Reference data owned by the user and campaign contexts.
//!
//! This service never mutates users or campaigns; it only resolves them and
//! embeds their display data in read models.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CampaignGuid, UserId};

/// Contact details of a user, as shown to campaign members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContact {
    pub user_id: UserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub profile_pic_url: Option<String>,
}

impl UserContact {
    /// Name safe to show to anonymous visitors.
    ///
    /// First and last name when either is known, else the display name.
    pub fn public_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.display_name.clone()
        } else {
            full
        }
    }
}

/// Display metadata of a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub guid: CampaignGuid,
    pub name: String,
    pub city: Option<String>,
    pub logo_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(first: Option<&str>, last: Option<&str>) -> UserContact {
        UserContact {
            user_id: UserId::new(1).unwrap(),
            first_name: first.map(String::from),
            last_name: last.map(String::from),
            display_name: "dana_v".to_string(),
            email: "dana@example.org".to_string(),
            phone: None,
            profile_pic_url: None,
        }
    }

    #[test]
    fn public_name_prefers_real_name() {
        assert_eq!(contact(Some("Dana"), Some("Vale")).public_name(), "Dana Vale");
        assert_eq!(contact(None, Some("Vale")).public_name(), "Vale");
    }

    #[test]
    fn public_name_falls_back_to_display_name() {
        assert_eq!(contact(None, None).public_name(), "dana_v");
        assert_eq!(contact(Some("  "), None).public_name(), "dana_v");
    }
}

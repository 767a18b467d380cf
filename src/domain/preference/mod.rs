//! Preference module - per-user campaign preferences for the public board.
//!
//! A user marks a campaign as preferred or avoided. No row means neutral.

mod errors;

pub use errors::PreferenceError;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::directory::CampaignSummary;
use crate::domain::foundation::CampaignGuid;

/// Placement of a campaign's items on one user's board.
///
/// Ordering is board order: preferred items come first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreferenceTier {
    Preferred,
    Neutral,
    Avoided,
}

impl PreferenceTier {
    pub fn from_flag(is_preferred: Option<bool>) -> Self {
        match is_preferred {
            Some(true) => PreferenceTier::Preferred,
            Some(false) => PreferenceTier::Avoided,
            None => PreferenceTier::Neutral,
        }
    }
}

/// A stored preference enriched with campaign display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceEntry {
    pub campaign: CampaignSummary,
    pub is_preferred: bool,
}

/// All explicit preferences of one user, keyed by campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceMap(HashMap<CampaignGuid, bool>);

impl PreferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tier_of(&self, campaign: CampaignGuid) -> PreferenceTier {
        PreferenceTier::from_flag(self.0.get(&campaign).copied())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(CampaignGuid, bool)> for PreferenceMap {
    fn from_iter<I: IntoIterator<Item = (CampaignGuid, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_order_preferred_first() {
        assert!(PreferenceTier::Preferred < PreferenceTier::Neutral);
        assert!(PreferenceTier::Neutral < PreferenceTier::Avoided);
    }

    #[test]
    fn missing_row_is_neutral() {
        let preferred = CampaignGuid::new();
        let avoided = CampaignGuid::new();
        let map: PreferenceMap = [(preferred, true), (avoided, false)].into_iter().collect();

        assert_eq!(map.tier_of(preferred), PreferenceTier::Preferred);
        assert_eq!(map.tier_of(avoided), PreferenceTier::Avoided);
        assert_eq!(map.tier_of(CampaignGuid::new()), PreferenceTier::Neutral);
    }

    #[test]
    fn tier_serializes_in_upper_case() {
        assert_eq!(
            serde_json::to_string(&PreferenceTier::Preferred).unwrap(),
            "\"PREFERRED\""
        );
    }
}

//! Ordering and windowing of public board items.

use std::cmp::Reverse;
use uuid::Uuid;

use crate::domain::foundation::{CampaignGuid, Timestamp};
use crate::domain::preference::{PreferenceMap, PreferenceTier};
use crate::domain::publishing::{PublishedAnnouncement, PublishedEvent};

/// Anything that can appear on the public board.
pub trait BoardItem {
    fn campaign(&self) -> CampaignGuid;

    fn published_at(&self) -> Timestamp;

    /// Stable tie-break for items published at the same instant.
    fn identity(&self) -> Uuid;
}

impl BoardItem for PublishedEvent {
    fn campaign(&self) -> CampaignGuid {
        self.campaign.guid
    }

    fn published_at(&self) -> Timestamp {
        self.published_at
    }

    fn identity(&self) -> Uuid {
        *self.event.guid.as_uuid()
    }
}

impl BoardItem for PublishedAnnouncement {
    fn campaign(&self) -> CampaignGuid {
        self.announcement.campaign
    }

    fn published_at(&self) -> Timestamp {
        self.announcement.published_at
    }

    fn identity(&self) -> Uuid {
        *self.announcement.guid.as_uuid()
    }
}

/// Limit and offset of a board page, already clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedWindow {
    pub limit: usize,
    pub offset: usize,
}

impl FeedWindow {
    /// Absent limit falls back to `default_limit`; any limit is capped at
    /// `max_limit`. Absent or negative offsets start at the top.
    pub fn new(limit: Option<i64>, offset: Option<i64>, default_limit: usize, max_limit: usize) -> Self {
        let limit = match limit {
            Some(limit) => (limit.max(0) as usize).min(max_limit),
            None => default_limit.min(max_limit),
        };
        let offset = offset.unwrap_or(0).max(0) as usize;
        Self { limit, offset }
    }
}

/// Orders `items` for a viewer and cuts out the requested page.
///
/// With preferences, avoided campaigns are dropped and preferred campaigns
/// precede neutral ones. Within a tier, newest first.
pub fn rank<T: BoardItem>(items: Vec<T>, preferences: Option<&PreferenceMap>, window: FeedWindow) -> Vec<T> {
    let tier = |item: &T| match preferences {
        Some(map) => map.tier_of(item.campaign()),
        None => PreferenceTier::Neutral,
    };

    let mut ranked: Vec<(PreferenceTier, T)> = items
        .into_iter()
        .map(|item| (tier(&item), item))
        .filter(|(tier, _)| *tier != PreferenceTier::Avoided)
        .collect();

    ranked.sort_by_key(|(tier, item)| (*tier, Reverse(item.published_at()), item.identity()));

    ranked
        .into_iter()
        .map(|(_, item)| item)
        .skip(window.offset)
        .take(window.limit)
        .collect()
}

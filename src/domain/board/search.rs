//! Field-level search predicates over published items.
//!
//! Every field is optional and unset fields are ignored. Text fields match
//! case-insensitive substrings. An item lacking the compared value never
//! matches a set predicate.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::foundation::{CampaignGuid, Timestamp};
use crate::domain::publishing::{PublishedAnnouncement, PublishedEvent};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventSearchParams {
    pub campaign_guid: Option<CampaignGuid>,
    pub campaign_name: Option<String>,
    pub campaign_city: Option<String>,
    pub event_name: Option<String>,
    pub event_location: Option<String>,
    pub publisher_first_name: Option<String>,
    pub publisher_last_name: Option<String>,
    /// Published on this UTC calendar day.
    pub publishing_date: Option<NaiveDate>,
    /// Starts at or after.
    pub event_start_time: Option<Timestamp>,
    /// Ends at or before.
    pub event_end_time: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AnnouncementSearchParams {
    pub campaign_guid: Option<CampaignGuid>,
    pub campaign_name: Option<String>,
    pub campaign_city: Option<String>,
    pub announcement_title: Option<String>,
    pub publisher_first_name: Option<String>,
    pub publisher_last_name: Option<String>,
    pub publishing_date: Option<NaiveDate>,
}

/// `None` needle (or blank) is unset; `None` haystack never matches.
fn text_matches(needle: &Option<String>, haystack: Option<&str>) -> bool {
    let needle = match needle.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => n.to_lowercase(),
        _ => return true,
    };
    haystack
        .map(|h| h.to_lowercase().contains(&needle))
        .unwrap_or(false)
}

fn equals<T: PartialEq>(expected: &Option<T>, actual: &T) -> bool {
    expected.as_ref().map_or(true, |e| e == actual)
}

fn same_day(date: &Option<NaiveDate>, at: Timestamp) -> bool {
    date.map_or(true, |d| at.utc_date() == d)
}

impl EventSearchParams {
    pub fn matches(&self, item: &PublishedEvent) -> bool {
        let event = &item.event;
        equals(&self.campaign_guid, &item.campaign.guid)
            && text_matches(&self.campaign_name, Some(&item.campaign.name))
            && text_matches(&self.campaign_city, item.campaign.city.as_deref())
            && text_matches(&self.event_name, Some(&event.name))
            && text_matches(&self.event_location, event.location.as_deref())
            && text_matches(&self.publisher_first_name, item.publisher.first_name.as_deref())
            && text_matches(&self.publisher_last_name, item.publisher.last_name.as_deref())
            && same_day(&self.publishing_date, item.published_at)
            && self
                .event_start_time
                .map_or(true, |from| event.start_time.map_or(false, |start| start >= from))
            && self
                .event_end_time
                .map_or(true, |until| event.end_time.map_or(false, |end| end <= until))
    }
}

impl AnnouncementSearchParams {
    pub fn matches(&self, item: &PublishedAnnouncement) -> bool {
        equals(&self.campaign_guid, &item.campaign.guid)
            && text_matches(&self.campaign_name, Some(&item.campaign.name))
            && text_matches(&self.campaign_city, item.campaign.city.as_deref())
            && text_matches(&self.announcement_title, Some(&item.announcement.title))
            && text_matches(&self.publisher_first_name, item.publisher.first_name.as_deref())
            && text_matches(&self.publisher_last_name, item.publisher.last_name.as_deref())
            && same_day(&self.publishing_date, item.announcement.published_at)
    }
}

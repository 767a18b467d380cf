//! In-memory storage adapter.
//!
//! Implements every storage port over one mutex-guarded state, so each port
//! call is atomic: capacity checks, duplicate checks and role migration see
//! and write the same snapshot.
//!
//! Used by tests and when no database is configured. Users and campaigns are
//! reference data: register them directly or load a [`SeedData`] file.

mod event_store;
mod publication_store;
mod subscription_store;

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::adapters::authorization::Grant;
use crate::domain::directory::{CampaignSummary, UserContact};
use crate::domain::event::{Event, EventMembership};
use crate::domain::foundation::{AnnouncementGuid, CampaignGuid, EventGuid, UserId};
use crate::domain::notification::NotificationSettings;
use crate::domain::publishing::{Announcement, Publication};

/// Users, campaigns and campaign permission grants to preload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<UserContact>,
    #[serde(default)]
    pub campaigns: Vec<CampaignSummary>,
    #[serde(default)]
    pub grants: Vec<Grant>,
}

impl SeedData {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

struct StoredEvent {
    event: Event,
    membership: EventMembership,
}

#[derive(Default)]
struct State {
    users: BTreeMap<UserId, UserContact>,
    campaigns: HashMap<CampaignGuid, CampaignSummary>,
    last_event_id: i64,
    events: HashMap<EventGuid, StoredEvent>,
    publications: HashMap<EventGuid, Publication>,
    announcements: HashMap<AnnouncementGuid, Announcement>,
    preferences: HashMap<(UserId, CampaignGuid), bool>,
    subscriptions: HashMap<(UserId, CampaignGuid), NotificationSettings>,
}

impl State {
    fn user(&self, user: UserId) -> Option<&UserContact> {
        self.users.get(&user)
    }

    fn user_by_email(&self, email: &str) -> Option<&UserContact> {
        let email = email.trim();
        self.users
            .values()
            .find(|contact| contact.email.eq_ignore_ascii_case(email))
    }

    fn campaign(&self, campaign: CampaignGuid) -> Option<&CampaignSummary> {
        self.campaigns.get(&campaign)
    }

    /// Contacts of `users`, skipping ids missing from the directory.
    fn contacts(&self, users: impl IntoIterator<Item = UserId>) -> Vec<UserContact> {
        users
            .into_iter()
            .filter_map(|user| self.users.get(&user).cloned())
            .collect()
    }
}

/// Storage for events, publications, preferences and subscriptions.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the directory part of `seed`; grants belong to the authorizer.
    pub fn from_seed(seed: SeedData) -> Self {
        let store = Self::new();
        for user in seed.users {
            store.register_user(user);
        }
        for campaign in seed.campaigns {
            store.register_campaign(campaign);
        }
        store
    }

    /// Adds or replaces a user in the directory.
    pub fn register_user(&self, contact: UserContact) {
        self.state().users.insert(contact.user_id, contact);
    }

    /// Adds or replaces a campaign in the directory.
    pub fn register_campaign(&self, campaign: CampaignSummary) {
        self.state().campaigns.insert(campaign.guid, campaign);
    }

    pub fn user_count(&self) -> usize {
        self.state().users.len()
    }

    pub fn campaign_count(&self) -> usize {
        self.state().campaigns.len()
    }

    // Mutations validate before writing, so poisoned state is still consistent.
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

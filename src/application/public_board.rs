//! PublicBoardRanker - the personalized public feed.
//!
//! Read-only. Loads published items and, for a signed-in viewer, their
//! preference map, then filters and ranks with `domain::board`.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::board::{rank, AnnouncementSearchParams, EventSearchParams, FeedWindow};
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::preference::PreferenceMap;
use crate::domain::publishing::{PublicAnnouncement, PublicEvent, PublishedAnnouncement, PublishedEvent};
use crate::ports::{PreferenceRepository, PublicationRepository};

/// Paging defaults for the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLimits {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for BoardLimits {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 200,
        }
    }
}

/// Who is looking and which page they want.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardQuery {
    pub viewer: Option<UserId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicBoard {
    pub events: Vec<PublicEvent>,
    pub announcements: Vec<PublicAnnouncement>,
}

pub struct PublicBoardRanker {
    publications: Arc<dyn PublicationRepository>,
    preferences: Arc<dyn PreferenceRepository>,
    limits: BoardLimits,
}

impl PublicBoardRanker {
    pub fn new(
        publications: Arc<dyn PublicationRepository>,
        preferences: Arc<dyn PreferenceRepository>,
        limits: BoardLimits,
    ) -> Self {
        Self {
            publications,
            preferences,
            limits,
        }
    }

    /// Events and announcements, each ranked and windowed independently.
    pub async fn board(&self, query: BoardQuery) -> Result<PublicBoard, DomainError> {
        let preferences = self.preferences_for(query.viewer).await?;
        let window = self.window(&query);

        let events = self.publications.published_events().await?;
        let announcements = self.publications.published_announcements().await?;

        Ok(PublicBoard {
            events: project_events(rank(events, preferences.as_ref(), window)),
            announcements: project_announcements(rank(announcements, preferences.as_ref(), window)),
        })
    }

    pub async fn search_events(
        &self,
        query: BoardQuery,
        params: &EventSearchParams,
    ) -> Result<Vec<PublicEvent>, DomainError> {
        let preferences = self.preferences_for(query.viewer).await?;
        let matching: Vec<PublishedEvent> = self
            .publications
            .published_events()
            .await?
            .into_iter()
            .filter(|item| params.matches(item))
            .collect();

        tracing::debug!(matches = matching.len(), "event search");
        Ok(project_events(rank(matching, preferences.as_ref(), self.window(&query))))
    }

    pub async fn search_announcements(
        &self,
        query: BoardQuery,
        params: &AnnouncementSearchParams,
    ) -> Result<Vec<PublicAnnouncement>, DomainError> {
        let preferences = self.preferences_for(query.viewer).await?;
        let matching: Vec<PublishedAnnouncement> = self
            .publications
            .published_announcements()
            .await?
            .into_iter()
            .filter(|item| params.matches(item))
            .collect();

        tracing::debug!(matches = matching.len(), "announcement search");
        Ok(project_announcements(rank(
            matching,
            preferences.as_ref(),
            self.window(&query),
        )))
    }

    async fn preferences_for(&self, viewer: Option<UserId>) -> Result<Option<PreferenceMap>, DomainError> {
        match viewer {
            Some(user) => Ok(Some(self.preferences.preference_map(user).await?)),
            None => Ok(None),
        }
    }

    fn window(&self, query: &BoardQuery) -> FeedWindow {
        FeedWindow::new(
            query.limit,
            query.offset,
            self.limits.default_limit,
            self.limits.max_limit,
        )
    }
}

fn project_events(items: Vec<PublishedEvent>) -> Vec<PublicEvent> {
    items.iter().map(PublishedEvent::to_public).collect()
}

fn project_announcements(items: Vec<PublishedAnnouncement>) -> Vec<PublicAnnouncement> {
    items.iter().map(PublishedAnnouncement::to_public).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::directory::{CampaignSummary, UserContact};
    use crate::domain::event::NewEvent;
    use crate::domain::foundation::CampaignGuid;
    use crate::domain::publishing::AnnouncementDraft;
    use crate::ports::EventRepository;

    fn user(id: i64) -> UserId {
        UserId::new(id).unwrap()
    }

    struct Fixture {
        store: Arc<InMemoryStore>,
        ranker: PublicBoardRanker,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        for id in 1..=2 {
            store.register_user(UserContact {
                user_id: user(id),
                first_name: Some(format!("Pat{}", id)),
                last_name: Some("Lee".to_string()),
                display_name: format!("pat{}", id),
                email: format!("pat{}@example.org", id),
                phone: None,
                profile_pic_url: None,
            });
        }
        Fixture {
            ranker: PublicBoardRanker::new(store.clone(), store.clone(), BoardLimits::default()),
            store,
        }
    }

    fn campaign(f: &Fixture, name: &str) -> CampaignGuid {
        let guid = CampaignGuid::new();
        f.store.register_campaign(CampaignSummary {
            guid,
            name: name.to_string(),
            city: None,
            logo_url: None,
        });
        guid
    }

    async fn publish(f: &Fixture, campaign: CampaignGuid, name: &str) {
        let event = f
            .store
            .create(&NewEvent::for_campaign(user(1), campaign, name))
            .await
            .unwrap()
            .guid;
        f.store.publish_event(event, user(1)).await.unwrap();
        // keep publication instants strictly increasing
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    fn names(events: &[PublicEvent]) -> Vec<&str> {
        events.iter().map(|e| e.name.as_str()).collect()
    }

    #[tokio::test]
    async fn anonymous_board_is_newest_first() {
        let f = fixture();
        let c = campaign(&f, "C");
        publish(&f, c, "first").await;
        publish(&f, c, "second").await;

        let board = f.ranker.board(BoardQuery::default()).await.unwrap();

        assert_eq!(names(&board.events), vec!["second", "first"]);
    }

    #[tokio::test]
    async fn viewer_preferences_tier_the_feed() {
        let f = fixture();
        let a = campaign(&f, "A");
        let b = campaign(&f, "B");
        let c = campaign(&f, "C");
        publish(&f, a, "a-event").await;
        publish(&f, c, "c-event").await;
        publish(&f, b, "b-event").await;
        f.store.add(user(2), a, true).await.unwrap();
        f.store.add(user(2), b, false).await.unwrap();

        let board = f
            .ranker
            .board(BoardQuery {
                viewer: Some(user(2)),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(names(&board.events), vec!["a-event", "c-event"]);
    }

    #[tokio::test]
    async fn announcements_are_ranked_independently() {
        let f = fixture();
        let a = campaign(&f, "A");
        let b = campaign(&f, "B");
        f.store
            .publish_announcement(a, user(1), &AnnouncementDraft::new("from a", "x"))
            .await
            .unwrap();
        f.store
            .publish_announcement(b, user(1), &AnnouncementDraft::new("from b", "x"))
            .await
            .unwrap();
        f.store.add(user(2), b, false).await.unwrap();

        let board = f
            .ranker
            .board(BoardQuery {
                viewer: Some(user(2)),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(board.events.is_empty());
        assert_eq!(board.announcements.len(), 1);
        assert_eq!(board.announcements[0].title, "from a");
    }

    #[tokio::test]
    async fn limit_and_offset_window_the_ranked_list() {
        let f = fixture();
        let c = campaign(&f, "C");
        for i in 0..5 {
            publish(&f, c, &format!("e{}", i)).await;
        }

        let board = f
            .ranker
            .board(BoardQuery {
                viewer: None,
                limit: Some(2),
                offset: Some(1),
            })
            .await
            .unwrap();

        assert_eq!(names(&board.events), vec!["e3", "e2"]);
    }

    #[tokio::test]
    async fn search_filters_before_ranking() {
        let f = fixture();
        let a = campaign(&f, "Alpha");
        let b = campaign(&f, "Beta");
        publish(&f, a, "Cleanup north").await;
        publish(&f, b, "Cleanup south").await;
        publish(&f, b, "Fundraiser").await;
        f.store.add(user(2), a, true).await.unwrap();

        let found = f
            .ranker
            .search_events(
                BoardQuery {
                    viewer: Some(user(2)),
                    ..Default::default()
                },
                &EventSearchParams {
                    event_name: Some("cleanup".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(names(&found), vec!["Cleanup north", "Cleanup south"]);
    }

    #[tokio::test]
    async fn announcement_search_by_campaign() {
        let f = fixture();
        let a = campaign(&f, "Alpha");
        let b = campaign(&f, "Beta");
        f.store
            .publish_announcement(a, user(1), &AnnouncementDraft::new("one", "x"))
            .await
            .unwrap();
        f.store
            .publish_announcement(b, user(1), &AnnouncementDraft::new("two", "x"))
            .await
            .unwrap();

        let found = f
            .ranker
            .search_announcements(
                BoardQuery::default(),
                &AnnouncementSearchParams {
                    campaign_guid: Some(b),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "two");
    }
}

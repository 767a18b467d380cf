//! PublicationGateway - publish/unpublish of campaign events and announcements.
//!
//! After a successful publish, every subscriber of the campaign gets a
//! notification queued on the channels they chose. The subscriber lookup
//! runs on a spawned task, so the publish returns without waiting for it.
//! A failed lookup is logged and does not undo the publication.

use std::sync::Arc;

use crate::domain::foundation::{AnnouncementGuid, CampaignGuid, EventGuid, UserId};
use crate::domain::notification::{Notification, NotificationKind};
use crate::domain::publishing::{
    AnnouncementDraft, PublicAnnouncement, PublicEvent, PublishedAnnouncement, PublishedEvent,
    PublishingError,
};
use crate::ports::{NotificationQueue, PublicationRepository, SubscriptionRepository};

pub struct PublicationGateway {
    publications: Arc<dyn PublicationRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    notifications: Arc<dyn NotificationQueue>,
}

impl PublicationGateway {
    pub fn new(
        publications: Arc<dyn PublicationRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        notifications: Arc<dyn NotificationQueue>,
    ) -> Self {
        Self {
            publications,
            subscriptions,
            notifications,
        }
    }

    pub async fn publish_event(
        &self,
        event: EventGuid,
        publisher: UserId,
    ) -> Result<PublishedEvent, PublishingError> {
        let published = self.publications.publish_event(event, publisher).await?;
        tracing::info!(
            event_guid = %event,
            campaign_guid = %published.campaign.guid,
            publisher = %publisher,
            "event published"
        );

        self.notify_subscribers(
            published.campaign.guid,
            NotificationKind::EventPublished {
                event_guid: event,
                event_name: published.event.name.clone(),
                campaign_name: published.campaign.name.clone(),
            },
        );
        Ok(published)
    }

    /// Not idempotent: unpublishing an unpublished event fails `EventNotFound`.
    pub async fn unpublish_event(&self, event: EventGuid) -> Result<(), PublishingError> {
        self.publications.unpublish_event(event).await?;
        tracing::info!(event_guid = %event, "event unpublished");
        Ok(())
    }

    /// Validates the draft, then stores it as a new announcement.
    pub async fn publish_announcement(
        &self,
        campaign: CampaignGuid,
        publisher: UserId,
        draft: AnnouncementDraft,
    ) -> Result<PublishedAnnouncement, PublishingError> {
        draft.validate()?;

        let published = self
            .publications
            .publish_announcement(campaign, publisher, &draft)
            .await?;
        tracing::info!(
            announcement_guid = %published.announcement.guid,
            campaign_guid = %campaign,
            publisher = %publisher,
            "announcement published"
        );

        self.notify_subscribers(
            campaign,
            NotificationKind::AnnouncementPublished {
                announcement_guid: published.announcement.guid,
                title: published.announcement.title.clone(),
                campaign_name: published.campaign.name.clone(),
            },
        );
        Ok(published)
    }

    pub async fn unpublish_announcement(&self, announcement: AnnouncementGuid) -> Result<(), PublishingError> {
        self.publications.unpublish_announcement(announcement).await?;
        tracing::info!(announcement_guid = %announcement, "announcement unpublished");
        Ok(())
    }

    /// Member view: includes publisher contact details.
    pub async fn get_campaign_published_events(
        &self,
        campaign: CampaignGuid,
    ) -> Result<Vec<PublishedEvent>, PublishingError> {
        Ok(self.publications.campaign_published_events(campaign).await?)
    }

    /// Public view: publisher reduced to a display name.
    pub async fn get_campaign_published_events_public(
        &self,
        campaign: CampaignGuid,
    ) -> Result<Vec<PublicEvent>, PublishingError> {
        let events = self.get_campaign_published_events(campaign).await?;
        Ok(events.iter().map(PublishedEvent::to_public).collect())
    }

    pub async fn get_campaign_announcements(
        &self,
        campaign: CampaignGuid,
    ) -> Result<Vec<PublishedAnnouncement>, PublishingError> {
        Ok(self.publications.campaign_announcements(campaign).await?)
    }

    pub async fn get_campaign_announcements_public(
        &self,
        campaign: CampaignGuid,
    ) -> Result<Vec<PublicAnnouncement>, PublishingError> {
        let announcements = self.get_campaign_announcements(campaign).await?;
        Ok(announcements
            .iter()
            .map(PublishedAnnouncement::to_public)
            .collect())
    }

    fn notify_subscribers(&self, campaign: CampaignGuid, kind: NotificationKind) {
        let subscriptions = Arc::clone(&self.subscriptions);
        let notifications = Arc::clone(&self.notifications);

        tokio::spawn(async move {
            let subscribers = match subscriptions.subscribers(campaign).await {
                Ok(subscribers) => subscribers,
                Err(e) => {
                    tracing::error!(
                        campaign_guid = %campaign,
                        notification = kind.label(),
                        "Failed to load subscribers: {}",
                        e
                    );
                    return;
                }
            };

            for subscriber in subscribers {
                notifications.enqueue(Notification::new(
                    subscriber.contact,
                    kind.clone(),
                    subscriber.settings.via_email,
                    subscriber.settings.via_sms,
                ));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::directory::{CampaignSummary, UserContact};
    use crate::domain::event::NewEvent;
    use crate::domain::foundation::{DomainError, ErrorCode};
    use crate::domain::notification::{NotificationSettings, Subscriber, SubscriptionEntry};
    use crate::ports::EventRepository;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Semaphore;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    #[derive(Default)]
    struct RecordingQueue {
        sent: Mutex<Vec<Notification>>,
    }

    impl NotificationQueue for RecordingQueue {
        fn enqueue(&self, notification: Notification) {
            self.sent.lock().unwrap().push(notification);
        }
    }

    impl RecordingQueue {
        fn sent(&self) -> Vec<Notification> {
            self.sent.lock().unwrap().clone()
        }

        /// Yields to the fan-out task until `count` messages are queued.
        async fn wait_for(&self, count: usize) -> Vec<Notification> {
            tokio::time::timeout(Duration::from_secs(1), async {
                loop {
                    let sent = self.sent();
                    if sent.len() >= count {
                        return sent;
                    }
                    tokio::task::yield_now().await;
                }
            })
            .await
            .expect("subscriber notifications were not queued")
        }
    }

    /// Subscriber lookup that stays pending until a permit is added.
    struct GatedSubscriptions {
        store: Arc<InMemoryStore>,
        gate: Semaphore,
    }

    #[async_trait]
    impl SubscriptionRepository for GatedSubscriptions {
        async fn subscribe(&self, user: UserId, campaign: CampaignGuid, settings: NotificationSettings) -> Result<(), DomainError> {
            SubscriptionRepository::subscribe(&*self.store, user, campaign, settings).await
        }
        async fn update(&self, user: UserId, campaign: CampaignGuid, settings: NotificationSettings) -> Result<(), DomainError> {
            SubscriptionRepository::update(&*self.store, user, campaign, settings).await
        }
        async fn unsubscribe(&self, user: UserId, campaign: CampaignGuid) -> Result<(), DomainError> {
            SubscriptionRepository::unsubscribe(&*self.store, user, campaign).await
        }
        async fn for_user(&self, user: UserId) -> Result<Vec<SubscriptionEntry>, DomainError> {
            SubscriptionRepository::for_user(&*self.store, user).await
        }
        async fn subscribers(&self, campaign: CampaignGuid) -> Result<Vec<Subscriber>, DomainError> {
            let _permit = self
                .gate
                .acquire()
                .await
                .map_err(|_| DomainError::database("gate closed"))?;
            SubscriptionRepository::subscribers(&*self.store, campaign).await
        }
    }

    struct FailingSubscriptions;

    #[async_trait]
    impl SubscriptionRepository for FailingSubscriptions {
        async fn subscribe(&self, _: UserId, _: CampaignGuid, _: NotificationSettings) -> Result<(), DomainError> {
            Err(DomainError::database("down"))
        }
        async fn update(&self, _: UserId, _: CampaignGuid, _: NotificationSettings) -> Result<(), DomainError> {
            Err(DomainError::database("down"))
        }
        async fn unsubscribe(&self, _: UserId, _: CampaignGuid) -> Result<(), DomainError> {
            Err(DomainError::database("down"))
        }
        async fn for_user(&self, _: UserId) -> Result<Vec<SubscriptionEntry>, DomainError> {
            Err(DomainError::database("down"))
        }
        async fn subscribers(&self, _: CampaignGuid) -> Result<Vec<Subscriber>, DomainError> {
            Err(DomainError::database("down"))
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Fixtures
    // ════════════════════════════════════════════════════════════════════════════

    fn user(id: i64) -> UserId {
        UserId::new(id).unwrap()
    }

    fn contact(id: i64) -> UserContact {
        UserContact {
            user_id: user(id),
            first_name: Some("Ada".to_string()),
            last_name: Some(format!("Member{}", id)),
            display_name: format!("ada{}", id),
            email: format!("ada{}@example.org", id),
            phone: Some("+15550100".to_string()),
            profile_pic_url: None,
        }
    }

    struct Fixture {
        store: Arc<InMemoryStore>,
        gateway: PublicationGateway,
        queue: Arc<RecordingQueue>,
        campaign: CampaignGuid,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        store.register_user(contact(1));
        store.register_user(contact(2));
        let campaign = CampaignGuid::new();
        store.register_campaign(CampaignSummary {
            guid: campaign,
            name: "Vale for Council".to_string(),
            city: Some("Haifa".to_string()),
            logo_url: None,
        });
        let queue = Arc::new(RecordingQueue::default());
        Fixture {
            gateway: PublicationGateway::new(store.clone(), store.clone(), queue.clone()),
            store,
            queue,
            campaign,
        }
    }

    async fn campaign_event(f: &Fixture) -> EventGuid {
        f.store
            .create(&NewEvent::for_campaign(user(1), f.campaign, "Rally"))
            .await
            .unwrap()
            .guid
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn publishes_campaign_event_once() {
        let f = fixture();
        let event = campaign_event(&f).await;

        let first = f.gateway.publish_event(event, user(1)).await.unwrap();
        let err = f.gateway.publish_event(event, user(2)).await.unwrap_err();

        assert_eq!(err, PublishingError::already_published(event));
        let listed = f.gateway.get_campaign_published_events(f.campaign).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].published_at, first.published_at);
        assert_eq!(listed[0].publisher.user_id, user(1));
    }

    #[tokio::test]
    async fn personal_event_cannot_be_published() {
        let f = fixture();
        let event = f
            .store
            .create(&NewEvent::personal(user(1), "Dinner"))
            .await
            .unwrap()
            .guid;

        let err = f.gateway.publish_event(event, user(1)).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::IncorrectEventType);
    }

    #[tokio::test]
    async fn fails_when_publisher_not_found() {
        let f = fixture();
        let event = campaign_event(&f).await;

        let err = f.gateway.publish_event(event, user(99)).await.unwrap_err();

        assert_eq!(err, PublishingError::user_not_found(user(99)));
    }

    #[tokio::test]
    async fn unpublish_is_not_idempotent() {
        let f = fixture();
        let event = campaign_event(&f).await;
        f.gateway.publish_event(event, user(1)).await.unwrap();

        f.gateway.unpublish_event(event).await.unwrap();
        let err = f.gateway.unpublish_event(event).await.unwrap_err();

        assert_eq!(err, PublishingError::event_not_found(event));
    }

    #[tokio::test]
    async fn never_published_event_cannot_be_unpublished() {
        let f = fixture();
        let event = campaign_event(&f).await;

        let err = f.gateway.unpublish_event(event).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::EventNotFound);
    }

    #[tokio::test]
    async fn oversized_title_is_rejected_before_storage() {
        let f = fixture();
        let missing_campaign = CampaignGuid::new();

        let err = f
            .gateway
            .publish_announcement(
                missing_campaign,
                user(1),
                AnnouncementDraft::new("t".repeat(101), "body"),
            )
            .await
            .unwrap_err();

        // the campaign does not exist, so reaching storage would have said so
        assert_eq!(err, PublishingError::TitleTooLong { length: 101 });
    }

    #[tokio::test]
    async fn announcement_lifecycle() {
        let f = fixture();

        let published = f
            .gateway
            .publish_announcement(f.campaign, user(1), AnnouncementDraft::new("Hello", "World"))
            .await
            .unwrap();
        let guid = published.announcement.guid;
        assert_eq!(f.gateway.get_campaign_announcements(f.campaign).await.unwrap().len(), 1);

        f.gateway.unpublish_announcement(guid).await.unwrap();
        let err = f.gateway.unpublish_announcement(guid).await.unwrap_err();

        assert_eq!(err, PublishingError::announcement_not_found(guid));
        assert!(f.gateway.get_campaign_announcements(f.campaign).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_unknown_campaign_fails() {
        let f = fixture();
        let missing = CampaignGuid::new();

        let err = f.gateway.get_campaign_announcements_public(missing).await.unwrap_err();

        assert_eq!(err, PublishingError::campaign_not_found(missing));
    }

    #[tokio::test]
    async fn public_listing_hides_publisher_contact() {
        let f = fixture();
        let event = campaign_event(&f).await;
        f.gateway.publish_event(event, user(1)).await.unwrap();

        let public = f
            .gateway
            .get_campaign_published_events_public(f.campaign)
            .await
            .unwrap();

        assert_eq!(public[0].publisher_name, "Ada Member1");
        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("ada1@example.org"));
    }

    #[tokio::test]
    async fn subscribers_are_notified_on_publish() {
        let f = fixture();
        f.store
            .subscribe(user(2), f.campaign, NotificationSettings::new(false, true))
            .await
            .unwrap();
        let event = campaign_event(&f).await;

        f.gateway.publish_event(event, user(1)).await.unwrap();

        let sent = f.queue.wait_for(1).await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient.user_id, user(2));
        assert!(sent[0].via_sms);
        assert!(!sent[0].via_email);
    }

    #[tokio::test]
    async fn publish_returns_while_subscriber_lookup_is_pending() {
        let f = fixture();
        f.store
            .subscribe(user(2), f.campaign, NotificationSettings::new(true, false))
            .await
            .unwrap();
        let subscriptions = Arc::new(GatedSubscriptions {
            store: f.store.clone(),
            gate: Semaphore::new(0),
        });
        let gateway = PublicationGateway::new(f.store.clone(), subscriptions.clone(), f.queue.clone());
        let event = campaign_event(&f).await;

        let published = tokio::time::timeout(
            Duration::from_millis(500),
            gateway.publish_event(event, user(1)),
        )
        .await
        .expect("publish waited for the subscriber lookup");
        assert!(published.is_ok());

        let announced = tokio::time::timeout(
            Duration::from_millis(500),
            gateway.publish_announcement(f.campaign, user(1), AnnouncementDraft::new("News", "Body")),
        )
        .await
        .expect("announcement waited for the subscriber lookup");
        assert!(announced.is_ok());
        assert!(f.queue.sent().is_empty());

        subscriptions.gate.add_permits(2);
        let sent = f.queue.wait_for(2).await;
        let mut labels: Vec<_> = sent.iter().map(|m| m.kind.label()).collect();
        labels.sort_unstable();
        assert_eq!(labels, vec!["announcement_published", "event_published"]);
        assert!(sent.iter().all(|m| m.recipient.user_id == user(2)));
    }

    #[tokio::test]
    async fn subscriber_lookup_failure_does_not_undo_publish() {
        let store = Arc::new(InMemoryStore::new());
        store.register_user(contact(1));
        let campaign = CampaignGuid::new();
        store.register_campaign(CampaignSummary {
            guid: campaign,
            name: "Vale".to_string(),
            city: None,
            logo_url: None,
        });
        let gateway = PublicationGateway::new(
            store.clone(),
            Arc::new(FailingSubscriptions),
            Arc::new(RecordingQueue::default()),
        );
        let event = store
            .create(&NewEvent::for_campaign(user(1), campaign, "Rally"))
            .await
            .unwrap()
            .guid;

        gateway.publish_event(event, user(1)).await.unwrap();

        assert_eq!(gateway.get_campaign_published_events(campaign).await.unwrap().len(), 1);
    }
}

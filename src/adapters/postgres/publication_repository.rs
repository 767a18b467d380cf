//! PostgreSQL implementation of PublicationRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::event::Event;
use crate::domain::foundation::{
    AnnouncementGuid, CampaignGuid, DomainError, EventGuid, Timestamp, UserId,
};
use crate::domain::publishing::{
    Announcement, AnnouncementDraft, Publication, PublishedAnnouncement, PublishedEvent,
    PublishingError,
};
use crate::ports::PublicationRepository;

use super::rows::{
    find_campaign, find_user, parse_user_id, prefixed_contact_columns, query_failed, violates,
    EventRow, PrefixedCampaign, PrefixedContact, EVENT_COLUMNS,
};

const PUBLICATION_KEY: &str = "event_publications_pkey";

/// PostgreSQL implementation of the PublicationRepository port.
pub struct PostgresPublicationRepository {
    pool: PgPool,
}

impl PostgresPublicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Published events, newest first, optionally of one campaign.
    async fn events_where(&self, campaign: Option<CampaignGuid>) -> Result<Vec<PublishedEvent>, DomainError> {
        let sql = format!(
            r#"
            SELECT {event},
                   c.name AS campaign_name, c.city AS campaign_city, c.logo_url AS campaign_logo_url,
                   {publisher},
                   p.publisher_id, p.published_at
            FROM event_publications p
            JOIN events e ON e.id = p.event_id
            JOIN campaigns c ON c.guid = e.campaign_guid
            JOIN users pu ON pu.id = p.publisher_id
            WHERE ($1::uuid IS NULL OR e.campaign_guid = $1)
            ORDER BY p.published_at DESC
            "#,
            event = EVENT_COLUMNS,
            publisher = prefixed_contact_columns("pu"),
        );
        let rows: Vec<PublishedEventRow> = sqlx::query_as(&sql)
            .bind(campaign.map(|c| *c.as_uuid()))
            .fetch_all(&self.pool)
            .await
            .map_err(query_failed("list published events"))?;

        rows.into_iter().map(PublishedEvent::try_from).collect()
    }

    async fn announcements_where(
        &self,
        campaign: Option<CampaignGuid>,
    ) -> Result<Vec<PublishedAnnouncement>, DomainError> {
        let sql = format!(
            r#"
            SELECT a.guid, a.campaign_guid, a.publisher_id, a.title, a.content, a.published_at,
                   c.name AS campaign_name, c.city AS campaign_city, c.logo_url AS campaign_logo_url,
                   {publisher}
            FROM announcements a
            JOIN campaigns c ON c.guid = a.campaign_guid
            JOIN users pu ON pu.id = a.publisher_id
            WHERE ($1::uuid IS NULL OR a.campaign_guid = $1)
            ORDER BY a.published_at DESC
            "#,
            publisher = prefixed_contact_columns("pu"),
        );
        let rows: Vec<AnnouncementRow> = sqlx::query_as(&sql)
            .bind(campaign.map(|c| *c.as_uuid()))
            .fetch_all(&self.pool)
            .await
            .map_err(query_failed("list announcements"))?;

        rows.into_iter().map(PublishedAnnouncement::try_from).collect()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PublishedEventRow {
    #[sqlx(flatten)]
    event: EventRow,
    #[sqlx(flatten)]
    campaign: PrefixedCampaign,
    #[sqlx(flatten)]
    publisher: PrefixedContact,
    publisher_id: i64,
    published_at: DateTime<Utc>,
}

impl TryFrom<PublishedEventRow> for PublishedEvent {
    type Error = DomainError;

    fn try_from(row: PublishedEventRow) -> Result<Self, Self::Error> {
        let event = Event::try_from(row.event)?;
        let campaign = event
            .campaign()
            .ok_or_else(|| DomainError::from(PublishingError::incorrect_event_type(event.guid)))?;
        Ok(PublishedEvent {
            campaign: row.campaign.into_summary(campaign),
            publisher: row.publisher.into_contact(parse_user_id(row.publisher_id)?),
            published_at: Timestamp::from_datetime(row.published_at),
            event,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AnnouncementRow {
    guid: Uuid,
    campaign_guid: Uuid,
    publisher_id: i64,
    title: String,
    content: String,
    published_at: DateTime<Utc>,
    #[sqlx(flatten)]
    campaign: PrefixedCampaign,
    #[sqlx(flatten)]
    publisher: PrefixedContact,
}

impl TryFrom<AnnouncementRow> for PublishedAnnouncement {
    type Error = DomainError;

    fn try_from(row: AnnouncementRow) -> Result<Self, Self::Error> {
        let campaign = CampaignGuid::from_uuid(row.campaign_guid);
        let publisher = parse_user_id(row.publisher_id)?;
        Ok(PublishedAnnouncement {
            announcement: Announcement {
                guid: AnnouncementGuid::from_uuid(row.guid),
                campaign,
                publisher,
                title: row.title,
                content: row.content,
                published_at: Timestamp::from_datetime(row.published_at),
            },
            campaign: row.campaign.into_summary(campaign),
            publisher: row.publisher.into_contact(publisher),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PublicationRow {
    publisher_id: i64,
    published_at: DateTime<Utc>,
}

#[async_trait]
impl PublicationRepository for PostgresPublicationRepository {
    async fn publish_event(&self, event: EventGuid, publisher: UserId) -> Result<PublishedEvent, DomainError> {
        let mut tx = self.pool.begin().await.map_err(query_failed("begin transaction"))?;

        let sql = format!("SELECT {} FROM events e WHERE e.guid = $1 FOR UPDATE", EVENT_COLUMNS);
        let row: Option<EventRow> = sqlx::query_as(&sql)
            .bind(event.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(query_failed("lock event"))?;
        let target = match row {
            Some(row) => Event::try_from(row)?,
            None => return Err(PublishingError::event_not_found(event).into()),
        };
        let publisher_contact = find_user(&mut *tx, publisher)
            .await?
            .ok_or_else(|| DomainError::from(PublishingError::user_not_found(publisher)))?;

        let existing: Option<PublicationRow> = sqlx::query_as(
            "SELECT publisher_id, published_at FROM event_publications WHERE event_id = $1",
        )
        .bind(target.id.value())
        .fetch_optional(&mut *tx)
        .await
        .map_err(query_failed("load publication"))?;
        let existing = existing
            .map(|row| {
                Ok::<_, DomainError>(Publication {
                    event,
                    publisher: parse_user_id(row.publisher_id)?,
                    published_at: Timestamp::from_datetime(row.published_at),
                })
            })
            .transpose()?;

        let publication = Publication::publish(&target, existing.as_ref(), publisher, Timestamp::now())?;
        let campaign = target
            .campaign()
            .ok_or_else(|| DomainError::from(PublishingError::incorrect_event_type(event)))?;
        let summary = find_campaign(&mut *tx, campaign)
            .await?
            .ok_or_else(|| DomainError::from(PublishingError::campaign_not_found(campaign)))?;

        sqlx::query(
            "INSERT INTO event_publications (event_id, publisher_id, published_at) VALUES ($1, $2, $3)",
        )
        .bind(target.id.value())
        .bind(publisher.value())
        .bind(publication.published_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if violates(&e, PUBLICATION_KEY) {
                return PublishingError::already_published(event).into();
            }
            query_failed("insert publication")(e)
        })?;

        tx.commit().await.map_err(query_failed("commit publication"))?;

        Ok(PublishedEvent {
            event: target,
            campaign: summary,
            publisher: publisher_contact,
            published_at: publication.published_at,
        })
    }

    async fn unpublish_event(&self, event: EventGuid) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM event_publications p
            USING events e
            WHERE p.event_id = e.id AND e.guid = $1
            "#,
        )
        .bind(event.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(query_failed("unpublish event"))?;

        if result.rows_affected() == 0 {
            return Err(PublishingError::event_not_found(event).into());
        }
        Ok(())
    }

    async fn publish_announcement(
        &self,
        campaign: CampaignGuid,
        publisher: UserId,
        draft: &AnnouncementDraft,
    ) -> Result<PublishedAnnouncement, DomainError> {
        let summary = find_campaign(&self.pool, campaign)
            .await?
            .ok_or_else(|| DomainError::from(PublishingError::campaign_not_found(campaign)))?;
        let publisher_contact = find_user(&self.pool, publisher)
            .await?
            .ok_or_else(|| DomainError::from(PublishingError::user_not_found(publisher)))?;

        let announcement = Announcement {
            guid: AnnouncementGuid::new(),
            campaign,
            publisher,
            title: draft.title.trim().to_string(),
            content: draft.content.trim().to_string(),
            published_at: Timestamp::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO announcements (guid, campaign_guid, publisher_id, title, content, published_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(announcement.guid.as_uuid())
        .bind(campaign.as_uuid())
        .bind(publisher.value())
        .bind(&announcement.title)
        .bind(&announcement.content)
        .bind(announcement.published_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(query_failed("insert announcement"))?;

        Ok(PublishedAnnouncement {
            announcement,
            campaign: summary,
            publisher: publisher_contact,
        })
    }

    async fn unpublish_announcement(&self, announcement: AnnouncementGuid) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM announcements WHERE guid = $1")
            .bind(announcement.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(query_failed("unpublish announcement"))?;

        if result.rows_affected() == 0 {
            return Err(PublishingError::announcement_not_found(announcement).into());
        }
        Ok(())
    }

    async fn campaign_published_events(&self, campaign: CampaignGuid) -> Result<Vec<PublishedEvent>, DomainError> {
        if find_campaign(&self.pool, campaign).await?.is_none() {
            return Err(PublishingError::campaign_not_found(campaign).into());
        }
        self.events_where(Some(campaign)).await
    }

    async fn campaign_announcements(
        &self,
        campaign: CampaignGuid,
    ) -> Result<Vec<PublishedAnnouncement>, DomainError> {
        if find_campaign(&self.pool, campaign).await?.is_none() {
            return Err(PublishingError::campaign_not_found(campaign).into());
        }
        self.announcements_where(Some(campaign)).await
    }

    async fn published_events(&self) -> Result<Vec<PublishedEvent>, DomainError> {
        self.events_where(None).await
    }

    async fn published_announcements(&self) -> Result<Vec<PublishedAnnouncement>, DomainError> {
        self.announcements_where(None).await
    }
}

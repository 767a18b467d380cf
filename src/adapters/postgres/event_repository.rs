//! PostgreSQL implementation of EventRepository.
//!
//! Membership lives in `event_members`, keyed by `(event_id, user_id)`, so a
//! user holds at most one role per event and moving between roles is a single
//! `UPDATE`. Every mutation runs in one transaction that first locks the event
//! row with `SELECT ... FOR UPDATE`; concurrent joins on the same event are
//! serialized and the capacity check sees committed state.

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

use crate::domain::directory::UserContact;
use crate::domain::event::{
    CreatedEvent, Event, EventDetails, EventError, EventMembership, EventOwner, EventPatch,
    EventSnapshot, JoinedEvent, MemberRole, MembershipTransition, NewEvent, ParticipantRef,
    UserEvent,
};
use crate::domain::foundation::{CampaignGuid, DomainError, EventGuid, EventId, UserId};
use crate::ports::EventRepository;

use super::rows::{
    datetime, find_campaign, find_user, find_user_by_email, parse_role, parse_user_id,
    prefixed_contact_columns, query_failed, EventRow, PrefixedContact, UserRow, EVENT_COLUMNS,
    USER_COLUMNS,
};

/// PostgreSQL implementation of the EventRepository port.
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, DomainError> {
        self.pool.begin().await.map_err(query_failed("begin transaction"))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EventDetailsRow {
    #[sqlx(flatten)]
    event: EventRow,
    #[sqlx(flatten)]
    creator: PrefixedContact,
    attending: i64,
}

impl TryFrom<EventDetailsRow> for EventDetails {
    type Error = DomainError;

    fn try_from(row: EventDetailsRow) -> Result<Self, Self::Error> {
        let event = Event::try_from(row.event)?;
        Ok(EventDetails {
            creator: row.creator.into_contact(event.creator),
            attending: usize::try_from(row.attending).unwrap_or(0),
            event,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserEventRow {
    #[sqlx(flatten)]
    event: EventRow,
    role: String,
}

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    user_id: i64,
    role: String,
}

fn details_query(filter: &str) -> String {
    format!(
        r#"
        SELECT {event},
               {creator},
               (SELECT COUNT(*) FROM event_members m
                 WHERE m.event_id = e.id AND m.role = 'participant') AS attending
        FROM events e
        JOIN users c ON c.id = e.creator_id
        {filter}
        ORDER BY e.id
        "#,
        event = EVENT_COLUMNS,
        creator = prefixed_contact_columns("c"),
        filter = filter,
    )
}

/// Loads and locks the event row for the rest of the transaction.
async fn lock_event(
    tx: &mut Transaction<'static, Postgres>,
    event: EventGuid,
) -> Result<Event, DomainError> {
    let sql = format!("SELECT {} FROM events e WHERE e.guid = $1 FOR UPDATE", EVENT_COLUMNS);
    let row: Option<EventRow> = sqlx::query_as(&sql)
        .bind(event.as_uuid())
        .fetch_optional(&mut **tx)
        .await
        .map_err(query_failed("lock event"))?;

    match row {
        Some(row) => Event::try_from(row),
        None => Err(EventError::not_found(event).into()),
    }
}

async fn event_id<'e, E: PgExecutor<'e>>(executor: E, event: EventGuid) -> Result<i64, DomainError> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM events WHERE guid = $1")
        .bind(event.as_uuid())
        .fetch_optional(executor)
        .await
        .map_err(query_failed("find event"))?;

    row.map(|(id,)| id)
        .ok_or_else(|| EventError::not_found(event).into())
}

async fn load_membership(
    tx: &mut Transaction<'static, Postgres>,
    event: &Event,
) -> Result<EventMembership, DomainError> {
    let rows: Vec<MemberRow> = sqlx::query_as(
        r#"
        SELECT user_id, role
        FROM event_members
        WHERE event_id = $1
        "#,
    )
    .bind(event.id.value())
    .fetch_all(&mut **tx)
    .await
    .map_err(query_failed("load event members"))?;

    let members = rows
        .into_iter()
        .map(|row| Ok((parse_user_id(row.user_id)?, parse_role(&row.role)?)))
        .collect::<Result<Vec<_>, DomainError>>()?;
    Ok(EventMembership::from_members(event.guid, event.max_attendees, members))
}

/// Writes the role, moving the row when the user held the other one.
async fn store_role(
    tx: &mut Transaction<'static, Postgres>,
    event: EventId,
    transition: &MembershipTransition,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO event_members (event_id, user_id, role)
        VALUES ($1, $2, $3)
        ON CONFLICT (event_id, user_id) DO UPDATE SET role = EXCLUDED.role
        "#,
    )
    .bind(event.value())
    .bind(transition.user.value())
    .bind(transition.current.as_str())
    .execute(&mut **tx)
    .await
    .map_err(query_failed("store event member"))?;

    Ok(())
}

async fn members_with_role<'e, E: PgExecutor<'e>>(
    executor: E,
    event_id: i64,
    role: Option<MemberRole>,
) -> Result<Vec<UserContact>, DomainError> {
    let sql = format!(
        r#"
        SELECT {}
        FROM event_members m
        JOIN users u ON u.id = m.user_id
        WHERE m.event_id = $1 AND ($2::text IS NULL OR m.role = $2)
        ORDER BY u.id
        "#,
        USER_COLUMNS
    );
    let rows: Vec<UserRow> = sqlx::query_as(&sql)
        .bind(event_id)
        .bind(role.map(|r| r.as_str()))
        .fetch_all(executor)
        .await
        .map_err(query_failed("load event members"))?;

    rows.into_iter().map(UserContact::try_from).collect()
}

async fn resolve<'e, E: PgExecutor<'e>>(
    executor: E,
    who: &ParticipantRef,
) -> Result<Option<UserContact>, DomainError> {
    match who {
        ParticipantRef::Id(user) => find_user(executor, *user).await,
        ParticipantRef::Email(email) => find_user_by_email(executor, email).await,
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn create(&self, new: &NewEvent) -> Result<CreatedEvent, DomainError> {
        let mut tx = self.begin().await?;

        let (campaign, owner_user) = match new.owner {
            EventOwner::Campaign(campaign) => {
                if find_campaign(&mut *tx, campaign).await?.is_none() {
                    return Err(EventError::campaign_not_found(campaign).into());
                }
                (Some(campaign), None)
            }
            EventOwner::Personal(user) => (None, Some(user)),
        };
        if find_user(&mut *tx, new.creator).await?.is_none() {
            return Err(EventError::user_not_found(new.creator).into());
        }

        let guid = EventGuid::new();
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO events (
                guid, name, description, location, start_time, end_time,
                max_attendees, is_open_join, creator_id, campaign_guid, owner_user_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(guid.as_uuid())
        .bind(new.name.trim())
        .bind(&new.description)
        .bind(&new.location)
        .bind(datetime(new.start_time))
        .bind(datetime(new.end_time))
        .bind(new.max_attendees)
        .bind(new.is_open_join)
        .bind(new.creator.value())
        .bind(campaign.map(|c| *c.as_uuid()))
        .bind(owner_user.map(|u| u.value()))
        .fetch_one(&mut *tx)
        .await
        .map_err(query_failed("insert event"))?;

        let (creator, role) = new.creator_membership();
        sqlx::query("INSERT INTO event_members (event_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(creator.value())
            .bind(role.as_str())
            .execute(&mut *tx)
            .await
            .map_err(query_failed("insert event creator"))?;

        tx.commit().await.map_err(query_failed("commit event"))?;

        Ok(CreatedEvent {
            id: EventId::from_raw(id),
            guid,
        })
    }

    async fn update(&self, event: EventGuid, patch: &EventPatch) -> Result<EventSnapshot, DomainError> {
        let mut tx = self.begin().await?;
        let current = lock_event(&mut tx, event).await?;

        if let Some(campaign) = patch.campaign {
            if find_campaign(&mut *tx, campaign).await?.is_none() {
                return Err(EventError::campaign_not_found(campaign).into());
            }
        }

        let membership = load_membership(&mut tx, &current).await?;
        let mut updated = current.clone();
        updated.apply_patch(patch, membership.participant_count())?;

        sqlx::query(
            r#"
            UPDATE events SET
                name = $2,
                description = $3,
                location = $4,
                start_time = $5,
                end_time = $6,
                max_attendees = $7,
                is_open_join = $8,
                campaign_guid = $9
            WHERE id = $1
            "#,
        )
        .bind(updated.id.value())
        .bind(&updated.name)
        .bind(&updated.description)
        .bind(&updated.location)
        .bind(datetime(updated.start_time))
        .bind(datetime(updated.end_time))
        .bind(updated.max_attendees)
        .bind(updated.is_open_join)
        .bind(updated.campaign().map(|c| *c.as_uuid()))
        .execute(&mut *tx)
        .await
        .map_err(query_failed("update event"))?;

        let members = members_with_role(&mut *tx, updated.id.value(), None).await?;
        tx.commit().await.map_err(query_failed("commit event update"))?;

        Ok(EventSnapshot {
            event: updated,
            members,
        })
    }

    async fn delete(&self, event: EventGuid) -> Result<EventSnapshot, DomainError> {
        let mut tx = self.begin().await?;
        let current = lock_event(&mut tx, event).await?;
        let members = members_with_role(&mut *tx, current.id.value(), None).await?;

        // Members and the publication go with the row (ON DELETE CASCADE).
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(current.id.value())
            .execute(&mut *tx)
            .await
            .map_err(query_failed("delete event"))?;

        tx.commit().await.map_err(query_failed("commit event delete"))?;

        Ok(EventSnapshot {
            event: current,
            members,
        })
    }

    async fn add_participant(
        &self,
        event: EventGuid,
        who: &ParticipantRef,
    ) -> Result<JoinedEvent, DomainError> {
        let mut tx = self.begin().await?;
        let current = lock_event(&mut tx, event).await?;
        let member = resolve(&mut *tx, who)
            .await?
            .ok_or_else(|| DomainError::from(EventError::user_not_found(who)))?;

        let mut membership = load_membership(&mut tx, &current).await?;
        let transition = membership.add_participant(member.user_id)?;
        store_role(&mut tx, current.id, &transition).await?;

        tx.commit().await.map_err(query_failed("commit participant"))?;

        Ok(JoinedEvent {
            event: current,
            member,
            transition,
        })
    }

    async fn remove_participant(&self, event: EventGuid, who: &ParticipantRef) -> Result<bool, DomainError> {
        let id = event_id(&self.pool, event).await?;
        let member = resolve(&self.pool, who)
            .await?
            .ok_or_else(|| DomainError::from(EventError::user_not_found(who)))?;

        let result = sqlx::query(
            "DELETE FROM event_members WHERE event_id = $1 AND user_id = $2 AND role = 'participant'",
        )
        .bind(id)
        .bind(member.user_id.value())
        .execute(&self.pool)
        .await
        .map_err(query_failed("remove participant"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_watcher(&self, event: EventGuid, user: UserId) -> Result<MembershipTransition, DomainError> {
        let mut tx = self.begin().await?;
        let current = lock_event(&mut tx, event).await?;
        if find_user(&mut *tx, user).await?.is_none() {
            return Err(EventError::user_not_found(user).into());
        }

        let mut membership = load_membership(&mut tx, &current).await?;
        let transition = membership.add_watcher(user)?;
        store_role(&mut tx, current.id, &transition).await?;

        tx.commit().await.map_err(query_failed("commit watcher"))?;
        Ok(transition)
    }

    async fn remove_watcher(&self, event: EventGuid, user: UserId) -> Result<bool, DomainError> {
        let id = event_id(&self.pool, event).await?;

        let result = sqlx::query(
            "DELETE FROM event_members WHERE event_id = $1 AND user_id = $2 AND role = 'watcher'",
        )
        .bind(id)
        .bind(user.value())
        .execute(&self.pool)
        .await
        .map_err(query_failed("remove watcher"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn resolve_user(&self, who: &ParticipantRef) -> Result<Option<UserContact>, DomainError> {
        resolve(&self.pool, who).await
    }

    async fn find(&self, event: EventGuid) -> Result<Option<EventDetails>, DomainError> {
        let sql = details_query("WHERE e.guid = $1");
        let row: Option<EventDetailsRow> = sqlx::query_as(&sql)
            .bind(event.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_failed("find event"))?;

        row.map(EventDetails::try_from).transpose()
    }

    async fn participants(&self, event: EventGuid) -> Result<Vec<UserContact>, DomainError> {
        let id = event_id(&self.pool, event).await?;
        members_with_role(&self.pool, id, Some(MemberRole::Participant)).await
    }

    async fn watchers(&self, event: EventGuid) -> Result<Vec<UserContact>, DomainError> {
        let id = event_id(&self.pool, event).await?;
        members_with_role(&self.pool, id, Some(MemberRole::Watcher)).await
    }

    async fn events_for_user(&self, user: UserId) -> Result<Vec<UserEvent>, DomainError> {
        if find_user(&self.pool, user).await?.is_none() {
            return Err(EventError::user_not_found(user).into());
        }

        let sql = format!(
            r#"
            SELECT {}, m.role
            FROM events e
            JOIN event_members m ON m.event_id = e.id
            WHERE m.user_id = $1
            ORDER BY e.id
            "#,
            EVENT_COLUMNS
        );
        let rows: Vec<UserEventRow> = sqlx::query_as(&sql)
            .bind(user.value())
            .fetch_all(&self.pool)
            .await
            .map_err(query_failed("list user events"))?;

        rows.into_iter()
            .map(|row| {
                Ok(UserEvent {
                    role: parse_role(&row.role)?,
                    event: Event::try_from(row.event)?,
                })
            })
            .collect()
    }

    async fn campaign_events(&self, campaign: CampaignGuid) -> Result<Vec<EventDetails>, DomainError> {
        if find_campaign(&self.pool, campaign).await?.is_none() {
            return Err(EventError::campaign_not_found(campaign).into());
        }

        let sql = details_query("WHERE e.campaign_guid = $1");
        let rows: Vec<EventDetailsRow> = sqlx::query_as(&sql)
            .bind(campaign.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(query_failed("list campaign events"))?;

        rows.into_iter().map(EventDetails::try_from).collect()
    }

    async fn personal_events(&self, user: UserId) -> Result<Vec<Event>, DomainError> {
        if find_user(&self.pool, user).await?.is_none() {
            return Err(EventError::user_not_found(user).into());
        }

        let sql = format!(
            "SELECT {} FROM events e WHERE e.owner_user_id = $1 ORDER BY e.id",
            EVENT_COLUMNS
        );
        let rows: Vec<EventRow> = sqlx::query_as(&sql)
            .bind(user.value())
            .fetch_all(&self.pool)
            .await
            .map_err(query_failed("list personal events"))?;

        rows.into_iter().map(Event::try_from).collect()
    }
}

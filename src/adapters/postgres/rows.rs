//! Row types and lookups shared by the PostgreSQL repositories.

use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::domain::directory::{CampaignSummary, UserContact};
use crate::domain::event::{Event, EventOwner, MemberRole};
use crate::domain::foundation::{CampaignGuid, DomainError, ErrorCode, EventGuid, EventId, Timestamp, UserId};

/// Event columns, aliased to match [`EventRow`]. Expects `events e`.
pub(super) const EVENT_COLUMNS: &str = r#"
    e.id, e.guid, e.name, e.description, e.location, e.start_time, e.end_time,
    e.max_attendees, e.is_open_join, e.creator_id, e.campaign_guid, e.owner_user_id
"#;

/// User columns. Expects `users u`.
pub(super) const USER_COLUMNS: &str =
    "u.id, u.first_name, u.last_name, u.display_name, u.email, u.phone, u.profile_pic_url";

/// Maps a driver failure to an infrastructure error naming the action.
pub(super) fn query_failed(action: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", action, e))
}

/// True when `e` violates the named unique or primary key constraint.
pub(super) fn violates(e: &sqlx::Error, constraint: &str) -> bool {
    if let sqlx::Error::Database(db_err) = e {
        return db_err.constraint() == Some(constraint);
    }
    false
}

pub(super) fn parse_user_id(raw: i64) -> Result<UserId, DomainError> {
    UserId::new(raw).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid user id {}: {}", raw, e))
    })
}

pub(super) fn parse_role(raw: &str) -> Result<MemberRole, DomainError> {
    raw.parse().map_err(|_| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid member role: {}", raw))
    })
}

pub(super) fn timestamp(value: Option<DateTime<Utc>>) -> Option<Timestamp> {
    value.map(Timestamp::from_datetime)
}

pub(super) fn datetime(value: Option<Timestamp>) -> Option<DateTime<Utc>> {
    value.map(|ts| *ts.as_datetime())
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(super) struct EventRow {
    pub id: i64,
    pub guid: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub max_attendees: Option<i32>,
    pub is_open_join: bool,
    pub creator_id: i64,
    pub campaign_guid: Option<Uuid>,
    pub owner_user_id: Option<i64>,
}

impl TryFrom<EventRow> for Event {
    type Error = DomainError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let owner = match (row.campaign_guid, row.owner_user_id) {
            (Some(campaign), None) => EventOwner::Campaign(CampaignGuid::from_uuid(campaign)),
            (None, Some(user)) => EventOwner::Personal(parse_user_id(user)?),
            _ => {
                return Err(DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Event {} must have exactly one owner", row.guid),
                ))
            }
        };

        Ok(Event {
            id: EventId::from_raw(row.id),
            guid: EventGuid::from_uuid(row.guid),
            name: row.name,
            description: row.description,
            location: row.location,
            start_time: timestamp(row.start_time),
            end_time: timestamp(row.end_time),
            max_attendees: row.max_attendees,
            is_open_join: row.is_open_join,
            creator: parse_user_id(row.creator_id)?,
            owner,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(super) struct UserRow {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub profile_pic_url: Option<String>,
}

impl TryFrom<UserRow> for UserContact {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(UserContact {
            user_id: parse_user_id(row.id)?,
            first_name: row.first_name,
            last_name: row.last_name,
            display_name: row.display_name,
            email: row.email,
            phone: row.phone,
            profile_pic_url: row.profile_pic_url,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(super) struct CampaignRow {
    pub guid: Uuid,
    pub name: String,
    pub city: Option<String>,
    pub logo_url: Option<String>,
}

impl From<CampaignRow> for CampaignSummary {
    fn from(row: CampaignRow) -> Self {
        CampaignSummary {
            guid: CampaignGuid::from_uuid(row.guid),
            name: row.name,
            city: row.city,
            logo_url: row.logo_url,
        }
    }
}

/// Publisher or creator contact stored under prefixed column names.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(super) struct PrefixedContact {
    pub contact_first_name: Option<String>,
    pub contact_last_name: Option<String>,
    pub contact_display_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub contact_profile_pic_url: Option<String>,
}

/// Contact columns for a user joined as `alias`, matching [`PrefixedContact`].
pub(super) fn prefixed_contact_columns(alias: &str) -> String {
    format!(
        "{a}.first_name AS contact_first_name, {a}.last_name AS contact_last_name, \
         {a}.display_name AS contact_display_name, {a}.email AS contact_email, \
         {a}.phone AS contact_phone, {a}.profile_pic_url AS contact_profile_pic_url",
        a = alias
    )
}

impl PrefixedContact {
    pub fn into_contact(self, user_id: UserId) -> UserContact {
        UserContact {
            user_id,
            first_name: self.contact_first_name,
            last_name: self.contact_last_name,
            display_name: self.contact_display_name,
            email: self.contact_email,
            phone: self.contact_phone,
            profile_pic_url: self.contact_profile_pic_url,
        }
    }
}

/// Campaign display columns stored under prefixed names.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(super) struct PrefixedCampaign {
    pub campaign_name: String,
    pub campaign_city: Option<String>,
    pub campaign_logo_url: Option<String>,
}

impl PrefixedCampaign {
    pub fn into_summary(self, guid: CampaignGuid) -> CampaignSummary {
        CampaignSummary {
            guid,
            name: self.campaign_name,
            city: self.campaign_city,
            logo_url: self.campaign_logo_url,
        }
    }
}

pub(super) async fn find_user<'e, E: PgExecutor<'e>>(
    executor: E,
    user: UserId,
) -> Result<Option<UserContact>, DomainError> {
    let sql = format!("SELECT {} FROM users u WHERE u.id = $1", USER_COLUMNS);
    let row: Option<UserRow> = sqlx::query_as(&sql)
        .bind(user.value())
        .fetch_optional(executor)
        .await
        .map_err(query_failed("load user"))?;

    row.map(UserContact::try_from).transpose()
}

pub(super) async fn find_user_by_email<'e, E: PgExecutor<'e>>(
    executor: E,
    email: &str,
) -> Result<Option<UserContact>, DomainError> {
    let sql = format!(
        "SELECT {} FROM users u WHERE lower(u.email) = lower($1)",
        USER_COLUMNS
    );
    let row: Option<UserRow> = sqlx::query_as(&sql)
        .bind(email.trim())
        .fetch_optional(executor)
        .await
        .map_err(query_failed("load user by email"))?;

    row.map(UserContact::try_from).transpose()
}

pub(super) async fn find_campaign<'e, E: PgExecutor<'e>>(
    executor: E,
    campaign: CampaignGuid,
) -> Result<Option<CampaignSummary>, DomainError> {
    let row: Option<CampaignRow> = sqlx::query_as(
        r#"
        SELECT guid, name, city, logo_url
        FROM campaigns
        WHERE guid = $1
        "#,
    )
    .bind(campaign.as_uuid())
    .fetch_optional(executor)
    .await
    .map_err(query_failed("load campaign"))?;

    Ok(row.map(CampaignSummary::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_row() -> EventRow {
        EventRow {
            id: 7,
            guid: Uuid::new_v4(),
            name: "Canvass".to_string(),
            description: None,
            location: Some("Ward 2".to_string()),
            start_time: None,
            end_time: None,
            max_attendees: Some(12),
            is_open_join: true,
            creator_id: 3,
            campaign_guid: Some(Uuid::new_v4()),
            owner_user_id: None,
        }
    }

    #[test]
    fn campaign_row_becomes_campaign_event() {
        let row = event_row();
        let campaign = row.campaign_guid.unwrap();

        let event = Event::try_from(row).unwrap();

        assert_eq!(event.id, EventId::from_raw(7));
        assert_eq!(event.owner, EventOwner::Campaign(CampaignGuid::from_uuid(campaign)));
    }

    #[test]
    fn personal_row_becomes_personal_event() {
        let row = EventRow {
            campaign_guid: None,
            owner_user_id: Some(3),
            ..event_row()
        };

        let event = Event::try_from(row).unwrap();

        assert_eq!(event.owner, EventOwner::Personal(UserId::new(3).unwrap()));
    }

    #[test]
    fn row_with_two_owners_is_rejected() {
        let row = EventRow {
            owner_user_id: Some(3),
            ..event_row()
        };

        let err = Event::try_from(row).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn unknown_role_is_a_database_error() {
        assert_eq!(parse_role("participant").unwrap(), MemberRole::Participant);
        assert_eq!(parse_role("guest").unwrap_err().code, ErrorCode::DatabaseError);
    }

    #[test]
    fn prefixed_columns_use_alias() {
        let columns = prefixed_contact_columns("p");
        assert!(columns.starts_with("p.first_name AS contact_first_name"));
        assert!(columns.contains("p.profile_pic_url AS contact_profile_pic_url"));
    }
}

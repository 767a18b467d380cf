//! PostgreSQL implementation of PreferenceRepository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{CampaignGuid, DomainError, UserId};
use crate::domain::preference::{PreferenceEntry, PreferenceError, PreferenceMap};
use crate::ports::PreferenceRepository;

use super::rows::{find_campaign, find_user, query_failed, violates, CampaignRow};

const PREFERENCE_KEY: &str = "campaign_preferences_pkey";

pub struct PostgresPreferenceRepository {
    pool: PgPool,
}

impl PostgresPreferenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn check_keys(&self, user: UserId, campaign: CampaignGuid) -> Result<(), DomainError> {
        if find_user(&self.pool, user).await?.is_none() {
            return Err(PreferenceError::user_not_found(user).into());
        }
        if find_campaign(&self.pool, campaign).await?.is_none() {
            return Err(PreferenceError::campaign_not_found(campaign).into());
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PreferenceRow {
    #[sqlx(flatten)]
    campaign: CampaignRow,
    is_preferred: bool,
}

#[async_trait]
impl PreferenceRepository for PostgresPreferenceRepository {
    async fn add(&self, user: UserId, campaign: CampaignGuid, is_preferred: bool) -> Result<(), DomainError> {
        self.check_keys(user, campaign).await?;

        sqlx::query(
            "INSERT INTO campaign_preferences (user_id, campaign_guid, is_preferred) VALUES ($1, $2, $3)",
        )
        .bind(user.value())
        .bind(campaign.as_uuid())
        .bind(is_preferred)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if violates(&e, PREFERENCE_KEY) {
                return PreferenceError::already_exists(user, campaign).into();
            }
            query_failed("insert preference")(e)
        })?;

        Ok(())
    }

    async fn update(&self, user: UserId, campaign: CampaignGuid, is_preferred: bool) -> Result<(), DomainError> {
        self.check_keys(user, campaign).await?;

        let result = sqlx::query(
            "UPDATE campaign_preferences SET is_preferred = $3 WHERE user_id = $1 AND campaign_guid = $2",
        )
        .bind(user.value())
        .bind(campaign.as_uuid())
        .bind(is_preferred)
        .execute(&self.pool)
        .await
        .map_err(query_failed("update preference"))?;

        if result.rows_affected() == 0 {
            return Err(PreferenceError::not_found(user, campaign).into());
        }
        Ok(())
    }

    async fn remove(&self, user: UserId, campaign: CampaignGuid) -> Result<(), DomainError> {
        self.check_keys(user, campaign).await?;

        let result = sqlx::query(
            "DELETE FROM campaign_preferences WHERE user_id = $1 AND campaign_guid = $2",
        )
        .bind(user.value())
        .bind(campaign.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(query_failed("remove preference"))?;

        if result.rows_affected() == 0 {
            return Err(PreferenceError::not_found(user, campaign).into());
        }
        Ok(())
    }

    async fn list_for_user(&self, user: UserId) -> Result<Vec<PreferenceEntry>, DomainError> {
        if find_user(&self.pool, user).await?.is_none() {
            return Err(PreferenceError::user_not_found(user).into());
        }

        let rows: Vec<PreferenceRow> = sqlx::query_as(
            r#"
            SELECT c.guid, c.name, c.city, c.logo_url, p.is_preferred
            FROM campaign_preferences p
            JOIN campaigns c ON c.guid = p.campaign_guid
            WHERE p.user_id = $1
            ORDER BY c.name
            "#,
        )
        .bind(user.value())
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed("list preferences"))?;

        Ok(rows
            .into_iter()
            .map(|row| PreferenceEntry {
                campaign: row.campaign.into(),
                is_preferred: row.is_preferred,
            })
            .collect())
    }

    async fn preference_map(&self, user: UserId) -> Result<PreferenceMap, DomainError> {
        let rows: Vec<(Uuid, bool)> = sqlx::query_as(
            "SELECT campaign_guid, is_preferred FROM campaign_preferences WHERE user_id = $1",
        )
        .bind(user.value())
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed("load preference map"))?;

        Ok(rows
            .into_iter()
            .map(|(campaign, is_preferred)| (CampaignGuid::from_uuid(campaign), is_preferred))
            .collect())
    }
}

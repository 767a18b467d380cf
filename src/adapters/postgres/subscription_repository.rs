//! PostgreSQL implementation of SubscriptionRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{CampaignGuid, DomainError, UserId};
use crate::domain::notification::{
    NotificationSettings, Subscriber, SubscriptionEntry, SubscriptionError,
};
use crate::ports::SubscriptionRepository;

use super::rows::{
    find_campaign, find_user, query_failed, violates, CampaignRow, UserRow, USER_COLUMNS,
};

const SUBSCRIPTION_KEY: &str = "notification_subscriptions_pkey";

pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn check_keys(&self, user: UserId, campaign: CampaignGuid) -> Result<(), DomainError> {
        if find_user(&self.pool, user).await?.is_none() {
            return Err(SubscriptionError::user_not_found(user).into());
        }
        if find_campaign(&self.pool, campaign).await?.is_none() {
            return Err(SubscriptionError::campaign_not_found(campaign).into());
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EntryRow {
    #[sqlx(flatten)]
    campaign: CampaignRow,
    via_email: bool,
    via_sms: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriberRow {
    #[sqlx(flatten)]
    user: UserRow,
    via_email: bool,
    via_sms: bool,
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn subscribe(
        &self,
        user: UserId,
        campaign: CampaignGuid,
        settings: NotificationSettings,
    ) -> Result<(), DomainError> {
        self.check_keys(user, campaign).await?;

        sqlx::query(
            r#"
            INSERT INTO notification_subscriptions (user_id, campaign_guid, via_email, via_sms)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.value())
        .bind(campaign.as_uuid())
        .bind(settings.via_email)
        .bind(settings.via_sms)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if violates(&e, SUBSCRIPTION_KEY) {
                return SubscriptionError::already_subscribed(user, campaign).into();
            }
            query_failed("insert subscription")(e)
        })?;

        Ok(())
    }

    async fn update(
        &self,
        user: UserId,
        campaign: CampaignGuid,
        settings: NotificationSettings,
    ) -> Result<(), DomainError> {
        self.check_keys(user, campaign).await?;

        let result = sqlx::query(
            r#"
            UPDATE notification_subscriptions SET via_email = $3, via_sms = $4
            WHERE user_id = $1 AND campaign_guid = $2
            "#,
        )
        .bind(user.value())
        .bind(campaign.as_uuid())
        .bind(settings.via_email)
        .bind(settings.via_sms)
        .execute(&self.pool)
        .await
        .map_err(query_failed("update subscription"))?;

        if result.rows_affected() == 0 {
            return Err(SubscriptionError::not_found(user, campaign).into());
        }
        Ok(())
    }

    async fn unsubscribe(&self, user: UserId, campaign: CampaignGuid) -> Result<(), DomainError> {
        self.check_keys(user, campaign).await?;

        let result = sqlx::query(
            "DELETE FROM notification_subscriptions WHERE user_id = $1 AND campaign_guid = $2",
        )
        .bind(user.value())
        .bind(campaign.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(query_failed("remove subscription"))?;

        if result.rows_affected() == 0 {
            return Err(SubscriptionError::not_found(user, campaign).into());
        }
        Ok(())
    }

    async fn for_user(&self, user: UserId) -> Result<Vec<SubscriptionEntry>, DomainError> {
        if find_user(&self.pool, user).await?.is_none() {
            return Err(SubscriptionError::user_not_found(user).into());
        }

        let rows: Vec<EntryRow> = sqlx::query_as(
            r#"
            SELECT c.guid, c.name, c.city, c.logo_url, s.via_email, s.via_sms
            FROM notification_subscriptions s
            JOIN campaigns c ON c.guid = s.campaign_guid
            WHERE s.user_id = $1
            ORDER BY c.name
            "#,
        )
        .bind(user.value())
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed("list subscriptions"))?;

        Ok(rows
            .into_iter()
            .map(|row| SubscriptionEntry {
                campaign: row.campaign.into(),
                settings: NotificationSettings::new(row.via_email, row.via_sms),
            })
            .collect())
    }

    async fn subscribers(&self, campaign: CampaignGuid) -> Result<Vec<Subscriber>, DomainError> {
        if find_campaign(&self.pool, campaign).await?.is_none() {
            return Err(SubscriptionError::campaign_not_found(campaign).into());
        }

        let sql = format!(
            r#"
            SELECT {}, s.via_email, s.via_sms
            FROM notification_subscriptions s
            JOIN users u ON u.id = s.user_id
            WHERE s.campaign_guid = $1
            ORDER BY u.id
            "#,
            USER_COLUMNS
        );
        let rows: Vec<SubscriberRow> = sqlx::query_as(&sql)
            .bind(campaign.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(query_failed("list subscribers"))?;

        rows.into_iter()
            .map(|row| {
                Ok(Subscriber {
                    contact: row.user.try_into()?,
                    settings: NotificationSettings::new(row.via_email, row.via_sms),
                })
            })
            .collect()
    }
}

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::mailing_list_models::{MailingListPreferences, Subscription};
use crate::error::Result;

pub struct NewSubscription {
    pub user_id: Option<String>,
    /// Already normalized (trimmed, lower-cased).
    pub email: String,
    pub name: Option<String>,
    pub preferences: MailingListPreferences,
}

/// Mailing-list storage. Every adapter keeps at most one record per email.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Inserts the email or re-activates and overwrites its existing record.
    /// A missing `user_id` keeps whatever identity the record already had.
    async fn upsert_by_email(&self, new: &NewSubscription) -> Result<Subscription>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Subscription>>;
    /// The user's active record if there is one, otherwise their most recently updated one.
    async fn find_for_user(&self, user_id: &str) -> Result<Option<Subscription>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subscription>>;
    /// Sets `unsubscribed_at` unless it is already set.
    async fn mark_unsubscribed(&self, id: Uuid) -> Result<Option<Subscription>>;
    async fn update_active_preferences(
        &self,
        user_id: &str,
        preferences: MailingListPreferences,
    ) -> Result<Option<Subscription>>;
    async fn list_all(&self) -> Result<Vec<Subscription>>;
    async fn delete(&self, id: Uuid) -> Result<u64>;
}

#[derive(Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn upsert_by_email(&self, new: &NewSubscription) -> Result<Subscription> {
        let subscription = sqlx::query_as::<_, Subscription>(
            "INSERT INTO mailing_list_subscriptions
                (user_id, email, name, marketing, updates, subscribed_at, unsubscribed_at)
             VALUES ($1, $2, $3, $4, $5, NOW(), NULL)
             ON CONFLICT (email) DO UPDATE SET
                user_id = COALESCE(EXCLUDED.user_id, mailing_list_subscriptions.user_id),
                name = EXCLUDED.name,
                marketing = EXCLUDED.marketing,
                updates = EXCLUDED.updates,
                subscribed_at = NOW(),
                unsubscribed_at = NULL,
                updated_at = NOW()
             RETURNING *",
        )
        .bind(&new.user_id)
        .bind(&new.email)
        .bind(&new.name)
        .bind(new.preferences.marketing)
        .bind(new.preferences.updates)
        .fetch_one(&self.pool)
        .await?;

        Ok(subscription)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Subscription>> {
        let subscription = sqlx::query_as::<_, Subscription>(
            "SELECT * FROM mailing_list_subscriptions WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    async fn find_for_user(&self, user_id: &str) -> Result<Option<Subscription>> {
        let subscription = sqlx::query_as::<_, Subscription>(
            "SELECT * FROM mailing_list_subscriptions
             WHERE user_id = $1
             ORDER BY (unsubscribed_at IS NULL) DESC, updated_at DESC
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subscription>> {
        let subscription = sqlx::query_as::<_, Subscription>(
            "SELECT * FROM mailing_list_subscriptions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    async fn mark_unsubscribed(&self, id: Uuid) -> Result<Option<Subscription>> {
        let subscription = sqlx::query_as::<_, Subscription>(
            "UPDATE mailing_list_subscriptions SET
                unsubscribed_at = COALESCE(unsubscribed_at, NOW()),
                updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    async fn update_active_preferences(
        &self,
        user_id: &str,
        preferences: MailingListPreferences,
    ) -> Result<Option<Subscription>> {
        let subscription = sqlx::query_as::<_, Subscription>(
            "UPDATE mailing_list_subscriptions SET
                marketing = $1,
                updates = $2,
                updated_at = NOW()
             WHERE id = (
                SELECT id FROM mailing_list_subscriptions
                WHERE user_id = $3 AND unsubscribed_at IS NULL
                ORDER BY updated_at DESC
                LIMIT 1
             )
             RETURNING *",
        )
        .bind(preferences.marketing)
        .bind(preferences.updates)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    async fn list_all(&self) -> Result<Vec<Subscription>> {
        let subscriptions = sqlx::query_as::<_, Subscription>(
            "SELECT * FROM mailing_list_subscriptions ORDER BY subscribed_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(subscriptions)
    }

    async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM mailing_list_subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Document-style adapter: one map of subscription documents keyed by id.
#[derive(Default)]
pub struct MemorySubscriptionRepository {
    documents: RwLock<HashMap<Uuid, Subscription>>,
}

impl MemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionRepository for MemorySubscriptionRepository {
    async fn upsert_by_email(&self, new: &NewSubscription) -> Result<Subscription> {
        let mut docs = self.documents.write().await;
        let now = Utc::now();

        if let Some(existing) = docs.values_mut().find(|s| s.email == new.email) {
            if new.user_id.is_some() {
                existing.user_id = new.user_id.clone();
            }
            existing.name = new.name.clone();
            existing.preferences = new.preferences;
            existing.subscribed_at = now;
            existing.unsubscribed_at = None;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let subscription = Subscription {
            id: Uuid::new_v4(),
            user_id: new.user_id.clone(),
            email: new.email.clone(),
            name: new.name.clone(),
            preferences: new.preferences,
            subscribed_at: now,
            unsubscribed_at: None,
            created_at: now,
            updated_at: now,
        };
        docs.insert(subscription.id, subscription.clone());

        Ok(subscription)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Subscription>> {
        let docs = self.documents.read().await;
        Ok(docs.values().find(|s| s.email == email).cloned())
    }

    async fn find_for_user(&self, user_id: &str) -> Result<Option<Subscription>> {
        let docs = self.documents.read().await;
        Ok(docs
            .values()
            .filter(|s| s.user_id.as_deref() == Some(user_id))
            .max_by_key(|s| (s.is_active(), s.updated_at))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subscription>> {
        let docs = self.documents.read().await;
        Ok(docs.get(&id).cloned())
    }

    async fn mark_unsubscribed(&self, id: Uuid) -> Result<Option<Subscription>> {
        let mut docs = self.documents.write().await;
        let now = Utc::now();

        Ok(docs.get_mut(&id).map(|s| {
            if s.unsubscribed_at.is_none() {
                s.unsubscribed_at = Some(now);
            }
            s.updated_at = now;
            s.clone()
        }))
    }

    async fn update_active_preferences(
        &self,
        user_id: &str,
        preferences: MailingListPreferences,
    ) -> Result<Option<Subscription>> {
        let mut docs = self.documents.write().await;

        let active = docs
            .values_mut()
            .filter(|s| s.user_id.as_deref() == Some(user_id) && s.is_active())
            .max_by_key(|s| s.updated_at);

        Ok(active.map(|s| {
            s.preferences = preferences;
            s.updated_at = Utc::now();
            s.clone()
        }))
    }

    async fn list_all(&self) -> Result<Vec<Subscription>> {
        let docs = self.documents.read().await;
        let mut subscriptions: Vec<Subscription> = docs.values().cloned().collect();
        subscriptions.sort_by(|a, b| b.subscribed_at.cmp(&a.subscribed_at));
        Ok(subscriptions)
    }

    async fn delete(&self, id: Uuid) -> Result<u64> {
        let mut docs = self.documents.write().await;
        Ok(docs.remove(&id).map_or(0, |_| 1))
    }
}

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::notification_models::Notification;
use crate::error::Result;

pub struct NewNotification {
    pub hackathon_id: Uuid,
    pub title: String,
    pub message: String,
    pub recipient_count: i64,
    pub sent_by: Option<String>,
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, new: &NewNotification) -> Result<Notification>;
    /// Newest first.
    async fn list_recent(&self, limit: i64) -> Result<Vec<Notification>>;
    /// Newest first.
    async fn list_for_hackathons(&self, hackathon_ids: &[Uuid]) -> Result<Vec<Notification>>;
}

#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn create(&self, new: &NewNotification) -> Result<Notification> {
        let notification = sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (hackathon_id, title, message, recipient_count, sent_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(new.hackathon_id)
        .bind(&new.title)
        .bind(&new.message)
        .bind(new.recipient_count)
        .bind(&new.sent_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    async fn list_for_hackathons(&self, hackathon_ids: &[Uuid]) -> Result<Vec<Notification>> {
        if hackathon_ids.is_empty() {
            return Ok(Vec::new());
        }

        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications
             WHERE hackathon_id = ANY($1)
             ORDER BY created_at DESC",
        )
        .bind(hackathon_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }
}

#[derive(Default)]
pub struct MemoryNotificationRepository {
    documents: RwLock<HashMap<Uuid, Notification>>,
}

impl MemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut notifications: Vec<Notification>) -> Vec<Notification> {
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    notifications
}

#[async_trait]
impl NotificationRepository for MemoryNotificationRepository {
    async fn create(&self, new: &NewNotification) -> Result<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            hackathon_id: new.hackathon_id,
            title: new.title.clone(),
            message: new.message.clone(),
            recipient_count: new.recipient_count,
            sent_by: new.sent_by.clone(),
            created_at: Utc::now(),
        };

        let mut docs = self.documents.write().await;
        docs.insert(notification.id, notification.clone());

        Ok(notification)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Notification>> {
        let docs = self.documents.read().await;
        let mut notifications = newest_first(docs.values().cloned().collect());
        notifications.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(notifications)
    }

    async fn list_for_hackathons(&self, hackathon_ids: &[Uuid]) -> Result<Vec<Notification>> {
        let docs = self.documents.read().await;
        Ok(newest_first(
            docs.values()
                .filter(|n| hackathon_ids.contains(&n.hackathon_id))
                .cloned()
                .collect(),
        ))
    }
}

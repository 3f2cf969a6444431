use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::visit_models::Visit;
use crate::error::Result;

pub struct NewVisit {
    pub user_id: Option<String>,
    pub path: String,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait VisitRepository: Send + Sync {
    async fn record(&self, new: &NewVisit) -> Result<Visit>;
    async fn count_since(&self, since: DateTime<Utc>) -> Result<i64>;
    /// Newest first.
    async fn recent_since(&self, since: DateTime<Utc>, limit: i64) -> Result<Vec<Visit>>;
}

#[derive(Clone)]
pub struct PgVisitRepository {
    pool: PgPool,
}

impl PgVisitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VisitRepository for PgVisitRepository {
    async fn record(&self, new: &NewVisit) -> Result<Visit> {
        let visit = sqlx::query_as::<_, Visit>(
            "INSERT INTO user_visits (user_id, path, referrer, user_agent, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, user_id, path, referrer, user_agent, created_at",
        )
        .bind(&new.user_id)
        .bind(&new.path)
        .bind(&new.referrer)
        .bind(&new.user_agent)
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(visit)
    }

    async fn count_since(&self, since: DateTime<Utc>) -> Result<i64> {
        let total = sqlx::query_scalar("SELECT COUNT(*) FROM user_visits WHERE created_at >= $1")
            .bind(since)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn recent_since(&self, since: DateTime<Utc>, limit: i64) -> Result<Vec<Visit>> {
        let visits = sqlx::query_as::<_, Visit>(
            "SELECT id, user_id, path, referrer, user_agent, created_at
             FROM user_visits
             WHERE created_at >= $1
             ORDER BY created_at DESC
             LIMIT $2",
        )
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(visits)
    }
}

#[derive(Default)]
pub struct MemoryVisitRepository {
    documents: RwLock<HashMap<Uuid, Visit>>,
}

impl MemoryVisitRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VisitRepository for MemoryVisitRepository {
    async fn record(&self, new: &NewVisit) -> Result<Visit> {
        let visit = Visit {
            id: Uuid::new_v4(),
            user_id: new.user_id.clone(),
            path: new.path.clone(),
            referrer: new.referrer.clone(),
            user_agent: new.user_agent.clone(),
            created_at: new.created_at,
        };

        let mut docs = self.documents.write().await;
        docs.insert(visit.id, visit.clone());

        Ok(visit)
    }

    async fn count_since(&self, since: DateTime<Utc>) -> Result<i64> {
        let docs = self.documents.read().await;
        let total = docs.values().filter(|v| v.created_at >= since).count();
        Ok(i64::try_from(total).unwrap_or(i64::MAX))
    }

    async fn recent_since(&self, since: DateTime<Utc>, limit: i64) -> Result<Vec<Visit>> {
        let docs = self.documents.read().await;
        let mut visits: Vec<Visit> = docs
            .values()
            .filter(|v| v.created_at >= since)
            .cloned()
            .collect();
        visits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        visits.truncate(usize::try_from(limit).unwrap_or(0));

        Ok(visits)
    }
}

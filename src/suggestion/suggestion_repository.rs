use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::suggestion_models::CommunitySuggestion;
use crate::error::Result;

pub struct NewSuggestion {
    pub title: String,
    pub description: String,
    pub category: String,
    pub author_id: Option<String>,
    pub author_name: Option<String>,
}

pub struct SuggestionChanges {
    pub title: String,
    pub description: String,
    pub category: String,
}

#[async_trait]
pub trait SuggestionRepository: Send + Sync {
    async fn create(&self, new: &NewSuggestion) -> Result<CommunitySuggestion>;
    /// Most voted first.
    async fn list_by_votes(&self) -> Result<Vec<CommunitySuggestion>>;
    async fn update(&self, id: Uuid, changes: &SuggestionChanges) -> Result<Option<CommunitySuggestion>>;
    async fn delete(&self, id: Uuid) -> Result<u64>;
    /// Adds the voter to `voter_ids` or removes them, keeping `votes_count` in step.
    async fn toggle_vote(&self, id: Uuid, voter_id: &str) -> Result<Option<CommunitySuggestion>>;
}

#[derive(Clone)]
pub struct PgSuggestionRepository {
    pool: PgPool,
}

impl PgSuggestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SuggestionRepository for PgSuggestionRepository {
    async fn create(&self, new: &NewSuggestion) -> Result<CommunitySuggestion> {
        let suggestion = sqlx::query_as::<_, CommunitySuggestion>(
            "INSERT INTO community_suggestions (title, description, category, author_id, author_name)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.category)
        .bind(&new.author_id)
        .bind(&new.author_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(suggestion)
    }

    async fn list_by_votes(&self) -> Result<Vec<CommunitySuggestion>> {
        let suggestions = sqlx::query_as::<_, CommunitySuggestion>(
            "SELECT * FROM community_suggestions ORDER BY votes_count DESC, created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(suggestions)
    }

    async fn update(&self, id: Uuid, changes: &SuggestionChanges) -> Result<Option<CommunitySuggestion>> {
        let suggestion = sqlx::query_as::<_, CommunitySuggestion>(
            "UPDATE community_suggestions SET
                title = $2,
                description = $3,
                category = $4,
                updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.category)
        .fetch_optional(&self.pool)
        .await?;

        Ok(suggestion)
    }

    async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM community_suggestions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn toggle_vote(&self, id: Uuid, voter_id: &str) -> Result<Option<CommunitySuggestion>> {
        // Both CASE arms read the row as it was before this UPDATE.
        let suggestion = sqlx::query_as::<_, CommunitySuggestion>(
            "UPDATE community_suggestions SET
                voter_ids = CASE
                    WHEN $2::text = ANY(voter_ids) THEN array_remove(voter_ids, $2::text)
                    ELSE array_append(voter_ids, $2::text)
                END,
                votes_count = CASE
                    WHEN $2::text = ANY(voter_ids) THEN votes_count - 1
                    ELSE votes_count + 1
                END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(voter_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(suggestion)
    }
}

#[derive(Default)]
pub struct MemorySuggestionRepository {
    documents: RwLock<HashMap<Uuid, CommunitySuggestion>>,
}

impl MemorySuggestionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SuggestionRepository for MemorySuggestionRepository {
    async fn create(&self, new: &NewSuggestion) -> Result<CommunitySuggestion> {
        let now = Utc::now();
        let suggestion = CommunitySuggestion {
            id: Uuid::new_v4(),
            title: new.title.clone(),
            description: new.description.clone(),
            category: new.category.clone(),
            author_id: new.author_id.clone(),
            author_name: new.author_name.clone(),
            votes_count: 0,
            voter_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let mut docs = self.documents.write().await;
        docs.insert(suggestion.id, suggestion.clone());

        Ok(suggestion)
    }

    async fn list_by_votes(&self) -> Result<Vec<CommunitySuggestion>> {
        let docs = self.documents.read().await;
        let mut suggestions: Vec<CommunitySuggestion> = docs.values().cloned().collect();
        suggestions.sort_by(|a, b| {
            b.votes_count
                .cmp(&a.votes_count)
                .then(b.created_at.cmp(&a.created_at))
        });

        Ok(suggestions)
    }

    async fn update(&self, id: Uuid, changes: &SuggestionChanges) -> Result<Option<CommunitySuggestion>> {
        let mut docs = self.documents.write().await;

        Ok(docs.get_mut(&id).map(|s| {
            s.title = changes.title.clone();
            s.description = changes.description.clone();
            s.category = changes.category.clone();
            s.updated_at = Utc::now();
            s.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<u64> {
        let mut docs = self.documents.write().await;
        Ok(docs.remove(&id).map_or(0, |_| 1))
    }

    async fn toggle_vote(&self, id: Uuid, voter_id: &str) -> Result<Option<CommunitySuggestion>> {
        let mut docs = self.documents.write().await;

        Ok(docs.get_mut(&id).map(|s| {
            if let Some(position) = s.voter_ids.iter().position(|v| v == voter_id) {
                s.voter_ids.remove(position);
                s.votes_count -= 1;
            } else {
                s.voter_ids.push(voter_id.to_string());
                s.votes_count += 1;
            }
            s.updated_at = Utc::now();
            s.clone()
        }))
    }
}

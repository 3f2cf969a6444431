use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CommunitySuggestion {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Null for guest submissions
    pub author_id: Option<String>,
    pub author_name: Option<String>,
    pub votes_count: i32,
    pub voter_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestionVoteResponse {
    pub id: Uuid,
    pub votes_count: i32,
    pub has_voted: bool,
}

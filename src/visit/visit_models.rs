use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A page view from a browser. `created_at` has whole-second precision.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Visit {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub path: String,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrackOutcome {
    /// False when the visit was filtered out (non-browser agent or unknown page)
    pub recorded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VisitSummary {
    pub since: DateTime<Utc>,
    pub total_visits: i64,
    pub recent: Vec<Visit>,
}

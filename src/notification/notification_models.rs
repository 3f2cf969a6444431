use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One broadcast to a hackathon's participants. Recipients read it from their inbox.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub hackathon_id: Uuid,
    pub title: String,
    pub message: String,
    pub recipient_count: i64,
    pub sent_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DispatchReport {
    pub notification: Notification,
    pub recipient_count: i64,
    pub message: String,
}
